mod app;
mod camera;
mod config;
mod error;
mod input;
mod logger;
mod orbit;
mod render_system;
mod scenes;
mod shaders;

use std::process;

use log::error;

use config::DemoConfig;

fn main() {
    let config = DemoConfig::from_env();

    if let Err(e) = logger::init(config.log_level) {
        eprintln!("{}", e);
    }

    if let Err(e) = app::run(config) {
        error!("{}", e);
        logger::flush();
        process::exit(1);
    }
}
