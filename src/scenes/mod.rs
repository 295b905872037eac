use crate::{error::DemoError, input::Command, render_system::RenderSystem};

pub mod teapot;

pub trait Scene<T = RenderSystem> {
    /// Apply one keyboard command to the scene state.
    fn handle(&mut self, command: Command);

    fn draw(&mut self, target: &mut T) -> Result<(), DemoError>;
}
