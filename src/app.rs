use log::{error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
};

use crate::{
    config::DemoConfig,
    error::DemoError,
    input::{Command, InputState},
    logger,
    render_system::RenderSystem,
    scenes::{teapot::TeapotScene, Scene},
};

///
/// Open the window and drive the scene until the user quits. Only setup
/// failures are returned; once the loop runs, frame errors are logged and the
/// frame is skipped.
///
pub fn run(config: DemoConfig) -> Result<(), DemoError> {
    let event_loop = EventLoop::new();
    let mut render_system = RenderSystem::new(&event_loop, &config)?;
    let mut scene = TeapotScene::new(&config, &mut rand::rng());
    let mut input = InputState::new();

    info!(
        "Camera: arrows. Lights: W/S/A/D/X and Y/H/G/J/N, 1/2 toggle. \
         =/- step, R reset, Q quit."
    );

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    render_system.invalidate()
                }
                WindowEvent::KeyboardInput { input: key, .. } => input.handle_key(key),
                WindowEvent::Focused(false) => input.release_all(),
                _ => (),
            },
            Event::RedrawEventsCleared => {
                if !redraw(&mut render_system, &mut scene, &mut input) {
                    info!("Quit requested.");
                    control_flow.set_exit();
                }
            }
            Event::LoopDestroyed => logger::flush(),
            _ => (),
        }
    })
}

/// Opening and closing a frame on the swapchain.
trait FrameTarget {
    fn begin(&mut self) -> Result<bool, DemoError>;
    fn end(&mut self) -> Result<(), DemoError>;
}

impl FrameTarget for RenderSystem {
    fn begin(&mut self) -> Result<bool, DemoError> {
        self.start_frame()
    }

    fn end(&mut self) -> Result<(), DemoError> {
        self.finish_frame()
    }
}

///
/// Run `draw` inside a frame. A started frame is always ended, even when
/// drawing fails, so its swapchain image goes back to the presentation engine.
///
fn framed<T: FrameTarget>(
    target: &mut T,
    draw: impl FnOnce(&mut T) -> Result<(), DemoError>,
) -> Result<(), DemoError> {
    if !target.begin()? {
        return Ok(());
    }
    let drawn = draw(target);
    let ended = target.end();
    drawn.and(ended)
}

///
/// One turn of the loop: draw the current state, then apply at most one key
/// command. Returns `false` once quitting was requested.
///
fn redraw<T: FrameTarget, S: Scene<T>>(
    target: &mut T,
    scene: &mut S,
    input: &mut InputState,
) -> bool {
    if let Err(e) = framed(target, |target| scene.draw(target)) {
        error!("Frame skipped: {}", e);
    }

    match input.next_command() {
        Some(Command::Quit) => false,
        Some(command) => {
            scene.handle(command);
            true
        }
        None => true,
    }
}
