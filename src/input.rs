use std::collections::HashSet;

use winit::event::{ElementState, KeyboardInput, VirtualKeyCode};

use crate::orbit::Orbiter;

///
/// One orbit step applied to the camera or a light. Tilts run about the
/// orbiter's `side` axis (`TiltDown` is the positive angle), pans about its
/// `up` axis (`PanLeft` is the positive angle).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    TiltUp,
    TiltDown,
    PanLeft,
    PanRight,
    Roll,
}

impl Motion {
    pub fn apply(self, orbit: &mut Orbiter, delta: f32) {
        match self {
            Motion::TiltUp => orbit.tilt(-delta),
            Motion::TiltDown => orbit.tilt(delta),
            Motion::PanLeft => orbit.pan(delta),
            Motion::PanRight => orbit.pan(-delta),
            Motion::Roll => orbit.roll(delta),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    IncreaseStep,
    DecreaseStep,
    Reset,
    Camera(Motion),
    Light(usize, Motion),
    ToggleLight(usize),
}

impl Command {
    ///
    /// Discrete commands fire once per key press. Everything else repeats on
    /// every frame the key is held.
    ///
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Command::Quit
                | Command::IncreaseStep
                | Command::DecreaseStep
                | Command::Reset
                | Command::ToggleLight(_)
        )
    }
}

///
/// Key bindings in priority order. When several bound keys are down in the same
/// frame, the first entry wins.
///
pub const BINDINGS: &[(VirtualKeyCode, Command)] = &[
    (VirtualKeyCode::Q, Command::Quit),
    (VirtualKeyCode::Escape, Command::Quit),
    (VirtualKeyCode::Equals, Command::IncreaseStep),
    (VirtualKeyCode::Minus, Command::DecreaseStep),
    (VirtualKeyCode::R, Command::Reset),
    (VirtualKeyCode::Left, Command::Camera(Motion::PanRight)),
    (VirtualKeyCode::Right, Command::Camera(Motion::PanLeft)),
    (VirtualKeyCode::Up, Command::Camera(Motion::TiltDown)),
    (VirtualKeyCode::Down, Command::Camera(Motion::TiltUp)),
    (VirtualKeyCode::W, Command::Light(0, Motion::TiltUp)),
    (VirtualKeyCode::S, Command::Light(0, Motion::TiltDown)),
    (VirtualKeyCode::A, Command::Light(0, Motion::PanLeft)),
    (VirtualKeyCode::D, Command::Light(0, Motion::PanRight)),
    (VirtualKeyCode::X, Command::Light(0, Motion::Roll)),
    (VirtualKeyCode::Y, Command::Light(1, Motion::TiltUp)),
    (VirtualKeyCode::H, Command::Light(1, Motion::TiltDown)),
    (VirtualKeyCode::G, Command::Light(1, Motion::PanLeft)),
    (VirtualKeyCode::J, Command::Light(1, Motion::PanRight)),
    (VirtualKeyCode::N, Command::Light(1, Motion::Roll)),
    (VirtualKeyCode::Key1, Command::ToggleLight(0)),
    (VirtualKeyCode::Key2, Command::ToggleLight(1)),
];

pub fn binding(key: VirtualKeyCode) -> Option<Command> {
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

/// Keyboard state accumulated between frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<VirtualKeyCode>,
    pressed: HashSet<VirtualKeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, input: KeyboardInput) {
        let Some(key) = input.virtual_keycode else {
            return;
        };
        self.set_key(key, input.state);
    }

    pub fn set_key(&mut self, key: VirtualKeyCode, state: ElementState) {
        if binding(key).is_none() {
            return;
        }
        match state {
            ElementState::Pressed => {
                // Key repeat sends Pressed again without a Released in between.
                if self.held.insert(key) {
                    self.pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    ///
    /// The single command to run this frame, if any. Fresh presses are consumed
    /// whether or not they produced the winning command.
    ///
    pub fn next_command(&mut self) -> Option<Command> {
        let command = BINDINGS.iter().find_map(|(key, command)| {
            let active = if command.is_discrete() {
                self.pressed.contains(key)
            } else {
                self.held.contains(key)
            };
            active.then_some(*command)
        });
        self.pressed.clear();
        command
    }
}
