use log::LevelFilter;
use nalgebra_glm::{vec3, TVec3};

pub const TITLE: &str = "Camera Control";
pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 600;

pub const UNCAPPED_FPS: bool = false;

pub const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_2;
pub const NEAR_CLIP: f32 = 1.0;
pub const FAR_CLIP: f32 = 25.0;

pub const ROTATION_DELTA: f32 = 0.05;
pub const ROTATION_DELTA_STEP: f32 = 0.01;
pub const MIN_ROTATION_DELTA: f32 = 0.01;
pub const MAX_ROTATION_DELTA: f32 = 0.5;

pub const TEAPOT_SIZE: f32 = 1.0;
pub const TEAPOT_TESSELLATION: usize = 10;

/// Environment variable holding the log level, e.g. `RUST_LOG=debug`.
pub const LOG_LEVEL_VAR: &str = "RUST_LOG";

#[derive(Debug, Clone)]
pub struct LightConfig {
    pub color: TVec3<f32>,
    pub position: TVec3<f32>,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub uncapped_fps: bool,

    pub field_of_view: f32,
    pub near_clip: f32,
    pub far_clip: f32,

    /// Angle in radians applied by a single orbit step.
    pub rotation_delta: f32,

    pub center: TVec3<f32>,
    pub eye: TVec3<f32>,
    pub up: TVec3<f32>,
    pub lights: [LightConfig; 2],

    pub teapot_size: f32,
    pub teapot_tessellation: usize,

    pub log_level: LevelFilter,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            title: TITLE.into(),
            width: WIDTH,
            height: HEIGHT,
            uncapped_fps: UNCAPPED_FPS,
            field_of_view: FIELD_OF_VIEW,
            near_clip: NEAR_CLIP,
            far_clip: FAR_CLIP,
            rotation_delta: ROTATION_DELTA,
            center: vec3(0.0, 0.0, 0.0),
            eye: vec3(0.0, 0.0, 5.0),
            up: vec3(0.0, 1.0, 0.0),
            lights: [
                LightConfig {
                    color: vec3(1.0, 0.0, 0.0),
                    position: vec3(0.0, 5.0, 10.0),
                },
                LightConfig {
                    color: vec3(0.0, 0.0, 1.0),
                    position: vec3(0.0, 5.0, -10.0),
                },
            ],
            teapot_size: TEAPOT_SIZE,
            teapot_tessellation: TEAPOT_TESSELLATION,
            log_level: LevelFilter::Info,
        }
    }
}

impl DemoConfig {
    /// Defaults, with the log level overridden from the environment if set.
    pub fn from_env() -> Self {
        let mut config = DemoConfig::default();
        if let Some(level) = std::env::var(LOG_LEVEL_VAR)
            .ok()
            .and_then(|value| value.parse::<LevelFilter>().ok())
        {
            config.log_level = level;
        }
        config
    }
}

/// Clamp a rotation step into the accepted range.
pub fn clamp_rotation_delta(delta: f32) -> f32 {
    delta.clamp(MIN_ROTATION_DELTA, MAX_ROTATION_DELTA)
}
