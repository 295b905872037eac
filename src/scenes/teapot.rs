use log::{debug, info};
use rand::Rng;
use vulkano::buffer::Subbuffer;

use crate::{
    camera::Camera,
    config::{clamp_rotation_delta, DemoConfig, ROTATION_DELTA_STEP},
    error::DemoError,
    input::Command,
    render_system::{
        lighting::spinning::SpinningLight,
        model::Model,
        uniforms::{FrameUniforms, Projection},
        vertex::Vert,
        RenderSystem,
    },
};

use super::Scene;

/// Everything the keyboard can change. A copy taken at construction backs reset.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub camera: Camera,
    pub lights: [SpinningLight; 2],
    pub rotation_delta: f32,
}

pub struct TeapotScene {
    state: SceneState,
    initial: SceneState,
    projection: Projection,
    teapot: Model,
    mesh: Option<Subbuffer<[Vert]>>,
}

impl TeapotScene {
    pub fn new<R: Rng + ?Sized>(config: &DemoConfig, rng: &mut R) -> TeapotScene {
        let camera = Camera::new(config.eye, config.center, config.up);
        let lights = [0, 1].map(|i| {
            SpinningLight::new(
                config.lights[i].color,
                config.lights[i].position,
                config.center,
                rng,
            )
        });

        let state = SceneState {
            camera,
            lights,
            rotation_delta: clamp_rotation_delta(config.rotation_delta),
        };

        TeapotScene {
            initial: state.clone(),
            state,
            projection: Projection {
                field_of_view: config.field_of_view,
                near_clip: config.near_clip,
                far_clip: config.far_clip,
            },
            teapot: Model::teapot()
                .size(config.teapot_size)
                .tessellation(config.teapot_tessellation)
                .build(),
            mesh: None,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        info!("Eye position, up vector and rotation delta reset.");
    }

    pub fn uniforms(&self, aspect_ratio: f32) -> FrameUniforms {
        FrameUniforms::new(
            &self.state.camera,
            &self.state.lights,
            &self.teapot.model_matrix(),
            &self.projection,
            aspect_ratio,
        )
    }

    fn set_rotation_delta(&mut self, delta: f32) {
        self.state.rotation_delta = clamp_rotation_delta(delta);
        info!("Rotation delta set to {:.2} rad.", self.state.rotation_delta);
    }
}

impl Scene for TeapotScene {
    fn handle(&mut self, command: Command) {
        let delta = self.state.rotation_delta;
        match command {
            // Quitting is the event loop's business.
            Command::Quit => {}
            Command::IncreaseStep => self.set_rotation_delta(delta + ROTATION_DELTA_STEP),
            Command::DecreaseStep => self.set_rotation_delta(delta - ROTATION_DELTA_STEP),
            Command::Reset => self.reset(),
            Command::Camera(motion) => motion.apply(self.state.camera.orbit_mut(), delta),
            Command::Light(index, motion) => {
                if let Some(light) = self.state.lights.get_mut(index) {
                    motion.apply(light.orbit_mut(), delta);
                }
            }
            Command::ToggleLight(index) => {
                if let Some(light) = self.state.lights.get_mut(index) {
                    light.toggle();
                    info!(
                        "Light {} switched {}.",
                        index,
                        if light.is_on() { "on" } else { "off" }
                    );
                }
            }
        }
        debug!("Handled {:?}", command);
    }

    fn draw(&mut self, render_system: &mut RenderSystem) -> Result<(), DemoError> {
        let Some(aspect_ratio) = render_system.aspect_ratio() else {
            return Ok(());
        };

        let mesh = match &self.mesh {
            Some(mesh) => mesh.clone(),
            None => {
                let mesh = render_system.upload_vertices(self.teapot.data())?;
                info!("Teapot uploaded with {} vertices.", mesh.len());
                self.mesh = Some(mesh.clone());
                mesh
            }
        };

        let uniforms = self.uniforms(aspect_ratio);
        render_system.add_geometry(&mesh, &uniforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{MAX_ROTATION_DELTA, MIN_ROTATION_DELTA},
        input::Motion,
    };
    use nalgebra_glm::{vec4, TVec3};
    use rand::{rngs::StdRng, SeedableRng};

    fn scene() -> TeapotScene {
        let config = DemoConfig {
            teapot_tessellation: 1,
            ..DemoConfig::default()
        };
        TeapotScene::new(&config, &mut StdRng::seed_from_u64(42))
    }

    fn radius(a: TVec3<f32>, b: TVec3<f32>) -> f32 {
        nalgebra_glm::distance(&a, &b)
    }

    #[test]
    fn test_initial_state_follows_config() {
        let scene = scene();
        let state = scene.state();
        let config = DemoConfig::default();

        assert_eq!(state.camera.eye(), config.eye);
        assert_eq!(state.camera.up(), config.up);
        assert_eq!(state.lights[0].color(), vec4(1.0, 0.0, 0.0, 1.0));
        assert_eq!(state.lights[1].color(), vec4(0.0, 0.0, 1.0, 1.0));
        assert_eq!(state.lights[1].position(), vec4(0.0, 5.0, -10.0, 1.0));
        assert_eq!(state.rotation_delta, config.rotation_delta);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut scene = scene();
        let initial = scene.state().clone();

        scene.handle(Command::Camera(Motion::PanLeft));
        scene.handle(Command::Camera(Motion::TiltDown));
        scene.handle(Command::Light(0, Motion::Roll));
        scene.handle(Command::Light(0, Motion::TiltUp));
        scene.handle(Command::Light(1, Motion::PanRight));
        scene.handle(Command::ToggleLight(1));
        scene.handle(Command::IncreaseStep);
        assert_ne!(scene.state(), &initial);

        scene.handle(Command::Reset);
        assert_eq!(scene.state(), &initial);
    }

    #[test]
    fn test_toggle_command_twice_restores_color() {
        let mut scene = scene();
        let color = scene.state().lights[0].color();

        scene.handle(Command::ToggleLight(0));
        assert_eq!(scene.state().lights[0].color(), vec4(0.0, 0.0, 0.0, 1.0));
        // The other light is untouched.
        assert_eq!(scene.state().lights[1].color(), vec4(0.0, 0.0, 1.0, 1.0));

        scene.handle(Command::ToggleLight(0));
        assert_eq!(scene.state().lights[0].color(), color);
    }

    #[test]
    fn test_commands_keep_orbit_radii() {
        let mut scene = scene();
        let camera_radius = radius(scene.state().camera.eye(), scene.state().camera.center());
        let light_radius = scene.state().lights[1].orbit().radius();

        let motions = [
            Motion::TiltUp,
            Motion::PanLeft,
            Motion::Roll,
            Motion::TiltDown,
            Motion::PanRight,
        ];
        for i in 0..500 {
            let motion = motions[i % motions.len()];
            scene.handle(Command::Camera(motion));
            scene.handle(Command::Light(1, motion));
        }

        let state = scene.state();
        assert!((radius(state.camera.eye(), state.camera.center()) - camera_radius).abs() < 1.0e-2);
        assert!((state.lights[1].orbit().radius() - light_radius).abs() < 1.0e-2);
    }

    #[test]
    fn test_rotation_delta_is_clamped() {
        let mut scene = scene();
        for _ in 0..100 {
            scene.handle(Command::IncreaseStep);
        }
        assert_eq!(scene.state().rotation_delta, MAX_ROTATION_DELTA);

        for _ in 0..100 {
            scene.handle(Command::DecreaseStep);
        }
        assert_eq!(scene.state().rotation_delta, MIN_ROTATION_DELTA);
    }

    #[test]
    fn test_out_of_range_light_is_ignored() {
        let mut scene = scene();
        let before = scene.state().clone();
        scene.handle(Command::ToggleLight(7));
        scene.handle(Command::Light(2, Motion::Roll));
        assert_eq!(scene.state(), &before);
    }

    #[test]
    fn test_uniforms_track_camera() {
        let mut scene = scene();
        let before = scene.uniforms(1.0).model_view;
        scene.handle(Command::Camera(Motion::PanLeft));
        let after = scene.uniforms(1.0).model_view;
        assert_ne!(before, after);
    }
}
