use nalgebra_glm::{inverse_transpose, perspective_rh_zo, TMat4, TVec4};

use crate::camera::Camera;

use super::lighting::spinning::SpinningLight;

/// Perspective parameters; the aspect ratio comes from the window every frame.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub field_of_view: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl Projection {
    ///
    /// Vulkan clip space: depth runs 0..1 and y points down, so the GL-style
    /// matrix gets its y axis flipped.
    ///
    pub fn matrix(&self, aspect_ratio: f32) -> TMat4<f32> {
        let mut projection =
            perspective_rh_zo(aspect_ratio, self.field_of_view, self.near_clip, self.far_clip);
        projection[(1, 1)] *= -1.0;
        projection
    }
}

/// Everything the Blinn-Phong program needs for one draw.
#[derive(Debug, Clone)]
pub struct FrameUniforms {
    pub model_view: TMat4<f32>,
    pub projection: TMat4<f32>,
    pub normal: TMat4<f32>,
    /// Light positions in eye space.
    pub light_positions: [TVec4<f32>; 2],
    pub light_colors: [TVec4<f32>; 2],
}

impl FrameUniforms {
    pub fn new(
        camera: &Camera,
        lights: &[SpinningLight; 2],
        model: &TMat4<f32>,
        projection: &Projection,
        aspect_ratio: f32,
    ) -> FrameUniforms {
        let view = camera.view();
        let model_view = view * model;

        FrameUniforms {
            model_view,
            projection: projection.matrix(aspect_ratio),
            normal: inverse_transpose(model_view),
            light_positions: [view * lights[0].position(), view * lights[1].position()],
            light_colors: [lights[0].color(), lights[1].color()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::{identity, length, mat4_to_mat3, vec3, vec4};
    use rand::{rngs::StdRng, SeedableRng};

    fn scene() -> (Camera, [SpinningLight; 2]) {
        let mut rng = StdRng::seed_from_u64(1);
        let center = vec3(0.0, 0.0, 0.0);
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), center, vec3(0.0, 1.0, 0.0));
        let lights = [
            SpinningLight::new(vec3(1.0, 0.0, 0.0), vec3(0.0, 5.0, 10.0), center, &mut rng),
            SpinningLight::new(vec3(0.0, 0.0, 1.0), vec3(0.0, 5.0, -10.0), center, &mut rng),
        ];
        (camera, lights)
    }

    fn projection() -> Projection {
        Projection {
            field_of_view: std::f32::consts::FRAC_PI_2,
            near_clip: 1.0,
            far_clip: 25.0,
        }
    }

    #[test]
    fn test_lights_move_into_eye_space() {
        let (camera, lights) = scene();
        let uniforms = FrameUniforms::new(&camera, &lights, &identity(), &projection(), 1.0);

        let expected = [vec4(0.0, 5.0, 5.0, 1.0), vec4(0.0, 5.0, -15.0, 1.0)];
        for (actual, expected) in uniforms.light_positions.iter().zip(expected) {
            assert!(length(&(actual - expected)) < 1.0e-4, "{actual:?}");
        }
        assert_eq!(uniforms.light_colors[1], vec4(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_normal_matrix_of_rigid_view_keeps_rotation() {
        let (mut camera, lights) = scene();
        camera.orbit_mut().pan(0.4);
        camera.orbit_mut().tilt(0.2);
        let uniforms = FrameUniforms::new(&camera, &lights, &identity(), &projection(), 1.0);

        // Only the upper 3x3 reaches the shader.
        let difference = mat4_to_mat3(&uniforms.normal) - mat4_to_mat3(&uniforms.model_view);
        assert!(difference.iter().all(|v| v.abs() < 1.0e-4));
    }

    #[test]
    fn test_projection_maps_clip_planes_to_vulkan_depth() {
        let matrix = projection().matrix(1.0);

        let near = matrix * vec4(0.0, 0.0, -1.0, 1.0);
        let far = matrix * vec4(0.0, 0.0, -25.0, 1.0);
        assert!((near.z / near.w).abs() < 1.0e-5);
        assert!((far.z / far.w - 1.0).abs() < 1.0e-5);

        // Points above the eye land in the upper half of the image, i.e. negative y.
        let above = matrix * vec4(0.0, 1.0, -2.0, 1.0);
        assert!(above.y / above.w < 0.0);
    }

    #[test]
    fn test_projection_respects_aspect_ratio() {
        let matrix = projection().matrix(2.0);
        let point = matrix * vec4(1.0, 1.0, -1.0, 1.0);
        assert!((point.x / point.w - 0.5).abs() < 1.0e-5);
        assert!((point.y / point.w + 1.0).abs() < 1.0e-5);
    }
}
