use nalgebra_glm::{look_at, TMat4, TVec3};

use crate::orbit::Orbiter;

/// An eye orbiting a fixed look-at center. The orbit helper is the up vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    orbit: Orbiter,
}

impl Camera {
    pub fn new(eye: TVec3<f32>, center: TVec3<f32>, up: TVec3<f32>) -> Camera {
        Camera {
            orbit: Orbiter::new(eye, center, up),
        }
    }

    pub fn eye(&self) -> TVec3<f32> {
        self.orbit.position()
    }

    pub fn center(&self) -> TVec3<f32> {
        self.orbit.center()
    }

    pub fn up(&self) -> TVec3<f32> {
        self.orbit.helper()
    }

    pub fn view(&self) -> TMat4<f32> {
        look_at(&self.eye(), &self.center(), &self.up())
    }

    pub fn orbit_mut(&mut self) -> &mut Orbiter {
        &mut self.orbit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::{distance, vec3, vec4};

    #[test]
    fn test_view_moves_center_in_front_of_eye() {
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        let center = camera.view() * vec4(0.0, 0.0, 0.0, 1.0);

        assert!(center.x.abs() < 1.0e-5);
        assert!(center.y.abs() < 1.0e-5);
        assert!((center.z + 5.0).abs() < 1.0e-5);
    }

    #[test]
    fn test_eye_stays_on_sphere() {
        let mut camera = Camera::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        for _ in 0..500 {
            camera.orbit_mut().tilt(0.05);
            camera.orbit_mut().pan(-0.05);
        }
        assert!((distance(&camera.eye(), &camera.center()) - 5.0).abs() < 5.0e-3);
    }
}
