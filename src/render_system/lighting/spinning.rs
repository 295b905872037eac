use nalgebra_glm::{cross, length, normalize, vec3, vec4, TVec3, TVec4};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

use crate::orbit::{Orbiter, DEGENERATE_EPSILON};

const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

///
/// A point light orbiting a center. Switching it off blacks out the color and
/// keeps the original around for when it is switched back on.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SpinningLight {
    orbit: Orbiter,
    color: TVec3<f32>,
    saved_color: TVec3<f32>,
    is_on: bool,
}

impl SpinningLight {
    ///
    /// The orbit helper starts perpendicular to the line of sight, in a random
    /// direction around it.
    ///
    pub fn new<R: Rng + ?Sized>(
        color: TVec3<f32>,
        position: TVec3<f32>,
        center: TVec3<f32>,
        rng: &mut R,
    ) -> SpinningLight {
        let towards = center - position;
        let helper = if length(&towards) < DEGENERATE_EPSILON {
            // Collapsed orbit: any helper will do, steps are no-ops anyway.
            vec3(0.0, 1.0, 0.0)
        } else {
            let towards = normalize(&towards);
            loop {
                let tangent = cross(&towards, &random_unit_vector(rng));
                if length(&tangent) > 1.0e-3 {
                    break normalize(&tangent);
                }
            }
        };

        SpinningLight {
            orbit: Orbiter::new(position, center, helper),
            color,
            saved_color: color,
            is_on: true,
        }
    }

    pub fn color(&self) -> TVec4<f32> {
        vec4(self.color.x, self.color.y, self.color.z, 1.0)
    }

    pub fn position(&self) -> TVec4<f32> {
        let position = self.orbit.position();
        vec4(position.x, position.y, position.z, 1.0)
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn orbit(&self) -> &Orbiter {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut Orbiter {
        &mut self.orbit
    }

    pub fn toggle(&mut self) {
        self.is_on = !self.is_on;
        self.color = if self.is_on {
            self.saved_color
        } else {
            BLACK.into()
        };
    }
}

fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> TVec3<f32> {
    let [x, y, z]: [f32; 3] = UnitSphere.sample(rng);
    vec3(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::dot;
    use rand::{rngs::StdRng, SeedableRng};

    fn red_light(rng: &mut StdRng) -> SpinningLight {
        SpinningLight::new(
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 5.0, 10.0),
            vec3(0.0, 0.0, 0.0),
            rng,
        )
    }

    #[test]
    fn test_toggle_twice_restores_color() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut light = red_light(&mut rng);
        let original = light.color();

        light.toggle();
        assert!(!light.is_on());
        assert_eq!(light.color(), vec4(0.0, 0.0, 0.0, 1.0));

        light.toggle();
        assert!(light.is_on());
        assert_eq!(light.color(), original);
    }

    #[test]
    fn test_helper_is_perpendicular_to_line_of_sight() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let light = red_light(&mut rng);
            let direction = light.orbit().direction().unwrap();
            let helper = light.orbit().helper();
            assert!(dot(&direction, &helper).abs() < 1.0e-4);
            assert!(light.orbit().frame().is_some());
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!((length(&random_unit_vector(&mut rng)) - 1.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn test_position_is_homogeneous_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let light = red_light(&mut rng);
        assert_eq!(light.position(), vec4(0.0, 5.0, 10.0, 1.0));
    }

    #[test]
    fn test_tiny_orbit_gets_a_perpendicular_helper() {
        let mut rng = StdRng::seed_from_u64(1);
        let light = SpinningLight::new(
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 0.0, 5.0e-4),
            vec3(0.0, 0.0, 0.0),
            &mut rng,
        );

        let helper = light.orbit().helper();
        assert!((length(&helper) - 1.0).abs() < 1.0e-5);
        assert!(helper.z.abs() < 1.0e-4);
        assert!(light.orbit().frame().is_some());
    }

    #[test]
    fn test_light_at_center_is_a_fixed_point() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut light = SpinningLight::new(
            vec3(0.0, 0.0, 1.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 0.0),
            &mut rng,
        );
        assert_eq!(light.orbit().helper(), vec3(0.0, 1.0, 0.0));

        light.orbit_mut().pan(0.5);
        assert_eq!(light.position(), vec4(0.0, 0.0, 0.0, 1.0));
    }
}
