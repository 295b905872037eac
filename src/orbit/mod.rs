use nalgebra_glm::{cross, distance, length, mat4_to_mat3, normalize, rotation, TVec3};

#[cfg(test)]
mod tests;

/// Below this length a frame axis is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1.0e-6;

///
/// A point that orbits a fixed center on a sphere of constant radius.
///
/// Only the position and a helper vector are stored. Every step re-derives the
/// local frame (`direction`, `side`, `up`) from those two, so there is no
/// accumulated orientation to drift or gimbal-lock.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Orbiter {
    position: TVec3<f32>,
    center: TVec3<f32>,
    helper: TVec3<f32>,
}

/// The orthonormal frame of an orbiter, derived on demand.
#[derive(Debug, Clone, Copy)]
pub struct OrbitFrame {
    pub direction: TVec3<f32>,
    pub side: TVec3<f32>,
    pub up: TVec3<f32>,
}

impl Orbiter {
    pub fn new(position: TVec3<f32>, center: TVec3<f32>, helper: TVec3<f32>) -> Orbiter {
        Orbiter {
            position,
            center,
            helper,
        }
    }

    pub fn position(&self) -> TVec3<f32> {
        self.position
    }

    pub fn center(&self) -> TVec3<f32> {
        self.center
    }

    pub fn helper(&self) -> TVec3<f32> {
        self.helper
    }

    pub fn radius(&self) -> f32 {
        distance(&self.position, &self.center)
    }

    /// Unit vector from the position towards the center.
    pub fn direction(&self) -> Option<TVec3<f32>> {
        let towards = self.center - self.position;
        if length(&towards) < DEGENERATE_EPSILON {
            return None;
        }
        Some(normalize(&towards))
    }

    ///
    /// Derive the local frame. Returns `None` when the position sits on the
    /// center or the helper is parallel to the viewing direction.
    ///
    pub fn frame(&self) -> Option<OrbitFrame> {
        let direction = self.direction()?;
        if length(&self.helper) < DEGENERATE_EPSILON {
            return None;
        }
        let helper = normalize(&self.helper);

        let side = cross(&direction, &helper);
        if length(&side) < DEGENERATE_EPSILON {
            return None;
        }
        let side = normalize(&side);
        let up = cross(&side, &direction);

        Some(OrbitFrame {
            direction,
            side,
            up,
        })
    }

    /// Rotate about `side`. The helper becomes the rotated `up`.
    pub fn tilt(&mut self, radians: f32) {
        let Some(frame) = self.frame() else {
            return;
        };
        let m = mat4_to_mat3(&rotation(radians, &frame.side));
        self.helper = m * frame.up;
        self.position = self.center + m * (self.position - self.center);
    }

    /// Rotate about `up`. The helper is left untouched.
    pub fn pan(&mut self, radians: f32) {
        let Some(frame) = self.frame() else {
            return;
        };
        let m = mat4_to_mat3(&rotation(radians, &frame.up));
        self.position = self.center + m * (self.position - self.center);
    }

    /// Spin the helper about the viewing direction; the position stays put.
    pub fn roll(&mut self, radians: f32) {
        let Some(direction) = self.direction() else {
            return;
        };
        let m = mat4_to_mat3(&rotation(-radians, &direction));
        self.helper = m * self.helper;
    }
}
