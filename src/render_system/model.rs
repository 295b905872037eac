use super::teapot::teapot;
use super::vertex::Vert;

use nalgebra_glm::{identity, TMat4};

use crate::config::{TEAPOT_SIZE, TEAPOT_TESSELLATION};

pub struct Model {
    data: Vec<Vert>,
    model: TMat4<f32>,
}

pub struct ModelBuilder {
    size: f32,
    tessellation: usize,
}

impl ModelBuilder {
    fn new() -> ModelBuilder {
        ModelBuilder {
            size: TEAPOT_SIZE,
            tessellation: TEAPOT_TESSELLATION,
        }
    }

    pub fn build(self) -> Model {
        Model {
            data: teapot(self.size, self.tessellation),
            // The mesh is generated at its final size, already in world space.
            model: identity(),
        }
    }

    pub fn size(mut self, size: f32) -> ModelBuilder {
        self.size = size;
        self
    }

    pub fn tessellation(mut self, tessellation: usize) -> ModelBuilder {
        self.tessellation = tessellation;
        self
    }
}

impl Model {
    pub fn teapot() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn data(&self) -> &[Vert] {
        &self.data
    }

    pub fn model_matrix(&self) -> TMat4<f32> {
        self.model
    }
}
