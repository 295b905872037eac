pub const BLINN_PHONG_VERT: &str = "blinn_phong.vert.glsl";
pub const BLINN_PHONG_FRAG: &str = "blinn_phong.frag.glsl";

pub mod blinn_phong_vert {
    vulkano_shaders::shader! {
        ty: "vertex",
        path: "src/shaders/blinn_phong.vert.glsl"
    }
}

pub mod blinn_phong_frag {
    vulkano_shaders::shader! {
        ty: "fragment",
        path: "src/shaders/blinn_phong.frag.glsl"
    }
}
