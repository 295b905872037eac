use std::error::Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("the surface is not backed by a winit window")]
    Window,

    #[error("no Vulkan device supports graphics on this surface")]
    NoDevice,

    #[error("the selected device exposed no queue")]
    NoQueue,

    #[error("the swapchain has no images")]
    NoSwapchainImages,

    #[error("the render pass has no subpass to draw in")]
    MissingSubpass,

    #[error("the pipeline has no descriptor set layout for its uniforms")]
    MissingDescriptorSetLayout,

    #[error("shader program did not load ({name}): {source}")]
    Shader {
        name: &'static str,
        #[source]
        source: Box<dyn Error>,
    },

    #[error("shader {0} has no `main` entry point")]
    MissingEntryPoint(&'static str),

    #[error("vulkan failure while {stage}: {source}")]
    Vulkan {
        stage: &'static str,
        #[source]
        source: Box<dyn Error>,
    },
}

///
/// Wrap any vulkano error with the stage it happened in, for use with `map_err`.
///
pub fn vulkan<E: Error + 'static>(stage: &'static str) -> impl FnOnce(E) -> DemoError {
    move |source| DemoError::Vulkan {
        stage,
        source: Box::new(source),
    }
}
