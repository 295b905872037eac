pub mod lighting;
pub mod model;
pub mod teapot;
pub mod uniforms;
pub mod vertex;

use std::sync::Arc;

use log::{debug, info, warn};
use vulkano_win::VkSurfaceBuild;

use winit::{
    dpi::LogicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use vulkano::{
    buffer::{
        allocator::{SubbufferAllocator, SubbufferAllocatorCreateInfo},
        Buffer, BufferCreateInfo, BufferUsage, Subbuffer,
    },
    command_buffer::{
        allocator::{StandardCommandBufferAllocator, StandardCommandBufferAllocatorCreateInfo},
        AutoCommandBufferBuilder, CommandBufferUsage, PrimaryAutoCommandBuffer,
        RenderPassBeginInfo, SubpassContents,
    },
    descriptor_set::{
        allocator::StandardDescriptorSetAllocator, DescriptorSetsCollection,
        PersistentDescriptorSet, WriteDescriptorSet,
    },
    device::{
        physical::{PhysicalDevice, PhysicalDeviceType},
        Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo, QueueFlags,
    },
    format::{ClearValue, Format},
    image::{view::ImageView, AttachmentImage, ImageAccess, ImageUsage, SwapchainImage},
    instance::{Instance, InstanceCreateInfo},
    memory::allocator::{AllocationCreateInfo, MemoryUsage, StandardMemoryAllocator},
    pipeline::{
        graphics::{
            depth_stencil::DepthStencilState,
            input_assembly::InputAssemblyState,
            rasterization::{CullMode, RasterizationState},
            vertex_input::Vertex,
            viewport::{Viewport, ViewportState},
        },
        GraphicsPipeline, Pipeline, PipelineBindPoint,
    },
    render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass},
    swapchain::{
        self, AcquireError, CompositeAlpha, PresentMode, Swapchain, SwapchainAcquireFuture,
        SwapchainCreateInfo, SwapchainCreationError, SwapchainPresentInfo,
    },
    sync::{self, FlushError, GpuFuture},
    VulkanLibrary,
};

use crate::{
    config::DemoConfig,
    error::{vulkan, DemoError},
    render_system::{uniforms::FrameUniforms, vertex::Vert},
    shaders::{blinn_phong_frag, blinn_phong_vert, BLINN_PHONG_FRAG, BLINN_PHONG_VERT},
};

const DEPTH_FORMAT: Format = Format::D16_UNORM;

pub fn get_render_pass(
    device: &Arc<Device>,
    swapchain: &Arc<Swapchain>,
) -> Result<Arc<RenderPass>, DemoError> {
    vulkano::single_pass_renderpass!(
        device.clone(),
        attachments: {
            color: {
                load: Clear,
                store: Store,
                format: swapchain.image_format(),
                samples: 1,
            },
            depth: {
                load: Clear,
                store: DontCare,
                format: DEPTH_FORMAT,
                samples: 1,
            }
        },
        pass: {
            color: [color],
            depth_stencil: {depth}
        }
    )
    .map_err(vulkan("creating the render pass"))
}

pub fn create_depth_buffer(
    memory_allocator: &Arc<StandardMemoryAllocator>,
    dimensions: [u32; 2],
) -> Result<Arc<ImageView<AttachmentImage>>, DemoError> {
    let image = AttachmentImage::transient(memory_allocator, dimensions, DEPTH_FORMAT)
        .map_err(vulkan("allocating the depth buffer"))?;
    ImageView::new_default(image).map_err(vulkan("creating the depth buffer view"))
}

pub fn gen_framebuffers(
    images: &[Arc<SwapchainImage>],
    render_pass: &Arc<RenderPass>,
    depth_buffer: &Arc<ImageView<AttachmentImage>>,
) -> Result<Vec<Arc<Framebuffer>>, DemoError> {
    images
        .iter()
        .map(|image| {
            let view = ImageView::new_default(image.clone())
                .map_err(vulkan("creating a swapchain image view"))?;
            Framebuffer::new(
                render_pass.clone(),
                FramebufferCreateInfo {
                    attachments: vec![view, depth_buffer.clone()],
                    ..Default::default()
                },
            )
            .map_err(vulkan("creating a framebuffer"))
        })
        .collect()
}

///
/// Load the Blinn-Phong shader pair and link it into a pipeline. A shader that
/// fails to load is reported as `DemoError::Shader`, which is fatal.
///
pub fn build_blinn_phong_pipeline(
    device: Arc<Device>,
    render_pass: &Arc<RenderPass>,
    viewport: Viewport,
) -> Result<Arc<GraphicsPipeline>, DemoError> {
    let vert_s = blinn_phong_vert::load(device.clone()).map_err(|e| DemoError::Shader {
        name: BLINN_PHONG_VERT,
        source: Box::new(e),
    })?;
    let frag_s = blinn_phong_frag::load(device.clone()).map_err(|e| DemoError::Shader {
        name: BLINN_PHONG_FRAG,
        source: Box::new(e),
    })?;

    let vert_entry = vert_s
        .entry_point("main")
        .ok_or(DemoError::MissingEntryPoint(BLINN_PHONG_VERT))?;
    let frag_entry = frag_s
        .entry_point("main")
        .ok_or(DemoError::MissingEntryPoint(BLINN_PHONG_FRAG))?;

    let subpass = Subpass::from(render_pass.clone(), 0).ok_or(DemoError::MissingSubpass)?;

    GraphicsPipeline::start()
        .vertex_input_state(Vert::per_vertex())
        .vertex_shader(vert_entry, ())
        .input_assembly_state(InputAssemblyState::new())
        .viewport_state(ViewportState::viewport_fixed_scissor_irrelevant([viewport]))
        .fragment_shader(frag_entry, ())
        .depth_stencil_state(DepthStencilState::simple_depth_test())
        // The teapot patches do not share a winding order; the fragment shader lights both sides.
        .rasterization_state(RasterizationState::new().cull_mode(CullMode::None))
        .render_pass(subpass)
        .build(device)
        .map_err(vulkan("building the Blinn-Phong pipeline"))
}

/// Log what we are rendering with.
fn log_device_info(physical_device: &PhysicalDevice) {
    let properties = physical_device.properties();
    info!("Vulkan device information:");
    info!("\tDevice: {}", properties.device_name);
    info!("\tType: {:?}", properties.device_type);
    info!("\tVulkan version: {}", physical_device.api_version());
    info!("\tDriver version: {}", properties.driver_version);
}

pub struct RenderSystem {
    constants: EngineConstants,
    render_stage: RenderStage,

    window: Arc<Window>,
    viewport: Viewport,
    device: Arc<Device>,
    queue: Arc<Queue>,
    swapchain: Arc<Swapchain>,
    images: Vec<Arc<SwapchainImage>>,
    framebuffers: Vec<Arc<Framebuffer>>,
    render_pass: Arc<RenderPass>,
    depth_buffer: Arc<ImageView<AttachmentImage>>,

    blinn_phong_pipeline: Arc<GraphicsPipeline>,

    memory_allocator: Arc<StandardMemoryAllocator>,
    descriptor_set_allocator: StandardDescriptorSetAllocator,
    command_buffer_allocator: StandardCommandBufferAllocator,
    uniform_buffer_allocator: SubbufferAllocator,

    commands: Option<AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>>,
    current_image_index: u32,
    acquire_future: Option<SwapchainAcquireFuture>,
    previous_frame_end: Option<Box<dyn GpuFuture>>,

    /// Set on resize or an out-of-date swapchain; handled before the next frame.
    swapchain_dirty: bool,
}

pub struct EngineConstants {
    /// Clear values for the colour and depth attachments, in attachment order.
    clear_values: Vec<Option<ClearValue>>,

    /// The extensions we want to make use of within Vulkan.
    default_vulkan_extensions: DeviceExtensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderStage {
    Stopped,
    Geometry,
}

impl RenderSystem {
    ///
    /// A standard Black colour for generic Clear Values.
    ///
    const GLOBAL_CLEAR_COLOUR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    ///
    /// Create the window, pick a device and build everything needed to draw the
    /// single teapot mesh with the Blinn-Phong program.
    ///
    pub fn new(event_loop: &EventLoop<()>, config: &DemoConfig) -> Result<Self, DemoError> {
        let library = VulkanLibrary::new().map_err(vulkan("loading the Vulkan library"))?;
        let required_extensions = vulkano_win::required_extensions(&library);

        let instance = Instance::new(
            library,
            InstanceCreateInfo {
                enabled_extensions: required_extensions,
                ..Default::default()
            },
        )
        .map_err(vulkan("creating the instance"))?;

        let constants = EngineConstants {
            clear_values: vec![Some(Self::GLOBAL_CLEAR_COLOUR.into()), Some(1.0.into())],
            default_vulkan_extensions: DeviceExtensions {
                khr_swapchain: true,
                ..DeviceExtensions::empty()
            },
        };

        let surface = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .build_vk_surface(event_loop, instance.clone())
            .map_err(vulkan("creating the window surface"))?;

        let window = surface
            .object()
            .and_then(|object| object.clone().downcast::<Window>().ok())
            .ok_or(DemoError::Window)?;

        let viewport = Viewport {
            origin: [0.0, 0.0],
            dimensions: window.inner_size().into(),
            depth_range: 0.0..1.0,
        };

        let (physical_device, queue_index) = instance
            .enumerate_physical_devices()
            .map_err(vulkan("enumerating physical devices"))?
            .filter(|device| {
                device
                    .supported_extensions()
                    .contains(&constants.default_vulkan_extensions)
            })
            .filter_map(|device| {
                device
                    .queue_family_properties()
                    .iter()
                    .enumerate()
                    .position(|(index, queue_props)| {
                        queue_props.queue_flags.contains(QueueFlags::GRAPHICS)
                            && device
                                .surface_support(index as u32, &surface)
                                .unwrap_or(false)
                    })
                    .map(|queue_index| (device, queue_index as u32))
            })
            .min_by_key(|(device, _)| match device.properties().device_type {
                PhysicalDeviceType::DiscreteGpu => 0,
                PhysicalDeviceType::IntegratedGpu => 1,
                PhysicalDeviceType::VirtualGpu => 2,
                PhysicalDeviceType::Cpu => 3,
                _ => 4,
            })
            .ok_or(DemoError::NoDevice)?;

        log_device_info(&physical_device);

        let (device, mut queues) = Device::new(
            physical_device.clone(),
            DeviceCreateInfo {
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index: queue_index,
                    ..Default::default()
                }],
                enabled_extensions: constants.default_vulkan_extensions,
                ..Default::default()
            },
        )
        .map_err(vulkan("creating the logical device"))?;

        let queue = queues.next().ok_or(DemoError::NoQueue)?;

        let (swapchain, images) = {
            let image_format = physical_device
                .surface_formats(&surface, Default::default())
                .map_err(vulkan("querying surface formats"))?
                .first()
                .map(|(format, _)| *format);

            let device_capabilities = physical_device
                .surface_capabilities(&surface, Default::default())
                .map_err(vulkan("querying surface capabilities"))?;

            let composite_alpha = device_capabilities
                .supported_composite_alpha
                .into_iter()
                .next()
                .unwrap_or(CompositeAlpha::Opaque);

            Swapchain::new(
                device.clone(),
                surface.clone(),
                SwapchainCreateInfo {
                    min_image_count: device_capabilities.min_image_count + 1,
                    image_format,
                    image_extent: window.inner_size().into(),
                    image_usage: ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha,
                    present_mode: if config.uncapped_fps {
                        PresentMode::Immediate
                    } else {
                        PresentMode::Fifo
                    },
                    ..Default::default()
                },
            )
            .map_err(vulkan("creating the swapchain"))?
        };

        // Allocators
        let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));
        let descriptor_set_allocator = StandardDescriptorSetAllocator::new(device.clone());

        let command_buffer_allocator = StandardCommandBufferAllocator::new(
            device.clone(),
            StandardCommandBufferAllocatorCreateInfo::default(),
        );

        let uniform_buffer_allocator = SubbufferAllocator::new(
            memory_allocator.clone(),
            SubbufferAllocatorCreateInfo {
                buffer_usage: BufferUsage::UNIFORM_BUFFER,
                memory_usage: MemoryUsage::Upload,
                ..Default::default()
            },
        );

        let render_pass = get_render_pass(&device, &swapchain)?;

        let image_dimensions = images
            .first()
            .map(|image| image.dimensions().width_height())
            .ok_or(DemoError::NoSwapchainImages)?;
        let depth_buffer = create_depth_buffer(&memory_allocator, image_dimensions)?;
        let framebuffers = gen_framebuffers(&images, &render_pass, &depth_buffer)?;

        let blinn_phong_pipeline =
            build_blinn_phong_pipeline(device.clone(), &render_pass, viewport.clone())?;
        info!("Shader program built from {BLINN_PHONG_VERT} and {BLINN_PHONG_FRAG}.");

        let previous_frame_end = Some(sync::now(device.clone()).boxed());

        Ok(RenderSystem {
            constants,
            render_stage: RenderStage::Stopped,

            window,
            viewport,
            device,
            queue,
            swapchain,
            images,
            framebuffers,
            render_pass,
            depth_buffer,

            blinn_phong_pipeline,

            memory_allocator,
            descriptor_set_allocator,
            command_buffer_allocator,
            uniform_buffer_allocator,

            commands: None,
            current_image_index: 0,
            acquire_future: None,
            previous_frame_end,

            swapchain_dirty: false,
        })
    }

    /// Width over height of the window, or `None` while it has no area.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return None;
        }
        Some(size.width as f32 / size.height as f32)
    }

    /// Schedule a swapchain rebuild, e.g. after the window was resized.
    pub fn invalidate(&mut self) {
        self.swapchain_dirty = true;
    }

    ///
    /// Copy a mesh into a device-visible vertex buffer. The teapot never changes,
    /// so callers upload it once and keep the buffer.
    ///
    pub fn upload_vertices(&self, data: &[Vert]) -> Result<Subbuffer<[Vert]>, DemoError> {
        Buffer::from_iter(
            &self.memory_allocator,
            BufferCreateInfo {
                usage: BufferUsage::VERTEX_BUFFER,
                ..Default::default()
            },
            AllocationCreateInfo {
                usage: MemoryUsage::Upload,
                ..Default::default()
            },
            data.iter().cloned(),
        )
        .map_err(vulkan("uploading the vertex buffer"))
    }

    ///
    /// Create a new CommandBufferBuilder.
    ///
    fn create_command_builder(
        &self,
    ) -> Result<AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>, DemoError> {
        AutoCommandBufferBuilder::primary(
            &self.command_buffer_allocator,
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )
        .map_err(vulkan("creating a command buffer builder"))
    }

    fn bind_pipeline_to_command_builder<S>(
        &self,
        builder: &mut AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>,
        pipeline: &Arc<GraphicsPipeline>,
        descriptor_sets: S,
    ) where
        S: DescriptorSetsCollection,
    {
        builder
            .bind_pipeline_graphics(pipeline.clone())
            .bind_descriptor_sets(
                PipelineBindPoint::Graphics,
                pipeline.layout().clone(),
                0,
                descriptor_sets,
            );
    }

    fn draw_vertex_buffer_within_command_builder(
        &self,
        builder: &mut AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>,
        vertex_buffer: &Subbuffer<[Vert]>,
    ) -> Result<(), DemoError> {
        builder
            .bind_vertex_buffers(0, vertex_buffer.clone())
            .draw(vertex_buffer.len() as u32, 1, 0, 0)
            .map_err(vulkan("drawing a vertex buffer"))?;
        Ok(())
    }

    ///
    /// Acquire the next swapchain image and begin the render pass. Returns
    /// `Ok(false)` when there is nothing to draw into this frame.
    ///
    pub fn start_frame(&mut self) -> Result<bool, DemoError> {
        if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
            previous_frame_end.cleanup_finished();
        }

        if self.render_stage != RenderStage::Stopped {
            // The acquired image must be presented, or it is never handed back.
            warn!("Frame started while another was recording. Presenting it first.");
            self.finish_frame()?;
        }

        if self.aspect_ratio().is_none() {
            return Ok(false);
        }

        if self.swapchain_dirty {
            self.recreate_swapchain()?;
        }

        let (image_index, suboptimal, acquire_future) =
            match swapchain::acquire_next_image(self.swapchain.clone(), None) {
                Ok(r) => r,
                Err(AcquireError::OutOfDate) => {
                    self.swapchain_dirty = true;
                    return Ok(false);
                }
                Err(e) => return Err(vulkan("acquiring the next swapchain image")(e)),
            };

        if suboptimal {
            debug!("Suboptimal swapchain. Recreate next frame.");
            self.swapchain_dirty = true;
        }

        let framebuffer = self
            .framebuffers
            .get(image_index as usize)
            .ok_or(DemoError::NoSwapchainImages)?
            .clone();

        let mut command_buffer = self.create_command_builder()?;
        command_buffer
            .begin_render_pass(
                RenderPassBeginInfo {
                    clear_values: self.constants.clear_values.clone(),
                    ..RenderPassBeginInfo::framebuffer(framebuffer)
                },
                SubpassContents::Inline,
            )
            .map_err(vulkan("beginning the render pass"))?;

        self.commands = Some(command_buffer);
        self.current_image_index = image_index;
        self.acquire_future = Some(acquire_future);
        self.render_stage = RenderStage::Geometry;
        Ok(true)
    }

    /// Upload this frame's uniforms and record one draw of `mesh`.
    pub fn add_geometry(
        &mut self,
        mesh: &Subbuffer<[Vert]>,
        uniforms: &FrameUniforms,
    ) -> Result<(), DemoError> {
        if self.render_stage != RenderStage::Geometry {
            warn!("Geometry added outside of a frame. Ignoring it.");
            return Ok(());
        }

        let transforms_buffer: Subbuffer<blinn_phong_vert::Transforms> = self
            .uniform_buffer_allocator
            .allocate_sized()
            .map_err(vulkan("allocating the transform uniforms"))?;
        *transforms_buffer
            .write()
            .map_err(vulkan("writing the transform uniforms"))? = blinn_phong_vert::Transforms {
            model_view: uniforms.model_view.into(),
            projection: uniforms.projection.into(),
            normal_matrix: uniforms.normal.into(),
        };

        let lights_buffer: Subbuffer<blinn_phong_frag::Lights> = self
            .uniform_buffer_allocator
            .allocate_sized()
            .map_err(vulkan("allocating the light uniforms"))?;
        *lights_buffer
            .write()
            .map_err(vulkan("writing the light uniforms"))? = blinn_phong_frag::Lights {
            light0_position: uniforms.light_positions[0].into(),
            light0_color: uniforms.light_colors[0].into(),
            light1_position: uniforms.light_positions[1].into(),
            light1_color: uniforms.light_colors[1].into(),
        };

        let layout = self
            .blinn_phong_pipeline
            .layout()
            .set_layouts()
            .first()
            .ok_or(DemoError::MissingDescriptorSetLayout)?;

        let descriptor_set = PersistentDescriptorSet::new(
            &self.descriptor_set_allocator,
            layout.clone(),
            [
                // index param == binding value in shader
                WriteDescriptorSet::buffer(0, transforms_buffer),
                WriteDescriptorSet::buffer(1, lights_buffer),
            ],
        )
        .map_err(vulkan("creating the uniform descriptor set"))?;

        let Some(mut commands) = self.commands.take() else {
            return Ok(());
        };

        self.bind_pipeline_to_command_builder(
            &mut commands,
            &self.blinn_phong_pipeline,
            descriptor_set,
        );
        let drawn = self.draw_vertex_buffer_within_command_builder(&mut commands, mesh);

        self.commands = Some(commands);
        drawn
    }

    /// End the render pass, submit and present.
    pub fn finish_frame(&mut self) -> Result<(), DemoError> {
        if self.render_stage != RenderStage::Geometry {
            self.commands = None;
            return Ok(());
        }
        self.render_stage = RenderStage::Stopped;

        let (Some(mut commands), Some(acquire_future)) =
            (self.commands.take(), self.acquire_future.take())
        else {
            return Ok(());
        };

        commands
            .end_render_pass()
            .map_err(vulkan("ending the render pass"))?;
        let command_buffer = commands
            .build()
            .map_err(vulkan("building the command buffer"))?;

        let previous_frame_end = self
            .previous_frame_end
            .take()
            .unwrap_or_else(|| sync::now(self.device.clone()).boxed());

        let future = previous_frame_end
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)
            .map_err(vulkan("submitting the frame"))?
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(
                    self.swapchain.clone(),
                    self.current_image_index,
                ),
            )
            .then_signal_fence_and_flush();

        match future {
            Ok(future) => {
                self.previous_frame_end = Some(future.boxed());
                Ok(())
            }
            Err(FlushError::OutOfDate) => {
                self.swapchain_dirty = true;
                self.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
                Ok(())
            }
            Err(e) => {
                self.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
                Err(vulkan("flushing the frame")(e))
            }
        }
    }

    pub fn recreate_swapchain(&mut self) -> Result<(), DemoError> {
        let new_dimensions = self.window.inner_size();

        let (new_swapchain, new_images) = match self.swapchain.recreate(SwapchainCreateInfo {
            image_extent: new_dimensions.into(),
            ..self.swapchain.create_info()
        }) {
            Ok(r) => r,
            Err(SwapchainCreationError::ImageExtentNotSupported { .. }) => return Ok(()),
            Err(e) => return Err(vulkan("recreating the swapchain")(e)),
        };

        self.swapchain = new_swapchain;
        self.images = new_images;

        let new_depth_dimensions = self
            .images
            .first()
            .map(|image| image.dimensions().width_height())
            .ok_or(DemoError::NoSwapchainImages)?;
        self.depth_buffer = create_depth_buffer(&self.memory_allocator, new_depth_dimensions)?;
        self.framebuffers = gen_framebuffers(&self.images, &self.render_pass, &self.depth_buffer)?;

        self.viewport.dimensions = new_dimensions.into();
        self.blinn_phong_pipeline = build_blinn_phong_pipeline(
            self.device.clone(),
            &self.render_pass,
            self.viewport.clone(),
        )?;

        self.swapchain_dirty = false;
        debug!(
            "Swapchain recreated at {}x{}.",
            new_dimensions.width, new_dimensions.height
        );
        Ok(())
    }
}
