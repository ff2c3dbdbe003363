use std::sync::Arc;

use vulkano::{
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder, CommandBufferUsage,
        PrimaryAutoCommandBuffer,
    },
    descriptor_set::allocator::StandardDescriptorSetAllocator,
    device::{Device, Queue},
    instance::Instance,
    memory::allocator::StandardMemoryAllocator,
    pipeline::graphics::viewport::Viewport,
    render_pass::{Framebuffer, RenderPass, Subpass},
    swapchain::{AcquireError, Surface, Swapchain, SwapchainAcquireFuture, SwapchainPresentInfo},
    sync::{self, FlushError, GpuFuture},
};
use winit::event_loop::EventLoop;

use crate::error::{FrameError, InitError};

/// Everything needed to put frames on the window: device, swapchain, the
/// colour + depth render pass and its framebuffers, and the allocators.
pub struct RenderBase {
    #[allow(unused)]
    instance: Arc<Instance>,
    surface: Arc<Surface>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    swapchain: Arc<Swapchain>,
    render_pass: Arc<RenderPass>,
    framebuffers: Vec<Arc<Framebuffer>>,
    memory_allocator: Arc<StandardMemoryAllocator>,
    descriptor_set_allocator: StandardDescriptorSetAllocator,
    command_buffer_allocator: StandardCommandBufferAllocator,
    frame_end_future: Option<Box<dyn GpuFuture>>,
}

impl RenderBase {
    pub fn new(
        event_loop: &EventLoop<()>,
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<Self, InitError> {
        let instance = super::instance::instance_for_window_requirements()?;
        let surface =
            super::window::window_surface(event_loop, instance.clone(), width, height, title)?;
        let super::device::DeviceAndQueue {
            logical: device,
            queue,
        } = super::device::device_and_queue_for_window_requirements(
            instance.clone(),
            surface.clone(),
        )?;
        let (swapchain, images) =
            super::swapchain::create_swapchain_and_images(device.clone(), surface.clone(), None)?;

        let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));
        let descriptor_set_allocator = StandardDescriptorSetAllocator::new(device.clone());
        let command_buffer_allocator =
            StandardCommandBufferAllocator::new(device.clone(), Default::default());

        let render_pass =
            super::swapchain::create_render_pass(device.clone(), swapchain.image_format())?;
        let framebuffers =
            super::swapchain::create_framebuffers(&images, render_pass.clone(), &memory_allocator)?;

        let frame_end_future = Some(Box::new(sync::now(device.clone())) as Box<dyn GpuFuture>);

        Ok(Self {
            instance,
            surface,
            device,
            queue,
            swapchain,
            render_pass,
            framebuffers,
            memory_allocator,
            descriptor_set_allocator,
            command_buffer_allocator,
            frame_end_future,
        })
    }

    pub fn surface_extent(&self) -> [u32; 2] {
        super::swapchain::surface_extent(&self.surface)
    }

    pub fn full_viewport(&self) -> Viewport {
        let [width, height] = self.surface_extent();
        Viewport {
            origin: [0.0, 0.0],
            dimensions: [width as f32, height as f32],
            depth_range: 0.0..1.0,
        }
    }

    pub fn device(&self) -> Arc<Device> {
        self.device.clone()
    }

    pub fn memory_allocator(&self) -> Arc<StandardMemoryAllocator> {
        self.memory_allocator.clone()
    }

    pub fn descriptor_set_allocator(&self) -> &StandardDescriptorSetAllocator {
        &self.descriptor_set_allocator
    }

    /// The single subpass every pipeline renders into.
    pub fn subpass(&self) -> Result<Subpass, InitError> {
        Subpass::from(self.render_pass.clone(), 0)
            .ok_or_else(|| InitError::RenderTarget("render pass has no subpass 0".to_string()))
    }

    pub fn framebuffer(&self, image_index: u32) -> Option<Arc<Framebuffer>> {
        self.framebuffers.get(image_index as usize).cloned()
    }

    pub fn recreate_swapchain(&mut self) -> Result<(), InitError> {
        let [width, height] = self.surface_extent();
        if width == 0 || height == 0 {
            // minimised, nothing to present to
            return Ok(());
        }

        let (new_swapchain, new_images) = super::swapchain::create_swapchain_and_images(
            self.device(),
            self.surface.clone(),
            Some(self.swapchain.clone()),
        )?;
        self.framebuffers = super::swapchain::create_framebuffers(
            &new_images,
            self.render_pass.clone(),
            &self.memory_allocator,
        )?;
        self.swapchain = new_swapchain;
        log::debug!("swapchain recreated at {}x{}", width, height);
        Ok(())
    }

    /// Next image to render into, or `None` if the swapchain had to be
    /// recreated and this frame should be skipped.
    pub fn acquire_next_image(
        &mut self,
    ) -> Result<Option<(u32, SwapchainAcquireFuture)>, FrameError> {
        match vulkano::swapchain::acquire_next_image(self.swapchain.clone(), None) {
            Ok((image_index, suboptimal, acquire_future)) => {
                if suboptimal {
                    self.recreate_or_warn();
                    Ok(None)
                } else {
                    Ok(Some((image_index, acquire_future)))
                }
            }
            Err(AcquireError::OutOfDate) => {
                self.recreate_or_warn();
                Ok(None)
            }
            Err(e) => Err(FrameError::Acquire(format!("{:?}", e))),
        }
    }

    pub fn alloc_cmd_buf_builder(
        &self,
    ) -> Result<AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>, FrameError> {
        AutoCommandBufferBuilder::primary(
            &self.command_buffer_allocator,
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )
        .map_err(|e| FrameError::Record(format!("{:?}", e)))
    }

    pub fn frame_cleanup_finished(&mut self) {
        if let Some(future) = self.frame_end_future.as_mut() {
            future.cleanup_finished();
        }
    }

    /// Submits the frame and queues it for presentation.
    pub fn execute_cmd_buffer(
        &mut self,
        acquire_future: SwapchainAcquireFuture,
        image_index: u32,
        command_buffer: PrimaryAutoCommandBuffer,
    ) -> Result<(), FrameError> {
        let previous = self
            .frame_end_future
            .take()
            .unwrap_or_else(|| Box::new(sync::now(self.device())) as Box<dyn GpuFuture>);

        let future = previous
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)
            .map_err(|e| {
                self.frame_end_future_set_now();
                FrameError::Record(format!("{:?}", e))
            })?
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_index),
            )
            .then_signal_fence_and_flush();

        match future {
            Ok(future) => {
                self.frame_end_future = Some(Box::new(future) as Box<_>);
            }
            Err(FlushError::OutOfDate) => {
                self.recreate_or_warn();
                self.frame_end_future_set_now();
            }
            Err(e) => {
                log::warn!("Failed to flush future: {:?}", e);
                self.frame_end_future_set_now();
            }
        }
        Ok(())
    }

    /// Waits for in-flight work before the GPU objects are dropped.
    pub fn wait_idle(&mut self) {
        self.frame_end_future = None;
        // SAFETY: nothing else records or submits while the loop is shutting down.
        if let Err(e) = unsafe { self.device.wait_idle() } {
            log::warn!("device wait_idle failed: {:?}", e);
        }
    }

    fn frame_end_future_set_now(&mut self) {
        self.frame_end_future = Some(Box::new(sync::now(self.device())) as Box<dyn GpuFuture>);
    }

    fn recreate_or_warn(&mut self) {
        if let Err(e) = self.recreate_swapchain() {
            log::warn!("{}", e);
        }
    }
}
