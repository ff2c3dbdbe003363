use std::sync::Arc;

use vulkano::{instance::Instance, swapchain::Surface};
use vulkano_win::VkSurfaceBuild;
use winit::{dpi::LogicalSize, event_loop::EventLoop, window::Window, window::WindowBuilder};

use crate::error::InitError;

pub fn window_surface(
    event_loop: &EventLoop<()>,
    instance: Arc<Instance>,
    width: u32,
    height: u32,
    title: &str,
) -> Result<Arc<Surface>, InitError> {
    WindowBuilder::new()
        .with_inner_size(LogicalSize::new(width, height))
        .with_title(title)
        .build_vk_surface(event_loop, instance)
        .map_err(|e| InitError::Window(format!("{:?}", e)))
}

/// The winit window a surface was built from.
pub fn window_of(surface: &Surface) -> Option<&Window> {
    surface.object()?.downcast_ref::<Window>()
}
