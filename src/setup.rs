mod device;
mod instance;
mod render_base;
mod swapchain;
mod window;

pub use device::{device_and_queue_for_window_requirements, DeviceAndQueue};
pub use instance::instance_for_window_requirements;
pub use render_base::RenderBase;
pub use swapchain::{
    create_framebuffers, create_render_pass, create_swapchain_and_images, surface_extent,
    DEPTH_FORMAT,
};
pub use window::{window_of, window_surface};
