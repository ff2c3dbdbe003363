use std::sync::Arc;

use vulkano::{
    device::Device,
    format::Format,
    image::{view::ImageView, AttachmentImage, ImageAccess, SwapchainImage},
    memory::allocator::StandardMemoryAllocator,
    render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass},
    swapchain::{PresentMode, Surface, Swapchain, SwapchainCreateInfo},
};

use crate::error::InitError;

pub const DEPTH_FORMAT: Format = Format::D16_UNORM;

pub fn surface_extent(surface: &Surface) -> [u32; 2] {
    super::window::window_of(surface)
        .map(|window| window.inner_size().into())
        .unwrap_or([0, 0])
}

/// Creates a FIFO (vsync) swapchain, or recreates `old_swapchain` at the
/// surface's current size.
pub fn create_swapchain_and_images(
    device: Arc<Device>,
    surface: Arc<Surface>,
    old_swapchain: Option<Arc<Swapchain>>,
) -> Result<(Arc<Swapchain>, Vec<Arc<SwapchainImage>>), InitError> {
    let image_extent = surface_extent(&surface);

    if let Some(old_swapchain) = old_swapchain {
        return old_swapchain
            .recreate(SwapchainCreateInfo {
                image_extent,
                ..old_swapchain.create_info()
            })
            .map_err(|e| InitError::RenderTarget(format!("{:?}", e)));
    }

    let caps = device
        .physical_device()
        .surface_capabilities(&surface, Default::default())
        .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?;

    let composite_alpha = caps
        .supported_composite_alpha
        .iter()
        .next()
        .ok_or_else(|| InitError::RenderTarget("no composite alpha mode".to_string()))?;

    let image_format = device
        .physical_device()
        .surface_formats(&surface, Default::default())
        .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?
        .first()
        .map(|(format, _)| *format)
        .ok_or_else(|| InitError::RenderTarget("surface reports no formats".to_string()))?;
    log::debug!("swapchain format {:?}", image_format);

    Swapchain::new(
        device,
        surface,
        SwapchainCreateInfo {
            min_image_count: caps.min_image_count,
            image_format: Some(image_format),
            image_extent,
            image_usage: caps.supported_usage_flags,
            composite_alpha,
            present_mode: PresentMode::Fifo,
            ..Default::default()
        },
    )
    .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))
}

/// One colour + depth render pass.
pub fn create_render_pass(
    device: Arc<Device>,
    color_format: Format,
) -> Result<Arc<RenderPass>, InitError> {
    vulkano::single_pass_renderpass!(
        device,
        attachments: {
            color: {
                load: Clear,
                store: Store,
                format: color_format,
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
    .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))
}

/// Framebuffers over the swapchain images sharing one depth buffer.
pub fn create_framebuffers(
    images: &[Arc<SwapchainImage>],
    render_pass: Arc<RenderPass>,
    allocator: &StandardMemoryAllocator,
) -> Result<Vec<Arc<Framebuffer>>, InitError> {
    let Some(first) = images.first() else {
        return Ok(vec![]);
    };
    let dimensions = first.dimensions().width_height();

    let depth_buffer = ImageView::new_default(
        AttachmentImage::transient(allocator, dimensions, DEPTH_FORMAT)
            .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?,
    )
    .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?;

    let mut framebuffers = vec![];
    for image in images {
        let view = ImageView::new_default(image.clone())
            .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?;
        framebuffers.push(
            Framebuffer::new(
                render_pass.clone(),
                FramebufferCreateInfo {
                    attachments: vec![view, depth_buffer.clone()],
                    ..Default::default()
                },
            )
            .map_err(|e| InitError::RenderTarget(format!("{:?}", e)))?,
        );
    }
    Ok(framebuffers)
}
