use std::sync::Arc;

use vulkano::{
    device::{
        physical::PhysicalDeviceType,
        Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo,
    },
    instance::Instance,
    swapchain::Surface,
};

use crate::error::InitError;

pub struct DeviceAndQueue {
    pub logical: Arc<Device>,
    pub queue: Arc<Queue>,
}

/// Picks the preferred physical device that can present to `surface` and
/// opens one graphics queue on it.
pub fn device_and_queue_for_window_requirements(
    instance: Arc<Instance>,
    surface: Arc<Surface>,
) -> Result<DeviceAndQueue, InitError> {
    let device_extensions = DeviceExtensions {
        khr_swapchain: true,
        ..DeviceExtensions::empty()
    };

    let candidates = instance
        .enumerate_physical_devices()
        .map_err(|e| InitError::Device(format!("{:?}", e)))?
        .collect::<Vec<_>>();

    let with_extensions = candidates
        .into_iter()
        .filter(|p| p.supported_extensions().contains(&device_extensions))
        .collect::<Vec<_>>();
    if with_extensions.is_empty() {
        return Err(InitError::MissingExtension("VK_KHR_swapchain"));
    }

    let (physical, queue_family_index) = with_extensions
        .into_iter()
        .filter_map(|p| {
            p.queue_family_properties()
                .iter()
                .enumerate()
                .position(|(i, q)| {
                    // first family that handles graphics and can present to the winit surface
                    q.queue_flags.graphics && p.surface_support(i as u32, &surface).unwrap_or(false)
                })
                .map(|i| (p, i as u32))
        })
        .min_by_key(|(p, _)| {
            // lower score for preferred device types
            match p.properties().device_type {
                PhysicalDeviceType::DiscreteGpu => 0,
                PhysicalDeviceType::IntegratedGpu => 1,
                PhysicalDeviceType::VirtualGpu => 2,
                PhysicalDeviceType::Cpu => 3,
                PhysicalDeviceType::Other => 4,
                _ => 5,
            }
        })
        .ok_or_else(|| {
            InitError::Device("no device has a graphics queue for this surface".to_string())
        })?;

    log::info!(
        "using device {} ({:?})",
        physical.properties().device_name,
        physical.properties().device_type
    );

    let (logical, mut queues) = Device::new(
        physical,
        DeviceCreateInfo {
            enabled_extensions: device_extensions,
            queue_create_infos: vec![QueueCreateInfo {
                queue_family_index,
                ..Default::default()
            }],
            ..Default::default()
        },
    )
    .map_err(|e| InitError::Device(format!("{:?}", e)))?;

    let queue = queues
        .next()
        .ok_or_else(|| InitError::Device("device returned no queue".to_string()))?;

    Ok(DeviceAndQueue { logical, queue })
}
