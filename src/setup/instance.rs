use std::sync::Arc;

use vulkano::instance::{Instance, InstanceCreateInfo};
use vulkano::{Version, VulkanLibrary};

use crate::error::InitError;

/// Instance with the surface extensions winit needs on this platform.
pub fn instance_for_window_requirements() -> Result<Arc<Instance>, InitError> {
    let library = VulkanLibrary::new().map_err(|e| InitError::Instance(format!("{:?}", e)))?;
    let extensions = vulkano_win::required_extensions(&library);

    let instance = Instance::new(
        library,
        InstanceCreateInfo {
            enabled_extensions: extensions,
            enumerate_portability: true, // required for MoltenVK on macOS
            max_api_version: Some(Version::V1_1),
            ..Default::default()
        },
    )
    .map_err(|e| InitError::Instance(format!("{:?}", e)))?;

    log::debug!("vulkan instance api version {}", instance.api_version());
    Ok(instance)
}
