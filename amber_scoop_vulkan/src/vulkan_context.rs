/// GpuContext - Device objects the capture layer needs for readback
///
/// Contains everything needed to copy application buffers to the host:
/// - Device for Vulkan API calls
/// - Allocator for staging memory
/// - Command pool for one-shot copy command buffers

use amber_scoop::scoop::Result;
use amber_scoop::scoop_err;
use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::sync::{Arc, Mutex};

/// Shared GPU context for buffer readback.
///
/// The device itself belongs to the application; only the command pool
/// created here is destroyed on drop. The allocator must be dropped before
/// the application destroys the device.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator (shared, requires mutex for thread safety)
    pub allocator: Arc<Mutex<Allocator>>,

    /// Queue family the command pool allocates for
    pub queue_family_index: u32,

    /// Reusable command pool for one-shot copy operations
    /// (created with TRANSIENT + RESET_COMMAND_BUFFER flags)
    pub command_pool: Mutex<vk::CommandPool>,
}

impl GpuContext {
    /// Create a new GPU context
    ///
    /// # Arguments
    ///
    /// * `device` - Vulkan logical device
    /// * `allocator` - GPU memory allocator
    /// * `queue_family_index` - Family of the queues draw calls are submitted on
    pub fn new(device: ash::Device, allocator: Arc<Mutex<Allocator>>, queue_family_index: u32) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(queue_family_index)
            .flags(vk::CommandPoolCreateFlags::TRANSIENT | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        let command_pool = unsafe { device.create_command_pool(&create_info, None) }
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to create copy command pool: {:?}", e))?;

        Ok(Self {
            device,
            allocator,
            queue_family_index,
            command_pool: Mutex::new(command_pool),
        })
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        if let Ok(command_pool) = self.command_pool.lock() {
            unsafe {
                self.device.destroy_command_pool(*command_pool, None);
            }
        }
    }
}
