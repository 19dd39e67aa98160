/// BufferData - Creation parameters of an application buffer
///
/// The size is the number of bytes copied when the buffer is dumped.

use ash::vk;

/// Registered `VkBuffer` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferData {
    /// Buffer size in bytes
    pub size: vk::DeviceSize,

    /// Usage flags declared at creation
    pub usage: vk::BufferUsageFlags,
}

impl BufferData {
    pub fn new(size: vk::DeviceSize, usage: vk::BufferUsageFlags) -> Self {
        Self { size, usage }
    }

    /// Record from a `VkBufferCreateInfo`
    pub fn from_create_info(create_info: &vk::BufferCreateInfo<'_>) -> Self {
        Self::new(create_info.size, create_info.usage)
    }
}
