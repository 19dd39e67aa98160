/// Buffer readback - Copies application buffers into host memory
///
/// `GpuBufferCopy` records a one-shot command buffer that copies the source
/// buffer into a host-visible staging buffer, submits it on the queue the
/// draw call was recorded for and waits on a fence before reading the bytes.

use amber_scoop::scoop::{Error, Result};
use amber_scoop::{scoop_debug, scoop_err, scoop_error};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Device memory → host bytes
pub trait BufferCopy: Send + Sync {
    /// Copy the first `size` bytes of `buffer`
    ///
    /// The copy is complete when this returns.
    fn copy_buffer(&self, queue: vk::Queue, buffer: vk::Buffer, size: vk::DeviceSize) -> Result<Vec<u8>>;
}

/// Host-visible buffer receiving the copy
struct StagingBuffer {
    ctx: Arc<GpuContext>,
    buffer: vk::Buffer,
    allocation: Option<Allocation>,
}

impl StagingBuffer {
    fn new(ctx: Arc<GpuContext>, size: vk::DeviceSize) -> Result<Self> {
        unsafe {
            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(size)
                .usage(vk::BufferUsageFlags::TRANSFER_DST)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = ctx.device.create_buffer(&buffer_create_info, None)
                .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to create staging buffer of {} bytes: {:?}", size, e))?;

            // From here on Drop destroys the buffer
            let mut staging = Self {
                ctx,
                buffer,
                allocation: None,
            };

            let requirements = staging.ctx.device.get_buffer_memory_requirements(buffer);

            let allocation = staging.ctx.allocator
                .lock()
                .map_err(|_| Error::BackendError("Allocator lock poisoned".to_string()))?
                .allocate(&AllocationCreateDesc {
                    name: "amber_scoop_staging_buffer",
                    requirements,
                    location: MemoryLocation::GpuToCpu,
                    linear: true,
                    allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                })
                .map_err(|e| {
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    scoop_err!("amber_scoop::vulkan", BackendError, "Out of GPU memory for staging buffer ({:.2} MB): {}", size_mb, e)
                })?;

            staging.ctx.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
                .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to bind staging buffer memory: {:?}", e))?;
            staging.allocation = Some(allocation);

            Ok(staging)
        }
    }

    fn read(&self, size: vk::DeviceSize) -> Result<Vec<u8>> {
        let mapped = self.allocation
            .as_ref()
            .and_then(|allocation| allocation.mapped_slice())
            .ok_or_else(|| scoop_err!("amber_scoop::vulkan", BackendError, "Staging buffer is not mapped"))?;

        mapped
            .get(..size as usize)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| scoop_err!("amber_scoop::vulkan", BackendError, "Staging buffer is smaller than {} bytes", size))
    }
}

impl Drop for StagingBuffer {
    fn drop(&mut self) {
        unsafe {
            if let Some(allocation) = self.allocation.take() {
                // Still destroy the buffer if the lock fails
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    if let Err(e) = allocator.free(allocation) {
                        scoop_error!("amber_scoop::vulkan", "Failed to free staging allocation: {}", e);
                    }
                }
            }
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}

/// Staging-buffer readback on the GPU
pub struct GpuBufferCopy {
    ctx: Arc<GpuContext>,
}

impl GpuBufferCopy {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }

    /// Record, submit and wait for the copy into `staging`
    unsafe fn submit_copy(
        &self,
        command_pool: vk::CommandPool,
        queue: vk::Queue,
        buffer: vk::Buffer,
        staging: &StagingBuffer,
        size: vk::DeviceSize,
    ) -> Result<()> {
        let device = &self.ctx.device;

        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);

        let command_buffers = device.allocate_command_buffers(&allocate_info)
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to allocate copy command buffer: {:?}", e))?;

        let fence = match device.create_fence(&vk::FenceCreateInfo::default(), None) {
            Ok(fence) => fence,
            Err(e) => {
                device.free_command_buffers(command_pool, &command_buffers);
                return Err(scoop_err!("amber_scoop::vulkan", BackendError, "Failed to create copy fence: {:?}", e));
            }
        };

        let result = self.record_and_wait(command_buffers[0], fence, queue, buffer, staging, size);

        device.destroy_fence(fence, None);
        device.free_command_buffers(command_pool, &command_buffers);
        result
    }

    unsafe fn record_and_wait(
        &self,
        command_buffer: vk::CommandBuffer,
        fence: vk::Fence,
        queue: vk::Queue,
        buffer: vk::Buffer,
        staging: &StagingBuffer,
        size: vk::DeviceSize,
    ) -> Result<()> {
        let device = &self.ctx.device;

        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        device.begin_command_buffer(command_buffer, &begin_info)
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to begin copy command buffer: {:?}", e))?;

        // Make earlier writes to the source visible to the transfer
        let source_barrier = vk::BufferMemoryBarrier::default()
            .src_access_mask(vk::AccessFlags::MEMORY_WRITE)
            .dst_access_mask(vk::AccessFlags::TRANSFER_READ)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .buffer(buffer)
            .offset(0)
            .size(size);

        device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::ALL_COMMANDS,
            vk::PipelineStageFlags::TRANSFER,
            vk::DependencyFlags::empty(),
            &[],
            &[source_barrier],
            &[],
        );

        let region = vk::BufferCopy::default()
            .src_offset(0)
            .dst_offset(0)
            .size(size);

        device.cmd_copy_buffer(command_buffer, buffer, staging.buffer, &[region]);

        let host_barrier = vk::BufferMemoryBarrier::default()
            .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
            .dst_access_mask(vk::AccessFlags::HOST_READ)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .buffer(staging.buffer)
            .offset(0)
            .size(size);

        device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::TRANSFER,
            vk::PipelineStageFlags::HOST,
            vk::DependencyFlags::empty(),
            &[],
            &[host_barrier],
            &[],
        );

        device.end_command_buffer(command_buffer)
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to end copy command buffer: {:?}", e))?;

        let command_buffers_submit = [command_buffer];
        let submit_info = vk::SubmitInfo::default()
            .command_buffers(&command_buffers_submit);

        device.queue_submit(queue, &[submit_info], fence)
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to submit buffer copy: {:?}", e))?;

        device.wait_for_fences(&[fence], true, u64::MAX)
            .map_err(|e| scoop_err!("amber_scoop::vulkan", BackendError, "Failed to wait for buffer copy: {:?}", e))?;

        Ok(())
    }
}

impl BufferCopy for GpuBufferCopy {
    fn copy_buffer(&self, queue: vk::Queue, buffer: vk::Buffer, size: vk::DeviceSize) -> Result<Vec<u8>> {
        // vkCmdCopyBuffer rejects empty regions
        if size == 0 {
            return Ok(Vec::new());
        }

        scoop_debug!("amber_scoop::vulkan", "Copying {} bytes from {:?}", size, buffer);

        let staging = StagingBuffer::new(Arc::clone(&self.ctx), size)?;

        // Command pools are externally synchronized
        let command_pool = self.ctx.command_pool
            .lock()
            .map_err(|_| Error::BackendError("Command pool lock poisoned".to_string()))?;

        unsafe {
            self.submit_copy(*command_pool, queue, buffer, &staging, size)?;
        }

        staging.read(size)
    }
}
