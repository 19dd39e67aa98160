/// DrawCallState - Bindings accumulated by one command buffer recording
///
/// Owned by a single `DrawCallTracker`, so it needs no locking.

use ash::vk;
use std::collections::BTreeMap;

/// Vertex buffer bound to a binding slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferBinding {
    pub buffer: vk::Buffer,
    pub offset: vk::DeviceSize,
}

/// Bound index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferBinding {
    pub buffer: vk::Buffer,
    pub offset: vk::DeviceSize,
    pub index_type: vk::IndexType,
}

/// Descriptor set bound to a set slot with its resolved dynamic offsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSetBinding {
    pub descriptor_set: vk::DescriptorSet,

    /// Binding number → one offset per array element (dynamic bindings only)
    pub dynamic_offsets: BTreeMap<u32, Vec<u32>>,
}

impl DescriptorSetBinding {
    pub fn new(descriptor_set: vk::DescriptorSet) -> Self {
        Self {
            descriptor_set,
            dynamic_offsets: BTreeMap::new(),
        }
    }
}

/// Current graphics bindings of a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCallState {
    pub graphics_pipeline: Option<vk::Pipeline>,
    pub render_pass: Option<vk::RenderPass>,
    pub vertex_buffers: BTreeMap<u32, VertexBufferBinding>,
    pub index_buffer: Option<IndexBufferBinding>,
    pub descriptor_sets: BTreeMap<u32, DescriptorSetBinding>,

    /// Queue the recording is submitted on
    pub queue: vk::Queue,
}

impl DrawCallState {
    pub fn new(queue: vk::Queue) -> Self {
        Self {
            graphics_pipeline: None,
            render_pass: None,
            vertex_buffers: BTreeMap::new(),
            index_buffer: None,
            descriptor_sets: BTreeMap::new(),
            queue,
        }
    }

    /// Forget every binding, keeping the queue
    pub fn reset(&mut self) {
        *self = Self::new(self.queue);
    }
}
