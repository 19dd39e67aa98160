/*!
# Amber Scoop - Vulkan capture engine

Captures the state behind a Vulkan draw call and writes it out as an Amber
script plus binary buffer dumps.

An interception layer registers the objects the application creates with a
`DeviceData`, records bind and draw commands per command buffer and calls
`DeviceData::queue_submit` when the command buffers are submitted. Each
submitted recording is replayed into a `DrawCallTracker`, which writes
`<prefix>_<ordinal>.amber` for every draw inside the capture window.

Device memory is read back through the `BufferCopy` collaborator and shaders
are disassembled through `ShaderDisassembler`. `GpuBufferCopy` (ash +
gpu-allocator) and `SpirvDisassembler` (`spirv-dis`) are the stock
implementations.
*/

// Registered objects
mod buffer_data;
mod shader_module_data;
mod descriptor_set_data;
mod graphics_pipeline_data;
mod device_data;

// Collaborators
mod vulkan_context;
mod buffer_copy;
mod disassembly;

// Capture engine
mod draw_call_state;
mod descriptor_binder;
mod command_recorder;
mod draw_call_tracker;
mod amber_script;
mod buffer_dumps;
mod index_buffer_declarations;
mod vertex_buffer_declarations;
mod descriptor_set_declarations;
mod vulkan_formats;

#[cfg(test)]
mod mock_collaborators;

pub use buffer_data::BufferData;
pub use shader_module_data::ShaderModuleData;
pub use descriptor_set_data::{
    BufferBindingElements, DescriptorSetData, DescriptorSetLayoutData, LayoutBinding,
};
pub use graphics_pipeline_data::{
    GraphicsPipelineData, GraphicsPipelineDesc, PipelineShaderStage, ShaderStageDesc,
};
pub use device_data::DeviceData;

pub use vulkan_context::GpuContext;
pub use buffer_copy::{BufferCopy, GpuBufferCopy};
pub use disassembly::{
    spirv_version, ShaderDisassembler, SpirvDisassembler, SPIRV_MAGIC, SPIRV_MAX_MINOR_VERSION,
};

pub use draw_call_state::{
    DescriptorSetBinding, DrawCallState, IndexBufferBinding, VertexBufferBinding,
};
pub use descriptor_binder::{bind_descriptor_set, finish_dynamic_offsets};
pub use command_recorder::{CommandRecorder, RecordedCommand};
pub use draw_call_tracker::DrawCallTracker;
pub use amber_script::{DrawParams, ScriptFragments};
pub use index_buffer_declarations::read_indices;
pub use descriptor_set_declarations::descriptor_range;
pub use vulkan_formats::{amber_format_name, try_amber_format_name};
