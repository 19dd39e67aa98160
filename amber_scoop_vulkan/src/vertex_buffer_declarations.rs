/// Vertex buffer serializer
///
/// One `VERTEX_DATA` line per vertex attribute of the bound pipeline. Bound
/// buffers are dumped once per draw as `vert_<N>` in discovery order.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_bail, scoop_err};
use ash::vk;
use std::fmt::Write as _;

use crate::amber_script::{input_rate_keyword, ScriptFragments};
use crate::buffer_dumps::BufferDumps;
use crate::device_data::DeviceData;
use crate::draw_call_state::DrawCallState;
use crate::graphics_pipeline_data::GraphicsPipelineData;
use crate::vulkan_formats::amber_format_name;

/// Declare the vertex buffers and attribute bindings of the bound pipeline
///
/// # Errors
///
/// - `InvalidResource` when an attribute has no binding description or the
///   pipeline has no attributes at all
/// - `MissingBinding` when no buffer is bound to an attribute's slot
/// - `Unsupported` for an unknown input rate or format
pub fn write_vertex_buffer_declarations(
    device: &DeviceData,
    state: &DrawCallState,
    pipeline: &GraphicsPipelineData,
    prefix: &str,
    fragments: &mut ScriptFragments,
) -> Result<()> {
    let mut dumps = BufferDumps::new(device, state.queue, prefix, vk::BufferUsageFlags::VERTEX_BUFFER);

    for attribute in pipeline.vertex_attributes() {
        let binding_description = pipeline.vertex_binding(attribute.binding).ok_or_else(|| {
            scoop_err!(
                "amber_scoop::vertex",
                InvalidResource,
                "No vertex binding description for binding {} used by location {}",
                attribute.binding, attribute.location
            )
        })?;

        let bound = state.vertex_buffers.get(&attribute.binding).ok_or_else(|| {
            scoop_err!(
                "amber_scoop::vertex",
                MissingBinding,
                "No vertex buffer bound to binding {} used by location {}",
                attribute.binding, attribute.location
            )
        })?;

        let name = dumps.name_or_dump(bound.buffer, fragments, |order| format!("vert_{}", order))?;

        writeln!(
            fragments.pipeline,
            "  VERTEX_DATA {} LOCATION {} RATE {} FORMAT {} OFFSET {} STRIDE {}",
            name,
            attribute.location,
            input_rate_keyword(binding_description.input_rate)?,
            amber_format_name(attribute.format)?,
            u64::from(attribute.offset) + bound.offset,
            binding_description.stride
        )?;
    }

    if pipeline.vertex_attributes().is_empty() {
        scoop_bail!(
            "amber_scoop::vertex",
            InvalidResource,
            "Pipeline has no vertex attributes; Amber needs at least one vertex buffer"
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "vertex_buffer_declarations_tests.rs"]
mod tests;
