/// Descriptor set serializer
///
/// One `BIND BUFFER` (single element) or `BIND BUFFER_ARRAY` line per written
/// buffer binding of every bound set. Buffers are dumped once per draw, named
/// after the first descriptor that references them.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_bail, scoop_err};
use ash::vk;
use std::fmt::Write as _;

use crate::amber_script::{descriptor_type_keyword, ScriptFragments};
use crate::buffer_dumps::BufferDumps;
use crate::device_data::DeviceData;
use crate::draw_call_state::DrawCallState;

/// Effective byte range of a buffer descriptor
///
/// `VK_WHOLE_SIZE` resolves to the bytes left after the descriptor offset
/// and the dynamic offset.
pub fn descriptor_range(
    info: &vk::DescriptorBufferInfo,
    buffer_size: vk::DeviceSize,
    dynamic_offset: u32,
) -> Result<vk::DeviceSize> {
    if info.range != vk::WHOLE_SIZE {
        return Ok(info.range);
    }

    buffer_size
        .checked_sub(info.offset)
        .and_then(|remaining| remaining.checked_sub(u64::from(dynamic_offset)))
        .ok_or_else(|| {
            scoop_err!(
                "amber_scoop::descriptor",
                InvalidResource,
                "Descriptor offset {} plus dynamic offset {} exceeds buffer size {}",
                info.offset, dynamic_offset, buffer_size
            )
        })
}

/// Declare the buffers of every bound descriptor set and bind them
pub fn write_descriptor_set_declarations(
    device: &DeviceData,
    state: &DrawCallState,
    prefix: &str,
    fragments: &mut ScriptFragments,
) -> Result<()> {
    let mut dumps = BufferDumps::new(
        device,
        state.queue,
        prefix,
        vk::BufferUsageFlags::UNIFORM_BUFFER
            | vk::BufferUsageFlags::STORAGE_BUFFER
            | vk::BufferUsageFlags::UNIFORM_TEXEL_BUFFER
            | vk::BufferUsageFlags::STORAGE_TEXEL_BUFFER,
    );

    for (&set_number, set_binding) in &state.descriptor_sets {
        let descriptor_set = device.descriptor_set(set_binding.descriptor_set)?;
        let layout = descriptor_set.layout();

        for (binding_number, elements) in descriptor_set.buffer_bindings()? {
            let Some(layout_binding) = layout.binding(binding_number) else {
                scoop_bail!(
                    "amber_scoop::descriptor",
                    InvalidResource,
                    "Set {} binding {} is not in the set layout",
                    set_number, binding_number
                );
            };
            let count = layout_binding.descriptor_count as usize;
            if count == 0 {
                continue;
            }
            let keyword = descriptor_type_keyword(layout_binding.descriptor_type)?;

            let dynamic_offsets = if layout_binding.is_dynamic() {
                match set_binding.dynamic_offsets.get(&binding_number) {
                    Some(offsets) if offsets.len() >= count => offsets[..count].to_vec(),
                    _ => scoop_bail!(
                        "amber_scoop::descriptor",
                        MissingBinding,
                        "No dynamic offsets for set {} binding {}",
                        set_number, binding_number
                    ),
                }
            } else {
                vec![0; count]
            };

            let mut names = Vec::with_capacity(count);
            let mut offsets = Vec::with_capacity(count);
            let mut ranges = Vec::with_capacity(count);

            for (element, dynamic_offset) in dynamic_offsets.iter().enumerate() {
                let Some(info) = elements.get(element).copied().flatten() else {
                    scoop_bail!(
                        "amber_scoop::descriptor",
                        InvalidResource,
                        "Set {} binding {} element {} was never written",
                        set_number, binding_number, element
                    );
                };

                let name = dumps.name_or_dump(info.buffer, fragments, |_| {
                    format!("descriptor_{}_{}_{}", set_number, binding_number, element)
                })?;
                let buffer_size = device.buffer(info.buffer)?.size;

                names.push(name);
                offsets.push(info.offset.to_string());
                ranges.push(descriptor_range(&info, buffer_size, *dynamic_offset)?.to_string());
            }

            let command = if count == 1 { "BUFFER" } else { "BUFFER_ARRAY" };
            write!(
                fragments.pipeline,
                "  BIND {} {} AS {} DESCRIPTOR_SET {} BINDING {}",
                command,
                names.join(" "),
                keyword,
                set_number,
                binding_number
            )?;
            if layout_binding.is_dynamic() {
                let dynamic: Vec<String> = dynamic_offsets.iter().map(u32::to_string).collect();
                write!(fragments.pipeline, " OFFSET {}", dynamic.join(" "))?;
            }
            writeln!(
                fragments.pipeline,
                " DESCRIPTOR_OFFSET {} DESCRIPTOR_RANGE {}",
                offsets.join(" "),
                ranges.join(" ")
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "descriptor_set_declarations_tests.rs"]
mod tests;
