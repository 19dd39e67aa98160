/// Index buffer serializer
///
/// Amber only takes 32-bit indices, so 16-bit indices are widened and the
/// data is inlined in the script instead of dumped.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_bail, scoop_err};
use ash::vk;
use std::fmt::Write as _;

use crate::amber_script::ScriptFragments;
use crate::device_data::DeviceData;
use crate::draw_call_state::DrawCallState;

/// Read `index_count` indices of `index_type` starting at byte `offset`
///
/// # Errors
///
/// `Unsupported` for index types other than `UINT16` and `UINT32`,
/// `InvalidResource` if the indices run past `bytes`.
pub fn read_indices(bytes: &[u8], offset: vk::DeviceSize, index_count: u32, index_type: vk::IndexType) -> Result<Vec<u32>> {
    let width = match index_type {
        vk::IndexType::UINT16 => 2,
        vk::IndexType::UINT32 => 4,
        other => scoop_bail!("amber_scoop::index", Unsupported, "Index type {:?}", other),
    };

    let start = offset as usize;
    let end = start + index_count as usize * width;
    let data = bytes.get(start..end).ok_or_else(|| {
        scoop_err!(
            "amber_scoop::index",
            InvalidResource,
            "{} indices at offset {} run past the {} byte index buffer",
            index_count, offset, bytes.len()
        )
    })?;

    let indices = if width == 2 {
        data.chunks_exact(2)
            .map(|chunk| u32::from(bytemuck::pod_read_unaligned::<u16>(chunk)))
            .collect()
    } else {
        data.chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect()
    };
    Ok(indices)
}

/// Declare the bound index data and reference it from the pipeline
///
/// Returns the largest index value.
pub fn write_index_buffer_declarations(
    device: &DeviceData,
    state: &DrawCallState,
    index_count: u32,
    fragments: &mut ScriptFragments,
) -> Result<u32> {
    let Some(binding) = state.index_buffer else {
        scoop_bail!("amber_scoop::index", MissingBinding, "Indexed draw without a bound index buffer");
    };

    let buffer_data = device.buffer(binding.buffer)?;
    let bytes = device.buffer_copy().copy_buffer(state.queue, binding.buffer, buffer_data.size)?;
    let indices = read_indices(&bytes, binding.offset, index_count, binding.index_type)?;

    let values: Vec<String> = indices.iter().map(u32::to_string).collect();
    writeln!(fragments.declarations, "BUFFER index_buffer DATA_TYPE uint32 DATA")?;
    writeln!(fragments.declarations, "  {}", values.join(" "))?;
    writeln!(fragments.declarations, "END")?;
    writeln!(fragments.declarations)?;

    writeln!(fragments.pipeline, "  INDEX_DATA index_buffer")?;

    Ok(indices.iter().copied().max().unwrap_or(0))
}

#[cfg(test)]
#[path = "index_buffer_declarations_tests.rs"]
mod tests;
