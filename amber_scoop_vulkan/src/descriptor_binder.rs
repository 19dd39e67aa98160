/// Descriptor binder - Distributes a bind command's dynamic offsets
///
/// Offsets are consumed set by set in increasing slot order, then binding by
/// binding in increasing binding number, then element by element. Every
/// dynamic uniform or storage buffer element takes exactly one offset.

use amber_scoop::scoop::{Error, Result};
use amber_scoop::scoop_error;
use ash::vk;

use crate::descriptor_set_data::DescriptorSetLayoutData;
use crate::draw_call_state::{DescriptorSetBinding, DrawCallState};

/// Bind `descriptor_set` at `slot`, consuming its dynamic offsets from
/// `dynamic_offsets[*cursor..]`
///
/// Any previous binding of the slot is replaced.
///
/// # Errors
///
/// `DynamicOffsetMismatch` if the remaining offsets cannot cover the set's
/// dynamic elements. The state is left untouched in that case.
pub fn bind_descriptor_set(
    state: &mut DrawCallState,
    slot: u32,
    descriptor_set: vk::DescriptorSet,
    layout: &DescriptorSetLayoutData,
    dynamic_offsets: &[u32],
    cursor: &mut usize,
) -> Result<()> {
    let required = *cursor + layout.dynamic_offset_count();
    if required > dynamic_offsets.len() {
        return Err(offset_mismatch(required, dynamic_offsets.len()));
    }

    let mut set_binding = DescriptorSetBinding::new(descriptor_set);
    for layout_binding in layout.bindings().iter().filter(|binding| binding.is_dynamic()) {
        let end = *cursor + layout_binding.descriptor_count as usize;
        set_binding
            .dynamic_offsets
            .insert(layout_binding.binding, dynamic_offsets[*cursor..end].to_vec());
        *cursor = end;
    }

    state.descriptor_sets.insert(slot, set_binding);
    Ok(())
}

/// Check that a bind command consumed every supplied offset
pub fn finish_dynamic_offsets(dynamic_offsets: &[u32], cursor: usize) -> Result<()> {
    if cursor != dynamic_offsets.len() {
        return Err(offset_mismatch(cursor, dynamic_offsets.len()));
    }
    Ok(())
}

fn offset_mismatch(expected: usize, supplied: usize) -> Error {
    let error = Error::DynamicOffsetMismatch { expected, supplied };
    scoop_error!("amber_scoop::binder", "{}", error);
    error
}

#[cfg(test)]
#[path = "descriptor_binder_tests.rs"]
mod tests;
