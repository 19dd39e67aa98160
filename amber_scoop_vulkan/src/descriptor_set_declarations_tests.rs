//! Unit tests for descriptor_set_declarations.rs
//!
//! Range resolution, bind line forms and buffer deduplication across sets.

use super::*;
use crate::descriptor_set_data::LayoutBinding;
use crate::draw_call_state::DescriptorSetBinding;
use crate::mock_collaborators::{buffer_info, handle, CaptureFixture};
use amber_scoop::scoop::Error;

fn bind_set(state: &mut DrawCallState, slot: u32, descriptor_set: vk::DescriptorSet, dynamic: &[(u32, Vec<u32>)]) {
    let mut binding = DescriptorSetBinding::new(descriptor_set);
    for (number, offsets) in dynamic {
        binding.dynamic_offsets.insert(*number, offsets.clone());
    }
    state.descriptor_sets.insert(slot, binding);
}

// ============================================================================
// RANGE RESOLUTION
// ============================================================================

#[test]
fn test_whole_size_range_subtracts_offsets() {
    let info = buffer_info(handle(0x1), 16, vk::WHOLE_SIZE);
    assert_eq!(descriptor_range(&info, 100, 8).unwrap(), 76);
}

#[test]
fn test_explicit_range_kept() {
    let info = buffer_info(handle(0x1), 16, 32);
    assert_eq!(descriptor_range(&info, 100, 8).unwrap(), 32);
}

#[test]
fn test_whole_size_range_underflow() {
    let info = buffer_info(handle(0x1), 96, vk::WHOLE_SIZE);
    assert!(matches!(descriptor_range(&info, 100, 8), Err(Error::InvalidResource(_))));
}

// ============================================================================
// BIND LINES
// ============================================================================

#[test]
fn test_static_uniform_bind_line() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![5; 64], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(0, vk::DescriptorType::UNIFORM_BUFFER, 1),
    ]);
    fixture.device.update_descriptor_buffers(set, 0, 0, &[buffer_info(buffer, 0, 64)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set, &[]);

    let mut fragments = ScriptFragments::new();
    write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments).unwrap();

    assert_eq!(
        fragments.pipeline,
        "  BIND BUFFER descriptor_0_0_0 AS uniform DESCRIPTOR_SET 0 BINDING 0 DESCRIPTOR_OFFSET 0 DESCRIPTOR_RANGE 64\n"
    );
    assert_eq!(
        fragments.declarations,
        format!("BUFFER descriptor_0_0_0 DATA_TYPE R8_UINT SIZE 64 FILE BINARY {}_descriptor_0_0_0.bin\n", fixture.prefix())
    );
    assert_eq!(std::fs::read(fixture.output_path("descriptor_0_0_0.bin")).unwrap(), vec![5; 64]);
}

#[test]
fn test_dynamic_array_bind_line() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![0; 100], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(1, vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC, 2),
    ]);
    fixture.device
        .update_descriptor_buffers(set, 1, 0, &[buffer_info(buffer, 16, vk::WHOLE_SIZE), buffer_info(buffer, 0, 20)])
        .unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 2, set, &[(1, vec![8, 40])]);

    let mut fragments = ScriptFragments::new();
    write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments).unwrap();

    assert_eq!(
        fragments.pipeline,
        "  BIND BUFFER_ARRAY descriptor_2_1_0 descriptor_2_1_0 AS uniform_dynamic DESCRIPTOR_SET 2 BINDING 1 \
         OFFSET 8 40 DESCRIPTOR_OFFSET 16 0 DESCRIPTOR_RANGE 76 20\n"
    );
    assert_eq!(fixture.buffer_copy.copies(), vec![buffer]);
}

#[test]
fn test_buffer_shared_across_sets_dumped_once() {
    let fixture = CaptureFixture::new(0, 0);
    let shared = fixture.add_buffer(0x400, vec![1; 32], vk::BufferUsageFlags::STORAGE_BUFFER);
    let layout = vec![LayoutBinding::new(0, vk::DescriptorType::STORAGE_BUFFER, 1)];
    let set_a = fixture.add_descriptor_set(0x500, 0x600, layout.clone());
    let set_b = fixture.add_descriptor_set(0x501, 0x601, layout);
    fixture.device.update_descriptor_buffers(set_a, 0, 0, &[buffer_info(shared, 0, 16)]).unwrap();
    fixture.device.update_descriptor_buffers(set_b, 0, 0, &[buffer_info(shared, 16, 16)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set_a, &[]);
    bind_set(&mut state, 1, set_b, &[]);

    let mut fragments = ScriptFragments::new();
    write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments).unwrap();

    assert_eq!(fragments.declarations.lines().count(), 1);
    assert!(fragments.pipeline.contains("BIND BUFFER descriptor_0_0_0 AS storage DESCRIPTOR_SET 1 BINDING 0"));
    assert_eq!(fixture.buffer_copy.copies().len(), 1);
}

#[test]
fn test_bindings_emitted_in_ascending_order() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![0; 16], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(4, vk::DescriptorType::UNIFORM_BUFFER, 1),
        LayoutBinding::new(2, vk::DescriptorType::STORAGE_BUFFER, 1),
    ]);
    fixture.device.update_descriptor_buffers(set, 4, 0, &[buffer_info(buffer, 0, 16)]).unwrap();
    fixture.device.update_descriptor_buffers(set, 2, 0, &[buffer_info(buffer, 0, 16)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set, &[]);

    let mut fragments = ScriptFragments::new();
    write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments).unwrap();

    let lines: Vec<&str> = fragments.pipeline.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("AS storage DESCRIPTOR_SET 0 BINDING 2"));
    assert!(lines[1].contains("AS uniform DESCRIPTOR_SET 0 BINDING 4"));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_dynamic_binding_without_offsets() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![0; 16], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(0, vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC, 1),
    ]);
    fixture.device.update_descriptor_buffers(set, 0, 0, &[buffer_info(buffer, 0, 16)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set, &[]);

    let mut fragments = ScriptFragments::new();
    let result = write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments);
    assert!(matches!(result, Err(Error::MissingBinding(_))));
}

#[test]
fn test_unwritten_array_element() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![0; 16], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(0, vk::DescriptorType::UNIFORM_BUFFER, 2),
    ]);
    fixture.device.update_descriptor_buffers(set, 0, 0, &[buffer_info(buffer, 0, 16)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set, &[]);

    let mut fragments = ScriptFragments::new();
    let result = write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_image_descriptor_type_in_buffer_binding_is_unsupported() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x400, vec![0; 16], vk::BufferUsageFlags::UNIFORM_BUFFER);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(0, vk::DescriptorType::INPUT_ATTACHMENT, 1),
    ]);
    fixture.device.update_descriptor_buffers(set, 0, 0, &[buffer_info(buffer, 0, 16)]).unwrap();

    let mut state = DrawCallState::new(handle(0x9));
    bind_set(&mut state, 0, set, &[]);

    let mut fragments = ScriptFragments::new();
    let result = write_descriptor_set_declarations(&fixture.device, &state, &fixture.prefix(), &mut fragments);
    assert!(matches!(result, Err(Error::Unsupported(_))));
}
