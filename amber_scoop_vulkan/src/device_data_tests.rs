//! Unit tests for device_data.rs
//!
//! Registration, destruction and queue submission.

use super::*;
use crate::descriptor_set_data::LayoutBinding;
use crate::graphics_pipeline_data::ShaderStageDesc;
use crate::mock_collaborators::{
    buffer_info, handle, vertex_attribute, vertex_binding, CaptureFixture, VERTEX_MODULE,
};

// ============================================================================
// REGISTRIES
// ============================================================================

#[test]
fn test_buffer_register_and_destroy() {
    let fixture = CaptureFixture::new(0, 0);
    let buffer = fixture.add_buffer(0x200, vec![0; 48], vk::BufferUsageFlags::VERTEX_BUFFER);

    assert_eq!(fixture.device.buffer(buffer).unwrap().size, 48);

    fixture.device.destroy_buffer(buffer).unwrap();
    assert!(matches!(fixture.device.buffer(buffer), Err(Error::InvalidHandle(_))));
}

#[test]
fn test_descriptor_set_needs_registered_layout() {
    let fixture = CaptureFixture::new(0, 0);
    let result = fixture.device.register_descriptor_set(handle(0x600), handle(0x500));
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}

#[test]
fn test_descriptor_set_outlives_layout_handle() {
    let fixture = CaptureFixture::new(0, 0);
    let set = fixture.add_descriptor_set(0x500, 0x600, vec![
        LayoutBinding::new(0, vk::DescriptorType::UNIFORM_BUFFER, 1),
    ]);
    fixture.device.destroy_descriptor_set_layout(handle(0x500)).unwrap();

    fixture.device
        .update_descriptor_buffers(set, 0, 0, &[buffer_info(handle(0x1), 0, 4)])
        .unwrap();
    assert_eq!(fixture.device.descriptor_set(set).unwrap().layout().bindings().len(), 1);
}

#[test]
fn test_update_unknown_descriptor_set() {
    let fixture = CaptureFixture::new(0, 0);
    let result = fixture.device.update_descriptor_buffers(handle(0x601), 0, 0, &[]);
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}

#[test]
fn test_pipeline_copies_shader_code() {
    let fixture = CaptureFixture::new(0, 0);
    let pipeline = fixture.add_pipeline(0x300, Vec::new(), Vec::new());

    fixture.device.destroy_shader_module(handle(VERTEX_MODULE)).unwrap();

    let data = fixture.device.graphics_pipeline(pipeline).unwrap();
    let (vertex, _) = data.vertex_and_fragment_stages().unwrap();
    assert_eq!(vertex.code.code().len(), 5);
    assert_eq!(vertex.entry_point, "main");
}

#[test]
fn test_pipeline_with_unknown_module() {
    let fixture = CaptureFixture::new(0, 0);
    let desc = GraphicsPipelineDesc {
        stages: vec![ShaderStageDesc::new(vk::ShaderStageFlags::VERTEX, handle(0x99), "main")],
        ..GraphicsPipelineDesc::default()
    };
    let result = fixture.device.register_graphics_pipeline(handle(0x300), desc);
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}

// ============================================================================
// COMMAND BUFFERS
// ============================================================================

#[test]
fn test_recording_needs_allocated_command_buffer() {
    let fixture = CaptureFixture::new(0, 0);
    let result = fixture.device.record_command(handle(0x800), RecordedCommand::EndRenderPass);
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}

#[test]
fn test_begin_command_buffer_resets_recording() {
    let fixture = CaptureFixture::new(0, 0);
    let command_buffer = handle(0x800);
    fixture.device.allocate_command_buffer(command_buffer).unwrap();

    fixture.device.record_command(command_buffer, RecordedCommand::EndRenderPass).unwrap();
    assert_eq!(fixture.device.recorded_commands(command_buffer).unwrap().len(), 1);

    fixture.device.begin_command_buffer(command_buffer).unwrap();
    assert!(fixture.device.recorded_commands(command_buffer).unwrap().is_empty());
}

#[test]
fn test_queue_submit_replays_in_order() {
    let fixture = CaptureFixture::new(0, 1);
    let vertices = fixture.add_buffer(0x200, vec![0; 24], vk::BufferUsageFlags::VERTEX_BUFFER);
    let pipeline = fixture.add_pipeline(
        0x300,
        vec![vertex_binding(0, 8, vk::VertexInputRate::VERTEX)],
        vec![vertex_attribute(0, 0, vk::Format::R32G32_SFLOAT, 0)],
    );

    let first = handle(0x801);
    let second = handle(0x802);
    for command_buffer in [first, second] {
        fixture.device.allocate_command_buffer(command_buffer).unwrap();
        fixture.device.begin_command_buffer(command_buffer).unwrap();
        for command in [
            RecordedCommand::BindPipeline { bind_point: vk::PipelineBindPoint::GRAPHICS, pipeline },
            RecordedCommand::BeginRenderPass { render_pass: handle(0x700) },
            RecordedCommand::BindVertexBuffers { first_binding: 0, buffers: vec![vertices], offsets: vec![0] },
            RecordedCommand::Draw { vertex_count: 3, instance_count: 0, first_vertex: 0, first_instance: 0 },
        ] {
            fixture.device.record_command(command_buffer, command).unwrap();
        }
    }

    let scripts = fixture.device
        .queue_submit(&fixture.session, handle(0x9), &[second, first])
        .unwrap();

    assert_eq!(scripts, vec![fixture.output_path("0.amber"), fixture.output_path("1.amber")]);
}

#[test]
fn test_queue_submit_unknown_command_buffer() {
    let fixture = CaptureFixture::new(0, 0);
    let result = fixture.device.queue_submit(&fixture.session, handle(0x9), &[handle(0x803)]);
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}
