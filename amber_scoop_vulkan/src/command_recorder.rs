/// CommandRecorder - Commands recorded into one command buffer
///
/// The buffer copies need the queue a command buffer is submitted on, which
/// is only known at `vkQueueSubmit`. Commands are therefore stored while
/// recording and replayed into a `DrawCallTracker` at submission.

use amber_scoop::scoop::Result;
use ash::vk;
use std::path::PathBuf;

use crate::draw_call_tracker::DrawCallTracker;

/// Command relevant to draw call capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    BindPipeline {
        bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
    },
    BeginRenderPass {
        render_pass: vk::RenderPass,
    },
    EndRenderPass,
    BindVertexBuffers {
        first_binding: u32,
        buffers: Vec<vk::Buffer>,
        offsets: Vec<vk::DeviceSize>,
    },
    BindIndexBuffer {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    },
    BindDescriptorSets {
        bind_point: vk::PipelineBindPoint,
        first_set: u32,
        descriptor_sets: Vec<vk::DescriptorSet>,
        dynamic_offsets: Vec<u32>,
    },
    Draw {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
}

/// Recording of one `VkCommandBuffer`
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<RecordedCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `vkBeginCommandBuffer`: discard the previous recording
    pub fn begin(&mut self) {
        self.commands.clear();
    }

    pub fn record(&mut self, command: RecordedCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Feed the recording to `tracker` in order
    ///
    /// Returns the scripts written by captured draws. Stops at the first error.
    pub fn replay(&self, tracker: &mut DrawCallTracker) -> Result<Vec<PathBuf>> {
        let mut scripts = Vec::new();
        tracker.begin_recording();

        for command in &self.commands {
            let written = match command {
                RecordedCommand::BindPipeline { bind_point, pipeline } => {
                    tracker.bind_pipeline(*bind_point, *pipeline);
                    None
                }
                RecordedCommand::BeginRenderPass { render_pass } => {
                    tracker.begin_render_pass(*render_pass);
                    None
                }
                RecordedCommand::EndRenderPass => {
                    tracker.end_render_pass();
                    None
                }
                RecordedCommand::BindVertexBuffers { first_binding, buffers, offsets } => {
                    tracker.bind_vertex_buffers(*first_binding, buffers, offsets)?;
                    None
                }
                RecordedCommand::BindIndexBuffer { buffer, offset, index_type } => {
                    tracker.bind_index_buffer(*buffer, *offset, *index_type);
                    None
                }
                RecordedCommand::BindDescriptorSets { bind_point, first_set, descriptor_sets, dynamic_offsets } => {
                    tracker.bind_descriptor_sets(*bind_point, *first_set, descriptor_sets, dynamic_offsets)?;
                    None
                }
                RecordedCommand::Draw { vertex_count, instance_count, first_vertex, first_instance } => {
                    tracker.draw(*vertex_count, *instance_count, *first_vertex, *first_instance)?
                }
                RecordedCommand::DrawIndexed { index_count, instance_count, first_index, vertex_offset, first_instance } => {
                    tracker.draw_indexed(*index_count, *instance_count, *first_index, *vertex_offset, *first_instance)?
                }
            };
            scripts.extend(written);
        }

        Ok(scripts)
    }
}

#[cfg(test)]
#[path = "command_recorder_tests.rs"]
mod tests;
