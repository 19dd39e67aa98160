/// DrawCallTracker - Turns the bindings of one recording into Amber scripts
///
/// Bind commands update the tracker's `DrawCallState`. Every draw claims the
/// next ordinal from the capture session; draws inside the capture window
/// are written to `<prefix>_<ordinal>.amber` together with their buffer dumps.

use amber_scoop::scoop::{CaptureSession, Result};
use amber_scoop::{scoop_bail, scoop_debug, scoop_info, scoop_trace};
use ash::vk;
use std::path::PathBuf;
use std::sync::Arc;

use crate::amber_script::{render_script, script_file_name, write_data_to_file, DrawParams, ScriptFragments};
use crate::descriptor_binder::{bind_descriptor_set, finish_dynamic_offsets};
use crate::descriptor_set_declarations::write_descriptor_set_declarations;
use crate::device_data::DeviceData;
use crate::draw_call_state::{DrawCallState, IndexBufferBinding, VertexBufferBinding};
use crate::index_buffer_declarations::write_index_buffer_declarations;
use crate::vertex_buffer_declarations::write_vertex_buffer_declarations;

pub struct DrawCallTracker {
    session: Arc<CaptureSession>,
    device: Arc<DeviceData>,
    state: DrawCallState,
}

impl DrawCallTracker {
    /// Create a tracker for a recording submitted on `queue`
    pub fn new(session: Arc<CaptureSession>, device: Arc<DeviceData>, queue: vk::Queue) -> Self {
        Self {
            session,
            device,
            state: DrawCallState::new(queue),
        }
    }

    pub fn state(&self) -> &DrawCallState {
        &self.state
    }

    pub fn session(&self) -> &Arc<CaptureSession> {
        &self.session
    }

    /// Start a new recording, dropping every binding
    pub fn begin_recording(&mut self) {
        self.state.reset();
    }

    pub fn bind_pipeline(&mut self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        if bind_point != vk::PipelineBindPoint::GRAPHICS {
            scoop_trace!("amber_scoop::tracker", "Ignoring {:?} pipeline {:?}", bind_point, pipeline);
            return;
        }
        scoop_trace!("amber_scoop::tracker", "vkCmdBindPipeline {:?}", pipeline);
        self.state.graphics_pipeline = Some(pipeline);
    }

    pub fn begin_render_pass(&mut self, render_pass: vk::RenderPass) {
        scoop_trace!("amber_scoop::tracker", "vkCmdBeginRenderPass {:?}", render_pass);
        self.state.render_pass = Some(render_pass);
    }

    pub fn end_render_pass(&mut self) {
        scoop_trace!("amber_scoop::tracker", "vkCmdEndRenderPass");
        self.state.render_pass = None;
    }

    /// Bind `buffers[i]` at `offsets[i]` to slot `first_binding + i`
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the slices differ in length.
    pub fn bind_vertex_buffers(
        &mut self,
        first_binding: u32,
        buffers: &[vk::Buffer],
        offsets: &[vk::DeviceSize],
    ) -> Result<()> {
        if buffers.len() != offsets.len() {
            scoop_bail!(
                "amber_scoop::tracker",
                InvalidResource,
                "vkCmdBindVertexBuffers with {} buffers and {} offsets",
                buffers.len(),
                offsets.len()
            );
        }

        for (slot, (&buffer, &offset)) in (first_binding..).zip(buffers.iter().zip(offsets)) {
            scoop_trace!("amber_scoop::tracker", "Vertex binding {} = {:?} + {}", slot, buffer, offset);
            self.state.vertex_buffers.insert(slot, VertexBufferBinding { buffer, offset });
        }
        Ok(())
    }

    pub fn bind_index_buffer(&mut self, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType) {
        scoop_trace!("amber_scoop::tracker", "vkCmdBindIndexBuffer {:?} + {} ({:?})", buffer, offset, index_type);
        self.state.index_buffer = Some(IndexBufferBinding {
            buffer,
            offset,
            index_type,
        });
    }

    /// Bind `descriptor_sets[i]` to set `first_set + i`
    ///
    /// # Errors
    ///
    /// `InvalidHandle` for an unregistered set, `DynamicOffsetMismatch` when
    /// `dynamic_offsets` does not hold exactly one offset per dynamic element.
    pub fn bind_descriptor_sets(
        &mut self,
        bind_point: vk::PipelineBindPoint,
        first_set: u32,
        descriptor_sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    ) -> Result<()> {
        if bind_point != vk::PipelineBindPoint::GRAPHICS {
            scoop_trace!("amber_scoop::tracker", "Ignoring {:?} descriptor sets", bind_point);
            return Ok(());
        }

        let mut cursor = 0;
        for (slot, &descriptor_set) in (first_set..).zip(descriptor_sets) {
            let set_data = self.device.descriptor_set(descriptor_set)?;
            bind_descriptor_set(
                &mut self.state,
                slot,
                descriptor_set,
                set_data.layout(),
                dynamic_offsets,
                &mut cursor,
            )?;
            scoop_trace!("amber_scoop::tracker", "Descriptor set {} = {:?}", slot, descriptor_set);
        }
        finish_dynamic_offsets(dynamic_offsets, cursor)
    }

    /// `vkCmdDraw`
    pub fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<Option<PathBuf>> {
        self.handle_draw_call(&DrawParams::draw(vertex_count, instance_count, first_vertex, first_instance))
    }

    /// `vkCmdDrawIndexed`
    ///
    /// The vertex offset is not expressible in Amber and is dropped.
    pub fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<Option<PathBuf>> {
        if vertex_offset != 0 {
            scoop_debug!("amber_scoop::tracker", "Dropping vertex offset {}", vertex_offset);
        }
        self.handle_draw_call(&DrawParams::draw_indexed(index_count, instance_count, first_index, first_instance))
    }

    /// Claim a draw ordinal and write the script if it is in the capture window
    ///
    /// Returns the script path, or `None` when the draw was filtered out.
    /// Filtered draws still advance the counter.
    pub fn handle_draw_call(&mut self, params: &DrawParams) -> Result<Option<PathBuf>> {
        let (draw_call, captured) = self.session.claim_draw_call();
        if !captured {
            scoop_debug!("amber_scoop::tracker", "Skipping draw call {}", draw_call);
            return Ok(None);
        }

        let Some(pipeline_handle) = self.state.graphics_pipeline else {
            scoop_bail!("amber_scoop::tracker", MissingBinding, "Draw call {} without a graphics pipeline", draw_call);
        };
        if self.state.render_pass.is_none() {
            scoop_bail!("amber_scoop::tracker", MissingBinding, "Draw call {} outside a render pass", draw_call);
        }

        let device = self.device.as_ref();
        let pipeline = device.graphics_pipeline(pipeline_handle)?;
        let (vertex_stage, fragment_stage) = pipeline.vertex_and_fragment_stages()?;
        let prefix = self.session.settings().output_file_prefix.as_str();

        let mut fragments = ScriptFragments::new();

        if params.is_indexed() {
            let max_index = write_index_buffer_declarations(device, &self.state, params.index_count, &mut fragments)?;
            scoop_debug!("amber_scoop::tracker", "Draw call {} indexes up to vertex {}", draw_call, max_index);
        }
        write_vertex_buffer_declarations(device, &self.state, &pipeline, prefix, &mut fragments)?;
        write_descriptor_set_declarations(device, &self.state, prefix, &mut fragments)?;

        let vertex_shader = device.disassembler().disassemble(vertex_stage.code.code())?;
        let fragment_shader = device.disassembler().disassemble(fragment_stage.code.code())?;
        let script = render_script(&vertex_shader, &fragment_shader, &fragments, params)?;

        let path = PathBuf::from(script_file_name(prefix, draw_call));
        write_data_to_file(&path, script.as_bytes())?;

        scoop_info!("amber_scoop::tracker", "Captured draw call {} to {}", draw_call, path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
#[path = "draw_call_tracker_tests.rs"]
mod tests;
