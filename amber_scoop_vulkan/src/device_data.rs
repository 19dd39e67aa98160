/// DeviceData - Per-device registries and capture collaborators
///
/// Every object the capture needs to resolve is registered here when the
/// application creates it and removed when it is destroyed. Registries are
/// shared by all recording threads.

use amber_scoop::scoop::{CaptureSession, Error, HandleRegistry, Result};
use amber_scoop::{scoop_debug, scoop_trace};
use ash::vk;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::buffer_copy::BufferCopy;
use crate::buffer_data::BufferData;
use crate::command_recorder::{CommandRecorder, RecordedCommand};
use crate::descriptor_set_data::{DescriptorSetData, DescriptorSetLayoutData};
use crate::disassembly::ShaderDisassembler;
use crate::draw_call_tracker::DrawCallTracker;
use crate::graphics_pipeline_data::{GraphicsPipelineData, GraphicsPipelineDesc, PipelineShaderStage};
use crate::shader_module_data::ShaderModuleData;

pub struct DeviceData {
    buffers: HandleRegistry<vk::Buffer, BufferData>,
    shader_modules: HandleRegistry<vk::ShaderModule, ShaderModuleData>,
    descriptor_set_layouts: HandleRegistry<vk::DescriptorSetLayout, DescriptorSetLayoutData>,
    descriptor_sets: HandleRegistry<vk::DescriptorSet, DescriptorSetData>,
    graphics_pipelines: HandleRegistry<vk::Pipeline, GraphicsPipelineData>,
    command_buffers: HandleRegistry<vk::CommandBuffer, Mutex<CommandRecorder>>,
    buffer_copy: Box<dyn BufferCopy>,
    disassembler: Box<dyn ShaderDisassembler>,
}

impl DeviceData {
    pub fn new<B, D>(buffer_copy: B, disassembler: D) -> Self
    where
        B: BufferCopy + 'static,
        D: ShaderDisassembler + 'static,
    {
        Self {
            buffers: HandleRegistry::new("VkBuffer"),
            shader_modules: HandleRegistry::new("VkShaderModule"),
            descriptor_set_layouts: HandleRegistry::new("VkDescriptorSetLayout"),
            descriptor_sets: HandleRegistry::new("VkDescriptorSet"),
            graphics_pipelines: HandleRegistry::new("VkPipeline"),
            command_buffers: HandleRegistry::new("VkCommandBuffer"),
            buffer_copy: Box::new(buffer_copy),
            disassembler: Box::new(disassembler),
        }
    }

    pub fn buffer_copy(&self) -> &dyn BufferCopy {
        self.buffer_copy.as_ref()
    }

    pub fn disassembler(&self) -> &dyn ShaderDisassembler {
        self.disassembler.as_ref()
    }

    // ===== BUFFERS =====

    pub fn register_buffer(&self, buffer: vk::Buffer, data: BufferData) -> Result<Arc<BufferData>> {
        scoop_trace!("amber_scoop::device", "Register {:?} ({} bytes)", buffer, data.size);
        self.buffers.insert(buffer, data)
    }

    pub fn buffer(&self, buffer: vk::Buffer) -> Result<Arc<BufferData>> {
        self.buffers.get(buffer)
    }

    pub fn destroy_buffer(&self, buffer: vk::Buffer) -> Result<()> {
        self.buffers.remove(buffer).map(|_| ())
    }

    // ===== SHADER MODULES =====

    pub fn register_shader_module(&self, module: vk::ShaderModule, data: ShaderModuleData) -> Result<Arc<ShaderModuleData>> {
        scoop_trace!("amber_scoop::device", "Register {:?} ({} words)", module, data.code().len());
        self.shader_modules.insert(module, data)
    }

    pub fn shader_module(&self, module: vk::ShaderModule) -> Result<Arc<ShaderModuleData>> {
        self.shader_modules.get(module)
    }

    pub fn destroy_shader_module(&self, module: vk::ShaderModule) -> Result<()> {
        self.shader_modules.remove(module).map(|_| ())
    }

    // ===== DESCRIPTOR SETS =====

    pub fn register_descriptor_set_layout(
        &self,
        layout: vk::DescriptorSetLayout,
        data: DescriptorSetLayoutData,
    ) -> Result<Arc<DescriptorSetLayoutData>> {
        self.descriptor_set_layouts.insert(layout, data)
    }

    pub fn descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) -> Result<Arc<DescriptorSetLayoutData>> {
        self.descriptor_set_layouts.get(layout)
    }

    pub fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) -> Result<()> {
        self.descriptor_set_layouts.remove(layout).map(|_| ())
    }

    /// Register a set allocated with `layout`
    ///
    /// The set keeps its layout alive after the layout handle is destroyed.
    pub fn register_descriptor_set(
        &self,
        descriptor_set: vk::DescriptorSet,
        layout: vk::DescriptorSetLayout,
    ) -> Result<Arc<DescriptorSetData>> {
        let layout = self.descriptor_set_layout(layout)?;
        self.descriptor_sets.insert(descriptor_set, DescriptorSetData::new(layout))
    }

    pub fn descriptor_set(&self, descriptor_set: vk::DescriptorSet) -> Result<Arc<DescriptorSetData>> {
        self.descriptor_sets.get(descriptor_set)
    }

    pub fn free_descriptor_set(&self, descriptor_set: vk::DescriptorSet) -> Result<()> {
        self.descriptor_sets.remove(descriptor_set).map(|_| ())
    }

    /// Record a `vkUpdateDescriptorSets` buffer write
    pub fn update_descriptor_buffers(
        &self,
        descriptor_set: vk::DescriptorSet,
        binding: u32,
        first_array_element: u32,
        buffer_infos: &[vk::DescriptorBufferInfo],
    ) -> Result<()> {
        self.descriptor_set(descriptor_set)?
            .write_buffers(binding, first_array_element, buffer_infos)
    }

    // ===== PIPELINES =====

    /// Register a graphics pipeline, copying the code of its shader modules
    pub fn register_graphics_pipeline(
        &self,
        pipeline: vk::Pipeline,
        desc: GraphicsPipelineDesc,
    ) -> Result<Arc<GraphicsPipelineData>> {
        let stages = desc
            .stages
            .into_iter()
            .map(|stage| {
                Ok(PipelineShaderStage {
                    code: self.shader_module(stage.module)?,
                    stage: stage.stage,
                    module: stage.module,
                    entry_point: stage.entry_point,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        scoop_debug!("amber_scoop::device", "Register {:?} ({} stages)", pipeline, stages.len());
        self.graphics_pipelines.insert(
            pipeline,
            GraphicsPipelineData::new(stages, desc.vertex_bindings, desc.vertex_attributes),
        )
    }

    pub fn graphics_pipeline(&self, pipeline: vk::Pipeline) -> Result<Arc<GraphicsPipelineData>> {
        self.graphics_pipelines.get(pipeline)
    }

    pub fn destroy_pipeline(&self, pipeline: vk::Pipeline) -> Result<()> {
        self.graphics_pipelines.remove(pipeline).map(|_| ())
    }

    // ===== COMMAND BUFFERS =====

    pub fn allocate_command_buffer(&self, command_buffer: vk::CommandBuffer) -> Result<()> {
        self.command_buffers
            .insert(command_buffer, Mutex::new(CommandRecorder::new()))
            .map(|_| ())
    }

    pub fn free_command_buffer(&self, command_buffer: vk::CommandBuffer) -> Result<()> {
        self.command_buffers.remove(command_buffer).map(|_| ())
    }

    /// `vkBeginCommandBuffer`
    pub fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> Result<()> {
        self.with_recorder(command_buffer, CommandRecorder::begin)
    }

    /// Append a command to a command buffer's recording
    pub fn record_command(&self, command_buffer: vk::CommandBuffer, command: RecordedCommand) -> Result<()> {
        self.with_recorder(command_buffer, |recorder| recorder.record(command))
    }

    /// Copy of a command buffer's recording
    pub fn recorded_commands(&self, command_buffer: vk::CommandBuffer) -> Result<Vec<RecordedCommand>> {
        let mut commands = Vec::new();
        self.with_recorder(command_buffer, |recorder| commands = recorder.commands().to_vec())?;
        Ok(commands)
    }

    fn with_recorder<F>(&self, command_buffer: vk::CommandBuffer, f: F) -> Result<()>
    where
        F: FnOnce(&mut CommandRecorder),
    {
        let recorder = self.command_buffers.get(command_buffer)?;
        let mut recorder = recorder
            .lock()
            .map_err(|_| Error::BackendError(format!("Recorder of {:?} poisoned", command_buffer)))?;
        f(&mut recorder);
        Ok(())
    }

    /// `vkQueueSubmit`: replay each command buffer, in order, on `queue`
    ///
    /// Returns the scripts written by captured draws.
    pub fn queue_submit(
        self: &Arc<Self>,
        session: &Arc<CaptureSession>,
        queue: vk::Queue,
        command_buffers: &[vk::CommandBuffer],
    ) -> Result<Vec<PathBuf>> {
        let mut scripts = Vec::new();
        for &command_buffer in command_buffers {
            let recorder = self.command_buffers.get(command_buffer)?;
            let recorder = recorder
                .lock()
                .map_err(|_| Error::BackendError(format!("Recorder of {:?} poisoned", command_buffer)))?;

            let mut tracker = DrawCallTracker::new(Arc::clone(session), Arc::clone(self), queue);
            scripts.extend(recorder.replay(&mut tracker)?);
        }
        Ok(scripts)
    }
}

#[cfg(test)]
#[path = "device_data_tests.rs"]
mod tests;
