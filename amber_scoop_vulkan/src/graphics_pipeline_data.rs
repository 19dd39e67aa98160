/// GraphicsPipelineData - Shader stages and vertex input state of a pipeline
///
/// Shader module code is captured when the pipeline is registered, so the
/// application may destroy its modules right after pipeline creation.

use amber_scoop::scoop::Result;
use amber_scoop::scoop_bail;
use ash::vk;
use std::ffi::CStr;
use std::sync::Arc;

use crate::shader_module_data::ShaderModuleData;

/// View a raw `(pointer, count)` pair from a create-info structure as a slice
///
/// # Safety
///
/// Unless `count` is zero or `ptr` is null, `ptr` must point to `count`
/// initialized values that outlive `'a`.
pub(crate) unsafe fn raw_slice<'a, T>(ptr: *const T, count: usize) -> &'a [T] {
    if ptr.is_null() || count == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr, count)
    }
}

/// Shader stage as declared at pipeline creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStageDesc {
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
    pub entry_point: String,
}

impl ShaderStageDesc {
    pub fn new(stage: vk::ShaderStageFlags, module: vk::ShaderModule, entry_point: impl Into<String>) -> Self {
        Self {
            stage,
            module,
            entry_point: entry_point.into(),
        }
    }
}

/// Pipeline creation parameters the capture needs
#[derive(Debug, Clone, Default)]
pub struct GraphicsPipelineDesc {
    pub stages: Vec<ShaderStageDesc>,
    pub vertex_bindings: Vec<vk::VertexInputBindingDescription>,
    pub vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
}

impl GraphicsPipelineDesc {
    /// Copy the stages and vertex input state of a `VkGraphicsPipelineCreateInfo`
    ///
    /// # Safety
    ///
    /// Every pointer reachable from `create_info` must be valid for the counts
    /// stored next to it, and every `p_name` must be a NUL-terminated string.
    pub unsafe fn from_create_info(create_info: &vk::GraphicsPipelineCreateInfo<'_>) -> Result<Self> {
        let mut stages = Vec::with_capacity(create_info.stage_count as usize);
        for stage in raw_slice(create_info.p_stages, create_info.stage_count as usize) {
            if stage.p_name.is_null() {
                scoop_bail!(
                    "amber_scoop::vulkan",
                    InvalidResource,
                    "Shader stage {:?} has no entry point name",
                    stage.stage
                );
            }
            let entry_point = CStr::from_ptr(stage.p_name).to_string_lossy().into_owned();
            stages.push(ShaderStageDesc::new(stage.stage, stage.module, entry_point));
        }

        let (vertex_bindings, vertex_attributes) = match create_info.p_vertex_input_state.as_ref() {
            Some(input_state) => (
                raw_slice(
                    input_state.p_vertex_binding_descriptions,
                    input_state.vertex_binding_description_count as usize,
                )
                .to_vec(),
                raw_slice(
                    input_state.p_vertex_attribute_descriptions,
                    input_state.vertex_attribute_description_count as usize,
                )
                .to_vec(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            stages,
            vertex_bindings,
            vertex_attributes,
        })
    }
}

/// Shader stage with its module code resolved
#[derive(Debug, Clone)]
pub struct PipelineShaderStage {
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
    pub entry_point: String,
    pub code: Arc<ShaderModuleData>,
}

/// Registered graphics `VkPipeline` record
#[derive(Debug, Clone)]
pub struct GraphicsPipelineData {
    stages: Vec<PipelineShaderStage>,
    vertex_bindings: Vec<vk::VertexInputBindingDescription>,
    vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
}

impl GraphicsPipelineData {
    pub fn new(
        stages: Vec<PipelineShaderStage>,
        vertex_bindings: Vec<vk::VertexInputBindingDescription>,
        vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
    ) -> Self {
        Self {
            stages,
            vertex_bindings,
            vertex_attributes,
        }
    }

    pub fn stages(&self) -> &[PipelineShaderStage] {
        &self.stages
    }

    pub fn vertex_bindings(&self) -> &[vk::VertexInputBindingDescription] {
        &self.vertex_bindings
    }

    pub fn vertex_attributes(&self) -> &[vk::VertexInputAttributeDescription] {
        &self.vertex_attributes
    }

    /// Binding description for a vertex binding slot
    pub fn vertex_binding(&self, binding: u32) -> Option<&vk::VertexInputBindingDescription> {
        self.vertex_bindings.iter().find(|description| description.binding == binding)
    }

    /// The vertex and fragment stages, in that order
    ///
    /// # Errors
    ///
    /// `Unsupported` for any other stage kind, `MissingBinding` when either
    /// required stage is absent.
    pub fn vertex_and_fragment_stages(&self) -> Result<(&PipelineShaderStage, &PipelineShaderStage)> {
        let mut vertex = None;
        let mut fragment = None;

        for stage in &self.stages {
            if stage.stage == vk::ShaderStageFlags::VERTEX {
                vertex = Some(stage);
            } else if stage.stage == vk::ShaderStageFlags::FRAGMENT {
                fragment = Some(stage);
            } else {
                scoop_bail!(
                    "amber_scoop::vulkan",
                    Unsupported,
                    "Shader stage {:?} cannot be captured",
                    stage.stage
                );
            }
        }

        match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => Ok((vertex, fragment)),
            _ => scoop_bail!(
                "amber_scoop::vulkan",
                MissingBinding,
                "Pipeline needs both a vertex and a fragment shader"
            ),
        }
    }
}

#[cfg(test)]
#[path = "graphics_pipeline_data_tests.rs"]
mod tests;
