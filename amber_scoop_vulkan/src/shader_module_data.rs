/// ShaderModuleData - Owned copy of a shader module's SPIR-V words

use amber_scoop::scoop::Result;
use amber_scoop::scoop_bail;
use ash::vk;

use crate::graphics_pipeline_data::raw_slice;

/// Registered `VkShaderModule` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderModuleData {
    code: Vec<u32>,
}

impl ShaderModuleData {
    pub fn new(code: Vec<u32>) -> Self {
        Self { code }
    }

    /// Copy the code referenced by a `VkShaderModuleCreateInfo`
    ///
    /// # Safety
    ///
    /// `p_code` must point to `code_size` readable bytes.
    pub unsafe fn from_create_info(create_info: &vk::ShaderModuleCreateInfo<'_>) -> Result<Self> {
        if create_info.code_size % 4 != 0 {
            scoop_bail!(
                "amber_scoop::vulkan",
                InvalidResource,
                "Shader code size {} is not a multiple of 4",
                create_info.code_size
            );
        }
        let words = raw_slice(create_info.p_code, create_info.code_size / 4);
        Ok(Self::new(words.to_vec()))
    }

    /// SPIR-V words
    pub fn code(&self) -> &[u32] {
        &self.code
    }
}
