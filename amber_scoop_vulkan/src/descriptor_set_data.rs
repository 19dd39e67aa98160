/// Descriptor set layout and descriptor set records
///
/// Layouts keep their bindings sorted by binding number, which is the order
/// dynamic offsets are consumed in. Descriptor sets remember the buffer infos
/// written to each buffer binding, one slot per array element.

use amber_scoop::scoop::{Error, Result};
use amber_scoop::scoop_bail;
use ash::vk;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::graphics_pipeline_data::raw_slice;

/// One binding of a descriptor set layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBinding {
    /// Binding number
    pub binding: u32,

    /// Descriptor type of every array element
    pub descriptor_type: vk::DescriptorType,

    /// Number of array elements
    pub descriptor_count: u32,
}

impl LayoutBinding {
    pub fn new(binding: u32, descriptor_type: vk::DescriptorType, descriptor_count: u32) -> Self {
        Self {
            binding,
            descriptor_type,
            descriptor_count,
        }
    }

    /// True for dynamic uniform and storage buffers
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self.descriptor_type,
            vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC
        )
    }
}

/// Registered `VkDescriptorSetLayout` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetLayoutData {
    bindings: Vec<LayoutBinding>,
}

impl DescriptorSetLayoutData {
    /// Create a layout record
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if a binding number is declared twice.
    pub fn new(mut bindings: Vec<LayoutBinding>) -> Result<Self> {
        bindings.sort_by_key(|binding| binding.binding);
        if let Some(pair) = bindings.windows(2).find(|pair| pair[0].binding == pair[1].binding) {
            scoop_bail!(
                "amber_scoop::vulkan",
                InvalidResource,
                "Descriptor set layout declares binding {} twice",
                pair[0].binding
            );
        }
        Ok(Self { bindings })
    }

    /// Copy the bindings of a `VkDescriptorSetLayoutCreateInfo`
    ///
    /// # Safety
    ///
    /// `p_bindings` must point to `binding_count` valid structures.
    pub unsafe fn from_create_info(create_info: &vk::DescriptorSetLayoutCreateInfo<'_>) -> Result<Self> {
        let bindings = raw_slice(create_info.p_bindings, create_info.binding_count as usize)
            .iter()
            .map(|binding| LayoutBinding::new(binding.binding, binding.descriptor_type, binding.descriptor_count))
            .collect();
        Self::new(bindings)
    }

    /// Bindings in ascending binding number
    pub fn bindings(&self) -> &[LayoutBinding] {
        &self.bindings
    }

    /// Layout binding with the given number
    pub fn binding(&self, binding: u32) -> Option<&LayoutBinding> {
        self.bindings
            .binary_search_by_key(&binding, |layout_binding| layout_binding.binding)
            .ok()
            .map(|index| &self.bindings[index])
    }

    /// Number of dynamic offsets a bind of this layout consumes
    pub fn dynamic_offset_count(&self) -> usize {
        self.bindings
            .iter()
            .filter(|binding| binding.is_dynamic())
            .map(|binding| binding.descriptor_count as usize)
            .sum()
    }
}

/// Buffer infos written to one binding, indexed by array element
pub type BufferBindingElements = Vec<Option<vk::DescriptorBufferInfo>>;

/// Registered `VkDescriptorSet` record
#[derive(Debug)]
pub struct DescriptorSetData {
    layout: Arc<DescriptorSetLayoutData>,
    buffer_bindings: RwLock<BTreeMap<u32, BufferBindingElements>>,
}

impl DescriptorSetData {
    pub fn new(layout: Arc<DescriptorSetLayoutData>) -> Self {
        Self {
            layout,
            buffer_bindings: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn layout(&self) -> &Arc<DescriptorSetLayoutData> {
        &self.layout
    }

    /// Record a buffer descriptor write
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the binding is not in the layout or the
    /// written elements run past its array.
    pub fn write_buffers(
        &self,
        binding: u32,
        first_array_element: u32,
        buffer_infos: &[vk::DescriptorBufferInfo],
    ) -> Result<()> {
        let Some(layout_binding) = self.layout.binding(binding) else {
            scoop_bail!(
                "amber_scoop::vulkan",
                InvalidResource,
                "Descriptor write targets binding {} which is not in the set layout",
                binding
            );
        };

        let count = layout_binding.descriptor_count as usize;
        let first = first_array_element as usize;
        if first + buffer_infos.len() > count {
            scoop_bail!(
                "amber_scoop::vulkan",
                InvalidResource,
                "Descriptor write of {} elements at {} overflows binding {} ({} elements)",
                buffer_infos.len(),
                first,
                binding,
                count
            );
        }

        let mut buffer_bindings = self.buffer_bindings.write()
            .map_err(|_| Error::BackendError("Descriptor set lock poisoned".to_string()))?;
        let elements = buffer_bindings
            .entry(binding)
            .or_insert_with(|| vec![None; count]);
        for (slot, info) in elements[first..].iter_mut().zip(buffer_infos) {
            *slot = Some(*info);
        }
        Ok(())
    }

    /// Snapshot of the written buffer bindings, ascending by binding number
    pub fn buffer_bindings(&self) -> Result<BTreeMap<u32, BufferBindingElements>> {
        self.buffer_bindings
            .read()
            .map(|bindings| bindings.clone())
            .map_err(|_| Error::BackendError("Descriptor set lock poisoned".to_string()))
    }
}

#[cfg(test)]
#[path = "descriptor_set_data_tests.rs"]
mod tests;
