/// Mock collaborators for unit tests (no GPU required)
///
/// `MockBufferCopy` serves buffer contents from memory and records every
/// copy. `MockDisassembler` returns a fixed text. `CaptureFixture` wires them
/// into a `DeviceData` with a session writing to a temporary directory.

use amber_scoop::scoop::{CaptureSession, Result, Settings};
use ash::vk::{self, Handle};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::buffer_copy::BufferCopy;
use crate::buffer_data::BufferData;
use crate::descriptor_set_data::{DescriptorSetLayoutData, LayoutBinding};
use crate::device_data::DeviceData;
use crate::disassembly::{ShaderDisassembler, SPIRV_MAGIC};
use crate::draw_call_tracker::DrawCallTracker;
use crate::graphics_pipeline_data::{GraphicsPipelineDesc, ShaderStageDesc};
use crate::shader_module_data::ShaderModuleData;

// ============================================================================
// Mock Buffer Copy
// ============================================================================

#[derive(Debug, Default)]
struct MockBufferCopyState {
    contents: FxHashMap<vk::Buffer, Vec<u8>>,
    copies: Vec<vk::Buffer>,
}

/// In-memory buffer copy; clones share their state
#[derive(Debug, Clone, Default)]
pub struct MockBufferCopy {
    state: Arc<Mutex<MockBufferCopyState>>,
}

impl MockBufferCopy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_contents(&self, buffer: vk::Buffer, bytes: Vec<u8>) {
        self.state.lock().unwrap().contents.insert(buffer, bytes);
    }

    /// Buffers copied so far, in copy order
    pub fn copies(&self) -> Vec<vk::Buffer> {
        self.state.lock().unwrap().copies.clone()
    }
}

impl BufferCopy for MockBufferCopy {
    fn copy_buffer(&self, _queue: vk::Queue, buffer: vk::Buffer, size: vk::DeviceSize) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.copies.push(buffer);
        let mut bytes = state.contents.get(&buffer).cloned().unwrap_or_default();
        bytes.resize(size as usize, 0);
        Ok(bytes)
    }
}

// ============================================================================
// Mock Disassembler
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MockDisassembler;

impl ShaderDisassembler for MockDisassembler {
    fn disassemble(&self, code: &[u32]) -> Result<String> {
        Ok(format!("; SPIR-V {} words\nOpCapability Shader", code.len()))
    }
}

// ============================================================================
// Fixture
// ============================================================================

pub fn handle<T: Handle>(raw: u64) -> T {
    T::from_raw(raw)
}

/// Minimal SPIR-V 1.0 header followed by `extra_words` zero words
pub fn spirv_code(extra_words: usize) -> Vec<u32> {
    let mut code = vec![SPIRV_MAGIC, 0x0001_0000, 0, 16, 0];
    code.resize(code.len() + extra_words, 0);
    code
}

pub const VERTEX_MODULE: u64 = 0x51;
pub const FRAGMENT_MODULE: u64 = 0x52;

pub struct CaptureFixture {
    pub dir: TempDir,
    pub buffer_copy: MockBufferCopy,
    pub device: Arc<DeviceData>,
    pub session: Arc<CaptureSession>,
}

impl CaptureFixture {
    /// Device with a vertex and a fragment module, capturing `start..=last`
    pub fn new(start: u64, last: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("capture").to_string_lossy().into_owned();
        let session = Arc::new(CaptureSession::new(Settings::new(prefix, start, last).unwrap()));

        let buffer_copy = MockBufferCopy::new();
        let device = Arc::new(DeviceData::new(buffer_copy.clone(), MockDisassembler));
        device.register_shader_module(handle(VERTEX_MODULE), ShaderModuleData::new(spirv_code(0))).unwrap();
        device.register_shader_module(handle(FRAGMENT_MODULE), ShaderModuleData::new(spirv_code(1))).unwrap();

        Self {
            dir,
            buffer_copy,
            device,
            session,
        }
    }

    pub fn prefix(&self) -> String {
        self.session.settings().output_file_prefix.clone()
    }

    /// Path of `<prefix>_<suffix>`
    pub fn output_path(&self, suffix: &str) -> std::path::PathBuf {
        self.dir.path().join(format!("capture_{}", suffix))
    }

    pub fn tracker(&self) -> DrawCallTracker {
        DrawCallTracker::new(Arc::clone(&self.session), Arc::clone(&self.device), handle(0x9))
    }

    /// Register a buffer sized to `bytes` and serve `bytes` when it is copied
    pub fn add_buffer(&self, raw: u64, bytes: Vec<u8>, usage: vk::BufferUsageFlags) -> vk::Buffer {
        let buffer = handle(raw);
        self.device
            .register_buffer(buffer, BufferData::new(bytes.len() as u64, usage))
            .unwrap();
        self.buffer_copy.set_contents(buffer, bytes);
        buffer
    }

    /// Register a vertex + fragment pipeline with the given vertex input state
    pub fn add_pipeline(
        &self,
        raw: u64,
        vertex_bindings: Vec<vk::VertexInputBindingDescription>,
        vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
    ) -> vk::Pipeline {
        let pipeline = handle(raw);
        let desc = GraphicsPipelineDesc {
            stages: vec![
                ShaderStageDesc::new(vk::ShaderStageFlags::VERTEX, handle(VERTEX_MODULE), "main"),
                ShaderStageDesc::new(vk::ShaderStageFlags::FRAGMENT, handle(FRAGMENT_MODULE), "main"),
            ],
            vertex_bindings,
            vertex_attributes,
        };
        self.device.register_graphics_pipeline(pipeline, desc).unwrap();
        pipeline
    }

    /// Register a layout with `bindings` and one set allocated from it
    pub fn add_descriptor_set(&self, raw_layout: u64, raw_set: u64, bindings: Vec<LayoutBinding>) -> vk::DescriptorSet {
        let layout = handle(raw_layout);
        self.device
            .register_descriptor_set_layout(layout, DescriptorSetLayoutData::new(bindings).unwrap())
            .unwrap();
        let descriptor_set = handle(raw_set);
        self.device.register_descriptor_set(descriptor_set, layout).unwrap();
        descriptor_set
    }
}

pub fn vertex_binding(binding: u32, stride: u32, input_rate: vk::VertexInputRate) -> vk::VertexInputBindingDescription {
    vk::VertexInputBindingDescription {
        binding,
        stride,
        input_rate,
    }
}

pub fn vertex_attribute(location: u32, binding: u32, format: vk::Format, offset: u32) -> vk::VertexInputAttributeDescription {
    vk::VertexInputAttributeDescription {
        location,
        binding,
        format,
        offset,
    }
}

pub fn buffer_info(buffer: vk::Buffer, offset: vk::DeviceSize, range: vk::DeviceSize) -> vk::DescriptorBufferInfo {
    vk::DescriptorBufferInfo { buffer, offset, range }
}
