/// Per-draw buffer dump table
///
/// Each distinct buffer handle is copied, written to `<prefix>_<name>.bin`
/// and declared once per draw call; later references reuse its name. A new
/// table is built for every draw because contents change between draws.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_debug, scoop_warn};
use ash::vk;
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::amber_script::{dump_file_name, write_data_to_file, ScriptFragments};
use crate::device_data::DeviceData;

pub struct BufferDumps<'a> {
    device: &'a DeviceData,
    queue: vk::Queue,
    prefix: &'a str,
    expected_usage: vk::BufferUsageFlags,
    names: FxHashMap<vk::Buffer, String>,
}

impl<'a> BufferDumps<'a> {
    /// Create an empty table
    ///
    /// Buffers without any of `expected_usage` are still dumped, with a warning.
    pub fn new(device: &'a DeviceData, queue: vk::Queue, prefix: &'a str, expected_usage: vk::BufferUsageFlags) -> Self {
        Self {
            device,
            queue,
            prefix,
            expected_usage,
            names: FxHashMap::default(),
        }
    }

    /// Name of `buffer`, dumping and declaring it on first use
    ///
    /// `make_name` receives the number of buffers dumped so far.
    pub fn name_or_dump<F>(&mut self, buffer: vk::Buffer, fragments: &mut ScriptFragments, make_name: F) -> Result<String>
    where
        F: FnOnce(usize) -> String,
    {
        if let Some(name) = self.names.get(&buffer) {
            return Ok(name.clone());
        }

        let buffer_data = self.device.buffer(buffer)?;
        if !buffer_data.usage.intersects(self.expected_usage) {
            scoop_warn!(
                "amber_scoop::dump",
                "Buffer {:?} has usage {:?}, expected one of {:?}",
                buffer, buffer_data.usage, self.expected_usage
            );
        }

        let name = make_name(self.names.len());
        let file_name = dump_file_name(self.prefix, &name);

        let bytes = self.device.buffer_copy().copy_buffer(self.queue, buffer, buffer_data.size)?;
        write_data_to_file(Path::new(&file_name), &bytes)?;
        fragments.declare_file_buffer(&name, buffer_data.size, &file_name)?;

        scoop_debug!("amber_scoop::dump", "Dumped {:?} as {} ({} bytes)", buffer, file_name, bytes.len());

        self.names.insert(buffer, name.clone());
        Ok(name)
    }

    /// Number of distinct buffers dumped
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
