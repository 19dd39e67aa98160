/// Amber script text
///
/// Keywords, file names and the final document layout. The serializers
/// append declaration and pipeline lines to a `ScriptFragments` and the
/// tracker assembles them with the shaders and the run command.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_bail, scoop_err};
use ash::vk;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

/// Output color target declared by every script
pub const FRAMEBUFFER_DECLARATION: &str = "BUFFER framebuffer FORMAT B8G8R8A8_UNORM";

/// Primitive topology of the run command
pub const TOPOLOGY: &str = "TRIANGLE_LIST";

/// Script text accumulated while serializing one draw call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFragments {
    /// `BUFFER ...` declarations, placed before the pipeline
    pub declarations: String,

    /// Lines inside the `PIPELINE graphics pipeline` block
    pub pipeline: String,
}

impl ScriptFragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a buffer whose contents live in a dump file
    pub fn declare_file_buffer(&mut self, name: &str, size: vk::DeviceSize, file_name: &str) -> Result<()> {
        writeln!(
            self.declarations,
            "BUFFER {} DATA_TYPE R8_UINT SIZE {} FILE BINARY {}",
            name, size, file_name
        )?;
        Ok(())
    }
}

/// Name of the script written for a draw call
pub fn script_file_name(prefix: &str, draw_call: u64) -> String {
    format!("{}_{}.amber", prefix, draw_call)
}

/// Name of the dump file holding buffer `buffer_name`
pub fn dump_file_name(prefix: &str, buffer_name: &str) -> String {
    format!("{}_{}.bin", prefix, buffer_name)
}

/// Amber keyword of a descriptor type in `BIND BUFFER ... AS <keyword>`
pub fn descriptor_type_keyword(descriptor_type: vk::DescriptorType) -> Result<&'static str> {
    let keyword = match descriptor_type {
        vk::DescriptorType::COMBINED_IMAGE_SAMPLER => "combined_image_sampler",
        vk::DescriptorType::SAMPLED_IMAGE => "sampled_image",
        vk::DescriptorType::STORAGE_BUFFER => "storage",
        vk::DescriptorType::STORAGE_BUFFER_DYNAMIC => "storage_dynamic",
        vk::DescriptorType::STORAGE_IMAGE => "storage_image",
        vk::DescriptorType::STORAGE_TEXEL_BUFFER => "storage_texel_buffer",
        vk::DescriptorType::UNIFORM_BUFFER => "uniform",
        vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC => "uniform_dynamic",
        vk::DescriptorType::UNIFORM_TEXEL_BUFFER => "uniform_texel_buffer",
        other => scoop_bail!("amber_scoop::amber", Unsupported, "Descriptor type {:?}", other),
    };
    Ok(keyword)
}

/// Amber keyword of a vertex input rate
pub fn input_rate_keyword(input_rate: vk::VertexInputRate) -> Result<&'static str> {
    match input_rate {
        vk::VertexInputRate::VERTEX => Ok("vertex"),
        vk::VertexInputRate::INSTANCE => Ok("instance"),
        other => Err(scoop_err!("amber_scoop::amber", Unsupported, "Vertex input rate {:?}", other)),
    }
}

/// Draw parameters of the run command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawParams {
    pub first_index: u32,
    pub index_count: u32,
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub first_instance: u32,
    pub instance_count: u32,
}

impl DrawParams {
    /// Parameters of `vkCmdDraw`
    pub fn draw(vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> Self {
        Self {
            first_vertex,
            vertex_count,
            first_instance,
            instance_count,
            ..Self::default()
        }
    }

    /// Parameters of `vkCmdDrawIndexed`
    pub fn draw_indexed(index_count: u32, instance_count: u32, first_index: u32, first_instance: u32) -> Self {
        Self {
            first_index,
            index_count,
            first_instance,
            instance_count,
            ..Self::default()
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }
}

/// `RUN pipeline DRAW_ARRAY ...` line, without the trailing newline
pub fn run_command(params: &DrawParams) -> String {
    let mut command = format!("RUN pipeline DRAW_ARRAY AS {}", TOPOLOGY);
    if params.is_indexed() {
        command.push_str(&format!(" INDEXED START_IDX {} COUNT {}", params.first_index, params.index_count));
    }
    if params.instance_count > 0 {
        command.push_str(&format!(
            " START_INSTANCE {} INSTANCE_COUNT {}",
            params.first_instance, params.instance_count
        ));
    }
    command
}

/// Assemble the complete script
///
/// `fragments.pipeline` holds the body of the pipeline block; the block
/// header, shader attachments and framebuffer lines are added here.
pub fn render_script(
    vertex_shader: &str,
    fragment_shader: &str,
    fragments: &ScriptFragments,
    params: &DrawParams,
) -> Result<String> {
    let mut script = String::new();

    writeln!(script, "#!amber")?;
    writeln!(script)?;
    writeln!(script, "SHADER vertex vertex_shader SPIRV-ASM")?;
    writeln!(script, "{}", vertex_shader)?;
    writeln!(script, "END")?;
    writeln!(script)?;
    writeln!(script, "SHADER fragment fragment_shader SPIRV-ASM")?;
    writeln!(script, "{}", fragment_shader)?;
    writeln!(script, "END")?;
    writeln!(script)?;

    script.push_str(&fragments.declarations);
    writeln!(script, "{}", FRAMEBUFFER_DECLARATION)?;
    writeln!(script)?;

    writeln!(script, "PIPELINE graphics pipeline")?;
    writeln!(script, "  ATTACH vertex_shader")?;
    writeln!(script, "  ATTACH fragment_shader")?;
    script.push_str(&fragments.pipeline);
    writeln!(script, "  BIND BUFFER framebuffer AS color LOCATION 0")?;
    writeln!(script, "END")?;
    writeln!(script)?;

    writeln!(script, "{}", run_command(params))?;
    Ok(script)
}

/// Create or truncate `path` and write `data` to it
pub fn write_data_to_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| scoop_err!("amber_scoop::amber", Io, "Unable to open file {}: {}", path.display(), e))?;
    file.write_all(data)
        .map_err(|e| scoop_err!("amber_scoop::amber", Io, "Unable to write file {}: {}", path.display(), e))?;
    file.flush()
        .map_err(|e| scoop_err!("amber_scoop::amber", Io, "Unable to flush file {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
#[path = "amber_script_tests.rs"]
mod tests;
