/// SPIR-V disassembly
///
/// `SpirvDisassembler` checks the module header and pipes the words through
/// the SPIRV-Tools `spirv-dis` executable.

use amber_scoop::scoop::Result;
use amber_scoop::{scoop_bail, scoop_err};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// First word of every SPIR-V module
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Newest SPIR-V 1.x minor version accepted
pub const SPIRV_MAX_MINOR_VERSION: u8 = 6;

/// SPIR-V words → assembly text
pub trait ShaderDisassembler: Send + Sync {
    fn disassemble(&self, code: &[u32]) -> Result<String>;
}

/// Read and check the `(major, minor)` version of a SPIR-V module
///
/// # Errors
///
/// `InvalidResource` for a truncated module or a bad magic number,
/// `Unsupported` for a version other than 1.0 to 1.6.
pub fn spirv_version(code: &[u32]) -> Result<(u8, u8)> {
    let (magic, version_word) = match code {
        [magic, version, ..] => (*magic, *version),
        _ => scoop_bail!(
            "amber_scoop::spirv",
            InvalidResource,
            "Shader module has {} words, too short for a SPIR-V header",
            code.len()
        ),
    };

    if magic != SPIRV_MAGIC {
        scoop_bail!("amber_scoop::spirv", InvalidResource, "Bad SPIR-V magic number {:#010x}", magic);
    }

    let major = ((version_word >> 16) & 0xff) as u8;
    let minor = ((version_word >> 8) & 0xff) as u8;

    if major != 1 {
        scoop_bail!("amber_scoop::spirv", Unsupported, "Unknown SPIR-V major version {}", major);
    }
    if minor > SPIRV_MAX_MINOR_VERSION {
        scoop_bail!("amber_scoop::spirv", Unsupported, "Unknown SPIR-V minor version {}", minor);
    }

    Ok((major, minor))
}

/// Disassembler backed by the `spirv-dis` command line tool
#[derive(Debug, Clone)]
pub struct SpirvDisassembler {
    executable: PathBuf,
}

impl SpirvDisassembler {
    /// Use `spirv-dis` from `PATH`
    pub fn new() -> Self {
        Self::with_executable("spirv-dis")
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &PathBuf {
        &self.executable
    }
}

impl Default for SpirvDisassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderDisassembler for SpirvDisassembler {
    fn disassemble(&self, code: &[u32]) -> Result<String> {
        spirv_version(code)?;

        let mut child = Command::new(&self.executable)
            .args(["-", "-o", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| scoop_err!("amber_scoop::spirv", BackendError, "Failed to run {}: {}", self.executable.display(), e))?;

        // spirv-dis reads all of stdin before writing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(bytemuck::cast_slice(code))
                .map_err(|e| scoop_err!("amber_scoop::spirv", BackendError, "Failed to feed {}: {}", self.executable.display(), e))?;
        }

        let output = child.wait_with_output()
            .map_err(|e| scoop_err!("amber_scoop::spirv", BackendError, "Failed to wait for {}: {}", self.executable.display(), e))?;

        if !output.status.success() {
            scoop_bail!(
                "amber_scoop::spirv",
                BackendError,
                "{} failed ({}): {}",
                self.executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout)
            .map(|text| text.trim_end().to_string())
            .map_err(|e| scoop_err!("amber_scoop::spirv", BackendError, "Disassembly is not UTF-8: {}", e))
    }
}

#[cfg(test)]
#[path = "disassembly_tests.rs"]
mod tests;
