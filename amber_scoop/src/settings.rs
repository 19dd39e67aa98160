/// Capture settings - output naming and the draw-call capture window

use crate::error::{Error, Result};

/// Environment variable holding the output file prefix
pub const OUTPUT_FILE_PREFIX_VAR: &str = "AMBER_SCOOP_OUTPUT_FILE_PREFIX";
/// Environment variable holding the first captured draw call
pub const START_DRAW_CALL_VAR: &str = "AMBER_SCOOP_START_DRAW_CALL";
/// Environment variable holding the last captured draw call
pub const LAST_DRAW_CALL_VAR: &str = "AMBER_SCOOP_LAST_DRAW_CALL";

/// Read-only capture configuration
///
/// Set up once before capture begins and shared through `CaptureSession`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prefix for every produced file (`<prefix>_<ordinal>.amber`, `<prefix>_<name>.bin`)
    pub output_file_prefix: String,
    /// First draw-call ordinal to capture (inclusive)
    pub start_draw_call: u64,
    /// Last draw-call ordinal to capture (inclusive)
    pub last_draw_call: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_file_prefix: "amber_scoop".to_string(),
            start_draw_call: 0,
            last_draw_call: 0,
        }
    }
}

impl Settings {
    /// Build settings for an explicit capture window
    pub fn new(output_file_prefix: impl Into<String>, start_draw_call: u64, last_draw_call: u64) -> Result<Self> {
        let settings = Self {
            output_file_prefix: output_file_prefix.into(),
            start_draw_call,
            last_draw_call,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the process environment
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let output_file_prefix = match lookup(OUTPUT_FILE_PREFIX_VAR) {
            Some(prefix) if prefix.is_empty() => {
                return Err(Error::InvalidSettings(format!("{} is empty", OUTPUT_FILE_PREFIX_VAR)));
            }
            Some(prefix) => prefix,
            None => defaults.output_file_prefix,
        };

        let start_draw_call = match lookup(START_DRAW_CALL_VAR) {
            Some(value) => parse_draw_call(START_DRAW_CALL_VAR, &value)?,
            None => defaults.start_draw_call,
        };

        let last_draw_call = match lookup(LAST_DRAW_CALL_VAR) {
            Some(value) => parse_draw_call(LAST_DRAW_CALL_VAR, &value)?,
            None => defaults.last_draw_call,
        };

        Self::new(output_file_prefix, start_draw_call, last_draw_call)
    }

    /// Whether the draw call with this ordinal falls inside the capture window
    pub fn captures(&self, draw_call: u64) -> bool {
        draw_call >= self.start_draw_call && draw_call <= self.last_draw_call
    }

    fn validate(&self) -> Result<()> {
        if self.start_draw_call > self.last_draw_call {
            return Err(Error::InvalidSettings(format!(
                "start draw call {} is after last draw call {}",
                self.start_draw_call, self.last_draw_call
            )));
        }
        Ok(())
    }
}

fn parse_draw_call(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| Error::InvalidSettings(format!("{}={:?}: {}", key, value, e)))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
