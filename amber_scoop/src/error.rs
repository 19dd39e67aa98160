//! Error types for Amber Scoop
//!
//! This module defines the error types used throughout the capture layer,
//! including binding-state contract violations, unsupported Vulkan values,
//! registry lookups and output file failures.

use std::fmt;

/// Result type for Amber Scoop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Amber Scoop errors
///
/// Every variant except `InvalidSettings` is a contract violation: the layer
/// entry points treat it as fatal (see `Layer::fatal`).
#[derive(Debug, Clone)]
pub enum Error {
    /// A binding required by the draw call was never recorded
    /// (pipeline, render pass, vertex buffer slot, dynamic offsets, shader stage)
    MissingBinding(String),

    /// Handle not present in a device registry
    InvalidHandle(String),

    /// Captured resource is malformed or inconsistent with the bound state
    InvalidResource(String),

    /// Enum value outside the set this layer can express in Amber
    /// (shader stage, index type, input rate, format, descriptor type)
    Unsupported(String),

    /// The dynamic offset array does not match the dynamic descriptors being bound
    DynamicOffsetMismatch {
        /// Number of offsets the bound sets require
        expected: usize,
        /// Number of offsets supplied with the bind command
        supplied: usize,
    },

    /// Output file could not be created or written
    Io(String),

    /// Backend error (Vulkan call, GPU allocation, external tool)
    BackendError(String),

    /// Capture settings could not be parsed
    InvalidSettings(String),

    /// Script text could not be formatted
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingBinding(msg) => write!(f, "Missing binding: {}", msg),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::DynamicOffsetMismatch { expected, supplied } => write!(
                f,
                "Dynamic offset mismatch: bound sets require {} offsets, {} supplied",
                expected, supplied
            ),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidSettings(msg) => write!(f, "Invalid settings: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::Serialization(error.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
