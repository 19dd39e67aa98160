//! Unit tests for error.rs
//!
//! Tests Error variants and their Display, Debug, Clone and conversion impls.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_missing_binding_display() {
    let err = Error::MissingBinding("No graphics pipeline bound".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Missing binding"));
    assert!(display.contains("No graphics pipeline bound"));
}

#[test]
fn test_unsupported_display() {
    let err = Error::Unsupported("Index type UINT8_EXT".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Unsupported"));
    assert!(display.contains("UINT8_EXT"));
}

#[test]
fn test_dynamic_offset_mismatch_display() {
    let err = Error::DynamicOffsetMismatch { expected: 3, supplied: 2 };
    assert_eq!(
        format!("{}", err),
        "Dynamic offset mismatch: bound sets require 3 offsets, 2 supplied"
    );
}

#[test]
fn test_io_display() {
    let err = Error::Io("Unable to open file: /nonexistent/out_0.amber".to_string());
    let display = format!("{}", err);
    assert!(display.contains("I/O error"));
    assert!(display.contains("out_0.amber"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidHandle("VkBuffer 0x10".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::InvalidResource("test".to_string()));
    assert!(debug.contains("InvalidResource"));

    let debug = format!("{:?}", Error::DynamicOffsetMismatch { expected: 1, supplied: 0 });
    assert!(debug.contains("DynamicOffsetMismatch"));
    assert!(debug.contains("expected: 1"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::BackendError("vkQueueSubmit failed".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

#[test]
fn test_from_fmt_error() {
    let err: Error = std::fmt::Error.into();
    assert!(matches!(err, Error::Serialization(_)));
}

// ============================================================================
// ERROR PROPAGATION TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<u64> {
        Err(Error::MissingBinding("render pass".to_string()))
    }

    fn outer() -> Result<u64> {
        inner()?;
        Ok(42)
    }

    match outer() {
        Err(Error::MissingBinding(msg)) => assert_eq!(msg, "render pass"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_fmt_error_propagation_with_question_mark() {
    use std::fmt::Write;

    fn write_line(out: &mut String) -> Result<()> {
        writeln!(out, "BUFFER framebuffer FORMAT B8G8R8A8_UNORM")?;
        Ok(())
    }

    let mut out = String::new();
    write_line(&mut out).unwrap();
    assert_eq!(out, "BUFFER framebuffer FORMAT B8G8R8A8_UNORM\n");
}
