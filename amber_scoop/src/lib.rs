/*!
# Amber Scoop

Core types for the Amber Scoop draw-call capture layer.

This crate holds everything that does not depend on a graphics API: the
process-wide capture session (settings + draw-call counter), the concurrent
handle registries used to look up captured objects, the error type and the
logging system. The Vulkan capture engine lives in `amber_scoop_vulkan`.

## Architecture

- **Layer**: singleton holding the capture session and the logger
- **CaptureSession**: settings plus the atomic draw-call counter
- **Settings**: output prefix and inclusive capture window
- **HandleRegistry**: handle-keyed store shared by recording threads
*/

mod error;
mod layer;
mod registry;
mod session;
mod settings;
pub mod log;

// Main namespace module
pub mod scoop {
    // Error types
    pub use crate::error::{Error, Result};

    // Layer singleton
    pub use crate::layer::Layer;

    // Capture state
    pub use crate::session::{CaptureSession, DrawCallCounter};
    pub use crate::settings::{
        Settings, OUTPUT_FILE_PREFIX_VAR, START_DRAW_CALL_VAR, LAST_DRAW_CALL_VAR,
    };
    pub use crate::registry::HandleRegistry;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }
}
