/// CaptureSession - process-wide capture state shared by every recording context

use std::sync::atomic::{AtomicU64, Ordering};
use crate::settings::Settings;

/// Global draw-call counter
///
/// Incremented exactly once per observed draw event, captured or not.
/// Ordinals are unique and strictly increasing across threads.
#[derive(Debug, Default)]
pub struct DrawCallCounter {
    next: AtomicU64,
}

impl DrawCallCounter {
    /// Create a counter starting at ordinal 0
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Return the ordinal of the current draw call and advance the counter
    pub fn next_draw_call(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of draw calls observed so far
    pub fn observed(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

/// Capture session: read-only settings plus the draw-call counter
///
/// Created at layer initialization and shared by `Arc` with every tracker.
#[derive(Debug)]
pub struct CaptureSession {
    settings: Settings,
    draw_calls: DrawCallCounter,
}

impl CaptureSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            draw_calls: DrawCallCounter::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn draw_calls(&self) -> &DrawCallCounter {
        &self.draw_calls
    }

    /// Claim the next draw-call ordinal
    ///
    /// Returns the ordinal and whether it lies inside the capture window.
    pub fn claim_draw_call(&self) -> (u64, bool) {
        let draw_call = self.draw_calls.next_draw_call();
        (draw_call, self.settings.captures(draw_call))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
