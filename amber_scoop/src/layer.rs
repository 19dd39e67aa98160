/// Amber Scoop Layer - Singleton manager for the capture session and logger
///
/// Holds the process-wide `CaptureSession` (settings + draw-call counter) and
/// the logger behind thread-safe static storage.

use std::sync::{OnceLock, RwLock, Arc};
use std::time::SystemTime;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::session::CaptureSession;
use crate::settings::Settings;

// ===== INTERNAL STATE =====

/// Global layer state storage
static LAYER_STATE: OnceLock<LayerState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct LayerState {
    session: RwLock<Option<Arc<CaptureSession>>>,
}

impl LayerState {
    fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Layer singleton manager
///
/// # Example
///
/// ```no_run
/// use amber_scoop::scoop::{Layer, Settings};
///
/// Layer::initialize(Settings::from_env()?)?;
/// let session = Layer::session()?;
/// assert!(session.settings().captures(0));
/// Layer::shutdown();
/// # Ok::<(), amber_scoop::scoop::Error>(())
/// ```
pub struct Layer;

impl Layer {
    fn log_and_return_error(error: Error) -> Error {
        crate::scoop_error!("amber_scoop::Layer", "{}", error);
        error
    }

    /// Install the process-wide capture session
    ///
    /// # Errors
    ///
    /// Returns an error if a session already exists or the lock is poisoned.
    pub fn initialize(settings: Settings) -> Result<Arc<CaptureSession>> {
        let state = LAYER_STATE.get_or_init(LayerState::new);

        let mut lock = state.session.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Session lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::BackendError("Capture session already exists. Call Layer::shutdown() first.".to_string())
            ));
        }

        crate::scoop_info!(
            "amber_scoop::Layer",
            "Capturing draw calls {}..={} to {}_*.amber",
            settings.start_draw_call,
            settings.last_draw_call,
            settings.output_file_prefix
        );

        let session = Arc::new(CaptureSession::new(settings));
        *lock = Some(session.clone());
        Ok(session)
    }

    /// Get the process-wide capture session
    ///
    /// # Errors
    ///
    /// Returns an error if `initialize()` was not called.
    pub fn session() -> Result<Arc<CaptureSession>> {
        let state = LAYER_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::BackendError("Layer not initialized. Call Layer::initialize() first.".to_string())
            ))?;

        let lock = state.session.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Session lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::BackendError("Capture session not created. Call Layer::initialize() first.".to_string())
            ))
    }

    /// Drop the process-wide capture session
    ///
    /// Trackers holding the old session keep it alive until they are dropped.
    pub fn shutdown() {
        if let Some(state) = LAYER_STATE.get() {
            if let Ok(mut session) = state.session.write() {
                *session = None;
            }
        }
    }

    /// Report a contract violation and terminate the process
    ///
    /// No partial-output cleanup is performed.
    pub fn fatal(error: Error) -> ! {
        crate::scoop_error!("amber_scoop::Layer", "Fatal: {}", error);
        std::process::abort()
    }

    /// Unwrap a layer result, terminating the process on a contract violation
    pub fn or_fatal<T>(result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => Self::fatal(error),
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like scoop_info!, scoop_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}
