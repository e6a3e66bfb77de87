//! Log file autodetection.
//!
//! Determines the effective log file path from the runtime environment
//! and verifies it is usable. Checks run in a fixed order and the first
//! failure wins, so a misconfigured log always surfaces as one specific,
//! actionable reason rather than a blank screen.

use crate::env::RuntimeEnv;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use thiserror::Error;

/// Why the error log cannot be read right now.
///
/// All variants are terminal for the current request; none are retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogUnavailable {
    /// The interpreter is not writing an error log.
    #[error("error logging is disabled in the runtime configuration")]
    LoggingDisabled,

    /// No log path is configured at all.
    #[error("no error log path is configured")]
    LogPathNotConfigured,

    /// Only absolute log paths are accepted.
    #[error("relative log paths are not supported: {}", .0.display())]
    RelativePathUnsupported(PathBuf),

    /// The configured path does not exist.
    #[error("log file does not exist: {}", .0.display())]
    FileMissing(PathBuf),

    /// The file exists but cannot be appended to.
    #[error("log file is not writable: {}", .0.display())]
    FileNotWritable(PathBuf),

    /// The file exists but cannot be opened for reading.
    #[error("log file is not readable: {}", .0.display())]
    FileNotReadable(PathBuf),
}

/// Run the detection checks against `env`.
///
/// `keep_reading` skips the logging-enabled gate, for installations that
/// want to inspect a log the interpreter is no longer writing to.
pub(crate) fn detect(
    env: &impl RuntimeEnv,
    keep_reading: bool,
) -> Result<PathBuf, LogUnavailable> {
    if !env.logging_enabled() && !keep_reading {
        return Err(LogUnavailable::LoggingDisabled);
    }

    let path = env
        .configured_log_path()
        .ok_or(LogUnavailable::LogPathNotConfigured)?;

    if path.is_relative() {
        return Err(LogUnavailable::RelativePathUnsupported(path));
    }
    if !path.exists() {
        return Err(LogUnavailable::FileMissing(path));
    }
    if OpenOptions::new().append(true).open(&path).is_err() {
        return Err(LogUnavailable::FileNotWritable(path));
    }
    if File::open(&path).is_err() {
        return Err(LogUnavailable::FileNotReadable(path));
    }

    log::debug!("autodetected error log at {}", path.display());
    Ok(path)
}

/// Memoized detection result.
///
/// The first determination (successful or failing) sticks for the
/// lifetime of the owning store unless explicitly reset. An owned value,
/// not process-wide state: independent stores carry independent caches.
#[derive(Debug, Default)]
pub(crate) struct DetectCache {
    result: Option<Result<PathBuf, LogUnavailable>>,
}

impl DetectCache {
    pub(crate) fn cached(&self) -> Option<Result<PathBuf, LogUnavailable>> {
        self.result.clone()
    }

    pub(crate) fn store(&mut self, result: Result<PathBuf, LogUnavailable>) {
        self.result = Some(result);
    }

    pub(crate) fn reset(&mut self) {
        self.result = None;
    }
}
