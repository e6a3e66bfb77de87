//! Facade error taxonomy.
//!
//! Nothing below the facade throws an unstructured error: filesystem and
//! parsing failures are recovered up to this boundary and converted into
//! the typed reasons here, each carrying enough context (path, operation)
//! for a precise user-facing message.

use crate::detect::LogUnavailable;
use errlog_tail::TailError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the log store facade.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Autodetection found the log disabled, unconfigured or unusable.
    #[error(transparent)]
    Unavailable(#[from] LogUnavailable),

    /// The reverse read over the log failed.
    #[error("failed to read log {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: TailError,
    },

    /// Rotation failed before its commit point; the original file is
    /// guaranteed untouched and the staging file has been removed.
    #[error("log rotation failed for {}; original left untouched", .path.display())]
    RotationFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An auxiliary filesystem operation failed.
    #[error("{op} failed for {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
