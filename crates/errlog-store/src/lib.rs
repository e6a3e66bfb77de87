//! Log store facade over a webserver error log
//!
//! Ties the reverse line reader ([`errlog_tail`]) and the record
//! classifier ([`errlog_parse`]) together against the real filesystem:
//! autodetecting the active log file, fetching the last N records, and
//! truncating the file while preserving its most recent tail.
//!
//! All operations are synchronous blocking I/O and run to completion
//! within one call; the crate takes no file locks (see the rotation
//! docs for the concurrency contract).
//!
//! # Example
//!
//! ```no_run
//! use errlog_store::{EnvVarRuntime, LogStore, StoreConfig};
//!
//! let mut store = LogStore::new(EnvVarRuntime, StoreConfig::default());
//! let path = store.autodetect()?;
//! for record in store.get_last_records(&path, 20)? {
//!     println!("[{}] {}", record.severity, record.message);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod detect;
mod env;
mod error;
mod rotate;
mod store;

pub use config::StoreConfig;
pub use detect::LogUnavailable;
pub use env::{EnvVarRuntime, RuntimeEnv, StaticRuntime, ERROR_LOG_VAR, LOG_ERRORS_VAR};
pub use error::StoreError;
pub use rotate::RotationOutcome;
pub use store::LogStore;

// Re-exported so facade consumers need not depend on the leaf crates.
pub use errlog_parse::{LogRecord, Severity};
