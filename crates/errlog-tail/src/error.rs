//! Error type shared by the scanner and the reverse reader.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a log file backwards.
#[derive(Debug, Error)]
pub enum TailError {
    /// The file holds zero bytes; there is no previous line to find.
    #[error("log file is empty")]
    EmptyFile,

    /// The supplied source is neither an existing readable file nor an
    /// already-open handle.
    #[error("not a readable log source: {0}")]
    InvalidSource(PathBuf),

    /// The consumer callback requested an abort with an error message.
    #[error("consumer aborted the scan: {0}")]
    ConsumerAborted(String),

    /// An underlying seek/read failed mid-scan.
    #[error("I/O error while scanning log")]
    Io(#[from] std::io::Error),
}
