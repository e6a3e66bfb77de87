//! Tagged source for a reverse scan: a path to open, or a handle to reuse.

use crate::error::TailError;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where the reverse reader should read from.
///
/// Resolved exactly once at call entry. A `Path` variant is opened
/// read-only; a `Handle` variant is taken over as-is (the reader owns it
/// for the duration of the scan either way).
#[derive(Debug)]
pub enum LogSource {
    /// A filesystem path, opened read-only by the reader.
    Path(PathBuf),
    /// An already-open file handle.
    Handle(File),
}

impl LogSource {
    /// Convenience constructor for the `Path` variant.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        LogSource::Path(path.into())
    }

    /// Resolve the source into an open handle.
    ///
    /// A path that does not point at an existing regular file, or that
    /// cannot be opened for reading, is rejected as [`TailError::InvalidSource`]
    /// without any partial read attempt.
    pub(crate) fn open(self) -> Result<File, TailError> {
        match self {
            LogSource::Path(path) => {
                if !path.is_file() {
                    return Err(TailError::InvalidSource(path));
                }
                File::open(&path).map_err(|err| {
                    log::warn!("failed to open {}: {err}", path.display());
                    TailError::InvalidSource(path)
                })
            }
            LogSource::Handle(file) => Ok(file),
        }
    }
}

impl From<PathBuf> for LogSource {
    fn from(path: PathBuf) -> Self {
        LogSource::Path(path)
    }
}

impl From<&Path> for LogSource {
    fn from(path: &Path) -> Self {
        LogSource::Path(path.to_path_buf())
    }
}

impl From<File> for LogSource {
    fn from(file: File) -> Self {
        LogSource::Handle(file)
    }
}
