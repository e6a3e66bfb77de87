//! Truncate-and-keep-tail rotation.
//!
//! Rewrites the live log file down to its most recent records by staging
//! the retained tail in a same-directory temp file and committing with a
//! single atomic rename. The original file is never modified before the
//! rename, so any earlier failure leaves it byte-identical; the staging
//! file is removed on every failure path.
//!
//! The rotating process's own error logging is suppressed for the
//! duration, so the rotation cannot append into the file it is rotating.

use crate::env::RuntimeEnv;
use crate::error::StoreError;
use crate::store::LogStore;
use errlog_parse::RecordAssembler;
use errlog_tail::{read_from_end, Consume, LogSource, ReadOptions, TailError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// What a completed rotation kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    /// Records preserved (classifier-completed, incomplete tail included).
    pub records_kept: usize,
    /// Physical lines written back to the log.
    pub lines_kept: usize,
}

impl<E: RuntimeEnv> LogStore<E> {
    /// Truncate `path`, preserving the most recent `keep_count` records.
    ///
    /// Counts *records* as completed by the classifier; the underlying
    /// line scan is unbounded and stops with the record count or at the
    /// start of the file, whichever comes first. Blank lines are dropped
    /// from the retained tail as boundary-artifact cleanup.
    ///
    /// Not reentrant: concurrent calls against the same path must be
    /// serialized by the caller.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the path confirmation fails,
    /// [`StoreError::RotationFailed`] for any staging failure — in both
    /// cases the original file is untouched.
    pub fn truncate_and_keep_tail(
        &mut self,
        path: &Path,
        keep_count: usize,
    ) -> Result<RotationOutcome, StoreError> {
        // Confirm the current path before touching the logging flag:
        // the suppression below must not be what flips detection to
        // "disabled".
        let confirmed = self.autodetect()?;
        if confirmed != path {
            log::warn!(
                "rotation target {} differs from detected log {}",
                path.display(),
                confirmed.display()
            );
        }

        // Self-tailing guard: nothing we log between here and the
        // restore below may land in the file being rotated.
        let was_enabled = self.env.logging_enabled();
        self.env.set_logging_enabled(false);

        let result = self.rotate(path, keep_count);

        // Point logging back at the (now rotated) original name. A
        // failure here cannot lose data; the rename already committed.
        self.env.set_logging_enabled(was_enabled);
        self.env.set_log_path(path);

        if let Ok(outcome) = &result {
            log::info!(
                "rotated {}: kept {} records ({} lines)",
                path.display(),
                outcome.records_kept,
                outcome.lines_kept
            );
        }
        result
    }

    /// Truncate using the configured keep count.
    pub fn truncate_keeping_configured(&mut self, path: &Path) -> Result<RotationOutcome, StoreError> {
        let keep_count = self.config.keep_error_log_records_truncate;
        self.truncate_and_keep_tail(path, keep_count)
    }

    fn rotate(&mut self, path: &Path, keep_count: usize) -> Result<RotationOutcome, StoreError> {
        let rotation_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            StoreError::RotationFailed {
                path: path.to_path_buf(),
                source,
            }
        };

        // Staging file in the target's directory: the final rename must
        // stay on one filesystem to be atomic.
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).ok_or_else(|| {
            rotation_failed("log path has no parent directory".into())
        })?;
        let mut staging =
            NamedTempFile::new_in(dir).map_err(|err| rotation_failed(Box::new(err)))?;

        // Reverse pass: every visited line lands in the staging file
        // verbatim (newest first) while a parallel classifier counts
        // completed records.
        let mut records_kept = 0usize;
        let mut assembler = RecordAssembler::new();
        let scan = {
            let staged = staging.as_file_mut();
            read_from_end(LogSource::path(path), ReadOptions::default(), |line, _cursor| {
                if let Err(err) = writeln!(staged, "{line}") {
                    return Consume::StopWithError(err.to_string());
                }
                if assembler.feed(line).is_some() {
                    records_kept += 1;
                    if keep_count > 0 && records_kept >= keep_count {
                        return Consume::Stop;
                    }
                }
                Consume::Continue
            })
        };
        match scan {
            Ok(_) => {}
            // Nothing to rotate; the original is already empty.
            Err(TailError::EmptyFile) => {
                return Ok(RotationOutcome {
                    records_kept: 0,
                    lines_kept: 0,
                })
            }
            Err(source) => return Err(rotation_failed(Box::new(source))),
        }
        if assembler.flush().is_some() {
            records_kept += 1;
        }

        // Restore forward order, dropping blank boundary artifacts.
        let staged = std::fs::read_to_string(staging.path())
            .map_err(|err| rotation_failed(Box::new(err)))?;
        let mut lines: Vec<&str> = staged
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        lines.reverse();

        let rewrite = |file: &mut std::fs::File| -> std::io::Result<()> {
            use std::io::Seek;
            file.seek(std::io::SeekFrom::Start(0))?;
            file.set_len(0)?;
            for line in &lines {
                writeln!(file, "{line}")?;
            }
            file.flush()
        };
        rewrite(staging.as_file_mut()).map_err(|err| rotation_failed(Box::new(err)))?;

        // Single point of commit: once the rename lands, the rotation is
        // durable.
        staging
            .persist(path)
            .map_err(|err| rotation_failed(Box::new(err.error)))?;

        Ok(RotationOutcome {
            records_kept,
            lines_kept: lines.len(),
        })
    }
}
