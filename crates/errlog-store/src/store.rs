//! The log store facade: autodetect, read, clear.
//!
//! Single entry point tying the reverse reader and the classifier
//! together against the real filesystem. One store instance owns its
//! runtime seam, its settings and its detection cache; independent
//! instances never share state.

use crate::config::StoreConfig;
use crate::detect::{detect, DetectCache, LogUnavailable};
use crate::env::RuntimeEnv;
use crate::error::StoreError;
use errlog_parse::{LogRecord, RecordAssembler};
use errlog_tail::{read_from_end, Consume, LogSource, ReadOptions, TailError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Facade over a webserver error log.
pub struct LogStore<E: RuntimeEnv> {
    pub(crate) env: E,
    pub(crate) config: StoreConfig,
    detection: DetectCache,
}

impl<E: RuntimeEnv> LogStore<E> {
    /// Create a store over the given runtime seam and settings.
    pub fn new(env: E, config: StoreConfig) -> Self {
        Self {
            env,
            config,
            detection: DetectCache::default(),
        }
    }

    /// The runtime seam this store consults.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The settings this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Determine the effective log file path.
    ///
    /// The first determination — successful or failing — is cached for
    /// the lifetime of this store; call [`reset_detection`](Self::reset_detection)
    /// to force a fresh run.
    pub fn autodetect(&mut self) -> Result<PathBuf, LogUnavailable> {
        if let Some(result) = self.detection.cached() {
            return result;
        }
        let result = detect(&self.env, self.config.keep_reading_error_log);
        self.detection.store(result.clone());
        result
    }

    /// Drop the memoized detection result.
    pub fn reset_detection(&mut self) {
        self.detection.reset();
    }

    /// Read the last `count` records from `path`, newest first.
    ///
    /// `count = 0` reads the whole file. The reverse read stops as soon
    /// as enough *records* (not lines) have been completed; an empty
    /// file yields an empty vec, not an error. Callers wanting
    /// chronological order reverse the result.
    pub fn get_last_records(
        &self,
        path: &Path,
        count: usize,
    ) -> Result<Vec<LogRecord>, StoreError> {
        let mut records = Vec::new();
        let mut assembler = RecordAssembler::new();

        let scan = read_from_end(
            LogSource::path(path),
            ReadOptions::default(),
            |line, _cursor| {
                if let Some(record) = assembler.feed(line) {
                    records.push(record);
                    if count > 0 && records.len() >= count {
                        return Consume::Stop;
                    }
                }
                Consume::Continue
            },
        );
        match scan {
            Ok(_) => {}
            Err(TailError::EmptyFile) => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        // The file's first line may have been mid-trace.
        if count == 0 || records.len() < count {
            if let Some(record) = assembler.flush() {
                records.push(record);
            }
        }

        log::debug!(
            "read {} records from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }

    /// Raw last-N-lines retrieval, parser bypassed, forward order.
    pub fn tail_text(&self, path: &Path, max_lines: u64) -> Result<String, StoreError> {
        let scan = read_from_end(
            LogSource::path(path),
            ReadOptions::default().max_lines(max_lines),
            |_line, _cursor| Consume::Continue,
        );
        match scan {
            Ok(outcome) => {
                let mut lines = outcome.mirror.lines();
                lines.reverse();
                Ok(lines.join("\n"))
            }
            Err(TailError::EmptyFile) => Ok(String::new()),
            Err(source) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Truncate the file to zero length in place.
    pub fn clear(&self, path: &Path) -> Result<(), StoreError> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map(drop)
            .map_err(|source| StoreError::Io {
                op: "clear",
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("cleared log {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticRuntime;
    use errlog_parse::Severity;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_for(env: StaticRuntime) -> LogStore<StaticRuntime> {
        LogStore::new(env, StoreConfig::default())
    }

    fn write_log(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("errors.log");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn autodetect_caches_first_result() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "x\n");

        let mut store = store_for(StaticRuntime::logging_to(&path));
        assert_eq!(store.autodetect(), Ok(path.clone()));

        // Flip the seam; the cached determination sticks until reset.
        store.env.enabled = false;
        assert_eq!(store.autodetect(), Ok(path));

        store.reset_detection();
        assert_eq!(store.autodetect(), Err(LogUnavailable::LoggingDisabled));
    }

    #[test]
    fn keep_reading_setting_reaches_detection() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "x\n");

        let mut env = StaticRuntime::logging_to(&path);
        env.enabled = false;
        let mut store = LogStore::new(
            env,
            StoreConfig {
                keep_reading_error_log: true,
                ..StoreConfig::default()
            },
        );
        assert_eq!(store.autodetect(), Ok(path));
    }

    #[test]
    fn get_last_records_returns_newest_first() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "[01-Jan-2024 00:00:01 UTC] PHP Notice:  one\n\
             [01-Jan-2024 00:00:02 UTC] PHP Notice:  two\n\
             [01-Jan-2024 00:00:03 UTC] PHP Notice:  three\n",
        );

        let store = store_for(StaticRuntime::logging_to(&path));
        let records = store.get_last_records(&path, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "three");
        assert_eq!(records[1].message, "two");
    }

    #[test]
    fn count_zero_reads_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "[01-Jan-2024 00:00:01 UTC] PHP Warning:  a\nplain noise\n",
        );

        let store = store_for(StaticRuntime::logging_to(&path));
        let records = store.get_last_records(&path, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity, Severity::Unknown);
        assert_eq!(records[1].severity, Severity::Warning);
    }

    #[test]
    fn count_is_records_not_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "[01-Jan-2024 00:00:01 UTC] PHP Notice:  older\n\
             [01-Jan-2024 00:00:02 UTC] PHP Fatal error:  Uncaught Exception in /a.php:1\n\
             #0 /a.php(1): foo()\n\
             #1 {main}\n",
        );

        let store = store_for(StaticRuntime::logging_to(&path));
        let records = store.get_last_records(&path, 1).unwrap();
        // Three physical lines consumed, one record returned.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(
            records[0].stack_frames,
            vec!["#0 /a.php(1): foo()", "#1 {main}"]
        );
    }

    #[test]
    fn single_line_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "PHP Warning: x");

        let store = store_for(StaticRuntime::logging_to(&path));
        let records = store.get_last_records(&path, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].message.contains('x'));
    }

    #[test]
    fn empty_file_yields_no_records() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "");

        let store = store_for(StaticRuntime::logging_to(&path));
        assert!(store.get_last_records(&path, 5).unwrap().is_empty());
    }

    #[test]
    fn truncated_leading_trace_is_kept_as_incomplete_entry() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "#3 {main}\n[01-Jan-2024 00:00:05 UTC] PHP Notice:  after\n",
        );

        let store = store_for(StaticRuntime::logging_to(&path));
        let records = store.get_last_records(&path, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, errlog_parse::INCOMPLETE_ENTRY);
        assert_eq!(records[1].stack_frames, vec!["#3 {main}"]);
    }

    #[test]
    fn tail_text_is_forward_order_raw() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a\nb\nc\nd\n");

        let store = store_for(StaticRuntime::logging_to(&path));
        assert_eq!(store.tail_text(&path, 2).unwrap(), "c\nd");
        assert_eq!(store.tail_text(&path, 0).unwrap(), "a\nb\nc\nd");
    }

    #[test]
    fn clear_truncates_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a\nb\n");

        let store = store_for(StaticRuntime::logging_to(&path));
        store.clear(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn missing_file_surfaces_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.log");

        let store = store_for(StaticRuntime::logging_to(&path));
        assert!(matches!(
            store.get_last_records(&path, 1),
            Err(StoreError::Read { .. })
        ));
    }
}
