//! Record assembly from lines delivered in reverse order.
//!
//! The reverse reader hands lines newest-physical-first, so a multi-line
//! stack trace arrives tail before head: `#2 {main}`, `#1 ...`, `#0 ...`,
//! then the `PHP Fatal error` header that started the block. The
//! assembler buffers continuation-looking lines until a non-continuation
//! line claims them, then emits one completed record.

use crate::timestamp::parse_timestamp;
use crate::types::{LogRecord, Severity};
use regex::Regex;
use std::sync::OnceLock;

/// Message used for a synthetic record carrying orphaned frames.
pub const INCOMPLETE_ENTRY: &str = "<incomplete entry>";

fn continuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Numbered frames, a bare trace terminator, the interpreter's
        // "Stack trace:" marker, or an indented wrap line such as
        // "  thrown in /a.php on line 1".
        Regex::new(r"^(?:#\d+(?:\s.*)?|\{main\}|Stack trace:|\s+\S.*)$").unwrap()
    })
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").unwrap())
}

fn severity_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^php\s+(?:fatal error|parse error|warning|notice|deprecated)\s*:\s*")
            .unwrap()
    })
}

/// Stateful classifier converting reverse-ordered lines into records.
///
/// Pure (no I/O): feed one line at a time, collect zero-or-one completed
/// record per call, and [`flush`](RecordAssembler::flush) at end of
/// stream to drain frames that never found their header.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    /// Continuation lines seen since the last completed record, in
    /// arrival (file-reverse) order.
    pending_frames: Vec<String>,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line (newest-first order).
    ///
    /// Continuation lines are buffered and return `None`. Any other line
    /// completes a record, claiming the buffered frames: a line with a
    /// recognized bracketed-timestamp header parses into timestamp,
    /// severity and message; anything else degrades to an `Unknown`
    /// record with the whole line as its message. Never fails.
    pub fn feed(&mut self, line: &str) -> Option<LogRecord> {
        if continuation_regex().is_match(line) {
            self.pending_frames.push(line.to_string());
            return None;
        }
        Some(self.complete(line))
    }

    /// Drain any frames that never met a header line (the file's first
    /// physical line was mid-trace) as a synthetic `Unknown` record.
    pub fn flush(&mut self) -> Option<LogRecord> {
        if self.pending_frames.is_empty() {
            return None;
        }
        log::debug!(
            "flushing {} orphaned continuation lines",
            self.pending_frames.len()
        );
        Some(LogRecord {
            raw_text: String::new(),
            timestamp: None,
            severity: Severity::Unknown,
            message: INCOMPLETE_ENTRY.to_string(),
            stack_frames: self.take_frames(),
        })
    }

    /// Buffered frames restored to forward (file) order.
    fn take_frames(&mut self) -> Vec<String> {
        let mut frames = std::mem::take(&mut self.pending_frames);
        frames.reverse();
        frames
    }

    fn complete(&mut self, line: &str) -> LogRecord {
        let stack_frames = self.take_frames();

        if let Some(captures) = header_regex().captures(line) {
            let bracket = captures.get(1).map_or("", |m| m.as_str());
            if let Some(timestamp) = parse_timestamp(bracket) {
                let rest = captures.get(2).map_or("", |m| m.as_str());
                let severity = Severity::classify(rest);
                let message = severity_prefix_regex().replace(rest, "").into_owned();
                return LogRecord {
                    raw_text: line.to_string(),
                    timestamp: Some(timestamp),
                    severity,
                    message,
                    stack_frames,
                };
            }
        }

        // Foreign format: keep the line intact as its own record.
        LogRecord {
            raw_text: line.to_string(),
            timestamp: None,
            severity: Severity::Unknown,
            message: line.to_string(),
            stack_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Feed physical lines in reverse order, as the reader delivers them.
    fn assemble(lines: &[&str]) -> Vec<LogRecord> {
        let mut assembler = RecordAssembler::new();
        let mut records = Vec::new();
        for line in lines.iter().rev() {
            if let Some(record) = assembler.feed(line) {
                records.push(record);
            }
        }
        if let Some(record) = assembler.flush() {
            records.push(record);
        }
        records
    }

    #[test]
    fn reassembles_stack_trace_in_forward_order() {
        let records = assemble(&[
            "[01-Jan-2024 00:00:00 UTC] PHP Fatal error:  Uncaught Exception in /a.php:1",
            "#0 /a.php(1): foo()",
            "#1 {main}",
        ]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(
            record.stack_frames,
            vec!["#0 /a.php(1): foo()", "#1 {main}"]
        );
        assert_eq!(record.message, "Uncaught Exception in /a.php:1");
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn full_interpreter_trace_block_stays_one_record() {
        let records = assemble(&[
            "[01-Jan-2024 00:00:00 UTC] PHP Fatal error:  Uncaught Exception: boom in /a.php:3",
            "Stack trace:",
            "#0 /b.php(7): trigger()",
            "#1 {main}",
            "  thrown in /a.php on line 3",
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stack_frames.len(), 4);
        assert_eq!(records[0].stack_frames[0], "Stack trace:");
        assert_eq!(records[0].stack_frames[3], "  thrown in /a.php on line 3");
    }

    #[test]
    fn consecutive_headers_become_separate_records() {
        let records = assemble(&[
            "[01-Jan-2024 00:00:01 UTC] PHP Warning:  first",
            "[01-Jan-2024 00:00:02 UTC] PHP Notice:  second",
        ]);
        assert_eq!(records.len(), 2);
        // Newest first, matching physical reverse order.
        assert_eq!(records[0].severity, Severity::Notice);
        assert_eq!(records[0].message, "second");
        assert_eq!(records[1].severity, Severity::Warning);
        assert_eq!(records[1].message, "first");
    }

    #[test]
    fn orphaned_leading_frames_become_incomplete_entry() {
        let records = assemble(&["#3 {main}", "[01-Jan-2024 00:00:05 UTC] PHP Notice:  n"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity, Severity::Notice);

        let orphan = &records[1];
        assert_eq!(orphan.severity, Severity::Unknown);
        assert_eq!(orphan.message, INCOMPLETE_ENTRY);
        assert!(orphan.timestamp.is_none());
        assert_eq!(orphan.stack_frames, vec!["#3 {main}"]);
    }

    #[test]
    fn foreign_line_becomes_unknown_record() {
        let records = assemble(&["mod_fcgid: process exited"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Unknown);
        assert_eq!(records[0].message, "mod_fcgid: process exited");
        assert!(records[0].stack_frames.is_empty());
    }

    #[test]
    fn foreign_line_claims_frames_physically_below_it() {
        let records = assemble(&["garbage above a trace", "#0 foo()"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Unknown);
        assert_eq!(records[0].stack_frames, vec!["#0 foo()"]);
    }

    #[test]
    fn bracketed_non_timestamp_prefix_is_not_a_header() {
        let records = assemble(&["[client 10.0.0.1] denied by rule"]);
        assert_eq!(records.len(), 1);
        assert!(records[0].timestamp.is_none());
        assert_eq!(records[0].message, "[client 10.0.0.1] denied by rule");
    }

    #[test]
    fn raw_block_round_trips_the_original_lines() {
        let lines = [
            "[01-Jan-2024 00:00:00 UTC] PHP Fatal error:  Uncaught Exception in /a.php:1",
            "#0 /a.php(1): foo()",
            "#1 {main}",
        ];
        let records = assemble(&lines);
        assert_eq!(records[0].raw_block(), lines.join("\n"));
    }

    #[test]
    fn iso_header_variant_parses() {
        let records = assemble(&["[2024-01-15T10:30:00+00:00] PHP Deprecated:  old api"]);
        assert_eq!(records[0].severity, Severity::Deprecated);
        assert_eq!(records[0].message, "old api");
        assert!(records[0].timestamp.is_some());
    }

    #[test]
    fn flush_on_empty_assembler_is_none() {
        let mut assembler = RecordAssembler::new();
        assert!(assembler.flush().is_none());
        // Reusable after a flush.
        assert!(assembler.feed("#0 x").is_none());
        assert!(assembler.flush().is_some());
        assert!(assembler.flush().is_none());
    }
}
