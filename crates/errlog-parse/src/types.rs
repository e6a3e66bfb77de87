//! Record model for parsed error-log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed log entry.
///
/// Created transiently per read request; never persisted by this crate.
/// Parsing is lossless for display purposes: even when `timestamp` or
/// `severity` fail to parse, `raw_text` and `stack_frames` retain the
/// original lines verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Original unparsed header line, retained for fallback display.
    pub raw_text: String,

    /// Timestamp parsed from a recognized bracketed prefix, if any.
    pub timestamp: Option<DateTime<Utc>>,

    /// Severity derived from keywords in the line.
    pub severity: Severity,

    /// Text after stripping the timestamp/severity prefix.
    pub message: String,

    /// Continuation lines belonging to this record, in forward order.
    pub stack_frames: Vec<String>,
}

impl LogRecord {
    /// Reassemble the full multi-line text of this record as it appeared
    /// in the file (header line followed by its continuation lines).
    pub fn raw_block(&self) -> String {
        let mut out = self.raw_text.clone();
        for frame in &self.stack_frames {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(frame);
        }
        out
    }

    /// True when this record carries a stack trace.
    pub fn has_stack_trace(&self) -> bool {
        !self.stack_frames.is_empty()
    }
}

/// Normalised severity of a log entry.
///
/// Derived from the interpreter's keyword (`PHP Fatal error`, `PHP
/// Warning`, ...) by case-insensitive substring match; anything
/// unrecognized maps to `Unknown` rather than failing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Severity {
    Error,
    ParseError,
    Warning,
    Notice,
    Deprecated,
    Success,
    #[default]
    Unknown,
}

impl Severity {
    /// Map a header line's text to a severity.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("fatal error") {
            Severity::Error
        } else if lower.contains("parse error") {
            Severity::ParseError
        } else if lower.contains("warning") {
            Severity::Warning
        } else if lower.contains("notice") {
            Severity::Notice
        } else if lower.contains("deprecated") {
            Severity::Deprecated
        } else if lower.contains("success") {
            Severity::Success
        } else {
            Severity::Unknown
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::ParseError => "Parse error",
            Severity::Warning => "Warning",
            Severity::Notice => "Notice",
            Severity::Deprecated => "Deprecated",
            Severity::Success => "Success",
            Severity::Unknown => "Unknown",
        }
    }

    /// Short label for compact display (e.g. table columns).
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Error => "ERR",
            Severity::ParseError => "PARSE",
            Severity::Warning => "WARN",
            Severity::Notice => "NOTE",
            Severity::Deprecated => "DEPR",
            Severity::Success => "OK",
            Severity::Unknown => "???",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
