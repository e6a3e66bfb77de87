//! PHP-style error-log line classification
//!
//! Turns one physical log line (or a multi-line stack-trace block) into a
//! structured [`LogRecord`]: timestamp, severity, message and stack
//! frames. Input arrives in reverse order, as delivered by a reverse
//! line reader; the [`RecordAssembler`] re-associates continuation lines
//! with the header that logically owns them.
//!
//! The classifier never fails on unrecognized formats: malformed or
//! foreign lines degrade to `Unknown`-severity records so log display
//! can't abort on third-party noise.
//!
//! # Example
//!
//! ```
//! use errlog_parse::{RecordAssembler, Severity};
//!
//! let mut assembler = RecordAssembler::new();
//! // Lines are fed newest-physical-line-first.
//! assert!(assembler.feed("#0 {main}").is_none());
//! let record = assembler
//!     .feed("[01-Jan-2024 00:00:00 UTC] PHP Warning:  something odd")
//!     .expect("header completes the record");
//! assert_eq!(record.severity, Severity::Warning);
//! ```

mod classify;
mod timestamp;
mod types;

pub use classify::{RecordAssembler, INCOMPLETE_ENTRY};
pub use timestamp::parse_timestamp;
pub use types::{LogRecord, Severity};
