//! Reverse line reading for append-only log files
//!
//! A library for streaming the lines of a potentially multi-gigabyte log
//! file from its end toward its beginning, without loading the file into
//! memory. The scan anchors at the end-of-file offset captured when it
//! starts, so bytes appended concurrently by the running process are simply
//! never visited.
//!
//! # Example
//!
//! ```no_run
//! use errlog_tail::{read_from_end, Consume, LogSource, ReadOptions};
//!
//! let outcome = read_from_end(
//!     LogSource::path("/var/log/php-errors.log"),
//!     ReadOptions::default().max_lines(10),
//!     |line, _cursor| {
//!         println!("{line}");
//!         Consume::Continue
//!     },
//! )?;
//! println!("read {} lines", outcome.lines_read);
//! # Ok::<(), errlog_tail::TailError>(())
//! ```

mod error;
mod reader;
mod scanner;
mod source;

pub use error::TailError;
pub use reader::{read_from_end, Consume, ReadOptions, ReadOutcome, ScanCursor, ScratchMirror};
pub use scanner::{find_previous_line, ScanStep};
pub use source::LogSource;
