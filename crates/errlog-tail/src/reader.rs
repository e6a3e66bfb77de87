//! Reverse line reader.
//!
//! Drives the scanner in an explicit loop (never recursion, so a
//! multi-million-line file cannot exhaust the call stack), feeding each
//! recovered line to a caller-supplied consumer. Every consumed line is
//! also mirrored into a bounded scratch buffer for later bulk retrieval.

use crate::error::TailError;
use crate::scanner::find_previous_line;
use crate::source::LogSource;
use std::io::{Seek, SeekFrom};

/// Default byte cap for the scratch mirror (1 MiB).
pub const DEFAULT_MIRROR_CAP: usize = 1024 * 1024;

/// Mutable reverse-read position, owned by a single read invocation.
///
/// Returned in the [`ReadOutcome`] so a caller can resume a paged scan
/// exactly where the previous call stopped.
#[derive(Debug, Clone)]
pub struct ScanCursor {
    /// Absolute byte offset of the next backward-search anchor.
    pub offset: u64,
    /// Countdown of lines still allowed; `None` when unbounded.
    pub lines_remaining: Option<u64>,
    /// True once the scan has reached the start of the file.
    pub exhausted: bool,
}

/// What the consumer wants the reader to do after a line.
///
/// An explicit three-way signal; the reader never guesses at truthiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consume {
    /// Keep scanning toward the start of the file.
    Continue,
    /// Stop scanning; the read completed normally.
    Stop,
    /// Stop scanning and surface the message as [`TailError::ConsumerAborted`].
    StopWithError(String),
}

/// Options for [`read_from_end`].
#[derive(Debug, Default)]
pub struct ReadOptions {
    max_lines: u64,
    resume: Option<ScanCursor>,
    mirror_cap: Option<usize>,
}

impl ReadOptions {
    /// Cap the number of consumer invocations. `0` means unbounded.
    pub fn max_lines(mut self, max_lines: u64) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Resume from the cursor of a previous invocation instead of
    /// anchoring at end-of-file.
    pub fn resume(mut self, cursor: ScanCursor) -> Self {
        self.resume = Some(cursor);
        self
    }

    /// Override the scratch mirror's byte cap.
    pub fn mirror_cap(mut self, cap: usize) -> Self {
        self.mirror_cap = Some(cap);
        self
    }
}

/// Bounded scratch buffer mirroring every consumed line.
///
/// Lines are appended verbatim (with a restored `\n`) in the order they
/// are read, i.e. file-reverse order. Once the byte cap would be
/// exceeded the mirror saturates and silently stops accepting, keeping
/// the newest lines it already holds.
#[derive(Debug)]
pub struct ScratchMirror {
    buf: Vec<u8>,
    cap: usize,
    saturated: bool,
}

impl ScratchMirror {
    fn with_cap(cap: usize) -> Self {
        Self {
            buf: Vec::new(),
            cap,
            saturated: false,
        }
    }

    fn push_line(&mut self, line: &str) {
        if self.saturated || self.buf.len() + line.len() + 1 > self.cap {
            self.saturated = true;
            return;
        }
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.push(b'\n');
    }

    /// Raw mirrored bytes, newest line first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Mirrored lines in the order they were read (newest first).
    pub fn lines(&self) -> Vec<&str> {
        std::str::from_utf8(&self.buf)
            .unwrap_or("")
            .split_terminator('\n')
            .collect()
    }

    /// True if the byte cap stopped the mirror from accepting more lines.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}

/// Result of a [`read_from_end`] invocation.
#[derive(Debug)]
pub struct ReadOutcome {
    /// The cursor where the scan stopped; pass to [`ReadOptions::resume`]
    /// to continue.
    pub cursor: ScanCursor,
    /// The scratch mirror holding the consumed lines.
    pub mirror: ScratchMirror,
    /// Number of lines handed to the consumer.
    pub lines_read: u64,
}

/// Stream a file's lines from the end toward the beginning.
///
/// Opens the source (or takes over the supplied handle), anchors at
/// end-of-file unless a resume cursor is given, and invokes `consumer`
/// once per line until it returns [`Consume::Stop`], the `max_lines` cap
/// is spent, or the start of the file is reached. The handle is owned by
/// this call and dropped on every exit path.
///
/// # Errors
///
/// [`TailError::InvalidSource`] if a path source cannot be opened,
/// [`TailError::EmptyFile`] for a zero-byte file,
/// [`TailError::ConsumerAborted`] if the consumer stopped with an error,
/// or [`TailError::Io`] for seek/read failures.
pub fn read_from_end<C>(
    source: LogSource,
    options: ReadOptions,
    mut consumer: C,
) -> Result<ReadOutcome, TailError>
where
    C: FnMut(&str, &ScanCursor) -> Consume,
{
    let mut file = source.open()?;
    let len = file.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Err(TailError::EmptyFile);
    }

    let mut cursor = match options.resume {
        Some(cursor) => cursor,
        None => ScanCursor {
            offset: len,
            lines_remaining: (options.max_lines > 0).then_some(options.max_lines),
            exhausted: false,
        },
    };
    let mut mirror = ScratchMirror::with_cap(options.mirror_cap.unwrap_or(DEFAULT_MIRROR_CAP));
    let mut lines_read = 0u64;

    // Explicit loop over the mutable cursor; one scanner step per line.
    loop {
        if cursor.exhausted || cursor.offset == 0 {
            cursor.exhausted = true;
            break;
        }
        if cursor.lines_remaining == Some(0) {
            break;
        }

        let step = find_previous_line(&mut file, cursor.offset)?;
        cursor.offset = step.anchor;
        if step.at_start {
            cursor.exhausted = true;
        }
        if let Some(remaining) = cursor.lines_remaining.as_mut() {
            *remaining -= 1;
        }
        lines_read += 1;
        mirror.push_line(&step.line);

        match consumer(&step.line, &cursor) {
            Consume::Continue => {}
            Consume::Stop => break,
            Consume::StopWithError(message) => {
                return Err(TailError::ConsumerAborted(message));
            }
        }

        if cursor.exhausted {
            break;
        }
    }

    Ok(ReadOutcome {
        cursor,
        mirror,
        lines_read,
    })
}
