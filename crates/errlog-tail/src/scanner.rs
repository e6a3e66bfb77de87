//! Byte-level reverse scanner.
//!
//! The positioning primitive under the reverse reader: given an open
//! seekable file and an anchor offset, locate the line immediately
//! preceding that offset and recover its text with a single forward read.
//! It performs no classification and keeps no state between calls.

use crate::error::TailError;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

/// Result of one backward positioning step.
#[derive(Debug, Clone)]
pub struct ScanStep {
    /// The recovered line, without its trailing `\n` (or `\r\n`).
    pub line: String,
    /// Byte offset where the recovered line starts. The next backward
    /// search anchors here.
    pub anchor: u64,
    /// True once the recovered line is the first line of the file.
    pub at_start: bool,
}

/// Find the line immediately preceding `anchor`.
///
/// Walks backward one byte at a time from `anchor` until a `\n` boundary
/// is found or the beginning of the file is reached, then performs a
/// single forward line read from the boundary. The boundary byte itself is
/// never part of the returned line.
///
/// `anchor` is the exclusive end of the not-yet-visited region: pass the
/// file length for the first step, then the `anchor` of each returned
/// [`ScanStep`] for the following ones.
///
/// # Errors
///
/// Returns [`TailError::EmptyFile`] for a zero-byte file, or
/// [`TailError::Io`] if a seek or read fails mid-walk.
pub fn find_previous_line(file: &mut File, anchor: u64) -> Result<ScanStep, TailError> {
    let len = file.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Err(TailError::EmptyFile);
    }
    if anchor == 0 {
        // Nothing left before the anchor.
        return Ok(ScanStep {
            line: String::new(),
            anchor: 0,
            at_start: true,
        });
    }

    let anchor = anchor.min(len);

    // The byte right before the anchor is this line's own terminator when
    // present; skip it so the boundary search finds the *previous* `\n`.
    let mut end = anchor;
    if byte_at(file, end - 1)? == b'\n' {
        end -= 1;
    }

    // Walk backward until the terminator of the line above, or offset 0.
    let mut start = 0u64;
    let mut at_start = true;
    let mut pos = end;
    while pos > 0 {
        if byte_at(file, pos - 1)? == b'\n' {
            start = pos;
            at_start = false;
            break;
        }
        pos -= 1;
    }

    // Forward read recovers the content without buffering the whole file.
    file.seek(SeekFrom::Start(start))?;
    let mut raw = Vec::new();
    BufReader::new(&mut *file).read_until(b'\n', &mut raw)?;
    let mut line = String::from_utf8_lossy(&raw).into_owned();
    if line.ends_with('\n') {
        line.pop();
    }
    if line.ends_with('\r') {
        line.pop();
    }

    Ok(ScanStep {
        line,
        anchor: start,
        at_start,
    })
}

fn byte_at(file: &mut File, offset: u64) -> Result<u8, TailError> {
    let mut byte = [0u8; 1];
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(&mut byte)?;
    Ok(byte[0])
}
