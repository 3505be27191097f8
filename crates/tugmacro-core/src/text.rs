// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor and compiler output)
//! - Columns count Unicode scalar values, not bytes
//! - Byte offsets are **0-indexed**
//! - Line/column values of 0 are treated as 1

use crate::span::Span;

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds the content length, returns the position at the end
/// of the content.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

/// Convert 1-indexed line and column to a byte offset.
///
/// A column past the end of the line clamps to the line's end; a line past
/// the end of the content clamps to the content length.
pub fn position_to_byte_offset(content: &str, line: u32, col: u32) -> usize {
    let line = line.max(1);
    let col = col.max(1);

    let Some(start) = line_start_offset(content, line) else {
        return content.len();
    };

    let mut offset = start;
    for (current_col, ch) in (1u32..).zip(content[start..].chars()) {
        if current_col >= col || ch == '\n' {
            return offset;
        }
        offset += ch.len_utf8();
    }
    offset
}

/// Get the byte offset of the start of a 1-indexed line.
///
/// Returns `None` when the content has fewer lines.
pub fn line_start_offset(content: &str, line: u32) -> Option<usize> {
    if line == 0 {
        return None;
    }
    if line == 1 {
        return Some(0);
    }

    let mut current_line = 1u32;
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            current_line += 1;
            if current_line == line {
                return Some(i + 1);
            }
        }
    }
    None
}

/// The 1-indexed line range `(first, last)` a span touches.
pub fn span_to_line_range(content: &str, span: &Span) -> (u32, u32) {
    let (start_line, _) = byte_offset_to_position(content, span.start as usize);
    let last = span.end.saturating_sub(1).max(span.start) as usize;
    let (end_line, _) = byte_offset_to_position(content, last);
    (start_line, end_line)
}

/// Extract the text covered by a span.
///
/// Returns `None` if the span extends beyond the content or splits a character.
pub fn extract_span<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.range())
}

/// Count the number of lines in the content.
pub fn line_count(content: &str) -> u32 {
    let newlines = content.bytes().filter(|&b| b == b'\n').count() as u32;
    if content.is_empty() {
        0
    } else if content.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}
