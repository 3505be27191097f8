// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for declaration-language source text.
//!
//! Tokenizing runs in two passes. The first pass scans characters into raw
//! tokens, emitting one raw token per operator character. The second pass
//! assembles operator characters into operator tokens:
//!
//! - `<` directly after an identifier opens a generic angle list when a
//!   bounded lookahead finds the matching `>` over type-like tokens. Those
//!   `<` and `>` characters become [`TokKind::LAngle`] / [`TokKind::RAngle`],
//!   so `Dictionary<String, Array<Int>>` does not produce a `>>` operator.
//! - A left-bound `?` (and `!` not followed by `=`) is split off as a postfix
//!   token: `value?.count`, `try?`, `Int?`.
//! - The remaining run is binary when bound on both sides or neither,
//!   prefix when bound only on the right, postfix when bound only on the left.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use memchr::{memchr, memchr2};
use thiserror::Error;
use tugmacro_core::Span;

/// Upper bound on the number of raw tokens a generic-list lookahead inspects.
const MAX_GENERIC_SCAN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokKind {
    /// Identifiers and keywords, including backticked names and `$0`.
    Identifier,
    Integer,
    Float,
    String,
    /// `( ) { } [ ] , : ; @ # . -> \`
    Punct,
    LAngle,
    RAngle,
    BinaryOperator,
    PrefixOperator,
    PostfixOperator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tok {
    pub kind: TokKind,
    pub text: String,
    pub span: Span,
    /// Whitespace or a comment precedes the token.
    pub space_before: bool,
    /// A line break precedes the token.
    pub newline_before: bool,
}

impl Tok {
    pub fn is_operator(&self) -> bool {
        matches!(
            self.kind,
            TokKind::BinaryOperator | TokKind::PrefixOperator | TokKind::PostfixOperator
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokError {
    #[error("unterminated string literal")]
    UnterminatedString { offset: usize },
    #[error("unterminated block comment")]
    UnterminatedComment { offset: usize },
    #[error("unexpected character {ch:?}")]
    UnexpectedChar { ch: char, offset: usize },
}

impl TokError {
    /// Byte offset where the offending construct starts.
    pub fn offset(&self) -> usize {
        match self {
            TokError::UnterminatedString { offset }
            | TokError::UnterminatedComment { offset }
            | TokError::UnexpectedChar { offset, .. } => *offset,
        }
    }
}

/// Tokenize `source` into a vector of [`Tok`]s.
pub fn tokenize(source: &str) -> Result<Vec<Tok>, TokError> {
    let raw = RawLexer::new(source).lex()?;
    Ok(assemble(source, &raw))
}

// ============================================================================
// Pass 1: raw scanning
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Identifier,
    Integer,
    Float,
    String,
    Punct,
    OpChar,
}

#[derive(Debug, Clone, Copy)]
struct RawTok {
    kind: RawKind,
    start: usize,
    end: usize,
    space_before: bool,
    newline_before: bool,
}

struct RawLexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Vec<RawTok>,
    space: bool,
    newline: bool,
}

fn is_operator_byte(b: u8) -> bool {
    matches!(
        b,
        b'/' | b'=' | b'-' | b'+' | b'!' | b'*' | b'%' | b'<' | b'>' | b'&' | b'|' | b'^' | b'~'
            | b'?'
    )
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}

impl<'a> RawLexer<'a> {
    fn new(src: &'a str) -> Self {
        RawLexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            out: Vec::new(),
            // The first token is treated as preceded by whitespace so it is
            // never left-bound.
            space: true,
            newline: true,
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: RawKind, start: usize, end: usize) {
        self.out.push(RawTok {
            kind,
            start,
            end,
            space_before: self.space,
            newline_before: self.newline,
        });
        self.space = false;
        self.newline = false;
        self.pos = end;
    }

    fn lex(mut self) -> Result<Vec<RawTok>, TokError> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let b = self.bytes[start];
            match b {
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    self.pos += 1;
                    self.space = true;
                }
                b'\n' => {
                    self.pos += 1;
                    self.space = true;
                    self.newline = true;
                }
                b'/' if self.peek(1) == Some(b'/') => {
                    self.pos = match memchr(b'\n', &self.bytes[start..]) {
                        Some(i) => start + i,
                        None => self.bytes.len(),
                    };
                    self.space = true;
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.skip_block_comment()?;
                    self.space = true;
                }
                b'"' => {
                    let end = self.scan_string(start, 0)?;
                    self.push(RawKind::String, start, end);
                }
                b'#' if self.raw_string_hashes().is_some() => {
                    let hashes = self.raw_string_hashes().unwrap_or(0);
                    let end = self.scan_string(start + hashes, hashes)?;
                    self.push(RawKind::String, start, end);
                }
                b'`' => {
                    let rest = &self.bytes[start + 1..];
                    match memchr2(b'`', b'\n', rest) {
                        Some(i) if rest[i] == b'`' && i > 0 => {
                            self.push(RawKind::Identifier, start, start + i + 2)
                        }
                        _ => return Err(TokError::UnexpectedChar { ch: '`', offset: start }),
                    }
                }
                b'0'..=b'9' => {
                    let after_dot = self.out.last().is_some_and(|prev| {
                        prev.kind == RawKind::Punct && &self.src[prev.start..prev.end] == "."
                    });
                    let (kind, end) = self.scan_number(start, after_dot);
                    self.push(kind, start, end);
                }
                b'-' if self.peek(1) == Some(b'>') => self.push(RawKind::Punct, start, start + 2),
                b'.' if self.peek(1) == Some(b'.') => {
                    // A dot run like `...` or `..<`; each dot is an operator char.
                    let mut i = start;
                    while self.bytes.get(i) == Some(&b'.') {
                        self.push(RawKind::OpChar, i, i + 1);
                        i += 1;
                    }
                }
                b'(' | b')' | b'{' | b'}' | b'[' | b']' | b',' | b':' | b';' | b'@' | b'#'
                | b'.' | b'\\' => self.push(RawKind::Punct, start, start + 1),
                b if is_operator_byte(b) => self.push(RawKind::OpChar, start, start + 1),
                _ => {
                    let ch = self.src[start..].chars().next().unwrap_or('\u{fffd}');
                    if !is_identifier_start(ch) {
                        return Err(TokError::UnexpectedChar { ch, offset: start });
                    }
                    let len: usize = self.src[start..]
                        .chars()
                        .take_while(|c| is_identifier_continue(*c))
                        .map(char::len_utf8)
                        .sum();
                    self.push(RawKind::Identifier, start, start + len);
                }
            }
        }
        Ok(self.out)
    }

    fn skip_block_comment(&mut self) -> Result<(), TokError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut i = start;
        loop {
            let Some(found) = memchr2(b'/', b'*', &self.bytes[i..]) else {
                return Err(TokError::UnterminatedComment { offset: start });
            };
            i += found;
            let next = self.bytes.get(i + 1).copied();
            if self.bytes[i] == b'/' && next == Some(b'*') {
                depth += 1;
                i += 2;
            } else if self.bytes[i] == b'*' && next == Some(b'/') {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    self.pos = i;
                    return Ok(());
                }
            } else {
                i += 1;
            }
        }
    }

    /// Number of leading `#`s when the cursor starts a raw string `#"..."#`.
    fn raw_string_hashes(&self) -> Option<usize> {
        let hashes = self.bytes[self.pos..]
            .iter()
            .take_while(|b| **b == b'#')
            .count();
        (self.bytes.get(self.pos + hashes) == Some(&b'"')).then_some(hashes)
    }

    /// Scan a string literal whose opening quote is at `start`. Returns the
    /// offset just past the closing delimiter.
    fn scan_string(&self, start: usize, hashes: usize) -> Result<usize, TokError> {
        let bytes = self.bytes;
        let multiline = bytes[start..].starts_with(b"\"\"\"");
        let mut closing: Vec<u8> = if multiline {
            b"\"\"\"".to_vec()
        } else {
            b"\"".to_vec()
        };
        closing.extend(std::iter::repeat_n(b'#', hashes));
        let escape_hashes: Vec<u8> = std::iter::repeat_n(b'#', hashes).collect();

        let mut i = start + if multiline { 3 } else { 1 };
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\\' && bytes[i + 1..].starts_with(&escape_hashes) {
                let after = i + 1 + hashes;
                if bytes.get(after) == Some(&b'(') {
                    i = self.scan_interpolation(after)?;
                } else {
                    i = after + 1;
                }
                continue;
            }
            if b == b'\n' && !multiline {
                break;
            }
            if bytes[i..].starts_with(&closing) {
                return Ok(i + closing.len());
            }
            i += 1;
        }
        Err(TokError::UnterminatedString { offset: start })
    }

    /// Scan `\( ... )` starting at the `(`. Returns the offset past `)`.
    fn scan_interpolation(&self, open: usize) -> Result<usize, TokError> {
        let bytes = self.bytes;
        let mut depth = 0usize;
        let mut i = open;
        while i < bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                b'"' => {
                    i = self.scan_string(i, 0)?;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        Err(TokError::UnterminatedString { offset: open })
    }

    fn scan_number(&self, start: usize, integer_only: bool) -> (RawKind, usize) {
        let bytes = self.bytes;
        let digits_from = |mut i: usize, hex: bool| {
            while i < bytes.len()
                && (bytes[i] == b'_'
                    || if hex {
                        bytes[i].is_ascii_hexdigit()
                    } else {
                        bytes[i].is_ascii_digit()
                    })
            {
                i += 1;
            }
            i
        };

        if bytes[start] == b'0' && matches!(bytes.get(start + 1), Some(b'x' | b'o' | b'b')) {
            return (RawKind::Integer, digits_from(start + 2, true));
        }

        let mut i = digits_from(start, false);
        if integer_only {
            return (RawKind::Integer, i);
        }
        let mut kind = RawKind::Integer;
        if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            kind = RawKind::Float;
            i = digits_from(i + 1, false);
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                kind = RawKind::Float;
                i = digits_from(j, false);
            }
        }
        (kind, i)
    }
}

// ============================================================================
// Pass 2: operator assembly
// ============================================================================

fn raw_text<'s>(source: &'s str, raw: &RawTok) -> &'s str {
    &source[raw.start..raw.end]
}

fn assemble(source: &str, raw: &[RawTok]) -> Vec<Tok> {
    let angles = find_generic_angles(source, raw);
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let r = &raw[i];
        let kind = match r.kind {
            RawKind::Identifier => Some(TokKind::Identifier),
            RawKind::Integer => Some(TokKind::Integer),
            RawKind::Float => Some(TokKind::Float),
            RawKind::String => Some(TokKind::String),
            RawKind::Punct => Some(TokKind::Punct),
            RawKind::OpChar if angles.contains(&i) => {
                if raw_text(source, r) == "<" {
                    Some(TokKind::LAngle)
                } else {
                    Some(TokKind::RAngle)
                }
            }
            RawKind::OpChar => None,
        };
        if let Some(kind) = kind {
            out.push(make_tok(source, kind, raw, i, i + 1));
            i += 1;
            continue;
        }

        let mut end = i + 1;
        while end < raw.len()
            && raw[end].kind == RawKind::OpChar
            && !raw[end].space_before
            && !angles.contains(&end)
        {
            end += 1;
        }
        emit_operator_run(source, raw, i, end, &mut out);
        i = end;
    }
    out
}

fn make_tok(source: &str, kind: TokKind, raw: &[RawTok], from: usize, to: usize) -> Tok {
    let first = &raw[from];
    let last = &raw[to - 1];
    Tok {
        kind,
        text: source[first.start..last.end].to_string(),
        span: Span::new(first.start as u64, last.end as u64),
        space_before: first.space_before,
        newline_before: first.newline_before,
    }
}

fn emit_operator_run(source: &str, raw: &[RawTok], start: usize, end: usize, out: &mut Vec<Tok>) {
    let mut k = start;
    while k < end {
        let left_bound = k > start || is_left_bound(source, raw, k);
        let first = raw_text(source, &raw[k]);
        let next_is_eq = k + 1 < end && raw_text(source, &raw[k + 1]) == "=";
        if left_bound && (first == "?" || (first == "!" && !next_is_eq)) {
            out.push(make_tok(source, TokKind::PostfixOperator, raw, k, k + 1));
            k += 1;
            continue;
        }
        let right_bound = is_right_bound(source, raw, end);
        let kind = match (left_bound, right_bound) {
            (true, false) => TokKind::PostfixOperator,
            (false, true) => TokKind::PrefixOperator,
            _ => TokKind::BinaryOperator,
        };
        out.push(make_tok(source, kind, raw, k, end));
        k = end;
    }
}

fn is_left_bound(source: &str, raw: &[RawTok], idx: usize) -> bool {
    if idx == 0 || raw[idx].space_before {
        return false;
    }
    let prev = &raw[idx - 1];
    !(prev.kind == RawKind::Punct
        && matches!(raw_text(source, prev), "(" | "[" | "{" | "," | ";" | ":"))
}

fn is_right_bound(source: &str, raw: &[RawTok], end: usize) -> bool {
    let Some(next) = raw.get(end) else {
        return false;
    };
    if next.space_before {
        return false;
    }
    !(next.kind == RawKind::Punct
        && matches!(raw_text(source, next), ")" | "]" | "}" | "," | ";" | ":"))
}

fn find_generic_angles(source: &str, raw: &[RawTok]) -> HashSet<usize> {
    let mut angles = HashSet::new();
    for i in 1..raw.len() {
        let opens = raw[i].kind == RawKind::OpChar
            && raw_text(source, &raw[i]) == "<"
            && !raw[i].space_before
            && raw[i - 1].kind == RawKind::Identifier
            && !angles.contains(&i);
        if opens {
            if let Some(found) = scan_generic_list(source, raw, i) {
                angles.extend(found);
            }
        }
    }
    angles
}

/// Starting at a `<`, look for the matching `>` over tokens that can appear
/// in a generic argument or parameter list. Returns the indices of every
/// angle character in the list on success.
fn scan_generic_list(source: &str, raw: &[RawTok], open: usize) -> Option<Vec<usize>> {
    let mut depth = 0usize;
    let mut marks = Vec::new();
    for (j, r) in raw.iter().enumerate().skip(open).take(MAX_GENERIC_SCAN) {
        let text = raw_text(source, r);
        match r.kind {
            RawKind::Identifier => {}
            RawKind::Punct if matches!(text, "." | "," | ":" | "(" | ")" | "[" | "]" | "->" | "@") => {}
            RawKind::OpChar => match text {
                "<" => {
                    depth += 1;
                    marks.push(j);
                }
                ">" => {
                    depth = depth.saturating_sub(1);
                    marks.push(j);
                    if depth == 0 {
                        return Some(marks);
                    }
                }
                "?" | "!" | "&" | "." => {}
                _ => return None,
            },
            _ => return None,
        }
    }
    None
}
