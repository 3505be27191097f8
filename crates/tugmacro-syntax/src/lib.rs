// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A parser, syntax tree, and code generator for declaration-oriented source.
//!
//! # Overview
//!
//! - **Parsing**: Parse source text into an owned syntax tree with
//!   [`parse_source_file`], or parse a single declaration, statement,
//!   expression, type or pattern with the matching `parse_*` function. Each
//!   entry point requires the whole input to be consumed as the requested
//!   node kind.
//! - **Code Generation**: Convert a tree back to canonical source with the
//!   [`Codegen`] trait.
//! - **Version Awareness**: Use [`LanguageVersion`] and [`ParseOptions`] to
//!   reject constructs newer than a target language version.
//!
//! # Quick Start
//!
//! ```
//! use tugmacro_syntax::{parse_decl, Codegen};
//!
//! let decl = parse_decl("struct Point { var x: Int }").expect("parse error");
//! assert_eq!(decl.to_source(), "struct Point {\n    var x: Int\n}");
//! ```
//!
//! # Version-Aware Parsing
//!
//! ```
//! use tugmacro_syntax::{parse_decl_with_options, LanguageVersion, ParseOptions, ParserError};
//!
//! let options = ParseOptions::new(LanguageVersion::V5_10);
//! let result = parse_decl_with_options("func f() throws(MyError) {}", options);
//! assert!(matches!(result, Err(ParserError::UnsupportedSyntax { .. })));
//! ```

use std::cmp::min;

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Language version gating for the parser.
pub mod version;
pub use version::{LanguageVersion, ParseOptions};

/// Visitor infrastructure for syntax tree traversal.
pub mod visitor;

/// Tokenizer for source text.
pub mod tokenizer;

/// Syntax tree node types.
pub mod nodes;
pub use nodes::*;

mod parser;
pub use parser::{ParserError, Result, TokLoc};

use parser::{parse_with, swift};
use tugmacro_core::text::{byte_offset_to_position, line_start_offset};
use visitor::{
    walk_decl, walk_expr, walk_pattern, walk_source_file, walk_stmt, walk_type, VisitResult,
    Visitor,
};

// ============================================================================
// Parsing functions
// ============================================================================

/// Tokenizes source text into a sequence of tokens.
///
/// This is a low-level function. Most users should use [`parse_source_file`]
/// instead.
///
/// # Errors
///
/// Returns a [`ParserError::TokenizerError`] if the source contains invalid
/// tokens.
pub fn tokenize(text: &str) -> Result<Vec<tokenizer::Tok>> {
    tokenizer::tokenize(text).map_err(|err| ParserError::TokenizerError(err, text.to_string()))
}

fn walk_all<T, V: Visitor>(
    visitor: &mut V,
    items: &[T],
    walk: fn(&mut V, &T) -> VisitResult,
) -> VisitResult {
    for item in items {
        if walk(visitor, item) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Parses a whole source file with the specified options.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::{parse_source_file_with_options, ParseOptions};
///
/// let file = parse_source_file_with_options("let x = 1\nprint(x)", ParseOptions::default())
///     .expect("parse error");
/// assert_eq!(file.statements.len(), 2);
/// ```
pub fn parse_source_file_with_options(source: &str, options: ParseOptions) -> Result<SourceFile> {
    parse_with(
        source,
        options,
        "source_file",
        swift::source_file,
        walk_source_file,
    )
}

/// Parses a whole source file in permissive mode.
pub fn parse_source_file(source: &str) -> Result<SourceFile> {
    parse_source_file_with_options(source, ParseOptions::default())
}

/// Parses exactly one declaration with the specified options.
pub fn parse_decl_with_options(source: &str, options: ParseOptions) -> Result<Decl> {
    parse_with(source, options, "decl", swift::single_decl, walk_decl)
}

/// Parses exactly one declaration in permissive mode.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::{parse_decl, Decl};
///
/// let decl = parse_decl("enum Direction { case north, south }").expect("parse error");
/// assert!(matches!(decl, Decl::Enum(_)));
/// ```
pub fn parse_decl(source: &str) -> Result<Decl> {
    parse_decl_with_options(source, ParseOptions::default())
}

/// Parses a sequence of member declarations with the specified options.
pub fn parse_members_with_options(source: &str, options: ParseOptions) -> Result<Vec<Decl>> {
    parse_with(source, options, "members", swift::member_list, |v, decls| {
        walk_all(v, decls, walk_decl)
    })
}

/// Parses a sequence of member declarations in permissive mode.
pub fn parse_members(source: &str) -> Result<Vec<Decl>> {
    parse_members_with_options(source, ParseOptions::default())
}

/// Parses exactly one statement with the specified options.
pub fn parse_stmt_with_options(source: &str, options: ParseOptions) -> Result<Stmt> {
    parse_with(source, options, "stmt", swift::single_stmt, walk_stmt)
}

/// Parses exactly one statement in permissive mode.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::{parse_stmt, Stmt};
///
/// let stmt = parse_stmt("guard let x else { return }").expect("parse error");
/// assert!(matches!(stmt, Stmt::Guard(_)));
/// ```
pub fn parse_stmt(source: &str) -> Result<Stmt> {
    parse_stmt_with_options(source, ParseOptions::default())
}

/// Parses a sequence of statements with the specified options.
pub fn parse_stmts_with_options(source: &str, options: ParseOptions) -> Result<Vec<Stmt>> {
    parse_with(source, options, "stmts", swift::statement_list, |v, stmts| {
        walk_all(v, stmts, walk_stmt)
    })
}

/// Parses a sequence of statements in permissive mode.
pub fn parse_stmts(source: &str) -> Result<Vec<Stmt>> {
    parse_stmts_with_options(source, ParseOptions::default())
}

/// Parses exactly one expression with the specified options.
pub fn parse_expr_with_options(source: &str, options: ParseOptions) -> Result<Expr> {
    parse_with(source, options, "expr", swift::single_expr, walk_expr)
}

/// Parses exactly one expression in permissive mode.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::{parse_expr, Expr};
///
/// let expr = parse_expr("1 + 2 * 3").expect("parse error");
/// assert!(matches!(expr, Expr::Binary(_)));
/// ```
pub fn parse_expr(source: &str) -> Result<Expr> {
    parse_expr_with_options(source, ParseOptions::default())
}

/// Parses exactly one type with the specified options.
pub fn parse_type_with_options(source: &str, options: ParseOptions) -> Result<TypeNode> {
    parse_with(source, options, "type", swift::single_type, walk_type)
}

/// Parses exactly one type in permissive mode.
pub fn parse_type(source: &str) -> Result<TypeNode> {
    parse_type_with_options(source, ParseOptions::default())
}

/// Parses exactly one pattern with the specified options.
pub fn parse_pattern_with_options(source: &str, options: ParseOptions) -> Result<Pattern> {
    parse_with(source, options, "pattern", swift::single_pattern, walk_pattern)
}

/// Parses exactly one pattern in permissive mode.
pub fn parse_pattern(source: &str) -> Result<Pattern> {
    parse_pattern_with_options(source, ParseOptions::default())
}

// ============================================================================
// Error formatting
// ============================================================================

/// Returns the byte offset of the beginning of line `n` (1-indexed).
fn bol_offset(source: &str, n: u32) -> usize {
    if n <= 1 {
        return 0;
    }
    line_start_offset(source, n).unwrap_or(source.len())
}

/// Formats a parser error into a human-readable string with source context.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::{parse_decl, prettify_error};
///
/// let result = parse_decl("struct {");
/// if let Err(e) = result {
///     let formatted = prettify_error(e, "example.swift");
///     assert!(formatted.contains("example.swift"));
/// }
/// ```
pub fn prettify_error(err: ParserError, label: &str) -> String {
    match err {
        ParserError::ParserError(e, source) => {
            let message = format!("expected {} at {}", e.expected, e.location);
            annotate(&source, e.location.offset, label, &message)
        }
        ParserError::TokenizerError(e, source) => {
            let message = e.to_string();
            annotate(&source, e.offset(), label, &message)
        }
        e => format!("Parse error for {}: {}", label, e),
    }
}

fn annotate(source: &str, offset: usize, label: &str, message: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let offset = min(offset, source.len());
    let (line, _) = byte_offset_to_position(source, offset);
    let context = 1;
    let line_start = line.saturating_sub(context).max(1);
    let start_offset = bol_offset(source, line_start);
    let end_offset = bol_offset(source, line + context + 1);
    let snippet = &source[start_offset..end_offset];
    let start = offset - start_offset;
    let end = snippet[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    Renderer::plain()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(snippet)
                    .line_start(line_start as usize)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(message)]),
            ),
        )
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
