// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error type for the macro toolkit.
//!
//! Readers never fail: a reader applied to the wrong node kind yields `None`.
//! Everything that produces syntax (builders, templates, expansions) returns
//! [`MacroResult`], and failures travel as a [`MacroError`].
//!
//! ## Variants
//!
//! - **Template**: generated text did not parse as the requested node kind
//! - **ShapeMismatch**: an expansion was applied to the wrong declaration kind
//! - **Diagnostic**: a macro rejected its input with a user-facing diagnostic
//! - **Message**: anything else, as plain text

use thiserror::Error;
use tugmacro_syntax::{ParserError, SyntaxKind};

use crate::diagnostics::Diagnostic;

// ============================================================================
// Error Type
// ============================================================================

/// Failure raised while building or expanding syntax.
#[derive(Debug, Error)]
pub enum MacroError {
    /// Generated text did not parse as the node kind a builder asked for.
    #[error("generated {kind} does not parse: {source}")]
    Template {
        /// Entry rule the text was parsed with, e.g. `"decl"`.
        kind: &'static str,
        /// The rendered text handed to the parser.
        text: String,
        source: ParserError,
    },

    /// A declaration had a different kind than the operation requires.
    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: SyntaxKind,
    },

    /// A macro rejected its input; the diagnostic carries the details.
    #[error("{}", .0.message())]
    Diagnostic(Box<Diagnostic>),

    #[error("{0}")]
    Message(String),
}

impl MacroError {
    /// Construct a plain message error.
    pub fn message(message: impl Into<String>) -> Self {
        MacroError::Message(message.into())
    }

    /// The rendered text behind a template failure.
    pub fn template_text(&self) -> Option<&str> {
        match self {
            MacroError::Template { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The diagnostic carried by a rejected expansion.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            MacroError::Diagnostic(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

impl From<Diagnostic> for MacroError {
    fn from(diagnostic: Diagnostic) -> Self {
        MacroError::Diagnostic(Box::new(diagnostic))
    }
}

/// Result alias used by every builder and expansion entry point.
pub type MacroResult<T> = Result<T, MacroError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::parse_decl;

    #[test]
    fn template_error_keeps_text_and_kind() {
        let source = parse_decl("struct {").unwrap_err();
        let err = MacroError::Template {
            kind: "decl",
            text: "struct {".to_string(),
            source,
        };
        assert_eq!(err.template_text(), Some("struct {"));
        assert!(err.to_string().starts_with("generated decl does not parse"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn shape_mismatch_names_both_kinds() {
        let err = MacroError::ShapeMismatch {
            expected: "declaration group",
            found: SyntaxKind::FunctionDecl,
        };
        assert_eq!(
            err.to_string(),
            "expected declaration group, found function_decl"
        );
    }

    #[test]
    fn message_error() {
        let err = MacroError::message("no stored properties");
        assert_eq!(err.to_string(), "no stored properties");
        assert!(err.template_text().is_none());
        assert!(err.diagnostic().is_none());
    }
}
