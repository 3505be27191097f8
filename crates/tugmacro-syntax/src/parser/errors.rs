// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::parser::grammar::TokVec;
use crate::tokenizer::TokError;
use crate::version::LanguageVersion;
use peg::Parse;
use thiserror::Error;
use tugmacro_core::Span;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {0}")]
    TokenizerError(TokError, String),
    #[error("parser error: {0}")]
    ParserError(peg::error::ParseError<<TokVec as Parse>::PositionRepr>, String),
    #[error("{feature} is not supported in language version {version}")]
    UnsupportedSyntax {
        feature: &'static str,
        version: LanguageVersion,
        span: Span,
    },
}

impl ParserError {
    /// Byte offset the error points at, when it refers to a location.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError(err, _) => err.offset(),
            ParserError::ParserError(err, _) => err.location.offset,
            ParserError::UnsupportedSyntax { span, .. } => span.start as usize,
        }
    }
}
