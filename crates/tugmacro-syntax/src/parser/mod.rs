// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod errors;
mod grammar;

pub use errors::ParserError;
pub use grammar::{TokLoc, TokVec};
pub(crate) use grammar::{swift, ParseCtx};

use peg::error::ParseError;
use tracing::{debug, trace};

use crate::nodes::{AttributedType, DeclModifier, GenericParameter, ThrowsClause, TypeNode};
use crate::tokenizer::tokenize;
use crate::version::{LanguageVersion, ParseOptions};
use crate::visitor::{VisitResult, Visitor};
use tugmacro_core::Span;

pub type Result<T> = std::result::Result<T, ParserError>;

/// Tokenize `source`, run one grammar entry rule over the tokens, then check
/// the result against the requested language version.
pub(crate) fn parse_with<T>(
    source: &str,
    options: ParseOptions,
    entry: &'static str,
    rule: impl FnOnce(&TokVec, &ParseCtx) -> std::result::Result<T, ParseError<TokLoc>>,
    validate: impl FnOnce(&mut VersionValidator, &T) -> VisitResult,
) -> Result<T> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tokens =
        tokenize(source).map_err(|err| ParserError::TokenizerError(err, source.to_string()))?;
    debug!(
        entry,
        bytes = source.len(),
        tokens = tokens.len(),
        version = %options.version,
        "parsing"
    );
    let ctx = ParseCtx::new(&tokens, source.len());
    let tokvec = TokVec::new(tokens, source);
    let node = rule(&tokvec, &ctx).map_err(|err| {
        debug!(entry, location = %err.location, expected = %err.expected, "parse failed");
        ParserError::ParserError(err, source.to_string())
    })?;
    trace!(entry, ids = ctx.ids_issued(), "parsed");

    let mut validator = VersionValidator::new(options.version);
    validate(&mut validator, &node);
    match validator.violation {
        Some(err) => Err(err),
        None => Ok(node),
    }
}

/// Walks a parsed tree and records the first construct the selected
/// [`LanguageVersion`] does not support.
pub(crate) struct VersionValidator {
    version: LanguageVersion,
    violation: Option<ParserError>,
}

impl VersionValidator {
    fn new(version: LanguageVersion) -> Self {
        VersionValidator {
            version,
            violation: None,
        }
    }

    fn check(&mut self, supported: bool, feature: &'static str, span: Span) -> VisitResult {
        if supported {
            return VisitResult::Continue;
        }
        self.violation = Some(ParserError::UnsupportedSyntax {
            feature,
            version: self.version,
            span,
        });
        VisitResult::Stop
    }

    fn check_specifiers(&mut self, node: &AttributedType) -> VisitResult {
        for specifier in &node.specifiers {
            let result = match specifier.text.as_str() {
                "borrowing" | "consuming" => self.check(
                    self.version.has_ownership_modifiers(),
                    "ownership specifiers",
                    specifier.span,
                ),
                "sending" => self.check(self.version.has_sending(), "`sending`", specifier.span),
                _ => VisitResult::Continue,
            };
            if result == VisitResult::Stop {
                return result;
            }
        }
        VisitResult::Continue
    }
}

impl Visitor for VersionValidator {
    fn visit_throws_clause(&mut self, node: &ThrowsClause) -> VisitResult {
        self.check(
            node.error_type.is_none() || self.version.has_typed_throws(),
            "typed throws",
            node.span,
        )
    }

    fn visit_generic_parameter(&mut self, node: &GenericParameter) -> VisitResult {
        match &node.each_keyword {
            Some(each) => self.check(
                self.version.has_parameter_packs(),
                "parameter packs",
                each.span,
            ),
            None => VisitResult::Continue,
        }
    }

    fn visit_modifier(&mut self, node: &DeclModifier) -> VisitResult {
        match node.name.text.as_str() {
            "package" => self.check(
                self.version.has_package_access(),
                "`package` access",
                node.span,
            ),
            "borrowing" | "consuming" => self.check(
                self.version.has_ownership_modifiers(),
                "ownership modifiers",
                node.span,
            ),
            _ => VisitResult::Continue,
        }
    }

    fn visit_type_node(&mut self, node: &TypeNode) -> VisitResult {
        match node {
            TypeNode::PackExpansion(pack) | TypeNode::PackElement(pack) => self.check(
                self.version.has_parameter_packs(),
                "parameter packs",
                pack.span,
            ),
            TypeNode::Attributed(attributed) => self.check_specifiers(attributed),
            _ => VisitResult::Continue,
        }
    }
}
