// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Positioned diagnostics with suggested fixes.
//!
//! A [`DiagnosticBuilder`] starts from a severity, a message and the node the
//! message is anchored at. Each [`fix`](DiagnosticBuilder::fix) returns a new
//! builder with one more [`FixIt`]; [`build`](DiagnosticBuilder::build)
//! produces the immutable [`Diagnostic`]. Readers expose `error`, `warning`
//! and `note` entry points that fill in the anchor.
//!
//! Whether a diagnostic is fatal is up to the host. Expansion code hands
//! diagnostics to a [`DiagnosticSink`] and carries on.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use tracing::debug;
use tugmacro_core::{EditError, EditSet, Span, TextEdit};
use tugmacro_syntax::{NodeId, SyntaxElement, SyntaxKind, Token};

// ============================================================================
// Severity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    fn level(self) -> annotate_snippets::Level {
        match self {
            Severity::Error => annotate_snippets::Level::Error,
            Severity::Warning => annotate_snippets::Level::Warning,
            Severity::Note => annotate_snippets::Level::Note,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// A suggested replacement of one node by another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixIt {
    message: String,
    #[serde(serialize_with = "serialize_element")]
    old: SyntaxElement,
    #[serde(serialize_with = "serialize_element")]
    new: SyntaxElement,
}

impl FixIt {
    pub fn new(
        message: impl Into<String>,
        old: impl Into<SyntaxElement>,
        new: impl Into<SyntaxElement>,
    ) -> Self {
        FixIt {
            message: message.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn old(&self) -> &SyntaxElement {
        &self.old
    }

    pub fn new_node(&self) -> &SyntaxElement {
        &self.new
    }

    /// The replacement as a text edit over the source the old node was
    /// parsed from.
    pub fn to_edit(&self) -> TextEdit {
        TextEdit::new(self.old.span(), self.new.text())
    }
}

/// A secondary message anchored at another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    message: String,
    #[serde(serialize_with = "serialize_element")]
    node: SyntaxElement,
}

impl Note {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn node(&self) -> &SyntaxElement {
        &self.node
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    #[serde(serialize_with = "serialize_element")]
    node: SyntaxElement,
    fix_its: Vec<FixIt>,
    #[serde(serialize_with = "serialize_elements")]
    highlights: Vec<SyntaxElement>,
    notes: Vec<Note>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The node the diagnostic is anchored at.
    pub fn node(&self) -> &SyntaxElement {
        &self.node
    }

    pub fn span(&self) -> Span {
        self.node.span()
    }

    pub fn fix_its(&self) -> &[FixIt] {
        &self.fix_its
    }

    pub fn highlights(&self) -> &[SyntaxElement] {
        &self.highlights
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Apply every Fix-It to `source`, the text the anchored nodes came from.
pub fn apply_fix_its<'f>(
    source: &str,
    fix_its: impl IntoIterator<Item = &'f FixIt>,
) -> Result<String, EditError> {
    let mut edits = EditSet::new();
    for fix in fix_its {
        edits.push(fix.to_edit());
    }
    edits.apply(source)
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent construction of a [`Diagnostic`]. Every step consumes the builder
/// and returns an extended copy.
#[derive(Debug, Clone)]
#[must_use = "a diagnostic builder does nothing until `build` is called"]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        node: impl Into<SyntaxElement>,
    ) -> Self {
        DiagnosticBuilder {
            diagnostic: Diagnostic {
                severity,
                message: message.into(),
                node: node.into(),
                fix_its: Vec::new(),
                highlights: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Suggest replacing `old` with `new`.
    pub fn fix(
        mut self,
        message: impl Into<String>,
        old: impl Into<SyntaxElement>,
        new: impl Into<SyntaxElement>,
    ) -> Self {
        self.diagnostic.fix_its.push(FixIt::new(message, old, new));
        self
    }

    /// Suggest replacing `old` with a single token of `text`.
    pub fn fix_text(
        self,
        message: impl Into<String>,
        old: impl Into<SyntaxElement>,
        text: &str,
    ) -> Self {
        let token = Token::new(text, Span::default(), NodeId::default());
        self.fix(message, old, token)
    }

    pub fn highlight(mut self, node: impl Into<SyntaxElement>) -> Self {
        self.diagnostic.highlights.push(node.into());
        self
    }

    pub fn note_at(mut self, node: impl Into<SyntaxElement>, message: impl Into<String>) -> Self {
        self.diagnostic.notes.push(Note {
            message: message.into(),
            node: node.into(),
        });
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

impl From<DiagnosticBuilder> for Diagnostic {
    fn from(builder: DiagnosticBuilder) -> Self {
        builder.build()
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Receives diagnostics raised during expansion.
pub trait DiagnosticSink {
    fn diagnose(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collects diagnostics in the order they are raised.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        debug!(
            severity = %diagnostic.severity,
            kind = %diagnostic.node.kind(),
            span = %diagnostic.span(),
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a diagnostic against the source its nodes were parsed from.
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let level = diagnostic.severity.level();
    let help: Vec<String> = diagnostic
        .fix_its
        .iter()
        .map(|fix| {
            format!(
                "{}: replace `{}` with `{}`",
                fix.message,
                fix.old.text(),
                fix.new.text()
            )
        })
        .collect();

    let mut snippet = Snippet::source(source)
        .origin(label)
        .line_start(1)
        .fold(true)
        .annotation(level.span(clamp(source, diagnostic.span())));
    for node in &diagnostic.highlights {
        snippet = snippet.annotation(Level::Info.span(clamp(source, node.span())));
    }
    for note in &diagnostic.notes {
        snippet = snippet.annotation(
            Level::Note
                .span(clamp(source, note.node.span()))
                .label(&note.message),
        );
    }

    let mut message = level.title(&diagnostic.message).snippet(snippet);
    for text in &help {
        message = message.footer(Level::Help.title(text));
    }
    let rendered = Renderer::plain().render(message).to_string();
    rendered
}

/// Clamp a span to `source`, widening empty spans to one character.
fn clamp(source: &str, span: Span) -> std::ops::Range<usize> {
    let mut start = span.range().start.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = span.range().end.clamp(start, source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    if start == end {
        end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
    }
    start..end
}

// ============================================================================
// Serialization
// ============================================================================

#[derive(Serialize)]
struct ElementSummary {
    kind: SyntaxKind,
    id: NodeId,
    span: Span,
    text: String,
}

impl From<&SyntaxElement> for ElementSummary {
    fn from(element: &SyntaxElement) -> Self {
        ElementSummary {
            kind: element.kind(),
            id: element.id(),
            span: element.span(),
            text: element.text(),
        }
    }
}

fn serialize_element<S: Serializer>(element: &SyntaxElement, s: S) -> Result<S::Ok, S::Error> {
    ElementSummary::from(element).serialize(s)
}

fn serialize_elements<S: Serializer>(
    elements: &[SyntaxElement],
    s: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = s.serialize_seq(Some(elements.len()))?;
    for element in elements {
        seq.serialize_element(&ElementSummary::from(element))?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{Reader, VariableReader};
    use tugmacro_syntax::parse_decl;

    const SOURCE: &str = "var limit = 10";

    #[test]
    fn fix_replaces_var_with_let() {
        let decl = parse_decl(SOURCE).unwrap();
        let var = VariableReader::new(&decl).unwrap();
        let diagnostic = var
            .error_at(var.binding_specifier(), "value is never mutated")
            .fix_text("use `let`", var.binding_specifier(), "let")
            .build();

        assert_eq!(diagnostic.severity(), Severity::Error);
        assert_eq!(diagnostic.fix_its().len(), 1);
        assert_eq!(diagnostic.node().text(), "var");
        assert_eq!(diagnostic.fix_its()[0].old().text(), "var");
        assert_eq!(diagnostic.fix_its()[0].new_node().text(), "let");
        assert_eq!(
            apply_fix_its(SOURCE, diagnostic.fix_its()).unwrap(),
            "let limit = 10"
        );
    }

    #[test]
    fn builders_have_value_semantics() {
        let decl = parse_decl(SOURCE).unwrap();
        let var = VariableReader::new(&decl).unwrap();
        let base = var.warning("unused variable");
        let with_fix = base
            .clone()
            .fix_text("remove it", var.syntax(), "")
            .build();
        let plain = base.build();
        assert_eq!(with_fix.fix_its().len(), 1);
        assert!(plain.fix_its().is_empty());
        assert_eq!(plain.severity(), Severity::Warning);
    }

    #[test]
    fn serializes_to_json() {
        let decl = parse_decl(SOURCE).unwrap();
        let var = VariableReader::new(&decl).unwrap();
        let diagnostic = var
            .note("declared here")
            .highlight(var.binding_specifier())
            .build();
        let json: serde_json::Value = serde_json::from_str(&diagnostic.to_json().unwrap()).unwrap();
        assert_eq!(json["severity"], "note");
        assert_eq!(json["message"], "declared here");
        assert_eq!(json["node"]["kind"], "variable_decl");
        assert_eq!(json["node"]["text"], SOURCE);
        assert_eq!(json["highlights"][0]["kind"], "token");
        assert_eq!(json["fix_its"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn collector_tracks_errors() {
        let decl = parse_decl(SOURCE).unwrap();
        let var = VariableReader::new(&decl).unwrap();
        let mut collector = DiagnosticCollector::new();
        assert!(collector.is_empty());
        collector.diagnose(var.warning("first").build());
        assert!(!collector.has_errors());
        collector.diagnose(var.error("second").build());
        assert!(collector.has_errors());
        let messages: Vec<_> = collector
            .into_diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(messages, ["warning: first", "error: second"]);
    }

    #[test]
    fn renders_with_source_context() {
        let decl = parse_decl(SOURCE).unwrap();
        let var = VariableReader::new(&decl).unwrap();
        let diagnostic = var
            .error_at(var.binding_specifier(), "value is never mutated")
            .fix_text("use `let`", var.binding_specifier(), "let")
            .build();
        let rendered = render_diagnostic(&diagnostic, SOURCE, "Limits.swift");
        assert!(rendered.contains("error: value is never mutated"), "{rendered}");
        assert!(rendered.contains("Limits.swift"), "{rendered}");
        assert!(rendered.contains(SOURCE), "{rendered}");
        assert!(rendered.contains("replace `var` with `let`"), "{rendered}");
    }

    #[test]
    fn clamp_stays_in_bounds() {
        assert_eq!(clamp("abc", Span::new(10, 20)), 3..3);
        assert_eq!(clamp("abc", Span::new(1, 1)), 1..2);
        assert_eq!(clamp("abc", Span::new(0, 2)), 0..2);
    }
}
