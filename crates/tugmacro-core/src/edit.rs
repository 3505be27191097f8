// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Text edits: span replacements with conflict detection and atomic apply.
//!
//! An [`EditSet`] collects [`TextEdit`]s against one source text. Applying the
//! set is all-or-nothing: if any edit overlaps another or falls outside the
//! source, nothing is applied and an [`EditError`] describes why.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::span::Span;

/// Replace the bytes at `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        TextEdit {
            span,
            replacement: replacement.into(),
        }
    }

    /// An insertion at `offset`.
    pub fn insert(offset: u64, text: impl Into<String>) -> Self {
        TextEdit::new(Span::empty_at(offset), text)
    }

    /// A deletion of `span`.
    pub fn delete(span: Span) -> Self {
        TextEdit::new(span, "")
    }
}

/// A detected overlap between two edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditConflict {
    pub first: Span,
    pub second: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{} overlapping edit(s), first at {}", .0.len(), .0.first().map(|c| c.first).unwrap_or_default())]
    Overlapping(Vec<EditConflict>),

    #[error("edit span {span} is out of bounds for source of length {len}")]
    OutOfBounds { span: Span, len: u64 },

    #[error("edit span {span} does not fall on a character boundary")]
    NotCharBoundary { span: Span },
}

/// An ordered collection of edits against one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Detect overlapping edits.
    ///
    /// Two insertions at the same offset do not conflict; they are applied in
    /// insertion order.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<EditConflict> {
        let mut conflicts = Vec::new();
        for i in 0..self.edits.len() {
            for j in (i + 1)..self.edits.len() {
                let a = self.edits[i].span;
                let b = self.edits[j].span;
                let same_point = a.is_empty() && b.is_empty() && a.start == b.start;
                let point_inside = (a.is_empty() && b.start < a.start && a.start < b.end)
                    || (b.is_empty() && a.start < b.start && b.start < a.end);
                if (a.overlaps(&b) || point_inside) && !same_point {
                    conflicts.push(EditConflict {
                        first: a,
                        second: b,
                    });
                }
            }
        }
        conflicts
    }

    /// Apply every edit to `source`, returning the edited text.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        let conflicts = self.detect_conflicts();
        if !conflicts.is_empty() {
            return Err(EditError::Overlapping(conflicts));
        }

        let len = source.len() as u64;
        for edit in &self.edits {
            if edit.span.end > len {
                return Err(EditError::OutOfBounds {
                    span: edit.span,
                    len,
                });
            }
            let range = edit.span.range();
            if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
                return Err(EditError::NotCharBoundary { span: edit.span });
            }
        }

        // Apply back to front so earlier offsets stay valid. The sort is
        // stable, so insertions at one offset keep their relative order.
        let mut ordered: Vec<(usize, &TextEdit)> = self.edits.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.span
                .start
                .cmp(&a.span.start)
                .then_with(|| ib.cmp(ia))
        });

        let mut result = source.to_string();
        for (_, edit) in ordered {
            trace!(span = %edit.span, "applying edit");
            result.replace_range(edit.span.range(), &edit.replacement);
        }
        Ok(result)
    }
}

impl FromIterator<TextEdit> for EditSet {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        EditSet {
            edits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_keyword() {
        let source = "var x = 1";
        let edits: EditSet = [TextEdit::new(Span::new(0, 3), "let")].into_iter().collect();
        assert_eq!(edits.apply(source).unwrap(), "let x = 1");
    }

    #[test]
    fn applies_back_to_front() {
        let source = "a + b";
        let mut edits = EditSet::new();
        edits.push(TextEdit::new(Span::new(0, 1), "first"));
        edits.push(TextEdit::new(Span::new(4, 5), "second"));
        assert_eq!(edits.apply(source).unwrap(), "first + second");
    }

    #[test]
    fn insertions_at_same_offset_keep_order() {
        let mut edits = EditSet::new();
        edits.push(TextEdit::insert(0, "a"));
        edits.push(TextEdit::insert(0, "b"));
        assert!(edits.detect_conflicts().is_empty());
        assert_eq!(edits.apply("!").unwrap(), "ab!");
    }

    #[test]
    fn overlap_is_rejected_atomically() {
        let mut edits = EditSet::new();
        edits.push(TextEdit::new(Span::new(0, 4), "x"));
        edits.push(TextEdit::new(Span::new(2, 6), "y"));
        assert!(matches!(edits.apply("abcdefg"), Err(EditError::Overlapping(c)) if c.len() == 1));
    }

    #[test]
    fn insertion_inside_replacement_conflicts() {
        let mut edits = EditSet::new();
        edits.push(TextEdit::new(Span::new(0, 4), "x"));
        edits.push(TextEdit::insert(2, "y"));
        assert_eq!(edits.detect_conflicts().len(), 1);
    }

    #[test]
    fn out_of_bounds() {
        let edits: EditSet = [TextEdit::delete(Span::new(2, 10))].into_iter().collect();
        assert!(matches!(
            edits.apply("abc"),
            Err(EditError::OutOfBounds { len: 3, .. })
        ));
    }

    #[test]
    fn char_boundary_is_checked() {
        let edits: EditSet = [TextEdit::delete(Span::new(0, 1))].into_iter().collect();
        assert!(matches!(
            edits.apply("é"),
            Err(EditError::NotCharBoundary { .. })
        ));
    }
}
