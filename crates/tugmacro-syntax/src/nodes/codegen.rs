// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Canonical source rendering for syntax nodes.
//!
//! Rendering normalizes layout: one statement or member per line, blocks
//! indented by [`CodegenState::default_indent`], single spaces between tokens.
//! Parsing rendered text and rendering it again yields identical output.

use std::fmt;

#[derive(Debug)]
pub struct CodegenState {
    pub tokens: String,
    pub default_indent: String,
    pub default_newline: String,
    indent_level: usize,
}

impl Default for CodegenState {
    fn default() -> Self {
        Self::new("    ", "\n")
    }
}

impl CodegenState {
    pub fn new(indent: &str, newline: &str) -> Self {
        Self {
            tokens: String::new(),
            default_indent: indent.to_string(),
            default_newline: newline.to_string(),
            indent_level: 0,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }

    pub fn add_space(&mut self) {
        self.tokens.push(' ');
    }

    /// End the current line and indent the next one.
    pub fn add_newline(&mut self) {
        self.tokens.push_str(&self.default_newline);
        for _ in 0..self.indent_level {
            self.tokens.push_str(&self.default_indent);
        }
    }

    /// Render items separated by single spaces. Elements render their own
    /// trailing commas.
    pub fn add_list<T: Codegen>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.add_space();
            }
            item.codegen(self);
        }
    }

    /// Render a `{ ... }` block with one item per line. An empty block
    /// renders as `{}`.
    pub fn add_block<T: Codegen>(&mut self, items: &[T]) {
        if items.is_empty() {
            self.add_token("{}");
            return;
        }
        self.add_token("{");
        self.add_block_lines(items);
        self.add_newline();
        self.add_token("}");
    }

    /// Render items on their own lines, one level deeper than the current
    /// indentation.
    pub fn add_block_lines<T: Codegen>(&mut self, items: &[T]) {
        self.indent();
        for item in items {
            self.add_newline();
            item.codegen(self);
        }
        self.dedent();
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens)
    }
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    /// Render this node with the default layout.
    fn to_source(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens
    }
}

impl<T: Codegen> Codegen for Box<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state);
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(s) = self {
            s.codegen(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Word(&'static str);

    impl Codegen for Word {
        fn codegen(&self, state: &mut CodegenState) {
            state.add_token(self.0);
        }
    }

    #[test]
    fn block_layout() {
        let mut state = CodegenState::default();
        state.add_token("do ");
        state.add_block(&[Word("a()"), Word("b()")]);
        assert_eq!(state.to_string(), "do {\n    a()\n    b()\n}");
    }

    #[test]
    fn empty_block() {
        let mut state = CodegenState::new("\t", "\r\n");
        state.add_block::<Word>(&[]);
        assert_eq!(state.to_string(), "{}");
    }

    #[test]
    fn custom_indent_and_newline() {
        let mut state = CodegenState::new("\t", "\r\n");
        state.add_block(&[Word("x")]);
        assert_eq!(state.to_string(), "{\r\n\tx\r\n}");
    }
}
