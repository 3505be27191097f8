// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree node types.
//!
//! Nodes are owned, immutable values. Every structural node carries a
//! [`NodeId`] and a byte [`Span`](tugmacro_core::Span); leaves are [`Token`]s.
//! Delimiter-bearing nodes keep their delimiter tokens and list elements keep
//! their trailing comma, so the structural capability traits in [`traits`]
//! can expose them.

pub mod codegen;
pub mod common;
pub mod decl;
pub mod element;
pub mod expr;
pub mod pattern;
pub mod stmt;
pub mod traits;
pub mod types;

pub use codegen::{Codegen, CodegenState};
pub use common::*;
pub use decl::*;
pub use element::{SyntaxElement, SyntaxKind};
pub use expr::*;
pub use pattern::*;
pub use stmt::*;
pub use traits::*;
pub use types::*;

use tugmacro_core::Span;

/// A parsed file: a sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub statements: Vec<Stmt>,
    pub id: NodeId,
    pub span: Span,
}

impl SourceFile {
    /// Top-level declarations, in source order.
    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Stmt::Decl(decl) => Some(decl),
            _ => None,
        })
    }
}

impl Codegen for SourceFile {
    fn codegen(&self, state: &mut CodegenState) {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                state.add_newline();
            }
            stmt.codegen(state);
        }
    }
}
