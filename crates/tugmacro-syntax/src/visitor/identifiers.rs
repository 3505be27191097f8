// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! IdentifierCollector: identifier references in source order.
//!
//! Collects every bare name reference (`x`, `self`, `$0`, `Array<Int>`),
//! skipping member names after a dot, argument labels and declared names.
//!
//! ```
//! use tugmacro_syntax::parse_expr;
//! use tugmacro_syntax::visitor::IdentifierCollector;
//!
//! let expr = parse_expr("point.x + offset(by: delta)").expect("parse error");
//! let names: Vec<String> = IdentifierCollector::collect_expr(&expr)
//!     .into_iter()
//!     .map(|r| r.name)
//!     .collect();
//! assert_eq!(names, vec!["point", "offset", "delta"]);
//! ```

use super::dispatch::{walk_code_block, walk_expr, walk_stmt};
use super::traits::{VisitResult, Visitor};
use crate::nodes::{CodeBlock, DeclRefExpr, Expr, Stmt};
use tugmacro_core::Span;

/// A single identifier reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRef {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct IdentifierCollector {
    refs: Vec<IdentifierRef>,
}

impl IdentifierCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect_expr(expr: &Expr) -> Vec<IdentifierRef> {
        let mut collector = Self::new();
        walk_expr(&mut collector, expr);
        collector.refs
    }

    pub fn collect_stmts(statements: &[Stmt]) -> Vec<IdentifierRef> {
        let mut collector = Self::new();
        for stmt in statements {
            walk_stmt(&mut collector, stmt);
        }
        collector.refs
    }

    pub fn collect_block(block: &CodeBlock) -> Vec<IdentifierRef> {
        let mut collector = Self::new();
        walk_code_block(&mut collector, block);
        collector.refs
    }

    pub fn into_refs(self) -> Vec<IdentifierRef> {
        self.refs
    }
}

impl Visitor for IdentifierCollector {
    fn visit_decl_ref(&mut self, node: &DeclRefExpr) -> VisitResult {
        self.refs.push(IdentifierRef {
            name: node.name.text.clone(),
            span: node.name.span,
        });
        VisitResult::Continue
    }
}
