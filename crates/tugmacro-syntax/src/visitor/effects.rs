// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! EffectScanner: does a body contain `try` or `await` of its own?
//!
//! Nested closures, nested declarations other than local variables, and
//! accessor bodies are separate effect contexts and are not scanned.

use super::dispatch::walk_stmt;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{AccessorBlock, AwaitExpr, ClosureExpr, CodeBlock, Decl, ForStmt, Stmt, TryExpr};

/// Effects found directly in a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectSummary {
    pub has_try: bool,
    pub has_await: bool,
}

#[derive(Debug, Default)]
pub struct EffectScanner {
    summary: EffectSummary,
}

impl EffectScanner {
    pub fn scan_statements(statements: &[Stmt]) -> EffectSummary {
        let mut scanner = Self::default();
        for stmt in statements {
            if walk_stmt(&mut scanner, stmt) == VisitResult::Stop {
                break;
            }
        }
        scanner.summary
    }

    pub fn scan_block(block: &CodeBlock) -> EffectSummary {
        Self::scan_statements(&block.statements)
    }

    fn found(&self) -> VisitResult {
        if self.summary.has_try && self.summary.has_await {
            VisitResult::Stop
        } else {
            VisitResult::Continue
        }
    }
}

impl Visitor for EffectScanner {
    fn visit_try_expr(&mut self, _node: &TryExpr) -> VisitResult {
        self.summary.has_try = true;
        self.found()
    }

    fn visit_await_expr(&mut self, _node: &AwaitExpr) -> VisitResult {
        self.summary.has_await = true;
        self.found()
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) -> VisitResult {
        self.summary.has_try |= node.try_token.is_some();
        self.summary.has_await |= node.await_token.is_some();
        self.found()
    }

    fn visit_closure(&mut self, _node: &ClosureExpr) -> VisitResult {
        VisitResult::SkipChildren
    }

    fn visit_accessor_block(&mut self, _node: &AccessorBlock) -> VisitResult {
        VisitResult::SkipChildren
    }

    fn visit_decl(&mut self, node: &Decl) -> VisitResult {
        match node {
            Decl::Variable(_) => VisitResult::Continue,
            _ => VisitResult::SkipChildren,
        }
    }
}
