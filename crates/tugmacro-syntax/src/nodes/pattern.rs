// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern syntax: binding targets and `case` patterns.

use crate::nodes::common::codegen_comma;
use crate::nodes::traits::{HasParens, HasTrailingComma, NodeId};
use crate::nodes::{Codegen, CodegenState, Expr, Token, TypeNode};
use tugmacro_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `x`
    Identifier(IdentifierPattern),
    /// `_`
    Wildcard(WildcardPattern),
    /// `(a, b)`, `(x: Int, y: String)`
    Tuple(TuplePattern),
    /// `let x`, `var (a, b)`
    ValueBinding(Box<ValueBindingPattern>),
    /// `.some(let x)`, `1...5`
    Expression(Box<ExpressionPattern>),
    /// `is String`
    IsType(Box<IsTypePattern>),
}

impl Pattern {
    pub fn id(&self) -> NodeId {
        match self {
            Pattern::Identifier(p) => p.id,
            Pattern::Wildcard(p) => p.id,
            Pattern::Tuple(p) => p.id,
            Pattern::ValueBinding(p) => p.id,
            Pattern::Expression(p) => p.id,
            Pattern::IsType(p) => p.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(p) => p.span,
            Pattern::Wildcard(p) => p.span,
            Pattern::Tuple(p) => p.span,
            Pattern::ValueBinding(p) => p.span,
            Pattern::Expression(p) => p.span,
            Pattern::IsType(p) => p.span,
        }
    }

    /// The bound name of an identifier pattern.
    pub fn identifier(&self) -> Option<&Token> {
        match self {
            Pattern::Identifier(p) => Some(&p.name),
            _ => None,
        }
    }
}

impl Codegen for Pattern {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Pattern::Identifier(p) => p.name.codegen(state),
            Pattern::Wildcard(p) => p.token.codegen(state),
            Pattern::Tuple(p) => p.codegen(state),
            Pattern::ValueBinding(p) => {
                p.specifier.codegen(state);
                state.add_space();
                p.pattern.codegen(state);
            }
            Pattern::Expression(p) => p.expr.codegen(state),
            Pattern::IsType(p) => {
                state.add_token("is ");
                p.ty.codegen(state);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPattern {
    pub name: Token,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    pub token: Token,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuplePattern {
    pub left_paren: Token,
    pub elements: Vec<TuplePatternElement>,
    pub right_paren: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TuplePattern {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        self.codegen_paren_contents(state);
        state.add_token(")");
    }
}

impl HasParens for TuplePattern {
    fn left_paren(&self) -> &Token {
        &self.left_paren
    }
    fn right_paren(&self) -> &Token {
        &self.right_paren
    }
    fn codegen_paren_contents(&self, state: &mut CodegenState) {
        state.add_list(&self.elements);
    }
}

/// One element of a tuple pattern, optionally labelled: `label: pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuplePatternElement {
    pub label: Option<Token>,
    pub pattern: Pattern,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TuplePatternElement {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(label) = &self.label {
            label.codegen(state);
            state.add_token(": ");
        }
        self.pattern.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for TuplePatternElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBindingPattern {
    /// `let` or `var`
    pub specifier: Token,
    pub pattern: Pattern,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionPattern {
    pub expr: Expr,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsTypePattern {
    pub is_token: Token,
    pub ty: TypeNode,
    pub id: NodeId,
    pub span: Span,
}
