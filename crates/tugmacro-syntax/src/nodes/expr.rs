// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression syntax.

use crate::nodes::common::codegen_comma;
use crate::nodes::traits::{HasBraces, HasEffectSpecifiers, HasParens, HasTrailingComma, NodeId};
use crate::nodes::{
    Codegen, CodegenState, EffectSpecifiers, GenericArgumentClause, Pattern, Stmt, Token,
    TypeNode,
};
use tugmacro_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `name`, `self`, `Self`, `$0`, `Array<Int>`, or an operator reference
    /// such as `+` in `reduce(0, +)`.
    DeclRef(DeclRefExpr),
    IntegerLiteral(LiteralExpr),
    FloatLiteral(LiteralExpr),
    StringLiteral(LiteralExpr),
    BooleanLiteral(LiteralExpr),
    NilLiteral(LiteralExpr),
    Array(ArrayExpr),
    Dictionary(DictionaryExpr),
    /// `(a, b)`, `(label: a)`, and the parenthesized expression `(a)`.
    Tuple(TupleExpr),
    /// `base.name`, or `.name` with an implicit base.
    MemberAccess(Box<MemberAccessExpr>),
    Call(Box<FunctionCallExpr>),
    Subscript(Box<SubscriptExpr>),
    /// Infix operators, including assignment.
    Binary(Box<BinaryExpr>),
    Prefix(Box<PrefixExpr>),
    /// Postfix operators, including force unwrap `!` and optional chaining `?`.
    Postfix(Box<PostfixExpr>),
    Try(Box<TryExpr>),
    Await(Box<AwaitExpr>),
    Closure(Box<ClosureExpr>),
    Ternary(Box<TernaryExpr>),
    /// `as`, `as?`, `as!`, `is`
    Cast(Box<CastExpr>),
    /// `#name(arguments)`
    MacroExpansion(Box<MacroExpansionExpr>),
    /// A binding pattern used in expression position, as in `.some(let x)`.
    Pattern(Box<PatternExpr>),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::DeclRef(e) => e.id,
            Expr::IntegerLiteral(e)
            | Expr::FloatLiteral(e)
            | Expr::StringLiteral(e)
            | Expr::BooleanLiteral(e)
            | Expr::NilLiteral(e) => e.id,
            Expr::Array(e) => e.id,
            Expr::Dictionary(e) => e.id,
            Expr::Tuple(e) => e.id,
            Expr::MemberAccess(e) => e.id,
            Expr::Call(e) => e.id,
            Expr::Subscript(e) => e.id,
            Expr::Binary(e) => e.id,
            Expr::Prefix(e) => e.id,
            Expr::Postfix(e) => e.id,
            Expr::Try(e) => e.id,
            Expr::Await(e) => e.id,
            Expr::Closure(e) => e.id,
            Expr::Ternary(e) => e.id,
            Expr::Cast(e) => e.id,
            Expr::MacroExpansion(e) => e.id,
            Expr::Pattern(e) => e.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::DeclRef(e) => e.span,
            Expr::IntegerLiteral(e)
            | Expr::FloatLiteral(e)
            | Expr::StringLiteral(e)
            | Expr::BooleanLiteral(e)
            | Expr::NilLiteral(e) => e.span,
            Expr::Array(e) => e.span,
            Expr::Dictionary(e) => e.span,
            Expr::Tuple(e) => e.span,
            Expr::MemberAccess(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Subscript(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Prefix(e) => e.span,
            Expr::Postfix(e) => e.span,
            Expr::Try(e) => e.span,
            Expr::Await(e) => e.span,
            Expr::Closure(e) => e.span,
            Expr::Ternary(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::MacroExpansion(e) => e.span,
            Expr::Pattern(e) => e.span,
        }
    }

    /// Strip any number of redundant parentheses: `((x))` → `x`.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Tuple(tuple) = expr {
            match tuple.elements.as_slice() {
                [only] if only.label.is_none() => expr = &only.expr,
                _ => break,
            }
        }
        expr
    }
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Expr::DeclRef(e) => e.codegen(state),
            Expr::IntegerLiteral(e)
            | Expr::FloatLiteral(e)
            | Expr::StringLiteral(e)
            | Expr::BooleanLiteral(e)
            | Expr::NilLiteral(e) => e.token.codegen(state),
            Expr::Array(e) => e.codegen(state),
            Expr::Dictionary(e) => e.codegen(state),
            Expr::Tuple(e) => e.codegen(state),
            Expr::MemberAccess(e) => e.codegen(state),
            Expr::Call(e) => e.codegen(state),
            Expr::Subscript(e) => e.codegen(state),
            Expr::Binary(e) => e.codegen(state),
            Expr::Prefix(e) => {
                e.operator.codegen(state);
                e.operand.codegen(state);
            }
            Expr::Postfix(e) => {
                e.operand.codegen(state);
                e.operator.codegen(state);
            }
            Expr::Try(e) => e.codegen(state),
            Expr::Await(e) => {
                state.add_token("await ");
                e.expr.codegen(state);
            }
            Expr::Closure(e) => e.codegen(state),
            Expr::Ternary(e) => e.codegen(state),
            Expr::Cast(e) => e.codegen(state),
            Expr::MacroExpansion(e) => e.codegen(state),
            Expr::Pattern(e) => e.pattern.codegen(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclRefExpr {
    pub name: Token,
    pub generic_arguments: Option<GenericArgumentClause>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for DeclRefExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.generic_arguments.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralExpr {
    pub token: Token,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayExpr {
    pub left_square: Token,
    pub elements: Vec<ArrayElement>,
    pub right_square: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ArrayExpr {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("[");
        state.add_list(&self.elements);
        state.add_token("]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayElement {
    pub expr: Expr,
    pub trailing_comma: Option<Token>,
}

impl Codegen for ArrayElement {
    fn codegen(&self, state: &mut CodegenState) {
        self.expr.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for ArrayElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryExpr {
    pub left_square: Token,
    pub elements: Vec<DictionaryElement>,
    pub right_square: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for DictionaryExpr {
    fn codegen(&self, state: &mut CodegenState) {
        if self.elements.is_empty() {
            state.add_token("[:]");
            return;
        }
        state.add_token("[");
        state.add_list(&self.elements);
        state.add_token("]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryElement {
    pub key: Expr,
    pub value: Expr,
    pub trailing_comma: Option<Token>,
}

impl Codegen for DictionaryElement {
    fn codegen(&self, state: &mut CodegenState) {
        self.key.codegen(state);
        state.add_token(": ");
        self.value.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for DictionaryElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleExpr {
    pub left_paren: Token,
    pub elements: Vec<LabeledExpr>,
    pub right_paren: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TupleExpr {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        self.codegen_paren_contents(state);
        state.add_token(")");
    }
}

impl HasParens for TupleExpr {
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

/// A tuple element or call argument: `label: expr` or `expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExpr {
    pub label: Option<Token>,
    pub expr: Expr,
    pub trailing_comma: Option<Token>,
}

impl Codegen for LabeledExpr {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(label) = &self.label {
            label.codegen(state);
            state.add_token(": ");
        }
        self.expr.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for LabeledExpr {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccessExpr {
    pub base: Option<Expr>,
    pub dot: Token,
    pub name: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for MemberAccessExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.base.codegen(state);
        state.add_token(".");
        self.name.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallExpr {
    pub callee: Expr,
    /// Absent for a call made only with a trailing closure: `run { }`.
    pub left_paren: Option<Token>,
    pub arguments: Vec<LabeledExpr>,
    pub right_paren: Option<Token>,
    pub trailing_closure: Option<ClosureExpr>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for FunctionCallExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.callee.codegen(state);
        if self.left_paren.is_some() || self.trailing_closure.is_none() {
            state.add_token("(");
            state.add_list(&self.arguments);
            state.add_token(")");
        }
        if let Some(closure) = &self.trailing_closure {
            state.add_space();
            closure.codegen(state);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptExpr {
    pub base: Expr,
    pub left_square: Token,
    pub arguments: Vec<LabeledExpr>,
    pub right_square: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for SubscriptExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.base.codegen(state);
        state.add_token("[");
        state.add_list(&self.arguments);
        state.add_token("]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub lhs: Expr,
    pub operator: Token,
    pub rhs: Expr,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for BinaryExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.lhs.codegen(state);
        state.add_space();
        self.operator.codegen(state);
        state.add_space();
        self.rhs.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixExpr {
    pub operator: Token,
    pub operand: Expr,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostfixExpr {
    pub operand: Expr,
    pub operator: Token,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryExpr {
    pub keyword: Token,
    /// `?` or `!`
    pub mark: Option<Token>,
    pub expr: Expr,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TryExpr {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("try");
        self.mark.codegen(state);
        state.add_space();
        self.expr.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitExpr {
    pub keyword: Token,
    pub expr: Expr,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureExpr {
    pub left_brace: Token,
    pub signature: Option<ClosureSignature>,
    pub statements: Vec<Stmt>,
    pub right_brace: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ClosureExpr {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.signature {
            None => state.add_block(&self.statements),
            Some(sig) => {
                state.add_token("{ ");
                sig.codegen(state);
                state.add_block_lines(&self.statements);
                state.add_newline();
                state.add_token("}");
            }
        }
    }
}

impl HasBraces for ClosureExpr {
    fn left_brace(&self) -> &Token {
        &self.left_brace
    }
    fn right_brace(&self) -> &Token {
        &self.right_brace
    }
    fn codegen_brace_contents(&self, state: &mut CodegenState) {
        if let Some(sig) = &self.signature {
            state.add_space();
            sig.codegen(state);
        }
        state.add_block_lines(&self.statements);
    }
}

impl HasEffectSpecifiers for ClosureExpr {
    fn effect_specifiers(&self) -> Option<&EffectSpecifiers> {
        self.signature.as_ref().map(|s| &s.effects)
    }
}

/// `[weak self] (a: Int, b) async throws -> Int in`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureSignature {
    pub captures: Vec<ClosureCapture>,
    pub parameters: ClosureParameters,
    pub effects: EffectSpecifiers,
    pub return_type: Option<TypeNode>,
    pub in_token: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ClosureSignature {
    fn codegen(&self, state: &mut CodegenState) {
        let mut wrote = false;
        if !self.captures.is_empty() {
            state.add_token("[");
            state.add_list(&self.captures);
            state.add_token("]");
            wrote = true;
        }
        match &self.parameters {
            ClosureParameters::None => {}
            ClosureParameters::Shorthand(names) => {
                if wrote {
                    state.add_space();
                }
                state.add_list(names);
                wrote = true;
            }
            ClosureParameters::Clause(params) => {
                if wrote {
                    state.add_space();
                }
                state.add_token("(");
                state.add_list(params);
                state.add_token(")");
                wrote = true;
            }
        }
        if !self.effects.is_empty() {
            let effects = self.effects.to_source();
            state.add_token(if wrote { &effects } else { effects.trim_start() });
            wrote = true;
        }
        if let Some(ty) = &self.return_type {
            state.add_token(if wrote { " -> " } else { "-> " });
            ty.codegen(state);
            wrote = true;
        }
        state.add_token(if wrote { " in" } else { "in" });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosureParameters {
    None,
    /// `a, b in`
    Shorthand(Vec<ClosureShorthandParameter>),
    /// `(a: Int, b) in`
    Clause(Vec<ClosureParameter>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureShorthandParameter {
    pub name: Token,
    pub trailing_comma: Option<Token>,
}

impl Codegen for ClosureShorthandParameter {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureParameter {
    pub first_name: Token,
    pub second_name: Option<Token>,
    pub ty: Option<TypeNode>,
    pub trailing_comma: Option<Token>,
}

impl Codegen for ClosureParameter {
    fn codegen(&self, state: &mut CodegenState) {
        self.first_name.codegen(state);
        if let Some(second) = &self.second_name {
            state.add_space();
            second.codegen(state);
        }
        if let Some(ty) = &self.ty {
            state.add_token(": ");
            ty.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

/// `weak self`, `x`, `y = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureCapture {
    pub specifier: Option<Token>,
    pub name: Token,
    pub initializer: Option<Expr>,
    pub trailing_comma: Option<Token>,
}

impl Codegen for ClosureCapture {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(spec) = &self.specifier {
            spec.codegen(state);
            state.add_space();
        }
        self.name.codegen(state);
        if let Some(init) = &self.initializer {
            state.add_token(" = ");
            init.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TernaryExpr {
    pub condition: Expr,
    pub then_expr: Expr,
    pub else_expr: Expr,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TernaryExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.condition.codegen(state);
        state.add_token(" ? ");
        self.then_expr.codegen(state);
        state.add_token(" : ");
        self.else_expr.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub expr: Expr,
    /// `as` or `is`
    pub keyword: Token,
    /// `?` or `!` after `as`
    pub mark: Option<Token>,
    pub ty: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for CastExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.expr.codegen(state);
        state.add_space();
        self.keyword.codegen(state);
        self.mark.codegen(state);
        state.add_space();
        self.ty.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroExpansionExpr {
    pub pound: Token,
    pub name: Token,
    pub left_paren: Option<Token>,
    pub arguments: Vec<LabeledExpr>,
    pub right_paren: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for MacroExpansionExpr {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("#");
        self.name.codegen(state);
        if self.left_paren.is_some() {
            state.add_token("(");
            state.add_list(&self.arguments);
            state.add_token(")");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternExpr {
    pub pattern: Pattern,
    pub id: NodeId,
    pub span: Span,
}
