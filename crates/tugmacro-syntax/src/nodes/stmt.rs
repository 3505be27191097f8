// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement syntax.

use crate::nodes::common::codegen_comma;
use crate::nodes::traits::{HasBraces, HasCodeBlock, HasTrailingComma, NodeId};
use crate::nodes::{CodeBlock, Codegen, CodegenState, Decl, Expr, Pattern, Token, TypeNode};
use tugmacro_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Decl(Decl),
    Expr(Expr),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Fallthrough(FallthroughStmt),
    If(Box<IfStmt>),
    Guard(Box<GuardStmt>),
    For(Box<ForStmt>),
    While(Box<WhileStmt>),
    Repeat(Box<RepeatStmt>),
    Switch(Box<SwitchStmt>),
    Do(Box<DoStmt>),
    Defer(Box<DeferStmt>),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Decl(s) => s.id(),
            Stmt::Expr(s) => s.id(),
            Stmt::Return(s) => s.id,
            Stmt::Throw(s) => s.id,
            Stmt::Break(s) => s.id,
            Stmt::Continue(s) => s.id,
            Stmt::Fallthrough(s) => s.id,
            Stmt::If(s) => s.id,
            Stmt::Guard(s) => s.id,
            Stmt::For(s) => s.id,
            Stmt::While(s) => s.id,
            Stmt::Repeat(s) => s.id,
            Stmt::Switch(s) => s.id,
            Stmt::Do(s) => s.id,
            Stmt::Defer(s) => s.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::Decl(s) => s.span(),
            Stmt::Expr(s) => s.span(),
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Fallthrough(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Guard(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Repeat(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Do(s) => s.span,
            Stmt::Defer(s) => s.span,
        }
    }
}

impl Codegen for Stmt {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Stmt::Decl(s) => s.codegen(state),
            Stmt::Expr(s) => s.codegen(state),
            Stmt::Return(s) => {
                state.add_token("return");
                if let Some(expr) = &s.expr {
                    state.add_space();
                    expr.codegen(state);
                }
            }
            Stmt::Throw(s) => {
                state.add_token("throw ");
                s.expr.codegen(state);
            }
            Stmt::Break(s) => codegen_jump("break", &s.label, state),
            Stmt::Continue(s) => codegen_jump("continue", &s.label, state),
            Stmt::Fallthrough(_) => state.add_token("fallthrough"),
            Stmt::If(s) => s.codegen(state),
            Stmt::Guard(s) => s.codegen(state),
            Stmt::For(s) => s.codegen(state),
            Stmt::While(s) => s.codegen(state),
            Stmt::Repeat(s) => s.codegen(state),
            Stmt::Switch(s) => s.codegen(state),
            Stmt::Do(s) => s.codegen(state),
            Stmt::Defer(s) => {
                state.add_token("defer ");
                s.body.codegen(state);
            }
        }
    }
}

fn codegen_jump(keyword: &str, label: &Option<Token>, state: &mut CodegenState) {
    state.add_token(keyword);
    if let Some(label) = label {
        state.add_space();
        label.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub expr: Option<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowStmt {
    pub keyword: Token,
    pub expr: Expr,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakStmt {
    pub keyword: Token,
    pub label: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueStmt {
    pub keyword: Token,
    pub label: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallthroughStmt {
    pub keyword: Token,
    pub id: NodeId,
    pub span: Span,
}

// ============================================================================
// Conditions
// ============================================================================

/// One comma-separated element of an `if`, `guard` or `while` condition list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionElement {
    pub condition: Condition,
    pub trailing_comma: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A boolean expression.
    Expr(Expr),
    /// `let x = value`, `var x: T = value`, or the shorthand `let x`.
    OptionalBinding(OptionalBindingCondition),
    /// `case .some(let x) = value`
    Matching(MatchingPatternCondition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalBindingCondition {
    pub specifier: Token,
    pub pattern: Pattern,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingPatternCondition {
    pub case_token: Token,
    pub pattern: Pattern,
    pub initializer: Expr,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ConditionElement {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.condition {
            Condition::Expr(expr) => expr.codegen(state),
            Condition::OptionalBinding(binding) => {
                binding.specifier.codegen(state);
                state.add_space();
                binding.pattern.codegen(state);
                if let Some(ty) = &binding.type_annotation {
                    state.add_token(": ");
                    ty.codegen(state);
                }
                if let Some(init) = &binding.initializer {
                    state.add_token(" = ");
                    init.codegen(state);
                }
            }
            Condition::Matching(matching) => {
                state.add_token("case ");
                matching.pattern.codegen(state);
                state.add_token(" = ");
                matching.initializer.codegen(state);
            }
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for ConditionElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

// ============================================================================
// Compound statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub if_token: Token,
    pub conditions: Vec<ConditionElement>,
    pub body: CodeBlock,
    pub else_branch: Option<ElseBranch>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(CodeBlock),
}

impl Codegen for IfStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("if ");
        state.add_list(&self.conditions);
        state.add_space();
        self.body.codegen(state);
        match &self.else_branch {
            None => {}
            Some(ElseBranch::If(nested)) => {
                state.add_token(" else ");
                nested.codegen(state);
            }
            Some(ElseBranch::Block(block)) => {
                state.add_token(" else ");
                block.codegen(state);
            }
        }
    }
}

impl HasCodeBlock for IfStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardStmt {
    pub guard_token: Token,
    pub conditions: Vec<ConditionElement>,
    pub body: CodeBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for GuardStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("guard ");
        state.add_list(&self.conditions);
        state.add_token(" else ");
        self.body.codegen(state);
    }
}

impl HasCodeBlock for GuardStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub for_token: Token,
    pub try_token: Option<Token>,
    pub await_token: Option<Token>,
    pub case_token: Option<Token>,
    pub pattern: Pattern,
    pub type_annotation: Option<TypeNode>,
    pub sequence: Expr,
    pub where_clause: Option<Expr>,
    pub body: CodeBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ForStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("for ");
        if self.try_token.is_some() {
            state.add_token("try ");
        }
        if self.await_token.is_some() {
            state.add_token("await ");
        }
        if self.case_token.is_some() {
            state.add_token("case ");
        }
        self.pattern.codegen(state);
        if let Some(ty) = &self.type_annotation {
            state.add_token(": ");
            ty.codegen(state);
        }
        state.add_token(" in ");
        self.sequence.codegen(state);
        if let Some(cond) = &self.where_clause {
            state.add_token(" where ");
            cond.codegen(state);
        }
        state.add_space();
        self.body.codegen(state);
    }
}

impl HasCodeBlock for ForStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub while_token: Token,
    pub conditions: Vec<ConditionElement>,
    pub body: CodeBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for WhileStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("while ");
        state.add_list(&self.conditions);
        state.add_space();
        self.body.codegen(state);
    }
}

impl HasCodeBlock for WhileStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatStmt {
    pub repeat_token: Token,
    pub body: CodeBlock,
    pub condition: Expr,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for RepeatStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("repeat ");
        self.body.codegen(state);
        state.add_token(" while ");
        self.condition.codegen(state);
    }
}

impl HasCodeBlock for RepeatStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub switch_token: Token,
    pub subject: Expr,
    pub left_brace: Token,
    pub cases: Vec<SwitchCase>,
    pub right_brace: Token,
    pub id: NodeId,
    pub span: Span,
}

/// Cases render at the indentation of the `switch` keyword; their
/// statements one level deeper.
impl Codegen for SwitchStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("switch ");
        self.subject.codegen(state);
        state.add_token(" {");
        for case in &self.cases {
            state.add_newline();
            case.codegen(state);
        }
        state.add_newline();
        state.add_token("}");
    }
}

impl HasBraces for SwitchStmt {
    fn left_brace(&self) -> &Token {
        &self.left_brace
    }
    fn right_brace(&self) -> &Token {
        &self.right_brace
    }
    fn codegen_brace_contents(&self, state: &mut CodegenState) {
        for case in &self.cases {
            state.add_newline();
            case.codegen(state);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCase {
    pub label: SwitchCaseLabel,
    pub statements: Vec<Stmt>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchCaseLabel {
    Case { case_token: Token, items: Vec<CaseItem> },
    Default { default_token: Token },
}

impl Codegen for SwitchCase {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.label {
            SwitchCaseLabel::Case { items, .. } => {
                state.add_token("case ");
                state.add_list(items);
                state.add_token(":");
            }
            SwitchCaseLabel::Default { .. } => state.add_token("default:"),
        }
        state.add_block_lines(&self.statements);
    }
}

/// `pattern where condition` in a `case` label or `catch` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseItem {
    pub pattern: Pattern,
    pub where_clause: Option<Expr>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for CaseItem {
    fn codegen(&self, state: &mut CodegenState) {
        self.pattern.codegen(state);
        if let Some(cond) = &self.where_clause {
            state.add_token(" where ");
            cond.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for CaseItem {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStmt {
    pub do_token: Token,
    pub body: CodeBlock,
    pub catches: Vec<CatchClause>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for DoStmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("do ");
        self.body.codegen(state);
        for catch in &self.catches {
            state.add_space();
            catch.codegen(state);
        }
    }
}

impl HasCodeBlock for DoStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

/// `catch`, `catch let error as MyError`, `catch .timeout where retry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub catch_token: Token,
    pub items: Vec<CaseItem>,
    pub body: CodeBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for CatchClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("catch ");
        if !self.items.is_empty() {
            state.add_list(&self.items);
            state.add_space();
        }
        self.body.codegen(state);
    }
}

impl HasCodeBlock for CatchClause {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferStmt {
    pub defer_token: Token,
    pub body: CodeBlock,
    pub id: NodeId,
    pub span: Span,
}

impl HasCodeBlock for DeferStmt {
    fn body(&self) -> Option<&CodeBlock> {
        Some(&self.body)
    }
}
