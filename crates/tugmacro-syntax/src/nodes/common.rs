// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Nodes shared by declarations, statements and types: tokens, attributes,
//! modifiers, generic clauses, blocks, signatures and pattern bindings.

use crate::nodes::traits::{
    HasAttributes, HasBraces, HasCodeBlock, HasEffectSpecifiers, HasModifiers, HasName,
    HasParens, HasTrailingComma, NodeId,
};
use crate::nodes::{Codegen, CodegenState, Decl, Expr, Pattern, Stmt, TypeNode};
use tugmacro_core::Span;

/// A leaf: one token of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub text: String,
    pub span: Span,
    pub id: NodeId,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span, id: NodeId) -> Self {
        Token {
            text: text.into(),
            span,
            id,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

impl Codegen for Token {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.text);
    }
}

pub(crate) fn codegen_comma(comma: &Option<Token>, state: &mut CodegenState) {
    if comma.is_some() {
        state.add_token(",");
    }
}

/// Render each item followed by one space, e.g. attributes and modifiers
/// preceding a declaration keyword.
pub(crate) fn codegen_prefix_list<T: Codegen>(items: &[T], state: &mut CodegenState) {
    for item in items {
        item.codegen(state);
        state.add_space();
    }
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

/// `@name` or `@name(arguments)`.
///
/// Arguments are kept as text: attribute argument syntax varies per attribute
/// (`@available(*, deprecated)` is not an expression list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub at_sign: Token,
    pub name: Token,
    pub arguments: Option<AttributeArguments>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArguments {
    pub left_paren: Token,
    pub text: String,
    pub right_paren: Token,
}

impl Codegen for Attribute {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("@");
        self.name.codegen(state);
        if let Some(args) = &self.arguments {
            state.add_token("(");
            state.add_token(&args.text);
            state.add_token(")");
        }
    }
}

/// A declaration modifier, optionally with a parenthesized detail as in
/// `private(set)` or `unowned(safe)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclModifier {
    pub name: Token,
    pub detail: Option<ModifierDetail>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierDetail {
    pub left_paren: Token,
    pub detail: Token,
    pub right_paren: Token,
}

impl DeclModifier {
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.detail.text())
    }
}

impl Codegen for DeclModifier {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        if let Some(detail) = &self.detail {
            state.add_token("(");
            detail.detail.codegen(state);
            state.add_token(")");
        }
    }
}

// ============================================================================
// Generics and inheritance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameterClause {
    pub left_angle: Token,
    pub parameters: Vec<GenericParameter>,
    pub right_angle: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for GenericParameterClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("<");
        state.add_list(&self.parameters);
        state.add_token(">");
    }
}

/// `T`, `T: Equatable`, or the parameter pack `each T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameter {
    pub each_keyword: Option<Token>,
    pub name: Token,
    pub inherited_type: Option<TypeNode>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for GenericParameter {
    fn codegen(&self, state: &mut CodegenState) {
        if self.each_keyword.is_some() {
            state.add_token("each ");
        }
        self.name.codegen(state);
        if let Some(ty) = &self.inherited_type {
            state.add_token(": ");
            ty.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasName for GenericParameter {
    fn name_token(&self) -> &Token {
        &self.name
    }
}

impl HasTrailingComma for GenericParameter {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericWhereClause {
    pub where_token: Token,
    pub requirements: Vec<GenericRequirement>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for GenericWhereClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("where ");
        state.add_list(&self.requirements);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRequirement {
    pub kind: RequirementKind,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementKind {
    /// `T: Protocol`
    Conformance { left: TypeNode, right: TypeNode },
    /// `T.Element == Int`
    SameType { left: TypeNode, right: TypeNode },
}

impl Codegen for GenericRequirement {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.kind {
            RequirementKind::Conformance { left, right } => {
                left.codegen(state);
                state.add_token(": ");
                right.codegen(state);
            }
            RequirementKind::SameType { left, right } => {
                left.codegen(state);
                state.add_token(" == ");
                right.codegen(state);
            }
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for GenericRequirement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceClause {
    pub colon: Token,
    pub types: Vec<InheritedType>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for InheritanceClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(": ");
        state.add_list(&self.types);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedType {
    pub ty: TypeNode,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for InheritedType {
    fn codegen(&self, state: &mut CodegenState) {
        self.ty.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for InheritedType {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

// ============================================================================
// Blocks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBlock {
    pub left_brace: Token,
    pub members: Vec<Decl>,
    pub right_brace: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for MemberBlock {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_block(&self.members);
    }
}

impl HasBraces for MemberBlock {
    fn left_brace(&self) -> &Token {
        &self.left_brace
    }
    fn right_brace(&self) -> &Token {
        &self.right_brace
    }
    fn codegen_brace_contents(&self, state: &mut CodegenState) {
        state.add_block_lines(&self.members);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub left_brace: Token,
    pub statements: Vec<Stmt>,
    pub right_brace: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for CodeBlock {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_block(&self.statements);
    }
}

impl HasBraces for CodeBlock {
    fn left_brace(&self) -> &Token {
        &self.left_brace
    }
    fn right_brace(&self) -> &Token {
        &self.right_brace
    }
    fn codegen_brace_contents(&self, state: &mut CodegenState) {
        state.add_block_lines(&self.statements);
    }
}

// ============================================================================
// Signatures
// ============================================================================

/// `async`, `throws`, `rethrows` and `throws(ErrorType)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectSpecifiers {
    pub async_specifier: Option<Token>,
    pub throws_clause: Option<ThrowsClause>,
}

impl EffectSpecifiers {
    pub fn is_empty(&self) -> bool {
        self.async_specifier.is_none() && self.throws_clause.is_none()
    }
}

/// Renders with a leading space when not empty, as effects always follow
/// another element.
impl Codegen for EffectSpecifiers {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(tok) = &self.async_specifier {
            state.add_space();
            tok.codegen(state);
        }
        if let Some(throws) = &self.throws_clause {
            state.add_space();
            throws.codegen(state);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowsClause {
    /// `throws` or `rethrows`.
    pub throws_token: Token,
    pub error_type: Option<TypeNode>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ThrowsClause {
    fn codegen(&self, state: &mut CodegenState) {
        self.throws_token.codegen(state);
        if let Some(ty) = &self.error_type {
            state.add_token("(");
            ty.codegen(state);
            state.add_token(")");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub parameter_clause: ParameterClause,
    pub effects: EffectSpecifiers,
    pub return_type: Option<TypeNode>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for FunctionSignature {
    fn codegen(&self, state: &mut CodegenState) {
        self.parameter_clause.codegen(state);
        self.effects.codegen(state);
        if let Some(ty) = &self.return_type {
            state.add_token(" -> ");
            ty.codegen(state);
        }
    }
}

impl HasEffectSpecifiers for FunctionSignature {
    fn effect_specifiers(&self) -> Option<&EffectSpecifiers> {
        Some(&self.effects)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterClause {
    pub left_paren: Token,
    pub parameters: Vec<FunctionParameter>,
    pub right_paren: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ParameterClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        self.codegen_paren_contents(state);
        state.add_token(")");
    }
}

impl HasParens for ParameterClause {
    fn left_paren(&self) -> &Token {
        &self.left_paren
    }
    fn right_paren(&self) -> &Token {
        &self.right_paren
    }
    fn codegen_paren_contents(&self, state: &mut CodegenState) {
        state.add_list(&self.parameters);
    }
}

/// `first second: Type... = default`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameter {
    pub attributes: Vec<Attribute>,
    pub first_name: Token,
    pub second_name: Option<Token>,
    pub ty: TypeNode,
    pub ellipsis: Option<Token>,
    pub default_value: Option<Expr>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for FunctionParameter {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        self.first_name.codegen(state);
        if let Some(second) = &self.second_name {
            state.add_space();
            second.codegen(state);
        }
        state.add_token(": ");
        self.ty.codegen(state);
        if self.ellipsis.is_some() {
            state.add_token("...");
        }
        if let Some(default) = &self.default_value {
            state.add_token(" = ");
            default.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasAttributes for FunctionParameter {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl HasTrailingComma for FunctionParameter {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

// ============================================================================
// Pattern bindings and accessors
// ============================================================================

/// One `pattern: Type = initializer { accessors }` element of a variable
/// declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBinding {
    pub pattern: Pattern,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expr>,
    pub accessor_block: Option<AccessorBlock>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for PatternBinding {
    fn codegen(&self, state: &mut CodegenState) {
        self.pattern.codegen(state);
        if let Some(ty) = &self.type_annotation {
            state.add_token(": ");
            ty.codegen(state);
        }
        if let Some(init) = &self.initializer {
            state.add_token(" = ");
            init.codegen(state);
        }
        if let Some(accessors) = &self.accessor_block {
            state.add_space();
            accessors.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for PatternBinding {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorBlock {
    pub left_brace: Token,
    pub accessors: Accessors,
    pub right_brace: Token,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessors {
    /// `var x: Int { body }`, a getter written without `get`.
    Getter(Vec<Stmt>),
    /// `{ get { } set { } }`, `{ willSet { } }`, `{ get set }`.
    Explicit(Vec<AccessorDecl>),
}

impl AccessorBlock {
    /// Accessor declarations, empty for the getter shorthand.
    pub fn accessor_decls(&self) -> &[AccessorDecl] {
        match &self.accessors {
            Accessors::Getter(_) => &[],
            Accessors::Explicit(decls) => decls,
        }
    }
}

impl Codegen for AccessorBlock {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.accessors {
            Accessors::Getter(stmts) => state.add_block(stmts),
            Accessors::Explicit(decls) if decls.iter().all(|d| d.body.is_none()) => {
                state.add_token("{ ");
                state.add_list(decls);
                state.add_token(" }");
            }
            Accessors::Explicit(decls) => state.add_block(decls),
        }
    }
}

impl HasBraces for AccessorBlock {
    fn left_brace(&self) -> &Token {
        &self.left_brace
    }
    fn right_brace(&self) -> &Token {
        &self.right_brace
    }
    fn codegen_brace_contents(&self, state: &mut CodegenState) {
        match &self.accessors {
            Accessors::Getter(stmts) => state.add_block_lines(stmts),
            Accessors::Explicit(decls) => state.add_block_lines(decls),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
    Read,
    Modify,
    Init,
}

impl AccessorKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "get" => AccessorKind::Get,
            "set" => AccessorKind::Set,
            "willSet" => AccessorKind::WillSet,
            "didSet" => AccessorKind::DidSet,
            "_read" => AccessorKind::Read,
            "_modify" => AccessorKind::Modify,
            "init" => AccessorKind::Init,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::WillSet => "willSet",
            AccessorKind::DidSet => "didSet",
            AccessorKind::Read => "_read",
            AccessorKind::Modify => "_modify",
            AccessorKind::Init => "init",
        }
    }

    /// Whether the accessor observes or performs writes to storage.
    pub fn is_mutating_access(&self) -> bool {
        matches!(
            self,
            AccessorKind::Set | AccessorKind::WillSet | AccessorKind::DidSet | AccessorKind::Modify
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub kind: AccessorKind,
    pub keyword: Token,
    /// `set(newValue)`
    pub parameter: Option<Token>,
    pub effects: EffectSpecifiers,
    pub body: Option<CodeBlock>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for AccessorDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        self.keyword.codegen(state);
        if let Some(param) = &self.parameter {
            state.add_token("(");
            param.codegen(state);
            state.add_token(")");
        }
        self.effects.codegen(state);
        if let Some(body) = &self.body {
            state.add_space();
            body.codegen(state);
        }
    }
}

impl HasAttributes for AccessorDecl {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl HasModifiers for AccessorDecl {
    fn modifiers(&self) -> &[DeclModifier] {
        &self.modifiers
    }
}

impl HasCodeBlock for AccessorDecl {
    fn body(&self) -> Option<&CodeBlock> {
        self.body.as_ref()
    }
}

impl HasEffectSpecifiers for AccessorDecl {
    fn effect_specifiers(&self) -> Option<&EffectSpecifiers> {
        Some(&self.effects)
    }
}
