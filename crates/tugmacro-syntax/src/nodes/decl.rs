// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration syntax.

use crate::nodes::common::{codegen_comma, codegen_prefix_list};
use crate::nodes::traits::{
    HasAttributes, HasCodeBlock, HasEffectSpecifiers, HasGenericParameters,
    HasGenericWhereClause, HasInheritanceClause, HasMemberBlock, HasModifiers, HasName,
    HasParens, HasSignature, HasTrailingComma, NodeId,
};
use crate::nodes::{
    Attribute, CodeBlock, Codegen, CodegenState, DeclModifier, EffectSpecifiers, Expr,
    FunctionSignature, GenericParameterClause, GenericWhereClause, InheritanceClause,
    MemberBlock, PatternBinding, SyntaxKind, Token, TypeNode,
};
use tugmacro_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Struct(Box<StructDecl>),
    Class(Box<ClassDecl>),
    Enum(Box<EnumDecl>),
    Actor(Box<ActorDecl>),
    Protocol(Box<ProtocolDecl>),
    Extension(Box<ExtensionDecl>),
    Variable(Box<VariableDecl>),
    Function(Box<FunctionDecl>),
    Initializer(Box<InitializerDecl>),
    Deinitializer(Box<DeinitializerDecl>),
    TypeAlias(Box<TypeAliasDecl>),
    AssociatedType(Box<AssociatedTypeDecl>),
    EnumCase(Box<EnumCaseDecl>),
}

macro_rules! decl_dispatch {
    ($self:ident, $d:ident => $e:expr) => {
        match $self {
            Decl::Struct($d) => $e,
            Decl::Class($d) => $e,
            Decl::Enum($d) => $e,
            Decl::Actor($d) => $e,
            Decl::Protocol($d) => $e,
            Decl::Extension($d) => $e,
            Decl::Variable($d) => $e,
            Decl::Function($d) => $e,
            Decl::Initializer($d) => $e,
            Decl::Deinitializer($d) => $e,
            Decl::TypeAlias($d) => $e,
            Decl::AssociatedType($d) => $e,
            Decl::EnumCase($d) => $e,
        }
    };
}

impl Decl {
    pub fn id(&self) -> NodeId {
        decl_dispatch!(self, d => d.id)
    }

    pub fn span(&self) -> Span {
        decl_dispatch!(self, d => d.span)
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            Decl::Struct(_) => SyntaxKind::StructDecl,
            Decl::Class(_) => SyntaxKind::ClassDecl,
            Decl::Enum(_) => SyntaxKind::EnumDecl,
            Decl::Actor(_) => SyntaxKind::ActorDecl,
            Decl::Protocol(_) => SyntaxKind::ProtocolDecl,
            Decl::Extension(_) => SyntaxKind::ExtensionDecl,
            Decl::Variable(_) => SyntaxKind::VariableDecl,
            Decl::Function(_) => SyntaxKind::FunctionDecl,
            Decl::Initializer(_) => SyntaxKind::InitializerDecl,
            Decl::Deinitializer(_) => SyntaxKind::DeinitializerDecl,
            Decl::TypeAlias(_) => SyntaxKind::TypeAliasDecl,
            Decl::AssociatedType(_) => SyntaxKind::AssociatedTypeDecl,
            Decl::EnumCase(_) => SyntaxKind::EnumCaseDecl,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        decl_dispatch!(self, d => &d.attributes)
    }

    pub fn modifiers(&self) -> &[DeclModifier] {
        decl_dispatch!(self, d => &d.modifiers)
    }

    /// The declared name, for declarations introduced by one.
    pub fn name(&self) -> Option<&Token> {
        match self {
            Decl::Struct(d) => Some(&d.name),
            Decl::Class(d) => Some(&d.name),
            Decl::Enum(d) => Some(&d.name),
            Decl::Actor(d) => Some(&d.name),
            Decl::Protocol(d) => Some(&d.name),
            Decl::Function(d) => Some(&d.name),
            Decl::TypeAlias(d) => Some(&d.name),
            Decl::AssociatedType(d) => Some(&d.name),
            _ => None,
        }
    }
}

impl Codegen for Decl {
    fn codegen(&self, state: &mut CodegenState) {
        decl_dispatch!(self, d => d.codegen(state))
    }
}

// ============================================================================
// Capability impls
// ============================================================================

macro_rules! impl_attributes_and_modifiers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasAttributes for $ty {
                fn attributes(&self) -> &[Attribute] {
                    &self.attributes
                }
            }

            impl HasModifiers for $ty {
                fn modifiers(&self) -> &[DeclModifier] {
                    &self.modifiers
                }
            }
        )*
    };
}

macro_rules! impl_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasName for $ty {
                fn name_token(&self) -> &Token {
                    &self.name
                }
            }
        )*
    };
}

macro_rules! impl_generic_parameters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasGenericParameters for $ty {
                fn generic_parameter_clause(&self) -> Option<&GenericParameterClause> {
                    self.generic_parameters.as_ref()
                }
            }
        )*
    };
}

macro_rules! impl_where_clause {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasGenericWhereClause for $ty {
                fn generic_where_clause(&self) -> Option<&GenericWhereClause> {
                    self.where_clause.as_ref()
                }
            }
        )*
    };
}

macro_rules! impl_inheritance {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasInheritanceClause for $ty {
                fn inheritance_clause(&self) -> Option<&InheritanceClause> {
                    self.inheritance.as_ref()
                }
            }
        )*
    };
}

macro_rules! impl_member_block {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasMemberBlock for $ty {
                fn member_block(&self) -> &MemberBlock {
                    &self.members
                }
            }
        )*
    };
}

macro_rules! impl_code_block {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasCodeBlock for $ty {
                fn body(&self) -> Option<&CodeBlock> {
                    self.body.as_ref()
                }
            }
        )*
    };
}

macro_rules! impl_signature {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasSignature for $ty {
                fn signature(&self) -> &FunctionSignature {
                    &self.signature
                }
            }

            impl HasEffectSpecifiers for $ty {
                fn effect_specifiers(&self) -> Option<&EffectSpecifiers> {
                    Some(&self.signature.effects)
                }
            }
        )*
    };
}

impl_attributes_and_modifiers!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
    VariableDecl,
    FunctionDecl,
    InitializerDecl,
    DeinitializerDecl,
    TypeAliasDecl,
    AssociatedTypeDecl,
    EnumCaseDecl,
);
impl_name!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    FunctionDecl,
    TypeAliasDecl,
    AssociatedTypeDecl,
    EnumCaseElement,
);
impl_generic_parameters!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    FunctionDecl,
    InitializerDecl,
    TypeAliasDecl,
);
impl_where_clause!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
    FunctionDecl,
    InitializerDecl,
    AssociatedTypeDecl,
);
impl_inheritance!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
    AssociatedTypeDecl,
);
impl_member_block!(
    StructDecl,
    ClassDecl,
    EnumDecl,
    ActorDecl,
    ProtocolDecl,
    ExtensionDecl,
);
impl_code_block!(FunctionDecl, InitializerDecl, DeinitializerDecl);
impl_signature!(FunctionDecl, InitializerDecl);

// ============================================================================
// Declaration groups
// ============================================================================

struct GroupParts<'a> {
    attributes: &'a [Attribute],
    modifiers: &'a [DeclModifier],
    keyword: &'a str,
    generic_parameters: Option<&'a GenericParameterClause>,
    inheritance: Option<&'a InheritanceClause>,
    where_clause: Option<&'a GenericWhereClause>,
    members: &'a MemberBlock,
}

fn codegen_group(parts: GroupParts<'_>, name: &dyn Codegen, state: &mut CodegenState) {
    codegen_prefix_list(parts.attributes, state);
    codegen_prefix_list(parts.modifiers, state);
    state.add_token(parts.keyword);
    state.add_space();
    name.codegen(state);
    if let Some(generics) = parts.generic_parameters {
        generics.codegen(state);
    }
    if let Some(inheritance) = parts.inheritance {
        inheritance.codegen(state);
    }
    if let Some(where_clause) = parts.where_clause {
        state.add_space();
        where_clause.codegen(state);
    }
    state.add_space();
    parts.members.codegen(state);
}

macro_rules! nominal_decl {
    ($(#[$doc:meta])* $name:ident, $keyword:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub attributes: Vec<Attribute>,
            pub modifiers: Vec<DeclModifier>,
            pub keyword: Token,
            pub name: Token,
            pub generic_parameters: Option<GenericParameterClause>,
            pub inheritance: Option<InheritanceClause>,
            pub where_clause: Option<GenericWhereClause>,
            pub members: MemberBlock,
            pub id: NodeId,
            pub span: Span,
        }

        impl Codegen for $name {
            fn codegen(&self, state: &mut CodegenState) {
                let parts = GroupParts {
                    attributes: &self.attributes,
                    modifiers: &self.modifiers,
                    keyword: $keyword,
                    generic_parameters: self.generic_parameters.as_ref(),
                    inheritance: self.inheritance.as_ref(),
                    where_clause: self.where_clause.as_ref(),
                    members: &self.members,
                };
                codegen_group(parts, &self.name, state);
            }
        }
    };
}

nominal_decl!(
    /// A value type: `struct Name<T>: Protocols { ... }`.
    StructDecl,
    "struct"
);
nominal_decl!(
    /// A reference type: `class Name: Superclass { ... }`.
    ClassDecl,
    "class"
);
nominal_decl!(
    /// A tagged union: `enum Name: RawType { case ... }`.
    EnumDecl,
    "enum"
);
nominal_decl!(
    /// A concurrency-isolated reference type: `actor Name { ... }`.
    ActorDecl,
    "actor"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub name: Token,
    pub inheritance: Option<InheritanceClause>,
    pub where_clause: Option<GenericWhereClause>,
    pub members: MemberBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ProtocolDecl {
    fn codegen(&self, state: &mut CodegenState) {
        let parts = GroupParts {
            attributes: &self.attributes,
            modifiers: &self.modifiers,
            keyword: "protocol",
            generic_parameters: None,
            inheritance: self.inheritance.as_ref(),
            where_clause: self.where_clause.as_ref(),
            members: &self.members,
        };
        codegen_group(parts, &self.name, state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub extended_type: TypeNode,
    pub inheritance: Option<InheritanceClause>,
    pub where_clause: Option<GenericWhereClause>,
    pub members: MemberBlock,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ExtensionDecl {
    fn codegen(&self, state: &mut CodegenState) {
        let parts = GroupParts {
            attributes: &self.attributes,
            modifiers: &self.modifiers,
            keyword: "extension",
            generic_parameters: None,
            inheritance: self.inheritance.as_ref(),
            where_clause: self.where_clause.as_ref(),
            members: &self.members,
        };
        codegen_group(parts, &self.extended_type, state);
    }
}

// ============================================================================
// Members
// ============================================================================

/// `let` / `var` with one or more comma-separated pattern bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    /// `let` or `var`
    pub binding_specifier: Token,
    pub bindings: Vec<PatternBinding>,
    pub id: NodeId,
    pub span: Span,
}

impl VariableDecl {
    pub fn is_let(&self) -> bool {
        self.binding_specifier.is("let")
    }
}

impl Codegen for VariableDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        self.binding_specifier.codegen(state);
        state.add_space();
        state.add_list(&self.bindings);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    /// An identifier, or an operator for operator implementations.
    pub name: Token,
    pub generic_parameters: Option<GenericParameterClause>,
    pub signature: FunctionSignature,
    pub where_clause: Option<GenericWhereClause>,
    pub body: Option<CodeBlock>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for FunctionDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("func ");
        self.name.codegen(state);
        // Operator names need a space before a generic clause or `(`.
        if self.name.text.starts_with(|c: char| !(c.is_alphanumeric() || c == '_' || c == '`')) {
            state.add_space();
        }
        self.generic_parameters.codegen(state);
        self.signature.codegen(state);
        codegen_where_and_body(self.where_clause.as_ref(), self.body.as_ref(), state);
    }
}

fn codegen_where_and_body(
    where_clause: Option<&GenericWhereClause>,
    body: Option<&CodeBlock>,
    state: &mut CodegenState,
) {
    if let Some(where_clause) = where_clause {
        state.add_space();
        where_clause.codegen(state);
    }
    if let Some(body) = body {
        state.add_space();
        body.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    /// `?` or `!` for failable initializers.
    pub optional_mark: Option<Token>,
    pub generic_parameters: Option<GenericParameterClause>,
    pub signature: FunctionSignature,
    pub where_clause: Option<GenericWhereClause>,
    pub body: Option<CodeBlock>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for InitializerDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("init");
        self.optional_mark.codegen(state);
        self.generic_parameters.codegen(state);
        self.signature.codegen(state);
        codegen_where_and_body(self.where_clause.as_ref(), self.body.as_ref(), state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeinitializerDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub body: Option<CodeBlock>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for DeinitializerDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("deinit");
        codegen_where_and_body(None, self.body.as_ref(), state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub name: Token,
    pub generic_parameters: Option<GenericParameterClause>,
    pub aliased: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TypeAliasDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("typealias ");
        self.name.codegen(state);
        self.generic_parameters.codegen(state);
        state.add_token(" = ");
        self.aliased.codegen(state);
    }
}

/// A protocol's `associatedtype Name: Constraint = Default where ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedTypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub name: Token,
    pub inheritance: Option<InheritanceClause>,
    pub default_type: Option<TypeNode>,
    pub where_clause: Option<GenericWhereClause>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for AssociatedTypeDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("associatedtype ");
        self.name.codegen(state);
        self.inheritance.codegen(state);
        if let Some(default) = &self.default_type {
            state.add_token(" = ");
            default.codegen(state);
        }
        if let Some(where_clause) = &self.where_clause {
            state.add_space();
            where_clause.codegen(state);
        }
    }
}

// ============================================================================
// Enum cases
// ============================================================================

/// `case a, b(Int), c = 3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<DeclModifier>,
    pub keyword: Token,
    pub elements: Vec<EnumCaseElement>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for EnumCaseDecl {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.attributes, state);
        codegen_prefix_list(&self.modifiers, state);
        state.add_token("case ");
        state.add_list(&self.elements);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseElement {
    pub name: Token,
    pub parameter_clause: Option<EnumCaseParameterClause>,
    pub raw_value: Option<Expr>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for EnumCaseElement {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.parameter_clause.codegen(state);
        if let Some(raw) = &self.raw_value {
            state.add_token(" = ");
            raw.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for EnumCaseElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseParameterClause {
    pub left_paren: Token,
    pub parameters: Vec<EnumCaseParameter>,
    pub right_paren: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for EnumCaseParameterClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        self.codegen_paren_contents(state);
        state.add_token(")");
    }
}

impl HasParens for EnumCaseParameterClause {
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

/// An associated value slot: `Int`, `value: Int`, `_ value: Int = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseParameter {
    pub first_name: Option<Token>,
    pub second_name: Option<Token>,
    pub ty: TypeNode,
    pub default_value: Option<Expr>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for EnumCaseParameter {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(first) = &self.first_name {
            first.codegen(state);
            if let Some(second) = &self.second_name {
                state.add_space();
                second.codegen(state);
            }
            state.add_token(": ");
        }
        self.ty.codegen(state);
        if let Some(default) = &self.default_value {
            state.add_token(" = ");
            default.codegen(state);
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for EnumCaseParameter {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}
