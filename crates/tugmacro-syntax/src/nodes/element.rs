// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Kind-tagged snapshots of nodes, used to anchor diagnostics and edits.

use crate::nodes::traits::NodeId;
use crate::nodes::{
    Attribute, CodeBlock, Codegen, CodegenState, Decl, DeclModifier, EnumCaseElement, Expr,
    FunctionParameter, GenericParameter, MemberBlock, ParameterClause, Pattern, PatternBinding,
    Stmt, Token, TypeNode,
};
use serde::Serialize;
use tugmacro_core::Span;

/// The kind tag of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    Token,
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
    EnumCaseElement,
    Statement,
    Expression,
    Type,
    Pattern,
    Attribute,
    Modifier,
    PatternBinding,
    Parameter,
    ParameterClause,
    GenericParameter,
    CodeBlock,
    MemberBlock,
}

impl SyntaxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxKind::Token => "token",
            SyntaxKind::StructDecl => "struct_decl",
            SyntaxKind::ClassDecl => "class_decl",
            SyntaxKind::EnumDecl => "enum_decl",
            SyntaxKind::ActorDecl => "actor_decl",
            SyntaxKind::ProtocolDecl => "protocol_decl",
            SyntaxKind::ExtensionDecl => "extension_decl",
            SyntaxKind::VariableDecl => "variable_decl",
            SyntaxKind::FunctionDecl => "function_decl",
            SyntaxKind::InitializerDecl => "initializer_decl",
            SyntaxKind::DeinitializerDecl => "deinitializer_decl",
            SyntaxKind::TypeAliasDecl => "type_alias_decl",
            SyntaxKind::AssociatedTypeDecl => "associated_type_decl",
            SyntaxKind::EnumCaseDecl => "enum_case_decl",
            SyntaxKind::EnumCaseElement => "enum_case_element",
            SyntaxKind::Statement => "statement",
            SyntaxKind::Expression => "expression",
            SyntaxKind::Type => "type",
            SyntaxKind::Pattern => "pattern",
            SyntaxKind::Attribute => "attribute",
            SyntaxKind::Modifier => "modifier",
            SyntaxKind::PatternBinding => "pattern_binding",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::ParameterClause => "parameter_clause",
            SyntaxKind::GenericParameter => "generic_parameter",
            SyntaxKind::CodeBlock => "code_block",
            SyntaxKind::MemberBlock => "member_block",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An owned snapshot of any node or token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Token(Token),
    Decl(Decl),
    Stmt(Stmt),
    Expr(Expr),
    Type(TypeNode),
    Pattern(Pattern),
    Attribute(Attribute),
    Modifier(DeclModifier),
    Binding(PatternBinding),
    Parameter(FunctionParameter),
    ParameterClause(ParameterClause),
    GenericParameter(GenericParameter),
    CaseElement(EnumCaseElement),
    CodeBlock(CodeBlock),
    MemberBlock(MemberBlock),
}

impl SyntaxElement {
    pub fn id(&self) -> NodeId {
        match self {
            SyntaxElement::Token(n) => n.id,
            SyntaxElement::Decl(n) => n.id(),
            SyntaxElement::Stmt(n) => n.id(),
            SyntaxElement::Expr(n) => n.id(),
            SyntaxElement::Type(n) => n.id(),
            SyntaxElement::Pattern(n) => n.id(),
            SyntaxElement::Attribute(n) => n.id,
            SyntaxElement::Modifier(n) => n.id,
            SyntaxElement::Binding(n) => n.id,
            SyntaxElement::Parameter(n) => n.id,
            SyntaxElement::ParameterClause(n) => n.id,
            SyntaxElement::GenericParameter(n) => n.id,
            SyntaxElement::CaseElement(n) => n.id,
            SyntaxElement::CodeBlock(n) => n.id,
            SyntaxElement::MemberBlock(n) => n.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Token(n) => n.span,
            SyntaxElement::Decl(n) => n.span(),
            SyntaxElement::Stmt(n) => n.span(),
            SyntaxElement::Expr(n) => n.span(),
            SyntaxElement::Type(n) => n.span(),
            SyntaxElement::Pattern(n) => n.span(),
            SyntaxElement::Attribute(n) => n.span,
            SyntaxElement::Modifier(n) => n.span,
            SyntaxElement::Binding(n) => n.span,
            SyntaxElement::Parameter(n) => n.span,
            SyntaxElement::ParameterClause(n) => n.span,
            SyntaxElement::GenericParameter(n) => n.span,
            SyntaxElement::CaseElement(n) => n.span,
            SyntaxElement::CodeBlock(n) => n.span,
            SyntaxElement::MemberBlock(n) => n.span,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Token(_) => SyntaxKind::Token,
            SyntaxElement::Decl(n) => n.kind(),
            SyntaxElement::Stmt(_) => SyntaxKind::Statement,
            SyntaxElement::Expr(_) => SyntaxKind::Expression,
            SyntaxElement::Type(_) => SyntaxKind::Type,
            SyntaxElement::Pattern(_) => SyntaxKind::Pattern,
            SyntaxElement::Attribute(_) => SyntaxKind::Attribute,
            SyntaxElement::Modifier(_) => SyntaxKind::Modifier,
            SyntaxElement::Binding(_) => SyntaxKind::PatternBinding,
            SyntaxElement::Parameter(_) => SyntaxKind::Parameter,
            SyntaxElement::ParameterClause(_) => SyntaxKind::ParameterClause,
            SyntaxElement::GenericParameter(_) => SyntaxKind::GenericParameter,
            SyntaxElement::CaseElement(_) => SyntaxKind::EnumCaseElement,
            SyntaxElement::CodeBlock(_) => SyntaxKind::CodeBlock,
            SyntaxElement::MemberBlock(_) => SyntaxKind::MemberBlock,
        }
    }

    /// Canonical source text of the element.
    pub fn text(&self) -> String {
        self.to_source()
    }
}

impl Codegen for SyntaxElement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            SyntaxElement::Token(n) => n.codegen(state),
            SyntaxElement::Decl(n) => n.codegen(state),
            SyntaxElement::Stmt(n) => n.codegen(state),
            SyntaxElement::Expr(n) => n.codegen(state),
            SyntaxElement::Type(n) => n.codegen(state),
            SyntaxElement::Pattern(n) => n.codegen(state),
            SyntaxElement::Attribute(n) => n.codegen(state),
            SyntaxElement::Modifier(n) => n.codegen(state),
            SyntaxElement::Binding(n) => n.codegen(state),
            SyntaxElement::Parameter(n) => n.codegen(state),
            SyntaxElement::ParameterClause(n) => n.codegen(state),
            SyntaxElement::GenericParameter(n) => n.codegen(state),
            SyntaxElement::CaseElement(n) => n.codegen(state),
            SyntaxElement::CodeBlock(n) => n.codegen(state),
            SyntaxElement::MemberBlock(n) => n.codegen(state),
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for SyntaxElement {
                fn from(node: $ty) -> Self {
                    SyntaxElement::$variant(node)
                }
            }

            impl From<&$ty> for SyntaxElement {
                fn from(node: &$ty) -> Self {
                    SyntaxElement::$variant(node.clone())
                }
            }
        )*
    };
}

impl_from_node!(
    Token(Token),
    Decl(Decl),
    Stmt(Stmt),
    Expr(Expr),
    Type(TypeNode),
    Pattern(Pattern),
    Attribute(Attribute),
    Modifier(DeclModifier),
    Binding(PatternBinding),
    Parameter(FunctionParameter),
    ParameterClause(ParameterClause),
    GenericParameter(GenericParameter),
    CaseElement(EnumCaseElement),
    CodeBlock(CodeBlock),
    MemberBlock(MemberBlock),
);
