// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type syntax.

use crate::nodes::common::{codegen_comma, codegen_prefix_list};
use crate::nodes::traits::{HasEffectSpecifiers, HasParens, HasTrailingComma, NodeId};
use crate::nodes::{Attribute, Codegen, CodegenState, EffectSpecifiers, Token};
use tugmacro_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// `Int`, `Array<Int>`, `Self`
    Identifier(IdentifierType),
    /// `Outer.Inner`, `T.Element`
    Member(Box<MemberType>),
    /// `Int?`
    Optional(Box<OptionalType>),
    /// `Int!`
    ImplicitlyUnwrapped(Box<OptionalType>),
    /// `[Int]`
    Array(Box<ArrayType>),
    /// `[String: Int]`
    Dictionary(Box<DictionaryType>),
    /// `(Int, label: String)`, `()`
    Tuple(TupleType),
    /// `(Int) async throws -> String`
    Function(Box<FunctionType>),
    /// `inout Int`, `@escaping () -> Void`
    Attributed(Box<AttributedType>),
    /// `A & B`
    Composition(CompositionType),
    /// `some P`, `any P`
    SomeOrAny(Box<SomeOrAnyType>),
    /// `repeat T`
    PackExpansion(Box<PackType>),
    /// `each T`
    PackElement(Box<PackType>),
}

impl TypeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TypeNode::Identifier(t) => t.id,
            TypeNode::Member(t) => t.id,
            TypeNode::Optional(t) | TypeNode::ImplicitlyUnwrapped(t) => t.id,
            TypeNode::Array(t) => t.id,
            TypeNode::Dictionary(t) => t.id,
            TypeNode::Tuple(t) => t.id,
            TypeNode::Function(t) => t.id,
            TypeNode::Attributed(t) => t.id,
            TypeNode::Composition(t) => t.id,
            TypeNode::SomeOrAny(t) => t.id,
            TypeNode::PackExpansion(t) | TypeNode::PackElement(t) => t.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeNode::Identifier(t) => t.span,
            TypeNode::Member(t) => t.span,
            TypeNode::Optional(t) | TypeNode::ImplicitlyUnwrapped(t) => t.span,
            TypeNode::Array(t) => t.span,
            TypeNode::Dictionary(t) => t.span,
            TypeNode::Tuple(t) => t.span,
            TypeNode::Function(t) => t.span,
            TypeNode::Attributed(t) => t.span,
            TypeNode::Composition(t) => t.span,
            TypeNode::SomeOrAny(t) => t.span,
            TypeNode::PackExpansion(t) | TypeNode::PackElement(t) => t.span,
        }
    }
}

impl Codegen for TypeNode {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            TypeNode::Identifier(t) => t.codegen(state),
            TypeNode::Member(t) => t.codegen(state),
            TypeNode::Optional(t) | TypeNode::ImplicitlyUnwrapped(t) => t.codegen(state),
            TypeNode::Array(t) => t.codegen(state),
            TypeNode::Dictionary(t) => t.codegen(state),
            TypeNode::Tuple(t) => t.codegen(state),
            TypeNode::Function(t) => t.codegen(state),
            TypeNode::Attributed(t) => t.codegen(state),
            TypeNode::Composition(t) => t.codegen(state),
            TypeNode::SomeOrAny(t) => t.codegen(state),
            TypeNode::PackExpansion(t) | TypeNode::PackElement(t) => t.codegen(state),
        }
    }
}

/// `<Int, String>` after a type or expression name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericArgumentClause {
    pub left_angle: Token,
    pub arguments: Vec<GenericArgument>,
    pub right_angle: Token,
    pub id: NodeId,
    pub span: Span,
}

impl GenericArgumentClause {
    pub fn types(&self) -> impl Iterator<Item = &TypeNode> {
        self.arguments.iter().map(|a| &a.ty)
    }
}

impl Codegen for GenericArgumentClause {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("<");
        state.add_list(&self.arguments);
        state.add_token(">");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericArgument {
    pub ty: TypeNode,
    pub trailing_comma: Option<Token>,
}

impl Codegen for GenericArgument {
    fn codegen(&self, state: &mut CodegenState) {
        self.ty.codegen(state);
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for GenericArgument {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierType {
    pub name: Token,
    pub generic_arguments: Option<GenericArgumentClause>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for IdentifierType {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.generic_arguments.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberType {
    pub base: TypeNode,
    pub name: Token,
    pub generic_arguments: Option<GenericArgumentClause>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for MemberType {
    fn codegen(&self, state: &mut CodegenState) {
        self.base.codegen(state);
        state.add_token(".");
        self.name.codegen(state);
        self.generic_arguments.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalType {
    pub wrapped: TypeNode,
    /// `?` or `!`
    pub mark: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for OptionalType {
    fn codegen(&self, state: &mut CodegenState) {
        // A function type has to be parenthesized before it can be wrapped.
        let needs_parens = matches!(
            self.wrapped,
            TypeNode::Function(_) | TypeNode::Composition(_) | TypeNode::SomeOrAny(_)
        );
        if needs_parens {
            state.add_token("(");
        }
        self.wrapped.codegen(state);
        if needs_parens {
            state.add_token(")");
        }
        self.mark.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub left_square: Token,
    pub element: TypeNode,
    pub right_square: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for ArrayType {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("[");
        self.element.codegen(state);
        state.add_token("]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryType {
    pub left_square: Token,
    pub key: TypeNode,
    pub value: TypeNode,
    pub right_square: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for DictionaryType {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("[");
        self.key.codegen(state);
        state.add_token(": ");
        self.value.codegen(state);
        state.add_token("]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
    pub left_paren: Token,
    pub elements: Vec<TupleTypeElement>,
    pub right_paren: Token,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TupleType {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        self.codegen_paren_contents(state);
        state.add_token(")");
    }
}

impl HasParens for TupleType {
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

/// `Int`, `label: Int`, `_ name: Int`, `Int...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleTypeElement {
    pub first_name: Option<Token>,
    pub second_name: Option<Token>,
    pub ty: TypeNode,
    pub ellipsis: Option<Token>,
    pub trailing_comma: Option<Token>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for TupleTypeElement {
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
        if self.ellipsis.is_some() {
            state.add_token("...");
        }
        codegen_comma(&self.trailing_comma, state);
    }
}

impl HasTrailingComma for TupleTypeElement {
    fn trailing_comma(&self) -> Option<&Token> {
        self.trailing_comma.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub parameters: TupleType,
    pub effects: EffectSpecifiers,
    pub return_type: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for FunctionType {
    fn codegen(&self, state: &mut CodegenState) {
        self.parameters.codegen(state);
        self.effects.codegen(state);
        state.add_token(" -> ");
        self.return_type.codegen(state);
    }
}

impl HasEffectSpecifiers for FunctionType {
    fn effect_specifiers(&self) -> Option<&EffectSpecifiers> {
        Some(&self.effects)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributedType {
    /// `inout`, `borrowing`, `consuming`, `sending`, `__owned`, `__shared`
    pub specifiers: Vec<Token>,
    pub attributes: Vec<Attribute>,
    pub base: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for AttributedType {
    fn codegen(&self, state: &mut CodegenState) {
        codegen_prefix_list(&self.specifiers, state);
        codegen_prefix_list(&self.attributes, state);
        self.base.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionType {
    pub elements: Vec<TypeNode>,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for CompositionType {
    fn codegen(&self, state: &mut CodegenState) {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                state.add_token(" & ");
            }
            element.codegen(state);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SomeOrAnyType {
    /// `some` or `any`
    pub keyword: Token,
    pub constraint: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for SomeOrAnyType {
    fn codegen(&self, state: &mut CodegenState) {
        self.keyword.codegen(state);
        state.add_space();
        self.constraint.codegen(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackType {
    /// `repeat` or `each`
    pub keyword: Token,
    pub base: TypeNode,
    pub id: NodeId,
    pub span: Span,
}

impl Codegen for PackType {
    fn codegen(&self, state: &mut CodegenState) {
        self.keyword.codegen(state);
        state.add_space();
        self.base.codegen(state);
    }
}
