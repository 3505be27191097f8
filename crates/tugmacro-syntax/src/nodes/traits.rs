// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core traits and types for syntax nodes.
//!
//! # Node Identity
//!
//! [`NodeId`] provides stable identity for syntax nodes. Each node receives a
//! unique, deterministic identifier while the parser builds it. The same input
//! text always yields the same assignments. Identifiers are not dense: a
//! grammar alternative that is abandoned during backtracking still consumes
//! the ids it drew.
//!
//! # Structural Capabilities
//!
//! The `Has*` traits describe which optional structural elements a node kind
//! carries. Each is implemented exactly once per node kind that has the
//! element, so higher layers can write one accessor keyed on the trait rather
//! than one per node kind.

use crate::nodes::{
    Attribute, CodeBlock, DeclModifier, EffectSpecifiers, FunctionSignature,
    GenericParameterClause, GenericWhereClause, InheritanceClause, MemberBlock, Token,
};
use crate::CodegenState;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable, unique identifier for a syntax node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Generator for assigning sequential [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    /// Create a new generator starting from NodeId(0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the current count of generated NodeIds.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Structural Capabilities
// ============================================================================

/// A node introduced by a name token.
pub trait HasName {
    fn name_token(&self) -> &Token;
}

/// A node that may be preceded by `@attribute`s.
pub trait HasAttributes {
    fn attributes(&self) -> &[Attribute];
}

/// A declaration that may carry modifiers such as `public` or `static`.
pub trait HasModifiers {
    fn modifiers(&self) -> &[DeclModifier];
}

pub trait HasGenericParameters {
    fn generic_parameter_clause(&self) -> Option<&GenericParameterClause>;
}

pub trait HasGenericWhereClause {
    fn generic_where_clause(&self) -> Option<&GenericWhereClause>;
}

pub trait HasInheritanceClause {
    fn inheritance_clause(&self) -> Option<&InheritanceClause>;
}

/// A declaration group with a `{ ... }` list of member declarations.
pub trait HasMemberBlock {
    fn member_block(&self) -> &MemberBlock;
}

/// A node with an optional statement body.
///
/// Bodiless forms, like protocol requirements, return `None`.
pub trait HasCodeBlock {
    fn body(&self) -> Option<&CodeBlock>;
}

/// A function-like declaration with a parameter clause, effects and return.
pub trait HasSignature {
    fn signature(&self) -> &FunctionSignature;
}

pub trait HasEffectSpecifiers {
    fn effect_specifiers(&self) -> Option<&EffectSpecifiers>;
}

/// A node delimited by `{` and `}`.
pub trait HasBraces {
    fn left_brace(&self) -> &Token;
    fn right_brace(&self) -> &Token;
    /// Render the children between the two braces.
    fn codegen_brace_contents(&self, state: &mut CodegenState);
}

/// A node delimited by `(` and `)`.
pub trait HasParens {
    fn left_paren(&self) -> &Token;
    fn right_paren(&self) -> &Token;
    /// Render the children between the two parentheses.
    fn codegen_paren_contents(&self, state: &mut CodegenState);
}

/// An element of a comma-separated list.
pub trait HasTrailingComma {
    fn trailing_comma(&self) -> Option<&Token>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_sequential() {
        let mut ids = NodeIdGenerator::new();
        assert_eq!(ids.next_id(), NodeId(0));
        assert_eq!(ids.next_id(), NodeId(1));
        assert_eq!(ids.count(), 2);
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}
