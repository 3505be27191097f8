// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Typed, read-only views over parsed declarations.
//!
//! A reader wraps a borrowed node and answers questions about it. Readers
//! never fail loudly: constructing a declaration reader from a node of the
//! wrong kind yields `None`, and every accessor returns owned strings, `Option`
//! or collections of further readers.
//!
//! # Structure
//!
//! - [`Reader`] is the core every reader implements: node, identity, span,
//!   kind, rendered text, a kind-tagged snapshot, and diagnostic entry points.
//! - The traits in [`capability`] add accessors keyed on the structural
//!   `Has*` traits of the syntax crate. A reader gains a capability exactly
//!   when its node has the matching structure, so `StructReader` has
//!   [`GenericParameterReader`] and `ProtocolReader` does not.
//! - Concrete readers live in [`decl`], with descriptors for bindings,
//!   parameters, enum cases, generics, types, expressions and attributes in
//!   their own modules.
//!
//! ```
//! use tugmacro::reader::{MemberBlockReader, NamedReader, StructReader};
//! use tugmacro_syntax::parse_decl;
//!
//! let decl = parse_decl("struct Point { var x: Int\n let y: Int }").unwrap();
//! let point = StructReader::new(&decl).unwrap();
//! assert_eq!(point.name(), "Point");
//! let names: Vec<_> = point.properties().iter().map(|p| p.name().to_string()).collect();
//! assert_eq!(names, ["x", "y"]);
//! ```

use tugmacro_core::Span;
use tugmacro_syntax::{
    ActorDecl, AssociatedTypeDecl, Attribute, ClassDecl, ClosureExpr, CodeBlock, Codegen, Decl,
    DeclModifier, DeinitializerDecl, EnumCaseDecl, EnumCaseElement, EnumDecl, Expr,
    ExtensionDecl, FunctionDecl, FunctionParameter, GenericParameter, InitializerDecl,
    MemberBlock, NodeId, ParameterClause, Pattern, PatternBinding, ProtocolDecl, Stmt,
    StructDecl, SwitchStmt, SyntaxElement, SyntaxKind, Token, TupleExpr, TuplePattern,
    TupleType, TypeAliasDecl, TypeNode, VariableDecl,
};

use crate::diagnostics::{DiagnosticBuilder, Severity};

/// Declare a `Copy` reader wrapping one borrowed node type.
macro_rules! node_reader {
    ($(#[$doc:meta])* $name:ident => $node:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            node: &'a $node,
        }

        impl<'a> $name<'a> {
            /// Wrap a node of the matching kind.
            pub fn from_node(node: &'a $node) -> Self {
                $name { node }
            }
        }

        impl<'a> $crate::reader::Reader<'a> for $name<'a> {
            type Node = $node;

            fn node(&self) -> &'a $node {
                self.node
            }
        }
    };
}

pub mod access;
pub mod attribute;
pub mod binding;
pub mod capability;
pub mod decl;
pub mod enum_case;
pub mod expr;
pub mod generics;
pub mod parameter;
pub mod types;

pub use access::{Modifier, Visibility};
pub use attribute::AttributeView;
pub use binding::{analyze_bindings, Binding};
pub use capability::{
    AttributeReader, BraceReader, CodeBlockReader, EffectReader, GenericParameterReader,
    InheritanceReader, MemberBlockReader, ModifierReader, NamedReader, ParenReader,
    SignatureReader, TrailingCommaReader, WhereClauseReader,
};
pub use decl::{
    ActorReader, AssociatedTypeReader, ClassReader, DeclGroup, EnumReader, ExtensionReader,
    FunctionReader, GroupReader, InitializerReader, ProtocolReader, StructReader,
    TypeAliasReader, VariableReader,
};
pub use enum_case::{AssociatedValue, EnumCase};
pub use expr::ExprReader;
pub use generics::GenericParameterRef;
pub use parameter::Parameter;
pub use types::TypeReader;

// ============================================================================
// Syntax nodes
// ============================================================================

/// A node a reader can wrap: identity, span, kind and a snapshot.
pub trait SyntaxNode: Codegen {
    fn node_id(&self) -> NodeId;

    fn node_span(&self) -> Span;

    fn node_kind(&self) -> SyntaxKind;

    /// An owned, kind-tagged copy of this node.
    fn to_element(&self) -> SyntaxElement;
}

macro_rules! impl_decl_node {
    ($($ty:ident => $variant:ident: $kind:ident),* $(,)?) => {
        $(
            impl SyntaxNode for $ty {
                fn node_id(&self) -> NodeId {
                    self.id
                }

                fn node_span(&self) -> Span {
                    self.span
                }

                fn node_kind(&self) -> SyntaxKind {
                    SyntaxKind::$kind
                }

                fn to_element(&self) -> SyntaxElement {
                    SyntaxElement::Decl(Decl::$variant(Box::new(self.clone())))
                }
            }
        )*
    };
}

impl_decl_node!(
    StructDecl => Struct: StructDecl,
    ClassDecl => Class: ClassDecl,
    EnumDecl => Enum: EnumDecl,
    ActorDecl => Actor: ActorDecl,
    ProtocolDecl => Protocol: ProtocolDecl,
    ExtensionDecl => Extension: ExtensionDecl,
    VariableDecl => Variable: VariableDecl,
    FunctionDecl => Function: FunctionDecl,
    InitializerDecl => Initializer: InitializerDecl,
    DeinitializerDecl => Deinitializer: DeinitializerDecl,
    TypeAliasDecl => TypeAlias: TypeAliasDecl,
    AssociatedTypeDecl => AssociatedType: AssociatedTypeDecl,
    EnumCaseDecl => EnumCase: EnumCaseDecl,
);

macro_rules! impl_element_node {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl SyntaxNode for $ty {
                fn node_id(&self) -> NodeId {
                    self.id
                }

                fn node_span(&self) -> Span {
                    self.span
                }

                fn node_kind(&self) -> SyntaxKind {
                    SyntaxKind::$kind
                }

                fn to_element(&self) -> SyntaxElement {
                    SyntaxElement::from(self)
                }
            }
        )*
    };
}

impl_element_node!(
    Token => Token,
    Attribute => Attribute,
    DeclModifier => Modifier,
    PatternBinding => PatternBinding,
    FunctionParameter => Parameter,
    ParameterClause => ParameterClause,
    GenericParameter => GenericParameter,
    EnumCaseElement => EnumCaseElement,
    CodeBlock => CodeBlock,
    MemberBlock => MemberBlock,
);

macro_rules! impl_enum_node {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl SyntaxNode for $ty {
                fn node_id(&self) -> NodeId {
                    self.id()
                }

                fn node_span(&self) -> Span {
                    self.span()
                }

                fn node_kind(&self) -> SyntaxKind {
                    SyntaxKind::$kind
                }

                fn to_element(&self) -> SyntaxElement {
                    SyntaxElement::from(self)
                }
            }
        )*
    };
}

impl_enum_node!(
    Stmt => Statement,
    Expr => Expression,
    TypeNode => Type,
    Pattern => Pattern,
);

impl SyntaxNode for Decl {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn node_span(&self) -> Span {
        self.span()
    }

    fn node_kind(&self) -> SyntaxKind {
        self.kind()
    }

    fn to_element(&self) -> SyntaxElement {
        SyntaxElement::from(self)
    }
}

// Nodes without an element variant of their own snapshot as their parent
// enum's variant.
macro_rules! impl_wrapped_node {
    ($($ty:ident => $kind:ident: $wrap:expr),* $(,)?) => {
        $(
            impl SyntaxNode for $ty {
                fn node_id(&self) -> NodeId {
                    self.id
                }

                fn node_span(&self) -> Span {
                    self.span
                }

                fn node_kind(&self) -> SyntaxKind {
                    SyntaxKind::$kind
                }

                fn to_element(&self) -> SyntaxElement {
                    SyntaxElement::from(($wrap)(self.clone()))
                }
            }
        )*
    };
}

impl_wrapped_node!(
    TupleExpr => Expression: Expr::Tuple,
    ClosureExpr => Expression: |c| Expr::Closure(Box::new(c)),
    TuplePattern => Pattern: Pattern::Tuple,
    TupleType => Type: TypeNode::Tuple,
    SwitchStmt => Statement: |s| Stmt::Switch(Box::new(s)),
);

// ============================================================================
// Reader core
// ============================================================================

/// The core every reader implements.
pub trait Reader<'a> {
    type Node: SyntaxNode + 'a;

    /// The wrapped node.
    fn node(&self) -> &'a Self::Node;

    fn id(&self) -> NodeId {
        self.node().node_id()
    }

    fn span(&self) -> Span {
        self.node().node_span()
    }

    fn kind(&self) -> SyntaxKind {
        self.node().node_kind()
    }

    /// The node rendered as canonical source.
    fn text(&self) -> String {
        self.node().to_source()
    }

    /// An owned, kind-tagged snapshot of the node, for anchoring diagnostics.
    fn syntax(&self) -> SyntaxElement {
        self.node().to_element()
    }

    /// Start an error anchored at this node.
    fn error(&self, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Error, message, self.syntax())
    }

    fn warning(&self, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Warning, message, self.syntax())
    }

    fn note(&self, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Note, message, self.syntax())
    }

    /// Start an error anchored at a chosen sub-node, such as a keyword token.
    fn error_at(
        &self,
        anchor: impl Into<SyntaxElement>,
        message: impl Into<String>,
    ) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Error, message, anchor.into())
    }

    fn warning_at(
        &self,
        anchor: impl Into<SyntaxElement>,
        message: impl Into<String>,
    ) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Warning, message, anchor.into())
    }

    fn note_at(
        &self,
        anchor: impl Into<SyntaxElement>,
        message: impl Into<String>,
    ) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Severity::Note, message, anchor.into())
    }
}

/// A reader over any syntax node, for when no dedicated reader exists.
///
/// Capabilities follow the node: a `NodeReader<'_, CodeBlock>` is a
/// [`BraceReader`], a `NodeReader<'_, ParameterClause>` a [`ParenReader`].
#[derive(Debug)]
pub struct NodeReader<'a, N> {
    node: &'a N,
}

impl<'a, N> NodeReader<'a, N> {
    pub fn new(node: &'a N) -> Self {
        NodeReader { node }
    }
}

// Manual impls: deriving would require `N: Clone`.
impl<N> Clone for NodeReader<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeReader<'_, N> {}

impl<'a, N: SyntaxNode + 'a> Reader<'a> for NodeReader<'a, N> {
    type Node = N;

    fn node(&self) -> &'a N {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::{parse_decl, parse_expr};

    #[test]
    fn node_reader_core() {
        let expr = parse_expr("a + b").unwrap();
        let reader = NodeReader::new(&expr);
        assert_eq!(reader.kind(), SyntaxKind::Expression);
        assert_eq!(reader.text(), "a + b");
        assert_eq!(reader.id(), expr.id());
        assert_eq!(reader.span(), Span::new(0, 5));
        assert_eq!(reader.syntax().text(), "a + b");
    }

    #[test]
    fn concrete_decl_snapshot_keeps_kind() {
        let decl = parse_decl("struct S {}").unwrap();
        let Decl::Struct(node) = &decl else {
            panic!("expected struct");
        };
        let element = node.to_element();
        assert_eq!(element.kind(), SyntaxKind::StructDecl);
        assert_eq!(element.id(), decl.id());
        assert_eq!(SyntaxNode::node_kind(&decl), SyntaxKind::StructDecl);
    }

    #[test]
    fn diagnostics_anchor_at_node_or_token() {
        let decl = parse_decl("var count = 0").unwrap();
        let Decl::Variable(var) = &decl else {
            panic!("expected variable");
        };
        let reader = NodeReader::new(var.as_ref());
        let whole = reader.warning("unused").build();
        assert_eq!(whole.node().kind(), SyntaxKind::VariableDecl);
        let keyword = reader.error_at(&var.binding_specifier, "use let").build();
        assert_eq!(keyword.node().text(), "var");
        assert_eq!(keyword.severity(), Severity::Error);
    }
}
