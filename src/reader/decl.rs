// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration readers.
//!
//! Each reader is constructed from a [`Decl`] with `new`, which returns
//! `None` when the declaration is of another kind. Everything else comes from
//! the capability traits the wrapped node qualifies for.

use tugmacro_syntax::{
    ActorDecl, AssociatedTypeDecl, ClassDecl, Codegen, Decl, EnumDecl, ExtensionDecl,
    FunctionDecl, InitializerDecl, ProtocolDecl, StructDecl, Token, TypeAliasDecl, VariableDecl,
};

use crate::reader::access::Visibility;
use crate::reader::binding::{analyze_bindings, Binding};
use crate::reader::capability::{
    GenericParameterReader, InheritanceReader, MemberBlockReader, ModifierReader, NamedReader,
    WhereClauseReader,
};
use crate::reader::enum_case::EnumCase;
use crate::reader::types::TypeReader;
use crate::reader::Reader;

macro_rules! decl_reader {
    ($(#[$doc:meta])* $name:ident => $node:ident, $variant:ident) => {
        node_reader!($(#[$doc])* $name => $node);

        impl<'a> $name<'a> {
            pub fn new(decl: &'a Decl) -> Option<Self> {
                match decl {
                    Decl::$variant(node) => Some($name::from_node(node)),
                    _ => None,
                }
            }
        }
    };
}

decl_reader!(
    /// `struct Name { ... }`
    StructReader => StructDecl, Struct
);
decl_reader!(
    /// `class Name { ... }`
    ClassReader => ClassDecl, Class
);
decl_reader!(
    /// `enum Name { case ... }`
    EnumReader => EnumDecl, Enum
);
decl_reader!(
    /// `actor Name { ... }`
    ActorReader => ActorDecl, Actor
);
decl_reader!(
    /// `protocol Name { ... }`
    ProtocolReader => ProtocolDecl, Protocol
);
decl_reader!(
    /// `extension Type { ... }`
    ExtensionReader => ExtensionDecl, Extension
);
decl_reader!(
    /// `let`/`var` with one or more bindings.
    VariableReader => VariableDecl, Variable
);
decl_reader!(FunctionReader => FunctionDecl, Function);
decl_reader!(InitializerReader => InitializerDecl, Initializer);
decl_reader!(TypeAliasReader => TypeAliasDecl, TypeAlias);
decl_reader!(
    /// A protocol's `associatedtype` requirement.
    AssociatedTypeReader => AssociatedTypeDecl, AssociatedType
);

impl<'a> EnumReader<'a> {
    /// Cases in declaration order, one per name.
    pub fn cases(&self) -> Vec<EnumCase<'a>> {
        EnumCase::collect(self.members())
    }

    pub fn case(&self, name: &str) -> Option<EnumCase<'a>> {
        self.cases().into_iter().find(|c| c.name() == name)
    }

    /// The raw value type, taken as the first inherited type.
    pub fn raw_type(&self) -> Option<TypeReader<'a>> {
        self.inherited_types().into_iter().next()
    }
}

impl ClassReader<'_> {
    /// The superclass or first conformance, which syntax alone cannot tell
    /// apart.
    pub fn first_inherited_type(&self) -> Option<String> {
        self.inherited_type_names().into_iter().next()
    }
}

impl<'a> ProtocolReader<'a> {
    pub fn associated_types(&self) -> Vec<AssociatedTypeReader<'a>> {
        self.members()
            .iter()
            .filter_map(AssociatedTypeReader::new)
            .collect()
    }
}

impl<'a> ExtensionReader<'a> {
    pub fn extended_type(&self) -> TypeReader<'a> {
        TypeReader::from_node(&self.node.extended_type)
    }

    /// The extended type as written.
    pub fn name(&self) -> String {
        self.node.extended_type.to_source()
    }
}

impl<'a> VariableReader<'a> {
    pub fn binding_specifier(&self) -> &'a Token {
        &self.node.binding_specifier
    }

    pub fn is_let(&self) -> bool {
        self.node.is_let()
    }

    pub fn is_var(&self) -> bool {
        !self.node.is_let()
    }

    pub fn bindings(&self) -> Vec<Binding<'a>> {
        analyze_bindings(self.node)
    }
}

impl FunctionReader<'_> {
    /// `static func == (lhs: Self, rhs: Self) -> Bool`
    pub fn is_operator(&self) -> bool {
        self.name()
            .chars()
            .next()
            .is_some_and(|c| !(c.is_alphabetic() || c == '_' || c == '`'))
    }
}

impl InitializerReader<'_> {
    /// `init?` or `init!`.
    pub fn is_failable(&self) -> bool {
        self.node.optional_mark.is_some()
    }

    pub fn is_implicitly_unwrapped(&self) -> bool {
        self.node.optional_mark.as_ref().is_some_and(|m| m.is("!"))
    }
}

impl<'a> TypeAliasReader<'a> {
    pub fn aliased_type(&self) -> TypeReader<'a> {
        TypeReader::from_node(&self.node.aliased)
    }
}

impl<'a> AssociatedTypeReader<'a> {
    /// Constraint types from the inheritance clause.
    pub fn constraints(&self) -> Vec<String> {
        self.inherited_type_names()
    }

    pub fn default_type(&self) -> Option<TypeReader<'a>> {
        self.node.default_type.as_ref().map(TypeReader::from_node)
    }

    /// The `where` clause as written.
    pub fn where_clause_text(&self) -> Option<String> {
        self.where_clause().map(Codegen::to_source)
    }
}

// ============================================================================
// Declaration groups
// ============================================================================

/// The concrete reader behind a [`DeclGroup`].
#[derive(Debug, Clone, Copy)]
pub enum GroupReader<'a> {
    Struct(StructReader<'a>),
    Class(ClassReader<'a>),
    Enum(EnumReader<'a>),
    Actor(ActorReader<'a>),
    Protocol(ProtocolReader<'a>),
    Extension(ExtensionReader<'a>),
}

/// Any declaration with a member block, probed from a [`Decl`].
#[derive(Debug, Clone, Copy)]
pub struct DeclGroup<'a> {
    decl: &'a Decl,
    group: GroupReader<'a>,
}

macro_rules! group_dispatch {
    ($self:expr, $r:ident => $e:expr) => {
        match $self.group {
            GroupReader::Struct($r) => $e,
            GroupReader::Class($r) => $e,
            GroupReader::Enum($r) => $e,
            GroupReader::Actor($r) => $e,
            GroupReader::Protocol($r) => $e,
            GroupReader::Extension($r) => $e,
        }
    };
}

impl<'a> DeclGroup<'a> {
    pub fn new(decl: &'a Decl) -> Option<Self> {
        let group = match decl {
            Decl::Struct(node) => GroupReader::Struct(StructReader::from_node(node)),
            Decl::Class(node) => GroupReader::Class(ClassReader::from_node(node)),
            Decl::Enum(node) => GroupReader::Enum(EnumReader::from_node(node)),
            Decl::Actor(node) => GroupReader::Actor(ActorReader::from_node(node)),
            Decl::Protocol(node) => GroupReader::Protocol(ProtocolReader::from_node(node)),
            Decl::Extension(node) => GroupReader::Extension(ExtensionReader::from_node(node)),
            _ => return None,
        };
        Some(DeclGroup { decl, group })
    }

    pub fn group(&self) -> GroupReader<'a> {
        self.group
    }

    /// The declared name, or the extended type for extensions.
    pub fn name(&self) -> String {
        match self.group {
            GroupReader::Struct(r) => r.name().to_string(),
            GroupReader::Class(r) => r.name().to_string(),
            GroupReader::Enum(r) => r.name().to_string(),
            GroupReader::Actor(r) => r.name().to_string(),
            GroupReader::Protocol(r) => r.name().to_string(),
            GroupReader::Extension(r) => r.name(),
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        group_dispatch!(self, r => r.visibility())
    }

    pub fn members(&self) -> &'a [Decl] {
        group_dispatch!(self, r => r.members())
    }

    pub fn variables(&self) -> Vec<VariableReader<'a>> {
        group_dispatch!(self, r => r.variables())
    }

    pub fn properties(&self) -> Vec<Binding<'a>> {
        group_dispatch!(self, r => r.properties())
    }

    pub fn stored_properties(&self) -> Vec<Binding<'a>> {
        group_dispatch!(self, r => r.stored_properties())
    }

    pub fn functions(&self) -> Vec<FunctionReader<'a>> {
        group_dispatch!(self, r => r.functions())
    }

    pub fn initializers(&self) -> Vec<InitializerReader<'a>> {
        group_dispatch!(self, r => r.initializers())
    }

    pub fn inherited_type_names(&self) -> Vec<String> {
        group_dispatch!(self, r => r.inherited_type_names())
    }

    /// Generic parameter names; protocols and extensions have none.
    pub fn generic_parameter_names(&self) -> Vec<&'a str> {
        match self.group {
            GroupReader::Struct(r) => r.generic_parameter_names(),
            GroupReader::Class(r) => r.generic_parameter_names(),
            GroupReader::Enum(r) => r.generic_parameter_names(),
            GroupReader::Actor(r) => r.generic_parameter_names(),
            GroupReader::Protocol(_) | GroupReader::Extension(_) => Vec::new(),
        }
    }

    /// Whether instances are copied on assignment.
    pub fn is_value_type(&self) -> bool {
        matches!(self.group, GroupReader::Struct(_) | GroupReader::Enum(_))
    }
}

impl<'a> Reader<'a> for DeclGroup<'a> {
    type Node = Decl;

    fn node(&self) -> &'a Decl {
        self.decl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CodeBlockReader, EffectReader, SignatureReader};
    use tugmacro_syntax::{parse_decl, SyntaxKind};

    #[test]
    fn wrong_kind_is_none() {
        let decl = parse_decl("class Box {}").unwrap();
        assert!(StructReader::new(&decl).is_none());
        assert!(EnumReader::new(&decl).is_none());
        assert!(ActorReader::new(&decl).is_none());
        assert!(ProtocolReader::new(&decl).is_none());
        assert!(ClassReader::new(&decl).is_some());

        let decl = parse_decl("func run() {}").unwrap();
        assert!(DeclGroup::new(&decl).is_none());
        assert!(VariableReader::new(&decl).is_none());
    }

    #[test]
    fn group_dispatch_covers_every_kind() {
        let cases = [
            ("struct S {}", "S", SyntaxKind::StructDecl),
            ("class C {}", "C", SyntaxKind::ClassDecl),
            ("enum E {}", "E", SyntaxKind::EnumDecl),
            ("actor A {}", "A", SyntaxKind::ActorDecl),
            ("protocol P {}", "P", SyntaxKind::ProtocolDecl),
            ("extension Array where Element: Equatable {}", "Array", SyntaxKind::ExtensionDecl),
        ];
        for (source, name, kind) in cases {
            let decl = parse_decl(source).unwrap();
            let group = DeclGroup::new(&decl).unwrap();
            assert_eq!(group.name(), name, "{source}");
            assert_eq!(group.kind(), kind, "{source}");
        }
    }

    #[test]
    fn group_forwards_members() {
        let decl = parse_decl(
            "public actor Cache<Key: Hashable>: Sendable {\n    var entries: [Key: Int] = [:]\n    init() {}\n    func clear() {}\n}",
        )
        .unwrap();
        let group = DeclGroup::new(&decl).unwrap();
        assert_eq!(group.visibility(), Some(Visibility::Public));
        assert_eq!(group.generic_parameter_names(), ["Key"]);
        assert_eq!(group.inherited_type_names(), ["Sendable"]);
        assert_eq!(group.stored_properties()[0].name(), "entries");
        assert_eq!(group.functions()[0].name(), "clear");
        assert_eq!(group.initializers().len(), 1);
        assert!(!group.is_value_type());
    }

    #[test]
    fn protocol_associated_types() {
        let decl = parse_decl(
            "protocol Store {\n    associatedtype Item: Hashable, Codable = String where Item: Sendable\n    associatedtype Key\n    func get(_ key: Key) -> Item?\n}",
        )
        .unwrap();
        let store = ProtocolReader::new(&decl).unwrap();
        let associated = store.associated_types();
        assert_eq!(associated.len(), 2);
        assert_eq!(associated[0].name(), "Item");
        assert_eq!(associated[0].constraints(), ["Hashable", "Codable"]);
        assert_eq!(associated[0].default_type().unwrap().text(), "String");
        assert_eq!(associated[0].where_clause_text().as_deref(), Some("where Item: Sendable"));
        assert!(associated[1].constraints().is_empty());
        assert!(associated[1].default_type().is_none());

        let get = &store.functions()[0];
        assert!(!get.has_body());
        assert_eq!(get.return_type().unwrap().text(), "Item?");
    }

    #[test]
    fn functions_and_initializers() {
        let decl = parse_decl(
            "struct Money {\n    static func + (lhs: Money, rhs: Money) -> Money { lhs }\n    init?(cents: Int) throws {}\n    init!(text: String) {}\n}",
        )
        .unwrap();
        let money = StructReader::new(&decl).unwrap();
        let plus = &money.functions()[0];
        assert!(plus.is_operator());
        assert!(plus.is_static());

        let inits = money.initializers();
        assert!(inits[0].is_failable());
        assert!(!inits[0].is_implicitly_unwrapped());
        assert!(inits[0].is_throwing());
        assert_eq!(inits[0].parameters()[0].label(), "cents");
        assert!(inits[1].is_implicitly_unwrapped());
    }

    #[test]
    fn extension_and_alias() {
        let decl = parse_decl("extension Outer.Inner: CustomStringConvertible {}").unwrap();
        let ext = ExtensionReader::new(&decl).unwrap();
        assert_eq!(ext.name(), "Outer.Inner");
        assert_eq!(ext.extended_type().base_name().as_deref(), Some("Inner"));
        assert!(ext.inherits("CustomStringConvertible"));

        let decl = parse_decl("typealias Handler = (Result<Int, Error>) -> Void").unwrap();
        let alias = TypeAliasReader::new(&decl).unwrap();
        assert_eq!(alias.name(), "Handler");
        assert!(alias.aliased_type().is_function());
    }

    #[test]
    fn enum_raw_type_and_lookup() {
        let decl = parse_decl("enum Suit: String {\n    case hearts, spades\n}").unwrap();
        let suit = EnumReader::new(&decl).unwrap();
        assert_eq!(suit.raw_type().unwrap().text(), "String");
        assert!(suit.case("spades").is_some());
        assert!(suit.case("clubs").is_none());
    }

    #[test]
    fn variable_specifiers() {
        let decl = parse_decl("let a = 1, b = 2").unwrap();
        let var = VariableReader::new(&decl).unwrap();
        assert!(var.is_let());
        assert!(!var.is_var());
        assert_eq!(var.binding_specifier().text(), "let");
        assert_eq!(var.bindings().len(), 2);
    }
}
