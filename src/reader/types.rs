// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type reader and sugar normalization.
//!
//! The same type can be spelled several ways: `Optional<Int>` and `Int?`,
//! `Array<T>` and `[T]`, `Dictionary<K, V>` and `[K: V]`, `()` and `Void`.
//! [`TypeReader::normalized`] renders the sugared spelling of each so two
//! types compare equal exactly when they spell the same type.

use tugmacro_syntax::{Codegen, GenericArgumentClause, TupleType, TypeNode};

node_reader!(
    /// A view over a written type.
    TypeReader => TypeNode
);

impl<'a> TypeReader<'a> {
    /// Render the type with sugar applied throughout.
    pub fn normalized(&self) -> String {
        normalize(self.node)
    }

    /// Whether two written types spell the same type.
    pub fn is_equivalent_to(&self, other: &TypeReader<'_>) -> bool {
        self.normalized() == other.normalized()
    }

    /// `T?`, `T!` or `Optional<T>`.
    pub fn is_optional(&self) -> bool {
        self.unwrapped_optional().is_some()
    }

    /// The wrapped type of an optional.
    pub fn unwrapped_optional(&self) -> Option<TypeReader<'a>> {
        match self.node {
            TypeNode::Optional(o) | TypeNode::ImplicitlyUnwrapped(o) => {
                Some(TypeReader::from_node(&o.wrapped))
            }
            TypeNode::Identifier(ident) if ident.name.is("Optional") => {
                single_argument(ident.generic_arguments.as_ref()).map(TypeReader::from_node)
            }
            _ => None,
        }
    }

    /// `Void`, `Swift.Void` or `()`.
    pub fn is_void(&self) -> bool {
        match self.node {
            TypeNode::Identifier(ident) => {
                ident.name.is("Void") && ident.generic_arguments.is_none()
            }
            TypeNode::Member(member) => {
                member.name.is("Void") && member.base.to_source() == "Swift"
            }
            TypeNode::Tuple(tuple) => tuple.elements.is_empty(),
            _ => false,
        }
    }

    /// The element type of `[T]` or `Array<T>`.
    pub fn array_element(&self) -> Option<TypeReader<'a>> {
        match self.node {
            TypeNode::Array(array) => Some(TypeReader::from_node(&array.element)),
            TypeNode::Identifier(ident) if ident.name.is("Array") => {
                single_argument(ident.generic_arguments.as_ref()).map(TypeReader::from_node)
            }
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        match self.node {
            TypeNode::Function(_) => true,
            TypeNode::Attributed(attributed) => {
                TypeReader::from_node(&attributed.base).is_function()
            }
            _ => false,
        }
    }

    /// Generic arguments of a named type, e.g. `[Int, String]` for
    /// `Result<Int, String>`.
    pub fn generic_arguments(&self) -> Vec<TypeReader<'a>> {
        let clause = match self.node {
            TypeNode::Identifier(ident) => ident.generic_arguments.as_ref(),
            TypeNode::Member(member) => member.generic_arguments.as_ref(),
            _ => None,
        };
        clause
            .map(|c| c.types().map(TypeReader::from_node).collect())
            .unwrap_or_default()
    }

    /// The unqualified name of a named type, without generic arguments:
    /// `Result` for `Result<Int, E>`, `Kind` for `Outer.Kind`.
    pub fn base_name(&self) -> Option<String> {
        match self.node {
            TypeNode::Identifier(ident) => Some(ident.name.text.clone()),
            TypeNode::Member(member) => Some(member.name.text.clone()),
            _ => None,
        }
    }
}

fn single_argument(clause: Option<&GenericArgumentClause>) -> Option<&TypeNode> {
    match clause?.arguments.as_slice() {
        [only] => Some(&only.ty),
        _ => None,
    }
}

fn normalize(ty: &TypeNode) -> String {
    match ty {
        TypeNode::Identifier(ident) => {
            let args: Vec<&TypeNode> = ident
                .generic_arguments
                .as_ref()
                .map(|c| c.types().collect())
                .unwrap_or_default();
            match (ident.name.text(), args.as_slice()) {
                ("Optional", [wrapped]) => optional(wrapped, "?"),
                ("Array", [element]) => format!("[{}]", normalize(element)),
                ("Dictionary", [key, value]) => {
                    format!("[{}: {}]", normalize(key), normalize(value))
                }
                (name, []) => name.to_string(),
                (name, args) => format!("{}<{}>", name, join(args.iter().copied())),
            }
        }
        TypeNode::Member(member) => {
            let base = normalize(&member.base);
            match &member.generic_arguments {
                Some(clause) => format!("{}.{}<{}>", base, member.name.text(), join(clause.types())),
                None if base == "Swift" && member.name.is("Void") => "Void".to_string(),
                None => format!("{}.{}", base, member.name.text()),
            }
        }
        TypeNode::Optional(o) => optional(&o.wrapped, "?"),
        TypeNode::ImplicitlyUnwrapped(o) => optional(&o.wrapped, "!"),
        TypeNode::Array(array) => format!("[{}]", normalize(&array.element)),
        TypeNode::Dictionary(dict) => {
            format!("[{}: {}]", normalize(&dict.key), normalize(&dict.value))
        }
        TypeNode::Tuple(tuple) => normalize_tuple(tuple, true),
        TypeNode::Function(function) => {
            let mut text = normalize_tuple(&function.parameters, false);
            text.push_str(&function.effects.to_source());
            text.push_str(" -> ");
            text.push_str(&normalize(&function.return_type));
            text
        }
        TypeNode::Attributed(attributed) => {
            let mut text = String::new();
            for specifier in &attributed.specifiers {
                text.push_str(specifier.text());
                text.push(' ');
            }
            for attribute in &attributed.attributes {
                text.push_str(&attribute.to_source());
                text.push(' ');
            }
            text.push_str(&normalize(&attributed.base));
            text
        }
        TypeNode::Composition(composition) => composition
            .elements
            .iter()
            .map(normalize)
            .collect::<Vec<_>>()
            .join(" & "),
        TypeNode::SomeOrAny(some) => {
            format!("{} {}", some.keyword.text(), normalize(&some.constraint))
        }
        TypeNode::PackExpansion(pack) | TypeNode::PackElement(pack) => {
            format!("{} {}", pack.keyword.text(), normalize(&pack.base))
        }
    }
}

fn join<'t>(types: impl Iterator<Item = &'t TypeNode>) -> String {
    types.map(normalize).collect::<Vec<_>>().join(", ")
}

fn optional(wrapped: &TypeNode, mark: &str) -> String {
    let inner = normalize(wrapped);
    match wrapped {
        TypeNode::Function(_) | TypeNode::Composition(_) | TypeNode::SomeOrAny(_) => {
            format!("({inner}){mark}")
        }
        _ => format!("{inner}{mark}"),
    }
}

/// Render a tuple type. As a value type, `()` is `Void` and a single
/// unlabeled element is just that element.
fn normalize_tuple(tuple: &TupleType, as_value: bool) -> String {
    if as_value {
        match tuple.elements.as_slice() {
            [] => return "Void".to_string(),
            [only] if only.first_name.is_none() && only.ellipsis.is_none() => {
                return normalize(&only.ty);
            }
            _ => {}
        }
    }
    let elements: Vec<String> = tuple
        .elements
        .iter()
        .map(|element| {
            let mut text = String::new();
            if let Some(first) = &element.first_name {
                text.push_str(first.text());
                if let Some(second) = &element.second_name {
                    text.push(' ');
                    text.push_str(second.text());
                }
                text.push_str(": ");
            }
            text.push_str(&normalize(&element.ty));
            if element.ellipsis.is_some() {
                text.push_str("...");
            }
            text
        })
        .collect();
    format!("({})", elements.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use tugmacro_syntax::parse_type;

    fn normalized(source: &str) -> String {
        let ty = parse_type(source).unwrap();
        TypeReader::from_node(&ty).normalized()
    }

    #[test]
    fn sugar_is_applied() {
        assert_eq!(normalized("Optional<Int>"), "Int?");
        assert_eq!(normalized("Array<String>"), "[String]");
        assert_eq!(normalized("Dictionary<String, Array<Int>>"), "[String: [Int]]");
        assert_eq!(normalized("()"), "Void");
        assert_eq!(normalized("Swift.Void"), "Void");
        assert_eq!(normalized("(Int)"), "Int");
        assert_eq!(normalized("Optional<() -> Void>"), "(() -> Void)?");
        assert_eq!(normalized("Result<Optional<Int>, Error>"), "Result<Int?, Error>");
    }

    #[test]
    fn function_types_keep_empty_parameter_list() {
        assert_eq!(normalized("() async throws -> ()"), "() async throws -> Void");
        assert_eq!(normalized("(Array<Int>) -> Bool"), "([Int]) -> Bool");
    }

    #[test]
    fn equivalence() {
        let a = parse_type("Optional<Array<Int>>").unwrap();
        let b = parse_type("[Int]?").unwrap();
        assert!(TypeReader::from_node(&a).is_equivalent_to(&TypeReader::from_node(&b)));
    }

    #[test]
    fn optionals() {
        for source in ["Int?", "Int!", "Optional<Int>"] {
            let ty = parse_type(source).unwrap();
            let reader = TypeReader::from_node(&ty);
            assert!(reader.is_optional(), "{source}");
            assert_eq!(reader.unwrapped_optional().unwrap().text(), "Int");
        }
        let ty = parse_type("[Int]").unwrap();
        assert!(!TypeReader::from_node(&ty).is_optional());
    }

    #[test]
    fn names_and_arguments() {
        let ty = parse_type("Result<Int, Failure>").unwrap();
        let reader = TypeReader::from_node(&ty);
        assert_eq!(reader.base_name().as_deref(), Some("Result"));
        let args: Vec<_> = reader.generic_arguments().iter().map(|t| t.text()).collect();
        assert_eq!(args, ["Int", "Failure"]);

        let ty = parse_type("Outer.Kind").unwrap();
        assert_eq!(TypeReader::from_node(&ty).base_name().as_deref(), Some("Kind"));

        let ty = parse_type("Array<Int>").unwrap();
        assert_eq!(TypeReader::from_node(&ty).array_element().unwrap().text(), "Int");
    }

    #[test]
    fn void_and_functions() {
        for source in ["Void", "()", "Swift.Void"] {
            let ty = parse_type(source).unwrap();
            assert!(TypeReader::from_node(&ty).is_void(), "{source}");
        }
        let ty = parse_type("@escaping (Int) -> Void").unwrap();
        let reader = TypeReader::from_node(&ty);
        assert!(reader.is_function());
        assert!(!reader.is_void());
    }
}
