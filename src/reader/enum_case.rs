// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugmacro_syntax::{Codegen, Decl, EnumCaseDecl, EnumCaseElement, EnumCaseParameter};

use crate::reader::expr::ExprReader;
use crate::reader::types::TypeReader;
use crate::reader::Reader;

/// One case name of an enum. `case a, b(Int)` yields two cases sharing one
/// statement.
#[derive(Debug, Clone, Copy)]
pub struct EnumCase<'a> {
    statement: &'a EnumCaseDecl,
    element: &'a EnumCaseElement,
}

impl<'a> EnumCase<'a> {
    pub fn new(statement: &'a EnumCaseDecl, element: &'a EnumCaseElement) -> Self {
        EnumCase { statement, element }
    }

    /// Every case of a member list, expanding multi-name statements.
    pub fn collect(members: &'a [Decl]) -> Vec<EnumCase<'a>> {
        members
            .iter()
            .filter_map(|member| match member {
                Decl::EnumCase(statement) => Some(statement.as_ref()),
                _ => None,
            })
            .flat_map(|statement| {
                statement
                    .elements
                    .iter()
                    .map(move |element| EnumCase::new(statement, element))
            })
            .collect()
    }

    /// The `case` statement this name was declared in.
    pub fn statement(&self) -> &'a EnumCaseDecl {
        self.statement
    }

    pub fn is_indirect(&self) -> bool {
        self.statement.modifiers.iter().any(|m| m.name.is("indirect"))
    }

    pub fn raw_value(&self) -> Option<ExprReader<'a>> {
        self.element.raw_value.as_ref().map(ExprReader::from_node)
    }

    pub fn has_associated_values(&self) -> bool {
        self.element.parameter_clause.is_some()
    }

    pub fn associated_values(&self) -> Vec<AssociatedValue<'a>> {
        self.element
            .parameter_clause
            .iter()
            .flat_map(|clause| clause.parameters.iter())
            .map(|node| AssociatedValue { node })
            .collect()
    }
}

impl<'a> Reader<'a> for EnumCase<'a> {
    type Node = EnumCaseElement;

    fn node(&self) -> &'a EnumCaseElement {
        self.element
    }
}

/// One associated value slot: `value: Int`, `Error` or `code: Int = 0`.
#[derive(Debug, Clone, Copy)]
pub struct AssociatedValue<'a> {
    node: &'a EnumCaseParameter,
}

impl<'a> AssociatedValue<'a> {
    pub fn node(&self) -> &'a EnumCaseParameter {
        self.node
    }

    /// The label, `None` when unlabeled or written as `_`.
    pub fn label(&self) -> Option<&'a str> {
        self.node
            .first_name
            .as_ref()
            .map(|t| t.text())
            .filter(|label| *label != "_")
    }

    /// The name for pattern bindings: the second name if given, else the
    /// label.
    pub fn name(&self) -> Option<&'a str> {
        self.node
            .second_name
            .as_ref()
            .map(|t| t.text())
            .or_else(|| self.label())
    }

    pub fn value_type(&self) -> TypeReader<'a> {
        TypeReader::from_node(&self.node.ty)
    }

    pub fn type_name(&self) -> String {
        self.node.ty.to_source()
    }

    pub fn default_value(&self) -> Option<ExprReader<'a>> {
        self.node.default_value.as_ref().map(ExprReader::from_node)
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::{EnumReader, NamedReader, Reader};
    use tugmacro_syntax::parse_decl;

    #[test]
    fn cases_and_associated_values() {
        let decl = parse_decl(
            "enum Outcome {\n    case success(value: Int), failure(Error)\n    case empty\n}",
        )
        .unwrap();
        let outcome = EnumReader::new(&decl).unwrap();
        let cases = outcome.cases();
        let names: Vec<_> = cases.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["success", "failure", "empty"]);
        assert_eq!(cases[0].statement().id, cases[1].statement().id);
        assert_ne!(cases[0].id(), cases[1].id());

        let success = cases[0].associated_values();
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].label(), Some("value"));
        assert_eq!(success[0].type_name(), "Int");

        let failure = cases[1].associated_values();
        assert_eq!(failure[0].label(), None);
        assert_eq!(failure[0].type_name(), "Error");

        assert!(!cases[2].has_associated_values());
        assert!(cases[2].associated_values().is_empty());
    }

    #[test]
    fn raw_values_and_defaults() {
        let decl = parse_decl(
            "enum Code: Int {\n    case ok = 200\n    indirect case retry(_ after: Int = 3)\n}",
        )
        .unwrap();
        let cases = EnumReader::new(&decl).unwrap().cases();
        assert_eq!(cases[0].raw_value().unwrap().integer_value(), Some(200));
        assert!(!cases[0].is_indirect());
        assert!(cases[1].is_indirect());
        let after = cases[1].associated_values();
        assert_eq!(after[0].label(), None);
        assert_eq!(after[0].name(), Some("after"));
        assert_eq!(after[0].default_value().unwrap().integer_value(), Some(3));
    }
}
