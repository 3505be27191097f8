// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugmacro_syntax::{FunctionParameter, TypeNode};

use crate::reader::expr::ExprReader;
use crate::reader::types::TypeReader;
use crate::reader::Reader;

node_reader!(
    /// A function or initializer parameter: `label name: Type = default`.
    Parameter => FunctionParameter
);

impl<'a> Parameter<'a> {
    /// The external label as written, `_` included.
    pub fn label(&self) -> &'a str {
        self.node.first_name.text()
    }

    /// The label callers write, `None` for `_`.
    pub fn call_label(&self) -> Option<&'a str> {
        Some(self.label()).filter(|label| *label != "_")
    }

    pub fn internal_name(&self) -> Option<&'a str> {
        self.node.second_name.as_ref().map(|t| t.text())
    }

    /// The name the body refers to: the internal name if present, else the
    /// label.
    pub fn local_name(&self) -> &'a str {
        self.internal_name().unwrap_or_else(|| self.label())
    }

    pub fn parameter_type(&self) -> TypeReader<'a> {
        TypeReader::from_node(&self.node.ty)
    }

    pub fn type_text(&self) -> String {
        self.parameter_type().text()
    }

    pub fn is_inout(&self) -> bool {
        matches!(&self.node.ty, TypeNode::Attributed(a) if a.specifiers.iter().any(|s| s.is("inout")))
    }

    pub fn is_variadic(&self) -> bool {
        self.node.ellipsis.is_some()
    }

    pub fn default_value(&self) -> Option<ExprReader<'a>> {
        self.node.default_value.as_ref().map(ExprReader::from_node)
    }
}
