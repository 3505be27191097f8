// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Composable builders for new syntax.
//!
//! A builder collects descriptors ([`Param`], [`TypeRef`], [`Effects`], ...)
//! and already-built child nodes, renders them as source text and parses the
//! text back through a [`Template`]. The result is an ordinary syntax node,
//! printed in canonical layout. Optional clauses are omitted when absent, so
//! an empty `else` or an empty effect set leaves no trace.
//!
//! ```
//! use tugmacro::builder::{function, return_value, Effects, Param};
//! use tugmacro_syntax::Codegen;
//!
//! let decl = function("load", [Param::new("path", "String")])
//!     .effects(Effects::none().throwing().asynchronous())
//!     .returning("Data")
//!     .body([return_value("try await read(path)").unwrap()])
//!     .unwrap();
//! assert_eq!(
//!     decl.to_source(),
//!     "func load(path: String) async throws -> Data {\n    return try await read(path)\n}"
//! );
//! ```
//!
//! Every builder returns [`MacroResult`](crate::MacroResult): text that does
//! not parse is reported as [`MacroError::Template`](crate::MacroError)
//! rather than producing a malformed tree.
//!
//! Free builder functions parse permissively. To parse with an expansion's
//! [`ParseOptions`](tugmacro_syntax::ParseOptions), call the same builder on
//! its template, as in `context.template().guard_stmt(..)`, or pass
//! `.options(..)` to a builder value.

use tugmacro_syntax::{Codegen, Decl, Stmt};

use crate::reader::{Modifier, Visibility};

/// Setters shared by every declaration builder holding a `prefix` field.
macro_rules! prefix_setters {
    () => {
        pub fn visibility(mut self, visibility: $crate::reader::Visibility) -> Self {
            self.prefix.set_visibility(visibility);
            self
        }

        pub fn modifier(mut self, modifier: $crate::reader::Modifier) -> Self {
            self.prefix.add_modifier(modifier);
            self
        }

        /// Add an attribute; the leading `@` is optional.
        pub fn attribute(mut self, attribute: &str) -> Self {
            self.prefix.add_attribute(attribute);
            self
        }
    };
}

/// `options` setter shared by every builder holding a `template` field.
macro_rules! template_setter {
    () => {
        /// Parse the rendered text with `options` instead of the permissive
        /// defaults.
        pub fn options(mut self, options: tugmacro_syntax::ParseOptions) -> Self {
            self.template = $crate::builder::Template::new(options);
            self
        }
    };
}

pub mod decl;
pub mod descriptor;
pub mod expr;
pub mod stmt;
pub mod template;

pub use decl::{
    actor_decl, class_decl, computed_property, enum_decl, extension_decl, function, initializer,
    memberwise_initializer, protocol_decl, struct_decl, typealias, FunctionSignatureBuilder,
    GroupBuilder, InitializerBuilder, ReturningFunction, TypeAliasBuilder, VariableBuilder,
};
#[allow(deprecated)]
pub use decl::function_with_tuple_params;
pub use descriptor::{Arg, CaseSpec, Effects, GenericParam, Literal, Param, TypeRef};
pub use expr::{array, call, closure, dictionary, literal, member};
pub use stmt::{
    assign, defer_stmt, do_catch, expr_stmt, for_in, for_in_where, guard_stmt, if_stmt,
    return_value, return_void, switch_stmt, throw_stmt, while_loop, Catch, DoCatchBuilder,
    IfBuilder, SwitchBuilder,
};
pub use template::Template;

// ============================================================================
// Shared rendering
// ============================================================================

/// Render statements as a brace-delimited body.
pub(crate) fn render_block(statements: &[Stmt]) -> String {
    render_lines(statements)
}

/// Render declarations as a brace-delimited member block.
pub(crate) fn render_members(members: &[Decl]) -> String {
    render_lines(members)
}

fn render_lines<T: Codegen>(items: &[T]) -> String {
    if items.is_empty() {
        return "{}".to_string();
    }
    let mut text = String::from("{");
    for item in items {
        text.push('\n');
        text.push_str(&item.to_source());
    }
    text.push_str("\n}");
    text
}

/// Join rendered pieces with `", "`.
pub(crate) fn comma_list<I, T>(items: I, render: impl Fn(T) -> String) -> String
where
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(render).collect::<Vec<_>>().join(", ")
}

/// Attributes, access level and modifiers written before a declaration
/// keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DeclPrefix {
    attributes: Vec<String>,
    visibility: Option<Visibility>,
    modifiers: Vec<Modifier>,
}

impl DeclPrefix {
    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = Some(visibility);
    }

    pub(crate) fn add_modifier(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    pub(crate) fn add_attribute(&mut self, attribute: &str) {
        let attribute = attribute.trim();
        if attribute.starts_with('@') {
            self.attributes.push(attribute.to_string());
        } else {
            self.attributes.push(format!("@{attribute}"));
        }
    }

    /// The prefix text, each part followed by a space.
    pub(crate) fn render(&self) -> String {
        let mut text = String::new();
        for attribute in &self.attributes {
            text.push_str(attribute);
            text.push(' ');
        }
        if let Some(visibility) = self.visibility {
            text.push_str(visibility.keyword());
            text.push(' ');
        }
        for modifier in &self.modifiers {
            text.push_str(modifier.keyword());
            text.push(' ');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::{parse_members, parse_stmts};

    #[test]
    fn blocks_render_each_item_on_a_line() {
        assert_eq!(render_block(&[]), "{}");
        let stmts = parse_stmts("a()\nb()").unwrap();
        assert_eq!(render_block(&stmts), "{\na()\nb()\n}");
        let members = parse_members("let x = 1").unwrap();
        assert_eq!(render_members(&members), "{\nlet x = 1\n}");
    }

    #[test]
    fn prefix_orders_attributes_access_modifiers() {
        let mut prefix = DeclPrefix::default();
        assert_eq!(prefix.render(), "");
        prefix.add_modifier(Modifier::Static);
        prefix.add_modifier(Modifier::Static);
        prefix.set_visibility(Visibility::Public);
        prefix.add_attribute("discardableResult");
        prefix.add_attribute("@MainActor");
        assert_eq!(prefix.render(), "@discardableResult @MainActor public static ");
    }
}
