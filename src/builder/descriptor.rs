// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Value descriptors consumed by the builders.
//!
//! A descriptor states intent (a parameter, a type, an argument) and knows
//! how to render itself. Descriptors are plain values: converting one to a
//! node is a deterministic function of its fields.

use std::fmt;

use tugmacro_syntax::{parse_type_with_options, ParseOptions, TypeNode};

use crate::interpolation::Interpolate;
use crate::reader::{Binding, Parameter, Reader, TypeReader};

// ============================================================================
// Types
// ============================================================================

/// A type as it should be written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef(name.into())
    }

    /// `Name<A, B>`
    pub fn generic(name: impl Into<String>, arguments: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeRef(format!("{}<{}>", name.into(), join(arguments)))
    }

    pub fn void() -> Self {
        TypeRef::named("Void")
    }

    /// `[Element]`
    pub fn array(element: impl Into<TypeRef>) -> Self {
        TypeRef(format!("[{}]", element.into()))
    }

    /// `[Key: Value]`
    pub fn dictionary(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        TypeRef(format!("[{}: {}]", key.into(), value.into()))
    }

    /// `(A, B)`
    pub fn tuple(elements: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeRef(format!("({})", join(elements)))
    }

    /// `(A, B) -> Result`
    pub fn function(
        parameters: impl IntoIterator<Item = TypeRef>,
        result: impl Into<TypeRef>,
    ) -> Self {
        TypeRef(format!("({}) -> {}", join(parameters), result.into()))
    }

    /// `Self?`, parenthesizing types `?` would otherwise bind into.
    pub fn optional(self) -> Self {
        if self.needs_parens() {
            TypeRef(format!("({})?", self.0))
        } else {
            TypeRef(format!("{}?", self.0))
        }
    }

    /// `Self.Name`
    pub fn member(self, name: &str) -> Self {
        TypeRef(format!("{}.{}", self.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the written type is a function type, attributes allowed.
    pub fn is_function(&self) -> bool {
        self.parse()
            .is_some_and(|ty| TypeReader::from_node(&ty).is_function())
    }

    pub fn is_optional(&self) -> bool {
        self.parse()
            .is_some_and(|ty| TypeReader::from_node(&ty).is_optional())
    }

    fn parse(&self) -> Option<TypeNode> {
        parse_type_with_options(&self.0, ParseOptions::permissive()).ok()
    }

    fn needs_parens(&self) -> bool {
        self.0.contains("->")
            || self.0.contains(" & ")
            || self.0.starts_with("some ")
            || self.0.starts_with("any ")
    }
}

fn join(types: impl IntoIterator<Item = TypeRef>) -> String {
    types
        .into_iter()
        .map(|t| t.0)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef::named(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        TypeRef(text)
    }
}

impl From<&String> for TypeRef {
    fn from(text: &String) -> Self {
        TypeRef(text.clone())
    }
}

impl From<TypeReader<'_>> for TypeRef {
    fn from(reader: TypeReader<'_>) -> Self {
        TypeRef(reader.text())
    }
}

impl From<&TypeNode> for TypeRef {
    fn from(node: &TypeNode) -> Self {
        TypeRef(TypeReader::from_node(node).text())
    }
}

impl Interpolate for TypeRef {
    fn interpolation(&self) -> String {
        self.0.clone()
    }
}

// ============================================================================
// Literals and arguments
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Nil,
}

impl Literal {
    pub fn render(&self) -> String {
        match self {
            Literal::Int(value) => value.to_string(),
            Literal::Float(value) if value.is_nan() => "Double.nan".to_string(),
            Literal::Float(value) if value.is_infinite() => {
                if value.is_sign_negative() {
                    "-Double.infinity".to_string()
                } else {
                    "Double.infinity".to_string()
                }
            }
            Literal::Float(value) => format!("{value:?}"),
            Literal::Bool(value) => value.to_string(),
            Literal::Str(value) => quote(value),
            Literal::Nil => "nil".to_string(),
        }
    }
}

/// Render `text` as a double-quoted string literal.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

macro_rules! literal_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::$variant(value.into())
                }
            }
        )*
    };
}

literal_from!(i64 => Int, i32 => Int, u32 => Int, f64 => Float, bool => Bool, &str => Str, String => Str);

impl Interpolate for Literal {
    fn interpolation(&self) -> String {
        self.render()
    }
}

/// A call argument: `value` or `label: value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    label: Option<String>,
    value: String,
}

impl Arg {
    pub fn new(value: impl Interpolate) -> Self {
        Arg {
            label: None,
            value: value.interpolation(),
        }
    }

    pub fn labeled(label: impl Into<String>, value: impl Interpolate) -> Self {
        Arg {
            label: Some(label.into()),
            value: value.interpolation(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn render(&self) -> String {
        match &self.label {
            Some(label) => format!("{}: {}", label, self.value),
            None => self.value.clone(),
        }
    }
}

impl Interpolate for Arg {
    fn interpolation(&self) -> String {
        self.render()
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// A function or initializer parameter.
///
/// The call label defaults to the name. `Param::new("value", "Int")` renders
/// `value: Int`; `.label("with")` renders `with value: Int` and
/// `.unlabeled()` renders `_ value: Int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    label: Option<String>,
    name: String,
    ty: TypeRef,
    default_value: Option<String>,
    is_inout: bool,
    is_variadic: bool,
    is_escaping: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Param {
            label: None,
            name: name.into(),
            ty: ty.into(),
            default_value: None,
            is_inout: false,
            is_variadic: false,
            is_escaping: false,
        }
    }

    /// Parse `"name"` or `"label name"` as written in a parameter list.
    pub fn from_names(names: &str, ty: impl Into<TypeRef>) -> Self {
        let mut words = names.split_whitespace();
        match (words.next(), words.next()) {
            (Some(label), Some(name)) => Param::new(name, ty).label(label),
            (Some(name), None) => Param::new(name, ty),
            _ => Param::new(names.trim(), ty),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn unlabeled(self) -> Self {
        self.label("_")
    }

    pub fn default_value(mut self, value: impl Interpolate) -> Self {
        self.default_value = Some(value.interpolation());
        self
    }

    pub fn inout(mut self) -> Self {
        self.is_inout = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    /// Mark a closure parameter `@escaping`.
    pub fn escaping(mut self) -> Self {
        self.is_escaping = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The label callers write, `None` for `_`.
    pub fn call_label(&self) -> Option<&str> {
        match self.label.as_deref() {
            Some("_") => None,
            Some(label) => Some(label),
            None => Some(&self.name),
        }
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        if let Some(label) = self.label.as_deref().filter(|l| *l != self.name) {
            text.push_str(label);
            text.push(' ');
        }
        text.push_str(&self.name);
        text.push_str(": ");
        if self.is_inout {
            text.push_str("inout ");
        }
        if self.is_escaping {
            text.push_str("@escaping ");
        }
        text.push_str(self.ty.as_str());
        if self.is_variadic {
            text.push_str("...");
        }
        if let Some(default) = &self.default_value {
            text.push_str(" = ");
            text.push_str(default);
        }
        text
    }
}

impl From<&Parameter<'_>> for Param {
    fn from(parameter: &Parameter<'_>) -> Self {
        let mut param = Param::new(parameter.local_name(), parameter.parameter_type());
        if parameter.internal_name().is_some() {
            param = param.label(parameter.label());
        }
        param.is_variadic = parameter.is_variadic();
        param.default_value = parameter.default_value().map(|v| v.text());
        param
    }
}

/// The parameter a memberwise initializer takes for a stored property.
impl From<&Binding<'_>> for Param {
    fn from(binding: &Binding<'_>) -> Self {
        let ty = TypeRef::from(binding.type_name().unwrap_or_default().to_string());
        let escaping = ty.is_function();
        let mut param = Param::new(binding.name(), ty);
        param.is_escaping = escaping;
        param
    }
}

impl Interpolate for Param {
    fn interpolation(&self) -> String {
        self.name.clone()
    }
}

// ============================================================================
// Effects
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Throws {
    #[default]
    None,
    Untyped,
    Typed(TypeRef),
    Rethrows,
}

/// Effect specifiers. Rendering always puts `async` before `throws`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    is_async: bool,
    throws: Throws,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = Throws::Untyped;
        self
    }

    /// `throws(Error)`
    pub fn throwing_typed(mut self, error: impl Into<TypeRef>) -> Self {
        self.throws = Throws::Typed(error.into());
        self
    }

    pub fn rethrowing(mut self) -> Self {
        self.throws = Throws::Rethrows;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.is_async && self.throws == Throws::None
    }

    /// The specifiers with a leading space, or nothing.
    pub fn render(&self) -> String {
        let mut text = String::new();
        if self.is_async {
            text.push_str(" async");
        }
        match &self.throws {
            Throws::None => {}
            Throws::Untyped => text.push_str(" throws"),
            Throws::Typed(error) => {
                text.push_str(" throws(");
                text.push_str(error.as_str());
                text.push(')');
            }
            Throws::Rethrows => text.push_str(" rethrows"),
        }
        text
    }
}

impl Interpolate for Effects {
    fn interpolation(&self) -> String {
        self.render()
    }
}

// ============================================================================
// Generics and cases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    name: String,
    constraint: Option<TypeRef>,
    is_pack: bool,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        GenericParam {
            name: name.into(),
            constraint: None,
            is_pack: false,
        }
    }

    /// `each Name`
    pub fn pack(name: impl Into<String>) -> Self {
        GenericParam {
            is_pack: true,
            ..GenericParam::new(name)
        }
    }

    pub fn constrained(mut self, constraint: impl Into<TypeRef>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        if self.is_pack {
            text.push_str("each ");
        }
        text.push_str(&self.name);
        if let Some(constraint) = &self.constraint {
            text.push_str(": ");
            text.push_str(constraint.as_str());
        }
        text
    }
}

impl Interpolate for GenericParam {
    fn interpolation(&self) -> String {
        self.name.clone()
    }
}

/// An enum case: `name`, `name(Int, label: String)` or `name = raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSpec {
    name: String,
    values: Vec<(Option<String>, TypeRef)>,
    raw_value: Option<String>,
}

impl CaseSpec {
    pub fn new(name: impl Into<String>) -> Self {
        CaseSpec {
            name: name.into(),
            values: Vec::new(),
            raw_value: None,
        }
    }

    /// Add an unlabeled associated value.
    pub fn value(mut self, ty: impl Into<TypeRef>) -> Self {
        self.values.push((None, ty.into()));
        self
    }

    pub fn labeled(mut self, label: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.values.push((Some(label.into()), ty.into()));
        self
    }

    pub fn raw_value(mut self, value: impl Interpolate) -> Self {
        self.raw_value = Some(value.interpolation());
        self
    }

    pub fn render(&self) -> String {
        let mut text = self.name.clone();
        if !self.values.is_empty() {
            let values: Vec<String> = self
                .values
                .iter()
                .map(|(label, ty)| match label {
                    Some(label) => format!("{label}: {ty}"),
                    None => ty.to_string(),
                })
                .collect();
            text.push('(');
            text.push_str(&values.join(", "));
            text.push(')');
        }
        if let Some(raw) = &self.raw_value {
            text.push_str(" = ");
            text.push_str(raw);
        }
        text
    }
}

impl Interpolate for CaseSpec {
    fn interpolation(&self) -> String {
        self.name.clone()
    }
}
