// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration builders.

use tugmacro_syntax::{Codegen, Decl, Stmt};

use crate::builder::descriptor::{CaseSpec, Effects, GenericParam, Param, TypeRef};
use crate::builder::{comma_list, render_block, render_members, DeclPrefix, Template};
use crate::error::{MacroError, MacroResult};
use crate::interpolation::Interpolate;
use crate::reader::{Binding, Visibility};

fn generic_clause(generics: &[GenericParam]) -> String {
    if generics.is_empty() {
        String::new()
    } else {
        format!("<{}>", comma_list(generics, GenericParam::render))
    }
}

fn where_clause(requirements: &[String]) -> String {
    if requirements.is_empty() {
        String::new()
    } else {
        format!(" where {}", requirements.join(", "))
    }
}

fn parameter_clause(params: &[Param]) -> String {
    format!("({})", comma_list(params, Param::render))
}

// ============================================================================
// Type declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Struct,
    Class,
    Actor,
    Enum,
    Protocol,
    Extension,
}

impl GroupKind {
    fn keyword(self) -> &'static str {
        match self {
            GroupKind::Struct => "struct",
            GroupKind::Class => "class",
            GroupKind::Actor => "actor",
            GroupKind::Enum => "enum",
            GroupKind::Protocol => "protocol",
            GroupKind::Extension => "extension",
        }
    }
}

/// Builds a struct, class, actor, enum, protocol or extension.
#[derive(Debug, Clone)]
#[must_use]
pub struct GroupBuilder {
    kind: GroupKind,
    name: String,
    prefix: DeclPrefix,
    generics: Vec<GenericParam>,
    inherits: Vec<TypeRef>,
    requirements: Vec<String>,
    cases: Vec<CaseSpec>,
    members: Vec<Decl>,
    template: Template,
}

pub fn struct_decl(name: impl Into<String>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Struct, name.into())
}

pub fn class_decl(name: impl Into<String>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Class, name.into())
}

pub fn actor_decl(name: impl Into<String>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Actor, name.into())
}

pub fn enum_decl(name: impl Into<String>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Enum, name.into())
}

pub fn protocol_decl(name: impl Into<String>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Protocol, name.into())
}

/// An extension of `extended`, which may be any type, e.g. `Array<Int>`.
pub fn extension_decl(extended: impl Into<TypeRef>) -> GroupBuilder {
    GroupBuilder::new(GroupKind::Extension, extended.into().to_string())
}

impl GroupBuilder {
    fn new(kind: GroupKind, name: String) -> Self {
        GroupBuilder {
            kind,
            name,
            prefix: DeclPrefix::default(),
            generics: Vec::new(),
            inherits: Vec::new(),
            requirements: Vec::new(),
            cases: Vec::new(),
            members: Vec::new(),
            template: Template::default(),
        }
    }

    prefix_setters!();
    template_setter!();

    pub fn generic(mut self, parameter: GenericParam) -> Self {
        self.generics.push(parameter);
        self
    }

    /// Add a superclass or conformance.
    pub fn inherits(mut self, ty: impl Into<TypeRef>) -> Self {
        self.inherits.push(ty.into());
        self
    }

    /// Add a `where` requirement such as `T: Equatable`.
    pub fn where_requirement(mut self, requirement: impl Interpolate) -> Self {
        self.requirements.push(requirement.interpolation());
        self
    }

    /// Add an enum case. Cases precede other members, one per line.
    pub fn case(mut self, case: CaseSpec) -> Self {
        self.cases.push(case);
        self
    }

    pub fn member(mut self, member: Decl) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(mut self, members: impl IntoIterator<Item = Decl>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn render(&self) -> String {
        let mut text = self.prefix.render();
        text.push_str(self.kind.keyword());
        text.push(' ');
        text.push_str(&self.name);
        text.push_str(&generic_clause(&self.generics));
        if !self.inherits.is_empty() {
            text.push_str(": ");
            text.push_str(&comma_list(&self.inherits, TypeRef::to_string));
        }
        text.push_str(&where_clause(&self.requirements));
        text.push(' ');
        if self.cases.is_empty() {
            text.push_str(&render_members(&self.members));
        } else {
            text.push('{');
            for case in &self.cases {
                text.push_str("\ncase ");
                text.push_str(&case.render());
            }
            for member in &self.members {
                text.push('\n');
                text.push_str(&member.to_source());
            }
            text.push_str("\n}");
        }
        text
    }

    pub fn build(self) -> MacroResult<Decl> {
        if !self.cases.is_empty() && self.kind != GroupKind::Enum {
            return Err(MacroError::message(format!(
                "{} {} cannot declare enum cases",
                self.kind.keyword(),
                self.name
            )));
        }
        if !self.generics.is_empty()
            && matches!(self.kind, GroupKind::Protocol | GroupKind::Extension)
        {
            return Err(MacroError::message(format!(
                "{} {} cannot take generic parameters",
                self.kind.keyword(),
                self.name
            )));
        }
        self.template.decl(&self.render())
    }
}

// ============================================================================
// Variables and type aliases
// ============================================================================

#[derive(Debug, Clone, Default)]
enum AccessorSpec {
    #[default]
    Stored,
    Getter(Vec<Stmt>),
    GetSet {
        get: Vec<Stmt>,
        set: Vec<Stmt>,
    },
    Observers {
        will_set: Option<Vec<Stmt>>,
        did_set: Option<Vec<Stmt>>,
    },
}

/// Builds a `let` or `var` with a single binding.
#[derive(Debug, Clone)]
#[must_use]
pub struct VariableBuilder {
    prefix: DeclPrefix,
    setter_visibility: Option<Visibility>,
    is_let: bool,
    name: String,
    ty: Option<TypeRef>,
    initializer: Option<String>,
    accessors: AccessorSpec,
    template: Template,
}

impl VariableBuilder {
    fn new(is_let: bool, name: String) -> Self {
        VariableBuilder {
            prefix: DeclPrefix::default(),
            setter_visibility: None,
            is_let,
            name,
            ty: None,
            initializer: None,
            accessors: AccessorSpec::Stored,
            template: Template::default(),
        }
    }

    /// `let name`
    pub fn constant(name: impl Into<String>) -> Self {
        VariableBuilder::new(true, name.into())
    }

    /// `var name`
    pub fn variable(name: impl Into<String>) -> Self {
        VariableBuilder::new(false, name.into())
    }

    prefix_setters!();
    template_setter!();

    pub fn of_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn initializer(mut self, value: impl Interpolate) -> Self {
        self.initializer = Some(value.interpolation());
        self
    }

    /// Restrict the setter, as in `private(set)`.
    pub fn setter_visibility(mut self, visibility: Visibility) -> Self {
        self.setter_visibility = Some(visibility);
        self
    }

    /// Make the property computed with a getter body.
    pub fn getter(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        self.accessors = match self.accessors {
            AccessorSpec::GetSet { set, .. } => AccessorSpec::GetSet {
                get: body.into_iter().collect(),
                set,
            },
            _ => AccessorSpec::Getter(body.into_iter().collect()),
        };
        self
    }

    /// Add a setter; requires a getter.
    pub fn setter(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        let get = match self.accessors {
            AccessorSpec::Getter(get) | AccessorSpec::GetSet { get, .. } => get,
            _ => Vec::new(),
        };
        self.accessors = AccessorSpec::GetSet {
            get,
            set: body.into_iter().collect(),
        };
        self
    }

    pub fn will_set(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        let did_set = match self.accessors {
            AccessorSpec::Observers { did_set, .. } => did_set,
            _ => None,
        };
        self.accessors = AccessorSpec::Observers {
            will_set: Some(body.into_iter().collect()),
            did_set,
        };
        self
    }

    pub fn did_set(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        let will_set = match self.accessors {
            AccessorSpec::Observers { will_set, .. } => will_set,
            _ => None,
        };
        self.accessors = AccessorSpec::Observers {
            will_set,
            did_set: Some(body.into_iter().collect()),
        };
        self
    }

    pub fn render(&self) -> String {
        let mut text = self.prefix.render();
        if let Some(visibility) = self.setter_visibility {
            text.push_str(visibility.keyword());
            text.push_str("(set) ");
        }
        text.push_str(if self.is_let { "let " } else { "var " });
        text.push_str(&self.name);
        if let Some(ty) = &self.ty {
            text.push_str(": ");
            text.push_str(ty.as_str());
        }
        if let Some(value) = &self.initializer {
            text.push_str(" = ");
            text.push_str(value);
        }
        match &self.accessors {
            AccessorSpec::Stored => {}
            AccessorSpec::Getter(body) => {
                text.push(' ');
                text.push_str(&render_block(body));
            }
            AccessorSpec::GetSet { get, set } => {
                text.push_str(" {\nget ");
                text.push_str(&render_block(get));
                text.push_str("\nset ");
                text.push_str(&render_block(set));
                text.push_str("\n}");
            }
            AccessorSpec::Observers { will_set, did_set } => {
                text.push_str(" {");
                if let Some(body) = will_set {
                    text.push_str("\nwillSet ");
                    text.push_str(&render_block(body));
                }
                if let Some(body) = did_set {
                    text.push_str("\ndidSet ");
                    text.push_str(&render_block(body));
                }
                text.push_str("\n}");
            }
        }
        text
    }

    pub fn build(self) -> MacroResult<Decl> {
        let computed = matches!(
            self.accessors,
            AccessorSpec::Getter(_) | AccessorSpec::GetSet { .. }
        );
        if computed && self.is_let {
            return Err(MacroError::message(format!(
                "computed property {} must be declared with var",
                self.name
            )));
        }
        if computed && self.ty.is_none() {
            return Err(MacroError::message(format!(
                "computed property {} needs a type",
                self.name
            )));
        }
        self.template.decl(&self.render())
    }
}

/// `var name: ty { body }`
pub fn computed_property(
    name: impl Into<String>,
    ty: impl Into<TypeRef>,
    body: impl IntoIterator<Item = Stmt>,
) -> VariableBuilder {
    VariableBuilder::variable(name).of_type(ty).getter(body)
}

#[derive(Debug, Clone)]
#[must_use]
pub struct TypeAliasBuilder {
    prefix: DeclPrefix,
    name: String,
    generics: Vec<GenericParam>,
    aliased: TypeRef,
    template: Template,
}

/// `typealias name = aliased`
pub fn typealias(name: impl Into<String>, aliased: impl Into<TypeRef>) -> TypeAliasBuilder {
    TypeAliasBuilder {
        prefix: DeclPrefix::default(),
        name: name.into(),
        generics: Vec::new(),
        aliased: aliased.into(),
        template: Template::default(),
    }
}

impl TypeAliasBuilder {
    prefix_setters!();
    template_setter!();

    pub fn generic(mut self, parameter: GenericParam) -> Self {
        self.generics.push(parameter);
        self
    }

    pub fn build(self) -> MacroResult<Decl> {
        let text = format!(
            "{}typealias {}{} = {}",
            self.prefix.render(),
            self.name,
            generic_clause(&self.generics),
            self.aliased
        );
        self.template.decl(&text)
    }
}

// ============================================================================
// Functions
// ============================================================================

/// The first step of building a function: everything but the result type
/// and body. Finish with [`returning`](Self::returning), [`body`](Self::body)
/// for a function returning nothing, or [`bodiless`](Self::bodiless) for a
/// protocol requirement.
#[derive(Debug, Clone)]
#[must_use]
pub struct FunctionSignatureBuilder {
    prefix: DeclPrefix,
    name: String,
    generics: Vec<GenericParam>,
    params: Vec<Param>,
    effects: Effects,
    requirements: Vec<String>,
    template: Template,
}

pub fn function(
    name: impl Into<String>,
    params: impl IntoIterator<Item = Param>,
) -> FunctionSignatureBuilder {
    FunctionSignatureBuilder {
        prefix: DeclPrefix::default(),
        name: name.into(),
        generics: Vec::new(),
        params: params.into_iter().collect(),
        effects: Effects::none(),
        requirements: Vec::new(),
        template: Template::default(),
    }
}

/// Start a function from `(names, type)` pairs, where `names` is `"name"`
/// or `"label name"`.
#[deprecated(note = "use `function` with `Param` descriptors")]
pub fn function_with_tuple_params(
    name: impl Into<String>,
    params: &[(&str, &str)],
) -> FunctionSignatureBuilder {
    function(
        name,
        params
            .iter()
            .map(|(names, ty)| Param::from_names(names, *ty)),
    )
}

impl FunctionSignatureBuilder {
    prefix_setters!();
    template_setter!();

    pub fn generic(mut self, parameter: GenericParam) -> Self {
        self.generics.push(parameter);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    pub fn where_requirement(mut self, requirement: impl Interpolate) -> Self {
        self.requirements.push(requirement.interpolation());
        self
    }

    pub fn returning(self, result: impl Into<TypeRef>) -> ReturningFunction {
        ReturningFunction {
            signature: self,
            result: result.into(),
        }
    }

    /// Finish a function that returns nothing.
    pub fn body(self, body: impl IntoIterator<Item = Stmt>) -> MacroResult<Decl> {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.finish(None, Some(&body))
    }

    pub fn bodiless(self) -> MacroResult<Decl> {
        self.finish(None, None)
    }

    fn render(&self, result: Option<&TypeRef>, body: Option<&[Stmt]>) -> String {
        let mut text = self.prefix.render();
        text.push_str("func ");
        text.push_str(&self.name);
        if self.name.starts_with(|c: char| !(c.is_alphanumeric() || c == '_' || c == '`')) {
            text.push(' ');
        }
        text.push_str(&generic_clause(&self.generics));
        text.push_str(&parameter_clause(&self.params));
        text.push_str(&self.effects.render());
        if let Some(result) = result {
            text.push_str(" -> ");
            text.push_str(result.as_str());
        }
        text.push_str(&where_clause(&self.requirements));
        if let Some(body) = body {
            text.push(' ');
            text.push_str(&render_block(body));
        }
        text
    }

    fn finish(&self, result: Option<&TypeRef>, body: Option<&[Stmt]>) -> MacroResult<Decl> {
        self.template.decl(&self.render(result, body))
    }
}

/// A function signature with its result type; finish with a body.
#[derive(Debug, Clone)]
#[must_use]
pub struct ReturningFunction {
    signature: FunctionSignatureBuilder,
    result: TypeRef,
}

impl ReturningFunction {
    pub fn body(self, body: impl IntoIterator<Item = Stmt>) -> MacroResult<Decl> {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.signature.finish(Some(&self.result), Some(&body))
    }

    pub fn bodiless(self) -> MacroResult<Decl> {
        self.signature.finish(Some(&self.result), None)
    }
}

// ============================================================================
// Initializers
// ============================================================================

#[derive(Debug, Clone)]
#[must_use]
pub struct InitializerBuilder {
    prefix: DeclPrefix,
    optional_mark: Option<char>,
    generics: Vec<GenericParam>,
    params: Vec<Param>,
    effects: Effects,
    template: Template,
}

pub fn initializer(params: impl IntoIterator<Item = Param>) -> InitializerBuilder {
    InitializerBuilder {
        prefix: DeclPrefix::default(),
        optional_mark: None,
        generics: Vec::new(),
        params: params.into_iter().collect(),
        effects: Effects::none(),
        template: Template::default(),
    }
}

impl InitializerBuilder {
    prefix_setters!();
    template_setter!();

    /// `init?`
    pub fn failable(mut self) -> Self {
        self.optional_mark = Some('?');
        self
    }

    /// `init!`
    pub fn implicitly_unwrapped(mut self) -> Self {
        self.optional_mark = Some('!');
        self
    }

    pub fn generic(mut self, parameter: GenericParam) -> Self {
        self.generics.push(parameter);
        self
    }

    pub fn effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    fn render(&self, body: Option<&[Stmt]>) -> String {
        let mut text = self.prefix.render();
        text.push_str("init");
        if let Some(mark) = self.optional_mark {
            text.push(mark);
        }
        text.push_str(&generic_clause(&self.generics));
        text.push_str(&parameter_clause(&self.params));
        text.push_str(&self.effects.render());
        if let Some(body) = body {
            text.push(' ');
            text.push_str(&render_block(body));
        }
        text
    }

    pub fn body(self, body: impl IntoIterator<Item = Stmt>) -> MacroResult<Decl> {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.template.decl(&self.render(Some(&body)))
    }

    pub fn bodiless(self) -> MacroResult<Decl> {
        self.template.decl(&self.render(None))
    }
}

/// An initializer taking one parameter per stored property and assigning
/// each to `self`.
///
/// Properties without a written type are skipped, as are constants that
/// already have a value. A `var` initializer becomes the parameter default,
/// and function-typed parameters are marked `@escaping`.
pub fn memberwise_initializer(
    properties: &[Binding<'_>],
    visibility: Option<Visibility>,
) -> MacroResult<Decl> {
    Template::default().memberwise_initializer(properties, visibility)
}

impl Template {
    /// [`memberwise_initializer`] parsed with this template's options.
    pub fn memberwise_initializer(
        &self,
        properties: &[Binding<'_>],
        visibility: Option<Visibility>,
    ) -> MacroResult<Decl> {
        let settable: Vec<&Binding<'_>> = properties
            .iter()
            .filter(|p| p.is_stored() && !p.is_type_member() && p.type_name().is_some())
            .filter(|p| !(p.is_let() && p.initializer().is_some()))
            .collect();

        let params = settable.iter().map(|p| {
            let param = Param::from(*p);
            match p.initializer() {
                Some(value) if !p.is_let() => param.default_value(value),
                _ => param,
            }
        });
        let body = settable
            .iter()
            .map(|p| format!("self.{0} = {0}", p.name()))
            .collect::<Vec<_>>()
            .join("\n");
        let statements = if body.is_empty() {
            Vec::new()
        } else {
            self.stmts(&body)?
        };

        let mut builder = initializer(params).options(self.options());
        if let Some(visibility) = visibility {
            builder = builder.visibility(visibility);
        }
        builder.body(statements)
    }
}
