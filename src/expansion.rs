// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Running macros against declarations.
//!
//! A macro implements [`MemberMacro`] (new members for a type) or
//! [`BodyMacro`] (a replacement body for a function or initializer). It
//! receives the invoking attribute, a reader over the attached declaration,
//! and an [`ExpansionContext`] carrying parse options, a diagnostic sink and
//! a unique-name generator.
//!
//! [`expand_members`] and [`expand_body`] locate the invoking attribute, run
//! the macro and return its output together with every diagnostic raised.

use tracing::{debug, warn};
use tugmacro_syntax::{Attribute, Decl, ParseOptions, Stmt};

use crate::builder::Template;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticSink};
use crate::error::{MacroError, MacroResult};
use crate::reader::{
    AttributeView, CodeBlockReader, DeclGroup, FunctionReader, InitializerReader, NamedReader,
};

// ============================================================================
// Context
// ============================================================================

/// Per-expansion state handed to a macro.
#[derive(Debug, Default)]
pub struct ExpansionContext {
    template: Template,
    diagnostics: DiagnosticCollector,
    next_unique: usize,
}

impl ExpansionContext {
    pub fn new(options: ParseOptions) -> Self {
        ExpansionContext {
            template: Template::new(options),
            ..ExpansionContext::default()
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.template.options()
    }

    /// A template parsing with this context's options.
    pub fn template(&self) -> Template {
        self.template
    }

    /// A fresh identifier, `__macro_{base}_{n}`, numbered in call order.
    pub fn make_unique_name(&mut self, base: &str) -> String {
        let name = format!("__macro_{}_{}", base, self.next_unique);
        self.next_unique += 1;
        name
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_diagnostics()
    }
}

impl DiagnosticSink for ExpansionContext {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.diagnose(diagnostic);
    }
}

// ============================================================================
// Macro traits
// ============================================================================

/// Adds members to a type, protocol or extension.
pub trait MemberMacro {
    /// The attribute name that invokes the macro, without `@`.
    fn name(&self) -> &str;

    fn expansion(
        &self,
        attribute: AttributeView<'_>,
        group: DeclGroup<'_>,
        context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Decl>>;
}

/// Replaces the body of a function or initializer.
pub trait BodyMacro {
    fn name(&self) -> &str;

    fn expansion(
        &self,
        attribute: AttributeView<'_>,
        target: BodyTarget<'_>,
        context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Stmt>>;
}

/// A declaration with a body a [`BodyMacro`] may replace.
#[derive(Debug, Clone, Copy)]
pub enum BodyTarget<'a> {
    Function(FunctionReader<'a>),
    Initializer(InitializerReader<'a>),
}

impl<'a> BodyTarget<'a> {
    pub fn new(decl: &'a Decl) -> Option<Self> {
        FunctionReader::new(decl)
            .map(BodyTarget::Function)
            .or_else(|| InitializerReader::new(decl).map(BodyTarget::Initializer))
    }

    /// The function name, or `init`.
    pub fn name(&self) -> &'a str {
        match self {
            BodyTarget::Function(function) => function.name(),
            BodyTarget::Initializer(_) => "init",
        }
    }

    /// The statements of the current body; empty when there is none.
    pub fn statements(&self) -> &'a [Stmt] {
        match self {
            BodyTarget::Function(function) => function.body_statements(),
            BodyTarget::Initializer(init) => init.body_statements(),
        }
    }
}

/// `prepend`, then the original statements unchanged, then `append`.
pub fn wrap_body(
    prepend: impl IntoIterator<Item = Stmt>,
    original: &[Stmt],
    append: impl IntoIterator<Item = Stmt>,
) -> Vec<Stmt> {
    prepend
        .into_iter()
        .chain(original.iter().cloned())
        .chain(append)
        .collect()
}

// ============================================================================
// Drivers
// ============================================================================

/// The output of one expansion and the diagnostics raised producing it.
#[derive(Debug)]
pub struct Expansion<T> {
    pub output: MacroResult<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Expansion<T> {
    /// Whether the macro failed or raised an error diagnostic.
    pub fn has_errors(&self) -> bool {
        self.output.is_err() || self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

fn find_attribute<'a>(decl: &'a Decl, name: &str) -> MacroResult<&'a Attribute> {
    decl.attributes()
        .iter()
        .find(|attribute| attribute.name.text() == name)
        .ok_or_else(|| MacroError::message(format!("declaration has no @{name} attribute")))
}

/// Run `expander` on `decl`, which must be a declaration group carrying the
/// macro's attribute.
pub fn expand_members<M: MemberMacro + ?Sized>(
    expander: &M,
    decl: &Decl,
    options: ParseOptions,
) -> Expansion<Vec<Decl>> {
    let mut context = ExpansionContext::new(options);
    let output = run_members(expander, decl, &mut context);
    finish(expander.name(), output, context, |members| members.len())
}

fn run_members<M: MemberMacro + ?Sized>(
    expander: &M,
    decl: &Decl,
    context: &mut ExpansionContext,
) -> MacroResult<Vec<Decl>> {
    let group = DeclGroup::new(decl).ok_or_else(|| MacroError::ShapeMismatch {
        expected: "declaration group",
        found: decl.kind(),
    })?;
    let attribute = find_attribute(decl, expander.name())?;
    debug!(macro_name = expander.name(), group = %group.name(), "expanding members");
    expander.expansion(AttributeView::from_node(attribute), group, context)
}

/// Run `expander` on a function or initializer carrying its attribute.
pub fn expand_body<M: BodyMacro + ?Sized>(
    expander: &M,
    decl: &Decl,
    options: ParseOptions,
) -> Expansion<Vec<Stmt>> {
    let mut context = ExpansionContext::new(options);
    let output = run_body(expander, decl, &mut context);
    finish(expander.name(), output, context, |stmts| stmts.len())
}

fn run_body<M: BodyMacro + ?Sized>(
    expander: &M,
    decl: &Decl,
    context: &mut ExpansionContext,
) -> MacroResult<Vec<Stmt>> {
    let target = BodyTarget::new(decl).ok_or_else(|| MacroError::ShapeMismatch {
        expected: "function or initializer",
        found: decl.kind(),
    })?;
    let attribute = find_attribute(decl, expander.name())?;
    debug!(macro_name = expander.name(), target = target.name(), "expanding body");
    expander.expansion(AttributeView::from_node(attribute), target, context)
}

fn finish<T>(
    macro_name: &str,
    output: MacroResult<T>,
    context: ExpansionContext,
    count: impl Fn(&T) -> usize,
) -> Expansion<T> {
    match &output {
        Ok(produced) => debug!(
            macro_name,
            produced = count(produced),
            diagnostics = context.diagnostics().len(),
            "expansion finished"
        ),
        Err(err) => warn!(macro_name, error = %err, "expansion failed"),
    }
    Expansion {
        output,
        diagnostics: context.into_diagnostics(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{function, VariableBuilder};
    use crate::reader::{Reader, StructReader};
    use tugmacro_syntax::{parse_decl, parse_stmts, Codegen};

    struct Describe;

    impl MemberMacro for Describe {
        fn name(&self) -> &str {
            "Describe"
        }

        fn expansion(
            &self,
            _attribute: AttributeView<'_>,
            group: DeclGroup<'_>,
            context: &mut ExpansionContext,
        ) -> MacroResult<Vec<Decl>> {
            if group.stored_properties().is_empty() {
                context.diagnose(group.warning("nothing to describe").build());
            }
            let name = context.make_unique_name("description");
            Ok(vec![VariableBuilder::constant(name)
                .initializer(format!("\"{}\"", group.name()))
                .options(context.options())
                .build()?])
        }
    }

    #[test]
    fn unique_names_are_sequential() {
        let mut context = ExpansionContext::default();
        assert_eq!(context.make_unique_name("x"), "__macro_x_0");
        assert_eq!(context.make_unique_name("x"), "__macro_x_1");
        assert_eq!(context.make_unique_name("tmp"), "__macro_tmp_2");
    }

    #[test]
    fn wrap_body_concatenates() {
        let original = parse_stmts("work()").unwrap();
        let before = parse_stmts("start()").unwrap();
        let after = parse_stmts("stop()").unwrap();
        let wrapped = wrap_body(before, &original, after);
        let text: Vec<_> = wrapped.iter().map(Codegen::to_source).collect();
        assert_eq!(text, ["start()", "work()", "stop()"]);
        assert_eq!(wrapped[1], original[0]);
        assert_eq!(wrap_body([], &original, []), original);
    }

    #[test]
    fn member_expansion_keeps_diagnostics() {
        let decl = parse_decl("@Describe struct Empty {}").unwrap();
        let expansion = expand_members(&Describe, &decl, ParseOptions::default());
        let members = expansion.output.as_ref().unwrap();
        assert_eq!(members[0].to_source(), "let __macro_description_0 = \"Empty\"");
        assert_eq!(expansion.diagnostics.len(), 1);
        assert_eq!(expansion.diagnostics[0].message(), "nothing to describe");
        assert!(!expansion.has_errors());
    }

    #[test]
    fn expansion_requires_group_and_attribute() {
        let decl = parse_decl("@Describe func f() {}").unwrap();
        let expansion = expand_members(&Describe, &decl, ParseOptions::default());
        assert!(matches!(expansion.output, Err(MacroError::ShapeMismatch { .. })));
        assert!(expansion.has_errors());

        let decl = parse_decl("struct Plain { var x: Int }").unwrap();
        assert!(StructReader::new(&decl).is_some_and(|s| s.id() == decl.id()));
        let expansion = expand_members(&Describe, &decl, ParseOptions::default());
        assert!(expansion.output.is_err());
    }

    struct Traced;

    impl BodyMacro for Traced {
        fn name(&self) -> &str {
            "Traced"
        }

        fn expansion(
            &self,
            _attribute: AttributeView<'_>,
            target: BodyTarget<'_>,
            context: &mut ExpansionContext,
        ) -> MacroResult<Vec<Stmt>> {
            let enter = context
                .template()
                .stmts(&format!("log(\"enter {}\")", target.name()))?;
            Ok(wrap_body(enter, target.statements(), []))
        }
    }

    #[test]
    fn body_expansion_prepends() {
        let decl = parse_decl("@Traced func run() {\n    step()\n}").unwrap();
        let expansion = expand_body(&Traced, &decl, ParseOptions::default());
        let body = expansion.output.unwrap();
        let text: Vec<_> = body.iter().map(Codegen::to_source).collect();
        assert_eq!(text, ["log(\"enter run\")", "step()"]);

        let rebuilt = function("run", []).body(body).unwrap();
        assert_eq!(
            rebuilt.to_source(),
            "func run() {\n    log(\"enter run\")\n    step()\n}"
        );
    }
}
