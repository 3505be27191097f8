// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Complete macros written against the public API, expanded end to end.
//!
//! Set `RUST_LOG=tugmacro=debug` to see expansion logs while these run.

use tugmacro::builder::{
    call, computed_property, defer_stmt, expr_stmt, literal, memberwise_initializer,
    return_value, switch_stmt, template, Arg,
};
use tugmacro::diagnostics::apply_fix_its;
use tugmacro::reader::{
    AttributeView, DeclGroup, GroupReader, ModifierReader, NamedReader, Reader, VariableReader,
    Visibility,
};
use tugmacro::{
    expand_body, expand_members, wrap_body, BodyMacro, BodyTarget, DiagnosticSink,
    ExpansionContext, MacroError, MacroResult, MemberMacro, Severity,
};
use tugmacro_syntax::{parse_decl, Codegen, Decl, LanguageVersion, ParseOptions, Stmt};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn expand_with<M: MemberMacro>(expander: &M, source: &str) -> tugmacro::Expansion<Vec<Decl>> {
    init_tracing();
    let decl = parse_decl(source).unwrap_or_else(|e| panic!("{source}: {e}"));
    expand_members(expander, &decl, ParseOptions::default())
}

// =============================================================================
// @MemberwiseInit
// =============================================================================

/// Adds a memberwise initializer to a struct, class or actor.
struct MemberwiseInit;

impl MemberMacro for MemberwiseInit {
    fn name(&self) -> &str {
        "MemberwiseInit"
    }

    fn expansion(
        &self,
        attribute: AttributeView<'_>,
        group: DeclGroup<'_>,
        _context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Decl>> {
        if matches!(
            group.group(),
            GroupReader::Enum(_) | GroupReader::Protocol(_) | GroupReader::Extension(_)
        ) {
            return Err(group
                .error("@MemberwiseInit can only be applied to a struct, class or actor")
                .build()
                .into());
        }
        let visibility = attribute
            .labeled_argument("visibility")
            .and_then(|value| Visibility::from_keyword(value.trim_start_matches('.')));
        Ok(vec![memberwise_initializer(
            &group.stored_properties(),
            visibility,
        )?])
    }
}

#[test]
fn memberwise_init_on_struct() {
    let expansion = expand_with(
        &MemberwiseInit,
        "@MemberwiseInit(visibility: .public)\nstruct Person {\n    let name: String\n    var age: Int = 0\n    var label: String { name }\n}",
    );
    assert!(expansion.diagnostics.is_empty());
    let members = expansion.output.unwrap();
    assert_eq!(
        members[0].to_source(),
        "public init(name: String, age: Int = 0) {\n    self.name = name\n    self.age = age\n}"
    );
}

#[test]
fn memberwise_init_rejects_enum() {
    let expansion = expand_with(&MemberwiseInit, "@MemberwiseInit enum Choice {\n    case a\n}");
    assert!(expansion.has_errors());
    let Err(MacroError::Diagnostic(diagnostic)) = &expansion.output else {
        panic!("expected a diagnostic, got {:?}", expansion.output);
    };
    assert_eq!(diagnostic.severity(), Severity::Error);
    assert!(diagnostic.message().contains("struct, class or actor"));
}

// =============================================================================
// @CaseDetection
// =============================================================================

/// Adds `isX` properties for every case of an enum.
struct CaseDetection;

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl MemberMacro for CaseDetection {
    fn name(&self) -> &str {
        "CaseDetection"
    }

    fn expansion(
        &self,
        _attribute: AttributeView<'_>,
        group: DeclGroup<'_>,
        context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Decl>> {
        let GroupReader::Enum(enumeration) = group.group() else {
            context.diagnose(group.warning("@CaseDetection has no effect outside an enum").build());
            return Ok(Vec::new());
        };
        enumeration
            .cases()
            .iter()
            .map(|case| {
                let test = switch_stmt("self")
                    .case(format!(".{}", case.name()), [return_value(true)?])
                    .default([return_value(false)?])
                    .options(context.options())
                    .build()?;
                let property =
                    computed_property(format!("is{}", capitalized(case.name())), "Bool", [test]);
                match group.visibility() {
                    Some(visibility) => property.visibility(visibility).build(),
                    None => property.build(),
                }
            })
            .collect()
    }
}

#[test]
fn case_detection_adds_one_property_per_case() {
    let expansion = expand_with(
        &CaseDetection,
        "@CaseDetection public enum Outcome {\n    case success(Int), failure(Error)\n    case pending\n}",
    );
    let members = expansion.output.unwrap();
    let names: Vec<_> = members
        .iter()
        .map(|member| {
            let var = VariableReader::new(member).unwrap();
            let binding = &var.bindings()[0];
            assert_eq!(binding.type_name(), Some("Bool"));
            assert!(binding.is_computed());
            assert_eq!(var.visibility(), Some(Visibility::Public));
            binding.name().to_string()
        })
        .collect();
    assert_eq!(names, ["isSuccess", "isFailure", "isPending"]);

    let source = members[0].to_source();
    assert!(source.contains("case .success:"));
    assert!(source.contains("return true"));
    assert!(source.contains("return false"));
}

#[test]
fn case_detection_warns_outside_enums() {
    let expansion = expand_with(&CaseDetection, "@CaseDetection struct S {}");
    assert!(expansion.output.as_ref().unwrap().is_empty());
    assert_eq!(expansion.diagnostics.len(), 1);
    assert_eq!(expansion.diagnostics[0].severity(), Severity::Warning);
    assert!(!expansion.has_errors());
}

// =============================================================================
// @Frozen
// =============================================================================

/// Flags stored `var` properties and offers `let` instead.
struct Frozen;

impl MemberMacro for Frozen {
    fn name(&self) -> &str {
        "Frozen"
    }

    fn expansion(
        &self,
        _attribute: AttributeView<'_>,
        group: DeclGroup<'_>,
        context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Decl>> {
        for var in group.variables() {
            let stored = var.bindings().iter().all(|b| b.is_stored());
            if var.is_var() && stored {
                let keyword = var.binding_specifier();
                let diagnostic = var
                    .warning_at(keyword, "stored property of a frozen type is mutable")
                    .fix_text("replace `var` with `let`", keyword, "let")
                    .note_at(group.node(), "members declared here")
                    .build();
                context.diagnose(diagnostic);
            }
        }
        Ok(Vec::new())
    }
}

#[test]
fn frozen_offers_let_fix_its() {
    let source = "@Frozen struct Config {\n    var limit = 10\n    let name: String\n    var retries: Int {\n        3\n    }\n}";
    let expansion = expand_with(&Frozen, source);
    assert!(expansion.output.as_ref().unwrap().is_empty());
    assert_eq!(expansion.diagnostics.len(), 1);

    let diagnostic = &expansion.diagnostics[0];
    assert_eq!(diagnostic.node().text(), "var");
    assert_eq!(diagnostic.notes()[0].message(), "members declared here");
    let fixed = apply_fix_its(source, diagnostic.fix_its()).unwrap();
    assert_eq!(
        fixed,
        "@Frozen struct Config {\n    let limit = 10\n    let name: String\n    var retries: Int {\n        3\n    }\n}"
    );
}

// =============================================================================
// @Logged
// =============================================================================

/// Logs entry and exit around the original body.
struct Logged;

impl BodyMacro for Logged {
    fn name(&self) -> &str {
        "Logged"
    }

    fn expansion(
        &self,
        attribute: AttributeView<'_>,
        target: BodyTarget<'_>,
        context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Stmt>> {
        let category = attribute
            .labeled_argument("category")
            .unwrap_or("\"default\"");
        let message = |event: &str| -> MacroResult<Stmt> {
            let text = literal(format!("{event} {}", target.name()))?;
            expr_stmt(call(
                "log",
                [Arg::new(text), Arg::labeled("category", category)],
            )?)
        };
        let entry = message("enter")?;
        let exit = defer_stmt([message("exit")?])?;
        let marker = context.make_unique_name("start");
        let start = template::stmt(&format!("let {marker} = clock.now"))?;
        Ok(wrap_body([entry, exit, start], target.statements(), []))
    }
}

#[test]
fn logged_wraps_function_body() {
    init_tracing();
    let decl = parse_decl(
        "@Logged(category: \"net\")\nfunc fetch() async throws -> Data {\n    let data = try await load()\n    return data\n}",
    )
    .unwrap();
    let expansion = expand_body(&Logged, &decl, ParseOptions::default());
    let body = expansion.output.unwrap();
    let text: Vec<_> = body.iter().map(Codegen::to_source).collect();
    assert_eq!(
        text,
        [
            "log(\"enter fetch\", category: \"net\")",
            "defer {\n    log(\"exit fetch\", category: \"net\")\n}",
            "let __macro_start_0 = clock.now",
            "let data = try await load()",
            "return data",
        ]
    );
}

#[test]
fn logged_accepts_initializers_and_rejects_types() {
    let decl = parse_decl("@Logged init() {\n    setUp()\n}").unwrap();
    let expansion = expand_body(&Logged, &decl, ParseOptions::default());
    let body = expansion.output.unwrap();
    assert_eq!(body[0].to_source(), "log(\"enter init\", category: \"default\")");
    assert_eq!(body.last().unwrap().to_source(), "setUp()");

    let decl = parse_decl("@Logged struct S {}").unwrap();
    let expansion = expand_body(&Logged, &decl, ParseOptions::default());
    assert!(matches!(
        expansion.output,
        Err(MacroError::ShapeMismatch { .. })
    ));
}

#[test]
fn context_options_reach_templates() {
    let mut context = ExpansionContext::new(ParseOptions::new(LanguageVersion::V5_10));
    assert!(context.template().decl("func f() throws(E) {}").is_err());
    assert!(ExpansionContext::default()
        .template()
        .decl("func f() throws(E) {}")
        .is_ok());

    let typed = parse_decl("struct Job {\n    let handler: () throws(E) -> Void\n}").unwrap();
    let properties = DeclGroup::new(&typed).unwrap().stored_properties();
    assert!(context.template().memberwise_initializer(&properties, None).is_err());
    assert!(memberwise_initializer(&properties, None).is_ok());
    let body = [template::stmt("let limit = 3").unwrap()];
    assert!(context.template().guard_stmt("ready", body.clone()).is_ok());
    assert!(context
        .template()
        .defer_stmt([template::stmt("let f: () throws(E) -> Void = run").unwrap()])
        .is_err());

    assert_eq!(context.make_unique_name("tmp"), "__macro_tmp_0");
    assert!(!context.has_errors());

    let decl = parse_decl("struct S {}").unwrap();
    let group = DeclGroup::new(&decl).unwrap();
    context.diagnose(group.error("bad").build());
    assert!(context.has_errors());
    assert_eq!(group.name(), "S");
}
