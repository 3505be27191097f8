// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Reader and builder laws, checked end to end through parsed source.

use tugmacro::builder::{
    class_decl, do_catch, enum_decl, function, if_stmt, memberwise_initializer, struct_decl,
    template, CaseSpec, Catch, GenericParam, Param, VariableBuilder,
};
use tugmacro::diagnostics::apply_fix_its;
use tugmacro::reader::{
    ClassReader, EnumReader, GenericParameterReader, InheritanceReader, MemberBlockReader,
    ModifierReader, NamedReader, Reader, SignatureReader, StructReader, VariableReader,
    Visibility,
};
use tugmacro::Severity;
use tugmacro_syntax::{parse_decl, Codegen, Decl, Stmt};

fn decl(source: &str) -> Decl {
    parse_decl(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

fn stmt(source: &str) -> Stmt {
    template::stmt(source).unwrap()
}

// =============================================================================
// Bindings
// =============================================================================

#[test]
fn comma_separated_bindings_yield_one_descriptor_each() {
    let d = decl("var a: Int = 1, b = \"two\", c: Double");
    let bindings = VariableReader::new(&d).unwrap().bindings();
    let names: Vec<_> = bindings.iter().map(|b| b.name()).collect();
    let types: Vec<_> = bindings.iter().map(|b| b.type_name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(types, [Some("Int"), None, Some("Double")]);
    assert!(bindings.iter().all(|b| b.is_mutable()));

    let d = decl("let x = 1, y = 2");
    let bindings = VariableReader::new(&d).unwrap().bindings();
    assert_eq!(bindings.len(), 2);
    assert!(bindings.iter().all(|b| !b.is_mutable()));
}

#[test]
fn mutability_follows_accessors() {
    let cases = [
        ("var a: Int { 1 }", false),
        ("var a: Int { get { 1 } }", false),
        ("var a: Int { get { 1 } set { } }", true),
        ("var a: Int = 0 { willSet { } }", true),
        ("var a: Int = 0 { didSet { } }", true),
        ("var a: Int = 0", true),
        ("let a: Int = 0", false),
    ];
    for (source, mutable) in cases {
        let d = decl(source);
        let bindings = VariableReader::new(&d).unwrap().bindings();
        assert_eq!(bindings.len(), 1, "{source}");
        assert_eq!(bindings[0].is_mutable(), mutable, "{source}");
    }
}

#[test]
fn mismatched_tuple_destructuring_contributes_nothing() {
    let d = decl("let (a, b) = (1, 2, 3)");
    assert!(VariableReader::new(&d).unwrap().bindings().is_empty());

    let d = decl("let (a, b) = (1, 2)");
    assert_eq!(VariableReader::new(&d).unwrap().bindings().len(), 2);
}

#[test]
fn setter_visibility_is_independent_of_visibility() {
    let d = decl("public private(set) var x: Int = 0");
    let var = VariableReader::new(&d).unwrap();
    assert_eq!(var.visibility(), Some(Visibility::Public));
    assert_eq!(var.setter_visibility(), Some(Visibility::Private));

    let d = decl("public var y: Int = 0");
    let var = VariableReader::new(&d).unwrap();
    assert_eq!(var.setter_visibility(), None);
}

// =============================================================================
// Readers
// =============================================================================

#[test]
fn multi_name_case_statement_expands_per_name() {
    let d = decl("enum Letter {\n    case a, b, c\n}");
    let cases = EnumReader::new(&d).unwrap().cases();
    assert_eq!(cases.len(), 3);
    let statement = cases[0].statement().id;
    assert!(cases.iter().all(|c| c.statement().id == statement));
    assert_ne!(cases[0].id(), cases[1].id());
    assert_ne!(cases[1].id(), cases[2].id());
}

#[test]
fn parameter_local_names() {
    let d = decl("func place(at index: Int, in view: View, animated: Bool) {}");
    let function = tugmacro::reader::FunctionReader::new(&d).unwrap();
    let params = function.parameters();
    let locals: Vec<_> = params.iter().map(|p| p.local_name()).collect();
    let labels: Vec<_> = params.iter().map(|p| p.label()).collect();
    assert_eq!(locals, ["index", "view", "animated"]);
    assert_eq!(labels, ["at", "in", "animated"]);
}

#[test]
fn enum_case_associated_values() {
    let d = decl(
        "enum Outcome {\n    case success(value: Int)\n    case failure(Error)\n    case empty\n}",
    );
    let cases = EnumReader::new(&d).unwrap().cases();
    let success = cases[0].associated_values();
    assert_eq!(success.len(), 1);
    assert_eq!(
        (success[0].label(), success[0].type_name().as_str()),
        (Some("value"), "Int")
    );
    let failure = cases[1].associated_values();
    assert_eq!(failure.len(), 1);
    assert_eq!((failure[0].label(), failure[0].type_name().as_str()), (None, "Error"));
    assert!(cases[2].associated_values().is_empty());
}

#[test]
fn wrong_kind_constructors_return_none() {
    let d = decl("struct S {}");
    assert!(EnumReader::new(&d).is_none());
    assert!(ClassReader::new(&d).is_none());
    assert!(StructReader::new(&d).is_some());
}

// =============================================================================
// Builders
// =============================================================================

#[test]
fn built_declarations_read_back_their_inputs() {
    let built = struct_decl("Stack")
        .visibility(Visibility::Public)
        .generic(GenericParam::new("Element"))
        .inherits("Sequence")
        .inherits("Sendable")
        .member(
            VariableBuilder::variable("items")
                .visibility(Visibility::Private)
                .of_type("[Element]")
                .initializer("[]")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let stack = StructReader::new(&built).unwrap();
    assert_eq!(stack.name(), "Stack");
    assert_eq!(stack.visibility(), Some(Visibility::Public));
    assert_eq!(stack.inherited_type_names(), ["Sequence", "Sendable"]);
    assert_eq!(stack.generic_parameter_names(), ["Element"]);
    let items = &stack.properties()[0];
    assert_eq!(items.name(), "items");
    assert_eq!(items.type_name(), Some("[Element]"));
    assert_eq!(items.initializer(), Some("[]"));

    let built = class_decl("Node").build().unwrap();
    let node = ClassReader::new(&built).unwrap();
    assert_eq!(node.visibility(), None);
    assert!(node.inherited_type_names().is_empty());
    assert!(!node.is_generic());
}

#[test]
fn empty_optional_clauses_match_omitted_ones() {
    let plain = if_stmt("done", [stmt("finish()")]).build().unwrap();
    let empty_else = if_stmt("done", [stmt("finish()")]).otherwise([]).build().unwrap();
    assert_eq!(plain.to_source(), empty_else.to_source());

    let bare = do_catch([stmt("try run()")]).build().unwrap();
    assert_eq!(bare.to_source(), "do {\n    try run()\n}");
    let caught = do_catch([stmt("try run()")])
        .catch(Catch::any([]))
        .build()
        .unwrap();
    assert_eq!(caught.to_source(), "do {\n    try run()\n} catch {}");

    let a = struct_decl("S").build().unwrap();
    let b = struct_decl("S").members([]).build().unwrap();
    assert_eq!(a.to_source(), b.to_source());

    let a = function("f", []).body([]).unwrap();
    let b = function("f", [])
        .effects(tugmacro::builder::Effects::none())
        .body([])
        .unwrap();
    assert_eq!(a.to_source(), b.to_source());
}

#[test]
fn memberwise_initializer_scenario() {
    let d = decl("struct Person {\n    var name: String\n    var age: Int\n    static var count = 0\n}");
    let person = StructReader::new(&d).unwrap();
    let init = memberwise_initializer(&person.stored_properties(), None).unwrap();
    let reader = tugmacro::reader::InitializerReader::new(&init).unwrap();
    let params: Vec<_> = reader
        .parameters()
        .iter()
        .map(|p| (p.local_name().to_string(), p.type_text()))
        .collect();
    assert_eq!(
        params,
        [
            ("name".to_string(), "String".to_string()),
            ("age".to_string(), "Int".to_string())
        ]
    );
    assert_eq!(
        init.to_source(),
        "init(name: String, age: Int) {\n    self.name = name\n    self.age = age\n}"
    );
}

#[test]
fn built_enum_reads_back_cases() {
    let built = enum_decl("Outcome")
        .case(CaseSpec::new("success").labeled("value", "Int"))
        .case(CaseSpec::new("failure").value("Error"))
        .case(CaseSpec::new("empty"))
        .build()
        .unwrap();
    let cases = EnumReader::new(&built).unwrap().cases();
    let names: Vec<_> = cases.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["success", "failure", "empty"]);
    assert_eq!(cases[0].associated_values()[0].label(), Some("value"));
    assert_eq!(cases[1].associated_values()[0].type_name(), "Error");
}

#[test]
fn function_round_trip() {
    let built = function("scale", [Param::new("factor", "Double").label("by")])
        .visibility(Visibility::Internal)
        .returning("Self")
        .body([stmt("return self")])
        .unwrap();
    let reader = tugmacro::reader::FunctionReader::new(&built).unwrap();
    assert_eq!(reader.name(), "scale");
    assert_eq!(reader.visibility(), Some(Visibility::Internal));
    assert_eq!(reader.parameters()[0].label(), "by");
    assert_eq!(reader.parameters()[0].local_name(), "factor");
    assert_eq!(reader.return_type().map(|t| t.text()), Some("Self".to_string()));
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn fix_it_replacing_var_with_let() {
    let source = "var total = 0";
    let d = decl(source);
    let var = VariableReader::new(&d).unwrap();
    let keyword = var.binding_specifier();
    let diagnostic = var
        .warning_at(keyword, "variable is never mutated")
        .fix_text("replace `var` with `let`", keyword, "let")
        .build();
    assert_eq!(diagnostic.severity(), Severity::Warning);
    assert_eq!(diagnostic.fix_its().len(), 1);
    assert_eq!(diagnostic.node().text(), "var");
    assert_eq!(diagnostic.fix_its()[0].old().text(), "var");
    assert_eq!(
        apply_fix_its(source, diagnostic.fix_its()).unwrap(),
        "let total = 0"
    );
}

#[test]
fn diagnostics_travel_as_json() {
    let d = decl("struct S {}");
    let reader = StructReader::new(&d).unwrap();
    let diagnostic = reader.error("S must be a class").build();
    let json: serde_json::Value = serde_json::from_str(&diagnostic.to_json().unwrap()).unwrap();
    assert_eq!(json["severity"], "error");
    assert_eq!(json["message"], "S must be a class");
}
