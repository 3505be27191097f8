// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the tugmacro-syntax parser and code generator.
//!
//! Canonical source is a fixed point: `parse(code).to_source() == code`.
//! Non-canonical source normalizes in one step and is then stable.
//!
//! # Test Organization
//!
//! - Fixture-based tests: One test per fixture file in `tests/fixtures/`
//! - Inline tests: Individual cases for specific constructs
//! - Normalization tests: Loose layout in, canonical layout out

use difference::assert_diff;
use itertools::Itertools;
use std::path::PathBuf;
use tugmacro_syntax::{
    parse_decl, parse_expr, parse_source_file, parse_stmt, parse_type, prettify_error, Codegen,
    CodegenState,
};

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn render(input: &str, label: &str) -> String {
    let file = match parse_source_file(input) {
        Ok(f) => f,
        Err(e) => panic!("{}", prettify_error(e, label)),
    };
    let mut state = CodegenState::default();
    file.codegen(&mut state);
    state.to_string()
}

/// Helper to perform round-trip test on canonical source code
fn assert_roundtrip(input: &str, label: &str) {
    let generated = render(input, label);
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

/// Helper to check that `input` renders as `expected` and that the result is
/// stable under another parse.
fn assert_normalizes(input: &str, expected: &str) {
    let generated = render(input, "input");
    if generated != expected {
        let got = visualize(&generated);
        let want = visualize(expected);
        assert_diff!(want.as_ref(), got.as_ref(), "", 0);
    }
    assert_roundtrip(&generated, "normalized");
}

/// Helper to load and test a fixture file
fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));
    let contents = contents.strip_suffix('\n').unwrap_or(&contents);

    assert_roundtrip(contents, fixture_name);
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_models() {
    assert_roundtrip_fixture("models.swift");
}

#[test]
fn roundtrip_fixture_shapes() {
    assert_roundtrip_fixture("shapes.swift");
}

#[test]
fn roundtrip_fixture_control_flow() {
    assert_roundtrip_fixture("control_flow.swift");
}

#[test]
fn roundtrip_fixture_expressions() {
    assert_roundtrip_fixture("expressions.swift");
}

#[test]
fn roundtrip_fixture_generics() {
    assert_roundtrip_fixture("generics.swift");
}

// =============================================================================
// Inline round-trip tests
// =============================================================================

#[test]
fn roundtrip_empty_source() {
    assert_roundtrip("", "empty");
}

#[test]
fn roundtrip_empty_bodies() {
    assert_roundtrip("struct Empty {}\nfunc noop() {}", "empty bodies");
}

#[test]
fn roundtrip_typed_throws() {
    assert_roundtrip(
        "func parse(_ text: String) throws(ParseError) -> Int {\n    return 0\n}",
        "typed throws",
    );
}

#[test]
fn roundtrip_protocol_accessors() {
    assert_roundtrip(
        "protocol Store {\n    var count: Int { get }\n    var total: Int { get set }\n    mutating func reset() async\n}",
        "protocol accessors",
    );
}

#[test]
fn roundtrip_explicit_accessors() {
    assert_roundtrip(
        "var celsius: Double {\n    get {\n        return kelvin - 273.15\n    }\n    set(newValue) {\n        kelvin = newValue + 273.15\n    }\n}",
        "explicit accessors",
    );
}

#[test]
fn roundtrip_observers() {
    assert_roundtrip(
        "var score = 0 {\n    willSet {\n        print(newValue)\n    }\n    didSet {\n        print(oldValue)\n    }\n}",
        "observers",
    );
}

#[test]
fn roundtrip_tuple_destructuring() {
    assert_roundtrip("let (width, height) = (10, 20)", "tuple destructuring");
    assert_roundtrip("var (x, _) = point", "wildcard destructuring");
}

#[test]
fn roundtrip_multiple_bindings() {
    assert_roundtrip("var a = 1, b: String = \"two\", c: Double", "multiple bindings");
}

#[test]
fn roundtrip_attributes_with_arguments() {
    assert_roundtrip(
        "@available(*, deprecated, message: \"use run\") public func start() {}",
        "attribute arguments",
    );
}

#[test]
fn roundtrip_closure_signature() {
    assert_roundtrip(
        "let parse = { (text: String) throws -> Int in\n    try convert(text)\n}",
        "closure signature",
    );
}

#[test]
fn roundtrip_nested_types() {
    assert_roundtrip(
        "struct Outer {\n    enum Kind {\n        case a, b\n    }\n    struct Inner {\n        let kind: Outer.Kind\n    }\n}",
        "nested types",
    );
}

#[test]
fn roundtrip_single_nodes() {
    for source in ["a.b(c, label: d)[0]", "x ?? y ?? z", "items.count > 0 && !done"] {
        let expr = parse_expr(source).unwrap_or_else(|e| panic!("{}", prettify_error(e, source)));
        assert_eq!(expr.to_source(), source);
    }
    for source in ["[String: [Int]]?", "(Int, String) async -> Void", "inout Array<Int>"] {
        let ty = parse_type(source).unwrap_or_else(|e| panic!("{}", prettify_error(e, source)));
        assert_eq!(ty.to_source(), source);
    }
    let stmt = parse_stmt("throw ValidationError.empty").expect("parse error");
    assert_eq!(stmt.to_source(), "throw ValidationError.empty");
    let decl = parse_decl("typealias Pair<T> = (T, T)").expect("parse error");
    assert_eq!(decl.to_source(), "typealias Pair<T> = (T, T)");
}

// =============================================================================
// Normalization tests
// =============================================================================

#[test]
fn normalize_spacing_and_semicolons() {
    assert_normalizes(
        "struct P{var x:Int;var y:Int}",
        "struct P {\n    var x: Int\n    var y: Int\n}",
    );
}

#[test]
fn normalize_comments_are_dropped() {
    assert_normalizes(
        "// header\nlet a = 1 /* inline */\n\n\nlet b = 2",
        "let a = 1\nlet b = 2",
    );
}

#[test]
fn normalize_trailing_commas_are_kept() {
    assert_normalizes("let xs = [1,2,3,]", "let xs = [1, 2, 3,]");
}

#[test]
fn normalize_reindents_blocks() {
    assert_normalizes(
        "if ready {\n\t\tgo()\n  } else { stop() }",
        "if ready {\n    go()\n} else {\n    stop()\n}",
    );
}

#[test]
fn custom_indent_and_newline() {
    let file = parse_source_file("func f() { if a { b() } }").expect("parse error");
    let mut state = CodegenState::new("\t", "\r\n");
    file.codegen(&mut state);
    assert_eq!(
        state.to_string(),
        "func f() {\r\n\tif a {\r\n\t\tb()\r\n\t}\r\n}"
    );
}
