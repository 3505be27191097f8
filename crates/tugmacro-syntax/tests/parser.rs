// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structural parser tests: the tree shape behind the rendered text.

use tugmacro_syntax::{
    parse_decl, parse_expr, parse_members, parse_stmt, parse_stmts, parse_type, Accessors,
    Codegen, Condition, Decl, ElseBranch, Expr, HasSignature, ParserError, Pattern, Stmt,
    SwitchCaseLabel, TypeNode,
};

fn expr(source: &str) -> Expr {
    parse_expr(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

fn binary_parts(e: &Expr) -> (&Expr, &str, &Expr) {
    match e {
        Expr::Binary(b) => (&b.lhs, b.operator.text(), &b.rhs),
        other => panic!("expected binary expression, got {other:?}"),
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn multiplication_binds_tighter_than_addition() {
    let e = expr("a + b * c");
    let (lhs, op, rhs) = binary_parts(&e);
    assert_eq!(op, "+");
    assert!(matches!(lhs, Expr::DeclRef(_)));
    assert_eq!(binary_parts(rhs).1, "*");
}

#[test]
fn same_precedence_is_left_associative() {
    let e = expr("a - b - c");
    let (lhs, op, _) = binary_parts(&e);
    assert_eq!(op, "-");
    assert_eq!(lhs.to_source(), "a - b");
}

#[test]
fn assignment_is_right_associative_and_lowest() {
    let e = expr("a = b = c || d");
    let (_, op, rhs) = binary_parts(&e);
    assert_eq!(op, "=");
    let (_, inner, rest) = binary_parts(rhs);
    assert_eq!(inner, "=");
    assert_eq!(binary_parts(rest).1, "||");
}

#[test]
fn comparison_binds_tighter_than_conjunction() {
    let e = expr("x < 1 && y > 2 || z");
    let (lhs, op, _) = binary_parts(&e);
    assert_eq!(op, "||");
    let (cmp, and, _) = binary_parts(lhs);
    assert_eq!(and, "&&");
    assert_eq!(binary_parts(cmp).1, "<");
}

#[test]
fn nil_coalescing_sits_between_comparison_and_casting() {
    let e = expr("a ?? b == c");
    let (lhs, op, _) = binary_parts(&e);
    assert_eq!(op, "==");
    assert_eq!(binary_parts(lhs).1, "??");

    let e = expr("value as? Int ?? 0");
    let (lhs, op, _) = binary_parts(&e);
    assert_eq!(op, "??");
    assert!(matches!(lhs, Expr::Cast(cast) if cast.mark.is_some()));
}

#[test]
fn unknown_operators_parse_at_additive_precedence() {
    let e = expr("a <> b * c");
    let (_, op, rhs) = binary_parts(&e);
    assert_eq!(op, "<>");
    assert_eq!(binary_parts(rhs).1, "*");
}

#[test]
fn ternary_nests_to_the_right() {
    let e = expr("a ? b : c ? d : e");
    match e {
        Expr::Ternary(t) => assert!(matches!(t.else_expr, Expr::Ternary(_))),
        other => panic!("expected ternary, got {other:?}"),
    }
}

#[test]
fn postfix_chain_is_left_nested() {
    let e = expr("user?.profile.names[0]!");
    match &e {
        Expr::Postfix(p) => {
            assert_eq!(p.operator.text(), "!");
            assert!(matches!(p.operand, Expr::Subscript(_)));
        }
        other => panic!("expected postfix, got {other:?}"),
    }
}

#[test]
fn prefix_try_and_await_wrap_the_operand() {
    match expr("try await fetch()") {
        Expr::Try(t) => {
            assert!(t.mark.is_none());
            assert!(matches!(t.expr, Expr::Await(_)));
        }
        other => panic!("expected try, got {other:?}"),
    }
    match expr("try! load()") {
        Expr::Try(t) => assert_eq!(t.mark.as_ref().map(|m| m.text()), Some("!")),
        other => panic!("expected try, got {other:?}"),
    }
}

#[test]
fn call_arguments_keep_labels() {
    match expr("move(from: a, to: b, animated)") {
        Expr::Call(call) => {
            let labels: Vec<Option<&str>> = call
                .arguments
                .iter()
                .map(|a| a.label.as_ref().map(|l| l.text()))
                .collect();
            assert_eq!(labels, vec![Some("from"), Some("to"), None]);
            assert!(call.trailing_closure.is_none());
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn trailing_closure_after_arguments_and_alone() {
    match expr("items.filter(limit: 3) { $0 > 1 }") {
        Expr::Call(call) => {
            assert_eq!(call.arguments.len(), 1);
            assert!(call.trailing_closure.is_some());
        }
        other => panic!("expected call, got {other:?}"),
    }
    match expr("run { work() }") {
        Expr::Call(call) => {
            assert!(call.left_paren.is_none());
            assert!(call.arguments.is_empty());
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn collection_literals() {
    assert!(matches!(expr("[]"), Expr::Array(a) if a.elements.is_empty()));
    assert!(matches!(expr("[:]"), Expr::Dictionary(d) if d.elements.is_empty()));
    assert!(matches!(expr("[1: \"a\"]"), Expr::Dictionary(d) if d.elements.len() == 1));
    assert!(parse_expr("[1: \"a\", 2]").is_err());
}

#[test]
fn parenthesized_expression_is_a_single_element_tuple() {
    let e = expr("((x))");
    assert!(matches!(e, Expr::Tuple(_)));
    assert!(matches!(e.unparenthesized(), Expr::DeclRef(_)));
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn trailing_closures_are_disabled_in_statement_heads() {
    let stmt = parse_stmt("if ready { go() }").expect("parse error");
    match stmt {
        Stmt::If(s) => {
            assert_eq!(s.conditions.len(), 1);
            assert!(matches!(s.conditions[0].condition, Condition::Expr(Expr::DeclRef(_))));
            assert_eq!(s.body.statements.len(), 1);
        }
        other => panic!("expected if, got {other:?}"),
    }
    assert!(matches!(
        parse_stmt("for x in xs { print(x) }").expect("parse error"),
        Stmt::For(f) if matches!(f.sequence, Expr::DeclRef(_))
    ));
    assert!(matches!(
        parse_stmt("switch value { default: break }").expect("parse error"),
        Stmt::Switch(s) if s.cases.len() == 1
    ));
}

#[test]
fn else_if_chains_nest() {
    let stmt = parse_stmt("if a { x() } else if b { y() } else { z() }").expect("parse error");
    let Stmt::If(s) = stmt else {
        panic!("expected if");
    };
    match &s.else_branch {
        Some(ElseBranch::If(nested)) => {
            assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
        }
        other => panic!("expected else-if, got {other:?}"),
    }
}

#[test]
fn optional_binding_conditions() {
    let stmt = parse_stmt("guard let user, var count = counts[user], count > 0 else { return }")
        .expect("parse error");
    let Stmt::Guard(g) = stmt else {
        panic!("expected guard");
    };
    assert_eq!(g.conditions.len(), 3);
    match &g.conditions[0].condition {
        Condition::OptionalBinding(b) => {
            assert_eq!(b.specifier.text(), "let");
            assert!(b.initializer.is_none());
        }
        other => panic!("expected binding, got {other:?}"),
    }
    assert!(matches!(&g.conditions[1].condition, Condition::OptionalBinding(b) if b.specifier.is("var")));
    assert!(matches!(&g.conditions[2].condition, Condition::Expr(_)));
}

#[test]
fn switch_cases_keep_order_and_guards() {
    let stmt = parse_stmt(
        "switch shape {\ncase .circle(let r) where r > 1:\n    big()\ncase .square, .rect:\n    angular()\n    fallthrough\ndefault:\n    break\n}",
    )
    .expect("parse error");
    let Stmt::Switch(s) = stmt else {
        panic!("expected switch");
    };
    assert_eq!(s.cases.len(), 3);
    match &s.cases[0].label {
        SwitchCaseLabel::Case { items, .. } => {
            assert_eq!(items.len(), 1);
            assert!(items[0].where_clause.is_some());
        }
        other => panic!("expected case label, got {other:?}"),
    }
    match &s.cases[1].label {
        SwitchCaseLabel::Case { items, .. } => assert_eq!(items.len(), 2),
        other => panic!("expected case label, got {other:?}"),
    }
    assert_eq!(s.cases[1].statements.len(), 2);
    assert!(matches!(s.cases[2].label, SwitchCaseLabel::Default { .. }));
}

#[test]
fn catch_clauses_in_order_with_unguarded_last() {
    let stmt = parse_stmt(
        "do {\n    try run()\n} catch NetworkError.timeout {\n    retry()\n} catch let error as IOError {\n    log(error)\n} catch {\n    fail()\n}",
    )
    .expect("parse error");
    let Stmt::Do(d) = stmt else {
        panic!("expected do");
    };
    assert_eq!(d.catches.len(), 3);
    assert!(matches!(d.catches[0].items[0].pattern, Pattern::Expression(_)));
    assert!(matches!(d.catches[1].items[0].pattern, Pattern::ValueBinding(_)));
    assert!(d.catches[2].items.is_empty());
}

#[test]
fn bare_catch_takes_the_brace_as_its_body() {
    let source = "do {\n    try run()\n} catch {\n    report(error)\n}";
    let stmt = parse_stmt(source).expect("parse error");
    let Stmt::Do(d) = &stmt else {
        panic!("expected do");
    };
    assert_eq!(d.catches.len(), 1);
    assert!(d.catches[0].items.is_empty());
    assert_eq!(d.catches[0].body.statements.len(), 1);
    assert_eq!(stmt.to_source(), source);

    let empty = parse_stmt("do {\n    try run()\n} catch {}").expect("parse error");
    let Stmt::Do(d) = empty else {
        panic!("expected do");
    };
    assert!(d.catches[0].body.statements.is_empty());
}

#[test]
fn return_value_must_be_on_the_same_line() {
    let stmts = parse_stmts("return\nvalue").expect("parse error");
    assert_eq!(stmts.len(), 2);
    assert!(matches!(&stmts[0], Stmt::Return(r) if r.expr.is_none()));
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn accessor_forms() {
    let members = parse_members(
        "var a: Int { 1 }\nvar b: Int { get { 1 } set { } }\nvar c: Int { get }\nvar d = 0 { didSet { } }",
    )
    .expect("parse error");
    let accessors: Vec<&Accessors> = members
        .iter()
        .map(|m| match m {
            Decl::Variable(v) => &v.bindings[0]
                .accessor_block
                .as_ref()
                .expect("accessor block")
                .accessors,
            other => panic!("expected variable, got {other:?}"),
        })
        .collect();
    assert!(matches!(accessors[0], Accessors::Getter(stmts) if stmts.len() == 1));
    assert!(matches!(accessors[1], Accessors::Explicit(decls) if decls.len() == 2));
    assert!(matches!(accessors[2], Accessors::Explicit(decls) if decls[0].body.is_none()));
    assert!(matches!(accessors[3], Accessors::Explicit(decls) if decls[0].keyword.is("didSet")));
}

#[test]
fn function_signature_parts() {
    let decl = parse_decl(
        "public static func load<T: Decodable>(from url: URL, _ retries: Int = 3, values: T...) async throws -> [T] where T: Sendable {}",
    )
    .expect("parse error");
    let Decl::Function(f) = decl else {
        panic!("expected function");
    };
    assert_eq!(f.modifiers.len(), 2);
    let params = &f.signature().parameter_clause.parameters;
    assert_eq!(params.len(), 3);
    assert_eq!(params[0].first_name.text(), "from");
    assert_eq!(params[0].second_name.as_ref().map(|t| t.text()), Some("url"));
    assert!(params[1].default_value.is_some());
    assert!(params[2].ellipsis.is_some());
    assert!(f.signature.effects.async_specifier.is_some());
    assert!(f.signature.effects.throws_clause.is_some());
    assert!(f.where_clause.is_some());
    assert!(f.body.as_ref().is_some_and(|b| b.statements.is_empty()));
}

#[test]
fn enum_cases_with_associated_values() {
    let decl = parse_decl("enum E {\n    case a(Int, label: String = \"\"), b = 2\n}").expect("parse error");
    let Decl::Enum(e) = decl else {
        panic!("expected enum");
    };
    let Decl::EnumCase(case) = &e.members.members[0] else {
        panic!("expected case");
    };
    assert_eq!(case.elements.len(), 2);
    let params = &case.elements[0]
        .parameter_clause
        .as_ref()
        .expect("parameters")
        .parameters;
    assert!(params[0].first_name.is_none());
    assert_eq!(params[1].first_name.as_ref().map(|t| t.text()), Some("label"));
    assert!(params[1].default_value.is_some());
    assert!(case.elements[1].raw_value.is_some());
}

#[test]
fn declaration_kinds() {
    let kinds: Vec<&str> = [
        "struct S {}",
        "class C {}",
        "enum E {}",
        "actor A {}",
        "protocol P {}",
        "extension S {}",
        "let x = 1",
        "func f() {}",
        "init() {}",
        "deinit {}",
        "typealias T = Int",
        "associatedtype Item",
        "case a",
    ]
    .iter()
    .map(|s| parse_decl(s).expect("parse error").kind().as_str())
    .collect();
    assert_eq!(
        kinds,
        vec![
            "struct_decl",
            "class_decl",
            "enum_decl",
            "actor_decl",
            "protocol_decl",
            "extension_decl",
            "variable_decl",
            "function_decl",
            "initializer_decl",
            "deinitializer_decl",
            "type_alias_decl",
            "associated_type_decl",
            "enum_case_decl",
        ]
    );
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn type_sugar_and_wrappers() {
    assert!(matches!(parse_type("Int?").expect("parse error"), TypeNode::Optional(_)));
    assert!(matches!(parse_type("Int!").expect("parse error"), TypeNode::ImplicitlyUnwrapped(_)));
    assert!(matches!(parse_type("[Int]").expect("parse error"), TypeNode::Array(_)));
    assert!(matches!(parse_type("[K: V]").expect("parse error"), TypeNode::Dictionary(_)));
    assert!(matches!(parse_type("A.B.C").expect("parse error"), TypeNode::Member(_)));
    assert!(matches!(parse_type("A & B").expect("parse error"), TypeNode::Composition(c) if c.elements.len() == 2));
    assert!(matches!(parse_type("some View").expect("parse error"), TypeNode::SomeOrAny(_)));
    assert!(matches!(parse_type("@escaping () -> Void").expect("parse error"), TypeNode::Attributed(_)));
    assert!(matches!(parse_type("((Int) -> Int)?").expect("parse error"), TypeNode::Optional(_)));
}

#[test]
fn nested_generic_arguments_close_separately() {
    let ty = parse_type("Dictionary<String, Array<Int>>").expect("parse error");
    match ty {
        TypeNode::Identifier(t) => {
            let args = t.generic_arguments.expect("generic arguments");
            assert_eq!(args.arguments.len(), 2);
        }
        other => panic!("expected identifier type, got {other:?}"),
    }
}

#[test]
fn incomplete_input_is_a_parser_error() {
    for source in ["struct {", "func f(", "let = 1"] {
        assert!(
            matches!(parse_decl(source), Err(ParserError::ParserError(..))),
            "{source} should not parse"
        );
    }
    assert!(matches!(parse_stmt("if x {"), Err(ParserError::ParserError(..))));
}
