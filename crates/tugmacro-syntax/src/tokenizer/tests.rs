// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{tokenize, TokError, TokKind};

fn kinds_and_text(source: &str) -> Vec<(TokKind, String)> {
    tokenize(source)
        .expect("tokenize")
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn texts(source: &str) -> Vec<String> {
    tokenize(source)
        .expect("tokenize")
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_identifiers_and_punct() {
    assert_eq!(
        texts("struct Point { var x: Int }"),
        vec!["struct", "Point", "{", "var", "x", ":", "Int", "}"]
    );
}

#[test]
fn test_backticked_and_dollar_identifiers() {
    let toks = kinds_and_text("`default` $0");
    assert_eq!(toks[0], (TokKind::Identifier, "`default`".to_string()));
    assert_eq!(toks[1], (TokKind::Identifier, "$0".to_string()));
}

#[test]
fn test_numbers() {
    let toks = kinds_and_text("42 3.14 1e10 0xFF 1_000");
    assert_eq!(
        toks.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![
            TokKind::Integer,
            TokKind::Float,
            TokKind::Float,
            TokKind::Integer,
            TokKind::Integer
        ]
    );
}

#[test]
fn test_tuple_index_is_not_float() {
    assert_eq!(texts("pair.0.1"), vec!["pair", ".", "0", ".", "1"]);
}

#[test]
fn test_strings_with_interpolation() {
    let toks = kinds_and_text(r#"let s = "a \(f("x")) b""#);
    assert_eq!(toks[3].0, TokKind::String);
    assert_eq!(toks[3].1, r#""a \(f("x")) b""#);
    assert_eq!(toks.len(), 4);
}

#[test]
fn test_multiline_and_raw_strings() {
    let toks = kinds_and_text("\"\"\"\nline \"quoted\"\n\"\"\" #\"raw \\n\"#");
    assert_eq!(toks.len(), 2);
    assert!(toks.iter().all(|(k, _)| *k == TokKind::String));
    assert_eq!(toks[1].1, "#\"raw \\n\"#");
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        texts("a // line\n/* block /* nested */ */ b"),
        vec!["a", "b"]
    );
    let toks = tokenize("a // c\nb").expect("tokenize");
    assert!(toks[1].newline_before);
}

#[test]
fn test_generic_angles_split_closing_run() {
    let toks = kinds_and_text("Dictionary<String, Array<Int>>");
    let angle_kinds: Vec<_> = toks
        .iter()
        .filter(|(k, _)| matches!(k, TokKind::LAngle | TokKind::RAngle))
        .map(|(k, _)| *k)
        .collect();
    assert_eq!(
        angle_kinds,
        vec![
            TokKind::LAngle,
            TokKind::LAngle,
            TokKind::RAngle,
            TokKind::RAngle
        ]
    );
}

#[test]
fn test_optional_generic_type() {
    let toks = kinds_and_text("Array<Int>?");
    assert_eq!(toks[3].0, TokKind::RAngle);
    assert_eq!(toks[4], (TokKind::PostfixOperator, "?".to_string()));
}

#[test]
fn test_comparison_is_not_generic() {
    let toks = kinds_and_text("if a < b { }");
    assert_eq!(toks[2], (TokKind::BinaryOperator, "<".to_string()));
    let toks = kinds_and_text("x<<2");
    assert_eq!(toks[1], (TokKind::BinaryOperator, "<<".to_string()));
}

#[test]
fn test_operator_fixity() {
    let toks = kinds_and_text("a + -b");
    assert_eq!(toks[1].0, TokKind::BinaryOperator);
    assert_eq!(toks[2], (TokKind::PrefixOperator, "-".to_string()));

    let toks = kinds_and_text("f(!flag)");
    assert_eq!(toks[2], (TokKind::PrefixOperator, "!".to_string()));

    let toks = kinds_and_text("0..<n");
    assert_eq!(toks[1], (TokKind::BinaryOperator, "..<".to_string()));

    let toks = kinds_and_text("a != b");
    assert_eq!(toks[1], (TokKind::BinaryOperator, "!=".to_string()));
}

#[test]
fn test_postfix_question_is_split() {
    assert_eq!(texts("value?.count"), vec!["value", "?", ".", "count"]);
    let toks = kinds_and_text("try? f()");
    assert_eq!(toks[1], (TokKind::PostfixOperator, "?".to_string()));
    let toks = kinds_and_text("var x: Int?=nil");
    assert_eq!(toks[4], (TokKind::PostfixOperator, "?".to_string()));
    assert_eq!(toks[5], (TokKind::BinaryOperator, "=".to_string()));
}

#[test]
fn test_arrow_is_punct() {
    let toks = kinds_and_text("() -> Int");
    assert_eq!(toks[2], (TokKind::Punct, "->".to_string()));
}

#[test]
fn test_spans_are_byte_offsets() {
    let toks = tokenize("let é = 1").expect("tokenize");
    assert_eq!(toks[1].span.start, 4);
    assert_eq!(toks[1].span.end, 6);
}

#[test]
fn test_errors() {
    assert!(matches!(
        tokenize("\"open"),
        Err(TokError::UnterminatedString { offset: 0 })
    ));
    assert!(matches!(
        tokenize("a /* never closed"),
        Err(TokError::UnterminatedComment { offset: 2 })
    ));
    let err = tokenize("let ☃ = 1").unwrap_err();
    assert_eq!(err.offset(), 4);
}
