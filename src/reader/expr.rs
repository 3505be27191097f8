// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression reader and literal decoding.
//!
//! Macros mostly read expressions that appear as attribute arguments, default
//! values and initializers, so the reader focuses on literals: their decoded
//! values rather than their spelling.

use tugmacro_syntax::{Codegen, Expr};

node_reader!(
    /// A view over an expression.
    ExprReader => Expr
);

impl<'a> ExprReader<'a> {
    /// The same expression with redundant parentheses removed.
    pub fn unparenthesized(&self) -> ExprReader<'a> {
        ExprReader::from_node(self.node.unparenthesized())
    }

    /// The decoded value of a string literal without interpolation.
    pub fn string_value(&self) -> Option<String> {
        match self.node.unparenthesized() {
            Expr::StringLiteral(lit) => decode_string(lit.token.text()),
            _ => None,
        }
    }

    /// The value of an integer literal, with an optional leading `-`.
    ///
    /// Decimal, `0x`, `0o` and `0b` forms are accepted, as are `_`
    /// separators. Values outside `i64` yield `None`.
    pub fn integer_value(&self) -> Option<i64> {
        let (negative, expr) = split_sign(self.node.unparenthesized());
        let Expr::IntegerLiteral(lit) = expr else {
            return None;
        };
        let magnitude = parse_integer(lit.token.text())?;
        if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        }
    }

    /// The value of a decimal float literal, with an optional leading `-`.
    /// Integer literals are accepted too.
    pub fn float_value(&self) -> Option<f64> {
        let (negative, expr) = split_sign(self.node.unparenthesized());
        let magnitude = match expr {
            Expr::FloatLiteral(lit) => parse_float(lit.token.text())?,
            Expr::IntegerLiteral(lit) => parse_integer(lit.token.text())? as f64,
            _ => return None,
        };
        Some(if negative { -magnitude } else { magnitude })
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self.node.unparenthesized() {
            Expr::BooleanLiteral(lit) => Some(lit.token.is("true")),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.node.unparenthesized(), Expr::NilLiteral(_))
    }

    /// Elements of an array literal.
    pub fn array_elements(&self) -> Option<Vec<ExprReader<'a>>> {
        match self.node.unparenthesized() {
            Expr::Array(array) => Some(
                array
                    .elements
                    .iter()
                    .map(|e| ExprReader::from_node(&e.expr))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Key-value pairs of a dictionary literal, in source order.
    pub fn dictionary_entries(&self) -> Option<Vec<(ExprReader<'a>, ExprReader<'a>)>> {
        match self.node.unparenthesized() {
            Expr::Dictionary(dict) => Some(
                dict.elements
                    .iter()
                    .map(|e| (ExprReader::from_node(&e.key), ExprReader::from_node(&e.value)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The member name of an implicit member expression such as `.large`,
    /// or of a call to one such as `.custom(3)`.
    pub fn implicit_member_name(&self) -> Option<&'a str> {
        let expr = match self.node.unparenthesized() {
            Expr::Call(call) => &call.callee,
            other => other,
        };
        match expr {
            Expr::MemberAccess(member) if member.base.is_none() => Some(member.name.text()),
            _ => None,
        }
    }

    /// The rendered callee of a call: `Foo`, `Foo.make` or `.custom`.
    pub fn callee_name(&self) -> Option<String> {
        match self.node.unparenthesized() {
            Expr::Call(call) => Some(call.callee.to_source()),
            _ => None,
        }
    }

    /// Arguments of a call as `(label, value)` pairs.
    pub fn call_arguments(&self) -> Option<Vec<(Option<&'a str>, ExprReader<'a>)>> {
        match self.node.unparenthesized() {
            Expr::Call(call) => Some(
                call.arguments
                    .iter()
                    .map(|a| (a.label.as_ref().map(|l| l.text()), ExprReader::from_node(&a.expr)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Whether this is a call whose callee names a type: `Foo()`,
    /// `Foo<Int>()` or `Outer.Inner()`.
    pub fn is_constructor_call(&self) -> bool {
        self.constructed_type().is_some()
    }

    /// The type named by a constructor-shaped call.
    pub fn constructed_type(&self) -> Option<String> {
        let Expr::Call(call) = self.node.unparenthesized() else {
            return None;
        };
        names_type(&call.callee).then(|| call.callee.to_source())
    }
}

fn names_type(callee: &Expr) -> bool {
    match callee {
        Expr::DeclRef(decl_ref) => starts_uppercase(decl_ref.name.text()),
        Expr::MemberAccess(member) => {
            starts_uppercase(member.name.text())
                && member.base.as_ref().is_some_and(|base| names_type(base))
        }
        _ => false,
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.trim_start_matches('`')
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

fn split_sign(expr: &Expr) -> (bool, &Expr) {
    match expr {
        Expr::Prefix(prefix) if prefix.operator.is("-") => (true, prefix.operand.unparenthesized()),
        _ => (false, expr),
    }
}

fn parse_integer(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let (radix, body) = if let Some(rest) = digits.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = digits.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = digits.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, digits.as_str())
    };
    u64::from_str_radix(body, radix).ok()
}

fn parse_float(text: &str) -> Option<f64> {
    if text.starts_with("0x") {
        return None;
    }
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    digits.parse().ok()
}

/// Decode a string literal token. Interpolated literals yield `None`.
fn decode_string(token: &str) -> Option<String> {
    let hashes = token.chars().take_while(|c| *c == '#').count();
    let body = &token[hashes..token.len().checked_sub(hashes)?];
    let escape = format!("\\{}", "#".repeat(hashes));
    if body.contains(&format!("{escape}(")) {
        return None;
    }
    if let Some(inner) = body
        .strip_prefix("\"\"\"")
        .and_then(|b| b.strip_suffix("\"\"\""))
    {
        let content = dedent_multiline(inner)?;
        return unescape(&content, &escape);
    }
    let inner = body.strip_prefix('"')?.strip_suffix('"')?;
    unescape(inner, &escape)
}

/// Strip the line break after the opening delimiter and the indentation of
/// the closing delimiter from every line.
fn dedent_multiline(inner: &str) -> Option<String> {
    let inner = inner.strip_prefix('\n')?;
    let (content, indent) = match inner.rfind('\n') {
        Some(pos) => (&inner[..pos], &inner[pos + 1..]),
        None => ("", inner),
    };
    if !indent.chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_prefix(indent).unwrap_or(line.trim_start()))
        .collect();
    Some(lines.join("\n"))
}

fn unescape(text: &str, escape: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(escape) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + escape.len()..];
        let mut chars = rest.chars();
        let c = chars.next()?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'u' => {
                let after = chars.as_str().strip_prefix('{')?;
                let end = after.find('}')?;
                let code = u32::from_str_radix(&after[..end], 16).ok()?;
                out.push(char::from_u32(code)?);
                rest = &after[end + 1..];
                continue;
            }
            // A backslash before a line break joins the lines.
            '\n' => {}
            _ => return None,
        }
        rest = chars.as_str();
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::parse_expr;

    fn read<T>(source: &str, f: impl FnOnce(ExprReader<'_>) -> T) -> T {
        let expr = parse_expr(source).unwrap();
        f(ExprReader::from_node(&expr))
    }

    #[test]
    fn strings() {
        assert_eq!(read(r#""plain""#, |e| e.string_value()), Some("plain".into()));
        assert_eq!(
            read(r#""tab\tquote\" \u{1F600}""#, |e| e.string_value()),
            Some("tab\tquote\" \u{1F600}".into())
        );
        assert_eq!(read(r#""hi \(name)""#, |e| e.string_value()), None);
        assert_eq!(read(r##"#"raw \n"#"##, |e| e.string_value()), Some("raw \\n".into()));
        assert_eq!(read(r##"#"raw \#n"#"##, |e| e.string_value()), Some("raw \n".into()));
        assert_eq!(
            read("\"\"\"\n    one\n      two\n    \"\"\"", |e| e.string_value()),
            Some("one\n  two".into())
        );
        assert_eq!(read("42", |e| e.string_value()), None);
    }

    #[test]
    fn integers() {
        assert_eq!(read("42", |e| e.integer_value()), Some(42));
        assert_eq!(read("1_000_000", |e| e.integer_value()), Some(1_000_000));
        assert_eq!(read("0xFF", |e| e.integer_value()), Some(255));
        assert_eq!(read("0o17", |e| e.integer_value()), Some(15));
        assert_eq!(read("0b1010", |e| e.integer_value()), Some(10));
        assert_eq!(read("-7", |e| e.integer_value()), Some(-7));
        assert_eq!(read("(-7)", |e| e.integer_value()), Some(-7));
        assert_eq!(
            read("-9223372036854775808", |e| e.integer_value()),
            Some(i64::MIN)
        );
        assert_eq!(read("9223372036854775808", |e| e.integer_value()), None);
        assert_eq!(read("x", |e| e.integer_value()), None);
    }

    #[test]
    fn floats_bools_nil() {
        assert_eq!(read("2.5", |e| e.float_value()), Some(2.5));
        assert_eq!(read("-1e3", |e| e.float_value()), Some(-1000.0));
        assert_eq!(read("3", |e| e.float_value()), Some(3.0));
        assert_eq!(read("true", |e| e.bool_value()), Some(true));
        assert_eq!(read("false", |e| e.bool_value()), Some(false));
        assert!(read("nil", |e| e.is_nil()));
        assert!(!read("0", |e| e.is_nil()));
    }

    #[test]
    fn collections() {
        let values = read("[1, 2, 3]", |e| {
            e.array_elements()
                .unwrap()
                .iter()
                .filter_map(|x| x.integer_value())
                .collect::<Vec<_>>()
        });
        assert_eq!(values, [1, 2, 3]);
        let entries = read(r#"["a": 1, "b": 2]"#, |e| {
            e.dictionary_entries()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.string_value().unwrap(), v.integer_value().unwrap()))
                .collect::<Vec<_>>()
        });
        assert_eq!(entries, [("a".to_string(), 1), ("b".to_string(), 2)]);
        assert!(read("[:]", |e| e.dictionary_entries().unwrap().is_empty()));
        assert!(read("[1]", |e| e.dictionary_entries().is_none()));
    }

    #[test]
    fn members_and_calls() {
        let member = |source: &str| read(source, |e| e.implicit_member_name().map(str::to_string));
        assert_eq!(member(".large"), Some("large".into()));
        assert_eq!(member(".custom(3)"), Some("custom".into()));
        assert_eq!(member("Size.large"), None);
        assert_eq!(read("Foo.make(1)", |e| e.callee_name()), Some("Foo.make".into()));
        let labels = read("f(1, label: x)", |e| {
            e.call_arguments()
                .unwrap()
                .iter()
                .map(|(l, _)| l.map(str::to_string))
                .collect::<Vec<_>>()
        });
        assert_eq!(labels, [None, Some("label".to_string())]);
    }

    #[test]
    fn constructor_calls() {
        assert_eq!(read("Point()", |e| e.constructed_type()), Some("Point".into()));
        assert_eq!(read("Box<Int>(1)", |e| e.constructed_type()), Some("Box<Int>".into()));
        assert_eq!(
            read("Outer.Inner(x: 1)", |e| e.constructed_type()),
            Some("Outer.Inner".into())
        );
        assert_eq!(read("make()", |e| e.constructed_type()), None);
        assert_eq!(read("Foo.make()", |e| e.constructed_type()), None);
        assert!(!read("Point", |e| e.is_constructor_call()));
    }
}
