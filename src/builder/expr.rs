// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression builders.

use tugmacro_syntax::{Expr, Stmt};

use crate::builder::descriptor::{Arg, Literal};
use crate::builder::{comma_list, render_block, Template};
use crate::error::MacroResult;
use crate::interpolation::Interpolate;

/// `callee(arguments)`
pub fn call(callee: impl Interpolate, arguments: impl IntoIterator<Item = Arg>) -> MacroResult<Expr> {
    let arguments = comma_list(arguments, |arg| arg.render());
    Template::default().expr(&format!("{}({})", callee.interpolation(), arguments))
}

/// `base.name`
pub fn member(base: impl Interpolate, name: &str) -> MacroResult<Expr> {
    Template::default().expr(&format!("{}.{}", base.interpolation(), name))
}

pub fn literal(value: impl Into<Literal>) -> MacroResult<Expr> {
    Template::default().expr(&value.into().render())
}

/// `[a, b]`
pub fn array<T: Interpolate>(elements: impl IntoIterator<Item = T>) -> MacroResult<Expr> {
    let elements = comma_list(elements, |e| e.interpolation());
    Template::default().expr(&format!("[{elements}]"))
}

/// `[key: value]`, or `[:]` when empty.
pub fn dictionary<K: Interpolate, V: Interpolate>(
    entries: impl IntoIterator<Item = (K, V)>,
) -> MacroResult<Expr> {
    let entries = comma_list(entries, |(k, v)| {
        format!("{}: {}", k.interpolation(), v.interpolation())
    });
    if entries.is_empty() {
        Template::default().expr("[:]")
    } else {
        Template::default().expr(&format!("[{entries}]"))
    }
}

/// `{ a, b in body }`, or `{ body }` without parameters.
pub fn closure(parameters: &[&str], body: impl IntoIterator<Item = Stmt>) -> MacroResult<Expr> {
    let body: Vec<Stmt> = body.into_iter().collect();
    let block = render_block(&body);
    let text = if parameters.is_empty() {
        block
    } else {
        let inner = block
            .strip_prefix('{')
            .and_then(|b| b.strip_suffix('}'))
            .unwrap_or_default();
        format!("{{ {} in{}}}", parameters.join(", "), inner)
    };
    Template::default().expr(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::template;
    use crate::reader::ExprReader;
    use tugmacro_syntax::Codegen;

    #[test]
    fn calls_and_members() {
        let expr = call("Point", [Arg::labeled("x", 1), Arg::labeled("y", 2)]).unwrap();
        assert_eq!(expr.to_source(), "Point(x: 1, y: 2)");
        assert!(ExprReader::from_node(&expr).is_constructor_call());
        assert_eq!(call("reset", []).unwrap().to_source(), "reset()");
        assert_eq!(member("self", "count").unwrap().to_source(), "self.count");
    }

    #[test]
    fn literals_and_collections() {
        assert_eq!(literal("a\"b").unwrap().to_source(), "\"a\\\"b\"");
        assert_eq!(literal(42).unwrap().to_source(), "42");
        assert_eq!(array([1, 2, 3]).unwrap().to_source(), "[1, 2, 3]");
        assert_eq!(array(Vec::<i32>::new()).unwrap().to_source(), "[]");
        assert_eq!(
            dictionary([("\"a\"", 1), ("\"b\"", 2)]).unwrap().to_source(),
            "[\"a\": 1, \"b\": 2]"
        );
        assert_eq!(dictionary(Vec::<(&str, i32)>::new()).unwrap().to_source(), "[:]");
    }

    #[test]
    fn closures() {
        let body = [template::stmt("a + b").unwrap()];
        assert_eq!(
            closure(&["a", "b"], body).unwrap().to_source(),
            "{ a, b in\n    a + b\n}"
        );
        let body = [template::stmt("tick()").unwrap()];
        assert_eq!(closure(&[], body).unwrap().to_source(), "{\n    tick()\n}");
    }
}
