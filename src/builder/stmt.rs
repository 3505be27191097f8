// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement builders.
//!
//! Conditions, patterns and expressions are anything [`Interpolate`]: a
//! built [`Expr`](tugmacro_syntax::Expr), a reader, or plain text. Bodies
//! are already-built statements.

use tugmacro_syntax::{Codegen, Stmt};

use crate::builder::{render_block, Template};
use crate::error::MacroResult;
use crate::interpolation::Interpolate;

// ============================================================================
// Conditionals
// ============================================================================

/// `if` with any number of `else if` branches and an optional `else`.
#[derive(Debug, Clone)]
#[must_use]
pub struct IfBuilder {
    branches: Vec<(String, Vec<Stmt>)>,
    otherwise: Option<Vec<Stmt>>,
    template: Template,
}

pub fn if_stmt(condition: impl Interpolate, body: impl IntoIterator<Item = Stmt>) -> IfBuilder {
    IfBuilder {
        branches: vec![(condition.interpolation(), body.into_iter().collect())],
        otherwise: None,
        template: Template::default(),
    }
}

impl IfBuilder {
    template_setter!();

    pub fn else_if(
        mut self,
        condition: impl Interpolate,
        body: impl IntoIterator<Item = Stmt>,
    ) -> Self {
        self.branches
            .push((condition.interpolation(), body.into_iter().collect()));
        self
    }

    /// The `else` body. An empty body means no `else` at all.
    pub fn otherwise(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.otherwise = (!body.is_empty()).then_some(body);
        self
    }

    pub fn render(&self) -> String {
        let branches: Vec<String> = self
            .branches
            .iter()
            .map(|(condition, body)| format!("if {} {}", condition, render_block(body)))
            .collect();
        let mut text = branches.join(" else ");
        if let Some(body) = &self.otherwise {
            text.push_str(" else ");
            text.push_str(&render_block(body));
        }
        text
    }

    pub fn build(self) -> MacroResult<Stmt> {
        self.template.stmt(&self.render())
    }
}

/// `guard condition else { else_body }`
pub fn guard_stmt(
    condition: impl Interpolate,
    else_body: impl IntoIterator<Item = Stmt>,
) -> MacroResult<Stmt> {
    Template::default().guard_stmt(condition, else_body)
}

// ============================================================================
// Loops
// ============================================================================

/// `for pattern in sequence { body }`
pub fn for_in(
    pattern: impl Interpolate,
    sequence: impl Interpolate,
    body: impl IntoIterator<Item = Stmt>,
) -> MacroResult<Stmt> {
    Template::default().for_in(pattern, sequence, body)
}

/// `for pattern in sequence where filter { body }`
pub fn for_in_where(
    pattern: impl Interpolate,
    sequence: impl Interpolate,
    filter: impl Interpolate,
    body: impl IntoIterator<Item = Stmt>,
) -> MacroResult<Stmt> {
    Template::default().for_in_where(pattern, sequence, filter, body)
}

pub fn while_loop(
    condition: impl Interpolate,
    body: impl IntoIterator<Item = Stmt>,
) -> MacroResult<Stmt> {
    Template::default().while_loop(condition, body)
}

// ============================================================================
// Switch
// ============================================================================

/// `switch` with cases kept in the order they were added.
///
/// A case body may not be empty, so an empty body renders as `break`.
/// Nothing else is inserted: no `default` and no `fallthrough`.
#[derive(Debug, Clone)]
#[must_use]
pub struct SwitchBuilder {
    subject: String,
    cases: Vec<(Option<String>, Vec<Stmt>)>,
    template: Template,
}

pub fn switch_stmt(subject: impl Interpolate) -> SwitchBuilder {
    SwitchBuilder {
        subject: subject.interpolation(),
        cases: Vec::new(),
        template: Template::default(),
    }
}

impl SwitchBuilder {
    template_setter!();

    /// `case pattern:`; several patterns are written comma-separated.
    pub fn case(mut self, pattern: impl Interpolate, body: impl IntoIterator<Item = Stmt>) -> Self {
        self.cases
            .push((Some(pattern.interpolation()), body.into_iter().collect()));
        self
    }

    pub fn default(mut self, body: impl IntoIterator<Item = Stmt>) -> Self {
        self.cases.push((None, body.into_iter().collect()));
        self
    }

    pub fn render(&self) -> String {
        let mut text = format!("switch {} {{", self.subject);
        for (pattern, body) in &self.cases {
            match pattern {
                Some(pattern) => {
                    text.push_str("\ncase ");
                    text.push_str(pattern);
                    text.push(':');
                }
                None => text.push_str("\ndefault:"),
            }
            if body.is_empty() {
                text.push_str("\nbreak");
            }
            for stmt in body {
                text.push('\n');
                text.push_str(&stmt.to_source());
            }
        }
        text.push_str("\n}");
        text
    }

    pub fn build(self) -> MacroResult<Stmt> {
        self.template.stmt(&self.render())
    }
}

// ============================================================================
// Do / catch
// ============================================================================

/// One `catch` clause, with or without a pattern.
#[derive(Debug, Clone)]
pub struct Catch {
    pattern: Option<String>,
    body: Vec<Stmt>,
}

impl Catch {
    /// `catch { body }`, binding the implicit `error`.
    pub fn any(body: impl IntoIterator<Item = Stmt>) -> Self {
        Catch {
            pattern: None,
            body: body.into_iter().collect(),
        }
    }

    /// `catch pattern { body }`
    pub fn matching(pattern: impl Interpolate, body: impl IntoIterator<Item = Stmt>) -> Self {
        Catch {
            pattern: Some(pattern.interpolation()),
            body: body.into_iter().collect(),
        }
    }

    fn render(&self) -> String {
        match &self.pattern {
            Some(pattern) => format!("catch {} {}", pattern, render_block(&self.body)),
            None => format!("catch {}", render_block(&self.body)),
        }
    }
}

/// `do` with catch clauses in the order added. An unguarded catch may
/// follow guarded ones.
#[derive(Debug, Clone)]
#[must_use]
pub struct DoCatchBuilder {
    body: Vec<Stmt>,
    catches: Vec<Catch>,
    template: Template,
}

pub fn do_catch(body: impl IntoIterator<Item = Stmt>) -> DoCatchBuilder {
    DoCatchBuilder {
        body: body.into_iter().collect(),
        catches: Vec::new(),
        template: Template::default(),
    }
}

impl DoCatchBuilder {
    template_setter!();

    pub fn catch(mut self, clause: Catch) -> Self {
        self.catches.push(clause);
        self
    }

    pub fn render(&self) -> String {
        let mut text = format!("do {}", render_block(&self.body));
        for clause in &self.catches {
            text.push(' ');
            text.push_str(&clause.render());
        }
        text
    }

    pub fn build(self) -> MacroResult<Stmt> {
        self.template.stmt(&self.render())
    }
}

// ============================================================================
// Simple statements
// ============================================================================

pub fn return_value(value: impl Interpolate) -> MacroResult<Stmt> {
    Template::default().return_value(value)
}

pub fn return_void() -> MacroResult<Stmt> {
    Template::default().return_void()
}

pub fn throw_stmt(error: impl Interpolate) -> MacroResult<Stmt> {
    Template::default().throw_stmt(error)
}

pub fn defer_stmt(body: impl IntoIterator<Item = Stmt>) -> MacroResult<Stmt> {
    Template::default().defer_stmt(body)
}

/// `target = value`
pub fn assign(target: impl Interpolate, value: impl Interpolate) -> MacroResult<Stmt> {
    Template::default().assign(target, value)
}

/// An expression in statement position.
pub fn expr_stmt(expr: impl Interpolate) -> MacroResult<Stmt> {
    Template::default().expr_stmt(expr)
}

// ============================================================================
// Option-bound forms
// ============================================================================

/// Statement builders parsing with this template's options, as in
/// `context.template().guard_stmt(..)`.
impl Template {
    pub fn if_stmt(
        &self,
        condition: impl Interpolate,
        body: impl IntoIterator<Item = Stmt>,
    ) -> IfBuilder {
        IfBuilder {
            template: *self,
            ..if_stmt(condition, body)
        }
    }

    pub fn switch_stmt(&self, subject: impl Interpolate) -> SwitchBuilder {
        SwitchBuilder {
            template: *self,
            ..switch_stmt(subject)
        }
    }

    pub fn do_catch(&self, body: impl IntoIterator<Item = Stmt>) -> DoCatchBuilder {
        DoCatchBuilder {
            template: *self,
            ..do_catch(body)
        }
    }

    pub fn guard_stmt(
        &self,
        condition: impl Interpolate,
        else_body: impl IntoIterator<Item = Stmt>,
    ) -> MacroResult<Stmt> {
        let body: Vec<Stmt> = else_body.into_iter().collect();
        self.stmt(&format!(
            "guard {} else {}",
            condition.interpolation(),
            render_block(&body)
        ))
    }

    pub fn for_in(
        &self,
        pattern: impl Interpolate,
        sequence: impl Interpolate,
        body: impl IntoIterator<Item = Stmt>,
    ) -> MacroResult<Stmt> {
        self.render_for(pattern.interpolation(), sequence.interpolation(), None, body)
    }

    pub fn for_in_where(
        &self,
        pattern: impl Interpolate,
        sequence: impl Interpolate,
        filter: impl Interpolate,
        body: impl IntoIterator<Item = Stmt>,
    ) -> MacroResult<Stmt> {
        self.render_for(
            pattern.interpolation(),
            sequence.interpolation(),
            Some(filter.interpolation()),
            body,
        )
    }

    fn render_for(
        &self,
        pattern: String,
        sequence: String,
        filter: Option<String>,
        body: impl IntoIterator<Item = Stmt>,
    ) -> MacroResult<Stmt> {
        let body: Vec<Stmt> = body.into_iter().collect();
        let filter = filter.map(|f| format!(" where {f}")).unwrap_or_default();
        self.stmt(&format!(
            "for {pattern} in {sequence}{filter} {}",
            render_block(&body)
        ))
    }

    pub fn while_loop(
        &self,
        condition: impl Interpolate,
        body: impl IntoIterator<Item = Stmt>,
    ) -> MacroResult<Stmt> {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.stmt(&format!(
            "while {} {}",
            condition.interpolation(),
            render_block(&body)
        ))
    }

    pub fn return_value(&self, value: impl Interpolate) -> MacroResult<Stmt> {
        self.stmt(&format!("return {}", value.interpolation()))
    }

    pub fn return_void(&self) -> MacroResult<Stmt> {
        self.stmt("return")
    }

    pub fn throw_stmt(&self, error: impl Interpolate) -> MacroResult<Stmt> {
        self.stmt(&format!("throw {}", error.interpolation()))
    }

    pub fn defer_stmt(&self, body: impl IntoIterator<Item = Stmt>) -> MacroResult<Stmt> {
        let body: Vec<Stmt> = body.into_iter().collect();
        self.stmt(&format!("defer {}", render_block(&body)))
    }

    pub fn assign(&self, target: impl Interpolate, value: impl Interpolate) -> MacroResult<Stmt> {
        self.stmt(&format!(
            "{} = {}",
            target.interpolation(),
            value.interpolation()
        ))
    }

    pub fn expr_stmt(&self, expr: impl Interpolate) -> MacroResult<Stmt> {
        self.stmt(&expr.interpolation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::template;
    use tugmacro_syntax::{LanguageVersion, ParseOptions};

    fn stmt(text: &str) -> Stmt {
        template::stmt(text).unwrap()
    }

    #[test]
    fn if_chain() {
        let built = if_stmt("x > 0", [stmt("positive()")])
            .else_if("x < 0", [stmt("negative()")])
            .otherwise([stmt("zero()")])
            .build()
            .unwrap();
        assert_eq!(
            built.to_source(),
            "if x > 0 {\n    positive()\n} else if x < 0 {\n    negative()\n} else {\n    zero()\n}"
        );
        assert!(matches!(built, Stmt::If(_)));
    }

    #[test]
    fn empty_else_means_no_else() {
        let plain = if_stmt("ready", [stmt("go()")]).build().unwrap();
        let with_empty = if_stmt("ready", [stmt("go()")]).otherwise([]).build().unwrap();
        assert_eq!(plain.to_source(), with_empty.to_source());
        assert_eq!(plain.to_source(), "if ready {\n    go()\n}");
        match with_empty {
            Stmt::If(node) => assert!(node.else_branch.is_none()),
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn guard_and_loops() {
        assert_eq!(
            guard_stmt("let value = cache[key]", [return_void().unwrap()])
                .unwrap()
                .to_source(),
            "guard let value = cache[key] else {\n    return\n}"
        );
        assert_eq!(
            for_in("item", "items", [stmt("total += item")]).unwrap().to_source(),
            "for item in items {\n    total += item\n}"
        );
        assert_eq!(
            for_in_where("item", "items", "item > 0", []).unwrap().to_source(),
            "for item in items where item > 0 {}"
        );
        assert_eq!(
            while_loop("running", [stmt("step()")]).unwrap().to_source(),
            "while running {\n    step()\n}"
        );
    }

    #[test]
    fn switch_keeps_case_order() {
        let built = switch_stmt("code")
            .case("404", [stmt("missing()")])
            .case("200, 204", [stmt("ok()")])
            .default([])
            .build()
            .unwrap();
        assert_eq!(
            built.to_source(),
            "switch code {\ncase 404:\n    missing()\ncase 200, 204:\n    ok()\ndefault:\n    break\n}"
        );
    }

    #[test]
    fn unguarded_catch_after_guarded() {
        let built = do_catch([stmt("try run()")])
            .catch(Catch::matching("RunError.timeout", [stmt("retry()")]))
            .catch(Catch::any([stmt("report(error)")]))
            .build()
            .unwrap();
        assert_eq!(
            built.to_source(),
            "do {\n    try run()\n} catch RunError.timeout {\n    retry()\n} catch {\n    report(error)\n}"
        );
    }

    #[test]
    fn simple_statements() {
        assert_eq!(return_value("x + 1").unwrap().to_source(), "return x + 1");
        assert_eq!(throw_stmt("Failure.bad").unwrap().to_source(), "throw Failure.bad");
        assert_eq!(
            defer_stmt([stmt("close()")]).unwrap().to_source(),
            "defer {\n    close()\n}"
        );
        assert_eq!(assign("self.name", "name").unwrap().to_source(), "self.name = name");
        assert!(matches!(expr_stmt("log()").unwrap(), Stmt::Expr(_)));
        assert!(return_value("(").is_err());
    }

    #[test]
    fn template_forms_use_their_options() {
        let strict = Template::new(ParseOptions::new(LanguageVersion::V5_10));
        let typed = || stmt("let handler: () throws(E) -> Void = run");

        assert!(defer_stmt([typed()]).is_ok());
        assert!(strict.defer_stmt([typed()]).is_err());
        assert!(strict.guard_stmt("ready", [typed(), stmt("return")]).is_err());
        assert!(strict.for_in("item", "items", [typed()]).is_err());
        assert!(strict.for_in_where("item", "items", "item.isValid", [typed()]).is_err());
        assert!(strict.while_loop("running", [typed()]).is_err());
        assert!(strict.if_stmt("ready", [typed()]).build().is_err());
        assert!(strict.switch_stmt("x").case("1", [typed()]).build().is_err());
        assert!(strict.do_catch([typed()]).build().is_err());
        assert!(strict.expr_stmt("{ () throws(E) in run() }").is_err());

        let err = strict.expr_stmt("{ () throws(E) in run() }").unwrap_err();
        assert_eq!(err.template_text(), Some("{ () throws(E) in run() }"));
        assert_eq!(
            strict.return_value("x").unwrap().to_source(),
            return_value("x").unwrap().to_source()
        );
        assert!(strict.return_void().is_ok());
        assert!(strict.throw_stmt("Failure.bad").is_ok());
        assert!(strict.assign("a", "b").is_ok());
    }
}
