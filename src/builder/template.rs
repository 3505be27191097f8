// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parsing rendered text back into syntax.
//!
//! Every builder renders source text and hands it to a [`Template`], which
//! parses it with the entry rule for the node kind requested. A parse
//! failure becomes [`MacroError::Template`] carrying the offending text.

use tracing::trace;
use tugmacro_syntax::{
    parse_decl_with_options, parse_expr_with_options, parse_members_with_options,
    parse_pattern_with_options, parse_stmt_with_options, parse_stmts_with_options,
    parse_type_with_options, Decl, Expr, ParseOptions, ParserError, Pattern, Stmt, TypeNode,
};

use crate::error::{MacroError, MacroResult};

/// Parser entry points bound to a set of [`ParseOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Template {
    options: ParseOptions,
}

impl Template {
    pub fn new(options: ParseOptions) -> Self {
        Template { options }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn decl(&self, text: &str) -> MacroResult<Decl> {
        self.parse("decl", text, parse_decl_with_options)
    }

    pub fn members(&self, text: &str) -> MacroResult<Vec<Decl>> {
        self.parse("members", text, parse_members_with_options)
    }

    pub fn stmt(&self, text: &str) -> MacroResult<Stmt> {
        self.parse("stmt", text, parse_stmt_with_options)
    }

    pub fn stmts(&self, text: &str) -> MacroResult<Vec<Stmt>> {
        self.parse("stmts", text, parse_stmts_with_options)
    }

    pub fn expr(&self, text: &str) -> MacroResult<Expr> {
        self.parse("expr", text, parse_expr_with_options)
    }

    pub fn type_node(&self, text: &str) -> MacroResult<TypeNode> {
        self.parse("type", text, parse_type_with_options)
    }

    pub fn pattern(&self, text: &str) -> MacroResult<Pattern> {
        self.parse("pattern", text, parse_pattern_with_options)
    }

    fn parse<T>(
        &self,
        kind: &'static str,
        text: &str,
        parser: fn(&str, ParseOptions) -> Result<T, ParserError>,
    ) -> MacroResult<T> {
        trace!(kind, text, "parsing template");
        parser(text, self.options).map_err(|source| MacroError::Template {
            kind,
            text: text.to_string(),
            source,
        })
    }
}

/// Parse one declaration with permissive options.
pub fn decl(text: &str) -> MacroResult<Decl> {
    Template::default().decl(text)
}

pub fn members(text: &str) -> MacroResult<Vec<Decl>> {
    Template::default().members(text)
}

pub fn stmt(text: &str) -> MacroResult<Stmt> {
    Template::default().stmt(text)
}

pub fn stmts(text: &str) -> MacroResult<Vec<Stmt>> {
    Template::default().stmts(text)
}

pub fn expr(text: &str) -> MacroResult<Expr> {
    Template::default().expr(text)
}

pub fn type_node(text: &str) -> MacroResult<TypeNode> {
    Template::default().type_node(text)
}

pub fn pattern(text: &str) -> MacroResult<Pattern> {
    Template::default().pattern(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::{Codegen, LanguageVersion};

    #[test]
    fn parses_each_kind() {
        assert_eq!(decl("struct S {}").unwrap().to_source(), "struct S {}");
        assert_eq!(members("let a = 1\nlet b = 2").unwrap().len(), 2);
        assert_eq!(stmt("return x").unwrap().to_source(), "return x");
        assert_eq!(stmts("a()\nb()").unwrap().len(), 2);
        assert_eq!(expr("f(x: 1)").unwrap().to_source(), "f(x: 1)");
        assert_eq!(type_node("[Int]").unwrap().to_source(), "[Int]");
        assert_eq!(pattern("(a, b)").unwrap().to_source(), "(a, b)");
    }

    #[test]
    fn failure_keeps_text() {
        let err = decl("struct {").unwrap_err();
        assert_eq!(err.template_text(), Some("struct {"));
        assert!(err.to_string().starts_with("generated decl does not parse"));
    }

    #[test]
    fn options_are_forwarded() {
        let template = Template::new(ParseOptions::new(LanguageVersion::V5_10));
        assert_eq!(template.options().version, LanguageVersion::V5_10);
        assert!(Template::default().decl("func f() throws(E) {}").is_ok());
        assert!(template.decl("func f() throws(E) {}").is_err());
    }
}
