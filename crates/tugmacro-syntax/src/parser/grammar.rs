// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar over the token stream.
//!
//! Expressions are stratified by precedence, lowest first: assignment,
//! ternary, `||`, `&&`, comparison, `??`, casting, range, additive,
//! multiplicative, prefix, postfix. Operators the grammar does not know
//! parse at the additive level.
//!
//! Rules taking `tc: bool` control whether a `{` following an expression may
//! start a trailing closure. It is off in the heads of `if`, `guard`,
//! `while`, `for` and `switch`, and back on inside any bracketed
//! subexpression.

use std::cell::RefCell;
use std::fmt;

use peg::{Parse, ParseElem, RuleResult};
use tugmacro_core::text::byte_offset_to_position;
use tugmacro_core::Span;

use crate::nodes::*;
use crate::tokenizer::{Tok, TokKind};

// ============================================================================
// Input
// ============================================================================

/// Token vector handed to the generated parser.
#[derive(Debug)]
pub struct TokVec {
    tokens: Vec<Tok>,
    source: String,
}

impl TokVec {
    pub fn new(tokens: Vec<Tok>, source: &str) -> Self {
        TokVec {
            tokens,
            source: source.to_string(),
        }
    }

    pub fn tokens(&self) -> &[Tok] {
        &self.tokens
    }
}

/// Location reported in parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokLoc {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for TokLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Parse for TokVec {
    type PositionRepr = TokLoc;

    fn start<'input>(&'input self) -> usize {
        0
    }

    fn is_eof<'input>(&'input self, pos: usize) -> bool {
        pos >= self.tokens.len()
    }

    fn position_repr<'input>(&'input self, pos: usize) -> Self::PositionRepr {
        // Token predicates reject a token after consuming it, so failures are
        // recorded one past the offending token.
        let offending = pos.saturating_sub(1);
        let offset = match self.tokens.get(offending) {
            Some(tok) => tok.span.start as usize,
            None => self.source.len(),
        };
        let (line, column) = byte_offset_to_position(&self.source, offset);
        TokLoc {
            offset,
            line,
            column,
        }
    }
}

impl<'input> ParseElem<'input> for TokVec {
    type Element = &'input Tok;

    fn parse_elem(&'input self, pos: usize) -> RuleResult<Self::Element> {
        match self.tokens.get(pos) {
            Some(tok) => RuleResult::Matched(pos + 1, tok),
            None => RuleResult::Failed,
        }
    }
}

// ============================================================================
// Parse context
// ============================================================================

/// State shared by grammar actions: token spans and the node id counter.
///
/// Actions of alternatives that later backtrack still draw ids, so ids are
/// unique and deterministic for a given input but not dense.
pub struct ParseCtx {
    spans: Vec<Span>,
    source_len: u64,
    ids: RefCell<NodeIdGenerator>,
}

impl ParseCtx {
    pub fn new(tokens: &[Tok], source_len: usize) -> Self {
        ParseCtx {
            spans: tokens.iter().map(|t| t.span).collect(),
            source_len: source_len as u64,
            ids: RefCell::new(NodeIdGenerator::new()),
        }
    }

    pub fn next_id(&self) -> NodeId {
        self.ids.borrow_mut().next_id()
    }

    pub fn ids_issued(&self) -> u32 {
        self.ids.borrow().count()
    }

    fn token(&self, tok: &Tok) -> Token {
        Token::new(tok.text.clone(), tok.span, self.next_id())
    }

    fn opt_token(&self, tok: Option<&Tok>) -> Option<Token> {
        tok.map(|t| self.token(t))
    }

    fn tokens(&self, toks: &[&Tok]) -> Vec<Token> {
        toks.iter().map(|t| self.token(t)).collect()
    }

    /// Byte span covering tokens `[start, end)`.
    fn span(&self, start: usize, end: usize) -> Span {
        if end > start {
            if let (Some(first), Some(last)) = (self.spans.get(start), self.spans.get(end - 1)) {
                return Span::new(first.start, last.end);
            }
        }
        match self.spans.get(start) {
            Some(next) => Span::empty_at(next.start),
            None => Span::empty_at(self.source_len),
        }
    }

    fn full_span(&self) -> Span {
        Span::new(0, self.source_len)
    }

    fn listed<T: CommaSlot>(&self, items: Vec<(T, Option<&Tok>)>) -> Vec<T> {
        items
            .into_iter()
            .map(|(mut item, comma)| {
                item.set_trailing_comma(self.opt_token(comma));
                item
            })
            .collect()
    }

    fn literal(&self, tok: &Tok) -> LiteralExpr {
        LiteralExpr {
            token: self.token(tok),
            id: self.next_id(),
            span: tok.span,
        }
    }

    fn fold_binary(&self, start: usize, first: Expr, rest: Vec<(&Tok, Expr, usize)>) -> Expr {
        rest.into_iter().fold(first, |lhs, (op, rhs, end)| {
            Expr::Binary(Box::new(BinaryExpr {
                lhs,
                operator: self.token(op),
                rhs,
                id: self.next_id(),
                span: self.span(start, end),
            }))
        })
    }

    fn fold_casts(
        &self,
        start: usize,
        first: Expr,
        casts: Vec<(&Tok, Option<&Tok>, TypeNode, usize)>,
    ) -> Expr {
        casts.into_iter().fold(first, |expr, (keyword, mark, ty, end)| {
            Expr::Cast(Box::new(CastExpr {
                expr,
                keyword: self.token(keyword),
                mark: self.opt_token(mark),
                ty,
                id: self.next_id(),
                span: self.span(start, end),
            }))
        })
    }

    fn fold_postfix(&self, start: usize, base: Expr, suffixes: Vec<(ExprSuffix<'_>, usize)>) -> Expr {
        suffixes.into_iter().fold(base, |expr, (suffix, end)| {
            let span = self.span(start, end);
            match suffix {
                ExprSuffix::Member { dot, name } => {
                    Expr::MemberAccess(Box::new(MemberAccessExpr {
                        base: Some(expr),
                        dot: self.token(dot),
                        name: self.token(name),
                        id: self.next_id(),
                        span,
                    }))
                }
                ExprSuffix::Call {
                    left,
                    arguments,
                    right,
                    closure,
                } => Expr::Call(Box::new(FunctionCallExpr {
                    callee: expr,
                    left_paren: self.opt_token(left),
                    arguments,
                    right_paren: self.opt_token(right),
                    trailing_closure: closure,
                    id: self.next_id(),
                    span,
                })),
                ExprSuffix::Subscript {
                    left,
                    arguments,
                    right,
                } => Expr::Subscript(Box::new(SubscriptExpr {
                    base: expr,
                    left_square: self.token(left),
                    arguments,
                    right_square: self.token(right),
                    id: self.next_id(),
                    span,
                })),
                ExprSuffix::Postfix(op) => Expr::Postfix(Box::new(PostfixExpr {
                    operand: expr,
                    operator: self.token(op),
                    id: self.next_id(),
                    span,
                })),
            }
        })
    }

    fn fold_type(&self, start: usize, base: TypeNode, suffixes: Vec<(TypeSuffix<'_>, usize)>) -> TypeNode {
        suffixes.into_iter().fold(base, |ty, (suffix, end)| {
            let span = self.span(start, end);
            match suffix {
                TypeSuffix::Optional(mark) => TypeNode::Optional(Box::new(OptionalType {
                    wrapped: ty,
                    mark: self.token(mark),
                    id: self.next_id(),
                    span,
                })),
                TypeSuffix::Unwrapped(mark) => {
                    TypeNode::ImplicitlyUnwrapped(Box::new(OptionalType {
                        wrapped: ty,
                        mark: self.token(mark),
                        id: self.next_id(),
                        span,
                    }))
                }
                TypeSuffix::Member(name, generic_arguments) => {
                    TypeNode::Member(Box::new(MemberType {
                        base: ty,
                        name: self.token(name),
                        generic_arguments,
                        id: self.next_id(),
                        span,
                    }))
                }
            }
        })
    }

    fn collection(
        &self,
        start: usize,
        end: usize,
        left: &Tok,
        items: Vec<((Expr, Option<Expr>), Option<&Tok>)>,
        right: &Tok,
    ) -> Result<Expr, &'static str> {
        let keyed = items.iter().filter(|((_, v), _)| v.is_some()).count();
        if keyed == 0 {
            let elements = items
                .into_iter()
                .map(|((expr, _), comma)| ArrayElement {
                    expr,
                    trailing_comma: self.opt_token(comma),
                })
                .collect();
            return Ok(Expr::Array(ArrayExpr {
                left_square: self.token(left),
                elements,
                right_square: self.token(right),
                id: self.next_id(),
                span: self.span(start, end),
            }));
        }
        if keyed != items.len() {
            return Err("dictionary element");
        }
        let elements = items
            .into_iter()
            .filter_map(|((key, value), comma)| {
                value.map(|value| DictionaryElement {
                    key,
                    value,
                    trailing_comma: self.opt_token(comma),
                })
            })
            .collect();
        Ok(Expr::Dictionary(DictionaryExpr {
            left_square: self.token(left),
            elements,
            right_square: self.token(right),
            id: self.next_id(),
            span: self.span(start, end),
        }))
    }
}

enum ExprSuffix<'i> {
    Member {
        dot: &'i Tok,
        name: &'i Tok,
    },
    Call {
        left: Option<&'i Tok>,
        arguments: Vec<LabeledExpr>,
        right: Option<&'i Tok>,
        closure: Option<ClosureExpr>,
    },
    Subscript {
        left: &'i Tok,
        arguments: Vec<LabeledExpr>,
        right: &'i Tok,
    },
    Postfix(&'i Tok),
}

enum TypeSuffix<'i> {
    Optional(&'i Tok),
    Unwrapped(&'i Tok),
    Member(&'i Tok, Option<GenericArgumentClause>),
}

/// List elements that own the comma following them.
trait CommaSlot {
    fn set_trailing_comma(&mut self, comma: Option<Token>);
}

macro_rules! impl_comma_slot {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CommaSlot for $ty {
                fn set_trailing_comma(&mut self, comma: Option<Token>) {
                    self.trailing_comma = comma;
                }
            }
        )*
    };
}

impl_comma_slot!(
    GenericParameter,
    GenericRequirement,
    InheritedType,
    FunctionParameter,
    PatternBinding,
    GenericArgument,
    TupleTypeElement,
    TuplePatternElement,
    LabeledExpr,
    ClosureShorthandParameter,
    ClosureParameter,
    ClosureCapture,
    ConditionElement,
    CaseItem,
    EnumCaseElement,
    EnumCaseParameter,
);

fn attach_commas<'i, T>(
    first: T,
    rest: Vec<(&'i Tok, T)>,
    trailing: Option<&'i Tok>,
) -> Vec<(T, Option<&'i Tok>)> {
    let mut out = Vec::with_capacity(rest.len() + 1);
    let mut current = first;
    for (comma, next) in rest {
        out.push((current, Some(comma)));
        current = next;
    }
    out.push((current, trailing));
    out
}

/// Token texts joined with single spaces where the source had whitespace.
fn join_token_text(toks: &[&Tok]) -> String {
    let mut text = String::new();
    for (i, tok) in toks.iter().enumerate() {
        if i > 0 && tok.space_before {
            text.push(' ');
        }
        text.push_str(&tok.text);
    }
    text
}

// ============================================================================
// Word classes
// ============================================================================

const RESERVED: &[&str] = &[
    "_",
    "as",
    "associatedtype",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "continue",
    "default",
    "defer",
    "deinit",
    "do",
    "else",
    "enum",
    "extension",
    "fallthrough",
    "false",
    "for",
    "func",
    "guard",
    "if",
    "import",
    "in",
    "init",
    "inout",
    "is",
    "let",
    "nil",
    "operator",
    "protocol",
    "repeat",
    "rethrows",
    "return",
    "struct",
    "subscript",
    "switch",
    "throw",
    "throws",
    "true",
    "try",
    "typealias",
    "var",
    "where",
    "while",
];

const MODIFIERS: &[&str] = &[
    "__consuming",
    "borrowing",
    "class",
    "consuming",
    "convenience",
    "distributed",
    "dynamic",
    "fileprivate",
    "final",
    "indirect",
    "infix",
    "internal",
    "isolated",
    "lazy",
    "mutating",
    "nonisolated",
    "nonmutating",
    "open",
    "optional",
    "override",
    "package",
    "postfix",
    "prefix",
    "private",
    "public",
    "required",
    "static",
    "unowned",
    "weak",
];

const DECL_KEYWORDS: &[&str] = &[
    "actor",
    "associatedtype",
    "case",
    "class",
    "deinit",
    "enum",
    "extension",
    "func",
    "init",
    "let",
    "protocol",
    "struct",
    "typealias",
    "var",
];

const TYPE_SPECIFIERS: &[&str] = &["inout", "borrowing", "consuming", "sending", "__owned", "__shared"];

const ACCESSOR_MODIFIERS: &[&str] = &["mutating", "nonmutating", "__consuming"];

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Precedence {
    Assignment,
    Ternary,
    Disjunction,
    Conjunction,
    Comparison,
    NilCoalescing,
    Range,
    Additive,
    Multiplicative,
}

pub(crate) fn precedence_of(op: &str) -> Precedence {
    match op {
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>=" | "??=" => {
            Precedence::Assignment
        }
        "?" => Precedence::Ternary,
        "||" => Precedence::Disjunction,
        "&&" => Precedence::Conjunction,
        "==" | "!=" | "===" | "!==" | "<" | "<=" | ">" | ">=" | "~=" => Precedence::Comparison,
        "??" => Precedence::NilCoalescing,
        "..." | "..<" => Precedence::Range,
        "*" | "/" | "%" | "&" | "&*" | "<<" | ">>" => Precedence::Multiplicative,
        _ => Precedence::Additive,
    }
}

// ============================================================================
// Grammar
// ============================================================================

peg::parser! {
    pub grammar swift(ctx: &ParseCtx) for TokVec {

        // ------------------------------------------------------------------
        // Entry points
        // ------------------------------------------------------------------

        pub rule source_file() -> SourceFile
            = ss:statements() eof() {
                SourceFile { statements: ss, id: ctx.next_id(), span: ctx.full_span() }
            }

        pub rule single_decl() -> Decl
            = semis() d:decl() semis() eof() { d }

        pub rule member_list() -> Vec<Decl>
            = ds:members() eof() { ds }

        pub rule single_stmt() -> Stmt
            = semis() s:statement() semis() eof() { s }

        pub rule statement_list() -> Vec<Stmt>
            = ss:statements() eof() { ss }

        pub rule single_expr() -> Expr
            = e:expr(true) eof() { e }

        pub rule single_type() -> TypeNode
            = t:type_() eof() { t }

        pub rule single_pattern() -> Pattern
            = p:pattern() eof() { p }

        // ------------------------------------------------------------------
        // Tokens
        // ------------------------------------------------------------------

        rule p() -> usize = position!()

        rule eof() = ![_]

        rule kw(s: &'static str) -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier && t.text == s { Ok(t) } else { Err(s) } }

        rule punct(s: &'static str) -> &'input Tok
            = [t] {? if t.kind == TokKind::Punct && t.text == s { Ok(t) } else { Err(s) } }

        // A punct token with no whitespace before it.
        rule adjacent(s: &'static str) -> &'input Tok
            = [t] {? if t.kind == TokKind::Punct && t.text == s && !t.space_before { Ok(t) } else { Err(s) } }

        // A punct token on the same line as the previous token.
        rule same_line(s: &'static str) -> &'input Tok
            = [t] {? if t.kind == TokKind::Punct && t.text == s && !t.newline_before { Ok(t) } else { Err(s) } }

        rule op(s: &'static str) -> &'input Tok
            = [t] {? if t.is_operator() && t.text == s { Ok(t) } else { Err(s) } }

        rule any_operator() -> &'input Tok
            = [t] {? if t.is_operator() { Ok(t) } else { Err("operator") } }

        rule binop(prec: Precedence) -> &'input Tok
            = [t] {?
                if t.kind == TokKind::BinaryOperator && precedence_of(&t.text) == prec {
                    Ok(t)
                } else {
                    Err("binary operator")
                }
            }

        rule prefix_op() -> &'input Tok
            = [t] {? if t.kind == TokKind::PrefixOperator { Ok(t) } else { Err("prefix operator") } }

        rule postfix_op(s: &'static str) -> &'input Tok
            = [t] {? if t.kind == TokKind::PostfixOperator && t.text == s { Ok(t) } else { Err(s) } }

        rule any_postfix_op() -> &'input Tok
            = [t] {? if t.kind == TokKind::PostfixOperator { Ok(t) } else { Err("postfix operator") } }

        rule langle() -> &'input Tok
            = [t] {? if t.kind == TokKind::LAngle { Ok(t) } else { Err("<") } }

        rule rangle() -> &'input Tok
            = [t] {? if t.kind == TokKind::RAngle { Ok(t) } else { Err(">") } }

        rule ident() -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier && !is_reserved(&t.text) { Ok(t) } else { Err("identifier") } }

        // Any word, keywords included, as allowed for labels and member names.
        rule any_word() -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier { Ok(t) } else { Err("identifier") } }

        rule underscore() -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier && t.text == "_" { Ok(t) } else { Err("_") } }

        rule member_name() -> &'input Tok
            = [t] {?
                if matches!(t.kind, TokKind::Identifier | TokKind::Integer) { Ok(t) } else { Err("member name") }
            }

        // The next token is on the same line as the previous one.
        rule no_newline() = &same_line_token()

        rule same_line_token() -> &'input Tok
            = [t] {? if t.newline_before { Err("token on the same line") } else { Ok(t) } }

        // Succeeds without consuming input when `on` is set.
        rule enabled(on: bool) = &[_] {? if on { Ok(()) } else { Err("trailing closure") } }

        rule semis() = punct(";")*

        rule comma_list<T>(item: rule<T>) -> Vec<(T, Option<&'input Tok>)>
            = first:item() rest:(c:punct(",") x:item() { (c, x) })* trailing:punct(",")? {
                attach_commas(first, rest, trailing)
            }

        rule comma_list_opt<T>(item: rule<T>) -> Vec<(T, Option<&'input Tok>)>
            = l:comma_list(<item()>)? { l.unwrap_or_default() }

        // ------------------------------------------------------------------
        // Attributes and modifiers
        // ------------------------------------------------------------------

        rule attribute() -> Attribute
            = s:p() at:punct("@") n:any_word() args:attribute_arguments()? e:p() {
                Attribute {
                    at_sign: ctx.token(at),
                    name: ctx.token(n),
                    arguments: args,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule attribute_arguments() -> AttributeArguments
            = l:adjacent("(") body:balanced_tokens() r:punct(")") {
                AttributeArguments {
                    left_paren: ctx.token(l),
                    text: join_token_text(&body),
                    right_paren: ctx.token(r),
                }
            }

        rule balanced_tokens() -> Vec<&'input Tok>
            = groups:balanced_group()* { groups.into_iter().flatten().collect() }

        rule balanced_group() -> Vec<&'input Tok>
            = l:punct("(") inner:balanced_tokens() r:punct(")") {
                let mut v = vec![l];
                v.extend(inner);
                v.push(r);
                v
            }
            / t:non_paren() { vec![t] }

        rule non_paren() -> &'input Tok
            = [t] {?
                if t.kind == TokKind::Punct && (t.text == "(" || t.text == ")") { Err("token") } else { Ok(t) }
            }

        rule modifier_word() -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier && MODIFIERS.contains(&t.text.as_str()) { Ok(t) } else { Err("modifier") } }

        rule decl_keyword() -> &'input Tok
            = [t] {? if t.kind == TokKind::Identifier && DECL_KEYWORDS.contains(&t.text.as_str()) { Ok(t) } else { Err("declaration") } }

        rule modifier() -> DeclModifier
            = s:p() n:modifier_word() d:modifier_detail()? e:p() &(modifier_word() / decl_keyword()) {
                DeclModifier { name: ctx.token(n), detail: d, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule modifier_detail() -> ModifierDetail
            = l:adjacent("(") d:any_word() r:punct(")") {
                ModifierDetail { left_paren: ctx.token(l), detail: ctx.token(d), right_paren: ctx.token(r) }
            }

        #[cache]
        rule decl_prefix() -> (Vec<Attribute>, Vec<DeclModifier>)
            = a:attribute()* m:modifier()* { (a, m) }

        // ------------------------------------------------------------------
        // Generics and inheritance
        // ------------------------------------------------------------------

        rule generic_parameter_clause() -> GenericParameterClause
            = s:p() l:langle() ps:comma_list(<generic_parameter()>) r:rangle() e:p() {
                GenericParameterClause {
                    left_angle: ctx.token(l),
                    parameters: ctx.listed(ps),
                    right_angle: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule generic_parameter() -> GenericParameter
            = s:p() each:kw("each")? n:ident() inh:(punct(":") t:type_() { t })? e:p() {
                GenericParameter {
                    each_keyword: ctx.opt_token(each),
                    name: ctx.token(n),
                    inherited_type: inh,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule where_clause() -> GenericWhereClause
            = s:p() w:kw("where") rs:comma_list(<generic_requirement()>) e:p() {
                GenericWhereClause {
                    where_token: ctx.token(w),
                    requirements: ctx.listed(rs),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule generic_requirement() -> GenericRequirement
            = s:p() left:type_() c:(punct(":") / op("==")) right:type_() e:p() {
                let kind = if c.text == "==" {
                    RequirementKind::SameType { left, right }
                } else {
                    RequirementKind::Conformance { left, right }
                };
                GenericRequirement { kind, trailing_comma: None, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule inheritance_clause() -> InheritanceClause
            = s:p() c:punct(":") ts:comma_list(<inherited_type()>) e:p() {
                InheritanceClause {
                    colon: ctx.token(c),
                    types: ctx.listed(ts),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule inherited_type() -> InheritedType
            = s:p() t:type_() e:p() {
                InheritedType { ty: t, trailing_comma: None, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule generic_argument_clause() -> GenericArgumentClause
            = s:p() l:langle() args:comma_list(<generic_argument()>) r:rangle() e:p() {
                GenericArgumentClause {
                    left_angle: ctx.token(l),
                    arguments: ctx.listed(args),
                    right_angle: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule generic_argument() -> GenericArgument
            = t:type_() { GenericArgument { ty: t, trailing_comma: None } }

        // ------------------------------------------------------------------
        // Types
        // ------------------------------------------------------------------

        rule type_specifier() -> &'input Tok
            = [t] {?
                if t.kind == TokKind::Identifier && TYPE_SPECIFIERS.contains(&t.text.as_str()) { Ok(t) } else { Err("type specifier") }
            }

        rule type_() -> TypeNode
            = s:p() specs:(t:type_specifier() !punct(":") { t })* attrs:attribute()* base:composition_type() e:p() {
                if specs.is_empty() && attrs.is_empty() {
                    base
                } else {
                    TypeNode::Attributed(Box::new(AttributedType {
                        specifiers: ctx.tokens(&specs),
                        attributes: attrs,
                        base,
                        id: ctx.next_id(),
                        span: ctx.span(s, e),
                    }))
                }
            }

        rule composition_type() -> TypeNode
            = s:p() first:function_or_postfix_type() rest:(op("&") t:function_or_postfix_type() { t })* e:p() {
                if rest.is_empty() {
                    first
                } else {
                    let mut elements = vec![first];
                    elements.extend(rest);
                    TypeNode::Composition(CompositionType { elements, id: ctx.next_id(), span: ctx.span(s, e) })
                }
            }

        rule function_or_postfix_type() -> TypeNode
            = s:p() params:tuple_type() fx:effect_specifiers() punct("->") rt:type_() e:p() {
                TypeNode::Function(Box::new(FunctionType {
                    parameters: params,
                    effects: fx,
                    return_type: rt,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }
            / postfix_type()

        rule postfix_type() -> TypeNode
            = s:p() base:primary_type() sufs:type_suffix()* { ctx.fold_type(s, base, sufs) }

        rule type_suffix() -> (TypeSuffix<'input>, usize)
            = m:postfix_op("?") e:p() { (TypeSuffix::Optional(m), e) }
            / m:postfix_op("!") e:p() { (TypeSuffix::Unwrapped(m), e) }
            / punct(".") n:any_word() ga:generic_argument_clause()? e:p() { (TypeSuffix::Member(n, ga), e) }

        rule primary_type() -> TypeNode
            = s:p() k:(kw("some") / kw("any")) c:postfix_type() e:p() {
                TypeNode::SomeOrAny(Box::new(SomeOrAnyType {
                    keyword: ctx.token(k),
                    constraint: c,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }
            / s:p() k:kw("repeat") b:postfix_type() e:p() {
                TypeNode::PackExpansion(Box::new(PackType { keyword: ctx.token(k), base: b, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() k:kw("each") b:postfix_type() e:p() {
                TypeNode::PackElement(Box::new(PackType { keyword: ctx.token(k), base: b, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() n:ident() ga:generic_argument_clause()? e:p() {
                TypeNode::Identifier(IdentifierType {
                    name: ctx.token(n),
                    generic_arguments: ga,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / s:p() l:punct("[") k:type_() v:(punct(":") t:type_() { t })? r:punct("]") e:p() {
                match v {
                    Some(value) => TypeNode::Dictionary(Box::new(DictionaryType {
                        left_square: ctx.token(l),
                        key: k,
                        value,
                        right_square: ctx.token(r),
                        id: ctx.next_id(),
                        span: ctx.span(s, e),
                    })),
                    None => TypeNode::Array(Box::new(ArrayType {
                        left_square: ctx.token(l),
                        element: k,
                        right_square: ctx.token(r),
                        id: ctx.next_id(),
                        span: ctx.span(s, e),
                    })),
                }
            }
            / t:tuple_type() { TypeNode::Tuple(t) }

        #[cache]
        rule tuple_type() -> TupleType
            = s:p() l:punct("(") els:comma_list_opt(<tuple_type_element()>) r:punct(")") e:p() {
                TupleType {
                    left_paren: ctx.token(l),
                    elements: ctx.listed(els),
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule tuple_type_element() -> TupleTypeElement
            = s:p() names:(f:any_word() n:any_word()? punct(":") { (f, n) })? ty:type_() ell:postfix_op("...")? e:p() {
                let (first, second) = match names {
                    Some((f, n)) => (Some(f), n),
                    None => (None, None),
                };
                TupleTypeElement {
                    first_name: ctx.opt_token(first),
                    second_name: ctx.opt_token(second),
                    ty,
                    ellipsis: ctx.opt_token(ell),
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        // ------------------------------------------------------------------
        // Signatures
        // ------------------------------------------------------------------

        rule effect_specifiers() -> EffectSpecifiers
            = a:kw("async")? t:throws_clause()? {
                EffectSpecifiers { async_specifier: ctx.opt_token(a), throws_clause: t }
            }

        rule throws_clause() -> ThrowsClause
            = s:p() k:(kw("throws") / kw("rethrows")) ty:(adjacent("(") t:type_() punct(")") { t })? e:p() {
                ThrowsClause { throws_token: ctx.token(k), error_type: ty, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule function_signature() -> FunctionSignature
            = s:p() pc:parameter_clause() fx:effect_specifiers() rt:(punct("->") t:type_() { t })? e:p() {
                FunctionSignature {
                    parameter_clause: pc,
                    effects: fx,
                    return_type: rt,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule parameter_clause() -> ParameterClause
            = s:p() l:punct("(") ps:comma_list_opt(<function_parameter()>) r:punct(")") e:p() {
                ParameterClause {
                    left_paren: ctx.token(l),
                    parameters: ctx.listed(ps),
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule function_parameter() -> FunctionParameter
            = s:p() attrs:attribute()* first:any_word() second:any_word()? punct(":") ty:type_()
              ell:postfix_op("...")? dv:(op("=") x:expr(true) { x })? e:p() {
                FunctionParameter {
                    attributes: attrs,
                    first_name: ctx.token(first),
                    second_name: ctx.opt_token(second),
                    ty,
                    ellipsis: ctx.opt_token(ell),
                    default_value: dv,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        // ------------------------------------------------------------------
        // Declarations
        // ------------------------------------------------------------------

        rule decl() -> Decl
            = struct_decl()
            / class_decl()
            / enum_decl()
            / actor_decl()
            / protocol_decl()
            / extension_decl()
            / variable_decl()
            / function_decl()
            / initializer_decl()
            / deinitializer_decl()
            / typealias_decl()
            / associatedtype_decl()
            / enum_case_decl()

        rule members() -> Vec<Decl>
            = semis() ds:(d:decl() semis() { d })* { ds }

        rule member_block() -> MemberBlock
            = s:p() l:punct("{") ms:members() r:punct("}") e:p() {
                MemberBlock {
                    left_brace: ctx.token(l),
                    members: ms,
                    right_brace: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule struct_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("struct") n:ident() g:generic_parameter_clause()?
              i:inheritance_clause()? w:where_clause()? m:member_block() e:p() {
                Decl::Struct(Box::new(StructDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule class_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("class") n:ident() g:generic_parameter_clause()?
              i:inheritance_clause()? w:where_clause()? m:member_block() e:p() {
                Decl::Class(Box::new(ClassDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule enum_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("enum") n:ident() g:generic_parameter_clause()?
              i:inheritance_clause()? w:where_clause()? m:member_block() e:p() {
                Decl::Enum(Box::new(EnumDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule actor_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("actor") n:ident() g:generic_parameter_clause()?
              i:inheritance_clause()? w:where_clause()? m:member_block() e:p() {
                Decl::Actor(Box::new(ActorDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule protocol_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("protocol") n:ident() i:inheritance_clause()?
              w:where_clause()? m:member_block() e:p() {
                Decl::Protocol(Box::new(ProtocolDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule extension_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("extension") t:type_() i:inheritance_clause()?
              w:where_clause()? m:member_block() e:p() {
                Decl::Extension(Box::new(ExtensionDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    extended_type: t,
                    inheritance: i,
                    where_clause: w,
                    members: m,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule variable_decl() -> Decl
            = s:p() pre:decl_prefix() k:(kw("let") / kw("var")) bs:comma_list(<pattern_binding()>) e:p() {
                Decl::Variable(Box::new(VariableDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    binding_specifier: ctx.token(k),
                    bindings: ctx.listed(bs),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule type_annotation() -> TypeNode
            = punct(":") t:type_() { t }

        rule pattern_binding() -> PatternBinding
            = s:p() pat:binding_pattern() ann:type_annotation()? init:(op("=") x:expr(true) { x })?
              acc:accessor_block()? e:p() {
                PatternBinding {
                    pattern: pat,
                    type_annotation: ann,
                    initializer: init,
                    accessor_block: acc,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule accessor_keyword() -> (AccessorKind, &'input Tok)
            = [t] {?
                match AccessorKind::from_keyword(&t.text) {
                    Some(kind) if t.kind == TokKind::Identifier => Ok((kind, t)),
                    _ => Err("accessor"),
                }
            }

        rule accessor_modifier_word() -> &'input Tok
            = [t] {?
                if t.kind == TokKind::Identifier && ACCESSOR_MODIFIERS.contains(&t.text.as_str()) { Ok(t) } else { Err("accessor modifier") }
            }

        rule accessor_modifier() -> DeclModifier
            = s:p() n:accessor_modifier_word() e:p() {
                DeclModifier { name: ctx.token(n), detail: None, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        // `{` opening an accessor list rather than a closure.
        rule accessor_block_start()
            = punct("{") accessor_modifier_word()* accessor_keyword()
              (punct("{") {} / punct("}") {} / punct("(") {} / kw("async") {} / kw("throws") {} / accessor_keyword() {})

        rule accessor_block() -> AccessorBlock
            = s:p() l:punct("{") acc:accessor_contents() r:punct("}") e:p() {
                AccessorBlock {
                    left_brace: ctx.token(l),
                    accessors: acc,
                    right_brace: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule accessor_contents() -> Accessors
            = a:accessor_decl()+ &punct("}") { Accessors::Explicit(a) }
            / ss:statements() { Accessors::Getter(ss) }

        rule accessor_decl() -> AccessorDecl
            = s:p() attrs:attribute()* mods:accessor_modifier()* k:accessor_keyword()
              param:(punct("(") n:any_word() punct(")") { n })? fx:effect_specifiers() b:code_block()? e:p() {
                AccessorDecl {
                    attributes: attrs,
                    modifiers: mods,
                    kind: k.0,
                    keyword: ctx.token(k.1),
                    parameter: ctx.opt_token(param),
                    effects: fx,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule function_name() -> &'input Tok
            = ident() / any_operator()

        rule function_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("func") n:function_name() g:generic_parameter_clause()?
              sig:function_signature() w:where_clause()? b:code_block()? e:p() {
                Decl::Function(Box::new(FunctionDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    signature: sig,
                    where_clause: w,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule initializer_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("init") q:(postfix_op("?") / postfix_op("!"))?
              g:generic_parameter_clause()? sig:function_signature() w:where_clause()? b:code_block()? e:p() {
                Decl::Initializer(Box::new(InitializerDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    optional_mark: ctx.opt_token(q),
                    generic_parameters: g,
                    signature: sig,
                    where_clause: w,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule deinitializer_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("deinit") b:code_block()? e:p() {
                Decl::Deinitializer(Box::new(DeinitializerDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule typealias_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("typealias") n:ident() g:generic_parameter_clause()?
              op("=") t:type_() e:p() {
                Decl::TypeAlias(Box::new(TypeAliasDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    generic_parameters: g,
                    aliased: t,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule associatedtype_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("associatedtype") n:ident() i:inheritance_clause()?
              d:(op("=") t:type_() { t })? w:where_clause()? e:p() {
                Decl::AssociatedType(Box::new(AssociatedTypeDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    name: ctx.token(n),
                    inheritance: i,
                    default_type: d,
                    where_clause: w,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule enum_case_decl() -> Decl
            = s:p() pre:decl_prefix() k:kw("case") els:comma_list(<enum_case_element()>) e:p() {
                Decl::EnumCase(Box::new(EnumCaseDecl {
                    attributes: pre.0,
                    modifiers: pre.1,
                    keyword: ctx.token(k),
                    elements: ctx.listed(els),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule enum_case_element() -> EnumCaseElement
            = s:p() n:ident() pc:enum_case_parameter_clause()? rv:(op("=") x:expr(true) { x })? e:p() {
                EnumCaseElement {
                    name: ctx.token(n),
                    parameter_clause: pc,
                    raw_value: rv,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule enum_case_parameter_clause() -> EnumCaseParameterClause
            = s:p() l:punct("(") ps:comma_list_opt(<enum_case_parameter()>) r:punct(")") e:p() {
                EnumCaseParameterClause {
                    left_paren: ctx.token(l),
                    parameters: ctx.listed(ps),
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule enum_case_parameter() -> EnumCaseParameter
            = s:p() names:(f:any_word() n:any_word()? punct(":") { (f, n) })? ty:type_()
              dv:(op("=") x:expr(true) { x })? e:p() {
                let (first, second) = match names {
                    Some((f, n)) => (Some(f), n),
                    None => (None, None),
                };
                EnumCaseParameter {
                    first_name: ctx.opt_token(first),
                    second_name: ctx.opt_token(second),
                    ty,
                    default_value: dv,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        // ------------------------------------------------------------------
        // Patterns
        // ------------------------------------------------------------------

        // Patterns allowed after `let`/`var` in declarations.
        rule binding_pattern() -> Pattern
            = s:p() l:punct("(") els:comma_list_opt(<binding_tuple_element()>) r:punct(")") e:p() {
                Pattern::Tuple(TuplePattern {
                    left_paren: ctx.token(l),
                    elements: ctx.listed(els),
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / s:p() w:underscore() e:p() {
                Pattern::Wildcard(WildcardPattern { token: ctx.token(w), id: ctx.next_id(), span: ctx.span(s, e) })
            }
            / s:p() n:ident() e:p() {
                Pattern::Identifier(IdentifierPattern { name: ctx.token(n), id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule binding_tuple_element() -> TuplePatternElement
            = s:p() label:(n:ident() punct(":") { n })? pat:binding_pattern() e:p() {
                TuplePatternElement {
                    label: ctx.opt_token(label),
                    pattern: pat,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule pattern_end() = eof() / &pattern_end_token()

        rule pattern_end_token() -> &'input Tok
            = punct(":") / punct(",") / punct(")") / kw("where") / kw("in") / op("=") / punct("{")

        // Patterns in `case`, `catch` and `for case` positions.
        rule pattern() -> Pattern
            = s:p() k:(kw("let") / kw("var")) inner:(b:binding_pattern() &pattern_end() { b } / pattern()) e:p() {
                Pattern::ValueBinding(Box::new(ValueBindingPattern {
                    specifier: ctx.token(k),
                    pattern: inner,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }
            / s:p() i:kw("is") t:type_() e:p() {
                Pattern::IsType(Box::new(IsTypePattern { is_token: ctx.token(i), ty: t, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() l:punct("(") els:comma_list_opt(<case_tuple_element()>) r:punct(")") e:p() &pattern_end() {
                Pattern::Tuple(TuplePattern {
                    left_paren: ctx.token(l),
                    elements: ctx.listed(els),
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / s:p() w:underscore() e:p() &pattern_end() {
                Pattern::Wildcard(WildcardPattern { token: ctx.token(w), id: ctx.next_id(), span: ctx.span(s, e) })
            }
            / s:p() x:ternary_expr(false) e:p() {
                Pattern::Expression(Box::new(ExpressionPattern { expr: x, id: ctx.next_id(), span: ctx.span(s, e) }))
            }

        rule case_tuple_element() -> TuplePatternElement
            = s:p() label:(n:ident() punct(":") { n })? pat:pattern() e:p() {
                TuplePatternElement {
                    label: ctx.opt_token(label),
                    pattern: pat,
                    trailing_comma: None,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        // ------------------------------------------------------------------
        // Statements
        // ------------------------------------------------------------------

        rule statements() -> Vec<Stmt>
            = semis() ss:(s:statement() semis() { s })* { ss }

        rule statement() -> Stmt
            = d:decl() { Stmt::Decl(d) }
            / s:if_stmt() { Stmt::If(Box::new(s)) }
            / guard_stmt()
            / for_stmt()
            / while_stmt()
            / repeat_stmt()
            / switch_stmt()
            / do_stmt()
            / defer_stmt()
            / return_stmt()
            / throw_stmt()
            / break_stmt()
            / continue_stmt()
            / fallthrough_stmt()
            / e:expr(true) { Stmt::Expr(e) }

        rule code_block() -> CodeBlock
            = s:p() l:punct("{") ss:statements() r:punct("}") e:p() {
                CodeBlock {
                    left_brace: ctx.token(l),
                    statements: ss,
                    right_brace: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule condition_list() -> Vec<ConditionElement>
            = cs:comma_list(<condition_element()>) { ctx.listed(cs) }

        rule condition_element() -> ConditionElement
            = c:condition() { ConditionElement { condition: c, trailing_comma: None } }

        rule condition() -> Condition
            = s:p() k:(kw("let") / kw("var")) pat:binding_pattern() ann:type_annotation()?
              init:(op("=") x:expr(false) { x })? e:p() {
                Condition::OptionalBinding(OptionalBindingCondition {
                    specifier: ctx.token(k),
                    pattern: pat,
                    type_annotation: ann,
                    initializer: init,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / s:p() k:kw("case") pat:pattern() op("=") x:expr(false) e:p() {
                Condition::Matching(MatchingPatternCondition {
                    case_token: ctx.token(k),
                    pattern: pat,
                    initializer: x,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / x:expr(false) { Condition::Expr(x) }

        rule if_stmt() -> IfStmt
            = s:p() k:kw("if") cs:condition_list() b:code_block() el:(kw("else") x:else_branch() { x })? e:p() {
                IfStmt {
                    if_token: ctx.token(k),
                    conditions: cs,
                    body: b,
                    else_branch: el,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule else_branch() -> ElseBranch
            = i:if_stmt() { ElseBranch::If(Box::new(i)) }
            / b:code_block() { ElseBranch::Block(b) }

        rule guard_stmt() -> Stmt
            = s:p() k:kw("guard") cs:condition_list() kw("else") b:code_block() e:p() {
                Stmt::Guard(Box::new(GuardStmt {
                    guard_token: ctx.token(k),
                    conditions: cs,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule for_pattern() -> Pattern
            = b:binding_pattern() &(kw("in") / punct(":")) { b }
            / pattern()

        rule for_stmt() -> Stmt
            = s:p() f:kw("for") t:kw("try")? a:kw("await")? c:kw("case")? pat:for_pattern()
              ann:type_annotation()? kw("in") seq:expr(false) w:(kw("where") x:expr(false) { x })?
              b:code_block() e:p() {
                Stmt::For(Box::new(ForStmt {
                    for_token: ctx.token(f),
                    try_token: ctx.opt_token(t),
                    await_token: ctx.opt_token(a),
                    case_token: ctx.opt_token(c),
                    pattern: pat,
                    type_annotation: ann,
                    sequence: seq,
                    where_clause: w,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule while_stmt() -> Stmt
            = s:p() k:kw("while") cs:condition_list() b:code_block() e:p() {
                Stmt::While(Box::new(WhileStmt {
                    while_token: ctx.token(k),
                    conditions: cs,
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule repeat_stmt() -> Stmt
            = s:p() k:kw("repeat") b:code_block() kw("while") c:expr(true) e:p() {
                Stmt::Repeat(Box::new(RepeatStmt {
                    repeat_token: ctx.token(k),
                    body: b,
                    condition: c,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule switch_stmt() -> Stmt
            = s:p() k:kw("switch") subj:expr(false) l:punct("{") cases:switch_case()* r:punct("}") e:p() {
                Stmt::Switch(Box::new(SwitchStmt {
                    switch_token: ctx.token(k),
                    subject: subj,
                    left_brace: ctx.token(l),
                    cases,
                    right_brace: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule switch_case() -> SwitchCase
            = s:p() label:switch_label() ss:case_body() e:p() {
                SwitchCase { label, statements: ss, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule switch_label() -> SwitchCaseLabel
            = c:kw("case") items:comma_list(<case_item()>) punct(":") {
                SwitchCaseLabel::Case { case_token: ctx.token(c), items: ctx.listed(items) }
            }
            / d:kw("default") punct(":") {
                SwitchCaseLabel::Default { default_token: ctx.token(d) }
            }

        rule case_body() -> Vec<Stmt>
            = semis() ss:(!(kw("case") / kw("default")) s:statement() semis() { s })* { ss }

        rule case_item() -> CaseItem
            = s:p() pat:pattern() w:(kw("where") x:expr(false) { x })? e:p() {
                CaseItem { pattern: pat, where_clause: w, trailing_comma: None, id: ctx.next_id(), span: ctx.span(s, e) }
            }

        rule do_stmt() -> Stmt
            = s:p() k:kw("do") b:code_block() cs:catch_clause()* e:p() {
                Stmt::Do(Box::new(DoStmt {
                    do_token: ctx.token(k),
                    body: b,
                    catches: cs,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule catch_clause() -> CatchClause
            = s:p() k:kw("catch") items:catch_items() b:code_block() e:p() {
                CatchClause {
                    catch_token: ctx.token(k),
                    items: ctx.listed(items),
                    body: b,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        // A bare `catch {` has no patterns; the brace opens the body.
        rule catch_items() -> Vec<(CaseItem, Option<&'input Tok>)>
            = &punct("{") { Vec::new() }
            / comma_list(<case_item()>)

        rule defer_stmt() -> Stmt
            = s:p() k:kw("defer") b:code_block() e:p() {
                Stmt::Defer(Box::new(DeferStmt { defer_token: ctx.token(k), body: b, id: ctx.next_id(), span: ctx.span(s, e) }))
            }

        rule return_stmt() -> Stmt
            = s:p() k:kw("return") x:(no_newline() x:expr(true) { x })? e:p() {
                Stmt::Return(ReturnStmt { keyword: ctx.token(k), expr: x, id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule throw_stmt() -> Stmt
            = s:p() k:kw("throw") x:expr(true) e:p() {
                Stmt::Throw(ThrowStmt { keyword: ctx.token(k), expr: x, id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule break_stmt() -> Stmt
            = s:p() k:kw("break") l:(no_newline() n:ident() { n })? e:p() {
                Stmt::Break(BreakStmt { keyword: ctx.token(k), label: ctx.opt_token(l), id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule continue_stmt() -> Stmt
            = s:p() k:kw("continue") l:(no_newline() n:ident() { n })? e:p() {
                Stmt::Continue(ContinueStmt { keyword: ctx.token(k), label: ctx.opt_token(l), id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule fallthrough_stmt() -> Stmt
            = s:p() k:kw("fallthrough") e:p() {
                Stmt::Fallthrough(FallthroughStmt { keyword: ctx.token(k), id: ctx.next_id(), span: ctx.span(s, e) })
            }

        // ------------------------------------------------------------------
        // Expressions
        // ------------------------------------------------------------------

        rule expr(tc: bool) -> Expr
            = s:p() lhs:ternary_expr(tc) rest:(o:binop(Precedence::Assignment) r:expr(tc) e:p() { (o, r, e) })? {
                match rest {
                    Some(r) => ctx.fold_binary(s, lhs, vec![r]),
                    None => lhs,
                }
            }

        rule ternary_expr(tc: bool) -> Expr
            = s:p() c:or_expr(tc) rest:(binop(Precedence::Ternary) t:expr(true) punct(":") f:ternary_expr(tc) e:p() { (t, f, e) })? {
                match rest {
                    Some((then_expr, else_expr, e)) => Expr::Ternary(Box::new(TernaryExpr {
                        condition: c,
                        then_expr,
                        else_expr,
                        id: ctx.next_id(),
                        span: ctx.span(s, e),
                    })),
                    None => c,
                }
            }

        rule or_expr(tc: bool) -> Expr
            = s:p() first:and_expr(tc) rest:(o:binop(Precedence::Disjunction) r:and_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule and_expr(tc: bool) -> Expr
            = s:p() first:comparison_expr(tc) rest:(o:binop(Precedence::Conjunction) r:comparison_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule comparison_expr(tc: bool) -> Expr
            = s:p() first:coalescing_expr(tc) rest:(o:binop(Precedence::Comparison) r:coalescing_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule coalescing_expr(tc: bool) -> Expr
            = s:p() first:cast_expr(tc) rest:(o:binop(Precedence::NilCoalescing) r:cast_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule cast_expr(tc: bool) -> Expr
            = s:p() x:range_expr(tc) casts:(k:(kw("as") / kw("is")) m:(postfix_op("?") / postfix_op("!"))? t:type_() e:p() { (k, m, t, e) })* {
                ctx.fold_casts(s, x, casts)
            }

        rule range_expr(tc: bool) -> Expr
            = s:p() first:additive_expr(tc) rest:(o:binop(Precedence::Range) r:additive_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule additive_expr(tc: bool) -> Expr
            = s:p() first:multiplicative_expr(tc) rest:(o:binop(Precedence::Additive) r:multiplicative_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule multiplicative_expr(tc: bool) -> Expr
            = s:p() first:prefix_expr(tc) rest:(o:binop(Precedence::Multiplicative) r:prefix_expr(tc) e:p() { (o, r, e) })* {
                ctx.fold_binary(s, first, rest)
            }

        rule prefix_expr(tc: bool) -> Expr
            = s:p() k:kw("try") m:(postfix_op("?") / postfix_op("!"))? x:prefix_expr(tc) e:p() {
                Expr::Try(Box::new(TryExpr { keyword: ctx.token(k), mark: ctx.opt_token(m), expr: x, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() k:kw("await") x:prefix_expr(tc) e:p() {
                Expr::Await(Box::new(AwaitExpr { keyword: ctx.token(k), expr: x, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() o:prefix_op() x:prefix_expr(tc) e:p() {
                Expr::Prefix(Box::new(PrefixExpr { operator: ctx.token(o), operand: x, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / postfix_expr(tc)

        rule postfix_expr(tc: bool) -> Expr
            = s:p() base:primary_expr() sufs:postfix_suffix(tc)* { ctx.fold_postfix(s, base, sufs) }

        rule call_arguments() -> Vec<LabeledExpr>
            = args:comma_list_opt(<labeled_expr()>) { ctx.listed(args) }

        rule postfix_suffix(tc: bool) -> (ExprSuffix<'input>, usize)
            = d:punct(".") n:member_name() e:p() { (ExprSuffix::Member { dot: d, name: n }, e) }
            / l:same_line("(") args:call_arguments() r:punct(")") c:trailing_closure(tc)? e:p() {
                (ExprSuffix::Call { left: Some(l), arguments: args, right: Some(r), closure: c }, e)
            }
            / c:trailing_closure(tc) e:p() {
                (ExprSuffix::Call { left: None, arguments: Vec::new(), right: None, closure: Some(c) }, e)
            }
            / l:same_line("[") args:call_arguments() r:punct("]") e:p() {
                (ExprSuffix::Subscript { left: l, arguments: args, right: r }, e)
            }
            / o:any_postfix_op() e:p() { (ExprSuffix::Postfix(o), e) }

        rule trailing_closure(tc: bool) -> ClosureExpr
            = enabled(tc) no_newline() !accessor_block_start() c:closure_expr() { c }

        rule labeled_expr() -> LabeledExpr
            = l:(n:any_word() punct(":") { n })? x:expr(true) {
                LabeledExpr { label: ctx.opt_token(l), expr: x, trailing_comma: None }
            }

        rule primary_expr() -> Expr
            = literal_expr()
            / c:closure_expr() { Expr::Closure(Box::new(c)) }
            / collection_expr()
            / tuple_expr()
            / macro_expansion_expr()
            / s:p() d:punct(".") n:member_name() e:p() {
                Expr::MemberAccess(Box::new(MemberAccessExpr {
                    base: None,
                    dot: ctx.token(d),
                    name: ctx.token(n),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }
            / s:p() k:(kw("let") / kw("var")) pat:binding_pattern() e:p() {
                let binding = Pattern::ValueBinding(Box::new(ValueBindingPattern {
                    specifier: ctx.token(k),
                    pattern: pat,
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }));
                Expr::Pattern(Box::new(PatternExpr { pattern: binding, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() w:underscore() e:p() {
                let wildcard = Pattern::Wildcard(WildcardPattern { token: ctx.token(w), id: ctx.next_id(), span: ctx.span(s, e) });
                Expr::Pattern(Box::new(PatternExpr { pattern: wildcard, id: ctx.next_id(), span: ctx.span(s, e) }))
            }
            / s:p() o:any_operator() &(punct(")") / punct(",")) e:p() {
                Expr::DeclRef(DeclRefExpr { name: ctx.token(o), generic_arguments: None, id: ctx.next_id(), span: ctx.span(s, e) })
            }
            / s:p() n:ident() ga:generic_argument_clause()? e:p() {
                Expr::DeclRef(DeclRefExpr { name: ctx.token(n), generic_arguments: ga, id: ctx.next_id(), span: ctx.span(s, e) })
            }

        rule literal_expr() -> Expr
            = [t] {?
                match t.kind {
                    TokKind::Integer => Ok(Expr::IntegerLiteral(ctx.literal(t))),
                    TokKind::Float => Ok(Expr::FloatLiteral(ctx.literal(t))),
                    TokKind::String => Ok(Expr::StringLiteral(ctx.literal(t))),
                    TokKind::Identifier if t.text == "true" || t.text == "false" => {
                        Ok(Expr::BooleanLiteral(ctx.literal(t)))
                    }
                    TokKind::Identifier if t.text == "nil" => Ok(Expr::NilLiteral(ctx.literal(t))),
                    _ => Err("literal"),
                }
            }

        rule collection_expr() -> Expr
            = s:p() l:punct("[") punct(":") r:punct("]") e:p() {
                Expr::Dictionary(DictionaryExpr {
                    left_square: ctx.token(l),
                    elements: Vec::new(),
                    right_square: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }
            / s:p() l:punct("[") items:comma_list_opt(<collection_element()>) r:punct("]") e:p() {?
                ctx.collection(s, e, l, items, r)
            }

        rule collection_element() -> (Expr, Option<Expr>)
            = k:expr(true) v:(punct(":") x:expr(true) { x })? { (k, v) }

        rule tuple_expr() -> Expr
            = s:p() l:punct("(") els:call_arguments() r:punct(")") e:p() {
                Expr::Tuple(TupleExpr {
                    left_paren: ctx.token(l),
                    elements: els,
                    right_paren: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                })
            }

        rule macro_expansion_expr() -> Expr
            = s:p() pound:punct("#") n:any_word() args:(l:same_line("(") a:call_arguments() r:punct(")") { (l, a, r) })? e:p() {
                let (left, arguments, right) = match args {
                    Some((l, a, r)) => (Some(l), a, Some(r)),
                    None => (None, Vec::new(), None),
                };
                Expr::MacroExpansion(Box::new(MacroExpansionExpr {
                    pound: ctx.token(pound),
                    name: ctx.token(n),
                    left_paren: ctx.opt_token(left),
                    arguments,
                    right_paren: ctx.opt_token(right),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }))
            }

        rule closure_expr() -> ClosureExpr
            = s:p() l:punct("{") sig:closure_signature()? ss:statements() r:punct("}") e:p() {
                ClosureExpr {
                    left_brace: ctx.token(l),
                    signature: sig,
                    statements: ss,
                    right_brace: ctx.token(r),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule closure_signature() -> ClosureSignature
            = s:p() caps:capture_list()? params:closure_parameters()? fx:effect_specifiers()
              rt:(punct("->") t:type_() { t })? i:kw("in") e:p() {
                ClosureSignature {
                    captures: caps.unwrap_or_default(),
                    parameters: params.unwrap_or(ClosureParameters::None),
                    effects: fx,
                    return_type: rt,
                    in_token: ctx.token(i),
                    id: ctx.next_id(),
                    span: ctx.span(s, e),
                }
            }

        rule capture_list() -> Vec<ClosureCapture>
            = punct("[") cs:comma_list(<closure_capture()>) punct("]") { ctx.listed(cs) }

        rule closure_capture() -> ClosureCapture
            = spec:(k:(kw("weak") / kw("unowned")) &ident() { k })? n:ident() init:(op("=") x:expr(true) { x })? {
                ClosureCapture { specifier: ctx.opt_token(spec), name: ctx.token(n), initializer: init, trailing_comma: None }
            }

        rule closure_parameters() -> ClosureParameters
            = punct("(") ps:comma_list_opt(<closure_parameter()>) punct(")") { ClosureParameters::Clause(ctx.listed(ps)) }
            / ps:comma_list(<shorthand_parameter()>) { ClosureParameters::Shorthand(ctx.listed(ps)) }

        rule closure_parameter() -> ClosureParameter
            = f:any_word() n:any_word()? ty:type_annotation()? {
                ClosureParameter { first_name: ctx.token(f), second_name: ctx.opt_token(n), ty, trailing_comma: None }
            }

        rule shorthand_parameter() -> ClosureShorthandParameter
            = n:(ident() / underscore()) { ClosureShorthandParameter { name: ctx.token(n), trailing_comma: None } }
    }
}
