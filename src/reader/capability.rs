// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Capability readers.
//!
//! Each trait here has one required method exposing a piece of structure and
//! a set of provided accessors built on it. A blanket impl grants the trait to
//! every [`Reader`] whose node implements the matching `Has*` trait from the
//! syntax crate, so capabilities are checked at compile time.

use tugmacro_syntax::visitor::EffectScanner;
use tugmacro_syntax::{
    Attribute, CodeBlock, CodegenState, Decl, DeclModifier, EffectSpecifiers, FunctionSignature,
    GenericParameterClause, GenericWhereClause, HasAttributes, HasBraces, HasCodeBlock,
    HasEffectSpecifiers, HasGenericParameters, HasGenericWhereClause, HasInheritanceClause,
    HasMemberBlock, HasModifiers, HasName, HasParens, HasSignature, HasTrailingComma,
    InheritanceClause, MemberBlock, ParameterClause, RequirementKind, Stmt, Token,
};

use crate::reader::access::{Modifier, Visibility};
use crate::reader::attribute::AttributeView;
use crate::reader::binding::Binding;
use crate::reader::decl::{DeclGroup, FunctionReader, InitializerReader, VariableReader};
use crate::reader::generics::GenericParameterRef;
use crate::reader::parameter::Parameter;
use crate::reader::types::TypeReader;
use crate::reader::Reader;

// ============================================================================
// Names, attributes and modifiers
// ============================================================================

pub trait NamedReader<'a> {
    fn name_token(&self) -> &'a Token;

    fn name(&self) -> &'a str {
        self.name_token().text()
    }
}

impl<'a, R> NamedReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasName,
{
    fn name_token(&self) -> &'a Token {
        HasName::name_token(self.node())
    }
}

pub trait AttributeReader<'a> {
    fn attribute_list(&self) -> &'a [Attribute];

    fn attributes(&self) -> Vec<AttributeView<'a>> {
        self.attribute_list()
            .iter()
            .map(AttributeView::from_node)
            .collect()
    }

    /// The first attribute with `name`, written with or without the `@`.
    fn attribute(&self, name: &str) -> Option<AttributeView<'a>> {
        let name = name.strip_prefix('@').unwrap_or(name);
        self.attribute_list()
            .iter()
            .find(|a| a.name.is(name))
            .map(AttributeView::from_node)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

impl<'a, R> AttributeReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasAttributes,
{
    fn attribute_list(&self) -> &'a [Attribute] {
        HasAttributes::attributes(self.node())
    }
}

/// Access level, setter access level and the modifier flags.
pub trait ModifierReader<'a> {
    fn modifier_list(&self) -> &'a [DeclModifier];

    /// The declared access level, or `None` when the default applies.
    fn visibility(&self) -> Option<Visibility> {
        self.modifier_list()
            .iter()
            .filter(|m| m.detail.is_none())
            .find_map(|m| Visibility::from_keyword(m.name.text()))
    }

    /// The access level of the setter, as in `private(set)`.
    fn setter_visibility(&self) -> Option<Visibility> {
        self.modifier_list()
            .iter()
            .filter(|m| m.detail_text() == Some("set"))
            .find_map(|m| Visibility::from_keyword(m.name.text()))
    }

    fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifier_list()
            .iter()
            .any(|m| m.name.is(modifier.keyword()))
    }

    fn modifier_names(&self) -> Vec<&'a str> {
        self.modifier_list().iter().map(|m| m.name.text()).collect()
    }

    fn is_static(&self) -> bool {
        self.has_modifier(Modifier::Static)
    }

    fn is_class_member(&self) -> bool {
        self.has_modifier(Modifier::Class)
    }

    /// `static` or `class`.
    fn is_type_member(&self) -> bool {
        self.is_static() || self.is_class_member()
    }

    fn is_final(&self) -> bool {
        self.has_modifier(Modifier::Final)
    }

    fn is_lazy(&self) -> bool {
        self.has_modifier(Modifier::Lazy)
    }

    fn is_weak(&self) -> bool {
        self.has_modifier(Modifier::Weak)
    }

    fn is_unowned(&self) -> bool {
        self.has_modifier(Modifier::Unowned)
    }

    fn is_mutating(&self) -> bool {
        self.has_modifier(Modifier::Mutating)
    }

    fn is_nonmutating(&self) -> bool {
        self.has_modifier(Modifier::Nonmutating)
    }

    fn is_optional_requirement(&self) -> bool {
        self.has_modifier(Modifier::Optional)
    }

    fn is_nonisolated(&self) -> bool {
        self.has_modifier(Modifier::Nonisolated)
    }

    fn is_override(&self) -> bool {
        self.has_modifier(Modifier::Override)
    }

    fn is_required(&self) -> bool {
        self.has_modifier(Modifier::Required)
    }

    fn is_convenience(&self) -> bool {
        self.has_modifier(Modifier::Convenience)
    }

    fn is_dynamic(&self) -> bool {
        self.has_modifier(Modifier::Dynamic)
    }

    fn is_indirect(&self) -> bool {
        self.has_modifier(Modifier::Indirect)
    }

    fn is_distributed(&self) -> bool {
        self.has_modifier(Modifier::Distributed)
    }

    fn is_consuming(&self) -> bool {
        self.has_modifier(Modifier::Consuming)
    }

    fn is_borrowing(&self) -> bool {
        self.has_modifier(Modifier::Borrowing)
    }
}

impl<'a, R> ModifierReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasModifiers,
{
    fn modifier_list(&self) -> &'a [DeclModifier] {
        HasModifiers::modifiers(self.node())
    }
}

// ============================================================================
// Generics and inheritance
// ============================================================================

pub trait GenericParameterReader<'a> {
    fn generic_clause(&self) -> Option<&'a GenericParameterClause>;

    fn generic_parameters(&self) -> Vec<GenericParameterRef<'a>> {
        self.generic_clause()
            .map(|clause| {
                clause
                    .parameters
                    .iter()
                    .map(GenericParameterRef::from_node)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn generic_parameter_names(&self) -> Vec<&'a str> {
        self.generic_clause()
            .map(|clause| clause.parameters.iter().map(|p| p.name.text()).collect())
            .unwrap_or_default()
    }

    fn is_generic(&self) -> bool {
        self.generic_clause().is_some()
    }
}

impl<'a, R> GenericParameterReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasGenericParameters,
{
    fn generic_clause(&self) -> Option<&'a GenericParameterClause> {
        HasGenericParameters::generic_parameter_clause(self.node())
    }
}

pub trait WhereClauseReader<'a> {
    fn where_clause(&self) -> Option<&'a GenericWhereClause>;

    /// Each requirement as `T: P` or `T == U`, without separators.
    fn where_requirements(&self) -> Vec<String> {
        use tugmacro_syntax::Codegen;

        self.where_clause()
            .map(|clause| {
                clause
                    .requirements
                    .iter()
                    .map(|r| match &r.kind {
                        RequirementKind::Conformance { left, right } => {
                            format!("{}: {}", left.to_source(), right.to_source())
                        }
                        RequirementKind::SameType { left, right } => {
                            format!("{} == {}", left.to_source(), right.to_source())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<'a, R> WhereClauseReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasGenericWhereClause,
{
    fn where_clause(&self) -> Option<&'a GenericWhereClause> {
        HasGenericWhereClause::generic_where_clause(self.node())
    }
}

pub trait InheritanceReader<'a> {
    fn inheritance(&self) -> Option<&'a InheritanceClause>;

    fn inherited_types(&self) -> Vec<TypeReader<'a>> {
        self.inheritance()
            .map(|clause| {
                clause
                    .types
                    .iter()
                    .map(|t| TypeReader::from_node(&t.ty))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn inherited_type_names(&self) -> Vec<String> {
        self.inherited_types().iter().map(|t| t.text()).collect()
    }

    /// Whether `name` appears in the inheritance clause, either as written or
    /// by its unqualified base name.
    fn inherits(&self, name: &str) -> bool {
        self.inherited_types()
            .iter()
            .any(|t| t.text() == name || t.base_name().as_deref() == Some(name))
    }
}

impl<'a, R> InheritanceReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasInheritanceClause,
{
    fn inheritance(&self) -> Option<&'a InheritanceClause> {
        HasInheritanceClause::inheritance_clause(self.node())
    }
}

// ============================================================================
// Members and bodies
// ============================================================================

pub trait MemberBlockReader<'a> {
    fn member_block(&self) -> &'a MemberBlock;

    fn members(&self) -> &'a [Decl] {
        &self.member_block().members
    }

    fn variables(&self) -> Vec<VariableReader<'a>> {
        self.members().iter().filter_map(VariableReader::new).collect()
    }

    /// Every binding of every member variable, in source order.
    fn properties(&self) -> Vec<Binding<'a>> {
        self.variables().iter().flat_map(|v| v.bindings()).collect()
    }

    /// Instance properties with storage: no getter and no `static`/`class`.
    fn stored_properties(&self) -> Vec<Binding<'a>> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_stored() && !p.is_type_member())
            .collect()
    }

    fn functions(&self) -> Vec<FunctionReader<'a>> {
        self.members().iter().filter_map(FunctionReader::new).collect()
    }

    fn initializers(&self) -> Vec<InitializerReader<'a>> {
        self.members()
            .iter()
            .filter_map(InitializerReader::new)
            .collect()
    }

    fn nested_types(&self) -> Vec<DeclGroup<'a>> {
        self.members().iter().filter_map(DeclGroup::new).collect()
    }
}

impl<'a, R> MemberBlockReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasMemberBlock,
{
    fn member_block(&self) -> &'a MemberBlock {
        HasMemberBlock::member_block(self.node())
    }
}

pub trait CodeBlockReader<'a> {
    fn body_block(&self) -> Option<&'a CodeBlock>;

    fn has_body(&self) -> bool {
        self.body_block().is_some()
    }

    /// Statements of the body, empty when there is none.
    fn body_statements(&self) -> &'a [Stmt] {
        self.body_block()
            .map(|b| b.statements.as_slice())
            .unwrap_or_default()
    }

    /// Whether the body awaits, outside nested closures and declarations.
    fn contains_await(&self) -> bool {
        self.body_block()
            .is_some_and(|b| EffectScanner::scan_block(b).has_await)
    }

    /// Whether the body tries, outside nested closures and declarations.
    fn contains_try(&self) -> bool {
        self.body_block()
            .is_some_and(|b| EffectScanner::scan_block(b).has_try)
    }
}

impl<'a, R> CodeBlockReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasCodeBlock,
{
    fn body_block(&self) -> Option<&'a CodeBlock> {
        HasCodeBlock::body(self.node())
    }
}

// ============================================================================
// Signatures and effects
// ============================================================================

pub trait SignatureReader<'a> {
    fn function_signature(&self) -> &'a FunctionSignature;

    fn parameter_clause(&self) -> &'a ParameterClause {
        &self.function_signature().parameter_clause
    }

    fn parameters(&self) -> Vec<Parameter<'a>> {
        self.parameter_clause()
            .parameters
            .iter()
            .map(Parameter::from_node)
            .collect()
    }

    fn return_type(&self) -> Option<TypeReader<'a>> {
        self.function_signature()
            .return_type
            .as_ref()
            .map(TypeReader::from_node)
    }

    /// No return clause, or a return type of `Void` or `()`.
    fn returns_void(&self) -> bool {
        self.return_type().is_none_or(|t| t.is_void())
    }
}

impl<'a, R> SignatureReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasSignature,
{
    fn function_signature(&self) -> &'a FunctionSignature {
        HasSignature::signature(self.node())
    }
}

pub trait EffectReader<'a> {
    fn effects(&self) -> Option<&'a EffectSpecifiers>;

    fn is_async(&self) -> bool {
        self.effects().is_some_and(|e| e.async_specifier.is_some())
    }

    /// `throws`, `throws(E)` or `rethrows`.
    fn is_throwing(&self) -> bool {
        self.effects().is_some_and(|e| e.throws_clause.is_some())
    }

    fn is_rethrowing(&self) -> bool {
        self.effects()
            .and_then(|e| e.throws_clause.as_ref())
            .is_some_and(|t| t.throws_token.is("rethrows"))
    }

    /// The error type of a typed `throws(E)`.
    fn thrown_type(&self) -> Option<TypeReader<'a>> {
        self.effects()
            .and_then(|e| e.throws_clause.as_ref())
            .and_then(|t| t.error_type.as_ref())
            .map(TypeReader::from_node)
    }
}

impl<'a, R> EffectReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasEffectSpecifiers,
{
    fn effects(&self) -> Option<&'a EffectSpecifiers> {
        HasEffectSpecifiers::effect_specifiers(self.node())
    }
}

// ============================================================================
// Delimiters and separators
// ============================================================================

/// Strip the leading newline and one level of indentation from rendered
/// block lines.
fn dedent_block_lines(rendered: &str, indent: &str) -> String {
    rendered
        .strip_prefix('\n')
        .unwrap_or(rendered)
        .lines()
        .map(|line| line.strip_prefix(indent).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub trait BraceReader<'a> {
    fn left_brace(&self) -> &'a Token;

    fn right_brace(&self) -> &'a Token;

    /// The text between the braces, one item per line, without the block's
    /// own indentation.
    fn brace_contents(&self) -> String;
}

impl<'a, R> BraceReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasBraces,
{
    fn left_brace(&self) -> &'a Token {
        HasBraces::left_brace(self.node())
    }

    fn right_brace(&self) -> &'a Token {
        HasBraces::right_brace(self.node())
    }

    fn brace_contents(&self) -> String {
        let mut state = CodegenState::default();
        self.node().codegen_brace_contents(&mut state);
        dedent_block_lines(state.tokens.trim_start_matches(' '), &state.default_indent)
    }
}

pub trait ParenReader<'a> {
    fn left_paren(&self) -> &'a Token;

    fn right_paren(&self) -> &'a Token;

    /// The text between the parentheses.
    fn paren_contents(&self) -> String;
}

impl<'a, R> ParenReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasParens,
{
    fn left_paren(&self) -> &'a Token {
        HasParens::left_paren(self.node())
    }

    fn right_paren(&self) -> &'a Token {
        HasParens::right_paren(self.node())
    }

    fn paren_contents(&self) -> String {
        let mut state = CodegenState::default();
        self.node().codegen_paren_contents(&mut state);
        state.tokens
    }
}

pub trait TrailingCommaReader<'a> {
    fn trailing_comma(&self) -> Option<&'a Token>;

    fn has_trailing_comma(&self) -> bool {
        self.trailing_comma().is_some()
    }
}

impl<'a, R> TrailingCommaReader<'a> for R
where
    R: Reader<'a>,
    R::Node: HasTrailingComma,
{
    fn trailing_comma(&self) -> Option<&'a Token> {
        HasTrailingComma::trailing_comma(self.node())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{FunctionReader, NodeReader, StructReader};
    use tugmacro_syntax::parse_decl;

    #[test]
    fn modifiers_and_setter_visibility() {
        let decl = parse_decl("public private(set) static var count: Int = 0").unwrap();
        let var = VariableReader::new(&decl).unwrap();
        assert_eq!(var.visibility(), Some(Visibility::Public));
        assert_eq!(var.setter_visibility(), Some(Visibility::Private));
        assert!(var.is_static());
        assert!(var.is_type_member());
        assert!(!var.is_lazy());
        assert_eq!(var.modifier_names(), ["public", "private", "static"]);
    }

    #[test]
    fn no_visibility_is_none() {
        let decl = parse_decl("final class Cache {}").unwrap();
        let reader = crate::reader::ClassReader::new(&decl).unwrap();
        assert_eq!(reader.visibility(), None);
        assert!(reader.is_final());
    }

    #[test]
    fn attributes_by_name() {
        let decl = parse_decl("@MainActor @available(iOS 17, *) struct Model {}").unwrap();
        let reader = StructReader::new(&decl).unwrap();
        assert!(reader.has_attribute("MainActor"));
        assert!(reader.has_attribute("@available"));
        assert!(!reader.has_attribute("Observable"));
        let names: Vec<_> = reader.attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, ["MainActor", "available"]);
    }

    #[test]
    fn generics_where_and_inheritance() {
        let decl =
            parse_decl("struct Pair<A: Hashable, B>: Equatable, Swift.Sendable where B: Codable {}")
                .unwrap();
        let reader = StructReader::new(&decl).unwrap();
        assert_eq!(reader.generic_parameter_names(), ["A", "B"]);
        assert!(reader.is_generic());
        assert_eq!(reader.where_requirements(), ["B: Codable"]);
        assert_eq!(
            reader.inherited_type_names(),
            ["Equatable", "Swift.Sendable"]
        );
        assert!(reader.inherits("Equatable"));
        assert!(reader.inherits("Sendable"));
        assert!(!reader.inherits("Codable"));
    }

    #[test]
    fn member_partitions() {
        let decl = parse_decl(
            "struct S {\n    static let shared = S()\n    var a: Int\n    var b: Int { a * 2 }\n    init() { a = 0 }\n    func f() {}\n    enum Kind {}\n}",
        )
        .unwrap();
        let reader = StructReader::new(&decl).unwrap();
        assert_eq!(reader.members().len(), 6);
        assert_eq!(reader.properties().len(), 3);
        let stored: Vec<_> = reader
            .stored_properties()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(stored, ["a"]);
        assert_eq!(reader.functions().len(), 1);
        assert_eq!(reader.initializers().len(), 1);
        assert_eq!(reader.nested_types().len(), 1);
    }

    #[test]
    fn effects_and_body_scanning() {
        let decl = parse_decl(
            "func load(id: Int) async throws(LoadError) -> Data {\n    let x = { try await other() }\n    return try await fetch(id)\n}",
        )
        .unwrap();
        let function = FunctionReader::new(&decl).unwrap();
        assert!(function.is_async());
        assert!(function.is_throwing());
        assert!(!function.is_rethrowing());
        assert_eq!(function.thrown_type().unwrap().text(), "LoadError");
        assert!(function.contains_await());
        assert!(function.contains_try());
        assert_eq!(function.body_statements().len(), 2);
        assert!(!function.returns_void());
    }

    #[test]
    fn closure_only_effects_are_not_counted() {
        let decl = parse_decl("func f() {\n    let x = { try await g() }\n}").unwrap();
        let function = FunctionReader::new(&decl).unwrap();
        assert!(!function.contains_await());
        assert!(!function.contains_try());
        assert!(function.returns_void());
    }

    #[test]
    fn brace_and_paren_contents() {
        let decl = parse_decl("func f(a: Int, b c: String) {\n    if a > 0 {\n        g()\n    }\n    h()\n}").unwrap();
        let function = FunctionReader::new(&decl).unwrap();
        let clause = NodeReader::new(function.parameter_clause());
        assert_eq!(clause.paren_contents(), "a: Int, b c: String");
        assert_eq!(clause.left_paren().text(), "(");
        let body = NodeReader::new(function.body_block().unwrap());
        assert_eq!(body.brace_contents(), "if a > 0 {\n    g()\n}\nh()");
        assert_eq!(body.right_brace().text(), "}");
    }

    #[test]
    fn trailing_commas() {
        let decl = parse_decl("func g(a: Int, b: Int) {}").unwrap();
        let function = FunctionReader::new(&decl).unwrap();
        let flags: Vec<_> = function
            .parameters()
            .iter()
            .map(|p| p.has_trailing_comma())
            .collect();
        assert_eq!(flags, [true, false]);
    }
}
