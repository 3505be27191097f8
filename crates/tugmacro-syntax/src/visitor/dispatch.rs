// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions: pre-order `visit_*`, children in source order, post-order
//! `leave_*`.
//!
//! Every walk function returns [`VisitResult::Stop`] when traversal was halted
//! so callers can unwind; otherwise it returns [`VisitResult::Continue`].

use super::traits::{VisitResult, Visitor};
use crate::nodes::*;

/// Visit a node, descend into its children unless told otherwise, then leave.
macro_rules! visit_node {
    ($visitor:ident, $visit:ident, $leave:ident, $node:expr, $children:block) => {{
        match $visitor.$visit($node) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => $children,
        }
        $visitor.$leave($node);
        VisitResult::Continue
    }};
}

/// Propagate a `Stop` from a child walk.
macro_rules! descend {
    ($walk:expr) => {
        if $walk == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

fn walk_each<T, V: Visitor>(
    visitor: &mut V,
    items: &[T],
    walk: fn(&mut V, &T) -> VisitResult,
) -> VisitResult {
    for item in items {
        descend!(walk(visitor, item));
    }
    VisitResult::Continue
}

fn walk_opt<T, V: Visitor>(
    visitor: &mut V,
    item: Option<&T>,
    walk: fn(&mut V, &T) -> VisitResult,
) -> VisitResult {
    match item {
        Some(item) => walk(visitor, item),
        None => VisitResult::Continue,
    }
}

// ============================================================================
// Source file and declarations
// ============================================================================

pub fn walk_source_file<V: Visitor>(visitor: &mut V, node: &SourceFile) -> VisitResult {
    visit_node!(visitor, visit_source_file, leave_source_file, node, {
        descend!(walk_each(visitor, &node.statements, walk_stmt));
    })
}

pub fn walk_decl<V: Visitor>(visitor: &mut V, node: &Decl) -> VisitResult {
    visit_node!(visitor, visit_decl, leave_decl, node, {
        let result = match node {
            Decl::Struct(d) => walk_struct_decl(visitor, d),
            Decl::Class(d) => walk_class_decl(visitor, d),
            Decl::Enum(d) => walk_enum_decl(visitor, d),
            Decl::Actor(d) => walk_actor_decl(visitor, d),
            Decl::Protocol(d) => walk_protocol_decl(visitor, d),
            Decl::Extension(d) => walk_extension_decl(visitor, d),
            Decl::Variable(d) => walk_variable_decl(visitor, d),
            Decl::Function(d) => walk_function_decl(visitor, d),
            Decl::Initializer(d) => walk_initializer_decl(visitor, d),
            Decl::Deinitializer(d) => walk_deinitializer_decl(visitor, d),
            Decl::TypeAlias(d) => walk_typealias_decl(visitor, d),
            Decl::AssociatedType(d) => walk_associatedtype_decl(visitor, d),
            Decl::EnumCase(d) => walk_enum_case_decl(visitor, d),
        };
        descend!(result);
    })
}

fn walk_decl_prefix<V: Visitor>(
    visitor: &mut V,
    attributes: &[Attribute],
    modifiers: &[DeclModifier],
) -> VisitResult {
    descend!(walk_each(visitor, attributes, walk_attribute));
    walk_each(visitor, modifiers, walk_modifier)
}

fn walk_generic_clause<V: Visitor>(
    visitor: &mut V,
    clause: Option<&GenericParameterClause>,
) -> VisitResult {
    match clause {
        Some(clause) => walk_each(visitor, &clause.parameters, walk_generic_parameter),
        None => VisitResult::Continue,
    }
}

fn walk_inheritance<V: Visitor>(
    visitor: &mut V,
    clause: Option<&InheritanceClause>,
) -> VisitResult {
    if let Some(clause) = clause {
        for inherited in &clause.types {
            descend!(walk_type(visitor, &inherited.ty));
        }
    }
    VisitResult::Continue
}

fn walk_where_clause<V: Visitor>(
    visitor: &mut V,
    clause: Option<&GenericWhereClause>,
) -> VisitResult {
    if let Some(clause) = clause {
        for requirement in &clause.requirements {
            let (left, right) = match &requirement.kind {
                RequirementKind::Conformance { left, right } => (left, right),
                RequirementKind::SameType { left, right } => (left, right),
            };
            descend!(walk_type(visitor, left));
            descend!(walk_type(visitor, right));
        }
    }
    VisitResult::Continue
}

macro_rules! walk_nominal {
    ($fn_name:ident, $ty:ty, $visit:ident, $leave:ident) => {
        pub fn $fn_name<V: Visitor>(visitor: &mut V, node: &$ty) -> VisitResult {
            visit_node!(visitor, $visit, $leave, node, {
                descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
                descend!(walk_generic_clause(visitor, node.generic_parameters.as_ref()));
                descend!(walk_inheritance(visitor, node.inheritance.as_ref()));
                descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
                descend!(walk_member_block(visitor, &node.members));
            })
        }
    };
}

walk_nominal!(walk_struct_decl, StructDecl, visit_struct_decl, leave_struct_decl);
walk_nominal!(walk_class_decl, ClassDecl, visit_class_decl, leave_class_decl);
walk_nominal!(walk_enum_decl, EnumDecl, visit_enum_decl, leave_enum_decl);
walk_nominal!(walk_actor_decl, ActorDecl, visit_actor_decl, leave_actor_decl);

pub fn walk_protocol_decl<V: Visitor>(visitor: &mut V, node: &ProtocolDecl) -> VisitResult {
    visit_node!(visitor, visit_protocol_decl, leave_protocol_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_inheritance(visitor, node.inheritance.as_ref()));
        descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
        descend!(walk_member_block(visitor, &node.members));
    })
}

pub fn walk_extension_decl<V: Visitor>(visitor: &mut V, node: &ExtensionDecl) -> VisitResult {
    visit_node!(visitor, visit_extension_decl, leave_extension_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_type(visitor, &node.extended_type));
        descend!(walk_inheritance(visitor, node.inheritance.as_ref()));
        descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
        descend!(walk_member_block(visitor, &node.members));
    })
}

pub fn walk_variable_decl<V: Visitor>(visitor: &mut V, node: &VariableDecl) -> VisitResult {
    visit_node!(visitor, visit_variable_decl, leave_variable_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_each(visitor, &node.bindings, walk_pattern_binding));
    })
}

pub fn walk_function_decl<V: Visitor>(visitor: &mut V, node: &FunctionDecl) -> VisitResult {
    visit_node!(visitor, visit_function_decl, leave_function_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_generic_clause(visitor, node.generic_parameters.as_ref()));
        descend!(walk_signature(visitor, &node.signature));
        descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
        descend!(walk_opt(visitor, node.body.as_ref(), walk_code_block));
    })
}

pub fn walk_initializer_decl<V: Visitor>(visitor: &mut V, node: &InitializerDecl) -> VisitResult {
    visit_node!(visitor, visit_initializer_decl, leave_initializer_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_generic_clause(visitor, node.generic_parameters.as_ref()));
        descend!(walk_signature(visitor, &node.signature));
        descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
        descend!(walk_opt(visitor, node.body.as_ref(), walk_code_block));
    })
}

pub fn walk_deinitializer_decl<V: Visitor>(
    visitor: &mut V,
    node: &DeinitializerDecl,
) -> VisitResult {
    visit_node!(visitor, visit_deinitializer_decl, leave_deinitializer_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_opt(visitor, node.body.as_ref(), walk_code_block));
    })
}

pub fn walk_typealias_decl<V: Visitor>(visitor: &mut V, node: &TypeAliasDecl) -> VisitResult {
    visit_node!(visitor, visit_typealias_decl, leave_typealias_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_generic_clause(visitor, node.generic_parameters.as_ref()));
        descend!(walk_type(visitor, &node.aliased));
    })
}

pub fn walk_associatedtype_decl<V: Visitor>(
    visitor: &mut V,
    node: &AssociatedTypeDecl,
) -> VisitResult {
    visit_node!(visitor, visit_associatedtype_decl, leave_associatedtype_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_inheritance(visitor, node.inheritance.as_ref()));
        descend!(walk_opt(visitor, node.default_type.as_ref(), walk_type));
        descend!(walk_where_clause(visitor, node.where_clause.as_ref()));
    })
}

pub fn walk_enum_case_decl<V: Visitor>(visitor: &mut V, node: &EnumCaseDecl) -> VisitResult {
    visit_node!(visitor, visit_enum_case_decl, leave_enum_case_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        for element in &node.elements {
            if let Some(clause) = &element.parameter_clause {
                for param in &clause.parameters {
                    descend!(walk_type(visitor, &param.ty));
                    descend!(walk_opt(visitor, param.default_value.as_ref(), walk_expr));
                }
            }
            descend!(walk_opt(visitor, element.raw_value.as_ref(), walk_expr));
        }
    })
}

// ============================================================================
// Declaration parts
// ============================================================================

pub fn walk_attribute<V: Visitor>(visitor: &mut V, node: &Attribute) -> VisitResult {
    visit_node!(visitor, visit_attribute, leave_attribute, node, {})
}

pub fn walk_modifier<V: Visitor>(visitor: &mut V, node: &DeclModifier) -> VisitResult {
    visit_node!(visitor, visit_modifier, leave_modifier, node, {})
}

pub fn walk_generic_parameter<V: Visitor>(visitor: &mut V, node: &GenericParameter) -> VisitResult {
    visit_node!(visitor, visit_generic_parameter, leave_generic_parameter, node, {
        descend!(walk_opt(visitor, node.inherited_type.as_ref(), walk_type));
    })
}

pub fn walk_signature<V: Visitor>(visitor: &mut V, node: &FunctionSignature) -> VisitResult {
    descend!(walk_each(
        visitor,
        &node.parameter_clause.parameters,
        walk_function_parameter
    ));
    descend!(walk_effects(visitor, &node.effects));
    walk_opt(visitor, node.return_type.as_ref(), walk_type)
}

pub fn walk_function_parameter<V: Visitor>(
    visitor: &mut V,
    node: &FunctionParameter,
) -> VisitResult {
    visit_node!(visitor, visit_function_parameter, leave_function_parameter, node, {
        descend!(walk_each(visitor, &node.attributes, walk_attribute));
        descend!(walk_type(visitor, &node.ty));
        descend!(walk_opt(visitor, node.default_value.as_ref(), walk_expr));
    })
}

pub fn walk_effects<V: Visitor>(visitor: &mut V, node: &EffectSpecifiers) -> VisitResult {
    walk_opt(visitor, node.throws_clause.as_ref(), walk_throws_clause)
}

pub fn walk_throws_clause<V: Visitor>(visitor: &mut V, node: &ThrowsClause) -> VisitResult {
    visit_node!(visitor, visit_throws_clause, leave_throws_clause, node, {
        descend!(walk_opt(visitor, node.error_type.as_ref(), walk_type));
    })
}

pub fn walk_pattern_binding<V: Visitor>(visitor: &mut V, node: &PatternBinding) -> VisitResult {
    visit_node!(visitor, visit_pattern_binding, leave_pattern_binding, node, {
        descend!(walk_pattern(visitor, &node.pattern));
        descend!(walk_opt(visitor, node.type_annotation.as_ref(), walk_type));
        descend!(walk_opt(visitor, node.initializer.as_ref(), walk_expr));
        descend!(walk_opt(visitor, node.accessor_block.as_ref(), walk_accessor_block));
    })
}

pub fn walk_accessor_block<V: Visitor>(visitor: &mut V, node: &AccessorBlock) -> VisitResult {
    visit_node!(visitor, visit_accessor_block, leave_accessor_block, node, {
        match &node.accessors {
            Accessors::Getter(statements) => {
                descend!(walk_each(visitor, statements, walk_stmt));
            }
            Accessors::Explicit(accessors) => {
                descend!(walk_each(visitor, accessors, walk_accessor_decl));
            }
        }
    })
}

pub fn walk_accessor_decl<V: Visitor>(visitor: &mut V, node: &AccessorDecl) -> VisitResult {
    visit_node!(visitor, visit_accessor_decl, leave_accessor_decl, node, {
        descend!(walk_decl_prefix(visitor, &node.attributes, &node.modifiers));
        descend!(walk_effects(visitor, &node.effects));
        descend!(walk_opt(visitor, node.body.as_ref(), walk_code_block));
    })
}

pub fn walk_member_block<V: Visitor>(visitor: &mut V, node: &MemberBlock) -> VisitResult {
    visit_node!(visitor, visit_member_block, leave_member_block, node, {
        descend!(walk_each(visitor, &node.members, walk_decl));
    })
}

pub fn walk_code_block<V: Visitor>(visitor: &mut V, node: &CodeBlock) -> VisitResult {
    visit_node!(visitor, visit_code_block, leave_code_block, node, {
        descend!(walk_each(visitor, &node.statements, walk_stmt));
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_stmt<V: Visitor>(visitor: &mut V, node: &Stmt) -> VisitResult {
    visit_node!(visitor, visit_stmt, leave_stmt, node, {
        let result = match node {
            Stmt::Decl(d) => walk_decl(visitor, d),
            Stmt::Expr(e) => walk_expr(visitor, e),
            Stmt::Return(s) => walk_return_stmt(visitor, s),
            Stmt::Throw(s) => walk_throw_stmt(visitor, s),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Fallthrough(_) => VisitResult::Continue,
            Stmt::If(s) => walk_if_stmt(visitor, s),
            Stmt::Guard(s) => walk_guard_stmt(visitor, s),
            Stmt::For(s) => walk_for_stmt(visitor, s),
            Stmt::While(s) => walk_while_stmt(visitor, s),
            Stmt::Repeat(s) => {
                descend!(walk_code_block(visitor, &s.body));
                walk_expr(visitor, &s.condition)
            }
            Stmt::Switch(s) => walk_switch_stmt(visitor, s),
            Stmt::Do(s) => walk_do_stmt(visitor, s),
            Stmt::Defer(s) => walk_code_block(visitor, &s.body),
        };
        descend!(result);
    })
}

fn walk_conditions<V: Visitor>(visitor: &mut V, conditions: &[ConditionElement]) -> VisitResult {
    for element in conditions {
        match &element.condition {
            Condition::Expr(expr) => descend!(walk_expr(visitor, expr)),
            Condition::OptionalBinding(binding) => {
                descend!(walk_pattern(visitor, &binding.pattern));
                descend!(walk_opt(visitor, binding.type_annotation.as_ref(), walk_type));
                descend!(walk_opt(visitor, binding.initializer.as_ref(), walk_expr));
            }
            Condition::Matching(matching) => {
                descend!(walk_pattern(visitor, &matching.pattern));
                descend!(walk_expr(visitor, &matching.initializer));
            }
        }
    }
    VisitResult::Continue
}

pub fn walk_if_stmt<V: Visitor>(visitor: &mut V, node: &IfStmt) -> VisitResult {
    visit_node!(visitor, visit_if_stmt, leave_if_stmt, node, {
        descend!(walk_conditions(visitor, &node.conditions));
        descend!(walk_code_block(visitor, &node.body));
        match &node.else_branch {
            Some(ElseBranch::If(nested)) => descend!(walk_if_stmt(visitor, nested)),
            Some(ElseBranch::Block(block)) => descend!(walk_code_block(visitor, block)),
            None => {}
        }
    })
}

pub fn walk_guard_stmt<V: Visitor>(visitor: &mut V, node: &GuardStmt) -> VisitResult {
    visit_node!(visitor, visit_guard_stmt, leave_guard_stmt, node, {
        descend!(walk_conditions(visitor, &node.conditions));
        descend!(walk_code_block(visitor, &node.body));
    })
}

pub fn walk_for_stmt<V: Visitor>(visitor: &mut V, node: &ForStmt) -> VisitResult {
    visit_node!(visitor, visit_for_stmt, leave_for_stmt, node, {
        descend!(walk_pattern(visitor, &node.pattern));
        descend!(walk_opt(visitor, node.type_annotation.as_ref(), walk_type));
        descend!(walk_expr(visitor, &node.sequence));
        descend!(walk_opt(visitor, node.where_clause.as_ref(), walk_expr));
        descend!(walk_code_block(visitor, &node.body));
    })
}

pub fn walk_while_stmt<V: Visitor>(visitor: &mut V, node: &WhileStmt) -> VisitResult {
    visit_node!(visitor, visit_while_stmt, leave_while_stmt, node, {
        descend!(walk_conditions(visitor, &node.conditions));
        descend!(walk_code_block(visitor, &node.body));
    })
}

pub fn walk_switch_stmt<V: Visitor>(visitor: &mut V, node: &SwitchStmt) -> VisitResult {
    visit_node!(visitor, visit_switch_stmt, leave_switch_stmt, node, {
        descend!(walk_expr(visitor, &node.subject));
        descend!(walk_each(visitor, &node.cases, walk_switch_case));
    })
}

fn walk_case_items<V: Visitor>(visitor: &mut V, items: &[CaseItem]) -> VisitResult {
    for item in items {
        descend!(walk_pattern(visitor, &item.pattern));
        descend!(walk_opt(visitor, item.where_clause.as_ref(), walk_expr));
    }
    VisitResult::Continue
}

pub fn walk_switch_case<V: Visitor>(visitor: &mut V, node: &SwitchCase) -> VisitResult {
    visit_node!(visitor, visit_switch_case, leave_switch_case, node, {
        if let SwitchCaseLabel::Case { items, .. } = &node.label {
            descend!(walk_case_items(visitor, items));
        }
        descend!(walk_each(visitor, &node.statements, walk_stmt));
    })
}

pub fn walk_do_stmt<V: Visitor>(visitor: &mut V, node: &DoStmt) -> VisitResult {
    visit_node!(visitor, visit_do_stmt, leave_do_stmt, node, {
        descend!(walk_code_block(visitor, &node.body));
        descend!(walk_each(visitor, &node.catches, walk_catch_clause));
    })
}

pub fn walk_catch_clause<V: Visitor>(visitor: &mut V, node: &CatchClause) -> VisitResult {
    visit_node!(visitor, visit_catch_clause, leave_catch_clause, node, {
        descend!(walk_case_items(visitor, &node.items));
        descend!(walk_code_block(visitor, &node.body));
    })
}

pub fn walk_return_stmt<V: Visitor>(visitor: &mut V, node: &ReturnStmt) -> VisitResult {
    visit_node!(visitor, visit_return_stmt, leave_return_stmt, node, {
        descend!(walk_opt(visitor, node.expr.as_ref(), walk_expr));
    })
}

pub fn walk_throw_stmt<V: Visitor>(visitor: &mut V, node: &ThrowStmt) -> VisitResult {
    visit_node!(visitor, visit_throw_stmt, leave_throw_stmt, node, {
        descend!(walk_expr(visitor, &node.expr));
    })
}

// ============================================================================
// Expressions
// ============================================================================

fn walk_labeled<V: Visitor>(visitor: &mut V, items: &[LabeledExpr]) -> VisitResult {
    for item in items {
        descend!(walk_expr(visitor, &item.expr));
    }
    VisitResult::Continue
}

fn walk_generic_arguments<V: Visitor>(
    visitor: &mut V,
    clause: Option<&GenericArgumentClause>,
) -> VisitResult {
    if let Some(clause) = clause {
        for ty in clause.types() {
            descend!(walk_type(visitor, ty));
        }
    }
    VisitResult::Continue
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, node: &Expr) -> VisitResult {
    visit_node!(visitor, visit_expr, leave_expr, node, {
        let result = match node {
            Expr::DeclRef(e) => walk_decl_ref(visitor, e),
            Expr::IntegerLiteral(_)
            | Expr::FloatLiteral(_)
            | Expr::StringLiteral(_)
            | Expr::BooleanLiteral(_)
            | Expr::NilLiteral(_) => VisitResult::Continue,
            Expr::Array(e) => {
                for element in &e.elements {
                    descend!(walk_expr(visitor, &element.expr));
                }
                VisitResult::Continue
            }
            Expr::Dictionary(e) => {
                for element in &e.elements {
                    descend!(walk_expr(visitor, &element.key));
                    descend!(walk_expr(visitor, &element.value));
                }
                VisitResult::Continue
            }
            Expr::Tuple(e) => walk_labeled(visitor, &e.elements),
            Expr::MemberAccess(e) => walk_member_access(visitor, e),
            Expr::Call(e) => walk_call(visitor, e),
            Expr::Subscript(e) => {
                descend!(walk_expr(visitor, &e.base));
                walk_labeled(visitor, &e.arguments)
            }
            Expr::Binary(e) => {
                descend!(walk_expr(visitor, &e.lhs));
                walk_expr(visitor, &e.rhs)
            }
            Expr::Prefix(e) => walk_expr(visitor, &e.operand),
            Expr::Postfix(e) => walk_expr(visitor, &e.operand),
            Expr::Try(e) => walk_try_expr(visitor, e),
            Expr::Await(e) => walk_await_expr(visitor, e),
            Expr::Closure(e) => walk_closure(visitor, e),
            Expr::Ternary(e) => {
                descend!(walk_expr(visitor, &e.condition));
                descend!(walk_expr(visitor, &e.then_expr));
                walk_expr(visitor, &e.else_expr)
            }
            Expr::Cast(e) => {
                descend!(walk_expr(visitor, &e.expr));
                walk_type(visitor, &e.ty)
            }
            Expr::MacroExpansion(e) => walk_macro_expansion(visitor, e),
            Expr::Pattern(e) => walk_pattern(visitor, &e.pattern),
        };
        descend!(result);
    })
}

pub fn walk_decl_ref<V: Visitor>(visitor: &mut V, node: &DeclRefExpr) -> VisitResult {
    visit_node!(visitor, visit_decl_ref, leave_decl_ref, node, {
        descend!(walk_generic_arguments(visitor, node.generic_arguments.as_ref()));
    })
}

pub fn walk_member_access<V: Visitor>(visitor: &mut V, node: &MemberAccessExpr) -> VisitResult {
    visit_node!(visitor, visit_member_access, leave_member_access, node, {
        descend!(walk_opt(visitor, node.base.as_ref(), walk_expr));
    })
}

pub fn walk_call<V: Visitor>(visitor: &mut V, node: &FunctionCallExpr) -> VisitResult {
    visit_node!(visitor, visit_call, leave_call, node, {
        descend!(walk_expr(visitor, &node.callee));
        descend!(walk_labeled(visitor, &node.arguments));
        descend!(walk_opt(visitor, node.trailing_closure.as_ref(), walk_closure));
    })
}

pub fn walk_try_expr<V: Visitor>(visitor: &mut V, node: &TryExpr) -> VisitResult {
    visit_node!(visitor, visit_try_expr, leave_try_expr, node, {
        descend!(walk_expr(visitor, &node.expr));
    })
}

pub fn walk_await_expr<V: Visitor>(visitor: &mut V, node: &AwaitExpr) -> VisitResult {
    visit_node!(visitor, visit_await_expr, leave_await_expr, node, {
        descend!(walk_expr(visitor, &node.expr));
    })
}

pub fn walk_closure<V: Visitor>(visitor: &mut V, node: &ClosureExpr) -> VisitResult {
    visit_node!(visitor, visit_closure, leave_closure, node, {
        if let Some(signature) = &node.signature {
            for capture in &signature.captures {
                descend!(walk_opt(visitor, capture.initializer.as_ref(), walk_expr));
            }
            if let ClosureParameters::Clause(params) = &signature.parameters {
                for param in params {
                    descend!(walk_opt(visitor, param.ty.as_ref(), walk_type));
                }
            }
            descend!(walk_effects(visitor, &signature.effects));
            descend!(walk_opt(visitor, signature.return_type.as_ref(), walk_type));
        }
        descend!(walk_each(visitor, &node.statements, walk_stmt));
    })
}

pub fn walk_macro_expansion<V: Visitor>(
    visitor: &mut V,
    node: &MacroExpansionExpr,
) -> VisitResult {
    visit_node!(visitor, visit_macro_expansion, leave_macro_expansion, node, {
        descend!(walk_labeled(visitor, &node.arguments));
    })
}

// ============================================================================
// Patterns and types
// ============================================================================

pub fn walk_pattern<V: Visitor>(visitor: &mut V, node: &Pattern) -> VisitResult {
    visit_node!(visitor, visit_pattern, leave_pattern, node, {
        let result = match node {
            Pattern::Identifier(_) | Pattern::Wildcard(_) => VisitResult::Continue,
            Pattern::Tuple(tuple) => {
                for element in &tuple.elements {
                    descend!(walk_pattern(visitor, &element.pattern));
                }
                VisitResult::Continue
            }
            Pattern::ValueBinding(binding) => walk_pattern(visitor, &binding.pattern),
            Pattern::Expression(expr) => walk_expr(visitor, &expr.expr),
            Pattern::IsType(is_type) => walk_type(visitor, &is_type.ty),
        };
        descend!(result);
    })
}

pub fn walk_type<V: Visitor>(visitor: &mut V, node: &TypeNode) -> VisitResult {
    visit_node!(visitor, visit_type_node, leave_type_node, node, {
        let result = match node {
            TypeNode::Identifier(t) => walk_generic_arguments(visitor, t.generic_arguments.as_ref()),
            TypeNode::Member(t) => {
                descend!(walk_type(visitor, &t.base));
                walk_generic_arguments(visitor, t.generic_arguments.as_ref())
            }
            TypeNode::Optional(t) | TypeNode::ImplicitlyUnwrapped(t) => {
                walk_type(visitor, &t.wrapped)
            }
            TypeNode::Array(t) => walk_type(visitor, &t.element),
            TypeNode::Dictionary(t) => {
                descend!(walk_type(visitor, &t.key));
                walk_type(visitor, &t.value)
            }
            TypeNode::Tuple(t) => walk_tuple_type(visitor, t),
            TypeNode::Function(t) => {
                descend!(walk_tuple_type(visitor, &t.parameters));
                descend!(walk_effects(visitor, &t.effects));
                walk_type(visitor, &t.return_type)
            }
            TypeNode::Attributed(t) => {
                descend!(walk_each(visitor, &t.attributes, walk_attribute));
                walk_type(visitor, &t.base)
            }
            TypeNode::Composition(t) => walk_each(visitor, &t.elements, walk_type),
            TypeNode::SomeOrAny(t) => walk_type(visitor, &t.constraint),
            TypeNode::PackExpansion(t) | TypeNode::PackElement(t) => walk_type(visitor, &t.base),
        };
        descend!(result);
    })
}

fn walk_tuple_type<V: Visitor>(visitor: &mut V, node: &TupleType) -> VisitResult {
    for element in &node.elements {
        descend!(walk_type(visitor, &element.ty));
    }
    VisitResult::Continue
}
