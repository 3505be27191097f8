// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for syntax tree traversal.

use crate::nodes::{
    AccessorBlock, AccessorDecl, ActorDecl, AssociatedTypeDecl, Attribute, AwaitExpr,
    CatchClause, ClassDecl, ClosureExpr, CodeBlock, Decl, DeclModifier, DeclRefExpr,
    DeinitializerDecl, DoStmt, EnumCaseDecl, EnumDecl, Expr, ExtensionDecl, ForStmt,
    FunctionCallExpr, FunctionDecl, FunctionParameter, GenericParameter, GuardStmt, IfStmt,
    InitializerDecl, MacroExpansionExpr, MemberAccessExpr, MemberBlock, Pattern, PatternBinding,
    ProtocolDecl, ReturnStmt, SourceFile, Stmt, StructDecl, SwitchCase, SwitchStmt, ThrowStmt,
    ThrowsClause, TryExpr, TypeAliasDecl, TypeNode, VariableDecl, WhileStmt,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods are called.
    Stop,
}

/// Generates pairs of `visit_*` and `leave_*` methods with default
/// implementations that return `VisitResult::Continue` and do nothing.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after children, even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Immutable visitor for syntax tree traversal.
///
/// `visit_*` is called in pre-order and `leave_*` in post-order. Children are
/// visited in source order. Enum-level hooks (`visit_decl`, `visit_stmt`,
/// `visit_expr`, `visit_pattern`, `visit_type_node`) run before the hook for
/// the concrete node kind.
///
/// # Example
///
/// ```
/// use tugmacro_syntax::visitor::{walk_expr, VisitResult, Visitor};
/// use tugmacro_syntax::{parse_expr, DeclRefExpr};
///
/// struct NameCounter {
///     count: usize,
/// }
///
/// impl Visitor for NameCounter {
///     fn visit_decl_ref(&mut self, _node: &DeclRefExpr) -> VisitResult {
///         self.count += 1;
///         VisitResult::Continue
///     }
/// }
///
/// let expr = parse_expr("a + b * c").expect("parse error");
/// let mut counter = NameCounter { count: 0 };
/// walk_expr(&mut counter, &expr);
/// assert_eq!(counter.count, 3);
/// ```
pub trait Visitor {
    visitor_methods! {
        source_file: SourceFile,
    }

    // Declarations
    visitor_methods! {
        decl: Decl,
        struct_decl: StructDecl,
        class_decl: ClassDecl,
        enum_decl: EnumDecl,
        actor_decl: ActorDecl,
        protocol_decl: ProtocolDecl,
        extension_decl: ExtensionDecl,
        variable_decl: VariableDecl,
        function_decl: FunctionDecl,
        initializer_decl: InitializerDecl,
        deinitializer_decl: DeinitializerDecl,
        typealias_decl: TypeAliasDecl,
        associatedtype_decl: AssociatedTypeDecl,
        enum_case_decl: EnumCaseDecl,
    }

    // Declaration parts
    visitor_methods! {
        attribute: Attribute,
        modifier: DeclModifier,
        generic_parameter: GenericParameter,
        function_parameter: FunctionParameter,
        throws_clause: ThrowsClause,
        pattern_binding: PatternBinding,
        accessor_block: AccessorBlock,
        accessor_decl: AccessorDecl,
        member_block: MemberBlock,
        code_block: CodeBlock,
    }

    // Statements
    visitor_methods! {
        stmt: Stmt,
        if_stmt: IfStmt,
        guard_stmt: GuardStmt,
        for_stmt: ForStmt,
        while_stmt: WhileStmt,
        switch_stmt: SwitchStmt,
        switch_case: SwitchCase,
        do_stmt: DoStmt,
        catch_clause: CatchClause,
        return_stmt: ReturnStmt,
        throw_stmt: ThrowStmt,
    }

    // Expressions
    visitor_methods! {
        expr: Expr,
        decl_ref: DeclRefExpr,
        member_access: MemberAccessExpr,
        call: FunctionCallExpr,
        closure: ClosureExpr,
        try_expr: TryExpr,
        await_expr: AwaitExpr,
        macro_expansion: MacroExpansionExpr,
    }

    // Patterns and types
    visitor_methods! {
        pattern: Pattern,
        type_node: TypeNode,
    }
}
