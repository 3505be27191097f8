// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Readers
// ============================================================================

use tugmacro::reader::{
    analyze_bindings, ActorReader, AssociatedTypeReader, AssociatedValue, AttributeReader,
    AttributeView, Binding, BraceReader, ClassReader, CodeBlockReader, DeclGroup, EffectReader,
    EnumCase, EnumReader, ExprReader, ExtensionReader, FunctionReader, GenericParameterReader,
    GenericParameterRef, GroupReader, InheritanceReader, InitializerReader, MemberBlockReader,
    Modifier, ModifierReader, NamedReader, Parameter, ParenReader, ProtocolReader, Reader,
    SignatureReader, StructReader, TrailingCommaReader, TypeAliasReader, TypeReader,
    VariableReader, Visibility, WhereClauseReader,
};

// ============================================================================
// Builders and descriptors
// ============================================================================

use tugmacro::builder::{
    actor_decl, array, assign, call, class_decl, closure, computed_property, defer_stmt,
    dictionary, do_catch, enum_decl, expr_stmt, extension_decl, for_in, for_in_where, function,
    guard_stmt, if_stmt, initializer, literal, member, memberwise_initializer, protocol_decl,
    return_value, return_void, struct_decl, switch_stmt, throw_stmt, typealias, while_loop, Arg,
    CaseSpec, Catch, DoCatchBuilder, Effects, FunctionSignatureBuilder, GenericParam,
    GroupBuilder, IfBuilder, InitializerBuilder, Literal, Param, ReturningFunction,
    SwitchBuilder, Template, TypeAliasBuilder, TypeRef, VariableBuilder,
};

#[allow(deprecated)]
use tugmacro::builder::function_with_tuple_params;

// ============================================================================
// Diagnostics, errors, interpolation
// ============================================================================

use tugmacro::diagnostics::{
    apply_fix_its, render_diagnostic, Diagnostic, DiagnosticBuilder, DiagnosticCollector,
    DiagnosticSink, FixIt, Note, Severity,
};
use tugmacro::error::{MacroError, MacroResult};
use tugmacro::interpolate;
use tugmacro::interpolation::{splice, Interpolate};

// ============================================================================
// Expansion
// ============================================================================

use tugmacro::expansion::{
    expand_body, expand_members, wrap_body, BodyMacro, BodyTarget, Expansion, ExpansionContext,
    MemberMacro,
};

// Crate-root re-exports
use tugmacro::{
    Diagnostic as RootDiagnostic, DiagnosticBuilder as RootDiagnosticBuilder,
    Interpolate as RootInterpolate, MacroError as RootMacroError,
};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // This test exists only to verify imports compile.
    // If you're here because this test broke, you may have
    // accidentally removed a public re-export.
    let _ = std::any::type_name::<StructReader<'static>>();
    let _ = std::any::type_name::<Binding<'static>>();
    let _ = std::any::type_name::<GroupBuilder>();
    let _ = std::any::type_name::<Diagnostic>();
    let _ = std::any::type_name::<MacroError>();
    let _ = std::any::type_name::<ExpansionContext>();
    let _ = std::any::type_name::<Expansion<Vec<tugmacro_syntax::Decl>>>();
}

#[test]
fn macro_traits_are_object_safe() {
    fn _members(_: &dyn MemberMacro) {}
    fn _body(_: &dyn BodyMacro) {}
    fn _sink(_: &mut dyn DiagnosticSink) {}
}
