// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Splicing readers and descriptors into templates.
//!
//! Builders assemble source text and parse it back. [`Interpolate`] gives
//! every domain value the text it should contribute to such a template, so a
//! template can mention a property or a parameter directly instead of
//! digging out the right string by hand:
//!
//! | value | renders as |
//! |---|---|
//! | declaration reader, binding, enum case, generic parameter | its name |
//! | parameter | its local name, not the call-site label |
//! | `Visibility` | keyword and a trailing space, e.g. `"public "` |
//! | `None` | nothing |
//! | type, expression or syntax node | its source text |
//!
//! ```
//! use tugmacro::interpolate;
//! use tugmacro::reader::{FunctionReader, SignatureReader, Visibility};
//! use tugmacro_syntax::parse_decl;
//!
//! let decl = parse_decl("func move(to point: Point) {}").unwrap();
//! let function = FunctionReader::new(&decl).unwrap();
//! let param = &function.parameters()[0];
//! let text = interpolate!("{}func {}() {{ print({}) }}", Some(Visibility::Public), function, param);
//! assert_eq!(text, "public func move() { print(point) }");
//! ```

use std::fmt;

use tugmacro_syntax::{Codegen, Decl, Expr, Pattern, Stmt, SyntaxElement, Token, TypeNode};

use crate::reader::{
    ActorReader, AssociatedTypeReader, Binding, ClassReader, DeclGroup, EnumCase, EnumReader,
    ExprReader, ExtensionReader, FunctionReader, GenericParameterRef, InitializerReader, Modifier,
    NamedReader, Parameter, ProtocolReader, Reader, StructReader, TypeAliasReader, TypeReader,
    Visibility,
};

/// The text a value contributes when spliced into a template.
pub trait Interpolate {
    fn interpolation(&self) -> String;
}

/// A [`Display`](fmt::Display) adapter over an [`Interpolate`] value, for
/// use with `format!`.
pub struct Splice<'t, T: ?Sized>(&'t T);

pub fn splice<T: Interpolate + ?Sized>(value: &T) -> Splice<'_, T> {
    Splice(value)
}

impl<T: Interpolate + ?Sized> fmt::Display for Splice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.interpolation())
    }
}

/// `format!` with every positional argument rendered through
/// [`Interpolate`].
#[macro_export]
macro_rules! interpolate {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        format!($fmt $(, $crate::interpolation::splice(&$arg))*)
    };
}

impl<T: Interpolate + ?Sized> Interpolate for &T {
    fn interpolation(&self) -> String {
        (**self).interpolation()
    }
}

impl<T: Interpolate> Interpolate for Option<T> {
    fn interpolation(&self) -> String {
        self.as_ref().map(Interpolate::interpolation).unwrap_or_default()
    }
}

impl Interpolate for str {
    fn interpolation(&self) -> String {
        self.to_string()
    }
}

impl Interpolate for String {
    fn interpolation(&self) -> String {
        self.clone()
    }
}

macro_rules! interpolate_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Interpolate for $ty {
                fn interpolation(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

interpolate_display!(bool, i32, i64, u32, u64, usize, f64);

// ============================================================================
// Access
// ============================================================================

impl Interpolate for Visibility {
    fn interpolation(&self) -> String {
        format!("{} ", self.keyword())
    }
}

impl Interpolate for Modifier {
    fn interpolation(&self) -> String {
        format!("{} ", self.keyword())
    }
}

impl Interpolate for [Modifier] {
    fn interpolation(&self) -> String {
        self.iter().map(Interpolate::interpolation).collect()
    }
}

// ============================================================================
// Readers
// ============================================================================

macro_rules! interpolate_name {
    ($($reader:ident),* $(,)?) => {
        $(
            impl Interpolate for $reader<'_> {
                fn interpolation(&self) -> String {
                    self.name().to_string()
                }
            }
        )*
    };
}

interpolate_name!(
    StructReader,
    ClassReader,
    EnumReader,
    ActorReader,
    ProtocolReader,
    FunctionReader,
    TypeAliasReader,
    AssociatedTypeReader,
    GenericParameterRef,
    EnumCase,
    Binding,
    ExtensionReader,
    DeclGroup,
);

impl Interpolate for InitializerReader<'_> {
    fn interpolation(&self) -> String {
        "init".to_string()
    }
}

impl Interpolate for Parameter<'_> {
    fn interpolation(&self) -> String {
        self.local_name().to_string()
    }
}

impl Interpolate for TypeReader<'_> {
    fn interpolation(&self) -> String {
        self.text()
    }
}

impl Interpolate for ExprReader<'_> {
    fn interpolation(&self) -> String {
        self.text()
    }
}

// ============================================================================
// Syntax nodes
// ============================================================================

macro_rules! interpolate_source {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Interpolate for $ty {
                fn interpolation(&self) -> String {
                    self.to_source()
                }
            }
        )*
    };
}

interpolate_source!(Token, Decl, Stmt, Expr, TypeNode, Pattern, SyntaxElement);
