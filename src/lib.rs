// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tugmacro: typed readers and composable builders for declaration macros
//!
//! A macro receives a parsed declaration, decides what to generate, and
//! hands new syntax back to its host. This crate covers the middle of that
//! flow:
//!
//! - **Readers** ([`reader`]) wrap borrowed nodes and answer questions:
//!   visibility, members, bindings, cases, parameters, effects. Wrong-kind
//!   constructors return `None`.
//! - **Builders** ([`builder`]) assemble new declarations, statements and
//!   expressions from descriptors, parsing the result so malformed output is
//!   an error, not a tree.
//! - **Diagnostics** ([`diagnostics`]) attach positioned errors, warnings and
//!   notes with Fix-Its.
//! - **Interpolation** ([`interpolation`]) splices readers and descriptors
//!   into templates by name.
//! - **Expansion** ([`expansion`]) runs member and body macros with a
//!   context carrying options, diagnostics and unique names.
//!
//! ```
//! use tugmacro::builder::memberwise_initializer;
//! use tugmacro::reader::{MemberBlockReader, StructReader};
//! use tugmacro_syntax::{parse_decl, Codegen};
//!
//! let decl = parse_decl("struct User {\n    let name: String\n    var age: Int\n}").unwrap();
//! let user = StructReader::new(&decl).unwrap();
//! let init = memberwise_initializer(&user.stored_properties(), None).unwrap();
//! assert_eq!(
//!     init.to_source(),
//!     "init(name: String, age: Int) {\n    self.name = name\n    self.age = age\n}"
//! );
//! ```

// Readers over parsed syntax
pub mod reader;

// Producing syntax
pub mod builder;
pub mod interpolation;

// Reporting
pub mod diagnostics;
pub mod error;

// Running macros
pub mod expansion;

pub use diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticSink, FixIt, Severity};
pub use error::{MacroError, MacroResult};
pub use expansion::{
    expand_body, expand_members, wrap_body, BodyMacro, BodyTarget, Expansion, ExpansionContext,
    MemberMacro,
};
pub use interpolation::Interpolate;
