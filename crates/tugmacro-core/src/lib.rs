// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core infrastructure for tugmacro.
//!
//! This crate provides language-agnostic infrastructure:
//! - Byte spans for node positions
//! - Text edits with conflict detection and atomic apply
//! - Text utilities for line:column conversions

pub mod edit;
pub mod span;
pub mod text;

pub use edit::{EditConflict, EditError, EditSet, TextEdit};
pub use span::Span;
