// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for syntax tree traversal.
//!
//! The [`Visitor`] trait carries macro-generated `visit_*`/`leave_*` hook
//! pairs; the `walk_*` functions in [`dispatch`] drive traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order

mod dispatch;
mod effects;
mod identifiers;
mod traits;

pub use dispatch::*;
pub use effects::{EffectScanner, EffectSummary};
pub use identifiers::{IdentifierCollector, IdentifierRef};
pub use traits::{VisitResult, Visitor};
