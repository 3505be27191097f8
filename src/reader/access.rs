// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Access levels and declaration modifiers.
//!
//! Both readers and builders use these: readers decode them from modifier
//! tokens, builders render them back as keywords.

use std::fmt;

use serde::Serialize;

/// An access level, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Fileprivate,
    Internal,
    Package,
    Public,
    Open,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "private" => Visibility::Private,
            "fileprivate" => Visibility::Fileprivate,
            "internal" => Visibility::Internal,
            "package" => Visibility::Package,
            "public" => Visibility::Public,
            "open" => Visibility::Open,
            _ => return None,
        })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Fileprivate => "fileprivate",
            Visibility::Internal => "internal",
            Visibility::Package => "package",
            Visibility::Public => "public",
            Visibility::Open => "open",
        }
    }

    /// Whether the declaration is visible outside its defining module.
    pub fn is_exported(&self) -> bool {
        *self >= Visibility::Public
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A declaration modifier other than an access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    /// `class`, a type-level member that subclasses may override.
    Class,
    Final,
    Lazy,
    Weak,
    Unowned,
    Mutating,
    Nonmutating,
    /// `optional`, an optional protocol requirement.
    Optional,
    Nonisolated,
    Override,
    Required,
    Convenience,
    Dynamic,
    Indirect,
    Distributed,
    Consuming,
    Borrowing,
}

impl Modifier {
    pub const ALL: [Modifier; 18] = [
        Modifier::Static,
        Modifier::Class,
        Modifier::Final,
        Modifier::Lazy,
        Modifier::Weak,
        Modifier::Unowned,
        Modifier::Mutating,
        Modifier::Nonmutating,
        Modifier::Optional,
        Modifier::Nonisolated,
        Modifier::Override,
        Modifier::Required,
        Modifier::Convenience,
        Modifier::Dynamic,
        Modifier::Indirect,
        Modifier::Distributed,
        Modifier::Consuming,
        Modifier::Borrowing,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Modifier::ALL.into_iter().find(|m| m.keyword() == keyword)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Static => "static",
            Modifier::Class => "class",
            Modifier::Final => "final",
            Modifier::Lazy => "lazy",
            Modifier::Weak => "weak",
            Modifier::Unowned => "unowned",
            Modifier::Mutating => "mutating",
            Modifier::Nonmutating => "nonmutating",
            Modifier::Optional => "optional",
            Modifier::Nonisolated => "nonisolated",
            Modifier::Override => "override",
            Modifier::Required => "required",
            Modifier::Convenience => "convenience",
            Modifier::Dynamic => "dynamic",
            Modifier::Indirect => "indirect",
            Modifier::Distributed => "distributed",
            Modifier::Consuming => "consuming",
            Modifier::Borrowing => "borrowing",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
