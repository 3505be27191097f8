// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Language version gating for the parser.
//!
//! The parser accepts the union of all supported syntax. When a concrete
//! version is selected, constructs introduced after that version are
//! reported as [`ParserError::UnsupportedSyntax`](crate::ParserError).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageVersion {
    /// Accept every construct the grammar knows.
    #[default]
    Permissive,
    V5_9,
    V5_10,
    V6_0,
}

impl LanguageVersion {
    fn rank(self) -> u8 {
        match self {
            LanguageVersion::V5_9 => 0,
            LanguageVersion::V5_10 => 1,
            LanguageVersion::V6_0 => 2,
            LanguageVersion::Permissive => u8::MAX,
        }
    }

    fn at_least(self, other: LanguageVersion) -> bool {
        self.rank() >= other.rank()
    }

    /// `throws(ErrorType)`.
    pub fn has_typed_throws(self) -> bool {
        self.at_least(LanguageVersion::V6_0)
    }

    /// `each T` and `repeat each T`.
    pub fn has_parameter_packs(self) -> bool {
        self.at_least(LanguageVersion::V5_9)
    }

    /// The `package` access level.
    pub fn has_package_access(self) -> bool {
        self.at_least(LanguageVersion::V5_9)
    }

    /// `borrowing` and `consuming` parameter and method modifiers.
    pub fn has_ownership_modifiers(self) -> bool {
        self.at_least(LanguageVersion::V5_9)
    }

    /// The `sending` parameter specifier.
    pub fn has_sending(self) -> bool {
        self.at_least(LanguageVersion::V6_0)
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LanguageVersion::Permissive => "permissive",
            LanguageVersion::V5_9 => "5.9",
            LanguageVersion::V5_10 => "5.10",
            LanguageVersion::V6_0 => "6.0",
        };
        f.write_str(name)
    }
}

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub version: LanguageVersion,
}

impl ParseOptions {
    pub fn new(version: LanguageVersion) -> Self {
        ParseOptions { version }
    }

    pub fn permissive() -> Self {
        ParseOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_gates() {
        assert!(!LanguageVersion::V5_10.has_typed_throws());
        assert!(LanguageVersion::V6_0.has_typed_throws());
        assert!(LanguageVersion::V5_9.has_parameter_packs());
        assert!(!LanguageVersion::V5_10.has_sending());
        assert!(LanguageVersion::Permissive.has_sending());
    }

    #[test]
    fn test_default_is_permissive() {
        assert_eq!(ParseOptions::default().version, LanguageVersion::Permissive);
        assert_eq!(LanguageVersion::V5_10.to_string(), "5.10");
    }
}
