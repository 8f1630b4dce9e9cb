// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declared-type matching.

use tugtool_core::error::PatternError;
use tugtool_java_cst::{ancestry, Expression, JavaType, TypeTree};

use super::type_pattern::TypePattern;

const KIND: &str = "type";

/// A compiled type pattern, optionally matching subtypes.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
    pattern: TypePattern,
    match_inherited: bool,
}

impl TypeMatcher {
    /// Compile `pattern`. With `match_inherited`, a class also matches when
    /// any supertype or implemented interface does.
    pub fn new(pattern: &str, match_inherited: bool) -> Result<Self, PatternError> {
        Ok(TypeMatcher {
            pattern: TypePattern::parse(KIND, pattern)?,
            match_inherited,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Match the erasure of `ty`, then its ancestry when inherited matches
    /// are enabled. Arrays only match array patterns.
    pub fn matches_type(&self, ty: &JavaType) -> bool {
        if self.pattern.matches_type(ty) {
            return true;
        }
        if !self.match_inherited {
            return false;
        }
        match ty {
            JavaType::Array(_) | JavaType::Primitive(_) => false,
            other => other.as_class().is_some_and(|class| {
                ancestry(class)
                    .iter()
                    .skip(1)
                    .any(|c| self.pattern.matches_name(&c.fqn))
            }),
        }
    }

    pub fn matches_type_tree(&self, tree: &TypeTree) -> bool {
        tree.type_of().is_some_and(|ty| self.matches_type(&ty))
    }

    pub fn matches_expression(&self, expression: &Expression) -> bool {
        expression.type_of().is_some_and(|ty| self.matches_type(&ty))
    }
}
