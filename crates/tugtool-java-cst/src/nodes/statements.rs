// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.

use std::sync::Arc;

use super::category::{Expression, Statement};
use super::markers::Markers;
use super::space::{RightPadded, Space};
use super::traits::{NodeId, RefEq};
use crate::types::JavaType;

java_node! {
    /// `{ statements }`. Also the body of a class declaration.
    pub struct Block {
        pub statements: Vec<RightPadded<Statement>>,
        /// Space before the closing brace.
        pub end: Space,
    }
}

impl Block {
    pub fn build(statements: Vec<Statement>) -> Arc<Self> {
        Arc::new(Block {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            statements: statements.into_iter().map(RightPadded::new).collect(),
            end: Space::EMPTY,
        })
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn last_statement(&self) -> Option<&Statement> {
        self.statements.last().map(|s| &s.element)
    }

    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}

java_node! {
    /// `return;` or `return expression;`.
    pub struct Return {
        pub expression: Option<Expression>,
    }
}

impl Return {
    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}

/// `else body` of an [`If`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElsePart {
    /// Space before the `else` keyword.
    pub before: Space,
    pub body: RightPadded<Statement>,
}

impl RefEq for ElsePart {
    fn ref_eq(&self, other: &Self) -> bool {
        self.before == other.before && self.body.ref_eq(&other.body)
    }
}

java_node! {
    /// `if condition then_part [else else_part]`. The condition is normally
    /// a [`Parentheses`](super::Parentheses).
    pub struct If {
        pub condition: Expression,
        pub then_part: RightPadded<Statement>,
        pub else_part: Option<ElsePart>,
    }
}

impl If {
    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}
