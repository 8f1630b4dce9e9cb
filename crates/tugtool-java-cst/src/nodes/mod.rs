// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree node definitions.
//!
//! Nodes are immutable and shared through `Arc`. Every edit goes through a
//! generated `with_*` method, which keeps the node's id, prefix and markers
//! and reuses every untouched child by reference.

#[macro_use]
mod macros;

pub mod traits;

mod category;
mod declarations;
mod expressions;
mod markers;
mod space;
mod statements;
mod type_trees;

pub use category::{Expression, Statement, Tree, TypeTree};
pub use declarations::{
    Annotation, ClassDeclaration, ClassKeyword, CompilationUnit, Import, MethodDeclaration,
    Modifier, ModifierKind, NamedVariable, Package, VariableDeclarations,
};
pub use expressions::{
    Assignment, Binary, BinaryOperator, FieldAccess, Identifier, Literal, MethodInvocation,
    NewClass, Parentheses, Ternary, Unary, UnaryOperator,
};
pub use markers::{JavaProject, JavaVersion, Marker, Markers, SearchResult};
pub use space::{Comment, Container, LeftPadded, RightPadded, Space};
pub use statements::{Block, ElsePart, If, Return};
pub use traits::{NodeId, NodeKind, RefEq, TreeSlot};
pub use type_trees::{ArrayTypeTree, ParameterizedTypeTree, PrimitiveTypeTree};
