// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node categories.
//!
//! [`Tree`] holds any node. [`Expression`], [`Statement`] and [`TypeTree`]
//! are the child slots that accept more than one kind; a node stored in such
//! a slot can only be replaced by a node of the same category.

use std::sync::Arc;

use super::declarations::{
    Annotation, ClassDeclaration, CompilationUnit, Import, MethodDeclaration, NamedVariable,
    Package, VariableDeclarations,
};
use super::expressions::{
    Assignment, Binary, FieldAccess, Identifier, Literal, MethodInvocation, NewClass, Parentheses,
    Ternary, Unary,
};
use super::markers::Markers;
use super::space::Space;
use super::statements::{Block, If, Return};
use super::traits::{NodeId, NodeKind, RefEq, TreeSlot};
use super::type_trees::{ArrayTypeTree, ParameterizedTypeTree, PrimitiveTypeTree};
use crate::types::{JavaType, MethodType};

// ============================================================================
// Tree
// ============================================================================

macro_rules! tree_enum {
    ($($kind:ident),* $(,)?) => {
        /// Any node.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Tree {
            $($kind(Arc<$kind>),)*
        }

        impl Tree {
            pub fn id(&self) -> NodeId {
                match self {
                    $(Tree::$kind(n) => n.id,)*
                }
            }

            pub fn prefix(&self) -> &Space {
                match self {
                    $(Tree::$kind(n) => &n.prefix,)*
                }
            }

            pub fn markers(&self) -> &Markers {
                match self {
                    $(Tree::$kind(n) => &n.markers,)*
                }
            }

            pub fn with_id(&self, id: NodeId) -> Tree {
                match self {
                    $(Tree::$kind(n) => Tree::$kind(n.with_id(id)),)*
                }
            }

            pub fn with_prefix(&self, prefix: Space) -> Tree {
                match self {
                    $(Tree::$kind(n) => Tree::$kind(n.with_prefix(prefix)),)*
                }
            }

            pub fn with_markers(&self, markers: Markers) -> Tree {
                match self {
                    $(Tree::$kind(n) => Tree::$kind(n.with_markers(markers)),)*
                }
            }

            /// Name of the node kind, e.g. `"MethodInvocation"`.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(Tree::$kind(_) => stringify!($kind),)*
                }
            }

            /// The node's resolved type, if it has one.
            pub fn type_of(&self) -> Option<JavaType> {
                match self {
                    $(Tree::$kind(n) => n.type_of(),)*
                }
            }
        }

        impl RefEq for Tree {
            fn ref_eq(&self, other: &Self) -> bool {
                match (self, other) {
                    $((Tree::$kind(a), Tree::$kind(b)) => Arc::ptr_eq(a, b),)*
                    _ => false,
                }
            }
        }

        $(
            impl NodeKind for $kind {
                fn cast(tree: &Tree) -> Option<&Arc<Self>> {
                    match tree {
                        Tree::$kind(n) => Some(n),
                        _ => None,
                    }
                }
            }

            impl TreeSlot for Arc<$kind> {
                fn into_tree(self) -> Tree {
                    Tree::$kind(self)
                }

                fn from_tree(tree: Tree) -> Option<Self> {
                    match tree {
                        Tree::$kind(n) => Some(n),
                        _ => None,
                    }
                }
            }

            impl From<Arc<$kind>> for Tree {
                fn from(node: Arc<$kind>) -> Self {
                    Tree::$kind(node)
                }
            }
        )*
    };
}

tree_enum! {
    CompilationUnit,
    Package,
    Import,
    ClassDeclaration,
    MethodDeclaration,
    VariableDeclarations,
    NamedVariable,
    Block,
    Return,
    If,
    Annotation,
    Identifier,
    FieldAccess,
    MethodInvocation,
    NewClass,
    Literal,
    Unary,
    Binary,
    Parentheses,
    Assignment,
    Ternary,
    ParameterizedTypeTree,
    ArrayTypeTree,
    PrimitiveTypeTree,
}

impl Tree {
    /// The method a method invocation or constructor call binds to.
    pub fn method_type(&self) -> Option<&Arc<MethodType>> {
        match self {
            Tree::MethodInvocation(m) => m.method_type.as_ref(),
            Tree::NewClass(n) => n.constructor_type.as_ref(),
            _ => None,
        }
    }

    pub fn is<T: NodeKind>(&self) -> bool {
        T::cast(self).is_some()
    }
}

impl TreeSlot for Tree {
    fn into_tree(self) -> Tree {
        self
    }

    fn from_tree(tree: Tree) -> Option<Self> {
        Some(tree)
    }
}

// ============================================================================
// Expression and TypeTree
// ============================================================================

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($kind:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($kind(Arc<$kind>),)*
        }

        impl $name {
            pub fn id(&self) -> NodeId {
                match self {
                    $($name::$kind(n) => n.id,)*
                }
            }

            pub fn prefix(&self) -> &Space {
                match self {
                    $($name::$kind(n) => &n.prefix,)*
                }
            }

            pub fn markers(&self) -> &Markers {
                match self {
                    $($name::$kind(n) => &n.markers,)*
                }
            }

            pub fn with_id(&self, id: NodeId) -> Self {
                match self {
                    $($name::$kind(n) => $name::$kind(n.with_id(id)),)*
                }
            }

            pub fn with_prefix(&self, prefix: Space) -> Self {
                match self {
                    $($name::$kind(n) => $name::$kind(n.with_prefix(prefix)),)*
                }
            }

            pub fn with_markers(&self, markers: Markers) -> Self {
                match self {
                    $($name::$kind(n) => $name::$kind(n.with_markers(markers)),)*
                }
            }

            pub fn kind_name(&self) -> &'static str {
                match self {
                    $($name::$kind(_) => stringify!($kind),)*
                }
            }

            pub fn type_of(&self) -> Option<JavaType> {
                match self {
                    $($name::$kind(n) => n.type_of(),)*
                }
            }

            pub fn to_tree(&self) -> Tree {
                match self {
                    $($name::$kind(n) => Tree::$kind(Arc::clone(n)),)*
                }
            }
        }

        impl RefEq for $name {
            fn ref_eq(&self, other: &Self) -> bool {
                match (self, other) {
                    $(($name::$kind(a), $name::$kind(b)) => Arc::ptr_eq(a, b),)*
                    _ => false,
                }
            }
        }

        impl TreeSlot for $name {
            fn into_tree(self) -> Tree {
                match self {
                    $($name::$kind(n) => Tree::$kind(n),)*
                }
            }

            fn from_tree(tree: Tree) -> Option<Self> {
                match tree {
                    $(Tree::$kind(n) => Some($name::$kind(n)),)*
                    _ => None,
                }
            }
        }

        $(
            impl From<Arc<$kind>> for $name {
                fn from(node: Arc<$kind>) -> Self {
                    $name::$kind(node)
                }
            }
        )*
    };
}

category_enum! {
    /// A node in expression position.
    Expression {
        Identifier,
        FieldAccess,
        MethodInvocation,
        NewClass,
        Literal,
        Unary,
        Binary,
        Parentheses,
        Assignment,
        Ternary,
    }
}

category_enum! {
    /// A node in type position.
    TypeTree {
        Identifier,
        FieldAccess,
        ParameterizedTypeTree,
        ArrayTypeTree,
        PrimitiveTypeTree,
    }
}

impl Expression {
    /// `a.b.c` as nested field accesses, or a lone identifier for a name
    /// without dots. The outermost node gets `java_type`.
    pub fn qualified(fqn: &str, java_type: Option<JavaType>) -> Expression {
        match FieldAccess::qualified(fqn) {
            Some(access) => Expression::FieldAccess(access.with_java_type(java_type)),
            None => Expression::Identifier(Identifier::build(fqn, java_type)),
        }
    }

    /// Dotted name for an identifier or a chain of field accesses on
    /// identifiers.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            Expression::Identifier(i) => Some(i.simple_name.clone()),
            Expression::FieldAccess(f) => f.qualified_name(),
            _ => None,
        }
    }

    /// The expression inside any number of parentheses.
    pub fn unwrap_parentheses(&self) -> &Expression {
        match self {
            Expression::Parentheses(p) => p.tree.element.unwrap_parentheses(),
            other => other,
        }
    }

    /// The same name used as a type.
    pub fn as_type_tree(&self) -> Option<TypeTree> {
        match self {
            Expression::Identifier(i) => Some(TypeTree::Identifier(Arc::clone(i))),
            Expression::FieldAccess(f) => Some(TypeTree::FieldAccess(Arc::clone(f))),
            _ => None,
        }
    }
}

impl TypeTree {
    /// Dotted name of the named type, ignoring type arguments.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            TypeTree::Identifier(i) => Some(i.simple_name.clone()),
            TypeTree::FieldAccess(f) => f.qualified_name(),
            TypeTree::ParameterizedTypeTree(p) => p.clazz.qualified_name(),
            TypeTree::ArrayTypeTree(_) | TypeTree::PrimitiveTypeTree(_) => None,
        }
    }
}

// ============================================================================
// Statement
// ============================================================================

/// A node in statement position, including class-body members.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    ClassDeclaration(Arc<ClassDeclaration>),
    MethodDeclaration(Arc<MethodDeclaration>),
    VariableDeclarations(Arc<VariableDeclarations>),
    Block(Arc<Block>),
    Return(Arc<Return>),
    If(Arc<If>),
    /// An expression statement such as a call or an assignment.
    Expression(Expression),
}

/// Match every statement variant. The first arm form applies to node
/// payloads, the second to the expression payload.
macro_rules! statement_dispatch {
    ($self:ident, $n:ident => $node:expr, $e:ident => $expr:expr) => {
        match $self {
            Statement::ClassDeclaration($n) => $node,
            Statement::MethodDeclaration($n) => $node,
            Statement::VariableDeclarations($n) => $node,
            Statement::Block($n) => $node,
            Statement::Return($n) => $node,
            Statement::If($n) => $node,
            Statement::Expression($e) => $expr,
        }
    };
}

/// Rebuild a statement of the same variant from an edited payload.
macro_rules! statement_map {
    ($self:ident, $n:ident => $body:expr) => {
        match $self {
            Statement::ClassDeclaration($n) => Statement::ClassDeclaration($body),
            Statement::MethodDeclaration($n) => Statement::MethodDeclaration($body),
            Statement::VariableDeclarations($n) => Statement::VariableDeclarations($body),
            Statement::Block($n) => Statement::Block($body),
            Statement::Return($n) => Statement::Return($body),
            Statement::If($n) => Statement::If($body),
            Statement::Expression($n) => Statement::Expression($body),
        }
    };
}

impl Statement {
    pub fn id(&self) -> NodeId {
        statement_dispatch!(self, n => n.id, e => e.id())
    }

    pub fn prefix(&self) -> &Space {
        statement_dispatch!(self, n => &n.prefix, e => e.prefix())
    }

    pub fn markers(&self) -> &Markers {
        statement_dispatch!(self, n => &n.markers, e => e.markers())
    }

    pub fn with_id(&self, id: NodeId) -> Statement {
        statement_map!(self, n => n.with_id(id))
    }

    pub fn with_prefix(&self, prefix: Space) -> Statement {
        statement_map!(self, n => n.with_prefix(prefix))
    }

    pub fn with_markers(&self, markers: Markers) -> Statement {
        statement_map!(self, n => n.with_markers(markers))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Expression(e) => e.kind_name(),
            other => other.to_tree().kind_name(),
        }
    }

    pub fn type_of(&self) -> Option<JavaType> {
        statement_dispatch!(self, n => n.type_of(), e => e.type_of())
    }

    pub fn to_tree(&self) -> Tree {
        match self {
            Statement::ClassDeclaration(n) => Tree::ClassDeclaration(Arc::clone(n)),
            Statement::MethodDeclaration(n) => Tree::MethodDeclaration(Arc::clone(n)),
            Statement::VariableDeclarations(n) => Tree::VariableDeclarations(Arc::clone(n)),
            Statement::Block(n) => Tree::Block(Arc::clone(n)),
            Statement::Return(n) => Tree::Return(Arc::clone(n)),
            Statement::If(n) => Tree::If(Arc::clone(n)),
            Statement::Expression(e) => e.to_tree(),
        }
    }

    /// Whether the printer terminates this statement with `;`.
    pub fn needs_semicolon(&self) -> bool {
        match self {
            Statement::Expression(_) | Statement::Return(_) | Statement::VariableDeclarations(_) => {
                true
            }
            Statement::MethodDeclaration(m) => m.body.is_none(),
            Statement::ClassDeclaration(_) | Statement::Block(_) | Statement::If(_) => false,
        }
    }
}

impl RefEq for Statement {
    fn ref_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Statement::ClassDeclaration(a), Statement::ClassDeclaration(b)) => Arc::ptr_eq(a, b),
            (Statement::MethodDeclaration(a), Statement::MethodDeclaration(b)) => Arc::ptr_eq(a, b),
            (Statement::VariableDeclarations(a), Statement::VariableDeclarations(b)) => {
                Arc::ptr_eq(a, b)
            }
            (Statement::Block(a), Statement::Block(b)) => Arc::ptr_eq(a, b),
            (Statement::Return(a), Statement::Return(b)) => Arc::ptr_eq(a, b),
            (Statement::If(a), Statement::If(b)) => Arc::ptr_eq(a, b),
            (Statement::Expression(a), Statement::Expression(b)) => a.ref_eq(b),
            _ => false,
        }
    }
}

impl TreeSlot for Statement {
    fn into_tree(self) -> Tree {
        match self {
            Statement::ClassDeclaration(n) => Tree::ClassDeclaration(n),
            Statement::MethodDeclaration(n) => Tree::MethodDeclaration(n),
            Statement::VariableDeclarations(n) => Tree::VariableDeclarations(n),
            Statement::Block(n) => Tree::Block(n),
            Statement::Return(n) => Tree::Return(n),
            Statement::If(n) => Tree::If(n),
            Statement::Expression(e) => e.into_tree(),
        }
    }

    fn from_tree(tree: Tree) -> Option<Self> {
        match tree {
            Tree::ClassDeclaration(n) => Some(Statement::ClassDeclaration(n)),
            Tree::MethodDeclaration(n) => Some(Statement::MethodDeclaration(n)),
            Tree::VariableDeclarations(n) => Some(Statement::VariableDeclarations(n)),
            Tree::Block(n) => Some(Statement::Block(n)),
            Tree::Return(n) => Some(Statement::Return(n)),
            Tree::If(n) => Some(Statement::If(n)),
            other => Expression::from_tree(other).map(Statement::Expression),
        }
    }
}

impl From<Expression> for Statement {
    fn from(expression: Expression) -> Self {
        Statement::Expression(expression)
    }
}

macro_rules! statement_from {
    ($($kind:ident),*) => {
        $(
            impl From<Arc<$kind>> for Statement {
                fn from(node: Arc<$kind>) -> Self {
                    Statement::$kind(node)
                }
            }
        )*
    };
}

statement_from!(ClassDeclaration, MethodDeclaration, VariableDeclarations, Block, Return, If);
