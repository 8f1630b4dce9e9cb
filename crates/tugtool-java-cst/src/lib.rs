// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An immutable Java syntax tree with semantic types.
//!
//! Trees are produced elsewhere (a front end or hand-written builders) and
//! then transformed here without ever being mutated in place.
//!
//! # Overview
//!
//! - **Nodes**: every node kind is an `Arc`-shared struct with `with_*`
//!   editors that keep ids, prefixes and markers, and reuse untouched
//!   children by reference. See [`nodes`].
//! - **Printing**: the [`Codegen`] trait prints a tree back to source. Spaces
//!   and comments live in the tree, so untouched code prints byte-for-byte.
//! - **Traversal**: [`JavaVisitor`] hooks return replacement nodes; a
//!   [`Cursor`] tracks the path from the root and carries scoped messages;
//!   [`Traversal`] drains the deferred-visit queue after the main pass.
//! - **Types**: [`JavaType`] and friends describe resolved classes, methods
//!   and variables; [`TypeCatalog`] plays the role of a classpath.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tugtool_java_cst::{Codegen, CompilationUnit, Traversal, VisitorTable};
//!
//! let unit = CompilationUnit::build("A.java");
//! let mut visitor = VisitorTable::<()>::new();
//! let outcome = Traversal::default().run(&mut visitor, &unit, &()).unwrap();
//! assert!(Arc::ptr_eq(&outcome.tree, &unit));
//! assert_eq!(outcome.tree.print(), "");
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Printing trees back to source.
pub mod codegen;
pub use codegen::{Codegen, CodegenState};

/// The path from the root to the node being visited.
pub mod cursor;
pub use cursor::Cursor;

/// Syntax tree node definitions.
pub mod nodes;
pub use nodes::*;

/// Resolved semantic types.
pub mod types;
pub use types::{
    ancestry, inherits_from, is_assignable_to, ClassType, GenericTypeVariable, JavaType,
    MethodFlags, MethodSignature, MethodType, ParameterizedType, Primitive, TypeCatalog, TypeKind,
    VariableType,
};

/// Types and methods referenced by a compilation unit.
pub mod types_in_use;
pub use types_in_use::TypesInUse;

/// Visitor and transformer infrastructure for tree traversal.
pub mod visitor;
pub use visitor::{
    validate_unique_ids, DeferredQueue, JavaVisitor, Traversal, VisitContext, VisitOutcome,
    VisitOutput, VisitResult, VisitorTable,
};
