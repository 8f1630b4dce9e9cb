// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative matchers over resolved types.
//!
//! Every matcher is compiled once from a pattern string and is immutable
//! afterwards, so one instance can be shared by all files of a run.
//! Matching consults the type attached to a node, never its spelling: an
//! `@Entity` annotation matches `@javax.persistence.Entity` only if it was
//! resolved to that type.
//!
//! Nodes without type information never match. That is a miss, not an
//! error, and it is not logged.

mod annotation;
mod method;
mod type_matcher;
mod type_pattern;

pub use annotation::AnnotationMatcher;
pub use method::MethodMatcher;
pub use type_matcher::TypeMatcher;
pub use type_pattern::TypePattern;

pub use tugtool_java_cst::is_assignable_to;
