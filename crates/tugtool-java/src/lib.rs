// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type-aware matching and rewriting of Java syntax trees.
//!
//! This crate builds on [`tugtool_java_cst`]:
//!
//! - **Matchers**: method, annotation and type patterns compiled once and
//!   matched against resolved types. See [`matcher`].
//! - **Preconditions**: cheap per-file filters. See [`search`].
//! - **Templates**: Java snippets with typed placeholders that produce
//!   attributed subtrees. See [`template`].
//! - **Imports**: deferred visitors that add and remove imports after an
//!   edit. See [`imports`].
//! - **Recipes**: named transformations, including scanning recipes that see
//!   every file before changing any. See [`recipe`] and [`recipes`].
//! - **Runner**: drives recipes over many files in parallel. See [`run`].
//!
//! # Quick Start
//!
//! ```ignore
//! use tugtool_core::{EngineConfig, ExecutionContext};
//! use tugtool_java::{recipes, RecipeRunner};
//!
//! let runner = RecipeRunner::new(EngineConfig::default());
//! let result = runner.run(&recipes::builtin()?, &sources, &ExecutionContext::new())?;
//! for changed in &result.results {
//!     println!("{}: {:?}", changed.before.source_path, changed.recipes_that_changed);
//! }
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Deferred import maintenance.
pub mod imports;
pub use imports::{AddImport, ImportContext, RemoveImport};

/// Method, annotation and type matchers.
pub mod matcher;
pub use matcher::{AnnotationMatcher, MethodMatcher, TypeMatcher, TypePattern};

/// Recipe traits.
pub mod recipe;
pub use recipe::{AnyRecipe, Recipe, RecipeInfo, RecipeVisitor, ScanningRecipe};

/// Built-in recipes.
pub mod recipes;

/// The multi-file runner.
pub mod run;
pub use run::{RecipeRunner, RunResult, SourceResult};

/// Per-file preconditions.
pub mod search;
pub use search::{Precondition, UsesJavaVersion, UsesMethod, UsesType};

/// Snippet templates.
pub mod template;
pub use template::{parenthesize_for, Applied, Coordinates, JavaTemplate, JavaTemplateBuilder};
