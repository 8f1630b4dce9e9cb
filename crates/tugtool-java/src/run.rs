// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Running recipes over many files.
//!
//! A run has two phases:
//!
//! 1. **Scan.** Every scanning recipe's scanner visits every source. Files
//!    are scanned in parallel; accumulators serialize their own writes.
//! 2. **Transform.** Once all scans are done, each accumulator is frozen and
//!    every file is transformed by every recipe, in recipe order. Files are
//!    independent and run in parallel.
//!
//! A recipe failing on a file costs only that file: its original content is
//! kept, a [`Diagnostic`] is recorded, and other files carry on. With
//! `fail_fast` set, the first failure ends the run instead.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, debug_span, info, info_span, warn};
use tugtool_core::config::EngineConfig;
use tugtool_core::data_table::DataTable;
use tugtool_core::error::TugError;
use tugtool_core::execution::{Diagnostic, ExecutionContext};
use tugtool_java_cst::{CompilationUnit, Traversal};

use crate::recipe::{AnyRecipe, Stage, Transform};
use crate::search::Precondition;

/// One changed file.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub before: Arc<CompilationUnit>,
    pub after: Arc<CompilationUnit>,
    /// Names of the recipes that edited the file, in run order.
    pub recipes_that_changed: Vec<String>,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Changed files only, in input order.
    pub results: Vec<SourceResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub data_tables: Vec<DataTable>,
}

impl RunResult {
    pub fn changed(&self, source_path: &str) -> Option<&SourceResult> {
        self.results
            .iter()
            .find(|r| r.before.source_path == source_path)
    }
}

/// Drives recipes over a set of compilation units.
#[derive(Debug, Clone)]
pub struct RecipeRunner {
    config: EngineConfig,
    traversal: Traversal,
}

struct Prepared<'r> {
    name: &'r str,
    precondition: Option<Box<dyn Precondition>>,
    transform: Box<dyn Transform + 'r>,
}

impl RecipeRunner {
    pub fn new(config: EngineConfig) -> Self {
        let traversal = Traversal::from_config(&config);
        RecipeRunner { config, traversal }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `recipes` over `sources`.
    ///
    /// Fails only for an invalid recipe, or for the first file failure when
    /// `fail_fast` is set.
    pub fn run(
        &self,
        recipes: &[AnyRecipe],
        sources: &[Arc<CompilationUnit>],
        ctx: &ExecutionContext,
    ) -> Result<RunResult, TugError> {
        let _span = info_span!("run", recipes = recipes.len(), sources = sources.len()).entered();

        for recipe in recipes {
            recipe.info().validate().map_err(|e| {
                TugError::invalid_args(format!("recipe `{}`: {}", recipe.name(), e))
            })?;
        }

        let mut prepared = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let transform = match recipe.begin() {
                Stage::Transform(transform) => transform,
                Stage::Scan(scan) => {
                    let _span = info_span!("scan", recipe = recipe.name()).entered();
                    let scan_file = |source: &Arc<CompilationUnit>| -> Result<(), TugError> {
                        let mut scanner = scan.scanner();
                        match self.traversal.visit_once(scanner.as_mut(), source, ctx) {
                            Ok(_) => Ok(()),
                            Err(err) => self.isolate(recipe.name(), source, err.into(), ctx),
                        }
                    };
                    if self.config.parallel {
                        sources.par_iter().try_for_each(scan_file)?;
                    } else {
                        sources.iter().try_for_each(scan_file)?;
                    }
                    scan.freeze()
                }
            };
            prepared.push(Prepared {
                name: recipe.name(),
                precondition: recipe.precondition(),
                transform,
            });
        }

        let outcomes: Vec<Option<SourceResult>> = if self.config.parallel {
            sources
                .par_iter()
                .map(|source| self.transform_file(&prepared, source, ctx))
                .collect::<Result<_, _>>()?
        } else {
            sources
                .iter()
                .map(|source| self.transform_file(&prepared, source, ctx))
                .collect::<Result<_, _>>()?
        };

        let results: Vec<SourceResult> = outcomes.into_iter().flatten().collect();
        let diagnostics = ctx.diagnostics();
        info!(
            changed = results.len(),
            failed = diagnostics.len(),
            "run finished"
        );
        Ok(RunResult {
            results,
            diagnostics,
            data_tables: ctx.data_tables().snapshot(),
        })
    }

    fn transform_file(
        &self,
        prepared: &[Prepared<'_>],
        source: &Arc<CompilationUnit>,
        ctx: &ExecutionContext,
    ) -> Result<Option<SourceResult>, TugError> {
        let mut current = Arc::clone(source);
        let mut recipes_that_changed = Vec::new();

        for recipe in prepared {
            let _span =
                debug_span!("transform", recipe = recipe.name, source = %source.source_path).entered();
            if let Some(precondition) = &recipe.precondition {
                if !precondition.check(&current) {
                    debug!("precondition not met; skipping");
                    continue;
                }
            }
            let mut visitor = recipe.transform.visitor();
            match self.traversal.run(visitor.as_mut(), &current, ctx) {
                Ok(outcome) => {
                    if !Arc::ptr_eq(&outcome.tree, &current) {
                        debug!(deferred_runs = outcome.deferred_runs, "file changed");
                        recipes_that_changed.push(recipe.name.to_string());
                        current = outcome.tree;
                    }
                }
                Err(err) => {
                    self.isolate(recipe.name, source, err.into(), ctx)?;
                    return Ok(None);
                }
            }
        }

        if recipes_that_changed.is_empty() {
            return Ok(None);
        }
        Ok(Some(SourceResult {
            before: Arc::clone(source),
            after: current,
            recipes_that_changed,
        }))
    }

    /// Record a per-file failure, or end the run under `fail_fast`.
    fn isolate(
        &self,
        recipe: &str,
        source: &CompilationUnit,
        err: TugError,
        ctx: &ExecutionContext,
    ) -> Result<(), TugError> {
        warn!(recipe, source = %source.source_path, error = %err, "recipe failed; file left unchanged");
        if self.config.fail_fast {
            return Err(err);
        }
        ctx.add_diagnostic(Diagnostic::from_error(recipe, &source.source_path, &err));
        Ok(())
    }
}

impl Default for RecipeRunner {
    fn default() -> Self {
        RecipeRunner::new(EngineConfig::default())
    }
}
