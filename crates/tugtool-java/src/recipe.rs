// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recipes: named, reusable transformations.
//!
//! A [`Recipe`] hands the runner a fresh visitor per file. A
//! [`ScanningRecipe`] additionally sees every file once before any file is
//! transformed: its scanner writes into an [`AccumulatorBuilder`], the runner
//! freezes the builder, and the transform visitor reads the resulting
//! [`Snapshot`]. The builder is consumed by the freeze, so no scanner can
//! write once transforms have started.
//!
//! The runner takes recipes of both kinds as [`AnyRecipe`].

use std::fmt;

use tugtool_core::accumulator::{AccumulatorBuilder, Snapshot};
use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::JavaVisitor;

use crate::search::Precondition;

/// The visitor type recipes produce. Its parameter is the run's context.
pub type RecipeVisitor<'a> = Box<dyn JavaVisitor<ExecutionContext> + 'a>;

/// Descriptive metadata shared by both recipe kinds.
pub trait RecipeInfo: Send + Sync {
    /// Stable identifier, used in diagnostics and logs.
    fn name(&self) -> &str;

    fn display_name(&self) -> &str;

    fn description(&self) -> &str;

    fn tags(&self) -> &[&'static str] {
        &[]
    }

    /// Check the recipe's own options before a run starts.
    fn validate(&self) -> Result<(), TugError> {
        Ok(())
    }
}

/// A recipe that transforms each file independently.
pub trait Recipe: RecipeInfo {
    /// Cheap check that gates the visitor per file.
    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        None
    }

    /// A visitor for one file.
    fn visitor(&self) -> RecipeVisitor<'_>;
}

/// A recipe whose transform depends on facts gathered from every file.
pub trait ScanningRecipe: RecipeInfo {
    type Acc: Send + Sync + 'static;

    fn initial_value(&self) -> Self::Acc;

    /// A visitor that records findings. Its edits are discarded.
    fn scanner<'a>(&'a self, acc: &'a AccumulatorBuilder<Self::Acc>) -> RecipeVisitor<'a>;

    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        None
    }

    /// A visitor for one file, reading the frozen findings.
    fn visitor(&self, acc: Snapshot<Self::Acc>) -> RecipeVisitor<'_>;
}

/// Either kind of recipe, as the runner takes them.
pub struct AnyRecipe(Box<dyn ErasedRecipe>);

impl AnyRecipe {
    pub fn plain<R: Recipe + 'static>(recipe: R) -> Self {
        AnyRecipe(Box::new(Plain(recipe)))
    }

    pub fn scanning<R: ScanningRecipe + 'static>(recipe: R) -> Self {
        AnyRecipe(Box::new(Scanning(recipe)))
    }

    pub fn info(&self) -> &dyn RecipeInfo {
        self.0.info()
    }

    pub fn name(&self) -> &str {
        self.info().name()
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.0.begin(), Stage::Scan(_))
    }

    pub(crate) fn precondition(&self) -> Option<Box<dyn Precondition>> {
        self.0.precondition()
    }

    pub(crate) fn begin(&self) -> Stage<'_> {
        self.0.begin()
    }
}

impl fmt::Debug for AnyRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRecipe")
            .field("name", &self.name())
            .finish()
    }
}

/// Where a recipe stands at the start of a run.
pub(crate) enum Stage<'r> {
    /// Ready to transform.
    Transform(Box<dyn Transform + 'r>),
    /// Needs a scan of every file first.
    Scan(Box<dyn Scan<'r> + 'r>),
}

/// Per-file visitor factory for the transform phase.
pub(crate) trait Transform: Send + Sync {
    fn visitor(&self) -> RecipeVisitor<'_>;
}

/// Scan-phase state of a scanning recipe.
pub(crate) trait Scan<'r>: Send + Sync {
    fn scanner(&self) -> RecipeVisitor<'_>;

    /// End the scan phase.
    fn freeze(self: Box<Self>) -> Box<dyn Transform + 'r>;
}

trait ErasedRecipe: Send + Sync {
    fn info(&self) -> &dyn RecipeInfo;

    fn precondition(&self) -> Option<Box<dyn Precondition>>;

    fn begin(&self) -> Stage<'_>;
}

struct Plain<R>(R);

impl<R: Recipe> ErasedRecipe for Plain<R> {
    fn info(&self) -> &dyn RecipeInfo {
        &self.0
    }

    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        self.0.precondition()
    }

    fn begin(&self) -> Stage<'_> {
        Stage::Transform(Box::new(PlainTransform(&self.0)))
    }
}

struct PlainTransform<'r, R>(&'r R);

impl<R: Recipe> Transform for PlainTransform<'_, R> {
    fn visitor(&self) -> RecipeVisitor<'_> {
        self.0.visitor()
    }
}

struct Scanning<R>(R);

impl<R: ScanningRecipe> ErasedRecipe for Scanning<R> {
    fn info(&self) -> &dyn RecipeInfo {
        &self.0
    }

    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        self.0.precondition()
    }

    fn begin(&self) -> Stage<'_> {
        Stage::Scan(Box::new(Scanner {
            recipe: &self.0,
            acc: AccumulatorBuilder::new(self.0.initial_value()),
        }))
    }
}

struct Scanner<'r, R: ScanningRecipe> {
    recipe: &'r R,
    acc: AccumulatorBuilder<R::Acc>,
}

impl<'r, R: ScanningRecipe> Scan<'r> for Scanner<'r, R> {
    fn scanner(&self) -> RecipeVisitor<'_> {
        self.recipe.scanner(&self.acc)
    }

    fn freeze(self: Box<Self>) -> Box<dyn Transform + 'r> {
        let Scanner { recipe, acc } = *self;
        Box::new(Frozen {
            recipe,
            acc: acc.freeze(),
        })
    }
}

struct Frozen<'r, R: ScanningRecipe> {
    recipe: &'r R,
    acc: Snapshot<R::Acc>,
}

impl<R: ScanningRecipe> Transform for Frozen<'_, R> {
    fn visitor(&self) -> RecipeVisitor<'_> {
        self.recipe.visitor(self.acc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tugtool_java_cst::{ClassDeclaration, CompilationUnit, Traversal, VisitContext, VisitorTable};

    struct Noop;

    impl RecipeInfo for Noop {
        fn name(&self) -> &str {
            "Noop"
        }
        fn display_name(&self) -> &str {
            "Do nothing"
        }
        fn description(&self) -> &str {
            "Leaves every file alone."
        }
    }

    impl Recipe for Noop {
        fn visitor(&self) -> RecipeVisitor<'_> {
            Box::new(VisitorTable::new())
        }
    }

    struct CountClasses;

    impl RecipeInfo for CountClasses {
        fn name(&self) -> &str {
            "CountClasses"
        }
        fn display_name(&self) -> &str {
            "Count classes"
        }
        fn description(&self) -> &str {
            "Collects class names."
        }
    }

    impl ScanningRecipe for CountClasses {
        type Acc = BTreeSet<String>;

        fn initial_value(&self) -> BTreeSet<String> {
            BTreeSet::new()
        }

        fn scanner<'a>(&'a self, acc: &'a AccumulatorBuilder<BTreeSet<String>>) -> RecipeVisitor<'a> {
            Box::new(VisitorTable::new().on_class_declaration(
                move |class: &Arc<ClassDeclaration>, _ctx: &mut VisitContext<'_, ExecutionContext>| {
                    acc.update(|names| names.insert(class.simple_name().to_string()));
                    Ok(Arc::clone(class))
                },
            ))
        }

        fn visitor(&self, _acc: Snapshot<BTreeSet<String>>) -> RecipeVisitor<'_> {
            Box::new(VisitorTable::new())
        }
    }

    #[test]
    fn kinds_are_told_apart() {
        let plain = AnyRecipe::plain(Noop);
        let scanning = AnyRecipe::scanning(CountClasses);
        assert!(!plain.is_scanning());
        assert!(scanning.is_scanning());
        assert_eq!(format!("{:?}", scanning), "AnyRecipe { name: \"CountClasses\" }");
    }

    #[test]
    fn scan_then_freeze() {
        let recipe = AnyRecipe::scanning(CountClasses);
        let Stage::Scan(scan) = recipe.begin() else {
            panic!("expected a scan stage");
        };
        let ctx = ExecutionContext::new();
        let unit: Arc<CompilationUnit> = CompilationUnit::build("A.java");
        let mut scanner = scan.scanner();
        Traversal::default().run(scanner.as_mut(), &unit, &ctx).unwrap();
        drop(scanner);
        let transform = scan.freeze();
        let mut visitor = transform.visitor();
        let outcome = Traversal::default().run(visitor.as_mut(), &unit, &ctx).unwrap();
        assert!(Arc::ptr_eq(&outcome.tree, &unit));
    }
}
