// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Runner Tests
//!
//! Failure isolation, fail-fast, validation, configuration and fixed points.

mod support;

use std::io::Write;
use std::sync::Arc;

use tugtool_core::error::{OutputErrorCode, TransformError, TugError};
use tugtool_core::logging::init_test_logging;
use tugtool_core::{Config, EngineConfig, ExecutionContext};
use tugtool_java::recipes::{builtin, IsNotEmptyToJdk, OptionalNotEmptyToIsPresent};
use tugtool_java::{AnyRecipe, Recipe, RecipeInfo, RecipeRunner, RecipeVisitor};
use tugtool_java_cst::{
    ClassDeclaration, Codegen, CompilationUnit, Expression, JavaType, MethodSignature, Primitive,
    VisitContext, VisitorTable,
};

use support::*;

/// Fails on every class named `Broken`.
struct FailOnBroken;

impl RecipeInfo for FailOnBroken {
    fn name(&self) -> &str {
        "FailOnBroken"
    }
    fn display_name(&self) -> &str {
        "Fail on broken classes"
    }
    fn description(&self) -> &str {
        "Reports an error for classes named `Broken`."
    }
}

impl Recipe for FailOnBroken {
    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(VisitorTable::new().on_class_declaration(
            |class: &Arc<ClassDeclaration>, _ctx: &mut VisitContext<'_, ExecutionContext>| {
                if class.simple_name() == "Broken" {
                    return Err(TransformError::Recipe {
                        message: "cannot handle Broken".to_string(),
                    });
                }
                Ok(Arc::clone(class))
            },
        ))
    }
}

/// Rejects itself at validation.
struct Misconfigured;

impl RecipeInfo for Misconfigured {
    fn name(&self) -> &str {
        "Misconfigured"
    }
    fn display_name(&self) -> &str {
        "Misconfigured"
    }
    fn description(&self) -> &str {
        "Never valid."
    }
    fn validate(&self) -> Result<(), TugError> {
        Err(TugError::invalid_args("`level` must be positive"))
    }
}

impl Recipe for Misconfigured {
    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(VisitorTable::new())
    }
}

/// `A.java` or `Broken.java`, each negating `opt.isEmpty()` at Java 17.
fn optional_source(class_name: &str) -> Arc<CompilationUnit> {
    let optional = class_type("java.util.Optional");
    let is_empty = call(
        Some(typed_ident("opt", optional.clone())),
        "isEmpty",
        Vec::new(),
        optional.as_class().and_then(|c| method_on(c, "isEmpty", &[])),
    );
    let method = method(
        "test",
        Primitive::Boolean,
        vec![return_statement(not(Expression::MethodInvocation(is_empty)), 2)],
    );
    let path = format!("com/example/{}.java", class_name);
    at_java(
        unit(
            &path,
            Some("com.example"),
            &[],
            vec![class(
                Some("com.example"),
                class_name,
                vec![tugtool_java_cst::Statement::MethodDeclaration(method)],
            )],
        ),
        17,
    )
}

fn recipes_with_failure() -> Vec<AnyRecipe> {
    vec![
        AnyRecipe::plain(FailOnBroken),
        AnyRecipe::plain(OptionalNotEmptyToIsPresent::new().unwrap()),
    ]
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn failing_file_keeps_its_original_content() {
    init_test_logging();
    let sources = [optional_source("Broken"), optional_source("A")];
    let ctx = ExecutionContext::new();
    let result = RecipeRunner::default()
        .run(&recipes_with_failure(), &sources, &ctx)
        .unwrap();

    assert_eq!(result.results.len(), 1);
    assert!(result.changed("com/example/Broken.java").is_none());
    assert!(result
        .changed("com/example/A.java")
        .unwrap()
        .after
        .print()
        .contains("return opt.isPresent();"));

    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.recipe, "FailOnBroken");
    assert_eq!(diagnostic.source_path, "com/example/Broken.java");
    assert_eq!(diagnostic.code, OutputErrorCode::TransformFailed);
    assert!(diagnostic.message.contains("cannot handle Broken"));
}

#[test]
fn fail_fast_ends_the_run() {
    let config = EngineConfig {
        fail_fast: true,
        ..EngineConfig::sequential()
    };
    let sources = [optional_source("A"), optional_source("Broken")];
    let err = RecipeRunner::new(config)
        .run(&recipes_with_failure(), &sources, &ExecutionContext::new())
        .unwrap_err();
    assert!(matches!(err, TugError::Transform(TransformError::Recipe { .. })));
}

#[test]
fn invalid_recipes_stop_the_run_before_any_file() {
    let ctx = ExecutionContext::new();
    let err = RecipeRunner::default()
        .run(
            &[AnyRecipe::plain(Misconfigured)],
            &[optional_source("A")],
            &ctx,
        )
        .unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
    assert!(err.to_string().contains("Misconfigured"));
    assert!(ctx.diagnostics().is_empty());
}

// ============================================================================
// Ordering and fixed points
// ============================================================================

fn mixed_sources() -> Vec<Arc<CompilationUnit>> {
    let utils = library_class(
        "org.apache.commons.lang3.StringUtils",
        vec![MethodSignature::new("isEmpty", JavaType::Primitive(Primitive::Boolean))
            .param("cs", class_type("java.lang.CharSequence"))
            .static_method()],
    );
    let mut sources: Vec<Arc<CompilationUnit>> = (0..8)
        .map(|i| optional_source(&format!("Optional{}", i)))
        .collect();
    for i in 0..8 {
        let is_empty = static_call(
            &utils,
            "isEmpty",
            vec![typed_ident("s", class_type("java.lang.String"))],
        );
        let method = method(
            "test",
            Primitive::Boolean,
            vec![return_statement(Expression::MethodInvocation(is_empty), 2)],
        );
        let name = format!("Strings{}", i);
        sources.push(unit(
            &format!("com/example/{}.java", name),
            Some("com.example"),
            &["org.apache.commons.lang3.StringUtils"],
            vec![class(
                Some("com.example"),
                &name,
                vec![tugtool_java_cst::Statement::MethodDeclaration(method)],
            )],
        ));
    }
    sources
}

fn printed(results: &tugtool_java::RunResult) -> Vec<(String, String)> {
    results
        .results
        .iter()
        .map(|r| (r.before.source_path.clone(), r.after.print()))
        .collect()
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let sources = mixed_sources();
    let recipes = builtin().unwrap();
    let parallel = RecipeRunner::new(EngineConfig::default())
        .run(&recipes, &sources, &ExecutionContext::new())
        .unwrap();
    let sequential = RecipeRunner::new(EngineConfig::sequential())
        .run(&recipes, &sources, &ExecutionContext::new())
        .unwrap();

    assert_eq!(parallel.results.len(), 16);
    assert_eq!(printed(&parallel), printed(&sequential));
    // Input order survives the parallel run.
    let paths: Vec<&str> = parallel
        .results
        .iter()
        .map(|r| r.before.source_path.as_str())
        .collect();
    let expected: Vec<&str> = sources.iter().map(|s| s.source_path.as_str()).collect();
    assert_eq!(paths, expected);
}

#[test]
fn a_second_run_changes_nothing() {
    let sources = mixed_sources();
    let recipes = builtin().unwrap();
    let first = RecipeRunner::default()
        .run(&recipes, &sources, &ExecutionContext::new())
        .unwrap();
    let rewritten: Vec<Arc<CompilationUnit>> = sources
        .iter()
        .map(|s| match first.changed(&s.source_path) {
            Some(changed) => Arc::clone(&changed.after),
            None => Arc::clone(s),
        })
        .collect();

    let second = RecipeRunner::default()
        .run(&recipes, &rewritten, &ExecutionContext::new())
        .unwrap();
    assert!(second.results.is_empty(), "{:?}", printed(&second));
    assert!(second.diagnostics.is_empty());
}

#[test]
fn only_recipes_that_edit_are_listed() {
    let source = optional_source("A");
    let recipes = vec![
        AnyRecipe::plain(IsNotEmptyToJdk::new().unwrap()),
        AnyRecipe::plain(OptionalNotEmptyToIsPresent::new().unwrap()),
    ];
    let result = RecipeRunner::default()
        .run(&recipes, &[source], &ExecutionContext::new())
        .unwrap();
    assert_eq!(
        result.results[0].recipes_that_changed,
        ["OptionalNotEmptyToIsPresent"]
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn runner_takes_its_settings_from_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[engine]\nparallel = false\nfail_fast = true\nmax_deferred_visits = 8").unwrap();
    let config = Config::load(file.path()).unwrap();

    let runner = RecipeRunner::new(config.engine);
    assert!(!runner.config().parallel);
    assert_eq!(runner.config().max_deferred_visits, 8);

    let sources = [optional_source("Broken")];
    assert!(runner
        .run(&recipes_with_failure(), &sources, &ExecutionContext::new())
        .is_err());
}
