// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Built-in Recipe Tests
//!
//! Each recipe runs through the [`RecipeRunner`] on hand-built, attributed
//! trees; results are compared as printed source.

mod support;

use std::sync::Arc;

use tugtool_core::{EngineConfig, ExecutionContext};
use tugtool_java::recipes::{
    AddScopeToInjectedClass, ApacheIOUtilsUseExplicitCharset, FindInternalJavaxApis,
    IsNotEmptyToJdk, OptionalNotEmptyToIsPresent, UseNoArgsConstructor, METHOD_CALLS,
};
use tugtool_java::{AnyRecipe, Recipe, RecipeRunner, RunResult};
use tugtool_java_cst::{
    ClassType, Codegen, CompilationUnit, Expression, Identifier, JavaType, MethodSignature,
    Modifier, ModifierKind, Primitive, SearchResult, Statement, Traversal,
};

use support::*;

fn run(recipe: AnyRecipe, sources: &[Arc<CompilationUnit>]) -> RunResult {
    let result = RecipeRunner::new(EngineConfig::sequential())
        .run(&[recipe], sources, &ExecutionContext::new())
        .unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result
}

fn printed_after(result: &RunResult, path: &str) -> String {
    result
        .changed(path)
        .unwrap_or_else(|| panic!("{} was not changed", path))
        .after
        .print()
}

fn string() -> JavaType {
    class_type("java.lang.String")
}

fn boolean_returning(imports: &[&str], expression: Expression) -> Arc<CompilationUnit> {
    single_method_unit(
        "com/example/A.java",
        imports,
        Primitive::Boolean,
        vec![return_statement(expression, 2)],
    )
}

// ============================================================================
// OptionalNotEmptyToIsPresent
// ============================================================================

fn negated_is_empty(version: u32) -> Arc<CompilationUnit> {
    let optional = class_type("java.util.Optional");
    let is_empty = call(
        Some(typed_ident("opt", optional.clone())),
        "isEmpty",
        Vec::new(),
        optional.as_class().and_then(|c| method_on(c, "isEmpty", &[])),
    );
    at_java(
        boolean_returning(&[], not(Expression::MethodInvocation(is_empty))),
        version,
    )
}

#[test]
fn negated_is_empty_becomes_is_present() {
    let recipe = AnyRecipe::plain(OptionalNotEmptyToIsPresent::new().unwrap());
    let result = run(recipe, &[negated_is_empty(11)]);
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\npublic class A {\n    boolean test() {\n        return opt.isPresent();\n    }\n}\n"
    );
    assert_eq!(
        result.results[0].recipes_that_changed,
        ["OptionalNotEmptyToIsPresent"]
    );
}

#[test]
fn optional_recipe_needs_java_11() {
    let recipe = AnyRecipe::plain(OptionalNotEmptyToIsPresent::new().unwrap());
    let result = run(recipe, &[negated_is_empty(8)]);
    assert!(result.results.is_empty());
}

/// `!opt.isEmpty()` with `opt` unattributed; `isEmpty` resolved or not.
fn untyped_negated_is_empty(resolved_call: bool) -> Arc<CompilationUnit> {
    let optional = class_type("java.util.Optional");
    let method_type = optional
        .as_class()
        .and_then(|c| method_on(c, "isEmpty", &[]))
        .filter(|_| resolved_call);
    let receiver = Expression::Identifier(Identifier::build("opt", None));
    let is_empty = call(Some(receiver), "isEmpty", Vec::new(), method_type);
    at_java(
        boolean_returning(&[], not(Expression::MethodInvocation(is_empty))),
        11,
    )
}

#[test]
fn untyped_calls_leave_the_tree_identical() {
    let recipe = OptionalNotEmptyToIsPresent::new().unwrap();
    for resolved_call in [false, true] {
        let unit = untyped_negated_is_empty(resolved_call);
        let mut visitor = recipe.visitor();
        let outcome = Traversal::default()
            .run(visitor.as_mut(), &unit, &ExecutionContext::new())
            .unwrap();
        assert!(Arc::ptr_eq(&outcome.tree, &unit));
    }

    let result = run(
        AnyRecipe::plain(recipe),
        &[untyped_negated_is_empty(true)],
    );
    assert!(result.results.is_empty());
}

// ============================================================================
// IsNotEmptyToJdk
// ============================================================================

fn string_utils(fqn: &str) -> Arc<ClassType> {
    let char_sequence = class_type("java.lang.CharSequence");
    let boolean = JavaType::Primitive(Primitive::Boolean);
    library_class(
        fqn,
        vec![
            MethodSignature::new("isEmpty", boolean.clone())
                .param("cs", char_sequence.clone())
                .static_method(),
            MethodSignature::new("isNotEmpty", boolean)
                .param("cs", char_sequence)
                .static_method(),
        ],
    )
}

#[test]
fn negated_is_empty_is_parenthesized() {
    let utils = string_utils("org.apache.commons.lang3.StringUtils");
    let is_empty = static_call(&utils, "isEmpty", vec![typed_ident("s", string())]);
    let source = boolean_returning(
        &["org.apache.commons.lang3.StringUtils"],
        not(Expression::MethodInvocation(is_empty)),
    );

    let result = run(AnyRecipe::plain(IsNotEmptyToJdk::new().unwrap()), &[source]);
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\npublic class A {\n    boolean test() {\n        return !(s == null || s.isEmpty());\n    }\n}\n"
    );
}

#[test]
fn is_not_empty_from_another_library() {
    let utils = string_utils("org.codehaus.plexus.util.StringUtils");
    let is_not_empty = static_call(&utils, "isNotEmpty", vec![typed_ident("s", string())]);
    let source = boolean_returning(
        &["java.util.List", "org.codehaus.plexus.util.StringUtils"],
        Expression::MethodInvocation(is_not_empty),
    );

    let result = run(AnyRecipe::plain(IsNotEmptyToJdk::new().unwrap()), &[source]);
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\nimport java.util.List;\n\npublic class A {\n    boolean test() {\n        return s != null && !s.isEmpty();\n    }\n}\n"
    );
}

#[test]
fn complex_arguments_are_left_alone() {
    let utils = string_utils("org.apache.commons.lang3.StringUtils");
    let trimmed = call(
        Some(typed_ident("s", string())),
        "trim",
        Vec::new(),
        string().as_class().and_then(|c| method_on(c, "trim", &[])),
    );
    let is_empty = static_call(&utils, "isEmpty", vec![Expression::MethodInvocation(trimmed)]);
    let source = boolean_returning(
        &["org.apache.commons.lang3.StringUtils"],
        Expression::MethodInvocation(is_empty),
    );

    let result = run(AnyRecipe::plain(IsNotEmptyToJdk::new().unwrap()), &[source]);
    assert!(result.results.is_empty());
}

// ============================================================================
// ApacheIOUtilsUseExplicitCharset
// ============================================================================

fn io_utils_call(encoding: Option<&str>) -> RunResult {
    let io_utils = library_class(
        "org.apache.commons.io.IOUtils",
        vec![MethodSignature::new("toString", string())
            .param("input", class_type("java.io.InputStream"))
            .static_method()],
    );
    let to_string = static_call(
        &io_utils,
        "toString",
        vec![typed_ident("in", class_type("java.io.InputStream"))],
    );
    let source = single_method_unit(
        "com/example/A.java",
        &["org.apache.commons.io.IOUtils"],
        Primitive::Void,
        vec![expression_statement(Expression::MethodInvocation(to_string), 2)],
    );
    let recipe = ApacheIOUtilsUseExplicitCharset::new(encoding).unwrap();
    run(AnyRecipe::plain(recipe), &[source])
}

#[test]
fn io_utils_calls_gain_a_charset() {
    let result = io_utils_call(None);
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\nimport java.nio.charset.StandardCharsets;\nimport org.apache.commons.io.IOUtils;\n\npublic class A {\n    void test() {\n        IOUtils.toString(in, StandardCharsets.UTF_8);\n    }\n}\n"
    );
}

#[test]
fn io_utils_encoding_is_configurable() {
    let result = io_utils_call(Some("ISO_8859_1"));
    assert!(printed_after(&result, "com/example/A.java")
        .contains("IOUtils.toString(in, StandardCharsets.ISO_8859_1);"));
}

// ============================================================================
// AddScopeToInjectedClass
// ============================================================================

const DEPENDENT: &str = "javax.enterprise.context.Dependent";

/// `Bar`, annotated with `scope` when given.
fn bar(scope: Option<&str>) -> Arc<CompilationUnit> {
    let mut bar = class(Some("com.sample.service"), "Bar", Vec::new());
    let mut imports = Vec::new();
    if let Some(scope) = scope {
        let scope_type = annotation_type(scope, &[]);
        bar = bar.with_leading_annotations(vec![annotation(&scope_type)]);
        bar = bar.with_modifiers(vec![Modifier::new(line(0), ModifierKind::Public)]);
        imports.push(scope);
    }
    unit("com/sample/service/Bar.java", Some("com.sample.service"), &imports, vec![bar])
}

fn foo(injection: Option<Arc<ClassType>>) -> Arc<CompilationUnit> {
    let bar_type = ClassType::builder("com.sample.service.Bar").build();
    let annotations = injection.iter().map(annotation).collect();
    let service = field(annotations, &bar_type, "service", "com.sample.Foo");
    let mut imports = vec!["com.sample.service.Bar"];
    if let Some(injection) = &injection {
        imports.push(injection.fqn.as_str());
    }
    unit(
        "com/sample/Foo.java",
        Some("com.sample"),
        &imports,
        vec![class(
            Some("com.sample"),
            "Foo",
            vec![Statement::VariableDeclarations(service)],
        )],
    )
}

fn inject() -> Arc<ClassType> {
    annotation_type("javax.inject.Inject", &[])
}

#[test]
fn injected_class_in_another_file_gets_a_scope() {
    // Bar comes first: its transform depends on the scan of Foo.
    let sources = [bar(None), foo(Some(inject()))];
    let result = run(AnyRecipe::scanning(AddScopeToInjectedClass::new().unwrap()), &sources);

    assert_eq!(result.results.len(), 1);
    assert_eq!(
        printed_after(&result, "com/sample/service/Bar.java"),
        "package com.sample.service;\n\nimport javax.enterprise.context.Dependent;\n\n@Dependent\npublic class Bar {\n}\n"
    );
    assert!(result.changed("com/sample/Foo.java").is_none());
}

#[test]
fn meta_annotated_injection_counts() {
    let inject_type = JavaType::Class(inject());
    let autowire = annotation_type("com.sample.Autowire", &[inject_type]);
    let sources = [bar(None), foo(Some(autowire))];
    let result = run(AnyRecipe::scanning(AddScopeToInjectedClass::new().unwrap()), &sources);
    assert!(result.changed("com/sample/service/Bar.java").is_some());
}

#[test]
fn plain_fields_and_scoped_classes_are_untouched() {
    let recipe = || AnyRecipe::scanning(AddScopeToInjectedClass::new().unwrap());

    let not_inject = annotation_type("javax.inject.NotInject", &[]);
    assert!(run(recipe(), &[bar(None), foo(Some(not_inject))]).results.is_empty());
    assert!(run(recipe(), &[bar(None), foo(None)]).results.is_empty());
    assert!(run(recipe(), &[bar(Some(DEPENDENT)), foo(Some(inject()))]).results.is_empty());
}

#[test]
fn only_the_cdi_dependent_counts_as_a_scope() {
    let sources = [bar(Some("com.other.Dependent")), foo(Some(inject()))];
    let result = run(AnyRecipe::scanning(AddScopeToInjectedClass::new().unwrap()), &sources);
    let after = result
        .changed("com/sample/service/Bar.java")
        .expect("Bar should gain a scope")
        .after
        .print();
    assert_eq!(after.matches("@Dependent").count(), 2, "{}", after);
}

// ============================================================================
// UseNoArgsConstructor
// ============================================================================

fn with_constructor(modifier: Option<ModifierKind>, body: Vec<Statement>) -> Arc<CompilationUnit> {
    unit(
        "com/example/A.java",
        Some("com.example"),
        &[],
        vec![class(
            Some("com.example"),
            "A",
            vec![Statement::MethodDeclaration(constructor("A", modifier, body))],
        )],
    )
}

#[test]
fn empty_public_constructor_becomes_an_annotation() {
    let result = run(
        AnyRecipe::plain(UseNoArgsConstructor::new().unwrap()),
        &[with_constructor(Some(ModifierKind::Public), Vec::new())],
    );
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\nimport lombok.NoArgsConstructor;\n\n@NoArgsConstructor\npublic class A {\n}\n"
    );
}

#[test]
fn constructor_visibility_is_kept() {
    let result = run(
        AnyRecipe::plain(UseNoArgsConstructor::new().unwrap()),
        &[with_constructor(Some(ModifierKind::Protected), Vec::new())],
    );
    assert_eq!(
        printed_after(&result, "com/example/A.java"),
        "package com.example;\n\nimport lombok.AccessLevel;\nimport lombok.NoArgsConstructor;\n\n@NoArgsConstructor(access = AccessLevel.PROTECTED)\npublic class A {\n}\n"
    );
}

#[test]
fn constructors_that_do_something_stay() {
    let work = expression_statement(
        Expression::MethodInvocation(call(
            Some(typed_ident("s", string())),
            "trim",
            Vec::new(),
            string().as_class().and_then(|c| method_on(c, "trim", &[])),
        )),
        2,
    );
    let result = run(
        AnyRecipe::plain(UseNoArgsConstructor::new().unwrap()),
        &[with_constructor(None, vec![work])],
    );
    assert!(result.results.is_empty());
}

// ============================================================================
// FindInternalJavaxApis
// ============================================================================

#[test]
fn javax_calls_are_marked_and_reported() {
    let factory_fqn = "javax.xml.stream.XMLInputFactory";
    let factory = library_class(
        factory_fqn,
        vec![MethodSignature::new(
            "newInstance",
            JavaType::Class(ClassType::shallow(factory_fqn)),
        )
        .static_method()],
    );
    let new_instance = static_call(&factory, "newInstance", Vec::new());
    let trim = call(
        Some(typed_ident("s", string())),
        "trim",
        Vec::new(),
        string().as_class().and_then(|c| method_on(c, "trim", &[])),
    );
    let source = single_method_unit(
        "com/example/A.java",
        &[factory_fqn],
        Primitive::Void,
        vec![
            expression_statement(Expression::MethodInvocation(new_instance), 2),
            expression_statement(Expression::MethodInvocation(trim), 2),
        ],
    );

    let result = run(
        AnyRecipe::plain(FindInternalJavaxApis::new(None).unwrap()),
        &[source.clone()],
    );

    let after = &result.changed("com/example/A.java").unwrap().after;
    assert_eq!(after.print(), source.print());
    let statements: Vec<&Statement> = after.classes[0]
        .methods()
        .next()
        .and_then(|m| m.body.as_ref())
        .map(|b| b.statements.iter().map(|s| &s.element).collect())
        .unwrap_or_default();
    assert!(statements[0].markers().find::<SearchResult>().is_some());
    assert!(statements[1].markers().find::<SearchResult>().is_none());

    let table = result
        .data_tables
        .iter()
        .find(|t| t.name == METHOD_CALLS)
        .unwrap();
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row["source_file"], "com/example/A.java");
    assert_eq!(row["method_call"], "XMLInputFactory.newInstance()");
    assert_eq!(row["class_name"], factory_fqn);
    assert_eq!(row["method_name"], "newInstance");
    assert_eq!(row["argument_types"], "");
}

#[test]
fn javax_search_respects_the_method_pattern() {
    let factory_fqn = "javax.xml.stream.XMLInputFactory";
    let factory = library_class(
        factory_fqn,
        vec![MethodSignature::new(
            "newInstance",
            JavaType::Class(ClassType::shallow(factory_fqn)),
        )
        .static_method()],
    );
    let source = single_method_unit(
        "com/example/A.java",
        &[factory_fqn],
        Primitive::Void,
        vec![expression_statement(
            Expression::MethodInvocation(static_call(&factory, "newInstance", Vec::new())),
            2,
        )],
    );
    let recipe = FindInternalJavaxApis::new(Some("javax.xml.stream.XMLInputFactory newFactory()")).unwrap();
    assert!(run(AnyRecipe::plain(recipe), &[source]).results.is_empty());
}
