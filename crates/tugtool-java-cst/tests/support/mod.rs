// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Hand-made trees for integration tests.
//!
//! There is no parser in this crate, so tests assemble compilation units
//! from these builders. Spacing follows ordinary Java layout with four-space
//! indentation so printed output is easy to compare.

#![allow(dead_code)]

use std::sync::Arc;

use tugtool_java_cst::{
    Block, ClassDeclaration, ClassKeyword, CompilationUnit, Container, Expression, Identifier,
    Import, JavaType, Literal, Markers, MethodDeclaration, MethodInvocation, MethodType, Modifier,
    ModifierKind, NodeId, Package, Primitive, PrimitiveTypeTree, Return, RightPadded, Space,
    Statement, TypeCatalog, TypeKind, TypeTree,
};

pub fn space(ws: &str) -> Space {
    Space::format(ws)
}

/// Prefix that starts a new line at `depth` levels of indentation.
pub fn line(depth: usize) -> Space {
    Space::format(&format!("\n{}", "    ".repeat(depth)))
}

pub fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier::build(name, None))
}

pub fn typed_ident(name: &str, ty: JavaType) -> Expression {
    Expression::Identifier(Identifier::build(name, Some(ty)))
}

pub fn literal(source: &str, primitive: Primitive) -> Expression {
    Expression::Literal(Arc::new(Literal {
        id: NodeId::fresh(),
        prefix: Space::EMPTY,
        markers: Markers::EMPTY,
        value_source: source.to_string(),
        java_type: Some(JavaType::Primitive(primitive)),
    }))
}

pub fn string_type() -> JavaType {
    TypeCatalog::jdk_core()
        .class_type("java.lang.String")
        .unwrap_or(JavaType::Unknown)
}

/// `String#name(...)` resolved against the JDK slice.
pub fn string_method(name: &str, arguments: &[Option<JavaType>]) -> Option<Arc<MethodType>> {
    let catalog = TypeCatalog::jdk_core();
    catalog.get("java.lang.String")?.resolve_method(name, arguments)
}

/// `select.name(args)`, with `", "` between arguments.
pub fn call(
    select: Option<Expression>,
    name: &str,
    args: Vec<Expression>,
    method_type: Option<Arc<MethodType>>,
) -> Arc<MethodInvocation> {
    let args = args
        .into_iter()
        .enumerate()
        .map(|(i, a)| if i == 0 { a } else { a.with_prefix(Space::single()) })
        .collect();
    Arc::new(MethodInvocation {
        id: NodeId::fresh(),
        prefix: Space::EMPTY,
        markers: Markers::EMPTY,
        select: select.map(RightPadded::new),
        name: Identifier::build(name, None),
        arguments: Container::build(args),
        method_type,
    })
}

/// An expression statement on its own line.
pub fn expression_statement(expression: Expression, depth: usize) -> Statement {
    Statement::Expression(expression.with_prefix(line(depth)))
}

pub fn return_statement(expression: Option<Expression>, depth: usize) -> Statement {
    Statement::Return(Arc::new(Return {
        id: NodeId::fresh(),
        prefix: line(depth),
        markers: Markers::EMPTY,
        expression: expression.map(|e| e.with_prefix(Space::single())),
    }))
}

/// `{ statements }` whose closing brace sits at `depth`.
pub fn block(statements: Vec<Statement>, depth: usize) -> Arc<Block> {
    Block::build(statements)
        .with_prefix(Space::single())
        .with_end(line(depth))
}

/// `void name() { body }` as a member of a top-level class.
pub fn void_method(name: &str, body: Vec<Statement>) -> Arc<MethodDeclaration> {
    Arc::new(MethodDeclaration {
        id: NodeId::fresh(),
        prefix: line(1),
        markers: Markers::EMPTY,
        leading_annotations: Vec::new(),
        modifiers: Vec::new(),
        return_type: Some(TypeTree::PrimitiveTypeTree(PrimitiveTypeTree::build(
            Primitive::Void,
        ))),
        name: Identifier::build(name, None).with_prefix(Space::single()),
        parameters: Container::empty(),
        body: Some(block(body, 1)),
        method_type: None,
    })
}

/// `public class name { members }`.
pub fn class(name: &str, members: Vec<Statement>) -> Arc<ClassDeclaration> {
    Arc::new(ClassDeclaration {
        id: NodeId::fresh(),
        prefix: Space::EMPTY,
        markers: Markers::EMPTY,
        leading_annotations: Vec::new(),
        modifiers: vec![Modifier::new(Space::EMPTY, ModifierKind::Public)],
        keyword: ClassKeyword {
            prefix: Space::single(),
            kind: TypeKind::Class,
        },
        name: Identifier::build(name, None).with_prefix(Space::single()),
        extends: None,
        implements: None,
        body: block(members, 0),
        class_type: None,
    })
}

/// A compilation unit with a package, imports and classes, laid out with
/// blank lines between the sections.
pub fn unit(
    path: &str,
    package: Option<&str>,
    imports: &[&str],
    classes: Vec<Arc<ClassDeclaration>>,
) -> Arc<CompilationUnit> {
    let package = package.map(|name| {
        Arc::new(Package {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            expression: Expression::qualified(name, None).with_prefix(Space::single()),
        })
    });
    let has_package = package.is_some();
    let imports: Vec<Arc<Import>> = imports
        .iter()
        .enumerate()
        .filter_map(|(i, fqn)| {
            let prefix = match (i, has_package) {
                (0, false) => Space::EMPTY,
                (0, true) => space("\n\n"),
                _ => space("\n"),
            };
            Import::build(fqn, false).map(|import| import.with_prefix(prefix))
        })
        .collect();
    let leading_gap = has_package || !imports.is_empty();
    let classes = classes
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            if i > 0 || leading_gap {
                c.with_prefix(space("\n\n"))
            } else {
                c
            }
        })
        .collect();
    CompilationUnit::build(path)
        .with_package(package)
        .with_imports(imports)
        .with_classes(classes)
        .with_eof(space("\n"))
}

/// The tree of
///
/// ```java
/// package com.example;
///
/// import java.util.List;
///
/// public class A {
///     void run() {
///         s.isEmpty();
///         return;
///     }
/// }
/// ```
pub fn sample_unit() -> Arc<CompilationUnit> {
    let is_empty = call(
        Some(typed_ident("s", string_type())),
        "isEmpty",
        Vec::new(),
        string_method("isEmpty", &[]),
    );
    let run = void_method(
        "run",
        vec![
            expression_statement(Expression::MethodInvocation(is_empty), 2),
            return_statement(None, 2),
        ],
    );
    unit(
        "com/example/A.java",
        Some("com.example"),
        &["java.util.List"],
        vec![class("A", vec![Statement::MethodDeclaration(run)])],
    )
}

pub const SAMPLE_SOURCE: &str = "package com.example;\n\nimport java.util.List;\n\npublic class A {\n    void run() {\n        s.isEmpty();\n        return;\n    }\n}\n";

/// The statements of the first method of the first class.
pub fn first_method_statements(unit: &CompilationUnit) -> Vec<Statement> {
    unit.classes
        .first()
        .and_then(|c| c.methods().next())
        .and_then(|m| m.body.as_ref())
        .map(|b| b.statements.iter().map(|s| s.element.clone()).collect())
        .unwrap_or_default()
}
