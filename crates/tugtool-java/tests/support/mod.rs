// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Hand-made, attributed trees for recipe tests.
//!
//! Builders attach resolved types the way a front end would, so matchers and
//! preconditions see the same facts they would on parsed code. Layout is
//! ordinary Java with four-space indentation.

#![allow(dead_code)]

use std::sync::Arc;

use tugtool_java_cst::{
    Annotation, Block, ClassDeclaration, ClassKeyword, ClassType, CompilationUnit, Container,
    Expression, Identifier, Import, JavaType, JavaVersion, LeftPadded, Markers, MethodDeclaration,
    MethodInvocation, MethodSignature, MethodType, Modifier, ModifierKind, NamedVariable, NodeId,
    Package, Primitive, PrimitiveTypeTree, Return, RightPadded, Space, Statement, TypeCatalog,
    TypeKind, TypeTree, Unary, UnaryOperator, VariableDeclarations, VariableType,
};

// ============================================================================
// Types
// ============================================================================

pub fn jdk() -> TypeCatalog {
    TypeCatalog::jdk_core()
}

pub fn class_type(fqn: &str) -> JavaType {
    jdk()
        .class_type(fqn)
        .unwrap_or_else(|| JavaType::Class(ClassType::shallow(fqn)))
}

pub fn boolean() -> JavaType {
    JavaType::Primitive(Primitive::Boolean)
}

/// A library class with the given static methods.
pub fn library_class(fqn: &str, methods: Vec<MethodSignature>) -> Arc<ClassType> {
    let mut builder = ClassType::builder(fqn).supertype(class_type("java.lang.Object"));
    for method in methods {
        builder = builder.method(method);
    }
    builder.build()
}

pub fn annotation_type(fqn: &str, meta: &[JavaType]) -> Arc<ClassType> {
    let mut builder = ClassType::builder(fqn).kind(TypeKind::Annotation);
    for annotation in meta {
        builder = builder.annotation(annotation.clone());
    }
    builder.build()
}

pub fn method_on(class: &Arc<ClassType>, name: &str, arguments: &[Option<JavaType>]) -> Option<Arc<MethodType>> {
    class.resolve_method(name, arguments)
}

// ============================================================================
// Expressions
// ============================================================================

pub fn space(ws: &str) -> Space {
    Space::format(ws)
}

/// Prefix that starts a new line at `depth` levels of indentation.
pub fn line(depth: usize) -> Space {
    Space::format(&format!("\n{}", "    ".repeat(depth)))
}

pub fn typed_ident(name: &str, ty: JavaType) -> Expression {
    Expression::Identifier(Identifier::build(name, Some(ty)))
}

/// The simple name of `class`, used as the receiver of a static call.
pub fn type_name(class: &Arc<ClassType>) -> Expression {
    typed_ident(class.simple_name(), JavaType::Class(Arc::clone(class)))
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

/// `Owner.name(args)`, resolved against `owner`.
pub fn static_call(owner: &Arc<ClassType>, name: &str, args: Vec<Expression>) -> Arc<MethodInvocation> {
    let types: Vec<Option<JavaType>> = args.iter().map(Expression::type_of).collect();
    let method_type = method_on(owner, name, &types);
    call(Some(type_name(owner)), name, args, method_type)
}

pub fn not(expression: Expression) -> Expression {
    Expression::Unary(Arc::new(Unary {
        id: NodeId::fresh(),
        prefix: Space::EMPTY,
        markers: Markers::EMPTY,
        operator: LeftPadded::new(Space::EMPTY, UnaryOperator::Not),
        expression,
        java_type: Some(boolean()),
    }))
}

// ============================================================================
// Statements and declarations
// ============================================================================

/// An expression statement on its own line.
pub fn expression_statement(expression: Expression, depth: usize) -> Statement {
    Statement::Expression(expression.with_prefix(line(depth)))
}

pub fn return_statement(expression: Expression, depth: usize) -> Statement {
    Statement::Return(Arc::new(Return {
        id: NodeId::fresh(),
        prefix: line(depth),
        markers: Markers::EMPTY,
        expression: Some(expression.with_prefix(Space::single())),
    }))
}

/// `{ statements }` whose closing brace sits at `depth`.
pub fn block(statements: Vec<Statement>, depth: usize) -> Arc<Block> {
    Block::build(statements)
        .with_prefix(Space::single())
        .with_end(line(depth))
}

fn type_tree(name: &str, ty: JavaType) -> TypeTree {
    TypeTree::Identifier(Identifier::build(name, Some(ty)))
}

/// `@Name` resolved to `ty`.
pub fn annotation(ty: &Arc<ClassType>) -> Arc<Annotation> {
    Arc::new(Annotation {
        id: NodeId::fresh(),
        prefix: Space::EMPTY,
        markers: Markers::EMPTY,
        annotation_type: type_tree(ty.simple_name(), JavaType::Class(Arc::clone(ty))),
        arguments: None,
    })
}

/// A member method: `[public] <ret> name() { body }`.
pub fn method(name: &str, return_type: Primitive, body: Vec<Statement>) -> Arc<MethodDeclaration> {
    Arc::new(MethodDeclaration {
        id: NodeId::fresh(),
        prefix: line(1),
        markers: Markers::EMPTY,
        leading_annotations: Vec::new(),
        modifiers: Vec::new(),
        return_type: Some(TypeTree::PrimitiveTypeTree(PrimitiveTypeTree::build(return_type))),
        name: Identifier::build(name, None).with_prefix(Space::single()),
        parameters: Container::empty(),
        body: Some(block(body, 1)),
        method_type: None,
    })
}

/// `[modifier] Name() { body }`.
pub fn constructor(class: &str, modifier: Option<ModifierKind>, body: Vec<Statement>) -> Arc<MethodDeclaration> {
    let (modifiers, name_prefix) = match modifier {
        Some(kind) => (vec![Modifier::new(Space::EMPTY, kind)], Space::single()),
        None => (Vec::new(), Space::EMPTY),
    };
    Arc::new(MethodDeclaration {
        id: NodeId::fresh(),
        prefix: line(1),
        markers: Markers::EMPTY,
        leading_annotations: Vec::new(),
        modifiers,
        return_type: None,
        name: Identifier::build(class, None).with_prefix(name_prefix),
        parameters: Container::empty(),
        body: Some(block(body, 1)),
        method_type: None,
    })
}

/// A field `@A\n    Type name;` with one annotation per line.
pub fn field(annotations: Vec<Arc<Annotation>>, ty: &Arc<ClassType>, name: &str, owner: &str) -> Arc<VariableDeclarations> {
    let var_type = JavaType::Class(Arc::clone(ty));
    let annotations: Vec<Arc<Annotation>> = annotations
        .into_iter()
        .enumerate()
        .map(|(i, a)| if i == 0 { a } else { a.with_prefix(line(1)) })
        .collect();
    let type_prefix = if annotations.is_empty() { Space::EMPTY } else { line(1) };
    let variable_type = Arc::new(VariableType {
        name: name.to_string(),
        owner: Some(owner.to_string()),
        var_type: var_type.clone(),
        annotations: annotations.iter().filter_map(|a| a.type_of()).collect(),
    });
    let variable = Arc::new(NamedVariable {
        id: NodeId::fresh(),
        prefix: Space::single(),
        markers: Markers::EMPTY,
        name: Identifier::build(name, None),
        initializer: None,
        variable_type: Some(variable_type),
    });
    Arc::new(VariableDeclarations {
        id: NodeId::fresh(),
        prefix: line(1),
        markers: Markers::EMPTY,
        leading_annotations: annotations,
        modifiers: Vec::new(),
        type_expr: Some(type_tree(ty.simple_name(), var_type).with_prefix(type_prefix)),
        varargs: None,
        variables: vec![RightPadded::new(variable)],
    })
}

/// `public class name { members }`, typed as `package.name` when a package
/// is given.
pub fn class(package: Option<&str>, name: &str, members: Vec<Statement>) -> Arc<ClassDeclaration> {
    let fqn = match package {
        Some(package) => format!("{}.{}", package, name),
        None => name.to_string(),
    };
    let body_depth = 0;
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
        body: block(members, body_depth),
        class_type: Some(ClassType::builder(fqn).supertype(class_type("java.lang.Object")).build()),
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

/// `unit` compiled for Java `version`.
pub fn at_java(unit: Arc<CompilationUnit>, version: u32) -> Arc<CompilationUnit> {
    let markers = unit.markers.add(JavaVersion {
        source_compatibility: version,
    });
    unit.with_markers(markers)
}

/// A class `A` in `com.example` whose method `name` has `body`.
pub fn single_method_unit(path: &str, imports: &[&str], return_type: Primitive, body: Vec<Statement>) -> Arc<CompilationUnit> {
    unit(
        path,
        Some("com.example"),
        imports,
        vec![class(
            Some("com.example"),
            "A",
            vec![Statement::MethodDeclaration(method("test", return_type, body))],
        )],
    )
}
