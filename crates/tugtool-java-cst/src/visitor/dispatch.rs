// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for tree traversal.
//!
//! `accept*` functions enter a child slot: they push the child onto the
//! cursor, run `pre_visit`, the child's hook and `post_visit`, and check
//! that the result still fits the slot. `walk_*` functions are the default
//! hook bodies: they accept every child in source order and rebuild the
//! node through its `with_*` editors, which hand back the original `Arc`
//! when nothing changed.

use std::sync::Arc;

use tugtool_core::error::TransformError;

use super::context::VisitContext;
use super::traits::{JavaVisitor, VisitOutput, VisitResult};
use crate::nodes::{
    Annotation, ArrayTypeTree, Assignment, Binary, Block, ClassDeclaration, CompilationUnit,
    Container, ElsePart, Expression, FieldAccess, Identifier, If, Import, LeftPadded, Literal,
    MethodDeclaration, MethodInvocation, NamedVariable, NewClass, Package, Parentheses,
    ParameterizedTypeTree, PrimitiveTypeTree, RefEq, Return, RightPadded, Statement, Ternary,
    Tree, TreeSlot, TypeTree, Unary, VariableDeclarations,
};

// ============================================================================
// Accepting slots
// ============================================================================

/// Enter one child slot and run `hook` on it.
pub fn accept<P, V, T, F>(
    v: &mut V,
    node: &T,
    ctx: &mut VisitContext<'_, P>,
    hook: F,
) -> VisitOutput<T>
where
    V: JavaVisitor<P> + ?Sized,
    T: TreeSlot,
    F: FnOnce(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    if ctx.is_stopped() {
        return Ok(node.clone());
    }

    let tree = node.clone().into_tree();
    let kind = tree.kind_name();
    ctx.cursor_mut().push(tree.clone());
    let result = enter(v, node, &tree, ctx, hook);
    ctx.cursor_mut().pop();

    let out = result?;
    T::from_tree(out).ok_or_else(|| {
        TransformError::invariant(format!(
            "a {} slot cannot hold the node returned for it",
            kind
        ))
    })
}

fn enter<P, V, T, F>(
    v: &mut V,
    node: &T,
    tree: &Tree,
    ctx: &mut VisitContext<'_, P>,
    hook: F,
) -> VisitOutput<Tree>
where
    V: JavaVisitor<P> + ?Sized,
    T: TreeSlot,
    F: FnOnce(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    let visited = match v.pre_visit(tree, ctx) {
        VisitResult::Stop => {
            ctx.stop();
            return Ok(tree.clone());
        }
        VisitResult::SkipChildren => tree.clone(),
        VisitResult::Continue => hook(v, node, ctx)?.into_tree(),
    };
    ctx.cursor_mut().set_value(visited.clone());
    v.post_visit(visited, ctx)
}

/// Accept every element of a list slot.
pub fn accept_all<P, V, T, F>(
    v: &mut V,
    items: &[T],
    ctx: &mut VisitContext<'_, P>,
    mut f: F,
) -> VisitOutput<Vec<T>>
where
    V: JavaVisitor<P> + ?Sized,
    F: FnMut(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    items.iter().map(|item| f(v, item, ctx)).collect()
}

pub fn accept_option<P, V, T, F>(
    v: &mut V,
    item: &Option<T>,
    ctx: &mut VisitContext<'_, P>,
    f: F,
) -> VisitOutput<Option<T>>
where
    V: JavaVisitor<P> + ?Sized,
    F: FnOnce(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    match item {
        Some(item) => Ok(Some(f(v, item, ctx)?)),
        None => Ok(None),
    }
}

pub fn accept_right_padded<P, V, T, F>(
    v: &mut V,
    padded: &RightPadded<T>,
    ctx: &mut VisitContext<'_, P>,
    f: F,
) -> VisitOutput<RightPadded<T>>
where
    V: JavaVisitor<P> + ?Sized,
    T: RefEq + Clone,
    F: FnOnce(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    Ok(padded.with_element(f(v, &padded.element, ctx)?))
}

pub fn accept_left_padded<P, V, T, F>(
    v: &mut V,
    padded: &LeftPadded<T>,
    ctx: &mut VisitContext<'_, P>,
    f: F,
) -> VisitOutput<LeftPadded<T>>
where
    V: JavaVisitor<P> + ?Sized,
    T: RefEq + Clone,
    F: FnOnce(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    Ok(padded.with_element(f(v, &padded.element, ctx)?))
}

pub fn accept_container<P, V, T, F>(
    v: &mut V,
    container: &Container<T>,
    ctx: &mut VisitContext<'_, P>,
    mut f: F,
) -> VisitOutput<Container<T>>
where
    V: JavaVisitor<P> + ?Sized,
    T: RefEq + Clone,
    F: FnMut(&mut V, &T, &mut VisitContext<'_, P>) -> VisitOutput<T>,
{
    let elements = container
        .elements
        .iter()
        .map(|p| accept_right_padded(v, p, ctx, &mut f))
        .collect::<VisitOutput<Vec<_>>>()?;
    Ok(container.with_elements(elements))
}

pub fn accept_statement<P, V>(
    v: &mut V,
    node: &Statement,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Statement>
where
    V: JavaVisitor<P> + ?Sized,
{
    accept(v, node, ctx, |v, n, ctx| v.visit_statement(n, ctx))
}

pub fn accept_expression<P, V>(
    v: &mut V,
    node: &Expression,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Expression>
where
    V: JavaVisitor<P> + ?Sized,
{
    accept(v, node, ctx, |v, n, ctx| v.visit_expression(n, ctx))
}

pub fn accept_type_tree<P, V>(
    v: &mut V,
    node: &TypeTree,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<TypeTree>
where
    V: JavaVisitor<P> + ?Sized,
{
    accept(v, node, ctx, |v, n, ctx| v.visit_type_tree(n, ctx))
}

/// Accept a node of any kind, e.g. the root of a traversal.
pub fn accept_tree<P, V>(v: &mut V, node: &Tree, ctx: &mut VisitContext<'_, P>) -> VisitOutput<Tree>
where
    V: JavaVisitor<P> + ?Sized,
{
    accept(v, node, ctx, walk_tree)
}

/// Accept functions for single-kind slots.
macro_rules! accept_kind {
    ($($name:ident : $kind:ident => $hook:ident;)*) => {
        $(
            pub fn $name<P, V>(
                v: &mut V,
                node: &Arc<$kind>,
                ctx: &mut VisitContext<'_, P>,
            ) -> VisitOutput<Arc<$kind>>
            where
                V: JavaVisitor<P> + ?Sized,
            {
                accept(v, node, ctx, |v, n, ctx| v.$hook(n, ctx))
            }
        )*
    };
}

accept_kind! {
    accept_compilation_unit: CompilationUnit => visit_compilation_unit;
    accept_package: Package => visit_package;
    accept_import: Import => visit_import;
    accept_class_declaration: ClassDeclaration => visit_class_declaration;
    accept_variable_declarations: VariableDeclarations => visit_variable_declarations;
    accept_named_variable: NamedVariable => visit_named_variable;
    accept_annotation: Annotation => visit_annotation;
    accept_block: Block => visit_block;
    accept_identifier: Identifier => visit_identifier;
    accept_field_access: FieldAccess => visit_field_access;
}

// ============================================================================
// Category dispatch
// ============================================================================

/// Dispatch any node to its hook.
pub fn walk_tree<P, V>(v: &mut V, node: &Tree, ctx: &mut VisitContext<'_, P>) -> VisitOutput<Tree>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(match node {
        Tree::CompilationUnit(n) => v.visit_compilation_unit(n, ctx)?.into_tree(),
        Tree::Package(n) => v.visit_package(n, ctx)?.into_tree(),
        Tree::Import(n) => v.visit_import(n, ctx)?.into_tree(),
        Tree::ClassDeclaration(n) => v.visit_class_declaration(n, ctx)?.into_tree(),
        Tree::MethodDeclaration(n) => v.visit_method_declaration(n, ctx)?.into_tree(),
        Tree::VariableDeclarations(n) => v.visit_variable_declarations(n, ctx)?.into_tree(),
        Tree::NamedVariable(n) => v.visit_named_variable(n, ctx)?.into_tree(),
        Tree::Block(n) => v.visit_block(n, ctx)?.into_tree(),
        Tree::Return(n) => v.visit_return(n, ctx)?.into_tree(),
        Tree::If(n) => v.visit_if(n, ctx)?.into_tree(),
        Tree::Annotation(n) => v.visit_annotation(n, ctx)?.into_tree(),
        Tree::Identifier(n) => v.visit_identifier(n, ctx)?.into_tree(),
        Tree::FieldAccess(n) => v.visit_field_access(n, ctx)?.into_tree(),
        Tree::MethodInvocation(n) => v.visit_method_invocation(n, ctx)?.into_tree(),
        Tree::NewClass(n) => v.visit_new_class(n, ctx)?.into_tree(),
        Tree::Literal(n) => v.visit_literal(n, ctx)?.into_tree(),
        Tree::Unary(n) => v.visit_unary(n, ctx)?.into_tree(),
        Tree::Binary(n) => v.visit_binary(n, ctx)?.into_tree(),
        Tree::Parentheses(n) => v.visit_parentheses(n, ctx)?.into_tree(),
        Tree::Assignment(n) => v.visit_assignment(n, ctx)?.into_tree(),
        Tree::Ternary(n) => v.visit_ternary(n, ctx)?.into_tree(),
        Tree::ParameterizedTypeTree(n) => v.visit_parameterized_type(n, ctx)?.into_tree(),
        Tree::ArrayTypeTree(n) => v.visit_array_type(n, ctx)?.into_tree(),
        Tree::PrimitiveTypeTree(n) => v.visit_primitive_type(n, ctx)?.into_tree(),
    })
}

pub fn walk_statement<P, V>(
    v: &mut V,
    node: &Statement,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Statement>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(match node {
        Statement::ClassDeclaration(n) => v.visit_class_declaration(n, ctx)?.into(),
        Statement::MethodDeclaration(n) => v.visit_method_declaration(n, ctx)?.into(),
        Statement::VariableDeclarations(n) => v.visit_variable_declarations(n, ctx)?.into(),
        Statement::Block(n) => v.visit_block(n, ctx)?.into(),
        Statement::Return(n) => v.visit_return(n, ctx)?,
        Statement::If(n) => v.visit_if(n, ctx)?,
        // Same cursor frame as the statement.
        Statement::Expression(e) => Statement::Expression(v.visit_expression(e, ctx)?),
    })
}

pub fn walk_expression<P, V>(
    v: &mut V,
    node: &Expression,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Expression>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(match node {
        Expression::Identifier(n) => v.visit_identifier(n, ctx)?.into(),
        Expression::FieldAccess(n) => v.visit_field_access(n, ctx)?.into(),
        Expression::MethodInvocation(n) => v.visit_method_invocation(n, ctx)?,
        Expression::NewClass(n) => v.visit_new_class(n, ctx)?,
        Expression::Literal(n) => v.visit_literal(n, ctx)?,
        Expression::Unary(n) => v.visit_unary(n, ctx)?,
        Expression::Binary(n) => v.visit_binary(n, ctx)?,
        Expression::Parentheses(n) => v.visit_parentheses(n, ctx)?,
        Expression::Assignment(n) => v.visit_assignment(n, ctx)?,
        Expression::Ternary(n) => v.visit_ternary(n, ctx)?,
    })
}

pub fn walk_type_tree<P, V>(
    v: &mut V,
    node: &TypeTree,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<TypeTree>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(match node {
        TypeTree::Identifier(n) => v.visit_identifier(n, ctx)?.into(),
        TypeTree::FieldAccess(n) => v.visit_field_access(n, ctx)?.into(),
        TypeTree::ParameterizedTypeTree(n) => v.visit_parameterized_type(n, ctx)?.into(),
        TypeTree::ArrayTypeTree(n) => v.visit_array_type(n, ctx)?.into(),
        TypeTree::PrimitiveTypeTree(n) => v.visit_primitive_type(n, ctx)?.into(),
    })
}

// ============================================================================
// Declarations
// ============================================================================

pub fn walk_compilation_unit<P, V>(
    v: &mut V,
    node: &Arc<CompilationUnit>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<CompilationUnit>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let package = accept_option(v, &node.package, ctx, accept_package)?;
    let imports = accept_all(v, &node.imports, ctx, accept_import)?;
    let classes = accept_all(v, &node.classes, ctx, accept_class_declaration)?;
    Ok(node
        .with_package(package)
        .with_imports(imports)
        .with_classes(classes))
}

pub fn walk_package<P, V>(
    v: &mut V,
    node: &Arc<Package>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Package>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let expression = accept_expression(v, &node.expression, ctx)?;
    Ok(node.with_expression(expression))
}

pub fn walk_import<P, V>(
    v: &mut V,
    node: &Arc<Import>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Import>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let qualid = accept_field_access(v, &node.qualid, ctx)?;
    Ok(node.with_qualid(qualid))
}

pub fn walk_class_declaration<P, V>(
    v: &mut V,
    node: &Arc<ClassDeclaration>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<ClassDeclaration>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let annotations = accept_all(v, &node.leading_annotations, ctx, accept_annotation)?;
    let name = accept_identifier(v, &node.name, ctx)?;
    let extends = accept_option(v, &node.extends, ctx, |v, e, ctx| {
        accept_left_padded(v, e, ctx, accept_type_tree)
    })?;
    let implements = accept_option(v, &node.implements, ctx, |v, c, ctx| {
        accept_container(v, c, ctx, accept_type_tree)
    })?;
    let body = accept_block(v, &node.body, ctx)?;
    Ok(node
        .with_leading_annotations(annotations)
        .with_name(name)
        .with_extends(extends)
        .with_implements(implements)
        .with_body(body))
}

pub fn walk_method_declaration<P, V>(
    v: &mut V,
    node: &Arc<MethodDeclaration>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<MethodDeclaration>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let annotations = accept_all(v, &node.leading_annotations, ctx, accept_annotation)?;
    let return_type = accept_option(v, &node.return_type, ctx, accept_type_tree)?;
    let name = accept_identifier(v, &node.name, ctx)?;
    let parameters = accept_container(v, &node.parameters, ctx, accept_variable_declarations)?;
    let body = accept_option(v, &node.body, ctx, accept_block)?;
    Ok(node
        .with_leading_annotations(annotations)
        .with_return_type(return_type)
        .with_name(name)
        .with_parameters(parameters)
        .with_body(body))
}

pub fn walk_variable_declarations<P, V>(
    v: &mut V,
    node: &Arc<VariableDeclarations>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<VariableDeclarations>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let annotations = accept_all(v, &node.leading_annotations, ctx, accept_annotation)?;
    let type_expr = accept_option(v, &node.type_expr, ctx, accept_type_tree)?;
    let variables = accept_all(v, &node.variables, ctx, |v, p, ctx| {
        accept_right_padded(v, p, ctx, accept_named_variable)
    })?;
    Ok(node
        .with_leading_annotations(annotations)
        .with_type_expr(type_expr)
        .with_variables(variables))
}

pub fn walk_named_variable<P, V>(
    v: &mut V,
    node: &Arc<NamedVariable>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<NamedVariable>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let name = accept_identifier(v, &node.name, ctx)?;
    let initializer = accept_option(v, &node.initializer, ctx, |v, i, ctx| {
        accept_left_padded(v, i, ctx, accept_expression)
    })?;
    Ok(node.with_name(name).with_initializer(initializer))
}

pub fn walk_annotation<P, V>(
    v: &mut V,
    node: &Arc<Annotation>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Annotation>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let annotation_type = accept_type_tree(v, &node.annotation_type, ctx)?;
    let arguments = accept_option(v, &node.arguments, ctx, |v, c, ctx| {
        accept_container(v, c, ctx, accept_expression)
    })?;
    Ok(node
        .with_annotation_type(annotation_type)
        .with_arguments(arguments))
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_block<P, V>(
    v: &mut V,
    node: &Arc<Block>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Block>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let statements = accept_all(v, &node.statements, ctx, |v, p, ctx| {
        accept_right_padded(v, p, ctx, accept_statement)
    })?;
    Ok(node.with_statements(statements))
}

pub fn walk_return<P, V>(
    v: &mut V,
    node: &Arc<Return>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Return>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let expression = accept_option(v, &node.expression, ctx, accept_expression)?;
    Ok(node.with_expression(expression))
}

pub fn walk_if<P, V>(
    v: &mut V,
    node: &Arc<If>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<If>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let condition = accept_expression(v, &node.condition, ctx)?;
    let then_part = accept_right_padded(v, &node.then_part, ctx, accept_statement)?;
    let else_part = accept_option(v, &node.else_part, ctx, |v, e, ctx| {
        let body = accept_right_padded(v, &e.body, ctx, accept_statement)?;
        Ok(ElsePart {
            before: e.before.clone(),
            body,
        })
    })?;
    Ok(node
        .with_condition(condition)
        .with_then_part(then_part)
        .with_else_part(else_part))
}

// ============================================================================
// Expressions
// ============================================================================

pub fn walk_identifier<P, V>(
    _v: &mut V,
    node: &Arc<Identifier>,
    _ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Identifier>>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(Arc::clone(node))
}

pub fn walk_field_access<P, V>(
    v: &mut V,
    node: &Arc<FieldAccess>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<FieldAccess>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let target = accept_expression(v, &node.target, ctx)?;
    let name = accept_left_padded(v, &node.name, ctx, accept_identifier)?;
    Ok(node.with_target(target).with_name(name))
}

pub fn walk_method_invocation<P, V>(
    v: &mut V,
    node: &Arc<MethodInvocation>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<MethodInvocation>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let select = accept_option(v, &node.select, ctx, |v, s, ctx| {
        accept_right_padded(v, s, ctx, accept_expression)
    })?;
    let name = accept_identifier(v, &node.name, ctx)?;
    let arguments = accept_container(v, &node.arguments, ctx, accept_expression)?;
    Ok(node
        .with_select(select)
        .with_name(name)
        .with_arguments(arguments))
}

pub fn walk_new_class<P, V>(
    v: &mut V,
    node: &Arc<NewClass>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<NewClass>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let clazz = accept_type_tree(v, &node.clazz, ctx)?;
    let arguments = accept_container(v, &node.arguments, ctx, accept_expression)?;
    Ok(node.with_clazz(clazz).with_arguments(arguments))
}

pub fn walk_literal<P, V>(
    _v: &mut V,
    node: &Arc<Literal>,
    _ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Literal>>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(Arc::clone(node))
}

pub fn walk_unary<P, V>(
    v: &mut V,
    node: &Arc<Unary>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Unary>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let expression = accept_expression(v, &node.expression, ctx)?;
    Ok(node.with_expression(expression))
}

pub fn walk_binary<P, V>(
    v: &mut V,
    node: &Arc<Binary>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Binary>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let left = accept_expression(v, &node.left, ctx)?;
    let right = accept_expression(v, &node.right, ctx)?;
    Ok(node.with_left(left).with_right(right))
}

pub fn walk_parentheses<P, V>(
    v: &mut V,
    node: &Arc<Parentheses>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Parentheses>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let tree = accept_right_padded(v, &node.tree, ctx, accept_expression)?;
    Ok(node.with_tree(tree))
}

pub fn walk_assignment<P, V>(
    v: &mut V,
    node: &Arc<Assignment>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Assignment>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let variable = accept_expression(v, &node.variable, ctx)?;
    let assignment = accept_left_padded(v, &node.assignment, ctx, accept_expression)?;
    Ok(node.with_variable(variable).with_assignment(assignment))
}

pub fn walk_ternary<P, V>(
    v: &mut V,
    node: &Arc<Ternary>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<Ternary>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let condition = accept_expression(v, &node.condition, ctx)?;
    let true_part = accept_left_padded(v, &node.true_part, ctx, accept_expression)?;
    let false_part = accept_left_padded(v, &node.false_part, ctx, accept_expression)?;
    Ok(node
        .with_condition(condition)
        .with_true_part(true_part)
        .with_false_part(false_part))
}

// ============================================================================
// Type trees
// ============================================================================

pub fn walk_parameterized_type<P, V>(
    v: &mut V,
    node: &Arc<ParameterizedTypeTree>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<ParameterizedTypeTree>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let clazz = accept_type_tree(v, &node.clazz, ctx)?;
    let type_parameters = accept_option(v, &node.type_parameters, ctx, |v, c, ctx| {
        accept_container(v, c, ctx, accept_type_tree)
    })?;
    Ok(node.with_clazz(clazz).with_type_parameters(type_parameters))
}

pub fn walk_array_type<P, V>(
    v: &mut V,
    node: &Arc<ArrayTypeTree>,
    ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<ArrayTypeTree>>
where
    V: JavaVisitor<P> + ?Sized,
{
    let element_type = accept_type_tree(v, &node.element_type, ctx)?;
    Ok(node.with_element_type(element_type))
}

pub fn walk_primitive_type<P, V>(
    _v: &mut V,
    node: &Arc<PrimitiveTypeTree>,
    _ctx: &mut VisitContext<'_, P>,
) -> VisitOutput<Arc<PrimitiveTypeTree>>
where
    V: JavaVisitor<P> + ?Sized,
{
    Ok(Arc::clone(node))
}
