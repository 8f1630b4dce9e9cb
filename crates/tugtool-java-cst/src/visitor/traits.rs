// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The [`JavaVisitor`] trait.

use std::sync::Arc;

use tugtool_core::error::TransformError;

use super::context::VisitContext;
use super::dispatch::{
    walk_annotation, walk_array_type, walk_assignment, walk_binary, walk_block,
    walk_class_declaration, walk_compilation_unit, walk_expression, walk_field_access,
    walk_identifier, walk_if, walk_import, walk_literal, walk_method_declaration,
    walk_method_invocation, walk_named_variable, walk_new_class, walk_package,
    walk_parameterized_type, walk_parentheses, walk_primitive_type, walk_return, walk_statement,
    walk_ternary, walk_type_tree, walk_unary, walk_variable_declarations,
};
use crate::nodes::{
    Annotation, ArrayTypeTree, Assignment, Binary, Block, ClassDeclaration, CompilationUnit,
    Expression, FieldAccess, Identifier, If, Import, Literal, MethodDeclaration, MethodInvocation,
    NamedVariable, NewClass, Package, Parentheses, ParameterizedTypeTree, PrimitiveTypeTree,
    Return, Statement, Ternary, Tree, TypeTree, Unary, VariableDeclarations,
};

/// Result of [`JavaVisitor::pre_visit`] - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Run the node's hook, which visits its children.
    #[default]
    Continue,

    /// Keep the node as it is and continue with its siblings.
    ///
    /// The node's hook is not called, but `post_visit` still is.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// Every node not yet visited is kept unchanged and no further hook
    /// runs. Edits already made are kept.
    Stop,
}

/// What every hook returns.
pub type VisitOutput<T> = Result<T, TransformError>;

/// A tree visitor and transformer.
///
/// Each hook receives a node and returns its replacement. The default
/// implementations visit the node's children and rebuild the node only if
/// a child changed, so a visitor that overrides nothing returns the very
/// same tree.
///
/// Hooks for node kinds that occupy a single kind of slot return that kind.
/// Hooks for statement and expression kinds return the category, so a hook
/// may replace, say, a method invocation with a literal.
///
/// Within a hook, `ctx.cursor()` is positioned on the node being visited.
#[allow(unused_variables)]
pub trait JavaVisitor<P> {
    /// Called when entering any node, before its hook.
    fn pre_visit(&mut self, tree: &Tree, ctx: &mut VisitContext<'_, P>) -> VisitResult {
        VisitResult::Continue
    }

    /// Called when leaving any node, with the hook's result.
    ///
    /// The returned node must fit the slot the original came from.
    fn post_visit(&mut self, tree: Tree, ctx: &mut VisitContext<'_, P>) -> VisitOutput<Tree> {
        Ok(tree)
    }

    /// Identity used to drop duplicate deferred visits. Visitors with the
    /// same key are scheduled at most once per traversal.
    fn deferred_key(&self) -> Option<String> {
        None
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    fn visit_statement(
        &mut self,
        node: &Statement,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Statement> {
        walk_statement(self, node, ctx)
    }

    fn visit_expression(
        &mut self,
        node: &Expression,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_expression(self, node, ctx)
    }

    fn visit_type_tree(
        &mut self,
        node: &TypeTree,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<TypeTree> {
        walk_type_tree(self, node, ctx)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn visit_compilation_unit(
        &mut self,
        node: &Arc<CompilationUnit>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<CompilationUnit>> {
        walk_compilation_unit(self, node, ctx)
    }

    fn visit_package(
        &mut self,
        node: &Arc<Package>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<Package>> {
        walk_package(self, node, ctx)
    }

    fn visit_import(
        &mut self,
        node: &Arc<Import>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<Import>> {
        walk_import(self, node, ctx)
    }

    fn visit_class_declaration(
        &mut self,
        node: &Arc<ClassDeclaration>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<ClassDeclaration>> {
        walk_class_declaration(self, node, ctx)
    }

    fn visit_method_declaration(
        &mut self,
        node: &Arc<MethodDeclaration>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<MethodDeclaration>> {
        walk_method_declaration(self, node, ctx)
    }

    fn visit_variable_declarations(
        &mut self,
        node: &Arc<VariableDeclarations>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<VariableDeclarations>> {
        walk_variable_declarations(self, node, ctx)
    }

    fn visit_named_variable(
        &mut self,
        node: &Arc<NamedVariable>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<NamedVariable>> {
        walk_named_variable(self, node, ctx)
    }

    fn visit_annotation(
        &mut self,
        node: &Arc<Annotation>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<Annotation>> {
        walk_annotation(self, node, ctx)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn visit_block(
        &mut self,
        node: &Arc<Block>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<Block>> {
        walk_block(self, node, ctx)
    }

    fn visit_return(
        &mut self,
        node: &Arc<Return>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Statement> {
        walk_return(self, node, ctx).map(Statement::from)
    }

    fn visit_if(&mut self, node: &Arc<If>, ctx: &mut VisitContext<'_, P>) -> VisitOutput<Statement> {
        walk_if(self, node, ctx).map(Statement::from)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn visit_identifier(
        &mut self,
        node: &Arc<Identifier>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<Identifier>> {
        walk_identifier(self, node, ctx)
    }

    fn visit_field_access(
        &mut self,
        node: &Arc<FieldAccess>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<FieldAccess>> {
        walk_field_access(self, node, ctx)
    }

    fn visit_method_invocation(
        &mut self,
        node: &Arc<MethodInvocation>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_method_invocation(self, node, ctx).map(Expression::from)
    }

    fn visit_new_class(
        &mut self,
        node: &Arc<NewClass>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_new_class(self, node, ctx).map(Expression::from)
    }

    fn visit_literal(
        &mut self,
        node: &Arc<Literal>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_literal(self, node, ctx).map(Expression::from)
    }

    fn visit_unary(
        &mut self,
        node: &Arc<Unary>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_unary(self, node, ctx).map(Expression::from)
    }

    fn visit_binary(
        &mut self,
        node: &Arc<Binary>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_binary(self, node, ctx).map(Expression::from)
    }

    fn visit_parentheses(
        &mut self,
        node: &Arc<Parentheses>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_parentheses(self, node, ctx).map(Expression::from)
    }

    fn visit_assignment(
        &mut self,
        node: &Arc<Assignment>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_assignment(self, node, ctx).map(Expression::from)
    }

    fn visit_ternary(
        &mut self,
        node: &Arc<Ternary>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Expression> {
        walk_ternary(self, node, ctx).map(Expression::from)
    }

    // ------------------------------------------------------------------
    // Type trees
    // ------------------------------------------------------------------

    fn visit_parameterized_type(
        &mut self,
        node: &Arc<ParameterizedTypeTree>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<ParameterizedTypeTree>> {
        walk_parameterized_type(self, node, ctx)
    }

    fn visit_array_type(
        &mut self,
        node: &Arc<ArrayTypeTree>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<ArrayTypeTree>> {
        walk_array_type(self, node, ctx)
    }

    fn visit_primitive_type(
        &mut self,
        node: &Arc<PrimitiveTypeTree>,
        ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<PrimitiveTypeTree>> {
        walk_primitive_type(self, node, ctx)
    }
}
