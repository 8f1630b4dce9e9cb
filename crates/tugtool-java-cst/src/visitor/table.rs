// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A visitor assembled from closures.
//!
//! Useful for small recipes and tests: register a closure for the node
//! kinds of interest and leave every other kind to the default walk.
//!
//! ```ignore
//! let mut renamer = VisitorTable::new().on_identifier(|id, _ctx| {
//!     Ok(if id.simple_name == "a" { id.with_simple_name("b".into()) } else { Arc::clone(id) })
//! });
//! ```

use std::sync::Arc;

use super::context::VisitContext;
use super::dispatch::{
    walk_annotation, walk_array_type, walk_assignment, walk_binary, walk_block,
    walk_class_declaration, walk_compilation_unit, walk_field_access, walk_identifier, walk_if,
    walk_import, walk_literal, walk_method_declaration, walk_method_invocation,
    walk_named_variable, walk_new_class, walk_package, walk_parameterized_type, walk_parentheses,
    walk_primitive_type, walk_return, walk_ternary, walk_unary, walk_variable_declarations,
};
use super::traits::{JavaVisitor, VisitOutput};
use crate::nodes::{
    Annotation, ArrayTypeTree, Assignment, Binary, Block, ClassDeclaration, CompilationUnit,
    Expression, FieldAccess, Identifier, If, Import, Literal, MethodDeclaration, MethodInvocation,
    NamedVariable, NewClass, Package, Parentheses, ParameterizedTypeTree, PrimitiveTypeTree,
    Return, Statement, Ternary, Unary, VariableDeclarations,
};

/// Closure run on a node after its children were visited.
pub type Hook<'f, P, N, Out> =
    Box<dyn FnMut(&Arc<N>, &mut VisitContext<'_, P>) -> VisitOutput<Out> + 'f>;

macro_rules! visitor_table {
    ($($field:ident : $kind:ident => $out:ty, $hook:ident, $walk:ident;)*) => {
        /// A [`JavaVisitor`] whose hooks are optional closures.
        ///
        /// Each registered closure receives the node after the default walk
        /// of its children and returns the replacement.
        pub struct VisitorTable<'f, P> {
            deferred_key: Option<String>,
            $($field: Option<Hook<'f, P, $kind, $out>>,)*
        }

        impl<'f, P> Default for VisitorTable<'f, P> {
            fn default() -> Self {
                VisitorTable {
                    deferred_key: None,
                    $($field: None,)*
                }
            }
        }

        impl<'f, P> VisitorTable<'f, P> {
            paste::paste! {
                $(
                    #[doc = concat!("Register the hook for `", stringify!($kind), "` nodes.")]
                    pub fn [<on_ $field>](
                        mut self,
                        f: impl FnMut(&Arc<$kind>, &mut VisitContext<'_, P>) -> VisitOutput<$out> + 'f,
                    ) -> Self {
                        self.$field = Some(Box::new(f));
                        self
                    }
                )*
            }
        }

        impl<'f, P> JavaVisitor<P> for VisitorTable<'f, P> {
            fn deferred_key(&self) -> Option<String> {
                self.deferred_key.clone()
            }

            $(
                fn $hook(
                    &mut self,
                    node: &Arc<$kind>,
                    ctx: &mut VisitContext<'_, P>,
                ) -> VisitOutput<$out> {
                    let walked = $walk(self, node, ctx)?;
                    match self.$field.as_mut() {
                        Some(f) => f(&walked, ctx),
                        None => Ok(walked.into()),
                    }
                }
            )*
        }
    };
}

visitor_table! {
    compilation_unit: CompilationUnit => Arc<CompilationUnit>, visit_compilation_unit, walk_compilation_unit;
    package: Package => Arc<Package>, visit_package, walk_package;
    import: Import => Arc<Import>, visit_import, walk_import;
    class_declaration: ClassDeclaration => Arc<ClassDeclaration>, visit_class_declaration, walk_class_declaration;
    method_declaration: MethodDeclaration => Arc<MethodDeclaration>, visit_method_declaration, walk_method_declaration;
    variable_declarations: VariableDeclarations => Arc<VariableDeclarations>, visit_variable_declarations, walk_variable_declarations;
    named_variable: NamedVariable => Arc<NamedVariable>, visit_named_variable, walk_named_variable;
    annotation: Annotation => Arc<Annotation>, visit_annotation, walk_annotation;
    block: Block => Arc<Block>, visit_block, walk_block;
    return_statement: Return => Statement, visit_return, walk_return;
    if_statement: If => Statement, visit_if, walk_if;
    identifier: Identifier => Arc<Identifier>, visit_identifier, walk_identifier;
    field_access: FieldAccess => Arc<FieldAccess>, visit_field_access, walk_field_access;
    method_invocation: MethodInvocation => Expression, visit_method_invocation, walk_method_invocation;
    new_class: NewClass => Expression, visit_new_class, walk_new_class;
    literal: Literal => Expression, visit_literal, walk_literal;
    unary: Unary => Expression, visit_unary, walk_unary;
    binary: Binary => Expression, visit_binary, walk_binary;
    parentheses: Parentheses => Expression, visit_parentheses, walk_parentheses;
    assignment: Assignment => Expression, visit_assignment, walk_assignment;
    ternary: Ternary => Expression, visit_ternary, walk_ternary;
    parameterized_type: ParameterizedTypeTree => Arc<ParameterizedTypeTree>, visit_parameterized_type, walk_parameterized_type;
    array_type: ArrayTypeTree => Arc<ArrayTypeTree>, visit_array_type, walk_array_type;
    primitive_type: PrimitiveTypeTree => Arc<PrimitiveTypeTree>, visit_primitive_type, walk_primitive_type;
}

impl<'f, P> VisitorTable<'f, P> {
    pub fn new() -> Self {
        VisitorTable::default()
    }

    /// Key used to drop duplicates when this table is scheduled with
    /// [`VisitContext::do_after_visit`].
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.deferred_key = Some(key.into());
        self
    }
}
