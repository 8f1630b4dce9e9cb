// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Printing trees back to source.
//!
//! Printing is lossless: every byte of whitespace and every comment lives in
//! a [`Space`], so a tree that was never edited prints back exactly as it was
//! read. Edited regions print with whatever spacing the edit supplied.

use std::fmt;
use std::sync::Arc;

use crate::nodes::{
    Annotation, ArrayTypeTree, Assignment, Binary, Block, ClassDeclaration, CompilationUnit,
    Container, Expression, FieldAccess, Identifier, If, Import, Literal, MethodDeclaration,
    MethodInvocation, Modifier, NamedVariable, NewClass, Package, Parentheses,
    ParameterizedTypeTree, PrimitiveTypeTree, Return, RightPadded, Space, Statement, Ternary,
    Tree, TypeTree, Unary, VariableDeclarations,
};

/// Accumulates printed source.
#[derive(Debug, Default)]
pub struct CodegenState {
    pub tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Something that prints as source text.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    fn print(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens
    }
}

impl<T: Codegen + ?Sized> Codegen for Arc<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state);
    }
}

impl Codegen for Space {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.whitespace);
        for comment in &self.comments {
            if comment.multiline {
                state.add_token("/*");
                state.add_token(&comment.text);
                state.add_token("*/");
            } else {
                state.add_token("//");
                state.add_token(&comment.text);
            }
            state.add_token(&comment.suffix);
        }
    }
}

impl Codegen for Modifier {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token(self.kind.keyword());
    }
}

/// Print `open e1 sep e2 ... close`, with each element's trailing space
/// before its delimiter.
fn container_codegen<T: Codegen>(
    container: &Container<T>,
    open: &str,
    separator: &str,
    close: &str,
    state: &mut CodegenState,
) {
    container.before.codegen(state);
    state.add_token(open);
    delimited_codegen(&container.elements, separator, state);
    state.add_token(close);
}

fn delimited_codegen<T: Codegen>(elements: &[RightPadded<T>], separator: &str, state: &mut CodegenState) {
    let last = elements.len().saturating_sub(1);
    for (i, padded) in elements.iter().enumerate() {
        padded.element.codegen(state);
        padded.after.codegen(state);
        if i < last {
            state.add_token(separator);
        }
    }
}

fn statement_codegen(padded: &RightPadded<Statement>, state: &mut CodegenState) {
    padded.element.codegen(state);
    padded.after.codegen(state);
    if padded.element.needs_semicolon() {
        state.add_token(";");
    }
}

fn leading_codegen(annotations: &[Arc<Annotation>], modifiers: &[Modifier], state: &mut CodegenState) {
    for annotation in annotations {
        annotation.codegen(state);
    }
    for modifier in modifiers {
        modifier.codegen(state);
    }
}

// ============================================================================
// Categories
// ============================================================================

impl Codegen for Tree {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Tree::CompilationUnit(n) => n.codegen(state),
            Tree::Package(n) => n.codegen(state),
            Tree::Import(n) => n.codegen(state),
            Tree::ClassDeclaration(n) => n.codegen(state),
            Tree::MethodDeclaration(n) => n.codegen(state),
            Tree::VariableDeclarations(n) => n.codegen(state),
            Tree::NamedVariable(n) => n.codegen(state),
            Tree::Block(n) => n.codegen(state),
            Tree::Return(n) => n.codegen(state),
            Tree::If(n) => n.codegen(state),
            Tree::Annotation(n) => n.codegen(state),
            Tree::Identifier(n) => n.codegen(state),
            Tree::FieldAccess(n) => n.codegen(state),
            Tree::MethodInvocation(n) => n.codegen(state),
            Tree::NewClass(n) => n.codegen(state),
            Tree::Literal(n) => n.codegen(state),
            Tree::Unary(n) => n.codegen(state),
            Tree::Binary(n) => n.codegen(state),
            Tree::Parentheses(n) => n.codegen(state),
            Tree::Assignment(n) => n.codegen(state),
            Tree::Ternary(n) => n.codegen(state),
            Tree::ParameterizedTypeTree(n) => n.codegen(state),
            Tree::ArrayTypeTree(n) => n.codegen(state),
            Tree::PrimitiveTypeTree(n) => n.codegen(state),
        }
    }
}

impl Codegen for Expression {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Expression::Identifier(n) => n.codegen(state),
            Expression::FieldAccess(n) => n.codegen(state),
            Expression::MethodInvocation(n) => n.codegen(state),
            Expression::NewClass(n) => n.codegen(state),
            Expression::Literal(n) => n.codegen(state),
            Expression::Unary(n) => n.codegen(state),
            Expression::Binary(n) => n.codegen(state),
            Expression::Parentheses(n) => n.codegen(state),
            Expression::Assignment(n) => n.codegen(state),
            Expression::Ternary(n) => n.codegen(state),
        }
    }
}

impl Codegen for TypeTree {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            TypeTree::Identifier(n) => n.codegen(state),
            TypeTree::FieldAccess(n) => n.codegen(state),
            TypeTree::ParameterizedTypeTree(n) => n.codegen(state),
            TypeTree::ArrayTypeTree(n) => n.codegen(state),
            TypeTree::PrimitiveTypeTree(n) => n.codegen(state),
        }
    }
}

/// Prints the statement itself; the terminating `;` belongs to the
/// enclosing padding.
impl Codegen for Statement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Statement::ClassDeclaration(n) => n.codegen(state),
            Statement::MethodDeclaration(n) => n.codegen(state),
            Statement::VariableDeclarations(n) => n.codegen(state),
            Statement::Block(n) => n.codegen(state),
            Statement::Return(n) => n.codegen(state),
            Statement::If(n) => n.codegen(state),
            Statement::Expression(e) => e.codegen(state),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

impl Codegen for CompilationUnit {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        if let Some(package) = &self.package {
            package.codegen(state);
        }
        for import in &self.imports {
            import.codegen(state);
        }
        for class in &self.classes {
            class.codegen(state);
        }
        self.eof.codegen(state);
    }
}

impl Codegen for Package {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("package");
        self.expression.codegen(state);
        state.add_token(";");
    }
}

impl Codegen for Import {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("import");
        if let Some(before) = &self.statik {
            before.codegen(state);
            state.add_token("static");
        }
        self.qualid.codegen(state);
        state.add_token(";");
    }
}

impl Codegen for ClassDeclaration {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        leading_codegen(&self.leading_annotations, &self.modifiers, state);
        self.keyword.prefix.codegen(state);
        state.add_token(self.keyword.kind.keyword());
        self.name.codegen(state);
        if let Some(extends) = &self.extends {
            extends.before.codegen(state);
            state.add_token("extends");
            extends.element.codegen(state);
        }
        if let Some(implements) = &self.implements {
            implements.before.codegen(state);
            state.add_token("implements");
            delimited_codegen(&implements.elements, ",", state);
        }
        self.body.codegen(state);
    }
}

impl Codegen for MethodDeclaration {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        leading_codegen(&self.leading_annotations, &self.modifiers, state);
        if let Some(return_type) = &self.return_type {
            return_type.codegen(state);
        }
        self.name.codegen(state);
        container_codegen(&self.parameters, "(", ",", ")", state);
        if let Some(body) = &self.body {
            body.codegen(state);
        }
    }
}

impl Codegen for VariableDeclarations {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        leading_codegen(&self.leading_annotations, &self.modifiers, state);
        if let Some(type_expr) = &self.type_expr {
            type_expr.codegen(state);
        }
        if let Some(before) = &self.varargs {
            before.codegen(state);
            state.add_token("...");
        }
        delimited_codegen(&self.variables, ",", state);
    }
}

impl Codegen for NamedVariable {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.name.codegen(state);
        if let Some(initializer) = &self.initializer {
            initializer.before.codegen(state);
            state.add_token("=");
            initializer.element.codegen(state);
        }
    }
}

impl Codegen for Annotation {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("@");
        self.annotation_type.codegen(state);
        if let Some(arguments) = &self.arguments {
            container_codegen(arguments, "(", ",", ")", state);
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Codegen for Block {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("{");
        for statement in &self.statements {
            statement_codegen(statement, state);
        }
        self.end.codegen(state);
        state.add_token("}");
    }
}

impl Codegen for Return {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("return");
        if let Some(expression) = &self.expression {
            expression.codegen(state);
        }
    }
}

impl Codegen for If {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("if");
        self.condition.codegen(state);
        statement_codegen(&self.then_part, state);
        if let Some(else_part) = &self.else_part {
            else_part.before.codegen(state);
            state.add_token("else");
            statement_codegen(&else_part.body, state);
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl Codegen for Identifier {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token(&self.simple_name);
    }
}

impl Codegen for FieldAccess {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.target.codegen(state);
        self.name.before.codegen(state);
        state.add_token(".");
        self.name.element.codegen(state);
    }
}

impl Codegen for MethodInvocation {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        if let Some(select) = &self.select {
            select.element.codegen(state);
            select.after.codegen(state);
            state.add_token(".");
        }
        self.name.codegen(state);
        container_codegen(&self.arguments, "(", ",", ")", state);
    }
}

impl Codegen for NewClass {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("new");
        self.clazz.codegen(state);
        container_codegen(&self.arguments, "(", ",", ")", state);
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token(&self.value_source);
    }
}

impl Codegen for Unary {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        if self.operator.element.is_postfix() {
            self.expression.codegen(state);
            self.operator.before.codegen(state);
            state.add_token(self.operator.element.symbol());
        } else {
            self.operator.before.codegen(state);
            state.add_token(self.operator.element.symbol());
            self.expression.codegen(state);
        }
    }
}

impl Codegen for Binary {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.left.codegen(state);
        self.operator.before.codegen(state);
        state.add_token(self.operator.element.symbol());
        self.right.codegen(state);
    }
}

impl Codegen for Parentheses {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token("(");
        self.tree.element.codegen(state);
        self.tree.after.codegen(state);
        state.add_token(")");
    }
}

impl Codegen for Assignment {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.variable.codegen(state);
        self.assignment.before.codegen(state);
        state.add_token("=");
        self.assignment.element.codegen(state);
    }
}

impl Codegen for Ternary {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.condition.codegen(state);
        self.true_part.before.codegen(state);
        state.add_token("?");
        self.true_part.element.codegen(state);
        self.false_part.before.codegen(state);
        state.add_token(":");
        self.false_part.element.codegen(state);
    }
}

// ============================================================================
// Type trees
// ============================================================================

impl Codegen for ParameterizedTypeTree {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.clazz.codegen(state);
        if let Some(parameters) = &self.type_parameters {
            container_codegen(parameters, "<", ",", ">", state);
        }
    }
}

impl Codegen for ArrayTypeTree {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        self.element_type.codegen(state);
        self.dimension.before.codegen(state);
        state.add_token("[");
        self.dimension.element.codegen(state);
        state.add_token("]");
    }
}

impl Codegen for PrimitiveTypeTree {
    fn codegen(&self, state: &mut CodegenState) {
        self.prefix.codegen(state);
        state.add_token(self.primitive.keyword());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Comment, LeftPadded};
    use crate::types::Primitive;

    #[test]
    fn space_prints_comments() {
        let space = Space {
            whitespace: "\n    ".to_string(),
            comments: vec![
                Comment {
                    text: " line".to_string(),
                    multiline: false,
                    suffix: "\n    ".to_string(),
                },
                Comment {
                    text: " block ".to_string(),
                    multiline: true,
                    suffix: " ".to_string(),
                },
            ],
        };
        assert_eq!(space.print(), "\n    // line\n    /* block */ ");
    }

    #[test]
    fn invocation_prints_select_and_arguments() {
        let select = Expression::Identifier(Identifier::build("s", None));
        let arg = Expression::Literal(Arc::new(Literal {
            id: crate::nodes::NodeId::fresh(),
            prefix: Space::single(),
            markers: crate::nodes::Markers::EMPTY,
            value_source: "1".to_string(),
            java_type: Some(crate::types::JavaType::Primitive(Primitive::Int)),
        }));
        let call = Arc::new(MethodInvocation {
            id: crate::nodes::NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: crate::nodes::Markers::EMPTY,
            select: Some(RightPadded::new(select)),
            name: Identifier::build("charAt", None),
            arguments: Container::build(vec![
                Expression::Identifier(Identifier::build("x", None)),
                arg,
            ]),
            method_type: None,
        });
        assert_eq!(call.print(), "s.charAt(x, 1)");
    }

    #[test]
    fn array_type_prints_dimension() {
        let array = ArrayTypeTree {
            id: crate::nodes::NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: crate::nodes::Markers::EMPTY,
            element_type: TypeTree::PrimitiveTypeTree(PrimitiveTypeTree::build(Primitive::Byte)),
            dimension: LeftPadded::new(Space::EMPTY, Space::EMPTY),
            java_type: None,
        };
        assert_eq!(array.print(), "byte[]");
    }
}
