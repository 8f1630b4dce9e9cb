// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parsing snippets into prototype trees.
//!
//! The snippet language is the subset of Java that recipes synthesize:
//! expressions (with Java precedence), `return`, `if`/`else`, blocks,
//! local variable declarations, expression statements, annotations and
//! argument lists. Placeholders may appear wherever an expression may.
//!
//! Spacing follows the printer's layout: a node's prefix is the space in
//! front of its first token, so compound nodes take the prefix of their
//! leftmost operand and the operand keeps none.

use std::sync::Arc;

use tugtool_core::error::{TemplateCompilationError, TransformError};
use tugtool_java_cst::{
    Annotation, ArrayTypeTree, Assignment, Binary, BinaryOperator, Block, ClassType, Container,
    ElsePart, Expression, FieldAccess, Identifier, If, JavaType, LeftPadded, Literal, Markers,
    MethodInvocation, Modifier, ModifierKind, NamedVariable, NewClass, NodeId,
    ParameterizedTypeTree, Parentheses, Primitive, PrimitiveTypeTree, Return, RightPadded, Space,
    Statement, Ternary, TypeTree, Unary, UnaryOperator, VariableDeclarations,
};

use super::apply::Instantiate;
use super::lexer::{syntax_error, tokenize, LiteralKind, Token, TokenKind};
use super::placeholder::{Slot, SlotTable, TemplateSlot};
use super::resolve::Resolver;

/// Words that never start an expression.
const RESERVED: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for",
    "if", "implements", "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static", "switch",
    "synchronized", "throw", "throws", "try", "void", "volatile", "while",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// The parsed form of a snippet, before instantiation.
#[derive(Debug, Clone)]
pub(crate) enum Prototype {
    Expression(Expression),
    Arguments(Vec<RightPadded<Expression>>),
    Statements(Vec<RightPadded<Statement>>),
    Annotation(Arc<Annotation>),
}

impl Prototype {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Prototype::Expression(_) => "expression",
            Prototype::Arguments(_) => "argument list",
            Prototype::Statements(_) => "statement",
            Prototype::Annotation(_) => "annotation",
        }
    }
}

#[derive(Debug)]
pub(crate) struct Compiled {
    pub prototype: Prototype,
    pub slots: Vec<Slot>,
}

/// Parse `source`. A snippet starting with `@` is an annotation; anything
/// else is tried as one expression, then as an argument list, then as a
/// statement sequence. An empty snippet is an empty argument list.
///
/// The parsed prototype is then attributed with the placeholders' declared
/// types; any type or member it names that does not resolve is an error.
pub(crate) fn compile(
    source: &str,
    resolver: &Resolver,
) -> Result<Compiled, TemplateCompilationError> {
    let parsed = parse(source, resolver)?;
    let prototype = Instantiate::check(resolver)
        .run(&parsed.prototype)
        .map_err(|err| match err {
            TransformError::TemplateCompilation(err) => err,
            other => TemplateCompilationError::Syntax {
                line: 1,
                column: 1,
                message: other.to_string(),
            },
        })?;
    Ok(Compiled {
        prototype,
        slots: parsed.slots,
    })
}

fn parse(source: &str, resolver: &Resolver) -> Result<Compiled, TemplateCompilationError> {
    let tokens = tokenize(source)?;
    if tokens.len() == 1 {
        return Ok(Compiled {
            prototype: Prototype::Arguments(Vec::new()),
            slots: Vec::new(),
        });
    }

    let attempts: Vec<fn(&mut Parser<'_>) -> PResult<Prototype>> = if tokens[0].is_punct("@") {
        vec![|p| p.annotation().map(Prototype::Annotation)]
    } else {
        vec![
            |p| p.expression().map(Prototype::Expression),
            |p| p.argument_list().map(Prototype::Arguments),
            |p| p.statements().map(Prototype::Statements),
        ]
    };

    let mut furthest: Option<(usize, String)> = None;
    for attempt in attempts {
        let parser = Parser::new(&tokens, resolver);
        match parser.run(attempt) {
            Ok(compiled) => return Ok(compiled),
            Err(Failure::Fatal(err)) => return Err(err),
            Err(Failure::Syntax { offset, message }) => {
                let further = match &furthest {
                    Some((seen, _)) => offset > *seen,
                    None => true,
                };
                if further {
                    furthest = Some((offset, message));
                }
            }
        }
    }
    let (offset, message) = furthest.unwrap_or((0, "empty template".to_string()));
    Err(syntax_error(source, offset, message))
}

enum Failure {
    Syntax { offset: usize, message: String },
    Fatal(TemplateCompilationError),
}

impl From<TemplateCompilationError> for Failure {
    fn from(err: TemplateCompilationError) -> Self {
        Failure::Fatal(err)
    }
}

type PResult<T> = Result<T, Failure>;

fn ident(name: impl Into<String>, prefix: Space) -> Arc<Identifier> {
    Arc::new(Identifier {
        id: NodeId::fresh(),
        prefix,
        markers: Markers::EMPTY,
        simple_name: name.into(),
        java_type: None,
        field_type: None,
    })
}

fn unary_prefix_operator(punct: &str) -> Option<UnaryOperator> {
    Some(match punct {
        "!" => UnaryOperator::Not,
        "-" => UnaryOperator::Negative,
        "+" => UnaryOperator::Positive,
        "~" => UnaryOperator::Complement,
        "++" => UnaryOperator::PreIncrement,
        "--" => UnaryOperator::PreDecrement,
        _ => return None,
    })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    resolver: &'a Resolver,
    slots: SlotTable,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], resolver: &'a Resolver) -> Self {
        Parser {
            tokens,
            pos: 0,
            resolver,
            slots: SlotTable::default(),
        }
    }

    fn run(mut self, parse: fn(&mut Parser<'a>) -> PResult<Prototype>) -> PResult<Compiled> {
        let prototype = parse(&mut self)?;
        if !self.at_eof() {
            return Err(self.fail("unexpected input after the end of the template"));
        }
        Ok(Compiled {
            prototype,
            slots: self.slots.into_slots(),
        })
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn peek_at(&self, ahead: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)]
    }

    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    fn fail_at(token: &Token, message: impl Into<String>) -> Failure {
        Failure::Syntax {
            offset: token.offset,
            message: message.into(),
        }
    }

    fn fail(&self, message: impl Into<String>) -> Failure {
        Self::fail_at(self.peek(), message)
    }

    fn expect(&mut self, punct: &str) -> PResult<Token> {
        if self.peek().is_punct(punct) {
            Ok(self.bump())
        } else {
            Err(self.fail(format!("expected `{}`", punct)))
        }
    }

    fn is_name(token: &Token) -> bool {
        matches!(&token.kind, TokenKind::Ident(word) if !is_reserved(word))
    }

    /// A non-reserved identifier and the space before it.
    fn name(&mut self) -> PResult<(String, Space)> {
        let token = self.bump();
        match token.kind {
            TokenKind::Ident(word) if !is_reserved(&word) => Ok((word, token.prefix)),
            _ => Err(Self::fail_at(&token, "expected a name")),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression(&mut self) -> PResult<Expression> {
        let target = self.ternary()?;
        if !self.peek().is_punct("=") {
            return Ok(target);
        }
        let eq = self.bump();
        let value = self.expression()?;
        Ok(Expression::Assignment(Arc::new(Assignment {
            id: NodeId::fresh(),
            prefix: target.prefix().clone(),
            markers: Markers::EMPTY,
            variable: target.with_prefix(Space::EMPTY),
            assignment: LeftPadded::new(eq.prefix, value),
            java_type: None,
        })))
    }

    fn ternary(&mut self) -> PResult<Expression> {
        let condition = self.binary(1)?;
        if !self.peek().is_punct("?") {
            return Ok(condition);
        }
        let question = self.bump();
        let true_part = self.ternary()?;
        let colon = self.expect(":")?;
        let false_part = self.ternary()?;
        Ok(Expression::Ternary(Arc::new(Ternary {
            id: NodeId::fresh(),
            prefix: condition.prefix().clone(),
            markers: Markers::EMPTY,
            condition: condition.with_prefix(Space::EMPTY),
            true_part: LeftPadded::new(question.prefix, true_part),
            false_part: LeftPadded::new(colon.prefix, false_part),
            java_type: None,
        })))
    }

    /// The binary operator at the cursor and how many tokens it spans.
    /// Adjacent `>` tokens form shifts.
    fn peek_binary(&self) -> Option<(BinaryOperator, usize)> {
        let TokenKind::Punct(punct) = self.peek().kind else {
            return None;
        };
        if punct != ">" {
            return BinaryOperator::from_symbol(punct).map(|op| (op, 1));
        }
        let second = self.peek_at(1);
        if !second.prefix.is_empty() {
            return Some((BinaryOperator::GreaterThan, 1));
        }
        if second.is_punct("=") {
            return Some((BinaryOperator::GreaterThanOrEqual, 2));
        }
        if second.is_punct(">") {
            let third = self.peek_at(2);
            if third.prefix.is_empty() && third.is_punct(">") {
                return Some((BinaryOperator::UnsignedRightShift, 3));
            }
            return Some((BinaryOperator::RightShift, 2));
        }
        Some((BinaryOperator::GreaterThan, 1))
    }

    fn binary(&mut self, min_precedence: u8) -> PResult<Expression> {
        let mut left = self.unary()?;
        while let Some((operator, width)) = self.peek_binary() {
            if operator.precedence() < min_precedence {
                break;
            }
            let before = self.bump().prefix;
            for _ in 1..width {
                self.bump();
            }
            let right = self.binary(operator.precedence() + 1)?;
            left = Expression::Binary(Arc::new(Binary {
                id: NodeId::fresh(),
                prefix: left.prefix().clone(),
                markers: Markers::EMPTY,
                left: left.with_prefix(Space::EMPTY),
                operator: LeftPadded::new(before, operator),
                right,
                java_type: None,
            }));
        }
        Ok(left)
    }

    fn unary(&mut self) -> PResult<Expression> {
        let operator = match self.peek().kind {
            TokenKind::Punct(punct) => unary_prefix_operator(punct),
            _ => None,
        };
        let Some(operator) = operator else {
            return self.postfix();
        };
        let token = self.bump();
        let operand = self.unary()?;
        Ok(Expression::Unary(Arc::new(Unary {
            id: NodeId::fresh(),
            prefix: token.prefix,
            markers: Markers::EMPTY,
            operator: LeftPadded::new(Space::EMPTY, operator),
            expression: operand,
            java_type: None,
        })))
    }

    fn postfix(&mut self) -> PResult<Expression> {
        let mut expr = self.primary()?;
        loop {
            if self.peek().is_punct(".") {
                let dot = self.bump();
                let (name, name_prefix) = self.name()?;
                let prefix = expr.prefix().clone();
                let target = expr.with_prefix(Space::EMPTY);
                expr = if self.peek().is_punct("(") {
                    let arguments = self.arguments()?;
                    Expression::MethodInvocation(Arc::new(MethodInvocation {
                        id: NodeId::fresh(),
                        prefix,
                        markers: Markers::EMPTY,
                        select: Some(RightPadded {
                            element: target,
                            after: dot.prefix,
                        }),
                        name: ident(name, name_prefix),
                        arguments,
                        method_type: None,
                    }))
                } else {
                    Expression::FieldAccess(Arc::new(FieldAccess {
                        id: NodeId::fresh(),
                        prefix,
                        markers: Markers::EMPTY,
                        target,
                        name: LeftPadded::new(dot.prefix, ident(name, name_prefix)),
                        java_type: None,
                    }))
                };
            } else if self.peek().is_punct("++") || self.peek().is_punct("--") {
                let token = self.bump();
                let operator = if token.is_punct("++") {
                    UnaryOperator::PostIncrement
                } else {
                    UnaryOperator::PostDecrement
                };
                expr = Expression::Unary(Arc::new(Unary {
                    id: NodeId::fresh(),
                    prefix: expr.prefix().clone(),
                    markers: Markers::EMPTY,
                    operator: LeftPadded::new(token.prefix, operator),
                    expression: expr.with_prefix(Space::EMPTY),
                    java_type: None,
                }));
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> PResult<Expression> {
        let token = self.bump();
        match token.kind {
            TokenKind::Placeholder(text) => self.placeholder(&text, token.prefix),
            TokenKind::Literal(text, kind) => Ok(Expression::Literal(Arc::new(Literal {
                id: NodeId::fresh(),
                prefix: token.prefix,
                markers: Markers::EMPTY,
                value_source: text,
                java_type: Some(self.literal_type(kind)),
            }))),
            TokenKind::Punct("(") => {
                let inner = self.expression()?;
                let close = self.expect(")")?;
                Ok(Expression::Parentheses(Arc::new(Parentheses {
                    id: NodeId::fresh(),
                    prefix: token.prefix,
                    markers: Markers::EMPTY,
                    tree: RightPadded {
                        element: inner,
                        after: close.prefix,
                    },
                })))
            }
            TokenKind::Ident(word) if word == "new" => self.new_class(token.prefix),
            TokenKind::Ident(word) if !is_reserved(&word) => {
                if self.peek().is_punct("(") {
                    let arguments = self.arguments()?;
                    Ok(Expression::MethodInvocation(Arc::new(MethodInvocation {
                        id: NodeId::fresh(),
                        prefix: token.prefix,
                        markers: Markers::EMPTY,
                        select: None,
                        name: ident(word, Space::EMPTY),
                        arguments,
                        method_type: None,
                    })))
                } else {
                    Ok(Expression::Identifier(ident(word, token.prefix)))
                }
            }
            _ => Err(Self::fail_at(&token, "expected an expression")),
        }
    }

    fn placeholder(&mut self, text: &str, prefix: Space) -> PResult<Expression> {
        let index = self.slots.bind(text, self.resolver)?;
        let java_type = self.slots.get(index).and_then(|slot| slot.java_type.clone());
        Ok(Expression::Identifier(Arc::new(Identifier {
            id: NodeId::fresh(),
            prefix,
            markers: Markers::EMPTY.add(TemplateSlot { index }),
            simple_name: format!("#{{{}}}", text),
            java_type,
            field_type: None,
        })))
    }

    fn literal_type(&self, kind: LiteralKind) -> JavaType {
        let primitive = match kind {
            LiteralKind::Int => Primitive::Int,
            LiteralKind::Long => Primitive::Long,
            LiteralKind::Float => Primitive::Float,
            LiteralKind::Double => Primitive::Double,
            LiteralKind::Char => Primitive::Char,
            LiteralKind::Boolean => Primitive::Boolean,
            LiteralKind::Null => Primitive::Null,
            LiteralKind::String => {
                return self
                    .resolver
                    .type_named("java.lang.String")
                    .unwrap_or_else(|| JavaType::Class(ClassType::shallow("java.lang.String")));
            }
        };
        JavaType::Primitive(primitive)
    }

    fn new_class(&mut self, prefix: Space) -> PResult<Expression> {
        let clazz = self.class_type()?;
        let arguments = self.arguments()?;
        Ok(Expression::NewClass(Arc::new(NewClass {
            id: NodeId::fresh(),
            prefix,
            markers: Markers::EMPTY,
            clazz,
            arguments,
            constructor_type: None,
        })))
    }

    /// `( expr, ... )`.
    fn arguments(&mut self) -> PResult<Container<Expression>> {
        let open = self.expect("(")?;
        let mut elements = Vec::new();
        if self.peek().is_punct(")") {
            self.bump();
        } else {
            loop {
                let element = self.expression()?;
                let token = self.bump();
                let closing = token.is_punct(")");
                if !closing && !token.is_punct(",") {
                    return Err(Self::fail_at(&token, "expected `,` or `)`"));
                }
                elements.push(RightPadded {
                    element,
                    after: token.prefix,
                });
                if closing {
                    break;
                }
            }
        }
        Ok(Container {
            before: open.prefix,
            elements,
        })
    }

    /// `expr, expr, ...` without delimiters.
    fn argument_list(&mut self) -> PResult<Vec<RightPadded<Expression>>> {
        let mut elements = Vec::new();
        loop {
            let element = self.expression()?;
            if !self.peek().is_punct(",") {
                elements.push(RightPadded::new(element));
                return Ok(elements);
            }
            let comma = self.bump();
            elements.push(RightPadded {
                element,
                after: comma.prefix,
            });
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn type_tree(&mut self) -> PResult<TypeTree> {
        let token = self.peek();
        let primitive = match &token.kind {
            TokenKind::Ident(word) if word != "null" => Primitive::from_keyword(word),
            _ => None,
        };
        let mut tree = match primitive {
            Some(primitive) => {
                let token = self.bump();
                TypeTree::PrimitiveTypeTree(Arc::new(PrimitiveTypeTree {
                    id: NodeId::fresh(),
                    prefix: token.prefix,
                    markers: Markers::EMPTY,
                    primitive,
                }))
            }
            None => self.class_type()?,
        };
        while self.peek().is_punct("[") && self.peek_at(1).is_punct("]") {
            let open = self.bump();
            let close = self.bump();
            tree = TypeTree::ArrayTypeTree(Arc::new(ArrayTypeTree {
                id: NodeId::fresh(),
                prefix: tree.prefix().clone(),
                markers: Markers::EMPTY,
                element_type: tree.with_prefix(Space::EMPTY),
                dimension: LeftPadded::new(open.prefix, close.prefix),
                java_type: None,
            }));
        }
        Ok(tree)
    }

    /// A possibly qualified class name with optional type arguments.
    fn class_type(&mut self) -> PResult<TypeTree> {
        let name = self.qualified_name()?;
        let clazz = name
            .as_type_tree()
            .ok_or_else(|| self.fail("expected a type name"))?;
        if !self.peek().is_punct("<") {
            return Ok(clazz);
        }

        let open = self.bump();
        let mut elements = Vec::new();
        if self.peek().is_punct(">") {
            self.bump();
        } else {
            loop {
                let element = self.type_tree()?;
                let token = self.bump();
                let closing = token.is_punct(">");
                if !closing && !token.is_punct(",") {
                    return Err(Self::fail_at(&token, "expected `,` or `>`"));
                }
                elements.push(RightPadded {
                    element,
                    after: token.prefix,
                });
                if closing {
                    break;
                }
            }
        }
        Ok(TypeTree::ParameterizedTypeTree(Arc::new(ParameterizedTypeTree {
            id: NodeId::fresh(),
            prefix: clazz.prefix().clone(),
            markers: Markers::EMPTY,
            clazz: clazz.with_prefix(Space::EMPTY),
            type_parameters: Some(Container {
                before: open.prefix,
                elements,
            }),
            java_type: None,
        })))
    }

    /// `a.b.c` as an identifier or nested field accesses.
    fn qualified_name(&mut self) -> PResult<Expression> {
        let (first, prefix) = self.name()?;
        let mut expr = Expression::Identifier(ident(first, prefix));
        while self.peek().is_punct(".") && Self::is_name(self.peek_at(1)) {
            let dot = self.bump();
            let (name, name_prefix) = self.name()?;
            expr = Expression::FieldAccess(Arc::new(FieldAccess {
                id: NodeId::fresh(),
                prefix: expr.prefix().clone(),
                markers: Markers::EMPTY,
                target: expr.with_prefix(Space::EMPTY),
                name: LeftPadded::new(dot.prefix, ident(name, name_prefix)),
                java_type: None,
            }));
        }
        Ok(expr)
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    fn annotation(&mut self) -> PResult<Arc<Annotation>> {
        let at = self.expect("@")?;
        let name = self.qualified_name()?;
        let annotation_type = name
            .as_type_tree()
            .ok_or_else(|| self.fail("expected an annotation name"))?;
        let arguments = if self.peek().is_punct("(") {
            Some(self.arguments()?)
        } else {
            None
        };
        Ok(Arc::new(Annotation {
            id: NodeId::fresh(),
            prefix: at.prefix,
            markers: Markers::EMPTY,
            annotation_type,
            arguments,
        }))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statements(&mut self) -> PResult<Vec<RightPadded<Statement>>> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn statement(&mut self) -> PResult<RightPadded<Statement>> {
        let token = self.peek();
        if token.is_punct("{") {
            return Ok(RightPadded::new(Statement::Block(self.block()?)));
        }
        if token.is_keyword("if") {
            return self.if_statement();
        }
        if token.is_keyword("return") {
            let keyword = self.bump();
            let expression = if self.peek().is_punct(";") {
                None
            } else {
                Some(self.expression()?)
            };
            let semicolon = self.expect(";")?;
            return Ok(RightPadded {
                element: Statement::Return(Arc::new(Return {
                    id: NodeId::fresh(),
                    prefix: keyword.prefix,
                    markers: Markers::EMPTY,
                    expression,
                })),
                after: semicolon.prefix,
            });
        }
        if let Some(declaration) = self.local_variable()? {
            let semicolon = self.expect(";")?;
            return Ok(RightPadded {
                element: Statement::VariableDeclarations(declaration),
                after: semicolon.prefix,
            });
        }
        let expression = self.expression()?;
        let semicolon = self.expect(";")?;
        Ok(RightPadded {
            element: Statement::Expression(expression),
            after: semicolon.prefix,
        })
    }

    fn block(&mut self) -> PResult<Arc<Block>> {
        let open = self.expect("{")?;
        let mut statements = Vec::new();
        while !self.peek().is_punct("}") {
            if self.at_eof() {
                return Err(self.fail("expected `}`"));
            }
            statements.push(self.statement()?);
        }
        let close = self.bump();
        Ok(Arc::new(Block {
            id: NodeId::fresh(),
            prefix: open.prefix,
            markers: Markers::EMPTY,
            statements,
            end: close.prefix,
        }))
    }

    fn if_statement(&mut self) -> PResult<RightPadded<Statement>> {
        let keyword = self.bump();
        let open = self.expect("(")?;
        let inner = self.expression()?;
        let close = self.expect(")")?;
        let condition = Expression::Parentheses(Arc::new(Parentheses {
            id: NodeId::fresh(),
            prefix: open.prefix,
            markers: Markers::EMPTY,
            tree: RightPadded {
                element: inner,
                after: close.prefix,
            },
        }));
        let then_part = self.statement()?;
        let else_part = if self.peek().is_keyword("else") {
            let keyword = self.bump();
            Some(ElsePart {
                before: keyword.prefix,
                body: self.statement()?,
            })
        } else {
            None
        };
        Ok(RightPadded::new(Statement::If(Arc::new(If {
            id: NodeId::fresh(),
            prefix: keyword.prefix,
            markers: Markers::EMPTY,
            condition,
            then_part,
            else_part,
        }))))
    }

    /// `[final] Type name [= init], ...` up to (not including) the `;`.
    ///
    /// Backtracks and returns `None` when the tokens do not start a
    /// declaration.
    fn local_variable(&mut self) -> PResult<Option<Arc<VariableDeclarations>>> {
        let start = self.pos;
        let mut modifiers = Vec::new();
        while self.peek().is_keyword("final") {
            let token = self.bump();
            modifiers.push(Modifier::new(token.prefix, ModifierKind::Final));
        }

        let type_expr = match self.type_tree() {
            Ok(type_expr) => type_expr,
            Err(Failure::Syntax { .. }) => {
                self.pos = start;
                return Ok(None);
            }
            Err(fatal) => return Err(fatal),
        };
        let declares = Self::is_name(self.peek())
            && matches!(self.peek_at(1).kind, TokenKind::Punct("=" | ";" | ","));
        if !declares {
            self.pos = start;
            return Ok(None);
        }

        let (prefix, type_expr) = match modifiers.first_mut() {
            Some(first) => (std::mem::take(&mut first.prefix), type_expr),
            None => (type_expr.prefix().clone(), type_expr.with_prefix(Space::EMPTY)),
        };

        let mut variables = Vec::new();
        loop {
            let (name, name_prefix) = self.name()?;
            let initializer = if self.peek().is_punct("=") {
                let eq = self.bump();
                Some(LeftPadded::new(eq.prefix, self.expression()?))
            } else {
                None
            };
            let variable = Arc::new(NamedVariable {
                id: NodeId::fresh(),
                prefix: name_prefix,
                markers: Markers::EMPTY,
                name: ident(name, Space::EMPTY),
                initializer,
                variable_type: None,
            });
            if !self.peek().is_punct(",") {
                variables.push(RightPadded::new(variable));
                break;
            }
            let comma = self.bump();
            variables.push(RightPadded {
                element: variable,
                after: comma.prefix,
            });
        }

        Ok(Some(Arc::new(VariableDeclarations {
            id: NodeId::fresh(),
            prefix,
            markers: Markers::EMPTY,
            leading_annotations: Vec::new(),
            modifiers,
            type_expr: Some(type_expr),
            varargs: None,
            variables,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugtool_java_cst::{Codegen, TypeCatalog};

    fn resolver() -> Resolver {
        Resolver::new(TypeCatalog::jdk_core(), Vec::new(), Vec::new())
    }

    /// Syntax only: the snippets below name things no catalog declares.
    fn parsed(source: &str) -> Compiled {
        parse(source, &resolver()).unwrap()
    }

    fn printed(prototype: &Prototype) -> String {
        match prototype {
            Prototype::Expression(e) => e.print(),
            Prototype::Annotation(a) => a.print(),
            Prototype::Arguments(args) => args
                .iter()
                .map(|a| format!("{}{}", a.element.print(), a.after.print()))
                .collect::<Vec<_>>()
                .join(","),
            Prototype::Statements(statements) => {
                Block {
                    id: NodeId::fresh(),
                    prefix: Space::EMPTY,
                    markers: Markers::EMPTY,
                    statements: statements.clone(),
                    end: Space::EMPTY,
                }
                .print()
                .trim_start_matches('{')
                .trim_end_matches('}')
                .to_string()
            }
        }
    }

    #[test]
    fn snippets_print_back_verbatim() {
        for source in [
            "#{any(java.lang.String)} == null || #{s:any(String)}.isEmpty()",
            "!#{any(java.util.Optional)}.isPresent()",
            "a ? b : c",
            "x = y + 1",
            "new java.util.ArrayList<String>(/* none */ 1)",
            "(a + b) * c",
            "i++",
            "a >> 2 >= b >>> 1",
        ] {
            let compiled = parsed(source);
            assert!(matches!(compiled.prototype, Prototype::Expression(_)), "{}", source);
            assert_eq!(printed(&compiled.prototype), source);
        }
    }

    #[test]
    fn statements_print_back_verbatim() {
        let source = "final java.util.List<String> xs = make();\n\
                      if (xs.isEmpty()) {\n    return null;\n} else foo(1, 2);";
        let compiled = parsed(source);
        assert!(matches!(compiled.prototype, Prototype::Statements(ref s) if s.len() == 3));
        assert_eq!(printed(&compiled.prototype), source);
    }

    #[test]
    fn annotations_and_arguments() {
        let compiled = parsed("@NoArgsConstructor(access = AccessLevel.PROTECTED)");
        let Prototype::Annotation(annotation) = &compiled.prototype else {
            panic!("expected an annotation");
        };
        assert_eq!(annotation.simple_name(), "NoArgsConstructor");
        assert_eq!(annotation.arguments.as_ref().map(Container::len), Some(1));

        let compiled = parsed("#{any(java.io.InputStream)}, StandardCharsets.UTF_8");
        assert!(matches!(compiled.prototype, Prototype::Arguments(ref a) if a.len() == 2));
        assert_eq!(compiled.slots.len(), 1);

        let empty = parsed("");
        assert!(matches!(empty.prototype, Prototype::Arguments(ref a) if a.is_empty()));
    }

    #[test]
    fn precedence_and_associativity() {
        let Prototype::Expression(Expression::Binary(or)) = parsed("a || b && c").prototype else {
            panic!("expected a binary");
        };
        assert_eq!(or.operator.element, BinaryOperator::Or);
        assert!(matches!(
            &or.right,
            Expression::Binary(and) if and.operator.element == BinaryOperator::And
        ));

        let Prototype::Expression(Expression::Binary(sub)) = parsed("a - b - c").prototype else {
            panic!("expected a binary");
        };
        assert!(matches!(&sub.left, Expression::Binary(_)));
        assert!(matches!(&sub.right, Expression::Identifier(_)));
    }

    #[test]
    fn placeholders_become_marked_identifiers() {
        let compiled = parsed("#{s:any(String)} != null && !#{s}.isEmpty()");
        assert_eq!(compiled.slots.len(), 1);
        let Prototype::Expression(Expression::Binary(and)) = &compiled.prototype else {
            panic!("expected a binary");
        };
        let Expression::Binary(not_null) = &and.left else {
            panic!("expected a binary");
        };
        let Expression::Identifier(slot) = &not_null.left else {
            panic!("expected an identifier");
        };
        assert_eq!(slot.markers.find::<TemplateSlot>(), Some(&TemplateSlot { index: 0 }));
        assert_eq!(
            slot.java_type.as_ref().and_then(JavaType::erased_name).as_deref(),
            Some("java.lang.String")
        );
    }

    #[test]
    fn compiled_snippets_are_attributed() {
        let compiled = compile("#{any(String)}.trim().isEmpty()", &resolver()).unwrap();
        let Prototype::Expression(Expression::MethodInvocation(is_empty)) = &compiled.prototype
        else {
            panic!("expected a method invocation");
        };
        assert_eq!(is_empty.method_type.as_ref().map(|m| m.name.as_str()), Some("isEmpty"));
        let Some(Expression::MethodInvocation(trim)) = is_empty.select_expression() else {
            panic!("expected a method invocation");
        };
        assert_eq!(
            trim.type_of().as_ref().and_then(JavaType::erased_name).as_deref(),
            Some("java.lang.String")
        );

        let err = compile("make()", &resolver()).unwrap_err();
        assert!(matches!(
            err,
            TemplateCompilationError::UnresolvedMember { ref name, .. } if name == "make"
        ));
    }

    #[test]
    fn syntax_errors_report_the_furthest_position() {
        let err = compile("a +\n  ;", &resolver()).unwrap_err();
        assert!(
            matches!(err, TemplateCompilationError::Syntax { line: 2, column: 3, .. }),
            "{:?}",
            err
        );
        assert!(compile("foo(", &resolver()).is_err());
        assert!(compile("@", &resolver()).is_err());
        assert_eq!(
            compile("#{s} + 1", &resolver()).unwrap_err(),
            TemplateCompilationError::UndeclaredReference { name: "s".to_string() }
        );
    }
}
