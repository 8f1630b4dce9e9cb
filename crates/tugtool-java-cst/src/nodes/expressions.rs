// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.

use std::sync::Arc;

use super::category::{Expression, TypeTree};
use super::markers::Markers;
use super::space::{Container, LeftPadded, RightPadded, Space};
use super::traits::{ref_eq_by_value, NodeId};
use crate::types::{JavaType, MethodType, VariableType};

java_node! {
    /// A simple name: a variable, a type name, or a segment of a qualified
    /// name.
    pub struct Identifier {
        pub simple_name: String,
        pub java_type: Option<JavaType>,
        /// Set when the identifier refers to a field or variable.
        pub field_type: Option<Arc<VariableType>>,
    }
}

impl Identifier {
    pub fn build(simple_name: impl Into<String>, java_type: Option<JavaType>) -> Arc<Self> {
        Arc::new(Identifier {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            simple_name: simple_name.into(),
            java_type,
            field_type: None,
        })
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

java_node! {
    /// `target.name`, used both for member access and qualified names.
    pub struct FieldAccess {
        pub target: Expression,
        pub name: LeftPadded<Arc<Identifier>>,
        pub java_type: Option<JavaType>,
    }
}

impl FieldAccess {
    /// Build the dotted name `fqn` as nested field accesses without types.
    ///
    /// Returns `None` for a name without a dot.
    pub fn qualified(fqn: &str) -> Option<Arc<Self>> {
        let (owner, last) = fqn.rsplit_once('.')?;
        Some(Arc::new(FieldAccess {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            target: Expression::qualified(owner, None),
            name: LeftPadded::new(Space::EMPTY, Identifier::build(last, None)),
            java_type: None,
        }))
    }

    pub fn simple_name(&self) -> &str {
        &self.name.element.simple_name
    }

    /// Dotted name if the target chain consists of identifiers only.
    pub fn qualified_name(&self) -> Option<String> {
        let owner = self.target.qualified_name()?;
        Some(format!("{}.{}", owner, self.simple_name()))
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

java_node! {
    /// `select.name(arguments)` or `name(arguments)`.
    pub struct MethodInvocation {
        pub select: Option<RightPadded<Expression>>,
        pub name: Arc<Identifier>,
        pub arguments: Container<Expression>,
        pub method_type: Option<Arc<MethodType>>,
    }
}

impl MethodInvocation {
    pub fn simple_name(&self) -> &str {
        &self.name.simple_name
    }

    pub fn select_expression(&self) -> Option<&Expression> {
        self.select.as_ref().map(|s| &s.element)
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.method_type.as_ref().map(|m| m.return_type.clone())
    }
}

java_node! {
    /// `new Type(arguments)`.
    pub struct NewClass {
        pub clazz: TypeTree,
        pub arguments: Container<Expression>,
        pub constructor_type: Option<Arc<MethodType>>,
    }
}

impl NewClass {
    pub fn type_of(&self) -> Option<JavaType> {
        match &self.constructor_type {
            Some(m) => Some(JavaType::Class(Arc::clone(&m.declaring_type))),
            None => self.clazz.type_of(),
        }
    }
}

java_node! {
    /// A literal, kept as its source text.
    pub struct Literal {
        pub value_source: String,
        pub java_type: Option<JavaType>,
    }
}

impl Literal {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negative,
    Positive,
    Complement,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negative => "-",
            UnaryOperator::Positive => "+",
            UnaryOperator::Complement => "~",
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => "++",
            UnaryOperator::PreDecrement | UnaryOperator::PostDecrement => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOperator::PostIncrement | UnaryOperator::PostDecrement)
    }
}

java_node! {
    /// Prefix or postfix unary operation. For postfix operators the
    /// operator's `before` space sits between operand and operator.
    pub struct Unary {
        pub operator: LeftPadded<UnaryOperator>,
        pub expression: Expression,
        pub java_type: Option<JavaType>,
    }
}

impl Unary {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "||" => BinaryOperator::Or,
            "&&" => BinaryOperator::And,
            "|" => BinaryOperator::BitOr,
            "^" => BinaryOperator::BitXor,
            "&" => BinaryOperator::BitAnd,
            "==" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            "<" => BinaryOperator::LessThan,
            ">" => BinaryOperator::GreaterThan,
            "<=" => BinaryOperator::LessThanOrEqual,
            ">=" => BinaryOperator::GreaterThanOrEqual,
            "<<" => BinaryOperator::LeftShift,
            ">>" => BinaryOperator::RightShift,
            ">>>" => BinaryOperator::UnsignedRightShift,
            "+" => BinaryOperator::Addition,
            "-" => BinaryOperator::Subtraction,
            "*" => BinaryOperator::Multiplication,
            "/" => BinaryOperator::Division,
            "%" => BinaryOperator::Modulo,
            _ => return None,
        })
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::BitOr => 3,
            BinaryOperator::BitXor => 4,
            BinaryOperator::BitAnd => 5,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 6,
            BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThanOrEqual => 7,
            BinaryOperator::LeftShift
            | BinaryOperator::RightShift
            | BinaryOperator::UnsignedRightShift => 8,
            BinaryOperator::Addition | BinaryOperator::Subtraction => 9,
            BinaryOperator::Multiplication | BinaryOperator::Division | BinaryOperator::Modulo => 10,
        }
    }

    /// Whether the result is `boolean` regardless of operand types.
    pub fn is_boolean(self) -> bool {
        self.precedence() <= 2 || (6..=7).contains(&self.precedence())
    }
}

ref_eq_by_value!(UnaryOperator, BinaryOperator);

java_node! {
    /// `left op right`.
    pub struct Binary {
        pub left: Expression,
        pub operator: LeftPadded<BinaryOperator>,
        pub right: Expression,
        pub java_type: Option<JavaType>,
    }
}

impl Binary {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

java_node! {
    /// `(tree)`.
    pub struct Parentheses {
        pub tree: RightPadded<Expression>,
    }
}

impl Parentheses {
    pub fn build(inner: Expression) -> Arc<Self> {
        Arc::new(Parentheses {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            tree: RightPadded::new(inner),
        })
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.tree.element.type_of()
    }
}

java_node! {
    /// `variable = assignment`, also used for `name = value` annotation
    /// arguments.
    pub struct Assignment {
        pub variable: Expression,
        pub assignment: LeftPadded<Expression>,
        pub java_type: Option<JavaType>,
    }
}

impl Assignment {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}

java_node! {
    /// `condition ? true_part : false_part`.
    pub struct Ternary {
        pub condition: Expression,
        pub true_part: LeftPadded<Expression>,
        pub false_part: LeftPadded<Expression>,
        pub java_type: Option<JavaType>,
    }
}

impl Ternary {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone()
    }
}
