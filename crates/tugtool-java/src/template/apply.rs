// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Instantiating a compiled template at a coordinate.
//!
//! Instantiation is one traversal over the prototype. On the way out of
//! each node it:
//!
//! - swaps placeholder identifiers for the caller's arguments
//! - attributes the node (types, method and field resolution), children
//!   first, so a call on a substituted receiver resolves against the
//!   argument's type; a name the snippet spells out that does not
//!   resolve fails the instantiation
//! - re-bases multi-line spacing onto the indentation of the insertion point
//! - gives the node a fresh id, so the same template can be applied any
//!   number of times to one tree

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tugtool_core::error::{TemplateApplyError, TemplateCompilationError, TransformError};
use tugtool_core::text::indent_unit;
use tugtool_java_cst::{
    Annotation, BinaryOperator, Block, ClassDeclaration, ClassKeyword, Container, Expression,
    FieldAccess, Identifier, JavaType, JavaVisitor, Markers, MethodDeclaration, MethodInvocation,
    MethodType, Modifier, NewClass, NodeId, Parentheses, Primitive, RightPadded, Space, Statement,
    Traversal, Tree, TreeSlot, TypeTree, UnaryOperator, VariableDeclarations, VariableType,
    VisitContext, VisitOutput,
};

use super::parser::Prototype;
use super::placeholder::TemplateSlot;
use super::resolve::Resolver;

/// Where a template's result goes.
#[derive(Debug, Clone)]
pub enum Coordinates {
    /// Replace this node. Expression templates replace expressions,
    /// single-statement templates replace statements, annotation templates
    /// replace annotations.
    Replace(Tree),
    /// Replace the argument list of this call, keeping the receiver and
    /// name.
    ReplaceArguments(Arc<MethodInvocation>),
    /// Add the annotation to this class, method or variable declaration,
    /// keeping annotations sorted by simple name.
    AddAnnotation(Tree),
    /// Append the statements at the end of this block.
    LastStatement(Arc<Block>),
}

impl Coordinates {
    pub fn name(&self) -> &'static str {
        match self {
            Coordinates::Replace(_) => "replace",
            Coordinates::ReplaceArguments(_) => "replace arguments",
            Coordinates::AddAnnotation(_) => "add annotation",
            Coordinates::LastStatement(_) => "last statement",
        }
    }
}

/// The edited node produced by [`JavaTemplate::apply`](super::JavaTemplate::apply),
/// together with the imports its code needs.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The node to put in place of the coordinate's node.
    pub tree: Tree,
    pub imports: Vec<String>,
    pub static_imports: Vec<String>,
    coordinate: &'static str,
}

impl Applied {
    pub(crate) fn new(
        tree: Tree,
        imports: &[String],
        static_imports: &[String],
        coordinate: &'static str,
    ) -> Self {
        Applied {
            tree,
            imports: imports.to_vec(),
            static_imports: static_imports.to_vec(),
            coordinate,
        }
    }

    fn mismatch(&self) -> TemplateApplyError {
        TemplateApplyError::CoordinateMismatch {
            snippet: self.tree.kind_name(),
            coordinate: self.coordinate,
        }
    }

    pub fn expression(&self) -> Result<Expression, TemplateApplyError> {
        Expression::from_tree(self.tree.clone()).ok_or_else(|| self.mismatch())
    }

    pub fn statement(&self) -> Result<Statement, TemplateApplyError> {
        Statement::from_tree(self.tree.clone()).ok_or_else(|| self.mismatch())
    }

    /// The result as a specific node kind, e.g. `Arc<MethodInvocation>`.
    pub fn node<T: TreeSlot>(&self) -> Result<T, TemplateApplyError> {
        T::from_tree(self.tree.clone()).ok_or_else(|| self.mismatch())
    }
}

// ============================================================================
// Parenthesization
// ============================================================================

fn binding_precedence(expr: &Expression) -> Option<u8> {
    match expr {
        Expression::Binary(b) => Some(b.operator.element.precedence()),
        Expression::Ternary(_) => Some(0),
        Expression::Assignment(_) => Some(0),
        _ => None,
    }
}

/// Wrap `expr` in parentheses if it would bind wrongly in the child slot
/// `slot` of `parent`.
///
/// `slot` is the id of the node `expr` replaces. Spacing in front of `expr`
/// moves onto the parentheses.
pub fn parenthesize_for(expr: Expression, parent: Option<&Tree>, slot: NodeId) -> Expression {
    let Some(parent) = parent else {
        return expr;
    };
    let needs_parens = match (parent, &expr) {
        (_, Expression::Parentheses(_)) => false,
        (Tree::Unary(_), e) => binding_precedence(e).is_some(),
        (Tree::Binary(b), e) => match binding_precedence(e) {
            None => false,
            Some(inner) => {
                let outer = b.operator.element.precedence();
                inner < outer || (inner == outer && b.right.id() == slot)
            }
        },
        (Tree::MethodInvocation(m), e) => {
            m.select.as_ref().is_some_and(|s| s.element.id() == slot)
                && (binding_precedence(e).is_some() || matches!(e, Expression::Unary(_)))
        }
        (Tree::FieldAccess(f), e) => {
            f.target.id() == slot
                && (binding_precedence(e).is_some() || matches!(e, Expression::Unary(_)))
        }
        (Tree::Ternary(t), e) => {
            t.condition.id() == slot
                && matches!(e, Expression::Ternary(_) | Expression::Assignment(_))
        }
        _ => false,
    };
    if !needs_parens {
        return expr;
    }
    let prefix = expr.prefix().clone();
    Expression::Parentheses(
        Parentheses::build(expr.with_prefix(Space::EMPTY)).with_prefix(prefix),
    )
}

// ============================================================================
// Fresh copies
// ============================================================================

/// Gives every node of a subtree a new id.
struct FreshIds;

impl JavaVisitor<()> for FreshIds {
    fn post_visit(&mut self, tree: Tree, _ctx: &mut VisitContext<'_, ()>) -> VisitOutput<Tree> {
        Ok(tree.with_id(NodeId::fresh()))
    }
}

fn fresh_copy(expr: &Expression) -> VisitOutput<Expression> {
    Traversal::default()
        .visit_once(&mut FreshIds, expr, &())
        .map(|(copy, _)| copy)
}

// ============================================================================
// Attribution
// ============================================================================

/// Owner reported for an unqualified call no static import declares.
const STATIC_IMPORTS: &str = "static imports";

type Attributed = Result<Tree, TemplateCompilationError>;

fn unresolved_type(name: impl Into<String>) -> TemplateCompilationError {
    TemplateCompilationError::UnresolvedType { name: name.into() }
}

fn unresolved_member(owner: &str, name: &str) -> TemplateCompilationError {
    TemplateCompilationError::UnresolvedMember {
        owner: owner.to_string(),
        name: name.to_string(),
    }
}

/// Types the nodes of a snippet instance bottom-up.
///
/// A name the snippet spells out must resolve. Only members looked up on
/// an argument whose type is unknown (an untyped `#{any()}`) may stay
/// unattributed: `#{any()}.size()` is left as is, `Missing.size()` fails.
struct Attribution<'r> {
    resolver: &'r Resolver,
    /// Variables the snippet declares, by name.
    locals: HashMap<String, JavaType>,
    /// Ids of the caller's arguments spliced into this instance.
    arguments: HashSet<NodeId>,
}

impl<'r> Attribution<'r> {
    fn new(resolver: &'r Resolver) -> Self {
        Attribution {
            resolver,
            locals: HashMap::new(),
            arguments: HashSet::new(),
        }
    }

    /// Whether `expr` is a caller's argument or the placeholder for one.
    fn is_argument(&self, expr: &Expression) -> bool {
        self.arguments.contains(&expr.id()) || expr.markers().find::<TemplateSlot>().is_some()
    }

    /// Whether `expr` is a dotted name written in the snippet itself.
    fn is_name(&self, expr: &Expression) -> bool {
        !self.is_argument(expr)
            && matches!(expr, Expression::Identifier(_) | Expression::FieldAccess(_))
    }

    fn attribute(&mut self, tree: Tree, parent: Option<&Tree>) -> Attributed {
        match &tree {
            Tree::Identifier(i) => self.identifier(i, parent),
            Tree::FieldAccess(f) => self.field_access(f, parent),
            Tree::MethodInvocation(m) => self.method_invocation(m),
            Tree::NewClass(n) => self.new_class(n),
            Tree::Annotation(a) => self.annotation(a),
            Tree::Assignment(a) => {
                // Annotation attributes are resolved by their annotation.
                if !matches!(parent, Some(Tree::Annotation(_))) {
                    if let Expression::Identifier(name) = &a.variable {
                        if name.java_type.is_none() && !self.is_argument(&a.variable) {
                            return Err(unresolved_type(name.simple_name.as_str()));
                        }
                    }
                }
                Ok(Tree::Assignment(a.with_java_type(a.variable.type_of())))
            }
            Tree::VariableDeclarations(v) => Ok(self.variables(v)),
            _ => Ok(derived(tree, self.resolver)),
        }
    }

    fn identifier(&self, i: &Arc<Identifier>, parent: Option<&Tree>) -> Attributed {
        let tree = Tree::Identifier(Arc::clone(i));
        if i.java_type.is_some()
            || i.markers.find::<TemplateSlot>().is_some()
            || is_declared_name(parent, i.id)
        {
            return Ok(tree);
        }
        if let Some(ty) = self.locals.get(&i.simple_name) {
            return Ok(Tree::Identifier(i.with_java_type(Some(ty.clone()))));
        }
        if let Some(ty) = self.resolver.type_named(&i.simple_name) {
            return Ok(Tree::Identifier(i.with_java_type(Some(ty))));
        }
        if let Some(field) = self.resolver.static_field(&i.simple_name) {
            return Ok(Tree::Identifier(
                i.with_java_type(Some(field.var_type.clone()))
                    .with_field_type(Some(field)),
            ));
        }
        match parent {
            // A package segment, checked once the whole name is known.
            Some(Tree::FieldAccess(f)) if f.target.id() == i.id => Ok(tree),
            Some(Tree::Assignment(a)) if a.variable.id() == i.id => Ok(tree),
            _ => Err(unresolved_type(i.simple_name.as_str())),
        }
    }

    fn field_access(&self, f: &Arc<FieldAccess>, parent: Option<&Tree>) -> Attributed {
        let tree = Tree::FieldAccess(Arc::clone(f));
        if f.java_type.is_some() {
            return Ok(tree);
        }
        let target = f.target.type_of();
        if let (Some(JavaType::Array(_)), "length") = (&target, f.simple_name()) {
            return Ok(Tree::FieldAccess(
                f.with_java_type(Some(JavaType::Primitive(Primitive::Int))),
            ));
        }
        let owner = target.and_then(|t| self.resolver.class_of(&t));
        if let Some(field) = owner.as_ref().and_then(|o| o.resolve_field(f.simple_name())) {
            let ty = field.var_type.clone();
            let name = f.name.with_element(
                f.name
                    .element
                    .with_java_type(Some(ty.clone()))
                    .with_field_type(Some(field)),
            );
            return Ok(Tree::FieldAccess(f.with_name(name).with_java_type(Some(ty))));
        }
        let qualified = f.qualified_name().filter(|_| self.is_name(&f.target));
        if let Some(ty) = qualified.as_deref().and_then(|n| self.resolver.type_named(n)) {
            return Ok(Tree::FieldAccess(f.with_java_type(Some(ty))));
        }
        match (owner, qualified) {
            (Some(owner), _) => Err(unresolved_member(&owner.fqn, f.simple_name())),
            (None, Some(qualified)) => match parent {
                Some(Tree::FieldAccess(outer)) if outer.target.id() == f.id => Ok(tree),
                _ => Err(unresolved_type(qualified)),
            },
            // Selected from an argument of unknown type.
            (None, None) => Ok(tree),
        }
    }

    fn method_invocation(&self, m: &Arc<MethodInvocation>) -> Attributed {
        let tree = Tree::MethodInvocation(Arc::clone(m));
        if m.method_type.is_some() {
            return Ok(tree);
        }
        let arguments: Vec<Option<JavaType>> =
            m.arguments.iter().map(Expression::type_of).collect();
        let (method_type, owner) = match m.select_expression() {
            Some(select) => match select.type_of().and_then(|t| self.resolver.class_of(&t)) {
                Some(class) => (
                    class.resolve_method(m.simple_name(), &arguments),
                    class.fqn.clone(),
                ),
                None => return Ok(tree),
            },
            None => (
                self.resolver.static_method(m.simple_name(), &arguments),
                STATIC_IMPORTS.to_string(),
            ),
        };
        match method_type {
            Some(method_type) => Ok(Tree::MethodInvocation(m.with_method_type(Some(method_type)))),
            None => Err(unresolved_member(&owner, m.simple_name())),
        }
    }

    fn new_class(&self, n: &Arc<NewClass>) -> Attributed {
        let tree = Tree::NewClass(Arc::clone(n));
        if n.constructor_type.is_some() {
            return Ok(tree);
        }
        let Some(class) = n.clazz.type_of().and_then(|t| self.resolver.class_of(&t)) else {
            return Ok(tree);
        };
        let arguments: Vec<Option<JavaType>> =
            n.arguments.iter().map(Expression::type_of).collect();
        match class.resolve_constructor(&arguments) {
            Some(constructor) => Ok(Tree::NewClass(n.with_constructor_type(Some(constructor)))),
            None => Err(unresolved_member(&class.fqn, "<init>")),
        }
    }

    /// Types `name = value` attributes with the annotation's element types.
    fn annotation(&self, a: &Arc<Annotation>) -> Attributed {
        let tree = Tree::Annotation(Arc::clone(a));
        let Some(arguments) = &a.arguments else {
            return Ok(tree);
        };
        let Some(class) = a
            .annotation_type
            .type_of()
            .and_then(|t| self.resolver.class_of(&t))
        else {
            return Ok(tree);
        };
        let mut elements = Vec::with_capacity(arguments.elements.len());
        for padded in &arguments.elements {
            let Expression::Assignment(assignment) = &padded.element else {
                elements.push(padded.clone());
                continue;
            };
            let Expression::Identifier(name) = &assignment.variable else {
                elements.push(padded.clone());
                continue;
            };
            let element = class
                .resolve_method(&name.simple_name, &[])
                .ok_or_else(|| unresolved_member(&class.fqn, &name.simple_name))?;
            let ty = element.return_type.clone();
            let variable = Expression::Identifier(name.with_java_type(Some(ty.clone())));
            let assignment = assignment.with_variable(variable).with_java_type(Some(ty));
            elements.push(padded.with_element(Expression::Assignment(assignment)));
        }
        Ok(Tree::Annotation(
            a.with_arguments(Some(arguments.with_elements(elements))),
        ))
    }

    fn variables(&mut self, v: &Arc<VariableDeclarations>) -> Tree {
        let Some(var_type) = v.type_expr.as_ref().and_then(TypeTree::type_of) else {
            return Tree::VariableDeclarations(Arc::clone(v));
        };
        let variables = v
            .variables
            .iter()
            .map(|padded| {
                let variable = &padded.element;
                self.locals
                    .insert(variable.name.simple_name.clone(), var_type.clone());
                if variable.variable_type.is_some() {
                    return padded.clone();
                }
                let declared = Arc::new(VariableType {
                    name: variable.name.simple_name.clone(),
                    owner: None,
                    var_type: var_type.clone(),
                    annotations: Vec::new(),
                });
                padded.with_element(
                    variable
                        .with_name(variable.name.with_java_type(Some(var_type.clone())))
                        .with_variable_type(Some(declared)),
                )
            })
            .collect();
        Tree::VariableDeclarations(v.with_variables(variables))
    }
}

/// Types that follow from the operands alone.
fn derived(tree: Tree, resolver: &Resolver) -> Tree {
    match &tree {
        Tree::Unary(u) => {
            let ty = if u.operator.element == UnaryOperator::Not {
                Some(JavaType::Primitive(Primitive::Boolean))
            } else {
                u.expression.type_of()
            };
            Tree::Unary(u.with_java_type(ty))
        }
        Tree::Binary(b) => {
            let left = b.left.type_of();
            let right = b.right.type_of();
            let ty = if b.operator.element.is_boolean() {
                Some(JavaType::Primitive(Primitive::Boolean))
            } else if b.operator.element == BinaryOperator::Addition
                && (is_string(left.as_ref()) || is_string(right.as_ref()))
            {
                resolver.type_named("java.lang.String")
            } else {
                promote(left.as_ref(), right.as_ref()).or(left)
            };
            Tree::Binary(b.with_java_type(ty))
        }
        Tree::Ternary(t) => {
            let ty = t
                .true_part
                .element
                .type_of()
                .or_else(|| t.false_part.element.type_of());
            Tree::Ternary(t.with_java_type(ty))
        }
        Tree::ParameterizedTypeTree(p) => {
            if p.java_type.is_some() {
                return tree;
            }
            let base = p
                .clazz
                .type_of()
                .and_then(|t| t.fully_qualified_name().map(str::to_string));
            let arguments = p
                .type_parameters
                .as_ref()
                .map(|c| c.iter().map(|t| t.type_of().unwrap_or(JavaType::Unknown)).collect())
                .unwrap_or_default();
            let ty = base.and_then(|base| resolver.catalog().parameterized(&base, arguments));
            Tree::ParameterizedTypeTree(p.with_java_type(ty))
        }
        Tree::ArrayTypeTree(a) => {
            let ty = a.element_type.type_of().map(JavaType::array_of);
            Tree::ArrayTypeTree(a.with_java_type(ty))
        }
        _ => tree,
    }
}

/// Whether the identifier `id` is the declared or member name of `parent`
/// rather than a reference to resolve on its own.
fn is_declared_name(parent: Option<&Tree>, id: NodeId) -> bool {
    match parent {
        Some(Tree::FieldAccess(f)) => f.name.element.id == id,
        Some(Tree::MethodInvocation(m)) => m.name.id == id,
        Some(Tree::NamedVariable(v)) => v.name.id == id,
        Some(Tree::MethodDeclaration(m)) => m.name.id == id,
        Some(Tree::ClassDeclaration(c)) => c.name.id == id,
        _ => false,
    }
}

/// The symbol named by a resolution failure met while applying.
fn unresolved_symbol(err: TemplateCompilationError) -> TemplateApplyError {
    let symbol = match err {
        TemplateCompilationError::UnresolvedType { name } => name,
        TemplateCompilationError::UnresolvedMember { owner, name } => {
            format!("{}#{}", owner, name)
        }
        other => other.to_string(),
    };
    TemplateApplyError::UnresolvedSymbol { symbol }
}

// ============================================================================
// Instantiation
// ============================================================================

pub(crate) struct Instantiate<'t> {
    attribution: Attribution<'t>,
    /// `None` while checking a prototype, which keeps its placeholders.
    arguments: Option<&'t [Expression]>,
    used: Vec<bool>,
    indent: String,
    holder: Option<NodeId>,
}

impl<'t> Instantiate<'t> {
    pub fn new(resolver: &'t Resolver, arguments: &'t [Expression], indent: &str) -> Self {
        Instantiate {
            attribution: Attribution::new(resolver),
            arguments: Some(arguments),
            used: vec![false; arguments.len()],
            indent: indent.to_string(),
            holder: None,
        }
    }

    /// Attribute a freshly parsed prototype against its placeholder types.
    pub fn check(resolver: &'t Resolver) -> Self {
        Instantiate {
            attribution: Attribution::new(resolver),
            arguments: None,
            used: Vec::new(),
            indent: String::new(),
            holder: None,
        }
    }

    /// Run over a prototype, returning the instance in the same shape.
    pub fn run(mut self, prototype: &Prototype) -> VisitOutput<Prototype> {
        let traversal = Traversal::default();
        Ok(match prototype {
            Prototype::Expression(e) => {
                Prototype::Expression(traversal.visit_once(&mut self, e, &())?.0)
            }
            Prototype::Annotation(a) => {
                Prototype::Annotation(traversal.visit_once(&mut self, a, &())?.0)
            }
            Prototype::Arguments(arguments) => {
                let holder = Arc::new(MethodInvocation {
                    id: NodeId::fresh(),
                    prefix: Space::EMPTY,
                    markers: Markers::EMPTY,
                    select: None,
                    name: Identifier::build("arguments", None),
                    arguments: Container {
                        before: Space::EMPTY,
                        elements: arguments.clone(),
                    },
                    method_type: None,
                });
                self.holder = Some(holder.id);
                let (out, _) = traversal.visit_once(&mut self, &holder, &())?;
                Prototype::Arguments(out.arguments.elements.clone())
            }
            Prototype::Statements(statements) => {
                let holder = Arc::new(Block {
                    id: NodeId::fresh(),
                    prefix: Space::EMPTY,
                    markers: Markers::EMPTY,
                    statements: statements.clone(),
                    end: Space::EMPTY,
                });
                self.holder = Some(holder.id);
                let (out, _) = traversal.visit_once(&mut self, &holder, &())?;
                Prototype::Statements(out.statements.clone())
            }
        })
    }

    fn substitute(
        &mut self,
        index: usize,
        placeholder: &Arc<Identifier>,
        parent: Option<&Tree>,
    ) -> VisitOutput<Tree> {
        let arguments = self.arguments.unwrap_or_default();
        let argument = arguments.get(index).ok_or(TemplateApplyError::ArityMismatch {
            expected: index + 1,
            actual: arguments.len(),
        })?;
        let seen = std::mem::replace(&mut self.used[index], true);
        let argument = if seen {
            fresh_copy(argument)?
        } else {
            argument.clone()
        };
        let prefix = placeholder.prefix.shift_indent("", &self.indent);
        let substituted = parenthesize_for(argument.with_prefix(prefix), parent, placeholder.id);
        self.attribution.arguments.insert(substituted.id());
        Ok(substituted.to_tree())
    }

    fn reindent(&self, tree: Tree) -> Tree {
        if self.indent.is_empty() {
            return tree;
        }
        let tree = match tree {
            Tree::Block(block) => {
                Tree::Block(block.with_end(block.end.shift_indent("", &self.indent)))
            }
            other => other,
        };
        let prefix = tree.prefix().shift_indent("", &self.indent);
        tree.with_prefix(prefix)
    }
}

impl JavaVisitor<()> for Instantiate<'_> {
    fn post_visit(&mut self, tree: Tree, ctx: &mut VisitContext<'_, ()>) -> VisitOutput<Tree> {
        if self.holder == Some(tree.id()) {
            return Ok(tree);
        }
        if let (Tree::Identifier(ident), Some(_)) = (&tree, self.arguments) {
            if let Some(slot) = ident.markers.find::<TemplateSlot>() {
                let index = slot.index;
                return self.substitute(index, ident, ctx.cursor().parent());
            }
        }
        let tree = match self.attribution.attribute(tree, ctx.cursor().parent()) {
            Ok(tree) => tree,
            Err(err) if self.arguments.is_some() => return Err(unresolved_symbol(err).into()),
            Err(err) => return Err(err.into()),
        };
        let tree = self.reindent(tree);
        Ok(tree.with_id(NodeId::fresh()))
    }
}

fn is_string(ty: Option<&JavaType>) -> bool {
    ty.and_then(JavaType::fully_qualified_name) == Some("java.lang.String")
}

/// Binary numeric promotion of two primitive operand types.
fn promote(left: Option<&JavaType>, right: Option<&JavaType>) -> Option<JavaType> {
    let rank = |ty: Option<&JavaType>| match ty {
        Some(JavaType::Primitive(p)) if p.is_numeric() || *p == Primitive::Char => Some(match p {
            Primitive::Double => 4,
            Primitive::Float => 3,
            Primitive::Long => 2,
            _ => 1,
        }),
        _ => None,
    };
    let widest = rank(left)?.max(rank(right)?);
    Some(JavaType::Primitive(match widest {
        4 => Primitive::Double,
        3 => Primitive::Float,
        2 => Primitive::Long,
        _ => Primitive::Int,
    }))
}

// ============================================================================
// Coordinates
// ============================================================================

fn mismatch(prototype: &Prototype, coordinates: &Coordinates) -> TransformError {
    TemplateApplyError::CoordinateMismatch {
        snippet: prototype.kind_name(),
        coordinate: coordinates.name(),
    }
    .into()
}

/// Indentation of the line a node starts on, if it starts one.
fn line_indent(prefix: &Space) -> String {
    prefix.indent().unwrap_or("").to_string()
}

pub(crate) fn splice(
    prototype: &Prototype,
    coordinates: &Coordinates,
    resolver: &Resolver,
    arguments: &[Expression],
) -> Result<Tree, TransformError> {
    match coordinates {
        Coordinates::Replace(target) => {
            let indent = line_indent(target.prefix());
            let instance = Instantiate::new(resolver, arguments, &indent).run(prototype)?;
            let replaced = match instance {
                Prototype::Expression(e) if Expression::from_tree(target.clone()).is_some() => {
                    e.to_tree()
                }
                Prototype::Statements(mut s)
                    if s.len() == 1 && Statement::from_tree(target.clone()).is_some() =>
                {
                    s.remove(0).element.to_tree()
                }
                Prototype::Annotation(a) if matches!(target, Tree::Annotation(_)) => {
                    Tree::Annotation(a)
                }
                _ => return Err(mismatch(prototype, coordinates)),
            };
            Ok(replaced.with_prefix(target.prefix().clone()))
        }
        Coordinates::ReplaceArguments(call) => {
            let indent = line_indent(&call.prefix);
            let instance = Instantiate::new(resolver, arguments, &indent).run(prototype)?;
            let elements = match instance {
                Prototype::Arguments(elements) => elements,
                Prototype::Expression(e) => vec![RightPadded::new(e)],
                _ => return Err(mismatch(prototype, coordinates)),
            };
            let new_arguments = call.arguments.with_elements(elements);
            let types: Vec<Option<JavaType>> =
                new_arguments.iter().map(Expression::type_of).collect();
            let method_type = rebind_method(call, &types, resolver);
            Ok(Tree::MethodInvocation(
                call.with_arguments(new_arguments).with_method_type(method_type),
            ))
        }
        Coordinates::AddAnnotation(target) => {
            let indent = line_indent(target.prefix());
            let instance = Instantiate::new(resolver, arguments, &indent).run(prototype)?;
            let Prototype::Annotation(annotation) = instance else {
                return Err(mismatch(prototype, coordinates));
            };
            let prefix = target.prefix().clone();
            match target {
                Tree::ClassDeclaration(c) => Ok(Tree::ClassDeclaration(annotate_class(
                    c, annotation, &prefix,
                ))),
                Tree::MethodDeclaration(m) => Ok(Tree::MethodDeclaration(annotate_method(
                    m, annotation, &prefix,
                ))),
                Tree::VariableDeclarations(v) => Ok(Tree::VariableDeclarations(
                    annotate_variables(v, annotation, &prefix),
                )),
                _ => Err(mismatch(prototype, coordinates)),
            }
        }
        Coordinates::LastStatement(block) => {
            let end_indent = line_indent(&block.end);
            let indent = match block.statements.last() {
                Some(last) => last.element.prefix().indent().map(str::to_string),
                None => None,
            }
            .unwrap_or_else(|| format!("{}{}", end_indent, indent_unit(&end_indent, &end_indent)));

            let instance = Instantiate::new(resolver, arguments, &indent).run(prototype)?;
            let Prototype::Statements(added) = instance else {
                return Err(mismatch(prototype, coordinates));
            };
            let mut statements = block.statements.clone();
            for (i, statement) in added.into_iter().enumerate() {
                let element = if i == 0 {
                    let prefix = statement
                        .element
                        .prefix()
                        .with_whitespace(&format!("\n{}", indent));
                    statement.element.with_prefix(prefix)
                } else {
                    statement.element
                };
                statements.push(RightPadded {
                    element,
                    after: statement.after,
                });
            }
            let end = if block.end.has_newline() {
                block.end.clone()
            } else {
                block.end.with_whitespace(&format!("\n{}", end_indent))
            };
            Ok(Tree::Block(block.with_statements(statements).with_end(end)))
        }
    }
}

/// Method type for `call` with new argument types: resolved on the receiver,
/// then on the previous declaring type, else the previous type with the new
/// parameters.
fn rebind_method(
    call: &Arc<MethodInvocation>,
    types: &[Option<JavaType>],
    resolver: &Resolver,
) -> Option<Arc<MethodType>> {
    let name = call.simple_name();
    let on_receiver = call
        .select_expression()
        .and_then(Expression::type_of)
        .and_then(|t| resolver.class_of(&t))
        .and_then(|class| class.resolve_method(name, types));
    if on_receiver.is_some() {
        return on_receiver;
    }
    let previous = call.method_type.as_ref()?;
    let declaring = resolver
        .class_of(&JavaType::Class(Arc::clone(&previous.declaring_type)))
        .unwrap_or_else(|| Arc::clone(&previous.declaring_type));
    declaring.resolve_method(name, types).or_else(|| {
        Some(Arc::new(MethodType {
            declaring_type: Arc::clone(&previous.declaring_type),
            name: previous.name.clone(),
            parameter_names: (0..types.len()).map(|i| format!("arg{}", i)).collect(),
            parameter_types: types
                .iter()
                .map(|t| t.clone().unwrap_or(JavaType::Unknown))
                .collect(),
            return_type: previous.return_type.clone(),
            flags: previous.flags,
        }))
    })
}

// ============================================================================
// Annotation placement
// ============================================================================

/// Where `annotation` goes among `existing`, sorted by simple name.
fn annotation_index(existing: &[Arc<Annotation>], annotation: &Annotation) -> usize {
    let name = annotation.simple_name();
    existing
        .iter()
        .position(|a| a.simple_name() > name)
        .unwrap_or(existing.len())
}

/// Space that separates consecutive annotations on a declaration whose own
/// prefix is `prefix`: a new line at the same indent, or one space inline.
fn separator(prefix: &Space) -> Space {
    match prefix.indent() {
        Some(indent) => Space::format(&format!("\n{}", indent)),
        None => Space::single(),
    }
}

/// The annotation list with `annotation` inserted, and whether it went
/// first. A first annotation takes no prefix; the element after it then
/// needs the separator.
fn insert_annotation(
    existing: &[Arc<Annotation>],
    annotation: Arc<Annotation>,
    prefix: &Space,
) -> (Vec<Arc<Annotation>>, bool) {
    let index = annotation_index(existing, &annotation);
    let mut annotations = existing.to_vec();
    if index == 0 {
        annotations.insert(0, annotation.with_prefix(Space::EMPTY));
        if let Some(next) = annotations.get_mut(1) {
            *next = next.with_prefix(separator(prefix));
        }
        (annotations, existing.is_empty())
    } else {
        annotations.insert(index, annotation.with_prefix(separator(prefix)));
        (annotations, false)
    }
}

fn annotate_class(
    class: &Arc<ClassDeclaration>,
    annotation: Arc<Annotation>,
    prefix: &Space,
) -> Arc<ClassDeclaration> {
    let (annotations, pushes_modifiers) =
        insert_annotation(&class.leading_annotations, annotation, prefix);
    let class = class.with_leading_annotations(annotations);
    if !pushes_modifiers {
        return class;
    }
    match class.modifiers.split_first() {
        Some((first, rest)) => {
            let mut modifiers = vec![Modifier::new(separator(prefix), first.kind)];
            modifiers.extend(rest.iter().cloned());
            class.with_modifiers(modifiers)
        }
        None => class.with_keyword(ClassKeyword {
            prefix: separator(prefix),
            kind: class.keyword.kind,
        }),
    }
}

fn annotate_method(
    method: &Arc<MethodDeclaration>,
    annotation: Arc<Annotation>,
    prefix: &Space,
) -> Arc<MethodDeclaration> {
    let (annotations, pushes_modifiers) =
        insert_annotation(&method.leading_annotations, annotation, prefix);
    let method = method.with_leading_annotations(annotations);
    if !pushes_modifiers {
        return method;
    }
    match method.modifiers.split_first() {
        Some((first, rest)) => {
            let mut modifiers = vec![Modifier::new(separator(prefix), first.kind)];
            modifiers.extend(rest.iter().cloned());
            method.with_modifiers(modifiers)
        }
        None => match &method.return_type {
            Some(return_type) => {
                method.with_return_type(Some(return_type.with_prefix(separator(prefix))))
            }
            None => method.with_name(method.name.with_prefix(separator(prefix))),
        },
    }
}

fn annotate_variables(
    variables: &Arc<VariableDeclarations>,
    annotation: Arc<Annotation>,
    prefix: &Space,
) -> Arc<VariableDeclarations> {
    let (annotations, pushes_modifiers) =
        insert_annotation(&variables.leading_annotations, annotation, prefix);
    let variables = variables.with_leading_annotations(annotations);
    if !pushes_modifiers {
        return variables;
    }
    match variables.modifiers.split_first() {
        Some((first, rest)) => {
            let mut modifiers = vec![Modifier::new(separator(prefix), first.kind)];
            modifiers.extend(rest.iter().cloned());
            variables.with_modifiers(modifiers)
        }
        None => match &variables.type_expr {
            Some(type_expr) => {
                variables.with_type_expr(Some(type_expr.with_prefix(separator(prefix))))
            }
            None => variables,
        },
    }
}
