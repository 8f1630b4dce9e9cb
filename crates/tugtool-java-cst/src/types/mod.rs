// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved semantic types.
//!
//! Types are attached to typed nodes by whatever produced the tree (or by the
//! template engine for synthesized code). They are immutable and shared via
//! `Arc`; class types reference their supertypes but never their own
//! methods' declaring type, so the type graph stays acyclic.
//!
//! Class identity is the fully qualified name: two [`ClassType`] values with
//! the same name compare equal even if one is a shallow stub.

mod catalog;
mod hierarchy;

pub use catalog::TypeCatalog;
pub use hierarchy::{ancestry, inherits_from, is_assignable_to};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::nodes::traits::ref_eq_by_value;

// ============================================================================
// Primitives and kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Void,
    /// Type of the `null` literal.
    Null,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Double => "double",
            Primitive::Float => "float",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Short => "short",
            Primitive::Void => "void",
            Primitive::Null => "null",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "double" => Primitive::Double,
            "float" => Primitive::Float,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "short" => Primitive::Short,
            "void" => Primitive::Void,
            "null" => Primitive::Null,
            _ => return None,
        })
    }

    /// Wrapper class used when this primitive is boxed.
    pub fn boxed_name(self) -> Option<&'static str> {
        Some(match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Double => "java.lang.Double",
            Primitive::Float => "java.lang.Float",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Short => "java.lang.Short",
            Primitive::Void | Primitive::Null => return None,
        })
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Boolean | Primitive::Void | Primitive::Null)
    }
}

/// What kind of type declaration a class type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodFlags {
    pub is_static: bool,
    pub is_constructor: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

// ============================================================================
// JavaType
// ============================================================================

/// A resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum JavaType {
    Primitive(Primitive),
    Class(Arc<ClassType>),
    Parameterized(Arc<ParameterizedType>),
    /// Array of the boxed element type.
    Array(Arc<JavaType>),
    GenericTypeVariable(Arc<GenericTypeVariable>),
    Method(Arc<MethodType>),
    Variable(Arc<VariableType>),
    Unknown,
}

impl JavaType {
    pub fn primitive(primitive: Primitive) -> JavaType {
        JavaType::Primitive(primitive)
    }

    pub fn array_of(element: JavaType) -> JavaType {
        JavaType::Array(Arc::new(element))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, JavaType::Unknown)
    }

    pub fn is_primitive(&self, primitive: Primitive) -> bool {
        matches!(self, JavaType::Primitive(p) if *p == primitive)
    }

    /// The class behind this type: the class itself, the raw class of a
    /// parameterized type, the first bound of a type variable, or the type
    /// of a variable.
    pub fn as_class(&self) -> Option<&Arc<ClassType>> {
        match self {
            JavaType::Class(c) => Some(c),
            JavaType::Parameterized(p) => Some(&p.base),
            JavaType::GenericTypeVariable(g) => g.bounds.first().and_then(JavaType::as_class),
            JavaType::Variable(v) => v.var_type.as_class(),
            _ => None,
        }
    }

    pub fn fully_qualified_name(&self) -> Option<&str> {
        self.as_class().map(|c| c.fqn.as_str())
    }

    /// Name of the erasure: primitive keyword, raw class name, or erased
    /// element name followed by `[]` for arrays.
    pub fn erased_name(&self) -> Option<String> {
        match self {
            JavaType::Primitive(p) => Some(p.keyword().to_string()),
            JavaType::Class(c) => Some(c.fqn.clone()),
            JavaType::Parameterized(p) => Some(p.base.fqn.clone()),
            JavaType::Array(element) => element.erased_name().map(|n| format!("{}[]", n)),
            JavaType::GenericTypeVariable(g) => Some(
                g.bounds
                    .first()
                    .and_then(JavaType::erased_name)
                    .unwrap_or_else(|| "java.lang.Object".to_string()),
            ),
            JavaType::Variable(v) => v.var_type.erased_name(),
            JavaType::Method(_) | JavaType::Unknown => None,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Class(c) => f.write_str(&c.fqn),
            JavaType::Parameterized(p) => {
                write!(f, "{}<", p.base.fqn)?;
                for (i, arg) in p.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            JavaType::Array(element) => write!(f, "{}[]", element),
            JavaType::GenericTypeVariable(g) => f.write_str(&g.name),
            JavaType::Method(m) => write!(f, "{}", m),
            JavaType::Variable(v) => write!(f, "{} {}", v.var_type, v.name),
            JavaType::Unknown => f.write_str("<unknown>"),
        }
    }
}

ref_eq_by_value!(JavaType, Primitive);

// ============================================================================
// Class types
// ============================================================================

/// A declared class, interface, enum, record or annotation type.
#[derive(Debug, Clone, Default)]
pub struct ClassType {
    pub fqn: String,
    pub kind: TypeKind,
    pub type_parameters: Vec<String>,
    pub supertype: Option<JavaType>,
    pub interfaces: Vec<JavaType>,
    /// Annotations on the type declaration itself.
    pub annotations: Vec<JavaType>,
    pub members: Vec<Arc<VariableType>>,
    pub methods: Vec<MethodSignature>,
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.fqn == other.fqn
    }
}

impl Eq for ClassType {}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fqn.hash(state);
    }
}

impl ClassType {
    pub fn builder(fqn: impl Into<String>) -> ClassTypeBuilder {
        ClassTypeBuilder {
            inner: ClassType {
                fqn: fqn.into(),
                ..ClassType::default()
            },
        }
    }

    /// A class known only by name.
    pub fn shallow(fqn: impl Into<String>) -> Arc<ClassType> {
        ClassType::builder(fqn).build()
    }

    pub fn simple_name(&self) -> &str {
        self.fqn.rsplit(['.', '$']).next().unwrap_or(self.fqn.as_str())
    }

    pub fn package_name(&self) -> &str {
        match self.fqn.rfind('.') {
            Some(i) => &self.fqn[..i],
            None => "",
        }
    }

    pub fn supertype_class(&self) -> Option<&Arc<ClassType>> {
        self.supertype.as_ref().and_then(JavaType::as_class)
    }

    pub fn interface_classes(&self) -> impl Iterator<Item = &Arc<ClassType>> {
        self.interfaces.iter().filter_map(JavaType::as_class)
    }

    pub fn annotation_classes(&self) -> impl Iterator<Item = &Arc<ClassType>> {
        self.annotations.iter().filter_map(JavaType::as_class)
    }

    /// Methods declared directly on this type with the given name.
    pub fn declared_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSignature> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Arc<VariableType>> {
        self.members.iter().find(|v| v.name == name)
    }

    /// Resolve a field on this type or any ancestor.
    pub fn resolve_field(self: &Arc<Self>, name: &str) -> Option<Arc<VariableType>> {
        ancestry(self)
            .into_iter()
            .find_map(|c| c.field(name).cloned())
    }

    /// Resolve a method call on this type or any ancestor.
    ///
    /// Candidates must match name and arity (varargs accept any number of
    /// trailing arguments). Arguments with a known type must be assignable to
    /// the parameter type; arguments of unknown type are accepted.
    pub fn resolve_method(
        self: &Arc<Self>,
        name: &str,
        arguments: &[Option<JavaType>],
    ) -> Option<Arc<MethodType>> {
        for class in ancestry(self) {
            for signature in class.declared_methods(name) {
                if signature.accepts(arguments) {
                    return Some(Arc::new(MethodType::bind(&class, signature)));
                }
            }
        }
        None
    }

    /// Resolve a constructor with the given arguments.
    pub fn resolve_constructor(self: &Arc<Self>, arguments: &[Option<JavaType>]) -> Option<Arc<MethodType>> {
        self.declared_methods("<constructor>")
            .find(|sig| sig.accepts(arguments))
            .map(|sig| Arc::new(MethodType::bind(self, sig)))
            .or_else(|| {
                arguments.is_empty().then(|| {
                    Arc::new(MethodType::bind(
                        self,
                        &MethodSignature::constructor(Vec::new()),
                    ))
                })
            })
    }
}

/// Builder for [`ClassType`].
#[derive(Debug, Clone)]
pub struct ClassTypeBuilder {
    inner: ClassType,
}

impl ClassTypeBuilder {
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.inner.kind = kind;
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.inner.type_parameters.push(name.into());
        self
    }

    pub fn supertype(mut self, supertype: JavaType) -> Self {
        self.inner.supertype = Some(supertype);
        self
    }

    pub fn interface(mut self, interface: JavaType) -> Self {
        self.inner.interfaces.push(interface);
        self
    }

    pub fn annotation(mut self, annotation: JavaType) -> Self {
        self.inner.annotations.push(annotation);
        self
    }

    pub fn field(mut self, name: impl Into<String>, var_type: JavaType) -> Self {
        let owner = self.inner.fqn.clone();
        self.inner.members.push(Arc::new(VariableType {
            name: name.into(),
            owner: Some(owner),
            var_type,
            annotations: Vec::new(),
        }));
        self
    }

    pub fn method(mut self, signature: MethodSignature) -> Self {
        self.inner.methods.push(signature);
        self
    }

    pub fn build(self) -> Arc<ClassType> {
        Arc::new(self.inner)
    }
}

// ============================================================================
// Parameterized types and type variables
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedType {
    pub base: Arc<ClassType>,
    pub arguments: Vec<JavaType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericTypeVariable {
    pub name: String,
    pub bounds: Vec<JavaType>,
}

// ============================================================================
// Methods
// ============================================================================

/// A method as declared on a class, without a link back to the class.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_names: Vec<String>,
    pub parameter_types: Vec<JavaType>,
    pub return_type: JavaType,
    pub flags: MethodFlags,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, return_type: JavaType) -> Self {
        MethodSignature {
            name: name.into(),
            parameter_names: Vec::new(),
            parameter_types: Vec::new(),
            return_type,
            flags: MethodFlags::default(),
        }
    }

    pub fn constructor(parameter_types: Vec<JavaType>) -> Self {
        let mut signature = MethodSignature::new("<constructor>", JavaType::Primitive(Primitive::Void));
        signature.parameter_names = (0..parameter_types.len()).map(|i| format!("arg{}", i)).collect();
        signature.parameter_types = parameter_types;
        signature.flags.is_constructor = true;
        signature
    }

    pub fn param(mut self, name: impl Into<String>, param_type: JavaType) -> Self {
        self.parameter_names.push(name.into());
        self.parameter_types.push(param_type);
        self
    }

    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.flags.is_static = true;
        self
    }

    pub fn varargs(mut self) -> Self {
        self.flags.is_varargs = true;
        self
    }

    /// Same name and same erased parameter types.
    pub fn same_erasure(&self, other: &MethodSignature) -> bool {
        self.name == other.name
            && self.parameter_types.len() == other.parameter_types.len()
            && self
                .parameter_types
                .iter()
                .zip(&other.parameter_types)
                .all(|(a, b)| a.erased_name() == b.erased_name())
    }

    fn accepts(&self, arguments: &[Option<JavaType>]) -> bool {
        let params = &self.parameter_types;
        let arity_ok = if self.flags.is_varargs && !params.is_empty() {
            arguments.len() + 1 >= params.len()
        } else {
            arguments.len() == params.len()
        };
        if !arity_ok {
            return false;
        }
        arguments.iter().enumerate().all(|(i, arg)| {
            let Some(arg) = arg else { return true };
            let param = match params.get(i) {
                Some(p) => p,
                None => match params.last() {
                    Some(p) => p,
                    None => return false,
                },
            };
            let is_vararg_slot = self.flags.is_varargs && i + 1 >= params.len();
            match (is_vararg_slot, param) {
                (true, JavaType::Array(element)) => {
                    type_accepts(param, arg) || type_accepts(element, arg)
                }
                _ => type_accepts(param, arg),
            }
        })
    }
}

fn type_accepts(param: &JavaType, arg: &JavaType) -> bool {
    match param.erased_name() {
        Some(name) => is_assignable_to(&name, arg),
        None => true,
    }
}

/// A method bound to its declaring class.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodType {
    pub declaring_type: Arc<ClassType>,
    pub name: String,
    pub parameter_names: Vec<String>,
    pub parameter_types: Vec<JavaType>,
    pub return_type: JavaType,
    pub flags: MethodFlags,
}

impl MethodType {
    pub fn bind(declaring_type: &Arc<ClassType>, signature: &MethodSignature) -> Self {
        MethodType {
            declaring_type: Arc::clone(declaring_type),
            name: signature.name.clone(),
            parameter_names: signature.parameter_names.clone(),
            parameter_types: signature.parameter_types.clone(),
            return_type: signature.return_type.clone(),
            flags: signature.flags,
        }
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            parameter_names: self.parameter_names.clone(),
            parameter_types: self.parameter_types.clone(),
            return_type: self.return_type.clone(),
            flags: self.flags,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.is_constructor || self.name == "<constructor>"
    }

    /// `owner#name(param, ...)` with erased parameter names.
    pub fn key(&self) -> String {
        let params: Vec<String> = self
            .parameter_types
            .iter()
            .map(|t| t.erased_name().unwrap_or_else(|| "?".to_string()))
            .collect();
        format!("{}#{}({})", self.declaring_type.fqn, self.name, params.join(","))
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ============================================================================
// Variables
// ============================================================================

/// A field, parameter or local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableType {
    pub name: String,
    /// Fully qualified name of the owning class, if the variable is a field.
    pub owner: Option<String>,
    pub var_type: JavaType,
    pub annotations: Vec<JavaType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> Arc<ClassType> {
        ClassType::builder("java.lang.String")
            .method(MethodSignature::new("isEmpty", JavaType::Primitive(Primitive::Boolean)))
            .method(
                MethodSignature::new("charAt", JavaType::Primitive(Primitive::Char))
                    .param("index", JavaType::Primitive(Primitive::Int)),
            )
            .build()
    }

    #[test]
    fn erased_names() {
        let list = ClassType::shallow("java.util.List");
        let parameterized = JavaType::Parameterized(Arc::new(ParameterizedType {
            base: Arc::clone(&list),
            arguments: vec![JavaType::Class(string())],
        }));
        assert_eq!(parameterized.erased_name().as_deref(), Some("java.util.List"));
        assert_eq!(parameterized.to_string(), "java.util.List<java.lang.String>");
        let array = JavaType::array_of(JavaType::Primitive(Primitive::Int));
        assert_eq!(array.erased_name().as_deref(), Some("int[]"));
        assert_eq!(JavaType::Unknown.erased_name(), None);
    }

    #[test]
    fn class_identity_is_name() {
        assert_eq!(*string(), *ClassType::shallow("java.lang.String"));
        assert_eq!(string().simple_name(), "String");
        assert_eq!(string().package_name(), "java.lang");
    }

    #[test]
    fn resolves_methods_by_arity_and_type() {
        let string = string();
        let is_empty = string.resolve_method("isEmpty", &[]).unwrap();
        assert!(is_empty.return_type.is_primitive(Primitive::Boolean));
        assert_eq!(is_empty.key(), "java.lang.String#isEmpty()");

        let int = Some(JavaType::Primitive(Primitive::Int));
        assert!(string.resolve_method("charAt", &[int]).is_some());
        assert!(string.resolve_method("charAt", &[]).is_none());
        let wrong = Some(JavaType::Primitive(Primitive::Boolean));
        assert!(string.resolve_method("charAt", &[wrong]).is_none());
    }

    #[test]
    fn varargs_accept_any_trailing_count() {
        let object = JavaType::Class(ClassType::shallow("java.lang.Object"));
        let sig = MethodSignature::new("of", object.clone())
            .param("items", JavaType::array_of(object))
            .varargs();
        let s = Some(JavaType::Class(string()));
        assert!(sig.accepts(&[]));
        assert!(sig.accepts(&[s.clone(), s.clone(), s]));
    }
}
