// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compilation units, imports and declarations.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::category::{Expression, Statement, TypeTree};
use super::expressions::{FieldAccess, Identifier};
use super::markers::{JavaVersion, Markers};
use super::space::{Container, LeftPadded, RightPadded, Space};
use super::statements::Block;
use super::traits::{ref_eq_by_value, NodeId};
use crate::types::{ClassType, JavaType, MethodType, TypeKind, VariableType};
use crate::types_in_use::TypesInUse;

// ============================================================================
// Compilation unit
// ============================================================================

/// Lazily computed [`TypesInUse`]; a clone starts out empty, so every
/// `with_*` edit of a compilation unit drops the cached value.
#[derive(Default)]
pub(crate) struct TypesInUseCache(OnceLock<Arc<TypesInUse>>);

impl Clone for TypesInUseCache {
    fn clone(&self) -> Self {
        TypesInUseCache::default()
    }
}

impl PartialEq for TypesInUseCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for TypesInUseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.get().is_some() { "cached" } else { "empty" })
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub source_path: String,
    pub package: Option<Arc<Package>>,
    pub imports: Vec<Arc<Import>>,
    pub classes: Vec<Arc<ClassDeclaration>>,
    /// Whitespace and comments before end of file.
    pub eof: Space,
    types_in_use: TypesInUseCache,
}

impl_with!(CompilationUnit {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    source_path: String,
    package: Option<Arc<Package>>,
    imports: Vec<Arc<Import>>,
    classes: Vec<Arc<ClassDeclaration>>,
    eof: Space,
});

impl CompilationUnit {
    /// An empty compilation unit for `source_path`.
    pub fn build(source_path: impl Into<String>) -> Arc<Self> {
        Arc::new(CompilationUnit {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            source_path: source_path.into(),
            package: None,
            imports: Vec::new(),
            classes: Vec::new(),
            eof: Space::EMPTY,
            types_in_use: TypesInUseCache::default(),
        })
    }

    /// Types and methods referenced anywhere outside import statements.
    ///
    /// Computed on first use and cached until the next edit.
    pub fn types_in_use(self: &Arc<Self>) -> Arc<TypesInUse> {
        Arc::clone(
            self.types_in_use
                .0
                .get_or_init(|| Arc::new(TypesInUse::collect(self))),
        )
    }

    pub fn package_name(&self) -> Option<String> {
        self.package.as_ref().and_then(|p| p.name())
    }

    /// Whether `fqn` is imported explicitly or through a wildcard import.
    pub fn imports_type(&self, fqn: &str) -> bool {
        self.imports.iter().any(|i| {
            !i.is_static()
                && match i.type_name() {
                    Some(name) if i.is_wildcard() => {
                        name.strip_suffix(".*")
                            .is_some_and(|pkg| fqn.rsplit_once('.').is_some_and(|(p, _)| p == pkg))
                    }
                    Some(name) => name == fqn,
                    None => false,
                }
        })
    }

    pub fn java_version(&self) -> Option<u32> {
        self.markers
            .find::<JavaVersion>()
            .map(|v| v.source_compatibility)
    }

    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}

java_node! {
    /// `package a.b.c;`
    pub struct Package {
        pub expression: Expression,
    }
}

impl Package {
    pub fn name(&self) -> Option<String> {
        self.expression.qualified_name()
    }

    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}

java_node! {
    /// `import [static] a.b.C;`
    pub struct Import {
        /// Space before `static` for static imports.
        pub statik: Option<Space>,
        pub qualid: Arc<FieldAccess>,
    }
}

impl Import {
    /// `import fqn;` with no leading whitespace, or `None` for a name
    /// without a package.
    pub fn build(fqn: &str, is_static: bool) -> Option<Arc<Self>> {
        let qualid = FieldAccess::qualified(fqn)?;
        let qualid = qualid.with_prefix(Space::single());
        Some(Arc::new(Import {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            statik: is_static.then(Space::single),
            qualid,
        }))
    }

    pub fn is_static(&self) -> bool {
        self.statik.is_some()
    }

    pub fn is_wildcard(&self) -> bool {
        self.qualid.name.element.simple_name == "*"
    }

    /// Full imported name, e.g. `java.util.List` or `java.util.*`.
    pub fn type_name(&self) -> Option<String> {
        self.qualid.qualified_name()
    }

    /// Package part of the imported name. For static imports this is the
    /// package of the owning class.
    pub fn package_name(&self) -> Option<String> {
        let name = self.type_name()?;
        let owner = if self.is_static() {
            name.rsplit_once('.').map(|(owner, _)| owner.to_string())?
        } else {
            name
        };
        owner.rsplit_once('.').map(|(pkg, _)| pkg.to_string())
    }

    /// The imported class for a non-static, non-wildcard import; the owning
    /// class for a static import.
    pub fn class_name(&self) -> Option<String> {
        let name = self.type_name()?;
        if self.is_static() {
            name.rsplit_once('.').map(|(owner, _)| owner.to_string())
        } else if self.is_wildcard() {
            None
        } else {
            Some(name)
        }
    }

    pub fn type_of(&self) -> Option<JavaType> {
        None
    }
}

// ============================================================================
// Modifiers and keywords
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Default,
    Synchronized,
    Transient,
    Volatile,
    Native,
    Strictfp,
}

impl ModifierKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Protected => "protected",
            ModifierKind::Private => "private",
            ModifierKind::Static => "static",
            ModifierKind::Final => "final",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Default => "default",
            ModifierKind::Synchronized => "synchronized",
            ModifierKind::Transient => "transient",
            ModifierKind::Volatile => "volatile",
            ModifierKind::Native => "native",
            ModifierKind::Strictfp => "strictfp",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => ModifierKind::Public,
            "protected" => ModifierKind::Protected,
            "private" => ModifierKind::Private,
            "static" => ModifierKind::Static,
            "final" => ModifierKind::Final,
            "abstract" => ModifierKind::Abstract,
            "default" => ModifierKind::Default,
            "synchronized" => ModifierKind::Synchronized,
            "transient" => ModifierKind::Transient,
            "volatile" => ModifierKind::Volatile,
            "native" => ModifierKind::Native,
            "strictfp" => ModifierKind::Strictfp,
            _ => return None,
        })
    }
}

/// A modifier keyword token.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub prefix: Space,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn new(prefix: Space, kind: ModifierKind) -> Self {
        Modifier { prefix, kind }
    }
}

/// The `class` / `interface` / `enum` / `record` / `@interface` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassKeyword {
    pub prefix: Space,
    pub kind: TypeKind,
}

ref_eq_by_value!(Modifier, ClassKeyword);

// ============================================================================
// Declarations
// ============================================================================

java_node! {
    /// A class, interface, enum, record or annotation type declaration.
    pub struct ClassDeclaration {
        pub leading_annotations: Vec<Arc<Annotation>>,
        pub modifiers: Vec<Modifier>,
        pub keyword: ClassKeyword,
        pub name: Arc<Identifier>,
        pub extends: Option<LeftPadded<TypeTree>>,
        pub implements: Option<Container<TypeTree>>,
        pub body: Arc<Block>,
        pub class_type: Option<Arc<ClassType>>,
    }
}

impl ClassDeclaration {
    pub fn simple_name(&self) -> &str {
        &self.name.simple_name
    }

    pub fn fqn(&self) -> Option<&str> {
        self.class_type.as_ref().map(|c| c.fqn.as_str())
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }

    /// Methods and constructors declared directly in the body.
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDeclaration>> {
        self.body.statements.iter().filter_map(|s| match &s.element {
            Statement::MethodDeclaration(m) => Some(m),
            _ => None,
        })
    }

    /// Field declarations directly in the body.
    pub fn fields(&self) -> impl Iterator<Item = &Arc<VariableDeclarations>> {
        self.body.statements.iter().filter_map(|s| match &s.element {
            Statement::VariableDeclarations(v) => Some(v),
            _ => None,
        })
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.class_type.as_ref().map(|c| JavaType::Class(Arc::clone(c)))
    }
}

java_node! {
    /// A method or constructor declaration.
    pub struct MethodDeclaration {
        pub leading_annotations: Vec<Arc<Annotation>>,
        pub modifiers: Vec<Modifier>,
        /// `None` for constructors.
        pub return_type: Option<TypeTree>,
        pub name: Arc<Identifier>,
        pub parameters: Container<Arc<VariableDeclarations>>,
        /// `None` for abstract and interface methods.
        pub body: Option<Arc<Block>>,
        pub method_type: Option<Arc<MethodType>>,
    }
}

impl MethodDeclaration {
    pub fn simple_name(&self) -> &str {
        &self.name.simple_name
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.method_type.as_ref().map(|m| JavaType::Method(Arc::clone(m)))
    }
}

java_node! {
    /// A field, local variable or parameter declaration.
    pub struct VariableDeclarations {
        pub leading_annotations: Vec<Arc<Annotation>>,
        pub modifiers: Vec<Modifier>,
        pub type_expr: Option<TypeTree>,
        /// Space before `...` on a varargs parameter.
        pub varargs: Option<Space>,
        pub variables: Vec<RightPadded<Arc<NamedVariable>>>,
    }
}

impl VariableDeclarations {
    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.type_expr.as_ref().and_then(TypeTree::type_of)
    }
}

java_node! {
    /// One declarator in a [`VariableDeclarations`].
    pub struct NamedVariable {
        pub name: Arc<Identifier>,
        pub initializer: Option<LeftPadded<Expression>>,
        pub variable_type: Option<Arc<VariableType>>,
    }
}

impl NamedVariable {
    pub fn simple_name(&self) -> &str {
        &self.name.simple_name
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.variable_type.as_ref().map(|v| v.var_type.clone())
    }
}

java_node! {
    /// `@Type` or `@Type(arguments)`.
    pub struct Annotation {
        pub annotation_type: TypeTree,
        pub arguments: Option<Container<Expression>>,
    }
}

impl Annotation {
    pub fn simple_name(&self) -> String {
        let name = self.annotation_type.qualified_name().unwrap_or_default();
        match name.rsplit_once('.') {
            Some((_, simple)) => simple.to_string(),
            None => name,
        }
    }

    pub fn type_of(&self) -> Option<JavaType> {
        self.annotation_type.type_of()
    }
}
