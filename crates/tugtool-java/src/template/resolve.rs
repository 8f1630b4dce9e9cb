// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Name resolution for template code.

use std::sync::Arc;

use tugtool_java_cst::{ClassType, JavaType, MethodType, Primitive, TypeCatalog, VariableType};

/// Resolves names in a snippet against the template's catalog, imports and
/// static imports.
#[derive(Debug, Clone)]
pub(crate) struct Resolver {
    catalog: TypeCatalog,
    imports: Vec<String>,
    static_imports: Vec<String>,
}

impl Resolver {
    pub fn new(catalog: TypeCatalog, imports: Vec<String>, static_imports: Vec<String>) -> Self {
        Resolver {
            catalog,
            imports,
            static_imports,
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn static_imports(&self) -> &[String] {
        &self.static_imports
    }

    /// Resolve a type name: a primitive keyword, a fully qualified name, a
    /// simple name brought in by an import, or a `java.lang` name. Type
    /// arguments and array brackets are honoured on the outside only.
    pub fn type_named(&self, name: &str) -> Option<JavaType> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return self.type_named(element).map(JavaType::array_of);
        }
        let raw = match name.find('<') {
            Some(open) => name[..open].trim(),
            None => name,
        };
        if let Some(primitive) = Primitive::from_keyword(raw) {
            return Some(JavaType::Primitive(primitive));
        }
        self.class_named(raw).map(JavaType::Class)
    }

    pub fn class_named(&self, name: &str) -> Option<Arc<ClassType>> {
        if let Some(class) = self.catalog.get(name) {
            return Some(Arc::clone(class));
        }
        if name.contains('.') {
            return None;
        }
        for import in &self.imports {
            match import.rsplit_once('.') {
                Some((_, simple)) if simple == name => {
                    if let Some(class) = self.catalog.get(import) {
                        return Some(Arc::clone(class));
                    }
                }
                Some((package, "*")) => {
                    if let Some(class) = self.catalog.get(&format!("{}.{}", package, name)) {
                        return Some(Arc::clone(class));
                    }
                }
                _ => {}
            }
        }
        self.catalog.get(&format!("java.lang.{}", name)).cloned()
    }

    /// The catalog's full description of the class behind `ty`.
    ///
    /// Types embedded in signatures are often shallow references; looking
    /// the name up again recovers members and supertypes.
    pub fn class_of(&self, ty: &JavaType) -> Option<Arc<ClassType>> {
        let class = ty.as_class()?;
        Some(
            self.catalog
                .get(&class.fqn)
                .cloned()
                .unwrap_or_else(|| Arc::clone(class)),
        )
    }

    /// A statically imported field named `name`.
    pub fn static_field(&self, name: &str) -> Option<Arc<VariableType>> {
        self.static_owners(name)
            .find_map(|owner| owner.resolve_field(name))
    }

    /// A statically imported method `name` accepting `arguments`.
    pub fn static_method(
        &self,
        name: &str,
        arguments: &[Option<JavaType>],
    ) -> Option<Arc<MethodType>> {
        self.static_owners(name)
            .find_map(|owner| owner.resolve_method(name, arguments))
    }

    fn static_owners<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Arc<ClassType>> + 'a {
        self.static_imports.iter().filter_map(move |import| {
            let (owner, member) = import.rsplit_once('.')?;
            (member == name || member == "*")
                .then(|| self.catalog.get(owner).cloned())
                .flatten()
        })
    }

    /// Whether a value of type `ty` fits a parameter typed `target`.
    ///
    /// A value of unknown type fits no typed parameter.
    pub fn accepts(&self, target: &str, ty: Option<&JavaType>) -> bool {
        match ty {
            None | Some(JavaType::Unknown) => false,
            Some(ty) => {
                let refreshed = match (ty, self.class_of(ty)) {
                    (JavaType::Class(_), Some(class)) => JavaType::Class(class),
                    _ => ty.clone(),
                };
                tugtool_java_cst::is_assignable_to(target, &refreshed)
            }
        }
    }
}
