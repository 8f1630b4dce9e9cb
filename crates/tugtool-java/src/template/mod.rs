// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Code templates.
//!
//! A [`JavaTemplate`] is a snippet of Java with typed placeholders, compiled
//! once and applied many times:
//!
//! ```ignore
//! let template = JavaTemplate::builder("#{any(java.util.Optional)}.isEmpty()").build()?;
//! let applied = template.apply(&Coordinates::Replace(node.to_tree()), &[receiver])?;
//! let replacement = applied.expression()?;
//! ```
//!
//! Names in the snippet resolve against the builder's [`TypeCatalog`]
//! (the JDK core slice by default), its declared imports and static imports,
//! and `java.lang`. The result is attributed: method invocations, field
//! accesses and constructor calls carry their resolved types, so later
//! matchers see the new code as they would parsed code. A type or member
//! that does not resolve fails [`JavaTemplateBuilder::build`]; one looked
//! up on an untyped `#{any()}` argument is checked when the template is
//! applied instead.
//!
//! Applying a template never edits imports. The imports a template declares
//! come back on [`Applied`] for the caller to add through the import helpers.

mod apply;
mod lexer;
mod parser;
mod placeholder;
mod resolve;

use std::sync::Arc;

use tracing::debug;
use tugtool_core::error::{TemplateApplyError, TemplateCompilationError, TransformError};
use tugtool_java_cst::{ClassType, Expression, TypeCatalog};

pub use apply::{parenthesize_for, Applied, Coordinates};

use parser::{compile, Compiled};
use resolve::Resolver;

/// A compiled snippet.
///
/// Cheap to clone and safe to share between threads; recipes build their
/// templates once and apply them from any file's traversal.
#[derive(Debug, Clone)]
pub struct JavaTemplate {
    source: String,
    resolver: Arc<Resolver>,
    compiled: Arc<Compiled>,
}

/// Builder for [`JavaTemplate`].
#[derive(Debug, Clone)]
pub struct JavaTemplateBuilder {
    source: String,
    imports: Vec<String>,
    static_imports: Vec<String>,
    catalog: Option<TypeCatalog>,
    depends_on: Vec<Arc<ClassType>>,
}

impl JavaTemplateBuilder {
    /// Types the snippet refers to by simple name. Wildcards (`pkg.*`) are
    /// allowed.
    pub fn imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Static members the snippet uses unqualified, as `Owner.member` or
    /// `Owner.*`.
    pub fn static_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Resolve names against `catalog` instead of the JDK core slice.
    pub fn catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Add a class the snippet needs that the catalog lacks, such as a
    /// library type.
    pub fn depends_on(mut self, class: Arc<ClassType>) -> Self {
        self.depends_on.push(class);
        self
    }

    pub fn build(self) -> Result<JavaTemplate, TemplateCompilationError> {
        let mut catalog = self.catalog.unwrap_or_else(TypeCatalog::jdk_core);
        for class in self.depends_on {
            catalog.insert(class);
        }

        for import in &self.imports {
            if !import.ends_with(".*") && !catalog.contains(import) {
                return Err(TemplateCompilationError::UnresolvedType {
                    name: import.clone(),
                });
            }
        }
        for import in &self.static_imports {
            let owner = import.rsplit_once('.').map_or(import.as_str(), |(owner, _)| owner);
            if !catalog.contains(owner) {
                return Err(TemplateCompilationError::UnresolvedType {
                    name: owner.to_string(),
                });
            }
        }

        let resolver = Resolver::new(catalog, self.imports, self.static_imports);
        let compiled = compile(&self.source, &resolver)?;
        debug!(
            kind = compiled.prototype.kind_name(),
            parameters = compiled.slots.len(),
            "compiled template"
        );
        Ok(JavaTemplate {
            source: self.source,
            resolver: Arc::new(resolver),
            compiled: Arc::new(compiled),
        })
    }
}

impl JavaTemplate {
    pub fn builder(source: impl Into<String>) -> JavaTemplateBuilder {
        JavaTemplateBuilder {
            source: source.into(),
            imports: Vec::new(),
            static_imports: Vec::new(),
            catalog: None,
            depends_on: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// `"expression"`, `"argument list"`, `"statement"` or `"annotation"`.
    pub fn snippet_kind(&self) -> &'static str {
        self.compiled.prototype.kind_name()
    }

    /// Number of arguments [`apply`](Self::apply) expects: one per
    /// placeholder declaration. Back-references take none.
    pub fn parameter_count(&self) -> usize {
        self.compiled.slots.len()
    }

    /// Name of each parameter, for named placeholders.
    pub fn parameter_names(&self) -> Vec<Option<&str>> {
        self.compiled.slots.iter().map(|slot| slot.name.as_deref()).collect()
    }

    /// Declared type of each parameter, by erased name.
    pub fn parameter_types(&self) -> Vec<Option<String>> {
        self.compiled.slots.iter().map(|slot| slot.type_name()).collect()
    }

    pub fn imports(&self) -> &[String] {
        self.resolver.imports()
    }

    pub fn static_imports(&self) -> &[String] {
        self.resolver.static_imports()
    }

    /// Instantiate the snippet with `arguments` at `coordinates`.
    ///
    /// Arguments are checked against the placeholders: their number first,
    /// then each typed placeholder's type. The first use of an argument
    /// keeps its node; later uses (through back-references) get copies with
    /// fresh ids.
    pub fn apply(
        &self,
        coordinates: &Coordinates,
        arguments: &[Expression],
    ) -> Result<Applied, TransformError> {
        self.check_arguments(arguments)?;
        let tree = apply::splice(&self.compiled.prototype, coordinates, &self.resolver, arguments)?;
        Ok(Applied::new(
            tree,
            self.imports(),
            self.static_imports(),
            coordinates.name(),
        ))
    }

    fn check_arguments(&self, arguments: &[Expression]) -> Result<(), TemplateApplyError> {
        let slots = &self.compiled.slots;
        if arguments.len() != slots.len() {
            return Err(TemplateApplyError::ArityMismatch {
                expected: slots.len(),
                actual: arguments.len(),
            });
        }
        for (index, (slot, argument)) in slots.iter().zip(arguments).enumerate() {
            let Some(expected) = slot.type_name() else {
                continue;
            };
            let actual = argument.type_of();
            if !self.resolver.accepts(&expected, actual.as_ref()) {
                return Err(TemplateApplyError::ArgumentType {
                    index,
                    expected,
                    actual: actual.map_or_else(|| "unknown".to_string(), |t| t.to_string()),
                });
            }
        }
        Ok(())
    }
}
