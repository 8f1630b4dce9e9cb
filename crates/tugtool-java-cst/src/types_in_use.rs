// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The types and methods a compilation unit refers to.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use crate::nodes::{CompilationUnit, Tree};
use crate::types::{JavaType, MethodType};
use crate::visitor::{accept_tree, JavaVisitor, VisitContext, VisitResult};

/// Types and methods referenced by a compilation unit, outside its package
/// and import statements.
///
/// Declarations do not count as uses: a class declaring `foo()` does not
/// use `foo()` until something calls it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypesInUse {
    types: BTreeMap<String, JavaType>,
    methods: Vec<Arc<MethodType>>,
    method_keys: BTreeSet<String>,
}

impl TypesInUse {
    pub fn collect(unit: &Arc<CompilationUnit>) -> Self {
        let mut collector = TypesInUse::default();
        let mut ctx = VisitContext::new(&());
        let root = Tree::CompilationUnit(Arc::clone(unit));
        if let Err(err) = accept_tree(&mut collector, &root, &mut ctx) {
            warn!(path = %unit.source_path, "collecting types in use failed: {}", err);
        }
        collector
    }

    /// Whether a type with erased name `fqn` is used.
    pub fn uses_type(&self, fqn: &str) -> bool {
        self.types.contains_key(fqn)
    }

    /// Erased names of all used class types, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn types(&self) -> impl Iterator<Item = &JavaType> {
        self.types.values()
    }

    /// Invoked methods and constructors, each once, in first-use order.
    pub fn methods(&self) -> &[Arc<MethodType>] {
        &self.methods
    }

    fn add_type(&mut self, ty: &JavaType) {
        match ty {
            JavaType::Class(c) => {
                self.types
                    .entry(c.fqn.clone())
                    .or_insert_with(|| ty.clone());
            }
            JavaType::Parameterized(p) => {
                self.types
                    .entry(p.base.fqn.clone())
                    .or_insert_with(|| JavaType::Class(Arc::clone(&p.base)));
                for arg in &p.arguments {
                    self.add_type(arg);
                }
            }
            JavaType::Array(element) => self.add_type(element),
            JavaType::GenericTypeVariable(g) => {
                for bound in &g.bounds {
                    self.add_type(bound);
                }
            }
            JavaType::Variable(v) => self.add_type(&v.var_type),
            JavaType::Method(_) | JavaType::Primitive(_) | JavaType::Unknown => {}
        }
    }

    fn add_method(&mut self, method: &Arc<MethodType>) {
        if self.method_keys.insert(method.key()) {
            self.methods.push(Arc::clone(method));
            self.add_type(&JavaType::Class(Arc::clone(&method.declaring_type)));
        }
    }
}

impl JavaVisitor<()> for TypesInUse {
    fn pre_visit(&mut self, tree: &Tree, _ctx: &mut VisitContext<'_, ()>) -> VisitResult {
        match tree {
            Tree::Import(_) | Tree::Package(_) => return VisitResult::SkipChildren,
            Tree::ClassDeclaration(_) | Tree::MethodDeclaration(_) | Tree::CompilationUnit(_) => {}
            other => {
                if let Some(ty) = other.type_of() {
                    self.add_type(&ty);
                }
                if let Some(method) = other.method_type() {
                    self.add_method(method);
                }
            }
        }
        VisitResult::Continue
    }
}
