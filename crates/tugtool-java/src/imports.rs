// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Import maintenance.
//!
//! [`AddImport`] and [`RemoveImport`] are whole-unit visitors meant to run
//! as deferred visits: a hook that introduces or drops a type reference
//! schedules them through [`ImportContext`], and they run once the pass is
//! over, against the finished tree. Both are keyed, so scheduling the same
//! import from many matches runs it once.

use std::sync::Arc;

use tracing::debug;
use tugtool_core::error::TransformError;
use tugtool_java_cst::{
    CompilationUnit, Import, JavaVisitor, Space, Tree, VisitContext, VisitOutput, VisitResult,
};

/// Adds `import [static] fqn;` to a compilation unit.
///
/// Nothing is added when the name is already imported (explicitly or by a
/// wildcard), lives in `java.lang`, or lives in the unit's own package.
/// The import goes in name order among imports of the same kind; static
/// imports follow the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddImport {
    fqn: String,
    statik: bool,
}

impl AddImport {
    pub fn new(fqn: impl Into<String>) -> Self {
        AddImport {
            fqn: fqn.into(),
            statik: false,
        }
    }

    /// `import static owner.member;`
    pub fn static_member(owner: &str, member: &str) -> Self {
        AddImport {
            fqn: format!("{}.{}", owner, member),
            statik: true,
        }
    }

    fn package(&self) -> Option<&str> {
        let owner = if self.statik {
            self.fqn.rsplit_once('.')?.0
        } else {
            &self.fqn
        };
        owner.rsplit_once('.').map(|(package, _)| package)
    }

    fn already_imported(&self, unit: &CompilationUnit) -> bool {
        if !self.statik {
            return unit.imports_type(&self.fqn);
        }
        let owner_wildcard = self
            .fqn
            .rsplit_once('.')
            .map(|(owner, _)| format!("{}.*", owner));
        unit.imports.iter().filter(|i| i.is_static()).any(|i| {
            let name = i.type_name();
            name.as_deref() == Some(self.fqn.as_str()) || name == owner_wildcard
        })
    }

    fn needed(&self, unit: &CompilationUnit) -> bool {
        if self.already_imported(unit) {
            return false;
        }
        if self.statik {
            return true;
        }
        match self.package() {
            None => false,
            Some("java.lang") => false,
            Some(package) => unit.package_name().as_deref() != Some(package),
        }
    }
}

impl<P> JavaVisitor<P> for AddImport {
    fn deferred_key(&self) -> Option<String> {
        let kind = if self.statik { "add-static-import" } else { "add-import" };
        Some(format!("{}:{}", kind, self.fqn))
    }

    fn pre_visit(&mut self, tree: &Tree, _ctx: &mut VisitContext<'_, P>) -> VisitResult {
        // Only the unit itself is edited.
        if matches!(tree, Tree::CompilationUnit(_)) {
            VisitResult::Continue
        } else {
            VisitResult::SkipChildren
        }
    }

    fn visit_compilation_unit(
        &mut self,
        unit: &Arc<CompilationUnit>,
        _ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<CompilationUnit>> {
        if !self.needed(unit) {
            return Ok(Arc::clone(unit));
        }
        let import = Import::build(&self.fqn, self.statik).ok_or_else(|| TransformError::Recipe {
            message: format!("cannot import `{}`", self.fqn),
        })?;
        debug!(path = %unit.source_path, import = %self.fqn, "adding import");

        let index = unit
            .imports
            .iter()
            .position(|existing| {
                (existing.is_static(), existing.type_name().unwrap_or_default())
                    > (self.statik, self.fqn.clone())
            })
            .unwrap_or(unit.imports.len());

        let mut imports = unit.imports.clone();
        let mut classes = unit.classes.clone();
        if imports.is_empty() {
            let prefix = if unit.package.is_some() {
                Space::format("\n\n")
            } else {
                Space::EMPTY
            };
            imports.push(import.with_prefix(prefix));
            if let Some(first) = classes.first_mut() {
                if !first.prefix.whitespace.starts_with("\n\n") {
                    *first = first.with_prefix(first.prefix.with_whitespace("\n\n"));
                }
            }
        } else if index == 0 {
            let first_prefix = imports[0].prefix.clone();
            imports[0] = imports[0].with_prefix(Space::format("\n"));
            imports.insert(0, import.with_prefix(first_prefix));
        } else {
            imports.insert(index, import.with_prefix(Space::format("\n")));
        }
        Ok(unit.with_imports(imports).with_classes(classes))
    }
}

/// Removes the non-static import of `fqn` once no code refers to the type.
///
/// A wildcard import of the type's package is removed when no type of that
/// package is referenced any more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveImport {
    fqn: String,
}

impl RemoveImport {
    pub fn new(fqn: impl Into<String>) -> Self {
        RemoveImport { fqn: fqn.into() }
    }

    fn removable(&self, import: &Import, unit: &Arc<CompilationUnit>) -> bool {
        if import.is_static() {
            return false;
        }
        let Some(name) = import.type_name() else {
            return false;
        };
        let in_use = unit.types_in_use();
        if import.is_wildcard() {
            let package = name.trim_end_matches(".*");
            let covers = self
                .fqn
                .rsplit_once('.')
                .is_some_and(|(p, _)| p == package);
            covers
                && !in_use
                    .type_names()
                    .any(|used| used.rsplit_once('.').is_some_and(|(p, _)| p == package))
        } else {
            name == self.fqn && !in_use.uses_type(&self.fqn)
        }
    }
}

impl<P> JavaVisitor<P> for RemoveImport {
    fn deferred_key(&self) -> Option<String> {
        Some(format!("remove-import:{}", self.fqn))
    }

    fn pre_visit(&mut self, tree: &Tree, _ctx: &mut VisitContext<'_, P>) -> VisitResult {
        if matches!(tree, Tree::CompilationUnit(_)) {
            VisitResult::Continue
        } else {
            VisitResult::SkipChildren
        }
    }

    fn visit_compilation_unit(
        &mut self,
        unit: &Arc<CompilationUnit>,
        _ctx: &mut VisitContext<'_, P>,
    ) -> VisitOutput<Arc<CompilationUnit>> {
        let Some(index) = unit.imports.iter().position(|i| self.removable(i, unit)) else {
            return Ok(Arc::clone(unit));
        };
        debug!(path = %unit.source_path, import = %self.fqn, "removing unused import");

        let mut imports = unit.imports.clone();
        let removed = imports.remove(index);
        let mut classes = unit.classes.clone();
        if index == 0 {
            match imports.first_mut() {
                Some(next) => *next = next.with_prefix(removed.prefix.clone()),
                None if unit.package.is_none() => {
                    if let Some(first) = classes.first_mut() {
                        *first = first.with_prefix(removed.prefix.clone());
                    }
                }
                None => {}
            }
        }
        Ok(unit.with_imports(imports).with_classes(classes))
    }
}

/// Scheduling import edits from inside a visitor hook.
pub trait ImportContext {
    /// Add an import of `fqn` after this pass, if the unit needs one.
    fn maybe_add_import(&mut self, fqn: &str);

    /// Add `import static owner.member;` after this pass, if missing.
    fn maybe_add_static_import(&mut self, owner: &str, member: &str);

    /// Remove the import of `fqn` after this pass, if nothing uses it.
    fn maybe_remove_import(&mut self, fqn: &str);
}

impl<P> ImportContext for VisitContext<'_, P> {
    fn maybe_add_import(&mut self, fqn: &str) {
        self.do_after_visit(AddImport::new(fqn));
    }

    fn maybe_add_static_import(&mut self, owner: &str, member: &str) {
        self.do_after_visit(AddImport::static_member(owner, member));
    }

    fn maybe_remove_import(&mut self, fqn: &str) {
        self.do_after_visit(RemoveImport::new(fqn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugtool_java_cst::{Codegen, Expression, Markers, NodeId, Package, Traversal};

    fn unit(package: Option<&str>, imports: &[&str]) -> Arc<CompilationUnit> {
        let package = package.map(|name| {
            Arc::new(Package {
                id: NodeId::fresh(),
                prefix: Space::EMPTY,
                markers: Markers::EMPTY,
                expression: Expression::qualified(name, None).with_prefix(Space::single()),
            })
        });
        let has_package = package.is_some();
        let imports = imports
            .iter()
            .enumerate()
            .filter_map(|(i, fqn)| {
                let prefix = match (i, has_package) {
                    (0, false) => Space::EMPTY,
                    (0, true) => Space::format("\n\n"),
                    _ => Space::format("\n"),
                };
                Import::build(fqn, false).map(|import| import.with_prefix(prefix))
            })
            .collect();
        CompilationUnit::build("A.java")
            .with_package(package)
            .with_imports(imports)
            .with_eof(Space::format("\n"))
    }

    fn run(visitor: &mut dyn JavaVisitor<()>, unit: &Arc<CompilationUnit>) -> Arc<CompilationUnit> {
        Traversal::default().run(visitor, unit, &()).unwrap().tree
    }

    #[test]
    fn adds_in_name_order() {
        let before = unit(Some("com.example"), &["java.util.List", "java.util.Set"]);
        let after = run(&mut AddImport::new("java.util.Map"), &before);
        assert_eq!(
            after.print(),
            "package com.example;\n\nimport java.util.List;\nimport java.util.Map;\nimport java.util.Set;\n"
        );

        let after = run(&mut AddImport::new("java.io.File"), &before);
        assert_eq!(
            after.print(),
            "package com.example;\n\nimport java.io.File;\nimport java.util.List;\nimport java.util.Set;\n"
        );
    }

    #[test]
    fn first_import_after_package() {
        let before = unit(Some("com.example"), &[]);
        let after = run(&mut AddImport::new("java.util.List"), &before);
        assert_eq!(after.print(), "package com.example;\n\nimport java.util.List;\n");
    }

    #[test]
    fn skips_imports_that_are_not_needed() {
        let before = unit(Some("com.example"), &["java.util.*"]);
        for fqn in ["java.util.List", "java.lang.String", "com.example.Sibling", "Bare"] {
            let after = run(&mut AddImport::new(fqn), &before);
            assert!(Arc::ptr_eq(&after, &before), "{}", fqn);
        }
    }

    #[test]
    fn static_imports_follow_the_others() {
        let before = unit(None, &["java.util.List"]);
        let after = run(
            &mut AddImport::static_member("java.nio.charset.StandardCharsets", "UTF_8"),
            &before,
        );
        assert_eq!(
            after.print(),
            "import java.util.List;\nimport static java.nio.charset.StandardCharsets.UTF_8;\n"
        );
    }

    #[test]
    fn removes_unused_imports_only() {
        let before = unit(Some("com.example"), &["java.util.List", "java.util.Set"]);
        let after = run(&mut RemoveImport::new("java.util.List"), &before);
        assert_eq!(after.print(), "package com.example;\n\nimport java.util.Set;\n");

        let missing = run(&mut RemoveImport::new("java.util.Map"), &before);
        assert!(Arc::ptr_eq(&missing, &before));
    }

    #[test]
    fn scheduling_is_deduplicated() {
        struct Twice;
        impl JavaVisitor<()> for Twice {
            fn visit_compilation_unit(
                &mut self,
                unit: &Arc<CompilationUnit>,
                ctx: &mut VisitContext<'_, ()>,
            ) -> VisitOutput<Arc<CompilationUnit>> {
                ctx.maybe_add_import("java.util.Map");
                ctx.maybe_add_import("java.util.Map");
                Ok(Arc::clone(unit))
            }
        }
        let before = unit(None, &[]);
        let outcome = Traversal::default().run(&mut Twice, &before, &()).unwrap();
        assert_eq!(outcome.deferred_runs, 1);
        assert_eq!(outcome.tree.print(), "import java.util.Map;\n");
    }
}
