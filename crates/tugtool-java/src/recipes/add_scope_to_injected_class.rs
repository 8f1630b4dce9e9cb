// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Classes injected with `@Inject` get an explicit `@Dependent` scope.
//!
//! The scan records the type of every `@Inject` field in every file; the
//! transform then annotates the declarations of those types, wherever they
//! live.

use std::collections::BTreeSet;
use std::sync::Arc;

use tugtool_core::accumulator::{AccumulatorBuilder, Snapshot};
use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::walk_class_declaration;
use tugtool_java_cst::{
    ClassDeclaration, ClassType, JavaVisitor, Tree, TypeKind, VisitContext, VisitOutput,
    VisitorTable,
};

use crate::imports::ImportContext;
use crate::matcher::AnnotationMatcher;
use crate::recipe::{RecipeInfo, RecipeVisitor, ScanningRecipe};
use crate::template::{Coordinates, JavaTemplate};

const INJECT: &str = "javax.inject.Inject";
const DEPENDENT: &str = "javax.enterprise.context.Dependent";

#[derive(Debug, Clone)]
pub struct AddScopeToInjectedClass {
    inject: AnnotationMatcher,
    dependent: AnnotationMatcher,
    annotate: JavaTemplate,
}

impl AddScopeToInjectedClass {
    pub fn new() -> Result<Self, TugError> {
        let stub = ClassType::builder(DEPENDENT).kind(TypeKind::Annotation).build();
        Ok(AddScopeToInjectedClass {
            inject: AnnotationMatcher::new(&format!("@{}", INJECT))?,
            dependent: AnnotationMatcher::new(&format!("@{}", DEPENDENT))?,
            annotate: JavaTemplate::builder("@Dependent")
                .imports([DEPENDENT])
                .depends_on(stub)
                .build()?,
        })
    }

    /// Fully qualified names of the types `class` injects into fields.
    fn injected_types(&self, class: &ClassDeclaration) -> Vec<String> {
        let mut found = Vec::new();

        // Fields the type model knows about, including their meta-annotations.
        if let Some(class_type) = &class.class_type {
            for member in &class_type.members {
                if member
                    .annotations
                    .iter()
                    .any(|a| self.inject.matches_annotation_or_meta_annotation(a))
                {
                    if let Some(injected) = member.var_type.as_class() {
                        found.push(injected.fqn.clone());
                    }
                }
            }
        }

        // Fields as written, for declarations whose type carries no members.
        for field in class.fields() {
            let injected = field.leading_annotations.iter().any(|a| {
                self.inject.matches(a)
                    || a.type_of()
                        .is_some_and(|ty| self.inject.matches_annotation_or_meta_annotation(&ty))
            });
            if !injected {
                continue;
            }
            if let Some(ty) = field.type_of() {
                if let Some(injected) = ty.as_class() {
                    found.push(injected.fqn.clone());
                }
            }
        }
        found
    }
}

impl RecipeInfo for AddScopeToInjectedClass {
    fn name(&self) -> &str {
        "AddScopeToInjectedClass"
    }

    fn display_name(&self) -> &str {
        "Add scope annotation to injected classes"
    }

    fn description(&self) -> &str {
        "Finds member variables annotated with `@Inject` and applies the `@Dependent` scope \
         annotation to the variable's type."
    }

    fn tags(&self) -> &[&'static str] {
        &["javax", "cdi"]
    }
}

impl ScanningRecipe for AddScopeToInjectedClass {
    type Acc = BTreeSet<String>;

    fn initial_value(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn scanner<'a>(&'a self, acc: &'a AccumulatorBuilder<BTreeSet<String>>) -> RecipeVisitor<'a> {
        Box::new(VisitorTable::new().on_class_declaration(
            move |class: &Arc<ClassDeclaration>, _ctx: &mut VisitContext<'_, ExecutionContext>| {
                let injected = self.injected_types(class);
                if !injected.is_empty() {
                    acc.update(|types| types.extend(injected));
                }
                Ok(Arc::clone(class))
            },
        ))
    }

    fn visitor(&self, acc: Snapshot<BTreeSet<String>>) -> RecipeVisitor<'_> {
        Box::new(AnnotateInjected {
            recipe: self,
            injected: acc,
        })
    }
}

struct AnnotateInjected<'r> {
    recipe: &'r AddScopeToInjectedClass,
    injected: Snapshot<BTreeSet<String>>,
}

impl JavaVisitor<ExecutionContext> for AnnotateInjected<'_> {
    fn visit_class_declaration(
        &mut self,
        node: &Arc<ClassDeclaration>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Arc<ClassDeclaration>> {
        let class = walk_class_declaration(self, node, ctx)?;
        let Some(fqn) = class.fqn() else {
            return Ok(class);
        };
        if !self.injected.contains(fqn) {
            return Ok(class);
        }
        if class
            .leading_annotations
            .iter()
            .any(|a| self.recipe.dependent.matches(a))
        {
            return Ok(class);
        }

        let applied = self.recipe.annotate.apply(
            &Coordinates::AddAnnotation(Tree::ClassDeclaration(Arc::clone(&class))),
            &[],
        )?;
        ctx.maybe_add_import(DEPENDENT);
        Ok(applied.node::<Arc<ClassDeclaration>>()?)
    }
}
