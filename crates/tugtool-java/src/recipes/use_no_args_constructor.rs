// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Empty no-argument constructors become lombok's `@NoArgsConstructor`.

use std::sync::Arc;

use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::{walk_class_declaration, walk_method_declaration};
use tugtool_java_cst::{
    ClassDeclaration, ClassType, JavaType, JavaVisitor, MethodDeclaration, MethodSignature,
    ModifierKind, NodeId, Statement, Tree, TypeKind, VisitContext, VisitOutput,
};

use crate::imports::ImportContext;
use crate::recipe::{Recipe, RecipeInfo, RecipeVisitor};
use crate::template::{Coordinates, JavaTemplate};

const NO_ARGS_CONSTRUCTOR: &str = "lombok.NoArgsConstructor";
const ACCESS_LEVEL: &str = "lombok.AccessLevel";
const FOUND_EMPTY_CONSTRUCTOR: &str = "found-empty-constructor";

/// Visibility of the removed constructor, as lombok spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Protected,
    Package,
    Private,
}

impl AccessLevel {
    fn of(method: &MethodDeclaration) -> Self {
        if method.has_modifier(ModifierKind::Public) {
            AccessLevel::Public
        } else if method.has_modifier(ModifierKind::Protected) {
            AccessLevel::Protected
        } else if method.has_modifier(ModifierKind::Private) {
            AccessLevel::Private
        } else {
            AccessLevel::Package
        }
    }

    pub fn constant(self) -> &'static str {
        match self {
            AccessLevel::Public => "PUBLIC",
            AccessLevel::Protected => "PROTECTED",
            AccessLevel::Package => "PACKAGE",
            AccessLevel::Private => "PRIVATE",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EmptyConstructor {
    id: NodeId,
    access: AccessLevel,
}

#[derive(Debug, Clone)]
pub struct UseNoArgsConstructor {
    public: JavaTemplate,
    protected: JavaTemplate,
    package: JavaTemplate,
    private: JavaTemplate,
}

impl UseNoArgsConstructor {
    pub fn new() -> Result<Self, TugError> {
        let access_level = ClassType::builder(ACCESS_LEVEL)
            .kind(TypeKind::Enum)
            .field("PUBLIC", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .field("MODULE", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .field("PROTECTED", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .field("PACKAGE", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .field("PRIVATE", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .field("NONE", JavaType::Class(ClassType::shallow(ACCESS_LEVEL)))
            .build();
        let annotation = ClassType::builder(NO_ARGS_CONSTRUCTOR)
            .kind(TypeKind::Annotation)
            .method(MethodSignature::new(
                "access",
                JavaType::Class(Arc::clone(&access_level)),
            ))
            .build();

        let template = |access: AccessLevel| {
            let builder = match access {
                AccessLevel::Public => JavaTemplate::builder("@NoArgsConstructor"),
                other => JavaTemplate::builder(format!(
                    "@NoArgsConstructor(access = AccessLevel.{})",
                    other.constant()
                ))
                .imports([ACCESS_LEVEL]),
            };
            builder
                .imports([NO_ARGS_CONSTRUCTOR])
                .depends_on(Arc::clone(&annotation))
                .depends_on(Arc::clone(&access_level))
                .build()
        };

        Ok(UseNoArgsConstructor {
            public: template(AccessLevel::Public)?,
            protected: template(AccessLevel::Protected)?,
            package: template(AccessLevel::Package)?,
            private: template(AccessLevel::Private)?,
        })
    }

    fn template(&self, access: AccessLevel) -> &JavaTemplate {
        match access {
            AccessLevel::Public => &self.public,
            AccessLevel::Protected => &self.protected,
            AccessLevel::Package => &self.package,
            AccessLevel::Private => &self.private,
        }
    }
}

impl RecipeInfo for UseNoArgsConstructor {
    fn name(&self) -> &str {
        "UseNoArgsConstructor"
    }

    fn display_name(&self) -> &str {
        "Use `@NoArgsConstructor` where applicable"
    }

    fn description(&self) -> &str {
        "Prefer the lombok annotation `@NoArgsConstructor` over explicitly written out \
         constructors. Implicit constructors are left alone."
    }

    fn tags(&self) -> &[&'static str] {
        &["lombok"]
    }
}

impl Recipe for UseNoArgsConstructor {
    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(EmptyConstructors { recipe: self })
    }
}

struct EmptyConstructors<'r> {
    recipe: &'r UseNoArgsConstructor,
}

fn is_empty_no_args_constructor(method: &MethodDeclaration) -> bool {
    method.is_constructor()
        && method.parameters.len() == 0
        && method
            .body
            .as_ref()
            .is_some_and(|body| body.statements.is_empty())
}

impl JavaVisitor<ExecutionContext> for EmptyConstructors<'_> {
    fn visit_method_declaration(
        &mut self,
        node: &Arc<MethodDeclaration>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Arc<MethodDeclaration>> {
        if is_empty_no_args_constructor(node) {
            let found = EmptyConstructor {
                id: node.id,
                access: AccessLevel::of(node),
            };
            ctx.cursor_mut()
                .put_message_on_first_enclosing::<ClassDeclaration, _>(FOUND_EMPTY_CONSTRUCTOR, found);
            return Ok(Arc::clone(node));
        }
        walk_method_declaration(self, node, ctx)
    }

    fn visit_class_declaration(
        &mut self,
        node: &Arc<ClassDeclaration>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Arc<ClassDeclaration>> {
        let class = walk_class_declaration(self, node, ctx)?;
        // Only this class's own frame: a nested class must not claim the
        // constructor of the class around it.
        let Some(found) = ctx
            .cursor()
            .get_message::<EmptyConstructor>(FOUND_EMPTY_CONSTRUCTOR)
            .copied()
        else {
            return Ok(class);
        };

        let statements = class
            .body
            .statements
            .iter()
            .filter(|s| !matches!(&s.element, Statement::MethodDeclaration(m) if m.id == found.id))
            .cloned()
            .collect();
        let class = class.with_body(class.body.with_statements(statements));

        let applied = self.recipe.template(found.access).apply(
            &Coordinates::AddAnnotation(Tree::ClassDeclaration(Arc::clone(&class))),
            &[],
        )?;
        ctx.maybe_add_import(NO_ARGS_CONSTRUCTOR);
        if found.access != AccessLevel::Public {
            ctx.maybe_add_import(ACCESS_LEVEL);
        }
        Ok(applied.node::<Arc<ClassDeclaration>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_template_per_access_level() {
        let recipe = UseNoArgsConstructor::new().unwrap();
        assert_eq!(recipe.template(AccessLevel::Public).source(), "@NoArgsConstructor");
        assert_eq!(
            recipe.template(AccessLevel::Private).source(),
            "@NoArgsConstructor(access = AccessLevel.PRIVATE)"
        );
        assert_eq!(recipe.template(AccessLevel::Package).imports(), [ACCESS_LEVEL, NO_ARGS_CONSTRUCTOR]);
        assert_eq!(recipe.template(AccessLevel::Public).snippet_kind(), "annotation");
    }
}
