// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Search: calls whose signature mentions an internal `javax` type.
//!
//! Matches are marked with a [`SearchResult`] and reported as rows of the
//! `method_calls` data table.

use std::sync::Arc;

use serde::Serialize;
use tugtool_core::error::{TransformError, TugError};
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::{walk_method_invocation, walk_new_class};
use tugtool_java_cst::{
    Codegen, CompilationUnit, Expression, JavaVisitor, MethodInvocation, MethodType, NewClass,
    SearchResult, VisitContext, VisitOutput,
};

use crate::matcher::{MethodMatcher, TypePattern};
use crate::recipe::{Recipe, RecipeInfo, RecipeVisitor};
use crate::search::{Precondition, UsesType};

const JAVAX: &str = "javax..*";

/// Name of the data table the recipe fills.
pub const METHOD_CALLS: &str = "method_calls";

/// One row of [`METHOD_CALLS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodCallRow {
    pub source_file: String,
    /// The call as written, without leading whitespace.
    pub method_call: String,
    pub class_name: String,
    pub method_name: String,
    /// Comma separated parameter types.
    pub argument_types: String,
}

#[derive(Debug, Clone)]
pub struct FindInternalJavaxApis {
    method_pattern: Option<MethodMatcher>,
    javax: TypePattern,
}

impl FindInternalJavaxApis {
    /// `method_pattern` optionally narrows the search to matching methods.
    pub fn new(method_pattern: Option<&str>) -> Result<Self, TugError> {
        let method_pattern = method_pattern
            .map(|pattern| MethodMatcher::new(pattern, false))
            .transpose()?;
        Ok(FindInternalJavaxApis {
            method_pattern,
            javax: TypePattern::parse("type", JAVAX)?,
        })
    }

    fn mentions_javax(&self, method: &MethodType) -> bool {
        self.javax.matches_type(&method.return_type)
            || method.parameter_types.iter().any(|p| self.javax.matches_type(p))
    }

    fn report(
        &self,
        call: &Expression,
        method: &MethodType,
        ctx: &VisitContext<'_, ExecutionContext>,
    ) -> Result<(), TransformError> {
        let source_file = ctx
            .cursor()
            .first_enclosing::<CompilationUnit>()
            .map(|unit| unit.source_path.clone())
            .unwrap_or_default();
        let row = MethodCallRow {
            source_file,
            method_call: call.print().trim().to_string(),
            class_name: method.declaring_type.fqn.clone(),
            method_name: method.name.clone(),
            argument_types: method
                .parameter_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        };
        ctx.param()
            .insert_row(METHOD_CALLS, &row)
            .map_err(|e| TransformError::Recipe {
                message: e.to_string(),
            })
    }
}

impl RecipeInfo for FindInternalJavaxApis {
    fn name(&self) -> &str {
        "FindInternalJavaxApis"
    }

    fn display_name(&self) -> &str {
        "Find uses of internal javax APIs"
    }

    fn description(&self) -> &str {
        "The libraries that define these APIs will have to be migrated before any of the \
         repositories that use them."
    }

    fn tags(&self) -> &[&'static str] {
        &["javax", "search"]
    }
}

impl Recipe for FindInternalJavaxApis {
    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        UsesType::new(JAVAX)
            .ok()
            .map(|check| Box::new(check) as Box<dyn Precondition>)
    }

    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(JavaxCalls { recipe: self })
    }
}

struct JavaxCalls<'r> {
    recipe: &'r FindInternalJavaxApis,
}

impl JavaVisitor<ExecutionContext> for JavaxCalls<'_> {
    fn visit_method_invocation(
        &mut self,
        node: &Arc<MethodInvocation>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Expression> {
        let call = walk_method_invocation(self, node, ctx)?;
        let Some(method) = call.method_type.clone() else {
            return Ok(call.into());
        };
        if let Some(pattern) = &self.recipe.method_pattern {
            if !pattern.matches_invocation(&call) {
                return Ok(call.into());
            }
        }
        if !self.recipe.mentions_javax(&method) {
            return Ok(call.into());
        }
        let found = Expression::from(call.with_markers(call.markers.add(SearchResult::new(JAVAX))));
        self.recipe.report(&found, &method, ctx)?;
        Ok(found)
    }

    fn visit_new_class(
        &mut self,
        node: &Arc<NewClass>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Expression> {
        let new_class = walk_new_class(self, node, ctx)?;
        let Some(constructor) = new_class.constructor_type.clone() else {
            return Ok(new_class.into());
        };
        if let Some(pattern) = &self.recipe.method_pattern {
            if !pattern.matches_new_class(&new_class) {
                return Ok(new_class.into());
            }
        }
        if !self.recipe.mentions_javax(&constructor) {
            return Ok(new_class.into());
        }
        let found = Expression::from(
            new_class.with_markers(new_class.markers.add(SearchResult::new(JAVAX))),
        );
        self.recipe.report(&found, &constructor, ctx)?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_method_pattern_is_rejected() {
        assert!(FindInternalJavaxApis::new(None).is_ok());
        assert!(FindInternalJavaxApis::new(Some("java.util.List add(..)")).is_ok());
        assert!(FindInternalJavaxApis::new(Some("")).is_err());
    }
}
