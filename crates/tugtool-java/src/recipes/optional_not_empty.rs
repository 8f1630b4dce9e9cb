// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `!optional.isEmpty()` becomes `optional.isPresent()`.

use std::sync::Arc;

use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::walk_unary;
use tugtool_java_cst::{Expression, JavaVisitor, Unary, UnaryOperator, VisitContext, VisitOutput};

use crate::matcher::MethodMatcher;
use crate::recipe::{Recipe, RecipeInfo, RecipeVisitor};
use crate::search::{and, Precondition, UsesJavaVersion, UsesMethod};
use crate::template::{Coordinates, JavaTemplate};

const OPTIONAL_IS_EMPTY: &str = "java.util.Optional isEmpty()";

#[derive(Debug, Clone)]
pub struct OptionalNotEmptyToIsPresent {
    is_empty: MethodMatcher,
    is_present: JavaTemplate,
}

impl OptionalNotEmptyToIsPresent {
    pub fn new() -> Result<Self, TugError> {
        Ok(OptionalNotEmptyToIsPresent {
            is_empty: MethodMatcher::new(OPTIONAL_IS_EMPTY, false)?,
            is_present: JavaTemplate::builder("#{any(java.util.Optional)}.isPresent()").build()?,
        })
    }
}

impl RecipeInfo for OptionalNotEmptyToIsPresent {
    fn name(&self) -> &str {
        "OptionalNotEmptyToIsPresent"
    }

    fn display_name(&self) -> &str {
        "Replace `!optional.isEmpty()` with `optional.isPresent()`"
    }

    fn description(&self) -> &str {
        "Replace negated `Optional.isEmpty()` calls with `Optional.isPresent()` \
         in Java 11 and above."
    }

    fn tags(&self) -> &[&'static str] {
        &["java11"]
    }
}

impl Recipe for OptionalNotEmptyToIsPresent {
    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        let uses_is_empty = UsesMethod::from_matcher(self.is_empty.clone());
        Some(Box::new(and(vec![
            Box::new(UsesJavaVersion::at_least(11)),
            Box::new(uses_is_empty),
        ])))
    }

    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(NegatedIsEmpty { recipe: self })
    }
}

struct NegatedIsEmpty<'r> {
    recipe: &'r OptionalNotEmptyToIsPresent,
}

impl JavaVisitor<ExecutionContext> for NegatedIsEmpty<'_> {
    fn visit_unary(
        &mut self,
        node: &Arc<Unary>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Expression> {
        let unary = walk_unary(self, node, ctx)?;
        if unary.operator.element != UnaryOperator::Not {
            return Ok(unary.into());
        }
        let Expression::MethodInvocation(call) = unary.expression.unwrap_parentheses() else {
            return Ok(unary.into());
        };
        let Some(receiver) = call.select_expression().filter(|r| r.type_of().is_some()) else {
            return Ok(unary.into());
        };
        if !self.recipe.is_empty.matches_invocation(call) {
            return Ok(unary.into());
        }
        let receiver = receiver.clone();
        let target = Expression::from(unary).to_tree();
        let applied = self
            .recipe
            .is_present
            .apply(&Coordinates::Replace(target), &[receiver])?;
        Ok(applied.expression()?)
    }
}
