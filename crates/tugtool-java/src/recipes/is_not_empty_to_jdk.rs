// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `StringUtils.isEmpty(s)` and `isNotEmpty(s)` become plain JDK checks.

use std::sync::Arc;

use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::walk_method_invocation;
use tugtool_java_cst::{Expression, JavaVisitor, MethodInvocation, VisitContext, VisitOutput};

use crate::imports::ImportContext;
use crate::matcher::MethodMatcher;
use crate::recipe::{Recipe, RecipeInfo, RecipeVisitor};
use crate::search::{or, Precondition, UsesType};
use crate::template::{parenthesize_for, Coordinates, JavaTemplate};

const STRING_UTILS: [&str; 3] = [
    "org.apache.commons.lang3.StringUtils",
    "org.apache.maven.shared.utils.StringUtils",
    "org.codehaus.plexus.util.StringUtils",
];

#[derive(Debug, Clone)]
pub struct IsNotEmptyToJdk {
    is_empty: Vec<MethodMatcher>,
    is_not_empty: Vec<MethodMatcher>,
    null_or_empty: JavaTemplate,
    not_null_and_not_empty: JavaTemplate,
}

impl IsNotEmptyToJdk {
    pub fn new() -> Result<Self, TugError> {
        let matchers = |method: &str| -> Result<Vec<MethodMatcher>, TugError> {
            STRING_UTILS
                .iter()
                .map(|owner| Ok(MethodMatcher::new(&format!("{} {}(..)", owner, method), false)?))
                .collect()
        };
        Ok(IsNotEmptyToJdk {
            is_empty: matchers("isEmpty")?,
            is_not_empty: matchers("isNotEmpty")?,
            null_or_empty: JavaTemplate::builder(
                "#{s:any(java.lang.String)} == null || #{s}.isEmpty()",
            )
            .build()?,
            not_null_and_not_empty: JavaTemplate::builder(
                "#{s:any(java.lang.String)} != null && !#{s}.isEmpty()",
            )
            .build()?,
        })
    }

    fn replacement(&self, call: &MethodInvocation) -> Option<&JavaTemplate> {
        if self.is_empty.iter().any(|m| m.matches_invocation(call)) {
            Some(&self.null_or_empty)
        } else if self.is_not_empty.iter().any(|m| m.matches_invocation(call)) {
            Some(&self.not_null_and_not_empty)
        } else {
            None
        }
    }
}

impl RecipeInfo for IsNotEmptyToJdk {
    fn name(&self) -> &str {
        "IsNotEmptyToJdk"
    }

    fn display_name(&self) -> &str {
        "Replace any `StringUtils#isEmpty(String)` and `#isNotEmpty(String)`"
    }

    fn description(&self) -> &str {
        "Replace any `StringUtils#isEmpty(String)` and `#isNotEmpty(String)` with \
         `s == null || s.isEmpty()` and `s != null && !s.isEmpty()`."
    }

    fn tags(&self) -> &[&'static str] {
        &["apache", "commons"]
    }
}

impl Recipe for IsNotEmptyToJdk {
    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        let mut checks: Vec<Box<dyn Precondition>> = Vec::new();
        for owner in STRING_UTILS {
            if let Ok(check) = UsesType::new(owner) {
                checks.push(Box::new(check));
            }
        }
        Some(Box::new(or(checks)))
    }

    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(StringUtilsCalls { recipe: self })
    }
}

struct StringUtilsCalls<'r> {
    recipe: &'r IsNotEmptyToJdk,
}

impl JavaVisitor<ExecutionContext> for StringUtilsCalls<'_> {
    fn visit_method_invocation(
        &mut self,
        node: &Arc<MethodInvocation>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Expression> {
        let call = walk_method_invocation(self, node, ctx)?;
        // Only plain, typed variables: anything else would be evaluated twice.
        let argument = match call.arguments.get(0) {
            Some(argument @ Expression::Identifier(i))
                if call.arguments.len() == 1 && i.java_type.is_some() =>
            {
                argument.clone()
            }
            _ => return Ok(call.into()),
        };
        let Some(template) = self.recipe.replacement(&call) else {
            return Ok(call.into());
        };

        for owner in STRING_UTILS {
            ctx.maybe_remove_import(owner);
        }
        let target = Expression::from(Arc::clone(&call)).to_tree();
        let applied = template.apply(&Coordinates::Replace(target), &[argument])?;
        let replacement = applied.expression()?;
        Ok(parenthesize_for(replacement, ctx.cursor().parent(), node.id))
    }
}
