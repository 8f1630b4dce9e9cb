// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Method-signature matching.
//!
//! Pattern grammar: `<owner> <name>(<params>)`, where `<owner>` and each
//! parameter are type patterns, `<name>` may contain `*` or be
//! `<constructor>`, and a `..` parameter stands for zero or more arguments.
//! The owner and name may also be separated by `#`.
//!
//! ```text
//! java.util.List add(int, ..)
//! org.apache.commons.io.IOUtils toString(java.io.InputStream)
//! java.util.Optional isEmpty()
//! *..*Service find*(..)
//! ```
//!
//! Matching reads the node's resolved [`MethodType`]; nodes without one do
//! not match.

use std::sync::Arc;

use regex::Regex;
use tugtool_core::error::PatternError;
use tugtool_java_cst::{
    ancestry, Expression, JavaType, MethodDeclaration, MethodInvocation, MethodType, NewClass,
    Tree,
};

use super::type_pattern::TypePattern;

const KIND: &str = "method";

/// One entry of a parameter list pattern.
#[derive(Debug, Clone)]
enum ParamPattern {
    Type(TypePattern),
    /// `..`: zero or more arguments of any type.
    AnyRemaining,
}

/// A compiled method pattern.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    source: String,
    owner: TypePattern,
    name: Regex,
    params: Vec<ParamPattern>,
    match_overrides: bool,
}

impl MethodMatcher {
    /// Compile `pattern`. With `match_overrides`, a method also matches when
    /// it overrides a method of a supertype that the owner pattern matches.
    pub fn new(pattern: &str, match_overrides: bool) -> Result<Self, PatternError> {
        let text = pattern.trim();
        if text.is_empty() {
            return Err(PatternError::Empty { kind: KIND });
        }

        let open = text
            .find('(')
            .ok_or_else(|| PatternError::malformed(KIND, text, "missing `(`"))?;
        let inner = text[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| PatternError::malformed(KIND, text, "missing `)`"))?;
        let head = text[..open].trim();

        let (owner, name) = match head.rsplit_once('#') {
            Some((owner, name)) => (owner.trim(), name.trim()),
            None => head
                .rsplit_once(char::is_whitespace)
                .map(|(o, n)| (o.trim(), n.trim()))
                .ok_or_else(|| {
                    PatternError::malformed(KIND, text, "expected `<owner> <name>(<params>)`")
                })?,
        };
        if owner.is_empty() || name.is_empty() {
            return Err(PatternError::malformed(
                KIND,
                text,
                "expected `<owner> <name>(<params>)`",
            ));
        }

        Ok(MethodMatcher {
            source: text.to_string(),
            owner: TypePattern::parse(KIND, owner)?,
            name: compile_name(text, name)?,
            params: parse_params(text, inner)?,
            match_overrides,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a resolved method or constructor.
    pub fn matches_method_type(&self, method: &MethodType) -> bool {
        if !self.name.is_match(&method.name) || !params_match(&self.params, &method.parameter_types)
        {
            return false;
        }
        if self.owner.matches_name(&method.declaring_type.fqn) {
            return true;
        }
        self.match_overrides && self.overrides_matching_owner(method)
    }

    fn overrides_matching_owner(&self, method: &MethodType) -> bool {
        let signature = method.signature();
        ancestry(&method.declaring_type)
            .iter()
            .skip(1)
            .filter(|class| self.owner.matches_name(&class.fqn))
            .any(|class| {
                class
                    .declared_methods(&method.name)
                    .any(|declared| declared.same_erasure(&signature))
            })
    }

    pub fn matches_invocation(&self, invocation: &MethodInvocation) -> bool {
        self.matches_optional(invocation.method_type.as_ref())
    }

    pub fn matches_new_class(&self, new_class: &NewClass) -> bool {
        self.matches_optional(new_class.constructor_type.as_ref())
    }

    pub fn matches_declaration(&self, declaration: &MethodDeclaration) -> bool {
        self.matches_optional(declaration.method_type.as_ref())
    }

    /// Match a method invocation or constructor call in expression position.
    pub fn matches_expression(&self, expression: &Expression) -> bool {
        match expression {
            Expression::MethodInvocation(m) => self.matches_invocation(m),
            Expression::NewClass(n) => self.matches_new_class(n),
            _ => false,
        }
    }

    /// Match any node that carries a method type.
    pub fn matches_tree(&self, tree: &Tree) -> bool {
        self.matches_optional(tree.method_type())
    }

    fn matches_optional(&self, method: Option<&Arc<MethodType>>) -> bool {
        method.is_some_and(|m| self.matches_method_type(m))
    }
}

fn compile_name(text: &str, name: &str) -> Result<Regex, PatternError> {
    let regex = if name == "<constructor>" {
        "^<constructor>$".to_string()
    } else {
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '*')))
        {
            return Err(PatternError::malformed(
                KIND,
                text,
                format!("unexpected character `{}` in method name", bad),
            ));
        }
        let body: Vec<String> = name.split('*').map(regex::escape).collect();
        format!("^{}$", body.join(".*"))
    };
    Regex::new(&regex).map_err(|e| PatternError::malformed(KIND, text, e.to_string()))
}

fn parse_params(text: &str, inner: &str) -> Result<Vec<ParamPattern>, PatternError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(inner)
        .into_iter()
        .map(|param| match param.trim() {
            "" => Err(PatternError::malformed(KIND, text, "empty parameter pattern")),
            ".." => Ok(ParamPattern::AnyRemaining),
            other => TypePattern::parse(KIND, other).map(ParamPattern::Type),
        })
        .collect()
}

/// Split at commas that are not inside `<...>`.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn params_match(patterns: &[ParamPattern], types: &[JavaType]) -> bool {
    match patterns.split_first() {
        None => types.is_empty(),
        Some((ParamPattern::AnyRemaining, rest)) => {
            (0..=types.len()).any(|skip| params_match(rest, &types[skip..]))
        }
        Some((ParamPattern::Type(pattern), rest)) => types
            .split_first()
            .is_some_and(|(ty, tail)| pattern.matches_type(ty) && params_match(rest, tail)),
    }
}
