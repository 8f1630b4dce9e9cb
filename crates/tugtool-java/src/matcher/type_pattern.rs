// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type-name patterns shared by every matcher.
//!
//! A pattern is a dotted, fully qualified type name in which:
//!
//! - `*` stands for one name segment (`java.util.*`), or for any type when
//!   it is the whole pattern
//! - `..` stands for any run of packages (`javax..*`)
//! - a `[]` suffix (or `...` for varargs) asks for an array
//! - generic arguments are ignored, so `java.util.List<String>` matches the
//!   raw `java.util.List`
//! - primitives are written by keyword (`int`, `boolean`)
//!
//! A bare capitalized name without dots (`String`) also matches the
//! `java.lang` type of that name. Patterns are compiled once into an anchored
//! [`Regex`] and matched against erased type names.

use std::fmt;

use regex::Regex;
use tugtool_core::error::PatternError;
use tugtool_java_cst::{JavaType, Primitive};

/// A compiled type-name pattern.
#[derive(Clone)]
pub struct TypePattern {
    source: String,
    regex: Regex,
    exact: Option<String>,
}

impl fmt::Debug for TypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePattern")
            .field("source", &self.source)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl TypePattern {
    /// Compile `pattern`. `kind` names the enclosing matcher in errors.
    pub fn parse(kind: &'static str, pattern: &str) -> Result<Self, PatternError> {
        let text = pattern.trim();
        if text.is_empty() {
            return Err(PatternError::Empty { kind });
        }

        let erased = strip_generics(kind, text)?;
        let (base, dimensions) = split_dimensions(&erased);
        validate_base(kind, text, base)?;

        let mut regex = String::from("^");
        let wildcard = base.contains('*') || base.contains("..");
        if base == "*" {
            regex.push_str(if dimensions == 0 { ".+" } else { "[^\\[]+" });
        } else if is_bare_lang_name(base) {
            regex.push_str("(?:java\\.lang\\.)?");
            regex.push_str(&regex::escape(base));
        } else {
            regex.push_str(&translate(base));
        }
        for _ in 0..dimensions {
            regex.push_str("\\[\\]");
        }
        regex.push('$');

        let compiled = Regex::new(&regex)
            .map_err(|e| PatternError::malformed(kind, text, e.to_string()))?;
        let exact = (!wildcard).then(|| format!("{}{}", base, "[]".repeat(dimensions)));

        Ok(TypePattern {
            source: text.to_string(),
            regex: compiled,
            exact,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The type name when the pattern has no wildcard.
    pub fn exact_name(&self) -> Option<&str> {
        self.exact.as_deref()
    }

    /// Match an erased type name such as `java.util.List` or `int[]`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Match the erasure of `ty`. Types without an erasure never match.
    pub fn matches_type(&self, ty: &JavaType) -> bool {
        ty.erased_name().is_some_and(|name| self.matches_name(&name))
    }
}

/// Drop `<...>` type arguments, keeping any array suffix after them.
fn strip_generics(kind: &'static str, text: &str) -> Result<String, PatternError> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PatternError::malformed(kind, text, "unbalanced `>`"))?;
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PatternError::malformed(kind, text, "unbalanced `<`"));
    }
    Ok(out.trim().to_string())
}

/// Split `name[][]` or `name...` into the name and its array dimensions.
fn split_dimensions(text: &str) -> (&str, usize) {
    let mut base = text;
    let mut dimensions = 0;
    if let Some(stripped) = base.strip_suffix("...") {
        base = stripped.trim_end();
        dimensions += 1;
    }
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped.trim_end();
        dimensions += 1;
    }
    (base, dimensions)
}

fn validate_base(kind: &'static str, text: &str, base: &str) -> Result<(), PatternError> {
    if base.is_empty() {
        return Err(PatternError::malformed(kind, text, "missing type name"));
    }
    if let Some(bad) = base
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '*')))
    {
        return Err(PatternError::malformed(
            kind,
            text,
            format!("unexpected character `{}`", bad),
        ));
    }
    if base.contains("...") {
        return Err(PatternError::malformed(kind, text, "`...` is only allowed as a suffix"));
    }
    if base.ends_with('.') {
        return Err(PatternError::malformed(kind, text, "type name ends with `.`"));
    }
    if base.starts_with('.') && !base.starts_with("..") {
        return Err(PatternError::malformed(kind, text, "type name starts with `.`"));
    }
    Ok(())
}

fn is_bare_lang_name(base: &str) -> bool {
    !base.contains('.')
        && !base.contains('*')
        && Primitive::from_keyword(base).is_none()
        && base.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn translate(base: &str) -> String {
    let mut out = String::new();
    let mut rest = base;
    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("..") {
            // A leading `..` has no package before it to close with a dot.
            if out.is_empty() {
                out.push_str("(?:[^.]*\\.)*");
            } else {
                out.push_str("\\.(?:[^.]*\\.)*");
            }
            rest = after;
            continue;
        }
        match c {
            '*' => out.push_str("[^.]*"),
            '.' => out.push_str("\\."),
            '$' => out.push_str("\\$"),
            other => out.push(other),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tugtool_java_cst::{ClassType, ParameterizedType};

    fn pattern(text: &str) -> TypePattern {
        TypePattern::parse("type", text).unwrap()
    }

    #[test]
    fn exact_names_match_only_themselves() {
        let p = pattern("java.util.List");
        assert!(p.matches_name("java.util.List"));
        assert!(!p.matches_name("java.util.ListX"));
        assert!(!p.matches_name("xjava.util.List"));
        assert_eq!(p.exact_name(), Some("java.util.List"));
    }

    #[test]
    fn star_is_one_segment() {
        let p = pattern("java.util.*");
        assert!(p.matches_name("java.util.List"));
        assert!(!p.matches_name("java.util.concurrent.Future"));
        assert_eq!(p.exact_name(), None);
    }

    #[test]
    fn double_dot_spans_packages() {
        let p = pattern("javax..*");
        assert!(p.matches_name("javax.Foo"));
        assert!(p.matches_name("javax.persistence.Entity"));
        assert!(p.matches_name("javax.xml.bind.annotation.XmlElement"));
        assert!(!p.matches_name("jakarta.persistence.Entity"));
        assert!(!p.matches_name("javaxx.Foo"));

        let leading = pattern("..Entity");
        assert!(leading.matches_name("javax.persistence.Entity"));
        assert!(leading.matches_name("Entity"));
    }

    #[test]
    fn arrays_and_varargs() {
        let p = pattern("java.lang.String[]");
        assert!(p.matches_name("java.lang.String[]"));
        assert!(!p.matches_name("java.lang.String"));
        assert!(pattern("int...").matches_name("int[]"));
        assert!(pattern("byte[][]").matches_name("byte[][]"));
        assert!(pattern("*[]").matches_name("int[]"));
        assert!(!pattern("*[]").matches_name("int"));
    }

    #[test]
    fn generics_are_erased() {
        let p = pattern("java.util.List<java.lang.String>");
        assert!(p.matches_name("java.util.List"));
        let list = ClassType::shallow("java.util.List");
        let ty = JavaType::Parameterized(Arc::new(ParameterizedType {
            base: list,
            arguments: vec![JavaType::Unknown],
        }));
        assert!(p.matches_type(&ty));
    }

    #[test]
    fn bare_names_default_to_java_lang() {
        let p = pattern("String");
        assert!(p.matches_name("java.lang.String"));
        assert!(p.matches_name("String"));
        assert!(!p.matches_name("com.example.String"));
        assert!(pattern("int").matches_name("int"));
        assert!(!pattern("int").matches_name("java.lang.int"));
    }

    #[test]
    fn lone_star_matches_any_type() {
        let p = pattern("*");
        assert!(p.matches_name("int"));
        assert!(p.matches_name("java.lang.String"));
        assert!(p.matches_name("byte[]"));
    }

    #[test]
    fn unknown_types_never_match() {
        assert!(!pattern("*").matches_type(&JavaType::Unknown));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert_eq!(
            TypePattern::parse("type", "  ").unwrap_err(),
            PatternError::Empty { kind: "type" }
        );
        assert!(TypePattern::parse("type", "java.util.List<").is_err());
        assert!(TypePattern::parse("type", "java.util.").is_err());
        assert!(TypePattern::parse("type", "java util").is_err());
        assert!(TypePattern::parse("type", "a...b").is_err());
        assert!(TypePattern::parse("type", "[]").is_err());
    }
}
