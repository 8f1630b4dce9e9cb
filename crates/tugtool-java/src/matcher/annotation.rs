// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Annotation matching.
//!
//! Pattern grammar: `@<type-pattern>` optionally followed by attribute
//! constraints in parentheses, either `(name = value, ...)` or a single
//! `(value)` for the `value` attribute:
//!
//! ```text
//! @javax.persistence.Entity
//! @javax..*
//! @java.lang.SuppressWarnings("unchecked")
//! @lombok.NoArgsConstructor(access = AccessLevel.PROTECTED)
//! ```
//!
//! Attribute values compare against the printed argument with surrounding
//! whitespace and quotes removed.

use std::sync::Arc;

use tugtool_core::error::PatternError;
use tugtool_java_cst::{Annotation, ClassType, Codegen, Expression, JavaType};

use super::type_pattern::TypePattern;

const KIND: &str = "annotation";

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeConstraint {
    name: String,
    value: String,
}

/// A compiled annotation pattern.
#[derive(Debug, Clone)]
pub struct AnnotationMatcher {
    annotation_type: TypePattern,
    attributes: Vec<AttributeConstraint>,
}

impl AnnotationMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let text = pattern.trim();
        if text.is_empty() {
            return Err(PatternError::Empty { kind: KIND });
        }
        let body = text
            .strip_prefix('@')
            .ok_or_else(|| PatternError::malformed(KIND, text, "must start with `@`"))?;

        let (type_text, attributes) = match body.find('(') {
            Some(open) => {
                let inner = body[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| PatternError::malformed(KIND, text, "missing `)`"))?;
                (&body[..open], parse_attributes(text, inner)?)
            }
            None => (body, Vec::new()),
        };

        Ok(AnnotationMatcher {
            annotation_type: TypePattern::parse(KIND, type_text)?,
            attributes,
        })
    }

    /// Whether `annotation` has a matching resolved type and satisfies every
    /// attribute constraint.
    pub fn matches(&self, annotation: &Annotation) -> bool {
        annotation
            .type_of()
            .is_some_and(|ty| self.annotation_type.matches_type(&ty))
            && self.attributes.iter().all(|constraint| {
                argument_value(annotation, &constraint.name)
                    .is_some_and(|value| value == constraint.value)
            })
    }

    /// Whether the annotation type `ty` matches, or one of the annotations
    /// declared on `ty` does.
    ///
    /// Only one level of meta-annotation is consulted, so self-annotated
    /// annotation types cannot loop. Attribute constraints do not apply
    /// here: only types are known.
    pub fn matches_annotation_or_meta_annotation(&self, ty: &JavaType) -> bool {
        if self.annotation_type.matches_type(ty) {
            return true;
        }
        ty.as_class()
            .is_some_and(|class| self.matches_meta_annotation(class))
    }

    fn matches_meta_annotation(&self, class: &Arc<ClassType>) -> bool {
        class
            .annotation_classes()
            .any(|meta| self.annotation_type.matches_name(&meta.fqn))
    }
}

fn parse_attributes(text: &str, inner: &str) -> Result<Vec<AttributeConstraint>, PatternError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_outside_quotes(inner)
        .into_iter()
        .map(|part| {
            let (name, value) = match split_assignment(part) {
                Some((name, value)) => (name.trim(), value),
                None => ("value", part),
            };
            let value = normalize(value);
            if name.is_empty() || value.is_empty() {
                return Err(PatternError::malformed(KIND, text, "empty attribute constraint"));
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::malformed(
                    KIND,
                    text,
                    format!("invalid attribute name `{}`", name),
                ));
            }
            Ok(AttributeConstraint {
                name: name.to_string(),
                value,
            })
        })
        .collect()
}

fn split_outside_quotes(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// `name = value` split at the first `=` outside quotes.
fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '=' if !quoted => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }
    None
}

fn normalize(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Printed value of the attribute `name`. A lone positional argument is the
/// `value` attribute.
fn argument_value(annotation: &Annotation, name: &str) -> Option<String> {
    let arguments = annotation.arguments.as_ref()?;
    arguments.iter().find_map(|argument| match argument {
        Expression::Assignment(assignment) => (assignment.variable.qualified_name().as_deref()
            == Some(name))
        .then(|| normalize(&assignment.assignment.element.print())),
        positional if name == "value" && arguments.len() == 1 => {
            Some(normalize(&positional.print()))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugtool_java_cst::{
        Assignment, Container, Identifier, LeftPadded, Literal, Markers, NodeId, Primitive, Space,
        TypeKind, TypeTree,
    };

    fn annotation_type(fqn: &str) -> Arc<ClassType> {
        ClassType::builder(fqn).kind(TypeKind::Annotation).build()
    }

    fn annotation(simple: &str, ty: Option<JavaType>, arguments: Option<Vec<Expression>>) -> Annotation {
        Annotation {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            annotation_type: TypeTree::Identifier(Identifier::build(simple, ty)),
            arguments: arguments.map(Container::build),
        }
    }

    fn string_literal(text: &str) -> Expression {
        Expression::Literal(Arc::new(Literal {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            value_source: format!("\"{}\"", text),
            java_type: Some(JavaType::Primitive(Primitive::Null)),
        }))
    }

    fn named(name: &str, value: Expression) -> Expression {
        Expression::Assignment(Arc::new(Assignment {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            variable: Expression::Identifier(Identifier::build(name, None)),
            assignment: LeftPadded::new(Space::single(), value.with_prefix(Space::single())),
            java_type: None,
        }))
    }

    #[test]
    fn resolved_type_decides_not_the_simple_name() {
        let matcher = AnnotationMatcher::new("@javax.persistence.Entity").unwrap();
        let javax = annotation(
            "Entity",
            Some(JavaType::Class(annotation_type("javax.persistence.Entity"))),
            None,
        );
        let jakarta = annotation(
            "Entity",
            Some(JavaType::Class(annotation_type("jakarta.persistence.Entity"))),
            None,
        );
        assert!(matcher.matches(&javax));
        assert!(!matcher.matches(&jakarta));
        assert!(!matcher.matches(&annotation("Entity", None, None)));
    }

    #[test]
    fn attribute_constraints() {
        let ty = Some(JavaType::Class(annotation_type("java.lang.SuppressWarnings")));
        let positional = annotation(
            "SuppressWarnings",
            ty.clone(),
            Some(vec![string_literal("unchecked")]),
        );
        let assigned = annotation(
            "SuppressWarnings",
            ty.clone(),
            Some(vec![named("value", string_literal("unchecked"))]),
        );
        let other = annotation(
            "SuppressWarnings",
            ty,
            Some(vec![string_literal("rawtypes")]),
        );

        let matcher = AnnotationMatcher::new("@java.lang.SuppressWarnings(\"unchecked\")").unwrap();
        assert!(matcher.matches(&positional));
        assert!(matcher.matches(&assigned));
        assert!(!matcher.matches(&other));

        let by_name =
            AnnotationMatcher::new("@java.lang.SuppressWarnings(value = unchecked)").unwrap();
        assert!(by_name.matches(&assigned));
    }

    #[test]
    fn one_level_of_meta_annotations() {
        let inject = annotation_type("javax.inject.Inject");
        let custom = ClassType::builder("com.example.Wired")
            .kind(TypeKind::Annotation)
            .annotation(JavaType::Class(Arc::clone(&inject)))
            .build();
        let twice_removed = ClassType::builder("com.example.Indirect")
            .kind(TypeKind::Annotation)
            .annotation(JavaType::Class(Arc::clone(&custom)))
            .build();

        let matcher = AnnotationMatcher::new("@javax.inject.Inject").unwrap();
        assert!(matcher.matches_annotation_or_meta_annotation(&JavaType::Class(inject)));
        assert!(matcher.matches_annotation_or_meta_annotation(&JavaType::Class(custom)));
        assert!(!matcher.matches_annotation_or_meta_annotation(&JavaType::Class(twice_removed)));
        assert!(!matcher.matches_annotation_or_meta_annotation(&JavaType::Unknown));
    }

    #[test]
    fn self_annotated_types_terminate() {
        let looping = ClassType::builder("com.example.Loop")
            .kind(TypeKind::Annotation)
            .annotation(JavaType::Class(ClassType::shallow("com.example.Loop")))
            .build();
        let matcher = AnnotationMatcher::new("@javax.inject.Inject").unwrap();
        assert!(!matcher.matches_annotation_or_meta_annotation(&JavaType::Class(looping)));
    }

    #[test]
    fn malformed_patterns() {
        assert!(AnnotationMatcher::new("javax.inject.Inject").is_err());
        assert!(AnnotationMatcher::new("@").is_err());
        assert!(AnnotationMatcher::new("@a.B(x = 1").is_err());
        assert!(AnnotationMatcher::new("@a.B( = 1)").is_err());
        assert!(AnnotationMatcher::new("").is_err());
    }
}
