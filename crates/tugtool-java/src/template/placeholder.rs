// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Typed placeholders.
//!
//! ```text
//! #{}                       untyped, positional
//! #{any()}                  same
//! #{any(java.lang.String)}  typed
//! #{anyArray(int)}          array of the given element type
//! #{s:any(String)}          named; later `#{s}` refer back to it
//! #{s}                      back-reference to a named placeholder
//! ```
//!
//! Each declaration takes the next positional argument. Back-references
//! take none: they repeat the declared argument.

use std::collections::HashMap;

use tugtool_core::error::TemplateCompilationError;
use tugtool_java_cst::{JavaType, Marker};

use super::resolve::Resolver;

/// Marks the identifier standing in for argument `index` in a compiled
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TemplateSlot {
    pub index: usize,
}

impl Marker for TemplateSlot {}

/// One positional parameter of a template.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slot {
    pub name: Option<String>,
    /// Declared type; `None` accepts any argument.
    pub java_type: Option<JavaType>,
}

impl Slot {
    /// Erased name of the declared type.
    pub fn type_name(&self) -> Option<String> {
        self.java_type.as_ref().and_then(JavaType::erased_name)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
    by_name: HashMap<String, usize>,
}

impl SlotTable {
    /// Index of the argument the placeholder `text` stands for, declaring
    /// a new slot unless `text` is a back-reference.
    pub fn bind(&mut self, text: &str, resolver: &Resolver) -> Result<usize, TemplateCompilationError> {
        let (name, body) = match split_name(text) {
            Some((name, body)) => (Some(name), body),
            None if is_identifier(text) && text != "any" => {
                return self.by_name.get(text).copied().ok_or_else(|| {
                    TemplateCompilationError::UndeclaredReference {
                        name: text.to_string(),
                    }
                });
            }
            None => (None, text),
        };

        let java_type = parse_matcher(body, resolver).ok_or_else(|| {
            TemplateCompilationError::UnknownPlaceholder {
                placeholder: text.to_string(),
            }
        })??;

        let index = self.slots.len();
        if let Some(name) = name {
            if self.by_name.insert(name.to_string(), index).is_some() {
                return Err(TemplateCompilationError::DuplicatePlaceholder {
                    name: name.to_string(),
                });
            }
        }
        self.slots.push(Slot {
            name: name.map(str::to_string),
            java_type,
        });
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// `name:body` for a named declaration.
fn split_name(text: &str) -> Option<(&str, &str)> {
    let (name, body) = text.split_once(':')?;
    let name = name.trim();
    is_identifier(name).then_some((name, body.trim()))
}

/// The declared type of an `any(..)` / `anyArray(..)` body.
///
/// `None` when the body is not a matcher at all; the inner result fails
/// when the type cannot be resolved.
fn parse_matcher(
    body: &str,
    resolver: &Resolver,
) -> Option<Result<Option<JavaType>, TemplateCompilationError>> {
    if body.is_empty() {
        return Some(Ok(None));
    }
    let (array, inner) = if let Some(rest) = body.strip_prefix("anyArray") {
        (true, rest)
    } else {
        (false, body.strip_prefix("any")?)
    };
    let inner = inner.trim().strip_prefix('(')?.strip_suffix(')')?.trim();
    if inner.is_empty() {
        return if array { None } else { Some(Ok(None)) };
    }
    let resolved = resolver
        .type_named(inner)
        .ok_or_else(|| TemplateCompilationError::UnresolvedType {
            name: inner.to_string(),
        })
        .map(|ty| Some(if array { JavaType::array_of(ty) } else { ty }));
    Some(resolved)
}
