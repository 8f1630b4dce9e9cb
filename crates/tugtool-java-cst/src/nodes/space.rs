// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace and comment carriers.
//!
//! Every node owns the whitespace and comments in front of it (its prefix).
//! Punctuation that belongs to a parent (commas, dots, closing parens) gets
//! its spacing from the padding wrappers in this module. Together they make
//! printing lossless: untouched regions print back byte-for-byte.

use tugtool_core::text::{last_line_indent, shift_indentation};

use super::traits::{ref_eq_by_value, RefEq};

/// A `//` or `/* */` comment inside a [`Space`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    /// Comment body without the delimiters.
    pub text: String,
    pub multiline: bool,
    /// Whitespace following the comment.
    pub suffix: String,
}

/// Whitespace followed by any number of comments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Space {
    pub whitespace: String,
    pub comments: Vec<Comment>,
}

impl Space {
    pub const EMPTY: Space = Space {
        whitespace: String::new(),
        comments: Vec::new(),
    };

    /// A space made of whitespace only.
    pub fn format(whitespace: &str) -> Space {
        Space {
            whitespace: whitespace.to_string(),
            comments: Vec::new(),
        }
    }

    pub fn single() -> Space {
        Space::format(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    pub fn has_newline(&self) -> bool {
        self.whitespace.contains('\n') || self.comments.iter().any(|c| c.suffix.contains('\n'))
    }

    /// Indentation of the line the following token sits on.
    ///
    /// `None` when the token continues the previous line.
    pub fn indent(&self) -> Option<&str> {
        let last = self
            .comments
            .last()
            .map(|c| c.suffix.as_str())
            .unwrap_or(self.whitespace.as_str());
        last_line_indent(last)
    }

    pub fn with_whitespace(&self, whitespace: &str) -> Space {
        Space {
            whitespace: whitespace.to_string(),
            comments: self.comments.clone(),
        }
    }

    /// Re-base every line break in this space from indent `from` to `to`.
    pub fn shift_indent(&self, from: &str, to: &str) -> Space {
        Space {
            whitespace: shift_indentation(&self.whitespace, from, to),
            comments: self
                .comments
                .iter()
                .map(|c| Comment {
                    suffix: shift_indentation(&c.suffix, from, to),
                    ..c.clone()
                })
                .collect(),
        }
    }
}

ref_eq_by_value!(Space);

/// An element followed by the space before its trailing delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct RightPadded<T> {
    pub element: T,
    pub after: Space,
}

impl<T: RefEq + Clone> RightPadded<T> {
    pub fn new(element: T) -> Self {
        RightPadded {
            element,
            after: Space::EMPTY,
        }
    }

    pub fn with_element(&self, element: T) -> Self {
        if self.element.ref_eq(&element) {
            return self.clone();
        }
        RightPadded {
            element,
            after: self.after.clone(),
        }
    }

    pub fn with_after(&self, after: Space) -> Self {
        RightPadded {
            element: self.element.clone(),
            after,
        }
    }
}

impl<T: RefEq> RefEq for RightPadded<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        self.element.ref_eq(&other.element) && self.after == other.after
    }
}

/// An element preceded by the space before its leading delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftPadded<T> {
    pub before: Space,
    pub element: T,
}

impl<T: RefEq + Clone> LeftPadded<T> {
    pub fn new(before: Space, element: T) -> Self {
        LeftPadded { before, element }
    }

    pub fn with_element(&self, element: T) -> Self {
        if self.element.ref_eq(&element) {
            return self.clone();
        }
        LeftPadded {
            before: self.before.clone(),
            element,
        }
    }
}

impl<T: RefEq> RefEq for LeftPadded<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        self.before == other.before && self.element.ref_eq(&other.element)
    }
}

/// A delimited, comma-separated list such as call arguments.
///
/// `before` is the space before the opening delimiter; each element's
/// `after` is the space before the following comma or the closing delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub before: Space,
    pub elements: Vec<RightPadded<T>>,
}

impl<T: RefEq + Clone> Container<T> {
    pub fn empty() -> Self {
        Container {
            before: Space::EMPTY,
            elements: Vec::new(),
        }
    }

    /// A container with no padding around the given elements.
    pub fn build(elements: Vec<T>) -> Self {
        Container {
            before: Space::EMPTY,
            elements: elements.into_iter().map(RightPadded::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().map(|p| &p.element)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index).map(|p| &p.element)
    }

    pub fn with_elements(&self, elements: Vec<RightPadded<T>>) -> Self {
        if self.elements.ref_eq(&elements) {
            return self.clone();
        }
        Container {
            before: self.before.clone(),
            elements,
        }
    }
}

impl<T: RefEq> RefEq for Container<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        self.before == other.before && self.elements.ref_eq(&other.elements)
    }
}
