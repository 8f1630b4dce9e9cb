// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type-indexed metadata attached to nodes.
//!
//! A [`Markers`] bag is an insertion-ordered set of heterogeneous values.
//! Values are retrieved by their Rust type, so any crate can define its own
//! marker without registering it anywhere.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::traits::ref_eq_by_value;

/// Metadata that can be stored in a [`Markers`] bag.
pub trait Marker: fmt::Debug + PartialEq + Send + Sync + 'static {}

trait ErasedMarker: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ErasedMarker) -> bool;
}

impl<T: Marker> ErasedMarker for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedMarker) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }
}

/// Insertion-ordered, type-indexed set of markers.
#[derive(Clone, Default)]
pub struct Markers {
    entries: Vec<Arc<dyn ErasedMarker>>,
}

impl Markers {
    pub const EMPTY: Markers = Markers {
        entries: Vec::new(),
    };

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First marker of type `T`.
    pub fn find<T: Marker>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|e| e.as_any().downcast_ref::<T>())
    }

    /// All markers of type `T`, in insertion order.
    pub fn find_all<T: Marker>(&self) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter_map(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn contains<T: Marker>(&self) -> bool {
        self.find::<T>().is_some()
    }

    /// Copy of this bag with `marker` appended, unless an equal marker is
    /// already present.
    pub fn add<T: Marker>(&self, marker: T) -> Markers {
        if self.find_all::<T>().any(|m| *m == marker) {
            return self.clone();
        }
        let mut entries = self.entries.clone();
        entries.push(Arc::new(marker));
        Markers { entries }
    }

    /// Copy of this bag where the first marker of type `T` is replaced by
    /// `f(Some(old))`, or `f(None)` is appended when there is none.
    pub fn compute_by_type<T: Marker>(&self, f: impl FnOnce(Option<&T>) -> T) -> Markers {
        let position = self
            .entries
            .iter()
            .position(|e| e.as_any().downcast_ref::<T>().is_some());
        let mut entries = self.entries.clone();
        match position {
            Some(i) => {
                let next = f(entries[i].as_any().downcast_ref::<T>());
                entries[i] = Arc::new(next);
            }
            None => entries.push(Arc::new(f(None))),
        }
        Markers { entries }
    }

    /// Copy of this bag without any marker of type `T`.
    pub fn remove<T: Marker>(&self) -> Markers {
        Markers {
            entries: self
                .entries
                .iter()
                .filter(|e| e.as_any().downcast_ref::<T>().is_none())
                .cloned()
                .collect(),
        }
    }
}

impl PartialEq for Markers {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.dyn_eq(&**b))
    }
}

impl fmt::Debug for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

ref_eq_by_value!(Markers);

// ============================================================================
// Built-in markers
// ============================================================================

/// Marks a node found by a search recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub description: Option<String>,
}

impl Marker for SearchResult {}

impl SearchResult {
    pub fn new(description: impl Into<String>) -> Self {
        SearchResult {
            description: Some(description.into()),
        }
    }
}

/// Java language level a compilation unit was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JavaVersion {
    pub source_compatibility: u32,
}

impl Marker for JavaVersion {}

/// Project a compilation unit belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaProject {
    pub name: String,
}

impl Marker for JavaProject {}
