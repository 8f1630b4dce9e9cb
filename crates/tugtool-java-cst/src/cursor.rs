// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The path from the root to the node being visited.
//!
//! A [`Cursor`] is a stack of frames, one per node on the current path. Each
//! frame can carry messages: small typed values that a hook stores on an
//! ancestor so that a later hook (usually the ancestor's own post-visit)
//! can act on them. Messages live exactly as long as their frame, so
//! information never leaks between sibling subtrees.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::nodes::{NodeKind, Tree};

struct Frame {
    value: Tree,
    messages: HashMap<String, Box<dyn Any + Send>>,
}

/// Root-to-current path of a traversal.
#[derive(Default)]
pub struct Cursor {
    /// Messages stored above the root; they survive the whole traversal.
    root_messages: HashMap<String, Box<dyn Any + Send>>,
    frames: Vec<Frame>,
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.frames.iter().map(|fr| fr.value.kind_name()).collect();
        f.debug_struct("Cursor").field("path", &path).finish()
    }
}

impl Cursor {
    pub fn new() -> Self {
        Cursor::default()
    }

    /// A cursor positioned on `root`.
    pub fn at(root: Tree) -> Self {
        let mut cursor = Cursor::new();
        cursor.push(root);
        cursor
    }

    pub(crate) fn push(&mut self, value: Tree) {
        self.frames.push(Frame {
            value,
            messages: HashMap::new(),
        });
    }

    pub(crate) fn pop(&mut self) -> Option<Tree> {
        self.frames.pop().map(|f| f.value)
    }

    /// Replace the value of the current frame, keeping its messages.
    pub(crate) fn set_value(&mut self, value: Tree) {
        if let Some(frame) = self.frames.last_mut() {
            frame.value = value;
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The node being visited.
    pub fn value(&self) -> Option<&Tree> {
        self.frames.last().map(|f| &f.value)
    }

    /// The parent of the node being visited.
    pub fn parent(&self) -> Option<&Tree> {
        self.ancestors().next()
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Tree> {
        self.frames.iter().rev().skip(1).map(|f| &f.value)
    }

    /// Nearest node of kind `T` on the path, starting with the current node.
    pub fn first_enclosing<T: NodeKind>(&self) -> Option<&Arc<T>> {
        self.frames.iter().rev().find_map(|f| T::cast(&f.value))
    }

    /// Nearest node on the path, starting with the current node, that
    /// satisfies `predicate`.
    pub fn first_enclosing_where(&self, predicate: impl Fn(&Tree) -> bool) -> Option<&Tree> {
        self.frames
            .iter()
            .rev()
            .map(|f| &f.value)
            .find(|t| predicate(t))
    }

    fn messages_mut(&mut self, depth: Option<usize>) -> &mut HashMap<String, Box<dyn Any + Send>> {
        match depth.and_then(|d| self.frames.get_mut(d)) {
            Some(frame) => &mut frame.messages,
            None => &mut self.root_messages,
        }
    }

    /// Store a message on the current frame.
    pub fn put_message<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        let top = self.frames.len().checked_sub(1);
        self.messages_mut(top).insert(key.into(), Box::new(value));
    }

    /// Store a message on the root scope, visible for the rest of the
    /// traversal.
    pub fn put_root_message<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.root_messages.insert(key.into(), Box::new(value));
    }

    /// Store a message on the nearest frame holding a `T`, starting with the
    /// current node. Returns `false` when no such frame exists.
    pub fn put_message_on_first_enclosing<T: NodeKind, V: Any + Send>(
        &mut self,
        key: &str,
        value: V,
    ) -> bool {
        let depth = self.frames.iter().rposition(|f| T::cast(&f.value).is_some());
        match depth {
            Some(d) => {
                self.frames[d].messages.insert(key.to_string(), Box::new(value));
                true
            }
            None => false,
        }
    }

    /// Message stored on the current frame.
    pub fn get_message<V: Any>(&self, key: &str) -> Option<&V> {
        let messages = match self.frames.last() {
            Some(frame) => &frame.messages,
            None => &self.root_messages,
        };
        messages.get(key).and_then(|m| m.downcast_ref::<V>())
    }

    /// Message stored on the nearest frame that has one under `key`,
    /// falling back to the root scope.
    pub fn get_nearest_message<V: Any>(&self, key: &str) -> Option<&V> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.messages.get(key))
            .or_else(|| self.root_messages.get(key))
            .and_then(|m| m.downcast_ref::<V>())
    }

    /// Remove and return the nearest message under `key`.
    ///
    /// A message of a different type is left in place.
    pub fn poll_nearest_message<V: Any>(&mut self, key: &str) -> Option<V> {
        let depth = self.frames.iter().rposition(|f| f.messages.contains_key(key));
        let messages = self.messages_mut(depth);
        if !messages.get(key).is_some_and(|m| m.is::<V>()) {
            return None;
        }
        messages
            .remove(key)
            .and_then(|m| m.downcast::<V>().ok())
            .map(|b| *b)
    }

    /// Update the current frame's message under `key`, creating it with
    /// `init` first. A message of another type under the same key is
    /// replaced.
    pub fn update_message<V, R>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> V,
        update: impl FnOnce(&mut V) -> R,
    ) -> R
    where
        V: Any + Send,
    {
        let top = self.frames.len().checked_sub(1);
        let messages = self.messages_mut(top);
        let mut value = match messages.remove(key).and_then(|m| m.downcast::<V>().ok()) {
            Some(existing) => *existing,
            None => init(),
        };
        let result = update(&mut value);
        messages.insert(key.to_string(), Box::new(value));
        result
    }
}
