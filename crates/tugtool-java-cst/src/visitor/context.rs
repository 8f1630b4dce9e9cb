// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Per-traversal state handed to every hook.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::traits::JavaVisitor;
use crate::cursor::Cursor;

/// Visitors scheduled to run over the whole tree after the current pass.
///
/// Runs first-in, first-out. A visitor whose [`JavaVisitor::deferred_key`]
/// was already scheduled in the same traversal is dropped.
pub struct DeferredQueue<P> {
    visitors: VecDeque<Box<dyn JavaVisitor<P>>>,
    keys: HashSet<String>,
}

impl<P> Default for DeferredQueue<P> {
    fn default() -> Self {
        DeferredQueue {
            visitors: VecDeque::new(),
            keys: HashSet::new(),
        }
    }
}

impl<P> fmt::Debug for DeferredQueue<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.visitors.len())
            .field("keys", &self.keys)
            .finish()
    }
}

impl<P> DeferredQueue<P> {
    pub fn new() -> Self {
        DeferredQueue::default()
    }

    /// Schedule a visitor. Returns `false` if an equal-keyed visitor was
    /// scheduled before.
    pub fn push(&mut self, visitor: Box<dyn JavaVisitor<P>>) -> bool {
        if let Some(key) = visitor.deferred_key() {
            if !self.keys.insert(key) {
                return false;
            }
        }
        self.visitors.push_back(visitor);
        true
    }

    pub fn pop_front(&mut self) -> Option<Box<dyn JavaVisitor<P>>> {
        self.visitors.pop_front()
    }

    /// Append every visitor of `other`, in order, applying the key check.
    pub fn extend(&mut self, other: DeferredQueue<P>) {
        for visitor in other.visitors {
            self.push(visitor);
        }
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

/// State of one pass over a tree.
pub struct VisitContext<'a, P> {
    cursor: Cursor,
    param: &'a P,
    deferred: DeferredQueue<P>,
    stopped: bool,
}

impl<'a, P> fmt::Debug for VisitContext<'a, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitContext")
            .field("cursor", &self.cursor)
            .field("deferred", &self.deferred)
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl<'a, P> VisitContext<'a, P> {
    pub fn new(param: &'a P) -> Self {
        VisitContext {
            cursor: Cursor::new(),
            param,
            deferred: DeferredQueue::new(),
            stopped: false,
        }
    }

    /// The traversal parameter, usually the run's execution context.
    pub fn param(&self) -> &'a P {
        self.param
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Run `visitor` over the whole tree once the current pass finishes.
    pub fn do_after_visit<V: JavaVisitor<P> + 'static>(&mut self, visitor: V) {
        self.deferred.push(Box::new(visitor));
    }

    /// Number of visitors scheduled in this pass.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// End the pass: remaining nodes are kept as they are.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn into_deferred(self) -> DeferredQueue<P> {
        self.deferred
    }
}
