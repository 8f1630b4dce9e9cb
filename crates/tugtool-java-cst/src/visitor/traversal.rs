// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Running a visitor to completion.
//!
//! A traversal is one pass of the main visitor followed by every deferred
//! visitor it (transitively) scheduled, each over the result of the pass
//! before it, in first-in, first-out order.

use tracing::{debug, trace};
use tugtool_core::config::EngineConfig;
use tugtool_core::error::TransformError;

use super::context::{DeferredQueue, VisitContext};
use super::dispatch::accept_tree;
use super::identity::validate_unique_ids;
use super::traits::{JavaVisitor, VisitOutput};
use crate::nodes::{RefEq, TreeSlot};

/// Default bound on deferred visits per traversal.
pub const DEFAULT_MAX_DEFERRED_VISITS: usize = 64;

/// Result of [`Traversal::run`].
#[derive(Debug, Clone)]
pub struct VisitOutcome<T> {
    pub tree: T,
    /// Number of deferred visitors that ran.
    pub deferred_runs: usize,
}

/// Traversal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    /// Deferred visits allowed before the traversal fails with
    /// [`TransformError::DeferredOverflow`].
    pub max_deferred_visits: usize,
    /// Check that an edited tree still has unique node ids.
    pub validate_identity: bool,
}

impl Default for Traversal {
    fn default() -> Self {
        Traversal {
            max_deferred_visits: DEFAULT_MAX_DEFERRED_VISITS,
            validate_identity: true,
        }
    }
}

impl Traversal {
    pub fn from_config(config: &EngineConfig) -> Self {
        Traversal {
            max_deferred_visits: config.max_deferred_visits,
            validate_identity: config.validate_identity,
        }
    }

    /// One pass of `visitor` over `root`, returning the new tree and the
    /// visitors the pass scheduled.
    pub fn visit_once<P, V, T>(
        &self,
        visitor: &mut V,
        root: &T,
        param: &P,
    ) -> VisitOutput<(T, DeferredQueue<P>)>
    where
        V: JavaVisitor<P> + ?Sized,
        T: TreeSlot,
    {
        let mut ctx = VisitContext::new(param);
        let tree = root.clone().into_tree();
        let kind = tree.kind_name();
        let visited = accept_tree(visitor, &tree, &mut ctx)?;
        let out = T::from_tree(visited).ok_or_else(|| {
            TransformError::invariant(format!("the {} at the root was replaced by another kind", kind))
        })?;
        Ok((out, ctx.into_deferred()))
    }

    /// Run `visitor` and all deferred visitors it schedules.
    pub fn run<P, V, T>(&self, visitor: &mut V, root: &T, param: &P) -> VisitOutput<VisitOutcome<T>>
    where
        V: JavaVisitor<P> + ?Sized,
        T: TreeSlot + RefEq,
    {
        let (mut tree, mut queue) = self.visit_once(visitor, root, param)?;
        let mut deferred_runs = 0;

        while let Some(mut next) = queue.pop_front() {
            if deferred_runs >= self.max_deferred_visits {
                return Err(TransformError::DeferredOverflow {
                    limit: self.max_deferred_visits,
                });
            }
            deferred_runs += 1;
            trace!(run = deferred_runs, "running deferred visitor");
            let (out, more) = self.visit_once(next.as_mut(), &tree, param)?;
            tree = out;
            queue.extend(more);
        }

        if deferred_runs > 0 {
            debug!(deferred_runs, "deferred visitors finished");
        }

        if self.validate_identity && !tree.ref_eq(root) {
            validate_unique_ids(&tree.clone().into_tree())?;
        }

        Ok(VisitOutcome {
            tree,
            deferred_runs,
        })
    }
}
