// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity checks.

use std::collections::HashSet;

use tugtool_core::error::TransformError;

use super::context::VisitContext;
use super::dispatch::accept_tree;
use super::traits::{JavaVisitor, VisitOutput, VisitResult};
use crate::nodes::{NodeId, Tree};

#[derive(Default)]
struct IdCollector {
    seen: HashSet<NodeId>,
    duplicate: Option<(NodeId, &'static str)>,
}

impl JavaVisitor<()> for IdCollector {
    fn pre_visit(&mut self, tree: &Tree, _ctx: &mut VisitContext<'_, ()>) -> VisitResult {
        if self.seen.insert(tree.id()) {
            VisitResult::Continue
        } else {
            self.duplicate = Some((tree.id(), tree.kind_name()));
            VisitResult::Stop
        }
    }
}

/// Fail if two nodes of `tree` share an id.
pub fn validate_unique_ids(tree: &Tree) -> VisitOutput<()> {
    let mut collector = IdCollector::default();
    let mut ctx = VisitContext::new(&());
    accept_tree(&mut collector, tree, &mut ctx)?;
    match collector.duplicate {
        Some((id, kind)) => Err(TransformError::invariant(format!(
            "node id {} appears more than once (second occurrence on a {})",
            id, kind
        ))),
        None => Ok(()),
    }
}
