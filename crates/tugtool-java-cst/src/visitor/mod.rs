// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer infrastructure for tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first**, children in source order
//! - [`JavaVisitor::pre_visit`] runs when entering a node, before its hook
//! - The node's hook (`visit_*`) visits the children and rebuilds the node
//! - [`JavaVisitor::post_visit`] runs when leaving the node, with the hook's
//!   result
//!
//! # Transforming
//!
//! Hooks return the node that replaces the one they were given. Returning
//! the input unchanged keeps the subtree, and since every rebuild goes
//! through `with_*` editors, a traversal that changes nothing returns the
//! original root `Arc`.
//!
//! ```ignore
//! use tugtool_java_cst::visitor::{JavaVisitor, VisitContext, VisitOutput, Traversal};
//!
//! struct DropParens;
//!
//! impl JavaVisitor<()> for DropParens {
//!     fn visit_parentheses(
//!         &mut self,
//!         node: &Arc<Parentheses>,
//!         ctx: &mut VisitContext<'_, ()>,
//!     ) -> VisitOutput<Expression> {
//!         let walked = walk_parentheses(self, node, ctx)?;
//!         Ok(walked.tree.element.with_prefix(walked.prefix.clone()))
//!     }
//! }
//!
//! let outcome = Traversal::default().run(&mut DropParens, &unit, &())?;
//! ```
//!
//! # Deferred Visits
//!
//! A hook can schedule a visitor to run over the whole tree after the
//! current pass with [`VisitContext::do_after_visit`]. This is how edits
//! outside the current subtree, such as adding an import, are made.

mod context;
mod dispatch;
mod identity;
mod table;
mod traits;
mod traversal;

pub use context::{DeferredQueue, VisitContext};
pub use dispatch::*;
pub use identity::validate_unique_ids;
pub use table::{Hook, VisitorTable};
pub use traits::{JavaVisitor, VisitOutput, VisitResult};
pub use traversal::{Traversal, VisitOutcome, DEFAULT_MAX_DEFERRED_VISITS};
