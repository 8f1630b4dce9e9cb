// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity and change detection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::category::Tree;

/// Stable identity of a logical node.
///
/// Ids survive every `with_*` edit of the node they belong to. Synthesized
/// nodes get a [`NodeId::fresh`] id, so no two nodes of one tree share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    /// Mint an id never handed out before in this process.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shallow "same value" check used for change detection.
///
/// Child nodes compare by pointer, plain values by equality. Two values are
/// `ref_eq` exactly when replacing one with the other would not change the
/// tree, which lets `with_*` return the original node untouched.
pub trait RefEq {
    fn ref_eq(&self, other: &Self) -> bool;
}

impl<T: ?Sized> RefEq for Arc<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: RefEq> RefEq for Option<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.ref_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: RefEq> RefEq for Vec<T> {
    fn ref_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.ref_eq(b))
    }
}

/// Implement [`RefEq`] by value equality for leaf value types.
macro_rules! ref_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::nodes::RefEq for $ty {
                fn ref_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}
pub(crate) use ref_eq_by_value;

ref_eq_by_value!(NodeId, String, bool);

/// A value that can occupy a child slot of a node.
///
/// Implemented by every `Arc<Kind>` and by the category enums. The traversal
/// uses it to push slot values onto the cursor and to check that a generic
/// post-visit hook handed back a node that still fits the slot.
pub trait TreeSlot: Clone {
    fn into_tree(self) -> Tree;
    fn from_tree(tree: Tree) -> Option<Self>;
}

/// A concrete node kind, used for typed cursor queries such as
/// `cursor.first_enclosing::<ClassDeclaration>()`.
pub trait NodeKind: Sized {
    fn cast(tree: &Tree) -> Option<&Arc<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn arc_ref_eq_is_pointer_identity() {
        let a = Arc::new(String::from("x"));
        let b = Arc::new(String::from("x"));
        assert!(a.ref_eq(&Arc::clone(&a)));
        assert!(!a.ref_eq(&b));
        assert!(vec![Arc::clone(&a)].ref_eq(&vec![Arc::clone(&a)]));
        assert!(!Some(a).ref_eq(&None));
    }
}
