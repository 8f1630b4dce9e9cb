// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Macros that generate node structs and their `with_*` editors.

/// Generate `with_<field>` editors for a node.
///
/// Each editor takes `self: &Arc<Self>` and returns the same `Arc` when the
/// new value is [`RefEq`](crate::nodes::RefEq) to the old one, otherwise a
/// shallow copy with only that field replaced. Identity, prefix and markers
/// carry over unless the edited field is one of them.
macro_rules! impl_with {
    ($node:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $node {
            paste::paste! {
                $(
                    #[doc = concat!("Copy with `", stringify!($field), "` replaced, or `self` if unchanged.")]
                    pub fn [<with_ $field>](self: &Arc<Self>, $field: $ty) -> Arc<Self> {
                        if $crate::nodes::RefEq::ref_eq(&self.$field, &$field) {
                            return Arc::clone(self);
                        }
                        let mut next = (**self).clone();
                        next.$field = $field;
                        Arc::new(next)
                    }
                )*
            }
        }
    };
}

/// Define a node struct with the common `id`, `prefix` and `markers` fields
/// followed by the listed fields, plus `with_*` editors for all of them.
macro_rules! java_node {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub id: NodeId,
            pub prefix: Space,
            pub markers: Markers,
            $( $(#[$fmeta])* pub $field : $ty, )*
        }

        impl_with!($name {
            id: NodeId,
            prefix: Space,
            markers: Markers,
            $($field : $ty),*
        });
    };
}
