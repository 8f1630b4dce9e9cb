// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type expressions that are not plain names.

use std::sync::Arc;

use super::category::TypeTree;
use super::markers::Markers;
use super::space::{Container, LeftPadded, Space};
use super::traits::NodeId;
use crate::types::{JavaType, Primitive};

java_node! {
    /// `Base<Arg, ...>`. `type_parameters` is `None` for a raw type and an
    /// empty container for the diamond `<>`.
    pub struct ParameterizedTypeTree {
        pub clazz: TypeTree,
        pub type_parameters: Option<Container<TypeTree>>,
        pub java_type: Option<JavaType>,
    }
}

impl ParameterizedTypeTree {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type.clone().or_else(|| self.clazz.type_of())
    }
}

java_node! {
    /// `Element[]`. `dimension.before` is the space before `[`,
    /// `dimension.element` the space before `]`.
    pub struct ArrayTypeTree {
        pub element_type: TypeTree,
        pub dimension: LeftPadded<Space>,
        pub java_type: Option<JavaType>,
    }
}

impl ArrayTypeTree {
    pub fn type_of(&self) -> Option<JavaType> {
        self.java_type
            .clone()
            .or_else(|| self.element_type.type_of().map(JavaType::array_of))
    }
}

java_node! {
    /// `int`, `boolean`, `void`, ...
    pub struct PrimitiveTypeTree {
        pub primitive: Primitive,
    }
}

impl PrimitiveTypeTree {
    pub fn build(primitive: Primitive) -> Arc<Self> {
        Arc::new(PrimitiveTypeTree {
            id: NodeId::fresh(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            primitive,
        })
    }

    pub fn type_of(&self) -> Option<JavaType> {
        Some(JavaType::Primitive(self.primitive))
    }
}
