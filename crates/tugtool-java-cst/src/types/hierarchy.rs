// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Supertype traversal and assignability.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use super::{ClassType, JavaType, Primitive};

/// A class followed by all of its supertypes.
///
/// Order: the class, its superclass chain up to the root, then every
/// implemented interface breadth-first. Each name appears once, so diamond
/// interface graphs are walked a single time and a malformed cyclic
/// hierarchy still terminates.
pub fn ancestry(class: &Arc<ClassType>) -> Vec<Arc<ClassType>> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();

    let mut current = Some(Arc::clone(class));
    while let Some(c) = current {
        if !seen.insert(c.fqn.clone()) {
            break;
        }
        current = c.supertype_class().cloned();
        order.push(c);
    }

    let mut queue: VecDeque<Arc<ClassType>> = order
        .iter()
        .flat_map(|c| c.interface_classes().cloned())
        .collect();
    while let Some(interface) = queue.pop_front() {
        if !seen.insert(interface.fqn.clone()) {
            continue;
        }
        queue.extend(interface.interface_classes().cloned());
        order.push(interface);
    }

    order
}

/// Whether `class` is `fqn` or has it among its supertypes.
///
/// Every class inherits from `java.lang.Object`.
pub fn inherits_from(class: &Arc<ClassType>, fqn: &str) -> bool {
    fqn == "java.lang.Object" || ancestry(class).iter().any(|c| c.fqn == fqn)
}

/// Whether a value of type `ty` may be assigned to a variable of the type
/// named `target` (an erased name such as `java.util.List`, `int` or
/// `java.lang.String[]`).
///
/// Unknown types are never assignable.
pub fn is_assignable_to(target: &str, ty: &JavaType) -> bool {
    match ty {
        JavaType::Primitive(p) => primitive_assignable(*p, target),
        JavaType::Variable(v) => is_assignable_to(target, &v.var_type),
        JavaType::Class(_) | JavaType::Parameterized(_) | JavaType::GenericTypeVariable(_) => {
            match ty.as_class() {
                Some(class) => inherits_from(class, target),
                None => target == "java.lang.Object",
            }
        }
        JavaType::Array(element) => match target.strip_suffix("[]") {
            Some(component) => match element.as_ref() {
                JavaType::Primitive(p) => p.keyword() == component,
                other => is_assignable_to(component, other),
            },
            None => matches!(
                target,
                "java.lang.Object" | "java.lang.Cloneable" | "java.io.Serializable"
            ),
        },
        JavaType::Method(_) | JavaType::Unknown => false,
    }
}

fn primitive_assignable(primitive: Primitive, target: &str) -> bool {
    if primitive.keyword() == target {
        return true;
    }
    if primitive == Primitive::Null {
        return Primitive::from_keyword(target).is_none();
    }
    if let Some(to) = Primitive::from_keyword(target) {
        return widens_to(primitive, to);
    }
    match primitive.boxed_name() {
        Some(boxed) => {
            target == boxed
                || matches!(
                    target,
                    "java.lang.Object" | "java.io.Serializable" | "java.lang.Comparable"
                )
                || (primitive.is_numeric() && target == "java.lang.Number")
        }
        None => false,
    }
}

fn widens_to(from: Primitive, to: Primitive) -> bool {
    use Primitive::*;
    matches!(
        (from, to),
        (Byte, Short | Int | Long | Float | Double)
            | (Short, Int | Long | Float | Double)
            | (Char, Int | Long | Float | Double)
            | (Int, Long | Float | Double)
            | (Long, Float | Double)
            | (Float, Double)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(fqn: &str) -> JavaType {
        JavaType::Class(ClassType::shallow(fqn))
    }

    fn array_list() -> Arc<ClassType> {
        let collection = ClassType::builder("java.util.Collection")
            .interface(class("java.lang.Iterable"))
            .build();
        let list = ClassType::builder("java.util.List")
            .interface(JavaType::Class(Arc::clone(&collection)))
            .build();
        let abstract_list = ClassType::builder("java.util.AbstractList")
            .supertype(class("java.util.AbstractCollection"))
            .interface(JavaType::Class(Arc::clone(&list)))
            .build();
        ClassType::builder("java.util.ArrayList")
            .supertype(JavaType::Class(abstract_list))
            .interface(JavaType::Class(list))
            .interface(class("java.util.RandomAccess"))
            .build()
    }

    #[test]
    fn ancestry_walks_chain_then_interfaces_once() {
        let names: Vec<String> = ancestry(&array_list()).iter().map(|c| c.fqn.clone()).collect();
        assert_eq!(
            names,
            vec![
                "java.util.ArrayList",
                "java.util.AbstractList",
                "java.util.AbstractCollection",
                "java.util.List",
                "java.util.RandomAccess",
                "java.util.Collection",
                "java.lang.Iterable",
            ]
        );
    }

    #[test]
    fn assignability_through_hierarchy() {
        let ty = JavaType::Class(array_list());
        assert!(is_assignable_to("java.util.ArrayList", &ty));
        assert!(is_assignable_to("java.lang.Iterable", &ty));
        assert!(is_assignable_to("java.lang.Object", &ty));
        assert!(!is_assignable_to("java.util.Map", &ty));
        assert!(!is_assignable_to("java.lang.Object", &JavaType::Unknown));
    }

    #[test]
    fn primitives_widen_and_box() {
        let int = JavaType::Primitive(Primitive::Int);
        assert!(is_assignable_to("int", &int));
        assert!(is_assignable_to("long", &int));
        assert!(!is_assignable_to("short", &int));
        assert!(is_assignable_to("java.lang.Integer", &int));
        assert!(is_assignable_to("java.lang.Number", &int));
        assert!(!is_assignable_to("java.lang.String", &int));
        assert!(is_assignable_to("java.lang.String", &JavaType::Primitive(Primitive::Null)));
    }

    #[test]
    fn arrays_match_components() {
        let strings = JavaType::array_of(class("java.lang.String"));
        assert!(is_assignable_to("java.lang.String[]", &strings));
        assert!(is_assignable_to("java.lang.Object[]", &strings));
        assert!(is_assignable_to("java.lang.Object", &strings));
        let ints = JavaType::array_of(JavaType::Primitive(Primitive::Int));
        assert!(is_assignable_to("int[]", &ints));
        assert!(!is_assignable_to("java.lang.Object[]", &ints));
    }
}
