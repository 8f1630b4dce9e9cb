// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Classpath model: an immutable name-to-class index.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ClassType, JavaType, MethodSignature, ParameterizedType, Primitive, TypeKind};

/// Classes available for resolving names, keyed by fully qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    classes: HashMap<String, Arc<ClassType>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: Arc<ClassType>) -> Self {
        self.insert(class);
        self
    }

    pub fn insert(&mut self, class: Arc<ClassType>) {
        self.classes.insert(class.fqn.clone(), class);
    }

    /// Union of two catalogs; entries of `other` win on conflict.
    pub fn merged(&self, other: &TypeCatalog) -> TypeCatalog {
        let mut classes = self.classes.clone();
        classes.extend(other.classes.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
        TypeCatalog { classes }
    }

    pub fn get(&self, fqn: &str) -> Option<&Arc<ClassType>> {
        self.classes.get(fqn)
    }

    pub fn class_type(&self, fqn: &str) -> Option<JavaType> {
        self.get(fqn).map(|c| JavaType::Class(Arc::clone(c)))
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.classes.contains_key(fqn)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes whose simple name is `name`.
    pub fn by_simple_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<ClassType>> {
        self.classes.values().filter(move |c| c.simple_name() == name)
    }

    /// Classes declared in `package`.
    pub fn in_package<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a Arc<ClassType>> {
        self.classes.values().filter(move |c| c.package_name() == package)
    }

    /// A small slice of the JDK that synthesized code commonly refers to:
    /// `Object`, `String`, the boxed primitives, `Optional`, `Charset` and
    /// `StandardCharsets`, `InputStream`, `Reader`, and the `java.util`
    /// collection interfaces.
    pub fn jdk_core() -> Self {
        let boolean = JavaType::Primitive(Primitive::Boolean);
        let int = JavaType::Primitive(Primitive::Int);

        let object = ClassType::builder("java.lang.Object")
            .method(MethodSignature::new("toString", JavaType::Unknown))
            .method(MethodSignature::new("hashCode", int.clone()))
            .method(MethodSignature::new("equals", boolean.clone()).param("obj", JavaType::Unknown))
            .build();
        let object_type = JavaType::Class(Arc::clone(&object));

        let char_sequence = ClassType::builder("java.lang.CharSequence")
            .kind(TypeKind::Interface)
            .method(MethodSignature::new("length", int.clone()))
            .build();
        let comparable = ClassType::builder("java.lang.Comparable")
            .kind(TypeKind::Interface)
            .type_parameter("T")
            .build();

        let string_shell = ClassType::shallow("java.lang.String");
        let string_ref = JavaType::Class(Arc::clone(&string_shell));
        let string = ClassType::builder("java.lang.String")
            .supertype(object_type.clone())
            .interface(JavaType::Class(Arc::clone(&char_sequence)))
            .interface(JavaType::Class(Arc::clone(&comparable)))
            .method(MethodSignature::new("isEmpty", boolean.clone()))
            .method(MethodSignature::new("isBlank", boolean.clone()))
            .method(MethodSignature::new("length", int.clone()))
            .method(MethodSignature::new("trim", string_ref.clone()))
            .method(MethodSignature::new("strip", string_ref.clone()))
            .method(MethodSignature::new("toString", string_ref.clone()))
            .method(MethodSignature::new("equals", boolean.clone()).param("other", object_type.clone()))
            .method(
                MethodSignature::new("charAt", JavaType::Primitive(Primitive::Char))
                    .param("index", int.clone()),
            )
            .method(
                MethodSignature::new("contains", boolean.clone())
                    .param("s", JavaType::Class(Arc::clone(&char_sequence))),
            )
            .method(
                MethodSignature::new("valueOf", string_ref.clone())
                    .param("obj", object_type.clone())
                    .static_method(),
            )
            .build();

        let number = ClassType::builder("java.lang.Number")
            .supertype(object_type.clone())
            .build();
        let boxed: Vec<Arc<ClassType>> = [
            ("java.lang.Boolean", false),
            ("java.lang.Byte", true),
            ("java.lang.Character", false),
            ("java.lang.Double", true),
            ("java.lang.Float", true),
            ("java.lang.Integer", true),
            ("java.lang.Long", true),
            ("java.lang.Short", true),
        ]
        .iter()
        .map(|(fqn, numeric)| {
            let parent = if *numeric { &number } else { &object };
            ClassType::builder(*fqn)
                .supertype(JavaType::Class(Arc::clone(parent)))
                .interface(JavaType::Class(Arc::clone(&comparable)))
                .build()
        })
        .collect();

        let charset = ClassType::builder("java.nio.charset.Charset")
            .supertype(object_type.clone())
            .method(MethodSignature::new("name", JavaType::Class(Arc::clone(&string))))
            .build();
        let charset_type = JavaType::Class(Arc::clone(&charset));
        let standard_charsets = ["US_ASCII", "ISO_8859_1", "UTF_8", "UTF_16BE", "UTF_16LE", "UTF_16"]
            .iter()
            .fold(
                ClassType::builder("java.nio.charset.StandardCharsets").supertype(object_type.clone()),
                |builder, name| builder.field(*name, charset_type.clone()),
            )
            .build();

        let optional_t = JavaType::GenericTypeVariable(Arc::new(super::GenericTypeVariable {
            name: "T".to_string(),
            bounds: Vec::new(),
        }));
        let optional = ClassType::builder("java.util.Optional")
            .supertype(object_type.clone())
            .type_parameter("T")
            .method(MethodSignature::new("isPresent", boolean.clone()))
            .method(MethodSignature::new("isEmpty", boolean.clone()))
            .method(MethodSignature::new("get", optional_t.clone()))
            .method(MethodSignature::new("orElse", optional_t.clone()).param("other", optional_t))
            .build();

        let iterable = ClassType::builder("java.lang.Iterable")
            .kind(TypeKind::Interface)
            .build();
        let collection = ClassType::builder("java.util.Collection")
            .kind(TypeKind::Interface)
            .interface(JavaType::Class(Arc::clone(&iterable)))
            .method(MethodSignature::new("isEmpty", boolean.clone()))
            .method(MethodSignature::new("size", int.clone()))
            .build();
        let list = ClassType::builder("java.util.List")
            .kind(TypeKind::Interface)
            .type_parameter("E")
            .interface(JavaType::Class(Arc::clone(&collection)))
            .method(MethodSignature::new("add", boolean.clone()).param("e", object_type.clone()))
            .method(
                MethodSignature::new("add", JavaType::Primitive(Primitive::Void))
                    .param("index", int.clone())
                    .param("element", object_type.clone()),
            )
            .method(MethodSignature::new("get", object_type.clone()).param("index", int))
            .build();

        let input_stream = ClassType::builder("java.io.InputStream")
            .supertype(object_type.clone())
            .build();
        let reader = ClassType::builder("java.io.Reader")
            .supertype(object_type)
            .build();

        let mut catalog = TypeCatalog::new();
        for class in [
            object,
            char_sequence,
            comparable,
            string,
            number,
            charset,
            standard_charsets,
            optional,
            iterable,
            collection,
            list,
            input_stream,
            reader,
        ] {
            catalog.insert(class);
        }
        for class in boxed {
            catalog.insert(class);
        }
        catalog
    }

    /// `base<arguments>` if `base` is known.
    pub fn parameterized(&self, base: &str, arguments: Vec<JavaType>) -> Option<JavaType> {
        self.get(base).map(|c| {
            JavaType::Parameterized(Arc::new(ParameterizedType {
                base: Arc::clone(c),
                arguments,
            }))
        })
    }
}
