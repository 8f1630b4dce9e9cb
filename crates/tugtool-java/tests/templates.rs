// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Template Tests
//!
//! Compiling snippets and splicing them into hand-built trees.

mod support;

use std::sync::Arc;

use tugtool_core::error::{TemplateApplyError, TemplateCompilationError, TransformError};
use tugtool_java::{Coordinates, JavaTemplate, MethodMatcher};
use tugtool_java_cst::{
    Block, Codegen, Expression, JavaType, Markers, MethodSignature, Primitive, SearchResult,
    Statement,
};

use support::*;

fn string() -> JavaType {
    class_type("java.lang.String")
}

fn string_call(receiver: Expression, name: &str) -> Arc<tugtool_java_cst::MethodInvocation> {
    let method_type = string().as_class().and_then(|c| method_on(c, name, &[]));
    call(Some(receiver), name, Vec::new(), method_type)
}

// ============================================================================
// Replace
// ============================================================================

#[test]
fn replacement_is_typed_and_keeps_the_receiver() {
    let receiver = typed_ident("s", string())
        .with_markers(Markers::EMPTY.add(SearchResult::new("receiver")));
    let is_blank = string_call(receiver.clone(), "isBlank");

    let matcher = MethodMatcher::new("java.lang.String isBlank()", false).unwrap();
    assert!(matcher.matches_invocation(&is_blank));

    let template = JavaTemplate::builder("#{any(String)}.isEmpty()").build().unwrap();
    let applied = template
        .apply(
            &Coordinates::Replace(Expression::from(Arc::clone(&is_blank)).to_tree()),
            &[receiver.clone()],
        )
        .unwrap();
    let replaced = applied.expression().unwrap();

    assert_eq!(replaced.print(), "s.isEmpty()");
    assert_eq!(replaced.type_of(), Some(JavaType::Primitive(Primitive::Boolean)));

    let Expression::MethodInvocation(is_empty) = &replaced else {
        panic!("expected a method invocation, got {:?}", replaced);
    };
    let select = &is_empty.select.as_ref().unwrap().element;
    assert_eq!(select.id(), receiver.id());
    assert_eq!(
        select.markers().find::<SearchResult>().and_then(|m| m.description.as_deref()),
        Some("receiver")
    );
    assert_eq!(is_empty.method_type.as_ref().unwrap().name, "isEmpty");
}

#[test]
fn replacement_takes_the_target_prefix() {
    let target = string_call(typed_ident("s", string()), "trim").with_prefix(space(" "));
    let template = JavaTemplate::builder("#{any(java.lang.String)}.strip()").build().unwrap();
    let applied = template
        .apply(
            &Coordinates::Replace(Expression::from(target).to_tree()),
            &[typed_ident("s", string())],
        )
        .unwrap();
    assert_eq!(applied.expression().unwrap().print(), " s.strip()");
}

#[test]
fn back_references_copy_the_argument() {
    let template = JavaTemplate::builder("#{s:any(java.lang.String)} != null && !#{s}.isEmpty()")
        .build()
        .unwrap();
    assert_eq!(template.parameter_count(), 1);
    assert_eq!(template.parameter_names(), [Some("s")]);

    let argument = typed_ident("name", string());
    let target = string_call(argument.clone(), "isEmpty");
    let applied = template
        .apply(&Coordinates::Replace(Expression::from(target).to_tree()), &[argument.clone()])
        .unwrap();
    let replaced = applied.expression().unwrap();
    assert_eq!(replaced.print(), "name != null && !name.isEmpty()");

    let Expression::Binary(and) = &replaced else {
        panic!("expected a binary, got {:?}", replaced);
    };
    let Expression::Binary(not_null) = &and.left else {
        panic!("expected a comparison");
    };
    assert_eq!(not_null.left.id(), argument.id());
    let Expression::Unary(not) = &and.right else {
        panic!("expected a negation");
    };
    let Expression::MethodInvocation(is_empty) = &not.expression else {
        panic!("expected a call");
    };
    assert_ne!(is_empty.select.as_ref().unwrap().element.id(), argument.id());
}

// ============================================================================
// Other coordinates
// ============================================================================

#[test]
fn statements_are_appended_at_block_indentation() {
    let body = block(
        vec![expression_statement(
            Expression::MethodInvocation(string_call(typed_ident("s", string()), "isEmpty")),
            2,
        )],
        1,
    );
    let template = JavaTemplate::builder("#{any(java.lang.String)}.trim();").build().unwrap();
    assert_eq!(template.snippet_kind(), "statement");

    let applied = template
        .apply(&Coordinates::LastStatement(Arc::clone(&body)), &[typed_ident("t", string())])
        .unwrap();
    let block = applied.node::<Arc<Block>>().unwrap();
    assert_eq!(block.id, body.id);
    assert_eq!(block.print(), " {\n        s.isEmpty();\n        t.trim();\n    }");
    assert!(matches!(block.statements[1].element, Statement::Expression(_)));
}

#[test]
fn argument_lists_rebind_the_call() {
    let io_utils = library_class(
        "org.example.Io",
        vec![
            MethodSignature::new("read", string())
                .param("in", string())
                .static_method(),
            MethodSignature::new("read", string())
                .param("in", string())
                .param("charset", class_type("java.nio.charset.Charset"))
                .static_method(),
        ],
    );
    let read = static_call(&io_utils, "read", vec![typed_ident("in", string())]);
    assert_eq!(read.method_type.as_ref().unwrap().parameter_types.len(), 1);

    let template = JavaTemplate::builder("#{any(java.lang.String)}, StandardCharsets.UTF_8")
        .imports(["java.nio.charset.StandardCharsets"])
        .depends_on(Arc::clone(&io_utils))
        .build()
        .unwrap();
    let arguments: Vec<Expression> = read.arguments.iter().cloned().collect();
    let applied = template
        .apply(&Coordinates::ReplaceArguments(Arc::clone(&read)), &arguments)
        .unwrap();
    assert_eq!(applied.imports, ["java.nio.charset.StandardCharsets"]);

    let Expression::MethodInvocation(rebound) = applied.expression().unwrap() else {
        panic!("expected a method invocation");
    };
    assert_eq!(rebound.id, read.id);
    assert_eq!(rebound.print(), "Io.read(in, StandardCharsets.UTF_8)");
    assert_eq!(rebound.method_type.as_ref().unwrap().parameter_types.len(), 2);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_imports_fail_at_compile_time() {
    let err = JavaTemplate::builder("Widget.make()")
        .imports(["com.example.Widget"])
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateCompilationError::UnresolvedType { ref name } if name == "com.example.Widget"
    ));
}

#[test]
fn wrong_arguments_fail_at_apply_time() {
    let template = JavaTemplate::builder("#{any(java.lang.String)}.isEmpty()").build().unwrap();
    let target = Expression::from(string_call(typed_ident("s", string()), "isEmpty")).to_tree();

    let err = template
        .apply(&Coordinates::Replace(target.clone()), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::TemplateApply(TemplateApplyError::ArityMismatch {
            expected: 1,
            actual: 0
        })
    ));

    let err = template
        .apply(
            &Coordinates::Replace(target.clone()),
            &[typed_ident("n", JavaType::Primitive(Primitive::Int))],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::TemplateApply(TemplateApplyError::ArgumentType { index: 0, .. })
    ));

    // A typed slot takes no argument whose type is unknown.
    let untyped = [
        typed_ident("n", JavaType::Unknown),
        Expression::Identifier(tugtool_java_cst::Identifier::build("n", None)),
    ];
    for argument in untyped {
        let err = template
            .apply(&Coordinates::Replace(target.clone()), &[argument])
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::TemplateApply(TemplateApplyError::ArgumentType { index: 0, .. })
        ));
    }
}

#[test]
fn unresolved_names_fail_at_compile_time() {
    let err = JavaTemplate::builder("Missing.call(#{any()})").build().unwrap_err();
    assert!(matches!(
        err,
        TemplateCompilationError::UnresolvedType { ref name } if name == "Missing"
    ));

    let err = JavaTemplate::builder("#{any(java.lang.String)}.isEmptyy()")
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateCompilationError::UnresolvedMember { ref owner, ref name }
            if owner == "java.lang.String" && name == "isEmptyy"
    ));

    let err = JavaTemplate::builder("#{any(java.lang.String)}.getBytes(StandardCharsets.UTF_9)")
        .imports(["java.nio.charset.StandardCharsets"])
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateCompilationError::UnresolvedMember { ref name, .. } if name == "UTF_9"
    ));
}

#[test]
fn annotation_attributes_must_exist() {
    let marker = annotation_type("com.example.Marker", &[]);
    let err = JavaTemplate::builder("@Marker(level = 1)")
        .imports(["com.example.Marker"])
        .depends_on(marker)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateCompilationError::UnresolvedMember { ref owner, ref name }
            if owner == "com.example.Marker" && name == "level"
    ));
}

#[test]
fn untyped_receivers_resolve_once_applied() {
    let target = Expression::from(string_call(typed_ident("s", string()), "isEmpty")).to_tree();

    let template = JavaTemplate::builder("#{any()}.isEmpty()").build().unwrap();
    let applied = template
        .apply(&Coordinates::Replace(target.clone()), &[typed_ident("s", string())])
        .unwrap();
    let Expression::MethodInvocation(call) = applied.expression().unwrap() else {
        panic!("expected a method invocation");
    };
    assert_eq!(call.method_type.as_ref().unwrap().name, "isEmpty");

    let template = JavaTemplate::builder("#{any()}.isEmptyy()").build().unwrap();
    let err = template
        .apply(&Coordinates::Replace(target), &[typed_ident("s", string())])
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::TemplateApply(TemplateApplyError::UnresolvedSymbol { ref symbol })
            if symbol == "java.lang.String#isEmptyy"
    ));
}

#[test]
fn snippet_kind_must_fit_the_coordinate() {
    let template = JavaTemplate::builder("#{any(java.lang.String)}.trim();").build().unwrap();
    let target = Expression::from(string_call(typed_ident("s", string()), "isEmpty")).to_tree();
    let err = template
        .apply(&Coordinates::Replace(target), &[typed_ident("t", string())])
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::TemplateApply(TemplateApplyError::CoordinateMismatch { .. })
    ));
}
