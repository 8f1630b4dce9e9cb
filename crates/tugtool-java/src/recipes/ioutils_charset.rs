// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `IOUtils` calls that rely on the platform charset gain an explicit one.

use std::sync::Arc;

use tugtool_core::error::TugError;
use tugtool_core::execution::ExecutionContext;
use tugtool_java_cst::visitor::walk_method_invocation;
use tugtool_java_cst::{
    ClassType, Expression, JavaType, JavaVisitor, MethodInvocation, MethodSignature, Primitive,
    TypeCatalog, VisitContext, VisitOutput,
};

use crate::imports::ImportContext;
use crate::matcher::MethodMatcher;
use crate::recipe::{Recipe, RecipeInfo, RecipeVisitor};
use crate::search::{Precondition, UsesType};
use crate::template::{Coordinates, JavaTemplate};

const IO_UTILS: &str = "org.apache.commons.io.IOUtils";
const STANDARD_CHARSETS: &str = "java.nio.charset.StandardCharsets";

/// Names accepted for the `encoding` option: the `StandardCharsets` fields.
pub const STANDARD_CHARSET_NAMES: [&str; 6] =
    ["US_ASCII", "ISO_8859_1", "UTF_8", "UTF_16BE", "UTF_16LE", "UTF_16"];

/// `(method, parameter types, return type)` of each deprecated overload.
const DEPRECATED: &[(&str, &[&str], &str)] = &[
    ("copy", &["java.io.InputStream", "java.io.Writer"], "void"),
    ("copy", &["java.io.Reader", "java.io.OutputStream"], "void"),
    ("readLines", &["java.io.InputStream"], "java.util.List"),
    ("toByteArray", &["java.io.Reader"], "byte[]"),
    ("toCharArray", &["java.io.InputStream"], "char[]"),
    ("toInputStream", &["java.lang.CharSequence"], "java.io.InputStream"),
    ("toInputStream", &["java.lang.String"], "java.io.InputStream"),
    ("toString", &["byte[]"], "java.lang.String"),
    ("toString", &["java.io.InputStream"], "java.lang.String"),
    ("toString", &["java.net.URI"], "java.lang.String"),
    ("toString", &["java.net.URL"], "java.lang.String"),
    ("write", &["byte[]", "java.io.Writer"], "void"),
    ("write", &["char[]", "java.io.OutputStream"], "void"),
    ("write", &["java.lang.CharSequence", "java.io.OutputStream"], "void"),
    ("write", &["java.lang.String", "java.io.OutputStream"], "void"),
    ("write", &["java.lang.StringBuffer", "java.io.OutputStream"], "void"),
];

#[derive(Debug, Clone)]
struct Rewrite {
    matcher: MethodMatcher,
    arguments: JavaTemplate,
}

#[derive(Debug, Clone)]
pub struct ApacheIOUtilsUseExplicitCharset {
    encoding: String,
    rewrites: Vec<Rewrite>,
    string_to_byte_array: MethodMatcher,
    get_bytes: JavaTemplate,
}

impl ApacheIOUtilsUseExplicitCharset {
    /// `encoding` names a `StandardCharsets` field; `UTF_8` when `None`.
    pub fn new(encoding: Option<&str>) -> Result<Self, TugError> {
        let encoding = encoding.unwrap_or("UTF_8").to_string();
        check_encoding(&encoding)?;

        let catalog = commons_io_catalog();
        let charset = format!("StandardCharsets.{}", encoding);
        let template = |source: String| {
            JavaTemplate::builder(source)
                .imports([STANDARD_CHARSETS])
                .catalog(catalog.clone())
                .build()
        };

        let mut rewrites = Vec::with_capacity(DEPRECATED.len());
        for (name, params, _) in DEPRECATED {
            let pattern = format!("{} {}({})", IO_UTILS, name, params.join(", "));
            let placeholders: Vec<String> = params.iter().map(|p| placeholder(p)).collect();
            rewrites.push(Rewrite {
                matcher: MethodMatcher::new(&pattern, false)?,
                arguments: template(format!("{}, {}", placeholders.join(", "), charset))?,
            });
        }

        Ok(ApacheIOUtilsUseExplicitCharset {
            rewrites,
            string_to_byte_array: MethodMatcher::new(
                &format!("{} toByteArray(java.lang.String)", IO_UTILS),
                false,
            )?,
            get_bytes: template(format!("#{{any(java.lang.String)}}.getBytes({})", charset))?,
            encoding,
        })
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

fn check_encoding(encoding: &str) -> Result<(), TugError> {
    if STANDARD_CHARSET_NAMES.contains(&encoding) {
        Ok(())
    } else {
        Err(TugError::invalid_args(format!(
            "invalid encoding `{}`: must be one of {}",
            encoding,
            STANDARD_CHARSET_NAMES.join(", ")
        )))
    }
}

fn placeholder(param: &str) -> String {
    match param.strip_suffix("[]") {
        Some(element) => format!("#{{anyArray({})}}", element),
        None => format!("#{{any({})}}", param),
    }
}

fn type_named(catalog: &TypeCatalog, name: &str) -> JavaType {
    if let Some(element) = name.strip_suffix("[]") {
        return JavaType::array_of(type_named(catalog, element));
    }
    if let Some(primitive) = Primitive::from_keyword(name) {
        return JavaType::Primitive(primitive);
    }
    match catalog.get(name) {
        Some(class) => JavaType::Class(Arc::clone(class)),
        None => JavaType::Class(ClassType::shallow(name)),
    }
}

/// The JDK core slice plus the commons-io and `java.io` types the templates
/// mention, and `String.getBytes(Charset)`.
fn commons_io_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::jdk_core();
    let object = type_named(&catalog, "java.lang.Object");
    for fqn in [
        "java.io.Writer",
        "java.io.OutputStream",
        "java.net.URI",
        "java.net.URL",
        "java.lang.StringBuffer",
    ] {
        let mut builder = ClassType::builder(fqn).supertype(object.clone());
        if fqn == "java.lang.StringBuffer" {
            builder = builder.interface(type_named(&catalog, "java.lang.CharSequence"));
        }
        catalog.insert(builder.build());
    }

    let charset = type_named(&catalog, "java.nio.charset.Charset");
    if let Some(string) = catalog.get("java.lang.String") {
        let mut string = (**string).clone();
        string.methods.push(
            MethodSignature::new("getBytes", type_named(&catalog, "byte[]"))
                .param("charset", charset.clone()),
        );
        catalog.insert(Arc::new(string));
    }

    let mut io_utils = ClassType::builder(IO_UTILS).supertype(object);
    for (name, params, returns) in DEPRECATED {
        let mut deprecated =
            MethodSignature::new(*name, type_named(&catalog, returns)).static_method();
        for (i, param) in params.iter().enumerate() {
            deprecated = deprecated.param(format!("arg{}", i), type_named(&catalog, param));
        }
        let explicit = deprecated.clone().param("charset", charset.clone());
        io_utils = io_utils.method(deprecated).method(explicit);
    }
    catalog.insert(io_utils.build());
    catalog
}

impl RecipeInfo for ApacheIOUtilsUseExplicitCharset {
    fn name(&self) -> &str {
        "ApacheIOUtilsUseExplicitCharset"
    }

    fn display_name(&self) -> &str {
        "Use `IOUtils` methods that take a charset"
    }

    fn description(&self) -> &str {
        "Replace deprecated `IOUtils` calls that use the platform charset with the overloads \
         taking an explicit `StandardCharsets` value, e.g. `IOUtils.readLines(in)` becomes \
         `IOUtils.readLines(in, StandardCharsets.UTF_8)`."
    }

    fn tags(&self) -> &[&'static str] {
        &["apache", "commons"]
    }

    fn validate(&self) -> Result<(), TugError> {
        check_encoding(&self.encoding)
    }
}

impl Recipe for ApacheIOUtilsUseExplicitCharset {
    fn precondition(&self) -> Option<Box<dyn Precondition>> {
        UsesType::new(IO_UTILS)
            .ok()
            .map(|check| Box::new(check) as Box<dyn Precondition>)
    }

    fn visitor(&self) -> RecipeVisitor<'_> {
        Box::new(ExplicitCharset { recipe: self })
    }
}

struct ExplicitCharset<'r> {
    recipe: &'r ApacheIOUtilsUseExplicitCharset,
}

impl JavaVisitor<ExecutionContext> for ExplicitCharset<'_> {
    fn visit_method_invocation(
        &mut self,
        node: &Arc<MethodInvocation>,
        ctx: &mut VisitContext<'_, ExecutionContext>,
    ) -> VisitOutput<Expression> {
        let call = walk_method_invocation(self, node, ctx)?;
        let recipe = self.recipe;
        if call.arguments.iter().any(|a| a.type_of().is_none()) {
            return Ok(call.into());
        }

        let replaced = if recipe.string_to_byte_array.matches_invocation(&call) {
            let arguments: Vec<Expression> = call.arguments.iter().cloned().collect();
            let target = Expression::from(Arc::clone(&call)).to_tree();
            recipe
                .get_bytes
                .apply(&Coordinates::Replace(target), &arguments)?
                .expression()?
        } else if let Some(rewrite) = recipe
            .rewrites
            .iter()
            .find(|r| r.matcher.matches_invocation(&call))
        {
            let arguments: Vec<Expression> = call.arguments.iter().cloned().collect();
            rewrite
                .arguments
                .apply(&Coordinates::ReplaceArguments(Arc::clone(&call)), &arguments)?
                .expression()?
        } else {
            return Ok(call.into());
        };

        ctx.maybe_add_import(STANDARD_CHARSETS);
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_validated() {
        assert!(ApacheIOUtilsUseExplicitCharset::new(None).is_ok());
        let recipe = ApacheIOUtilsUseExplicitCharset::new(Some("UTF_16LE")).unwrap();
        assert_eq!(recipe.encoding(), "UTF_16LE");
        assert!(recipe.validate().is_ok());

        let err = ApacheIOUtilsUseExplicitCharset::new(Some("UTF-8")).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn every_overload_compiles_to_an_argument_list() {
        let recipe = ApacheIOUtilsUseExplicitCharset::new(None).unwrap();
        assert_eq!(recipe.rewrites.len(), DEPRECATED.len());
        for (rewrite, (_, params, _)) in recipe.rewrites.iter().zip(DEPRECATED) {
            assert_eq!(rewrite.arguments.snippet_kind(), "argument list");
            assert_eq!(rewrite.arguments.parameter_count(), params.len());
        }
        assert_eq!(recipe.get_bytes.snippet_kind(), "expression");
    }
}
