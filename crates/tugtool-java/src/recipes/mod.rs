// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ready-made recipes.
//!
//! Each one is a thin consumer of the matchers, templates and import
//! maintenance in this crate.

mod add_scope_to_injected_class;
mod find_internal_javax_apis;
mod ioutils_charset;
mod is_not_empty_to_jdk;
mod optional_not_empty;
mod use_no_args_constructor;

pub use add_scope_to_injected_class::AddScopeToInjectedClass;
pub use find_internal_javax_apis::{FindInternalJavaxApis, MethodCallRow, METHOD_CALLS};
pub use ioutils_charset::{ApacheIOUtilsUseExplicitCharset, STANDARD_CHARSET_NAMES};
pub use is_not_empty_to_jdk::IsNotEmptyToJdk;
pub use optional_not_empty::OptionalNotEmptyToIsPresent;
pub use use_no_args_constructor::{AccessLevel, UseNoArgsConstructor};

use tugtool_core::error::TugError;

use crate::recipe::AnyRecipe;

/// Every built-in recipe with default options.
pub fn builtin() -> Result<Vec<AnyRecipe>, TugError> {
    Ok(vec![
        AnyRecipe::plain(OptionalNotEmptyToIsPresent::new()?),
        AnyRecipe::plain(IsNotEmptyToJdk::new()?),
        AnyRecipe::plain(ApacheIOUtilsUseExplicitCharset::new(None)?),
        AnyRecipe::scanning(AddScopeToInjectedClass::new()?),
        AnyRecipe::plain(UseNoArgsConstructor::new()?),
        AnyRecipe::plain(FindInternalJavaxApis::new(None)?),
    ])
}
