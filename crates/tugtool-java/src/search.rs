// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Cheap per-file checks that gate a recipe before any traversal.
//!
//! A precondition reads the compilation unit's import table and its cached
//! [`TypesInUse`](tugtool_java_cst::TypesInUse), never walking the tree
//! itself (beyond the one cached walk). The runner skips a recipe for a file
//! whose precondition fails.

use std::fmt;
use std::sync::Arc;

use tugtool_core::error::PatternError;
use tugtool_java_cst::CompilationUnit;

use crate::matcher::{MethodMatcher, TypePattern};

/// A fast yes/no filter over one compilation unit.
pub trait Precondition: Send + Sync {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool;
}

impl<F> Precondition for F
where
    F: Fn(&Arc<CompilationUnit>) -> bool + Send + Sync,
{
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        self(unit)
    }
}

/// The unit refers to a type matching a pattern, in code or in a
/// non-static import.
#[derive(Debug, Clone)]
pub struct UsesType {
    pattern: TypePattern,
}

impl UsesType {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(UsesType {
            pattern: TypePattern::parse("type", pattern)?,
        })
    }
}

impl Precondition for UsesType {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        if unit
            .types_in_use()
            .type_names()
            .any(|name| self.pattern.matches_name(name))
        {
            return true;
        }
        if let Some(exact) = self.pattern.exact_name() {
            if unit.imports_type(exact) {
                return true;
            }
        }
        unit.imports
            .iter()
            .filter(|import| !import.is_static())
            .filter_map(|import| import.class_name())
            .any(|name| self.pattern.matches_name(&name))
    }
}

/// The unit calls a method matching a method pattern.
#[derive(Debug, Clone)]
pub struct UsesMethod {
    matcher: MethodMatcher,
}

impl UsesMethod {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(UsesMethod {
            matcher: MethodMatcher::new(pattern, false)?,
        })
    }

    pub fn from_matcher(matcher: MethodMatcher) -> Self {
        UsesMethod { matcher }
    }
}

impl Precondition for UsesMethod {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        unit.types_in_use()
            .methods()
            .iter()
            .any(|method| self.matcher.matches_method_type(method))
    }
}

/// The unit targets a Java version in `min..=max`. Units without a
/// [`JavaVersion`](tugtool_java_cst::JavaVersion) marker fail the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsesJavaVersion {
    pub min: u32,
    pub max: u32,
}

impl UsesJavaVersion {
    pub fn at_least(min: u32) -> Self {
        UsesJavaVersion { min, max: u32::MAX }
    }

    pub fn between(min: u32, max: u32) -> Self {
        UsesJavaVersion { min, max }
    }
}

impl Precondition for UsesJavaVersion {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        unit.java_version()
            .is_some_and(|v| (self.min..=self.max).contains(&v))
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Every inner check passes.
pub struct And(Vec<Box<dyn Precondition>>);

/// At least one inner check passes.
pub struct Or(Vec<Box<dyn Precondition>>);

/// The inner check fails.
pub struct Not(Box<dyn Precondition>);

impl Precondition for And {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        self.0.iter().all(|p| p.check(unit))
    }
}

impl Precondition for Or {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        self.0.iter().any(|p| p.check(unit))
    }
}

impl Precondition for Not {
    fn check(&self, unit: &Arc<CompilationUnit>) -> bool {
        !self.0.check(unit)
    }
}

impl fmt::Debug for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "And({} checks)", self.0.len())
    }
}

impl fmt::Debug for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Or({} checks)", self.0.len())
    }
}

impl fmt::Debug for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Not(..)")
    }
}

pub fn and(checks: Vec<Box<dyn Precondition>>) -> And {
    And(checks)
}

pub fn or(checks: Vec<Box<dyn Precondition>>) -> Or {
    Or(checks)
}

pub fn not(check: impl Precondition + 'static) -> Not {
    Not(Box::new(check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugtool_java_cst::{Import, JavaVersion, Space};

    fn unit_with_imports(imports: &[&str]) -> Arc<CompilationUnit> {
        let imports = imports
            .iter()
            .filter_map(|fqn| Import::build(fqn, false))
            .map(|import| import.with_prefix(Space::format("\n")))
            .collect();
        CompilationUnit::build("A.java").with_imports(imports)
    }

    #[test]
    fn uses_type_reads_imports() {
        let unit = unit_with_imports(&["org.apache.commons.lang3.StringUtils"]);
        assert!(UsesType::new("org.apache.commons.lang3.StringUtils")
            .unwrap()
            .check(&unit));
        assert!(UsesType::new("org.apache..*").unwrap().check(&unit));
        assert!(!UsesType::new("javax..*").unwrap().check(&unit));
    }

    #[test]
    fn wildcard_imports_count_for_exact_names() {
        let unit = unit_with_imports(&["javax.inject.*"]);
        assert!(UsesType::new("javax.inject.Inject").unwrap().check(&unit));
        assert!(!UsesType::new("javax.persistence.Entity").unwrap().check(&unit));
    }

    #[test]
    fn java_version_bounds() {
        let unit = CompilationUnit::build("A.java");
        assert!(!UsesJavaVersion::at_least(8).check(&unit));
        let unit = unit.with_markers(unit.markers.add(JavaVersion {
            source_compatibility: 11,
        }));
        assert!(UsesJavaVersion::at_least(11).check(&unit));
        assert!(!UsesJavaVersion::at_least(17).check(&unit));
        assert!(UsesJavaVersion::between(8, 11).check(&unit));
    }

    #[test]
    fn combinators() {
        let unit = unit_with_imports(&["java.util.List"]);
        let list = || Box::new(UsesType::new("java.util.List").unwrap()) as Box<dyn Precondition>;
        let map = || Box::new(UsesType::new("java.util.Map").unwrap()) as Box<dyn Precondition>;
        assert!(or(vec![map(), list()]).check(&unit));
        assert!(!and(vec![map(), list()]).check(&unit));
        assert!(not(UsesType::new("java.util.Map").unwrap()).check(&unit));
        let closure = |u: &Arc<CompilationUnit>| u.imports.len() == 1;
        assert!(closure.check(&unit));
    }
}
