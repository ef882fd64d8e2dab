// src/recipe/when.rs

//! Applicability guards for recipe declarations
//!
//! A [`Guard`] is a typed predicate over a resolved [`Spec`]. Dependencies,
//! patches, resources, and conflicts each carry one; the guard is evaluated
//! once against the resolved spec, never re-parsed from strings at build
//! time.

use crate::spec::{CompilerKind, Platform, Spec};
use crate::version::VersionRanges;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Guard {
    #[default]
    Always,
    /// Boolean variant resolved to true
    VariantOn(&'static str),
    /// Boolean variant resolved to false (or absent)
    VariantOff(&'static str),
    /// Enumerated variant resolved to the given value
    VariantEq(&'static str, &'static str),
    OnPlatform(Platform),
    CompilerIs(CompilerKind),
    /// Compiler family with a version range, e.g. intel at `:2021.6.0`
    CompilerIn(CompilerKind, VersionRanges),
    /// Package version inside the range set
    VersionIn(VersionRanges),
    /// A dependency resolved to a version inside the range set
    DependencyIn(&'static str, VersionRanges),
    All(Vec<Guard>),
    Any(Vec<Guard>),
    Not(Box<Guard>),
}

impl Guard {
    pub fn variant_on(name: &'static str) -> Self {
        Guard::VariantOn(name)
    }

    pub fn variant_off(name: &'static str) -> Self {
        Guard::VariantOff(name)
    }

    pub fn variant_eq(name: &'static str, value: &'static str) -> Self {
        Guard::VariantEq(name, value)
    }

    pub fn platform(platform: Platform) -> Self {
        Guard::OnPlatform(platform)
    }

    pub fn compiler(kind: CompilerKind) -> Self {
        Guard::CompilerIs(kind)
    }

    pub fn compiler_in(kind: CompilerKind, ranges: &str) -> Self {
        Guard::CompilerIn(kind, VersionRanges::parse(ranges))
    }

    pub fn version(ranges: &str) -> Self {
        Guard::VersionIn(VersionRanges::parse(ranges))
    }

    pub fn dependency_in(name: &'static str, ranges: &str) -> Self {
        Guard::DependencyIn(name, VersionRanges::parse(ranges))
    }

    pub fn all(guards: impl IntoIterator<Item = Guard>) -> Self {
        Guard::All(guards.into_iter().collect())
    }

    pub fn any(guards: impl IntoIterator<Item = Guard>) -> Self {
        Guard::Any(guards.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(guard: Guard) -> Self {
        Guard::Not(Box::new(guard))
    }

    /// Evaluate against a resolved spec
    pub fn evaluate(&self, spec: &Spec) -> bool {
        match self {
            Guard::Always => true,
            Guard::VariantOn(name) => spec.variant_is_on(name),
            Guard::VariantOff(name) => !spec.variant_is_on(name),
            Guard::VariantEq(name, value) => spec
                .choice_variant(name)
                .map(|v| v == *value)
                .unwrap_or(false),
            Guard::OnPlatform(platform) => spec.platform == *platform,
            Guard::CompilerIs(kind) => spec.compiler_is(*kind),
            Guard::CompilerIn(kind, ranges) => spec.compiler_satisfies(*kind, ranges.clone()),
            Guard::VersionIn(ranges) => ranges.contains(&spec.version),
            Guard::DependencyIn(name, ranges) => spec
                .dependencies
                .get(*name)
                .is_some_and(|dep| ranges.contains(&dep.version)),
            Guard::All(guards) => guards.iter().all(|g| g.evaluate(spec)),
            Guard::Any(guards) => guards.iter().any(|g| g.evaluate(spec)),
            Guard::Not(guard) => !guard.evaluate(spec),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => write!(f, "always"),
            Guard::VariantOn(name) => write!(f, "+{}", name),
            Guard::VariantOff(name) => write!(f, "~{}", name),
            Guard::VariantEq(name, value) => write!(f, "{}={}", name, value),
            Guard::OnPlatform(platform) => write!(f, "platform={}", platform),
            Guard::CompilerIs(kind) => write!(f, "%{}", kind),
            Guard::CompilerIn(kind, ranges) => write!(f, "%{}@{}", kind, ranges),
            Guard::VersionIn(ranges) => write!(f, "@{}", ranges),
            Guard::DependencyIn(name, ranges) => write!(f, "^{}@{}", name, ranges),
            Guard::All(guards) => {
                let parts: Vec<String> = guards.iter().map(|g| g.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            Guard::Any(guards) => {
                let parts: Vec<String> = guards.iter().map(|g| g.to_string()).collect();
                write!(f, "({})", parts.join(" | "))
            }
            Guard::Not(guard) => write!(f, "!({})", guard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Compiler, VariantValue};

    fn spec() -> Spec {
        Spec::new("cmake", "3.16.2")
            .with_compiler(Compiler::new(CompilerKind::Intel, "2021.4"))
            .with_switch("qt", true)
            .with_switch("doc", false)
            .with_variant("build_type", VariantValue::choice("Debug"))
            .with_dependency(Spec::new("qt", "5.4.0"))
    }

    #[test]
    fn test_variant_guards() {
        let s = spec();
        assert!(Guard::variant_on("qt").evaluate(&s));
        assert!(!Guard::variant_on("doc").evaluate(&s));
        assert!(Guard::variant_off("doc").evaluate(&s));
        // Absent variants count as off
        assert!(Guard::variant_off("ncurses").evaluate(&s));
        assert!(Guard::variant_eq("build_type", "Debug").evaluate(&s));
        assert!(!Guard::variant_eq("build_type", "Release").evaluate(&s));
    }

    #[test]
    fn test_platform_guard() {
        let s = spec();
        assert!(Guard::platform(Platform::Linux).evaluate(&s));
        assert!(!Guard::platform(Platform::Windows).evaluate(&s));
    }

    #[test]
    fn test_compiler_guards() {
        let s = spec();
        assert!(Guard::compiler(CompilerKind::Intel).evaluate(&s));
        assert!(Guard::compiler_in(CompilerKind::Intel, ":2021.6.0").evaluate(&s));
        assert!(!Guard::compiler_in(CompilerKind::Intel, "2022:").evaluate(&s));
        assert!(!Guard::compiler(CompilerKind::Gcc).evaluate(&s));
    }

    #[test]
    fn test_version_guard() {
        let s = spec();
        assert!(Guard::version("3.12.0:").evaluate(&s));
        assert!(Guard::version("3.7:3.17.2").evaluate(&s));
        assert!(!Guard::version(":3.13.3").evaluate(&s));
    }

    #[test]
    fn test_dependency_guard() {
        let s = spec();
        assert!(Guard::dependency_in("qt", "5.4.0").evaluate(&s));
        assert!(!Guard::dependency_in("qt", "5.5:").evaluate(&s));
        assert!(!Guard::dependency_in("ncurses", ":").evaluate(&s));
    }

    #[test]
    fn test_combinators() {
        let s = spec();
        let g = Guard::all([
            Guard::variant_on("qt"),
            Guard::compiler(CompilerKind::Intel),
        ]);
        assert!(g.evaluate(&s));
        assert!(!Guard::not(g).evaluate(&s));
        assert!(
            Guard::any([
                Guard::platform(Platform::Windows),
                Guard::variant_on("qt"),
            ])
            .evaluate(&s)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Guard::all([
                Guard::variant_on("ownlibs"),
                Guard::compiler(CompilerKind::Nvhpc),
            ])
            .to_string(),
            "+ownlibs %nvhpc"
        );
        assert_eq!(Guard::version("3.7:3.12").to_string(), "@3.7:3.12");
    }
}
