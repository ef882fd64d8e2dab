// src/spec/mod.rs

//! Resolved build specifications
//!
//! A [`Spec`] is the immutable description of one concrete package build:
//! selected version, resolved variant values, platform and compiler facts,
//! and the resolved specs of its dependencies. Specs are produced by the
//! host resolver (handed over as a TOML document or a spec string) and only
//! read here. Argument construction over a Spec is a pure function:
//! identical Spec, identical argument list.

mod parse;

pub use parse::parse_spec;

use crate::error::{Error, Result};
use crate::version::{Version, VersionRanges};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Target platform of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Linux,
    Darwin,
    Windows,
    Cray,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Windows => "windows",
            Platform::Cray => "cray",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "linux" => Ok(Platform::Linux),
            "darwin" => Ok(Platform::Darwin),
            "windows" => Ok(Platform::Windows),
            "cray" => Ok(Platform::Cray),
            other => Err(Error::ParseError(format!("unknown platform '{}'", other))),
        }
    }

    pub fn is_windows_like(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Separator for PATH-style environment values on this platform
    pub fn path_list_separator(&self) -> char {
        if self.is_windows_like() { ';' } else { ':' }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler families relevant to the recipe catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerKind {
    Gcc,
    Clang,
    AppleClang,
    Intel,
    Nvhpc,
    Fj,
    Cce,
}

impl CompilerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Gcc => "gcc",
            CompilerKind::Clang => "clang",
            CompilerKind::AppleClang => "apple-clang",
            CompilerKind::Intel => "intel",
            CompilerKind::Nvhpc => "nvhpc",
            CompilerKind::Fj => "fj",
            CompilerKind::Cce => "cce",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "gcc" => Ok(CompilerKind::Gcc),
            "clang" => Ok(CompilerKind::Clang),
            "apple-clang" => Ok(CompilerKind::AppleClang),
            "intel" => Ok(CompilerKind::Intel),
            "nvhpc" => Ok(CompilerKind::Nvhpc),
            "fj" => Ok(CompilerKind::Fj),
            "cce" => Ok(CompilerKind::Cce),
            other => Err(Error::ParseError(format!("unknown compiler '{}'", other))),
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved compiler selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    #[serde(rename = "name")]
    pub kind: CompilerKind,
    #[serde(default)]
    pub version: Version,
}

impl Compiler {
    pub fn new(kind: CompilerKind, version: impl Into<Version>) -> Self {
        Self {
            kind,
            version: version.into(),
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.version.is_empty() {
            write!(f, "@{}", self.version)?;
        }
        Ok(())
    }
}

/// A resolved variant value: a boolean switch or an enumerated choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantValue {
    Bool(bool),
    Choice(String),
}

impl VariantValue {
    pub fn choice(s: impl Into<String>) -> Self {
        VariantValue::Choice(s.into())
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantValue::Bool(b) => write!(f, "{}", b),
            VariantValue::Choice(s) => write!(f, "{}", s),
        }
    }
}

/// A fully resolved package build description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub name: String,

    #[serde(default)]
    pub version: Version,

    #[serde(default)]
    pub platform: Platform,

    #[serde(default)]
    pub compiler: Option<Compiler>,

    /// Resolved variant values, keyed by variant name
    #[serde(default)]
    pub variants: BTreeMap<String, VariantValue>,

    /// Resolved dependency specs, keyed by package name
    #[serde(default)]
    pub dependencies: BTreeMap<String, Spec>,

    /// Install prefix assigned by the host runtime (set on dependencies)
    #[serde(default)]
    pub prefix: Option<PathBuf>,
}

impl Spec {
    /// Minimal spec for a package at a version; everything else defaulted
    pub fn new(name: impl Into<String>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            platform: Platform::default(),
            compiler: None,
            variants: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            prefix: None,
        }
    }

    /// Parse a resolved spec from a TOML document (host-resolver contract)
    pub fn from_document(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("invalid spec: {}", e)))
    }

    /// Parse a spec string like `cmake@3.26.3%gcc@12 +ownlibs~qt build_type=Release`
    pub fn parse(s: &str) -> Result<Self> {
        parse_spec(s)
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn with_variant(mut self, name: impl Into<String>, value: VariantValue) -> Self {
        self.variants.insert(name.into(), value);
        self
    }

    pub fn with_switch(self, name: impl Into<String>, on: bool) -> Self {
        self.with_variant(name, VariantValue::Bool(on))
    }

    pub fn with_dependency(mut self, dep: Spec) -> Self {
        self.dependencies.insert(dep.name.clone(), dep);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Look up a boolean variant. Errors if the variant is unresolved, since
    /// argument construction requires a fully resolved spec.
    pub fn bool_variant(&self, name: &str) -> Result<bool> {
        match self.variants.get(name) {
            Some(VariantValue::Bool(b)) => Ok(*b),
            Some(VariantValue::Choice(v)) => Err(Error::InvalidVariantValue {
                package: self.name.clone(),
                variant: name.to_string(),
                value: v.clone(),
                allowed: "true, false".to_string(),
            }),
            None => Err(Error::UnresolvedVariant {
                package: self.name.clone(),
                variant: name.to_string(),
            }),
        }
    }

    /// Look up an enumerated variant
    pub fn choice_variant(&self, name: &str) -> Result<&str> {
        match self.variants.get(name) {
            Some(VariantValue::Choice(v)) => Ok(v),
            Some(VariantValue::Bool(b)) => Err(Error::InvalidVariantValue {
                package: self.name.clone(),
                variant: name.to_string(),
                value: b.to_string(),
                allowed: "an enumerated value".to_string(),
            }),
            None => Err(Error::UnresolvedVariant {
                package: self.name.clone(),
                variant: name.to_string(),
            }),
        }
    }

    /// Non-failing check used by guards: absent counts as off
    pub fn variant_is_on(&self, name: &str) -> bool {
        matches!(self.variants.get(name), Some(VariantValue::Bool(true)))
    }

    /// Does this spec's version fall in the given range set?
    pub fn satisfies(&self, ranges: impl Into<VersionRanges>) -> bool {
        ranges.into().contains(&self.version)
    }

    pub fn compiler_is(&self, kind: CompilerKind) -> bool {
        self.compiler.as_ref().is_some_and(|c| c.kind == kind)
    }

    /// Compiler family plus version-range check, e.g. intel at `:2021.6.0`
    pub fn compiler_satisfies(&self, kind: CompilerKind, ranges: impl Into<VersionRanges>) -> bool {
        self.compiler
            .as_ref()
            .is_some_and(|c| c.kind == kind && ranges.into().contains(&c.version))
    }

    pub fn dependency(&self, name: &str) -> Result<&Spec> {
        self.dependencies
            .get(name)
            .ok_or_else(|| Error::MissingDependency {
                package: self.name.clone(),
                dependency: name.to_string(),
            })
    }

    /// Install prefix of a dependency, as assigned by the host runtime
    pub fn dependency_prefix(&self, name: &str) -> Result<&Path> {
        let dep = self.dependency(name)?;
        dep.prefix.as_deref().ok_or_else(|| {
            Error::PrerequisiteMissing(format!(
                "dependency '{}' of '{}' has no install prefix",
                name, self.name
            ))
        })
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.version.is_empty() {
            write!(f, "@{}", self.version)?;
        }
        if let Some(compiler) = &self.compiler {
            write!(f, "%{}", compiler)?;
        }
        // BTreeMap ordering keeps the rendering canonical; switches first,
        // then enumerated values
        for (name, value) in &self.variants {
            match value {
                VariantValue::Bool(true) => write!(f, "+{}", name)?,
                VariantValue::Bool(false) => write!(f, "~{}", name)?,
                VariantValue::Choice(_) => {}
            }
        }
        for (name, value) in &self.variants {
            if let VariantValue::Choice(v) = value {
                write!(f, " {}={}", name, v)?;
            }
        }
        write!(f, " platform={}", self.platform)?;
        for dep in self.dependencies.values() {
            write!(f, " ^{}", dep.name)?;
            if !dep.version.is_empty() {
                write!(f, "@{}", dep.version)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Spec {
        Spec::new("cmake", "3.26.3")
            .with_compiler(Compiler::new(CompilerKind::Gcc, "12.2"))
            .with_switch("ownlibs", true)
            .with_switch("qt", false)
            .with_variant("build_type", VariantValue::choice("Release"))
            .with_dependency(Spec::new("ncurses", "6.4").with_prefix("/opt/ncurses"))
    }

    #[test]
    fn test_bool_variant_resolved() {
        let spec = sample();
        assert!(spec.bool_variant("ownlibs").unwrap());
        assert!(!spec.bool_variant("qt").unwrap());
    }

    #[test]
    fn test_bool_variant_unresolved() {
        let spec = sample();
        assert!(matches!(
            spec.bool_variant("doc"),
            Err(Error::UnresolvedVariant { .. })
        ));
    }

    #[test]
    fn test_choice_variant() {
        let spec = sample();
        assert_eq!(spec.choice_variant("build_type").unwrap(), "Release");
        assert!(matches!(
            spec.choice_variant("ownlibs"),
            Err(Error::InvalidVariantValue { .. })
        ));
    }

    #[test]
    fn test_satisfies() {
        let spec = sample();
        assert!(spec.satisfies("3.2:"));
        assert!(spec.satisfies("3.26.3"));
        assert!(!spec.satisfies(":3.17"));
    }

    #[test]
    fn test_compiler_checks() {
        let spec = sample();
        assert!(spec.compiler_is(CompilerKind::Gcc));
        assert!(spec.compiler_satisfies(CompilerKind::Gcc, "12:"));
        assert!(!spec.compiler_satisfies(CompilerKind::Gcc, ":11"));
        assert!(!spec.compiler_is(CompilerKind::Intel));
    }

    #[test]
    fn test_dependency_prefix() {
        let spec = sample();
        assert_eq!(
            spec.dependency_prefix("ncurses").unwrap(),
            Path::new("/opt/ncurses")
        );
        assert!(matches!(
            spec.dependency_prefix("zlib"),
            Err(Error::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_display_canonical() {
        let spec = sample();
        assert_eq!(
            spec.to_string(),
            "cmake@3.26.3%gcc@12.2+ownlibs~qt build_type=Release platform=linux ^ncurses@6.4"
        );
    }

    #[test]
    fn test_from_document() {
        let spec = Spec::from_document(
            r#"
name = "cmake"
version = "3.26.3"
platform = "linux"

[compiler]
name = "gcc"
version = "12.2"

[variants]
ownlibs = true
qt = false
build_type = "Release"

[dependencies.ncurses]
name = "ncurses"
version = "6.4"
prefix = "/opt/ncurses"
"#,
        )
        .unwrap();

        assert_eq!(spec.version, Version::parse("3.26.3"));
        assert!(spec.bool_variant("ownlibs").unwrap());
        assert_eq!(spec.choice_variant("build_type").unwrap(), "Release");
        assert_eq!(
            spec.dependency_prefix("ncurses").unwrap(),
            Path::new("/opt/ncurses")
        );
    }

    #[test]
    fn test_from_document_invalid() {
        assert!(Spec::from_document("not toml {").is_err());
    }
}
