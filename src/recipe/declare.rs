// src/recipe/declare.rs

//! Static recipe declarations
//!
//! These types carry the declarative surface of a recipe: known versions
//! with content checksums, variant declarations, dependency and patch
//! declarations with applicability guards, staged resources, and conflict
//! rules. They are consumed by the host resolver; the crate itself only
//! evaluates guards and conflicts against an already-resolved spec.

use crate::recipe::when::Guard;
use crate::spec::{Spec, VariantValue};
use crate::version::{Version, VersionRanges};
use std::fmt;

/// Content checksum of a source artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    Sha256(&'static str),
    /// Legacy digests carried over from old recipe catalogs
    Md5(&'static str),
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Sha256(d) => write!(f, "sha256:{}", d),
            Checksum::Md5(d) => write!(f, "md5:{}", d),
        }
    }
}

/// Where a declared version comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// Release archive verified by checksum
    Archive(Checksum),
    /// Moving branch of the upstream repository
    Branch(&'static str),
}

/// One known version of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDecl {
    pub version: Version,
    pub source: VersionSource,
}

impl VersionDecl {
    pub fn sha256(version: &str, digest: &'static str) -> Self {
        Self {
            version: Version::parse(version),
            source: VersionSource::Archive(Checksum::Sha256(digest)),
        }
    }

    pub fn md5(version: &str, digest: &'static str) -> Self {
        Self {
            version: Version::parse(version),
            source: VersionSource::Archive(Checksum::Md5(digest)),
        }
    }

    pub fn branch(version: &str, branch: &'static str) -> Self {
        Self {
            version: Version::parse(version),
            source: VersionSource::Branch(branch),
        }
    }
}

/// A declared build option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    pub name: &'static str,
    pub default: VariantValue,
    pub description: &'static str,
    /// Allowed values for enumerated variants; `None` for booleans
    pub values: Option<&'static [&'static str]>,
}

impl VariantDecl {
    /// Boolean variant
    pub fn switch(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            default: VariantValue::Bool(default),
            description,
            values: None,
        }
    }

    /// Enumerated variant with a fixed value set
    pub fn choice(
        name: &'static str,
        default: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default: VariantValue::Choice(default.to_string()),
            description,
            values: Some(values),
        }
    }

    /// Does a resolved value fall inside this declaration?
    pub fn allows(&self, value: &VariantValue) -> bool {
        match (self.values, value) {
            (None, VariantValue::Bool(_)) => true,
            (Some(values), VariantValue::Choice(v)) => values.contains(&v.as_str()),
            _ => false,
        }
    }

    pub fn allowed_values(&self) -> String {
        match self.values {
            Some(values) => values.join(", "),
            None => "true, false".to_string(),
        }
    }
}

/// Constraint a dependency declaration places on the dependency's own spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSetting {
    On(&'static str),
    Off(&'static str),
    Eq(&'static str, &'static str),
}

impl fmt::Display for VariantSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSetting::On(name) => write!(f, "+{}", name),
            VariantSetting::Off(name) => write!(f, "~{}", name),
            VariantSetting::Eq(name, value) => write!(f, "{}={}", name, value),
        }
    }
}

/// A declared dependency with an applicability guard
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyDecl {
    pub name: &'static str,
    pub range: VersionRanges,
    pub when: Guard,
    /// Needed to build, not at run time
    pub build_only: bool,
    /// Variant constraints on the dependency itself, e.g. `hdf5+mpi`
    pub settings: Vec<VariantSetting>,
}

impl DependencyDecl {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            range: VersionRanges::any(),
            when: Guard::Always,
            build_only: false,
            settings: Vec::new(),
        }
    }

    pub fn range(mut self, ranges: &str) -> Self {
        self.range = VersionRanges::parse(ranges);
        self
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = guard;
        self
    }

    pub fn build_only(mut self) -> Self {
        self.build_only = true;
        self
    }

    pub fn setting(mut self, setting: VariantSetting) -> Self {
        self.settings.push(setting);
        self
    }

    pub fn applies_to(&self, spec: &Spec) -> bool {
        self.when.evaluate(spec)
    }
}

/// A patch with an applicability guard
#[derive(Debug, Clone, PartialEq)]
pub struct PatchDecl {
    pub file: &'static str,
    pub sha256: Option<&'static str>,
    /// Strip level handed to the patch tool
    pub strip: u32,
    pub when: Guard,
}

impl PatchDecl {
    pub fn new(file: &'static str) -> Self {
        Self {
            file,
            sha256: None,
            strip: 1,
            when: Guard::Always,
        }
    }

    pub fn sha256(mut self, digest: &'static str) -> Self {
        self.sha256 = Some(digest);
        self
    }

    pub fn strip(mut self, strip: u32) -> Self {
        self.strip = strip;
        self
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = guard;
        self
    }

    pub fn applies_to(&self, spec: &Spec) -> bool {
        self.when.evaluate(spec)
    }
}

/// An auxiliary archive staged into the workspace before the build
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDecl {
    pub name: &'static str,
    pub url: &'static str,
    pub checksum: Checksum,
    /// Directory under the workspace source dir to stage into
    pub placement: &'static str,
    pub when: Guard,
}

impl ResourceDecl {
    pub fn new(
        name: &'static str,
        url: &'static str,
        checksum: Checksum,
        placement: &'static str,
    ) -> Self {
        Self {
            name,
            url,
            checksum,
            placement,
            when: Guard::Always,
        }
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = guard;
        self
    }

    pub fn applies_to(&self, spec: &Spec) -> bool {
        self.when.evaluate(spec)
    }
}

/// An unsupported spec combination; triggering one aborts the build before
/// any subprocess is spawned
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub when: Guard,
    pub message: &'static str,
}

impl Conflict {
    pub fn new(when: Guard, message: &'static str) -> Self {
        Self { when, message }
    }

    pub fn triggered_by(&self, spec: &Spec) -> bool {
        self.when.evaluate(spec)
    }
}
