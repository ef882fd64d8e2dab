// src/recipe/mod.rs

//! Recipe surface: declarations plus the phase pipeline
//!
//! A recipe is a thin declarative wrapper around an external build tool: it
//! names where sources come from, which variants and dependencies exist, and
//! how each build stage is invoked. Stage planning is an explicit pipeline
//! rather than a set of inherited hooks: the recipe declares an ordered
//! subset of [`Phase`]s and produces one pure [`Invocation`] per active
//! phase.
//! Environment requirements are returned as an overrides map applied to the
//! child process only; a recipe never mutates the calling process's
//! environment.

mod declare;
mod validate;
pub mod when;

pub use declare::{
    Checksum, Conflict, DependencyDecl, PatchDecl, ResourceDecl, VariantDecl, VariantSetting,
    VersionDecl, VersionSource,
};
pub use validate::validate;
pub use when::Guard;

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::spec::Spec;
use crate::version::Version;
use std::collections::BTreeMap;

/// The static declaration and build-planning surface of one package
pub trait Recipe: Sync {
    fn name(&self) -> &'static str;

    fn homepage(&self) -> &'static str;

    /// Download URL for a concrete version
    fn url_for_version(&self, version: &Version) -> String;

    /// Known versions with their content checksums
    fn versions(&self) -> Vec<VersionDecl>;

    fn variants(&self) -> Vec<VariantDecl> {
        Vec::new()
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        Vec::new()
    }

    fn patches(&self) -> Vec<PatchDecl> {
        Vec::new()
    }

    fn resources(&self) -> Vec<ResourceDecl> {
        Vec::new()
    }

    fn conflicts(&self) -> Vec<Conflict> {
        Vec::new()
    }

    /// Sources must be fetched by hand (license-gated upstream)
    fn manual_download(&self) -> bool {
        false
    }

    /// The ordered stages this recipe runs
    fn phases(&self) -> &'static [Phase];

    /// Environment overrides applied to every stage's child process
    fn environment(
        &self,
        _spec: &Spec,
        _workspace: &Workspace,
    ) -> Result<BTreeMap<String, String>> {
        Ok(BTreeMap::new())
    }

    /// Plan one stage. Pure: same spec and workspace, same invocation.
    /// `None` means the stage has nothing to run for this spec.
    fn plan(&self, phase: Phase, spec: &Spec, workspace: &Workspace)
    -> Result<Option<Invocation>>;

    /// Recover an installed version from the tool's `--version` output
    fn determine_version(&self, _output: &str) -> Option<Version> {
        None
    }
}
