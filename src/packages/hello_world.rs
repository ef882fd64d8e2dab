// src/packages/hello_world.rs

//! Minimal Makefile-driven package; everything the Makefile needs (install
//! prefix, MPI toolchain selection) travels through the environment rather
//! than the command line.

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::recipe::{DependencyDecl, Guard, Recipe, VariantDecl, VersionDecl};
use crate::spec::Spec;
use crate::version::Version;
use std::collections::BTreeMap;

pub struct HelloWorld;

impl Recipe for HelloWorld {
    fn name(&self) -> &'static str {
        "hello-world"
    }

    fn homepage(&self) -> &'static str {
        "https://github.com/lucaparisi91/hello_world"
    }

    fn url_for_version(&self, version: &Version) -> String {
        format!(
            "https://github.com/lucaparisi91/hello_world/archive/refs/tags/v{}.tar.gz",
            version
        )
    }

    fn versions(&self) -> Vec<VersionDecl> {
        vec![
            VersionDecl::sha256(
                "1.0",
                "a85ab0fd5a09caf8b214ac3041c0e69fb3deb098b9a6464d1eff6cfe4d8e0510",
            ),
            VersionDecl::sha256(
                "2.0",
                "91dd03780d2cd9cf6c8905bea48c6f41ab160ba48555e642e54cf4818b6361d4",
            ),
        ]
    }

    fn variants(&self) -> Vec<VariantDecl> {
        vec![VariantDecl::switch(
            "mpi",
            false,
            "Builds a MPI Hello World! example",
        )]
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        vec![DependencyDecl::new("mpi").when(Guard::variant_on("mpi"))]
    }

    fn environment(&self, spec: &Spec, workspace: &Workspace) -> Result<BTreeMap<String, String>> {
        let mut env = BTreeMap::new();
        // The Makefile installs to $PREFIX
        env.insert("PREFIX".to_string(), workspace.prefix.display().to_string());
        if spec.bool_variant("mpi")? {
            env.insert("MPI".to_string(), "TRUE".to_string());
            env.insert("CXX".to_string(), "mpicxx".to_string());
            env.insert("CC".to_string(), "mpicc".to_string());
            env.insert("FC".to_string(), "mpifort".to_string());
        }
        Ok(env)
    }

    fn phases(&self) -> &'static [Phase] {
        &[Phase::Build, Phase::Install]
    }

    fn plan(&self, phase: Phase, _spec: &Spec, ws: &Workspace) -> Result<Option<Invocation>> {
        let inv = match phase {
            Phase::Build => Invocation::new("make"),
            Phase::Install => Invocation::new("make").arg("install"),
            _ => return Ok(None),
        };
        Ok(Some(inv.current_dir(&ws.source_dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::pipeline::plan;

    fn spec() -> Spec {
        Spec::new("hello-world", "1.0").with_switch("mpi", false)
    }

    fn workspace() -> Workspace {
        Workspace::new("/tmp/hello/src", "/opt/hello")
    }

    #[test]
    fn test_prefix_in_environment() {
        let built = plan(&HelloWorld, &spec(), &workspace()).unwrap();
        for stage in &built.stages {
            assert_eq!(stage.invocation.env.get("PREFIX").unwrap(), "/opt/hello");
        }
    }

    #[test]
    fn test_mpi_toggles_exactly_the_toolchain_entries() {
        let ws = workspace();
        let serial = HelloWorld.environment(&spec(), &ws).unwrap();
        let mpi = HelloWorld
            .environment(&spec().with_switch("mpi", true), &ws)
            .unwrap();

        let added: Vec<(&String, &String)> = mpi
            .iter()
            .filter(|(k, _)| !serial.contains_key(*k))
            .collect();
        assert_eq!(
            added,
            [
                (&"CC".to_string(), &"mpicc".to_string()),
                (&"CXX".to_string(), &"mpicxx".to_string()),
                (&"FC".to_string(), &"mpifort".to_string()),
                (&"MPI".to_string(), &"TRUE".to_string()),
            ]
        );
        // Everything else is untouched
        assert_eq!(serial.get("PREFIX"), mpi.get("PREFIX"));
        assert_eq!(serial.len() + 4, mpi.len());
    }

    #[test]
    fn test_mpi_dependency_guarded() {
        let dep = &HelloWorld.dependencies()[0];
        assert!(dep.applies_to(&spec().with_switch("mpi", true)));
        assert!(!dep.applies_to(&spec()));
    }

    #[test]
    fn test_two_stage_plan() {
        let built = plan(&HelloWorld, &spec(), &workspace()).unwrap();
        let rendered: Vec<String> = built
            .stages
            .iter()
            .map(|s| s.invocation.to_string())
            .collect();
        assert_eq!(rendered, ["make", "make install"]);
    }

    #[test]
    fn test_release_urls() {
        assert_eq!(
            HelloWorld.url_for_version(&Version::parse("2.0")),
            "https://github.com/lucaparisi91/hello_world/archive/refs/tags/v2.0.tar.gz"
        );
        assert_eq!(HelloWorld.versions().len(), 2);
    }
}
