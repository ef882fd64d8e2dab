// src/packages/castep.rs

//! CASTEP electronic-structure code. The source archive sits behind a
//! licence wall, so the host runtime must be handed the tarball rather than
//! fetch it.

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::packages::cmake_configure;
use crate::recipe::{DependencyDecl, Guard, PatchDecl, Recipe, VersionDecl};
use crate::spec::Spec;
use crate::version::Version;

pub struct Castep;

impl Recipe for Castep {
    fn name(&self) -> &'static str {
        "castep"
    }

    fn homepage(&self) -> &'static str {
        "https://www.castep.org"
    }

    // Licence-walled: the archive must already sit in the staging area
    fn url_for_version(&self, version: &Version) -> String {
        format!("file://./CASTEP-{}.tar.gz", version)
    }

    fn versions(&self) -> Vec<VersionDecl> {
        vec![VersionDecl::sha256(
            "24.1",
            "97d77a4f3ce3f5c5b87e812f15a2c2cb23918acd7034c91a872b6d66ea0f7dbb",
        )]
    }

    fn manual_download(&self) -> bool {
        true
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        vec![
            DependencyDecl::new("cray-fftw"),
            DependencyDecl::new("python").build_only(),
            DependencyDecl::new("mpi"),
            DependencyDecl::new("blas"),
            DependencyDecl::new("lapack"),
            DependencyDecl::new("libxc"),
        ]
    }

    fn patches(&self) -> Vec<PatchDecl> {
        vec![
            PatchDecl::new("24.1.patch").when(Guard::version("24.1")),
            // Rename of the libxc interface module
            PatchDecl::new("libxc_mod.patch").when(Guard::version("24.1")),
        ]
    }

    fn phases(&self) -> &'static [Phase] {
        &[Phase::Bootstrap, Phase::Build, Phase::Install]
    }

    fn plan(&self, phase: Phase, spec: &Spec, ws: &Workspace) -> Result<Option<Invocation>> {
        let inv = match phase {
            Phase::Bootstrap => cmake_configure(spec, ws)
                .arg("-DBUILD=fast")
                .arg("-DCOMMS_ARCH=mpi")
                .arg("-DFFT=fftw3")
                .arg("-DWITH_LIBXC=ON"),
            Phase::Build => Invocation::new("make")
                .arg(format!("-j{}", ws.jobs))
                .current_dir(&ws.source_dir),
            Phase::Install => Invocation::new("make")
                .arg("install")
                .current_dir(&ws.source_dir),
            _ => return Ok(None),
        };
        Ok(Some(inv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::pipeline::plan;

    fn spec() -> Spec {
        Spec::new("castep", "24.1")
            .with_dependency(Spec::new("cray-fftw", "3.3.10"))
            .with_dependency(Spec::new("python", "3.11.5"))
            .with_dependency(Spec::new("mpi", "8.1"))
            .with_dependency(Spec::new("blas", "0.3.24"))
            .with_dependency(Spec::new("lapack", "3.11"))
            .with_dependency(Spec::new("libxc", "6.2.2"))
    }

    #[test]
    fn test_configure_build_settings() {
        let ws = Workspace::new("/tmp/castep/src", "/opt/castep");
        let built = plan(&Castep, &spec(), &ws).unwrap();
        let args = &built.stage(Phase::Bootstrap).unwrap().invocation.args;
        assert!(args.contains(&"-DBUILD=fast".to_string()));
        assert!(args.contains(&"-DCOMMS_ARCH=mpi".to_string()));
        assert!(args.contains(&"-DFFT=fftw3".to_string()));
        assert!(args.contains(&"-DWITH_LIBXC=ON".to_string()));
    }

    #[test]
    fn test_manual_download() {
        assert!(Castep.manual_download());
    }

    #[test]
    fn test_patches_apply_to_241_only() {
        for patch in Castep.patches() {
            assert!(patch.applies_to(&spec()));
            assert!(!patch.applies_to(&Spec::new("castep", "25.11")));
        }
    }
}
