// src/packages/benchio.rs

//! Simple parallel I/O benchmark. Optional backends (HDF5, NetCDF, ADIOS2)
//! each pair a switch variant with a guarded dependency and a `-DUSE_*`
//! configure flag.

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::packages::{CMAKE_BUILD_TYPES, cmake_configure};
use crate::recipe::{DependencyDecl, Guard, Recipe, VariantDecl, VariantSetting, VersionDecl};
use crate::spec::Spec;
use crate::version::Version;

pub struct Benchio;

impl Recipe for Benchio {
    fn name(&self) -> &'static str {
        "benchio"
    }

    fn homepage(&self) -> &'static str {
        "https://github.com/lucaparisi91/benchio"
    }

    // Release tags carry no 'v' prefix
    fn url_for_version(&self, version: &Version) -> String {
        format!(
            "https://github.com/lucaparisi91/benchio/archive/refs/tags/{}.tar.gz",
            version
        )
    }

    fn versions(&self) -> Vec<VersionDecl> {
        vec![VersionDecl::sha256(
            "1.0.5",
            "7e6cfb0c13f0b9c8fbab877ca1350bf41a41cb5fa3f557f52f72d1d13127d842",
        )]
    }

    fn variants(&self) -> Vec<VariantDecl> {
        vec![
            VariantDecl::choice("build_type", "Release", CMAKE_BUILD_TYPES, "CMake build type"),
            VariantDecl::switch("hdf5", false, "Performs an HDF5 write performance test"),
            VariantDecl::switch("netcdf", false, "Performs a NETCDF write performance test"),
            VariantDecl::switch("adios2", false, "Performs a ADIOS2 write performance test"),
        ]
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        vec![
            DependencyDecl::new("mpi"),
            DependencyDecl::new("hdf5")
                .when(Guard::variant_on("hdf5"))
                .setting(VariantSetting::On("mpi")),
            DependencyDecl::new("netcdf-fortran").when(Guard::variant_on("netcdf")),
            DependencyDecl::new("adios2").when(Guard::variant_on("adios2")),
        ]
    }

    fn phases(&self) -> &'static [Phase] {
        &[Phase::Bootstrap, Phase::Build, Phase::Install]
    }

    fn plan(&self, phase: Phase, spec: &Spec, ws: &Workspace) -> Result<Option<Invocation>> {
        let inv = match phase {
            Phase::Bootstrap => {
                let mut inv = cmake_configure(spec, ws);
                if spec.bool_variant("hdf5")? {
                    inv = inv.arg("-DUSE_HDF5=TRUE");
                }
                if spec.bool_variant("netcdf")? {
                    inv = inv.arg("-DUSE_NETCDF=TRUE");
                }
                if spec.bool_variant("adios2")? {
                    inv = inv.arg("-DUSE_ADIOS2=TRUE");
                }
                inv
            }
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
