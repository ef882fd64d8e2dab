// src/packages/mod.rs

//! The recipe catalog
//!
//! One module per package. Recipes are stateless unit structs; the catalog
//! is a fixed table the host runtime looks packages up in.

mod benchio;
mod castep;
mod cmake;
mod hello_world;
mod wxpropgrid;

pub use benchio::Benchio;
pub use castep::Castep;
pub use cmake::Cmake;
pub use hello_world::HelloWorld;
pub use wxpropgrid::Wxpropgrid;

use crate::build::{Invocation, Workspace};
use crate::recipe::Recipe;
use crate::spec::{Spec, VariantValue};

static CATALOG: [&dyn Recipe; 5] = [&Cmake, &HelloWorld, &Benchio, &Castep, &Wxpropgrid];

/// All recipes in the catalog
pub fn catalog() -> &'static [&'static dyn Recipe] {
    &CATALOG
}

/// Look a recipe up by package name
pub fn find(name: &str) -> Option<&'static dyn Recipe> {
    CATALOG.iter().copied().find(|r| r.name() == name)
}

/// Allowed values for the conventional CMake `build_type` variant
pub(crate) const CMAKE_BUILD_TYPES: &[&str] = &["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

/// Seed configure invocation shared by the CMake-based recipes: the source
/// dir, the install prefix, and the build type if the recipe declares one
pub(crate) fn cmake_configure(spec: &Spec, workspace: &Workspace) -> Invocation {
    let mut inv = Invocation::new("cmake")
        .arg(workspace.source_dir.display().to_string())
        .arg(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            workspace.prefix.display()
        ));
    if let Some(VariantValue::Choice(build_type)) = spec.variants.get("build_type") {
        inv = inv.arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));
    }
    inv.current_dir(&workspace.source_dir)
}
