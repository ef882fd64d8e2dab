// src/packages/wxpropgrid.rs

//! wxPropertyGrid, a property-sheet control for wxWidgets. Classic
//! configure/make/install; the configure script needs the wx install pointed
//! out explicitly.

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::recipe::{DependencyDecl, Recipe, VersionDecl};
use crate::spec::Spec;
use crate::version::Version;

pub struct Wxpropgrid;

impl Recipe for Wxpropgrid {
    fn name(&self) -> &'static str {
        "wxpropgrid"
    }

    fn homepage(&self) -> &'static str {
        "http://wxpropgrid.sourceforge.net"
    }

    fn url_for_version(&self, version: &Version) -> String {
        format!(
            "http://prdownloads.sourceforge.net/wxpropgrid/wxpropgrid-{}-src.tar.gz",
            version
        )
    }

    fn versions(&self) -> Vec<VersionDecl> {
        vec![VersionDecl::md5("1.4.15", "f44b5cd6fd60718bacfabbf7994f1e93")]
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        vec![DependencyDecl::new("wx")]
    }

    fn phases(&self) -> &'static [Phase] {
        &[Phase::Bootstrap, Phase::Build, Phase::Install]
    }

    fn plan(&self, phase: Phase, spec: &Spec, ws: &Workspace) -> Result<Option<Invocation>> {
        let inv = match phase {
            Phase::Bootstrap => {
                let wx_prefix = spec.dependency_prefix("wx")?;
                Invocation::new("./configure")
                    .arg(format!("--prefix={}", ws.prefix.display()))
                    .arg(format!("--with-wxdir={}/bin", wx_prefix.display()))
                    .arg("--enable-unicode")
            }
            Phase::Build => Invocation::new("make"),
            Phase::Install => Invocation::new("make").arg("install"),
            _ => return Ok(None),
        };
        Ok(Some(inv.current_dir(&ws.source_dir)))
    }
}
