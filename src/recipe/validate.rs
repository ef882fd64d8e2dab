// src/recipe/validate.rs

//! Spec validation against a recipe's declarations
//!
//! Runs before anything is planned or spawned. Hard failures: a variant the
//! recipe never declared, a declared variant the resolver left unresolved, a
//! value outside the allowed set, or a triggered conflict. Soft findings
//! (missing patch checksums, guarded dependencies absent from the spec) come
//! back as warnings for the host runtime to report.

use crate::error::{Error, Result};
use crate::recipe::Recipe;
use crate::spec::Spec;

pub fn validate(recipe: &dyn Recipe, spec: &Spec) -> Result<Vec<String>> {
    if spec.name != recipe.name() {
        return Err(Error::ParseError(format!(
            "spec is for '{}' but recipe is '{}'",
            spec.name,
            recipe.name()
        )));
    }

    let mut warnings = Vec::new();
    let variants = recipe.variants();

    for (name, value) in &spec.variants {
        let Some(decl) = variants.iter().find(|d| d.name == name) else {
            return Err(Error::UnknownVariant {
                package: spec.name.clone(),
                variant: name.clone(),
            });
        };
        if !decl.allows(value) {
            return Err(Error::InvalidVariantValue {
                package: spec.name.clone(),
                variant: name.clone(),
                value: value.to_string(),
                allowed: decl.allowed_values(),
            });
        }
    }

    // The builder requires a fully resolved spec: every declared variant
    // must carry a value
    for decl in &variants {
        if !spec.variants.contains_key(decl.name) {
            return Err(Error::UnresolvedVariant {
                package: spec.name.clone(),
                variant: decl.name.to_string(),
            });
        }
    }

    for conflict in recipe.conflicts() {
        if conflict.triggered_by(spec) {
            return Err(Error::Conflict {
                package: spec.name.clone(),
                message: conflict.message.to_string(),
            });
        }
    }

    for patch in recipe.patches() {
        if patch.applies_to(spec) && patch.sha256.is_none() {
            warnings.push(format!("patch {} has no checksum", patch.file));
        }
    }

    // Dependency presence is the resolver's contract; flag gaps, don't fail
    for dep in recipe.dependencies() {
        if dep.applies_to(spec) && !spec.dependencies.contains_key(dep.name) {
            warnings.push(format!(
                "dependency '{}' applies to this spec but was not resolved",
                dep.name
            ));
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Invocation, Phase, Workspace};
    use crate::recipe::when::Guard;
    use crate::recipe::{Conflict, DependencyDecl, PatchDecl, VariantDecl, VersionDecl};
    use crate::spec::{CompilerKind, VariantValue};
    use crate::version::Version;

    struct Widget;

    impl Recipe for Widget {
        fn name(&self) -> &'static str {
            "widget"
        }

        fn homepage(&self) -> &'static str {
            "https://example.com/widget"
        }

        fn url_for_version(&self, version: &Version) -> String {
            format!("https://example.com/widget-{}.tar.gz", version)
        }

        fn versions(&self) -> Vec<VersionDecl> {
            vec![VersionDecl::sha256("1.0", "abc")]
        }

        fn variants(&self) -> Vec<VariantDecl> {
            vec![
                VariantDecl::switch("gui", false, "Build the GUI"),
                VariantDecl::choice("mode", "fast", &["fast", "safe"], "Build mode"),
            ]
        }

        fn dependencies(&self) -> Vec<DependencyDecl> {
            vec![DependencyDecl::new("toolkit").when(Guard::variant_on("gui"))]
        }

        fn patches(&self) -> Vec<PatchDecl> {
            vec![PatchDecl::new("fix.patch").when(Guard::version("1.0"))]
        }

        fn conflicts(&self) -> Vec<Conflict> {
            vec![Conflict::new(
                Guard::all([Guard::variant_on("gui"), Guard::compiler(CompilerKind::Nvhpc)]),
                "the GUI does not build with nvhpc",
            )]
        }

        fn phases(&self) -> &'static [Phase] {
            &[Phase::Build]
        }

        fn plan(
            &self,
            _phase: Phase,
            _spec: &Spec,
            _workspace: &Workspace,
        ) -> crate::error::Result<Option<Invocation>> {
            Ok(Some(Invocation::new("make")))
        }
    }

    fn resolved() -> Spec {
        Spec::new("widget", "1.0")
            .with_switch("gui", false)
            .with_variant("mode", VariantValue::choice("fast"))
    }

    #[test]
    fn test_valid_spec() {
        let warnings = validate(&Widget, &resolved()).unwrap();
        // fix.patch applies and carries no checksum
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("fix.patch"));
    }

    #[test]
    fn test_wrong_package() {
        let spec = Spec::new("gadget", "1.0");
        assert!(validate(&Widget, &spec).is_err());
    }

    #[test]
    fn test_unknown_variant() {
        let spec = resolved().with_switch("lasers", true);
        assert!(matches!(
            validate(&Widget, &spec),
            Err(Error::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_unresolved_variant() {
        let mut spec = resolved();
        spec.variants.remove("mode");
        assert!(matches!(
            validate(&Widget, &spec),
            Err(Error::UnresolvedVariant { .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        let spec = resolved().with_variant("mode", VariantValue::choice("reckless"));
        assert!(matches!(
            validate(&Widget, &spec),
            Err(Error::InvalidVariantValue { .. })
        ));
    }

    #[test]
    fn test_conflict_blocks() {
        let spec = resolved()
            .with_switch("gui", true)
            .with_compiler(crate::spec::Compiler::new(CompilerKind::Nvhpc, "23.1"))
            .with_dependency(Spec::new("toolkit", "2.0"));
        let err = validate(&Widget, &spec).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(err.to_string().contains("nvhpc"));
    }

    #[test]
    fn test_missing_dependency_is_warning() {
        let spec = resolved().with_switch("gui", true);
        let warnings = validate(&Widget, &spec).unwrap();
        assert!(warnings.iter().any(|w| w.contains("toolkit")));
    }
}
