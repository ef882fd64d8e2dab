// src/spec/parse.rs

//! Spec string parsing
//!
//! Accepts the compact rendering produced by `Display` on [`Spec`]:
//!
//! ```text
//! cmake@3.26.3%gcc@12.2+ownlibs~qt build_type=Release platform=linux ^ncurses@6.4
//! ```
//!
//! `+name`/`~name` toggle boolean variants, `name=value` sets an enumerated
//! variant (`platform=` is reserved), `%compiler[@version]` selects the
//! compiler, and `^dep[@version]` attaches a bare dependency spec.

use super::{Compiler, CompilerKind, Platform, Spec, VariantValue};
use crate::error::{Error, Result};
use crate::version::Version;

/// Parse one spec string into a [`Spec`]
pub fn parse_spec(s: &str) -> Result<Spec> {
    let mut tokens = tokenize(s);
    if tokens.is_empty() {
        return Err(Error::ParseError("empty spec string".to_string()));
    }

    let head = tokens.remove(0);
    if head.starts_with(['+', '~', '%', '^']) || head.contains('=') {
        return Err(Error::ParseError(format!(
            "spec string must start with a package name, got '{}'",
            head
        )));
    }
    let (name, version) = split_versioned(&head);
    let mut spec = Spec::new(name, version);

    for token in tokens {
        if let Some(rest) = token.strip_prefix('+') {
            require_name(rest, &token)?;
            spec.variants
                .insert(rest.to_string(), VariantValue::Bool(true));
        } else if let Some(rest) = token.strip_prefix('~') {
            require_name(rest, &token)?;
            spec.variants
                .insert(rest.to_string(), VariantValue::Bool(false));
        } else if let Some(rest) = token.strip_prefix('%') {
            require_name(rest, &token)?;
            let (kind, version) = split_versioned(rest);
            spec.compiler = Some(Compiler {
                kind: CompilerKind::parse(&kind)?,
                version,
            });
        } else if let Some(rest) = token.strip_prefix('^') {
            require_name(rest, &token)?;
            let (dep_name, dep_version) = split_versioned(rest);
            let dep = Spec::new(dep_name, dep_version);
            spec.dependencies.insert(dep.name.clone(), dep);
        } else if let Some((key, value)) = token.split_once('=') {
            require_name(key, &token)?;
            require_name(value, &token)?;
            if key == "platform" {
                spec.platform = Platform::parse(value)?;
            } else {
                spec.variants
                    .insert(key.to_string(), VariantValue::choice(value));
            }
        } else {
            return Err(Error::ParseError(format!(
                "unexpected token '{}' in spec string",
                token
            )));
        }
    }

    // Dependencies build on the same platform as the root
    let platform = spec.platform;
    for dep in spec.dependencies.values_mut() {
        dep.platform = platform;
    }

    Ok(spec)
}

/// Split on whitespace, then again in front of every glued sigil so that
/// `+ownlibs~qt%gcc` yields three tokens
fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in s.split_whitespace() {
        let mut current = String::new();
        for c in word.chars() {
            if matches!(c, '+' | '~' | '%' | '^') && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }
    tokens
}

fn split_versioned(s: &str) -> (String, Version) {
    match s.split_once('@') {
        Some((name, version)) => (name.to_string(), Version::parse(version)),
        None => (s.to_string(), Version::default()),
    }
}

fn require_name(name: &str, token: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ParseError(format!(
            "missing name in spec token '{}'",
            token
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let spec = parse_spec("hello-world@1.0").unwrap();
        assert_eq!(spec.name, "hello-world");
        assert_eq!(spec.version, Version::parse("1.0"));
        assert_eq!(spec.platform, Platform::Linux);
        assert!(spec.variants.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let spec = parse_spec(
            "cmake@3.26.3%gcc@12.2+ownlibs~qt build_type=Release platform=darwin ^ncurses@6.4",
        )
        .unwrap();
        assert_eq!(spec.name, "cmake");
        assert!(spec.bool_variant("ownlibs").unwrap());
        assert!(!spec.bool_variant("qt").unwrap());
        assert_eq!(spec.choice_variant("build_type").unwrap(), "Release");
        assert_eq!(spec.platform, Platform::Darwin);
        let compiler = spec.compiler.as_ref().unwrap();
        assert_eq!(compiler.kind, CompilerKind::Gcc);
        assert_eq!(compiler.version, Version::parse("12.2"));
        let dep = spec.dependency("ncurses").unwrap();
        assert_eq!(dep.version, Version::parse("6.4"));
        assert_eq!(dep.platform, Platform::Darwin);
    }

    #[test]
    fn test_parse_glued_variants() {
        let spec = parse_spec("benchio@1.0.5+hdf5~netcdf~adios2").unwrap();
        assert!(spec.bool_variant("hdf5").unwrap());
        assert!(!spec.bool_variant("netcdf").unwrap());
        assert!(!spec.bool_variant("adios2").unwrap());
    }

    #[test]
    fn test_display_roundtrip() {
        let original =
            "cmake@3.26.3%gcc@12.2+ownlibs~qt build_type=Release platform=linux ^ncurses@6.4";
        let spec = parse_spec(original).unwrap();
        let reparsed = parse_spec(&spec.to_string()).unwrap();
        assert_eq!(spec, reparsed);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_spec("").is_err());
        assert!(parse_spec("+qt").is_err());
        assert!(parse_spec("cmake +").is_err());
        assert!(parse_spec("cmake platform=beos").is_err());
        assert!(parse_spec("cmake %mystery").is_err());
        assert!(parse_spec("cmake bogus").is_err());
    }
}
