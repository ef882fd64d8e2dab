// src/build/mod.rs

//! Build planning primitives
//!
//! A recipe turns a resolved [`Spec`](crate::spec::Spec) plus a [`Workspace`]
//! into [`Invocation`]s: ordered argument lists and environment overrides for
//! the external build tool. Argument order is preserved exactly as recipes
//! append; nothing here reorders or deduplicates tokens, because the wrapped
//! tools are flag-order sensitive.

pub mod exec;
pub mod pipeline;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Named build stages, in their canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Edit,
    Bootstrap,
    Build,
    Test,
    Install,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Edit => "edit",
            Phase::Bootstrap => "bootstrap",
            Phase::Build => "build",
            Phase::Test => "test",
            Phase::Install => "install",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One external tool invocation: program, ordered arguments, environment
/// overrides applied to the child process only, and an optional working
/// directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub workdir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            workdir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Host-runtime facts about one package's build: where the sources were
/// staged, where the result installs, and what the runtime computed for us
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Unpacked source tree
    pub source_dir: PathBuf,
    /// Install prefix assigned to this package
    pub prefix: PathBuf,
    /// Parallel job count
    pub jobs: u32,
    /// Runtime library search paths for the installed artifacts
    pub rpaths: Vec<PathBuf>,
    /// Install prefixes of dependencies, for build-system search paths
    pub prefix_paths: Vec<PathBuf>,
    /// Whether the recipe's test stage should run
    pub run_tests: bool,
}

impl Workspace {
    pub fn new(source_dir: impl Into<PathBuf>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            prefix: prefix.into(),
            jobs: detect_jobs(),
            rpaths: Vec::new(),
            prefix_paths: Vec::new(),
            run_tests: false,
        }
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_rpaths<I, P>(mut self, rpaths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.rpaths = rpaths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prefix_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.prefix_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }
}

fn detect_jobs() -> u32 {
    std::thread::available_parallelism()
        .map(|p| p.get() as u32)
        .unwrap_or(4)
}

/// List separator CMake expects in `-D` cache values
pub const CMAKE_LIST_SEPARATOR: char = ';';

/// Join paths with a declared separator, preserving input order
pub fn join_list<P: AsRef<Path>>(paths: &[P], separator: char) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_order_preserved() {
        let inv = Invocation::new("./bootstrap")
            .arg("--prefix=/opt/cmake")
            .args(["--system-libs", "--system-curl", "--system-curl"]);
        // Verbatim appends: no reordering, no deduplication
        assert_eq!(
            inv.args,
            vec!["--prefix=/opt/cmake", "--system-libs", "--system-curl", "--system-curl"]
        );
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("make").arg("-j4").arg("install");
        assert_eq!(inv.to_string(), "make -j4 install");
    }

    #[test]
    fn test_workspace_defaults() {
        let ws = Workspace::new("/tmp/src", "/opt/pkg");
        assert!(ws.jobs > 0);
        assert!(!ws.run_tests);
        assert!(ws.rpaths.is_empty());
    }

    #[test]
    fn test_join_list_preserves_order() {
        let paths = [PathBuf::from("/opt/b"), PathBuf::from("/opt/a")];
        assert_eq!(join_list(&paths, CMAKE_LIST_SEPARATOR), "/opt/b;/opt/a");
        assert_eq!(join_list(&paths, ':'), "/opt/b:/opt/a");
    }

    #[test]
    fn test_join_list_empty() {
        let paths: [PathBuf; 0] = [];
        assert_eq!(join_list(&paths, ';'), "");
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Bootstrap.as_str(), "bootstrap");
        assert_eq!(Phase::Install.to_string(), "install");
    }
}
