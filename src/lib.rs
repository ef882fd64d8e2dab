// src/lib.rs

//! Crucible Recipe Catalog
//!
//! Declarative build recipes for scientific software, plus the machinery to
//! turn a resolved spec into concrete tool invocations.
//!
//! # Architecture
//!
//! - Specs: Immutable resolved build descriptions (version, variants,
//!   platform, compiler, dependencies) handed over by the host resolver
//! - Recipes: Stateless declarations of versions, variants, dependencies,
//!   patches, and conflicts, with typed applicability guards
//! - Planning: A pure function from recipe + spec + workspace to an ordered
//!   list of phase invocations; validation runs first and fails fast
//! - Execution: Stages run as child processes with per-child environment
//!   overrides, captured output, and wall-clock timeouts

pub mod build;
mod error;
pub mod packages;
pub mod recipe;
pub mod spec;
pub mod version;

pub use build::pipeline::{BuildPlan, PlannedStage, plan};
pub use build::{Invocation, Phase, Workspace};
pub use error::{Error, Result};
pub use recipe::{Guard, Recipe, validate};
pub use spec::{Compiler, CompilerKind, Platform, Spec, VariantValue};
pub use version::{Version, VersionRange, VersionRanges};
