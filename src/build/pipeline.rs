// src/build/pipeline.rs

//! Stage planning
//!
//! `plan` turns a recipe plus a resolved spec into the full ordered list of
//! tool invocations for one package build. Validation runs first, so a bad
//! variant combination aborts before anything is spawned. Planning is pure:
//! the same spec and workspace always produce the same plan.

use crate::build::{Invocation, Phase, Workspace};
use crate::error::Result;
use crate::recipe::{Recipe, validate};
use crate::spec::Spec;
use tracing::{debug, info};

/// One planned stage of a package build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStage {
    pub phase: Phase,
    pub invocation: Invocation,
}

/// The complete ordered plan for one package build
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub package: String,
    pub stages: Vec<PlannedStage>,
    pub warnings: Vec<String>,
}

impl BuildPlan {
    pub fn stage(&self, phase: Phase) -> Option<&PlannedStage> {
        self.stages.iter().find(|s| s.phase == phase)
    }
}

/// Validate a spec against a recipe, then collect the per-phase invocations
pub fn plan(recipe: &dyn Recipe, spec: &Spec, workspace: &Workspace) -> Result<BuildPlan> {
    let warnings = validate(recipe, spec)?;

    let base_env = recipe.environment(spec, workspace)?;
    let mut stages = Vec::new();

    for &phase in recipe.phases() {
        if let Some(mut invocation) = recipe.plan(phase, spec, workspace)? {
            // Recipe-wide environment underneath; stage-specific entries win
            for (key, value) in &base_env {
                invocation
                    .env
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            debug!("{}: {} -> {}", spec.name, phase, invocation);
            stages.push(PlannedStage { phase, invocation });
        }
    }

    info!("planned {} stages for {}", stages.len(), spec);

    Ok(BuildPlan {
        package: spec.name.clone(),
        stages,
        warnings,
    })
}
