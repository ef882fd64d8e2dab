// src/build/exec.rs

//! Stage execution
//!
//! Runs planned stages as child processes. Environment overrides apply to
//! the child only, stdin is nulled to prevent hangs, output is captured and
//! logged, and a wall-clock timeout bounds each stage. A non-zero exit is
//! propagated verbatim as [`Error::ToolFailure`]; retry policy belongs to
//! the caller.

use crate::build::pipeline::{BuildPlan, PlannedStage};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// Execution settings for stage subprocesses
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Wall-clock limit per stage
    pub timeout: Duration,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Check that an expected installed artifact exists before relying on it
pub fn require_executable(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::PrerequisiteMissing(format!(
            "expected executable {} is not installed",
            path.display()
        )))
    }
}

/// Run one planned stage to completion, returning its captured output
pub fn run_stage(stage: &PlannedStage, config: &ExecConfig) -> Result<String> {
    let inv = &stage.invocation;
    info!("running {} stage: {}", stage.phase, inv);

    let mut command = Command::new(&inv.program);
    command
        .args(&inv.args)
        .envs(&inv.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(workdir) = &inv.workdir {
        command.current_dir(workdir);
    }

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PrerequisiteMissing(format!("{} not found", inv.program))
        } else {
            Error::IoError(format!("failed to spawn {}: {}", inv.program, e))
        }
    })?;

    let status = match child.wait_timeout(config.timeout)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            return Err(Error::Timeout {
                phase: stage.phase.to_string(),
                seconds: config.timeout.as_secs(),
            });
        }
    };

    let output = child.wait_with_output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    for line in stdout.lines() {
        debug!("[{}] {}", stage.phase, line);
    }
    for line in stderr.lines() {
        warn!("[{}] {}", stage.phase, line);
    }

    if !status.success() {
        return Err(Error::ToolFailure {
            phase: stage.phase.to_string(),
            code: status.code().unwrap_or(-1),
            stderr: stderr.into_owned(),
        });
    }

    let mut log = stdout.into_owned();
    log.push_str(&stderr);
    Ok(log)
}

/// Run a whole plan in order, halting at the first failing stage
pub fn run(plan: &BuildPlan, config: &ExecConfig) -> Result<String> {
    let mut log = String::new();
    for warning in &plan.warnings {
        warn!("{}: {}", plan.package, warning);
    }
    for stage in &plan.stages {
        log.push_str(&run_stage(stage, config)?);
    }
    info!("{}: all {} stages completed", plan.package, plan.stages.len());
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Invocation, Phase};

    fn stage(invocation: Invocation) -> PlannedStage {
        PlannedStage {
            phase: Phase::Build,
            invocation,
        }
    }

    #[test]
    fn test_run_stage_success() {
        let log = run_stage(
            &stage(Invocation::new("sh").args(["-c", "echo built"])),
            &ExecConfig::default(),
        )
        .unwrap();
        assert!(log.contains("built"));
    }

    #[test]
    fn test_run_stage_env_applied_to_child_only() {
        let log = run_stage(
            &stage(
                Invocation::new("sh")
                    .args(["-c", "echo $CRUCIBLE_STAGE_MARKER"])
                    .env("CRUCIBLE_STAGE_MARKER", "on"),
            ),
            &ExecConfig::default(),
        )
        .unwrap();
        assert!(log.contains("on"));
        assert!(std::env::var("CRUCIBLE_STAGE_MARKER").is_err());
    }

    #[test]
    fn test_run_stage_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let log = run_stage(
            &stage(Invocation::new("pwd").current_dir(dir.path())),
            &ExecConfig::default(),
        )
        .unwrap();
        assert!(log.trim_end().ends_with(
            dir.path()
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
        ));
    }

    #[test]
    fn test_run_stage_failure() {
        let err = run_stage(
            &stage(Invocation::new("sh").args(["-c", "echo broken >&2; exit 3"])),
            &ExecConfig::default(),
        )
        .unwrap_err();
        match err {
            Error::ToolFailure { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert!(stderr.contains("broken"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_stage_missing_program() {
        let err = run_stage(
            &stage(Invocation::new("crucible-no-such-tool")),
            &ExecConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::PrerequisiteMissing(_)));
    }

    #[test]
    fn test_run_stage_timeout() {
        let config = ExecConfig {
            timeout: Duration::from_millis(100),
        };
        let err = run_stage(&stage(Invocation::new("sleep").arg("5")), &config).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_require_executable() {
        assert!(require_executable(Path::new("/bin/sh")).is_ok());
        assert!(require_executable(Path::new("/no/such/tool")).is_err());
    }
}
