// src/error.rs

//! Crate-wide error types
//!
//! Validation errors (`UnknownVariant`, `UnresolvedVariant`,
//! `InvalidVariantValue`, `Conflict`) are raised before any subprocess is
//! spawned. `ToolFailure` and `Timeout` carry the outcome of an external
//! build tool back to the host runtime unchanged.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("unknown variant '{variant}' for package '{package}'")]
    UnknownVariant { package: String, variant: String },

    #[error("variant '{variant}' of package '{package}' is not resolved")]
    UnresolvedVariant { package: String, variant: String },

    #[error("invalid value '{value}' for variant '{variant}' of package '{package}' (allowed: {allowed})")]
    InvalidVariantValue {
        package: String,
        variant: String,
        value: String,
        allowed: String,
    },

    #[error("conflict in {package}: {message}")]
    Conflict { package: String, message: String },

    #[error("spec for '{package}' has no dependency '{dependency}'")]
    MissingDependency { package: String, dependency: String },

    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("{phase} failed with exit code {code}: {stderr}")]
    ToolFailure {
        phase: String,
        code: i32,
        stderr: String,
    },

    #[error("{phase} timed out after {seconds} seconds")]
    Timeout { phase: String, seconds: u64 },
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}
