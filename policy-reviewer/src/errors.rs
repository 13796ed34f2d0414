//! Crate-wide error hierarchy for policy-reviewer.
//!
//! Input, locator and advisor failures are recoverable: they are logged where
//! they occur and the report degrades instead. [`Error`] covers what a caller
//! can observe: a malformed violation document and a failed write.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewResult<T> = Result<T, Error>;

/// Root error type for the policy-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The violation document does not have the policy-engine result shape.
    #[error("malformed violation structure: {0}")]
    MalformedViolations(String),

    /// Writing the rendered comment.
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input document failures (violations / plan JSON).
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resource locator failures. Each one only disqualifies a single file.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("cannot list configuration directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unbalanced braces in {path} for {resource}")]
    UnbalancedBraces { path: PathBuf, resource: String },

    #[error("invalid block pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Fix advisor failures; both variants fall back to manual-fix rendering.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor disabled, invalid LLM configuration: {0}")]
    Config(#[source] AiLlmError),

    #[error("fix suggestion failed: {0}")]
    Backend(#[source] AiLlmError),
}
