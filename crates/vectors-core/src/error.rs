//! Error types for fixture execution

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a fixture.
///
/// Every variant is fatal to the current test setup; nothing is retried.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Claims template is not valid JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// External tool binary could not be found on PATH
    #[error("{program} not found on PATH")]
    ToolNotFound { program: String },

    /// External tool could not be started
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// External tool exited with a non-zero status or was killed by a signal
    #[error("{program} failed ({}): {stderr}", exit_description(.code))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Tool stdout was expected to be hex but was not
    #[error("Invalid hex output from {program}: {source}")]
    HexDecode {
        program: String,
        source: hex::FromHexError,
    },

    /// Destination directory for a relocated artifact is missing
    #[error("Directory not found: {path}")]
    MissingDirectory { path: PathBuf },

    /// A claim the corruption targets is absent from the template
    #[error("Claim '{field}' not found in template")]
    MissingField { field: String },

    /// A claim exists but has an unusable shape
    #[error("Claim '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    /// The corruption would leave the claim unchanged
    #[error("Corruption of '{field}' would not change its value")]
    DegenerateCorruption { field: String },

    /// A template directory environment variable is not set
    #[error("Template directory not configured (set {var})")]
    MissingTemplateDir { var: &'static str },

    /// Fixture name not recognised
    #[error("Unknown fixture: {0}")]
    UnknownFixture(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl FixtureError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
