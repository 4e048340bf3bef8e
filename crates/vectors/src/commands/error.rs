//! Error types for command execution

use std::path::PathBuf;
use thiserror::Error;

/// Command execution errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// `--strict` was given and a fixture skipped its work
    #[error("Fixture '{fixture}' skipped: {reason} ({})", .template.display())]
    SkippedStrict {
        fixture: String,
        template: PathBuf,
        reason: String,
    },
}
