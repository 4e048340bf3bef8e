//! Stale artifact removal

use super::{FixtureContext, FixtureOutcome};
use crate::error::FixtureError;
use tracing::info;

/// Delete the good-evidence artifact left in the provisioning directory by a
/// previous run.
///
/// Absent (or not a regular file) is success. A failed removal is fatal.
pub fn remove_stale_evidence(ctx: &FixtureContext<'_>) -> Result<FixtureOutcome, FixtureError> {
    let path = ctx.layout().stale_evidence();

    if ctx.dry_run {
        return Ok(FixtureOutcome::Planned {
            steps: vec![format!("rm -f {}", path.display())],
        });
    }

    if !path.is_file() {
        return Ok(FixtureOutcome::AlreadyAbsent { path });
    }

    match std::fs::remove_file(&path) {
        Ok(()) => {
            info!(path = %path.display(), "removed stale evidence");
            Ok(FixtureOutcome::Removed { path })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(FixtureOutcome::AlreadyAbsent { path })
        }
        Err(e) => Err(FixtureError::io(path, e)),
    }
}
