//! Shared flow for negative vectors: duplicate, corrupt, then generate

use super::{FixtureContext, FixtureOutcome};
use crate::error::FixtureError;
use crate::layout::{BAD_SWCOMP_TEMPLATE, MULTI_NONCE_TEMPLATE};
use crate::pipeline::Pipeline;
use crate::template;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Corruption {
    /// `psa-nonce` becomes `[original, extra]`
    MultiNonce,
    /// First character of the first software component measurement replaced
    BadSwcomp,
}

impl Corruption {
    fn template_name(self) -> &'static str {
        match self {
            Corruption::MultiNonce => MULTI_NONCE_TEMPLATE,
            Corruption::BadSwcomp => BAD_SWCOMP_TEMPLATE,
        }
    }

    fn describe(self, path: &Path) -> String {
        match self {
            Corruption::MultiNonce => format!(
                "set {} in {} to [original, {}]",
                template::NONCE_CLAIM,
                path.display(),
                template::derive_extra_nonce()
            ),
            Corruption::BadSwcomp => format!(
                "distort first character of {}[0].{} in {}",
                template::SW_COMPONENTS_CLAIM,
                template::MEASUREMENT_FIELD,
                path.display()
            ),
        }
    }

    fn apply(self, doc: &mut Value) -> Result<(), FixtureError> {
        match self {
            Corruption::MultiNonce => template::corrupt_nonce(doc, &template::derive_extra_nonce()),
            Corruption::BadSwcomp => template::corrupt_first_measurement(doc),
        }
    }
}

/// Duplicate the good template, corrupt the copy, then run the pipeline
/// `build` produces for the corrupted copy.
pub(crate) fn generate_corrupted<F>(
    ctx: &FixtureContext<'_>,
    corruption: Corruption,
    build: F,
) -> Result<FixtureOutcome, FixtureError>
where
    F: FnOnce(&FixtureContext<'_>, &Path) -> Result<Pipeline, FixtureError>,
{
    let layout = ctx.layout();
    let source = layout.claims_template();
    let copy: PathBuf = layout.verification_json().join(corruption.template_name());
    let pipeline = build(ctx, &copy)?;

    if ctx.dry_run {
        let mut steps = vec![
            format!("cp {} {}", source.display(), copy.display()),
            corruption.describe(&copy),
        ];
        steps.extend(pipeline.describe());
        return Ok(FixtureOutcome::Planned { steps });
    }

    template::duplicate(&source, &copy)?;

    let Some(mut doc) = template::load(&copy)? else {
        warn!(template = %copy.display(), "template is empty; skipping corruption and generation");
        return Ok(FixtureOutcome::Skipped {
            template: copy,
            reason: "template document is empty".to_string(),
        });
    };

    corruption.apply(&mut doc)?;
    template::store(&copy, &doc)?;
    info!(template = %copy.display(), ?corruption, "corrupted template");

    let artifacts = pipeline.execute(ctx.runner)?;
    Ok(FixtureOutcome::Generated { artifacts })
}
