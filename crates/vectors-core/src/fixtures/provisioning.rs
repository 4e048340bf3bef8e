//! Provisioning artifacts: CoMIDs and the CoRIM that bundles them

use super::{FixtureContext, FixtureOutcome};
use crate::error::FixtureError;
use crate::layout::{
    COMID_IAKPUB, COMID_IAKPUB_TEMPLATE, COMID_REFVAL, COMID_REFVAL_TEMPLATE, CORIM_FULL,
    CORIM_FULL_TEMPLATE,
};
use crate::pipeline::{Pipeline, Step};
use crate::runner::ToolInvocation;
use std::path::Path;

fn template_arg(templates: &Path, relative: &str) -> String {
    format!("--template={}", templates.join(relative).display())
}

/// `cocli` writes `<template stem>.cbor` into its working directory.
pub(crate) fn provisioning_pipeline(ctx: &FixtureContext<'_>) -> Result<Pipeline, FixtureError> {
    let templates = ctx.cocli_templates()?;
    let cocli = &ctx.config.tools.cocli;
    let dest = ctx.layout().provisioning_cbor();

    let comid = |template: &str| {
        ToolInvocation::new(cocli.as_str())
            .args(["comid", "create"])
            .arg(template_arg(templates, template))
            .cwd(&ctx.work_dir)
    };

    let corim = ToolInvocation::new(cocli.as_str())
        .args(["corim", "create"])
        .arg(template_arg(templates, CORIM_FULL_TEMPLATE))
        .arg(format!("--comid={COMID_IAKPUB}"))
        .arg(format!("--comid={COMID_REFVAL}"))
        .cwd(&ctx.work_dir);

    let mut pipeline = Pipeline::new()
        .then(Step::Run(comid(COMID_IAKPUB_TEMPLATE)))
        .then(Step::Run(comid(COMID_REFVAL_TEMPLATE)))
        .then(Step::Run(corim));
    for artifact in [CORIM_FULL, COMID_IAKPUB, COMID_REFVAL] {
        pipeline = pipeline.then(Step::Relocate {
            from: ctx.work_file(artifact),
            to_dir: dest.clone(),
        });
    }
    Ok(pipeline)
}

/// Create the PSA IAK-pub and reference-value CoMIDs, bundle them into
/// `corim-full.cbor`, and move all three into `provisioning/cbor`.
pub fn generate_good_provisioning(
    ctx: &FixtureContext<'_>,
) -> Result<FixtureOutcome, FixtureError> {
    let pipeline = provisioning_pipeline(ctx)?;
    if ctx.dry_run {
        return Ok(FixtureOutcome::Planned {
            steps: pipeline.describe(),
        });
    }
    let artifacts = pipeline.execute(ctx.runner)?;
    Ok(FixtureOutcome::Generated { artifacts })
}
