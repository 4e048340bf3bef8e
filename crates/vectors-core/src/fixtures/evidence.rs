//! PSA evidence tokens: the good one and two deliberately invalid ones

use super::corrupt::{generate_corrupted, Corruption};
use super::{FixtureContext, FixtureOutcome};
use crate::error::FixtureError;
use crate::layout::{
    BAD_SWCOMP_EVIDENCE, COSE_SIGNING_KEY, GOOD_EVIDENCE, MULTI_NONCE_EVIDENCE, UNSIGNED_TOKEN,
};
use crate::pipeline::{OutputDecoding, Pipeline, Step};
use crate::runner::ToolInvocation;
use std::path::Path;

/// `evcli psa create` over `claims`, then move the token to `verification/cbor`.
fn evcli_pipeline(ctx: &FixtureContext<'_>, claims: &Path, token: &str) -> Pipeline {
    let layout = ctx.layout();
    let create = ToolInvocation::new(ctx.config.tools.evcli.as_str())
        .args(["psa", "create", "-c"])
        .arg(claims.display().to_string())
        .arg("-k")
        .arg(layout.signing_key().display().to_string())
        .arg(format!("--token={token}"))
        .cwd(&ctx.work_dir);

    Pipeline::new().then(Step::Run(create)).then(Step::Relocate {
        from: ctx.work_file(token),
        to_dir: layout.verification_cbor(),
    })
}

/// Encode `claims` with `go-psa`, sign with `go-cose-cli`, drop the unsigned
/// intermediate, and move the signed token to `verification/cbor`.
///
/// Both tools print hex; their status is checked individually.
fn go_tools_pipeline(
    ctx: &FixtureContext<'_>,
    claims: &Path,
    token: &str,
) -> Result<Pipeline, FixtureError> {
    let key = ctx.evcli_templates()?.join(COSE_SIGNING_KEY);
    let unsigned = ctx.work_file(UNSIGNED_TOKEN);
    let signed = ctx.work_file(token);

    let encode = ToolInvocation::new(ctx.config.tools.go_psa.as_str())
        .args(["-p", "2"])
        .stdin_file(claims)
        .cwd(&ctx.work_dir);
    let sign = ToolInvocation::new(ctx.config.tools.go_cose_cli.as_str())
        .arg("-k")
        .arg(key.display().to_string())
        .args(["-a", "ES256"])
        .stdin_file(&unsigned)
        .cwd(&ctx.work_dir);

    Ok(Pipeline::new()
        .then(Step::Capture {
            tool: encode,
            output: unsigned.clone(),
            decoding: OutputDecoding::Hex,
        })
        .then(Step::Capture {
            tool: sign,
            output: signed.clone(),
            decoding: OutputDecoding::Hex,
        })
        .then(Step::Remove(unsigned))
        .then(Step::Relocate {
            from: signed,
            to_dir: ctx.layout().verification_cbor(),
        }))
}

/// Sign the known-good claims template with the EC P-256 key.
pub fn generate_good_evidence(ctx: &FixtureContext<'_>) -> Result<FixtureOutcome, FixtureError> {
    let pipeline = evcli_pipeline(ctx, &ctx.layout().claims_template(), GOOD_EVIDENCE);
    if ctx.dry_run {
        return Ok(FixtureOutcome::Planned {
            steps: pipeline.describe(),
        });
    }
    let artifacts = pipeline.execute(ctx.runner)?;
    Ok(FixtureOutcome::Generated { artifacts })
}

/// Evidence whose nonce claim is a two-element list.
///
/// `evcli` refuses such claims, so the raw `go-psa` encoder and
/// `go-cose-cli` signer are used instead.
pub fn generate_invalid_multi_nonce_evidence(
    ctx: &FixtureContext<'_>,
) -> Result<FixtureOutcome, FixtureError> {
    generate_corrupted(ctx, Corruption::MultiNonce, |ctx, claims| {
        go_tools_pipeline(ctx, claims, MULTI_NONCE_EVIDENCE)
    })
}

/// Evidence whose first software component measurement no longer matches
/// the provisioned reference value.
pub fn generate_bad_swcomp_evidence(
    ctx: &FixtureContext<'_>,
) -> Result<FixtureOutcome, FixtureError> {
    generate_corrupted(ctx, Corruption::BadSwcomp, |ctx, claims| {
        Ok(evcli_pipeline(ctx, claims, BAD_SWCOMP_EVIDENCE))
    })
}
