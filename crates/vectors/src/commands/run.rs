//! Fixture execution commands

use anyhow::{Context, Result};
use clap::Args;
use psa_vectors_core::fixtures::run_all;
use psa_vectors_core::{FixtureContext, FixtureKind, FixtureOutcome, SystemRunner};
use serde_json::json;

use super::error::CommandError;
use super::GlobalArgs;

/// Options for running fixtures
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print the steps instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Fail when a fixture skips its work because the template is empty
    #[arg(long)]
    strict: bool,
}

fn check_strict(kind: FixtureKind, outcome: &FixtureOutcome, strict: bool) -> Result<()> {
    match outcome {
        FixtureOutcome::Skipped { template, reason } if strict => {
            Err(CommandError::SkippedStrict {
                fixture: kind.to_string(),
                template: template.clone(),
                reason: reason.clone(),
            }
            .into())
        }
        _ => Ok(()),
    }
}

fn print_outcome(kind: FixtureKind, outcome: &FixtureOutcome, as_json: bool) -> Result<()> {
    if as_json {
        let output = json!({
            "fixture": kind,
            "result": outcome,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if matches!(outcome, FixtureOutcome::Planned { .. }) {
        println!("# {kind}");
        println!("{outcome}");
    } else {
        println!("{kind}: {outcome}");
    }
    Ok(())
}

/// Execute a single fixture
pub fn execute(global: &GlobalArgs, kind: FixtureKind, args: RunArgs) -> Result<()> {
    let config = global.resolve()?;
    let runner = SystemRunner;
    let ctx = FixtureContext::new(config, &runner)?.with_dry_run(args.dry_run);

    let outcome = kind
        .run(&ctx)
        .with_context(|| format!("Fixture '{kind}' failed"))?;
    print_outcome(kind, &outcome, global.json)?;
    check_strict(kind, &outcome, args.strict)
}

/// Execute every fixture in order
pub fn execute_all(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let config = global.resolve()?;
    let runner = SystemRunner;
    let ctx = FixtureContext::new(config, &runner)?.with_dry_run(args.dry_run);

    let outcomes = run_all(&ctx).context("Fixture run aborted")?;
    for (kind, outcome) in &outcomes {
        print_outcome(*kind, outcome, global.json)?;
    }
    for (kind, outcome) in &outcomes {
        check_strict(*kind, outcome, args.strict)?;
    }
    Ok(())
}
