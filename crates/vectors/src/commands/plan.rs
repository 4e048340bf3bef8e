//! Plan command - show fixture steps without running them

use anyhow::Result;
use clap::Args;
use psa_vectors_core::{FixtureContext, FixtureKind, FixtureOutcome, SystemRunner};
use serde_json::json;

use super::GlobalArgs;

/// Show what a fixture would do
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Fixture name (clean, provisioning, evidence, multi-nonce, bad-swcomp) or "all"
    fixture: String,
}

/// Execute the plan command
pub fn execute(global: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let kinds: Vec<FixtureKind> = if args.fixture == "all" {
        FixtureKind::ALL.to_vec()
    } else {
        vec![args.fixture.parse()?]
    };

    let config = global.resolve()?;
    let runner = SystemRunner;
    let ctx = FixtureContext::new(config, &runner)?.with_dry_run(true);

    let mut plans = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let steps = match kind.run(&ctx)? {
            FixtureOutcome::Planned { steps } => steps,
            other => anyhow::bail!("Fixture '{kind}' did not produce a plan: {other}"),
        };
        plans.push((kind, steps));
    }

    if global.json {
        let output: Vec<_> = plans
            .iter()
            .map(|(kind, steps)| json!({ "fixture": kind, "steps": steps }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (kind, steps) in &plans {
            println!("# {kind}");
            for step in steps {
                println!("{step}");
            }
        }
    }
    Ok(())
}
