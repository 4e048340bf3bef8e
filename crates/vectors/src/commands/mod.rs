//! CLI command dispatch and execution

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use psa_vectors_core::config::{resolve_config, Config, ConfigOverrides};
use psa_vectors_core::logging;
use std::path::PathBuf;

mod config_cmd;
mod error;
mod plan;
mod run;

/// psa-vectors - generate PSA attestation test vectors
#[derive(Parser, Debug)]
#[command(
    name = "psa-vectors",
    version,
    about = "Generate PSA attestation test vectors for integration tests",
    long_about = "Runs the external CoRIM/CoMID and PSA token tools, corrupts claims templates for negative tests, and moves every artifact under the test-vector root"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Test-vector root (default /test-vectors)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Directory the tools write into before relocation (default: current dir)
    #[arg(long, global = true, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// Config file to use instead of .psa-vectors.toml discovery
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: self.root.clone(),
            work_dir: self.work_dir.clone(),
            config_path: self.config.clone(),
        }
    }

    /// Resolve configuration for this invocation
    pub fn resolve(&self) -> Result<Config> {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let home_dir = dirs::home_dir().unwrap_or_else(|| current_dir.clone());
        Ok(resolve_config(&self.overrides(), &current_dir, &home_dir)?)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove the stale good-evidence artifact from provisioning/cbor
    Clean(run::RunArgs),

    /// Generate the CoRIM and CoMID provisioning artifacts
    Provisioning(run::RunArgs),

    /// Generate the good PSA evidence token
    Evidence(run::RunArgs),

    /// Generate evidence whose nonce claim holds two values
    MultiNonce(run::RunArgs),

    /// Generate evidence with a distorted software component measurement
    BadSwcomp(run::RunArgs),

    /// Run clean and every generator, stopping at the first failure
    All(run::RunArgs),

    /// Print the steps a fixture would run, without running them
    Plan(plan::PlanArgs),

    /// Show the resolved configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.global.verbose {
            logging::init_with_level(tracing::Level::DEBUG);
        } else {
            logging::init();
        }

        use psa_vectors_core::FixtureKind;
        let global = &self.global;
        match self.command {
            Commands::Clean(args) => run::execute(global, FixtureKind::Clean, args),
            Commands::Provisioning(args) => run::execute(global, FixtureKind::Provisioning, args),
            Commands::Evidence(args) => run::execute(global, FixtureKind::Evidence, args),
            Commands::MultiNonce(args) => run::execute(global, FixtureKind::MultiNonce, args),
            Commands::BadSwcomp(args) => run::execute(global, FixtureKind::BadSwcomp, args),
            Commands::All(args) => run::execute_all(global, args),
            Commands::Plan(args) => plan::execute(global, args),
            Commands::Config => config_cmd::execute(global),
        }
    }
}
