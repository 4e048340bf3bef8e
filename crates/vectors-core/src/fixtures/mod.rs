//! Test-vector fixtures
//!
//! Each fixture is independent: nothing flows between them except the files
//! they leave under the test-vector root. Run them before the test cases
//! that open those files.
//!
//! | Fixture | Output |
//! |---------|--------|
//! | [`remove_stale_evidence`] | deletes `provisioning/cbor/psa-good-evidence.cbor` |
//! | [`generate_good_provisioning`] | CoRIM + two CoMIDs in `provisioning/cbor` |
//! | [`generate_good_evidence`] | `verification/cbor/psa-good-evidence.cbor` |
//! | [`generate_invalid_multi_nonce_evidence`] | `verification/cbor/psa-invalid-multi-nonce-evidence.cbor` |
//! | [`generate_bad_swcomp_evidence`] | `verification/cbor/psa-bad-swcomp-evidence.cbor` |

mod cleanup;
mod corrupt;
mod evidence;
mod provisioning;

pub use cleanup::remove_stale_evidence;
pub use evidence::{
    generate_bad_swcomp_evidence, generate_good_evidence, generate_invalid_multi_nonce_evidence,
};
pub use provisioning::generate_good_provisioning;

use crate::config::Config;
use crate::error::FixtureError;
use crate::layout::VectorLayout;
use crate::runner::ToolRunner;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything a fixture needs to run
pub struct FixtureContext<'a> {
    pub config: Config,
    pub runner: &'a dyn ToolRunner,
    /// Directory the tools write into before relocation
    pub work_dir: PathBuf,
    /// Describe the steps instead of running them
    pub dry_run: bool,
}

impl<'a> FixtureContext<'a> {
    /// Build a context; the work directory falls back to the current directory.
    pub fn new(config: Config, runner: &'a dyn ToolRunner) -> Result<Self, FixtureError> {
        let work_dir = match &config.paths.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| FixtureError::io(".", e))?,
        };
        Ok(Self {
            config,
            runner,
            work_dir,
            dry_run: false,
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn layout(&self) -> VectorLayout {
        self.config.layout()
    }

    /// Path of a tool output inside the work directory
    pub fn work_file(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    pub(crate) fn cocli_templates(&self) -> Result<&Path, FixtureError> {
        self.config
            .paths
            .cocli_templates
            .as_deref()
            .ok_or(FixtureError::MissingTemplateDir {
                var: crate::config::COCLI_TEMPLATES_ENV,
            })
    }

    pub(crate) fn evcli_templates(&self) -> Result<&Path, FixtureError> {
        self.config
            .paths
            .evcli_templates
            .as_deref()
            .ok_or(FixtureError::MissingTemplateDir {
                var: crate::config::EVCLI_TEMPLATES_ENV,
            })
    }
}

/// What a fixture did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FixtureOutcome {
    /// Artifacts were produced and relocated to these paths
    Generated { artifacts: Vec<PathBuf> },
    /// The stale artifact existed and was deleted
    Removed { path: PathBuf },
    /// Nothing to delete
    AlreadyAbsent { path: PathBuf },
    /// The duplicated template was empty, so nothing was corrupted or generated
    Skipped { template: PathBuf, reason: String },
    /// Dry run; nothing was executed
    Planned { steps: Vec<String> },
}

impl FixtureOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, FixtureOutcome::Skipped { .. })
    }
}

impl fmt::Display for FixtureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureOutcome::Generated { artifacts } => {
                let paths: Vec<String> =
                    artifacts.iter().map(|p| p.display().to_string()).collect();
                write!(f, "generated {}", paths.join(", "))
            }
            FixtureOutcome::Removed { path } => write!(f, "removed {}", path.display()),
            FixtureOutcome::AlreadyAbsent { path } => {
                write!(f, "nothing to remove at {}", path.display())
            }
            FixtureOutcome::Skipped { template, reason } => {
                write!(f, "skipped ({reason}): {}", template.display())
            }
            FixtureOutcome::Planned { steps } => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{step}")?;
                }
                Ok(())
            }
        }
    }
}

/// The fixtures, addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureKind {
    Clean,
    Provisioning,
    Evidence,
    MultiNonce,
    BadSwcomp,
}

impl FixtureKind {
    /// Execution order used by [`run_all`]
    pub const ALL: [FixtureKind; 5] = [
        FixtureKind::Clean,
        FixtureKind::Provisioning,
        FixtureKind::Evidence,
        FixtureKind::MultiNonce,
        FixtureKind::BadSwcomp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FixtureKind::Clean => "clean",
            FixtureKind::Provisioning => "provisioning",
            FixtureKind::Evidence => "evidence",
            FixtureKind::MultiNonce => "multi-nonce",
            FixtureKind::BadSwcomp => "bad-swcomp",
        }
    }

    pub fn run(self, ctx: &FixtureContext<'_>) -> Result<FixtureOutcome, FixtureError> {
        match self {
            FixtureKind::Clean => remove_stale_evidence(ctx),
            FixtureKind::Provisioning => generate_good_provisioning(ctx),
            FixtureKind::Evidence => generate_good_evidence(ctx),
            FixtureKind::MultiNonce => generate_invalid_multi_nonce_evidence(ctx),
            FixtureKind::BadSwcomp => generate_bad_swcomp_evidence(ctx),
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixtureKind {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixtureKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FixtureError::UnknownFixture(s.to_string()))
    }
}

/// Run every fixture in [`FixtureKind::ALL`] order, stopping at the first error.
pub fn run_all(
    ctx: &FixtureContext<'_>,
) -> Result<Vec<(FixtureKind, FixtureOutcome)>, FixtureError> {
    let mut outcomes = Vec::with_capacity(FixtureKind::ALL.len());
    for kind in FixtureKind::ALL {
        tracing::info!(fixture = %kind, "running fixture");
        let outcome = kind.run(ctx)?;
        outcomes.push((kind, outcome));
    }
    Ok(outcomes)
}
