//! Core library for psa-vectors: test-vector fixtures for PSA attestation
//! integration tests.
//!
//! Every fixture has the same shape: optionally duplicate and corrupt a
//! claims template, drive one or more external tools (`cocli`, `evcli`,
//! `go-psa`, `go-cose-cli`), move the produced artifact into the canonical
//! directory under the test-vector root, and fail on any non-zero exit.
//!
//! The external tools own every byte of the artifacts. This crate never
//! encodes, signs or validates tokens.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod runner;
pub mod template;

pub use config::{resolve_config, Config, ConfigError, ConfigOverrides};
pub use error::FixtureError;
pub use fixtures::{FixtureContext, FixtureKind, FixtureOutcome};
pub use layout::VectorLayout;
pub use runner::{SystemRunner, ToolInvocation, ToolOutput, ToolRunner};
