//! Configuration resolution
//!
//! Resolves configuration from multiple sources with priority:
//! 1. Command-line flags (passed as parameters)
//! 2. Environment variables
//! 3. Repo-local config (.psa-vectors.toml) or an explicit config file
//! 4. Global config (~/.config/psa-vectors/config.toml)
//! 5. Defaults

mod discovery;
mod types;

pub use discovery::{
    resolve_config, ConfigError, ConfigOverrides, COCLI_TEMPLATES_ENV, EVCLI_TEMPLATES_ENV,
};
pub use types::{Config, PathsConfig, ToolsConfig};
