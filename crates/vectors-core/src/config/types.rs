//! Configuration types

use crate::layout::{VectorLayout, DEFAULT_ROOT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,
    /// External tool program names or paths
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    pub fn layout(&self) -> VectorLayout {
        VectorLayout::new(&self.paths.root)
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the test-vector scratch area
    pub root: PathBuf,
    /// Directory the external tools write into before relocation.
    /// `None` means the process's current directory.
    pub work_dir: Option<PathBuf>,
    /// Checkout holding `data/templates/*.json` for `cocli` (`COCLI_TEMPLATES`)
    pub cocli_templates: Option<PathBuf>,
    /// Directory holding `ec256.json` for `go-cose-cli` (`EVCLI_TEMPLATES`)
    pub evcli_templates: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            work_dir: None,
            cocli_templates: None,
            evcli_templates: None,
        }
    }
}

/// External tool program names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub cocli: String,
    pub evcli: String,
    pub go_psa: String,
    pub go_cose_cli: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cocli: "cocli".to_string(),
            evcli: "evcli".to_string(),
            go_psa: "go-psa".to_string(),
            go_cose_cli: "go-cose-cli".to_string(),
        }
    }
}
