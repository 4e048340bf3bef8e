//! Configuration discovery and resolution

use super::types::Config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Repo-local config file name
pub const REPO_CONFIG_FILE: &str = ".psa-vectors.toml";

pub const ROOT_ENV: &str = "PSA_VECTORS_ROOT";
pub const WORK_DIR_ENV: &str = "PSA_VECTORS_WORK_DIR";
pub const CONFIG_ENV: &str = "PSA_VECTORS_CONFIG";
pub const COCLI_TEMPLATES_ENV: &str = "COCLI_TEMPLATES";
pub const EVCLI_TEMPLATES_ENV: &str = "EVCLI_TEMPLATES";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("TOML parsing error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Override test-vector root
    pub root: Option<PathBuf>,
    /// Override tool working directory
    pub work_dir: Option<PathBuf>,
    /// Path to config file override
    pub config_path: Option<PathBuf>,
}

/// On-disk config; every field optional so layers only override what they set.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    paths: FilePaths,
    #[serde(default)]
    tools: FileTools,
}

#[derive(Debug, Default, Deserialize)]
struct FilePaths {
    root: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    cocli_templates: Option<PathBuf>,
    evcli_templates: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileTools {
    cocli: Option<String>,
    evcli: Option<String>,
    go_psa: Option<String>,
    go_cose_cli: Option<String>,
}

/// Resolve configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables
/// 3. Explicit config file (`--config` or `PSA_VECTORS_CONFIG`), otherwise
///    repo-local `.psa-vectors.toml` in current dir or up to the git root
/// 4. Global config (~/.config/psa-vectors/config.toml)
/// 5. Defaults
///
/// Broken discovered files are skipped with a warning; a broken explicit
/// config file is an error.
pub fn resolve_config(
    overrides: &ConfigOverrides,
    current_dir: &Path,
    home_dir: &Path,
) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    // 4. Try global config
    let global_config_path = home_dir.join(".config/psa-vectors/config.toml");
    if global_config_path.exists() {
        match load_config_file(&global_config_path) {
            Ok(file_config) => merge_config(&mut config, file_config),
            Err(e) => warn!("Skipping global config: {e}"),
        }
    }

    // 3. Explicit file wins over repo-local discovery
    let explicit = overrides
        .config_path
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = explicit {
        let file_config = load_config_file(&path)?;
        merge_config(&mut config, file_config);
    } else if let Some(repo_config) = find_repo_local_config(current_dir) {
        match load_config_file(&repo_config) {
            Ok(file_config) => merge_config(&mut config, file_config),
            Err(e) => warn!("Skipping repo config: {e}"),
        }
    }

    // 2. Apply environment variables
    apply_env_overrides(&mut config);

    // 1. Apply command-line overrides
    apply_cli_overrides(&mut config, overrides);

    debug!(root = %config.paths.root.display(), "resolved configuration");
    Ok(config)
}

/// Find repo-local config file
///
/// Searches current directory and parent directories up to git root
fn find_repo_local_config(current_dir: &Path) -> Option<PathBuf> {
    let mut dir = current_dir;

    loop {
        let config_path = dir.join(REPO_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if dir.join(".git").exists() {
            break;
        }

        dir = dir.parent()?;
    }

    None
}

/// Load config from a TOML file
fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge file config into base config
fn merge_config(base: &mut Config, file: FileConfig) {
    let paths = file.paths;
    if let Some(root) = paths.root {
        base.paths.root = root;
    }
    if paths.work_dir.is_some() {
        base.paths.work_dir = paths.work_dir;
    }
    if paths.cocli_templates.is_some() {
        base.paths.cocli_templates = paths.cocli_templates;
    }
    if paths.evcli_templates.is_some() {
        base.paths.evcli_templates = paths.evcli_templates;
    }

    let tools = file.tools;
    if let Some(cocli) = tools.cocli {
        base.tools.cocli = cocli;
    }
    if let Some(evcli) = tools.evcli {
        base.tools.evcli = evcli;
    }
    if let Some(go_psa) = tools.go_psa {
        base.tools.go_psa = go_psa;
    }
    if let Some(go_cose_cli) = tools.go_cose_cli {
        base.tools.go_cose_cli = go_cose_cli;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Apply environment variable overrides
fn apply_env_overrides(config: &mut Config) {
    if let Some(root) = non_empty_env(ROOT_ENV) {
        config.paths.root = PathBuf::from(root);
    }

    if let Some(work_dir) = non_empty_env(WORK_DIR_ENV) {
        config.paths.work_dir = Some(PathBuf::from(work_dir));
    }

    if let Some(templates) = non_empty_env(COCLI_TEMPLATES_ENV) {
        config.paths.cocli_templates = Some(PathBuf::from(templates));
    }

    if let Some(templates) = non_empty_env(EVCLI_TEMPLATES_ENV) {
        config.paths.evcli_templates = Some(PathBuf::from(templates));
    }

    if let Some(cocli) = non_empty_env("PSA_VECTORS_COCLI") {
        config.tools.cocli = cocli;
    }
    if let Some(evcli) = non_empty_env("PSA_VECTORS_EVCLI") {
        config.tools.evcli = evcli;
    }
    if let Some(go_psa) = non_empty_env("PSA_VECTORS_GO_PSA") {
        config.tools.go_psa = go_psa;
    }
    if let Some(go_cose_cli) = non_empty_env("PSA_VECTORS_GO_COSE_CLI") {
        config.tools.go_cose_cli = go_cose_cli;
    }
}

/// Apply command-line overrides
fn apply_cli_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(ref root) = overrides.root {
        config.paths.root = root.clone();
    }

    if let Some(ref work_dir) = overrides.work_dir {
        config.paths.work_dir = Some(work_dir.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    const ALL_ENV: [&str; 9] = [
        ROOT_ENV,
        WORK_DIR_ENV,
        CONFIG_ENV,
        COCLI_TEMPLATES_ENV,
        EVCLI_TEMPLATES_ENV,
        "PSA_VECTORS_COCLI",
        "PSA_VECTORS_EVCLI",
        "PSA_VECTORS_GO_PSA",
        "PSA_VECTORS_GO_COSE_CLI",
    ];

    fn clear_env() {
        for name in ALL_ENV {
            unsafe {
                env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides::default();

        let config = resolve_config(&overrides, temp_dir.path(), temp_dir.path()).unwrap();

        assert_eq!(config.paths.root, PathBuf::from("/test-vectors"));
        assert!(config.paths.work_dir.is_none());
        assert!(config.paths.cocli_templates.is_none());
        assert_eq!(config.tools.evcli, "evcli");
        assert_eq!(config.tools.go_cose_cli, "go-cose-cli");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides::default();

        unsafe {
            env::set_var(ROOT_ENV, "/srv/vectors");
            env::set_var(COCLI_TEMPLATES_ENV, "/opt/cocli");
            env::set_var(EVCLI_TEMPLATES_ENV, "/opt/evcli");
            env::set_var("PSA_VECTORS_GO_PSA", "/usr/local/bin/go-psa");
        }

        let config = resolve_config(&overrides, temp_dir.path(), temp_dir.path()).unwrap();

        assert_eq!(config.paths.root, PathBuf::from("/srv/vectors"));
        assert_eq!(config.paths.cocli_templates, Some(PathBuf::from("/opt/cocli")));
        assert_eq!(config.paths.evcli_templates, Some(PathBuf::from("/opt/evcli")));
        assert_eq!(config.tools.go_psa, "/usr/local/bin/go-psa");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_env_values_are_ignored() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();

        unsafe {
            env::set_var(COCLI_TEMPLATES_ENV, "");
        }

        let config =
            resolve_config(&ConfigOverrides::default(), temp_dir.path(), temp_dir.path()).unwrap();
        assert!(config.paths.cocli_templates.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cli_overrides_beat_env() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        unsafe {
            env::set_var(ROOT_ENV, "/from-env");
        }

        let overrides = ConfigOverrides {
            root: Some(PathBuf::from("/from-cli")),
            work_dir: Some(PathBuf::from("/scratch")),
            config_path: None,
        };

        let config = resolve_config(&overrides, temp_dir.path(), temp_dir.path()).unwrap();

        assert_eq!(config.paths.root, PathBuf::from("/from-cli"));
        assert_eq!(config.paths.work_dir, Some(PathBuf::from("/scratch")));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_repo_local_overrides_global() {
        clear_env();
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let nested = repo.path().join("integration-tests");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(repo.path().join(".git")).unwrap();

        let global_dir = home.path().join(".config/psa-vectors");
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(
            global_dir.join("config.toml"),
            r#"
[paths]
root = "/global-root"
evcli_templates = "/global/evcli"

[tools]
evcli = "evcli-global"
"#,
        )
        .unwrap();

        std::fs::write(
            repo.path().join(REPO_CONFIG_FILE),
            r#"
[paths]
root = "/repo-root"
"#,
        )
        .unwrap();

        let config = resolve_config(&ConfigOverrides::default(), &nested, home.path()).unwrap();

        assert_eq!(config.paths.root, PathBuf::from("/repo-root"));
        // Fields the repo file leaves out keep the global value
        assert_eq!(config.paths.evcli_templates, Some(PathBuf::from("/global/evcli")));
        assert_eq!(config.tools.evcli, "evcli-global");
        assert_eq!(config.tools.cocli, "cocli");
    }

    #[test]
    #[serial]
    fn test_repo_search_stops_at_git_root() {
        clear_env();
        let outer = TempDir::new().unwrap();
        std::fs::write(
            outer.path().join(REPO_CONFIG_FILE),
            "[paths]\nroot = \"/outside\"\n",
        )
        .unwrap();
        let repo = outer.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(find_repo_local_config(&repo).is_none());
    }

    #[test]
    #[serial]
    fn test_malformed_repo_config_is_skipped() {
        clear_env();
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        std::fs::create_dir_all(repo.path().join(".git")).unwrap();
        std::fs::write(repo.path().join(REPO_CONFIG_FILE), "invalid toml [[[").unwrap();

        let config =
            resolve_config(&ConfigOverrides::default(), repo.path(), home.path()).unwrap();
        assert_eq!(config.paths.root, PathBuf::from("/test-vectors"));
    }

    #[test]
    #[serial]
    fn test_malformed_explicit_config_is_an_error() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "invalid toml [[[").unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(config_path),
            ..Default::default()
        };

        let result = resolve_config(&overrides, temp_dir.path(), temp_dir.path());
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_config_is_an_error() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(temp_dir.path().join("absent.toml")),
            ..Default::default()
        };

        let result = resolve_config(&overrides, temp_dir.path(), temp_dir.path());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_config_file_parse() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[paths]
root = "/tv"
work_dir = "/tmp/work"
cocli_templates = "/opt/cocli"

[tools]
go_psa = "go-psa-v2"
go_cose_cli = "cose"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        merge_config(&mut config, load_config_file(&config_path).unwrap());

        assert_eq!(config.paths.root, PathBuf::from("/tv"));
        assert_eq!(config.paths.work_dir, Some(PathBuf::from("/tmp/work")));
        assert_eq!(config.paths.cocli_templates, Some(PathBuf::from("/opt/cocli")));
        assert!(config.paths.evcli_templates.is_none());
        assert_eq!(config.tools.go_psa, "go-psa-v2");
        assert_eq!(config.tools.go_cose_cli, "cose");
        assert_eq!(config.tools.cocli, "cocli");
    }
}
