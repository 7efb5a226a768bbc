use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::community::modularity::ModularityMode;
use crate::community::DEFAULT_THRESHOLD;
use crate::store::StoreDriver;

/// Root configuration structure, deserialized from `.guacid/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

/// Where identifiers are read from.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub driver: StoreDriver,
    /// Snapshot directory or GraphQL endpoint URL, depending on `driver`.
    #[serde(default = "default_address")]
    pub address: String,
    /// Snapshot driver: treat missing export files as empty collections.
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
    /// Log at debug level.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Destination of the GuacIDs JSON array.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Optional Graphviz DOT export of the identifier graph.
    #[serde(default)]
    pub graph: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DetectionConfig {
    /// Minimum leading eigenvalue for a subgraph to be split.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub mode: ModularityMode,
}

fn default_address() -> String {
    "data/identifiers".to_string()
}

fn default_auto_migrate() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/identifiers/GuacIDs.json")
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            driver: StoreDriver::default(),
            address: default_address(),
            auto_migrate: default_auto_migrate(),
            debug: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: default_output_path(),
            graph: None,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            threshold: default_threshold(),
            mode: ModularityMode::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base>/.guacid/config.toml`
/// 3. `~/.config/guacid/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = base.join(".guacid").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("guacid").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.store.driver, StoreDriver::Snapshot);
        assert_eq!(cfg.store.address, "data/identifiers");
        assert!(cfg.store.auto_migrate);
        assert!(!cfg.store.debug);
        assert_eq!(cfg.output.path, PathBuf::from("data/identifiers/GuacIDs.json"));
        assert!(cfg.output.graph.is_none());
        assert_eq!(cfg.detection.threshold, DEFAULT_THRESHOLD);
        assert_eq!(cfg.detection.mode, ModularityMode::Directed);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[store]
driver = "graphql"
address = "http://localhost:8080/query"
debug = true

[detection]
mode = "symmetrized"
"#,
        )
        .unwrap();

        assert_eq!(cfg.store.driver, StoreDriver::Graphql);
        assert_eq!(cfg.store.address, "http://localhost:8080/query");
        assert!(cfg.store.auto_migrate);
        assert!(cfg.store.debug);
        assert_eq!(cfg.output.path, PathBuf::from("data/identifiers/GuacIDs.json"));
        assert_eq!(cfg.detection.threshold, DEFAULT_THRESHOLD);
        assert_eq!(cfg.detection.mode, ModularityMode::Symmetrized);
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[store]\ndriver = \"neo4j\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_project_config_found() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".guacid")).unwrap();
        std::fs::write(
            dir.path().join(".guacid").join("config.toml"),
            "[output]\npath = \"out/ids.json\"\ngraph = \"out/ids.dot\"\n\n[detection]\nthreshold = 0.01\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.output.path, PathBuf::from("out/ids.json"));
        assert_eq!(cfg.output.graph, Some(PathBuf::from("out/ids.dot")));
        assert_eq!(cfg.detection.threshold, 0.01);
    }

    #[test]
    fn test_override_wins_and_must_exist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[store]\nauto_migrate = false\n").unwrap();

        let cfg = load_config(dir.path(), Some(&path)).unwrap();
        assert!(!cfg.store.auto_migrate);

        let missing = dir.path().join("missing.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }
}
