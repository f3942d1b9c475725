//! Rule repository configuration
//!
//! Where the rule repository lives and how its documents are laid out. The
//! relative paths default to the layout every FOP project uses and rarely
//! need changing; `root` is the usual override.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::is_contained;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "FOP_WORKFLOW_CONFIG";

/// Location and layout of the rule repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Directory the relative document paths are resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Top-level workflow configuration document, relative to `root`
    #[serde(default = "default_config_file")]
    pub config_file: String,
    /// Directory holding one rule document per stage, relative to `root`
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_config_file() -> String {
    ".joycode/fop-agent-config.json".to_string()
}

fn default_rules_dir() -> String {
    ".joycode/rules".to_string()
}

/// A layout path that does not stay inside the repository root
#[derive(Debug, thiserror::Error)]
#[error("{field} must be a relative path inside the repository root, got '{value}'")]
pub struct LayoutError {
    pub field: &'static str,
    pub value: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            config_file: default_config_file(),
            rules_dir: default_rules_dir(),
        }
    }
}

impl RepositoryConfig {
    /// Replace the repository root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Check that both layout paths are relative and stay under `root`
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("config_file", &self.config_file),
            ("rules_dir", &self.rules_dir),
        ];
        for (field, value) in fields {
            if !is_contained(Path::new(value)) || (field == "config_file" && value.is_empty()) {
                return Err(LayoutError {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from the standard locations
    ///
    /// Searched in order:
    /// 1. `FOP_WORKFLOW_CONFIG` env var
    /// 2. `./fop-workflow-mcp.toml`
    /// 3. `$XDG_CONFIG_HOME/fop-workflow-mcp/config.toml`
    /// 4. `~/.binks/fop-workflow.toml`
    /// 5. Defaults if none is found or parses
    pub fn load() -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                if let Some(config) = Self::read_file(&path) {
                    return config;
                }
            } else {
                tracing::warn!("{}={} does not exist", CONFIG_ENV, env_path);
            }
        }

        Self::candidate_paths()
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::read_file(path))
            .unwrap_or_else(|| {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            })
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("fop-workflow-mcp.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fop-workflow-mcp").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".binks").join("fop-workflow.toml"));
        }

        paths
    }

    fn read_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        match Self::from_toml(&content) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    tracing::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Ignoring config {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }
}
