use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternative config file
pub const CONFIG_ENV: &str = "IPM_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URI handed to the desktop app so it shows the user's access key
    pub access_key_uri: String,
    /// Directory the desktop app loads plugins from
    pub packages_dir: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: "https://api.inkdrop.app/v1".to_string(),
            user_agent: format!("ipm/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            access_key_uri: "inkdrop://ipm/access-key".to_string(),
            packages_dir: default_packages_dir(),
        }
    }
}

impl Config {
    /// Load from `$IPM_CONFIG` or the per-user config directory.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ipm")
                .join("config.toml"),
        }
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.app.packages_dir.clone()
    }
}

fn default_packages_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inkdrop")
        .join("packages")
}
