//! Configuration loading
//!
//! Priority order for every setting:
//! 1. Command-line argument or environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing config file is not an error; the service starts on defaults.
//! A config file that exists but cannot be parsed is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::sheets::apps_script_url;
use crate::{Error, Result};

/// Compiled defaults used when neither the command line nor TOML says otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub bind: String,
    pub port: u16,
    pub reference: String,
    pub names: PathBuf,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5730,
            reference: "data/kecamatan-data.json".to_string(),
            names: PathBuf::from("data/name-options.json"),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    /// Export endpoint returning `{ "data": [[...]] }`
    pub sheet_url: Option<String>,
    /// Apps-script deployment id for appends
    pub apps_script_id: Option<String>,
    /// Reference hierarchy: file path or http(s) URL
    pub reference: Option<String>,
    pub names: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub sheet_url: Option<String>,
    pub apps_script_id: Option<String>,
    pub reference: Option<String>,
    pub names: Option<PathBuf>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub sheet_url: Option<String>,
    pub apps_script_id: Option<String>,
    pub reference: String,
    pub names: PathBuf,
    pub log_level: String,
}

/// Blank strings count as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    pub fn resolve(overrides: Overrides, toml: TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();

        Self {
            bind: non_blank(overrides.bind)
                .or_else(|| non_blank(toml.bind))
                .unwrap_or(defaults.bind),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            sheet_url: non_blank(overrides.sheet_url).or_else(|| non_blank(toml.sheet_url)),
            apps_script_id: non_blank(overrides.apps_script_id)
                .or_else(|| non_blank(toml.apps_script_id)),
            reference: non_blank(overrides.reference)
                .or_else(|| non_blank(toml.reference))
                .unwrap_or(defaults.reference),
            names: overrides.names.or(toml.names).unwrap_or(defaults.names),
            log_level: non_blank(Some(toml.logging.level)).unwrap_or(defaults.log_level),
        }
    }

    /// Append endpoint derived from the apps-script id
    pub fn append_url(&self) -> Option<String> {
        self.apps_script_id.as_deref().map(apps_script_url)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Platform config file locations, most specific first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("wikara").join("config.toml"));
    }
    if cfg!(unix) {
        paths.push(PathBuf::from("/etc/wikara/config.toml"));
    }
    paths
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load the TOML config
///
/// An explicit path must exist. Without one, the first default location
/// that exists is used; if none does, defaults apply.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        info!("Loading config from {}", path.display());
        return read_toml_config(path);
    }

    match default_config_paths().into_iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading config from {}", path.display());
            read_toml_config(&path)
        }
        None => {
            warn!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}
