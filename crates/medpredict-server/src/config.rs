//! Configuration file support for the medpredict services.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/medpredict/config.toml` (lowest priority)
//! - Project-local: `.medpredict.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chest X-ray service settings.
    pub chest: ServiceConfig,
    /// Symptom service settings.
    pub symptom: ServiceConfig,
    /// Model artifact settings.
    pub models: ModelsConfig,
}

/// Per-service listen settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
}

/// Model artifact configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/medpredict/config.toml`
    /// 2. Project-local: `.medpredict.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as
    /// warnings.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        for (section, service) in [("chest", &self.chest), ("symptom", &self.symptom)] {
            if let Some(ref host) = service.host {
                if host.parse::<IpAddr>().is_err() {
                    return Err(format!("{section}.host must be an IP address, got '{host}'"));
                }
            }
            if service.port == Some(0) {
                return Err(format!("{section}.port must be non-zero"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.chest.host = other.chest.host.or_else(|| self.chest.host.take());
        self.chest.port = other.chest.port.or(self.chest.port);

        self.symptom.host = other.symptom.host.or_else(|| self.symptom.host.take());
        self.symptom.port = other.symptom.port.or(self.symptom.port);

        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("medpredict").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.medpredict.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".medpredict.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
