//! Configuration management for tabgaze.
//!
//! Handles user preferences: TUI theme and display options. The
//! connection credential is deliberately NOT part of this file; it lives
//! behind the [`crate::store::CredentialStore`] port and is only
//! persisted on explicit opt-in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabgazeError};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TUI theme.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TabgazeError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| TabgazeError::ConfigError {
            message: e.to_string(),
        })
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TabgazeError::ConfigError {
            message: format!("Failed to serialize config: {e}"),
        })?;
        atomic_write(path, content.as_bytes())
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name.
    #[serde(default = "default_theme")]
    pub name: String,
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Use Unicode characters.
    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "dark".to_string(),
            color: true,
            unicode: true,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum characters shown inline per cell before truncation.
    #[serde(default = "default_cell_width")]
    pub cell_width: usize,
    /// Show classification labels (JSON/CSV/DATE/TEXT badges).
    #[serde(default = "default_true")]
    pub show_labels: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: 40,
            show_labels: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_cell_width() -> usize {
    40
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| TabgazeError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("tabgaze").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme.name, "dark");
        assert!(config.theme.color);
        assert_eq!(config.display.cell_width, 40);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.theme.name = "light".to_string();
        config.display.cell_width = 25;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme.name, "light");
        assert_eq!(loaded.display.cell_width, 25);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[theme]\nname = \"light\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme.name, "light");
        assert!(loaded.theme.color);
        assert_eq!(loaded.display.cell_width, 40);
    }
}
