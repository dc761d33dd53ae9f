//! Configuration management for Handoff.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AI gateway settings
    pub ai: AiConfig,

    /// UI/TUI settings
    pub ui: UiConfig,

    /// Document export settings
    pub export: ExportConfig,
}

/// AI gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Model to use for every gateway operation
    pub model: String,

    /// Override for the service base URL (self-hosted proxies, testing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, nord)
    pub theme: String,

    /// Event poll interval for the TUI loop, in milliseconds
    pub tick_rate_ms: u64,
}

/// Document export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory to write handover documents to (default: current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.handoff.toml` in current directory
    /// 2. `~/.config/handoff/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(".handoff.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("handoff").join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let handoff_dir = config_dir.join("handoff");
        std::fs::create_dir_all(&handoff_dir)?;

        let config_path = handoff_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("handoff"))
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            tick_rate_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert!(config.ai.base_url.is_none());
        assert_eq!(config.ui.theme, "default");
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(config.export.dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let toml = r#"
            [ai]
            model = "gemini-2.0-pro"

            [export]
            dir = "/tmp/handovers"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ai.model, "gemini-2.0-pro");
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.export.dir, Some(PathBuf::from("/tmp/handovers")));
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.ai.base_url = Some("http://localhost:8080/v1beta".to_string());
        config.ui.theme = "nord".to_string();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.ai.base_url, config.ai.base_url);
        assert_eq!(parsed.ui.theme, "nord");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntheme = \"nord\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.ui.theme, "nord");
    }
}
