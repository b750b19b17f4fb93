//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/nsqwire/config.toml` by default:
//!
//! ```toml
//! [identify]
//! client_id = "worker-1"
//! feature_negotiation = true
//!
//! [defaults]
//! topic = "orders"
//! partition = "0"
//! channel = "billing"
//!
//! [output]
//! hex = true
//! ```

use std::path::{Path, PathBuf};

use nsqwire_protocol::IdentifyConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the nsqwire CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Body of `IDENTIFY` commands.
    pub identify: IdentifyConfig,

    /// Fallbacks for arguments left off the command line.
    pub defaults: DefaultSettings,

    /// Output settings.
    pub output: OutputSettings,
}

/// Default topic, partition and channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Topic used when `--topic` is not given.
    pub topic: Option<String>,

    /// Partition used when `--partition` is not given.
    pub partition: Option<String>,

    /// Channel used when `--channel` is not given.
    pub channel: Option<String>,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Write frames as hex text instead of raw bytes.
    pub hex: bool,
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nsqwire")
    }

    /// Checks the configuration for values the daemon would reject.
    pub fn validate(&self) -> Result<(), String> {
        self.identify
            .validate()
            .map_err(|e| format!("[identify] {}", e))?;

        for (name, value) in [
            ("topic", &self.defaults.topic),
            ("partition", &self.defaults.partition),
            ("channel", &self.defaults.channel),
        ] {
            if let Some(value) = value {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(format!(
                        "[defaults] {} must be non-empty and contain no whitespace",
                        name
                    ));
                }
            }
        }
        Ok(())
    }
}
