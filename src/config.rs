//! Tool configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (openapi-compare.toml)
//! - Environment variables (OPENAPI_COMPARE_*)
//!
//! ## Example config file (openapi-compare.toml):
//! ```toml
//! [reports]
//! output_dir = "./reports"
//! report_name = "compare-report"
//! csv = true
//! html = false
//!
//! [rules]
//! file = "rules.json"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the comparison tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Report settings
    #[serde(default)]
    pub reports: ReportConfig,

    /// Rule file settings
    #[serde(default)]
    pub rules: RuleFileConfig,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Folder report files are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Base file name (extension added per format)
    #[serde(default = "default_report_name")]
    pub report_name: String,

    /// Emit the CSV report
    #[serde(default)]
    pub csv: bool,

    /// Emit the JSON dump
    #[serde(default)]
    pub json: bool,

    /// Emit the HTML report
    #[serde(default)]
    pub html: bool,
}

/// Rule file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFileConfig {
    /// Path to a JSON rule file overriding built-in severities
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_name() -> String {
    "compare-report".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            report_name: default_report_name(),
            csv: false,
            json: false,
            html: false,
        }
    }
}

impl CompareConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["openapi-compare.toml", ".openapi-compare.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "openapi-compare")
        {
            let xdg_config = config_dir.config_dir().join("openapi-compare.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("OPENAPI_COMPARE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Path a report of the given extension is written to.
    pub fn report_path(&self, extension: &str) -> PathBuf {
        self.reports
            .output_dir
            .join(format!("{}.{}", self.reports.report_name, extension))
    }
}
