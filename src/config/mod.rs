//! Configuration management for railassets
//!
//! Settings come from a TOML file (`~/.railassets/config.toml` unless
//! `--config` names another) and are then overridden by command-line
//! arguments. Every field has a default, so a missing file or a partial
//! file is valid.
//!
//! ```toml
//! [display]
//! page_size = 10
//! max_column_width = 40
//! table_style = "modern"
//!
//! [export]
//! output_dir = "./relatorios"
//!
//! [export.pdf]
//! orientation = "landscape"
//!
//! [logging]
//! level = "warn"
//! timestamps = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::export::encoders::pdf::Orientation;
use crate::formatter::TableStyle;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listing output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of records per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Cells longer than this are truncated in tables (0 disables)
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,

    /// Table border style (modern, ascii, markdown, psql)
    #[serde(default)]
    pub table_style: TableStyle,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving exported files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Filename prefix; the asset kind's report name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,

    /// PDF page options
    #[serde(default)]
    pub pdf: PdfConfig,
}

/// PDF page options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Page orientation
    #[serde(default)]
    pub orientation: Orientation,

    /// TrueType font to embed instead of the built-in Helvetica
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_page_size() -> usize {
    10
}

fn default_max_column_width() -> usize {
    40
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_column_width: default_max_column_width(),
            table_style: TableStyle::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            base_name: None,
            pdf: PdfConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// With an explicit path the file must exist. Without one the default
    /// path is tried and a missing file yields the defaults.
    ///
    /// # Arguments
    /// * `path` - Explicit configuration file, if any
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".railassets")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.page_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.export.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.output_dir".to_string(),
                value: String::new(),
            }
            .into());
        }

        if let Some(name) = &self.export.base_name {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "export.base_name".to_string(),
                    value: name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
