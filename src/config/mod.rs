//! Configuration system for jsonfilter.
//!
//! Defaults for command-line options can be kept in a TOML file so that
//! scripts calling jsonfilter repeatedly don't need to pass them every time.
//! Command-line options always take precedence.
//!
//! # Example
//!
//! ```
//! use jsonfilter::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.separator, " ");
//! assert!(!config.quiet);
//!
//! // Create custom configuration
//! let custom = Config {
//!     separator: ",".to_string(),
//!     ..Config::default()
//! };
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for the jsonfilter command.
///
/// # Fields
///
/// * `separator` - Field separator for exported key and index lists (default: " ")
/// * `quiet` - Suppress diagnostics on stderr (default: false)
/// * `array_mode` - Treat the input as a sequence of values collected into an array (default: false)
/// * `log_level` - Log filter used when `RUST_LOG` is unset (default: "warn")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Field separator for exported lists
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Suppress diagnostics
    #[serde(default)]
    pub quiet: bool,

    /// Collect all input values into one array
    #[serde(default)]
    pub array_mode: bool,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Returns the default field separator.
fn default_separator() -> String {
    " ".to_string()
}

/// Returns the default log filter.
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            quiet: false,
            array_mode: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/jsonfilter/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("jsonfilter");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if there is no home directory or no
    /// config file.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error naming the file, so the caller can report it once logging is up.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Saves configuration to a specific file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
