//! Configuration loading traits and types.
//!
//! Plan files are TOML. Any deserializable struct can be read with
//! [`ConfigLoader::load`]; the sections shared by every plan file live here.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cnet_common::config::{ConfigError, ConfigLoader, SharedConfig, SystemConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct MyPlan {
//!     shared: SharedConfig,
//!     system: SystemConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let plan = MyPlan::load(Path::new("plan.toml"))?;
//!     let config = plan.system.to_config()?;
//!     println!("{}: {} heap", plan.shared.service_name, config.heap_bytes());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::Level;

use crate::bytes::ByteQuantity;
use crate::consts::DEFAULT_WORD_BYTES;
use crate::system::Config;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Per-layer planning detail.
    Debug,
    /// One line per network built.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages only.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Common configuration fields shared across plan files.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "cnet-64g"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name of the plan, printed above its report.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The `[system]` section: the machine a network is sized for.
///
/// # TOML Example
///
/// ```toml
/// [system]
/// heap = "64 GiB"
/// processors = 64
/// word_bytes = 8      # optional
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Total heap size, as a byte count or a string like `"64 GiB"`.
    pub heap: ByteQuantity,

    /// Number of processors.
    pub processors: u64,

    /// Heap word size.
    #[serde(default = "default_word_bytes")]
    pub word_bytes: ByteQuantity,
}

fn default_word_bytes() -> ByteQuantity {
    DEFAULT_WORD_BYTES
}

impl SystemConfig {
    /// Validate the section and turn it into an analysis [`Config`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` carrying the model's reason when
    /// the heap, processor count or word size is rejected.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        Config::with_word_bytes(self.heap, self.processors, self.word_bytes)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid or a field
///   has the wrong shape
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any deserializable struct is loadable.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GIB;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize)]
        struct TestWrapper {
            level: LogLevel,
        }

        let parse = |s: &str| TestWrapper::from_toml(s).unwrap().level;
        assert_eq!(parse("level = \"trace\""), LogLevel::Trace);
        assert_eq!(parse("level = \"debug\""), LogLevel::Debug);
        assert_eq!(parse("level = \"info\""), LogLevel::Info);
        assert_eq!(parse("level = \"warn\""), LogLevel::Warn);
        assert_eq!(parse("level = \"error\""), LogLevel::Error);
    }

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_shared_config_validation_empty_service_name() {
        let config = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_system_config_defaults_word_size() {
        let system = SystemConfig::from_toml("heap = \"1 GiB\"\nprocessors = 8\n").unwrap();
        let config = system.to_config().unwrap();
        assert_eq!(config.heap_bytes(), GIB);
        assert_eq!(config.num_processors(), 8);
        assert_eq!(config.word_bytes(), ByteQuantity::new(8));
    }

    #[test]
    fn test_system_config_rejects_zero_processors() {
        let system = SystemConfig::from_toml("heap = 1024\nprocessors = 0\n").unwrap();
        assert!(matches!(
            system.to_config(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_system_config_rejects_unknown_field() {
        let result = SystemConfig::from_toml("heap = 1024\nprocessors = 1\ncores = 2\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = SystemConfig::load(Path::new("/nonexistent/path/plan.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = SystemConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
