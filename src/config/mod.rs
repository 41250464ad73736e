//! Injected configuration: the global workshop config and the user-level
//! Claude Code settings file.
//!
//! ```rust,no_run
//! use claude_workspace::config::{ConfigSource, FileConfigSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = FileConfigSource::new("config/workshop.yaml");
//! let config = source.load_config().await?;
//! println!("{} role templates", config.permissions.templates.len());
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod global;
pub mod memory;
pub mod settings;
pub mod source;

use std::path::PathBuf;

pub use file::FileConfigSource;
pub use global::{
    CommandsConfig, DocumentTemplates, DocumentsConfig, GlobalCommands, GlobalConfig,
    PermissionsConfig,
};
pub use memory::MemoryConfigSource;
pub use settings::{NativePermissionSettings, UserSettings};
pub use source::ConfigSource;

use thiserror::Error;

/// Errors that can occur in configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required configuration file is missing
    #[error("Config file not found: {}", path.display())]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider error
    #[error("Provider error: {message}")]
    Provider {
        /// Error message
        message: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
