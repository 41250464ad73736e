//! # claude-workspace
//!
//! Generates Claude Code permission policies and instruction documents for
//! per-workspace repository checkouts.
//!
//! A generation run is a three stage pipeline:
//!
//! 1. [`PermissionResolver`] picks the effective [`WorkspacePermissions`]
//!    (user override, derived native settings, role template, default).
//! 2. [`compile_rules`] expands them, together with the fixed base-security
//!    tier, into ordered `allow` / `deny` capability patterns.
//! 3. [`WorkspaceDocumentGenerator`] writes `CLAUDE.md`,
//!    `.claude/settings.json`, the legacy JSON artifacts and one prompt file
//!    per command.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use claude_workspace::{
//!     FileConfigSource, InMemoryCommandStore, LocalFs, WorkspaceContext,
//!     WorkspaceDocumentGenerator,
//! };
//!
//! # async fn example() -> claude_workspace::Result<()> {
//! let generator = WorkspaceDocumentGenerator::builder()
//!     .config(Arc::new(FileConfigSource::new("config/workshop.json")))
//!     .commands(Arc::new(InMemoryCommandStore::new()))
//!     .fs(Arc::new(LocalFs::new()))
//!     .workspaces_root("/srv/workspaces")
//!     .build();
//!
//! let context = WorkspaceContext::new("ws-42", "/srv/workspaces/ws-42")
//!     .with_project_type("review");
//! generator.generate_all("ws-42", &context).await?;
//! assert!(generator.validate_documents("ws-42").await);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod common;
pub mod compiler;
pub mod config;
pub mod documents;
pub mod permissions;
pub mod prelude;
pub mod template;
pub mod workspace;

use std::path::PathBuf;

pub use commands::{
    CommandCategory, CommandStore, FileCommandStore, HotKey, InMemoryCommandStore, LegacyCommand,
    UserCommand,
};
pub use common::{LocalFs, MemoryFs, WorkspaceFs};
pub use compiler::{CompiledRuleSet, RulePhase, RuleSetBuilder, base_allow, base_deny, compile_rules};
pub use config::{
    ConfigSource, FileConfigSource, GlobalConfig, MemoryConfigSource, UserSettings,
};
pub use documents::{
    CommandEmitReport, DocumentStatus, GenerationReport, WorkspaceDocumentGenerator,
    WorkspaceDocumentGeneratorBuilder,
};
pub use permissions::{
    ApiKey, PermissionDecision, PermissionPolicy, PermissionResolver, PermissionSet,
    PermissionSource, ProjectType, Role, WorkspacePermissions, derive_from_allow_list,
};
pub use template::TemplateVars;
pub use workspace::{GitInfo, JiraTicket, WorkspaceContext, WorkspaceLayout, WorkspaceMetadata};

/// Error type for claude-workspace operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a generated artifact failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization failed.
    #[error("YAML parsing failed: {0}")]
    Yaml(String),

    /// A command keyword cannot be used as a file name.
    #[error("Invalid command keyword '{0}'")]
    InvalidKeyword(String),

    /// A workspace id cannot be used as a directory name under the root.
    #[error("Invalid workspace id '{0}'")]
    InvalidWorkspaceId(String),

    /// Some command files of a batch could not be written.
    #[error("{failed} of {total} command files failed: {details}")]
    PartialCommandWrite {
        failed: usize,
        total: usize,
        details: String,
    },

    /// Command storage could not be read.
    #[error("Command store error: {0}")]
    CommandStore(String),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration, parsing, or setup errors (recoverable with defaults)
    Configuration,
    /// Artifact writes (abort the generation call)
    Write,
    /// Internal errors (IO, serialization)
    Internal,
}

impl Error {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Yaml(_) | Error::CommandStore(_) => {
                ErrorCategory::Configuration
            }
            Error::Write { .. }
            | Error::InvalidKeyword(_)
            | Error::InvalidWorkspaceId(_)
            | Error::PartialCommandWrite { .. } => ErrorCategory::Write,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_write_error(&self) -> bool {
        self.category() == ErrorCategory::Write
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound { path } => {
                Error::Config(format!("Config not found: {}", path.display()))
            }
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Yaml(message) => Error::Yaml(message),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Provider { message } => Error::Config(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
