//! Prelude module for convenient imports.
//!
//! ```rust
//! use claude_workspace::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Collaborators
pub use crate::commands::{CommandStore, FileCommandStore, InMemoryCommandStore};
pub use crate::common::{LocalFs, MemoryFs, WorkspaceFs};
pub use crate::config::{ConfigSource, FileConfigSource, GlobalConfig, MemoryConfigSource};

// Pipeline
pub use crate::compiler::{CompiledRuleSet, compile_rules};
pub use crate::documents::{CommandEmitReport, GenerationReport, WorkspaceDocumentGenerator};
pub use crate::permissions::{PermissionResolver, ProjectType, Role, WorkspacePermissions};

// Inputs
pub use crate::commands::{CommandCategory, UserCommand};
pub use crate::workspace::{GitInfo, JiraTicket, WorkspaceContext};
