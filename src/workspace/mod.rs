//! Workspace inputs: the caller supplied context, on-disk metadata and the
//! artifact layout.

mod context;
mod layout;
mod metadata;

pub use context::{GitInfo, JiraTicket, WorkspaceContext};
pub use layout::{
    CLAUDE_MD, COMMANDS_DIR, COMMANDS_INDEX, COMMANDS_JSON, CONTEXT_DIR, METADATA_FILE,
    PERMISSIONS_JSON, SETTINGS_FILE, WorkspaceLayout, validate_workspace_id,
};
pub use metadata::WorkspaceMetadata;
