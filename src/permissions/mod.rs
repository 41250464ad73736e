//! Workspace permission model, tiered resolution and capability rules.

mod defaults;
mod derive;
mod project;
mod resolver;
mod rules;
mod shell;
mod types;

pub use defaults::{builtin_role_templates, builtin_template, default_permissions};
pub use derive::derive_from_allow_list;
pub use project::{ProjectType, Role};
pub use resolver::{PermissionResolver, PermissionSource};
pub use rules::{
    PermissionDecision, PermissionPolicy, PermissionResult, PermissionRule, parse_pattern,
};
pub use types::{
    ApiKey, CommandPermissions, ExternalPermissions, FileSystemPermissions, GitPermissions,
    PermissionSet, ResourceQuota, SystemAccess, WorkspacePermissions,
};

/// Tools whose scope is a workspace path.
pub const FILE_TOOLS: &[&str] = &["Read", "LS", "Glob", "Grep"];
/// Tools that modify files.
pub const EDIT_TOOLS: &[&str] = &["Edit", "Write", "MultiEdit"];

pub fn is_file_tool(tool_name: &str) -> bool {
    FILE_TOOLS.contains(&tool_name)
}

pub fn is_edit_tool(tool_name: &str) -> bool {
    EDIT_TOOLS.contains(&tool_name)
}
