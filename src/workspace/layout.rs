use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const SETTINGS_FILE: &str = ".claude/settings.json";
pub const PERMISSIONS_JSON: &str = "permissions.json";
pub const COMMANDS_JSON: &str = "commands.json";
pub const COMMANDS_DIR: &str = ".claude/commands";
pub const COMMANDS_INDEX: &str = "README.md";
pub const METADATA_FILE: &str = "workspace.json";
pub const CONTEXT_DIR: &str = "context";

fn workspace_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid workspace id regex")
    })
}

/// Rejects ids that are not a single plain directory name, so absolute
/// paths, separators and `..` never reach the filesystem.
pub fn validate_workspace_id(workspace_id: &str) -> Result<()> {
    if workspace_id_regex().is_match(workspace_id) {
        Ok(())
    } else {
        Err(Error::InvalidWorkspaceId(workspace_id.to_string()))
    }
}

/// Maps workspace ids to artifact paths under a shared root. Ids are
/// joined as given; callers validate them with [`validate_workspace_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workspace_dir(&self, workspace_id: &str) -> PathBuf {
        self.root.join(workspace_id)
    }

    pub fn artifact(&self, workspace_id: &str, relative: &str) -> PathBuf {
        self.workspace_dir(workspace_id).join(relative)
    }

    pub fn claude_md(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, CLAUDE_MD)
    }

    pub fn settings(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, SETTINGS_FILE)
    }

    pub fn permissions_json(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, PERMISSIONS_JSON)
    }

    pub fn commands_json(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, COMMANDS_JSON)
    }

    pub fn commands_dir(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, COMMANDS_DIR)
    }

    pub fn metadata(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, METADATA_FILE)
    }

    pub fn context_dir(&self, workspace_id: &str) -> PathBuf {
        self.artifact(workspace_id, CONTEXT_DIR)
    }
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new("workspaces")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let layout = WorkspaceLayout::new("/srv/workspaces");
        assert_eq!(
            layout.claude_md("ws-1"),
            PathBuf::from("/srv/workspaces/ws-1/CLAUDE.md")
        );
        assert_eq!(
            layout.settings("ws-1"),
            PathBuf::from("/srv/workspaces/ws-1/.claude/settings.json")
        );
        assert_eq!(
            layout.commands_dir("ws-1").join("plan.md"),
            PathBuf::from("/srv/workspaces/ws-1/.claude/commands/plan.md")
        );
    }

    #[test]
    fn test_workspace_id_validation() {
        for ok in ["ws-1", "UP_17", "checkout.v2"] {
            assert!(validate_workspace_id(ok).is_ok(), "{ok}");
        }
        for bad in ["", "/etc/cron.d", "../escape", "..", ".hidden", "a/b", "a\\b", "ws 1"] {
            assert!(
                matches!(validate_workspace_id(bad), Err(Error::InvalidWorkspaceId(_))),
                "{bad}"
            );
        }
    }
}
