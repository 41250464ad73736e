//! User-level Claude Code settings (`~/.claude/settings.json`).
//!
//! Only the parts the permission resolver consults are typed: an explicit
//! `workspacePermissions` override and the native `permissions` lists.
//! Everything else is preserved in `extra`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigResult;
use crate::permissions::WorkspacePermissions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_permissions: Option<WorkspacePermissions>,

    #[serde(default)]
    pub permissions: NativePermissionSettings,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativePermissionSettings {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default, rename = "defaultMode", skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
}

impl NativePermissionSettings {
    pub fn is_empty(&self) -> bool {
        self.deny.is_empty() && self.allow.is_empty() && self.default_mode.is_none()
    }
}

impl UserSettings {
    /// `~/.claude/settings.json`, when a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        crate::common::home_dir().map(|home| home.join(".claude").join("settings.json"))
    }

    /// Reads settings from `path`. A missing file is `Ok(None)`.
    pub async fn load(path: &Path) -> ConfigResult<Option<Self>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing() {
        let dir = tempdir().unwrap();
        let loaded = UserSettings::load(&dir.path().join("settings.json"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_native_permissions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let json = serde_json::json!({
            "model": "claude-sonnet-4-5",
            "permissions": {
                "allow": ["Bash(git status)"],
                "deny": ["Bash(rm *)"],
                "defaultMode": "acceptEdits"
            }
        });
        tokio::fs::write(&path, json.to_string()).await.unwrap();

        let settings = UserSettings::load(&path).await.unwrap().unwrap();
        assert!(settings.workspace_permissions.is_none());
        assert_eq!(settings.permissions.allow, vec!["Bash(git status)"]);
        assert_eq!(settings.permissions.default_mode.as_deref(), Some("acceptEdits"));
        assert!(settings.extra.contains_key("model"));
    }

    #[tokio::test]
    async fn test_load_workspace_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let json = serde_json::json!({
            "workspacePermissions": {
                "systemAccess": {"canAccessNetwork": false}
            }
        });
        tokio::fs::write(&path, json.to_string()).await.unwrap();

        let settings = UserSettings::load(&path).await.unwrap().unwrap();
        let override_permissions = settings.workspace_permissions.unwrap();
        assert!(!override_permissions.system_access.can_access_network);
        assert!(settings.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        assert!(UserSettings::load(&path).await.is_err());
    }
}
