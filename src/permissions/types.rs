//! Resolved, source-agnostic permission model for one workspace.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::defaults;

/// Effective permissions of a workspace.
///
/// Every section is defaulted field by field, so a partial override such as
/// `{"git": {"allowedOperations": ["status"]}}` is completed from the
/// hardcoded default rather than producing an incomplete object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkspacePermissions {
    pub file_system: FileSystemPermissions,
    pub git: GitPermissions,
    pub external: ExternalPermissions,
    pub commands: CommandPermissions,
    pub system_access: SystemAccess,
}

impl Default for WorkspacePermissions {
    fn default() -> Self {
        defaults::default_permissions()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSystemPermissions {
    pub read: Vec<String>,
    pub write: Vec<String>,
    pub execute: Vec<String>,
}

impl Default for FileSystemPermissions {
    fn default() -> Self {
        defaults::default_permissions().file_system
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitPermissions {
    pub allowed_operations: Vec<String>,
    pub protected_branches: Vec<String>,
    pub requires_approval: Vec<String>,
}

impl Default for GitPermissions {
    fn default() -> Self {
        defaults::default_permissions().git
    }
}

impl GitPermissions {
    pub fn allows(&self, operation: &str) -> bool {
        self.allowed_operations.iter().any(|op| op == operation)
    }

    pub fn needs_approval(&self, operation: &str) -> bool {
        self.requires_approval.iter().any(|op| op == operation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalPermissions {
    pub allowed_hosts: Vec<String>,
    pub api_keys: BTreeMap<String, ApiKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandPermissions {
    pub allowed: Vec<String>,
    pub requires_approval: Vec<String>,
    pub forbidden: Vec<String>,
}

impl Default for CommandPermissions {
    fn default() -> Self {
        defaults::default_permissions().commands
    }
}

impl CommandPermissions {
    pub fn is_forbidden(&self, command: &str) -> bool {
        self.forbidden.iter().any(|c| c == command)
    }

    pub fn needs_approval(&self, command: &str) -> bool {
        self.requires_approval.iter().any(|c| c == command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemAccess {
    pub can_install_packages: bool,
    pub can_modify_environment: bool,
    pub can_access_network: bool,
    pub max_resource_usage: ResourceQuota,
}

impl Default for SystemAccess {
    fn default() -> Self {
        defaults::default_permissions().system_access
    }
}

/// Resource ceilings: memory and disk in MB, cpu in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuota {
    pub memory: u64,
    pub cpu: u32,
    pub disk: u64,
}

impl Default for ResourceQuota {
    fn default() -> Self {
        defaults::DEFAULT_QUOTA
    }
}

/// Opaque API secret. Never rendered: `Debug` and serialization redact it.
pub struct ApiKey(SecretString);

impl ApiKey {
    pub const REDACTED: &'static str = "[REDACTED]";

    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for ApiKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for ApiKey {}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", Self::REDACTED)
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(Self::REDACTED)
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Role template shape as stored in the global configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_system: FileSystemPermissions,
    pub git: GitPermissions,
    pub external: ExternalPermissions,
    pub commands: CommandPermissions,
    pub system_access: SystemAccess,
}

impl Default for PermissionSet {
    fn default() -> Self {
        WorkspacePermissions::default().into()
    }
}

impl From<PermissionSet> for WorkspacePermissions {
    fn from(set: PermissionSet) -> Self {
        Self {
            file_system: set.file_system,
            git: set.git,
            external: set.external,
            commands: set.commands,
            system_access: set.system_access,
        }
    }
}

impl From<WorkspacePermissions> for PermissionSet {
    fn from(permissions: WorkspacePermissions) -> Self {
        Self {
            description: None,
            file_system: permissions.file_system,
            git: permissions.git,
            external: permissions.external,
            commands: permissions.commands,
            system_access: permissions.system_access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_filled_from_default() {
        let json = r#"{"git": {"allowedOperations": ["status"]}}"#;
        let permissions: WorkspacePermissions = serde_json::from_str(json).unwrap();
        let default = WorkspacePermissions::default();

        assert_eq!(permissions.git.allowed_operations, vec!["status"]);
        assert_eq!(
            permissions.git.protected_branches,
            default.git.protected_branches
        );
        assert_eq!(permissions.file_system, default.file_system);
        assert_eq!(permissions.system_access, default.system_access);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(WorkspacePermissions::default()).unwrap();
        assert!(json.get("fileSystem").is_some());
        assert!(json["systemAccess"].get("canAccessNetwork").is_some());
        assert!(json["systemAccess"]["maxResourceUsage"].get("memory").is_some());
    }

    #[test]
    fn test_api_keys_never_rendered() {
        let mut permissions = WorkspacePermissions::default();
        permissions
            .external
            .api_keys
            .insert("jira".to_string(), ApiKey::new("sk-very-secret"));

        let json = serde_json::to_string(&permissions).unwrap();
        let debug = format!("{:?}", permissions);

        assert!(!json.contains("sk-very-secret"));
        assert!(json.contains(ApiKey::REDACTED));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_api_key_deserialize() {
        let json = r#"{"external": {"apiKeys": {"jira": "token-1"}}}"#;
        let permissions: WorkspacePermissions = serde_json::from_str(json).unwrap();
        assert_eq!(permissions.external.api_keys["jira"].expose(), "token-1");
    }

    #[test]
    fn test_permission_set_conversion() {
        let set = PermissionSet {
            description: Some("read only".to_string()),
            ..Default::default()
        };
        let permissions: WorkspacePermissions = set.clone().into();
        assert_eq!(permissions.git, set.git);
        assert_eq!(permissions.commands, set.commands);
    }
}
