//! Global workshop configuration shared by every workspace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::commands::{
    HotKey, LegacyCommand, builtin_hot_keys, builtin_reply_commands, builtin_startup_commands,
};
use crate::permissions::{PermissionSet, Role, builtin_role_templates};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalConfig {
    pub documents: DocumentsConfig,
    pub permissions: PermissionsConfig,
    pub commands: CommandsConfig,
}

impl GlobalConfig {
    /// Role template configured for `role`, if any.
    pub fn role_template(&self, role: Role) -> Option<&PermissionSet> {
        self.permissions.templates.get(role.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentsConfig {
    pub templates: DocumentTemplates,
    pub coding_standards: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            templates: DocumentTemplates::default(),
            coding_standards: vec![
                "Follow the conventions already used in the repository".to_string(),
                "Keep changes focused on the current task".to_string(),
                "Add or update tests for behavior you change".to_string(),
                "Write review notes and open questions to feedback/".to_string(),
            ],
        }
    }
}

/// Template overrides. `None` uses the built-in template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentTemplates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionsConfig {
    /// Role name to template.
    pub templates: HashMap<String, PermissionSet>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            templates: builtin_role_templates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandsConfig {
    pub global_commands: GlobalCommands,
    pub hot_keys: Vec<HotKey>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            global_commands: GlobalCommands::default(),
            hot_keys: builtin_hot_keys(),
        }
    }
}

/// Legacy command definitions, used when the command store is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalCommands {
    pub startup: Vec<LegacyCommand>,
    pub reply: Vec<LegacyCommand>,
}

impl Default for GlobalCommands {
    fn default() -> Self {
        Self {
            startup: builtin_startup_commands(),
            reply: builtin_reply_commands(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: GlobalConfig = serde_json::from_str("{}").unwrap();
        assert!(config.role_template(Role::Reviewer).is_some());
        assert!(!config.documents.coding_standards.is_empty());
        assert!(!config.commands.global_commands.startup.is_empty());
    }

    #[test]
    fn test_explicit_empty_templates() {
        let json = r#"{"permissions": {"templates": {}}}"#;
        let config: GlobalConfig = serde_json::from_str(json).unwrap();
        assert!(config.role_template(Role::Developer).is_none());
    }

    #[test]
    fn test_custom_template_overrides_builtin() {
        let json = r##"{
            "permissions": {
                "templates": {
                    "reviewer": {
                        "description": "Strict review",
                        "fileSystem": {"read": ["target/**"], "write": [], "execute": []}
                    }
                }
            },
            "documents": {"templates": {"claudeMd": "# {{WORKSPACE_ID}}"}}
        }"##;
        let config: GlobalConfig = serde_json::from_str(json).unwrap();

        let reviewer = config.role_template(Role::Reviewer).unwrap();
        assert_eq!(reviewer.description.as_deref(), Some("Strict review"));
        assert_eq!(reviewer.file_system.read, vec!["target/**"]);
        assert!(reviewer.file_system.write.is_empty());
        assert!(config.role_template(Role::Analyst).is_none());
        assert_eq!(
            config.documents.templates.claude_md.as_deref(),
            Some("# {{WORKSPACE_ID}}")
        );
    }
}
