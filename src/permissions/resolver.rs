//! Tiered permission resolution.
//!
//! Priority (highest first):
//! 1. `workspacePermissions` override in the user settings file
//! 2. Derivation from the user's native `permissions.allow` list
//! 3. Role template from the global config, selected by project type
//! 4. Hardcoded default
//!
//! Read or parse failures at a tier are logged and fall through to the next
//! tier; resolution itself never fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{ProjectType, Role, WorkspacePermissions, derive_from_allow_list};
use crate::config::{ConfigSource, UserSettings};
use crate::workspace::WorkspaceContext;

/// Tier that produced the resolved permissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionSource {
    UserOverride,
    DerivedSettings,
    RoleTemplate(Role),
    Default,
}

impl std::fmt::Display for PermissionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionSource::UserOverride => write!(f, "user override"),
            PermissionSource::DerivedSettings => write!(f, "derived from user settings"),
            PermissionSource::RoleTemplate(role) => write!(f, "{} template", role),
            PermissionSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Clone)]
pub struct PermissionResolver {
    config: Arc<dyn ConfigSource>,
    settings_path: Option<PathBuf>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("config", &self.config.name())
            .field("settings_path", &self.settings_path)
            .finish()
    }
}

impl PermissionResolver {
    /// Resolver reading user settings from `~/.claude/settings.json`.
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self {
            config,
            settings_path: UserSettings::default_path(),
        }
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Skip the user settings tiers entirely.
    pub fn without_user_settings(mut self) -> Self {
        self.settings_path = None;
        self
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    pub async fn resolve(
        &self,
        workspace_id: &str,
        context: Option<&WorkspaceContext>,
    ) -> WorkspacePermissions {
        self.resolve_with_source(workspace_id, context).await.0
    }

    pub async fn resolve_with_source(
        &self,
        workspace_id: &str,
        context: Option<&WorkspaceContext>,
    ) -> (WorkspacePermissions, PermissionSource) {
        let (permissions, source) = self.resolve_tiers(workspace_id, context).await;
        tracing::debug!(workspace_id, source = %source, "Resolved workspace permissions");
        (permissions, source)
    }

    async fn resolve_tiers(
        &self,
        workspace_id: &str,
        context: Option<&WorkspaceContext>,
    ) -> (WorkspacePermissions, PermissionSource) {
        if let Some(settings) = self.load_user_settings(workspace_id).await {
            if let Some(permissions) = settings.workspace_permissions {
                return (permissions, PermissionSource::UserOverride);
            }

            if !settings.permissions.allow.is_empty() {
                match derive_from_allow_list(&settings.permissions.allow) {
                    Some(permissions) => return (permissions, PermissionSource::DerivedSettings),
                    None => tracing::debug!(
                        workspace_id,
                        "Native allow-list had no recognizable entries"
                    ),
                }
            }
        }

        let role = ProjectType::parse_lenient(context.and_then(|c| c.project_type.as_deref())).role();
        match self.config.load_config().await {
            Ok(config) => {
                if let Some(template) = config.role_template(role) {
                    return (template.clone().into(), PermissionSource::RoleTemplate(role));
                }
                tracing::debug!(workspace_id, role = %role, "No role template configured");
            }
            Err(e) => tracing::warn!(
                workspace_id,
                source = self.config.name(),
                error = %e,
                "Failed to load global config, using default permissions"
            ),
        }

        (WorkspacePermissions::default(), PermissionSource::Default)
    }

    async fn load_user_settings(&self, workspace_id: &str) -> Option<UserSettings> {
        let path = self.settings_path.as_deref()?;
        match UserSettings::load(path).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    workspace_id,
                    path = %path.display(),
                    error = %e,
                    "Failed to load user settings"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalConfig, MemoryConfigSource};
    use crate::permissions::builtin_template;
    use tempfile::tempdir;

    fn resolver_with(config: GlobalConfig, settings: &Path) -> PermissionResolver {
        PermissionResolver::new(Arc::new(MemoryConfigSource::with_config(config)))
            .with_settings_path(settings)
    }

    fn review_context() -> WorkspaceContext {
        WorkspaceContext::new("ws-1", "/tmp/ws-1").with_project_type("review")
    }

    #[tokio::test]
    async fn test_user_override_wins() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        let json = serde_json::json!({
            "workspacePermissions": {"commands": {"allowed": ["ls"]}},
            "permissions": {"allow": ["Bash(git status)"]}
        });
        tokio::fs::write(&settings, json.to_string()).await.unwrap();

        let resolver = resolver_with(GlobalConfig::default(), &settings);
        let (permissions, source) = resolver
            .resolve_with_source("ws-1", Some(&review_context()))
            .await;

        assert_eq!(source, PermissionSource::UserOverride);
        assert_eq!(permissions.commands.allowed, vec!["ls"]);
    }

    #[tokio::test]
    async fn test_derived_from_native_allow_list() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        let json = serde_json::json!({"permissions": {"allow": ["Bash(git diff *)"]}});
        tokio::fs::write(&settings, json.to_string()).await.unwrap();

        let resolver = resolver_with(GlobalConfig::default(), &settings);
        let (permissions, source) = resolver.resolve_with_source("ws-1", None).await;

        assert_eq!(source, PermissionSource::DerivedSettings);
        assert_eq!(permissions.git.allowed_operations, vec!["diff"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_reviewer_template() {
        let dir = tempdir().unwrap();
        let resolver = resolver_with(GlobalConfig::default(), &dir.path().join("missing.json"));

        let (permissions, source) = resolver
            .resolve_with_source("ws-1", Some(&review_context()))
            .await;

        assert_eq!(source, PermissionSource::RoleTemplate(Role::Reviewer));
        let expected: WorkspacePermissions = builtin_template(Role::Reviewer).into();
        assert_eq!(permissions, expected);
        assert_ne!(permissions, WorkspacePermissions::default());
    }

    #[tokio::test]
    async fn test_malformed_settings_fall_through() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        tokio::fs::write(&settings, "{ broken").await.unwrap();

        let resolver = resolver_with(GlobalConfig::default(), &settings);
        let (_, source) = resolver.resolve_with_source("ws-1", None).await;

        assert_eq!(source, PermissionSource::RoleTemplate(Role::Developer));
    }

    #[tokio::test]
    async fn test_unrecognized_allow_list_falls_through() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        let json = serde_json::json!({"permissions": {"allow": ["TodoWrite"]}});
        tokio::fs::write(&settings, json.to_string()).await.unwrap();

        let resolver = resolver_with(GlobalConfig::default(), &settings);
        let (_, source) = resolver
            .resolve_with_source("ws-1", Some(&review_context()))
            .await;

        assert_eq!(source, PermissionSource::RoleTemplate(Role::Reviewer));
    }

    #[tokio::test]
    async fn test_missing_template_uses_default() {
        let mut config = GlobalConfig::default();
        config.permissions.templates.clear();
        let resolver = PermissionResolver::new(Arc::new(MemoryConfigSource::with_config(config)))
            .without_user_settings();

        let (permissions, source) = resolver.resolve_with_source("ws-1", None).await;
        assert_eq!(source, PermissionSource::Default);
        assert_eq!(permissions, WorkspacePermissions::default());
    }

    #[tokio::test]
    async fn test_config_failure_uses_default() {
        let source = MemoryConfigSource::new();
        source.fail_with("unreachable").await;
        let resolver = PermissionResolver::new(Arc::new(source)).without_user_settings();

        let (_, tier) = resolver
            .resolve_with_source("ws-1", Some(&review_context()))
            .await;
        assert_eq!(tier, PermissionSource::Default);
    }
}
