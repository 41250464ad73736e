//! `.claude/settings.json` and the legacy `permissions.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::WorkspaceDocumentGenerator;
use super::templates::DEFAULT_PERMISSIONS_JSON;
use crate::Result;
use crate::compiler::{CompiledRuleSet, compile_rules};
use crate::permissions::ProjectType;
use crate::template::{self, TemplateVars};
use crate::workspace::{WorkspaceContext, validate_workspace_id};

/// Shape of `.claude/settings.json`, as read by Claude Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub permissions: CompiledRuleSet,
    pub metadata: SettingsMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsMetadata {
    pub workspace_id: String,
    pub project_type: ProjectType,
    pub generated: String,
    pub description: String,
}

impl WorkspaceDocumentGenerator {
    /// Resolves and compiles the workspace's rules into
    /// `.claude/settings.json`, then writes the resolved permissions to the
    /// legacy `permissions.json`.
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn emit_settings_document(
        &self,
        workspace_id: &str,
        context: &WorkspaceContext,
    ) -> Result<PathBuf> {
        validate_workspace_id(workspace_id)?;
        let now = self.now();
        let generated = super::timestamp(now);
        let config = self.load_config().await;
        let permissions = self.resolver.resolve(workspace_id, Some(context)).await;
        let project_type = context.project_type();

        let description = match &context.description {
            Some(description) => description.clone(),
            None => self.load_metadata(workspace_id).await.description,
        };

        let document = SettingsDocument {
            permissions: compile_rules(&permissions, project_type),
            metadata: SettingsMetadata {
                workspace_id: workspace_id.to_string(),
                project_type,
                generated: generated.clone(),
                description,
            },
        };
        let path = self.layout.settings(workspace_id);
        self.write(&path, &serde_json::to_string_pretty(&document)?)
            .await?;
        info!(
            path = %path.display(),
            allow = document.permissions.allow.len(),
            deny = document.permissions.deny.len(),
            "Wrote settings document"
        );

        let rendered = TemplateVars::new()
            .with(template::WORKSPACE_ID, workspace_id)
            .with(
                template::PERMISSIONS_JSON,
                serde_json::to_string_pretty(&permissions)?,
            )
            .with(template::TIMESTAMP, generated)
            .render(
                config
                    .documents
                    .templates
                    .permissions
                    .as_deref()
                    .unwrap_or(DEFAULT_PERMISSIONS_JSON),
            );
        let legacy = self.layout.permissions_json(workspace_id);
        self.write(&legacy, &rendered).await?;
        info!(path = %legacy.display(), "Wrote legacy permissions document");

        Ok(path)
    }
}
