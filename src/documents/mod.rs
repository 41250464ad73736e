//! Document emitter: writes the generated artifacts of a workspace.
//!
//! [`WorkspaceDocumentGenerator`] is a stateless service over injected
//! collaborators. Every emit operation is idempotent and only fails when an
//! artifact cannot be written; unreadable inputs fall back to defaults.

mod commands;
mod instructions;
mod settings;
mod templates;
mod validate;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, instrument, warn};

use crate::commands::{CommandCategory, CommandStore, InMemoryCommandStore, UserCommand};
use crate::common::{LocalFs, WorkspaceFs};
use crate::config::{ConfigSource, GlobalConfig, MemoryConfigSource};
use crate::permissions::PermissionResolver;
use crate::workspace::{
    WorkspaceContext, WorkspaceLayout, WorkspaceMetadata, validate_workspace_id,
};
use crate::{Error, Result};

pub use commands::{CommandEmitReport, CommandFailure, render_command_file, render_command_index};
pub use instructions::{
    format_coding_standards, format_commands_list, format_context_files,
    format_permissions_summary,
};
pub use settings::{SettingsDocument, SettingsMetadata};
pub use templates::{DEFAULT_CLAUDE_MD, DEFAULT_PERMISSIONS_JSON};
pub use validate::{DocumentStatus, REQUIRED_DOCUMENTS, STALE_AFTER_HOURS};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Paths written by [`WorkspaceDocumentGenerator::generate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub instructions: PathBuf,
    pub settings: PathBuf,
    pub commands: CommandEmitReport,
}

#[derive(Clone)]
pub struct WorkspaceDocumentGenerator {
    config: Arc<dyn ConfigSource>,
    commands: Arc<dyn CommandStore>,
    fs: Arc<dyn WorkspaceFs>,
    layout: WorkspaceLayout,
    resolver: PermissionResolver,
    clock: Clock,
}

impl fmt::Debug for WorkspaceDocumentGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceDocumentGenerator")
            .field("config", &self.config.name())
            .field("commands", &self.commands.name())
            .field("fs", &self.fs.name())
            .field("layout", &self.layout)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl WorkspaceDocumentGenerator {
    pub fn builder() -> WorkspaceDocumentGeneratorBuilder {
        WorkspaceDocumentGeneratorBuilder::default()
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Instructions, settings and command documents, in that order, with
    /// commands read from the command store.
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn generate_all(
        &self,
        workspace_id: &str,
        context: &WorkspaceContext,
    ) -> Result<GenerationReport> {
        validate_workspace_id(workspace_id)?;
        let instructions = self.emit_instructions_document(workspace_id, context).await?;
        let settings = self.emit_settings_document(workspace_id, context).await?;

        let config = self.load_config().await;
        let commands = self.load_commands(&config).await;
        let commands = self.emit_command_documents(workspace_id, &commands).await?;

        info!(
            commands = commands.written.len(),
            failed = commands.failures.len(),
            "Generated workspace documents"
        );
        Ok(GenerationReport {
            instructions,
            settings,
            commands,
        })
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    async fn load_config(&self) -> GlobalConfig {
        match self.config.load_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(source = self.config.name(), error = %e, "Failed to load global config, using defaults");
                GlobalConfig::default()
            }
        }
    }

    async fn load_metadata(&self, workspace_id: &str) -> WorkspaceMetadata {
        WorkspaceMetadata::load(self.fs.as_ref(), &self.layout.metadata(workspace_id)).await
    }

    /// Commands from the store; the config's legacy global commands when the
    /// store fails or is empty.
    async fn load_commands(&self, config: &GlobalConfig) -> Vec<UserCommand> {
        match self.commands.get_all_commands().await {
            Ok(commands) if !commands.is_empty() => return commands,
            Ok(_) => debug!(store = self.commands.name(), "Command store is empty, using global commands"),
            Err(e) => warn!(store = self.commands.name(), error = %e, "Failed to load commands, using global commands"),
        }

        let global = &config.commands.global_commands;
        let startup = global
            .startup
            .iter()
            .cloned()
            .map(|c| c.into_user_command(CommandCategory::Startup));
        let reply = global
            .reply
            .iter()
            .cloned()
            .map(|c| c.into_user_command(CommandCategory::Reply));
        startup.chain(reply).collect()
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.fs
            .write(path, contents)
            .await
            .map_err(|e| Error::write(path, e))
    }
}

/// Builder for [`WorkspaceDocumentGenerator`]. Unset collaborators default
/// to the built-in config, an empty command store and the local filesystem.
#[derive(Default)]
pub struct WorkspaceDocumentGeneratorBuilder {
    config: Option<Arc<dyn ConfigSource>>,
    commands: Option<Arc<dyn CommandStore>>,
    fs: Option<Arc<dyn WorkspaceFs>>,
    workspaces_root: Option<PathBuf>,
    user_settings: Option<Option<PathBuf>>,
    clock: Option<Clock>,
}

impl WorkspaceDocumentGeneratorBuilder {
    pub fn config(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn commands(mut self, commands: Arc<dyn CommandStore>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn fs(mut self, fs: Arc<dyn WorkspaceFs>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Directory holding one subdirectory per workspace id.
    pub fn workspaces_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspaces_root = Some(root.into());
        self
    }

    /// User settings file consulted by the permission resolver. Defaults to
    /// `~/.claude/settings.json`.
    pub fn user_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_settings = Some(Some(path.into()));
        self
    }

    pub fn without_user_settings(mut self) -> Self {
        self.user_settings = Some(None);
        self
    }

    pub fn clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Freezes generation timestamps at `at`.
    pub fn fixed_time(self, at: DateTime<Utc>) -> Self {
        self.clock(move || at)
    }

    pub fn build(self) -> WorkspaceDocumentGenerator {
        let config = self
            .config
            .unwrap_or_else(|| Arc::new(MemoryConfigSource::new()));

        let resolver = PermissionResolver::new(config.clone());
        let resolver = match self.user_settings {
            Some(Some(path)) => resolver.with_settings_path(path),
            Some(None) => resolver.without_user_settings(),
            None => resolver,
        };

        WorkspaceDocumentGenerator {
            config,
            commands: self
                .commands
                .unwrap_or_else(|| Arc::new(InMemoryCommandStore::new())),
            fs: self.fs.unwrap_or_else(|| Arc::new(LocalFs::new())),
            layout: self
                .workspaces_root
                .map(WorkspaceLayout::new)
                .unwrap_or_default(),
            resolver,
            clock: self.clock.unwrap_or_else(|| Arc::new(Utc::now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemoryFs;
    use crate::template::TemplateVars;
    use chrono::TimeZone;
    use std::time::{Duration, SystemTime};

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn generator(fs: &MemoryFs) -> WorkspaceDocumentGenerator {
        WorkspaceDocumentGenerator::builder()
            .fs(Arc::new(fs.clone()))
            .workspaces_root("/ws")
            .without_user_settings()
            .fixed_time(fixed())
            .build()
    }

    #[tokio::test]
    async fn test_instructions_fully_substituted() {
        let fs = MemoryFs::new();
        fs.insert("/ws/alpha/context/brief.md", "brief").await;
        fs.insert("/ws/alpha/workspace.json", r#"{"description": "Checkout API"}"#)
            .await;

        let context = WorkspaceContext::new("alpha", "/ws/alpha");
        let path = generator(&fs)
            .emit_instructions_document("alpha", &context)
            .await
            .unwrap();

        let text = fs.contents(&path).await.unwrap();
        assert!(TemplateVars::unresolved(&text).is_empty());
        assert!(text.contains("# Workspace alpha"));
        assert!(text.contains("Checkout API"));
        assert!(text.contains("- `context/brief.md`"));
        assert!(text.contains("### Startup Commands"));
        assert!(text.contains("Generated 2026-03-01T09:30:00Z"));
    }

    #[tokio::test]
    async fn test_settings_document_shape() {
        let fs = MemoryFs::new();
        let context = WorkspaceContext::new("beta", "/ws/beta")
            .with_project_type("review")
            .with_description("Review payments");

        let path = generator(&fs)
            .emit_settings_document("beta", &context)
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/ws/beta/.claude/settings.json"));

        let settings: serde_json::Value =
            serde_json::from_str(&fs.contents(&path).await.unwrap()).unwrap();
        assert_eq!(settings["metadata"]["workspaceId"], "beta");
        assert_eq!(settings["metadata"]["projectType"], "review");
        assert_eq!(settings["metadata"]["generated"], "2026-03-01T09:30:00Z");
        assert_eq!(settings["metadata"]["description"], "Review payments");
        assert!(settings["permissions"]["allow"].as_array().unwrap().len() > 10);

        let legacy: serde_json::Value = serde_json::from_str(
            &fs.contents(Path::new("/ws/beta/permissions.json")).await.unwrap(),
        )
        .unwrap();
        assert_eq!(legacy["workspaceId"], "beta");
        assert!(legacy["permissions"]["fileSystem"]["write"].is_array());
    }

    #[tokio::test]
    async fn test_legacy_commands_when_store_empty() {
        let fs = MemoryFs::new();
        let generator = generator(&fs);
        let config = generator.load_config().await;

        let commands = generator.load_commands(&config).await;
        assert!(commands.iter().all(|c| c.is_default));
        assert!(commands.iter().any(|c| c.is_startup()));
        assert!(commands.iter().all(|c| c.created_at == DateTime::<Utc>::UNIX_EPOCH));
        assert_eq!(commands, generator.load_commands(&config).await);
    }

    #[tokio::test]
    async fn test_config_failure_falls_back() {
        let fs = MemoryFs::new();
        let config = MemoryConfigSource::new();
        config.fail_with("offline").await;
        let generator = WorkspaceDocumentGenerator::builder()
            .config(Arc::new(config))
            .fs(Arc::new(fs.clone()))
            .workspaces_root("/ws")
            .without_user_settings()
            .build();

        let context = WorkspaceContext::new("gamma", "/ws/gamma");
        assert!(generator.generate_all("gamma", &context).await.is_ok());
        assert!(generator.validate_documents("gamma").await);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let fs = MemoryFs::new();
        fs.fail_writes_containing("CLAUDE.md").await;

        let err = generator(&fs)
            .emit_instructions_document("delta", &WorkspaceContext::new("delta", "/ws/delta"))
            .await
            .unwrap_err();
        assert!(err.is_write_error());
        assert!(err.to_string().contains("/ws/delta/CLAUDE.md"));
    }

    #[tokio::test]
    async fn test_stale_documents_still_valid() {
        let fs = MemoryFs::new();
        let generator = generator(&fs);
        generator
            .generate_all("eps", &WorkspaceContext::new("eps", "/ws/eps"))
            .await
            .unwrap();

        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);
        fs.set_modified(Path::new("/ws/eps/CLAUDE.md"), old).await;

        let statuses = generator.inspect_documents("eps").await;
        assert!(matches!(statuses[0].1, DocumentStatus::Stale { .. }));
        assert!(statuses.iter().all(|(_, s)| s.exists()));
        assert!(generator.validate_documents("eps").await);
    }
}
