//! Per-command prompt files, their index and the legacy `commands.json`.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::WorkspaceDocumentGenerator;
use crate::commands::{HotKey, UserCommand};
use crate::workspace::{COMMANDS_INDEX, validate_workspace_id};
use crate::{Error, Result};

/// One command whose file could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub keyword: String,
    pub error: String,
}

/// Outcome of a command batch. Per-command failures do not stop the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEmitReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<CommandFailure>,
    pub index: PathBuf,
    pub manifest: PathBuf,
}

impl CommandEmitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    /// Escalates collected failures into [`Error::PartialCommandWrite`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        let details = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.keyword, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::PartialCommandWrite {
            failed: self.failures.len(),
            total: self.total(),
            details,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandsManifest<'a> {
    workspace_id: &'a str,
    generated: String,
    commands: &'a [UserCommand],
    hot_keys: &'a [HotKey],
}

/// Body of `.claude/commands/<keyword>.md`.
pub fn render_command_file(command: &UserCommand) -> String {
    let mut body = command.base_prompt.trim_end().to_string();
    body.push('\n');

    if !command.context_adaptations.is_empty() {
        body.push_str("\n## Context Adaptations\n\n");
        for adaptation in &command.context_adaptations {
            body.push_str(&format!("- {}\n", adaptation));
        }
    }

    body.push_str("\n<!--\n");
    body.push_str(&format!("category: {}\n", command.category));
    if let Some(duration) = &command.estimated_duration {
        body.push_str(&format!("estimated duration: {}\n", duration));
    }
    body.push_str(&format!(
        "requires approval: {}\n",
        if command.requires_approval { "yes" } else { "no" }
    ));
    if !command.follow_ups.is_empty() {
        let follow_ups: Vec<String> = command.follow_ups.iter().map(|k| format!("/{}", k)).collect();
        body.push_str(&format!("follow-ups: {}\n", follow_ups.join(", ")));
    }
    body.push_str("-->\n");
    body
}

/// Body of `.claude/commands/README.md`.
pub fn render_command_index(commands: &[UserCommand]) -> String {
    let mut index = String::from(
        "# Workspace Commands\n\nRun a command by typing its slash keyword in Claude Code.\n\n",
    );
    if commands.is_empty() {
        index.push_str("No commands configured.\n");
        return index;
    }
    for command in commands {
        let approval = if command.requires_approval { " ⚠" } else { "" };
        index.push_str(&format!(
            "- `/{}`: {} ({}){}\n",
            command.keyword.trim_start_matches('/'),
            command.name,
            command.category,
            approval
        ));
    }
    index
}

impl WorkspaceDocumentGenerator {
    /// Writes one prompt file per command plus the index and the legacy
    /// manifest. Failures of individual command files are collected in the
    /// report; failing to write the index or manifest is an error.
    #[instrument(skip_all, fields(workspace_id = %workspace_id, count = commands.len()))]
    pub async fn emit_command_documents(
        &self,
        workspace_id: &str,
        commands: &[UserCommand],
    ) -> Result<CommandEmitReport> {
        validate_workspace_id(workspace_id)?;
        let now = self.now();
        let config = self.load_config().await;
        let dir = self.layout.commands_dir(workspace_id);
        self.fs
            .create_dir_all(&dir)
            .await
            .map_err(|e| Error::write(&dir, e))?;

        let mut written = Vec::new();
        let mut failures = Vec::new();
        let mut seen = HashSet::new();

        for command in commands {
            let stem = match command.file_stem() {
                Ok(stem) => stem,
                Err(e) => {
                    warn!(keyword = %command.keyword, error = %e, "Skipping command");
                    failures.push(CommandFailure {
                        keyword: command.keyword.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            if !seen.insert(stem.to_string()) {
                warn!(keyword = %command.keyword, "Skipping duplicate command keyword");
                failures.push(CommandFailure {
                    keyword: command.keyword.clone(),
                    error: "duplicate keyword".to_string(),
                });
                continue;
            }

            let path = dir.join(format!("{}.md", stem));
            match self.write(&path, &render_command_file(command)).await {
                Ok(()) => written.push(path),
                Err(e) => {
                    warn!(keyword = %command.keyword, error = %e, "Failed to write command file");
                    failures.push(CommandFailure {
                        keyword: command.keyword.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let index = dir.join(COMMANDS_INDEX);
        self.write(&index, &render_command_index(commands)).await?;

        let manifest = CommandsManifest {
            workspace_id,
            generated: super::timestamp(now),
            commands,
            hot_keys: &config.commands.hot_keys,
        };
        let manifest_path = self.layout.commands_json(workspace_id);
        self.write(&manifest_path, &serde_json::to_string_pretty(&manifest)?)
            .await?;

        info!(
            written = written.len(),
            failed = failures.len(),
            "Wrote command documents"
        );
        Ok(CommandEmitReport {
            written,
            failures,
            index,
            manifest: manifest_path,
        })
    }
}
