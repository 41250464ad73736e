//! `CLAUDE.md`: the human-readable instructions document.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use super::WorkspaceDocumentGenerator;
use super::templates::DEFAULT_CLAUDE_MD;
use crate::Result;
use crate::commands::UserCommand;
use crate::permissions::WorkspacePermissions;
use crate::template::{self, TemplateVars};
use crate::workspace::{
    CONTEXT_DIR, WorkspaceContext, WorkspaceMetadata, validate_workspace_id,
};

const NONE: &str = "none";

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Bullet summary of `permissions`. API keys are never listed.
pub fn format_permissions_summary(permissions: &WorkspacePermissions) -> String {
    let fs = &permissions.file_system;
    let git = &permissions.git;
    let commands = &permissions.commands;
    let access = &permissions.system_access;
    let quota = access.max_resource_usage;

    [
        format!("- **Read**: {}", list_or_none(&fs.read)),
        format!("- **Write**: {}", list_or_none(&fs.write)),
        format!("- **Execute**: {}", list_or_none(&fs.execute)),
        format!("- **Git operations**: {}", list_or_none(&git.allowed_operations)),
        format!("- **Git operations requiring approval**: {}", list_or_none(&git.requires_approval)),
        format!("- **Protected branches**: {}", list_or_none(&git.protected_branches)),
        format!("- **Allowed commands**: {}", list_or_none(&commands.allowed)),
        format!("- **Commands requiring approval**: {}", list_or_none(&commands.requires_approval)),
        format!("- **Forbidden commands**: {}", list_or_none(&commands.forbidden)),
        format!("- **Allowed hosts**: {}", list_or_none(&permissions.external.allowed_hosts)),
        format!("- **Network access**: {}", yes_no(access.can_access_network)),
        format!("- **Package installation**: {}", yes_no(access.can_install_packages)),
        format!("- **Environment changes**: {}", yes_no(access.can_modify_environment)),
        format!(
            "- **Resource limits**: {} MB memory, {}% CPU, {} MB disk",
            quota.memory, quota.cpu, quota.disk
        ),
    ]
    .join("\n")
}

fn command_line(command: &UserCommand) -> String {
    let mut line = format!(
        "- {} ({}): {}",
        command.name,
        command.keyword,
        command.summary_line()
    );
    if command.requires_approval {
        line.push_str(" ⚠");
    }
    line
}

/// Commands grouped under Startup, Reply and Custom headings. Empty groups
/// are omitted.
pub fn format_commands_list(commands: &[UserCommand]) -> String {
    let startup: Vec<&UserCommand> = commands.iter().filter(|c| c.is_startup()).collect();
    let reply: Vec<&UserCommand> = commands
        .iter()
        .filter(|c| c.is_default && !c.is_startup())
        .collect();
    let custom: Vec<&UserCommand> = commands.iter().filter(|c| !c.is_default).collect();

    let sections: Vec<String> = [
        ("Startup Commands", startup),
        ("Reply Commands", reply),
        ("Custom Commands", custom),
    ]
    .into_iter()
    .filter(|(_, group)| !group.is_empty())
    .map(|(heading, group)| {
        let lines: Vec<String> = group.into_iter().map(command_line).collect();
        format!("### {}\n\n{}", heading, lines.join("\n"))
    })
    .collect();

    if sections.is_empty() {
        "No commands configured.".to_string()
    } else {
        sections.join("\n\n")
    }
}

pub fn format_context_files(files: &[String]) -> String {
    if files.is_empty() {
        "No context files.".to_string()
    } else {
        files
            .iter()
            .map(|f| format!("- `{}`", f))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_coding_standards(standards: &[String], custom: Option<&str>) -> String {
    let mut lines: Vec<String> = standards.iter().map(|s| format!("- {}", s)).collect();
    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        lines.extend(custom.lines().map(|l| format!("- {}", l.trim())));
    }
    if lines.is_empty() {
        "No coding standards configured.".to_string()
    } else {
        lines.join("\n")
    }
}

fn describe(context: &WorkspaceContext, metadata: &WorkspaceMetadata) -> String {
    let mut description = context
        .description
        .clone()
        .unwrap_or_else(|| metadata.description.clone());

    if let Some(git) = &context.git_info {
        let mut origin = format!("\n\nRepository: {} (branch `{}`", git.repository, git.branch);
        if let Some(commit) = &git.commit {
            origin.push_str(&format!(" at `{}`", commit));
        }
        origin.push(')');
        description.push_str(&origin);
    }
    description
}

fn current_task(context: &WorkspaceContext, metadata: &WorkspaceMetadata) -> String {
    if metadata.has_task() {
        return metadata.current_task.clone();
    }
    context
        .jira_summary()
        .unwrap_or_else(|| metadata.current_task.clone())
}

impl WorkspaceDocumentGenerator {
    /// Writes `CLAUDE.md`. Only the final write can fail; every input falls
    /// back to its default.
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn emit_instructions_document(
        &self,
        workspace_id: &str,
        context: &WorkspaceContext,
    ) -> Result<PathBuf> {
        validate_workspace_id(workspace_id)?;
        let now = self.now();
        let config = self.load_config().await;
        let metadata = self.load_metadata(workspace_id).await;
        let permissions = self.resolver.resolve(workspace_id, Some(context)).await;
        let commands = self.load_commands(&config).await;
        let context_files = self.context_files(workspace_id).await;

        let vars = TemplateVars::new()
            .with(template::WORKSPACE_ID, workspace_id)
            .with(template::WORKSPACE_DESCRIPTION, describe(context, &metadata))
            .with(template::CURRENT_TASK, current_task(context, &metadata))
            .with(template::PERMISSIONS_SUMMARY, format_permissions_summary(&permissions))
            .with(template::COMMANDS_LIST, format_commands_list(&commands))
            .with(template::CONTEXT_FILES, format_context_files(&context_files))
            .with(
                template::CODING_STANDARDS,
                format_coding_standards(
                    &config.documents.coding_standards,
                    context.custom_instructions.as_deref(),
                ),
            )
            .with(template::TIMESTAMP, super::timestamp(now));

        let source = config
            .documents
            .templates
            .claude_md
            .as_deref()
            .unwrap_or(DEFAULT_CLAUDE_MD);
        let rendered = vars.render(source);
        let leftover = TemplateVars::unresolved(&rendered);
        if !leftover.is_empty() {
            warn!(placeholders = ?leftover, "Instructions template has unknown placeholders");
        }

        let path = self.layout.claude_md(workspace_id);
        self.write(&path, &rendered).await?;
        info!(path = %path.display(), "Wrote instructions document");
        Ok(path)
    }

    /// Workspace-relative names of the entries in `context/`.
    async fn context_files(&self, workspace_id: &str) -> Vec<String> {
        let dir = self.layout.context_dir(workspace_id);
        match self.fs.list_dir(&dir).await {
            Ok(entries) => entries
                .iter()
                .filter_map(|p| p.file_name())
                .map(|name| format!("{}/{}", CONTEXT_DIR, name.to_string_lossy()))
                .collect(),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to list context files");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandCategory;
    use crate::workspace::{GitInfo, JiraTicket};

    fn command(name: &str, keyword: &str, category: CommandCategory, default: bool) -> UserCommand {
        UserCommand::new(name, keyword, category, format!("{} prompt\nmore detail", name))
            .with_default(default)
    }

    #[test]
    fn test_commands_bucketed() {
        let commands = vec![
            command("Plan", "plan", CommandCategory::Startup, true),
            command("Continue", "continue", CommandCategory::Reply, true),
            command("Deploy", "deploy", CommandCategory::Startup, false).with_requires_approval(true),
        ];
        let list = format_commands_list(&commands);

        let custom = list.find("### Custom Commands").unwrap();
        let startup = list.find("### Startup Commands").unwrap();
        let reply = list.find("### Reply Commands").unwrap();
        let deploy = list.find("- Deploy (deploy): Deploy prompt ⚠").unwrap();

        assert!(startup < reply && reply < custom);
        assert!(deploy > custom);
        assert!(list.contains("- Plan (plan): Plan prompt\n"));
    }

    #[test]
    fn test_empty_command_list() {
        assert_eq!(format_commands_list(&[]), "No commands configured.");
    }

    #[test]
    fn test_permissions_summary() {
        let mut permissions = WorkspacePermissions::default();
        permissions
            .external
            .api_keys
            .insert("jira".into(), crate::permissions::ApiKey::new("secret-token"));

        let summary = format_permissions_summary(&permissions);
        assert!(summary.contains("- **Read**: context/**, target/**, feedback/**"));
        assert!(summary.contains("- **Execute**: none"));
        assert!(summary.contains("- **Network access**: yes"));
        assert!(summary.contains("2048 MB memory, 50% CPU, 5120 MB disk"));
        assert!(!summary.contains("secret-token"));
        assert!(!summary.contains("jira"));
    }

    #[test]
    fn test_coding_standards_with_custom_instructions() {
        let standards = vec!["Use rustfmt".to_string()];
        let rendered = format_coding_standards(&standards, Some("No unsafe\n  Prefer iterators "));
        assert_eq!(rendered, "- Use rustfmt\n- No unsafe\n- Prefer iterators");
        assert_eq!(
            format_coding_standards(&[], None),
            "No coding standards configured."
        );
    }

    #[test]
    fn test_description_and_task_sources() {
        let metadata = WorkspaceMetadata::default();
        let context = WorkspaceContext::new("ws", "/ws")
            .with_git_info(GitInfo {
                repository: "git@example.com:shop.git".into(),
                branch: "main".into(),
                commit: Some("abc123".into()),
            })
            .with_jira_ticket(JiraTicket::new("SHOP-1", "Fix cart"));

        let description = describe(&context, &metadata);
        assert!(description.starts_with(&metadata.description));
        assert!(description.ends_with("Repository: git@example.com:shop.git (branch `main` at `abc123`)"));
        assert_eq!(current_task(&context, &metadata), "SHOP-1: Fix cart");

        let with_task = WorkspaceMetadata {
            current_task: "Ship it".into(),
            ..Default::default()
        };
        assert_eq!(current_task(&context, &with_task), "Ship it");
    }
}
