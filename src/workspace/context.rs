use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::permissions::ProjectType;

/// Per-call input describing the workspace being generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceContext {
    pub workspace_id: String,
    pub workspace_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_info: Option<GitInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jira_tickets: Vec<JiraTicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitInfo {
    pub repository: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraTicket {
    pub key: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl JiraTicket {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl WorkspaceContext {
    pub fn new(workspace_id: impl Into<String>, workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            workspace_path: workspace_path.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    pub fn with_git_info(mut self, git_info: GitInfo) -> Self {
        self.git_info = Some(git_info);
        self
    }

    pub fn with_jira_ticket(mut self, ticket: JiraTicket) -> Self {
        self.jira_tickets.push(ticket);
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// Parsed project type; unknown or missing values are `General`.
    pub fn project_type(&self) -> ProjectType {
        ProjectType::parse_lenient(self.project_type.as_deref())
    }

    /// One line per ticket: `KEY: summary [status]`.
    pub fn jira_summary(&self) -> Option<String> {
        if self.jira_tickets.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .jira_tickets
            .iter()
            .map(|t| match &t.status {
                Some(status) => format!("{}: {} [{}]", t.key, t.summary, status),
                None => format!("{}: {}", t.key, t.summary),
            })
            .collect();
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_is_lenient() {
        let context = WorkspaceContext::new("ws", "/ws");
        assert_eq!(context.project_type(), ProjectType::General);

        let review = context.clone().with_project_type("review");
        assert_eq!(review.project_type(), ProjectType::Review);

        let unknown = context.with_project_type("spelunking");
        assert_eq!(unknown.project_type(), ProjectType::General);
    }

    #[test]
    fn test_jira_summary() {
        let context = WorkspaceContext::new("ws", "/ws")
            .with_jira_ticket(JiraTicket::new("PAY-12", "Retry webhooks").with_status("In Progress"))
            .with_jira_ticket(JiraTicket::new("PAY-13", "Document retries"));

        assert_eq!(
            context.jira_summary().unwrap(),
            "PAY-12: Retry webhooks [In Progress]\nPAY-13: Document retries"
        );
        assert!(WorkspaceContext::new("ws", "/ws").jira_summary().is_none());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "workspaceId": "ws-1",
            "workspacePath": "/srv/ws-1",
            "projectType": "analysis",
            "gitInfo": {"repository": "git@example.com:pay.git", "branch": "feature/retry"},
            "jiraTickets": [{"key": "PAY-1", "summary": "Investigate"}]
        }"#;
        let context: WorkspaceContext = serde_json::from_str(json).unwrap();
        assert_eq!(context.project_type(), ProjectType::Analysis);
        assert_eq!(context.git_info.unwrap().branch, "feature/retry");
        assert_eq!(context.jira_tickets.len(), 1);
    }
}
