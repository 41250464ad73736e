//! Presence and freshness checks of the generated artifacts.

use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{instrument, warn};

use super::WorkspaceDocumentGenerator;
use crate::workspace::{CLAUDE_MD, COMMANDS_JSON, PERMISSIONS_JSON, validate_workspace_id};

/// Artifacts that must exist for a workspace to be usable.
pub const REQUIRED_DOCUMENTS: &[&str] = &[CLAUDE_MD, PERMISSIONS_JSON, COMMANDS_JSON];

/// Age in hours after which an artifact is reported stale.
pub const STALE_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Missing,
    Fresh { modified: DateTime<Utc> },
    Stale { modified: DateTime<Utc> },
    Unreadable(String),
}

impl DocumentStatus {
    pub fn exists(&self) -> bool {
        matches!(self, DocumentStatus::Fresh { .. } | DocumentStatus::Stale { .. })
    }
}

impl WorkspaceDocumentGenerator {
    /// Status of each required artifact, in [`REQUIRED_DOCUMENTS`] order.
    /// Empty for an invalid workspace id.
    pub async fn inspect_documents(&self, workspace_id: &str) -> Vec<(PathBuf, DocumentStatus)> {
        if validate_workspace_id(workspace_id).is_err() {
            return Vec::new();
        }
        let now = self.now();
        let stale_after = TimeDelta::hours(STALE_AFTER_HOURS);
        let mut statuses = Vec::with_capacity(REQUIRED_DOCUMENTS.len());

        for name in REQUIRED_DOCUMENTS {
            let path = self.layout.artifact(workspace_id, name);
            let status = match self.fs.modified(&path).await {
                Ok(None) => DocumentStatus::Missing,
                Ok(Some(modified)) => {
                    let modified = DateTime::<Utc>::from(modified);
                    if now - modified > stale_after {
                        DocumentStatus::Stale { modified }
                    } else {
                        DocumentStatus::Fresh { modified }
                    }
                }
                Err(e) => DocumentStatus::Unreadable(e.to_string()),
            };
            statuses.push((path, status));
        }
        statuses
    }

    /// `false` when a required artifact is missing or unreadable. Stale
    /// artifacts are only logged.
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn validate_documents(&self, workspace_id: &str) -> bool {
        if let Err(e) = validate_workspace_id(workspace_id) {
            warn!(error = %e, "Cannot validate documents");
            return false;
        }
        let mut valid = true;
        for (path, status) in self.inspect_documents(workspace_id).await {
            match status {
                DocumentStatus::Fresh { .. } => {}
                DocumentStatus::Stale { modified } => {
                    warn!(path = %path.display(), modified = %modified, "Document is stale");
                }
                DocumentStatus::Missing => {
                    warn!(path = %path.display(), "Required document missing");
                    valid = false;
                }
                DocumentStatus::Unreadable(error) => {
                    warn!(path = %path.display(), error = %error, "Cannot inspect document");
                    valid = false;
                }
            }
        }
        valid
    }
}
