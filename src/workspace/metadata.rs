use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::WorkspaceFs;

pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_TASK: &str = "No current task";

/// Contents of `workspace.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkspaceMetadata {
    pub description: String,
    pub current_task: String,
}

impl Default for WorkspaceMetadata {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            current_task: DEFAULT_TASK.to_string(),
        }
    }
}

impl WorkspaceMetadata {
    /// Reads metadata from `path`; missing or malformed files yield defaults.
    pub async fn load(fs: &dyn WorkspaceFs, path: &Path) -> Self {
        let content = match fs.read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No workspace metadata, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read workspace metadata");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed workspace metadata");
                Self::default()
            }
        }
    }

    pub fn has_task(&self) -> bool {
        !self.current_task.trim().is_empty() && self.current_task != DEFAULT_TASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemoryFs;

    #[tokio::test]
    async fn test_load_partial() {
        let fs = MemoryFs::new();
        fs.insert("/ws/workspace.json", r#"{"currentTask": "Fix login"}"#)
            .await;

        let metadata = WorkspaceMetadata::load(&fs, Path::new("/ws/workspace.json")).await;
        assert_eq!(metadata.current_task, "Fix login");
        assert_eq!(metadata.description, DEFAULT_DESCRIPTION);
        assert!(metadata.has_task());
    }

    #[tokio::test]
    async fn test_load_missing_and_malformed() {
        let fs = MemoryFs::new();
        let missing = WorkspaceMetadata::load(&fs, Path::new("/ws/workspace.json")).await;
        assert_eq!(missing, WorkspaceMetadata::default());
        assert!(!missing.has_task());

        fs.insert("/ws/workspace.json", "{ nope").await;
        let malformed = WorkspaceMetadata::load(&fs, Path::new("/ws/workspace.json")).await;
        assert_eq!(malformed, WorkspaceMetadata::default());
    }
}
