//! Command storage collaborator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserCommand;
use crate::{Error, Result};

/// Read access to the user's command library.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &str;

    async fn get_all_commands(&self) -> Result<Vec<UserCommand>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandStore {
    commands: Arc<RwLock<Vec<UserCommand>>>,
}

impl InMemoryCommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commands(commands: Vec<UserCommand>) -> Self {
        Self {
            commands: Arc::new(RwLock::new(commands)),
        }
    }

    pub async fn add(&self, command: UserCommand) {
        self.commands.write().await.push(command);
    }

    /// Removes a non-default command by keyword. Default commands are kept.
    pub async fn remove(&self, keyword: &str) -> bool {
        let mut commands = self.commands.write().await;
        let before = commands.len();
        commands.retain(|c| c.is_default || c.keyword != keyword);
        commands.len() != before
    }
}

#[async_trait]
impl CommandStore for InMemoryCommandStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_all_commands(&self) -> Result<Vec<UserCommand>> {
        Ok(self.commands.read().await.clone())
    }
}

/// Commands stored as a JSON array in a single file. A missing file is an
/// empty library.
#[derive(Debug, Clone)]
pub struct FileCommandStore {
    path: PathBuf,
}

impl FileCommandStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CommandStore for FileCommandStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_all_commands(&self) -> Result<Vec<UserCommand>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::CommandStore(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| Error::CommandStore(format!("{}: {}", self.path.display(), e)))
    }
}
