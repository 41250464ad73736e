//! Filesystem collaborator used by the document emitter.
//!
//! All paths are absolute; callers join workspace-relative artifact names
//! onto the workspace directory before calling in.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait WorkspaceFs: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Writes UTF-8 text, creating missing parent directories.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Recursive and idempotent.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Direct children of `path`, sorted. A missing directory is empty.
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Last modification time, `None` when the file does not exist.
    async fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>>;
}

/// `tokio::fs` backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceFs for LocalFs {
    fn name(&self) -> &str {
        "local"
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => meta.modified().map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    contents: String,
    modified: SystemTime,
}

/// In-memory implementation for tests and dry runs.
///
/// Writes to paths containing one of the configured failure fragments
/// return `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<RwLock<BTreeMap<PathBuf, MemoryFile>>>,
    failing: Arc<RwLock<Vec<String>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write whose path contains `fragment` fail.
    pub async fn fail_writes_containing(&self, fragment: impl Into<String>) {
        self.failing.write().await.push(fragment.into());
    }

    pub async fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.write().await.insert(
            path.into(),
            MemoryFile {
                contents: contents.into(),
                modified: SystemTime::now(),
            },
        );
    }

    pub async fn remove(&self, path: &Path) -> bool {
        self.files.write().await.remove(path).is_some()
    }

    /// Overrides the modification time of an existing file.
    pub async fn set_modified(&self, path: &Path, modified: SystemTime) -> bool {
        match self.files.write().await.get_mut(path) {
            Some(file) => {
                file.modified = modified;
                true
            }
            None => false,
        }
    }

    pub async fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .await
            .get(path)
            .map(|f| f.contents.clone())
    }

    pub async fn paths(&self) -> Vec<PathBuf> {
        self.files.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl WorkspaceFs for MemoryFs {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).await.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let display = path.to_string_lossy();
        if self
            .failing
            .read()
            .await
            .iter()
            .any(|fragment| display.contains(fragment.as_str()))
        {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write to {} rejected", display),
            ));
        }
        self.insert(path, contents).await;
        Ok(())
    }

    async fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.files.read().await;
        let mut children: Vec<PathBuf> = files
            .keys()
            .filter_map(|p| {
                let rest = p.strip_prefix(path).ok()?;
                let first = rest.components().next()?;
                Some(path.join(first))
            })
            .collect();
        children.dedup();
        Ok(children)
    }

    async fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        Ok(self.files.read().await.get(path).map(|f| f.modified))
    }
}
