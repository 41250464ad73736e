//! File-based configuration source
//!
//! Loads the global config from a JSON file, or YAML when the extension is
//! `.yaml`/`.yml`.

use std::path::{Path, PathBuf};

use super::source::ConfigSource;
use super::{ConfigError, ConfigResult, GlobalConfig};

/// File-based configuration source
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    required: bool,
}

impl FileConfigSource {
    /// Missing files load as the default config.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }

    /// Missing files are an error.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
    }

    fn parse(&self, content: &str) -> ConfigResult<GlobalConfig> {
        if self.is_yaml() {
            serde_yaml_bw::from_str(content).map_err(|e| ConfigError::Yaml(e.to_string()))
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }
}

#[async_trait::async_trait]
impl ConfigSource for FileConfigSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_config(&self) -> ConfigResult<GlobalConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => {
                tracing::debug!(path = %self.path.display(), "No config file, using defaults");
                return Ok(GlobalConfig::default());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        self.parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Role;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("workshop.json");

        let config = serde_json::json!({
            "documents": {
                "codingStandards": ["Use rustfmt"]
            }
        });
        tokio::fs::write(&config_path, config.to_string())
            .await
            .unwrap();

        let loaded = FileConfigSource::new(config_path).load_config().await.unwrap();
        assert_eq!(loaded.documents.coding_standards, vec!["Use rustfmt"]);
        assert!(loaded.role_template(Role::Developer).is_some());
    }

    #[tokio::test]
    async fn test_file_source_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("workshop.yaml");

        let yaml = r#"
commands:
  hotKeys:
    - key: ctrl+shift+r
      command: review
permissions:
  templates:
    analyst:
      systemAccess:
        canAccessNetwork: true
"#;
        tokio::fs::write(&config_path, yaml).await.unwrap();

        let loaded = FileConfigSource::new(config_path).load_config().await.unwrap();
        assert_eq!(loaded.commands.hot_keys.len(), 1);
        assert_eq!(loaded.commands.hot_keys[0].command, "review");
        assert!(
            loaded
                .role_template(Role::Analyst)
                .unwrap()
                .system_access
                .can_access_network
        );
    }

    #[tokio::test]
    async fn test_file_source_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.json");

        let optional = FileConfigSource::new(&config_path).load_config().await;
        assert!(optional.is_ok());

        let required = FileConfigSource::required(&config_path).load_config().await;
        assert!(matches!(required, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_file_source_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.json");
        tokio::fs::write(&config_path, "{\"documents\": ").await.unwrap();

        let result = FileConfigSource::new(config_path).load_config().await;
        assert!(matches!(result, Err(ConfigError::Serialization(_))));
    }
}
