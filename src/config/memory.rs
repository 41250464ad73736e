//! In-Memory Configuration Source
//!
//! Useful for testing and code-defined configuration.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::source::ConfigSource;
use super::{ConfigError, ConfigResult, GlobalConfig};

/// In-memory configuration source
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    config: Arc<RwLock<GlobalConfig>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryConfigSource {
    /// Source holding the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Source holding `config`
    pub fn with_config(config: GlobalConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the held config
    pub async fn set(&self, config: GlobalConfig) {
        *self.config.write().await = config;
    }

    /// Make subsequent loads fail with `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }
}

#[async_trait::async_trait]
impl ConfigSource for MemoryConfigSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_config(&self) -> ConfigResult<GlobalConfig> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(ConfigError::Provider { message });
        }
        Ok(self.config.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_set() {
        let source = MemoryConfigSource::new();
        let mut config = GlobalConfig::default();
        config.documents.coding_standards = vec!["Prefer small commits".to_string()];
        source.set(config).await;

        let loaded = source.load_config().await.unwrap();
        assert_eq!(loaded.documents.coding_standards, vec!["Prefer small commits"]);
    }

    #[tokio::test]
    async fn test_memory_source_failure() {
        let source = MemoryConfigSource::new();
        source.fail_with("config service offline").await;

        let err = source.load_config().await.unwrap_err();
        assert!(err.to_string().contains("config service offline"));
    }
}
