//! Configuration source trait

use super::{ConfigResult, GlobalConfig};

/// Supplies the global workshop configuration.
///
/// Passed to the resolver and the document generator at construction so
/// tests can inject fixture configs.
#[async_trait::async_trait]
pub trait ConfigSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Load the full configuration. Missing optional sections take their
    /// defaults; unreadable sources return an error.
    async fn load_config(&self) -> ConfigResult<GlobalConfig>;
}
