//! Agent commands: the user command model, built-in seed commands and the
//! storage collaborator they are read from.

mod builtin;
mod store;

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Role;
use crate::{Error, Result};

pub use builtin::{builtin_hot_keys, builtin_reply_commands, builtin_startup_commands};
pub use store::{CommandStore, FileCommandStore, InMemoryCommandStore};

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid keyword regex"))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Startup,
    Reply,
    Development,
    Review,
    Analysis,
    Git,
    #[default]
    #[serde(other)]
    Custom,
}

impl CommandCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandCategory::Startup => "startup",
            CommandCategory::Reply => "reply",
            CommandCategory::Development => "development",
            CommandCategory::Review => "review",
            CommandCategory::Analysis => "analysis",
            CommandCategory::Git => "git",
            CommandCategory::Custom => "custom",
        }
    }
}

impl std::fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, slash-invocable prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCommand {
    pub id: Uuid,
    pub name: String,
    pub keyword: String,
    #[serde(default)]
    pub category: CommandCategory,
    pub base_prompt: String,
    #[serde(default)]
    pub required_permissions: Vec<String>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub average_completion_time_ms: u64,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_adaptations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<String>,
}

impl UserCommand {
    /// User-created command with a fresh id.
    pub fn new(
        name: impl Into<String>,
        keyword: impl Into<String>,
        category: CommandCategory,
        base_prompt: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            keyword: keyword.into(),
            category,
            base_prompt: base_prompt.into(),
            required_permissions: Vec::new(),
            requires_approval: false,
            roles: Role::ALL.to_vec(),
            usage_count: 0,
            success_rate: 0.0,
            average_completion_time_ms: 0,
            is_default: false,
            created_at: now,
            updated_at: now,
            context_adaptations: Vec::new(),
            estimated_duration: None,
            follow_ups: Vec::new(),
        }
    }

    pub fn with_requires_approval(mut self, requires_approval: bool) -> Self {
        self.requires_approval = requires_approval;
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_context_adaptation(mut self, adaptation: impl Into<String>) -> Self {
        self.context_adaptations.push(adaptation.into());
        self
    }

    pub fn with_estimated_duration(mut self, duration: impl Into<String>) -> Self {
        self.estimated_duration = Some(duration.into());
        self
    }

    pub fn with_follow_up(mut self, keyword: impl Into<String>) -> Self {
        self.follow_ups.push(keyword.into());
        self
    }

    pub fn with_timestamps(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// First non-empty line of the prompt.
    pub fn summary_line(&self) -> &str {
        self.base_prompt
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }

    pub fn is_startup(&self) -> bool {
        self.is_default && self.category == CommandCategory::Startup
    }

    /// Keyword usable as a file stem. A leading `/` is tolerated; anything
    /// that could leave the commands directory is rejected.
    pub fn file_stem(&self) -> Result<&str> {
        let keyword = self.keyword.trim().trim_start_matches('/');
        if keyword_regex().is_match(keyword) {
            Ok(keyword)
        } else {
            Err(Error::InvalidKeyword(self.keyword.clone()))
        }
    }
}

/// Key binding listed alongside the commands in `commands.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotKey {
    pub key: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HotKey {
    pub fn new(key: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Command shape of the global config's `globalCommands` lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCommand {
    pub name: String,
    pub keyword: String,
    pub prompt: String,
    #[serde(default)]
    pub requires_approval: bool,
}

impl LegacyCommand {
    pub fn new(name: impl Into<String>, keyword: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: keyword.into(),
            prompt: prompt.into(),
            requires_approval: false,
        }
    }

    pub fn with_requires_approval(mut self, requires_approval: bool) -> Self {
        self.requires_approval = requires_approval;
        self
    }

    /// Default command with an id derived from category and keyword and
    /// epoch timestamps, so repeated conversions are identical.
    pub fn into_user_command(self, category: CommandCategory) -> UserCommand {
        let seed = format!("{}/{}", category, self.keyword);
        UserCommand {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()),
            requires_approval: self.requires_approval,
            is_default: true,
            ..UserCommand::new(self.name, self.keyword, category, self.prompt)
                .with_timestamps(DateTime::<Utc>::UNIX_EPOCH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let command = UserCommand::new(
            "Plan",
            "plan",
            CommandCategory::Startup,
            "\n  Outline the work.\nThen wait for confirmation.",
        );
        assert_eq!(command.summary_line(), "Outline the work.");
    }

    #[test]
    fn test_file_stem_validation() {
        let mut command = UserCommand::new("Plan", "/plan", CommandCategory::Custom, "p");
        assert_eq!(command.file_stem().unwrap(), "plan");

        for bad in ["../escape", "a/b", "", "-flag", "with space"] {
            command.keyword = bad.to_string();
            assert!(
                matches!(command.file_stem(), Err(Error::InvalidKeyword(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_legacy_conversion_is_stable() {
        let a = LegacyCommand::new("Continue", "continue", "Keep going")
            .into_user_command(CommandCategory::Reply);
        let b = LegacyCommand::new("Continue", "continue", "Keep going")
            .into_user_command(CommandCategory::Reply);

        assert_eq!(a, b);
        assert_eq!(a.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert!(a.is_default);
        assert!(!a.is_startup());
    }

    #[test]
    fn test_deserialize_minimal_command() {
        let json = r#"{
            "id": "5a1a6a0e-3f7b-4c2b-9d53-0c6f1e0e9b11",
            "name": "Security sweep",
            "keyword": "sweep",
            "category": "security",
            "basePrompt": "Look for secrets in target/",
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-05T10:00:00Z"
        }"#;
        let command: UserCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command.category, CommandCategory::Custom);
        assert!(!command.is_default);
        assert!(command.roles.is_empty());
    }
}
