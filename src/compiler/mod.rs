//! Rule compiler: expands resolved permissions into the agent tool's
//! ordered `allow` and `deny` capability patterns.
//!
//! Each list starts with its base-security tier, followed by the rules
//! derived from the workspace's permissions and project type. Deny is
//! authoritative when the tool evaluates both lists.

mod base;
mod builder;
mod configurable;

use serde::{Deserialize, Serialize};

use crate::permissions::{PermissionPolicy, ProjectType, WorkspacePermissions};

pub use base::{DESTRUCTIVE_COMMANDS, ROOT_FILES, SYSTEM_PATHS, WORKSPACE_AREAS, base_allow, base_deny};
pub use builder::{RulePhase, RuleSetBuilder};
pub use configurable::edit_scopes;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRuleSet {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl CompiledRuleSet {
    pub fn allows_pattern(&self, pattern: &str) -> bool {
        self.allow.iter().any(|r| r == pattern)
    }

    pub fn denies_pattern(&self, pattern: &str) -> bool {
        self.deny.iter().any(|r| r == pattern)
    }

    /// Evaluator for concrete tool calls against these rules.
    pub fn to_policy(&self) -> PermissionPolicy {
        PermissionPolicy::from_lists(&self.allow, &self.deny)
    }
}

/// Compiles `permissions` for a workspace of `project_type`. Pure and total.
pub fn compile_rules(
    permissions: &WorkspacePermissions,
    project_type: ProjectType,
) -> CompiledRuleSet {
    let rules = RuleSetBuilder::new()
        .base_allow(base_allow())
        .configurable_allow(configurable::configurable_allow(permissions, project_type))
        .base_deny(base_deny())
        .configurable_deny(configurable::configurable_deny(permissions))
        .build();

    tracing::debug!(
        project_type = %project_type,
        allow = rules.allow.len(),
        deny = rules.deny.len(),
        "Compiled permission rules"
    );
    rules
}
