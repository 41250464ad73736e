//! Append-only rule set builder with forward-only phases.

use serde::{Deserialize, Serialize};

use super::CompiledRuleSet;

/// Construction phases, in the only order they can be entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RulePhase {
    #[default]
    BaseAllow,
    ConfigurableAllow,
    BaseDeny,
    ConfigurableDeny,
}

impl RulePhase {
    pub fn is_allow(&self) -> bool {
        matches!(self, RulePhase::BaseAllow | RulePhase::ConfigurableAllow)
    }

    pub fn is_base(&self) -> bool {
        matches!(self, RulePhase::BaseAllow | RulePhase::BaseDeny)
    }
}

impl std::fmt::Display for RulePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RulePhase::BaseAllow => "base-allow",
            RulePhase::ConfigurableAllow => "configurable-allow",
            RulePhase::BaseDeny => "base-deny",
            RulePhase::ConfigurableDeny => "configurable-deny",
        };
        f.write_str(name)
    }
}

/// Builds a [`CompiledRuleSet`].
///
/// Rules can only be appended to the current phase or a later one; entering
/// a later phase closes every earlier one, so base rules always precede the
/// configurable rules of the same list. Base rules are appended verbatim,
/// configurable rules already present in their list are skipped.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    phase: RulePhase,
    allow: Vec<String>,
    deny: Vec<String>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RulePhase {
        self.phase
    }

    /// Appends `rules` under `phase`. Returns `false`, appending nothing,
    /// when `phase` is already closed.
    pub fn push_all<I, S>(&mut self, phase: RulePhase, rules: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if phase < self.phase {
            tracing::warn!(
                phase = %phase,
                current = %self.phase,
                "Rejected rules for a closed phase"
            );
            return false;
        }
        self.phase = phase;

        let list = if phase.is_allow() {
            &mut self.allow
        } else {
            &mut self.deny
        };
        for rule in rules {
            let rule = rule.into();
            if phase.is_base() || !list.contains(&rule) {
                list.push(rule);
            }
        }
        true
    }

    pub fn base_allow<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_all(RulePhase::BaseAllow, rules);
        self
    }

    pub fn configurable_allow<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_all(RulePhase::ConfigurableAllow, rules);
        self
    }

    pub fn base_deny<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_all(RulePhase::BaseDeny, rules);
        self
    }

    pub fn configurable_deny<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_all(RulePhase::ConfigurableDeny, rules);
        self
    }

    pub fn build(self) -> CompiledRuleSet {
        CompiledRuleSet {
            allow: self.allow,
            deny: self.deny,
        }
    }
}
