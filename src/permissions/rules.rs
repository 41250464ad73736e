//! Capability patterns and their evaluation.
//!
//! Patterns use the agent tool's micro-grammar: a bare capability such as
//! `TodoWrite`, or `Capability(scope)` such as `Edit(target/**)` or
//! `Bash(git status *)`.
//!
//! Path scopes are globs: `*` stays within one directory, `**` crosses
//! directories, and a scope without wildcards matches itself or anything
//! below it. Command scopes are plain text where `*` matches any run of
//! characters and a trailing `:*` is a prefix match.

use glob::MatchOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::shell::{self, has_parent_segment};
use super::{is_edit_tool, is_file_tool};

const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    Allow,
    #[default]
    Deny,
}

impl PermissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionResult {
    pub decision: PermissionDecision,
    pub reason: String,
}

impl PermissionResult {
    pub fn allowed(reason: impl Into<String>) -> Self {
        Self {
            decision: PermissionDecision::Allow,
            reason: reason.into(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            decision: PermissionDecision::Deny,
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }
}

/// Splits `Capability(scope)` into its parts. Bare capabilities have no
/// scope; malformed parentheses yield `None`.
pub fn parse_pattern(pattern: &str) -> Option<(&str, Option<&str>)> {
    let pattern = pattern.trim();
    match (pattern.find('('), pattern.rfind(')')) {
        (None, None) if !pattern.is_empty() => Some((pattern, None)),
        (Some(start), Some(end)) if start < end && end == pattern.len() - 1 && start > 0 => {
            Some((&pattern[..start], Some(&pattern[start + 1..end])))
        }
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub capability: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    pub decision: PermissionDecision,
}

impl PermissionRule {
    pub fn allow(pattern: &str) -> Option<Self> {
        Self::parse(pattern, PermissionDecision::Allow)
    }

    pub fn deny(pattern: &str) -> Option<Self> {
        Self::parse(pattern, PermissionDecision::Deny)
    }

    pub fn parse(pattern: &str, decision: PermissionDecision) -> Option<Self> {
        let (capability, scope) = parse_pattern(pattern)?;
        Some(Self {
            capability: capability.to_string(),
            scope: scope.map(str::to_string),
            decision,
        })
    }

    /// Renders the rule back into pattern form.
    pub fn pattern(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}({})", self.capability, scope),
            None => self.capability.clone(),
        }
    }

    pub fn matches(&self, tool_name: &str, input: &Value) -> bool {
        if self.capability != tool_name {
            return false;
        }

        let Some(scope) = &self.scope else {
            return true;
        };

        if tool_name == "WebFetch"
            && let Some(domain) = scope.strip_prefix("domain:")
        {
            return input
                .get("url")
                .and_then(|v| v.as_str())
                .is_some_and(|url| url.contains(domain));
        }

        let Some(value) = scoped_input(tool_name, input) else {
            return false;
        };
        if is_path_tool(tool_name) {
            path_scope_matches(scope, value)
        } else {
            scope_matches(scope, value)
        }
    }
}

fn is_path_tool(tool_name: &str) -> bool {
    is_file_tool(tool_name) || is_edit_tool(tool_name)
}

fn scoped_input<'a>(tool_name: &str, input: &'a Value) -> Option<&'a str> {
    let key = match tool_name {
        "Bash" => "command",
        "Read" | "Write" | "Edit" | "MultiEdit" => "file_path",
        "WebFetch" => "url",
        _ => "path",
    };
    input.get(key).and_then(|v| v.as_str())
}

/// Matches a command line against a command scope.
pub(crate) fn scope_matches(pattern: &str, input: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix(":*") {
        return input.starts_with(prefix);
    }

    if !pattern.contains('*') {
        return input == pattern || input.starts_with(&format!("{}/", pattern));
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let Some((first, rest)) = parts.split_first() else {
        return false;
    };
    let Some(remaining) = input.strip_prefix(*first) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return true;
    };

    let mut cursor = 0;
    for part in middle.iter().copied().filter(|p| !p.is_empty()) {
        match remaining[cursor..].find(part) {
            Some(pos) => cursor += pos + part.len(),
            None => return false,
        }
    }

    remaining[cursor..].ends_with(*last)
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Matches a file path against a path scope.
pub(crate) fn path_scope_matches(pattern: &str, path: &str) -> bool {
    let path = path.strip_prefix("./").unwrap_or(path);

    let literal_dir = pattern
        .strip_suffix("/**")
        .filter(|dir| !has_wildcard(dir))
        .or_else(|| (!has_wildcard(pattern)).then_some(pattern));
    if let Some(dir) = literal_dir {
        let dir = dir.trim_end_matches('/');
        return path == dir || path.starts_with(&format!("{}/", dir));
    }

    glob::Pattern::new(pattern).is_ok_and(|p| p.matches_with(path, PATH_MATCH))
}

/// Ordered rule evaluator: any matching deny rule wins over every allow
/// rule, and calls matching no rule are denied.
#[derive(Clone, Debug, Default)]
pub struct PermissionPolicy {
    pub rules: Vec<PermissionRule>,
}

impl PermissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists<A, D>(allow: A, deny: D) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let deny = deny
            .into_iter()
            .filter_map(|p| PermissionRule::deny(p.as_ref()));
        let allow = allow
            .into_iter()
            .filter_map(|p| PermissionRule::allow(p.as_ref()));
        Self {
            rules: deny.chain(allow).collect(),
        }
    }

    pub fn check(&self, tool_name: &str, input: &Value) -> PermissionResult {
        if is_path_tool(tool_name)
            && let Some(path) = scoped_input(tool_name, input)
            && has_parent_segment(path)
        {
            return PermissionResult::denied(format!("Path leaves the workspace: {}", path));
        }

        if tool_name == "Bash"
            && let Some(command) = scoped_input(tool_name, input)
        {
            return self.check_shell(command, input);
        }

        self.check_rules(tool_name, input)
    }

    fn check_rules(&self, tool_name: &str, input: &Value) -> PermissionResult {
        if let Some(rule) = self.first_match(PermissionDecision::Deny, tool_name, input) {
            return PermissionResult::denied(format!("Denied by rule: {}", rule.pattern()));
        }

        if let Some(rule) = self.first_match(PermissionDecision::Allow, tool_name, input) {
            return PermissionResult::allowed(format!("Allowed by rule: {}", rule.pattern()));
        }

        PermissionResult::denied(format!("{} not explicitly allowed", tool_name))
    }

    /// A command line is allowed only when every command it runs is allowed
    /// and no part of it is denied. Redirected files are checked as reads or
    /// writes.
    fn check_shell(&self, line: &str, input: &Value) -> PermissionResult {
        if let Some(rule) = self.first_match(PermissionDecision::Deny, "Bash", input) {
            return PermissionResult::denied(format!("Denied by rule: {}", rule.pattern()));
        }

        let parsed = match shell::split_commands(line) {
            Ok(parsed) => parsed,
            Err(reason) => return PermissionResult::denied(reason),
        };

        for redirect in parsed.redirects.iter().filter(|r| r.is_file()) {
            let tool = if redirect.input { "Read" } else { "Write" };
            let result = self.check(tool, &json!({ "file_path": redirect.target }));
            if result.is_denied() {
                return PermissionResult::denied(format!(
                    "Redirect to {}: {}",
                    redirect.target, result.reason
                ));
            }
        }

        let mut last = PermissionResult::denied("Bash not explicitly allowed");
        for command in &parsed.commands {
            if let Some(word) = command.split_whitespace().find(|w| has_parent_segment(w)) {
                return PermissionResult::denied(format!("Path leaves the workspace: {}", word));
            }
            last = self.check_rules("Bash", &json!({ "command": command }));
            if last.is_denied() {
                return last;
            }
        }
        last
    }

    fn first_match(
        &self,
        decision: PermissionDecision,
        tool_name: &str,
        input: &Value,
    ) -> Option<&PermissionRule> {
        self.rules
            .iter()
            .filter(|r| r.decision == decision)
            .find(|r| r.matches(tool_name, input))
    }
}
