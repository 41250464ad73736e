//! `{{NAME}}` placeholder substitution.
//!
//! A single global-replace pass per variable: no escaping, nesting or
//! conditionals. Values are inserted verbatim, so a value containing a
//! placeholder of a later variable may be expanded too.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

pub const WORKSPACE_ID: &str = "WORKSPACE_ID";
pub const WORKSPACE_DESCRIPTION: &str = "WORKSPACE_DESCRIPTION";
pub const CURRENT_TASK: &str = "CURRENT_TASK";
pub const PERMISSIONS_SUMMARY: &str = "PERMISSIONS_SUMMARY";
pub const COMMANDS_LIST: &str = "COMMANDS_LIST";
pub const CONTEXT_FILES: &str = "CONTEXT_FILES";
pub const CODING_STANDARDS: &str = "CODING_STANDARDS";
pub const TIMESTAMP: &str = "TIMESTAMP";
pub const PERMISSIONS_JSON: &str = "PERMISSIONS_JSON";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("valid placeholder regex"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn render(&self, template: &str) -> String {
        self.vars
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{{{}}}}}", name), value)
            })
    }

    /// Placeholder names left in `rendered`, in order of first appearance.
    pub fn unresolved(rendered: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for cap in placeholder_regex().captures_iter(rendered) {
            let name = &cap[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}
