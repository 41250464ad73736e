//! The configurable tier: rules derived from a workspace's resolved
//! permissions and project type.

use std::sync::OnceLock;

use regex::Regex;

use super::base::{DESTRUCTIVE_COMMANDS, WORKSPACE_AREAS};
use crate::permissions::{EDIT_TOOLS, ProjectType, WorkspacePermissions};

/// Areas whose sources get per-extension read refinements.
const SOURCE_AREAS: &[&str] = &["context", "target"];

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "ts", "tsx", "js", "py", "go", "java", "md", "json", "yaml", "toml",
];

/// First path segments a configured glob may start with.
const SCOPED_AREAS: &[&str] = &["context", "target", "feedback", "agents", "analysis"];

const GIT_READ_OPERATIONS: &[&str] = &["status", "diff", "log", "show", "blame"];
const GIT_WRITE_OPERATIONS: &[&str] = &["add", "commit", "stash", "branch"];

const SYSTEM_INFO: &[&str] = &["ps", "ps aux", "uname", "uname -a"];

const PACKAGE_INTROSPECTION: &[&str] = &[
    "npm ls",
    "npm ls *",
    "npm --version",
    "pip show *",
    "pip list",
    "pip --version",
    "cargo tree",
    "cargo --version",
    "node --version",
    "python --version",
];

const SENSITIVE_FILES: &[&str] = &[
    ".env*",
    "**/.env*",
    "*.key",
    "**/*.key",
    "*.pem",
    "**/*.pem",
    "node_modules/**",
    "**/node_modules/**",
    ".git/**",
    "**/.git/**",
];

const PACKAGE_INSTALLS: &[&str] = &[
    "npm install",
    "npm install *",
    "npm i *",
    "yarn add *",
    "pnpm add *",
    "pip install *",
    "pip3 install *",
    "cargo add *",
    "cargo install *",
    "apt-get install *",
    "brew install *",
];

const ENVIRONMENT_MUTATION: &[&str] = &["export", "unset"];

const NETWORK_TOOLS: &[&str] = &["curl", "wget", "ssh", "scp", "rsync"];

fn root_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9_-][A-Za-z0-9_.-]*|\*\.[A-Za-z0-9]+)$")
            .expect("valid root file regex")
    })
}

fn command_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.+-]+$").expect("valid command name regex"))
}

/// Whether `glob` stays inside the workspace: relative, no parent or home
/// references, starting at a workspace area or naming a root-level file,
/// and a valid glob.
pub(crate) fn is_workspace_scoped(glob: &str) -> bool {
    let glob = glob.trim();
    if glob.is_empty()
        || glob.starts_with('/')
        || glob.starts_with('~')
        || glob.contains('\\')
        || glob.split('/').any(|segment| segment == "..")
    {
        return false;
    }
    if glob::Pattern::new(glob).is_err() {
        return false;
    }

    match glob.split_once('/') {
        Some((first, _)) => SCOPED_AREAS.contains(&first),
        None => SCOPED_AREAS.contains(&glob) || root_file_regex().is_match(glob),
    }
}

fn extension_refinements() -> Vec<String> {
    SOURCE_AREAS
        .iter()
        .flat_map(|area| {
            SOURCE_EXTENSIONS
                .iter()
                .map(move |ext| format!("Read({}/**/*.{})", area, ext))
        })
        .collect()
}

fn configured_reads(permissions: &WorkspacePermissions) -> Vec<String> {
    permissions
        .file_system
        .read
        .iter()
        .filter(|glob| {
            let scoped = is_workspace_scoped(glob);
            if !scoped {
                tracing::warn!(glob = %glob, "Dropping read scope outside the workspace");
            }
            scoped
        })
        .map(|glob| format!("Read({})", glob.trim()))
        .collect()
}

/// Directories the agent may edit for `project_type`.
pub fn edit_scopes(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Development | ProjectType::General => {
            &["target/**", "feedback/**", "README.md"]
        }
        ProjectType::Review => &["feedback/**"],
        ProjectType::Analysis => &["feedback/**", "analysis/**"],
    }
}

fn edit_rules(project_type: ProjectType) -> Vec<String> {
    let scopes = edit_scopes(project_type);
    EDIT_TOOLS
        .iter()
        .flat_map(|tool| scopes.iter().map(move |scope| format!("{}({})", tool, scope)))
        .collect()
}

fn shell_command(pattern: &str) -> &str {
    pattern.split_whitespace().next().unwrap_or(pattern)
}

/// Graduated shell tiers. Entries whose command is forbidden or needs
/// approval are left out. Git reads are always listed; git writes follow
/// the git section.
fn shell_tiers(permissions: &WorkspacePermissions) -> Vec<String> {
    let mut patterns = Vec::new();

    for area in WORKSPACE_AREAS {
        patterns.push(format!("ls {}", area));
        patterns.push(format!("ls {}/*", area));
        patterns.push(format!("ls -la {}", area));
        patterns.push(format!("tree {}", area));
    }
    for area in WORKSPACE_AREAS {
        for viewer in ["cat", "head", "tail"] {
            patterns.push(format!("{} {}/*", viewer, area));
        }
    }
    for area in WORKSPACE_AREAS {
        patterns.push(format!("find {}", area));
        patterns.push(format!("find {} *", area));
        patterns.push(format!("grep * {}", area));
        patterns.push(format!("grep * {}/*", area));
    }
    for area in WORKSPACE_AREAS {
        for tool in ["wc", "sort", "diff"] {
            patterns.push(format!("{} {}/*", tool, area));
        }
    }
    patterns.extend(SYSTEM_INFO.iter().map(|c| c.to_string()));

    let git = &permissions.git;
    let git_writes = GIT_WRITE_OPERATIONS
        .iter()
        .filter(|op| git.allows(op) && !git.needs_approval(op));
    for op in GIT_READ_OPERATIONS.iter().chain(git_writes) {
        patterns.push(format!("git {}", op));
        patterns.push(format!("git {} *", op));
    }

    patterns.extend(PACKAGE_INTROSPECTION.iter().map(|c| c.to_string()));

    let commands = &permissions.commands;
    patterns
        .into_iter()
        .filter(|pattern| {
            let command = shell_command(pattern);
            !commands.is_forbidden(command) && !commands.needs_approval(command)
        })
        .map(|pattern| format!("Bash({})", pattern))
        .collect()
}

pub(crate) fn configurable_allow(
    permissions: &WorkspacePermissions,
    project_type: ProjectType,
) -> Vec<String> {
    let mut rules = extension_refinements();
    rules.extend(configured_reads(permissions));
    rules.extend(edit_rules(project_type));
    if !permissions.commands.allowed.is_empty() {
        rules.extend(shell_tiers(permissions));
    }
    rules
}

fn deny_command(rules: &mut Vec<String>, command: &str) {
    rules.push(format!("Bash({})", command));
    rules.push(format!("Bash({} *)", command));
}

pub(crate) fn configurable_deny(permissions: &WorkspacePermissions) -> Vec<String> {
    let mut rules: Vec<String> = EDIT_TOOLS
        .iter()
        .flat_map(|tool| SENSITIVE_FILES.iter().map(move |f| format!("{}({})", tool, f)))
        .collect();

    for command in &permissions.commands.forbidden {
        let command = command.trim();
        if DESTRUCTIVE_COMMANDS.contains(&command) {
            continue;
        }
        if command_name_regex().is_match(command) {
            deny_command(&mut rules, command);
        } else {
            tracing::warn!(command, "Ignoring malformed forbidden command");
        }
    }

    for force in ["--force", "-f", "--force-with-lease"] {
        rules.push(format!("Bash(git push {} *)", force));
    }
    for branch in &permissions.git.protected_branches {
        let branch = branch.trim();
        if !command_name_regex().is_match(branch) {
            tracing::warn!(branch, "Ignoring malformed protected branch");
            continue;
        }
        rules.push(format!("Bash(git push origin {})", branch));
        rules.push(format!("Bash(git push * {})", branch));
        rules.push(format!("Bash(git branch -d {})", branch));
        rules.push(format!("Bash(git branch -D {})", branch));
    }

    let access = &permissions.system_access;
    if !access.can_install_packages {
        rules.extend(PACKAGE_INSTALLS.iter().map(|c| format!("Bash({})", c)));
    }
    if !access.can_modify_environment {
        for command in ENVIRONMENT_MUTATION {
            deny_command(&mut rules, command);
        }
    }
    if !access.can_access_network {
        for command in NETWORK_TOOLS {
            deny_command(&mut rules, command);
        }
    }

    rules
}
