//! The base-security tier: fixed allow and deny lists shared by every
//! workspace. Built once and never filtered.

use std::sync::OnceLock;

use crate::permissions::FILE_TOOLS;

/// Top-level directories a workspace exposes to the agent.
pub const WORKSPACE_AREAS: &[&str] = &["context", "target", "feedback", "agents"];

/// Root-level files the agent may always read.
pub const ROOT_FILES: &[&str] = &[
    "CLAUDE.md",
    "README.md",
    "workspace.json",
    "permissions.json",
    "commands.json",
];

/// Absolute system locations that are never reachable.
pub const SYSTEM_PATHS: &[&str] = &[
    "/home", "/root", "/etc", "/var", "/usr", "/sys", "/proc", "/dev", "/tmp",
];

/// Shell commands denied regardless of any configurable setting.
pub const DESTRUCTIVE_COMMANDS: &[&str] = &[
    "rm", "rmdir", "sudo", "su", "passwd", "shutdown", "reboot", "chmod", "chown",
];

const SAFE_TOOLS: &[&str] = &["Task", "TodoRead", "TodoWrite", "WebFetch", "WebSearch"];

const SAFE_SHELL: &[&str] = &["pwd", "whoami", "date", "echo *", "printf *"];

const PATH_TOOLS: &[&str] = &["Read", "LS", "Glob", "Grep", "Edit", "Write"];

const ESCAPES: &[&str] = &["../**", "../../**"];

fn build_base_allow() -> Vec<String> {
    let mut rules = Vec::new();

    for area in WORKSPACE_AREAS {
        rules.push(format!("Read({}/**)", area));
        rules.push(format!("LS({})", area));
        rules.push(format!("Glob({}/**)", area));
        rules.push(format!("Grep({}/**)", area));
    }
    for file in ROOT_FILES {
        rules.push(format!("Read({})", file));
    }
    rules.extend(SAFE_TOOLS.iter().map(|t| t.to_string()));
    rules.extend(SAFE_SHELL.iter().map(|c| format!("Bash({})", c)));

    rules
}

fn build_base_deny() -> Vec<String> {
    let mut rules = Vec::new();

    for tool in PATH_TOOLS {
        for escape in ESCAPES {
            rules.push(format!("{}({})", tool, escape));
        }
        for path in SYSTEM_PATHS {
            rules.push(format!("{}({}/**)", tool, path));
        }
    }
    rules.push("LS(..)".to_string());
    rules.extend(SYSTEM_PATHS.iter().map(|p| format!("LS({})", p)));

    for tool in FILE_TOOLS {
        rules.push(format!("{}(.git/**)", tool));
        rules.push(format!("{}(target/.git/**)", tool));
    }

    for shell in ["cd ..", "cd ../*", "cd /", "cd ~", "cd ~/*", "ls ..", "ls ../*", "cat ../*"] {
        rules.push(format!("Bash({})", shell));
    }
    for path in SYSTEM_PATHS {
        rules.push(format!("Bash(cd {})", path));
        rules.push(format!("Bash(ls {})", path));
        rules.push(format!("Bash(ls {}/*)", path));
        rules.push(format!("Bash(cat {}/*)", path));
    }
    for shell in ["find /", "find / *", "find .. *", "grep * /*", "grep * ../*"] {
        rules.push(format!("Bash({})", shell));
    }

    for command in DESTRUCTIVE_COMMANDS {
        rules.push(format!("Bash({})", command));
        rules.push(format!("Bash({} *)", command));
    }

    rules
}

/// Fixed allow list, identical for every workspace.
pub fn base_allow() -> &'static [String] {
    static RULES: OnceLock<Vec<String>> = OnceLock::new();
    RULES.get_or_init(build_base_allow)
}

/// Fixed deny list, identical for every workspace.
pub fn base_deny() -> &'static [String] {
    static RULES: OnceLock<Vec<String>> = OnceLock::new();
    RULES.get_or_init(build_base_deny)
}
