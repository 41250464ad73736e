//! Best-effort derivation of [`WorkspacePermissions`] from a native
//! Claude Code allow-list.
//!
//! The native format is a flat list of capability patterns, so the mapping
//! is lossy:
//!
//! - only `Bash`, `Read`, `Edit`/`Write`/`MultiEdit` and `WebFetch` entries
//!   are understood, everything else is ignored;
//! - a shell pattern contributes its first word (`Bash(npm run *)` allows
//!   `npm`), argument restrictions are dropped;
//! - sections without a recognizable entry keep their default values;
//! - deny entries are not consulted.
//!
//! When no entry is recognized the derivation returns `None` and the
//! resolver falls through to the role template.

use super::rules::parse_pattern;
use super::WorkspacePermissions;

const INSTALL_MARKERS: &[&str] = &["install", "npm i ", "yarn add", "pnpm add", "cargo add"];

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn shell_words(scope: &str) -> Vec<&str> {
    scope
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|w| !w.is_empty() && *w != "*")
        .collect()
}

#[derive(Default)]
struct Derived {
    commands: Vec<String>,
    git_operations: Vec<String>,
    read: Vec<String>,
    write: Vec<String>,
    hosts: Vec<String>,
    installs: bool,
    executes: bool,
    network: bool,
}

impl Derived {
    fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.git_operations.is_empty()
            && self.read.is_empty()
            && self.write.is_empty()
            && self.hosts.is_empty()
            && !self.network
    }

    fn absorb(&mut self, entry: &str) {
        let Some((capability, scope)) = parse_pattern(entry) else {
            tracing::debug!(entry, "Skipping malformed allow entry");
            return;
        };

        match (capability, scope) {
            ("Bash", Some(scope)) => self.absorb_shell(scope),
            ("Read", Some(scope)) => push_unique(&mut self.read, scope),
            ("Edit" | "Write" | "MultiEdit", Some(scope)) => push_unique(&mut self.write, scope),
            ("WebFetch", Some(scope)) => {
                self.network = true;
                if let Some(host) = scope.strip_prefix("domain:") {
                    push_unique(&mut self.hosts, host);
                }
            }
            ("WebFetch" | "WebSearch", None) => self.network = true,
            _ => {}
        }
    }

    fn absorb_shell(&mut self, scope: &str) {
        let words = shell_words(scope);
        let Some(&command) = words.first() else {
            return;
        };

        if command == "git" {
            if let Some(op) = words.get(1) {
                push_unique(&mut self.git_operations, op);
            }
        } else {
            push_unique(&mut self.commands, command);
        }

        if command == "chmod" {
            self.executes = true;
        }
        if INSTALL_MARKERS.iter().any(|m| scope.contains(m)) {
            self.installs = true;
        }
    }

    fn into_permissions(self) -> WorkspacePermissions {
        let mut permissions = WorkspacePermissions::default();

        if !self.commands.is_empty() {
            permissions.commands.allowed = self.commands;
        }
        if !self.git_operations.is_empty() {
            permissions.git.allowed_operations = self.git_operations;
        }
        if !self.read.is_empty() {
            permissions.file_system.read = self.read;
        }
        if !self.write.is_empty() {
            permissions.file_system.write = self.write;
        }
        if self.executes {
            permissions.file_system.execute = vec!["target/**".to_string()];
        }
        permissions.external.allowed_hosts = self.hosts;
        permissions.system_access.can_install_packages = self.installs;
        if self.network {
            permissions.system_access.can_access_network = true;
        }

        permissions
    }
}

/// Approximates workspace permissions from a flat native allow-list.
pub fn derive_from_allow_list<S: AsRef<str>>(allow: &[S]) -> Option<WorkspacePermissions> {
    let mut derived = Derived::default();
    for entry in allow {
        derived.absorb(entry.as_ref());
    }

    if derived.is_empty() {
        return None;
    }
    Some(derived.into_permissions())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_commands_and_git_operations() {
        let permissions = derive_from_allow_list(&[
            "Bash(ls *)",
            "Bash(git status)",
            "Bash(git commit -m *)",
            "Bash(npm:*)",
            "Bash(ls -la)",
        ])
        .unwrap();

        assert_eq!(permissions.commands.allowed, vec!["ls", "npm"]);
        assert_eq!(permissions.git.allowed_operations, vec!["status", "commit"]);
    }

    #[test]
    fn test_chmod_implies_execute() {
        let permissions = derive_from_allow_list(&["Bash(chmod +x target/run.sh)"]).unwrap();
        assert_eq!(permissions.file_system.execute, vec!["target/**"]);

        let without = derive_from_allow_list(&["Bash(ls)"]).unwrap();
        assert!(without.file_system.execute.is_empty());
    }

    #[test]
    fn test_install_markers() {
        assert!(
            derive_from_allow_list(&["Bash(npm install *)"])
                .unwrap()
                .system_access
                .can_install_packages
        );
        assert!(
            !derive_from_allow_list(&["Bash(npm ls)"])
                .unwrap()
                .system_access
                .can_install_packages
        );
    }

    #[test]
    fn test_file_scopes_and_hosts() {
        let permissions = derive_from_allow_list(&[
            "Read(context/**)",
            "Edit(target/**)",
            "Write(target/**)",
            "WebFetch(domain:docs.rs)",
        ])
        .unwrap();

        assert_eq!(permissions.file_system.read, vec!["context/**"]);
        assert_eq!(permissions.file_system.write, vec!["target/**"]);
        assert_eq!(permissions.external.allowed_hosts, vec!["docs.rs"]);
        assert!(permissions.system_access.can_access_network);
    }

    #[test]
    fn test_unrecognized_list_falls_through() {
        assert!(derive_from_allow_list(&["TodoWrite", "Task", "mcp__jira"]).is_none());
        assert!(derive_from_allow_list::<&str>(&[]).is_none());
    }

    #[test]
    fn test_untouched_sections_keep_defaults() {
        let permissions = derive_from_allow_list(&["Bash(ls)"]).unwrap();
        let default = WorkspacePermissions::default();
        assert_eq!(permissions.git, default.git);
        assert_eq!(permissions.file_system.read, default.file_system.read);
        assert_eq!(permissions.commands.forbidden, default.commands.forbidden);
    }
}
