//! Hardcoded default permissions and the built-in role templates.

use std::collections::{BTreeMap, HashMap};

use super::{
    CommandPermissions, ExternalPermissions, FileSystemPermissions, GitPermissions,
    PermissionSet, ResourceQuota, Role, SystemAccess, WorkspacePermissions,
};

pub(crate) const DEFAULT_QUOTA: ResourceQuota = ResourceQuota {
    memory: 2048,
    cpu: 50,
    disk: 5120,
};

const READ_ONLY_UTILITIES: &[&str] = &[
    "ls", "cat", "head", "tail", "find", "grep", "wc", "sort", "diff", "pwd", "tree",
];

const PRIVILEGE_ESCALATION: &[&str] = &["sudo", "su", "passwd", "chmod", "chown"];

const GIT_READ_OPERATIONS: &[&str] = &["status", "diff", "log", "show", "blame"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn with(base: &[&str], extra: &[&str]) -> Vec<String> {
    base.iter().chain(extra).map(|s| s.to_string()).collect()
}

/// Last-resort permissions when neither user settings nor a role template
/// apply.
pub fn default_permissions() -> WorkspacePermissions {
    WorkspacePermissions {
        file_system: FileSystemPermissions {
            read: strings(&["context/**", "target/**", "feedback/**"]),
            write: strings(&["target/**", "feedback/**"]),
            execute: Vec::new(),
        },
        git: GitPermissions {
            allowed_operations: with(GIT_READ_OPERATIONS, &["add", "commit"]),
            protected_branches: strings(&["main", "master"]),
            requires_approval: strings(&["push", "merge", "rebase"]),
        },
        external: ExternalPermissions {
            allowed_hosts: Vec::new(),
            api_keys: BTreeMap::new(),
        },
        commands: CommandPermissions {
            allowed: strings(READ_ONLY_UTILITIES),
            requires_approval: Vec::new(),
            forbidden: strings(PRIVILEGE_ESCALATION),
        },
        system_access: SystemAccess {
            can_install_packages: false,
            can_modify_environment: false,
            can_access_network: true,
            max_resource_usage: DEFAULT_QUOTA,
        },
    }
}

fn developer_template() -> PermissionSet {
    let mut set: PermissionSet = default_permissions().into();
    set.description = Some("Implements changes in target/ and records notes in feedback/".into());
    set.file_system.read = strings(&["context/**", "target/**", "feedback/**", "agents/**"]);
    set.git.allowed_operations =
        with(GIT_READ_OPERATIONS, &["add", "commit", "stash", "branch", "push"]);
    set.commands.allowed = with(READ_ONLY_UTILITIES, &["git", "npm", "pip", "cargo"]);
    set.commands.requires_approval = strings(&["npm", "pip"]);
    set
}

fn reviewer_template() -> PermissionSet {
    let mut set: PermissionSet = default_permissions().into();
    set.description = Some("Reads the checkout and writes review notes to feedback/".into());
    set.file_system.write = strings(&["feedback/**"]);
    set.git.allowed_operations = strings(GIT_READ_OPERATIONS);
    set.git.requires_approval = strings(&["add", "commit", "push", "merge", "rebase"]);
    set.commands.allowed = with(READ_ONLY_UTILITIES, &["git"]);
    set
}

fn analyst_template() -> PermissionSet {
    let mut set: PermissionSet = default_permissions().into();
    set.description = Some("Produces reports in analysis/ and feedback/ without touching code".into());
    set.file_system.write = strings(&["feedback/**", "analysis/**"]);
    set.git.allowed_operations = strings(GIT_READ_OPERATIONS);
    set.git.requires_approval = strings(&["add", "commit", "push", "merge", "rebase"]);
    set.commands.allowed = with(READ_ONLY_UTILITIES, &["git"]);
    set.system_access.can_access_network = false;
    set
}

pub fn builtin_template(role: Role) -> PermissionSet {
    match role {
        Role::Developer => developer_template(),
        Role::Reviewer => reviewer_template(),
        Role::Analyst => analyst_template(),
    }
}

/// All built-in templates keyed by role name, the shape used by the global
/// config.
pub fn builtin_role_templates() -> HashMap<String, PermissionSet> {
    Role::ALL
        .into_iter()
        .map(|role| (role.to_string(), builtin_template(role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scopes() {
        let permissions = default_permissions();
        assert_eq!(
            permissions.file_system.read,
            vec!["context/**", "target/**", "feedback/**"]
        );
        assert_eq!(permissions.file_system.write, vec!["target/**", "feedback/**"]);
        assert!(permissions.system_access.can_access_network);
        assert!(!permissions.system_access.can_install_packages);
    }

    #[test]
    fn test_default_git_is_non_destructive() {
        let git = default_permissions().git;
        for op in ["push", "merge", "rebase", "reset"] {
            assert!(!git.allows(op), "{} should not be allowed", op);
        }
        assert!(git.allows("commit"));
    }

    #[test]
    fn test_default_forbids_privilege_escalation() {
        let commands = default_permissions().commands;
        assert!(commands.is_forbidden("sudo"));
        assert!(commands.is_forbidden("chown"));
        assert!(!commands.is_forbidden("ls"));
    }

    #[test]
    fn test_role_templates_differ() {
        let templates = builtin_role_templates();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates["reviewer"].file_system.write, vec!["feedback/**"]);
        assert!(
            templates["analyst"]
                .file_system
                .write
                .contains(&"analysis/**".to_string())
        );
        assert!(!templates["analyst"].system_access.can_access_network);
        assert_ne!(templates["developer"], templates["reviewer"]);
    }
}
