//! Built-in document templates, used unless the global config overrides
//! them.

pub const DEFAULT_CLAUDE_MD: &str = r#"# Workspace {{WORKSPACE_ID}}

{{WORKSPACE_DESCRIPTION}}

## Current Task

{{CURRENT_TASK}}

## Workspace Layout

- `context/`: reference material for the task (read only)
- `target/`: the repository checkout you work in
- `feedback/`: review notes, open questions and reports for the team
- `agents/`: shared agent resources

## Permissions

{{PERMISSIONS_SUMMARY}}

The enforced rules live in `.claude/settings.json`. Anything they do not allow is denied.

## Commands

{{COMMANDS_LIST}}

## Context Files

{{CONTEXT_FILES}}

## Coding Standards

{{CODING_STANDARDS}}

---
Generated {{TIMESTAMP}}
"#;

pub const DEFAULT_PERMISSIONS_JSON: &str = r#"{
  "workspaceId": "{{WORKSPACE_ID}}",
  "generated": "{{TIMESTAMP}}",
  "permissions": {{PERMISSIONS_JSON}}
}
"#;
