//! Seed commands used when neither the command store nor the global config
//! provides any.

use super::{HotKey, LegacyCommand};

pub fn builtin_startup_commands() -> Vec<LegacyCommand> {
    vec![
        LegacyCommand::new(
            "Plan Task",
            "plan",
            "Read CLAUDE.md and everything under context/, then outline a step-by-step plan for the current task.\nWait for confirmation before changing files.",
        ),
        LegacyCommand::new(
            "Workspace Status",
            "status",
            "Summarize the state of target/: git status, the last few commits and any open TODOs.",
        ),
    ]
}

pub fn builtin_reply_commands() -> Vec<LegacyCommand> {
    vec![
        LegacyCommand::new("Continue", "continue", "Continue with the next step of the plan."),
        LegacyCommand::new(
            "Run Tests",
            "test",
            "Run the tests covering your changes in target/ and report any failures.",
        ),
        LegacyCommand::new(
            "Commit Work",
            "commit",
            "Stage and commit the completed work with a descriptive message.",
        )
        .with_requires_approval(true),
    ]
}

pub fn builtin_hot_keys() -> Vec<HotKey> {
    vec![
        HotKey::new("ctrl+shift+p", "plan").with_description("Plan the current task"),
        HotKey::new("ctrl+shift+enter", "continue").with_description("Continue"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_keys_reference_builtin_commands() {
        let keywords: Vec<String> = builtin_startup_commands()
            .into_iter()
            .chain(builtin_reply_commands())
            .map(|c| c.keyword)
            .collect();

        for hot_key in builtin_hot_keys() {
            assert!(keywords.contains(&hot_key.command), "{}", hot_key.command);
        }
    }
}
