//! Splits a shell command line into the simple commands it runs.
//!
//! `cat target/a && rm -rf /` is two commands, and `echo $(whoami)` runs
//! `whoami` as well as `echo`. Rule evaluation checks each of them.

use std::sync::LazyLock;

use tree_sitter::{Language, Parser, Query, QueryCursor, StreamingIterator};

/// Node kinds that execute something on their own.
const COMMAND_QUERY: &str = r#"
    (command) @command
    (declaration_command) @command
    (unset_command) @command
    (file_redirect) @redirect
"#;

static BASH: LazyLock<Language> = LazyLock::new(|| tree_sitter_bash::LANGUAGE.into());

static QUERY: LazyLock<Option<Query>> = LazyLock::new(|| Query::new(&BASH, COMMAND_QUERY).ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    /// `<` reads the target; every other operator writes it.
    pub input: bool,
}

impl Redirect {
    /// `2>&1` style descriptor duplication and `/dev/null` touch no file.
    pub fn is_file(&self) -> bool {
        !(self.target.is_empty()
            || self.target == "/dev/null"
            || self.target.chars().all(|c| c.is_ascii_digit() || c == '-'))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellCommands {
    /// Simple commands in source order, nested substitutions included.
    pub commands: Vec<String>,
    pub redirects: Vec<Redirect>,
}

/// Parses `line`. Errors describe input the parser could not fully
/// understand; callers treat those lines as denied.
pub fn split_commands(line: &str) -> Result<ShellCommands, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&BASH)
        .map_err(|e| format!("bash grammar unavailable: {}", e))?;
    let tree = parser
        .parse(line, None)
        .ok_or_else(|| "command could not be parsed".to_string())?;
    let root = tree.root_node();
    if root.has_error() {
        return Err("command has a syntax error".to_string());
    }
    let query = QUERY
        .as_ref()
        .ok_or_else(|| "bash command query unavailable".to_string())?;

    let mut result = ShellCommands::default();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, line.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let text = line[node.byte_range()].trim();
            if query.capture_names()[capture.index as usize] != "redirect" {
                result.commands.push(text.to_string());
                continue;
            }
            let operator = text.trim_start_matches(|c: char| c.is_ascii_digit());
            let target = match node.child_by_field_name("destination") {
                Some(destination) => line[destination.byte_range()].trim(),
                None => operator.trim_start_matches(['<', '>', '&', '|']).trim(),
            };
            result.redirects.push(Redirect {
                target: target.trim_matches(['"', '\'']).to_string(),
                input: operator.starts_with('<') && !operator.starts_with("<>"),
            });
        }
    }

    if result.commands.is_empty() && !line.trim().is_empty() {
        result.commands.push(line.trim().to_string());
    }
    Ok(result)
}

/// Whether `word` walks up a directory.
pub fn has_parent_segment(word: &str) -> bool {
    word.trim_matches(['"', '\''])
        .split('/')
        .any(|segment| segment == "..")
}
