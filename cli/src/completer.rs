//! TAB completion for console verbs, resource names, and backslash commands
//!
//! Provides context-aware completion: the first word completes to a command
//! verb, arguments complete to resource names or command values, and
//! backslash input completes to meta-commands.

use colored::*;
use rustyline::completion::{Completer, Pair};

pub(crate) const COMMAND_VERBS: &[&str] = &[
    "resources", "open", "list", "search", "create", "edit", "delete", "info", "stats", "refresh",
];

/// Verbs that take a resource name as their first argument
const RESOURCE_VERBS: &[&str] = &[
    "open", "list", "ls", "create", "new", "stats", "edit", "update", "delete", "del", "rm",
];

pub(crate) const META_COMMANDS: &[&str] = &[
    "\\login",
    "\\register",
    "\\logout",
    "\\whoami",
    "\\realm",
    "\\format",
    "\\info",
    "\\session",
    "\\help",
    "\\?",
    "\\quit",
    "\\q",
];

const FORMAT_VALUES: &[&str] = &["table", "json", "csv"];
const REALM_VALUES: &[&str] = &["platform", "merchant"];

/// Styled completion candidate
#[derive(Debug, Clone)]
pub struct StyledPair {
    /// Display text (with styling)
    display: String,
    /// Replacement text (plain)
    replacement: String,
}

impl StyledPair {
    fn new(text: String, category: CompletionCategory) -> Self {
        let display = match category {
            CompletionCategory::Verb => {
                format!("{}  {}", text.blue().bold(), "command".dimmed())
            }
            CompletionCategory::Resource => format!("{}  {}", text.green(), "resource".dimmed()),
            CompletionCategory::MetaCommand => {
                format!("{}  {}", text.cyan().bold(), "command".dimmed())
            }
            CompletionCategory::Value => format!("{}  {}", text.magenta(), "value".dimmed()),
        };

        Self {
            display,
            replacement: text,
        }
    }
}

/// Category of completion for styling
#[derive(Debug, Clone, Copy)]
enum CompletionCategory {
    Verb,
    Resource,
    MetaCommand,
    Value,
}

/// Completion context derived from the line
#[derive(Debug)]
enum CompletionContext {
    /// Editing the first word
    Verb,
    /// Argument position of a resource-taking verb
    Resource,
    /// Argument position with a fixed value set
    Value(&'static [&'static str]),
    /// No suggestions apply
    None,
}

/// Auto-completer for console commands
pub struct AutoCompleter {
    /// Command verbs for completion
    verbs: Vec<String>,

    /// Meta-commands for completion
    meta_commands: Vec<String>,

    /// Resource names available in the current session
    resources: Vec<String>,
}

impl AutoCompleter {
    /// Create a new auto-completer
    pub fn new() -> Self {
        Self {
            verbs: COMMAND_VERBS.iter().map(|s| s.to_string()).collect(),
            meta_commands: META_COMMANDS.iter().map(|s| s.to_string()).collect(),
            resources: Vec::new(),
        }
    }

    /// Update the resource names offered in argument position
    pub fn set_resources(&mut self, resources: Vec<String>) {
        self.resources = resources;
    }

    /// Provide a completion hint for inline suggestions
    pub fn completion_hint(&self, line: &str, pos: usize) -> Option<String> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        let word = &line[start..pos];
        if word.is_empty() {
            return None;
        }

        let candidates = self.get_styled_completions(word, line, pos);
        candidates
            .iter()
            .find(|c| c.replacement.len() > word.len())
            .map(|c| c.replacement[word.len()..].to_string())
    }

    /// Detect completion context from the line
    fn detect_context(&self, line: &str, pos: usize) -> CompletionContext {
        let before = &line[..pos];
        let trimmed = before.trim_start();
        if !trimmed.contains(char::is_whitespace) {
            return CompletionContext::Verb;
        }

        let verb = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match verb.as_str() {
            v if RESOURCE_VERBS.contains(&v) => CompletionContext::Resource,
            "\\format" => CompletionContext::Value(FORMAT_VALUES),
            "\\login" => CompletionContext::Value(REALM_VALUES),
            _ => CompletionContext::None,
        }
    }

    /// Get completions with styling for display
    fn get_styled_completions(&self, input: &str, line: &str, pos: usize) -> Vec<StyledPair> {
        let input_lower = input.to_lowercase();
        let mut results = Vec::new();

        if input.starts_with('\\') {
            for cmd in &self.meta_commands {
                if cmd.starts_with(&input_lower) {
                    results.push(StyledPair::new(
                        cmd.clone(),
                        CompletionCategory::MetaCommand,
                    ));
                }
            }
            return results;
        }

        match self.detect_context(line, pos) {
            CompletionContext::Verb => {
                for verb in &self.verbs {
                    if verb.starts_with(&input_lower) {
                        results.push(StyledPair::new(verb.clone(), CompletionCategory::Verb));
                    }
                }
            }
            CompletionContext::Resource => {
                for resource in &self.resources {
                    if resource.to_lowercase().starts_with(&input_lower) {
                        results.push(StyledPair::new(
                            resource.clone(),
                            CompletionCategory::Resource,
                        ));
                    }
                }
            }
            CompletionContext::Value(values) => {
                for value in values {
                    if value.starts_with(&input_lower) {
                        results.push(StyledPair::new(
                            value.to_string(),
                            CompletionCategory::Value,
                        ));
                    }
                }
            }
            CompletionContext::None => {}
        }

        results.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        results.dedup_by(|a, b| a.replacement == b.replacement);
        results
    }
}

impl Default for AutoCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for AutoCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Find the start of the current word
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        let word = &line[start..pos];
        let styled_completions = self.get_styled_completions(word, line, pos);

        let pairs: Vec<Pair> = styled_completions
            .into_iter()
            .map(|s| Pair {
                display: s.display,
                replacement: s.replacement,
            })
            .collect();

        Ok((start, pairs))
    }
}
