//! Command parser for resource and backslash commands
//!
//! Parses console input into resource commands (free-form words) and
//! CLI meta-commands (backslash-prefixed).

use merx_link::Realm;

use crate::error::{CLIError, Result};

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List the resources available to the session
    Resources,
    /// Open a resource view
    Open(String),
    /// Show the rows of a resource (active one when omitted)
    List(Option<String>),
    /// Filter the active resource; an empty query clears the filter
    Search(String),
    /// Start an interactive create form
    Create(Option<String>),
    /// Edit a record by id
    Edit { resource: Option<String>, id: i64 },
    /// Delete a record by id (asks for confirmation)
    Delete { resource: Option<String>, id: i64 },
    /// Show role details with resolved permissions
    Info(i64),
    /// Show aggregates for a resource
    Stats(Option<String>),
    /// Reload the active resource
    Refresh,

    /// Meta-commands (backslash commands)
    Login(Option<Realm>),
    Register,
    Logout,
    WhoAmI,
    RealmInfo,
    SetFormat(String),
    SessionInfo,
    Help,
    Quit,
    Unknown(String),
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a command line
    pub fn parse(&self, line: &str) -> Result<Command> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Err(CLIError::ParseError("Empty command".into()));
        }

        if trimmed.starts_with('\\') {
            return self.parse_meta_command(trimmed);
        }

        self.parse_resource_command(trimmed)
    }

    /// Parse resource commands (free-form words)
    fn parse_resource_command(&self, line: &str) -> Result<Command> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let verb = parts[0].to_lowercase();
        let args = parts.get(1..).unwrap_or(&[]);

        match verb.as_str() {
            "resources" => Ok(Command::Resources),
            "open" => {
                if args.is_empty() {
                    Err(CLIError::ParseError("open requires a resource name".into()))
                } else {
                    Ok(Command::Open(args[0].to_string()))
                }
            }
            "list" | "ls" => Ok(Command::List(args.first().map(|s| s.to_string()))),
            "search" => Ok(Command::Search(args.join(" "))),
            "create" | "new" => Ok(Command::Create(args.first().map(|s| s.to_string()))),
            "edit" | "update" => {
                let (resource, id) = Self::parse_target(&verb, args)?;
                Ok(Command::Edit { resource, id })
            }
            "delete" | "del" | "rm" => {
                let (resource, id) = Self::parse_target(&verb, args)?;
                Ok(Command::Delete { resource, id })
            }
            "info" => {
                if let Some(id) = args.first().and_then(|a| a.parse::<i64>().ok()) {
                    Ok(Command::Info(id))
                } else {
                    Err(CLIError::ParseError("info requires a record id".into()))
                }
            }
            "stats" => Ok(Command::Stats(args.first().map(|s| s.to_string()))),
            "refresh" | "reload" => Ok(Command::Refresh),
            other => Err(CLIError::ParseError(format!(
                "Unknown command: '{}'. Type \\help for available commands.",
                other
            ))),
        }
    }

    /// Parse `<id>` or `<resource> <id>` argument forms
    fn parse_target(verb: &str, args: &[&str]) -> Result<(Option<String>, i64)> {
        match args {
            [id] => id
                .parse::<i64>()
                .map(|id| (None, id))
                .map_err(|_| CLIError::ParseError(format!("{} requires a numeric id", verb))),
            [resource, id, ..] => id
                .parse::<i64>()
                .map(|id| (Some(resource.to_string()), id))
                .map_err(|_| CLIError::ParseError(format!("{} requires a numeric id", verb))),
            [] => Err(CLIError::ParseError(format!(
                "{} requires a record id",
                verb
            ))),
        }
    }

    /// Parse meta-commands (backslash commands)
    fn parse_meta_command(&self, line: &str) -> Result<Command> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Err(CLIError::ParseError("Invalid command".into()));
        }

        let command = parts[0];
        let args = parts.get(1..).unwrap_or(&[]);

        match command {
            "\\quit" | "\\q" => Ok(Command::Quit),
            "\\help" | "\\?" => Ok(Command::Help),
            "\\login" => match args.first() {
                None => Ok(Command::Login(None)),
                Some(arg) => match Realm::parse(arg) {
                    Some(realm) => Ok(Command::Login(Some(realm))),
                    None => Err(CLIError::ParseError(
                        "\\login accepts 'platform' or 'merchant'".into(),
                    )),
                },
            },
            "\\register" => Ok(Command::Register),
            "\\logout" => Ok(Command::Logout),
            "\\whoami" => Ok(Command::WhoAmI),
            "\\realm" => Ok(Command::RealmInfo),
            "\\format" => {
                if args.is_empty() {
                    Err(CLIError::ParseError(
                        "\\format requires: table, json, or csv".into(),
                    ))
                } else {
                    Ok(Command::SetFormat(args[0].to_string()))
                }
            }
            "\\info" | "\\session" => Ok(Command::SessionInfo),
            _ => Ok(Command::Unknown(command.to_string())),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resources() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("resources").unwrap(), Command::Resources);
        assert_eq!(parser.parse("RESOURCES").unwrap(), Command::Resources);
    }

    #[test]
    fn test_parse_open() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("open merchants").unwrap(),
            Command::Open("merchants".to_string())
        );
        assert!(parser.parse("open").is_err());
    }

    #[test]
    fn test_parse_list() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("list").unwrap(), Command::List(None));
        assert_eq!(
            parser.parse("list users").unwrap(),
            Command::List(Some("users".to_string()))
        );
    }

    #[test]
    fn test_parse_search_joins_args() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("search acme corp").unwrap(),
            Command::Search("acme corp".to_string())
        );
        // Bare search clears the filter
        assert_eq!(parser.parse("search").unwrap(), Command::Search(String::new()));
    }

    #[test]
    fn test_parse_edit_forms() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("edit 5").unwrap(),
            Command::Edit {
                resource: None,
                id: 5
            }
        );
        assert_eq!(
            parser.parse("edit users 5").unwrap(),
            Command::Edit {
                resource: Some("users".to_string()),
                id: 5
            }
        );
        assert!(parser.parse("edit").is_err());
        assert!(parser.parse("edit abc").is_err());
    }

    #[test]
    fn test_parse_delete() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("delete 3").unwrap(),
            Command::Delete {
                resource: None,
                id: 3
            }
        );
        assert_eq!(
            parser.parse("rm branches 3").unwrap(),
            Command::Delete {
                resource: Some("branches".to_string()),
                id: 3
            }
        );
    }

    #[test]
    fn test_parse_info_requires_id() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("info 2").unwrap(), Command::Info(2));
        assert!(parser.parse("info").is_err());
        assert!(parser.parse("info admin").is_err());
    }

    #[test]
    fn test_parse_login_realm() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("\\login").unwrap(), Command::Login(None));
        assert_eq!(
            parser.parse("\\login platform").unwrap(),
            Command::Login(Some(Realm::Platform))
        );
        assert_eq!(
            parser.parse("\\login merchant").unwrap(),
            Command::Login(Some(Realm::Merchant))
        );
        assert!(parser.parse("\\login admin").is_err());
    }

    #[test]
    fn test_parse_format() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("\\format json").unwrap(),
            Command::SetFormat("json".to_string())
        );
        assert!(parser.parse("\\format").is_err());
    }

    #[test]
    fn test_parse_quit_and_help() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("\\quit").unwrap(), Command::Quit);
        assert_eq!(parser.parse("\\q").unwrap(), Command::Quit);
        assert_eq!(parser.parse("\\help").unwrap(), Command::Help);
        assert_eq!(parser.parse("\\?").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_unknown_meta() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.parse("\\bogus").unwrap(),
            Command::Unknown("\\bogus".to_string())
        );
    }

    #[test]
    fn test_unknown_word_command() {
        let parser = CommandParser::new();
        assert!(parser.parse("frobnicate").is_err());
    }

    #[test]
    fn test_empty_command() {
        let parser = CommandParser::new();
        assert!(parser.parse("").is_err());
        assert!(parser.parse("   ").is_err());
    }
}
