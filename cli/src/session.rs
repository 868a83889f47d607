//! Interactive console session
//!
//! Owns the client, the authentication state, and the currently open
//! resource view. Commands arrive as parsed [`Command`] values from the
//! REPL, a script file, or a one-shot `-c` invocation; the session
//! executes them against the Merx API and renders the results.

use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use merx_link::{resolve_session, AuthState, MerxClient, Profile, Realm, Record, TokenStore};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Cmd, CompletionType, Config, EditMode, Editor, Helper, KeyEvent};
use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::completer::AutoCompleter;
use crate::config::CLIConfiguration;
use crate::credentials::FileTokenStore;
use crate::engine::{
    load_permission_map, load_reference_options, PermissionMap, ReferenceOptions,
};
use crate::error::{CLIError, Result};
use crate::formatter::OutputFormatter;
use crate::parser::{Command, CommandParser};
use crate::schema::{registry, ResourceSpec};
use crate::CLI_VERSION;

mod commands;
mod info;

/// Output format for resource views
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name as typed in `\format <name>`
    pub fn parse(value: &str) -> Option<OutputFormat> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// The resource most recently opened, with everything fetched for it
struct ResourceView {
    resource: &'static ResourceSpec,
    rows: Vec<Record>,
    reference_options: ReferenceOptions,
    permission_map: PermissionMap,
    filter: String,
}

/// Console session state
pub struct ConsoleSession {
    /// Merx API client
    client: MerxClient,

    /// Command parser
    parser: CommandParser,

    /// Output formatter
    formatter: OutputFormatter,

    /// CLI configuration
    config: CLIConfiguration,

    /// CLI config file path
    config_path: PathBuf,

    /// Server URL
    server_url: String,

    /// Server host (cached for prompt rendering)
    server_host: String,

    /// Enable colored output
    color: bool,

    /// Threshold for showing loading indicator (milliseconds)
    loading_threshold_ms: u64,

    /// Enable spinners/animations
    animations: bool,

    /// Authentication state
    auth: AuthState,

    /// Profile of the authenticated account
    profile: Option<Profile>,

    /// Identity shown in the prompt and banner
    identity: String,

    /// Persistent token store backing the session
    token_store: FileTokenStore,

    /// Resource view currently open
    view: Option<ResourceView>,

    /// Bumped on every load; a fetch only installs its view when the
    /// generation it started with is still current
    view_generation: u64,

    /// Session start time
    started_at: Instant,

    /// Number of commands executed in this session
    commands_executed: u64,
}

impl ConsoleSession {
    /// Create a new console session
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: MerxClient,
        token_store: FileTokenStore,
        config: CLIConfiguration,
        config_path: PathBuf,
        format: OutputFormat,
        color: bool,
        animations: bool,
        loading_threshold_ms: u64,
    ) -> Self {
        let server_url = client.base_url().to_string();
        let server_host = Self::extract_host(&server_url);

        Self {
            client,
            parser: CommandParser::new(),
            formatter: OutputFormatter::new(format, color),
            config,
            config_path,
            server_url,
            server_host,
            color,
            loading_threshold_ms,
            animations,
            auth: AuthState::Pending,
            profile: None,
            identity: "guest".to_string(),
            token_store,
            view: None,
            view_generation: 0,
            started_at: Instant::now(),
            commands_executed: 0,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    /// Restore authentication from the stored tokens
    ///
    /// Quiet; callers report the outcome. Refresh rotates tokens, so the
    /// store is persisted afterwards even when no realm could be restored.
    pub async fn bootstrap(&mut self) {
        let state = resolve_session(&self.client).await;

        let profile = match state.realm() {
            Some(realm) => self.client.me(realm).await.ok(),
            None => None,
        };
        self.apply_profile(profile);
        self.auth = state;

        if let Err(e) = self.persist_session() {
            eprintln!(
                "{}",
                format!("Could not persist session tokens: {}", e).yellow()
            );
        }
    }

    /// Write the client's current tokens to the store
    fn persist_session(&mut self) -> Result<()> {
        let snapshot = self.client.session_snapshot();
        self.token_store.save(&snapshot)?;
        Ok(())
    }

    fn apply_profile(&mut self, profile: Option<Profile>) {
        self.identity = profile
            .as_ref()
            .map(|p| {
                p.email
                    .clone()
                    .filter(|email| !email.is_empty())
                    .unwrap_or_else(|| p.display_name())
            })
            .unwrap_or_else(|| "guest".to_string());
        self.profile = profile;
    }

    /// Realm of the authenticated session, or an instruction to log in
    fn require_realm(&self) -> Result<Realm> {
        self.auth
            .realm()
            .ok_or_else(|| CLIError::CommandError("Not logged in. Use \\login to authenticate.".into()))
    }

    /// Resource keys the current session may open, for TAB completion
    fn allowed_resource_keys(&self) -> Vec<String> {
        match self.auth.realm() {
            Some(realm) => registry::allowed_for(realm, self.auth.permissions())
                .iter()
                .map(|resource| resource.key.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Fetch rows, reference options, and junction data for a resource
    ///
    /// The three fetches run concurrently. Reference and junction failures
    /// degrade to empty on their own; only the row list failing aborts the
    /// load.
    async fn load_view(&mut self, resource: &'static ResourceSpec) -> Result<()> {
        self.view_generation += 1;
        let generation = self.view_generation;

        let message = format!("Loading {}...", resource.title);
        let (rows, reference_options, permission_map) = self
            .with_loading(&message, async {
                tokio::join!(
                    self.client.list(resource.key),
                    load_reference_options(&self.client, resource),
                    async {
                        match resource.join.as_ref() {
                            Some(join) => load_permission_map(&self.client, join).await,
                            None => PermissionMap::new(),
                        }
                    }
                )
            })
            .await;

        let rows = rows.map_err(|e| {
            CLIError::CommandError(format!("Failed to load data: {}", CLIError::from(e)))
        })?;

        if generation != self.view_generation {
            return Ok(());
        }

        let filter = self
            .view
            .take()
            .filter(|previous| std::ptr::eq(previous.resource, resource))
            .map(|previous| previous.filter)
            .unwrap_or_default();

        self.view = Some(ResourceView {
            resource,
            rows,
            reference_options,
            permission_map,
            filter,
        });
        Ok(())
    }

    /// Run a future, showing a spinner once it outlasts the threshold
    async fn with_loading<T>(&self, message: &str, fut: impl Future<Output = T>) -> T {
        if !self.animations {
            return fut.await;
        }

        let spinner = Arc::new(Mutex::new(None::<ProgressBar>));
        let spinner_clone = Arc::clone(&spinner);
        let threshold = Duration::from_millis(self.loading_threshold_ms);
        let message = message.to_string();
        let delayed = tokio::spawn(async move {
            tokio::time::sleep(threshold).await;
            *spinner_clone.lock().unwrap() = Some(Self::create_spinner(&message));
        });

        let result = fut.await;

        delayed.abort();
        if let Some(pb) = spinner.lock().unwrap().take() {
            pb.finish_and_clear();
        }
        result
    }

    /// Create a spinner for long-running operations
    fn create_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn extract_host(url: &str) -> String {
        let trimmed = url.trim();
        let without_scheme = trimmed
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        let host = without_scheme.split(['/', '?']).next().unwrap_or(without_scheme);

        if host.is_empty() {
            "localhost".to_string()
        } else {
            host.to_string()
        }
    }

    fn primary_prompt(&self) -> String {
        // On Windows, rustyline miscalculates the display width of ANSI
        // color codes in prompts, so the prompt stays plain there
        #[cfg(target_os = "windows")]
        let use_colors_in_prompt = false;
        #[cfg(not(target_os = "windows"))]
        let use_colors_in_prompt = self.color;

        #[cfg(target_os = "windows")]
        let use_unicode = false;
        #[cfg(not(target_os = "windows"))]
        let use_unicode = true;

        let authenticated = self.auth.is_authenticated();
        let status = if use_colors_in_prompt {
            if authenticated {
                if use_unicode {
                    "●".green().bold().to_string()
                } else {
                    "*".green().bold().to_string()
                }
            } else if use_unicode {
                "○".yellow().bold().to_string()
            } else {
                "o".yellow().bold().to_string()
            }
        } else if authenticated {
            "*".to_string()
        } else {
            "o".to_string()
        };

        let brand = if use_colors_in_prompt {
            "Merx".bright_blue().bold().to_string()
        } else {
            "Merx".to_string()
        };

        let realm_label = self
            .auth
            .realm()
            .map(|realm| realm.as_str())
            .unwrap_or("guest");

        let brand_with_realm = if use_colors_in_prompt {
            format!("{}{}", brand, format!("[{}]", realm_label).dimmed())
        } else {
            format!("{}[{}]", brand, realm_label)
        };

        let identity = if use_colors_in_prompt {
            format!(
                "{}{}",
                self.identity.cyan(),
                format!("@{}", self.server_host).dimmed()
            )
        } else {
            format!("{}@{}", self.identity, self.server_host)
        };

        let arrow = if use_colors_in_prompt {
            if use_unicode {
                "❯".bright_blue().bold().to_string()
            } else {
                ">".bright_blue().bold().to_string()
            }
        } else {
            ">".to_string()
        };

        let parts = [status, brand_with_realm, identity];
        let body = parts.join(" ");
        format!("{} {} ", body, arrow)
    }

    /// Print welcome banner
    fn print_banner(&self) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════╗"
                .bright_blue()
                .bold()
        );
        println!(
            "{}",
            "║                                                           ║"
                .bright_blue()
                .bold()
        );
        println!(
            "{}{}{}",
            "║        ".bright_blue().bold(),
            "🏪  Merx Console - Back-Office Terminal".white().bold(),
            "          ║".bright_blue().bold()
        );
        println!(
            "{}",
            "║                                                           ║"
                .bright_blue()
                .bold()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════╝"
                .bright_blue()
                .bold()
        );
        println!();
        println!(
            "  {}  {}",
            "📡".dimmed(),
            format!("Server: {}", self.server_url).cyan()
        );

        let identity_line = match &self.auth {
            AuthState::Authenticated { realm, .. } => {
                format!("Signed in: {} ({} realm)", self.identity, realm)
            }
            _ => "Not signed in - use \\login or \\register".to_string(),
        };
        println!("  {}  {}", "👤".dimmed(), identity_line.cyan());

        println!(
            "  {}  {}",
            "📚".dimmed(),
            format!("CLI version: {} (built: {})", CLI_VERSION, env!("BUILD_DATE")).dimmed()
        );
        println!(
            "  {}  Type {} for help, {} for session info, {} to exit",
            "💡".dimmed(),
            "\\help".cyan().bold(),
            "\\info".cyan().bold(),
            "\\quit".cyan().bold()
        );
        println!();
    }

    fn history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".merx").join("history.txt"))
    }

    /// Run interactive readline loop with autocomplete
    pub async fn run_interactive(&mut self) -> Result<()> {
        println!("{}", "Restoring session...".dimmed());
        self.bootstrap().await;
        match &self.auth {
            AuthState::Authenticated { realm, .. } => {
                println!("{}", format!("✓ Session restored: {} realm", realm).green());
            }
            _ => println!(
                "{}",
                "No stored session. Use \\login to authenticate.".yellow()
            ),
        }

        self.print_banner();

        let mut completer = AutoCompleter::new();
        completer.set_resources(self.allowed_resource_keys());
        let helper = ConsoleHelper::new(completer, self.color);

        let config = Config::builder()
            .completion_type(CompletionType::List)
            .completion_prompt_limit(100)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(true)
            .build();

        let mut rl = Editor::<ConsoleHelper, DefaultHistory>::with_config(config)?;
        rl.set_helper(Some(helper));
        rl.bind_sequence(KeyEvent::from('\t'), Cmd::Complete);

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            let _ = rl.load_history(path);
        }

        loop {
            let prompt = self.primary_prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match self.parser.parse(line) {
                        Ok(Command::Quit) => {
                            println!("{}", "Goodbye!".cyan());
                            break;
                        }
                        Ok(command) => {
                            // Allowed resources change with the realm
                            let auth_changed =
                                matches!(command, Command::Login(_) | Command::Logout);

                            if let Err(e) = self.execute_command(command).await {
                                eprintln!("{}", format!("✗ {}", e).red());
                            }

                            if auth_changed {
                                if let Some(helper) = rl.helper_mut() {
                                    helper.completer.set_resources(self.allowed_resource_keys());
                                }
                            }
                        }
                        Err(e) => {
                            eprintln!("{}", format!("✗ {}", e).red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Use \\quit or \\q to exit".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("\n{}", "Goodbye!".cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("✗ {}", err).red());
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Execute a single command line
    pub async fn execute(&mut self, line: &str) -> Result<()> {
        match self.parser.parse(line)? {
            Command::Quit => Ok(()),
            command => self.execute_command(command).await,
        }
    }

    /// Execute a script file, one command per line
    ///
    /// Blank lines and `#` comments are skipped; the first failing command
    /// stops the script.
    pub async fn execute_script(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            println!("{} {}", "merx>".dimmed(), line);
            match self.parser.parse(line)? {
                Command::Quit => break,
                command => self.execute_command(command).await?,
            }
        }
        Ok(())
    }
}

/// Rustyline helper with autocomplete and inline hints
struct ConsoleHelper {
    completer: AutoCompleter,
    color: bool,
}

impl ConsoleHelper {
    fn new(completer: AutoCompleter, color: bool) -> Self {
        Self { completer, color }
    }
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        self.completer.completion_hint(line, pos)
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if self.color && !hint.is_empty() {
            Cow::Owned(hint.dimmed().to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }
}

impl Validator for ConsoleHelper {}

impl Helper for ConsoleHelper {}
