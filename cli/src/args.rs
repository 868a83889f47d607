use clap::Parser;
use merx_cli::OutputFormat;
use std::path::PathBuf;

// Build information - Create a static version string at compile time

// Macro to create the version string at compile time
macro_rules! version_string {
    () => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nCommit: ",
            env!("GIT_COMMIT_HASH"),
            " (",
            env!("GIT_BRANCH"),
            ")\nBuilt: ",
            env!("BUILD_DATE")
        )
    };
}

/// Merx CLI - Terminal client for the Merx back office
#[derive(Parser, Debug)]
#[command(name = "merx")]
#[command(author = "Merx Team")]
#[command(version = version_string!())]
#[command(about = "Interactive back-office terminal for Merx", long_about = None)]
pub struct Cli {
    /// Server URL (e.g., http://localhost:3001)
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Execute commands from file and exit
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Execute a single command and exit
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,

    /// Output format
    #[arg(long = "format", default_value = "table")]
    pub format: OutputFormat,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with = "format")]
    pub json: bool,

    /// Enable CSV output (shorthand for --format=csv)
    #[arg(long = "csv", conflicts_with = "format")]
    pub csv: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable spinners/animations
    #[arg(long = "no-spinner")]
    pub no_spinner: bool,

    /// Loading indicator threshold in ms (0 to always show)
    #[arg(long = "loading-threshold-ms")]
    pub loading_threshold_ms: Option<u64>,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.merx/config.toml")]
    pub config: PathBuf,

    /// Realm offered first by \login: platform or merchant
    #[arg(long = "realm")]
    pub realm: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// HTTP request timeout in seconds (default: 30)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (TCP + TLS handshake, default: 10)
    #[arg(
        long = "connection-timeout",
        value_name = "SECONDS",
        default_value_t = 10
    )]
    pub connection_timeout: u64,

    // Session management commands
    /// Show the stored session tokens and exit
    #[arg(long = "show-session")]
    pub show_session: bool,

    /// Clear the stored session tokens and exit
    #[arg(long = "clear-session")]
    pub clear_session: bool,
}
