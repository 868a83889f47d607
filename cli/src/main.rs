//! Merx CLI - Interactive back-office terminal for Merx
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! merx -u http://localhost:3001
//!
//! # Execute a command script
//! merx -u http://localhost:3001 --file setup.merx
//!
//! # JSON output
//! merx -u http://localhost:3001 --json -c "list products"
//! ```

use clap::Parser;

use merx_cli::{CLIConfiguration, CLIError, FileTokenStore, Result};

mod args;
mod commands;
mod connect;

use args::Cli;
use commands::credentials::handle_credentials;
use connect::create_session;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging (basic)
    if cli.verbose {
        eprintln!("Verbose mode enabled");
    }

    // Open the stored-session backend
    let mut token_store = FileTokenStore::new()
        .map_err(|e| CLIError::ConfigurationError(format!("Failed to open session store: {}", e)))?;

    // Handle session management flags
    if handle_credentials(&cli, &mut token_store)? {
        return Ok(());
    }

    // Load configuration
    let config = CLIConfiguration::load(&cli.config)?;

    let mut session = create_session(&cli, token_store, &config)?;

    // Execute based on mode
    match (cli.file, cli.command) {
        // Execute a command script
        (Some(file), None) => {
            session.bootstrap().await;
            session.execute_script(&file).await?;
        }

        // Execute single command
        (None, Some(command)) => {
            session.bootstrap().await;
            session.execute(&command).await?;
        }

        // Interactive mode
        (None, None) => {
            session.run_interactive().await?;
        }

        // Invalid combination
        (Some(_), Some(_)) => {
            return Err(CLIError::ConfigurationError(
                "Cannot specify both --file and --command".into(),
            ));
        }
    }

    Ok(())
}
