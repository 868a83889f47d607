//! Library entry point for merx-cli components.
//!
//! Exposes reusable modules (formatter, session, schema, etc.) so integration
//! tests and other crates can leverage CLI formatting and behaviors without
//! going through the binary entry point.

pub mod completer;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod schema;
pub mod session;

pub use config::CLIConfiguration;
pub use credentials::FileTokenStore;
pub use error::{CLIError, Result};
pub use formatter::OutputFormatter;
pub use session::{ConsoleSession, OutputFormat};

/// CLI version from Cargo.toml
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
