use crate::args::Cli;
use merx_cli::config::expand_config_path;
use merx_cli::{CLIConfiguration, ConsoleSession, FileTokenStore, OutputFormat, Result};
use merx_link::{MerxClient, TokenStore, DEFAULT_BASE_URL};
use std::time::Duration;

/// Build a console session from CLI arguments and the config file
///
/// CLI flags win over the config file for every setting they cover.
pub fn create_session(
    cli: &Cli,
    token_store: FileTokenStore,
    config: &CLIConfiguration,
) -> Result<ConsoleSession> {
    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else if cli.csv {
        OutputFormat::Csv
    } else {
        cli.format
    };

    let server_cfg = config.resolved_server();
    let ui_cfg = config.resolved_ui();

    // Determine server URL (CLI > config file > default)
    let server_url = cli
        .url
        .clone()
        .or(server_cfg.url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout = cli.timeout.unwrap_or(server_cfg.timeout);
    let loading_threshold_ms = cli
        .loading_threshold_ms
        .unwrap_or(ui_cfg.loading_threshold_ms);
    let color = !cli.no_color && ui_cfg.color;
    let animations = !cli.no_spinner && ui_cfg.spinner;

    let stored_session = token_store.load()?;

    let client = MerxClient::builder()
        .base_url(server_url)
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(cli.connection_timeout))
        .session(stored_session)
        .build()?;

    let mut config = config.clone();
    if let Some(ref realm) = cli.realm {
        let mut auth = config.resolved_auth();
        auth.default_realm = realm.clone();
        config.auth = Some(auth);
    }

    Ok(ConsoleSession::new(
        client,
        token_store,
        config,
        expand_config_path(&cli.config),
        format,
        color,
        animations,
        loading_threshold_ms,
    ))
}
