use crate::args::Cli;
use merx_cli::{FileTokenStore, Result};
use merx_link::{RealmTokens, TokenStore};

/// Handle the stored-session flags. Returns `Ok(true)` when a flag was
/// handled and the process should exit without starting a session.
pub fn handle_credentials(cli: &Cli, token_store: &mut FileTokenStore) -> Result<bool> {
    if cli.show_session {
        let tokens = token_store.load()?;
        if tokens.is_empty() {
            println!("No stored session");
        } else {
            println!("Stored session tokens:");
            print_realm_slot("platform", &tokens.platform);
            print_realm_slot("merchant", &tokens.merchant);
            match tokens.active_realm {
                Some(realm) => println!("Active realm: {}", realm.as_str()),
                None => println!("Active realm: none"),
            }
        }
        println!("Storage: {}", token_store.path().display());
        return Ok(true);
    }

    if cli.clear_session {
        token_store.clear()?;
        println!("Cleared stored session tokens");
        return Ok(true);
    }

    Ok(false)
}

fn print_realm_slot(label: &str, slot: &RealmTokens) {
    if slot.is_empty() {
        return;
    }
    println!("  • {}", label);
    if let Some(ref token) = slot.access_token {
        println!("    Access token: {}...", &token[..token.len().min(20)]);
    }
    if let Some(ref token) = slot.refresh_token {
        println!("    Refresh token: {}...", &token[..token.len().min(20)]);
    }
}
