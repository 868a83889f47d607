use super::ConsoleSession;
use crate::error::Result;
use crate::CLI_VERSION;
use colored::Colorize;
use merx_link::{AuthState, Realm};

impl ConsoleSession {
    /// Show current session information
    pub(super) fn show_session_info(&self) {
        println!();
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!("{}", "    Session Information".white().bold());
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!();

        // Connection info
        println!("{}", "Connection:".yellow().bold());
        println!("  Server URL:     {}", self.server_url.green());
        let realm_label = match &self.auth {
            AuthState::Authenticated { realm, .. } => realm.as_str().green(),
            AuthState::Pending => "not restored yet".dimmed(),
            AuthState::Unauthenticated => "none".dimmed(),
        };
        println!("  Realm:          {}", realm_label);
        println!("  Identity:       {}", self.identity.green());
        if let Some(profile) = &self.profile {
            println!("  Account:        {}", profile.display_name().green());
        }
        println!(
            "  Permissions:    {}",
            self.auth.permissions().len().to_string().green()
        );

        // Session timing
        let uptime = self.started_at.elapsed();
        let hours = uptime.as_secs() / 3600;
        let minutes = (uptime.as_secs() % 3600) / 60;
        let seconds = uptime.as_secs() % 60;
        let uptime_str = if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        };
        println!("  Session time:   {}", uptime_str.green());
        println!();

        // Open view
        println!("{}", "View:".yellow().bold());
        match &self.view {
            Some(view) => {
                println!("  Resource:       {}", view.resource.title.green());
                println!("  Rows:           {}", view.rows.len().to_string().green());
                if view.filter.is_empty() {
                    println!("  Filter:         {}", "none".dimmed());
                } else {
                    println!("  Filter:         {}", view.filter.green());
                }
            }
            None => println!("  {}", "No resource open".dimmed()),
        }
        println!();

        // CLI config
        let server_cfg = self.config.resolved_server();
        let ui_cfg = self.config.resolved_ui();
        println!("{}", "CLI Config:".yellow().bold());
        println!(
            "  Config File:    {}",
            self.config_path.display().to_string().green()
        );
        println!(
            "  File Exists:    {}",
            if self.config_path.exists() {
                "Yes".green()
            } else {
                "No".red()
            }
        );
        println!("  Timeout:        {}s", server_cfg.timeout.to_string().green());
        println!("  Output Format:  {}", ui_cfg.format.green());
        println!(
            "  Spinner:        {}",
            if self.animations {
                "Enabled".green()
            } else {
                "Disabled".red()
            }
        );
        println!(
            "  Load Threshold: {} ms",
            self.loading_threshold_ms.to_string().green()
        );
        println!();

        // Session statistics
        println!("{}", "Statistics:".yellow().bold());
        println!(
            "  Commands:       {}",
            self.commands_executed.to_string().green()
        );
        println!(
            "  Format:         {}",
            format!("{:?}", self.formatter.format()).green()
        );
        println!(
            "  Colors:         {}",
            if self.color {
                "Enabled".green()
            } else {
                "Disabled".red()
            }
        );
        println!();

        // Credentials info
        println!("{}", "Credentials:".yellow().bold());
        println!(
            "  Storage:        {}",
            self.token_store.path().display().to_string().dimmed()
        );
        println!();

        // Client info
        println!("{}", "Client:".yellow().bold());
        println!("  CLI Version:    {}", CLI_VERSION.green());
        println!("  Build Date:     {}", env!("BUILD_DATE").green());
        println!("  Git Branch:     {}", env!("GIT_BRANCH").green());
        println!("  Git Commit:     {}", env!("GIT_COMMIT_HASH").green());
        println!();

        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!();
    }

    /// Fetch and show the authenticated profile
    pub(super) async fn show_whoami(&mut self) -> Result<()> {
        let realm = match self.auth.realm() {
            Some(realm) => realm,
            None => {
                println!("{}", "Not logged in.".yellow());
                return Ok(());
            }
        };

        let profile = self
            .with_loading("Fetching profile...", self.client.me(realm))
            .await?;

        println!("{}", "Signed in as:".yellow().bold());
        println!("  Name:           {}", profile.display_name().green());
        if let Some(email) = profile.email.as_deref().filter(|e| !e.is_empty()) {
            println!("  Email:          {}", email.green());
        }
        println!("  Realm:          {}", realm.as_str().green());
        match realm {
            Realm::Platform => println!(
                "  Permissions:    {}",
                profile.permissions.len().to_string().green()
            ),
            Realm::Merchant => {
                println!("  Access:         {}", "all merchant resources".green())
            }
        }

        // The profile is fresh, so the prompt and the grants follow it
        if realm == Realm::Platform {
            if let AuthState::Authenticated { permissions, .. } = &mut self.auth {
                *permissions = profile.permissions.clone();
            }
        }
        self.apply_profile(Some(profile));
        Ok(())
    }

    /// Show the active realm
    pub(super) fn show_realm(&self) {
        match self.auth.realm() {
            Some(realm) => println!("Active realm: {}", realm.as_str().cyan()),
            None => println!(
                "{}",
                "No active realm. Use \\login to authenticate.".yellow()
            ),
        }
    }
}
