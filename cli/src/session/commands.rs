//! Command execution.
//!
//! Every parsed [`Command`] lands here. Resource commands run against the
//! open view; forms prompt field by field on stdin, then submit through
//! the client and map server validation payloads back onto the form.

use colored::Colorize;
use merx_link::{
    normalize_validation, record_id, AuthState, MerxLinkError, Realm, Record, RegisterRequest,
};
use serde_json::Value;
use std::io::{self, Write};

use crate::engine::{compute_stats, filter_rows, FieldValue, FormState, RefOption};
use crate::error::{CLIError, Result};
use crate::parser::Command;
use crate::schema::{registry, Action, FieldKind, FieldSpec, ResourceSpec};

use super::{ConsoleSession, OutputFormat, ResourceView};

/// Field keys of the registration form, for server error normalization
const REGISTER_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "country",
    "city",
    "address",
    "admin_first_name",
    "admin_last_name",
    "admin_email",
    "admin_password",
];

impl ConsoleSession {
    /// Execute a parsed command
    pub(super) async fn execute_command(&mut self, command: Command) -> Result<()> {
        self.commands_executed += 1;

        match command {
            Command::Resources => self.show_resources(),
            Command::Open(resource) => self.open_resource(&resource).await,
            Command::List(resource) => self.list_rows(resource.as_deref()).await,
            Command::Search(query) => self.search_rows(&query),
            Command::Create(resource) => self.create_record(resource.as_deref()).await,
            Command::Edit { resource, id } => self.edit_record(resource.as_deref(), id).await,
            Command::Delete { resource, id } => self.delete_record(resource.as_deref(), id).await,
            Command::Info(id) => self.show_role_info(id).await,
            Command::Stats(resource) => self.show_stats(resource.as_deref()).await,
            Command::Refresh => self.refresh_view().await,
            Command::Login(realm) => self.login(realm).await,
            Command::Register => self.register().await,
            Command::Logout => self.logout().await,
            Command::WhoAmI => self.show_whoami().await,
            Command::RealmInfo => {
                self.show_realm();
                Ok(())
            }
            Command::SetFormat(format) => self.set_format_command(&format),
            Command::SessionInfo => {
                self.show_session_info();
                Ok(())
            }
            Command::Help => {
                self.show_help();
                Ok(())
            }
            Command::Quit => Ok(()),
            Command::Unknown(name) => Err(CLIError::CommandError(format!(
                "Unknown command: {}. Type \\help for available commands.",
                name
            ))),
        }
    }

    /// Resolve a resource key against the catalog and the session's realm
    fn resolve_resource(&self, key: &str) -> Result<&'static ResourceSpec> {
        let realm = self.require_realm()?;
        let resource = registry::find(key).ok_or_else(|| {
            CLIError::CommandError(format!(
                "Unknown resource: '{}'. Use 'resources' to see what is available.",
                key.trim()
            ))
        })?;

        if realm == Realm::Merchant && resource.realm != Realm::Merchant {
            return Err(CLIError::CommandError(
                "Merchant sessions can access merchant resources only.".into(),
            ));
        }
        Ok(resource)
    }

    /// Check the read gate, printing the no-access notice when it fails
    fn can_read(&self, resource: &ResourceSpec) -> bool {
        if resource.allows(Action::Read, self.auth.permissions()) {
            return true;
        }
        println!("{}", "No access".red().bold());
        println!("You do not have permission to view this section.");
        false
    }

    /// The open view, or instructions to open one
    fn current_view(&self) -> Result<&ResourceView> {
        self.view.as_ref().ok_or_else(|| {
            CLIError::CommandError("No resource is open. Use 'open <resource>' first.".into())
        })
    }

    /// Make sure a view is open, loading `resource` when one is named
    ///
    /// `Ok(false)` means the read gate blocked the load and the notice is
    /// already on screen.
    async fn ensure_view(&mut self, resource: Option<&str>) -> Result<bool> {
        match resource {
            Some(key) => {
                let spec = self.resolve_resource(key)?;
                if !self.can_read(spec) {
                    return Ok(false);
                }
                let same = self
                    .view
                    .as_ref()
                    .map(|view| std::ptr::eq(view.resource, spec))
                    .unwrap_or(false);
                if !same {
                    self.load_view(spec).await?;
                }
                Ok(true)
            }
            None => {
                self.current_view()?;
                Ok(true)
            }
        }
    }

    /// Row of the open view with the given id
    fn find_row(&self, id: i64) -> Option<Record> {
        self.view.as_ref().and_then(|view| {
            view.rows
                .iter()
                .find(|row| record_id(row) == Some(id))
                .cloned()
        })
    }

    fn action_gate(&self, resource: &ResourceSpec, action: Action) -> Result<()> {
        if resource.allows(action, self.auth.permissions()) {
            Ok(())
        } else {
            Err(CLIError::CommandError(
                "You do not have permission to perform this action.".into(),
            ))
        }
    }

    /// List the resources this session may open
    fn show_resources(&self) -> Result<()> {
        let realm = self.require_realm()?;
        let allowed = registry::allowed_for(realm, self.auth.permissions());
        let default = registry::default_resource(realm, self.auth.permissions());

        println!("{}", "Available resources:".yellow().bold());
        for resource in &allowed {
            let marker = if default
                .map(|d| std::ptr::eq(*resource, d))
                .unwrap_or(false)
            {
                " (default)".dimmed().to_string()
            } else {
                String::new()
            };
            // Pad before coloring so escape codes stay out of the width
            println!(
                "  {} {}{}",
                format!("{:<28}", resource.key).cyan(),
                resource.title,
                marker
            );
        }
        println!();
        println!("{}", format!("({} available)", allowed.len()).dimmed());
        Ok(())
    }

    /// Open a resource and render it
    async fn open_resource(&mut self, key: &str) -> Result<()> {
        let resource = self.resolve_resource(key)?;
        if !self.can_read(resource) {
            return Ok(());
        }
        self.load_view(resource).await?;
        self.render_view()
    }

    async fn list_rows(&mut self, resource: Option<&str>) -> Result<()> {
        match resource {
            Some(key) => self.open_resource(key).await,
            None => {
                self.current_view()?;
                self.render_view()
            }
        }
    }

    /// Set the filter of the open view; an empty query clears it
    fn search_rows(&mut self, query: &str) -> Result<()> {
        let view = self.view.as_mut().ok_or_else(|| {
            CLIError::CommandError("No resource is open. Use 'open <resource>' first.".into())
        })?;
        view.filter = query.trim().to_string();
        self.render_view()
    }

    /// Reload the open view from the server, keeping the filter
    async fn refresh_view(&mut self) -> Result<()> {
        let resource = self.current_view()?.resource;
        self.load_view(resource).await?;
        self.render_view()
    }

    /// Render the open view in the session's output format
    fn render_view(&self) -> Result<()> {
        let view = self.current_view()?;
        let rows = filter_rows(&view.rows, view.resource, &view.permission_map, &view.filter);

        if matches!(self.formatter.format(), OutputFormat::Table) {
            let title = if view.filter.is_empty() {
                view.resource.title.to_string()
            } else {
                format!("{} (filter: {})", view.resource.title, view.filter)
            };
            println!("{}", title.bold());
        }

        let output = self
            .formatter
            .format_rows(view.resource, &rows, &view.permission_map)?;
        print!("{}", output);
        Ok(())
    }

    /// Interactive create form for the open (or named) resource
    async fn create_record(&mut self, resource: Option<&str>) -> Result<()> {
        if !self.ensure_view(resource).await? {
            return Ok(());
        }
        let spec = self.current_view()?.resource;
        self.action_gate(spec, Action::Create)?;
        let reference_options = self.current_view()?.reference_options.clone();

        println!("{}", format!("New {} record", spec.title).bold());
        println!("{}", "Press Enter to leave a field empty.".dimmed());

        let mut form = FormState::create(spec);
        for field in spec.fields {
            loop {
                let options = reference_options.get(field.key).map(Vec::as_slice);
                let value = prompt_create_field(field, options)?;
                form.set_value(field.key, value);
                match form.error(field.key) {
                    Some(message) => eprintln!("{}", format!("✗ {}", message).red()),
                    None => break,
                }
            }
        }

        if !form.validate() {
            eprintln!("{}", "✗ Please fill in the required fields.".red());
            for (field, message) in form.errors_in_order() {
                eprintln!("  {}: {}", field.label, message);
            }
            return Ok(());
        }

        let payload = form.payload();
        let result = self
            .with_loading("Saving...", self.client.create(spec.key, &payload))
            .await;

        match result {
            Ok(_) => {
                println!("{}", "✓ Created.".green());
                self.refresh_view().await
            }
            Err(e) => self.report_save_error(&mut form, e),
        }
    }

    /// Interactive edit form seeded from an existing record
    async fn edit_record(&mut self, resource: Option<&str>, id: i64) -> Result<()> {
        if !self.ensure_view(resource).await? {
            return Ok(());
        }
        let spec = self.current_view()?.resource;
        self.action_gate(spec, Action::Update)?;

        let row = match self.find_row(id) {
            Some(row) => row,
            None => self
                .client
                .get(spec.key, id)
                .await?
                .ok_or_else(|| CLIError::CommandError(format!("Record #{} not found.", id)))?,
        };
        let reference_options = self.current_view()?.reference_options.clone();

        println!("{}", format!("Edit {} #{}", spec.title, id).bold());
        println!("{}", "Press Enter to keep the current value.".dimmed());

        let mut form = FormState::edit(spec, id, &row);
        for field in spec.fields {
            let options = reference_options.get(field.key).map(Vec::as_slice);
            if let Some(value) = prompt_edit_field(field, form.value(field.key), options)? {
                form.set_value(field.key, value);
                if let Some(message) = form.error(field.key) {
                    eprintln!("{}", format!("✗ {}", message).red());
                }
            }
        }

        if !form.validate() {
            eprintln!("{}", "✗ Please fill in the required fields.".red());
            for (field, message) in form.errors_in_order() {
                eprintln!("  {}: {}", field.label, message);
            }
            return Ok(());
        }

        let payload = form.payload();
        let result = self
            .with_loading("Saving...", self.client.update(spec.key, id, &payload))
            .await;

        match result {
            Ok(_) => {
                println!("{}", "✓ Updated.".green());
                self.refresh_view().await
            }
            Err(e) => self.report_save_error(&mut form, e),
        }
    }

    /// Delete a record after confirmation
    async fn delete_record(&mut self, resource: Option<&str>, id: i64) -> Result<()> {
        if !self.ensure_view(resource).await? {
            return Ok(());
        }
        let spec = self.current_view()?.resource;
        self.action_gate(spec, Action::Delete)?;

        println!("{}", "Delete record?".bold());
        println!("{}", "This action cannot be undone.".dimmed());
        println!("Deleting {} #{}", spec.title, id);
        let answer = read_input("Are you sure? [y/N]: ")?;
        if !truthy_input(&answer) {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }

        self.with_loading("Deleting...", self.client.remove(spec.key, id))
            .await?;
        println!("{}", "✓ Deleted.".green());
        self.refresh_view().await
    }

    /// Role details with the resolved permission list
    async fn show_role_info(&mut self, id: i64) -> Result<()> {
        let spec = self.current_view()?.resource;
        if spec.join.is_none() {
            return Err(CLIError::CommandError(
                "'info' is available for role resources only.".into(),
            ));
        }

        let row = match self.find_row(id) {
            Some(row) => row,
            None => self
                .client
                .get(spec.key, id)
                .await?
                .ok_or_else(|| CLIError::CommandError(format!("Record #{} not found.", id)))?,
        };
        let permissions = self
            .current_view()?
            .permission_map
            .get(&id)
            .cloned()
            .unwrap_or_default();

        println!("{}", "Role Info".bold());
        print!("{}", self.formatter.format_role_info(&row, &permissions));
        Ok(())
    }

    /// Aggregates over the full row set of a view, ignoring the filter
    async fn show_stats(&mut self, resource: Option<&str>) -> Result<()> {
        if !self.ensure_view(resource).await? {
            return Ok(());
        }
        let view = self.current_view()?;
        let stats = compute_stats(&view.rows, view.resource);

        println!("{}", format!("{} stats", view.resource.title).bold());
        println!("{}", self.formatter.format_stats(&stats));
        Ok(())
    }

    /// Authenticate against a realm
    pub(super) async fn login(&mut self, realm: Option<Realm>) -> Result<()> {
        let realm = realm
            .or_else(|| Realm::parse(&self.config.resolved_auth().default_realm))
            .unwrap_or(Realm::Platform);

        println!("{}", format!("Login ({} realm)", realm).bold());
        let email = read_input("Email: ")?;
        let password = read_secret("Password: ")?;

        self.with_loading("Logging in...", self.client.login(realm, &email, &password))
            .await?;

        let profile = self.client.me(realm).await.ok();
        let permissions = match realm {
            Realm::Platform => profile
                .as_ref()
                .map(|p| p.permissions.clone())
                .unwrap_or_default(),
            Realm::Merchant => Vec::new(),
        };
        self.apply_profile(profile);
        self.auth = AuthState::Authenticated { realm, permissions };
        // Open views belong to the previous identity
        self.view = None;

        self.persist_session()?;
        println!(
            "{}",
            format!("✓ Logged in to the {} realm as {}.", realm, self.identity).green()
        );
        Ok(())
    }

    /// Register a new merchant with its first admin account
    pub(super) async fn register(&mut self) -> Result<()> {
        println!("{}", "Merchant registration".bold());
        println!(
            "{}",
            "Creates a merchant together with its first admin account.".dimmed()
        );

        let name = read_required("Merchant name: ")?;
        let email = read_input("Contact email (optional): ")?;
        let phone = read_input("Phone (optional): ")?;
        let country = read_input("Country (optional): ")?;
        let city = read_input("City (optional): ")?;
        let address = read_input("Address (optional): ")?;
        let admin_first_name = read_required("Admin first name: ")?;
        let admin_last_name = read_required("Admin last name: ")?;
        let admin_email = loop {
            let value = read_required("Admin email: ")?;
            if valid_email(&value) {
                break value;
            }
            eprintln!("{}", "✗ Enter a valid email address.".red());
        };
        let admin_password = loop {
            let value = read_secret("Admin password: ")?;
            if value.len() >= 6 {
                break value;
            }
            eprintln!("{}", "✗ Password must be at least 6 characters.".red());
        };

        let request = RegisterRequest {
            name,
            email,
            phone,
            country,
            city,
            address,
            admin_first_name,
            admin_last_name,
            admin_email,
            admin_password,
        };

        match self
            .with_loading("Registering...", self.client.register(&request))
            .await
        {
            Ok(()) => {
                println!(
                    "{}",
                    "✓ Registration submitted. You can now log in with \\login merchant.".green()
                );
                Ok(())
            }
            Err(MerxLinkError::ServerError {
                status_code: 400,
                message,
                body,
            }) => {
                let report =
                    normalize_validation(body.as_ref().unwrap_or(&Value::Null), REGISTER_FIELDS);
                if report.is_empty() {
                    eprintln!("{}", format!("✗ {}", message).red());
                } else {
                    eprintln!("{}", "✗ Registration failed:".red());
                    for (field, msg) in &report.field_errors {
                        eprintln!("  {}: {}", field, msg);
                    }
                    if let Some(message) = report.message {
                        eprintln!("  {}", message);
                    }
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// End the session
    ///
    /// The console always goes unauthenticated, even when the server call
    /// fails; in that case the stored tokens survive for the next bootstrap.
    pub(super) async fn logout(&mut self) -> Result<()> {
        match self.auth.realm() {
            Some(realm) => {
                match self
                    .with_loading("Logging out...", self.client.logout(realm))
                    .await
                {
                    Ok(()) => println!("{}", "✓ Logged out.".green()),
                    Err(e) => eprintln!(
                        "{}",
                        format!("Server logout failed: {}", CLIError::from(e)).yellow()
                    ),
                }
            }
            None => println!("{}", "Not logged in.".yellow()),
        }

        self.auth = AuthState::Unauthenticated;
        self.apply_profile(None);
        self.view = None;
        self.client.set_active_realm(None);
        self.persist_session()?;
        Ok(())
    }

    /// Switch the output format
    pub(super) fn set_format_command(&mut self, format: &str) -> Result<()> {
        let format = OutputFormat::parse(format).ok_or_else(|| {
            CLIError::ParseError(format!("Invalid format '{}'. Valid: table, json, csv", format))
        })?;
        self.formatter.set_format(format);
        println!("Output format: {}", format.as_str().cyan());
        Ok(())
    }

    /// Surface a failed save, mapping 400 payloads onto form fields
    fn report_save_error(&self, form: &mut FormState, error: MerxLinkError) -> Result<()> {
        if let MerxLinkError::ServerError {
            status_code: 400,
            message,
            body,
        } = error
        {
            let keys: Vec<&str> = form.resource().fields.iter().map(|f| f.key).collect();
            let report = normalize_validation(body.as_ref().unwrap_or(&Value::Null), &keys);
            form.apply_server_report(&report);

            if form.has_errors() {
                eprintln!("{}", "✗ Validation failed:".red());
                for (field, msg) in form.errors_in_order() {
                    eprintln!("  {}: {}", field.label, msg);
                }
                if let Some(message) = report.message {
                    eprintln!("  {}", message);
                }
            } else {
                eprintln!("{}", format!("✗ {}", report.message.unwrap_or(message)).red());
            }
            return Ok(());
        }
        Err(error.into())
    }

    /// Show available commands
    pub(super) fn show_help(&self) {
        println!("{}", "Resource commands:".yellow().bold());
        help_line("resources", "List the resources you can open");
        help_line("open <resource>", "Open a resource view");
        help_line("list [resource]", "Show rows of the open (or named) resource");
        help_line("search <text>", "Filter rows; bare 'search' clears the filter");
        help_line("create [resource]", "Create a record interactively");
        help_line("edit [resource] <id>", "Edit a record field by field");
        help_line("delete [resource] <id>", "Delete a record (asks first)");
        help_line("info <id>", "Role details with resolved permissions");
        help_line("stats [resource]", "Totals and status breakdown");
        help_line("refresh", "Reload the open resource");
        println!();
        println!("{}", "Meta commands:".yellow().bold());
        help_line("\\login [platform|merchant]", "Authenticate against a realm");
        help_line("\\register", "Register a new merchant");
        help_line("\\logout", "End the current session");
        help_line("\\whoami", "Show the authenticated profile");
        help_line("\\realm", "Show the active realm");
        help_line("\\format <table|json|csv>", "Switch the output format");
        help_line("\\info", "Session information");
        help_line("\\help, \\?", "This help");
        help_line("\\quit, \\q", "Exit the console");
        println!();
        println!(
            "{}",
            "Aliases: ls, new, update, del, rm, reload".dimmed()
        );
    }
}

fn help_line(command: &str, description: &str) {
    // Pad before coloring so escape codes stay out of the width
    println!("  {} {}", format!("{:<28}", command).cyan(), description);
}

/// Read one trimmed line from stdin; EOF cancels the flow
fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| CLIError::FileError(format!("Failed to flush stdout: {}", e)))?;

    let mut input = String::new();
    let bytes = io::stdin()
        .read_line(&mut input)
        .map_err(|e| CLIError::FileError(format!("Failed to read input: {}", e)))?;
    if bytes == 0 {
        return Err(CLIError::Cancelled);
    }
    Ok(input.trim().to_string())
}

/// Read a non-empty line, re-prompting until one arrives
fn read_required(prompt: &str) -> Result<String> {
    loop {
        let value = read_input(prompt)?;
        if !value.is_empty() {
            return Ok(value);
        }
        eprintln!("{}", "✗ This field is required.".red());
    }
}

/// Read a secret without echoing it
fn read_secret(prompt: &str) -> Result<String> {
    let value = rpassword::prompt_password(prompt)
        .map_err(|e| CLIError::FileError(format!("Failed to read password: {}", e)))?;
    Ok(value.trim().to_string())
}

/// y/yes/true/1 in any case count as yes
fn truthy_input(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "true" | "1")
}

fn required_marker(field: &FieldSpec) -> &'static str {
    if field.required {
        " *"
    } else {
        ""
    }
}

fn print_choices(label: &str, items: impl Iterator<Item = String>) {
    println!("{}", format!("{} options:", label).dimmed());
    for (index, item) in items.enumerate() {
        println!("  {}. {}", index + 1, item);
    }
}

/// Prompt for one field of a create form
fn prompt_create_field(
    field: &'static FieldSpec,
    references: Option<&[RefOption]>,
) -> Result<FieldValue> {
    match &field.kind {
        FieldKind::Boolean => {
            let input = read_input(&format!("{} [y/N]: ", field.label))?;
            Ok(FieldValue::Flag(truthy_input(&input)))
        }
        FieldKind::Password => {
            let value = read_secret(&format!("{}{}: ", field.label, required_marker(field)))?;
            Ok(FieldValue::Text(value))
        }
        FieldKind::Select { options } => {
            print_choices(field.label, options.iter().map(|o| o.to_string()));
            let input = read_input(&format!("{}{}: ", field.label, required_marker(field)))?;
            Ok(FieldValue::Text(resolve_choice(&input, options)))
        }
        FieldKind::Reference { .. } => {
            let options = references.unwrap_or(&[]);
            if options.is_empty() {
                let input =
                    read_input(&format!("{} (id){}: ", field.label, required_marker(field)))?;
                Ok(FieldValue::Text(input))
            } else {
                print_choices(field.label, options.iter().map(|o| o.label.clone()));
                let input = read_input(&format!(
                    "{} (id or number){}: ",
                    field.label,
                    required_marker(field)
                ))?;
                Ok(FieldValue::Text(resolve_reference(&input, options)))
            }
        }
        _ => {
            let input = read_input(&format!("{}{}: ", field.label, required_marker(field)))?;
            Ok(FieldValue::Text(input))
        }
    }
}

/// Prompt for one field of an edit form; `None` keeps the current value
fn prompt_edit_field(
    field: &'static FieldSpec,
    current: Option<&FieldValue>,
    references: Option<&[RefOption]>,
) -> Result<Option<FieldValue>> {
    match &field.kind {
        FieldKind::Boolean => {
            let flag = matches!(current, Some(FieldValue::Flag(true)));
            let shown = if flag { "Yes" } else { "No" };
            let input = read_input(&format!("{} [{}] (y/n): ", field.label, shown))?;
            if input.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Flag(truthy_input(&input))))
            }
        }
        FieldKind::Password => {
            let value = read_secret(&format!("{} (leave empty to keep): ", field.label))?;
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(value)))
            }
        }
        FieldKind::Select { options } => {
            let shown = current.and_then(FieldValue::as_text).unwrap_or("");
            print_choices(field.label, options.iter().map(|o| o.to_string()));
            let input = read_input(&format!("{} [{}]: ", field.label, shown))?;
            if input.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(resolve_choice(&input, options))))
            }
        }
        FieldKind::Reference { .. } => {
            let shown = current.and_then(FieldValue::as_text).unwrap_or("");
            let options = references.unwrap_or(&[]);
            let input = if options.is_empty() {
                read_input(&format!("{} (id) [{}]: ", field.label, shown))?
            } else {
                print_choices(field.label, options.iter().map(|o| o.label.clone()));
                read_input(&format!("{} (id or number) [{}]: ", field.label, shown))?
            };
            if input.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(resolve_reference(&input, options))))
            }
        }
        _ => {
            let shown = current.and_then(FieldValue::as_text).unwrap_or("");
            let input = read_input(&format!("{} [{}]: ", field.label, shown))?;
            if input.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(input)))
            }
        }
    }
}

/// Map a 1-based list number onto an option; anything else passes through
fn resolve_choice(input: &str, options: &[&str]) -> String {
    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return options[index - 1].to_string();
        }
    }
    input.to_string()
}

/// Resolve reference input to a foreign-key id
///
/// An exact id wins over a list number, so typing an id that also happens
/// to be a valid list position selects the id.
fn resolve_reference(input: &str, options: &[RefOption]) -> String {
    if options.iter().any(|option| option.value == input) {
        return input.to_string();
    }
    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return options[index - 1].value.clone();
        }
    }
    input.to_string()
}

/// Same acceptance as the web console's email check: exactly one `@`, a
/// non-empty local part, no whitespace, and a dot inside the domain
fn valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("alice@example.com"));
        assert!(valid_email("a@b.c"));
        assert!(valid_email("x@a..b"));

        assert!(!valid_email("alice"));
        assert!(!valid_email("alice@"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("alice@example"));
        assert!(!valid_email("alice@.com"));
        assert!(!valid_email("alice@com."));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email("a@b@example.com"));
    }

    #[test]
    fn test_truthy_input() {
        assert!(truthy_input("y"));
        assert!(truthy_input("Yes"));
        assert!(truthy_input(" TRUE "));
        assert!(truthy_input("1"));

        assert!(!truthy_input(""));
        assert!(!truthy_input("n"));
        assert!(!truthy_input("no"));
        assert!(!truthy_input("0"));
    }

    #[test]
    fn test_resolve_choice() {
        let options = &["active", "inactive", "suspended"];
        assert_eq!(resolve_choice("2", options), "inactive");
        assert_eq!(resolve_choice("active", options), "active");
        // Out-of-range numbers pass through as typed
        assert_eq!(resolve_choice("7", options), "7");
        assert_eq!(resolve_choice("", options), "");
    }

    #[test]
    fn test_resolve_reference_prefers_exact_id() {
        let options = vec![
            RefOption {
                value: "2".to_string(),
                label: "Ops (#2)".to_string(),
            },
            RefOption {
                value: "9".to_string(),
                label: "Support (#9)".to_string(),
            },
        ];

        // "2" is both an id and a list position; the id wins
        assert_eq!(resolve_reference("2", &options), "2");
        assert_eq!(resolve_reference("1", &options), "2");
        assert_eq!(resolve_reference("9", &options), "9");
        assert_eq!(resolve_reference("14", &options), "14");
    }
}
