//! Output formatters for resource views.
//!
//! Renders fetched rows as a width-aware box table, JSON, or CSV, plus the
//! stats line and the role info card. Display conventions: null renders
//! `-`, booleans render `Yes`/`No`, every row leads with a profile cell
//! (initials, primary field, id), and status cells are colored.

use colored::Colorize;
use merx_link::{record_id, Record};
use serde_json::Value as JsonValue;

use crate::engine::{list, PermissionMap, ViewStats};
use crate::error::Result;
use crate::schema::ResourceSpec;
use crate::session::OutputFormat;

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Minimum column width when resizing to fit the terminal
const MIN_COLUMN_WIDTH: usize = 6;

/// Formats resource rows for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Get terminal width, defaulting to 80 if unavailable
    fn get_terminal_width() -> usize {
        if let Some((w, _h)) = term_size::dimensions() {
            w
        } else {
            80 // Default fallback
        }
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.len() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    /// Format a filtered row set in the active output format
    pub fn format_rows(
        &self,
        resource: &ResourceSpec,
        rows: &[&Record],
        permission_map: &PermissionMap,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.format_table(resource, rows, permission_map),
            OutputFormat::Json => self.format_json(rows),
            OutputFormat::Csv => Ok(self.format_csv(resource, rows, permission_map)),
        }
    }

    /// Format as a box-drawn table
    fn format_table(
        &self,
        resource: &ResourceSpec,
        rows: &[&Record],
        permission_map: &PermissionMap,
    ) -> Result<String> {
        if rows.is_empty() {
            return Ok("No data\n".to_string());
        }

        let mut columns: Vec<&str> = vec!["Profile", "id"];
        columns.extend(resource.fields.iter().map(|f| f.key));
        if resource.join.is_some() {
            columns.push("permission_count");
        }
        let status_column = resource
            .status_field()
            .and_then(|f| columns.iter().position(|c| *c == f.key));

        let terminal_width = Self::get_terminal_width();

        // Precompute string values once to avoid double formatting
        let mut string_rows: Vec<Vec<String>> = Vec::with_capacity(rows.len());
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
        for row in rows {
            let mut srow: Vec<String> = Vec::with_capacity(columns.len());
            for (i, col) in columns.iter().enumerate() {
                let value = match *col {
                    "Profile" => self.profile_cell(resource, row),
                    "permission_count" => list::permission_count(row, permission_map).to_string(),
                    key => format_value(row.get(key)),
                };
                col_widths[i] = col_widths[i].max(value.len());
                srow.push(value);
            }
            string_rows.push(srow);
        }

        let column_count = col_widths.len();
        // Calculate available width for columns
        let border_padding = column_count * 3 + 1;
        let mut available = terminal_width.saturating_sub(border_padding);
        if available < column_count {
            available = column_count;
        }

        // Only truncate if total width exceeds available space
        let mut total_width = col_widths.iter().sum::<usize>();
        if total_width > available {
            // First pass: cap at MAX_COLUMN_WIDTH if needed
            for width in col_widths.iter_mut() {
                if *width > MAX_COLUMN_WIDTH {
                    *width = MAX_COLUMN_WIDTH;
                }
            }
            total_width = col_widths.iter().sum();

            // Second pass: shrink columns to fit terminal if still too wide
            while total_width > available {
                if let Some((idx, _)) = col_widths
                    .iter()
                    .enumerate()
                    .filter(|(_, width)| **width > MIN_COLUMN_WIDTH)
                    .max_by_key(|(_, width)| *width)
                {
                    col_widths[idx] -= 1;
                } else if let Some((idx, _)) = col_widths
                    .iter()
                    .enumerate()
                    .filter(|(_, width)| **width > 1)
                    .max_by_key(|(_, width)| *width)
                {
                    col_widths[idx] -= 1;
                } else {
                    break;
                }
                total_width = col_widths.iter().sum();
            }
        }

        let mut output = String::new();

        // Top border
        output.push('┌');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 { '┐' } else { '┬' });
        }
        output.push('\n');

        // Header row
        output.push('│');
        for (i, col) in columns.iter().enumerate() {
            output.push(' ');
            let truncated = Self::truncate_value(col, col_widths[i]);
            output.push_str(&format!("{:width$}", truncated, width = col_widths[i]));
            output.push(' ');
            output.push('│');
        }
        output.push('\n');

        // Header separator
        output.push('├');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 { '┤' } else { '┼' });
        }
        output.push('\n');

        // Data rows
        for srow in &string_rows {
            output.push('│');
            for (i, value) in srow.iter().enumerate() {
                output.push(' ');
                let truncated = Self::truncate_value(value, col_widths[i]);
                let padded = format!("{:width$}", truncated, width = col_widths[i]);
                // Pad first so the escape codes stay out of the width math
                if self.color && status_column == Some(i) {
                    output.push_str(&self.colorize_status(&padded, value));
                } else {
                    output.push_str(&padded);
                }
                output.push(' ');
                output.push('│');
            }
            output.push('\n');
        }

        // Bottom border
        output.push('└');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 { '┘' } else { '┴' });
        }
        output.push('\n');

        let row_count = string_rows.len();
        let row_label = if row_count == 1 { "row" } else { "rows" };
        output.push_str(&format!("({} {})\n", row_count, row_label));

        Ok(output)
    }

    /// Format as JSON
    fn format_json(&self, rows: &[&Record]) -> Result<String> {
        let json = serde_json::to_string_pretty(rows)
            .map_err(|e| crate::error::CLIError::FormatError(e.to_string()))?;
        Ok(json + "\n")
    }

    /// Format as CSV
    fn format_csv(
        &self,
        resource: &ResourceSpec,
        rows: &[&Record],
        permission_map: &PermissionMap,
    ) -> String {
        let mut columns: Vec<&str> = vec!["id"];
        columns.extend(resource.fields.iter().map(|f| f.key));
        if resource.join.is_some() {
            columns.push("permission_count");
        }

        let mut output = columns.join(",") + "\n";
        for row in rows {
            let values: Vec<String> = columns
                .iter()
                .map(|col| {
                    let value = if *col == "permission_count" {
                        list::permission_count(row, permission_map).to_string()
                    } else {
                        format_value(row.get(*col))
                    };
                    Self::escape_csv_value(&value)
                })
                .collect();
            output.push_str(&values.join(","));
            output.push('\n');
        }

        output
    }

    /// Stats line shown after a table
    pub fn format_stats(&self, stats: &ViewStats) -> String {
        let max_id = if stats.max_id == 0 {
            "-".to_string()
        } else {
            stats.max_id.to_string()
        };
        let mut output = format!("Total: {} | Highest ID: {}", stats.total, max_id);

        let pills: Vec<String> = stats
            .pills()
            .iter()
            .map(|(status, count)| {
                let name = if self.color {
                    self.colorize_status(status, status)
                } else {
                    status.clone()
                };
                format!("{}: {}", name, count)
            })
            .collect();
        if !pills.is_empty() {
            output.push_str(" | ");
            output.push_str(&pills.join(", "));
        }
        output
    }

    /// Role details and the resolved permission list
    pub fn format_role_info(&self, role: &Record, permissions: &[String]) -> String {
        let name = role
            .get("name")
            .map(|v| format_value(Some(v)))
            .filter(|s| s != "-")
            .unwrap_or_else(|| format!("#{}", record_id(role).unwrap_or_default()));
        let description = role
            .get("description")
            .map(|v| format_value(Some(v)))
            .filter(|s| s != "-" && !s.is_empty())
            .unwrap_or_else(|| "No description".to_string());

        let mut output = String::new();
        output.push_str(&format!("Role: {}\n", name));
        output.push_str(&format!("Description: {}\n", description));
        output.push_str(&format!("Permissions ({}):\n", permissions.len()));
        if permissions.is_empty() {
            output.push_str("  No permissions assigned.\n");
        } else {
            for permission in permissions {
                output.push_str(&format!("  - {}\n", permission));
            }
        }
        output
    }

    /// Leading cell identifying the row: initials, primary field, id
    fn profile_cell(&self, resource: &ResourceSpec, row: &Record) -> String {
        let primary = match resource.primary_field() {
            Some(field) => format_value(row.get(field.key)),
            None => format!("Record {}", format_value(row.get("id"))),
        };
        let id = format_value(row.get("id"));
        format!("{} {} (ID #{})", get_initials(&primary), primary, id)
    }

    fn colorize_status(&self, padded: &str, raw: &str) -> String {
        match raw.trim().to_lowercase().as_str() {
            "active" => padded.green().to_string(),
            "pending" => padded.yellow().to_string(),
            "suspended" => padded.red().to_string(),
            _ => padded.to_string(),
        }
    }

    /// Escape a CSV cell (commas, quotes, newlines)
    fn escape_csv_value(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Display form of a cell value; null and missing render `-`,
/// booleans render `Yes`/`No`
pub fn format_value(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => "-".to_string(),
        Some(JsonValue::Bool(b)) => if *b { "Yes" } else { "No" }.to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Uppercased first letters of the first two words; `NA` when empty
pub fn get_initials(value: &str) -> String {
    if value.is_empty() {
        return "NA".to_string();
    }
    value
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
