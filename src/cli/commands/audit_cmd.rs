//! `encrypted-storage audit` — display the audit log.
//!
//! Usage:
//!   encrypted-storage audit               # show last 50 entries
//!   encrypted-storage audit --last 20     # show last 20
//!   encrypted-storage audit --since 7d    # entries from last 7 days

use chrono::{TimeDelta, Utc};

use crate::audit::{AuditEntry, Auditor, OUTCOME_ERROR};
use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::{Result, StorageError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let settings = load_settings(cli)?;
    let cwd = std::env::current_dir()?;
    let auditor = Auditor::open(&settings, &cwd);

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = auditor.recent(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(StorageError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        StorageError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    if num < 0 {
        return Err(StorageError::CommandFailed(format!(
            "invalid duration '{input}' — must not be negative"
        )));
    }

    let duration = match unit {
        'd' => TimeDelta::try_days(num),
        'h' => TimeDelta::try_hours(num),
        _ => TimeDelta::try_minutes(num),
    };

    duration
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .ok_or_else(|| {
            StorageError::CommandFailed(format!("invalid duration '{input}' — too far back"))
        })
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Resource", "Key", "Outcome", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let key = entry
            .key_name
            .as_deref()
            .map_or_else(|| "-".to_string(), output::display_key);
        let outcome = if entry.outcome == OUTCOME_ERROR {
            style(&entry.outcome).red().to_string()
        } else {
            style(&entry.outcome).green().to_string()
        };

        table.add_row(vec![
            time,
            colorize_operation(&entry.operation),
            entry.resource.clone(),
            key,
            outcome,
            entry.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "setItem" => style(op).blue().to_string(),
        "removeItem" => style(op).red().to_string(),
        "clear" => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
