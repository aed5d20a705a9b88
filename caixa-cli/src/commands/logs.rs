//! Logs command - view recent application events

use anyhow::Result;
use caixa_core::{EntryPoint, EventLog};
use colored::Colorize;

use super::get_data_dir;
use crate::output;

fn get_event_log() -> Result<EventLog> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    EventLog::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(errors: bool, limit: usize, json: bool) -> Result<()> {
    let log = get_event_log()?;
    let entries = if errors {
        log.get_errors(limit)?
    } else {
        log.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Entry", "Event", "Command", "Error"]);

    for entry in entries {
        let error_indicator = if entry.error_message.is_some() {
            "!".red().to_string()
        } else {
            String::new()
        };

        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.entry_point,
            entry.event,
            entry.command.unwrap_or_default(),
            error_indicator,
        ]);
    }

    println!("{}", table);

    if !errors {
        let errors_list = log.get_errors(3)?;
        if !errors_list.is_empty() {
            println!();
            println!("{}", "Recent Errors:".red().bold());
            for err in &errors_list {
                println!(
                    "  {} [{}]: {}",
                    format_timestamp(err.timestamp).dimmed(),
                    err.event,
                    err.error_message.as_deref().unwrap_or("Unknown error")
                );
            }
        }
    }

    Ok(())
}
