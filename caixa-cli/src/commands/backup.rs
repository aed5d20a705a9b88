//! Backup command - manage data file backups

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;

use caixa_core::services::BackupService;

use super::{get_context, get_data_dir};
use crate::output;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Maximum number of backups to keep
        #[arg(long, short = 'm')]
        max_backups: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available backups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore from a backup
    Restore {
        /// Backup name to restore
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all backups
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Backup service without the full context. List, restore and clear only
/// touch files, and restore must not hold the ledger open while it
/// overwrites the data files.
fn get_backup_service() -> BackupService {
    BackupService::new(get_data_dir())
}

pub fn run(command: BackupCommands) -> Result<()> {
    match command {
        BackupCommands::Create { max_backups, json } => {
            let ctx = get_context()?;
            let _ = ctx.events.log_command("backup");
            let max_backups = max_backups.or(ctx.config.max_backups);
            let result = ctx.backup_service.create(max_backups)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::success("Backup created");
                println!("  Name: {}", result.name);
                println!("  Size: {}", output::format_size(result.size_bytes));
            }
        }
        BackupCommands::List { json } => {
            let backups = get_backup_service().list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Name", "Created", "Size"]);
            for backup in backups {
                table.add_row(vec![
                    backup.name,
                    backup.created_at.format("%d/%m/%Y %H:%M:%S").to_string(),
                    output::format_size(backup.size_bytes),
                ]);
            }
            println!("{}", table);
        }
        BackupCommands::Restore { name, force, json } => {
            if !force && !json {
                if !Confirm::new()
                    .with_prompt(format!("Restore from backup '{}'?", name))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            get_backup_service().restore(&name)?;
            if json {
                println!("{}", serde_json::json!({"restored": name}));
            } else {
                output::success(&format!("Data restored from backup: {}", name));
            }
        }
        BackupCommands::Clear { force, json } => {
            if !force && !json {
                if !Confirm::new()
                    .with_prompt("Delete all backups?")
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let result = get_backup_service().clear()?;
            if json {
                println!("{}", serde_json::json!({"deleted": result.deleted}));
            } else {
                println!("Deleted {} backup(s)", result.deleted);
            }
        }
    }

    Ok(())
}
