//! Report command - totals, per-user summary and period breakdown

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Overall counts and balance totals
    Totals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// One row per registered user
    ByUser {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-type transaction totals for a date range
    Period {
        /// Start date (dd/mm/yyyy), inclusive
        from: String,
        /// End date (dd/mm/yyyy), inclusive
        to: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ReportCommands) -> Result<()> {
    let ctx = get_context()?;
    let _ = ctx.events.log_command("report");

    match command {
        ReportCommands::Totals { json } => {
            let totals = ctx.report_service.totals()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
                return Ok(());
            }
            println!("{}", "Totals".bold());
            println!("  Users:           {}", totals.users);
            println!("  Accounts:        {}", totals.accounts);
            println!("  Transactions:    {}", totals.transactions);
            println!(
                "  Total balance:   {}",
                output::format_money(totals.total_balance)
            );
            println!(
                "  Average balance: {}",
                output::format_money(totals.average_balance)
            );
        }
        ReportCommands::ByUser { json } => {
            let rows = ctx.report_service.by_user()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("No users registered.");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["CPF", "Name", "Account", "Balance"]);
            for row in rows {
                table.add_row(vec![
                    row.cpf.formatted(),
                    row.name,
                    row.account
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    row.balance
                        .map(output::format_money)
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{}", table);
        }
        ReportCommands::Period { from, to, json } => {
            let from = output::parse_date(&from)?;
            let to = output::parse_date(&to)?;
            let report = ctx.report_service.period(from, to)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!(
                "{}",
                format!(
                    "Transactions from {} to {}",
                    report.from.format("%d/%m/%Y"),
                    report.to.format("%d/%m/%Y")
                )
                .bold()
            );
            let mut table = output::create_table();
            table.set_header(vec!["Type", "Count", "Total"]);
            for (label, totals) in [
                ("Deposits", &report.deposits),
                ("Withdrawals", &report.withdrawals),
                ("Transfers", &report.transfers),
            ] {
                table.add_row(vec![
                    label.to_string(),
                    totals.count.to_string(),
                    output::format_money(totals.total),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
