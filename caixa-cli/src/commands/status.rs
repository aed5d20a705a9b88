//! Status command - overall ledger summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let _ = ctx.events.log_command("status");

    let totals = ctx.report_service.totals()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    println!("{}", "Ledger Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Users", &totals.users.to_string()]);
    table.add_row(vec!["Accounts", &totals.accounts.to_string()]);
    table.add_row(vec!["Transactions", &totals.transactions.to_string()]);
    table.add_row(vec![
        "Total balance",
        &output::format_money(totals.total_balance),
    ]);
    table.add_row(vec![
        "Average balance",
        &output::format_money(totals.average_balance),
    ]);

    println!("{}", table);
    Ok(())
}
