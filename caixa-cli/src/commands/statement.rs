//! Statement command - show balance and transaction history of an account

use anyhow::Result;
use caixa_core::{AccountNumber, Transaction};
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(account: &str, json: bool) -> Result<()> {
    let number = AccountNumber::parse(account)?;

    let ctx = get_context()?;
    let _ = ctx.events.log_command("statement");

    let statement = ctx.operations_service.statement(&number)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statement)?);
        return Ok(());
    }

    println!("{}", format!("Statement - account {}", statement.account).bold());
    println!(
        "  Holder: {} ({})",
        statement.owner_name,
        statement.owner.formatted()
    );
    println!("  Balance: {}", output::format_money(statement.balance));
    println!(
        "  Withdrawal limit: {} ({} withdrawal(s) used today)",
        output::format_money(statement.withdrawal_limit),
        statement.withdrawals_today
    );
    println!();

    if statement.entries.is_empty() {
        println!("No transactions recorded.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Type", "Amount", "Details"]);

    for tx in &statement.entries {
        let date = tx.timestamp().format("%d/%m/%Y %H:%M:%S").to_string();
        let (kind, amount, details) = describe(tx, &statement.account);
        table.add_row(vec![date, kind.to_string(), amount, details]);
    }

    println!("{}", table);
    Ok(())
}

/// Render one entry from the account's point of view: outgoing amounts
/// carry a minus sign.
fn describe(tx: &Transaction, viewpoint: &AccountNumber) -> (&'static str, String, String) {
    match tx {
        Transaction::Deposit { amount, .. } => {
            ("deposit", output::format_money(*amount), String::new())
        }
        Transaction::Withdrawal { amount, .. } => (
            "withdrawal",
            format!("-{}", output::format_money(*amount)),
            String::new(),
        ),
        Transaction::Transfer {
            source,
            dest,
            amount,
            ..
        } => {
            if source == viewpoint {
                (
                    "transfer",
                    format!("-{}", output::format_money(*amount)),
                    format!("to {}", dest),
                )
            } else {
                (
                    "transfer",
                    output::format_money(*amount),
                    format!("from {}", source),
                )
            }
        }
    }
}
