//! Deposit command - credit an account

use anyhow::Result;
use caixa_core::AccountNumber;

use super::get_context;
use crate::output;

pub fn run(account: &str, amount: &str, json: bool) -> Result<()> {
    let number = AccountNumber::parse(account)?;
    let amount = output::parse_amount(amount)?;

    let ctx = get_context()?;
    let _ = ctx.events.log_command("deposit");

    let receipt = ctx.operations_service.deposit(&number, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Deposited {} into account {}",
        output::format_money(amount),
        receipt.account
    ));
    println!("  Balance: {}", output::format_money(receipt.balance));
    output::persistence_warning(receipt.persisted);
    Ok(())
}
