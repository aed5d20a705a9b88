//! Limit command - change the per-withdrawal limit of an account

use anyhow::Result;
use caixa_core::AccountNumber;

use super::get_context;
use crate::output;

pub fn run(account: &str, amount: &str, json: bool) -> Result<()> {
    let number = AccountNumber::parse(account)?;
    let limit = output::parse_amount(amount)?;

    let ctx = get_context()?;
    let _ = ctx.events.log_command("limit");

    let receipt = ctx.operations_service.set_withdrawal_limit(&number, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Withdrawal limit for account {} set to {}",
        receipt.account,
        output::format_money(receipt.withdrawal_limit)
    ));
    output::persistence_warning(receipt.persisted);
    Ok(())
}
