//! Transfer command - move funds between two accounts

use anyhow::Result;
use caixa_core::AccountNumber;

use super::get_context;
use crate::output;

pub fn run(from: &str, to: &str, amount: &str, json: bool) -> Result<()> {
    let source = AccountNumber::parse(from)?;
    let dest = AccountNumber::parse(to)?;
    let amount = output::parse_amount(amount)?;

    let ctx = get_context()?;
    let _ = ctx.events.log_command("transfer");

    let receipt = ctx.operations_service.transfer(&source, &dest, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Transferred {} from {} to {}",
        output::format_money(amount),
        source,
        dest
    ));
    println!("  Source balance: {}", output::format_money(receipt.balance));
    output::persistence_warning(receipt.persisted);
    Ok(())
}
