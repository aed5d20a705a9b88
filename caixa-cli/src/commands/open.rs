//! Open command - open an account for a registered user

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(cpf: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let _ = ctx.events.log_command("open");

    let opened = ctx.registry_service.open_account(cpf)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&opened)?);
        return Ok(());
    }

    output::success("Account opened");
    println!("  Agency:  {}", opened.agency);
    println!("  Account: {}", opened.number);
    output::persistence_warning(opened.persisted);
    Ok(())
}
