//! Demo command - load the example data set

use anyhow::Result;
use dialoguer::Confirm;

use super::get_context;
use crate::output;

pub fn run(force: bool, json: bool) -> Result<()> {
    if !force && !json {
        if !Confirm::new()
            .with_prompt("This replaces all current data with the example set. Continue?")
            .default(false)
            .interact()?
        {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ctx = get_context()?;
    let _ = ctx.events.log_command("demo");

    let summary = ctx.demo_service.seed()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::success("Example data loaded");
    let mut table = output::create_table();
    table.set_header(vec!["Name", "CPF", "Password", "Account"]);
    for user in &summary.users {
        table.add_row(vec![
            user.name.clone(),
            user.cpf.formatted(),
            user.credential.clone(),
            user.account.to_string(),
        ]);
    }
    println!("{}", table);
    output::persistence_warning(summary.persisted);
    Ok(())
}
