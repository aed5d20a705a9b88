//! Register command - create a new user

use anyhow::Result;
use dialoguer::Password;

use super::get_context;
use crate::output;

pub fn run(cpf: &str, name: &str, password: Option<String>, json: bool) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let ctx = get_context()?;
    let _ = ctx.events.log_command("register");

    let registration = ctx.registry_service.register_user(cpf, name, &password)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registration)?);
        return Ok(());
    }

    output::success(&format!(
        "User registered: {} ({})",
        registration.name,
        registration.cpf.formatted()
    ));
    output::persistence_warning(registration.persisted);
    Ok(())
}
