//! Login command - check credentials and show the user's account

use anyhow::Result;
use dialoguer::Password;

use super::get_context;
use crate::output;

pub fn run(cpf: &str, password: Option<String>, json: bool) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let ctx = get_context()?;
    let _ = ctx.events.log_command("login");

    match ctx.registry_service.login(cpf, &password)? {
        Some(session) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
                return Ok(());
            }
            output::success(&format!("Welcome, {}!", session.name));
            match &session.account {
                Some(number) => println!("  Account: {}", number),
                None => output::info("  No account yet. Open one with `cx open`."),
            }
            Ok(())
        }
        None => {
            // Deliberately vague: do not reveal which part was wrong
            anyhow::bail!("CPF or password incorrect")
        }
    }
}
