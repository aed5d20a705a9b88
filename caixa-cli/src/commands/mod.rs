//! CLI command implementations

pub mod backup;
pub mod demo;
pub mod deposit;
pub mod limit;
pub mod login;
pub mod logs;
pub mod open;
pub mod register;
pub mod report;
pub mod statement;
pub mod status;
pub mod transfer;
pub mod withdraw;

use std::path::PathBuf;

use anyhow::{Context, Result};
use caixa_core::{CaixaContext, EntryPoint};

/// Get the data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CAIXA_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".caixa")
    }
}

/// Get or create the application context
pub fn get_context() -> Result<CaixaContext> {
    let data_dir = get_data_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    CaixaContext::new(&data_dir, EntryPoint::Cli).context("Failed to initialize context")
}
