//! Caixa CLI - personal banking ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use commands::{
    backup, demo, deposit, limit, login, logs, open, register, report, statement, status,
    transfer, withdraw,
};

/// Caixa - personal banking ledger in your terminal
#[derive(Parser)]
#[command(name = "cx", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        /// CPF of the user (11 digits, separators allowed)
        cpf: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Password (prompted if not given)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open an account for a registered user
    Open {
        /// CPF of the account owner
        cpf: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check credentials and show the user's account
    Login {
        /// CPF of the user
        cpf: String,
        /// Password (prompted if not given)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deposit into an account
    Deposit {
        /// Account number
        account: String,
        /// Amount to deposit
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw from an account
    Withdraw {
        /// Account number
        account: String,
        /// Amount to withdraw
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer between accounts
    Transfer {
        /// Source account number
        #[arg(long)]
        from: String,
        /// Destination account number
        #[arg(long)]
        to: String,
        /// Amount to transfer
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an account statement
    Statement {
        /// Account number
        account: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the per-withdrawal limit of an account
    Limit {
        /// Account number
        account: String,
        /// New limit
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show overall ledger status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reports over the ledger
    Report {
        #[command(subcommand)]
        command: report::ReportCommands,
    },

    /// Load the example data set
    Demo {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: backup::BackupCommands,
    },

    /// Show recent application events
    Logs {
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { cpf, name, password, json } => {
            register::run(&cpf, &name, password, json)
        }
        Commands::Open { cpf, json } => open::run(&cpf, json),
        Commands::Login { cpf, password, json } => login::run(&cpf, password, json),
        Commands::Deposit { account, amount, json } => deposit::run(&account, &amount, json),
        Commands::Withdraw { account, amount, json } => withdraw::run(&account, &amount, json),
        Commands::Transfer { from, to, amount, json } => transfer::run(&from, &to, &amount, json),
        Commands::Statement { account, json } => statement::run(&account, json),
        Commands::Limit { account, amount, json } => limit::run(&account, &amount, json),
        Commands::Status { json } => status::run(json),
        Commands::Report { command } => report::run(command),
        Commands::Demo { force, json } => demo::run(force, json),
        Commands::Backup { command } => backup::run(command),
        Commands::Logs { errors, limit, json } => logs::run(errors, limit, json),
    }
}
