//! caixa-core - personal banking ledger engine
//!
//! Core library for the `cx` command line tool. Holds the in-memory
//! ledger of users, accounts and transactions, persists it to flat
//! text files, and exposes the services the CLI commands are built on.
//!
//! Architecture follows a hexagonal layout:
//! - `domain` - value types, entities and the error taxonomy
//! - `ledger` - the in-memory store and its invariants
//! - `ports` - traits for persistence and time
//! - `adapters` - the text file repository
//! - `services` - application operations (registry, operations,
//!   reports, demo data, backups, event logging)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};

pub use config::Config;
pub use domain::{Account, AccountNumber, Cpf, Error, ErrorKind, Transaction, User, AGENCY};
pub use ledger::Ledger;
pub use ports::{Clock, ManualClock, SystemClock};
pub use services::{EntryPoint, EventLog, LogEvent};

use adapters::TextFileRepository;
use ports::Repository;
use services::{
    BackupService, DemoService, OperationsService, RegistryService, ReportService,
};

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application context wiring the ledger, repository and services
/// together over a single data directory.
pub struct CaixaContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub ledger: Arc<Mutex<Ledger>>,
    pub events: Arc<EventLog>,
    pub registry_service: RegistryService,
    pub operations_service: OperationsService,
    pub report_service: ReportService,
    pub demo_service: DemoService,
    pub backup_service: BackupService,
}

impl CaixaContext {
    /// Open the data directory with the wall clock.
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        Self::with_clock(data_dir, entry_point, Arc::new(SystemClock))
    }

    /// Open the data directory with an injected clock. Used by tests
    /// that need day rollover to be deterministic.
    pub fn with_clock(
        data_dir: &Path,
        entry_point: EntryPoint,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let config = Config::load(data_dir);

        let repository: Arc<dyn Repository> = Arc::new(
            TextFileRepository::open(data_dir)
                .with_context(|| format!("failed to open data directory {}", data_dir.display()))?,
        );

        let events = Arc::new(
            EventLog::new(data_dir, entry_point, APP_VERSION)
                .context("failed to open event log")?,
        );

        let loaded = repository.load().context("failed to load ledger")?;
        if loaded.skipped_lines > 0 {
            let _ = events.log(
                LogEvent::new("load_skipped_lines")
                    .with_error(format!("{} malformed line(s) ignored", loaded.skipped_lines)),
            );
        }
        let ledger = Arc::new(Mutex::new(loaded.ledger));

        let registry_service = RegistryService::new(
            Arc::clone(&ledger),
            Arc::clone(&repository),
            Arc::clone(&clock),
            Arc::clone(&events),
            config.agency.clone(),
        );
        let operations_service = OperationsService::new(
            Arc::clone(&ledger),
            Arc::clone(&repository),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let report_service = ReportService::new(Arc::clone(&ledger));
        let demo_service = DemoService::new(
            Arc::clone(&ledger),
            Arc::clone(&repository),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let backup_service = BackupService::new(data_dir.to_path_buf());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config,
            ledger,
            events,
            registry_service,
            operations_service,
            report_service,
            demo_service,
            backup_service,
        })
    }
}
