//! Service layer - business logic orchestration
//!
//! Services coordinate the ledger, the clock and the repository. Every
//! mutating service flushes the full ledger after a successful mutation;
//! a failed save is retried once and then surfaced as a warning while the
//! in-memory state stays authoritative.

mod backup;
mod demo;
mod operations;
mod registry;
mod report;
pub mod logging;

pub use backup::{BackupMetadata, BackupService, ClearResult};
pub use demo::{DemoService, SeedSummary, SeedUser};
pub use logging::{EntryPoint, EventLog, LogEntry, LogEvent};
pub use operations::{LimitReceipt, OperationsService, Receipt, Statement};
pub use registry::{OpenedAccount, Registration, RegistryService, Session};
pub use report::{PeriodReport, ReportService, TotalsReport, TypeTotals, UserSummary};

use crate::ledger::Ledger;
use crate::ports::Repository;

/// Save-after-mutation policy: one retry, then log and report `false`.
pub(crate) fn persist(
    repository: &dyn Repository,
    ledger: &Ledger,
    events: &EventLog,
    operation: &str,
) -> bool {
    match repository
        .save(ledger)
        .or_else(|_| repository.save(ledger))
    {
        Ok(()) => true,
        Err(e) => {
            let _ = events.log(
                LogEvent::new("save_failed")
                    .with_command(operation)
                    .with_error(e.to_string()),
            );
            false
        }
    }
}
