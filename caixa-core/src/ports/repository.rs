//! Repository port - durable storage abstraction

use crate::domain::result::Result;
use crate::ledger::Ledger;

/// Durable storage for the ledger.
///
/// Implementations (adapters) own the on-disk layout. The engine only asks
/// for two things: load everything at startup and flush everything after a
/// mutation.
pub trait Repository: Send + Sync {
    /// Load the persisted state. Missing storage means an empty ledger.
    fn load(&self) -> Result<LoadedLedger>;

    /// Persist the full ledger state.
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// Result of a load, with the count of records that had to be skipped.
pub struct LoadedLedger {
    pub ledger: Ledger,
    /// Malformed lines encountered and skipped, across all files.
    pub skipped_lines: usize,
}
