//! Port definitions for external dependencies

mod clock;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repository::{LoadedLedger, Repository};
