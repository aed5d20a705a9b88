//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod cpf;
mod transaction;
mod user;
pub mod result;

pub use account::{default_withdrawal_limit, Account, AccountNumber, AGENCY, DAILY_WITHDRAWAL_QUOTA};
pub use cpf::Cpf;
pub use result::{Error, ErrorKind};
pub use transaction::Transaction;
pub use user::{User, MIN_CREDENTIAL_LEN};
