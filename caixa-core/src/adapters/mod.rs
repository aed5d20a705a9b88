//! Adapter implementations for the ports

mod textfile;

pub use textfile::{TextFileRepository, ACCOUNTS_FILE, DATA_FILES, TRANSACTIONS_FILE, USERS_FILE};
