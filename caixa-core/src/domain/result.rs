//! Result and error types for the core library

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{AccountNumber, Cpf, DAILY_WITHDRAWAL_QUOTA, MIN_CREDENTIAL_LEN};

/// Core library error type
///
/// Every rejected operation maps to its own variant so callers can tell
/// which rule failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid identifier '{0}': expected 11 digits")]
    InvalidIdentifier(String),

    #[error("credential must have at least {MIN_CREDENTIAL_LEN} characters")]
    InvalidCredential,

    #[error("CPF {} is already registered", .0.formatted())]
    DuplicateUser(Cpf),

    #[error("no user registered with CPF {}", .0.formatted())]
    UnknownUser(Cpf),

    #[error("account {0} not found")]
    UnknownAccount(AccountNumber),

    #[error("destination account {0} not found")]
    UnknownDestination(AccountNumber),

    #[error("cannot transfer to the same account")]
    SameAccount,

    #[error("invalid amount {0}: must be positive")]
    InvalidAmount(Decimal),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("amount {requested} exceeds the withdrawal limit of {limit}")]
    LimitExceeded { requested: Decimal, limit: Decimal },

    #[error("daily quota of {DAILY_WITHDRAWAL_QUOTA} withdrawals reached")]
    QuotaExceeded,

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used for reporting and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    BusinessRule,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier(_)
            | Self::InvalidCredential
            | Self::DuplicateUser(_)
            | Self::InvalidAmount(_) => ErrorKind::Validation,
            Self::UnknownUser(_) | Self::UnknownAccount(_) | Self::UnknownDestination(_) => {
                ErrorKind::NotFound
            }
            Self::SameAccount
            | Self::InsufficientFunds { .. }
            | Self::LimitExceeded { .. }
            | Self::QuotaExceeded => ErrorKind::BusinessRule,
            Self::Persistence(_) | Self::Io(_) => ErrorKind::Persistence,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::InvalidAmount(Decimal::ZERO).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::UnknownAccount(AccountNumber::parse("0001").unwrap()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(Error::QuotaExceeded.kind(), ErrorKind::BusinessRule);
        assert_eq!(
            Error::Persistence("disk full".into()).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn test_messages_identify_the_rule() {
        let err = Error::InsufficientFunds {
            requested: Decimal::new(10000, 2),
            available: Decimal::new(5000, 2),
        };
        assert!(err.to_string().contains("insufficient funds"));

        let err = Error::LimitExceeded {
            requested: Decimal::new(60000, 2),
            limit: Decimal::new(50000, 2),
        };
        assert!(err.to_string().contains("withdrawal limit"));
    }
}
