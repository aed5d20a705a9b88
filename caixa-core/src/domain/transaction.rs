//! Transaction domain model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::AccountNumber;

/// Immutable record in the append-only transaction log.
///
/// Invariants are enforced by the operations service before the record is
/// appended: `amount > 0` for all variants, `source != dest` for transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    Deposit {
        account: AccountNumber,
        amount: Decimal,
        timestamp: NaiveDateTime,
    },
    Withdrawal {
        account: AccountNumber,
        amount: Decimal,
        timestamp: NaiveDateTime,
    },
    Transfer {
        source: AccountNumber,
        dest: AccountNumber,
        amount: Decimal,
        timestamp: NaiveDateTime,
    },
}

impl Transaction {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount, .. }
            | Self::Withdrawal { amount, .. }
            | Self::Transfer { amount, .. } => *amount,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Deposit { timestamp, .. }
            | Self::Withdrawal { timestamp, .. }
            | Self::Transfer { timestamp, .. } => *timestamp,
        }
    }

    /// Type tag as written to the transaction file.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposito",
            Self::Withdrawal { .. } => "saque",
            Self::Transfer { .. } => "transferencia",
        }
    }

    /// Whether the given account participates in this transaction, either as
    /// the sole account or as transfer source/destination.
    pub fn involves(&self, number: &AccountNumber) -> bool {
        match self {
            Self::Deposit { account, .. } | Self::Withdrawal { account, .. } => account == number,
            Self::Transfer { source, dest, .. } => source == number || dest == number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_involves_single_account_variants() {
        let a = AccountNumber::parse("0001").unwrap();
        let b = AccountNumber::parse("0002").unwrap();
        let deposit = Transaction::Deposit {
            account: a.clone(),
            amount: Decimal::new(100, 0),
            timestamp: ts(),
        };
        assert!(deposit.involves(&a));
        assert!(!deposit.involves(&b));
    }

    #[test]
    fn test_involves_transfer_both_sides() {
        let a = AccountNumber::parse("0001").unwrap();
        let b = AccountNumber::parse("0002").unwrap();
        let c = AccountNumber::parse("0003").unwrap();
        let transfer = Transaction::Transfer {
            source: a.clone(),
            dest: b.clone(),
            amount: Decimal::new(50, 0),
            timestamp: ts(),
        };
        assert!(transfer.involves(&a));
        assert!(transfer.involves(&b));
        assert!(!transfer.involves(&c));
    }

    #[test]
    fn test_tags() {
        let a = AccountNumber::parse("0001").unwrap();
        let deposit = Transaction::Deposit {
            account: a.clone(),
            amount: Decimal::ONE,
            timestamp: ts(),
        };
        let withdrawal = Transaction::Withdrawal {
            account: a.clone(),
            amount: Decimal::ONE,
            timestamp: ts(),
        };
        let transfer = Transaction::Transfer {
            source: a.clone(),
            dest: AccountNumber::parse("0002").unwrap(),
            amount: Decimal::ONE,
            timestamp: ts(),
        };
        assert_eq!(deposit.tag(), "deposito");
        assert_eq!(withdrawal.tag(), "saque");
        assert_eq!(transfer.tag(), "transferencia");
    }
}
