//! Account domain model

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;
use crate::domain::Cpf;

/// Agency code printed alongside account numbers.
pub const AGENCY: &str = "0001";

/// Maximum number of withdrawals permitted per account per calendar day.
pub const DAILY_WITHDRAWAL_QUOTA: u32 = 3;

/// Per-transaction withdrawal cap assigned to new accounts.
pub fn default_withdrawal_limit() -> Decimal {
    Decimal::new(500, 0)
}

/// An account number, zero-padded to at least 4 digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Build a number from the ledger's allocation counter.
    pub(crate) fn from_index(index: u32) -> Self {
        Self(format!("{:04}", index))
    }

    /// Parse a number from user input. Accepts bare digits (`1` means `0001`).
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier(trimmed.to_string()));
        }
        let digits = trimmed.trim_start_matches('0');
        let index: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidIdentifier(trimmed.to_string()))?;
        Ok(Self::from_index(index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bank account owned by one user.
///
/// Invariant: `balance >= 0` after every committed operation. The daily
/// withdrawal counter pairs with `last_withdrawal` to detect day rollover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub number: AccountNumber,
    pub owner: Cpf,
    pub balance: Decimal,
    pub withdrawal_limit: Decimal,
    pub withdrawals_today: u32,
    pub last_withdrawal: Option<NaiveDate>,
}

impl Account {
    pub fn new(number: AccountNumber, owner: Cpf) -> Self {
        Self {
            number,
            owner,
            balance: Decimal::ZERO,
            withdrawal_limit: default_withdrawal_limit(),
            withdrawals_today: 0,
            last_withdrawal: None,
        }
    }

    /// Reset the daily withdrawal counter when the calendar day has changed.
    ///
    /// Runs before any withdrawal check; the reset sticks even if the attempt
    /// that triggered it is rejected afterwards.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if self.last_withdrawal != Some(today) {
            self.withdrawals_today = 0;
            self.last_withdrawal = Some(today);
        }
    }

    pub fn quota_reached(&self) -> bool {
        self.withdrawals_today >= DAILY_WITHDRAWAL_QUOTA
    }
}
