//! Account operations - deposit, withdraw, transfer, limit and statement
//!
//! All business rules live here: the daily quota with its day-rollover
//! reset, the per-transaction withdrawal limit, and the sufficient-funds
//! checks. Rejected operations never leave partial mutations behind; every
//! successful mutation appends to the log and flushes through the
//! repository under the same ledger lock.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountNumber, Cpf, Transaction};
use crate::ledger::Ledger;
use crate::ports::{Clock, Repository};
use crate::services::{persist, EventLog};

pub struct OperationsService {
    ledger: Arc<Mutex<Ledger>>,
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
    events: Arc<EventLog>,
}

impl OperationsService {
    pub fn new(
        ledger: Arc<Mutex<Ledger>>,
        repository: Arc<dyn Repository>,
        clock: Arc<dyn Clock>,
        events: Arc<EventLog>,
    ) -> Self {
        Self {
            ledger,
            repository,
            clock,
            events,
        }
    }

    fn ledger(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| Error::Persistence("ledger lock poisoned".to_string()))
    }

    /// Credit `amount` to the account and append a `Deposit` record.
    pub fn deposit(&self, account: &AccountNumber, amount: Decimal) -> Result<Receipt> {
        let mut ledger = self.ledger()?;
        let balance = {
            let acct = ledger
                .account_mut(account)
                .ok_or_else(|| Error::UnknownAccount(account.clone()))?;
            if amount <= Decimal::ZERO {
                return Err(Error::InvalidAmount(amount));
            }
            acct.balance += amount;
            acct.balance
        };
        ledger.append_transaction(Transaction::Deposit {
            account: account.clone(),
            amount,
            timestamp: self.clock.now(),
        });
        let persisted = persist(&*self.repository, &ledger, &self.events, "deposit");

        Ok(Receipt {
            account: account.clone(),
            balance,
            persisted,
        })
    }

    /// Debit `amount` from the account, counting it against the daily quota.
    ///
    /// The day-rollover reset runs before any check and sticks even when the
    /// attempt is rejected. Checks run in a fixed order: quota, amount,
    /// funds, limit; the first failure wins and nothing else is mutated.
    pub fn withdraw(&self, account: &AccountNumber, amount: Decimal) -> Result<Receipt> {
        let today = self.clock.today();
        let mut ledger = self.ledger()?;
        let balance = {
            let acct = ledger
                .account_mut(account)
                .ok_or_else(|| Error::UnknownAccount(account.clone()))?;

            acct.roll_day(today);

            if acct.quota_reached() {
                return Err(Error::QuotaExceeded);
            }
            if amount <= Decimal::ZERO {
                return Err(Error::InvalidAmount(amount));
            }
            if amount > acct.balance {
                return Err(Error::InsufficientFunds {
                    requested: amount,
                    available: acct.balance,
                });
            }
            if amount > acct.withdrawal_limit {
                return Err(Error::LimitExceeded {
                    requested: amount,
                    limit: acct.withdrawal_limit,
                });
            }

            acct.balance -= amount;
            acct.withdrawals_today += 1;
            acct.balance
        };
        ledger.append_transaction(Transaction::Withdrawal {
            account: account.clone(),
            amount,
            timestamp: self.clock.now(),
        });
        let persisted = persist(&*self.repository, &ledger, &self.events, "withdraw");

        Ok(Receipt {
            account: account.clone(),
            balance,
            persisted,
        })
    }

    /// Move `amount` between two accounts atomically: both balance changes
    /// and the single `Transfer` record happen under one ledger lock, or
    /// none of them do.
    pub fn transfer(
        &self,
        source: &AccountNumber,
        dest: &AccountNumber,
        amount: Decimal,
    ) -> Result<Receipt> {
        let mut ledger = self.ledger()?;

        let available = ledger
            .account(source)
            .ok_or_else(|| Error::UnknownAccount(source.clone()))?
            .balance;
        if ledger.account(dest).is_none() {
            return Err(Error::UnknownDestination(dest.clone()));
        }
        if source == dest {
            return Err(Error::SameAccount);
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }
        if amount > available {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        // All checks passed; the two lookups below cannot fail.
        let balance = {
            let src = ledger
                .account_mut(source)
                .ok_or_else(|| Error::UnknownAccount(source.clone()))?;
            src.balance -= amount;
            src.balance
        };
        {
            let dst = ledger
                .account_mut(dest)
                .ok_or_else(|| Error::UnknownDestination(dest.clone()))?;
            dst.balance += amount;
        }
        ledger.append_transaction(Transaction::Transfer {
            source: source.clone(),
            dest: dest.clone(),
            amount,
            timestamp: self.clock.now(),
        });
        let persisted = persist(&*self.repository, &ledger, &self.events, "transfer");

        Ok(Receipt {
            account: source.clone(),
            balance,
            persisted,
        })
    }

    /// Overwrite the per-transaction withdrawal limit.
    pub fn set_withdrawal_limit(
        &self,
        account: &AccountNumber,
        new_limit: Decimal,
    ) -> Result<LimitReceipt> {
        let mut ledger = self.ledger()?;
        {
            let acct = ledger
                .account_mut(account)
                .ok_or_else(|| Error::UnknownAccount(account.clone()))?;
            if new_limit <= Decimal::ZERO {
                return Err(Error::InvalidAmount(new_limit));
            }
            acct.withdrawal_limit = new_limit;
        }
        let persisted = persist(&*self.repository, &ledger, &self.events, "limit");

        Ok(LimitReceipt {
            account: account.clone(),
            withdrawal_limit: new_limit,
            persisted,
        })
    }

    /// Read-only projection: every transaction touching the account, in
    /// chronological order, plus the current account header data.
    pub fn statement(&self, account: &AccountNumber) -> Result<Statement> {
        let ledger = self.ledger()?;
        let acct = ledger
            .account(account)
            .ok_or_else(|| Error::UnknownAccount(account.clone()))?;
        let owner_name = ledger
            .user(&acct.owner)
            .map(|u| u.name.clone())
            .unwrap_or_default();

        Ok(Statement {
            account: account.clone(),
            owner: acct.owner.clone(),
            owner_name,
            balance: acct.balance,
            withdrawal_limit: acct.withdrawal_limit,
            withdrawals_today: acct.withdrawals_today,
            entries: ledger.transactions_for(account),
        })
    }
}

/// Outcome of a successful mutation.
///
/// `persisted` is false when the post-mutation save failed even after a
/// retry; the in-memory state is still committed.
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub account: AccountNumber,
    pub balance: Decimal,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct LimitReceipt {
    pub account: AccountNumber,
    pub withdrawal_limit: Decimal,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct Statement {
    pub account: AccountNumber,
    pub owner: Cpf,
    pub owner_name: String,
    pub balance: Decimal,
    pub withdrawal_limit: Decimal,
    pub withdrawals_today: u32,
    pub entries: Vec<Transaction>,
}
