//! Report service - aggregate statistics over the ledger
//!
//! Read-only projections used by the status and report commands: overall
//! totals, a per-user summary, and per-type transaction totals for a date
//! range.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountNumber, Cpf, Transaction};
use crate::ledger::Ledger;

pub struct ReportService {
    ledger: Arc<Mutex<Ledger>>,
}

impl ReportService {
    pub fn new(ledger: Arc<Mutex<Ledger>>) -> Self {
        Self { ledger }
    }

    fn ledger(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| Error::Persistence("ledger lock poisoned".to_string()))
    }

    /// Overall counts and balance totals.
    pub fn totals(&self) -> Result<TotalsReport> {
        let ledger = self.ledger()?;
        let accounts = ledger.account_count();
        let total_balance = ledger.total_balance();
        let average_balance = if accounts > 0 {
            total_balance / Decimal::from(accounts as u64)
        } else {
            Decimal::ZERO
        };

        Ok(TotalsReport {
            users: ledger.user_count(),
            accounts,
            transactions: ledger.transaction_count(),
            total_balance,
            average_balance,
        })
    }

    /// One row per registered user with their first account, if any.
    pub fn by_user(&self) -> Result<Vec<UserSummary>> {
        let ledger = self.ledger()?;
        let summaries = ledger
            .users()
            .map(|user| {
                let account = ledger.find_account_by_user(&user.cpf);
                let balance = account
                    .as_ref()
                    .and_then(|n| ledger.account(n))
                    .map(|a| a.balance);
                UserSummary {
                    cpf: user.cpf.clone(),
                    name: user.name.clone(),
                    account,
                    balance,
                }
            })
            .collect();
        Ok(summaries)
    }

    /// Per-type counts and sums for transactions within `[from, to]`,
    /// both ends inclusive on the calendar day.
    pub fn period(&self, from: NaiveDate, to: NaiveDate) -> Result<PeriodReport> {
        let ledger = self.ledger()?;
        let mut report = PeriodReport {
            from,
            to,
            deposits: TypeTotals::default(),
            withdrawals: TypeTotals::default(),
            transfers: TypeTotals::default(),
        };

        for tx in ledger.transactions() {
            let day = tx.timestamp().date();
            if day < from || day > to {
                continue;
            }
            let bucket = match tx {
                Transaction::Deposit { .. } => &mut report.deposits,
                Transaction::Withdrawal { .. } => &mut report.withdrawals,
                Transaction::Transfer { .. } => &mut report.transfers,
            };
            bucket.count += 1;
            bucket.total += tx.amount();
        }

        Ok(report)
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsReport {
    pub users: usize,
    pub accounts: usize,
    pub transactions: usize,
    pub total_balance: Decimal,
    pub average_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub cpf: Cpf,
    pub name: String,
    pub account: Option<AccountNumber>,
    pub balance: Option<Decimal>,
}

#[derive(Debug, Default, Serialize)]
pub struct TypeTotals {
    pub count: usize,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub deposits: TypeTotals,
    pub withdrawals: TypeTotals,
    pub transfers: TypeTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn populated_ledger() -> Arc<Mutex<Ledger>> {
        let mut ledger = Ledger::new();
        let joao = ledger
            .register_user("12345678900", "João", "1234", at(1, 9))
            .unwrap();
        let maria = ledger
            .register_user("98765432100", "Maria", "4321", at(1, 9))
            .unwrap();
        let a = ledger.create_account(&joao).unwrap();
        ledger.create_account(&maria).unwrap();

        ledger.account_mut(&a).unwrap().balance = Decimal::new(150, 0);
        ledger.append_transaction(Transaction::Deposit {
            account: a.clone(),
            amount: Decimal::new(200, 0),
            timestamp: at(1, 10),
        });
        ledger.append_transaction(Transaction::Withdrawal {
            account: a,
            amount: Decimal::new(50, 0),
            timestamp: at(3, 10),
        });
        Arc::new(Mutex::new(ledger))
    }

    #[test]
    fn test_totals() {
        let service = ReportService::new(populated_ledger());
        let totals = service.totals().unwrap();
        assert_eq!(totals.users, 2);
        assert_eq!(totals.accounts, 2);
        assert_eq!(totals.transactions, 2);
        assert_eq!(totals.total_balance, Decimal::new(150, 0));
        assert_eq!(totals.average_balance, Decimal::new(75, 0));
    }

    #[test]
    fn test_totals_on_empty_ledger() {
        let service = ReportService::new(Arc::new(Mutex::new(Ledger::new())));
        let totals = service.totals().unwrap();
        assert_eq!(totals.accounts, 0);
        assert_eq!(totals.average_balance, Decimal::ZERO);
    }

    #[test]
    fn test_by_user_includes_accountless_users() {
        let ledger = populated_ledger();
        {
            let mut guard = ledger.lock().unwrap();
            guard
                .register_user("11122233344", "Sem Conta", "0000", at(2, 9))
                .unwrap();
        }
        let service = ReportService::new(ledger);
        let rows = service.by_user().unwrap();
        assert_eq!(rows.len(), 3);
        let no_account = rows.iter().find(|r| r.name == "Sem Conta").unwrap();
        assert!(no_account.account.is_none());
        assert!(no_account.balance.is_none());
    }

    #[test]
    fn test_period_is_inclusive_on_both_ends() {
        let service = ReportService::new(populated_ledger());
        let report = service
            .period(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            )
            .unwrap();
        assert_eq!(report.deposits.count, 1);
        assert_eq!(report.deposits.total, Decimal::new(200, 0));
        assert_eq!(report.withdrawals.count, 1);
        assert_eq!(report.transfers.count, 0);

        // Narrower window drops the day-3 withdrawal
        let report = service
            .period(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            )
            .unwrap();
        assert_eq!(report.withdrawals.count, 0);
    }
}
