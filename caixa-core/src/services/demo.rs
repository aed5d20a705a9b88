//! Demo service - example data seeding
//!
//! Replaces the current ledger with the canonical example data set: two
//! users with funded accounts and a small transaction history.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountNumber, Cpf, Transaction};
use crate::ledger::Ledger;
use crate::ports::{Clock, Repository};
use crate::services::{persist, EventLog};

struct SeedSpec {
    cpf: &'static str,
    name: &'static str,
    credential: &'static str,
    deposit: Decimal,
    withdrawal_limit: Decimal,
}

fn seed_specs() -> [SeedSpec; 2] {
    [
        SeedSpec {
            cpf: "12345678900",
            name: "João da Silva",
            credential: "1234",
            deposit: Decimal::new(1000, 0),
            withdrawal_limit: Decimal::new(500, 0),
        },
        SeedSpec {
            cpf: "98765432100",
            name: "Maria Oliveira",
            credential: "4321",
            deposit: Decimal::new(2000, 0),
            withdrawal_limit: Decimal::new(1000, 0),
        },
    ]
}

pub struct DemoService {
    ledger: Arc<Mutex<Ledger>>,
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
    events: Arc<EventLog>,
}

impl DemoService {
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

    /// Replace the ledger with the example data set and flush it.
    ///
    /// Seeds an opening deposit per account plus one transfer between them,
    /// so balances and the transaction log agree.
    pub fn seed(&self) -> Result<SeedSummary> {
        let now = self.clock.now();
        let mut fresh = Ledger::new();
        let mut users = Vec::new();

        for spec in seed_specs() {
            let cpf = fresh.register_user(spec.cpf, spec.name, spec.credential, now)?;
            let number = fresh.create_account(&cpf)?;
            {
                let account = fresh
                    .account_mut(&number)
                    .ok_or_else(|| Error::UnknownAccount(number.clone()))?;
                account.balance = spec.deposit;
                account.withdrawal_limit = spec.withdrawal_limit;
            }
            fresh.append_transaction(Transaction::Deposit {
                account: number.clone(),
                amount: spec.deposit,
                timestamp: now,
            });
            users.push(SeedUser {
                cpf,
                name: spec.name.to_string(),
                credential: spec.credential.to_string(),
                account: number,
            });
        }

        // Transfer 500 from Maria to João
        let amount = Decimal::new(500, 0);
        let source = users[1].account.clone();
        let dest = users[0].account.clone();
        fresh
            .account_mut(&source)
            .ok_or_else(|| Error::UnknownAccount(source.clone()))?
            .balance -= amount;
        fresh
            .account_mut(&dest)
            .ok_or_else(|| Error::UnknownAccount(dest.clone()))?
            .balance += amount;
        fresh.append_transaction(Transaction::Transfer {
            source,
            dest,
            amount,
            timestamp: now,
        });

        let mut ledger = self.ledger()?;
        *ledger = fresh;
        let persisted = persist(&*self.repository, &ledger, &self.events, "demo");
        let _ = self.events.log_event("demo_seeded");

        Ok(SeedSummary { users, persisted })
    }
}

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub users: Vec<SeedUser>,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct SeedUser {
    pub cpf: Cpf,
    pub name: String,
    pub credential: String,
    pub account: AccountNumber,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TextFileRepository;
    use crate::ports::ManualClock;
    use crate::services::EntryPoint;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_seed_produces_consistent_ledger() {
        let dir = tempdir().unwrap();
        let ledger = Arc::new(Mutex::new(Ledger::new()));
        let repository = Arc::new(TextFileRepository::open(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        ));
        let events = Arc::new(EventLog::new(dir.path(), EntryPoint::Library, "test").unwrap());
        let service = DemoService::new(Arc::clone(&ledger), repository, clock, events);

        let summary = service.seed().unwrap();
        assert!(summary.persisted);
        assert_eq!(summary.users.len(), 2);
        assert_eq!(summary.users[0].account.as_str(), "0001");
        assert_eq!(summary.users[1].account.as_str(), "0002");

        let guard = ledger.lock().unwrap();
        // 1000 + 500 in, 2000 - 500 out
        let joao = guard
            .account(&AccountNumber::parse("0001").unwrap())
            .unwrap();
        let maria = guard
            .account(&AccountNumber::parse("0002").unwrap())
            .unwrap();
        assert_eq!(joao.balance, Decimal::new(1500, 0));
        assert_eq!(maria.balance, Decimal::new(1500, 0));
        assert_eq!(guard.total_balance(), Decimal::new(3000, 0));
        assert_eq!(guard.transaction_count(), 3);

        // Seeded balances match what the log replays to
        let mut replayed = Decimal::ZERO;
        for tx in guard.transactions() {
            if let Transaction::Deposit { amount, .. } = tx {
                replayed += *amount;
            }
        }
        assert_eq!(replayed, guard.total_balance());
    }
}
