//! Registry service - user registration, account opening and login

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountNumber, Cpf};
use crate::ledger::Ledger;
use crate::ports::{Clock, Repository};
use crate::services::{persist, EventLog};

pub struct RegistryService {
    ledger: Arc<Mutex<Ledger>>,
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
    events: Arc<EventLog>,
    agency: String,
}

impl RegistryService {
    pub fn new(
        ledger: Arc<Mutex<Ledger>>,
        repository: Arc<dyn Repository>,
        clock: Arc<dyn Clock>,
        events: Arc<EventLog>,
        agency: String,
    ) -> Self {
        Self {
            ledger,
            repository,
            clock,
            events,
            agency,
        }
    }

    fn ledger(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| Error::Persistence("ledger lock poisoned".to_string()))
    }

    /// Register a new user and flush state.
    pub fn register_user(
        &self,
        raw_cpf: &str,
        name: &str,
        credential: &str,
    ) -> Result<Registration> {
        let mut ledger = self.ledger()?;
        let cpf = ledger.register_user(raw_cpf, name, credential, self.clock.now())?;
        let persisted = persist(&*self.repository, &ledger, &self.events, "register");

        Ok(Registration {
            cpf,
            name: name.to_string(),
            persisted,
        })
    }

    /// Open an account for a registered user and flush state.
    pub fn open_account(&self, raw_cpf: &str) -> Result<OpenedAccount> {
        let cpf = Cpf::parse(raw_cpf)?;
        let mut ledger = self.ledger()?;
        let number = ledger.create_account(&cpf)?;
        let persisted = persist(&*self.repository, &ledger, &self.events, "open");

        Ok(OpenedAccount {
            number,
            agency: self.agency.clone(),
            persisted,
        })
    }

    /// Credential check. `None` means the CPF/credential pair did not match;
    /// which of the two was wrong is deliberately not disclosed.
    pub fn login(&self, raw_cpf: &str, credential: &str) -> Result<Option<Session>> {
        let ledger = self.ledger()?;
        let Some(cpf) = ledger.authenticate(raw_cpf, credential) else {
            return Ok(None);
        };
        let name = ledger
            .user(&cpf)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let account = ledger.find_account_by_user(&cpf);

        Ok(Some(Session { cpf, name, account }))
    }
}

#[derive(Debug, Serialize)]
pub struct Registration {
    pub cpf: Cpf,
    pub name: String,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct OpenedAccount {
    pub number: AccountNumber,
    pub agency: String,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub cpf: Cpf,
    pub name: String,
    pub account: Option<AccountNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TextFileRepository;
    use crate::domain::AGENCY;
    use crate::ports::ManualClock;
    use crate::services::EntryPoint;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn service(dir: &TempDir) -> RegistryService {
        let repository = Arc::new(TextFileRepository::open(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        ));
        let events = Arc::new(EventLog::new(dir.path(), EntryPoint::Library, "test").unwrap());
        RegistryService::new(
            Arc::new(Mutex::new(Ledger::new())),
            repository,
            clock,
            events,
            AGENCY.to_string(),
        )
    }

    #[test]
    fn test_register_open_login_flow() {
        let dir = tempdir().unwrap();
        let service = service(&dir);

        let registration = service
            .register_user("123.456.789-00", "João da Silva", "1234")
            .unwrap();
        assert!(registration.persisted);

        let opened = service.open_account("12345678900").unwrap();
        assert_eq!(opened.number.as_str(), "0001");
        assert_eq!(opened.agency, AGENCY);

        let session = service.login("12345678900", "1234").unwrap().unwrap();
        assert_eq!(session.name, "João da Silva");
        assert_eq!(session.account, Some(opened.number));

        assert!(service.login("12345678900", "wrong").unwrap().is_none());
    }

    #[test]
    fn test_open_account_requires_user() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        assert!(matches!(
            service.open_account("12345678900"),
            Err(Error::UnknownUser(_))
        ));
    }
}
