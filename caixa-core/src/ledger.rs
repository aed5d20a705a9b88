//! In-memory ledger: the authoritative users, accounts and transaction log
//!
//! The ledger owns all three collections outright. Services hold it behind a
//! single mutex and never keep private copies; the persistence adapter only
//! sees it through the loader hooks and the read-only iterators.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountNumber, Cpf, Transaction, User, MIN_CREDENTIAL_LEN};

#[derive(Debug, Default)]
pub struct Ledger {
    users: BTreeMap<Cpf, User>,
    accounts: BTreeMap<AccountNumber, Account>,
    transactions: Vec<Transaction>,
    /// Highest account index ever allocated. Numbers are never reused, so
    /// this is a plain monotonic counter rather than `accounts.len() + 1`.
    next_account: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // === Users ===

    /// Register a new user.
    ///
    /// The identifier is validated on its digit-only form; the credential must
    /// have at least [`MIN_CREDENTIAL_LEN`] characters.
    pub fn register_user(
        &mut self,
        raw_cpf: &str,
        name: &str,
        credential: &str,
        registered_at: NaiveDateTime,
    ) -> Result<Cpf> {
        let cpf = Cpf::parse(raw_cpf)?;
        if credential.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(Error::InvalidCredential);
        }
        if self.users.contains_key(&cpf) {
            return Err(Error::DuplicateUser(cpf));
        }
        self.users
            .insert(cpf.clone(), User::new(cpf.clone(), name, credential, registered_at));
        Ok(cpf)
    }

    /// Exact-equality credential check. Returns the canonical CPF on success.
    pub fn authenticate(&self, raw_cpf: &str, credential: &str) -> Option<Cpf> {
        let cpf = Cpf::parse(raw_cpf).ok()?;
        let user = self.users.get(&cpf)?;
        (user.credential == credential).then(|| cpf)
    }

    pub fn user(&self, cpf: &Cpf) -> Option<&User> {
        self.users.get(cpf)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // === Accounts ===

    /// Open an account for a registered user.
    ///
    /// Allocates the next number from the monotonic counter, zero-padded to
    /// 4 digits, and initializes balance 0 with the default withdrawal limit.
    pub fn create_account(&mut self, owner: &Cpf) -> Result<AccountNumber> {
        if !self.users.contains_key(owner) {
            return Err(Error::UnknownUser(owner.clone()));
        }
        self.next_account += 1;
        let number = AccountNumber::from_index(self.next_account);
        self.accounts
            .insert(number.clone(), Account::new(number.clone(), owner.clone()));
        Ok(number)
    }

    /// First account owned by the user, in account-number order.
    pub fn find_account_by_user(&self, owner: &Cpf) -> Option<AccountNumber> {
        self.accounts
            .values()
            .find(|a| &a.owner == owner)
            .map(|a| a.number.clone())
    }

    pub fn account(&self, number: &AccountNumber) -> Option<&Account> {
        self.accounts.get(number)
    }

    pub(crate) fn account_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts.values().map(|a| a.balance).sum()
    }

    // === Transactions ===

    /// Pure append; validation is the caller's responsibility.
    pub fn append_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// The full log, in insertion (chronological) order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Chronological projection of every transaction touching one account.
    pub fn transactions_for(&self, number: &AccountNumber) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.involves(number))
            .cloned()
            .collect()
    }

    // === Loader hooks (persistence adapter and demo seeding) ===

    pub(crate) fn insert_loaded_user(&mut self, user: User) {
        self.users.insert(user.cpf.clone(), user);
    }

    pub(crate) fn insert_loaded_account(&mut self, account: Account) {
        let index: u32 = account.number.as_str().parse().unwrap_or(0);
        self.next_account = self.next_account.max(index);
        self.accounts.insert(account.number.clone(), account);
    }

    pub(crate) fn push_loaded_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}
