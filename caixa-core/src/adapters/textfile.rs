//! Flat-file repository adapter
//!
//! Persists the ledger as three `;`-delimited text files in the data
//! directory, one record per line:
//!
//! - `usuarios.txt`: cpf;name;credential;DD/MM/YYYY HH:MM:SS
//! - `contas.txt`: number;balance;limit;cpf;withdrawals-today;DD/MM/YYYY|None
//! - `transacoes.txt`: tag;amount;account-or-source;dest-or-empty;timestamp
//!
//! Load tolerates missing files (empty state) and skips malformed lines.
//! Saves go through a temp file in the same directory and a rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use fs2::FileExt;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountNumber, Cpf, Transaction, User};
use crate::ledger::Ledger;
use crate::ports::{LoadedLedger, Repository};

pub const USERS_FILE: &str = "usuarios.txt";
pub const ACCOUNTS_FILE: &str = "contas.txt";
pub const TRANSACTIONS_FILE: &str = "transacoes.txt";

/// All data files, in save order. Used by the backup service.
pub const DATA_FILES: &[&str] = &[USERS_FILE, ACCOUNTS_FILE, TRANSACTIONS_FILE];

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sentinel for "no last-withdrawal date" in the accounts file.
const NONE_SENTINEL: &str = "None";

pub struct TextFileRepository {
    data_dir: PathBuf,
    // Exclusive advisory lock held for the lifetime of the repository.
    _lock: File,
}

impl TextFileRepository {
    /// Open the repository rooted at `data_dir`, creating the directory if
    /// needed and taking an exclusive lock on it.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let lock = File::create(data_dir.join("caixa.lock"))?;
        lock.try_lock_exclusive().map_err(|_| {
            Error::Persistence(format!(
                "data directory {} is already in use by another process",
                data_dir.display()
            ))
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            _lock: lock,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_records(&self, filename: &str) -> Result<Vec<std::result::Result<StringRecord, csv::Error>>> {
        let path = self.data_dir.join(filename);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        Ok(reader.records().collect())
    }

    /// Write `rows` to `filename` atomically: temp file in the same
    /// directory, then rename into place.
    fn write_rows(&self, filename: &str, rows: &[Vec<String>]) -> Result<()> {
        let mut buf = Vec::new();
        {
            let mut writer = WriterBuilder::new()
                .delimiter(b';')
                .has_headers(false)
                .from_writer(&mut buf);
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush().map_err(Error::Io)?;
        }

        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(&buf)?;
        tmp.persist(self.data_dir.join(filename))
            .map_err(|e| Error::Persistence(format!("failed to replace {}: {}", filename, e)))?;
        Ok(())
    }
}

impl Repository for TextFileRepository {
    fn load(&self) -> Result<LoadedLedger> {
        let mut ledger = Ledger::new();
        let mut skipped = 0usize;

        for record in self.read_records(USERS_FILE)? {
            match record.ok().as_ref().and_then(parse_user) {
                Some(user) => ledger.insert_loaded_user(user),
                None => skipped += 1,
            }
        }

        for record in self.read_records(ACCOUNTS_FILE)? {
            match record.ok().as_ref().and_then(parse_account) {
                Some(account) => ledger.insert_loaded_account(account),
                None => skipped += 1,
            }
        }

        for record in self.read_records(TRANSACTIONS_FILE)? {
            match record.ok().as_ref().and_then(parse_transaction) {
                Some(tx) => ledger.push_loaded_transaction(tx),
                None => skipped += 1,
            }
        }

        Ok(LoadedLedger {
            ledger,
            skipped_lines: skipped,
        })
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let users: Vec<Vec<String>> = ledger
            .users()
            .map(|u| {
                vec![
                    u.cpf.as_str().to_string(),
                    u.name.clone(),
                    u.credential.clone(),
                    u.registered_at.format(TIMESTAMP_FORMAT).to_string(),
                ]
            })
            .collect();
        self.write_rows(USERS_FILE, &users)?;

        let accounts: Vec<Vec<String>> = ledger
            .accounts()
            .map(|a| {
                vec![
                    a.number.as_str().to_string(),
                    a.balance.to_string(),
                    a.withdrawal_limit.to_string(),
                    a.owner.as_str().to_string(),
                    a.withdrawals_today.to_string(),
                    a.last_withdrawal
                        .map(|d| d.format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| NONE_SENTINEL.to_string()),
                ]
            })
            .collect();
        self.write_rows(ACCOUNTS_FILE, &accounts)?;

        let transactions: Vec<Vec<String>> = ledger
            .transactions()
            .iter()
            .map(|t| match t {
                Transaction::Deposit { account, amount, timestamp }
                | Transaction::Withdrawal { account, amount, timestamp } => vec![
                    t.tag().to_string(),
                    amount.to_string(),
                    account.as_str().to_string(),
                    String::new(),
                    timestamp.format(TIMESTAMP_FORMAT).to_string(),
                ],
                Transaction::Transfer { source, dest, amount, timestamp } => vec![
                    t.tag().to_string(),
                    amount.to_string(),
                    source.as_str().to_string(),
                    dest.as_str().to_string(),
                    timestamp.format(TIMESTAMP_FORMAT).to_string(),
                ],
            })
            .collect();
        self.write_rows(TRANSACTIONS_FILE, &transactions)?;

        Ok(())
    }
}

fn parse_user(record: &StringRecord) -> Option<User> {
    let cpf = Cpf::parse(record.get(0)?).ok()?;
    let name = record.get(1)?.to_string();
    let credential = record.get(2)?.to_string();
    let registered_at =
        NaiveDateTime::parse_from_str(record.get(3)?.trim(), TIMESTAMP_FORMAT).ok()?;
    Some(User::new(cpf, name, credential, registered_at))
}

fn parse_account(record: &StringRecord) -> Option<Account> {
    let number = AccountNumber::parse(record.get(0)?).ok()?;
    let balance: Decimal = record.get(1)?.trim().parse().ok()?;
    let withdrawal_limit: Decimal = record.get(2)?.trim().parse().ok()?;
    let owner = Cpf::parse(record.get(3)?).ok()?;
    let withdrawals_today: u32 = record.get(4)?.trim().parse().ok()?;
    let last_withdrawal = match record.get(5)?.trim() {
        "" | NONE_SENTINEL => None,
        raw => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?),
    };

    Some(Account {
        number,
        owner,
        balance,
        withdrawal_limit,
        withdrawals_today,
        last_withdrawal,
    })
}

fn parse_transaction(record: &StringRecord) -> Option<Transaction> {
    let tag = record.get(0)?.trim();
    let amount: Decimal = record.get(1)?.trim().parse().ok()?;
    let timestamp = NaiveDateTime::parse_from_str(record.get(4)?.trim(), TIMESTAMP_FORMAT).ok()?;

    match tag {
        "deposito" => Some(Transaction::Deposit {
            account: AccountNumber::parse(record.get(2)?).ok()?,
            amount,
            timestamp,
        }),
        "saque" => Some(Transaction::Withdrawal {
            account: AccountNumber::parse(record.get(2)?).ok()?,
            amount,
            timestamp,
        }),
        "transferencia" => Some(Transaction::Transfer {
            source: AccountNumber::parse(record.get(2)?).ok()?,
            dest: AccountNumber::parse(record.get(3)?).ok()?,
            amount,
            timestamp,
        }),
        _ => None,
    }
}
