//! End-to-end tests driving the full context: register, operate, persist,
//! reload.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use caixa_core::domain::Transaction;
use caixa_core::{CaixaContext, EntryPoint, Error, ManualClock};

fn dec(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    ))
}

#[test]
fn test_full_customer_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let clock = manual_clock();
    let ctx = CaixaContext::with_clock(dir.path(), EntryPoint::Library, clock.clone()).unwrap();

    let registration = ctx
        .registry_service
        .register_user("123.456.789-00", "João da Silva", "1234")
        .unwrap();
    assert!(registration.persisted);

    let opened = ctx.registry_service.open_account("12345678900").unwrap();
    assert_eq!(opened.number.as_str(), "0001");

    ctx.operations_service
        .deposit(&opened.number, dec(10000, 2))
        .unwrap();

    // Three withdrawals exhaust the daily quota
    for _ in 0..3 {
        ctx.operations_service
            .withdraw(&opened.number, dec(3000, 2))
            .unwrap();
    }
    let err = ctx
        .operations_service
        .withdraw(&opened.number, dec(100, 2))
        .unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded));

    let statement = ctx.operations_service.statement(&opened.number).unwrap();
    assert_eq!(statement.balance, dec(1000, 2));
    assert_eq!(statement.withdrawals_today, 3);
    assert_eq!(statement.entries.len(), 4);
    assert!(matches!(statement.entries[0], Transaction::Deposit { .. }));
    assert!(matches!(
        statement.entries[3],
        Transaction::Withdrawal { .. }
    ));

    // Next day the quota resets
    clock.advance_days(1);
    let receipt = ctx
        .operations_service
        .withdraw(&opened.number, dec(100, 2))
        .unwrap();
    assert_eq!(receipt.balance, dec(900, 2));
}

#[test]
fn test_rejected_transfer_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).unwrap();

    ctx.registry_service
        .register_user("12345678900", "João", "1234")
        .unwrap();
    ctx.registry_service
        .register_user("98765432100", "Maria", "4321")
        .unwrap();
    let a = ctx.registry_service.open_account("12345678900").unwrap();
    let b = ctx.registry_service.open_account("98765432100").unwrap();

    ctx.operations_service.deposit(&a.number, dec(5000, 2)).unwrap();

    let err = ctx
        .operations_service
        .transfer(&a.number, &b.number, dec(10000, 2))
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));

    let src = ctx.operations_service.statement(&a.number).unwrap();
    let dst = ctx.operations_service.statement(&b.number).unwrap();
    assert_eq!(src.balance, dec(5000, 2));
    assert_eq!(dst.balance, Decimal::ZERO);
    assert_eq!(src.entries.len(), 1);
    assert!(dst.entries.is_empty());
}

#[test]
fn test_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();

    {
        let ctx =
            CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).unwrap();
        ctx.registry_service
            .register_user("12345678900", "João da Silva", "1234")
            .unwrap();
        let opened = ctx.registry_service.open_account("12345678900").unwrap();
        ctx.operations_service
            .deposit(&opened.number, dec(25050, 2))
            .unwrap();
        ctx.operations_service
            .withdraw(&opened.number, dec(5050, 2))
            .unwrap();
        ctx.operations_service
            .set_withdrawal_limit(&opened.number, dec(75000, 2))
            .unwrap();
        // Context drops here and releases the directory lock
    }

    let ctx = CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).unwrap();
    let session = ctx
        .registry_service
        .login("12345678900", "1234")
        .unwrap()
        .unwrap();
    assert_eq!(session.name, "João da Silva");
    let number = session.account.unwrap();

    let statement = ctx.operations_service.statement(&number).unwrap();
    assert_eq!(statement.balance, dec(20000, 2));
    assert_eq!(statement.withdrawal_limit, dec(75000, 2));
    assert_eq!(statement.withdrawals_today, 1);
    assert_eq!(statement.entries.len(), 2);

    // A new account continues the numbering where it left off
    ctx.registry_service
        .register_user("98765432100", "Maria", "4321")
        .unwrap();
    let second = ctx.registry_service.open_account("98765432100").unwrap();
    assert_eq!(second.number.as_str(), "0002");
}

#[test]
fn test_demo_then_report() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).unwrap();

    let summary = ctx.demo_service.seed().unwrap();
    assert_eq!(summary.users.len(), 2);

    let totals = ctx.report_service.totals().unwrap();
    assert_eq!(totals.users, 2);
    assert_eq!(totals.accounts, 2);
    assert_eq!(totals.total_balance, dec(3000, 0));

    let rows = ctx.report_service.by_user().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.account.is_some()));
}

#[test]
fn test_second_context_on_same_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let _ctx = CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).unwrap();
    assert!(CaixaContext::with_clock(dir.path(), EntryPoint::Library, manual_clock()).is_err());
}
