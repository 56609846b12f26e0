mod common;

use anyhow::Result;
use common::{dinner_receipt, entry_ids, receipt_with};
use tally::application::{AppError, ReceiptService};
use tally::domain::{EntryKind, LedgerError};

#[test]
fn test_dinner_receipt_totals() -> Result<()> {
    let service = dinner_receipt()?;

    let totals = service.totals();
    assert_eq!(totals.sum, 230.0);
    assert_eq!(totals.service_amount, 23.0);
    assert_eq!(totals.total, 253.0);
    Ok(())
}

#[test]
fn test_rejected_input_is_not_recorded() -> Result<()> {
    let mut service = dinner_receipt()?;
    let before = service.totals();

    let zero = service.add_quotient(10.0, 0.0);
    let negative = service.add_product(-3.0, 1.0);
    let nan = service.add_product(f64::NAN, 1.0);

    assert!(matches!(zero, Err(AppError::InvalidEntryInput { .. })));
    assert!(matches!(negative, Err(AppError::InvalidEntryInput { .. })));
    assert!(matches!(nan, Err(AppError::InvalidEntryInput { .. })));
    assert_eq!(service.totals(), before);
    assert_eq!(entry_ids(service.ledger()), vec![1, 2]);
    Ok(())
}

#[test]
fn test_overflow_surfaces_ledger_error() -> Result<()> {
    let mut service = ReceiptService::new();

    let err = service.add_product(1e300, 1e300).unwrap_err();

    assert_eq!(err, AppError::Ledger(LedgerError::InvalidAmount));
    assert!(service.ledger().is_empty());
    Ok(())
}

#[test]
fn test_service_rate_bounds() -> Result<()> {
    let mut service = dinner_receipt()?;

    assert!(matches!(
        service.apply_service(101.0),
        Err(AppError::InvalidServiceRate(_))
    ));
    assert!(matches!(
        service.apply_service(-0.5),
        Err(AppError::InvalidServiceRate(_))
    ));
    assert_eq!(service.service_rate(), 10.0);

    service.apply_service(100.0)?;
    assert_eq!(service.totals().total, 460.0);
    Ok(())
}

#[test]
fn test_reset_service_keeps_entries() -> Result<()> {
    let mut service = dinner_receipt()?;

    service.reset_service();

    assert_eq!(service.service_rate(), 0.0);
    assert_eq!(service.totals().total, 230.0);
    assert_eq!(service.ledger().len(), 2);
    Ok(())
}

#[test]
fn test_clear_starts_a_new_receipt() -> Result<()> {
    let mut service = dinner_receipt()?;

    service.clear();

    assert!(service.ledger().is_empty());
    assert_eq!(service.service_rate(), 0.0);
    assert_eq!(service.totals().total, 0.0);
    assert_eq!(service.add_product(5.0, 2.0)?, 1);
    Ok(())
}

#[test]
fn test_history_reverses_canonical_order() -> Result<()> {
    let service = receipt_with(&[
        (EntryKind::Product, 1.0, 1.0),
        (EntryKind::Quotient, 8.0, 2.0),
        (EntryKind::Product, 3.0, 3.0),
    ])?;

    let history: Vec<u64> = service.history().iter().map(|e| e.id).collect();

    assert_eq!(history, vec![3, 2, 1]);
    assert_eq!(entry_ids(service.ledger()), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_remove_entry_reports_what_was_removed() -> Result<()> {
    let mut service = dinner_receipt()?;

    let removed = service.remove_entry(2);
    assert_eq!(removed.map(|e| e.kind), Some(EntryKind::Quotient));
    assert!(service.remove_entry(2).is_none());

    assert_eq!(service.totals().sum, 200.0);
    assert_eq!(service.add_product(1.0, 1.0)?, 3);
    Ok(())
}

#[test]
fn test_service_can_wrap_existing_ledger() -> Result<()> {
    let service = dinner_receipt()?;
    let ledger = service.into_ledger();

    let service = ReceiptService::with_ledger(ledger);

    assert_eq!(service.totals().total, 253.0);
    Ok(())
}
