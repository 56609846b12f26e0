// Each tests/*.rs file is its own crate and only uses some of these fixtures.
#![allow(dead_code)]

use anyhow::Result;
use tally::application::ReceiptService;
use tally::domain::{EntryKind, Ledger};

/// Helper to build a service from `(kind, price, quantity)` lines
pub fn receipt_with(lines: &[(EntryKind, f64, f64)]) -> Result<ReceiptService> {
    let mut service = ReceiptService::new();
    for &(kind, price, quantity) in lines {
        service.add_entry(kind, price, quantity)?;
    }
    Ok(service)
}

/// Test fixture: the dinner receipt used throughout the tests.
/// Two plates at 100, a 90 bottle shared by three, 10% service.
pub fn dinner_receipt() -> Result<ReceiptService> {
    let mut service = receipt_with(&[
        (EntryKind::Product, 100.0, 2.0),
        (EntryKind::Quotient, 90.0, 3.0),
    ])?;
    service.apply_service(10.0)?;
    Ok(service)
}

/// Collect entry ids in canonical (insertion) order
pub fn entry_ids(ledger: &Ledger) -> Vec<u64> {
    ledger.entries().iter().map(|e| e.id).collect()
}
