use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Amount, Entry, EntryId, EntryKind};

const FIRST_ENTRY_ID: EntryId = 1;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: the computed value is not a finite number")]
    InvalidAmount,

    #[error("Quantity cannot be zero")]
    DivisionByZero,
}

/// Aggregates derived from a ledger at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub sum: Amount,
    pub service_amount: Amount,
    pub total: Amount,
}

/// The receipt ledger: an ordered list of entries plus a service percentage.
///
/// Entries are kept in insertion order, which is the order sums are folded
/// in. Failed additions never mutate the ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    entries: Vec<Entry>,
    /// Percentage, not clamped: range checks belong to the caller.
    service_rate: Amount,
    next_id: EntryId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            service_rate: 0.0,
            next_id: FIRST_ENTRY_ID,
        }
    }

    /// Record `price * quantity`.
    pub fn add_product(
        &mut self,
        price: Amount,
        quantity: Amount,
    ) -> Result<EntryId, LedgerError> {
        let value = price * quantity;
        self.push(EntryKind::Product, price, quantity, value)
    }

    /// Record `price / quantity`. A zero quantity is rejected before dividing.
    pub fn add_quotient(
        &mut self,
        price: Amount,
        quantity: Amount,
    ) -> Result<EntryId, LedgerError> {
        if quantity == 0.0 {
            return Err(LedgerError::DivisionByZero);
        }
        let value = price / quantity;
        self.push(EntryKind::Quotient, price, quantity, value)
    }

    fn push(
        &mut self,
        kind: EntryKind,
        price: Amount,
        quantity: Amount,
        value: Amount,
    ) -> Result<EntryId, LedgerError> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidAmount);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            price,
            quantity,
            value,
        });
        Ok(id)
    }

    /// Replace the service percentage. NaN falls back to 0; no range check.
    pub fn set_service_rate(&mut self, percent: Amount) {
        self.service_rate = if percent.is_nan() { 0.0 } else { percent };
    }

    pub fn service_rate(&self) -> Amount {
        self.service_rate
    }

    /// Remove the entry with `id`, if any. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Drop every entry and restart ids at 1. The service rate is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = FIRST_ENTRY_ID;
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> Amount {
        self.entries.iter().fold(0.0, |sum, entry| sum + entry.value)
    }

    pub fn service_amount(&self) -> Amount {
        self.sum() * (self.service_rate / 100.0)
    }

    pub fn totals(&self) -> Totals {
        let sum = self.sum();
        let service_amount = self.service_amount();
        Totals {
            sum,
            service_amount,
            total: sum + service_amount,
        }
    }
}
