use tracing::debug;

use crate::domain::{Amount, Entry, EntryId, EntryKind, Ledger, Totals};

use super::AppError;

const MAX_SERVICE_RATE: Amount = 100.0;

/// Application service wrapping a [`Ledger`] with the input checks a
/// front end is expected to perform.
/// This is the primary interface for any client (CLI, TUI, tests).
///
/// The ledger itself is lenient: it accepts negative operands and any
/// service rate. The service narrows that down to what makes sense on a
/// receipt: positive finite prices and quantities, and a percentage in
/// `[0, 100]`.
#[derive(Debug, Default)]
pub struct ReceiptService {
    ledger: Ledger,
}

impl ReceiptService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    // ========================
    // Entry operations
    // ========================

    /// Validate the operands and record an entry of the given kind.
    pub fn add_entry(
        &mut self,
        kind: EntryKind,
        price: Amount,
        quantity: Amount,
    ) -> Result<EntryId, AppError> {
        if !is_positive_finite(price) || !is_positive_finite(quantity) {
            debug!(%kind, price, quantity, "rejected entry input");
            return Err(AppError::InvalidEntryInput { price, quantity });
        }

        let id = match kind {
            EntryKind::Product => self.ledger.add_product(price, quantity),
            EntryKind::Quotient => self.ledger.add_quotient(price, quantity),
        }
        .inspect_err(|err| debug!(%kind, price, quantity, %err, "ledger rejected entry"))?;

        debug!(id, %kind, price, quantity, "recorded entry");
        Ok(id)
    }

    pub fn add_product(&mut self, price: Amount, quantity: Amount) -> Result<EntryId, AppError> {
        self.add_entry(EntryKind::Product, price, quantity)
    }

    pub fn add_quotient(&mut self, price: Amount, quantity: Amount) -> Result<EntryId, AppError> {
        self.add_entry(EntryKind::Quotient, price, quantity)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.ledger.get(id)
    }

    /// Remove an entry. Returns `None` when no entry had that id.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<Entry> {
        let removed = self.ledger.remove(id);
        match &removed {
            Some(entry) => debug!(id, value = entry.value, "removed entry"),
            None => debug!(id, "no entry to remove"),
        }
        removed
    }

    /// Start a fresh receipt: drops every entry and resets the service rate.
    pub fn clear(&mut self) {
        debug!(entries = self.ledger.len(), "clearing receipt");
        self.ledger.clear();
        self.ledger.set_service_rate(0.0);
    }

    // ========================
    // Service percentage
    // ========================

    /// Apply a service percentage. It must be a number in `[0, 100]`.
    pub fn apply_service(&mut self, percent: Amount) -> Result<Amount, AppError> {
        if percent.is_nan() || !(0.0..=MAX_SERVICE_RATE).contains(&percent) {
            debug!(percent, "rejected service rate");
            return Err(AppError::InvalidServiceRate(percent));
        }
        self.ledger.set_service_rate(percent);
        debug!(percent, "applied service rate");
        Ok(self.ledger.service_rate())
    }

    pub fn reset_service(&mut self) {
        self.ledger.set_service_rate(0.0);
        debug!("reset service rate");
    }

    pub fn service_rate(&self) -> Amount {
        self.ledger.service_rate()
    }

    // ========================
    // Queries
    // ========================

    /// Entries for display, most recent first.
    pub fn history(&self) -> Vec<&Entry> {
        self.ledger.entries().iter().rev().collect()
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }
}

fn is_positive_finite(value: Amount) -> bool {
    value.is_finite() && value > 0.0
}
