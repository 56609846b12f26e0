use serde::{Deserialize, Serialize};

use super::Amount;

/// Ledger-scoped entry identifier. Starts at 1 and only grows until the
/// ledger is cleared.
pub type EntryId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// `price * quantity`
    Product,
    /// `price / quantity`
    Quotient,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Product => "product",
            EntryKind::Quotient => "quotient",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "product" | "mul" => Some(EntryKind::Product),
            "quotient" | "div" => Some(EntryKind::Quotient),
            _ => None,
        }
    }

    /// Operator shown next to an entry: `x` for products, `/` for quotients.
    pub fn symbol(&self) -> char {
        match self {
            EntryKind::Product => 'x',
            EntryKind::Quotient => '/',
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of a receipt. Entries are only built by the [`Ledger`](super::Ledger),
/// which guarantees `value` is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub price: Amount,
    pub quantity: Amount,
    /// Result of applying `kind` to `price` and `quantity`
    pub value: Amount,
}
