use thiserror::Error;

use crate::domain::{Amount, LedgerError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Enter a valid price and quantity (got price {price}, quantity {quantity})")]
    InvalidEntryInput { price: Amount, quantity: Amount },

    #[error("Enter a valid service percentage between 0 and 100 (got {0})")]
    InvalidServiceRate(Amount),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
