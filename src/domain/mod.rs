mod amount;
mod entry;
mod ledger;

pub use amount::*;
pub use entry::*;
pub use ledger::*;
