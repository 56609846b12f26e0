// Application layer: input validation and orchestration on top of the ledger.
// Front ends (the CLI shell, one-shot commands, tests) talk to the ledger
// through `ReceiptService` rather than mutating it directly.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
