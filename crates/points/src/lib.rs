//! Points ledger lines (immutable transaction history).
//!
//! Pure domain logic only: no IO, no storage concerns.

pub mod transaction;

pub use transaction::{PaymentMethod, Transaction, TransactionKind};
