//! `entraide-ledger` — the points-and-enrollment ledger engine.
//!
//! The rule-bearing workflows of the marketplace: account registration,
//! session creation, enrollment, point purchases, and rating. Each workflow
//! is atomic from the caller's point of view; the entity store underneath
//! has no transaction mechanism, so atomicity is provided by a per-service
//! critical section.

pub mod service;

pub use service::{LedgerError, LedgerService};
