//! `entraide-auth` — the session context.
//!
//! Holds the single logged-in identity for the process lifetime. Credential
//! checks and point mutations are delegated to the store and the ledger.

pub mod context;

pub use context::SessionContext;
