//! `entraide-store` — the entity store.
//!
//! Durable mapping from each of the four entity kinds (users, sessions,
//! inscriptions, transactions) to its persisted collection, plus the single
//! current-identity slot. Pure read/write operations; business rules live in
//! the ledger.
//!
//! Collections are JSON arrays under namespaced keys in a [`StorageBackend`]
//! key-value medium. Every accessor re-reads its collection from the backend,
//! so callers always observe the latest persisted state.

pub mod backend;
pub mod error;
pub mod seed;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::StoreError;
pub use store::{keys, EntityStore};
