//! Store operation errors.

use thiserror::Error;

/// Entity store error.
///
/// `Unavailable` is fatal for the current operation and never retried: the
/// underlying medium (file system, shared map) is inaccessible. The other
/// variants are deterministic outcomes of a specific call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key-value medium is inaccessible (I/O failure, poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A collection failed to encode or decode as JSON.
    #[error("malformed {collection} collection: {message}")]
    Codec {
        collection: &'static str,
        message: String,
    },

    /// `replace` targeted an id that is not in the collection.
    #[error("no {collection} record with id {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },
}
