use std::sync::Arc;

use tracing::info;

use entraide_store::{EntityStore, StorageBackend, StoreError};
use entraide_users::User;

/// The single active identity for the process.
///
/// The identity pointer lives in the store's dedicated slot; this context
/// only orchestrates credential checks and pointer updates. Bad credentials
/// are a `None`, never an error.
#[derive(Debug)]
pub struct SessionContext<B> {
    store: Arc<EntityStore<B>>,
}

impl<B: StorageBackend> SessionContext<B> {
    pub fn new(store: Arc<EntityStore<B>>) -> Self {
        Self { store }
    }

    /// Authenticate by email (case-insensitive) and password.
    ///
    /// The password comparison is plain equality against the stored secret —
    /// inherited prototype behavior, acceptable only because this is a demo;
    /// a production build must compare salted hashes instead.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        let Some(user) = self.store.user_by_email(email)? else {
            return Ok(None);
        };
        if user.password != password {
            return Ok(None);
        }

        self.store.set_current_identity(Some(&user.id))?;
        info!(user_id = %user.id, "logged in");
        Ok(Some(user))
    }

    /// Clear the active identity.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.set_current_identity(None)
    }

    /// Re-resolve the active identity from the store.
    ///
    /// Called after any ledger mutation so the caller observes the latest
    /// stored balance rather than a stale copy.
    pub fn current_user(&self) -> Result<Option<User>, StoreError> {
        self.store.current_identity()
    }

    pub fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.current_user()?.is_some())
    }
}
