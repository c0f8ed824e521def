//! Typed accessors over the persisted collections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use entraide_core::{Entity, InscriptionId, SessionId, TransactionId, UserId};
use entraide_points::Transaction;
use entraide_sessions::{Inscription, Session};
use entraide_users::User;

use crate::backend::StorageBackend;
use crate::error::StoreError;

/// Namespaced storage keys, one per collection plus the identity slot.
pub mod keys {
    pub const USERS: &str = "entraide_users";
    pub const SESSIONS: &str = "entraide_sessions";
    pub const INSCRIPTIONS: &str = "entraide_inscriptions";
    pub const TRANSACTIONS: &str = "entraide_transactions";
    pub const CURRENT_USER: &str = "entraide_current_user";
}

/// Persisted identity pointer: only the id is authoritative, the user record
/// is always re-resolved through the users collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CurrentUserRecord {
    id: UserId,
}

/// The entity store: four collections plus the current-identity slot.
///
/// Every operation re-reads the backing collection, so no stale snapshot is
/// ever used as the basis of a write. All mutation routes through the ledger
/// workflows; the store itself enforces no business rules.
#[derive(Debug)]
pub struct EntityStore<B> {
    pub(crate) backend: B,
}

impl<B: StorageBackend> EntityStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub(crate) fn load<T: DeserializeOwned>(
        &self,
        key: &str,
        collection: &'static str,
    ) -> Result<Vec<T>, StoreError> {
        match self.backend.read(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| StoreError::Codec {
                collection,
                message: err.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) fn save<T: Serialize>(
        &self,
        key: &str,
        collection: &'static str,
        items: &[T],
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(|err| StoreError::Codec {
            collection,
            message: err.to_string(),
        })?;
        self.backend.write(key, &raw)
    }

    fn append_record<T>(
        &self,
        key: &str,
        collection: &'static str,
        record: &T,
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let mut items: Vec<T> = self.load(key, collection)?;
        items.push(record.clone());
        self.save(key, collection, &items)
    }

    fn replace_record<T>(
        &self,
        key: &str,
        collection: &'static str,
        record: &T,
    ) -> Result<(), StoreError>
    where
        T: Entity + Serialize + DeserializeOwned + Clone,
        T::Id: core::fmt::Display,
    {
        let mut items: Vec<T> = self.load(key, collection)?;
        let Some(slot) = items.iter_mut().find(|item| item.id() == record.id()) else {
            return Err(StoreError::NotFound {
                collection,
                id: record.id().to_string(),
            });
        };
        *slot = record.clone();
        self.save(key, collection, &items)
    }

    // Users

    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        self.load(keys::USERS, "users")
    }

    pub fn user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.into_iter().find(|u| &u.id == id))
    }

    /// Case-insensitive match on the email field.
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.into_iter().find(|u| u.email_matches(email)))
    }

    pub fn append_user(&self, user: &User) -> Result<(), StoreError> {
        self.append_record(keys::USERS, "users", user)
    }

    pub fn replace_user(&self, user: &User) -> Result<(), StoreError> {
        self.replace_record(keys::USERS, "users", user)
    }

    // Sessions

    pub fn sessions(&self) -> Result<Vec<Session>, StoreError> {
        self.load(keys::SESSIONS, "sessions")
    }

    pub fn session_by_id(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions()?.into_iter().find(|s| &s.id == id))
    }

    pub fn sessions_by_organizer(&self, aideur_id: &UserId) -> Result<Vec<Session>, StoreError> {
        Ok(self
            .sessions()?
            .into_iter()
            .filter(|s| &s.aideur_id == aideur_id)
            .collect())
    }

    pub fn sessions_by_participant(&self, user_id: &UserId) -> Result<Vec<Session>, StoreError> {
        Ok(self
            .sessions()?
            .into_iter()
            .filter(|s| s.has_participant(user_id))
            .collect())
    }

    pub fn append_session(&self, session: &Session) -> Result<(), StoreError> {
        self.append_record(keys::SESSIONS, "sessions", session)
    }

    pub fn replace_session(&self, session: &Session) -> Result<(), StoreError> {
        self.replace_record(keys::SESSIONS, "sessions", session)
    }

    // Inscriptions

    pub fn inscriptions(&self) -> Result<Vec<Inscription>, StoreError> {
        self.load(keys::INSCRIPTIONS, "inscriptions")
    }

    pub fn inscription_by_id(&self, id: &InscriptionId) -> Result<Option<Inscription>, StoreError> {
        Ok(self.inscriptions()?.into_iter().find(|i| &i.id == id))
    }

    pub fn inscriptions_by_learner(
        &self,
        apprenant_id: &UserId,
    ) -> Result<Vec<Inscription>, StoreError> {
        Ok(self
            .inscriptions()?
            .into_iter()
            .filter(|i| &i.apprenant_id == apprenant_id)
            .collect())
    }

    pub fn inscriptions_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Inscription>, StoreError> {
        Ok(self
            .inscriptions()?
            .into_iter()
            .filter(|i| &i.session_id == session_id)
            .collect())
    }

    pub fn append_inscription(&self, inscription: &Inscription) -> Result<(), StoreError> {
        self.append_record(keys::INSCRIPTIONS, "inscriptions", inscription)
    }

    pub fn replace_inscription(&self, inscription: &Inscription) -> Result<(), StoreError> {
        self.replace_record(keys::INSCRIPTIONS, "inscriptions", inscription)
    }

    // Transactions

    pub fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        self.load(keys::TRANSACTIONS, "transactions")
    }

    pub fn transaction_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.transactions()?.into_iter().find(|t| &t.id == id))
    }

    /// A user's transaction history, most recent first.
    pub fn transactions_by_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, StoreError> {
        let mut history: Vec<Transaction> = self
            .transactions()?
            .into_iter()
            .filter(|t| &t.user_id == user_id)
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }

    pub fn append_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.append_record(keys::TRANSACTIONS, "transactions", transaction)
    }

    // Current identity

    /// Persist or clear the active identity pointer.
    pub fn set_current_identity(&self, user_id: Option<&UserId>) -> Result<(), StoreError> {
        match user_id {
            Some(id) => {
                let record = CurrentUserRecord { id: id.clone() };
                let raw = serde_json::to_string(&record).map_err(|err| StoreError::Codec {
                    collection: "current_user",
                    message: err.to_string(),
                })?;
                self.backend.write(keys::CURRENT_USER, &raw)
            }
            None => self.backend.remove(keys::CURRENT_USER),
        }
    }

    /// Resolve the persisted pointer back through the users collection, so
    /// the returned record always reflects the latest stored balance. A
    /// dangling pointer resolves to `None`.
    pub fn current_identity(&self) -> Result<Option<User>, StoreError> {
        let Some(raw) = self.backend.read(keys::CURRENT_USER)? else {
            return Ok(None);
        };
        let record: CurrentUserRecord =
            serde_json::from_str(&raw).map_err(|err| StoreError::Codec {
                collection: "current_user",
                message: err.to_string(),
            })?;
        self.user_by_id(&record.id)
    }
}
