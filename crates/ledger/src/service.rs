use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

use entraide_core::{DomainError, InscriptionId, SessionId, UserId};
use entraide_points::{PaymentMethod, Transaction};
use entraide_sessions::{EnrollmentError, Inscription, NewSession, Session};
use entraide_store::{EntityStore, StorageBackend, StoreError};
use entraide_users::{NewUser, User};

/// Ledger workflow error.
///
/// The enrollment variants are expected business-rule rejections, surfaced
/// to the end user as a descriptive notice and recovered locally. Store
/// errors are fatal for the current operation and never retried.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The ledger engine: every points-affecting workflow routes through here.
///
/// Each workflow runs inside a single critical section, so its multi-write
/// sequence is observably atomic to other in-process callers. All reads
/// happen after the lock is taken: a workflow always decides against the
/// current persisted state, never against a snapshot captured before a
/// user-interaction delay. Cross-process callers sharing one file-backed
/// store remain unguarded; the file store has no cross-process lock.
#[derive(Debug)]
pub struct LedgerService<B> {
    store: Arc<EntityStore<B>>,
    write_lock: Mutex<()>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<B: StorageBackend> LedgerService<B> {
    pub fn new(store: Arc<EntityStore<B>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Read-only access to the underlying store, for queries.
    pub fn store(&self) -> &EntityStore<B> {
        &self.store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, LedgerError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".to_string()).into())
    }

    /// Create an account from a pre-validated profile.
    ///
    /// Grants the signup bonus, appends the user, and makes it the current
    /// identity. Email uniqueness is the caller's precondition, checked via
    /// [`EntityStore::user_by_email`] before invoking this; the workflow
    /// itself does not re-check. The bonus is not itself logged as a
    /// transaction.
    pub fn register(&self, profile: NewUser) -> Result<User, LedgerError> {
        let _guard = self.lock()?;

        let user = User::register(profile, today())?;
        self.store.append_user(&user)?;
        self.store.set_current_identity(Some(&user.id))?;

        info!(user_id = %user.id, points = user.points, "member registered");
        Ok(user)
    }

    /// Publish a session offer. No points move at creation time; the
    /// organizer is paid as learners enroll.
    pub fn create_session(&self, new: NewSession) -> Result<Session, LedgerError> {
        let _guard = self.lock()?;

        let session = Session::create(new, today())?;
        self.store.append_session(&session)?;

        info!(
            session_id = %session.id,
            module = %session.module,
            cout = session.cout,
            "session created"
        );
        Ok(session)
    }

    /// Enroll a learner into a session.
    ///
    /// Session, learner, and organizer are re-fetched under the lock, so
    /// the preconditions run against current persisted state. Once they
    /// pass, the commit applies in a fixed order: participant list, learner
    /// debit, organizer credit, inscription record, then the two ledger
    /// lines. A store failure mid-sequence leaves the earlier writes
    /// applied; there is no rollback in this storage model.
    pub fn enroll(
        &self,
        session_id: &SessionId,
        learner_id: &UserId,
    ) -> Result<Inscription, LedgerError> {
        let _guard = self.lock()?;

        let mut session =
            self.store
                .session_by_id(session_id)?
                .ok_or_else(|| StoreError::NotFound {
                    collection: "sessions",
                    id: session_id.to_string(),
                })?;
        let mut learner =
            self.store
                .user_by_id(learner_id)?
                .ok_or_else(|| StoreError::NotFound {
                    collection: "users",
                    id: learner_id.to_string(),
                })?;

        session.check_enrollment(&learner)?;

        let mut organizer =
            self.store
                .user_by_id(&session.aideur_id)?
                .ok_or_else(|| StoreError::NotFound {
                    collection: "users",
                    id: session.aideur_id.to_string(),
                })?;

        let enrollment_date = today();
        let cout = session.cout;

        session.add_participant(learner.id.clone());
        self.store.replace_session(&session)?;

        learner.debit(cout);
        self.store.replace_user(&learner)?;

        organizer.credit(cout);
        self.store.replace_user(&organizer)?;

        let inscription = Inscription::new(
            session.id.clone(),
            learner.id.clone(),
            cout,
            enrollment_date,
        );
        self.store.append_inscription(&inscription)?;

        self.store.append_transaction(&Transaction::spending(
            learner.id.clone(),
            cout,
            format!("Inscription: {}", session.module),
            enrollment_date,
        ))?;
        self.store.append_transaction(&Transaction::earning(
            organizer.id.clone(),
            cout,
            format!("Session: {}", session.module),
            enrollment_date,
        ))?;

        info!(
            session_id = %session.id,
            learner_id = %learner.id,
            organizer_id = %organizer.id,
            cout,
            "enrollment committed"
        );
        Ok(inscription)
    }

    /// Credit purchased points to a user.
    ///
    /// Unconditional beyond the positive-amount check: purchases are
    /// simulated, there is no payment gateway behind this workflow.
    pub fn grant_points(
        &self,
        user_id: &UserId,
        amount: i64,
        description: impl Into<String>,
        methode: Option<PaymentMethod>,
    ) -> Result<Transaction, LedgerError> {
        if amount <= 0 {
            return Err(DomainError::validation("amount must be positive").into());
        }

        let _guard = self.lock()?;

        let mut user = self
            .store
            .user_by_id(user_id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: "users",
                id: user_id.to_string(),
            })?;

        user.credit(amount);
        self.store.replace_user(&user)?;

        let transaction =
            Transaction::purchase(user.id.clone(), amount, description, methode, today());
        self.store.append_transaction(&transaction)?;

        info!(user_id = %user.id, amount, "points purchased");
        Ok(transaction)
    }

    /// Attach a post-session rating to an enrollment record.
    pub fn rate_session(
        &self,
        inscription_id: &InscriptionId,
        note: u8,
        commentaire: Option<String>,
    ) -> Result<Inscription, LedgerError> {
        let _guard = self.lock()?;

        let mut inscription =
            self.store
                .inscription_by_id(inscription_id)?
                .ok_or_else(|| StoreError::NotFound {
                    collection: "inscriptions",
                    id: inscription_id.to_string(),
                })?;

        inscription.rate(note, commentaire)?;
        self.store.replace_inscription(&inscription)?;

        info!(inscription_id = %inscription.id, note, "session rated");
        Ok(inscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entraide_sessions::SessionMode;
    use entraide_store::MemoryBackend;
    use entraide_users::{Sexe, SIGNUP_BONUS};
    use proptest::prelude::*;

    fn test_service() -> LedgerService<MemoryBackend> {
        LedgerService::new(Arc::new(EntityStore::new(MemoryBackend::new())))
    }

    fn test_profile(name: &str) -> NewUser {
        NewUser {
            nom: name.to_string(),
            prenom: name.to_string(),
            email: format!("{name}@cmc.ma"),
            password: "password123".to_string(),
            age: 20,
            ville: "Casablanca".to_string(),
            sexe: Sexe::Homme,
            filiere: "Développement Digital".to_string(),
            annee: 2,
            avatar: None,
        }
    }

    /// Register a member and pin the balance to an exact value.
    fn member_with_points(service: &LedgerService<MemoryBackend>, name: &str, points: i64) -> User {
        let mut user = service.register(test_profile(name)).unwrap();
        user.points = points;
        service.store().replace_user(&user).unwrap();
        user
    }

    fn test_new_session(aideur_id: UserId, cout: i64, capacity: u32) -> NewSession {
        NewSession {
            aideur_id,
            module: "Programmation Web".to_string(),
            date: NaiveDate::from_ymd_opt(2027, 6, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            duree: 90,
            mode: SessionMode::EnLigne,
            cout,
            description: "Révision générale.".to_string(),
            lieu: None,
            lien_reunion: None,
            max_participants: capacity,
        }
    }

    fn total_points(service: &LedgerService<MemoryBackend>) -> i64 {
        service
            .store()
            .users()
            .unwrap()
            .iter()
            .map(|u| u.points)
            .sum()
    }

    #[test]
    fn register_grants_bonus_and_sets_current_identity() {
        let service = test_service();

        let user = service.register(test_profile("youssef")).unwrap();

        assert_eq!(user.points, SIGNUP_BONUS);
        let current = service.store().current_identity().unwrap().unwrap();
        assert_eq!(current.id, user.id);
        // The bonus has no matching ledger line.
        assert!(service.store().transactions().unwrap().is_empty());
    }

    #[test]
    fn create_session_moves_no_points() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);

        let session = service
            .create_session(test_new_session(organizer.id.clone(), 20, 10))
            .unwrap();

        assert!(session.is_upcoming());
        assert!(session.participants.is_empty());
        assert_eq!(
            service.store().user_by_id(&organizer.id).unwrap().unwrap().points,
            100
        );
        assert!(service.store().transactions().unwrap().is_empty());
    }

    #[test]
    fn enrollment_moves_points_and_records_history() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let learner = member_with_points(&service, "fatima", 20);
        let session = service
            .create_session(test_new_session(organizer.id.clone(), 15, 1))
            .unwrap();

        let inscription = service.enroll(&session.id, &learner.id).unwrap();

        assert_eq!(inscription.points_depenses, 15);

        let store = service.store();
        assert_eq!(store.user_by_id(&learner.id).unwrap().unwrap().points, 5);
        assert_eq!(store.user_by_id(&organizer.id).unwrap().unwrap().points, 115);

        let session = store.session_by_id(&session.id).unwrap().unwrap();
        assert_eq!(session.participants, vec![learner.id.clone()]);

        let learner_history = store.transactions_by_user(&learner.id).unwrap();
        assert_eq!(learner_history.len(), 1);
        assert_eq!(learner_history[0].signed_amount(), -15);
        assert_eq!(learner_history[0].description, "Inscription: Programmation Web");

        let organizer_history = store.transactions_by_user(&organizer.id).unwrap();
        assert_eq!(organizer_history.len(), 1);
        assert_eq!(organizer_history[0].signed_amount(), 15);
        assert_eq!(organizer_history[0].description, "Session: Programmation Web");
    }

    #[test]
    fn enrollment_conserves_total_points() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let learner = member_with_points(&service, "fatima", 20);
        let session = service
            .create_session(test_new_session(organizer.id, 15, 5))
            .unwrap();

        let before = total_points(&service);
        service.enroll(&session.id, &learner.id).unwrap();

        assert_eq!(total_points(&service), before);
    }

    #[test]
    fn self_enrollment_is_rejected_without_state_change() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let session = service
            .create_session(test_new_session(organizer.id.clone(), 15, 5))
            .unwrap();

        let err = service.enroll(&session.id, &organizer.id).unwrap_err();
        match err {
            LedgerError::Enrollment(EnrollmentError::SelfEnrollmentForbidden) => {}
            other => panic!("expected SelfEnrollmentForbidden, got {other:?}"),
        }

        let store = service.store();
        assert_eq!(store.user_by_id(&organizer.id).unwrap().unwrap().points, 100);
        assert!(store.session_by_id(&session.id).unwrap().unwrap().participants.is_empty());
        assert!(store.inscriptions().unwrap().is_empty());
        assert!(store.transactions().unwrap().is_empty());
    }

    #[test]
    fn re_enrollment_is_an_idempotent_rejection() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let learner = member_with_points(&service, "fatima", 50);
        let session = service
            .create_session(test_new_session(organizer.id, 15, 5))
            .unwrap();

        service.enroll(&session.id, &learner.id).unwrap();
        let balance_after_first = service
            .store()
            .user_by_id(&learner.id)
            .unwrap()
            .unwrap()
            .points;

        let err = service.enroll(&session.id, &learner.id).unwrap_err();
        match err {
            LedgerError::Enrollment(EnrollmentError::AlreadyEnrolled) => {}
            other => panic!("expected AlreadyEnrolled, got {other:?}"),
        }

        let store = service.store();
        assert_eq!(
            store.user_by_id(&learner.id).unwrap().unwrap().points,
            balance_after_first
        );
        assert_eq!(store.session_by_id(&session.id).unwrap().unwrap().participants.len(), 1);
        assert_eq!(store.inscriptions().unwrap().len(), 1);
        assert_eq!(store.transactions().unwrap().len(), 2);
    }

    #[test]
    fn insufficient_balance_leaves_everything_unchanged() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let learner = member_with_points(&service, "fatima", 10);
        let session = service
            .create_session(test_new_session(organizer.id.clone(), 15, 1))
            .unwrap();

        let err = service.enroll(&session.id, &learner.id).unwrap_err();
        match err {
            LedgerError::Enrollment(EnrollmentError::InsufficientPoints {
                required: 15,
                available: 10,
            }) => {}
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }

        let store = service.store();
        assert_eq!(store.user_by_id(&learner.id).unwrap().unwrap().points, 10);
        assert_eq!(store.user_by_id(&organizer.id).unwrap().unwrap().points, 100);
        assert!(store.session_by_id(&session.id).unwrap().unwrap().participants.is_empty());
    }

    #[test]
    fn full_session_rejects_the_next_learner() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let first = member_with_points(&service, "fatima", 50);
        let second = member_with_points(&service, "ahmed", 50);
        let session = service
            .create_session(test_new_session(organizer.id, 15, 1))
            .unwrap();

        service.enroll(&session.id, &first.id).unwrap();

        let err = service.enroll(&session.id, &second.id).unwrap_err();
        match err {
            LedgerError::Enrollment(EnrollmentError::SessionFull { capacity: 1 }) => {}
            other => panic!("expected SessionFull, got {other:?}"),
        }
        assert_eq!(
            service.store().user_by_id(&second.id).unwrap().unwrap().points,
            50
        );
    }

    #[test]
    fn enroll_on_unknown_session_is_not_found() {
        let service = test_service();
        let learner = member_with_points(&service, "fatima", 50);
        let missing: SessionId = "session-missing".parse().unwrap();

        let err = service.enroll(&missing, &learner.id).unwrap_err();
        match err {
            LedgerError::Store(StoreError::NotFound { collection, .. }) => {
                assert_eq!(collection, "sessions");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn grant_points_credits_and_records_a_purchase() {
        let service = test_service();
        let user = member_with_points(&service, "youssef", 30);

        let transaction = service
            .grant_points(
                &user.id,
                110,
                "Achat de points via carte bancaire",
                Some(PaymentMethod::Carte),
            )
            .unwrap();

        assert_eq!(transaction.signed_amount(), 110);
        assert_eq!(transaction.methode, Some(PaymentMethod::Carte));
        assert_eq!(
            service.store().user_by_id(&user.id).unwrap().unwrap().points,
            140
        );
    }

    #[test]
    fn grant_points_rejects_non_positive_amounts() {
        let service = test_service();
        let user = member_with_points(&service, "youssef", 30);

        assert!(service.grant_points(&user.id, 0, "Achat", None).is_err());
        assert!(service.grant_points(&user.id, -5, "Achat", None).is_err());
        assert_eq!(
            service.store().user_by_id(&user.id).unwrap().unwrap().points,
            30
        );
    }

    #[test]
    fn rate_session_attaches_note_to_the_inscription() {
        let service = test_service();
        let organizer = member_with_points(&service, "youssef", 100);
        let learner = member_with_points(&service, "fatima", 50);
        let session = service
            .create_session(test_new_session(organizer.id, 15, 5))
            .unwrap();
        let inscription = service.enroll(&session.id, &learner.id).unwrap();

        let rated = service
            .rate_session(&inscription.id, 5, Some("Très claire!".to_string()))
            .unwrap();

        assert_eq!(rated.note, Some(5));
        let stored = service
            .store()
            .inscription_by_id(&inscription.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.commentaire.as_deref(), Some("Très claire!"));
    }

    #[test]
    fn rate_session_on_unknown_inscription_is_not_found() {
        let service = test_service();
        let missing: InscriptionId = "inscription-missing".parse().unwrap();

        let err = service.rate_session(&missing, 4, None).unwrap_err();
        match err {
            LedgerError::Store(StoreError::NotFound { collection, .. }) => {
                assert_eq!(collection, "inscriptions");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: whatever mix of learners attempts to enroll, the total
        /// number of points across all users never changes, and the
        /// participant list never exceeds the capacity.
        #[test]
        fn enrollment_sequences_conserve_points_and_respect_capacity(
            balances in prop::collection::vec(0i64..100, 1..10),
            cout in 0i64..50,
            capacity in 1u32..6,
        ) {
            let service = test_service();
            let organizer = member_with_points(&service, "organizer", 100);
            let learners: Vec<User> = balances
                .iter()
                .enumerate()
                .map(|(i, balance)| {
                    member_with_points(&service, &format!("learner{i}"), *balance)
                })
                .collect();
            let session = service
                .create_session(test_new_session(organizer.id, cout, capacity))
                .unwrap();

            let before = total_points(&service);

            let mut successes = 0u32;
            for learner in &learners {
                match service.enroll(&session.id, &learner.id) {
                    Ok(_) => successes += 1,
                    Err(LedgerError::Enrollment(_)) => {}
                    Err(other) => panic!("unexpected failure: {other:?}"),
                }
            }

            prop_assert_eq!(total_points(&service), before);

            let stored = service.store().session_by_id(&session.id).unwrap().unwrap();
            prop_assert!(stored.participants.len() as u32 <= capacity);
            prop_assert_eq!(stored.participants.len() as u32, successes);

            // Every successful enrollment debited exactly the cost.
            for learner in &learners {
                let stored_learner = service.store().user_by_id(&learner.id).unwrap().unwrap();
                if stored.participants.contains(&learner.id) {
                    prop_assert_eq!(stored_learner.points, learner.points - cout);
                } else {
                    prop_assert_eq!(stored_learner.points, learner.points);
                }
            }
        }
    }
}
