//! Demo seed dataset.
//!
//! First-run bootstrap: each collection whose key is absent from the backend
//! is pre-populated with a fixed demo dataset (4 users, 4 sessions,
//! 4 inscriptions, 4 transactions). An existing key — even one holding an
//! empty array — is left untouched.

use core::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use entraide_core::{InscriptionId, SessionId, TransactionId, UserId};
use entraide_points::{PaymentMethod, Transaction, TransactionKind};
use entraide_sessions::{Inscription, Session, SessionMode, SessionStatus};
use entraide_users::{Sexe, User};

use crate::backend::StorageBackend;
use crate::error::StoreError;
use crate::store::{keys, EntityStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("valid fixture time")
}

fn user_id(raw: &str) -> UserId {
    UserId::from_str(raw).expect("valid fixture id")
}

/// The four demo members.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: user_id("user-1"),
            nom: "Bennani".to_string(),
            prenom: "Youssef".to_string(),
            email: "youssef.bennani@cmc.ma".to_string(),
            password: "password123".to_string(),
            age: 20,
            ville: "Casablanca".to_string(),
            sexe: Sexe::Homme,
            filiere: "Développement Digital".to_string(),
            annee: 2,
            points: 150,
            avatar: None,
            created_at: date(2024, 1, 15),
        },
        User {
            id: user_id("user-2"),
            nom: "El Amrani".to_string(),
            prenom: "Fatima".to_string(),
            email: "fatima.elamrani@cmc.ma".to_string(),
            password: "password123".to_string(),
            age: 19,
            ville: "Rabat".to_string(),
            sexe: Sexe::Femme,
            filiere: "Gestion des Entreprises".to_string(),
            annee: 1,
            points: 80,
            avatar: None,
            created_at: date(2024, 2, 10),
        },
        User {
            id: user_id("user-3"),
            nom: "Tazi".to_string(),
            prenom: "Ahmed".to_string(),
            email: "ahmed.tazi@cmc.ma".to_string(),
            password: "password123".to_string(),
            age: 21,
            ville: "Marrakech".to_string(),
            sexe: Sexe::Homme,
            filiere: "Infrastructure Digitale".to_string(),
            annee: 2,
            points: 200,
            avatar: None,
            created_at: date(2024, 1, 20),
        },
        User {
            id: user_id("user-4"),
            nom: "Chraibi".to_string(),
            prenom: "Sara".to_string(),
            email: "sara.chraibi@cmc.ma".to_string(),
            password: "password123".to_string(),
            age: 20,
            ville: "Fès".to_string(),
            sexe: Sexe::Femme,
            filiere: "Développement Digital".to_string(),
            annee: 2,
            points: 120,
            avatar: None,
            created_at: date(2024, 3, 5),
        },
    ]
}

/// The four demo sessions.
pub fn demo_sessions() -> Vec<Session> {
    vec![
        Session {
            id: SessionId::from_str("session-1").expect("valid fixture id"),
            aideur_id: user_id("user-1"),
            module: "Programmation Web".to_string(),
            date: datetime(2025, 2, 15, 14, 0),
            duree: 90,
            mode: SessionMode::EnLigne,
            cout: 20,
            description: "Session de révision sur HTML, CSS et JavaScript. Nous allons revoir les bases et faire des exercices pratiques.".to_string(),
            lieu: None,
            lien_reunion: Some("https://meet.example.com/session-1".to_string()),
            max_participants: 10,
            participants: vec![user_id("user-2")],
            status: SessionStatus::AVenir,
            created_at: date(2025, 2, 1),
        },
        Session {
            id: SessionId::from_str("session-2").expect("valid fixture id"),
            aideur_id: user_id("user-3"),
            module: "Réseaux informatiques".to_string(),
            date: datetime(2025, 2, 12, 10, 0),
            duree: 60,
            mode: SessionMode::Presentiel,
            cout: 15,
            description: "Configuration des réseaux LAN et WLAN. Apportez vos ordinateurs portables!".to_string(),
            lieu: Some("Salle B12, CMC Casablanca".to_string()),
            lien_reunion: None,
            max_participants: 8,
            participants: vec![user_id("user-1"), user_id("user-4")],
            status: SessionStatus::AVenir,
            created_at: date(2025, 2, 2),
        },
        Session {
            id: SessionId::from_str("session-3").expect("valid fixture id"),
            aideur_id: user_id("user-4"),
            module: "Base de données".to_string(),
            date: datetime(2025, 2, 10, 16, 0),
            duree: 120,
            mode: SessionMode::EnLigne,
            cout: 25,
            description: "SQL avancé : jointures, sous-requêtes et optimisation. Niveau intermédiaire requis.".to_string(),
            lieu: None,
            lien_reunion: Some("https://meet.example.com/session-3".to_string()),
            max_participants: 15,
            participants: vec![user_id("user-2")],
            status: SessionStatus::Terminee,
            created_at: date(2025, 2, 1),
        },
        Session {
            id: SessionId::from_str("session-4").expect("valid fixture id"),
            aideur_id: user_id("user-1"),
            module: "Gestion de projet".to_string(),
            date: datetime(2025, 2, 20, 9, 0),
            duree: 90,
            mode: SessionMode::Presentiel,
            cout: 18,
            description: "Introduction à la méthode Agile et Scrum. Idéal pour les débutants.".to_string(),
            lieu: Some("Salle A5, CMC Rabat".to_string()),
            lien_reunion: None,
            max_participants: 12,
            participants: Vec::new(),
            status: SessionStatus::AVenir,
            created_at: date(2025, 2, 5),
        },
    ]
}

/// The four demo enrollment records.
pub fn demo_inscriptions() -> Vec<Inscription> {
    vec![
        Inscription {
            id: InscriptionId::from_str("inscription-1").expect("valid fixture id"),
            session_id: SessionId::from_str("session-1").expect("valid fixture id"),
            apprenant_id: user_id("user-2"),
            date_inscription: date(2025, 2, 3),
            points_depenses: 20,
            note: None,
            commentaire: None,
        },
        Inscription {
            id: InscriptionId::from_str("inscription-2").expect("valid fixture id"),
            session_id: SessionId::from_str("session-2").expect("valid fixture id"),
            apprenant_id: user_id("user-1"),
            date_inscription: date(2025, 2, 4),
            points_depenses: 15,
            note: None,
            commentaire: None,
        },
        Inscription {
            id: InscriptionId::from_str("inscription-3").expect("valid fixture id"),
            session_id: SessionId::from_str("session-2").expect("valid fixture id"),
            apprenant_id: user_id("user-4"),
            date_inscription: date(2025, 2, 5),
            points_depenses: 15,
            note: None,
            commentaire: None,
        },
        Inscription {
            id: InscriptionId::from_str("inscription-4").expect("valid fixture id"),
            session_id: SessionId::from_str("session-3").expect("valid fixture id"),
            apprenant_id: user_id("user-2"),
            date_inscription: date(2025, 2, 2),
            points_depenses: 25,
            note: Some(5),
            commentaire: Some("Excellente explication, très claire!".to_string()),
        },
    ]
}

/// The four demo ledger lines.
pub fn demo_transactions() -> Vec<Transaction> {
    vec![
        Transaction {
            id: TransactionId::from_str("trans-1").expect("valid fixture id"),
            user_id: user_id("user-1"),
            kind: TransactionKind::Achat,
            montant: 100,
            description: "Achat de points via carte bancaire".to_string(),
            date: date(2025, 1, 20),
            methode: Some(PaymentMethod::Carte),
        },
        Transaction {
            id: TransactionId::from_str("trans-2").expect("valid fixture id"),
            user_id: user_id("user-1"),
            kind: TransactionKind::Gain,
            montant: 50,
            description: "Session: Programmation Web (2 participants)".to_string(),
            date: date(2025, 2, 1),
            methode: None,
        },
        Transaction {
            id: TransactionId::from_str("trans-3").expect("valid fixture id"),
            user_id: user_id("user-2"),
            kind: TransactionKind::Depense,
            montant: 20,
            description: "Inscription: Programmation Web".to_string(),
            date: date(2025, 2, 3),
            methode: None,
        },
        Transaction {
            id: TransactionId::from_str("trans-4").expect("valid fixture id"),
            user_id: user_id("user-2"),
            kind: TransactionKind::Achat,
            montant: 50,
            description: "Achat de points via Cash Plus".to_string(),
            date: date(2025, 1, 25),
            methode: Some(PaymentMethod::CashPlus),
        },
    ]
}

/// Populate every absent collection with the demo dataset.
///
/// Collections whose key already exists are left alone, so a store that was
/// emptied on purpose stays empty.
pub fn ensure_seeded<B: StorageBackend>(store: &EntityStore<B>) -> Result<(), StoreError> {
    if store.backend.read(keys::USERS)?.is_none() {
        store.save(keys::USERS, "users", &demo_users())?;
    }
    if store.backend.read(keys::SESSIONS)?.is_none() {
        store.save(keys::SESSIONS, "sessions", &demo_sessions())?;
    }
    if store.backend.read(keys::INSCRIPTIONS)?.is_none() {
        store.save(keys::INSCRIPTIONS, "inscriptions", &demo_inscriptions())?;
    }
    if store.backend.read(keys::TRANSACTIONS)?.is_none() {
        store.save(keys::TRANSACTIONS, "transactions", &demo_transactions())?;
    }
    Ok(())
}
