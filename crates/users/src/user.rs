use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use entraide_core::{DomainError, DomainResult, Entity, UserId};

/// Welcome grant credited to every freshly registered account, in points.
///
/// The grant is applied to the balance directly; no transaction line is
/// recorded for it, so a balance reconciles as bonus + signed history sum.
pub const SIGNUP_BONUS: i64 = 50;

/// Declared gender of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sexe {
    Homme,
    Femme,
}

/// Study tracks offered by the institute.
pub const FILIERES: [&str; 8] = [
    "Développement Digital",
    "Infrastructure Digitale",
    "Gestion des Entreprises",
    "Commerce",
    "Comptabilité",
    "Électricité",
    "Mécanique Automobile",
    "Froid et Climatisation",
];

/// Cities with an institute campus.
pub const VILLES: [&str; 15] = [
    "Casablanca",
    "Rabat",
    "Marrakech",
    "Fès",
    "Tanger",
    "Agadir",
    "Meknès",
    "Oujda",
    "Kénitra",
    "Tétouan",
    "Salé",
    "Nador",
    "Mohammedia",
    "El Jadida",
    "Beni Mellal",
];

/// A marketplace member: identity, profile, and point balance.
///
/// The balance is mutated only through [`User::credit`] and [`User::debit`],
/// and only by ledger workflows. Non-negativity is a convention enforced by
/// the enrollment preconditions, not by the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub nom: String,
    pub prenom: String,
    /// Unique across the store, compared case-insensitively.
    pub email: String,
    /// Stored in clear and compared by plain equality. Inherited prototype
    /// behavior; a production build must replace this with a salted hash.
    pub password: String,
    pub age: u8,
    pub ville: String,
    pub sexe: Sexe,
    pub filiere: String,
    /// Year of study (1 or 2).
    pub annee: u8,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: NaiveDate,
}

/// Candidate profile for registration.
///
/// The presentation layer validates well-formedness (non-empty fields,
/// matching password confirmation) before handing the profile over; the
/// domain still rejects blank identity fields as a backstop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    pub age: u8,
    pub ville: String,
    pub sexe: Sexe,
    pub filiere: String,
    pub annee: u8,
    pub avatar: Option<String>,
}

impl User {
    /// Synthesize a new member from a registration profile.
    ///
    /// Grants [`SIGNUP_BONUS`] points and stamps `today` as the creation
    /// date. Uniqueness of the email is the caller's concern (checked
    /// against the store before invoking registration).
    pub fn register(profile: NewUser, today: NaiveDate) -> DomainResult<Self> {
        if profile.nom.trim().is_empty() || profile.prenom.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if profile.email.trim().is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if profile.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }

        Ok(Self {
            id: UserId::generate(),
            nom: profile.nom,
            prenom: profile.prenom,
            email: profile.email,
            password: profile.password,
            age: profile.age,
            ville: profile.ville,
            sexe: profile.sexe,
            filiere: profile.filiere,
            annee: profile.annee,
            points: SIGNUP_BONUS,
            avatar: profile.avatar,
            created_at: today,
        })
    }

    /// Case-insensitive email comparison, matching the store's uniqueness rule.
    pub fn email_matches(&self, other: &str) -> bool {
        self.email.to_lowercase() == other.to_lowercase()
    }

    /// Add points to the balance.
    pub fn credit(&mut self, amount: i64) {
        self.points += amount;
    }

    /// Remove points from the balance.
    pub fn debit(&mut self, amount: i64) {
        self.points -= amount;
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
