use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use entraide_core::{DomainError, DomainResult, Entity, SessionId, UserId};
use entraide_users::User;

/// Academic modules sessions are commonly offered on.
pub const MODULES: [&str; 14] = [
    "Programmation Web",
    "Base de données",
    "Réseaux informatiques",
    "Anglais technique",
    "Français professionnel",
    "Mathématiques",
    "Comptabilité générale",
    "Marketing",
    "Gestion de projet",
    "Électronique",
    "Mécanique",
    "Dessin technique",
    "Communication",
    "Droit des affaires",
];

/// Delivery mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    EnLigne,
    Presentiel,
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    AVenir,
    EnCours,
    Terminee,
    Annulee,
}

/// Enrollment precondition failures.
///
/// These are expected business-rule rejections: the caller surfaces them to
/// the end user as a non-fatal notice, no retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// The organizer tried to join their own session.
    #[error("cannot enroll in your own session")]
    SelfEnrollmentForbidden,

    /// The learner is already on the participant list. A no-op from the
    /// caller's perspective: no state was changed.
    #[error("already enrolled in this session")]
    AlreadyEnrolled,

    /// The learner's balance does not cover the session cost.
    #[error("insufficient points: {required} required, {available} available")]
    InsufficientPoints { required: i64, available: i64 },

    /// The session reached its capacity.
    #[error("session is full ({capacity} participants max)")]
    SessionFull { capacity: u32 },
}

/// An offer to teach a module at a scheduled time.
///
/// Invariants: `participants.len() <= max_participants`, the organizer never
/// appears in `participants`, and a participant appears at most once. All
/// three are guarded by [`Session::check_enrollment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    /// The organizer teaching this session.
    pub aideur_id: UserId,
    pub module: String,
    /// Scheduled start, wall-clock local time.
    pub date: NaiveDateTime,
    /// Duration in minutes.
    pub duree: u32,
    pub mode: SessionMode,
    /// Per-seat cost in points.
    pub cout: i64,
    pub description: String,
    /// Venue, populated for in-person sessions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu: Option<String>,
    /// Meeting link, populated for online sessions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lien_reunion: Option<String>,
    pub max_participants: u32,
    /// Enrollment order, no duplicates.
    pub participants: Vec<UserId>,
    pub status: SessionStatus,
    pub created_at: NaiveDate,
}

/// Candidate fields for session creation.
///
/// The presentation layer guarantees the schedule is strictly in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub aideur_id: UserId,
    pub module: String,
    pub date: NaiveDateTime,
    pub duree: u32,
    pub mode: SessionMode,
    pub cout: i64,
    pub description: String,
    pub lieu: Option<String>,
    pub lien_reunion: Option<String>,
    pub max_participants: u32,
}

impl Session {
    /// Synthesize a new session offer.
    ///
    /// Starts life as `a_venir` with an empty participant list. Exactly one
    /// location field survives, determined by the mode: in-person requires a
    /// venue; online keeps the meeting link, falling back to a generated one
    /// when the organizer left it blank.
    pub fn create(new: NewSession, today: NaiveDate) -> DomainResult<Self> {
        if new.module.trim().is_empty() {
            return Err(DomainError::validation("module cannot be empty"));
        }
        if new.cout < 0 {
            return Err(DomainError::validation("cost cannot be negative"));
        }
        if new.max_participants == 0 {
            return Err(DomainError::validation("capacity must be at least 1"));
        }

        let id = SessionId::generate();

        let (lieu, lien_reunion) = match new.mode {
            SessionMode::Presentiel => {
                let venue = new
                    .lieu
                    .filter(|l| !l.trim().is_empty())
                    .ok_or_else(|| DomainError::validation("in-person session requires a venue"))?;
                (Some(venue), None)
            }
            SessionMode::EnLigne => {
                let link = new
                    .lien_reunion
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| format!("https://meet.example.com/{id}"));
                (None, Some(link))
            }
        };

        Ok(Self {
            id,
            aideur_id: new.aideur_id,
            module: new.module,
            date: new.date,
            duree: new.duree,
            mode: new.mode,
            cout: new.cout,
            description: new.description,
            lieu,
            lien_reunion,
            max_participants: new.max_participants,
            participants: Vec::new(),
            status: SessionStatus::AVenir,
            created_at: today,
        })
    }

    pub fn is_upcoming(&self) -> bool {
        self.status == SessionStatus::AVenir
    }

    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }

    pub fn remaining_seats(&self) -> u32 {
        self.max_participants.saturating_sub(self.participants.len() as u32)
    }

    /// Gate every enrollment attempt. Checks run in a fixed order and the
    /// first failure wins:
    ///
    /// 1. the learner is not the organizer,
    /// 2. the learner is not already enrolled,
    /// 3. the learner's balance covers the cost,
    /// 4. a seat is still free.
    pub fn check_enrollment(&self, learner: &User) -> Result<(), EnrollmentError> {
        if learner.id == self.aideur_id {
            return Err(EnrollmentError::SelfEnrollmentForbidden);
        }
        if self.has_participant(&learner.id) {
            return Err(EnrollmentError::AlreadyEnrolled);
        }
        if learner.points < self.cout {
            return Err(EnrollmentError::InsufficientPoints {
                required: self.cout,
                available: learner.points,
            });
        }
        if self.is_full() {
            return Err(EnrollmentError::SessionFull {
                capacity: self.max_participants,
            });
        }
        Ok(())
    }

    /// Append a learner to the participant list, in enrollment order.
    ///
    /// Callers must have passed [`Session::check_enrollment`] first.
    pub fn add_participant(&mut self, user_id: UserId) {
        self.participants.push(user_id);
    }
}

impl Entity for Session {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
