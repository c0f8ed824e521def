use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use entraide_core::{DomainError, DomainResult, Entity, InscriptionId, SessionId, UserId};

/// Audit record of one learner joining one session.
///
/// `points_depenses` is copied from the session cost at enrollment time and
/// never tracks later cost edits. After creation the record is only touched
/// to attach a post-session rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inscription {
    pub id: InscriptionId,
    pub session_id: SessionId,
    pub apprenant_id: UserId,
    pub date_inscription: NaiveDate,
    pub points_depenses: i64,
    /// Post-session rating, 1 to 5 stars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
}

impl Inscription {
    /// Record an enrollment, capturing the points spent at this instant.
    pub fn new(
        session_id: SessionId,
        apprenant_id: UserId,
        points_depenses: i64,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: InscriptionId::generate(),
            session_id,
            apprenant_id,
            date_inscription: today,
            points_depenses,
            note: None,
            commentaire: None,
        }
    }

    /// Attach a post-session rating. The comment is stored only when given.
    pub fn rate(&mut self, note: u8, commentaire: Option<String>) -> DomainResult<()> {
        if !(1..=5).contains(&note) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }
        self.note = Some(note);
        if commentaire.is_some() {
            self.commentaire = commentaire;
        }
        Ok(())
    }
}

impl Entity for Inscription {
    type Id = InscriptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
