use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use entraide_core::{Entity, TransactionId, UserId};

/// Direction of a points movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Simulated purchase of points.
    Achat,
    /// Points earned by organizing a session.
    Gain,
    /// Points spent enrolling in a session.
    Depense,
}

/// Payment method for simulated purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Carte,
    CashPlus,
}

/// An immutable ledger line: append-only, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Points moved, always positive; the sign comes from the kind.
    pub montant: i64,
    pub description: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methode: Option<PaymentMethod>,
}

impl Transaction {
    fn new(
        user_id: UserId,
        kind: TransactionKind,
        montant: i64,
        description: String,
        date: NaiveDate,
        methode: Option<PaymentMethod>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind,
            montant,
            description,
            date,
            methode,
        }
    }

    /// Record a simulated purchase of points.
    pub fn purchase(
        user_id: UserId,
        montant: i64,
        description: impl Into<String>,
        methode: Option<PaymentMethod>,
        today: NaiveDate,
    ) -> Self {
        Self::new(
            user_id,
            TransactionKind::Achat,
            montant,
            description.into(),
            today,
            methode,
        )
    }

    /// Record points earned by an organizer.
    pub fn earning(
        user_id: UserId,
        montant: i64,
        description: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self::new(
            user_id,
            TransactionKind::Gain,
            montant,
            description.into(),
            today,
            None,
        )
    }

    /// Record points spent by a learner.
    pub fn spending(
        user_id: UserId,
        montant: i64,
        description: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self::new(
            user_id,
            TransactionKind::Depense,
            montant,
            description.into(),
            today,
            None,
        )
    }

    /// Amount with the sign implied by the kind: purchases and earnings add
    /// to a balance, spending subtracts.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Achat | TransactionKind::Gain => self.montant,
            TransactionKind::Depense => -self.montant,
        }
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn test_user_id() -> UserId {
        UserId::from_str("user-1").unwrap()
    }

    fn test_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    }

    #[test]
    fn purchase_carries_its_payment_method() {
        let tx = Transaction::purchase(
            test_user_id(),
            100,
            "Achat de points via carte bancaire",
            Some(PaymentMethod::Carte),
            test_today(),
        );

        assert_eq!(tx.kind, TransactionKind::Achat);
        assert_eq!(tx.methode, Some(PaymentMethod::Carte));
        assert!(tx.id.as_str().starts_with("trans-"));
    }

    #[test]
    fn earning_and_spending_have_no_payment_method() {
        let gain = Transaction::earning(test_user_id(), 15, "Session: Réseaux", test_today());
        let depense =
            Transaction::spending(test_user_id(), 15, "Inscription: Réseaux", test_today());

        assert_eq!(gain.kind, TransactionKind::Gain);
        assert_eq!(depense.kind, TransactionKind::Depense);
        assert_eq!(gain.methode, None);
        assert_eq!(depense.methode, None);
    }

    #[test]
    fn signed_amount_follows_the_kind() {
        let achat = Transaction::purchase(
            test_user_id(),
            100,
            "Achat",
            Some(PaymentMethod::CashPlus),
            test_today(),
        );
        let gain = Transaction::earning(test_user_id(), 20, "Session", test_today());
        let depense = Transaction::spending(test_user_id(), 20, "Inscription", test_today());

        assert_eq!(achat.signed_amount(), 100);
        assert_eq!(gain.signed_amount(), 20);
        assert_eq!(depense.signed_amount(), -20);
    }
}
