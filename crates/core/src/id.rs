//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are prefixed strings (`user-…`, `session-…`) to stay
//! compatible with records persisted by earlier builds; freshly generated
//! ids embed a time-ordered UUIDv7 behind the prefix.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a user (member of the marketplace).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a tutoring session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

/// Identifier of an enrollment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InscriptionId(String);

/// Identifier of a points transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

macro_rules! impl_prefixed_id {
    ($t:ty, $prefix:literal, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered) under the kind prefix. Prefer
            /// passing ids explicitly in tests for determinism.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), Uuid::now_v7()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": empty")));
                }
                Ok(Self(s.to_owned()))
            }
        }
    };
}

impl_prefixed_id!(UserId, "user", "UserId");
impl_prefixed_id!(SessionId, "session", "SessionId");
impl_prefixed_id!(InscriptionId, "inscription", "InscriptionId");
impl_prefixed_id!(TransactionId, "trans", "TransactionId");
