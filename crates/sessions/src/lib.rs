//! Sessions domain module (tutoring offers and enrollment records).
//!
//! Pure domain logic only: capacity and participation invariants live here,
//! points movement lives in the ledger.

pub mod inscription;
pub mod session;

pub use inscription::Inscription;
pub use session::{
    EnrollmentError, NewSession, Session, SessionMode, SessionStatus, MODULES,
};
