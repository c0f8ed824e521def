//! Users domain module (marketplace members and their point balances).
//!
//! Pure domain logic only: no IO, no storage concerns.

pub mod user;

pub use user::{NewUser, Sexe, User, FILIERES, SIGNUP_BONUS, VILLES};
