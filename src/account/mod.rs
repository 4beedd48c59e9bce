//! Account management for the library core.
//!
//! Covers the credential lifecycle: registration, activation,
//! authentication, password change and renewal, password expiration, and
//! security-question verification.

mod password;
mod questions;
mod service;
mod types;

pub use password::{Argon2Hasher, CredentialHasher};
pub use questions::QUESTIONS;
pub use service::AccountService;
pub use types::{NewUser, PasswordHistoryEntry, User, UserStatus};
