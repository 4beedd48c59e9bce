//! biblio - Library lending core
//!
//! Reservation and stock tracking with per-user borrowing limits, and the
//! account credential lifecycle: registration, activation, authentication,
//! password renewal with reuse history, and security-question verification.

pub mod account;
pub mod config;
pub mod error;
pub mod lending;
pub mod library;
pub mod logging;
pub mod notify;
pub mod store;

pub use account::{
    AccountService, Argon2Hasher, CredentialHasher, NewUser, PasswordHistoryEntry, User,
    UserStatus, QUESTIONS,
};
pub use config::{Config, CredentialConfig, LendingConfig, LoggingConfig};
pub use error::{BiblioError, Result};
pub use lending::{Book, LendingService, NewBook, Reservation, ReservationStatus};
pub use library::Library;
pub use notify::{LogNotifier, Notifier};
pub use store::{MemoryStore, StoreState};
