//! Error types for the library core.

use thiserror::Error;

/// Common error type for library operations.
///
/// Every precondition failure surfaces as one of these kinds; callers are
/// expected to match on the variant rather than parse the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BiblioError {
    /// A referenced entity does not exist. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A state transition was attempted from a non-eligible state.
    #[error("reservation is not active")]
    InvalidState,

    /// The book has no remaining stock to reserve.
    #[error("book is out of stock")]
    OutOfStock,

    /// The user already holds an active reservation for this book.
    #[error("book is already reserved by this user")]
    DuplicateReservation,

    /// The user has reached the simultaneous reservation limit.
    #[error("simultaneous reservation limit of {0} reached")]
    ReservationLimitExceeded(usize),

    /// Wrong email or password.
    ///
    /// Deliberately covers both an unknown email and a digest mismatch so
    /// the caller cannot tell which part failed.
    #[error("wrong email or password")]
    InvalidCredentials,

    /// The account has not been activated yet.
    #[error("account is not activated")]
    InactiveAccount,

    /// The account is already active.
    #[error("account is already active")]
    AlreadyActive,

    /// The password has passed its expiration window and must be renewed.
    #[error("password has expired and must be renewed")]
    PasswordExpired,

    /// The new password matches one of the recent history entries.
    #[error("password matches one of the last {0} passwords")]
    PasswordReused(usize),

    /// The new password is empty.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The security question or answer is missing or malformed.
    #[error("invalid security question or answer: {0}")]
    InvalidSecurityAnswer(&'static str),

    /// No security answer is stored for this account.
    #[error("no security answer is set for this account")]
    NoSecurityAnswerSet,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, BiblioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = BiblioError::NotFound("user");
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        // The message must not reveal which part of the check failed.
        let err = BiblioError::InvalidCredentials;
        assert_eq!(err.to_string(), "wrong email or password");
    }

    #[test]
    fn test_limit_displays_count() {
        let err = BiblioError::ReservationLimitExceeded(3);
        assert_eq!(
            err.to_string(),
            "simultaneous reservation limit of 3 reached"
        );

        let err = BiblioError::PasswordReused(5);
        assert_eq!(
            err.to_string(),
            "password matches one of the last 5 passwords"
        );
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BiblioError::OutOfStock)
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
