//! User account model for the library core.
//!
//! This module defines the User struct, account status enum, and the
//! password history entry kept for the reuse check.

use chrono::{DateTime, Utc};

/// Account status.
///
/// Accounts are created inactive and transition to active exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    /// Registered but not yet activated.
    #[default]
    Inactive,
    /// Activated account.
    Active,
}

/// User entity representing a registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Email address (unique).
    pub email: String,
    /// Password digest.
    pub password: String,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Account status.
    pub status: UserStatus,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Security question shown for secondary verification.
    pub security_question: String,
    /// Digest of the normalized security answer.
    pub security_answer: String,
    /// When the password was last set.
    ///
    /// Absent means the password age is unknown and counts as expired.
    pub password_last_updated: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this account has been activated.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Data for registering a new user.
///
/// Password and security answer are plaintext here; they are hashed during
/// registration and never stored as-is.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Security question.
    pub security_question: String,
    /// Plaintext security answer.
    pub security_answer: String,
}

impl NewUser {
    /// Create a new registration candidate.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            security_question: String::new(),
            security_answer: String::new(),
        }
    }

    /// Set the security question and answer.
    pub fn with_security(
        mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        self.security_question = question.into();
        self.security_answer = answer.into();
        self
    }
}

/// A past password digest kept for the reuse check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHistoryEntry {
    /// Unique entry ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// The retired password digest.
    pub digest: String,
    /// When the password was retired.
    pub changed_at: DateTime<Utc>,
}
