//! Credential lifecycle engine for the library core.
//!
//! Owns registration, activation, authentication, password change and
//! renewal, password expiration, and security-question verification.
//! Password and security-answer material is stored as one-way digests only.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::config::CredentialConfig;
use crate::notify::Notifier;
use crate::store::MemoryStore;
use crate::{BiblioError, Result};

use super::password::CredentialHasher;
use super::types::{NewUser, User, UserStatus};

/// Normalize a security answer before hashing or verification.
fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Service for account credential operations.
pub struct AccountService<'a> {
    store: &'a MemoryStore,
    hasher: &'a dyn CredentialHasher,
    notifier: &'a dyn Notifier,
    policy: CredentialConfig,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService over the given collaborators.
    pub fn new(
        store: &'a MemoryStore,
        hasher: &'a dyn CredentialHasher,
        notifier: &'a dyn Notifier,
        policy: CredentialConfig,
    ) -> Self {
        Self {
            store,
            hasher,
            notifier,
            policy,
        }
    }

    /// Register a new user.
    ///
    /// The password and the normalized (trimmed, lowercased) security
    /// answer are hashed independently; the account starts inactive. An
    /// activation notice is sent best-effort: a notifier failure is logged
    /// and never rolls back the registration.
    ///
    /// # Errors
    ///
    /// `DuplicateEmail` if the email is taken, `InvalidSecurityAnswer` if
    /// the question or answer is missing or the answer exceeds the length
    /// cap.
    pub fn register(&self, candidate: NewUser) -> Result<User> {
        if self.store.read(|state| state.email_exists(&candidate.email)) {
            return Err(BiblioError::DuplicateEmail);
        }

        if candidate.security_question.is_empty() {
            return Err(BiblioError::InvalidSecurityAnswer(
                "a security question is required",
            ));
        }
        if candidate.security_answer.is_empty() {
            return Err(BiblioError::InvalidSecurityAnswer(
                "a security answer is required",
            ));
        }
        if candidate.security_answer.chars().count() > self.policy.answer_max_length {
            return Err(BiblioError::InvalidSecurityAnswer(
                "the security answer is too long",
            ));
        }

        let password_digest = self.hasher.hash(&candidate.password)?;
        let answer_digest = self.hasher.hash(&normalize_answer(&candidate.security_answer))?;
        let now = Utc::now();

        let user = self.store.transaction(|state| {
            // Re-checked under the store lock
            if state.email_exists(&candidate.email) {
                return Err(BiblioError::DuplicateEmail);
            }
            Ok(state.insert_user(User {
                id: 0,
                email: candidate.email.clone(),
                password: password_digest.clone(),
                firstname: candidate.firstname.clone(),
                lastname: candidate.lastname.clone(),
                status: UserStatus::Inactive,
                created_at: now,
                security_question: candidate.security_question.clone(),
                security_answer: answer_digest.clone(),
                password_last_updated: Some(now),
            }))
        })?;

        info!(email = %user.email, user_id = user.id, "new user registered");

        self.send_notice(self.notifier.activation_requested(&user), "activation", &user);
        Ok(user)
    }

    /// Activate an account.
    ///
    /// Activation happens exactly once; activating an already-active
    /// account is rejected, not silently accepted.
    ///
    /// # Errors
    ///
    /// `NotFound` or `AlreadyActive`.
    pub fn activate(&self, email: &str) -> Result<()> {
        let user = self.store.transaction(|state| {
            let user = state
                .user_mut_by_email(email)
                .ok_or(BiblioError::NotFound("user"))?;
            if user.status == UserStatus::Active {
                return Err(BiblioError::AlreadyActive);
            }
            user.status = UserStatus::Active;
            Ok(user.clone())
        })?;

        info!(email = %user.email, user_id = user.id, "account activated");

        self.send_notice(
            self.notifier.activation_confirmed(&user),
            "activation confirmation",
            &user,
        );
        Ok(())
    }

    /// Authenticate a user by email and password.
    ///
    /// An unknown email and a wrong password surface the same
    /// `InvalidCredentials` kind so the caller cannot tell which part
    /// failed; an inactive account and an expired password are reported
    /// distinctly.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials`, `InactiveAccount`, or `PasswordExpired`.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<()> {
        let user = self
            .user_by_email(email)
            .ok_or(BiblioError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password) {
            return Err(BiblioError::InvalidCredentials);
        }

        if !user.is_active() {
            return Err(BiblioError::InactiveAccount);
        }

        if self.password_expired(&user) {
            return Err(BiblioError::PasswordExpired);
        }

        info!(email = %user.email, "user authenticated");
        Ok(())
    }

    /// Change a password after verifying the old one.
    ///
    /// This is the plain change path: no history bookkeeping and no
    /// expiration check.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidCredentials`, or `EmptyPassword`.
    pub fn update_password(&self, email: &str, old: &str, new: &str) -> Result<()> {
        let user = self.user_required_by_email(email)?;
        self.change_password(&user, old, new)
    }

    /// Change a password, addressing the user by ID.
    ///
    /// Same contract as [`AccountService::update_password`].
    pub fn update_password_by_id(&self, id: i64, old: &str, new: &str) -> Result<()> {
        let user = self
            .store
            .read(|state| state.user_by_id(id).cloned())
            .ok_or(BiblioError::NotFound("user"))?;
        self.change_password(&user, old, new)
    }

    fn change_password(&self, user: &User, old: &str, new: &str) -> Result<()> {
        if !self.hasher.verify(old, &user.password) {
            return Err(BiblioError::InvalidCredentials);
        }
        if new.is_empty() {
            return Err(BiblioError::EmptyPassword);
        }

        let digest = self.hasher.hash(new)?;
        let now = Utc::now();
        let user_id = user.id;

        self.store.transaction(move |state| {
            let user = state
                .user_mut_by_id(user_id)
                .ok_or(BiblioError::NotFound("user"))?;
            user.password = digest;
            user.password_last_updated = Some(now);
            Ok(())
        })?;

        info!(email = %user.email, user_id, "password updated");
        Ok(())
    }

    /// Renew a password, enforcing the reuse policy.
    ///
    /// The new password must not verify against any of the newest history
    /// digests (per-entry verify; digests are salted and cannot be
    /// compared directly). On success the current digest is retired into
    /// the history ledger, the ledger is pruned to the cap (oldest first),
    /// and the password and its timestamp are overwritten, all in one
    /// store transaction.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidCredentials`, `EmptyPassword`, or
    /// `PasswordReused`.
    pub fn renew_password(&self, email: &str, old: &str, new: &str) -> Result<()> {
        let user = self.user_required_by_email(email)?;

        if !self.hasher.verify(old, &user.password) {
            return Err(BiblioError::InvalidCredentials);
        }
        if new.is_empty() {
            return Err(BiblioError::EmptyPassword);
        }

        let limit = self.policy.history_limit;
        let recent = self
            .store
            .read(|state| state.recent_password_history(user.id, limit));
        for entry in &recent {
            if self.hasher.verify(new, &entry.digest) {
                return Err(BiblioError::PasswordReused(limit));
            }
        }

        let digest = self.hasher.hash(new)?;
        let now = Utc::now();
        let user_id = user.id;

        self.store.transaction(move |state| {
            let retired = state
                .user_by_id(user_id)
                .ok_or(BiblioError::NotFound("user"))?
                .password
                .clone();
            state.insert_password_history(user_id, retired, now);
            state.prune_password_history(user_id, limit);

            let user = state
                .user_mut_by_id(user_id)
                .ok_or(BiblioError::NotFound("user"))?;
            user.password = digest;
            user.password_last_updated = Some(now);
            Ok(())
        })?;

        info!(email = %user.email, user_id, "password renewed");
        Ok(())
    }

    /// Check whether a user's password has expired.
    ///
    /// A password is expired when its timestamp is absent or when the
    /// expiry window has fully elapsed; exactly at the boundary counts as
    /// expired.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub fn is_password_expired(&self, email: &str) -> Result<bool> {
        let user = self.user_required_by_email(email)?;
        Ok(self.password_expired(&user))
    }

    fn password_expired(&self, user: &User) -> bool {
        match user.password_last_updated {
            None => true,
            Some(last) => Utc::now() >= last + Duration::weeks(self.policy.password_expiry_weeks),
        }
    }

    /// Get a user's security question.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist, `NoSecurityAnswerSet` if no
    /// question is stored.
    pub fn security_question(&self, email: &str) -> Result<String> {
        let user = self.user_required_by_email(email)?;
        if user.security_question.is_empty() {
            return Err(BiblioError::NoSecurityAnswerSet);
        }
        Ok(user.security_question)
    }

    /// Verify a security answer against the stored digest.
    ///
    /// The answer is normalized (trimmed, lowercased) the same way it was
    /// at registration. Returns `Ok(false)` on a mismatch; this check is
    /// independent of account status and password state.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist, `NoSecurityAnswerSet` if no
    /// answer digest is stored.
    pub fn verify_security_answer(&self, email: &str, answer: &str) -> Result<bool> {
        let user = self.user_required_by_email(email)?;
        if user.security_answer.is_empty() {
            return Err(BiblioError::NoSecurityAnswerSet);
        }
        Ok(self
            .hasher
            .verify(&normalize_answer(answer), &user.security_answer))
    }

    /// Update a user's name fields.
    ///
    /// Blank fields keep the existing value.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub fn update_profile(&self, email: &str, firstname: &str, lastname: &str) -> Result<User> {
        let user_id = self.user_required_by_email(email)?.id;
        self.apply_profile_update(user_id, firstname, lastname)
    }

    /// Update a user's name fields, addressing the user by ID.
    ///
    /// Same contract as [`AccountService::update_profile`].
    pub fn update_profile_by_id(
        &self,
        id: i64,
        firstname: &str,
        lastname: &str,
    ) -> Result<User> {
        self.apply_profile_update(id, firstname, lastname)
    }

    fn apply_profile_update(&self, user_id: i64, firstname: &str, lastname: &str) -> Result<User> {
        self.store.transaction(|state| {
            let user = state
                .user_mut_by_id(user_id)
                .ok_or(BiblioError::NotFound("user"))?;
            if !firstname.is_empty() {
                user.firstname = firstname.to_string();
            }
            if !lastname.is_empty() {
                user.lastname = lastname.to_string();
            }
            Ok(user.clone())
        })
    }

    /// Delete an account.
    ///
    /// The farewell notice goes out best-effort *before* the deletion and
    /// cannot block it. The user's password history is removed with the
    /// account; reservations are left as historical records.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub fn unsubscribe(&self, email: &str) -> Result<()> {
        let user = self.user_required_by_email(email)?;

        self.send_notice(
            self.notifier.unsubscribe_confirmed(&user),
            "unsubscribe confirmation",
            &user,
        );

        self.store.transaction(|state| {
            if !state.delete_user(user.id) {
                return Err(BiblioError::NotFound("user"));
            }
            state.delete_password_history_for(user.id);
            Ok(())
        })?;

        info!(email = %user.email, user_id = user.id, "user unsubscribed");
        Ok(())
    }

    /// Look up a user by email.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.store.read(|state| state.user_by_email(email).cloned())
    }

    fn user_required_by_email(&self, email: &str) -> Result<User> {
        self.user_by_email(email)
            .ok_or(BiblioError::NotFound("user"))
    }

    fn send_notice(&self, result: Result<()>, notice: &str, user: &User) {
        if let Err(e) = result {
            warn!(error = %e, email = %user.email, notice, "notification failed");
        }
    }
}
