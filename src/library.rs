//! Composition root for the library core.
//!
//! [`Library`] owns the store and the hasher and notifier capabilities and
//! exposes the operations the request layer consumes. Collaborators are
//! injected through the constructor; there is no global wiring.

use crate::account::{
    AccountService, Argon2Hasher, CredentialHasher, NewUser, User, QUESTIONS,
};
use crate::config::Config;
use crate::lending::{Book, LendingService, NewBook, Reservation};
use crate::notify::{LogNotifier, Notifier};
use crate::store::MemoryStore;
use crate::Result;

/// The library façade.
pub struct Library {
    store: MemoryStore,
    hasher: Box<dyn CredentialHasher>,
    notifier: Box<dyn Notifier>,
    config: Config,
}

impl Library {
    /// Create a library over explicit collaborators.
    pub fn new(
        hasher: Box<dyn CredentialHasher>,
        notifier: Box<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            store: MemoryStore::new(),
            hasher,
            notifier,
            config,
        }
    }

    /// Create a library with the production wiring: Argon2 hashing and
    /// log-backed notices.
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(Argon2Hasher),
            Box::new(LogNotifier),
            Config::default(),
        )
    }

    /// Access the backing store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Install the logging subscriber described by the configuration.
    ///
    /// Called once at startup by the embedding process; a second call
    /// fails because the subscriber is process-global.
    pub fn init_logging(&self) -> Result<()> {
        crate::logging::init(&self.config.logging)
    }

    fn accounts(&self) -> AccountService<'_> {
        AccountService::new(
            &self.store,
            self.hasher.as_ref(),
            self.notifier.as_ref(),
            self.config.credential.clone(),
        )
    }

    fn lending(&self) -> LendingService<'_> {
        LendingService::new(&self.store, self.config.lending.clone())
    }

    // ------------------------------------------------------------------
    // Reservations
    // ------------------------------------------------------------------

    /// Reserve a book for a user.
    pub fn reserve(&self, user_email: &str, book_id: i64) -> Result<Reservation> {
        self.lending().reserve(user_email, book_id)
    }

    /// Return a reserved book.
    pub fn return_book(&self, reservation_id: i64) -> Result<()> {
        self.lending().return_book(reservation_id)
    }

    /// Cancel a reservation.
    pub fn cancel(&self, reservation_id: i64) -> Result<()> {
        self.lending().cancel(reservation_id)
    }

    /// Check whether a book has no active reservation.
    pub fn is_available(&self, book_id: i64) -> Result<bool> {
        self.lending().is_available(book_id)
    }

    /// List all reservations for a user.
    pub fn reservations_by_user(&self, user_email: &str) -> Result<Vec<Reservation>> {
        self.lending().reservations_by_user(user_email)
    }

    /// List active reservations for a user.
    pub fn active_reservations_by_user(&self, user_email: &str) -> Result<Vec<Reservation>> {
        self.lending().active_reservations_by_user(user_email)
    }

    /// List all reservations for a book.
    pub fn reservations_by_book(&self, book_id: i64) -> Result<Vec<Reservation>> {
        self.lending().reservations_by_book(book_id)
    }

    /// List every reservation.
    pub fn all_reservations(&self) -> Vec<Reservation> {
        self.lending().all_reservations()
    }

    // ------------------------------------------------------------------
    // Catalogue
    // ------------------------------------------------------------------

    /// Add a book to the catalogue.
    pub fn add_book(&self, new_book: NewBook) -> Result<Book> {
        self.store
            .transaction(|state| Ok(state.insert_book(&new_book)))
    }

    /// Get a book by ID.
    pub fn book(&self, id: i64) -> Option<Book> {
        self.store.read(|state| state.book_by_id(id).cloned())
    }

    /// Get a book by ISBN.
    pub fn book_by_isbn(&self, isbn: &str) -> Option<Book> {
        self.store.read(|state| state.book_by_isbn(isbn).cloned())
    }

    /// List published books.
    pub fn published_books(&self) -> Vec<Book> {
        self.store.read(|state| state.published_books())
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Register a new user.
    pub fn register(&self, candidate: NewUser) -> Result<User> {
        self.accounts().register(candidate)
    }

    /// Activate an account.
    pub fn activate(&self, email: &str) -> Result<()> {
        self.accounts().activate(email)
    }

    /// Authenticate a user.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<()> {
        self.accounts().authenticate(email, password)
    }

    /// Change a password (plain path, no history bookkeeping).
    pub fn update_password(&self, email: &str, old: &str, new: &str) -> Result<()> {
        self.accounts().update_password(email, old, new)
    }

    /// Change a password, addressing the user by ID.
    pub fn update_password_by_id(&self, id: i64, old: &str, new: &str) -> Result<()> {
        self.accounts().update_password_by_id(id, old, new)
    }

    /// Renew a password, enforcing the reuse policy.
    pub fn renew_password(&self, email: &str, old: &str, new: &str) -> Result<()> {
        self.accounts().renew_password(email, old, new)
    }

    /// Check whether a user's password has expired.
    pub fn is_password_expired(&self, email: &str) -> Result<bool> {
        self.accounts().is_password_expired(email)
    }

    /// Get a user's security question.
    pub fn security_question(&self, email: &str) -> Result<String> {
        self.accounts().security_question(email)
    }

    /// Verify a security answer.
    pub fn verify_security_answer(&self, email: &str, answer: &str) -> Result<bool> {
        self.accounts().verify_security_answer(email, answer)
    }

    /// Update a user's name fields. Blank fields keep the existing value.
    pub fn update_profile(&self, email: &str, firstname: &str, lastname: &str) -> Result<User> {
        self.accounts().update_profile(email, firstname, lastname)
    }

    /// Update a user's name fields, addressing the user by ID.
    pub fn update_profile_by_id(&self, id: i64, firstname: &str, lastname: &str) -> Result<User> {
        self.accounts().update_profile_by_id(id, firstname, lastname)
    }

    /// Delete an account.
    pub fn unsubscribe(&self, email: &str) -> Result<()> {
        self.accounts().unsubscribe(email)
    }

    /// Look up a user by email.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.accounts().user_by_email(email)
    }

    /// The predefined security questions offered at registration.
    pub fn security_questions(&self) -> &'static [&'static str] {
        QUESTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_questions_catalogue() {
        let library = Library::with_defaults();
        assert_eq!(library.security_questions().len(), 5);
    }

    #[test]
    fn test_init_logging_is_one_shot() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.logging.file = dir.path().join("biblio.log").display().to_string();

        let library = Library::new(Box::new(Argon2Hasher), Box::new(LogNotifier), config);
        library.init_logging().unwrap();
        assert!(dir.path().join("biblio.log").exists());

        // The subscriber is process-global; a second install is rejected
        assert!(library.init_logging().is_err());
    }

    #[test]
    fn test_catalogue_surface() {
        let library = Library::with_defaults();
        let book = library
            .add_book(NewBook::new("Dune", "978-0441013593", 2).published())
            .unwrap();

        assert_eq!(library.book(book.id).unwrap().title, "Dune");
        assert_eq!(library.book_by_isbn("978-0441013593").unwrap().id, book.id);
        assert_eq!(library.published_books().len(), 1);
        assert!(library.book(99).is_none());
    }
}
