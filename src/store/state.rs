//! In-memory table state for the library store.
//!
//! Holds the user, book, reservation, and password history tables and
//! provides the lookup and mutation methods the engines run inside a
//! store transaction.

use chrono::{DateTime, Utc};

use crate::account::{PasswordHistoryEntry, User};
use crate::lending::{Book, NewBook, Reservation, ReservationStatus};

/// The four tables backing the library core.
///
/// Identifiers are assigned monotonically per table and never reused.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    users: Vec<User>,
    books: Vec<Book>,
    reservations: Vec<Reservation>,
    password_history: Vec<PasswordHistoryEntry>,
    next_user_id: i64,
    next_book_id: i64,
    next_reservation_id: i64,
    next_history_id: i64,
}

impl StoreState {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert a user record, assigning its ID.
    pub fn insert_user(&mut self, mut user: User) -> User {
        self.next_user_id += 1;
        user.id = self.next_user_id;
        self.users.push(user.clone());
        user
    }

    /// Get a user by ID.
    pub fn user_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Get a user by email.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Check if an email is already registered.
    pub fn email_exists(&self, email: &str) -> bool {
        self.user_by_email(email).is_some()
    }

    /// Get a mutable user by ID.
    pub fn user_mut_by_id(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Get a mutable user by email.
    pub fn user_mut_by_email(&mut self, email: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.email == email)
    }

    /// Delete a user by ID. Returns whether a record was removed.
    pub fn delete_user(&mut self, id: i64) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() < before
    }

    // ------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------

    /// Insert a new book, assigning its ID.
    pub fn insert_book(&mut self, new_book: &NewBook) -> Book {
        self.next_book_id += 1;
        let book = Book {
            id: self.next_book_id,
            title: new_book.title.clone(),
            isbn: new_book.isbn.clone(),
            stock: new_book.stock,
            published: new_book.published,
            description: new_book.description.clone(),
            editor: new_book.editor.clone(),
            category: new_book.category.clone(),
            language: new_book.language.clone(),
        };
        self.books.push(book.clone());
        book
    }

    /// Get a book by ID.
    pub fn book_by_id(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Get a book by ISBN.
    pub fn book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn == isbn)
    }

    /// Get a mutable book by ID.
    pub fn book_mut(&mut self, id: i64) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// List published books.
    pub fn published_books(&self) -> Vec<Book> {
        self.books.iter().filter(|b| b.published).cloned().collect()
    }

    // ------------------------------------------------------------------
    // Reservations
    // ------------------------------------------------------------------

    /// Insert a new active reservation, assigning its ID.
    pub fn insert_reservation(
        &mut self,
        user_id: i64,
        book_id: i64,
        reserved_at: DateTime<Utc>,
    ) -> Reservation {
        self.next_reservation_id += 1;
        let reservation = Reservation {
            id: self.next_reservation_id,
            user_id,
            book_id,
            status: ReservationStatus::Active,
            reserved_at,
        };
        self.reservations.push(reservation.clone());
        reservation
    }

    /// Get a reservation by ID.
    pub fn reservation_by_id(&self, id: i64) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    /// Get a mutable reservation by ID.
    pub fn reservation_mut(&mut self, id: i64) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.id == id)
    }

    /// List all reservations for a user.
    pub fn reservations_by_user(&self, user_id: i64) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// List active reservations for a user.
    pub fn active_reservations_by_user(&self, user_id: i64) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.user_id == user_id && r.is_active())
            .cloned()
            .collect()
    }

    /// Find the user's active reservation for a book, if any.
    pub fn active_reservation_for(&self, user_id: i64, book_id: i64) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|r| r.user_id == user_id && r.book_id == book_id && r.is_active())
    }

    /// List all reservations for a book.
    pub fn reservations_by_book(&self, book_id: i64) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect()
    }

    /// Count active reservations for a book.
    pub fn count_active_by_book(&self, book_id: i64) -> usize {
        self.reservations
            .iter()
            .filter(|r| r.book_id == book_id && r.is_active())
            .count()
    }

    /// List all reservations.
    pub fn all_reservations(&self) -> Vec<Reservation> {
        self.reservations.clone()
    }

    // ------------------------------------------------------------------
    // Password history
    // ------------------------------------------------------------------

    /// Append a retired password digest to a user's history ledger.
    pub fn insert_password_history(
        &mut self,
        user_id: i64,
        digest: impl Into<String>,
        changed_at: DateTime<Utc>,
    ) -> PasswordHistoryEntry {
        self.next_history_id += 1;
        let entry = PasswordHistoryEntry {
            id: self.next_history_id,
            user_id,
            digest: digest.into(),
            changed_at,
        };
        self.password_history.push(entry.clone());
        entry
    }

    /// The newest history entries for a user, at most `limit`, newest first.
    ///
    /// Recency follows insertion order: the ledger is append-only and IDs
    /// are monotonic.
    pub fn recent_password_history(&self, user_id: i64, limit: usize) -> Vec<PasswordHistoryEntry> {
        let mut entries: Vec<PasswordHistoryEntry> = self
            .password_history
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(limit);
        entries
    }

    /// Delete a user's oldest history entries beyond `keep`.
    ///
    /// Returns the number of entries removed.
    pub fn prune_password_history(&mut self, user_id: i64, keep: usize) -> usize {
        let keep_ids: Vec<i64> = self
            .recent_password_history(user_id, keep)
            .iter()
            .map(|e| e.id)
            .collect();
        let before = self.password_history.len();
        self.password_history
            .retain(|e| e.user_id != user_id || keep_ids.contains(&e.id));
        before - self.password_history.len()
    }

    /// Delete all history entries for a user. Returns the number removed.
    pub fn delete_password_history_for(&mut self, user_id: i64) -> usize {
        let before = self.password_history.len();
        self.password_history.retain(|e| e.user_id != user_id);
        before - self.password_history.len()
    }

    /// Count history entries for a user.
    pub fn count_password_history(&self, user_id: i64) -> usize {
        self.password_history
            .iter()
            .filter(|e| e.user_id == user_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::UserStatus;

    fn sample_user(email: &str) -> User {
        User {
            id: 0,
            email: email.to_string(),
            password: "digest".to_string(),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            status: UserStatus::Inactive,
            created_at: Utc::now(),
            security_question: "q".to_string(),
            security_answer: "a".to_string(),
            password_last_updated: Some(Utc::now()),
        }
    }

    #[test]
    fn test_user_ids_are_assigned_monotonically() {
        let mut state = StoreState::default();
        let u1 = state.insert_user(sample_user("a@example.com"));
        let u2 = state.insert_user(sample_user("b@example.com"));

        assert_eq!(u1.id, 1);
        assert_eq!(u2.id, 2);
        assert!(state.email_exists("a@example.com"));
        assert!(!state.email_exists("c@example.com"));
    }

    #[test]
    fn test_deleted_user_id_is_not_reused() {
        let mut state = StoreState::default();
        let u1 = state.insert_user(sample_user("a@example.com"));
        assert!(state.delete_user(u1.id));
        let u2 = state.insert_user(sample_user("b@example.com"));
        assert_eq!(u2.id, 2);
    }

    #[test]
    fn test_book_lookup() {
        let mut state = StoreState::default();
        let book = state.insert_book(&NewBook::new("Dune", "978-0441013593", 2).published());

        assert_eq!(state.book_by_id(book.id).unwrap().title, "Dune");
        assert_eq!(state.book_by_isbn("978-0441013593").unwrap().id, book.id);
        assert_eq!(state.published_books().len(), 1);
        assert!(state.book_by_id(99).is_none());
    }

    #[test]
    fn test_reservation_queries() {
        let mut state = StoreState::default();
        let now = Utc::now();
        let r1 = state.insert_reservation(1, 10, now);
        state.insert_reservation(1, 11, now);
        state.insert_reservation(2, 10, now);

        assert_eq!(state.reservations_by_user(1).len(), 2);
        assert_eq!(state.reservations_by_book(10).len(), 2);
        assert_eq!(state.count_active_by_book(10), 2);
        assert!(state.active_reservation_for(1, 10).is_some());
        assert!(state.active_reservation_for(2, 11).is_none());

        state.reservation_mut(r1.id).unwrap().status = ReservationStatus::Returned;
        assert_eq!(state.active_reservations_by_user(1).len(), 1);
        assert_eq!(state.count_active_by_book(10), 1);
    }

    #[test]
    fn test_recent_history_is_bounded_and_newest_first() {
        let mut state = StoreState::default();
        let now = Utc::now();
        for i in 0..7 {
            state.insert_password_history(1, format!("digest-{i}"), now);
        }
        state.insert_password_history(2, "other-user", now);

        let recent = state.recent_password_history(1, 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].digest, "digest-6");
        assert_eq!(recent[4].digest, "digest-2");
    }

    #[test]
    fn test_prune_removes_oldest_first() {
        let mut state = StoreState::default();
        let now = Utc::now();
        for i in 0..7 {
            state.insert_password_history(1, format!("digest-{i}"), now);
        }

        let removed = state.prune_password_history(1, 5);
        assert_eq!(removed, 2);
        assert_eq!(state.count_password_history(1), 5);

        // The two oldest entries are gone
        let remaining = state.recent_password_history(1, 10);
        assert!(remaining.iter().all(|e| e.digest != "digest-0"));
        assert!(remaining.iter().all(|e| e.digest != "digest-1"));
    }

    #[test]
    fn test_delete_history_for_user() {
        let mut state = StoreState::default();
        let now = Utc::now();
        state.insert_password_history(1, "d1", now);
        state.insert_password_history(1, "d2", now);
        state.insert_password_history(2, "d3", now);

        assert_eq!(state.delete_password_history_for(1), 2);
        assert_eq!(state.count_password_history(1), 0);
        assert_eq!(state.count_password_history(2), 1);
    }
}
