//! Reservation state machine for the library core.
//!
//! Owns reservation creation, return, and cancellation, and the rules that
//! gate each transition. Stock changes and reservation writes are paired
//! inside a single store transaction, so the stock counter and the set of
//! active reservations cannot diverge.

use chrono::Utc;
use tracing::info;

use crate::config::LendingConfig;
use crate::store::MemoryStore;
use crate::{BiblioError, Result};

use super::types::{Reservation, ReservationStatus};

/// Service for reservation operations.
pub struct LendingService<'a> {
    store: &'a MemoryStore,
    policy: LendingConfig,
}

impl<'a> LendingService<'a> {
    /// Create a new LendingService over the given store.
    pub fn new(store: &'a MemoryStore, policy: LendingConfig) -> Self {
        Self { store, policy }
    }

    /// Reserve a book for a user.
    ///
    /// Preconditions, checked in order:
    /// - the user and the book exist
    /// - the book has stock remaining
    /// - the user holds no active reservation for this book
    /// - the user is under the simultaneous reservation limit
    ///
    /// On success the stock decrement and the reservation insert commit as
    /// one unit.
    ///
    /// # Errors
    ///
    /// `NotFound`, `OutOfStock`, `DuplicateReservation`, or
    /// `ReservationLimitExceeded`.
    pub fn reserve(&self, user_email: &str, book_id: i64) -> Result<Reservation> {
        let limit = self.policy.max_active_reservations;

        let reservation = self.store.transaction(|state| {
            let user_id = state
                .user_by_email(user_email)
                .ok_or(BiblioError::NotFound("user"))?
                .id;

            let book = state
                .book_by_id(book_id)
                .ok_or(BiblioError::NotFound("book"))?;
            if book.stock <= 0 {
                return Err(BiblioError::OutOfStock);
            }

            if state.active_reservation_for(user_id, book_id).is_some() {
                return Err(BiblioError::DuplicateReservation);
            }

            if state.active_reservations_by_user(user_id).len() >= limit {
                return Err(BiblioError::ReservationLimitExceeded(limit));
            }

            let book = state
                .book_mut(book_id)
                .ok_or(BiblioError::NotFound("book"))?;
            book.stock -= 1;

            Ok(state.insert_reservation(user_id, book_id, Utc::now()))
        })?;

        info!(
            user = %user_email,
            book_id,
            reservation_id = reservation.id,
            "reservation opened"
        );

        Ok(reservation)
    }

    /// Mark a reservation as returned and restore the copy to stock.
    ///
    /// # Errors
    ///
    /// `NotFound` if the reservation does not exist, `InvalidState` if it
    /// is not active.
    pub fn return_book(&self, reservation_id: i64) -> Result<()> {
        self.close(reservation_id, ReservationStatus::Returned)
    }

    /// Cancel a reservation and restore the copy to stock.
    ///
    /// Same contract as [`LendingService::return_book`].
    pub fn cancel(&self, reservation_id: i64) -> Result<()> {
        self.close(reservation_id, ReservationStatus::Cancelled)
    }

    /// Close an active reservation with the given terminal status.
    ///
    /// The status update and the stock increment commit as one unit.
    fn close(&self, reservation_id: i64, target: ReservationStatus) -> Result<()> {
        self.store.transaction(|state| {
            let reservation = state
                .reservation_by_id(reservation_id)
                .ok_or(BiblioError::NotFound("reservation"))?;
            if reservation.status.is_terminal() {
                return Err(BiblioError::InvalidState);
            }
            let book_id = reservation.book_id;

            let book = state
                .book_mut(book_id)
                .ok_or(BiblioError::NotFound("book"))?;
            book.stock += 1;

            let reservation = state
                .reservation_mut(reservation_id)
                .ok_or(BiblioError::NotFound("reservation"))?;
            reservation.status = target;
            Ok(())
        })?;

        info!(reservation_id, status = %target, "reservation closed");
        Ok(())
    }

    /// Check whether a book has no active reservation at all.
    ///
    /// Legacy availability query: it ignores the stock counter and reports
    /// on the reservation table only.
    ///
    /// # Errors
    ///
    /// `NotFound` if the book does not exist.
    pub fn is_available(&self, book_id: i64) -> Result<bool> {
        self.store.read(|state| {
            state
                .book_by_id(book_id)
                .ok_or(BiblioError::NotFound("book"))?;
            Ok(state.count_active_by_book(book_id) == 0)
        })
    }

    /// List all reservations for a user.
    pub fn reservations_by_user(&self, user_email: &str) -> Result<Vec<Reservation>> {
        self.store.read(|state| {
            let user = state
                .user_by_email(user_email)
                .ok_or(BiblioError::NotFound("user"))?;
            Ok(state.reservations_by_user(user.id))
        })
    }

    /// List active reservations for a user.
    pub fn active_reservations_by_user(&self, user_email: &str) -> Result<Vec<Reservation>> {
        self.store.read(|state| {
            let user = state
                .user_by_email(user_email)
                .ok_or(BiblioError::NotFound("user"))?;
            Ok(state.active_reservations_by_user(user.id))
        })
    }

    /// List all reservations for a book.
    pub fn reservations_by_book(&self, book_id: i64) -> Result<Vec<Reservation>> {
        self.store.read(|state| {
            state
                .book_by_id(book_id)
                .ok_or(BiblioError::NotFound("book"))?;
            Ok(state.reservations_by_book(book_id))
        })
    }

    /// List every reservation in the store.
    pub fn all_reservations(&self) -> Vec<Reservation> {
        self.store.read(|state| state.all_reservations())
    }
}
