//! Lending management for the library core.
//!
//! Covers the book stock ledger and the reservation state machine.

mod service;
mod types;

pub use service::LendingService;
pub use types::{Book, NewBook, Reservation, ReservationStatus};
