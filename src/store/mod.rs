//! In-memory store for the library core.
//!
//! The store stands in for the external persistence collaborators and
//! exposes the scoped unit-of-work primitive the engines need: paired
//! writes (a stock change with its reservation write, a history append
//! with its password overwrite) run inside a single [`MemoryStore::transaction`]
//! call and either both commit or neither does.

mod state;

pub use state::StoreState;

use std::sync::{Mutex, PoisonError};

use crate::Result;

/// Thread-safe in-memory store.
///
/// A single mutex guards the whole state, so mutating invocations are
/// serialized: two concurrent reservation attempts cannot both observe
/// `stock > 0` and both decrement past zero.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only query against the store.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a unit of work against the store.
    ///
    /// The closure sees the live state; if it returns `Err`, every write it
    /// made is rolled back by restoring the pre-transaction snapshot, so the
    /// store never holds partial state.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = guard.clone();
        match f(&mut guard) {
            Ok(value) => Ok(value),
            Err(e) => {
                *guard = snapshot;
                Err(e)
            }
        }
    }
}
