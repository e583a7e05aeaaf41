//! A module for collecting the diagnostics reported while processing a source file.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    RwLock, RwLockReadGuard,
};

/// Represents a trait responsible for handling diagnostics reported by a front-end phase.
pub trait Handler<T> {
    /// Receives a diagnostic and handles it.
    fn receive(&self, diagnostic: T);
}

/// Is a [`Handler`] that keeps every diagnostic it receives, in order.
#[derive(Debug)]
pub struct Storage<T: Send + Sync> {
    diagnostics: RwLock<Vec<T>>,
}

impl<T: Send + Sync> Storage<T> {
    /// Creates a new empty [`Storage`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            diagnostics: RwLock::new(Vec::new()),
        }
    }

    /// Consumes the [`Storage`] and returns the received diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns a read guard over the received diagnostics.
    #[must_use]
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> {
        self.diagnostics
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Gets the number of diagnostics received so far.
    #[must_use]
    pub fn len(&self) -> usize { self.as_vec().len() }

    /// Checks whether no diagnostic has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.as_vec().is_empty() }
}

impl<T: Send + Sync> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U> Handler<U> for Storage<T>
where
    U: Into<T>,
{
    fn receive(&self, diagnostic: U) {
        self.diagnostics
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(diagnostic.into());
    }
}

/// Is a [`Handler`] that only counts the diagnostics it receives.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicUsize,
}

impl Counter {
    /// Returns the number of diagnostics received.
    #[must_use]
    pub fn count(&self) -> usize { self.count.load(Ordering::Relaxed) }

    /// Resets the counter to zero.
    pub fn reset(&self) { self.count.store(0, Ordering::Relaxed); }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _diagnostic: T) { self.count.fetch_add(1, Ordering::Relaxed); }
}
