//! Client-side state slices and the optimistic mutation helper.
//!
//! A slice is a [`Store`]: shared, cloneable, guarded by a short synchronous
//! lock. Locks are only ever taken inside closures, so no guard can live
//! across an `.await`.

pub mod list;
pub mod optimistic;

use std::sync::Arc;

use parking_lot::Mutex;

pub use list::{Entry, OptimisticList, Record};
pub use optimistic::optimistic;

#[derive(Debug, Default)]
pub struct Store<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<S: Clone> Store<S> {
    pub fn snapshot(&self) -> S {
        self.inner.lock().clone()
    }
}
