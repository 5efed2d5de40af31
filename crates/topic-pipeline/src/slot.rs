//! Single-writer publication slot stamped with a generation counter.
//!
//! Every pass takes a generation from [`ResultSlot::begin`] before it starts
//! fetching. A finished pass may only publish if its generation is still the
//! most recently begun one; otherwise a newer pass is in flight or already
//! published and the older result is discarded. Readers only ever observe the
//! latest accepted value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

/// Monotonic pass number. The first pass is generation 1.
pub type Generation = u64;

/// A value accepted by the slot.
#[derive(Debug)]
pub struct Published<T> {
    pub generation: Generation,
    pub value: Arc<T>,
    pub published_at: DateTime<Utc>,
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            value: Arc::clone(&self.value),
            published_at: self.published_at,
        }
    }
}

/// Holds the latest published result of a derived computation.
pub struct ResultSlot<T> {
    started: AtomicU64,
    tx: watch::Sender<Option<Published<T>>>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            started: AtomicU64::new(0),
            tx,
        }
    }

    /// Start a new pass and return its generation.
    pub fn begin(&self) -> Generation {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Generation of the most recently begun pass.
    pub fn latest_generation(&self) -> Generation {
        self.started.load(Ordering::SeqCst)
    }

    /// Generation of the currently published value, if any.
    pub fn published_generation(&self) -> Option<Generation> {
        self.tx.borrow().as_ref().map(|p| p.generation)
    }

    /// Publish `value` for `generation`.
    ///
    /// Returns false, leaving the slot untouched, if a newer pass has begun
    /// or a value at least as new is already published.
    pub fn publish(&self, generation: Generation, value: T) -> bool {
        let accepted = self.tx.send_if_modified(|current| {
            if generation != self.started.load(Ordering::SeqCst) {
                return false;
            }
            if current.as_ref().is_some_and(|p| p.generation >= generation) {
                return false;
            }
            *current = Some(Published {
                generation,
                value: Arc::new(value),
                published_at: Utc::now(),
            });
            true
        });

        if !accepted {
            debug!(
                generation,
                latest = self.latest_generation(),
                "Discarding stale result"
            );
        }
        accepted
    }

    /// The current published value.
    pub fn latest(&self) -> Option<Published<T>> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every accepted publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Published<T>>> {
        self.tx.subscribe()
    }
}
