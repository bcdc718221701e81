//! Trailing-edge debouncing for search and filter inputs
//!
//! Every trigger supersedes the previous one; only the trigger that is still
//! the latest after the quiet period fires.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a trigger and wait out the quiet period.
    ///
    /// Returns `true` when no newer trigger arrived in the meantime; the
    /// caller fires its request only then.
    pub async fn trigger(&self) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        mine == self.generation.load(Ordering::SeqCst)
    }
}
