//! Monotonic session generation counter.
//!
//! Every credential change (login, logout, forced sign-out) advances the epoch.
//! Work started under one epoch may only commit its result if the epoch is
//! unchanged when it completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared session generation counter.
#[derive(Debug, Clone, Default)]
pub struct SessionEpoch(Arc<AtomicU64>);

impl SessionEpoch {
    /// Counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Unconditionally move to the next generation and return it.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Move to the next generation only if the current one is `expected`.
    ///
    /// Exactly one caller wins for a given `expected` value.
    #[must_use]
    pub fn advance_from(&self, expected: u64) -> bool {
        self.0
            .compare_exchange(expected, expected + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
