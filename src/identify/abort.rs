//! Cooperative cancellation shared by the orchestrator and its workers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Caller-owned abort flag
///
/// Setting it stops new fetches from starting and makes the orchestrator
/// stop waiting for workers. Nothing is forcibly cancelled.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
