//! Cooperative cancellation shared by every recursive walk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::FilterError;

/// A cloneable flag that aborts traversal and rendering once set.
///
/// Clones share the same flag, so a Ctrl-C handler can hold one copy while
/// the walk checks another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`FilterError::Cancelled`] if cancellation was requested.
    pub fn check(&self) -> Result<(), FilterError> {
        if self.is_cancelled() {
            return Err(FilterError::Cancelled);
        }
        Ok(())
    }
}
