//! Cooperative cancellation for batch runs
//!
//! The flag is checked before each blocking step. Work already handed to the
//! store (an issued batch insert) always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{RankError, RankErrorKind, Result};

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` if cancellation was requested
    pub fn check(&self, op: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(RankError::new(RankErrorKind::Cancelled)
                .with_op(op.to_string())
                .with_message("run cancelled by caller"));
        }
        Ok(())
    }
}
