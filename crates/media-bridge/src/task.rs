//! Progress reporting and cooperative cancellation for long-running tasks.
//!
//! Slow work (transcription, auto-sync, export) runs behind an async
//! boundary and reports fractional progress through a callback. Callers
//! cancel cooperatively: the token is checked between processing steps,
//! never mid-step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cutaway_common::{CutawayError, CutawayResult};

/// Progress callback receiving percent complete in `[0.0, 100.0]`.
pub type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;

/// Cooperative cancellation token, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Error out of the current task if cancellation was requested.
    pub fn check(&self) -> CutawayResult<()> {
        if self.is_cancelled() {
            Err(CutawayError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Report progress through an optional callback.
pub fn report_progress(progress: Option<&ProgressFn>, percent: f64) {
    if let Some(cb) = progress {
        cb(percent.clamp(0.0, 100.0));
    }
}
