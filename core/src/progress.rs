//! Progress reporting and cooperative cancellation for long-running comparisons.
//!
//! The engine may call the callback at throttled intervals with a best-effort percentage in
//! the range `[0.0, 1.0]`. Callers should treat progress as advisory and not assume monotonicity
//! across phases.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, phase: &str, percent: f32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _phase: &str, _percent: f32) {}
}

/// A shared flag asking an in-flight comparison to stop.
///
/// The engine checks it at every child boundary of the hierarchy; a
/// cancelled comparison returns [`CompareError::Cancelled`](crate::CompareError::Cancelled)
/// instead of a partial tree.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
