use std::sync::Mutex;

use crate::diff::CompareError;
use crate::progress::{CancelToken, ProgressCallback};

const PROGRESS_MIN_DELTA: f32 = 0.01;

#[derive(Debug, Default)]
struct ProgressState {
    last_phase: Option<&'static str>,
    last_percent: Option<f32>,
}

/// Cancellation checks and throttled progress reporting shared by every
/// level of one comparison run. Safe to use from parallel children.
pub(crate) struct HardeningController<'a> {
    cancel: Option<CancelToken>,
    progress: Option<&'a dyn ProgressCallback>,
    state: Mutex<ProgressState>,
}

impl<'a> HardeningController<'a> {
    pub(crate) fn new(
        cancel: Option<CancelToken>,
        progress: Option<&'a dyn ProgressCallback>,
    ) -> Self {
        Self {
            cancel,
            progress,
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub(crate) fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub(crate) fn set_cancel(&mut self, token: CancelToken) {
        self.cancel = Some(token);
    }

    pub(crate) fn set_progress(&mut self, progress: &'a dyn ProgressCallback) {
        self.progress = Some(progress);
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), CompareError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                tracing::debug!("cancellation observed at child boundary");
                Err(CompareError::Cancelled)
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn progress(&self, phase: &'static str, percent: f32) {
        let Some(callback) = self.progress else {
            return;
        };

        let clamped = if percent.is_finite() {
            percent.clamp(0.0, 1.0)
        } else {
            0.0
        };

        {
            let mut state = match self.state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };

            let should_emit = match (state.last_phase, state.last_percent) {
                (Some(last_phase), Some(last_percent)) if last_phase == phase => {
                    clamped != last_percent
                        && (clamped == 0.0
                            || clamped == 1.0
                            || clamped < last_percent
                            || (clamped - last_percent) >= PROGRESS_MIN_DELTA)
                }
                _ => true,
            };

            if !should_emit {
                return;
            }

            state.last_phase = Some(phase);
            state.last_percent = Some(clamped);
        }

        callback.on_progress(phase, clamped);
    }
}
