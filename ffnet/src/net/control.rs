use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default, Debug)]
struct ControlState {
    training: AtomicBool,
    stop: AtomicBool,
}

/// Cloneable handle onto a network's training state. `stop` may be called
/// from any thread; the training loop observes it at the next epoch boundary.
#[derive(Clone, Default, Debug)]
pub struct TrainControl {
    state: Arc<ControlState>,
}

impl TrainControl {
    pub fn stop(&self) {
        self.state.stop.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_training(&self) -> bool {
        self.state.training.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.state.stop.load(Ordering::SeqCst)
    }

    /// Marks a run as started, or returns `None` when one is already in
    /// progress. A stop requested before the run started is discarded.
    pub(crate) fn try_begin(&self) -> Option<TrainingGuard> {
        self.state
            .training
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.state.stop.store(false, Ordering::SeqCst);
        Some(TrainingGuard {
            state: Arc::clone(&self.state),
        })
    }
}

/// Clears the training flag when the run ends, including by panic.
pub(crate) struct TrainingGuard {
    state: Arc<ControlState>,
}

impl Drop for TrainingGuard {
    fn drop(&mut self) {
        self.state.training.store(false, Ordering::SeqCst);
    }
}
