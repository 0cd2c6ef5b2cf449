use serde::{Deserialize, Serialize};

/// Aggregate results of one epoch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based
    pub epoch: u32,
    /// See [`LossFn::cost`](crate::loss::LossFn::cost) for its sign.
    pub cost: f32,
    /// Fraction of output elements whose rounded prediction equals the rounded target.
    pub accuracy: f32,
    /// Output elements that contributed to `cost`.
    pub samples: usize,
}

/// Receives per-epoch notifications from the training loop.
pub trait TrainObserver {
    fn on_epoch(&mut self, stats: &EpochStats);
}

pub struct NoOpObserver;

impl TrainObserver for NoOpObserver {
    #[inline]
    fn on_epoch(&mut self, _stats: &EpochStats) {}
}

impl<F> TrainObserver for F
where
    F: FnMut(&EpochStats),
{
    fn on_epoch(&mut self, stats: &EpochStats) {
        self(stats)
    }
}

/// Keeps every epoch's stats.
#[derive(Clone, Debug, Default)]
pub struct History {
    pub epochs: Vec<EpochStats>,
}

impl History {
    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }
}

impl TrainObserver for History {
    fn on_epoch(&mut self, stats: &EpochStats) {
        self.epochs.push(*stats);
    }
}
