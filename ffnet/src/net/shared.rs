use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::net::observer::TrainObserver;
use crate::net::{Network, TrainControl};
use crate::tensor::Tensor;
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};

/// A network that can be handed to several threads. Only one `train` runs at
/// a time; a call that arrives while another is in progress fails with
/// [`Error::AlreadyTraining`] instead of waiting.
#[derive(Clone)]
pub struct SharedNetwork {
    inner: Arc<Mutex<Network>>,
    control: TrainControl,
}

impl SharedNetwork {
    pub fn new(network: Network) -> Self {
        let control = network.control();
        SharedNetwork {
            inner: Arc::new(Mutex::new(network)),
            control,
        }
    }

    #[inline]
    pub fn control(&self) -> TrainControl {
        self.control.clone()
    }

    #[inline]
    pub fn is_training(&self) -> bool {
        self.control.is_training()
    }

    pub fn train(&self, dataset: &Dataset, observer: &mut dyn TrainObserver) -> Result<f32> {
        let _guard = self.control.try_begin().ok_or_else(|| {
            warn!("Rejected train call, network is already training");
            Error::AlreadyTraining
        })?;
        self.lock().run_epochs(dataset, observer)
    }

    /// Blocks while a training run holds the network.
    pub fn predict(&self, input: &Tensor) -> Result<Tensor> {
        self.lock().predict(input)
    }

    /// Exclusive access to the wrapped network.
    pub fn lock(&self) -> MutexGuard<'_, Network> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
