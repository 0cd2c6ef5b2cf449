use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hyperparameters of a training run. Fixed for the lifetime of a network.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub learning_rate: f32,
    pub epochs: u32,
    pub batch_size: u32,
    /// Seeds shuffling, dropout masks and, when no initializer is given, the
    /// initial weights. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 0.3,
            epochs: 100,
            batch_size: 16,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn new(learning_rate: f32, epochs: u32, batch_size: u32) -> Self {
        TrainConfig {
            learning_rate,
            epochs,
            batch_size,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::invalid(
                "learning_rate",
                self.learning_rate,
                "must be positive and finite",
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size", self.batch_size, "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::TrainConfig;
    use crate::error::Error;

    #[test]
    fn test_validate() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig::new(1.0, 0, 1).validate().is_ok());
        for bad in [
            TrainConfig::new(0.0, 10, 1),
            TrainConfig::new(-0.5, 10, 1),
            TrainConfig::new(f32::NAN, 10, 1),
            TrainConfig::new(0.1, 10, 0),
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_seed_is_optional_in_json() {
        let config: TrainConfig =
            serde_json::from_str(r#"{"learning_rate":0.03,"epochs":1000,"batch_size":16}"#).unwrap();
        assert_eq!(config, TrainConfig::new(0.03, 1000, 16));
    }
}
