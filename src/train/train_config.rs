use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; use `1` for online SGD
/// - `learning_rate` — initial step size
/// - `decay_factor`  — multiplier applied to the learning rate whenever an
///                     epoch's mean training loss is worse than the previous one
/// - `seed`          — seeds weight initialization; `None` draws from OS entropy
///
/// Missing JSON fields fall back to `TrainConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub decay_factor: f64,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 50,
            batch_size: 100,
            learning_rate: 0.2,
            decay_factor: 0.5,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.decay_factor > 0.0 && self.decay_factor <= 1.0) {
            return Err(NetError::InvalidConfig(format!(
                "decay_factor must lie in (0, 1], got {}",
                self.decay_factor
            )));
        }
        Ok(())
    }

    /// Reads and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        TrainConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{ "epochs": 3, "seed": 11 }"#).unwrap();
        assert_eq!(config.epochs, 3);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn rejects_zero_batch_and_bad_decay() {
        let config = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(config.validate().is_err());
        let config = TrainConfig { decay_factor: 1.5, ..TrainConfig::default() };
        assert!(config.validate().is_err());
        let config = TrainConfig { learning_rate: 0.0, ..TrainConfig::default() };
        assert!(config.validate().is_err());
    }
}
