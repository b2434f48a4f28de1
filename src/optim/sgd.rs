use log::info;

use crate::error::{NetError, Result};
use crate::network::network::Network;

/// Plain mini-batch gradient descent with an externally driven decay.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "learning rate must be positive, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Flushes the network's accumulated batch gradients into its weights.
    pub fn step(&self, network: &mut Network) {
        network.update_param(self.learning_rate);
    }

    /// Multiplies the learning rate by `factor`.
    pub fn decay(&mut self, factor: f64) {
        self.learning_rate *= factor;
        info!("decaying learning rate to {}", self.learning_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_rate() {
        assert!(Sgd::new(0.0).is_err());
        assert!(Sgd::new(-0.1).is_err());
        assert!(Sgd::new(f64::INFINITY).is_err());
    }

    #[test]
    fn decay_scales_rate() {
        let mut sgd = Sgd::new(0.2).unwrap();
        sgd.decay(0.5);
        assert_eq!(sgd.learning_rate, 0.1);
    }
}
