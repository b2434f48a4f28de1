use serde::{Serialize, Deserialize};

/// Result of one pass over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassStats {
    /// Mean cross-entropy over all samples.
    pub mean_loss: f64,
    /// Fraction of samples whose argmax output differs from the label.
    pub error_rate: f64,
}

/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub train: PassStats,
    /// Evaluation on the held-out set, if one was provided.
    pub test: Option<PassStats>,
    /// Learning rate in effect during this epoch.
    pub learning_rate: f64,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
