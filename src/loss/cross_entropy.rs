/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Probabilities are clamped to at least this value before `ln` so the loss
/// stays finite.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Computes the scalar cross-entropy loss:
    ///   L = -sum(expected[i] * log(max(predicted[i], eps)))
    ///
    /// `predicted` — softmax probabilities, shape [n_classes]
    /// `expected`  — one-hot (or soft) target distribution, shape [n_classes]
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * p.max(EPS).ln())
            .sum()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the pre-softmax
    /// logits:
    ///   ∂L/∂z_i = predicted[i] - expected[i]
    ///
    /// This is the delta that seeds the backward pass at the output layer.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}
