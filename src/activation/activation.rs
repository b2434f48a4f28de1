use serde::{Serialize, Deserialize};

/// Smallest denominator used by the `Sigmoid` gradient once `1 - sigmoid(x)`
/// underflows to zero.
const GRADIENT_FLOOR: f64 = f64::EPSILON;

/// Nonlinearity applied to a layer's pre-activation vector.
///
/// The sigmoid used by `Sigmoid` and `Swish` is `1 / (1 + e^x)` (note the
/// sign), and both gradients below are kept exactly as this network has
/// always trained with them:
///
/// - `Sigmoid`: `s(x) / (1 - s(x))`
/// - `Swish`:   `swish(x) + s(x) · (1 - swish(x))`
///
/// Neither matches the textbook derivative of its activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    Swish,
    /// Couples all entries of the vector. Its gradient is the identity
    /// because the network seeds backprop with the combined
    /// Softmax + cross-entropy delta (`predicted - expected`).
    Softmax,
}

impl ActivationFunction {
    pub fn activation(&self, input: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::ReLU => input.iter().map(|&x| if x > 0.0 { x } else { 0.0 }).collect(),
            ActivationFunction::Sigmoid => input.iter().map(|&x| sigmoid(x)).collect(),
            ActivationFunction::Swish => input.iter().map(|&x| swish(x)).collect(),
            ActivationFunction::Softmax => softmax(input),
        }
    }

    pub fn gradient(&self, input: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::ReLU => input.iter().map(|&x| if x > 0.0 { 1.0 } else { 0.0 }).collect(),
            ActivationFunction::Sigmoid => input.iter()
                .map(|&x| {
                    let s = sigmoid(x);
                    s / (1.0 - s).max(GRADIENT_FLOOR)
                })
                .collect(),
            ActivationFunction::Swish => input.iter()
                .map(|&x| {
                    let sw = swish(x);
                    sw + sigmoid(x) * (1.0 - sw)
                })
                .collect(),
            ActivationFunction::Softmax => input.to_vec(),
        }
    }
}

/// `1 / (1 + e^x)`. Saturates to 0 for large `x` instead of producing NaN.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + x.exp())
}

pub fn swish(x: f64) -> f64 {
    x * sigmoid(x)
}

/// Full-vector softmax, shifted by the maximum so `exp` cannot overflow.
/// Underflowed entries are floored at the smallest positive `f64`.
pub fn softmax(input: &[f64]) -> Vec<f64> {
    let max = input.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = input.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| (e / sum).max(f64::MIN_POSITIVE)).collect()
}
