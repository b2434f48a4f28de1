use log::debug;

use crate::{
    activation::activation::ActivationFunction,
    error::{NetError, Result},
    math::{matrix::Matrix, rng::RandomSource},
};

/// One fully-connected stage: `output = activation(augmented_input · W)`.
///
/// The bias is carried as the last row of `W`; `forward` appends a constant
/// `1.0` to every input so bias and ordinary weights share the same
/// accumulation and update code.
///
/// # Cached state
/// `forward` overwrites the cached augmented input, pre-activation and output.
/// `calc_delta` and `update_grad` read those caches and are only meaningful
/// when they follow the `forward` call for the same sample. Calling them
/// without it is not detected: they silently use whatever the last `forward`
/// (or construction, which zero-fills the caches) left behind.
#[derive(Debug, Clone)]
pub struct Layer{
    input_size: usize,   // augmented, i.e. inputs + 1
    size: usize,
    weights: Matrix,
    weight_grads: Matrix,
    activator: ActivationFunction,
    input: Vec<f64>,
    pre_neurons: Vec<f64>,
    neurons: Vec<f64>,
    sample_count: usize,
}

impl Layer {
    /// Creates a layer taking `input_size` values and producing `size`,
    /// with weights drawn from `rng` and divided by `input_size + 1`.
    pub fn new(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut RandomSource,
    ) -> Result<Layer> {
        check_dims(input_size, size)?;
        let weights = Matrix::random(input_size + 1, size, rng);
        Ok(Layer::from_parts(weights, activation))
    }

    /// Creates a layer around an explicit `(inputs + 1) × outputs` weight
    /// matrix whose last row holds the bias weights.
    pub fn with_weights(weights: Matrix, activation: ActivationFunction) -> Result<Layer> {
        check_dims(weights.rows.saturating_sub(1), weights.cols)?;
        Ok(Layer::from_parts(weights, activation))
    }

    fn from_parts(weights: Matrix, activation: ActivationFunction) -> Layer {
        let (rows, cols) = (weights.rows, weights.cols);
        Layer {
            input_size: rows,
            size: cols,
            weights,
            weight_grads: Matrix::zeros(rows, cols),
            activator: activation,
            input: vec![0.0; rows],
            pre_neurons: vec![0.0; cols],
            neurons: vec![0.0; cols],
            sample_count: 0,
        }
    }

    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() + 1 != self.input_size {
            return Err(NetError::ShapeMismatch {
                what: "layer input",
                expected: self.input_size - 1,
                got: input.len(),
            });
        }
        self.input.clear();
        self.input.extend_from_slice(input);
        self.input.push(1.0);

        self.pre_neurons = self.weights.project(&self.input);
        self.neurons = self.activator.activation(&self.pre_neurons);
        Ok(self.neurons.clone())
    }

    /// Backpropagates the downstream layer's delta through its weights:
    /// `δ[j] = f'(u)[j] · Σ_k next_delta[k] · next_weights[j][k]`.
    ///
    /// The bias row of `next_weights` does not contribute.
    pub fn calc_delta(&self, next_delta: &[f64], next_weights: &Matrix) -> Result<Vec<f64>> {
        if next_weights.rows != self.size + 1 {
            return Err(NetError::ShapeMismatch {
                what: "next layer weight rows",
                expected: self.size + 1,
                got: next_weights.rows,
            });
        }
        if next_delta.len() != next_weights.cols {
            return Err(NetError::ShapeMismatch {
                what: "next layer delta",
                expected: next_weights.cols,
                got: next_delta.len(),
            });
        }
        let grad = self.activator.gradient(&self.pre_neurons);
        let back = next_weights.back_project(next_delta, self.size);
        Ok(back.into_iter().zip(grad).map(|(b, g)| b * g).collect())
    }

    /// Adds `augmented_input ⊗ delta` to the gradient accumulator and counts
    /// one more sample.
    pub fn update_grad(&mut self, delta: &[f64]) -> Result<()> {
        if delta.len() != self.size {
            return Err(NetError::ShapeMismatch {
                what: "layer delta",
                expected: self.size,
                got: delta.len(),
            });
        }
        self.weight_grads.add_outer(&self.input, delta);
        self.sample_count += 1;
        Ok(())
    }

    /// Batch-averaged descent step `W -= lr · grads / samples`, then resets
    /// the accumulator. Does nothing when no sample was accumulated.
    pub fn update_param(&mut self, learning_rate: f64) {
        if self.sample_count == 0 {
            debug!("update_param skipped: no accumulated samples");
            return;
        }
        self.weights.sub_scaled(&self.weight_grads, learning_rate / self.sample_count as f64);
        self.weight_grads.fill(0.0);
        self.sample_count = 0;
    }

    /// Number of (unaugmented) inputs.
    pub fn input_size(&self) -> usize {
        self.input_size - 1
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn weight_grads(&self) -> &Matrix {
        &self.weight_grads
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Output of the most recent `forward`.
    pub fn output(&self) -> &[f64] {
        &self.neurons
    }

    /// Pre-activation of the most recent `forward`.
    pub fn pre_activation(&self) -> &[f64] {
        &self.pre_neurons
    }
}

fn check_dims(input_size: usize, size: usize) -> Result<()> {
    if input_size == 0 || size == 0 {
        return Err(NetError::InvalidConfig(format!(
            "layer dimensions must be non-zero, got {input_size} -> {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layer(rows: Vec<Vec<f64>>, act: ActivationFunction) -> Layer {
        Layer::with_weights(Matrix::from_data(rows).unwrap(), act).unwrap()
    }

    #[test]
    fn forward_appends_bias_input() {
        let mut l = layer(vec![vec![2.0], vec![3.0], vec![0.5]], ActivationFunction::ReLU);
        let out = l.forward(&[1.0, -1.0]).unwrap();
        // 2 - 3 + 0.5
        assert_eq!(out, vec![0.0]);
        assert_eq!(l.pre_activation(), &[-0.5]);
    }

    #[test]
    fn forward_rejects_wrong_length() {
        let mut rng = RandomSource::seeded(0.0, 1.0, 1).unwrap();
        let mut l = Layer::new(3, 2, ActivationFunction::Sigmoid, &mut rng).unwrap();
        assert!(matches!(
            l.forward(&[1.0, 2.0]),
            Err(NetError::ShapeMismatch { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn new_layer_shapes() {
        let mut rng = RandomSource::seeded(0.0, 1.0, 9).unwrap();
        let l = Layer::new(4, 3, ActivationFunction::Swish, &mut rng).unwrap();
        assert_eq!(l.weights().rows, 5);
        assert_eq!(l.weights().cols, 3);
        assert_eq!(l.weight_grads(), &Matrix::zeros(5, 3));
        assert_eq!(l.sample_count(), 0);
        assert_eq!(l.input_size(), 4);
    }

    #[test]
    fn zero_sized_layer_is_rejected() {
        let mut rng = RandomSource::seeded(0.0, 1.0, 9).unwrap();
        assert!(Layer::new(0, 3, ActivationFunction::ReLU, &mut rng).is_err());
        assert!(Layer::new(3, 0, ActivationFunction::ReLU, &mut rng).is_err());
    }

    #[test]
    fn calc_delta_uses_next_weights_and_own_gradient() {
        // this layer: 1 input -> 2 outputs, ReLU
        let mut l = layer(vec![vec![1.0, -1.0], vec![0.0, 0.0]], ActivationFunction::ReLU);
        l.forward(&[2.0]).unwrap(); // u = [2, -2]
        let next_w = Matrix::from_data(vec![vec![3.0], vec![4.0], vec![100.0]]).unwrap();
        let delta = l.calc_delta(&[0.5], &next_w).unwrap();
        assert_relative_eq!(delta[0], 1.5);
        assert_relative_eq!(delta[1], 0.0);
    }

    #[test]
    fn calc_delta_checks_next_layer_shape() {
        let l = layer(vec![vec![1.0, -1.0], vec![0.0, 0.0]], ActivationFunction::ReLU);
        let wrong = Matrix::zeros(2, 1);
        assert!(l.calc_delta(&[0.5], &wrong).is_err());
        let next_w = Matrix::zeros(3, 2);
        assert!(l.calc_delta(&[0.5], &next_w).is_err());
    }

    #[test]
    fn update_param_averages_accumulated_gradient() {
        let mut l = layer(vec![vec![0.0], vec![0.0]], ActivationFunction::ReLU);
        l.forward(&[1.0]).unwrap();
        l.update_grad(&[2.0]).unwrap();
        l.forward(&[3.0]).unwrap();
        l.update_grad(&[4.0]).unwrap();

        // sum of outer products: [1,1]⊗[2] + [3,1]⊗[4]
        assert_eq!(l.weight_grads().data, vec![vec![14.0], vec![6.0]]);
        assert_eq!(l.sample_count(), 2);

        l.update_param(0.1);
        assert_relative_eq!(l.weights().data[0][0], -0.7);
        assert_relative_eq!(l.weights().data[1][0], -0.3);
        assert_eq!(l.weight_grads(), &Matrix::zeros(2, 1));
        assert_eq!(l.sample_count(), 0);
    }

    #[test]
    fn update_param_without_samples_is_noop() {
        let mut l = layer(vec![vec![0.25], vec![0.5]], ActivationFunction::ReLU);
        let before = l.weights().clone();
        l.update_param(10.0);
        assert_eq!(l.weights(), &before);
    }
}
