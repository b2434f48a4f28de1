use log::{debug, warn};

use crate::{
    activation::activation::ActivationFunction,
    error::{NetError, Result},
    layers::dense::Layer,
    loss::cross_entropy::CrossEntropyLoss,
    math::rng::RandomSource,
};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Ordered stack of dense layers trained with Softmax + cross-entropy.
///
/// Per sample the caller runs `forward` then `backward`; once per mini-batch
/// it calls `update_param`.
///
/// `backward` seeds the output delta with `output - target`, which is the
/// loss gradient only when the last layer is `Softmax` and the loss is
/// cross-entropy. Any other final activation trains against a wrong gradient;
/// the network logs a warning the first time that happens.
#[derive(Debug, Default)]
pub struct Network {
    layers: Vec<Layer>,
    verbose: bool,
    forward_pending: bool,
    warned_output: bool,
}

impl Network {
    /// `verbose` traces every layer's delta at `debug` level during `backward`.
    pub fn new(verbose: bool) -> Network {
        Network { verbose, ..Network::default() }
    }

    /// Appends `layer`, rejecting it if its input size differs from the
    /// previous layer's output size.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        if let Some(last) = self.layers.last() {
            if last.size() != layer.input_size() {
                return Err(NetError::ArchitectureMismatch {
                    layer: self.layers.len(),
                    expected: last.size(),
                    got: layer.input_size(),
                });
            }
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Builds and appends a randomly initialized layer.
    pub fn add_dense(
        &mut self,
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut RandomSource,
    ) -> Result<()> {
        if let Some(last) = self.layers.last() {
            // check before drawing so a rejected layer leaves rng untouched
            if last.size() != input_size {
                return Err(NetError::ArchitectureMismatch {
                    layer: self.layers.len(),
                    expected: last.size(),
                    got: input_size,
                });
            }
        }
        self.add_layer(Layer::new(input_size, size, activation, rng)?)
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if self.layers.is_empty() {
            return Err(NetError::EmptyNetwork);
        }
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        self.forward_pending = true;
        Ok(current)
    }

    /// Forward pass followed by argmax over the output.
    pub fn predict(&mut self, input: &[f64]) -> Result<usize> {
        Ok(argmax(&self.forward(input)?))
    }

    /// Accumulates gradients for the sample passed to the preceding
    /// `forward` call.
    pub fn backward(&mut self, target: &[f64]) -> Result<()> {
        let last_index = self.layers.len().checked_sub(1).ok_or(NetError::EmptyNetwork)?;
        if !self.forward_pending {
            return Err(NetError::PreconditionViolation(
                "backward called without a preceding forward",
            ));
        }
        let last = &mut self.layers[last_index];
        if target.len() != last.size() {
            return Err(NetError::ShapeMismatch {
                what: "target",
                expected: last.size(),
                got: target.len(),
            });
        }
        if last.activation() != ActivationFunction::Softmax && !self.warned_output {
            warn!(
                "output layer uses {:?}; backward assumes Softmax with cross-entropy loss",
                last.activation()
            );
            self.warned_output = true;
        }

        let mut delta = CrossEntropyLoss::derivative(last.output(), target);
        last.update_grad(&delta)?;
        self.trace(last_index, &delta);

        for l in (0..last_index).rev() {
            let (head, tail) = self.layers.split_at_mut(l + 1);
            delta = head[l].calc_delta(&delta, tail[0].weights())?;
            head[l].update_grad(&delta)?;
            self.trace(l, &delta);
        }
        self.forward_pending = false;
        Ok(())
    }

    /// Cross-entropy of the most recent output against `target`.
    pub fn calc_loss(&self, target: &[f64]) -> Result<f64> {
        let last = self.layers.last().ok_or(NetError::EmptyNetwork)?;
        if target.len() != last.size() {
            return Err(NetError::ShapeMismatch {
                what: "target",
                expected: last.size(),
                got: target.len(),
            });
        }
        Ok(CrossEntropyLoss::loss(last.output(), target))
    }

    /// Applies the averaged accumulated gradient to every layer and resets
    /// the accumulators.
    pub fn update_param(&mut self, learning_rate: f64) {
        for layer in &mut self.layers {
            layer.update_param(learning_rate);
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Output of the most recent `forward`, empty for a network without layers.
    pub fn output(&self) -> &[f64] {
        match self.layers.last() {
            Some(layer) => layer.output(),
            None => &[],
        }
    }

    fn trace(&self, layer: usize, delta: &[f64]) {
        if self.verbose {
            debug!("delta of layer {layer}: {delta:?}");
        }
    }
}

/// Index of the first maximum element in a slice (0 when empty).
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}
