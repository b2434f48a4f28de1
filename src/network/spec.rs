use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::math::rng::RandomSource;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size` — number of values feeding into this layer (the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `size`       — number of neurons in this layer
/// - `activation` — activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture.
///
/// Only the shape is stored; weights are drawn fresh by `build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in log output.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Trace per-layer deltas during backward.
    #[serde(default)]
    pub verbose: bool,
}

impl NetworkSpec {
    /// `input_size → 300 ReLU → n_classes Softmax`, the digit classifier.
    pub fn classifier(input_size: usize, n_classes: usize) -> NetworkSpec {
        NetworkSpec {
            name: "classifier".to_string(),
            layers: vec![
                LayerSpec { input_size, size: 300, activation: ActivationFunction::ReLU },
                LayerSpec { input_size: 300, size: n_classes, activation: ActivationFunction::Softmax },
            ],
            verbose: false,
        }
    }

    /// Instantiates the described network, drawing initial weights from `rng`.
    /// Fails with `ArchitectureMismatch` if adjacent layers disagree.
    pub fn build(&self, rng: &mut RandomSource) -> Result<Network> {
        let mut network = Network::new(self.verbose);
        for layer in &self.layers {
            network.add_dense(layer.input_size, layer.size, layer.activation, rng)?;
        }
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
