pub mod network;
pub mod spec;

pub use network::{argmax, Network, DEFAULT_LEARNING_RATE};
pub use spec::{NetworkSpec, LayerSpec};
