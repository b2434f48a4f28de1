pub mod matrix;
pub mod rng;

pub use matrix::Matrix;
pub use rng::RandomSource;
