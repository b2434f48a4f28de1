pub mod idx;

pub use idx::Dataset;
