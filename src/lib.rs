pub mod core;
pub mod error;
pub mod models;
pub mod plot;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{activate, activation_derivative, InputLayer, Layer, LayerKind};
pub use crate::error::{NNError, Result};
pub use crate::models::{NetConfig, NeuralNet, NeuralNetBuilder};
