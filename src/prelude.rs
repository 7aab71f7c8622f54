pub use serde::{Serialize, Deserialize};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;
pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};

pub use crate::models::{NetConfig, NeuralNet, NeuralNetBuilder, DEFAULT_SPEED};
pub use crate::error::*;

// Internal re-exports
pub use crate::core::{
    activate,
    activation_derivative,
    DiagnosticSink,
    InputLayer,
    Layer,
    LayerKind,
    LayerSlot,
    Normalization,
    TracingSink,
};
