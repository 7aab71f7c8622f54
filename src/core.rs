// src/core.rs
pub mod activations;
pub mod diagnostics;
pub mod layers;
pub mod losses;
pub mod normalization;
pub mod output;

// Re-export commonly used items
pub use activations::{activate, activation_derivative};
pub use diagnostics::{DiagnosticSink, LayerSlot, Sink, TracingSink};
pub use layers::{InputLayer, Layer, LayerKind};
pub use losses::{mean_squared_error, squared_error};
pub use normalization::Normalization;
