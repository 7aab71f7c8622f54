//! Observers for the numeric pipeline.
//!
//! A sink is handed every intermediate value a layer produces while it
//! computes nodes or stages corrections. Sinks only see copies of the values,
//! so enabling one never changes what the network computes.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Where a layer sits in the network, as reported to a [`DiagnosticSink`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSlot {
    Hidden(usize),
    Output,
}

pub trait DiagnosticSink: Debug {
    /// A node's weighted sum before its bias is added.
    fn node_computed(&mut self, _layer: LayerSlot, _node: usize, _weighted_sum: f64, _bias: f64) {}

    /// Error accumulated for a hidden node, before the derivative step.
    fn error_accumulated(&mut self, _layer: LayerSlot, _node: usize, _value: f64) {}

    /// Error for a hidden node after the derivative step.
    fn error_derived(&mut self, _layer: LayerSlot, _node: usize, _value: f64) {}

    fn bias_correction(&mut self, _layer: LayerSlot, _node: usize, _value: f64) {}
}

/// Optional sink slot held by a network and lent to its layers.
pub type Sink = Option<Box<dyn DiagnosticSink>>;

/// Forwards every hook to `tracing` at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn node_computed(&mut self, layer: LayerSlot, node: usize, weighted_sum: f64, bias: f64) {
        tracing::trace!(?layer, node, weighted_sum, bias, "layer compute");
    }

    fn error_accumulated(&mut self, layer: LayerSlot, node: usize, value: f64) {
        tracing::trace!(?layer, node, value, "error");
    }

    fn error_derived(&mut self, layer: LayerSlot, node: usize, value: f64) {
        tracing::trace!(?layer, node, value, "error deactivated");
    }

    fn bias_correction(&mut self, layer: LayerSlot, node: usize, value: f64) {
        tracing::trace!(?layer, node, value, "bias correction");
    }
}
