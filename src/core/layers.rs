use crate::prelude::*;
use crate::core::activations::{activate_all, activation_derivative};
use crate::core::diagnostics::{LayerSlot, Sink};
use crate::rand_array;

/// How a layer interprets the error vector handed to [`Layer::propagate`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// The error is re-weighted by the layer's own weights and passed
    /// through the activation derivative before corrections are staged.
    Hidden,
    /// The error already contains the output derivative and is used as is.
    Output,
}

/// Raw input values. Overwritten on every forward pass; owns no parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InputLayer {
    width: usize,
    #[serde(skip)]
    nodes: Array1<f64>,
}

impl InputLayer {
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Input width must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            width,
            nodes: Array1::zeros(width),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    /// Replaces every node value. `values` must have exactly `width()` items.
    pub fn set_nodes(&mut self, values: &[f64]) -> Result<()> {
        NNError::check_len("input", self.width, values.len())?;
        self.nodes.assign(&ArrayView1::from(values));
        Ok(())
    }

    pub(crate) fn restore(&mut self) -> Result<()> {
        if self.width == 0 {
            return Err(NNError::UninitializedNetwork("input layer has no nodes".to_string()));
        }
        self.nodes = Array1::zeros(self.width);
        Ok(())
    }
}

/// Fully-connected layer: the hidden stack and the output layer.
///
/// `weights` has shape `(previous_width, width)`, so `weights[[j, i]]`
/// connects node `j` of the previous layer to node `i` of this one.
/// `nodes` hold raw sums; whoever reads them applies the activation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Layer {
    slot: LayerSlot,
    width: usize,
    previous_width: usize,
    weights: Array2<f64>,
    biases: Array1<f64>,

    // Rebuilt on load
    #[serde(skip)]
    nodes: Array1<f64>,
    #[serde(skip)]
    weight_correction: Array2<f64>,
    #[serde(skip)]
    bias_correction: Array1<f64>,
}

impl Layer {
    /// Creates a layer with zero weights and biases drawn from `Uniform(-3, 3)`.
    pub fn new<R: Rng + ?Sized>(
        slot: LayerSlot,
        width: usize,
        previous_width: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if width == 0 || previous_width == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            slot,
            width,
            previous_width,
            weights: Array2::zeros((previous_width, width)),
            biases: rand_array!(rng, width),
            nodes: Array1::zeros(width),
            weight_correction: Array2::zeros((previous_width, width)),
            bias_correction: Array1::zeros(width),
        })
    }

    pub fn kind(&self) -> LayerKind {
        match self.slot {
            LayerSlot::Hidden(_) => LayerKind::Hidden,
            LayerSlot::Output => LayerKind::Output,
        }
    }

    pub fn slot(&self) -> LayerSlot {
        self.slot
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn previous_width(&self) -> usize {
        self.previous_width
    }

    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f64> {
        &self.biases
    }

    pub fn weight_correction(&self) -> &Array2<f64> {
        &self.weight_correction
    }

    pub fn bias_correction(&self) -> &Array1<f64> {
        &self.bias_correction
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Overwrites `nodes[i]` with `Σ_j activate(previous[j]) * weights[[j, i]] + biases[i]`.
    pub fn compute_nodes(&mut self, previous: &Array1<f64>, sink: &mut Sink) -> Result<()> {
        NNError::check_len("previous layer nodes", self.previous_width, previous.len())?;

        let sums = activate_all(previous).dot(&self.weights);
        if let Some(sink) = sink.as_mut() {
            for (i, sum) in sums.iter().enumerate() {
                sink.node_computed(self.slot, i, *sum, self.biases[i]);
            }
        }
        self.nodes = sums + &self.biases;
        Ok(())
    }

    /// Stages weight and bias corrections for `errors` (one per node of this
    /// layer) and returns the error signal for the layer before this one.
    ///
    /// `previous` are the raw node values of the layer feeding this one.
    /// Parameters are left untouched until [`Layer::apply`].
    pub fn propagate(
        &mut self,
        errors: &Array1<f64>,
        learning_rate: f64,
        previous: &Array1<f64>,
        sink: &mut Sink,
    ) -> Result<Array1<f64>> {
        NNError::check_len("errors", self.width, errors.len())?;
        NNError::check_len("previous layer nodes", self.previous_width, previous.len())?;

        let signal = match self.kind() {
            LayerKind::Hidden => {
                let column_sums = self.weights.sum_axis(Axis(0));
                let mut derived = Array1::zeros(self.width);
                for i in 0..self.width {
                    let accumulated = errors[i] * column_sums[i];
                    derived[i] = activation_derivative(accumulated);
                    if let Some(sink) = sink.as_mut() {
                        sink.error_accumulated(self.slot, i, accumulated);
                        sink.error_derived(self.slot, i, derived[i]);
                    }
                }
                derived
            }
            LayerKind::Output => errors.clone(),
        };

        let activated = activate_all(previous);
        for ((j, i), correction) in self.weight_correction.indexed_iter_mut() {
            *correction = learning_rate * signal[i] * activated[j];
        }
        for (i, correction) in self.bias_correction.iter_mut().enumerate() {
            *correction = signal[i] * learning_rate;
            if let Some(sink) = sink.as_mut() {
                sink.bias_correction(self.slot, i, *correction);
            }
        }

        Ok(signal)
    }

    /// Commits staged corrections: weights are incremented, biases replaced.
    pub fn apply(&mut self) {
        self.weights += &self.weight_correction;
        self.biases.assign(&self.bias_correction);
    }

    pub(crate) fn restore(&mut self) -> Result<()> {
        if self.width == 0 || self.previous_width == 0 {
            return Err(NNError::UninitializedNetwork(format!("{:?} layer has no nodes", self.slot)));
        }
        if self.weights.dim() != (self.previous_width, self.width) || self.biases.len() != self.width {
            return Err(NNError::UninitializedNetwork(format!(
                "{:?} layer parameters do not match its {}x{} shape",
                self.slot, self.previous_width, self.width
            )));
        }
        self.nodes = Array1::zeros(self.width);
        self.weight_correction = Array2::zeros((self.previous_width, self.width));
        self.bias_correction = Array1::zeros(self.width);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn parameters_mut(&mut self) -> (&mut Array2<f64>, &mut Array1<f64>) {
        (&mut self.weights, &mut self.biases)
    }
}
