use crate::prelude::*;
use crate::core::activations::{activate_all, activation_derivative};
use crate::core::diagnostics::{DiagnosticSink, LayerSlot, Sink};
use crate::core::layers::{InputLayer, Layer};
use crate::core::losses::mean_squared_error;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const DEFAULT_SPEED: f64 = 0.1;

/// Topology and training settings of a [`NeuralNet`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetConfig {
    pub input_width: usize,
    pub hidden_layers: usize,
    pub hidden_width: usize,
    pub output_width: usize,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

impl NetConfig {
    pub fn build(&self) -> Result<NeuralNet> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut net = NeuralNet::new(
            self.input_width,
            self.hidden_layers,
            self.hidden_width,
            self.output_width,
            &mut rng,
        )?;
        net.set_speed(self.speed)?;
        Ok(net)
    }
}

/// Feedforward network: one input layer, a non-empty hidden stack and an
/// output layer, trained one sample at a time with a fixed learning rate.
#[derive(Serialize, Deserialize, Debug)]
pub struct NeuralNet {
    speed: f64,
    input: InputLayer,
    hidden: Vec<Layer>,
    output: Layer,
    #[serde(skip)]
    sink: Sink,
}

impl NeuralNet {
    /// Builds the full topology up front. The first hidden layer reads
    /// `input_width` nodes, the rest read `hidden_width` nodes.
    pub fn new<R: Rng + ?Sized>(
        input_width: usize,
        hidden_layer_count: usize,
        hidden_width: usize,
        output_width: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if hidden_layer_count == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "At least one hidden layer is required".to_string(),
            ));
        }
        let input = InputLayer::new(input_width)?;
        let mut hidden = Vec::with_capacity(hidden_layer_count);
        hidden.push(Layer::new(LayerSlot::Hidden(0), hidden_width, input_width, rng)?);
        for i in 1..hidden_layer_count {
            hidden.push(Layer::new(LayerSlot::Hidden(i), hidden_width, hidden_width, rng)?);
        }
        let output = Layer::new(LayerSlot::Output, output_width, hidden_width, rng)?;

        Ok(Self {
            speed: DEFAULT_SPEED,
            input,
            hidden,
            output,
            sink: None,
        })
    }

    /// Same as [`NeuralNet::new`] with a generator seeded from `seed`.
    pub fn seeded(
        input_width: usize,
        hidden_layer_count: usize,
        hidden_width: usize,
        output_width: usize,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(input_width, hidden_layer_count, hidden_width, output_width, &mut rng)
    }

    pub fn builder() -> NeuralNetBuilder {
        NeuralNetBuilder::default()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Learning rate must be a positive finite number, got {}",
                speed
            )));
        }
        self.speed = speed;
        Ok(())
    }

    pub fn set_sink(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    pub fn clear_sink(&mut self) -> Option<Box<dyn DiagnosticSink>> {
        self.sink.take()
    }

    pub fn input_width(&self) -> usize {
        self.input.width()
    }

    pub fn output_width(&self) -> usize {
        self.output.width()
    }

    pub fn input_layer(&self) -> &InputLayer {
        &self.input
    }

    pub fn hidden_layers(&self) -> &[Layer] {
        &self.hidden
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output
    }

    pub fn parameter_count(&self) -> usize {
        self.hidden.iter().map(Layer::parameter_count).sum::<usize>() + self.output.parameter_count()
    }

    pub fn config(&self) -> NetConfig {
        NetConfig {
            input_width: self.input.width(),
            hidden_layers: self.hidden.len(),
            hidden_width: self.hidden[0].width(),
            output_width: self.output.width(),
            speed: self.speed,
            seed: None,
        }
    }

    /// Feeds `input` forward and returns the activated output nodes.
    pub fn compute(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.input.set_nodes(input)?;

        let mut previous = self.input.nodes();
        for layer in self.hidden.iter_mut() {
            layer.compute_nodes(previous, &mut self.sink)?;
            previous = layer.nodes();
        }
        self.output.compute_nodes(previous, &mut self.sink)?;

        Ok(activate_all(self.output.nodes()).to_vec())
    }

    /// One training step on a single `(input, expected)` pair.
    ///
    /// Every layer stages its corrections before any of them is applied.
    /// Returns the output of the forward pass that preceded the update.
    pub fn learn(&mut self, input: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        NNError::check_len("expected output", self.output.width(), expected.len())?;
        let result = self.compute(input)?;

        let errors: Array1<f64> = result
            .iter()
            .zip(expected)
            .zip(self.output.nodes())
            .map(|((actual, target), raw)| (target - actual) * activation_derivative(*raw))
            .collect();

        let last = self.hidden.len() - 1;
        self.output.propagate(&errors, self.speed, self.hidden[last].nodes(), &mut self.sink)?;

        // The last hidden layer takes the raw output error, not what the
        // output propagate returned. Only when the widths differ does the
        // error go through the not-yet-applied output weights.
        let mut signal = if self.output.width() == self.hidden[last].width() {
            errors
        } else {
            self.output.weights().dot(&errors)
        };
        for k in (0..=last).rev() {
            let (upstream, rest) = self.hidden.split_at_mut(k);
            let layer = &mut rest[0];
            let previous = if k == last && layer.previous_width() == self.output.width() {
                self.output.nodes()
            } else {
                match upstream.last() {
                    Some(neighbour) => neighbour.nodes(),
                    None => self.input.nodes(),
                }
            };
            signal = layer.propagate(&signal, self.speed, previous, &mut self.sink)?;
        }

        for layer in self.hidden.iter_mut() {
            layer.apply();
        }
        self.output.apply();

        let error = mean_squared_error(&result, expected)?;
        tracing::debug!(error, "learn step applied");
        Ok(result)
    }

    /// Runs `learn` on every sample for `epochs` passes and returns the mean
    /// squared error of each pass.
    pub fn train<I, O>(&mut self, samples: &[(I, O)], epochs: usize) -> Result<Vec<f64>>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if samples.is_empty() {
            return Err(NNError::EmptyDataset);
        }
        let report_every = (epochs / 10).max(1);
        let mut history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let mut epoch_error = 0.0;
            for (input, expected) in samples {
                let output = self.learn(input.as_ref(), expected.as_ref())?;
                epoch_error += mean_squared_error(&output, expected.as_ref())?;
            }
            epoch_error /= samples.len() as f64;
            if epoch % report_every == 0 || epoch + 1 == epochs {
                tracing::info!("Epoch: {}/{} error: {:.6}", epoch + 1, epochs, epoch_error);
            }
            history.push(epoch_error);
        }
        Ok(history)
    }

    /// Mean squared error of the current parameters over `samples`.
    pub fn evaluate<I, O>(&mut self, samples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if samples.is_empty() {
            return Err(NNError::EmptyDataset);
        }
        let mut total = 0.0;
        for (input, expected) in samples {
            let output = self.compute(input.as_ref())?;
            total += mean_squared_error(&output, expected.as_ref())?;
        }
        Ok(total / samples.len() as f64)
    }

    pub fn summary(&self) -> String {
        let mut res = "\nModel NeuralNet\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        res.push_str(&format!("Input\t\t\t  (None, {})\t\t  0\n", self.input.width()));
        for layer in self.hidden.iter().chain(std::iter::once(&self.output)) {
            res.push_str(&format!(
                "{:?}\t\t  (None, {})\t\t  {}\n",
                layer.slot(),
                layer.width(),
                layer.parameter_count()
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.parameter_count()));
        res.push_str(&format!("Learning rate: {}\n", self.speed));
        res
    }

    /// Checks that the layer stack is present and chains shape by shape, and
    /// re-allocates node values and correction buffers.
    pub fn validate(&mut self) -> Result<()> {
        if self.hidden.is_empty() {
            return Err(NNError::UninitializedNetwork("no hidden layers".to_string()));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(NNError::UninitializedNetwork(format!("learning rate is {}", self.speed)));
        }
        self.input.restore()?;

        let hidden_count = self.hidden.len();
        let mut previous_width = self.input.width();
        for (i, layer) in self.hidden.iter_mut().chain(std::iter::once(&mut self.output)).enumerate() {
            let expected_slot = if i < hidden_count { LayerSlot::Hidden(i) } else { LayerSlot::Output };
            if layer.slot() != expected_slot || layer.previous_width() != previous_width {
                return Err(NNError::UninitializedNetwork(format!(
                    "layer {} does not follow a layer of width {}",
                    i, previous_width
                )));
            }
            layer.restore()?;
            previous_width = layer.width();
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut net: NeuralNet = bincode::deserialize(bytes)?;
        net.validate()?;
        Ok(net)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        File::create(path)?.write_all(&encoded)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<NeuralNet> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }
}

/// Chained construction of a [`NeuralNet`].
#[derive(Debug, Default)]
pub struct NeuralNetBuilder {
    input_width: Option<usize>,
    hidden: Option<(usize, usize)>,
    output_width: Option<usize>,
    speed: Option<f64>,
    seed: Option<u64>,
    sink: Sink,
}

impl NeuralNetBuilder {
    pub fn input(mut self, width: usize) -> Self {
        self.input_width = Some(width);
        self
    }

    /// `count` hidden layers of `width` nodes each.
    pub fn hidden(mut self, count: usize, width: usize) -> Self {
        self.hidden = Some((count, width));
        self
    }

    pub fn output(mut self, width: usize) -> Self {
        self.output_width = Some(width);
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> Result<NetConfig> {
        let missing = |what: &str| NNError::InvalidLayerConfiguration(format!("{} is not set", what));
        let (hidden_layers, hidden_width) = self.hidden.ok_or_else(|| missing("hidden stack"))?;
        Ok(NetConfig {
            input_width: self.input_width.ok_or_else(|| missing("input width"))?,
            hidden_layers,
            hidden_width,
            output_width: self.output_width.ok_or_else(|| missing("output width"))?,
            speed: self.speed.unwrap_or(DEFAULT_SPEED),
            seed: self.seed,
        })
    }

    pub fn build(self) -> Result<NeuralNet> {
        let mut net = self.config()?.build()?;
        net.sink = self.sink;
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::activations::activate;
    use crate::core::diagnostics::tests::RecordingSink;
    use approx::assert_relative_eq;

    fn zero_bias_output(seed: u64, hidden_layers: usize) -> NeuralNet {
        let mut net = NeuralNet::seeded(2, hidden_layers, 4, 1, seed).unwrap();
        net.output.parameters_mut().1.fill(0.0);
        net
    }

    #[test]
    fn test_topology() {
        let net = NeuralNet::seeded(3, 3, 5, 2, 1).unwrap();
        assert_eq!(net.input_width(), 3);
        assert_eq!(net.output_width(), 2);
        assert_eq!(net.speed(), 0.1);
        assert_eq!(net.hidden_layers().len(), 3);
        assert_eq!(net.hidden_layers()[0].weights().dim(), (3, 5));
        assert_eq!(net.hidden_layers()[1].weights().dim(), (5, 5));
        assert_eq!(net.hidden_layers()[2].weights().dim(), (5, 5));
        assert_eq!(net.output_layer().weights().dim(), (5, 2));
        assert_eq!(net.output_layer().kind(), LayerKind::Output);
        assert_eq!(net.parameter_count(), (15 + 5) + 2 * (25 + 5) + (10 + 2));
    }

    #[test]
    fn test_invalid_topology() {
        assert!(matches!(
            NeuralNet::seeded(2, 0, 3, 1, 0),
            Err(NNError::InvalidLayerConfiguration(_))
        ));
        assert!(matches!(
            NeuralNet::seeded(2, 1, 0, 1, 0),
            Err(NNError::InvalidLayerConfiguration(_))
        ));
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = NeuralNet::seeded(2, 2, 3, 1, 42).unwrap();
        let b = NeuralNet::seeded(2, 2, 3, 1, 42).unwrap();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let mut net = NeuralNet::seeded(2, 2, 3, 2, 9).unwrap();
        net.learn(&[0.4, 0.6], &[1.0, 0.0]).unwrap();
        let first = net.compute(&[0.1, -0.3]).unwrap();
        let second = net.compute(&[0.1, -0.3]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fresh_network_ignores_input() {
        let mut net = NeuralNet::seeded(2, 1, 3, 1, 17).unwrap();
        let a = net.compute(&[0.0, 1.0]).unwrap();
        let b = net.compute(&[-5.0, 12.5]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0], activate(net.output_layer().biases()[0]));
    }

    #[test]
    fn test_compute_rejects_wrong_input_width() {
        let mut net = NeuralNet::seeded(2, 1, 3, 1, 0).unwrap();
        let err = net.compute(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, NNError::DimensionMismatch { what: "input", expected: 2, actual: 3 }));
        assert!(matches!(net.compute(&[]), Err(NNError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_learn_rejects_wrong_expected_width() {
        let mut net = NeuralNet::seeded(2, 1, 3, 1, 0).unwrap();
        let before = net.to_bytes().unwrap();
        let err = net.learn(&[1.0, 2.0], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, NNError::DimensionMismatch { what: "expected output", .. }));
        assert_eq!(net.to_bytes().unwrap(), before);
    }

    #[test]
    fn test_learn_returns_forward_output() {
        let mut net = NeuralNet::seeded(2, 2, 3, 1, 4).unwrap();
        let mut twin = NeuralNet::from_bytes(&net.to_bytes().unwrap()).unwrap();
        let expected = twin.compute(&[0.2, 0.8]).unwrap();
        assert_eq!(net.learn(&[0.2, 0.8], &[1.0]).unwrap(), expected);
    }

    #[test]
    fn test_learn_step_formulas() {
        let mut net = NeuralNet::seeded(2, 1, 2, 1, 23).unwrap();
        net.compute(&[0.5, -0.5]).unwrap();
        let raw_output = net.output_layer().nodes()[0];
        let hidden_nodes = net.hidden_layers()[0].nodes().clone();
        let result = net.learn(&[0.5, -0.5], &[1.0]).unwrap();

        let error = (1.0 - result[0]) * activation_derivative(raw_output);
        let output = net.output_layer();
        assert_relative_eq!(output.biases()[0], 0.1 * error, epsilon = 1e-12);
        for j in 0..2 {
            assert_relative_eq!(
                output.weights()[[j, 0]],
                0.1 * error * activate(hidden_nodes[j]),
                epsilon = 1e-12
            );
        }

        // Output weights were zero, so the hidden signal is derivative(0).
        let hidden = &net.hidden_layers()[0];
        for i in 0..2 {
            assert_relative_eq!(hidden.biases()[i], 0.25 * 0.1, epsilon = 1e-12);
            assert_relative_eq!(hidden.weights()[[0, i]], 0.1 * 0.25 * activate(0.5), epsilon = 1e-12);
            assert_relative_eq!(hidden.weights()[[1, i]], 0.1 * 0.25 * activate(-0.5), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_error_decreases_monotonically() {
        for hidden_layers in 1..=3 {
            let mut net = zero_bias_output(31, hidden_layers);
            let (input, expected) = ([0.3, 0.7], [0.8]);
            let errors: Vec<f64> = (0..50)
                .map(|_| (expected[0] - net.learn(&input, &expected).unwrap()[0]).abs())
                .collect();
            // The first step replaces every bias, so the descent starts after it.
            for window in errors[1..].windows(2) {
                assert!(window[1] < window[0], "{:?}", window);
            }
        }
    }

    #[test]
    fn test_equal_widths_reuse_raw_output_error() {
        let mut net = NeuralNet::seeded(2, 1, 2, 2, 7).unwrap();
        let (input, expected) = ([0.3, 0.7], [0.8, 0.2]);
        net.learn(&input, &expected).unwrap();
        net.learn(&input, &expected).unwrap();

        let hidden_weights = net.hidden_layers()[0].weights().clone();
        assert!(hidden_weights.iter().any(|w| *w != 0.0));
        let result = net.compute(&input).unwrap();
        let raw_output = net.output_layer().nodes().clone();
        net.learn(&input, &expected).unwrap();

        let hidden = &net.hidden_layers()[0];
        for i in 0..2 {
            let error = (expected[i] - result[i]) * activation_derivative(raw_output[i]);
            let column_sum: f64 = hidden_weights.column(i).sum();
            let derived = activation_derivative(error * column_sum);
            assert_relative_eq!(hidden.bias_correction()[i], 0.1 * derived, epsilon = 1e-12);
            assert_relative_eq!(hidden.biases()[i], 0.1 * derived, epsilon = 1e-12);
            // Output width equals the hidden layer's input width, so the
            // corrections are staged against the output nodes.
            for j in 0..2 {
                assert_relative_eq!(
                    hidden.weight_correction()[[j, i]],
                    0.1 * derived * activate(raw_output[j]),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_hidden_chain_exact_values() {
        for output_width in [3, 1] {
            let mut net = NeuralNet::seeded(2, 3, 3, output_width, 11).unwrap();
            let input = [0.6, -0.2];
            let expected = vec![0.7; output_width];
            net.learn(&input, &expected).unwrap();

            let result = net.compute(&input).unwrap();
            let raw_output = net.output_layer().nodes().clone();
            let output_weights = net.output_layer().weights().clone();
            assert!(output_weights.iter().any(|w| *w != 0.0));
            let weights: Vec<Array2<f64>> =
                net.hidden_layers().iter().map(|layer| layer.weights().clone()).collect();
            let nodes: Vec<Array1<f64>> =
                net.hidden_layers().iter().map(|layer| layer.nodes().clone()).collect();
            net.learn(&input, &expected).unwrap();

            let errors: Array1<f64> = (0..output_width)
                .map(|i| (expected[i] - result[i]) * activation_derivative(raw_output[i]))
                .collect();
            let mut signal = if output_width == 3 {
                errors
            } else {
                output_weights.dot(&errors)
            };
            for k in (0..3).rev() {
                // With equal widths the last hidden layer reads the output nodes.
                let previous = if k == 2 && output_width == 3 {
                    raw_output.clone()
                } else if k > 0 {
                    nodes[k - 1].clone()
                } else {
                    Array1::from(input.to_vec())
                };
                let column_sums = weights[k].sum_axis(Axis(0));
                let derived: Array1<f64> = (0..3)
                    .map(|i| activation_derivative(signal[i] * column_sums[i]))
                    .collect();

                let layer = &net.hidden_layers()[k];
                for i in 0..3 {
                    assert_relative_eq!(layer.bias_correction()[i], 0.1 * derived[i], epsilon = 1e-12);
                    for j in 0..previous.len() {
                        assert_relative_eq!(
                            layer.weight_correction()[[j, i]],
                            0.1 * derived[i] * activate(previous[j]),
                            epsilon = 1e-12
                        );
                        assert_relative_eq!(
                            layer.weights()[[j, i]],
                            weights[k][[j, i]] + 0.1 * derived[i] * activate(previous[j]),
                            epsilon = 1e-12
                        );
                    }
                }
                signal = derived;
            }
        }
    }

    #[test]
    fn test_training_reduces_error_tenfold() {
        let (input, expected) = ([0.3, 0.7], [0.8]);
        for seed in 0..20 {
            let mut net = NeuralNet::seeded(2, 1, 4, 1, seed).unwrap();
            let first = (expected[0] - net.learn(&input, &expected).unwrap()[0]).abs();
            for _ in 1..1000 {
                net.learn(&input, &expected).unwrap();
            }
            let last = (expected[0] - net.compute(&input).unwrap()[0]).abs();
            assert!(last * 10.0 <= first, "seed {} first {} last {}", seed, first, last);
        }
    }

    #[test]
    fn test_sink_does_not_change_results() {
        let mut plain = NeuralNet::seeded(2, 2, 3, 2, 8).unwrap();
        let mut observed = NeuralNet::seeded(2, 2, 3, 2, 8).unwrap();
        let recorder = RecordingSink::default();
        observed.set_sink(Box::new(recorder.clone()));

        for _ in 0..5 {
            assert_eq!(
                plain.learn(&[0.1, 0.9], &[0.0, 1.0]).unwrap(),
                observed.learn(&[0.1, 0.9], &[0.0, 1.0]).unwrap()
            );
        }
        assert_eq!(plain.to_bytes().unwrap(), observed.to_bytes().unwrap());
        assert!(!recorder.lines.borrow().is_empty());

        let lines_before = recorder.lines.borrow().len();
        assert!(observed.clear_sink().is_some());
        observed.compute(&[0.1, 0.9]).unwrap();
        assert_eq!(recorder.lines.borrow().len(), lines_before);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut net = NeuralNet::seeded(2, 2, 4, 3, 77).unwrap();
        net.set_speed(0.25).unwrap();
        for _ in 0..10 {
            net.learn(&[0.3, -0.2], &[0.1, 0.5, 0.9]).unwrap();
        }
        let mut restored = NeuralNet::from_bytes(&net.to_bytes().unwrap()).unwrap();

        assert_eq!(restored.speed(), 0.25);
        assert_eq!(restored.config(), net.config());
        for (a, b) in restored.hidden_layers().iter().zip(net.hidden_layers()) {
            assert_eq!(a.weights(), b.weights());
            assert_eq!(a.biases(), b.biases());
        }
        assert_eq!(restored.output_layer().weights(), net.output_layer().weights());
        assert_eq!(restored.compute(&[0.7, 0.1]).unwrap(), net.compute(&[0.7, 0.1]).unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("sigmanet-{}.model", std::process::id()));
        let mut net = NeuralNet::seeded(3, 1, 2, 1, 5).unwrap();
        net.save(&path).unwrap();
        let mut loaded = NeuralNet::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.compute(&[1.0, 0.0, 1.0]).unwrap(), net.compute(&[1.0, 0.0, 1.0]).unwrap());
    }

    #[test]
    fn test_load_rejects_incoherent_network() {
        let mut net = NeuralNet::seeded(2, 2, 3, 1, 5).unwrap();
        net.hidden.clear();
        let bytes = net.to_bytes().unwrap();
        assert!(matches!(NeuralNet::from_bytes(&bytes), Err(NNError::UninitializedNetwork(_))));

        let mut net = NeuralNet::seeded(2, 2, 3, 1, 5).unwrap();
        net.hidden.swap(0, 1);
        let bytes = net.to_bytes().unwrap();
        assert!(matches!(NeuralNet::from_bytes(&bytes), Err(NNError::UninitializedNetwork(_))));

        assert!(matches!(NeuralNet::from_bytes(&[1, 2, 3]), Err(NNError::SerializationError(_))));
    }

    #[test]
    fn test_builder() {
        let net = NeuralNet::builder()
            .input(2)
            .hidden(2, 3)
            .output(1)
            .speed(0.5)
            .seed(3)
            .build()
            .unwrap();
        assert_eq!(net.speed(), 0.5);
        assert_eq!(net.hidden_layers().len(), 2);
        assert_eq!(net.to_bytes().unwrap(), {
            let mut twin = NeuralNet::seeded(2, 2, 3, 1, 3).unwrap();
            twin.set_speed(0.5).unwrap();
            twin.to_bytes().unwrap()
        });
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            NeuralNet::builder().input(2).output(1).build(),
            Err(NNError::InvalidLayerConfiguration(_))
        ));
        assert!(matches!(
            NeuralNet::builder().input(2).hidden(1, 2).output(1).speed(-0.1).build(),
            Err(NNError::InvalidLayerConfiguration(_))
        ));
        assert!(matches!(
            NeuralNet::builder().input(2).hidden(1, 2).output(1).speed(f64::NAN).build(),
            Err(NNError::InvalidLayerConfiguration(_))
        ));
    }

    #[test]
    fn test_train_and_evaluate() {
        let mut net = zero_bias_output(12, 1);
        let samples = vec![(vec![0.3, 0.7], vec![0.8])];
        let before = net.evaluate(&samples).unwrap();
        let history = net.train(&samples, 200).unwrap();
        assert_eq!(history.len(), 200);
        assert!(history[199] < history[1]);
        assert!(net.evaluate(&samples).unwrap() < before);

        let empty: Vec<(Vec<f64>, Vec<f64>)> = vec![];
        assert!(matches!(net.train(&empty, 3), Err(NNError::EmptyDataset)));
        assert!(matches!(net.evaluate(&empty), Err(NNError::EmptyDataset)));
    }

    #[test]
    fn test_summary() {
        let net = NeuralNet::seeded(2, 1, 4, 1, 0).unwrap();
        let summary = net.summary();
        assert!(summary.contains("Hidden(0)"));
        assert!(summary.contains("Output"));
        assert!(summary.contains("Total params: 17"));
    }
}
