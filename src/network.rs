use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{AproxError, Result};
use crate::estimator::ActionValueEstimator;
use crate::layers::DenseLayer;
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward Q-network: a stack of dense layers driven by one optimizer.
///
/// # Example
///
/// ```rust
/// use aprox_rl::network::QNetwork;
/// use aprox_rl::estimator::ActionValueEstimator;
/// use aprox_rl::optimizer::{OptimizerWrapper, RMSProp};
/// use ndarray::array;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let optimizer = OptimizerWrapper::RMSProp(RMSProp::default());
/// let network = QNetwork::mlp(4, 8, 2, optimizer, &mut rng).unwrap();
///
/// let q = network.evaluate_one(array![0.0, 0.1, -0.1, 0.0].view()).unwrap();
/// assert_eq!(q.len(), 2);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl QNetwork {
    /// Build a network from `layer_sizes` (input first, actions last) and one
    /// activation per layer.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(AproxError::invalid_parameter(
                "layer_sizes",
                "network needs at least an input and an output size",
            ));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(AproxError::invalid_parameter(
                "activations".to_string(),
                format!(
                    "expected {} activations, got {}",
                    layer_sizes.len() - 1,
                    activations.len()
                ),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations)
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(QNetwork { layers, optimizer })
    }

    /// One sigmoid hidden layer feeding a linear head, one output per action.
    pub fn mlp<R: Rng + ?Sized>(
        state_size: usize,
        hidden_size: usize,
        action_count: usize,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(
            &[state_size, hidden_size, action_count],
            &[Activation::Sigmoid, Activation::Linear],
            optimizer,
            rng,
        )
    }

    pub fn with_layers(mut self, layers: Vec<DenseLayer>) -> Result<Self> {
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(AproxError::dimension_mismatch(
                    pair[0].output_size().to_string(),
                    pair[1].input_size().to_string(),
                ));
            }
        }
        if layers.is_empty() {
            return Err(AproxError::invalid_parameter("layers", "network needs at least one layer"));
        }
        self.layers = layers;
        Ok(self)
    }

    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.evaluate_one(input)
    }

    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.forward(current.view())?;
        }
        Ok(current)
    }
}

impl ActionValueEstimator for QNetwork {
    fn state_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    fn action_count(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    fn evaluate(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.forward_batch(states)
    }

    fn forward_train(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current = states.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_train(current.view())?;
        }
        Ok(current)
    }

    fn zero_grad(&mut self) {
        for layer in &mut self.layers {
            layer.zero_grad();
        }
    }

    fn backward(&mut self, output_grad: ArrayView2<f32>) -> Result<()> {
        let mut grad = output_grad.to_owned();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(grad.view())?;
        }
        Ok(())
    }

    fn step(&mut self) {
        self.optimizer.begin_step();
        for (index, layer) in self.layers.iter_mut().enumerate() {
            if let Some((weights, weight_grads, biases, bias_grads)) = layer.params_and_grads() {
                self.optimizer.update_weights(index, weights, weight_grads);
                self.optimizer.update_biases(index, biases, bias_grads);
            }
        }
    }

    fn parameters(&self) -> Vec<f32> {
        self.layers
            .iter()
            .flat_map(|layer| layer.weights.iter().chain(layer.biases.iter()).copied())
            .collect()
    }
}
