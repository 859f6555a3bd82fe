use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{AproxError, Result};

/// A fully connected layer: `activation(inputs · weights + biases)`.
///
/// Weights are stored `(input_size, output_size)` so a batch with one sample
/// per row multiplies on the left.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    weight_grads: Option<Array2<f32>>,
    #[serde(skip)]
    bias_grads: Option<Array1<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
    #[serde(skip)]
    pre_activation: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a layer with weights and biases drawn from
    /// `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(AproxError::invalid_parameter(
                "layer_size",
                "layers need at least one input and one output",
            ));
        }
        let bound = 1.0 / (input_size as f32).sqrt();
        let dist = Uniform::new(-bound, bound);
        Ok(DenseLayer {
            weights: Array2::random_using((input_size, output_size), dist, rng),
            biases: Array1::random_using(output_size, dist, rng),
            activation,
            weight_grads: None,
            bias_grads: None,
            inputs: None,
            pre_activation: None,
        })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(AproxError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.len() != self.biases.len() {
            return Err(AproxError::dimension_mismatch(
                self.biases.len().to_string(),
                biases.len().to_string(),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    fn affine(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        if inputs.ncols() != self.input_size() {
            return Err(AproxError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0)))
    }

    /// Inference pass. Leaves no trace on the layer.
    pub fn forward(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut outputs = self.affine(inputs)?;
        self.activation.apply_batch(&mut outputs);
        Ok(outputs)
    }

    /// Training pass: caches inputs and pre-activations for `backward`.
    pub fn forward_train(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let pre = self.affine(inputs)?;
        let mut outputs = pre.clone();
        self.activation.apply_batch(&mut outputs);
        self.inputs = Some(inputs.to_owned());
        self.pre_activation = Some(pre);
        Ok(outputs)
    }

    /// Backpropagate `output_grad` (dLoss/dOutput), accumulate the parameter
    /// gradients and return dLoss/dInput.
    pub fn backward(&mut self, output_grad: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (inputs, pre) = match (&self.inputs, &self.pre_activation) {
            (Some(inputs), Some(pre)) => (inputs, pre),
            _ => {
                return Err(AproxError::contract(
                    "backward called without a preceding forward_train",
                ))
            }
        };
        if output_grad.dim() != pre.dim() {
            return Err(AproxError::dimension_mismatch(
                format!("{:?}", pre.dim()),
                format!("{:?}", output_grad.dim()),
            ));
        }

        let delta = &output_grad * &self.activation.derivative_batch(pre.view());
        let weight_grads = inputs.t().dot(&delta);
        let bias_grads = delta.sum_axis(Axis(0));
        let input_grad = delta.dot(&self.weights.t());

        match self.weight_grads.as_mut() {
            Some(acc) => *acc += &weight_grads,
            None => self.weight_grads = Some(weight_grads),
        }
        match self.bias_grads.as_mut() {
            Some(acc) => *acc += &bias_grads,
            None => self.bias_grads = Some(bias_grads),
        }
        Ok(input_grad)
    }

    pub fn zero_grad(&mut self) {
        self.weight_grads = None;
        self.bias_grads = None;
    }

    /// Accumulated gradients since the last `zero_grad`, if any.
    pub fn gradients(&self) -> Option<(&Array2<f32>, &Array1<f32>)> {
        match (&self.weight_grads, &self.bias_grads) {
            (Some(w), Some(b)) => Some((w, b)),
            _ => None,
        }
    }

    /// Mutable parameters paired with their gradients, for the optimizer.
    pub(crate) fn params_and_grads(
        &mut self,
    ) -> Option<(&mut Array2<f32>, &Array2<f32>, &mut Array1<f32>, &Array1<f32>)> {
        match (&self.weight_grads, &self.bias_grads) {
            (Some(wg), Some(bg)) => Some((&mut self.weights, wg, &mut self.biases, bg)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer(activation: Activation) -> DenseLayer {
        let mut rng = StdRng::seed_from_u64(3);
        DenseLayer::new(2, 2, activation, &mut rng)
            .unwrap()
            .with_weights(array![[1.0, -1.0], [0.5, 2.0]])
            .unwrap()
            .with_biases(array![0.0, 1.0])
            .unwrap()
    }

    #[test]
    fn test_init_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let layer = DenseLayer::new(16, 4, Activation::Relu, &mut rng).unwrap();
        assert!(layer.weights.iter().all(|w| w.abs() <= 0.25));
        assert!(layer.biases.iter().all(|b| b.abs() <= 0.25));
    }

    #[test]
    fn test_forward_linear() {
        let layer = layer(Activation::Linear);
        let out = layer.forward(array![[1.0, 2.0]].view()).unwrap();
        assert_eq!(out, array![[2.0, 4.0]]);
    }

    #[test]
    fn test_forward_rejects_wrong_width() {
        let layer = layer(Activation::Linear);
        assert!(matches!(
            layer.forward(array![[1.0, 2.0, 3.0]].view()),
            Err(AproxError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_backward_requires_forward_train() {
        let mut layer = layer(Activation::Linear);
        assert!(matches!(
            layer.backward(array![[1.0, 1.0]].view()),
            Err(AproxError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_backward_accumulates_until_zero_grad() {
        let mut layer = layer(Activation::Linear);
        let x = array![[1.0, 2.0]];
        layer.forward_train(x.view()).unwrap();
        layer.backward(array![[1.0, 0.0]].view()).unwrap();
        layer.backward(array![[1.0, 0.0]].view()).unwrap();
        let (wg, bg) = layer.gradients().unwrap();
        assert_eq!(wg, &array![[2.0, 0.0], [4.0, 0.0]]);
        assert_eq!(bg, &array![2.0, 0.0]);

        layer.zero_grad();
        assert!(layer.gradients().is_none());
    }
}
