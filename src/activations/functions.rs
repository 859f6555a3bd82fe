use ndarray::{Array1, Array2, ArrayView2};
use serde::{Serialize, Deserialize};

/// Activation applied after a dense layer's affine transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
    Sigmoid,
    Tanh,
}

fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

impl Activation {
    /// Value of the activation at a single pre-activation input.
    pub fn value(&self, v: f32) -> f32 {
        match self {
            Activation::Relu => v.max(0.0),
            Activation::Linear => v,
            Activation::Sigmoid => sigmoid(v),
            Activation::Tanh => v.tanh(),
        }
    }

    /// Derivative with respect to the pre-activation input.
    pub fn slope(&self, v: f32) -> f32 {
        match self {
            Activation::Relu => {
                if v > 0.0 { 1.0 } else { 0.0 }
            }
            Activation::Linear => 1.0,
            Activation::Sigmoid => {
                let s = sigmoid(v);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = v.tanh();
                1.0 - t * t
            }
        }
    }

    /// Apply the activation in place to a single vector.
    pub fn apply(&self, input: &mut Array1<f32>) {
        if !matches!(self, Activation::Linear) {
            input.mapv_inplace(|v| self.value(v));
        }
    }

    /// Apply the activation in place to a batch (one row per sample).
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        if !matches!(self, Activation::Linear) {
            inputs.mapv_inplace(|v| self.value(v));
        }
    }

    /// Element-wise derivative for a batch of pre-activation values.
    pub fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Linear => Array2::ones(inputs.dim()),
            _ => inputs.mapv(|v| self.slope(v)),
        }
    }
}
