//! # Action-Value Estimator
//!
//! The learner and the exploration policy only see the estimator through
//! [`ActionValueEstimator`]: a differentiable map from a batch of
//! observations to one value per action, plus the `zero_grad` / `backward` /
//! `step` cycle of a gradient optimizer.
//!
//! Inference goes through [`ActionValueEstimator::evaluate`], which borrows
//! the estimator immutably. Greedy action selection and TD-target
//! computation therefore cannot touch gradient state or parameters.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{AproxError, Result};

pub trait ActionValueEstimator {
    /// Width of an observation vector.
    fn state_size(&self) -> usize;

    /// Number of discrete actions, i.e. the width of each output row.
    fn action_count(&self) -> usize;

    /// Q-values for a batch of states, `(batch, action_count)`.
    fn evaluate(&self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Q-values for a single state.
    fn evaluate_one(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        let batch = self.evaluate(state.insert_axis(Axis(0)))?;
        batch
            .outer_iter()
            .next()
            .map(|row| row.to_owned())
            .ok_or_else(|| AproxError::NumericalError("estimator returned no rows".to_string()))
    }

    /// Forward pass that records what `backward` needs.
    fn forward_train(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Discard accumulated gradients.
    fn zero_grad(&mut self);

    /// Backpropagate dLoss/dOutput through the last `forward_train`.
    fn backward(&mut self, output_grad: ArrayView2<f32>) -> Result<()>;

    /// Apply one optimizer update from the accumulated gradients.
    fn step(&mut self);

    /// Flattened copy of every trainable parameter.
    fn parameters(&self) -> Vec<f32>;
}
