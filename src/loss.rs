//! Regression losses between gathered Q-values and their TD targets.

use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

use crate::error::{AproxError, Result};

/// Loss over a batch of scalar predictions.
pub trait Loss {
    /// Mean loss over the batch.
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32>;

    /// Gradient of the mean loss with respect to each prediction.
    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<Array1<f32>>;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum LossFunction {
    /// `mean((p - t)^2)`
    #[default]
    MeanSquared,
    /// Smooth L1: quadratic within `delta`, linear outside.
    Huber { delta: f32 },
}

fn check_aligned(predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(AproxError::dimension_mismatch(
            format!("{} targets", predictions.len()),
            format!("{} targets", targets.len()),
        ));
    }
    if predictions.is_empty() {
        return Err(AproxError::contract("loss over an empty batch"));
    }
    Ok(())
}

impl Loss for LossFunction {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32> {
        check_aligned(predictions, targets)?;
        let n = predictions.len() as f32;
        let diff = &predictions - &targets;
        let total: f32 = match *self {
            LossFunction::MeanSquared => diff.iter().map(|d| d * d).sum(),
            LossFunction::Huber { delta } => diff
                .iter()
                .map(|&d| {
                    let a = d.abs();
                    if a < delta { 0.5 * d * d / delta } else { a - 0.5 * delta }
                })
                .sum(),
        };
        Ok(total / n)
    }

    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<Array1<f32>> {
        check_aligned(predictions, targets)?;
        let n = predictions.len() as f32;
        let diff = &predictions - &targets;
        Ok(match *self {
            LossFunction::MeanSquared => diff.mapv(|d| 2.0 * d / n),
            LossFunction::Huber { delta } => diff.mapv(|d| {
                if d.abs() < delta { d / (delta * n) } else { d.signum() / n }
            }),
        })
    }
}
