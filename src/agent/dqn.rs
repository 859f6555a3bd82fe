use ndarray::{stack, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{AproxError, Result};
use crate::estimator::ActionValueEstimator;
use crate::loss::{Loss, LossFunction};
use crate::replay_buffer::ReplayBuffer;
use crate::transition::{NextState, Transition};

/// A sampled minibatch split into aligned columns.
#[derive(Clone, Debug)]
pub struct Batch {
    pub states: Array2<f32>,
    pub actions: Vec<usize>,
    pub next_states: Vec<NextState>,
    pub rewards: Array1<f32>,
    /// `non_final[i]` is true when `next_states[i]` is an observation.
    pub non_final: Vec<bool>,
}

impl Batch {
    pub fn collate(transitions: &[&Transition]) -> Result<Self> {
        if transitions.is_empty() {
            return Err(AproxError::contract("cannot collate an empty batch"));
        }
        let views: Vec<ArrayView1<f32>> = transitions.iter().map(|t| t.state()).collect();
        let states = stack(Axis(0), &views).map_err(|e| {
            AproxError::dimension_mismatch("equal-width states".to_string(), e.to_string())
        })?;
        let next_states: Vec<NextState> = transitions.iter().map(|t| t.next_state().clone()).collect();
        let non_final = next_states.iter().map(|s| !s.is_terminal()).collect();

        let batch = Batch {
            states,
            actions: transitions.iter().map(|t| t.action()).collect(),
            next_states,
            rewards: transitions.iter().map(|t| t.reward()).collect(),
            non_final,
        };
        batch.check_aligned()?;
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// All five columns must describe the same rows.
    pub fn check_aligned(&self) -> Result<()> {
        let n = self.actions.len();
        let lengths = [
            self.states.nrows(),
            self.next_states.len(),
            self.rewards.len(),
            self.non_final.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(AproxError::contract(format!(
                "misaligned batch: {} actions but columns of lengths {:?}",
                n, lengths
            )));
        }
        Ok(())
    }
}

/// `Q(state[i])[action[i]]` for every row.
pub fn gather_action_values(q_values: ArrayView2<f32>, actions: &[usize]) -> Result<Array1<f32>> {
    if q_values.nrows() != actions.len() {
        return Err(AproxError::dimension_mismatch(
            format!("{} rows", actions.len()),
            format!("{} rows", q_values.nrows()),
        ));
    }
    actions
        .iter()
        .enumerate()
        .map(|(row, &action)| {
            q_values.get([row, action]).copied().ok_or(AproxError::InvalidAction {
                action,
                max_actions: q_values.ncols(),
            })
        })
        .collect()
}

/// Best next-state value per row: 0 for terminal rows, otherwise
/// `max_a Q(next_state)[a]` from an inference-only evaluation.
pub fn next_state_values<Q: ActionValueEstimator + ?Sized>(estimator: &Q, batch: &Batch) -> Result<Array1<f32>> {
    batch.check_aligned()?;
    let live: Vec<ArrayView1<f32>> = batch.next_states.iter().filter_map(NextState::as_view).collect();
    if live.is_empty() {
        return Ok(Array1::zeros(batch.len()));
    }

    let stacked = stack(Axis(0), &live).map_err(|e| {
        AproxError::dimension_mismatch("equal-width next states".to_string(), e.to_string())
    })?;
    let q_next = estimator.evaluate(stacked.view())?;
    let mut rows = q_next.outer_iter();

    let mut values = Vec::with_capacity(batch.len());
    for &non_final in &batch.non_final {
        if non_final {
            let row = rows
                .next()
                .ok_or_else(|| AproxError::contract("estimator returned fewer rows than next states"))?;
            values.push(row.iter().copied().fold(f32::NEG_INFINITY, f32::max));
        } else {
            values.push(0.0);
        }
    }
    Ok(Array1::from(values))
}

/// Bootstrapped targets `next_values * gamma + rewards`.
pub fn td_targets(next_values: ArrayView1<f32>, rewards: ArrayView1<f32>, gamma: f32) -> Result<Array1<f32>> {
    if next_values.len() != rewards.len() {
        return Err(AproxError::dimension_mismatch(
            format!("{} rewards", next_values.len()),
            format!("{} rewards", rewards.len()),
        ));
    }
    Ok(&next_values * gamma + &rewards)
}

/// Outcome of one optimization step.
#[derive(Clone, Debug)]
pub struct OptimizationStats {
    pub loss: f32,
    /// `Q(s, a)` for the sampled rows, before the update.
    pub state_action_values: Array1<f32>,
    /// TD targets the values were regressed toward.
    pub expected_values: Array1<f32>,
}

/// Fits an estimator toward one-step TD targets from replayed transitions.
///
/// The same estimator produces both the predictions and the bootstrapped
/// targets; there is no separate target network.
#[derive(Clone, Debug)]
pub struct DqnLearner {
    pub batch_size: usize,
    pub gamma: f32,
    pub loss: LossFunction,
    rng: StdRng,
}

impl DqnLearner {
    pub fn new(batch_size: usize, gamma: f32, loss: LossFunction, rng: StdRng) -> Result<Self> {
        if batch_size == 0 {
            return Err(AproxError::invalid_parameter("batch_size", "batch size must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(AproxError::invalid_parameter("gamma", "discount must lie in [0, 1]"));
        }
        Ok(DqnLearner { batch_size, gamma, loss, rng })
    }

    pub fn seeded(batch_size: usize, gamma: f32, loss: LossFunction, seed: u64) -> Result<Self> {
        Self::new(batch_size, gamma, loss, StdRng::seed_from_u64(seed))
    }

    /// Run one optimization step if the buffer holds a full batch.
    ///
    /// Returns `Ok(None)` without touching the estimator while the buffer is
    /// still warming up.
    pub fn optimize_model<Q: ActionValueEstimator + ?Sized>(
        &mut self,
        estimator: &mut Q,
        buffer: &ReplayBuffer,
    ) -> Result<Option<OptimizationStats>> {
        if !buffer.is_warm(self.batch_size) {
            return Ok(None);
        }
        let transitions = buffer.sample(self.batch_size, &mut self.rng)?;
        self.train_on_batch(estimator, &transitions).map(Some)
    }

    /// One gradient update on an explicit batch.
    pub fn train_on_batch<Q: ActionValueEstimator + ?Sized>(
        &self,
        estimator: &mut Q,
        transitions: &[&Transition],
    ) -> Result<OptimizationStats> {
        let batch = Batch::collate(transitions)?;

        let next_values = next_state_values(&*estimator, &batch)?;
        let expected_values = td_targets(next_values.view(), batch.rewards.view(), self.gamma)?;

        let q_values = estimator.forward_train(batch.states.view())?;
        let state_action_values = gather_action_values(q_values.view(), &batch.actions)?;

        let loss = self.loss.compute(state_action_values.view(), expected_values.view())?;
        if !loss.is_finite() {
            return Err(AproxError::NumericalError(format!("loss is {}", loss)));
        }
        let value_grads = self.loss.gradient(state_action_values.view(), expected_values.view())?;

        // Only the taken action's output receives gradient.
        let mut output_grad = Array2::<f32>::zeros(q_values.raw_dim());
        for (row, (&action, &grad)) in batch.actions.iter().zip(value_grads.iter()).enumerate() {
            output_grad[[row, action]] = grad;
        }

        estimator.zero_grad();
        estimator.backward(output_grad.view())?;
        estimator.step();

        Ok(OptimizationStats { loss, state_action_values, expected_values })
    }
}
