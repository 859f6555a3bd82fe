use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{AproxError, Result};
use crate::estimator::ActionValueEstimator;

/// Exponentially decaying exploration rate.
///
/// `eps(s) = end + (start - end) * exp(-s / decay)` where `s` counts every
/// action selected over the whole run, not per episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub end: f64,
    pub decay: f64,
    steps_done: u64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, end: f64, decay: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) {
            return Err(AproxError::invalid_parameter(
                "epsilon",
                "start and end must lie in [0, 1]",
            ));
        }
        if end > start {
            return Err(AproxError::invalid_parameter("epsilon", "end must not exceed start"));
        }
        if !(decay > 0.0 && decay.is_finite()) {
            return Err(AproxError::invalid_parameter("decay", "decay must be positive and finite"));
        }
        Ok(EpsilonSchedule { start, end, decay, steps_done: 0 })
    }

    /// Exploration rate after `steps` action selections.
    pub fn threshold_at(&self, steps: u64) -> f64 {
        self.end + (self.start - self.end) * (-(steps as f64) / self.decay).exp()
    }

    /// Exploration rate the next selection will use.
    pub fn current(&self) -> f64 {
        self.threshold_at(self.steps_done)
    }

    pub fn advance(&mut self) {
        self.steps_done += 1;
    }

    pub fn steps_done(&self) -> u64 {
        self.steps_done
    }
}

/// Index of the largest Q-value; the lowest index wins ties.
pub fn greedy_action(q_values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in q_values.iter().enumerate() {
        if value.is_nan() {
            return Err(AproxError::NumericalError(format!("Q-value for action {} is NaN", index)));
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
        .ok_or_else(|| AproxError::NumericalError("no Q-values to choose from".to_string()))
}

/// Epsilon-greedy action selection over an [`ActionValueEstimator`].
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    schedule: EpsilonSchedule,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(schedule: EpsilonSchedule, rng: StdRng) -> Self {
        EpsilonGreedy { schedule, rng }
    }

    pub fn seeded(schedule: EpsilonSchedule, seed: u64) -> Self {
        Self::new(schedule, StdRng::seed_from_u64(seed))
    }

    /// Pick an action for `state`.
    ///
    /// Draws `u ~ U[0, 1)`, reads the threshold for the current count, then
    /// advances the count whichever branch is taken. `u > threshold` picks
    /// the greedy action, otherwise a uniformly random one.
    pub fn select_action<Q: ActionValueEstimator + ?Sized>(
        &mut self,
        estimator: &Q,
        state: ArrayView1<f32>,
    ) -> Result<usize> {
        let action_count = estimator.action_count();
        if action_count == 0 {
            return Err(AproxError::contract("estimator exposes no actions"));
        }

        let sample: f64 = self.rng.gen();
        let threshold = self.schedule.current();
        self.schedule.advance();

        if sample > threshold {
            let q_values = estimator.evaluate_one(state)?;
            greedy_action(q_values.view())
        } else {
            Ok(self.rng.gen_range(0..action_count))
        }
    }

    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    pub fn steps_done(&self) -> u64 {
        self.schedule.steps_done()
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.current()
    }
}
