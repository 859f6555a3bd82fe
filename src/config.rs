//! Training hyperparameters.
//!
//! The defaults are the fixed constants of a standard training run. The
//! binary reads nothing from the command line.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::agent::EpsilonSchedule;
use crate::error::{AproxError, Result};
use crate::loss::LossFunction;
use crate::optimizer::{OptimizerWrapper, RMSProp};

pub const CAPACITY: usize = 200;
pub const BATCH_SIZE: usize = 20;
pub const GAMMA: f32 = 0.999;
pub const EPS_START: f64 = 0.9;
pub const EPS_END: f64 = 0.05;
pub const EPS_DECAY: f64 = 200.0;
pub const NUM_EPISODES: usize = 50;
pub const HIDDEN_SIZE: usize = 8;
pub const LEARNING_RATE: f32 = 0.01;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    /// Replay buffer capacity
    pub capacity: usize,
    /// Transitions per optimization step; also the warm-up threshold
    pub batch_size: usize,
    /// Discount factor
    pub gamma: f32,
    pub eps_start: f64,
    pub eps_end: f64,
    /// Time constant of the exploration decay, in action selections
    pub eps_decay: f64,
    pub num_episodes: usize,
    pub hidden_size: usize,
    pub learning_rate: f32,
    pub loss: LossFunction,
    /// Seed for every random stream; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Log a progress line every this many episodes (0 disables)
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            capacity: CAPACITY,
            batch_size: BATCH_SIZE,
            gamma: GAMMA,
            eps_start: EPS_START,
            eps_end: EPS_END,
            eps_decay: EPS_DECAY,
            num_episodes: NUM_EPISODES,
            hidden_size: HIDDEN_SIZE,
            learning_rate: LEARNING_RATE,
            loss: LossFunction::MeanSquared,
            seed: None,
            log_interval: 10,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(AproxError::invalid_parameter("capacity", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(AproxError::invalid_parameter("batch_size", "must be greater than 0"));
        }
        if self.batch_size > self.capacity {
            return Err(AproxError::invalid_parameter(
                "batch_size".to_string(),
                format!("{} exceeds replay capacity {}", self.batch_size, self.capacity),
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(AproxError::invalid_parameter("gamma", "must lie in [0, 1]"));
        }
        if self.hidden_size == 0 {
            return Err(AproxError::invalid_parameter("hidden_size", "must be greater than 0"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(AproxError::invalid_parameter("learning_rate", "must be positive"));
        }
        if let LossFunction::Huber { delta } = self.loss {
            if !(delta > 0.0) {
                return Err(AproxError::invalid_parameter("loss", "huber delta must be positive"));
            }
        }
        self.schedule().map(|_| ())
    }

    pub fn schedule(&self) -> Result<EpsilonSchedule> {
        EpsilonSchedule::new(self.eps_start, self.eps_end, self.eps_decay)
    }

    /// RMSProp with the configured learning rate and PyTorch's other defaults.
    pub fn optimizer(&self) -> OptimizerWrapper {
        OptimizerWrapper::RMSProp(RMSProp::new(self.learning_rate, 0.99, 1e-8))
    }

    /// Independent random stream `stream`, derived from the seed when set.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}
