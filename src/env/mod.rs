//! # Environments
//!
//! The trainer drives any [`Environment`]: `reset` yields the first
//! observation, `step` applies a discrete action and reports the next
//! observation, the reward, whether the episode ended, and free-form `info`.
//!
//! Action indices are validated against [`Environment::action_count`] by
//! [`check_action`] before they cross into the environment.

pub mod cartpole;

pub use cartpole::CartPole;

use ndarray::Array1;

use crate::error::{AproxError, Result};

/// Result of applying one action.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: Array1<f32>,
    pub reward: f32,
    pub done: bool,
    pub info: serde_json::Value,
}

pub trait Environment {
    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply `action`, an index in `0..action_count()`.
    fn step(&mut self, action: usize) -> Result<StepOutcome>;

    fn action_count(&self) -> usize;

    fn observation_size(&self) -> usize;
}

/// Reject action indices the environment does not define.
pub fn check_action(action: usize, action_count: usize) -> Result<()> {
    if action >= action_count {
        return Err(AproxError::InvalidAction { action, max_actions: action_count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_action_bounds() {
        assert!(check_action(0, 4).is_ok());
        assert!(check_action(3, 4).is_ok());
        assert_eq!(
            check_action(4, 4),
            Err(AproxError::InvalidAction { action: 4, max_actions: 4 })
        );
    }
}
