use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use super::{check_action, Environment, StepOutcome};
use crate::error::{AproxError, Result};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const HALF_POLE_LENGTH: f32 = 0.5;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;
const X_THRESHOLD: f32 = 2.4;
// 12 degrees
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;

/// Classic cart-pole balancing task.
///
/// Observation: `[x, x_dot, theta, theta_dot]`. Action 0 pushes left, 1
/// pushes right. Every step pays 1.0; the episode ends when the pole
/// falls past 12 degrees, the cart leaves the track, or `max_steps` is hit.
#[derive(Debug, Clone)]
pub struct CartPole {
    state: [f32; 4],
    steps: usize,
    max_steps: usize,
    done: bool,
    rng: StdRng,
}

impl CartPole {
    pub fn new(seed: u64) -> Self {
        Self::with_max_steps(seed, 500)
    }

    pub fn with_max_steps(seed: u64, max_steps: usize) -> Self {
        CartPole {
            state: [0.0; 4],
            steps: 0,
            max_steps,
            done: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observation(&self) -> Array1<f32> {
        let [x, x_dot, theta, theta_dot] = self.state;
        array![x, x_dot, theta, theta_dot]
    }
}

impl Environment for CartPole {
    fn reset(&mut self) -> Result<Array1<f32>> {
        for value in self.state.iter_mut() {
            *value = self.rng.gen_range(-0.05..0.05);
        }
        self.steps = 0;
        self.done = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        check_action(action, self.action_count())?;
        if self.done {
            return Err(AproxError::Environment(
                "step called on a finished episode; call reset first".to_string(),
            ));
        }

        let [x, x_dot, theta, theta_dot] = self.state;
        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let total_mass = MASS_CART + MASS_POLE;
        let pole_mass_length = MASS_POLE * HALF_POLE_LENGTH;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin_theta) / total_mass;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (HALF_POLE_LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        let fell = self.state[0].abs() > X_THRESHOLD || self.state[2].abs() > THETA_THRESHOLD;
        let truncated = !fell && self.steps >= self.max_steps;
        self.done = fell || truncated;

        Ok(StepOutcome {
            observation: self.observation(),
            reward: 1.0,
            done: self.done,
            info: json!({ "steps": self.steps, "truncated": truncated }),
        })
    }

    fn action_count(&self) -> usize {
        2
    }

    fn observation_size(&self) -> usize {
        4
    }
}
