//! # aprox-rl - Deep Q-Learning with Experience Replay
//!
//! A small value-based reinforcement learning trainer for discrete-action
//! environments. A feed-forward Q-network is fitted toward one-step
//! temporal-difference targets sampled from a bounded replay buffer, while
//! an epsilon-greedy policy with an exponentially decaying exploration rate
//! drives the environment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aprox_rl::config::TrainingConfig;
//! use aprox_rl::env::CartPole;
//! use aprox_rl::network::QNetwork;
//! use aprox_rl::trainer::Trainer;
//!
//! let config = TrainingConfig { seed: Some(0), ..Default::default() };
//! let mut rng = config.rng(0);
//! let network = QNetwork::mlp(4, config.hidden_size, 2, config.optimizer(), &mut rng).unwrap();
//!
//! let mut trainer = Trainer::new(config, CartPole::new(0), network).unwrap();
//! let report = trainer.run().unwrap();
//! println!("{}", report.metrics.summary());
//! ```
//!
//! ## Module Organization
//!
//! - [`transition`] - Transition records with an explicit terminal marker
//! - [`replay_buffer`] - Fixed-capacity ring buffer with uniform sampling
//! - [`estimator`] - The action-value estimator interface
//! - [`network`] - Dense Q-network implementing the estimator
//! - [`agent`] - Epsilon-greedy exploration and the DQN optimization step
//! - [`env`] - Environment interface and a built-in CartPole
//! - [`trainer`] - The episode driver
//! - [`config`] - Training hyperparameters
//! - [`metrics`] - Per-episode training series
//! - [`visualization`] - Text plots and metric export

pub mod activations;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod estimator;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod trainer;
pub mod transition;
pub mod visualization;

#[cfg(test)]
mod tests;
