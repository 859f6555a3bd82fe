//! # Deep Q-Learning Agent
//!
//! - [`exploration`]: epsilon-greedy action selection with an exponentially
//!   decaying exploration rate
//! - [`dqn`]: the temporal-difference optimization step that regresses
//!   `Q(s, a)` toward `r + gamma * max_a' Q(s', a')`, with terminal steps
//!   contributing no future value
//!
//! ```rust
//! use aprox_rl::agent::{DqnLearner, EpsilonGreedy, EpsilonSchedule};
//! use aprox_rl::loss::LossFunction;
//! use aprox_rl::network::QNetwork;
//! use aprox_rl::optimizer::{OptimizerWrapper, RMSProp};
//! use aprox_rl::replay_buffer::ReplayBuffer;
//! use aprox_rl::transition::Transition;
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut network = QNetwork::mlp(2, 8, 2, OptimizerWrapper::RMSProp(RMSProp::default()), &mut rng).unwrap();
//! let mut policy = EpsilonGreedy::seeded(EpsilonSchedule::new(0.9, 0.05, 200.0).unwrap(), 2);
//! let mut learner = DqnLearner::seeded(2, 0.999, LossFunction::MeanSquared, 3).unwrap();
//! let mut buffer = ReplayBuffer::new(200).unwrap();
//!
//! let state = array![0.1, -0.1];
//! let action = policy.select_action(&network, state.view()).unwrap();
//! buffer.push(Transition::terminal(state, action, 1.0));
//!
//! // One transition is not a full batch yet.
//! assert!(learner.optimize_model(&mut network, &buffer).unwrap().is_none());
//! ```

pub mod dqn;
pub mod exploration;

pub use dqn::{Batch, DqnLearner, OptimizationStats, gather_action_values, next_state_values, td_targets};
pub use exploration::{EpsilonGreedy, EpsilonSchedule, greedy_action};
