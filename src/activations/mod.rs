//! # Activation Functions
//!
//! Element-wise non-linearities for the dense layers of the Q-network.
//!
//! - **Relu**: `max(0, x)`
//! - **Linear**: identity, used on the output layer so Q-values are unbounded
//! - **Sigmoid**: `1 / (1 + e^(-x))`, the default hidden activation of the
//!   small Q-network
//! - **Tanh**: hyperbolic tangent
//!
//! ```rust
//! use aprox_rl::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
