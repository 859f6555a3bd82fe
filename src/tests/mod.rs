pub mod test_exploration;
pub mod test_replay_buffer;
pub mod test_trainer;

mod fixtures {
    use ndarray::{array, Array1, Array2, ArrayView2};

    use crate::env::{Environment, StepOutcome};
    use crate::error::Result;
    use crate::estimator::ActionValueEstimator;
    use crate::trainer::StopHandle;
    use crate::transition::{NextState, Transition};

    /// Transition whose reward doubles as an identity tag.
    pub fn tagged(tag: usize) -> Transition {
        let state = array![tag as f32, 0.0];
        if tag % 3 == 0 {
            Transition::terminal(state, tag % 2, tag as f32)
        } else {
            Transition::new(state, tag % 2, NextState::Value(array![tag as f32 + 1.0, 0.5]), tag as f32)
        }
    }

    /// Fixed-length episodes with a two-wide observation and two actions.
    pub struct Corridor {
        pub episode_len: usize,
        pub position: usize,
        pub total_steps: usize,
        /// Request a stop once this many steps have been taken in total.
        pub stop_after: Option<(usize, StopHandle)>,
    }

    impl Corridor {
        pub fn new(episode_len: usize) -> Self {
            Corridor { episode_len, position: 0, total_steps: 0, stop_after: None }
        }

        fn observation(&self) -> Array1<f32> {
            array![self.position as f32 / self.episode_len as f32, 1.0]
        }
    }

    impl Environment for Corridor {
        fn reset(&mut self) -> Result<Array1<f32>> {
            self.position = 0;
            Ok(self.observation())
        }

        fn step(&mut self, action: usize) -> Result<StepOutcome> {
            self.position += 1;
            self.total_steps += 1;
            if let Some((limit, handle)) = &self.stop_after {
                if self.total_steps >= *limit {
                    handle.stop();
                }
            }
            Ok(StepOutcome {
                observation: self.observation(),
                reward: if action == 1 { 1.0 } else { 0.5 },
                done: self.position >= self.episode_len,
                info: serde_json::Value::Null,
            })
        }

        fn action_count(&self) -> usize {
            2
        }

        fn observation_size(&self) -> usize {
            2
        }
    }

    /// Returns the same Q-values for every state and never learns.
    pub struct FixedValues {
        pub values: Array1<f32>,
        pub state_size: usize,
        pub action_count: usize,
    }

    impl FixedValues {
        pub fn new(values: Array1<f32>, state_size: usize) -> Self {
            let action_count = values.len();
            FixedValues { values, state_size, action_count }
        }
    }

    impl ActionValueEstimator for FixedValues {
        fn state_size(&self) -> usize {
            self.state_size
        }

        fn action_count(&self) -> usize {
            self.action_count
        }

        fn evaluate(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
            let mut out = Array2::zeros((states.nrows(), self.values.len()));
            for mut row in out.outer_iter_mut() {
                row.assign(&self.values);
            }
            Ok(out)
        }

        fn forward_train(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
            self.evaluate(states)
        }

        fn zero_grad(&mut self) {}

        fn backward(&mut self, _output_grad: ArrayView2<f32>) -> Result<()> {
            Ok(())
        }

        fn step(&mut self) {}

        fn parameters(&self) -> Vec<f32> {
            self.values.to_vec()
        }
    }
}
