use ndarray::{Array1, ArrayView1};

/// What followed a step: another observation, or the end of the episode.
///
/// Kept distinct from any observation value, so an all-zero observation is
/// never mistaken for a terminal step.
#[derive(Clone, Debug, PartialEq)]
pub enum NextState {
    Value(Array1<f32>),
    Terminal,
}

impl NextState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NextState::Terminal)
    }

    pub fn as_view(&self) -> Option<ArrayView1<'_, f32>> {
        match self {
            NextState::Value(state) => Some(state.view()),
            NextState::Terminal => None,
        }
    }
}

/// One observed `(state, action, next_state, reward)` step.
///
/// Fields are private; a transition cannot change after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    state: Array1<f32>,
    action: usize,
    next_state: NextState,
    reward: f32,
}

impl Transition {
    pub fn new(state: Array1<f32>, action: usize, next_state: NextState, reward: f32) -> Self {
        Transition { state, action, next_state, reward }
    }

    /// A step after which the episode ended.
    pub fn terminal(state: Array1<f32>, action: usize, reward: f32) -> Self {
        Self::new(state, action, NextState::Terminal, reward)
    }

    pub fn state(&self) -> ArrayView1<'_, f32> {
        self.state.view()
    }

    pub fn action(&self) -> usize {
        self.action
    }

    pub fn next_state(&self) -> &NextState {
        &self.next_state
    }

    pub fn reward(&self) -> f32 {
        self.reward
    }

    pub fn is_terminal(&self) -> bool {
        self.next_state.is_terminal()
    }
}
