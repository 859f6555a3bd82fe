//! # Episode Driver
//!
//! [`Trainer`] runs the interaction loop: for each step it asks the
//! exploration policy for an action, applies it to the environment, stores
//! the resulting transition in the replay buffer and runs one optimization
//! step. The loop is single-threaded; the only cross-thread surface is the
//! [`StopHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::{DqnLearner, EpsilonGreedy};
use crate::config::TrainingConfig;
use crate::env::{check_action, Environment};
use crate::error::{AproxError, Result};
use crate::estimator::ActionValueEstimator;
use crate::metrics::{EpisodeSummary, MetricsTracker, TrainingMetrics, TrainingReport};
use crate::replay_buffer::ReplayBuffer;
use crate::transition::{NextState, Transition};
use crate::visualization::training_progress;

const POLICY_STREAM: u64 = 1;
const LEARNER_STREAM: u64 = 2;

/// Requests a cooperative stop. Checked between environment steps.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Trainer<E: Environment, Q: ActionValueEstimator> {
    config: TrainingConfig,
    env: E,
    estimator: Q,
    buffer: ReplayBuffer,
    policy: EpsilonGreedy,
    learner: DqnLearner,
    tracker: MetricsTracker,
    stop: StopHandle,
}

impl<E: Environment, Q: ActionValueEstimator> Trainer<E, Q> {
    pub fn new(config: TrainingConfig, env: E, estimator: Q) -> Result<Self> {
        config.validate()?;
        if env.observation_size() != estimator.state_size() {
            return Err(AproxError::dimension_mismatch(
                format!("estimator input of {}", env.observation_size()),
                format!("{}", estimator.state_size()),
            ));
        }
        if env.action_count() != estimator.action_count() {
            return Err(AproxError::dimension_mismatch(
                format!("estimator output of {}", env.action_count()),
                format!("{}", estimator.action_count()),
            ));
        }

        let buffer = ReplayBuffer::new(config.capacity)?;
        let policy = EpsilonGreedy::new(config.schedule()?, config.rng(POLICY_STREAM));
        let learner = DqnLearner::new(
            config.batch_size,
            config.gamma,
            config.loss,
            config.rng(LEARNER_STREAM),
        )?;

        Ok(Trainer {
            config,
            env,
            estimator,
            buffer,
            policy,
            learner,
            tracker: MetricsTracker::new(),
            stop: StopHandle::default(),
        })
    }

    /// A handle that can end the run from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Share an existing handle instead of the trainer's own.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Train for `num_episodes` episodes, or until stopped.
    pub fn run(&mut self) -> Result<TrainingReport> {
        info!(
            "Starting training: {} episodes, capacity {}, batch size {}",
            self.config.num_episodes, self.config.capacity, self.config.batch_size
        );

        for episode in 0..self.config.num_episodes {
            if self.stop.is_stopped() {
                break;
            }
            let summary = self.run_episode()?;
            debug!(
                episode = summary.index,
                length = summary.length,
                reward = summary.reward,
                epsilon = summary.epsilon,
                "episode finished"
            );

            let interval = self.config.log_interval;
            if interval > 0 && (episode + 1) % interval == 0 {
                let metrics = self.tracker.metrics();
                info!(
                    "{}",
                    training_progress(
                        episode + 1,
                        self.config.num_episodes,
                        metrics.avg_episode_length(interval).unwrap_or(0.0),
                        metrics.avg_loss(interval),
                        self.policy.epsilon(),
                    )
                );
            }
        }

        let stopped = self.stop.is_stopped();
        if stopped {
            warn!("Training stopped after {} episodes", self.tracker.metrics().episodes());
        } else {
            info!("Training finished after {} steps", self.policy.steps_done());
        }

        Ok(TrainingReport {
            config: self.config.clone(),
            metrics: self.tracker.metrics().clone(),
            steps_done: self.policy.steps_done(),
            stopped,
        })
    }

    /// Play one episode to termination, learning after every step.
    ///
    /// A stop request ends the episode early; the steps taken so far are
    /// still recorded.
    pub fn run_episode(&mut self) -> Result<EpisodeSummary> {
        self.tracker.start_episode();
        let mut state = self.env.reset()?;

        while !self.stop.is_stopped() {
            let action = self.policy.select_action(&self.estimator, state.view())?;
            check_action(action, self.env.action_count())?;
            let outcome = self.env.step(action)?;
            self.tracker.step(outcome.reward);

            let next_state = if outcome.done {
                NextState::Terminal
            } else {
                NextState::Value(outcome.observation.clone())
            };
            self.buffer.push(Transition::new(state, action, next_state, outcome.reward));

            if let Some(stats) = self.learner.optimize_model(&mut self.estimator, &self.buffer)? {
                self.tracker.record_loss(stats.loss);
            }

            if outcome.done {
                break;
            }
            state = outcome.observation;
        }

        Ok(self.tracker.end_episode(self.policy.epsilon()))
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn estimator(&self) -> &Q {
        &self.estimator
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn policy(&self) -> &EpsilonGreedy {
        &self.policy
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        self.tracker.metrics()
    }

    pub fn into_estimator(self) -> Q {
        self.estimator
    }
}
