use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::fixtures::{Corridor, FixedValues};
use crate::config::TrainingConfig;
use crate::error::AproxError;
use crate::network::QNetwork;
use crate::optimizer::{OptimizerWrapper, RMSProp};
use crate::trainer::{StopHandle, Trainer};

fn config(num_episodes: usize) -> TrainingConfig {
    TrainingConfig {
        capacity: 50,
        batch_size: 4,
        num_episodes,
        seed: Some(3),
        log_interval: 1,
        ..Default::default()
    }
}

fn network() -> QNetwork {
    let mut rng = StdRng::seed_from_u64(8);
    QNetwork::mlp(2, 8, 2, OptimizerWrapper::RMSProp(RMSProp::default()), &mut rng).unwrap()
}

#[test]
fn test_three_episodes() {
    let mut trainer = Trainer::new(config(3), Corridor::new(7), network()).unwrap();
    let report = trainer.run().unwrap();

    assert!(!report.stopped);
    assert_eq!(report.metrics.episode_lengths, vec![7, 7, 7]);
    assert_eq!(report.steps_done, 21);
    assert_eq!(report.steps_done as usize, report.metrics.total_steps());
    assert_eq!(report.metrics.epsilons.len(), 3);

    // One optimization step per push once four transitions are stored.
    assert_eq!(report.metrics.losses.len(), 21 - 3);
    assert_eq!(trainer.buffer().len(), 21);
    assert_eq!(trainer.buffer().iter().filter(|t| t.is_terminal()).count(), 3);
}

#[test]
fn test_episode_rewards_are_undiscounted_sums() {
    let mut trainer = Trainer::new(config(2), Corridor::new(5), network()).unwrap();
    let report = trainer.run().unwrap();
    for &reward in &report.metrics.episode_rewards {
        // Each step pays 0.5 or 1.0.
        assert!((2.5..=5.0).contains(&reward));
    }
}

#[test]
fn test_exploration_decays_across_episodes() {
    let mut trainer = Trainer::new(config(4), Corridor::new(10), network()).unwrap();
    let report = trainer.run().unwrap();
    let eps = &report.metrics.epsilons;
    assert!(eps.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(*eps.last().unwrap(), trainer.policy().schedule().threshold_at(40));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut trainer = Trainer::new(config(3), Corridor::new(6), network()).unwrap();
        trainer.run().unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_stop_before_run() {
    let mut trainer = Trainer::new(config(5), Corridor::new(7), network()).unwrap();
    trainer.stop_handle().stop();
    let report = trainer.run().unwrap();
    assert!(report.stopped);
    assert_eq!(report.steps_done, 0);
    assert!(report.metrics.episode_lengths.is_empty());
}

#[test]
fn test_stop_mid_episode_records_partial_episode() {
    let handle = StopHandle::default();
    let mut env = Corridor::new(7);
    env.stop_after = Some((10, handle.clone()));

    let mut trainer = Trainer::new(config(5), env, network()).unwrap().with_stop_handle(handle);
    let report = trainer.run().unwrap();

    assert!(report.stopped);
    assert_eq!(report.metrics.episode_lengths, vec![7, 3]);
    assert_eq!(report.steps_done, 10);
    assert_eq!(report.steps_done as usize, report.metrics.total_steps());
}

#[test]
fn test_mismatched_estimator_is_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let wide = QNetwork::mlp(3, 8, 2, OptimizerWrapper::RMSProp(RMSProp::default()), &mut rng).unwrap();
    assert!(matches!(
        Trainer::new(config(1), Corridor::new(3), wide),
        Err(AproxError::DimensionMismatch { .. })
    ));

    let many_actions = FixedValues::new(array![0.0, 0.0, 0.0], 2);
    assert!(Trainer::new(config(1), Corridor::new(3), many_actions).is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let bad = TrainingConfig { batch_size: 0, ..config(1) };
    assert!(matches!(
        Trainer::new(bad, Corridor::new(3), network()),
        Err(AproxError::InvalidParameter { .. })
    ));
}

#[test]
fn test_out_of_range_action_stops_the_run() {
    // Claims two actions but scores a third, which greedy selection picks.
    let mut estimator = FixedValues::new(array![0.0, 0.0, 9.0], 2);
    estimator.action_count = 2;
    let greedy = TrainingConfig { eps_start: 0.0, eps_end: 0.0, ..config(1) };

    let mut trainer = Trainer::new(greedy, Corridor::new(3), estimator).unwrap();
    assert!(matches!(
        trainer.run(),
        Err(AproxError::InvalidAction { action: 2, max_actions: 2 })
    ));
}
