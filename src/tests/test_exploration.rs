use ndarray::array;

use super::fixtures::FixedValues;
use crate::agent::{greedy_action, EpsilonGreedy, EpsilonSchedule};
use crate::config::{EPS_DECAY, EPS_END, EPS_START};

fn default_schedule() -> EpsilonSchedule {
    EpsilonSchedule::new(EPS_START, EPS_END, EPS_DECAY).unwrap()
}

#[test]
fn test_threshold_starts_at_start() {
    assert!((default_schedule().threshold_at(0) - EPS_START).abs() < 1e-12);
}

#[test]
fn test_threshold_strictly_decreases() {
    let schedule = default_schedule();
    let mut previous = schedule.threshold_at(0);
    for steps in 1..2000 {
        let current = schedule.threshold_at(steps);
        assert!(current < previous, "not decreasing at step {}", steps);
        assert!(current > EPS_END);
        previous = current;
    }
}

#[test]
fn test_threshold_approaches_end() {
    let schedule = default_schedule();
    assert!((schedule.threshold_at(50_000) - EPS_END).abs() < 1e-12);
}

#[test]
fn test_invalid_schedules_are_rejected() {
    assert!(EpsilonSchedule::new(0.5, 0.9, 200.0).is_err());
    assert!(EpsilonSchedule::new(1.5, 0.1, 200.0).is_err());
    assert!(EpsilonSchedule::new(0.9, 0.05, 0.0).is_err());
}

#[test]
fn test_counter_advances_on_random_branch() {
    // u is drawn from [0, 1), so a threshold of 1 always explores.
    let mut policy = EpsilonGreedy::seeded(EpsilonSchedule::new(1.0, 1.0, 10.0).unwrap(), 3);
    let estimator = FixedValues::new(array![0.0, 1.0, 0.0], 2);
    for expected in 1..=20 {
        policy.select_action(&estimator, array![0.0, 0.0].view()).unwrap();
        assert_eq!(policy.steps_done(), expected);
    }
}

#[test]
fn test_counter_advances_on_greedy_branch() {
    let mut policy = EpsilonGreedy::seeded(EpsilonSchedule::new(0.0, 0.0, 10.0).unwrap(), 3);
    let estimator = FixedValues::new(array![0.1, 0.7, 0.3], 2);
    for expected in 1..=20 {
        let action = policy.select_action(&estimator, array![0.0, 0.0].view()).unwrap();
        assert_eq!(action, 1);
        assert_eq!(policy.steps_done(), expected);
    }
}

#[test]
fn test_random_branch_covers_every_action() {
    let mut policy = EpsilonGreedy::seeded(EpsilonSchedule::new(1.0, 1.0, 10.0).unwrap(), 9);
    let estimator = FixedValues::new(array![5.0, 0.0, 0.0], 2);
    let mut seen = [false; 3];
    for _ in 0..300 {
        let action = policy.select_action(&estimator, array![0.0, 0.0].view()).unwrap();
        seen[action] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_epsilon_tracks_selections() {
    let mut policy = EpsilonGreedy::seeded(default_schedule(), 1);
    let estimator = FixedValues::new(array![0.0, 1.0], 2);
    for _ in 0..10 {
        policy.select_action(&estimator, array![0.0, 0.0].view()).unwrap();
    }
    assert_eq!(policy.epsilon(), policy.schedule().threshold_at(10));
}

#[test]
fn test_greedy_ties_and_nan() {
    assert_eq!(greedy_action(array![1.0, 3.0, 3.0].view()).unwrap(), 1);
    assert_eq!(greedy_action(array![-2.0].view()).unwrap(), 0);
    assert!(greedy_action(array![0.0, f32::NAN].view()).is_err());
}
