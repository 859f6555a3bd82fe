use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::fixtures::tagged;
use crate::error::AproxError;
use crate::replay_buffer::ReplayBuffer;

fn filled(capacity: usize, pushes: usize) -> ReplayBuffer {
    let mut buffer = ReplayBuffer::new(capacity).unwrap();
    for i in 0..pushes {
        buffer.push(tagged(i));
    }
    buffer
}

#[test]
fn test_length_is_capped_at_capacity() {
    for &(capacity, pushes) in &[(1, 0), (1, 5), (5, 3), (5, 5), (5, 12), (200, 25)] {
        let buffer = filled(capacity, pushes);
        assert_eq!(buffer.len(), pushes.min(capacity), "capacity {} pushes {}", capacity, pushes);
    }
}

#[test]
fn test_zero_capacity_is_rejected() {
    assert!(matches!(ReplayBuffer::new(0), Err(AproxError::InvalidParameter { .. })));
}

#[test]
fn test_overwrites_oldest_in_cyclic_order() {
    let buffer = filled(3, 5);

    // Pushes 3 and 4 replaced slots 0 and 1; slot 2 still holds push 2.
    let tags: Vec<f32> = buffer.iter().map(|t| t.reward()).collect();
    assert_eq!(tags, vec![3.0, 4.0, 2.0]);
    assert_eq!(buffer.write_cursor(), 2);
}

#[test]
fn test_keeps_only_the_newest_capacity_transitions() {
    let buffer = filled(10, 37);
    let mut tags: Vec<usize> = buffer.iter().map(|t| t.reward() as usize).collect();
    tags.sort_unstable();
    assert_eq!(tags, (27..37).collect::<Vec<_>>());
}

#[test]
fn test_sample_without_replacement() {
    let buffer = filled(30, 30);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let batch = buffer.sample(30, &mut rng).unwrap();
        let tags: HashSet<usize> = batch.iter().map(|t| t.reward() as usize).collect();
        assert_eq!(tags.len(), 30);
    }
}

#[test]
fn test_oversampling_is_a_contract_violation() {
    let buffer = filled(10, 4);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(buffer.sample(4, &mut rng).is_ok());
    assert!(matches!(buffer.sample(5, &mut rng), Err(AproxError::ContractViolation(_))));
    assert!(!buffer.is_warm(5));
    assert!(buffer.is_warm(4));
}

#[test]
fn test_sampling_is_uniform() {
    let buffer = filled(25, 25);
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 4000;
    let batch_size = 5;
    let mut counts = [0usize; 25];
    for _ in 0..trials {
        for transition in buffer.sample(batch_size, &mut rng).unwrap() {
            counts[transition.reward() as usize] += 1;
        }
    }

    let expected = (trials * batch_size) as f64 / 25.0;
    let chi_square: f64 = counts
        .iter()
        .map(|&observed| (observed as f64 - expected).powi(2) / expected)
        .sum();
    // 24 degrees of freedom; 60 is far in the upper tail.
    assert!(chi_square < 60.0, "chi-square {} with counts {:?}", chi_square, counts);
}
