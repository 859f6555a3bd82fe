use rand::seq::index;
use rand::Rng;

use crate::error::{AproxError, Result};
use crate::transition::Transition;

/// Fixed-capacity ring buffer of transitions with uniform sampling.
///
/// While filling, pushes append. Once `capacity` is reached each push
/// overwrites the slot under `write_cursor`, which always holds the oldest
/// transition, and the cursor advances cyclically.
///
/// ```rust
/// use aprox_rl::replay_buffer::ReplayBuffer;
/// use aprox_rl::transition::Transition;
/// use ndarray::array;
/// use rand::SeedableRng;
///
/// let mut buffer = ReplayBuffer::new(2).unwrap();
/// for i in 0..3 {
///     buffer.push(Transition::terminal(array![i as f32], 0, 1.0));
/// }
/// assert_eq!(buffer.len(), 2);
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// assert_eq!(buffer.sample(2, &mut rng).unwrap().len(), 2);
/// assert!(buffer.sample(3, &mut rng).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    storage: Vec<Transition>,
    capacity: usize,
    write_cursor: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AproxError::invalid_parameter(
                "capacity",
                "replay buffer capacity must be greater than 0",
            ));
        }
        Ok(ReplayBuffer {
            storage: Vec::with_capacity(capacity),
            capacity,
            write_cursor: 0,
        })
    }

    /// Store a transition, evicting the oldest one when full.
    pub fn push(&mut self, transition: Transition) {
        if self.storage.len() < self.capacity {
            self.storage.push(transition);
        } else {
            self.storage[self.write_cursor] = transition;
        }
        self.write_cursor = (self.write_cursor + 1) % self.capacity;
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    ///
    /// Asking for more than `len()` is a contract violation; callers gate on
    /// [`ReplayBuffer::is_warm`] first.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if batch_size > self.storage.len() {
            return Err(AproxError::contract(format!(
                "cannot sample {} transitions from a buffer holding {}",
                batch_size,
                self.storage.len()
            )));
        }
        Ok(index::sample(rng, self.storage.len(), batch_size)
            .into_iter()
            .map(|i| &self.storage[i])
            .collect())
    }

    /// Whether a batch of `batch_size` can be sampled.
    pub fn is_warm(&self, batch_size: usize) -> bool {
        self.storage.len() >= batch_size
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot the next push will write to.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Stored transitions in slot order (not age order once wrapped).
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.storage.iter()
    }
}
