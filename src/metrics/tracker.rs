use serde::{Serialize, Deserialize};

/// Series recorded over a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Steps per episode (the duration series)
    pub episode_lengths: Vec<usize>,

    /// Undiscounted reward per episode
    pub episode_rewards: Vec<f32>,

    /// Loss of every optimization step that ran
    pub losses: Vec<f32>,

    /// Exploration rate at the end of each episode
    pub epsilons: Vec<f64>,
}

impl TrainingMetrics {
    pub fn total_steps(&self) -> usize {
        self.episode_lengths.iter().sum()
    }

    pub fn episodes(&self) -> usize {
        self.episode_lengths.len()
    }

    /// Mean of the last `window` episode lengths.
    pub fn avg_episode_length(&self, window: usize) -> Option<f32> {
        tail_mean(self.episode_lengths.iter().map(|&n| n as f32), self.episode_lengths.len(), window)
    }

    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        tail_mean(self.episode_rewards.iter().copied(), self.episode_rewards.len(), window)
    }

    pub fn avg_loss(&self, window: usize) -> Option<f32> {
        tail_mean(self.losses.iter().copied(), self.losses.len(), window)
    }

    /// Human-readable summary table.
    pub fn summary(&self) -> String {
        crate::visualization::metrics_summary(self)
    }
}

fn tail_mean(values: impl Iterator<Item = f32>, len: usize, window: usize) -> Option<f32> {
    let n = window.min(len);
    if n == 0 {
        return None;
    }
    Some(values.skip(len - n).sum::<f32>() / n as f32)
}

/// One finished (or interrupted) episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub index: usize,
    pub length: usize,
    pub reward: f32,
    pub epsilon: f64,
    /// Mean loss over this episode's optimization steps, if any ran
    pub mean_loss: Option<f32>,
}

/// Accumulates per-step values into per-episode series.
#[derive(Debug, Clone, Default)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    current_episode_reward: f32,
    current_episode_length: usize,
    current_loss_sum: f32,
    current_loss_count: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new episode
    pub fn start_episode(&mut self) {
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        self.current_loss_sum = 0.0;
        self.current_loss_count = 0;
    }

    /// Record a step within an episode
    pub fn step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
    }

    /// Record a training loss
    pub fn record_loss(&mut self, loss: f32) {
        self.metrics.losses.push(loss);
        self.current_loss_sum += loss;
        self.current_loss_count += 1;
    }

    /// Close the current episode and append it to the series.
    pub fn end_episode(&mut self, epsilon: f64) -> EpisodeSummary {
        let summary = EpisodeSummary {
            index: self.metrics.episode_lengths.len(),
            length: self.current_episode_length,
            reward: self.current_episode_reward,
            epsilon,
            mean_loss: (self.current_loss_count > 0)
                .then(|| self.current_loss_sum / self.current_loss_count as f32),
        };
        self.metrics.episode_lengths.push(summary.length);
        self.metrics.episode_rewards.push(summary.reward);
        self.metrics.epsilons.push(epsilon);
        self.start_episode();
        summary
    }

    pub fn current_episode_length(&self) -> usize {
        self.current_episode_length
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> TrainingMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_accumulation() {
        let mut tracker = MetricsTracker::new();
        tracker.start_episode();
        tracker.step(1.0);
        tracker.step(2.0);
        tracker.record_loss(0.5);
        tracker.record_loss(1.5);
        let summary = tracker.end_episode(0.8);

        assert_eq!(summary.index, 0);
        assert_eq!(summary.length, 2);
        assert_eq!(summary.reward, 3.0);
        assert_eq!(summary.mean_loss, Some(1.0));

        tracker.step(1.0);
        let second = tracker.end_episode(0.7);
        assert_eq!(second.index, 1);
        assert_eq!(second.mean_loss, None);

        let metrics = tracker.metrics();
        assert_eq!(metrics.episode_lengths, vec![2, 1]);
        assert_eq!(metrics.total_steps(), 3);
        assert_eq!(metrics.losses.len(), 2);
    }

    #[test]
    fn test_windowed_averages() {
        let metrics = TrainingMetrics {
            episode_lengths: vec![10, 20, 30],
            ..Default::default()
        };
        assert_eq!(metrics.avg_episode_length(2), Some(25.0));
        assert_eq!(metrics.avg_episode_length(10), Some(20.0));
        assert_eq!(metrics.avg_loss(5), None);
    }
}
