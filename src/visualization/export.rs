use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::metrics::TrainingMetrics;

/// Export the per-episode series as CSV, one row per episode.
pub fn export_metrics_csv<P: AsRef<Path>>(metrics: &TrainingMetrics, path: P) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "episode,duration,reward,epsilon")?;
    for (i, &length) in metrics.episode_lengths.iter().enumerate() {
        let reward = metrics.episode_rewards.get(i).copied().unwrap_or(f32::NAN);
        let epsilon = metrics.epsilons.get(i).copied().unwrap_or(f64::NAN);
        writeln!(file, "{},{},{},{}", i, length, reward, epsilon)?;
    }
    Ok(())
}

/// Export every series, including losses, as pretty-printed JSON.
pub fn export_metrics_json<P: AsRef<Path>>(metrics: &TrainingMetrics, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(metrics)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_metrics_json<P: AsRef<Path>>(path: P) -> Result<TrainingMetrics> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
