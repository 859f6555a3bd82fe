use crate::metrics::TrainingMetrics;

/// Plot episode durations as ASCII art.
pub fn plot_durations(metrics: &TrainingMetrics, width: usize, height: usize) -> String {
    let lengths: Vec<f32> = metrics.episode_lengths.iter().map(|&n| n as f32).collect();
    plot_series(&lengths, "Episode Durations", width, height)
}

/// Plot the loss of every optimization step.
pub fn plot_losses(metrics: &TrainingMetrics, width: usize, height: usize) -> String {
    plot_series(&metrics.losses, "Loss", width, height)
}

/// Scatter `values` against their index on a `width` x `height` grid.
pub fn plot_series(values: &[f32], title: &str, width: usize, height: usize) -> String {
    if values.is_empty() {
        return format!("{}: no data", title);
    }
    if width < 10 || height < 5 {
        return format!("{}: plot area too small", title);
    }

    let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !min_val.is_finite() || !max_val.is_finite() {
        return format!("{}: series contains non-finite values", title);
    }
    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("{}: all {} values are {:.4}", title, values.len(), min_val);
    }

    let mut grid = vec![vec![' '; width]; height];
    for row in grid.iter_mut() {
        row[0] = '|';
    }
    for cell in grid[height - 1].iter_mut() {
        *cell = '-';
    }
    grid[height - 1][0] = '+';

    let plot_width = width - 3;
    let plot_height = height - 2;
    let span = (values.len().max(2) - 1) as f32;
    for (i, &value) in values.iter().enumerate() {
        let x = 2 + ((i as f32 / span) * plot_width as f32).round() as usize;
        let level = ((value - min_val) / (max_val - min_val) * plot_height as f32).round() as usize;
        let y = plot_height - level.min(plot_height);
        grid[y.min(height - 2)][x.min(width - 1)] = '*';
    }

    let mut output = format!("{}\nMax: {:.4}\n", title, max_val);
    for row in &grid {
        output.extend(row.iter());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.4}\nPoints: {}\n", min_val, values.len()));
    output
}

/// One-line progress report.
pub fn training_progress(
    episode: usize,
    total_episodes: usize,
    avg_length: f32,
    avg_loss: Option<f32>,
    epsilon: f64,
) -> String {
    let progress = if total_episodes == 0 { 1.0 } else { episode as f32 / total_episodes as f32 };
    let bar_length = 30;
    let filled = ((progress * bar_length as f32) as usize).min(bar_length);
    let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(bar_length - filled));
    let loss = avg_loss.map_or_else(|| "n/a".to_string(), |l| format!("{:.4}", l));

    format!(
        "Episode {}/{} {} {:.1}% | Avg Duration: {:.1} | Avg Loss: {} | eps: {:.3}",
        episode, total_episodes, bar, progress * 100.0, avg_length, loss, epsilon
    )
}

/// Summary table of a run
pub fn metrics_summary(metrics: &TrainingMetrics) -> String {
    let mut output = String::from("Training Summary\n================\n");
    output.push_str(&format!(
        "Episodes: {}, Steps: {}\n",
        metrics.episodes(),
        metrics.total_steps()
    ));

    if let (Some(&last), Some(avg)) = (metrics.episode_lengths.last(), metrics.avg_episode_length(usize::MAX)) {
        let longest = metrics.episode_lengths.iter().copied().max().unwrap_or(last);
        output.push_str(&format!(
            "Duration: Last={}, Average={:.1}, Longest={}\n",
            last, avg, longest
        ));
    }

    if let Some(avg) = metrics.avg_episode_reward(usize::MAX) {
        output.push_str(&format!("Reward: Average={:.2}\n", avg));
    }

    if let (Some(&last), Some(avg)) = (metrics.losses.last(), metrics.avg_loss(usize::MAX)) {
        output.push_str(&format!(
            "Loss: Last={:.4}, Average={:.4}, Updates={}\n",
            last, avg, metrics.losses.len()
        ));
    }

    output
}
