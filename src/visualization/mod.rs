pub mod text_plots;
pub mod export;

pub use text_plots::{plot_durations, plot_losses, plot_series, training_progress, metrics_summary};
pub use export::{export_metrics_csv, export_metrics_json, load_metrics_json};
