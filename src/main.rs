use aprox_rl::config::TrainingConfig;
use aprox_rl::env::{CartPole, Environment};
use aprox_rl::error::Result;
use aprox_rl::network::QNetwork;
use aprox_rl::trainer::Trainer;
use aprox_rl::visualization::{plot_durations, plot_losses};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        tracing::error!("Training failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = TrainingConfig::default();
    let env = CartPole::new(rand::random());

    let mut rng = config.rng(0);
    let network = QNetwork::mlp(
        env.observation_size(),
        config.hidden_size,
        env.action_count(),
        config.optimizer(),
        &mut rng,
    )?;

    let mut trainer = Trainer::new(config, env, network)?;
    let report = trainer.run()?;

    println!("{}", plot_durations(&report.metrics, 60, 15));
    println!("{}", plot_losses(&report.metrics, 60, 10));
    println!("{}", report.metrics.summary());
    Ok(())
}
