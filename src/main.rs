mod run;

use anyhow::{Context, Result};
use budgetbuddy::{Config, StoreCell};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env().context("Failed to load configuration")?;
    let cell = StoreCell::new(config.clone());
    let store = cell
        .get()
        .with_context(|| format!("Failed to open database: {}", config.db_path.display()))?;

    match args.len() {
        1 => run::as_summary(&store),
        _ => run::as_cli(&args, &store),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
