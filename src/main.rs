// PlanPulse access - main.rs
// Loads the access tables once, then answers a single CLI query

use clap::Parser;
use tracing_subscriber::EnvFilter;

use planpulse_access::cli::{dispatch, Cli};
use planpulse_access::config_loader::{load_config, LogConfig};

fn init_tracing(log: &LogConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log);

    let evaluator = config.evaluator()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch(&cli, &config, &evaluator, &mut out)
}
