use address_map::{app, config::Config};
use env_logger::Env;

/// Main entry point for the dashboard server
///
/// Reads configuration from the environment, fails fast if it is
/// incomplete, then serves until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!(
        "{} months configured: {}",
        config.months.len(),
        config.months.names().join(", ")
    );

    app::run(config).await
}
