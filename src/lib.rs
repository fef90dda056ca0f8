pub mod cli;
pub mod core;
pub mod providers;
pub mod widget;

use crate::core::config::AppConfig;
use crate::core::provider::RateProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert { amount: f64, from: String, to: String },
    Currencies,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxw starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider: Arc<dyn RateProvider> = Arc::new(
        providers::ExchangeRatesProvider::new(&config.provider.base_url)
            .with_retries(config.provider.retries, config.provider.retry_delay_ms),
    );

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(provider, &config, amount, &from, &to).await
        }
        AppCommand::Currencies => cli::currencies::run(provider, &config).await,
        AppCommand::Interactive => cli::interactive::run(provider, &config).await,
    }
}
