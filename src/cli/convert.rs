use super::{load_widget, view};
use crate::core::config::AppConfig;
use crate::core::provider::RateProvider;
use crate::widget::{Intent, ViewSnapshot};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Converts a single amount and returns the resulting view.
pub async fn convert_once(
    provider: Arc<dyn RateProvider>,
    config: &AppConfig,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<ViewSnapshot> {
    let mut widget = load_widget(provider, config).await?;

    widget.dispatch(Intent::SetAmount(amount))?;
    widget
        .dispatch(Intent::SetFrom(from.to_uppercase()))
        .with_context(|| format!("Cannot convert from {from}"))?;
    widget
        .dispatch(Intent::SetTo(to.to_uppercase()))
        .with_context(|| format!("Cannot convert to {to}"))?;
    widget.dispatch(Intent::Submit)?;

    Ok(widget.snapshot())
}

pub async fn run(
    provider: Arc<dyn RateProvider>,
    config: &AppConfig,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    let snapshot = convert_once(provider, config, amount, from, to).await?;
    println!("{}", view::render(&snapshot, config.precision, true));
    Ok(())
}
