pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod setup;
pub mod ui;
pub mod view;

use crate::core::config::AppConfig;
use crate::core::provider::RateProvider;
use crate::widget::{Readiness, Widget, WidgetOptions};
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub fn widget_options(config: &AppConfig) -> WidgetOptions {
    WidgetOptions {
        amount: config.amount,
        timeout: config.provider.timeout(),
    }
}

/// Mounts a widget and waits for its rates, showing a spinner meanwhile.
pub async fn load_widget(provider: Arc<dyn RateProvider>, config: &AppConfig) -> Result<Widget> {
    let mut widget = Widget::mount(provider, widget_options(config));

    let spinner = ui::new_spinner("Fetching exchange rates");
    let readiness = widget.ready().await;
    spinner.finish_and_clear();

    if readiness != Readiness::Ready {
        return Err(match widget.last_error() {
            Some(e) => anyhow!(e.clone()),
            None => anyhow!("Exchange rates are not available"),
        });
    }
    Ok(widget)
}
