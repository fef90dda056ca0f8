//! A mounted converter: owns the session state, loads rates in the
//! background and turns user intents into state transitions.

use crate::core::bootstrap::Bootstrap;
use crate::core::convert::convert;
use crate::core::error::{ConverterError, Result};
use crate::core::provider::RateProvider;
use crate::core::rates::RateTable;
use crate::core::state::{ConverterState, DEFAULT_AMOUNT};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// User actions the view forwards to the converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetAmount(f64),
    SetFrom(String),
    SetTo(String),
    Swap,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Rates are still being fetched
    Pending,
    Ready,
    /// The fetch failed; the converter stays unusable
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct WidgetOptions {
    pub amount: f64,
    pub timeout: Duration,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            timeout: crate::core::bootstrap::DEFAULT_TIMEOUT,
        }
    }
}

/// Rates between the selected pair for one unit of each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRates {
    /// Value of one `to` unit in `from`
    pub to_in_from: f64,
    /// Value of one `from` unit in `to`
    pub from_in_to: f64,
}

/// Everything a view needs to draw the converter.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub amount: f64,
    pub from: Option<String>,
    pub to: Option<String>,
    pub result: Option<f64>,
    pub codes: Vec<String>,
    pub readiness: Readiness,
    pub error: Option<String>,
    pub unit_rates: Option<UnitRates>,
}

pub struct Widget {
    state: ConverterState,
    pending: Option<JoinHandle<Result<RateTable>>>,
    last_error: Option<ConverterError>,
}

impl Widget {
    /// Creates the widget and starts fetching rates on the tokio runtime.
    ///
    /// The fetch only produces a table; it is applied to the state by
    /// [`Widget::ready`] or [`Widget::poll_ready`], so a fetch that finishes
    /// after the widget is gone has nothing to write to.
    pub fn mount(provider: Arc<dyn RateProvider>, options: WidgetOptions) -> Self {
        let bootstrap = Bootstrap::new(options.timeout);
        let handle =
            tokio::spawn(async move { bootstrap.fetch_table(provider.as_ref()).await });
        debug!(amount = options.amount, "Widget mounted");

        Self {
            state: ConverterState::with_amount(options.amount),
            pending: Some(handle),
            last_error: None,
        }
    }

    /// Waits for the rate fetch to finish and applies it.
    pub async fn ready(&mut self) -> Readiness {
        if let Some(handle) = self.pending.as_mut() {
            let joined = handle.await;
            self.pending = None;
            self.settle(joined);
        }
        self.readiness()
    }

    /// Applies the rate fetch if it has already finished, without waiting.
    pub fn poll_ready(&mut self) -> Readiness {
        if let Some(joined) = self.pending.as_mut().and_then(|h| h.now_or_never()) {
            self.pending = None;
            self.settle(joined);
        }
        self.readiness()
    }

    fn settle(&mut self, joined: std::result::Result<Result<RateTable>, JoinError>) {
        let outcome = match joined {
            Ok(fetched) => fetched.and_then(|table| self.state.set_rate_table(table)),
            Err(e) if e.is_cancelled() => Err(ConverterError::Cancelled),
            Err(e) => Err(ConverterError::Data(format!("rate fetch task failed: {e}"))),
        };

        match outcome {
            Ok(()) => info!(currencies = self.state.codes().len(), "Widget ready"),
            // Rates loaded, but a currency picked beforehand is unknown
            Err(e) if self.state.is_ready() => {
                warn!(error = %e, "Rates loaded, selected currency has no rate");
            }
            Err(e) => {
                warn!(error = %e, "Could not load exchange rates");
                self.last_error = Some(e);
            }
        }
    }

    pub fn readiness(&self) -> Readiness {
        if self.state.is_ready() {
            Readiness::Ready
        } else if self.pending.is_some() {
            Readiness::Pending
        } else {
            Readiness::Failed
        }
    }

    /// Routes an intent to the matching state transition.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::SetAmount(amount) => self.state.set_amount(amount),
            Intent::SetFrom(code) => self.state.set_from(code),
            Intent::SetTo(code) => self.state.set_to(code),
            Intent::Swap => self.state.swap(),
            Intent::Submit => self.state.submit(),
        }
    }

    pub fn state(&self) -> &ConverterState {
        &self.state
    }

    /// Why the rates could not be loaded, if they could not.
    ///
    /// Only set while the widget is not ready; lookup failures on a ready
    /// widget are returned by [`Widget::dispatch`] instead.
    pub fn last_error(&self) -> Option<&ConverterError> {
        self.last_error.as_ref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = &self.state;
        let unit_rates = match (state.rate_table(), state.from(), state.to()) {
            (Some(table), Some(from), Some(to)) => {
                match (convert(1.0, to, from, table), convert(1.0, from, to, table)) {
                    (Ok(to_in_from), Ok(from_in_to)) => Some(UnitRates {
                        to_in_from,
                        from_in_to,
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        ViewSnapshot {
            amount: state.amount(),
            from: state.from().map(str::to_string),
            to: state.to().map(str::to_string),
            // A result kept from an earlier pair must not be shown under the current one
            result: unit_rates.and(state.result()),
            codes: state.codes().to_vec(),
            readiness: self.readiness(),
            error: self.last_error.as_ref().map(ToString::to_string),
            unit_rates,
        }
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Widget dropped while fetching rates, aborting fetch");
            handle.abort();
        }
    }
}
