//! One-shot loading of exchange rates into a converter.

use super::error::{ConverterError, Result};
use super::provider::RateProvider;
use super::rates::RateTable;
use super::state::ConverterState;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches rates once and seeds a [`ConverterState`] with them.
///
/// Retries are not attempted here; callers that want them wrap the sequence
/// (or the provider).
#[derive(Debug, Clone, Copy)]
pub struct Bootstrap {
    timeout: Duration,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Bootstrap {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Asks the provider for rates and normalises them into a table.
    ///
    /// Provider failures surface as [`ConverterError::Data`], and a provider
    /// that does not answer within the timeout as [`ConverterError::Timeout`].
    pub async fn fetch_table(&self, provider: &dyn RateProvider) -> Result<RateTable> {
        debug!(timeout = ?self.timeout, "Fetching exchange rates");
        let quote = match tokio::time::timeout(self.timeout, provider.fetch_rates()).await {
            Ok(Ok(quote)) => quote,
            Ok(Err(e)) => return Err(ConverterError::Data(format!("{e:#}"))),
            Err(_) => return Err(ConverterError::Timeout(self.timeout)),
        };
        let table = RateTable::from_quote(quote)?;
        info!(
            base = table.base(),
            currencies = table.len(),
            "Exchange rates loaded"
        );
        Ok(table)
    }

    /// Fetches rates and loads them into `state`.
    ///
    /// On failure `state` is left exactly as it was.
    pub async fn run(&self, state: &mut ConverterState, provider: &dyn RateProvider) -> Result<()> {
        let table = self.fetch_table(provider).await?;
        state.set_rate_table(table)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::rates::RateQuote;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider answering with a fixed quote (or error) after an optional delay.
    pub(crate) struct StaticProvider {
        pub(crate) quote: Option<RateQuote>,
        pub(crate) delay: Option<Duration>,
        pub(crate) calls: AtomicUsize,
    }

    impl StaticProvider {
        pub(crate) fn ok(base: &str, rates: &[(&str, f64)]) -> Self {
            Self {
                quote: Some(RateQuote {
                    base: Some(base.to_string()),
                    rates: Some(
                        rates
                            .iter()
                            .map(|(c, r)| (c.to_string(), *r))
                            .collect(),
                    ),
                    date: None,
                }),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                quote: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl RateProvider for StaticProvider {
        async fn fetch_rates(&self) -> anyhow::Result<RateQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.quote
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_state() {
        let provider = StaticProvider::ok("EUR", &[("USD", 1.1), ("GBP", 0.9)]);
        let mut state = ConverterState::new();

        Bootstrap::default().run(&mut state, &provider).await.unwrap();

        assert_eq!(state.codes(), &["EUR", "USD", "GBP"]);
        assert_eq!(state.rate_table().unwrap().rate("EUR"), Some(1.0));
        assert_eq!(state.from(), Some("EUR"));
        assert_eq!(state.to(), Some("USD"));
        assert_eq!(state.result(), Some(1.1));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_state_uninitialized() {
        let provider = StaticProvider::failing();
        let mut state = ConverterState::new();

        let err = Bootstrap::default()
            .run(&mut state, &provider)
            .await
            .unwrap_err();

        assert_eq!(err, ConverterError::Data("connection refused".to_string()));
        assert!(!state.is_ready());
        assert!(state.codes().is_empty());
        assert!(state.result().is_none());
        // No automatic retry
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_rates_is_data_error() {
        let provider = StaticProvider::ok("EUR", &[]);
        let mut state = ConverterState::new();

        let result = Bootstrap::default().run(&mut state, &provider).await;
        assert!(matches!(result, Err(ConverterError::Data(_))));
        assert!(!state.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider =
            StaticProvider::ok("EUR", &[("USD", 1.1)]).delayed(Duration::from_secs(60));
        let mut state = ConverterState::new();
        let bootstrap = Bootstrap::new(Duration::from_secs(5));

        let result = bootstrap.run(&mut state, &provider).await;
        assert_eq!(result, Err(ConverterError::Timeout(Duration::from_secs(5))));
        assert!(!state.is_ready());
    }
}
