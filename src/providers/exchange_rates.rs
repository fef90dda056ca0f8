use super::util::with_retry;
use crate::core::provider::RateProvider;
use crate::core::rates::RateQuote;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

/// Rate provider for exchangeratesapi.io style `/latest` endpoints.
pub struct ExchangeRatesProvider {
    base_url: String,
    retries: usize,
    retry_delay_ms: u64,
}

impl ExchangeRatesProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRatesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            retries: 0,
            retry_delay_ms: 0,
        }
    }

    /// Retries failed requests `retries` more times, waiting `delay_ms` in between.
    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: Option<Map<String, Value>>,
    date: Option<NaiveDate>,
}

impl TryFrom<LatestRatesResponse> for RateQuote {
    type Error = anyhow::Error;

    fn try_from(response: LatestRatesResponse) -> Result<Self> {
        let rates = response
            .rates
            .map(|rates| {
                rates
                    .into_iter()
                    .map(|(code, value)| {
                        value
                            .as_f64()
                            .map(|rate| (code.clone(), rate))
                            .ok_or_else(|| anyhow!("Non-numeric rate for {}: {}", code, value))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(RateQuote {
            base: response.base,
            rates,
            date: response.date,
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRatesProvider {
    #[instrument(name = "ExchangeRatesFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Result<RateQuote> {
        let url = format!("{}/latest", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent("fxw/1.0").build()?;
        let response = with_retry(
            || async { client.get(&url).send().await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Exchange rate request failed for {url}"))?;

        let text = response
            .text()
            .await
            .context("Failed to read exchange rate response")?;

        let data: LatestRatesResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse exchange rate response"
                );
                return Err(e).context("Failed to parse exchange rate response");
            }
        };

        let quote = RateQuote::try_from(data)?;
        debug!(
            base = ?quote.base,
            count = quote.rates.as_ref().map_or(0, Vec::len),
            "Received exchange rates"
        );
        Ok(quote)
    }
}
