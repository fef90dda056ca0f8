//! Source of exchange rate data

use super::rates::RateQuote;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the latest rates relative to the provider's base currency.
    async fn fetch_rates(&self) -> Result<RateQuote>;
}
