//! Exchange rate tables built from a single provider fetch.

use super::error::{ConverterError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Raw answer from a rate provider, before any normalisation.
///
/// `rates` keeps the order the provider listed the currencies in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateQuote {
    pub base: Option<String>,
    pub rates: Option<Vec<(String, f64)>>,
    pub date: Option<NaiveDate>,
}

/// Rates relative to a base currency, where a rate is the number of units of a
/// currency worth one unit of the base.
///
/// The base always carries a rate of exactly 1 and is listed first in `codes`;
/// every code in `codes` has an entry in `rates`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
    codes: Vec<String>,
    date: Option<NaiveDate>,
}

impl RateTable {
    pub fn from_quote(quote: RateQuote) -> Result<Self> {
        let base = quote
            .base
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| ConverterError::Data("missing base currency".to_string()))?;
        let provided = quote
            .rates
            .ok_or_else(|| ConverterError::Data("missing rates".to_string()))?;
        if provided.is_empty() {
            return Err(ConverterError::Data("rates are empty".to_string()));
        }

        let mut rates = HashMap::with_capacity(provided.len() + 1);
        let mut codes = Vec::with_capacity(provided.len() + 1);
        rates.insert(base.clone(), 1.0);
        codes.push(base.clone());

        for (code, rate) in provided {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConverterError::Data(format!(
                    "rate for {code} must be a positive number, got {rate}"
                )));
            }
            // The base is pinned to 1 even if the provider lists it too.
            if code == base || rates.contains_key(&code) {
                debug!("Skipping duplicate rate entry for {}", code);
                continue;
            }
            rates.insert(code.clone(), rate);
            codes.push(code);
        }

        debug!(base = %base, currencies = codes.len(), "Built rate table");
        Ok(Self {
            base,
            rates,
            codes,
            date: quote.date,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Available currency codes, base first, then in provider order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Date the provider published these rates for, if it said.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
