//! Session state of a converter and the transitions that keep it consistent.

use super::convert::convert;
use super::error::{ConverterError, Result};
use super::rates::RateTable;
use tracing::debug;

/// Default amount a new converter starts with.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// Editable fields of one converter plus the result derived from them.
///
/// A state without a rate table is uninitialized. Once the table is loaded
/// `from` and `to` are always set, and every mutator ends by recomputing
/// `result` so it always reflects the current amount, currencies and rates.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    amount: f64,
    from: Option<String>,
    to: Option<String>,
    result: Option<f64>,
    rate_table: Option<RateTable>,
}

impl Default for ConverterState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterState {
    pub fn new() -> Self {
        Self::with_amount(DEFAULT_AMOUNT)
    }

    pub fn with_amount(amount: f64) -> Self {
        Self {
            amount,
            from: None,
            to: None,
            result: None,
            rate_table: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.rate_table.is_some()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn rate_table(&self) -> Option<&RateTable> {
        self.rate_table.as_ref()
    }

    /// Currency codes available for selection, empty until rates are loaded.
    pub fn codes(&self) -> &[String] {
        self.rate_table.as_ref().map(RateTable::codes).unwrap_or(&[])
    }

    /// Loads the rate table, seeding `from`/`to` with the first two codes when
    /// they have not been chosen yet.
    ///
    /// Rates can only be loaded once; a second call is rejected and leaves the
    /// state untouched.
    pub fn set_rate_table(&mut self, table: RateTable) -> Result<()> {
        if self.rate_table.is_some() {
            return Err(ConverterError::Config(
                "rate table is already loaded".to_string(),
            ));
        }

        let needs_seed = self.from.is_none() || self.to.is_none();
        if needs_seed && table.codes().len() < 2 {
            return Err(ConverterError::Config(format!(
                "need at least two currencies, rate table has {}",
                table.codes().len()
            )));
        }

        if self.from.is_none() {
            self.from = Some(table.codes()[0].clone());
        }
        if self.to.is_none() {
            self.to = Some(table.codes()[1].clone());
        }
        debug!(
            from = ?self.from,
            to = ?self.to,
            currencies = table.len(),
            "Rate table loaded"
        );
        self.rate_table = Some(table);
        self.recompute()
    }

    pub fn set_amount(&mut self, amount: f64) -> Result<()> {
        self.amount = amount;
        self.recompute()
    }

    pub fn set_from(&mut self, code: impl Into<String>) -> Result<()> {
        self.from = Some(code.into());
        self.recompute()
    }

    pub fn set_to(&mut self, code: impl Into<String>) -> Result<()> {
        self.to = Some(code.into());
        self.recompute()
    }

    /// Exchanges the two currencies and recomputes once.
    pub fn swap(&mut self) -> Result<()> {
        std::mem::swap(&mut self.from, &mut self.to);
        self.recompute()
    }

    /// Explicit recompute for views that convert on confirmation.
    pub fn submit(&mut self) -> Result<()> {
        self.recompute()
    }

    /// Refreshes `result` from the current fields.
    ///
    /// On a lookup failure the previous result is kept rather than replaced
    /// with garbage, and the error is returned to the caller.
    fn recompute(&mut self) -> Result<()> {
        let (Some(table), Some(from), Some(to)) = (&self.rate_table, &self.from, &self.to) else {
            self.result = None;
            return Ok(());
        };
        let value = convert(self.amount, from, to, table)?;
        debug!(amount = self.amount, %from, %to, result = value, "Recomputed conversion");
        self.result = Some(value);
        Ok(())
    }
}
