//! Currency conversion over a rate table.

use super::error::{ConverterError, Result};
use super::rates::RateTable;

/// Decimal places used when showing converted amounts.
pub const DISPLAY_PRECISION: usize = 5;

/// Converts `amount` of `from` into `to`.
///
/// The amount is first brought back to base units (dividing by the `from`
/// rate) and then into `to` units (multiplying by the `to` rate). The value is
/// returned at full precision; rounding is left to [`format_amount`].
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> Result<f64> {
    let from_rate = table
        .rate(from)
        .ok_or_else(|| ConverterError::Lookup(from.to_string()))?;
    let to_rate = table
        .rate(to)
        .ok_or_else(|| ConverterError::Lookup(to.to_string()))?;

    if from == to {
        return Ok(amount);
    }
    Ok((amount / from_rate) * to_rate)
}

/// Renders an amount with a fixed number of decimals.
pub fn format_amount(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}
