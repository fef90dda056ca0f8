//! Error kinds raised by the converter core.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConverterError {
    /// The rate source returned something unusable (missing fields, empty or invalid rates).
    #[error("Invalid rate data: {0}")]
    Data(String),

    /// The converter was set up in a way it cannot work with.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A currency code has no entry in the rate table.
    #[error("No rate available for currency: {0}")]
    Lookup(String),

    #[error("Timed out after {0:?} waiting for exchange rates")]
    Timeout(Duration),

    /// The widget was destroyed before the rates arrived.
    #[error("Rate fetch cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ConverterError>;
