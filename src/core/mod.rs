//! Core converter logic: rates, conversion, session state and bootstrap

pub mod bootstrap;
pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod provider;
pub mod rates;
pub mod state;

// Re-export main types for cleaner imports
pub use bootstrap::Bootstrap;
pub use convert::{DISPLAY_PRECISION, convert, format_amount};
pub use error::ConverterError;
pub use provider::RateProvider;
pub use rates::{RateQuote, RateTable};
pub use state::ConverterState;
