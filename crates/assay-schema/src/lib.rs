//! assay-schema: Shared wire models and outcome types for assayer.
//!
//! This crate defines the types exchanged between the API client, the
//! check battery, and the reporter.

pub mod currency;
pub mod outcome;
pub mod price;

pub use currency::CurrencySnapshot;
pub use outcome::{CheckOutcome, CheckStatus, SuiteReport};
pub use price::{Metal, PriceHistory, TimePoint};
