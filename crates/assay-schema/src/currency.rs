//! Wire model for the currencies endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Conversion rates relative to a base currency, as served by the API.
///
/// Rates are keyed by currency code. A `BTreeMap` keeps iteration order
/// stable so failure messages and reports are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySnapshot {
    pub base: String,
    /// Epoch seconds at which the rates were sampled.
    pub timestamp: i64,
    pub rates: BTreeMap<String, f64>,
}
