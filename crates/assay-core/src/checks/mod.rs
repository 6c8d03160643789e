//! The check battery.
//!
//! Checks are pure functions over already-fetched API data. The runner owns
//! fetching, timing, and reporting; a check only decides pass, fail, or skip.

pub mod currencies;
pub mod timepoints;

use assay_schema::CheckStatus;
use chrono::{DateTime, Utc};

use crate::config::CheckConfig;

/// Shared inputs for every check.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Wall-clock reference for freshness math, injected so tests are
    /// deterministic.
    pub now: DateTime<Utc>,
    /// Whether assertions that only hold in production are enabled.
    pub run_prod_assertions: bool,
    pub max_age_secs: i64,
    pub max_gap_secs: i64,
    pub expected_base: String,
}

impl CheckContext {
    pub fn new(now: DateTime<Utc>, run_prod_assertions: bool, checks: &CheckConfig) -> Self {
        Self {
            now,
            run_prod_assertions,
            max_age_secs: checks.max_age_secs,
            max_gap_secs: checks.max_gap_secs,
            expected_base: checks.expected_base.clone(),
        }
    }

    /// Age of an epoch timestamp relative to `now`. A timestamp in the
    /// future counts as fresh: age clamps to zero.
    pub fn age_secs(&self, timestamp: i64) -> i64 {
        (self.now.timestamp().saturating_sub(timestamp)).max(0)
    }
}

/// A named check over fetched data of type `T`.
pub struct Check<T> {
    pub name: &'static str,
    pub run: fn(&T, &CheckContext) -> CheckStatus,
}

/// All check names, in report order.
pub fn all_check_names() -> Vec<&'static str> {
    currencies::CHECKS
        .iter()
        .map(|c| c.name)
        .chain(timepoints::CHECKS.iter().map(|c| c.name))
        .collect()
}
