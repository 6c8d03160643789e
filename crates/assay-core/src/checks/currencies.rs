//! Validation checks for the currencies endpoint.

use std::sync::OnceLock;

use assay_schema::{CheckStatus, CurrencySnapshot};
use regex::Regex;

use super::{Check, CheckContext};

/// Checks applied to every currencies snapshot, in report order.
pub const CHECKS: &[Check<CurrencySnapshot>] = &[
    Check {
        name: "currencies.base_is_expected",
        run: base_is_expected,
    },
    Check {
        name: "currencies.codes_are_valid",
        run: codes_are_valid,
    },
    Check {
        name: "currencies.rates_are_positive",
        run: rates_are_positive,
    },
    Check {
        name: "currencies.timestamp_is_recent",
        run: timestamp_is_recent,
    },
];

fn base_is_expected(snapshot: &CurrencySnapshot, ctx: &CheckContext) -> CheckStatus {
    if snapshot.base == ctx.expected_base {
        CheckStatus::Passed
    } else {
        CheckStatus::failed(format!(
            "expected base currency {:?}, got {:?}",
            ctx.expected_base, snapshot.base
        ))
    }
}

/// Three uppercase ASCII letters, per ISO 4217.
fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"))
}

fn codes_are_valid(snapshot: &CurrencySnapshot, _ctx: &CheckContext) -> CheckStatus {
    for code in snapshot.rates.keys() {
        if !code_pattern().is_match(code) {
            return CheckStatus::failed(format!("invalid currency code format: {code:?}"));
        }
    }
    CheckStatus::Passed
}

fn rates_are_positive(snapshot: &CurrencySnapshot, _ctx: &CheckContext) -> CheckStatus {
    for (code, rate) in &snapshot.rates {
        if !rate.is_finite() || *rate <= 0.0 {
            return CheckStatus::failed(format!("{code} rate must be positive, got {rate}"));
        }
    }
    CheckStatus::Passed
}

fn timestamp_is_recent(snapshot: &CurrencySnapshot, ctx: &CheckContext) -> CheckStatus {
    if !ctx.run_prod_assertions {
        return CheckStatus::skipped("freshness only asserted against production data");
    }
    let age = ctx.age_secs(snapshot.timestamp);
    if age <= ctx.max_age_secs {
        CheckStatus::Passed
    } else {
        CheckStatus::failed(format!(
            "snapshot is {age}s old, limit is {}s",
            ctx.max_age_secs
        ))
    }
}
