//! Validation checks for the price-history endpoint.

use std::collections::BTreeSet;

use assay_schema::{CheckStatus, Metal, PriceHistory};

use super::{Check, CheckContext};

/// Checks applied to every price history, in report order.
pub const CHECKS: &[Check<PriceHistory>] = &[
    Check {
        name: "timepoints.timestamps_are_sorted",
        run: timestamps_are_sorted,
    },
    Check {
        name: "timepoints.timestamps_are_unique",
        run: timestamps_are_unique,
    },
    Check {
        name: "timepoints.latest_is_recent",
        run: latest_is_recent,
    },
    Check {
        name: "timepoints.gaps_within_limit",
        run: gaps_within_limit,
    },
    Check {
        name: "timepoints.prices_are_positive",
        run: prices_are_positive,
    },
];

fn timestamps_are_sorted(history: &PriceHistory, _ctx: &CheckContext) -> CheckStatus {
    for (i, pair) in history.all_time_points.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return CheckStatus::failed(format!(
                "timestamps out of order at index {}: {} follows {}",
                i + 1,
                pair[1].timestamp,
                pair[0].timestamp
            ));
        }
    }
    CheckStatus::Passed
}

fn timestamps_are_unique(history: &PriceHistory, _ctx: &CheckContext) -> CheckStatus {
    let mut seen = BTreeSet::new();
    for point in &history.all_time_points {
        if !seen.insert(point.timestamp) {
            return CheckStatus::failed(format!("duplicate timestamp {}", point.timestamp));
        }
    }
    CheckStatus::Passed
}

fn latest_is_recent(history: &PriceHistory, ctx: &CheckContext) -> CheckStatus {
    let Some(last) = history.all_time_points.last() else {
        return CheckStatus::failed("history contains no time points");
    };
    let age = ctx.age_secs(last.timestamp);
    if age <= ctx.max_age_secs {
        CheckStatus::Passed
    } else {
        CheckStatus::failed(format!(
            "latest point is {age}s old, limit is {}s",
            ctx.max_age_secs
        ))
    }
}

fn gaps_within_limit(history: &PriceHistory, ctx: &CheckContext) -> CheckStatus {
    for pair in history.all_time_points.windows(2) {
        let gap = pair[1].timestamp.saturating_sub(pair[0].timestamp);
        if gap > ctx.max_gap_secs {
            return CheckStatus::failed(format!(
                "gap of {gap}s between {} and {}, limit is {}s",
                pair[0].timestamp, pair[1].timestamp, ctx.max_gap_secs
            ));
        }
    }
    CheckStatus::Passed
}

fn prices_are_positive(history: &PriceHistory, _ctx: &CheckContext) -> CheckStatus {
    for (i, point) in history.all_time_points.iter().enumerate() {
        for metal in Metal::ALL {
            match point.parse_price(metal) {
                Ok(value) if value.is_finite() && value > 0.0 => {}
                Ok(value) => {
                    return CheckStatus::failed(format!(
                        "{} price at index {i} must be positive, got {value}",
                        metal.as_str()
                    ));
                }
                Err(_) => {
                    return CheckStatus::failed(format!(
                        "{} price at index {i} is not numeric: {:?}",
                        metal.as_str(),
                        point.price(metal)
                    ));
                }
            }
        }
    }
    CheckStatus::Passed
}
