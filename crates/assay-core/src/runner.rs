//! Suite orchestration: fetch each endpoint once, run its checks, report.

use std::fmt::Display;
use std::time::Instant;

use chrono::Utc;
use futures::join;
use thiserror::Error;
use tracing::{error, info};

use assay_client::PriceApi;
use assay_schema::{CheckOutcome, CheckStatus, SuiteReport};

use crate::checks::{self, Check, CheckContext};
use crate::config::Config;
use crate::report::ReportLogger;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Run the full check battery against the given API.
///
/// Each endpoint is fetched once and its checks share the response, the way
/// a fixture is shared across a test module. A fetch failure fails all of
/// that endpoint's checks; the other endpoint still runs.
pub async fn run_suite(
    api: &dyn PriceApi,
    config: &Config,
    env_name: &str,
    report_log: &mut ReportLogger,
) -> Result<SuiteReport, RunnerError> {
    let env = config
        .environment(env_name)
        .ok_or_else(|| RunnerError::UnknownEnvironment(env_name.to_string()))?;

    info!(env = env_name, url = %env.api_url, "running assay suite");
    report_log.log_suite_start(env_name);

    let ctx = CheckContext::new(Utc::now(), env.run_prod_assertions, &config.checks);
    let mut report = SuiteReport::new(env_name);

    let (currencies, time_points) = join!(api.fetch_currencies(), api.fetch_time_points());

    run_group(
        &mut report,
        report_log,
        checks::currencies::CHECKS,
        &currencies,
        &ctx,
    );
    run_group(
        &mut report,
        report_log,
        checks::timepoints::CHECKS,
        &time_points,
        &ctx,
    );

    report_log.log_suite_end(&report);
    info!(
        passed = report.passed(),
        failed = report.failed(),
        skipped = report.skipped(),
        "suite finished"
    );

    Ok(report)
}

fn run_group<T, E: Display>(
    report: &mut SuiteReport,
    report_log: &mut ReportLogger,
    group: &[Check<T>],
    fetched: &Result<T, E>,
    ctx: &CheckContext,
) {
    for check in group {
        let start = Instant::now();
        let status = match fetched {
            Ok(data) => (check.run)(data, ctx),
            Err(e) => CheckStatus::failed(format!("fetch failed: {e}")),
        };
        let outcome = CheckOutcome {
            name: check.name.to_string(),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        match &outcome.status {
            CheckStatus::Passed => info!(check = check.name, "check passed"),
            CheckStatus::Skipped { reason } => {
                info!(check = check.name, reason = %reason, "check skipped")
            }
            CheckStatus::Failed { reason } => {
                error!(check = check.name, reason = %reason, "check failed")
            }
        }

        report_log.log_outcome(&report.env, &outcome);
        report.push(outcome);
    }
}
