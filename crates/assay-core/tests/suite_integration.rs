//! Integration tests for the full assay suite.
//!
//! These run the real runner and report logger end to end against the mock
//! API, verifying outcomes, the JSONL report, and environment gating.

use chrono::Utc;

use assay_client::mock::fixtures;
use assay_client::MockApi;
use assay_core::checks;
use assay_core::config::{Config, EnvConfig};
use assay_core::report::ReportLogger;
use assay_core::runner::run_suite;
use assay_schema::CheckStatus;

fn config_with_env(name: &str, run_prod_assertions: bool) -> Config {
    let mut config = Config::default();
    config.environments.insert(
        name.to_string(),
        EnvConfig {
            api_url: "http://localhost:8000".to_string(),
            run_prod_assertions,
        },
    );
    config
}

fn read_log_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).unwrap();
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn healthy_suite_passes_and_writes_report() {
    let now = Utc::now();
    let api = MockApi::new()
        .with_currencies(fixtures::currencies_ok(now))
        .with_time_points(fixtures::healthy_history(now));
    let config = config_with_env("dev", false);

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("report.jsonl");
    let mut log = ReportLogger::new(&log_path).unwrap();

    let report = run_suite(&api, &config, "dev", &mut log).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.failed(), 0);

    let lines = read_log_lines(&log_path);
    // suite_start + one line per check + suite_end
    assert_eq!(lines.len(), checks::all_check_names().len() + 2);
    assert_eq!(lines.first().unwrap()["type"], "suite_start");
    assert_eq!(lines.last().unwrap()["type"], "suite_end");
    assert_eq!(lines.last().unwrap()["failed"], 0);
}

#[tokio::test]
async fn broken_suite_records_failures_in_report_log() {
    let now = Utc::now();
    let api = MockApi::new()
        .with_currencies(fixtures::currencies_negative_rate(now))
        .with_time_points(fixtures::stale_history(now));
    let config = config_with_env("dev", false);

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("report.jsonl");
    let mut log = ReportLogger::new(&log_path).unwrap();

    let report = run_suite(&api, &config, "dev", &mut log).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed(), 2);

    let failed_names: Vec<String> = read_log_lines(&log_path)
        .iter()
        .filter(|l| l["type"] == "check" && l["status"] == "failed")
        .map(|l| l["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        failed_names,
        vec!["currencies.rates_are_positive", "timepoints.latest_is_recent"]
    );
}

#[tokio::test]
async fn prod_gating_controls_currency_freshness() {
    let now = Utc::now();
    let stale = fixtures::currencies_stale(now);
    let history = fixtures::healthy_history(now);

    // Dev: stale currencies are tolerated, the check is skipped.
    let api = MockApi::new()
        .with_currencies(stale.clone())
        .with_time_points(history.clone());
    let config = config_with_env("dev", false);
    let mut log = ReportLogger::noop();
    let report = run_suite(&api, &config, "dev", &mut log).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.skipped(), 1);

    // Prod: the same data fails.
    let api = MockApi::new()
        .with_currencies(stale)
        .with_time_points(history);
    let config = config_with_env("prod", true);
    let report = run_suite(&api, &config, "prod", &mut log).await.unwrap();
    assert!(!report.is_success());
    let failing: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| o.status.is_failed())
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(failing, vec!["currencies.timestamp_is_recent"]);
}

#[tokio::test]
async fn dead_upstream_fails_everything_but_still_reports() {
    let api = MockApi::new();
    let config = config_with_env("dev", false);

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("report.jsonl");
    let mut log = ReportLogger::new(&log_path).unwrap();

    let report = run_suite(&api, &config, "dev", &mut log).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed(), checks::all_check_names().len());
    for outcome in &report.outcomes {
        match &outcome.status {
            CheckStatus::Failed { reason } => assert!(reason.contains("fetch failed")),
            other => panic!("{} should fail, got {other:?}", outcome.name),
        }
    }

    let lines = read_log_lines(&log_path);
    assert_eq!(lines.last().unwrap()["failed"], checks::all_check_names().len());
}
