//! Append-only JSONL report log for suite runs.
//!
//! Writes one JSON object per line, recording suite boundaries and every
//! individual check outcome. Write failures never fail the run.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assay_schema::{CheckOutcome, CheckStatus, SuiteReport};

/// Append-only JSONL report logger.
pub struct ReportLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
}

impl ReportLogger {
    /// Create a new report logger that appends to the given path.
    /// Creates parent directories if they don't exist.
    pub fn new(path: &PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            session_id: generate_session_id(),
        })
    }

    /// Create a no-op logger that discards all events.
    pub fn noop() -> Self {
        Self {
            writer: None,
            session_id: generate_session_id(),
        }
    }

    /// Log the start of a suite run.
    pub fn log_suite_start(&mut self, env: &str) {
        self.write_event(serde_json::json!({
            "ts": epoch_secs(),
            "session": self.session_id,
            "type": "suite_start",
            "env": env,
        }));
    }

    /// Log a single check outcome.
    pub fn log_outcome(&mut self, env: &str, outcome: &CheckOutcome) {
        let reason = match &outcome.status {
            CheckStatus::Passed => None,
            CheckStatus::Failed { reason } | CheckStatus::Skipped { reason } => {
                Some(reason.as_str())
            }
        };
        self.write_event(serde_json::json!({
            "ts": epoch_secs(),
            "session": self.session_id,
            "type": "check",
            "env": env,
            "name": outcome.name,
            "status": outcome.status.label(),
            "reason": reason,
            "duration_ms": outcome.duration_ms,
        }));
    }

    /// Log the end of a suite run with its totals.
    pub fn log_suite_end(&mut self, report: &SuiteReport) {
        self.write_event(serde_json::json!({
            "ts": epoch_secs(),
            "session": self.session_id,
            "type": "suite_end",
            "env": report.env,
            "passed": report.passed(),
            "failed": report.failed(),
            "skipped": report.skipped(),
        }));
    }

    fn write_event(&mut self, value: serde_json::Value) {
        if let Some(ref mut writer) = self.writer {
            if let Ok(line) = serde_json::to_string(&value) {
                let _ = writeln!(writer, "{line}");
                let _ = writer.flush();
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn generate_session_id() -> String {
    let pid = std::process::id();
    let ts = epoch_secs();
    format!("s{:x}", pid ^ (ts as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_log_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
        let content = std::fs::read_to_string(path).unwrap();
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn outcome(status: CheckStatus) -> CheckOutcome {
        CheckOutcome {
            name: "timepoints.latest_is_recent".to_string(),
            status,
            duration_ms: 2,
        }
    }

    #[test]
    fn new_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("report.jsonl");
        let _logger = ReportLogger::new(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn outcome_line_carries_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");
        let mut logger = ReportLogger::new(&path).unwrap();

        logger.log_outcome("prod", &outcome(CheckStatus::failed("too old")));

        let lines = read_log_lines(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "check");
        assert_eq!(lines[0]["env"], "prod");
        assert_eq!(lines[0]["name"], "timepoints.latest_is_recent");
        assert_eq!(lines[0]["status"], "failed");
        assert_eq!(lines[0]["reason"], "too old");
        assert_eq!(lines[0]["duration_ms"], 2);
        assert!(lines[0]["session"].as_str().unwrap().starts_with('s'));
    }

    #[test]
    fn passed_outcome_has_null_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");
        let mut logger = ReportLogger::new(&path).unwrap();

        logger.log_outcome("dev", &outcome(CheckStatus::Passed));

        let lines = read_log_lines(&path);
        assert!(lines[0]["reason"].is_null());
    }

    #[test]
    fn suite_boundaries_and_totals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");
        let mut logger = ReportLogger::new(&path).unwrap();

        let mut report = SuiteReport::new("dev");
        report.push(outcome(CheckStatus::Passed));
        report.push(outcome(CheckStatus::skipped("not prod")));

        logger.log_suite_start("dev");
        logger.log_outcome("dev", &report.outcomes[0]);
        logger.log_outcome("dev", &report.outcomes[1]);
        logger.log_suite_end(&report);

        let lines = read_log_lines(&path);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["type"], "suite_start");
        assert_eq!(lines[3]["type"], "suite_end");
        assert_eq!(lines[3]["passed"], 1);
        assert_eq!(lines[3]["failed"], 0);
        assert_eq!(lines[3]["skipped"], 1);
    }

    #[test]
    fn appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");

        let mut first = ReportLogger::new(&path).unwrap();
        first.log_suite_start("dev");
        drop(first);

        let mut second = ReportLogger::new(&path).unwrap();
        second.log_suite_start("dev");

        assert_eq!(read_log_lines(&path).len(), 2);
    }

    #[test]
    fn noop_writes_nothing() {
        let mut logger = ReportLogger::noop();
        logger.log_suite_start("dev");
        logger.log_outcome("dev", &outcome(CheckStatus::Passed));
        // Nothing to assert beyond not panicking: there is no file.
    }
}
