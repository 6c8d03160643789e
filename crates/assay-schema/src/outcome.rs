//! Check outcome and suite report types.

use serde::{Deserialize, Serialize};

/// Result of a single validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// The check held against the fetched data.
    Passed,

    /// The check found a violation. The reason names the offending value.
    Failed { reason: String },

    /// The check does not apply in this environment.
    Skipped { reason: String },
}

impl CheckStatus {
    pub fn failed(reason: impl Into<String>) -> Self {
        CheckStatus::Failed {
            reason: reason.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        CheckStatus::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "passed",
            CheckStatus::Failed { .. } => "failed",
            CheckStatus::Skipped { .. } => "skipped",
        }
    }
}

/// A named check outcome with its wall-clock duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
    pub duration_ms: u64,
}

/// Aggregated outcomes for one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub env: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn new(env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| s.is_failed())
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Skipped { .. }))
    }

    /// A run succeeds when nothing failed. Skips do not count against it.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}
