use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use assay_client::RetryPolicy;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub environments: BTreeMap<String, EnvConfig>,
    pub client: ClientConfig,
    pub checks: CheckConfig,
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environments: default_environments(),
            client: ClientConfig::default(),
            checks: CheckConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Out of the box only `dev` exists, pointed at a local API. Production
/// environments carry real URLs and belong in the config file.
fn default_environments() -> BTreeMap<String, EnvConfig> {
    let mut envs = BTreeMap::new();
    envs.insert(
        "dev".to_string(),
        EnvConfig {
            api_url: "http://localhost:8000".to_string(),
            run_prod_assertions: false,
        },
    );
    envs
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EnvConfig {
    /// Base URL of the price API for this environment.
    pub api_url: String,
    /// Enable assertions that only hold against live production data.
    #[serde(default)]
    pub run_prod_assertions: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Retries beyond the first attempt for transient failures.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds. Doubles per retry.
    pub backoff_base_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            connect_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckConfig {
    /// Maximum age in seconds before data counts as stale.
    pub max_age_secs: i64,
    /// Maximum allowed gap in seconds between consecutive time points.
    pub max_gap_secs: i64,
    /// Base currency the rates must be quoted against.
    pub expected_base: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 12 * 3600,
            max_gap_secs: 120 * 3600,
            expected_base: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Enable the JSONL report log.
    pub enabled: bool,
    /// Custom report path. Defaults to ~/.local/share/assayer/report.jsonl.
    pub path: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl ReportConfig {
    /// Resolve the report path, using the configured path or the XDG default.
    pub fn resolve_report_path(&self) -> PathBuf {
        if let Some(ref custom) = self.path {
            return PathBuf::from(custom);
        }

        let base = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".local").join("share")
            });
        base.join("assayer").join("report.jsonl")
    }
}

impl Config {
    pub fn load_or_default() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("warning: failed to parse {}: {e}", path.display());
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Load from an explicit path. Unlike [`load_or_default`](Self::load_or_default),
    /// a missing or malformed file here is a hard error.
    pub fn load_path(path: &Path) -> io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Resolve the named environment.
    pub fn environment(&self, name: &str) -> Option<&EnvConfig> {
        self.environments.get(name)
    }
}

fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("assayer").join("config.toml")
}
