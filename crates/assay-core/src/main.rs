use std::io::Write;
use std::path::PathBuf;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use assay_client::ApiClient;
use assay_core::checks;
use assay_core::config::Config;
use assay_core::report::ReportLogger;
use assay_core::runner::run_suite;
use assay_schema::{CheckStatus, SuiteReport};

fn print_help() {
    println!("assayer — validation suite for the metals price API");
    println!();
    println!("Usage:");
    println!("  assayer [options]");
    println!();
    println!("Options:");
    println!("  --env <name>      Environment to run against (default: dev)");
    println!("  --config <path>   Use an explicit config file");
    println!("  --json            Print the suite report as JSON");
    println!("  --list            List check names and exit");
    println!("  --version         Print version");
    println!("  --help            Print this help");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("assayer {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.iter().any(|a| a == "--list") {
        for name in checks::all_check_names() {
            println!("{name}");
        }
        return;
    }

    let json_output = args.iter().any(|a| a == "--json");
    let env_name = flag_value(&args, "--env").unwrap_or_else(|| "dev".to_string());

    let config = match flag_value(&args, "--config") {
        Some(path) => match Config::load_path(&PathBuf::from(&path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("error: failed to load {path}: {e}");
                std::process::exit(2);
            }
        },
        None => Config::load_or_default(),
    };

    let env = match config.environment(&env_name) {
        Some(env) => env,
        None => {
            eprintln!("error: unknown environment: {env_name}");
            std::process::exit(2);
        }
    };

    let client = ApiClient::with_policy(
        &env.api_url,
        config.client.retry_policy(),
        config.client.timeout(),
        config.client.connect_timeout(),
    );

    let mut report_log = if config.report.enabled {
        let path = config.report.resolve_report_path();
        match ReportLogger::new(&path) {
            Ok(logger) => logger,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "report log unavailable");
                ReportLogger::noop()
            }
        }
    } else {
        ReportLogger::noop()
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create async runtime: {e}");
            std::process::exit(2);
        }
    };

    let report = match runtime.block_on(run_suite(&client, &config, &env_name, &mut report_log)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to encode report: {e}");
                std::process::exit(2);
            }
        }
    } else {
        let mut stdout = std::io::stdout();
        let _ = write_summary(&mut stdout, &report);
    }

    std::process::exit(if report.is_success() { 0 } else { 1 });
}

/// Value of `--flag value` style options.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

/// Human-readable summary: one line per check plus a totals line.
fn write_summary<W: Write>(w: &mut W, report: &SuiteReport) -> std::io::Result<()> {
    for outcome in &report.outcomes {
        let (label, reason) = match &outcome.status {
            CheckStatus::Passed => ("PASS", None),
            CheckStatus::Failed { reason } => ("FAIL", Some(reason.as_str())),
            CheckStatus::Skipped { reason } => ("SKIP", Some(reason.as_str())),
        };
        match reason {
            Some(reason) => writeln!(
                w,
                "{label}  {:<40} {:>5}ms  {reason}",
                outcome.name, outcome.duration_ms
            )?,
            None => writeln!(
                w,
                "{label}  {:<40} {:>5}ms",
                outcome.name, outcome.duration_ms
            )?,
        }
    }
    writeln!(
        w,
        "--- {} checks: {} passed, {} failed, {} skipped",
        report.outcomes.len(),
        report.passed(),
        report.failed(),
        report.skipped()
    )
}
