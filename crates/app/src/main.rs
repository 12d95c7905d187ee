//! Attest command line interface.
//!
//! Loads a suite file, runs every registered case against the configured
//! base URL, prints a human-readable summary, and exits 0 when all cases
//! pass, 1 when any fail, and 2 on configuration errors.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use attest_domain::{RunConfig, SuiteFile};
use attest_engine::{CaseRegistry, Runner};
use attest_infrastructure::ReqwestTransport;

const EXIT_FAILURES: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "attest", version, about = "Contract-test runner for HTTP APIs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every case in a suite file
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Path to the suite file (JSON)
    suite: PathBuf,

    /// Base URL, overriding the suite's own
    #[arg(long)]
    base_url: Option<String>,

    /// Default per-case timeout in milliseconds, overriding the suite's own
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Maximum number of cases in flight at once
    #[arg(long)]
    parallel: Option<usize>,

    /// Additional default header (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE")]
    headers: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> ExitCode {
    let (registry, config) = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(error) => {
            eprintln!("configuration error: {error:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    tracing::info!(
        cases = registry.len(),
        base_url = %config.base_url(),
        max_parallel = config.max_parallel(),
        "starting run"
    );

    let runner = Runner::new(Arc::new(transport), config);
    let summary = runner.run(&registry).await;

    print!("{}", output::render_summary(&summary));
    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURES)
    }
}

/// Loads the suite file and resolves the effective configuration.
/// Flags win over the suite's embedded configuration.
fn prepare(args: &RunArgs) -> anyhow::Result<(CaseRegistry, RunConfig)> {
    let text = std::fs::read_to_string(&args.suite)
        .with_context(|| format!("cannot read suite file {}", args.suite.display()))?;
    let suite: SuiteFile = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse suite file {}", args.suite.display()))?;

    let mut builder = RunConfig::builder();
    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        builder = builder.default_timeout_ms(timeout_ms);
    }
    if let Some(parallel) = args.parallel {
        builder = builder.max_parallel(parallel);
    }
    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        builder = builder.header(name, value);
    }
    if let Some(embedded) = &suite.config {
        builder = embedded.apply_to(builder);
    }
    let config = builder.build()?;

    let registry = CaseRegistry::from_cases(suite.cases)?;
    Ok((registry, config))
}

/// Parses a `NAME=VALUE` header flag.
fn parse_header(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("invalid header '{raw}', expected NAME=VALUE"))
}
