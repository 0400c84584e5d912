use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tenant_deploy::config;
use tenant_deploy::credential::ScrapePolicy;
use tenant_deploy::docker::DockerCli;
use tenant_deploy::pipeline::render::Reporter;
use tenant_deploy::pipeline::{self, BatchInput};

#[derive(Parser)]
#[command(
    name = "tenant-deploy",
    about = "Deploy one isolated file-serving container per tenant"
)]
struct Cli {
    /// Tenant names, deployed in order
    #[arg(long, num_args = 1.., required = true)]
    names: Vec<String>,
    /// Host port for the first tenant; the rest follow consecutively
    #[arg(long, default_value_t = 8000)]
    start_port: u16,
    /// Config file (defaults to .tenantrc in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seconds to wait before reading a new instance's log
    #[arg(long)]
    grace_period: Option<u64>,
    /// Print the batch report as JSON once all tenants are processed
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let mut cfg = config::load(&cwd, cli.config.as_deref())?;
    if let Some(secs) = cli.grace_period {
        cfg.grace_period_secs = secs;
    }

    // Only an unreachable engine aborts the whole run.
    let engine = DockerCli::connect(Duration::from_secs(cfg.docker_timeout))
        .context("Docker is not running")?;

    let input = BatchInput {
        base_dir: cwd.join(&cfg.tenants_dir),
        scrape: ScrapePolicy::from_config(&cfg),
        names: cli.names,
        start_port: cli.start_port,
        config: cfg,
    };

    // With --json, stdout carries the report alone and progress moves to stderr.
    let mut reporter: Reporter<Box<dyn Write>, io::Stdout> = if cli.json {
        Reporter::new(Box::new(io::stderr()), Some(io::stdout()))
    } else {
        Reporter::new(Box::new(io::stdout()), None)
    };

    reporter.banner()?;
    let report = pipeline::run_batch(&engine, &input, |event| {
        if let Err(e) = reporter.event(&event) {
            tracing::warn!(error = %e, "failed to write tenant report");
        }
    });
    reporter.finish(&report).context("failed to write batch report")?;

    // Per-tenant failures are reported above, not through the exit status.
    Ok(())
}
