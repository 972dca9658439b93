use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use corecut::{
    aggregate_folder, compute_aggregate_savings, compute_machine_savings, compute_savings,
    load_document, write_aggregate, Cli, Command, Config, CostParameters, DashboardState,
    ReportDocument, Reporter, TerminalReporter,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    debug!(?config, "configuration");

    let params = config.cost_parameters();
    let reporter = if config.output.color {
        TerminalReporter::new()
    } else {
        TerminalReporter::without_colors()
    }
    .with_currency(config.output.currency.clone());

    match &cli.command {
        Command::Savings { report, json } => savings(report, &params, &reporter, *json),
        Command::Aggregate { dir, output } => {
            let (aggregate, skipped) = aggregate_folder(dir)
                .with_context(|| format!("Failed to aggregate reports in {}", dir.display()))?;
            if !skipped.is_empty() {
                warn!(count = skipped.len(), "some report files were skipped");
            }

            let per_machine = compute_machine_savings(&aggregate, &params);
            let total = compute_aggregate_savings(&aggregate.reports, &params);
            reporter.report_aggregate(&aggregate, &per_machine, &total)?;

            let out_dir = output.as_deref().unwrap_or(dir);
            let path = write_aggregate(&aggregate, out_dir)?;
            info!(path = %path.display(), "wrote aggregate report");
            Ok(())
        }
        Command::Serve { report, .. } => {
            let mut dashboard = DashboardState::new(params);
            for path in report {
                let document = load_document(path)
                    .with_context(|| format!("Failed to load report {}", path.display()))?;
                dashboard.load(document);
            }

            let addr = config.server.socket_addr()?;
            corecut::run_server(dashboard, addr)
        }
    }
}

fn savings(
    path: &Path,
    params: &CostParameters,
    reporter: &TerminalReporter,
    json: bool,
) -> Result<()> {
    let document = load_document(path)
        .with_context(|| format!("Failed to load report {}", path.display()))?;

    match &document {
        ReportDocument::Single(report) => {
            let savings = compute_savings(report, params);
            if json {
                println!("{}", serde_json::to_string_pretty(&savings)?);
            } else {
                reporter.report_single(report, &savings)?;
            }
        }
        ReportDocument::Aggregate(aggregate) => {
            let total = compute_aggregate_savings(&aggregate.reports, params);
            if json {
                println!("{}", serde_json::to_string_pretty(&total)?);
            } else {
                let per_machine = compute_machine_savings(aggregate, params);
                reporter.report_aggregate(aggregate, &per_machine, &total)?;
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
