//! Command-line interface for corecut.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "corecut")]
#[command(about = "Turn benchmark comparison reports into cost, energy and CO2 savings")]
#[command(version)]
pub struct Cli {
    /// Path to config file (defaults to .corecut.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub cost: CostArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the cost parameters.
#[derive(Debug, Clone, Default, Args)]
pub struct CostArgs {
    /// Cost of one hour of execution time (currency/hour)
    #[arg(long, global = true)]
    pub hourly_rate: Option<f64>,

    /// Price of electricity (currency/kWh)
    #[arg(long, global = true)]
    pub electricity_price: Option<f64>,

    /// Power draw of the server while executing (watts)
    #[arg(long, global = true)]
    pub server_watts: Option<f64>,

    /// Number of executions per working day
    #[arg(long, global = true)]
    pub executions_per_day: Option<f64>,

    /// Number of working days per year
    #[arg(long, global = true)]
    pub working_days: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate savings for a single or aggregate report
    Savings {
        /// Report JSON file
        report: PathBuf,

        /// Print the savings as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Aggregate per-machine reports from a folder
    Aggregate {
        /// Folder containing report JSON files (searched recursively)
        dir: PathBuf,

        /// Output directory for aggregate.json (defaults to the input folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the dashboard HTTP server
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Report files to load at startup (repeatable)
        #[arg(long)]
        report: Vec<PathBuf>,
    },
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(hourly_rate) = self.cost.hourly_rate {
            config.cost.hourly_rate = hourly_rate;
        }

        if let Some(electricity_price) = self.cost.electricity_price {
            config.cost.electricity_price = electricity_price;
        }

        if let Some(server_watts) = self.cost.server_watts {
            config.cost.server_watts = server_watts;
        }

        if let Some(executions_per_day) = self.cost.executions_per_day {
            config.cost.executions_per_day = executions_per_day;
        }

        if let Some(working_days) = self.cost.working_days {
            config.cost.working_days_per_year = working_days;
        }

        if self.no_color {
            config.output.color = false;
        }

        if let Command::Serve { bind, port, .. } = &self.command {
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
    }
}
