//! CLI for the cloudq lookup filters.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudq_core::config;
use std::path::PathBuf;

use commands::{run_call, run_classify, run_config, run_filters, CallOptions};

/// Top-level CLI: resolve cloud resource names the way templates do.
#[derive(Debug, Parser)]
#[command(name = "cloudq")]
#[command(about = "cloudq: name and tag lookups for cloud resources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List registered filter names.
    Filters,

    /// Invoke a filter and print its JSON result.
    Call {
        /// Filter name, e.g. get_sg or zones.
        filter: String,

        /// Filter argument as key=value; values that parse as JSON are used as JSON.
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Filter arguments as a JSON object; --arg entries override its keys.
        #[arg(long, value_name = "OBJECT")]
        json: Option<String>,

        /// Region used when the arguments do not name one.
        #[arg(long)]
        region: Option<String>,

        /// Credential profile used when the arguments do not name one.
        #[arg(long)]
        profile: Option<String>,

        /// Inventory snapshot to serve lookups from (overrides config).
        #[arg(long, value_name = "FILE")]
        inventory: Option<PathBuf>,
    },

    /// Report whether provider response codes are retried.
    Classify {
        /// Response codes, e.g. RequestLimitExceeded or Subnet.NotFound.
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Show the config file location and effective values.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Filters => run_filters(),
            CliCommand::Call {
                filter,
                args,
                json,
                region,
                profile,
                inventory,
            } => {
                let opts = CallOptions {
                    filter,
                    args,
                    json,
                    region,
                    profile,
                    inventory,
                };
                run_call(&cfg, &opts)?;
            }
            CliCommand::Classify { codes } => run_classify(&codes),
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
