//! CLI parse tests and call argument handling.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

mod call_args;
