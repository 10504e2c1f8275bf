//! CLI command handlers, one file per subcommand.

mod call;
mod classify;
mod config;
mod filters;

pub use call::{run_call, CallOptions};
pub use classify::run_classify;
pub use config::run_config;
pub use filters::run_filters;

#[cfg(test)]
pub(crate) use call::{build_args, parse_arg};
