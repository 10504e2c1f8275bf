//! `cloudq call` – invoke one filter against the configured inventory.

use anyhow::{bail, Context, Result};
use cloudq_core::config::CloudqConfig;
use cloudq_core::filters::{Defaults, FilterArgs};
use cloudq_core::inventory::Inventory;
use cloudq_core::lookup::Lookups;
use serde_json::Value;
use std::path::PathBuf;

/// Options collected from the `call` subcommand.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub filter: String,
    pub args: Vec<String>,
    pub json: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub inventory: Option<PathBuf>,
}

/// Split `key=value`; the value is JSON when it parses as JSON, else a string.
pub(crate) fn parse_arg(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("argument {raw:?} is not key=value");
    };
    if key.is_empty() {
        bail!("argument {raw:?} has an empty key");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Merge `--json` and `--arg` into one argument object.
pub(crate) fn build_args(opts: &CallOptions) -> Result<FilterArgs> {
    let base = match &opts.json {
        Some(text) => serde_json::from_str(text).context("--json is not valid JSON")?,
        None => Value::Null,
    };
    let mut args = FilterArgs::from_value(base)?;
    for raw in &opts.args {
        let (key, value) = parse_arg(raw)?;
        args.insert(key, value);
    }
    Ok(args)
}

pub fn run_call(cfg: &CloudqConfig, opts: &CallOptions) -> Result<()> {
    let path = opts
        .inventory
        .as_ref()
        .or(cfg.inventory.as_ref())
        .context("no inventory configured; pass --inventory or set `inventory` in config.toml")?;
    let inventory = Inventory::from_path(path)?;

    let args = build_args(opts)?;
    let base = cfg.defaults();
    let defaults = Defaults {
        region: opts.region.clone().or(base.region),
        profile: opts.profile.clone().or(base.profile),
    };

    let lookups = Lookups::new(inventory).with_backoff(cfg.backoff());
    let result = lookups
        .invoke(&opts.filter, &args, &defaults)
        .with_context(|| format!("{} failed", opts.filter))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
