//! `cloudq config` – print the config path and effective values.

use anyhow::Result;
use cloudq_core::config::{self, CloudqConfig};

pub fn run_config(cfg: &CloudqConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);

    let backoff = cfg.backoff();
    println!(
        "# effective retry: tries={} delay={}s backoff={} (max wait {}s)",
        backoff.attempts(),
        backoff.delay.as_secs(),
        backoff.backoff,
        backoff.max_total_delay().as_secs()
    );
    Ok(())
}
