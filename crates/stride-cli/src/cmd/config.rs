use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use stride_core::config::{UsersConfig, WarnLevel};

use crate::output::print_json;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the accounts config for common mistakes
    Validate {
        /// Path to the accounts config file
        #[arg(long, default_value = "users.yaml")]
        config: PathBuf,
    },
}

pub fn run(subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<i32> {
    match subcmd {
        ConfigSubcommand::Validate { config } => validate(&config, json),
    }
}

fn validate(path: &PathBuf, json: bool) -> anyhow::Result<i32> {
    let cfg = UsersConfig::load(path).context("failed to load accounts config")?;
    let warnings = cfg.validate();

    if json {
        let value = serde_json::json!({
            "accounts": cfg.users.len(),
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid: {} account(s), no warnings.", cfg.users.len());
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(0)
}
