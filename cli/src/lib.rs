//! `shopfront` command line
//!
//! Operator tooling over the address engine: inspect country metadata,
//! check single field values, run lookups and validate complete addresses
//! against the lookup provider.

pub mod address_cmd;

use clap::Parser;
use std::path::PathBuf;

pub use address_cmd::AddressSubcommand;

/// Exit codes shared by every subcommand
pub mod exit_code {
    /// Success / address confirmed
    pub const OK: i32 = 0;
    /// Needs attention (no match, suggestion differs, invalid field value)
    pub const ATTENTION: i32 = 1;
    /// Input errors that block submission
    pub const INVALID: i32 = 2;
    /// Configuration or infrastructure error
    pub const INFRA: i32 = 3;
}

#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about = "Storefront address tooling")]
pub struct Cli {
    /// Path to address.toml (overrides SHOPFRONT_ADDRESS_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Output as JSON for automation
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: AddressSubcommand,
}

impl Cli {
    pub async fn run(self) -> i32 {
        let cfg = match address_cmd::load_config(self.config.as_deref(), self.api_base_url) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to load address config");
                return exit_code::INFRA;
            }
        };
        address_cmd::run(self.command, &cfg, self.json).await
    }
}
