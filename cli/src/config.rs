use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use carelog_core::{Role, User};
use clap::Args;

pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 30;

/// Options shared by every subcommand. Each one can come from the
/// environment instead of the command line.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding the data files (default: ~/.carelog)
    #[arg(long, global = true, env = "CARELOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Spreadsheet webhook used by `sync`
    #[arg(long, global = true, env = "CARELOG_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Seconds before a sync request is abandoned
    #[arg(long, global = true, env = "CARELOG_SYNC_TIMEOUT", default_value_t = DEFAULT_SYNC_TIMEOUT_SECS)]
    pub sync_timeout: u64,

    /// Id of the acting user
    #[arg(long, global = true, env = "CARELOG_USER", default_value = "manager")]
    pub user: String,

    /// Role of the acting user: manager, staff or client
    #[arg(long, global = true, env = "CARELOG_ROLE", default_value = "manager")]
    pub role: Role,

    /// Display name of the acting user
    #[arg(long, global = true, env = "CARELOG_NAME")]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub sync_timeout: Duration,
    pub actor: User,
}

impl Config {
    pub fn from_args(args: GlobalArgs) -> Self {
        let name = args.name.unwrap_or_else(|| args.user.clone());
        Self {
            data_dir: args.data_dir,
            webhook_url: args.webhook_url.filter(|url| !url.trim().is_empty()),
            sync_timeout: Duration::from_secs(args.sync_timeout),
            actor: User::new(args.user, name, args.role),
        }
    }

    pub fn require_webhook(&self) -> Result<&str> {
        self.webhook_url
            .as_deref()
            .ok_or_else(|| anyhow!("No webhook configured. Set --webhook-url or CARELOG_WEBHOOK_URL."))
    }
}
