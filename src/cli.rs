use std::path::PathBuf;

use clap::Parser;

use crate::host::sim::PermissionOutcome;

#[derive(Parser, Debug)]
#[command(
    name = "optin-prompt",
    version,
    about = "Opt-in dialog for push notifications, demoed in the terminal"
)]
pub struct Args {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Locale tag override (e.g. "fr", "de-AT")
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Seconds until the simulated trigger fires, unless the trigger
    /// spec names its own delay
    #[arg(long)]
    pub delay: Option<u64>,

    /// Outcome of the simulated permission prompt
    #[arg(long, value_enum, default_value_t)]
    pub outcome: PermissionOutcome,

    /// Report push as unsupported (the dialog never shows)
    #[arg(long)]
    pub unsupported: bool,
}
