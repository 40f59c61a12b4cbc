//! Pi-hole Monitor CLI
//!
//! Shows the status of a Pi-hole on a 16x2 LCD attached to the same host.

use std::path::PathBuf;

use clap::Parser;
use pihole_monitor::bootstrap::BootstrapOverrides;
use pihole_monitor::RunOptions;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pihole-monitor")]
#[command(about = "Pi-hole status monitor for a 16x2 character LCD")]
#[command(version, disable_version_flag = true)]
struct Args {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Path to configuration file
    #[arg(short, long, default_value = "piholemon_config.json")]
    config: PathBuf,

    /// Turn the display backlight off
    #[arg(short, long)]
    backlight_off: bool,

    /// Log display output instead of driving an LCD
    #[arg(long)]
    console: bool,

    /// Pi-hole host used when no config exists yet
    #[arg(long)]
    host: Option<String>,

    /// Pi-hole API token used when no config exists yet
    #[arg(long)]
    token: Option<String>,

    /// Skip the release check at startup
    #[arg(long)]
    no_update_check: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, backlight_off={}, console={}, log_level={:?}",
        args.config,
        args.backlight_off,
        args.console,
        args.log_level
    );

    tracing::info!("Starting Pi-hole monitor {}", pihole_monitor::VERSION);

    pihole_monitor::run(RunOptions {
        config_path: args.config,
        backlight_off: args.backlight_off,
        console: args.console,
        overrides: BootstrapOverrides {
            hostname: args.host,
            token: args.token,
        },
        check_updates: !args.no_update_check,
    })
    .await?;

    Ok(())
}
