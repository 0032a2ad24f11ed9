//! Mystery Admin
//!
//! Resets a mystery game's Discord server between sessions.

use clap::{Parser, Subcommand};
use mystery_admin::{
    Admin,
    config::{AppConfig, LogFormat, load_config},
    directory::SharedDirectory,
    discord::DiscordClient,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Mystery Admin - reset channels, messages and roles between games
#[derive(Parser, Debug)]
#[command(name = "mystery-admin")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "MYSTERY_ADMIN_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MYSTERY_ADMIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the operation report as JSON on stdout
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync every channel's permissions with its category
    RevealAll,
    /// Delete messages and start a fresh game session
    Wipe {
        /// Channel to wipe (repeatable); all text channels when omitted
        #[arg(long = "channel")]
        channels: Vec<String>,
    },
    /// Restore the game's channel permissions
    ResetPermissions,
    /// Take character roles back and clear nicknames
    ResetRoles,
    /// Wipe, reset permissions and reset roles
    Reset,
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_report<T: Serialize>(json: bool, report: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref()).inspect_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
    })?;

    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?args.command,
        "Starting mystery-admin"
    );

    let client = DiscordClient::new(&config.discord)
        .inspect_err(|e| error!(error = %e, "Failed to create Discord client"))?;
    let directory: SharedDirectory = Arc::new(client);

    let admin = Admin::new(directory, &config)
        .inspect_err(|e| error!(error = %e, "Failed to compile channel vocabulary"))?;

    match args.command {
        Command::RevealAll => {
            // The CLI exits when main returns, so wait for the batch here
            let report = admin.reveal_all().await?.join().await;
            info!(
                succeeded = report.succeeded,
                failures = report.failed(),
                "All channels revealed"
            );
            print_report(args.json, &report)?;
        }
        Command::Wipe { channels } => {
            let targets = (!channels.is_empty()).then_some(channels.as_slice());
            let report = admin.wipe(targets).await?;
            print_report(args.json, &report)?;
        }
        Command::ResetPermissions => {
            let report = admin.reset_permissions().await?;
            print_report(args.json, &report)?;
        }
        Command::ResetRoles => {
            let report = admin.reset_roles().await?;
            if !args.json {
                for notice in &report.owner_notices {
                    println!("{}", notice.message());
                }
            }
            print_report(args.json, &report)?;
        }
        Command::Reset => {
            let report = admin.reset().await;
            print_report(args.json, &report)?;
            if !report.is_clean() {
                warn!(
                    failed_calls = report.failed_calls(),
                    "Reset finished with failures"
                );
            }
        }
    }

    Ok(())
}
