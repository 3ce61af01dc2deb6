//! ClawGuard CLI: security auditor and hardener for AI agent configs.
//!
//! Commands:
//! - `audit`  : Read-only report of permission, gateway, channel and secret issues
//! - `harden` : Back up the config, then apply confirmed fixes

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod prompt;
mod render;

#[derive(Parser)]
#[command(
    name = "clawguard",
    about = "ClawGuard: security auditor and hardener for AI agent configs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the config and report issues without changing anything
    Audit {
        /// Config file to audit (default: ~/.openclaw/openclaw.json)
        #[arg(long, env = "CLAWGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactively fix the issues an audit finds
    Harden {
        /// Config file to harden (default: ~/.openclaw/openclaw.json)
        #[arg(long, env = "CLAWGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Accept every proposed fix without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Audit { config, json } => commands::audit::run(config, json),
        Commands::Harden {
            config,
            dry_run,
            yes,
        } => commands::harden::run(config, dry_run, yes),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render::error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}
