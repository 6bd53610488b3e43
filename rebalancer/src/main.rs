//! CLI entry point for the factorbook rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use factorbook_rebalancer::config::Config;
use factorbook_rebalancer::error::Error;
use factorbook_rebalancer::execution::{self, RunOptions};

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Daily factor rebalance: snapshot in, target-percent orders out")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults apply if the file is absent)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute today's instructions and submit them
    Rebalance {
        /// Path to snapshot.json
        snapshot: PathBuf,

        /// Path to the account state file
        #[arg(long)]
        state: PathBuf,

        /// Show plan without submitting
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt (for cron)
        #[arg(long)]
        force: bool,

        /// Write accepted orders to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Record end-of-day long/short counts and leverage
    Record {
        /// Path to the account state file
        #[arg(long)]
        state: PathBuf,
    },

    /// Show target weights for a snapshot, ignoring tradability
    Weights {
        /// Path to snapshot.json
        snapshot: PathBuf,
    },

    /// Show today's trigger times
    Schedule {
        /// Session open (HH:MM), overrides config
        #[arg(long)]
        open: Option<String>,

        /// Session close (HH:MM), overrides config
        #[arg(long)]
        close: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => exit_with(&e, "Error loading config"),
        }
    } else {
        log::info!("{} not found, using defaults", cli.config.display());
        Config::default()
    };

    let result = match cli.command {
        Command::Rebalance {
            snapshot,
            state,
            dry_run,
            force,
            out,
        } => {
            let opts = RunOptions {
                dry_run,
                force,
                snapshot_file: snapshot.display().to_string(),
                out,
            };
            execution::run(&config, &snapshot, &state, &opts)
        }
        Command::Record { state } => execution::run_record(&config, &state).map(|_| ()),
        Command::Weights { snapshot } => execution::show_weights(&config, &snapshot),
        Command::Schedule { open, close } => {
            execution::show_schedule(&config, open.as_deref(), close.as_deref())
        }
    };

    if let Err(e) = result {
        exit_with(&e, "Error");
    }
}

fn exit_with(e: &Error, context: &str) -> ! {
    let code = e.exit_code();
    match code {
        0 => eprintln!("{e}"),
        2 => eprintln!("\nRejected: {e}"),
        _ => eprintln!("{context}: {e}"),
    }
    process::exit(code)
}
