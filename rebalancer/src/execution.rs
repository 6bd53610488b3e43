//! Execution orchestrator: snapshot → plan → confirm → submit.
//!
//! The end-of-day record is a separate command ([`run_record`]).

use std::path::{Path, PathBuf};

use factorbook::{DailyRecord, Instruction, InstructionKind};
use log::info;

use crate::algorithm::{Algorithm, SubmitSummary};
use crate::audit::{self, AuditLog};
use crate::broker::{AccountState, OrderGateway, PaperBroker, StateFile};
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::schedule::Operation;
use crate::snapshot::SnapshotFile;

/// Options for a rebalance run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub force: bool,
    pub snapshot_file: String,
    /// Where to write accepted orders as JSON.
    pub out: Option<PathBuf>,
}

/// Load the snapshot file into a fresh trading context.
pub fn load_algorithm(
    config: &Config,
    snapshot_path: &Path,
    audit: &mut AuditLog,
) -> Result<Algorithm> {
    let file = SnapshotFile::load(snapshot_path)?;
    let snapshot = file.to_snapshot()?;
    let sel = snapshot.select();
    audit::log_snapshot_loaded(audit, &file, sel.longs.len(), sel.shorts.len())?;

    let mut algo = Algorithm::from_config(config);
    algo.before_trading_start(snapshot);
    Ok(algo)
}

/// Execute a full rebalance run against the paper broker built from `state_path`.
pub fn run(
    config: &Config,
    snapshot_path: &Path,
    state_path: &Path,
    opts: &RunOptions,
) -> Result<()> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_rebalance_started(&mut audit, &opts.snapshot_file, opts.dry_run)?;

    let algo = load_algorithm(config, snapshot_path, &mut audit)?;
    let mut broker = PaperBroker::from_state(StateFile::load(state_path)?);

    let summary = rebalance_with(&algo, &mut broker, &mut audit, opts)?;

    if let (Some(_), Some(out)) = (summary, &opts.out) {
        let json = serde_json::to_string_pretty(broker.orders())?;
        std::fs::write(out, json).map_err(|e| Error::FileWrite {
            path: out.clone(),
            source: e,
        })?;
        println!("Orders written to {}", out.display());
    }
    Ok(())
}

/// Plan, confirm and submit today's instructions through any broker.
///
/// Returns `None` when nothing was submitted (no orders, dry run, or the
/// operator declined).
pub fn rebalance_with<B>(
    algo: &Algorithm,
    broker: &mut B,
    audit: &mut AuditLog,
    opts: &RunOptions,
) -> Result<Option<SubmitSummary>>
where
    B: OrderGateway + AccountState,
{
    let instructions = algo.plan(broker)?;

    if instructions.is_empty() {
        println!("\nNo orders today: nothing selected and nothing to liquidate.");
        audit.log_simple("no_orders")?;
        return Ok(None);
    }

    audit::log_instructions(audit, &instructions)?;
    display_plan(&instructions);

    if opts.dry_run {
        println!("\n[DRY RUN] No orders submitted.");
        return Ok(None);
    }

    if !opts.force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Submit orders?")
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;

        audit.log("user_confirmed", serde_json::json!({ "approved": confirmed }))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(None);
        }
    }

    let summary = algo.submit_all(broker, &instructions, |ins, err| {
        audit::log_order_submitted(audit, ins, err)
    })?;

    audit::log_rebalance_completed(audit, &summary)?;
    println!(
        "\n{} submitted, {} rejected.",
        summary.submitted, summary.rejected
    );
    Ok(Some(summary))
}

/// End-of-day diagnostics from the account state file.
pub fn run_record(config: &Config, state_path: &Path) -> Result<DailyRecord> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    let broker = PaperBroker::from_state(StateFile::load(state_path)?);
    let record = Algorithm::from_config(config).record_vars(&broker)?;
    audit::log_daily_record(&mut audit, &record)?;
    println!("{record}");
    Ok(record)
}

/// Print the full target weights for a snapshot, before tradability.
pub fn show_weights(config: &Config, snapshot_path: &Path) -> Result<()> {
    let snapshot = SnapshotFile::load(snapshot_path)?.to_snapshot()?;
    let weights = Algorithm::from_config(config)
        .rebalancer()
        .target_weights(&snapshot);

    println!("TARGET WEIGHTS ({} names):", weights.len());
    for (symbol, w) in weights.iter() {
        println!("  {symbol:8} {:>+8.4}%", w * 100.0);
    }
    println!(
        "\n  long {:.2}%  short {:.2}%  gross {:.2}%",
        weights.long_total() * 100.0,
        weights.short_total() * 100.0,
        weights.gross() * 100.0
    );
    Ok(())
}

/// Print today's trigger times.
pub fn show_schedule(config: &Config, open: Option<&str>, close: Option<&str>) -> Result<()> {
    let open = open.unwrap_or(config.schedule.market_open.as_str());
    let close = close.unwrap_or(config.schedule.market_close.as_str());
    let (open, close) = (
        config::parse_session_time(open)?,
        config::parse_session_time(close)?,
    );
    let schedule = config.schedule();

    info!("Session {open} - {close}");
    for (time, op) in schedule.trigger_times(open, close)? {
        let rule = match op {
            Operation::Rebalance => schedule.rebalance,
            Operation::Record => schedule.record,
        };
        println!("  {} {:10} ({rule})", time.format("%H:%M"), op.to_string());
    }
    Ok(())
}

// === Helpers ===

fn display_plan(instructions: &[Instruction]) {
    println!("\nREBALANCE ORDERS:");
    println!("  {:>3}  {:9} {:8} {:>9}", "#", "Kind", "Symbol", "Target");

    for (i, ins) in instructions.iter().enumerate() {
        println!(
            "  {:>3}  {:9} {:8} {:>+8.4}%",
            i + 1,
            ins.kind.to_string(),
            ins.symbol,
            ins.target_weight * 100.0,
        );
    }

    let count = |k: InstructionKind| instructions.iter().filter(|i| i.kind == k).count();
    println!(
        "\n{} long, {} short, {} liquidations",
        count(InstructionKind::Long),
        count(InstructionKind::Short),
        count(InstructionKind::Liquidate),
    );
}
