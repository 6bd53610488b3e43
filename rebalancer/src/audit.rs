//! JSONL audit trail logging.
//!
//! Each rebalancer run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use factorbook::{DailyRecord, Instruction};
use serde::Serialize;

use crate::algorithm::SubmitSummary;
use crate::error::{Error, Result};
use crate::snapshot::SnapshotFile;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

/// Convenience: log a run start event.
pub fn log_rebalance_started(
    audit: &mut AuditLog,
    snapshot_file: &str,
    dry_run: bool,
) -> Result<()> {
    audit.log(
        "rebalance_started",
        serde_json::json!({
            "snapshot_file": snapshot_file,
            "dry_run": dry_run,
        }),
    )
}

/// Convenience: log the loaded snapshot header and selection sizes.
pub fn log_snapshot_loaded(
    audit: &mut AuditLog,
    file: &SnapshotFile,
    n_long: usize,
    n_short: usize,
) -> Result<()> {
    audit.log(
        "snapshot_loaded",
        serde_json::json!({
            "date": file.date,
            "factor": file.factor,
            "screen": file.screen,
            "rows": file.rows.len(),
            "longs": n_long,
            "shorts": n_short,
        }),
    )
}

/// Convenience: log the computed instructions.
pub fn log_instructions(audit: &mut AuditLog, instructions: &[Instruction]) -> Result<()> {
    audit.log(
        "instructions_computed",
        serde_json::json!({ "instructions": instructions }),
    )
}

/// Convenience: log one order submission and its outcome.
pub fn log_order_submitted(
    audit: &mut AuditLog,
    instruction: &Instruction,
    rejection: Option<&Error>,
) -> Result<()> {
    audit.log(
        "order_submitted",
        serde_json::json!({
            "symbol": instruction.symbol,
            "kind": instruction.kind,
            "target_weight": instruction.target_weight,
            "accepted": rejection.is_none(),
            "error": rejection.map(|e| e.to_string()),
        }),
    )
}

/// Convenience: log run completion.
pub fn log_rebalance_completed(audit: &mut AuditLog, summary: &SubmitSummary) -> Result<()> {
    audit.log("rebalance_completed", serde_json::to_value(summary)?)
}

/// Convenience: log the end-of-day record.
pub fn log_daily_record(audit: &mut AuditLog, record: &DailyRecord) -> Result<()> {
    audit.log("daily_record", serde_json::to_value(record)?)
}
