//! Trading context: today's snapshot plus the rebalance rule.
//!
//! The daily lifecycle is `before_trading_start` (load the snapshot),
//! `rebalance` (some time after the open) and `record_vars` (at the close).
//! The host scheduler runs them in that order, one at a time.

use factorbook::{DailyRecord, DailySnapshot, ExposurePolicy, Instruction, Rebalancer};
use log::{debug, info, warn};
use serde::Serialize;

use crate::broker::{AccountState, OrderGateway};
use crate::config::Config;
use crate::error::{Error, Result};

/// Outcome of submitting one day's instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmitSummary {
    pub submitted: usize,
    pub rejected: usize,
}

/// Per-run trading state, passed explicitly to each scheduled operation.
#[derive(Debug, Clone)]
pub struct Algorithm {
    rebalancer: Rebalancer,
    snapshot: Option<DailySnapshot>,
}

impl Algorithm {
    pub fn new(policy: ExposurePolicy) -> Self {
        Self {
            rebalancer: Rebalancer::new(policy),
            snapshot: None,
        }
    }

    /// Build from a validated config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.policy())
    }

    pub fn rebalancer(&self) -> &Rebalancer {
        &self.rebalancer
    }

    pub fn snapshot(&self) -> Option<&DailySnapshot> {
        self.snapshot.as_ref()
    }

    /// Install today's snapshot, replacing yesterday's.
    pub fn before_trading_start(&mut self, snapshot: DailySnapshot) {
        let sel = snapshot.select();
        info!(
            "Snapshot loaded: {} securities, {} long, {} short",
            snapshot.len(),
            sel.longs.len(),
            sel.shorts.len()
        );
        if sel.longs.is_empty() {
            warn!("No long candidates today; long book will not be rebalanced");
        }
        if sel.shorts.is_empty() {
            warn!("No short candidates today; short book will not be rebalanced");
        }
        self.snapshot = Some(snapshot);
    }

    /// Compute today's instructions without submitting them.
    pub fn plan<B>(&self, broker: &B) -> Result<Vec<Instruction>>
    where
        B: OrderGateway + AccountState,
    {
        let snapshot = self.snapshot.as_ref().ok_or(Error::MissingSnapshot)?;
        let positions = broker.positions()?;
        Ok(self
            .rebalancer
            .rebalance(snapshot, &positions, |s| broker.can_trade(s)))
    }

    /// Submit instructions one by one.
    ///
    /// Rejections are counted and reported to `observe`, never retried.
    /// An error returned by `observe` itself stops the run.
    pub fn submit_all<G, F>(
        &self,
        broker: &mut G,
        instructions: &[Instruction],
        mut observe: F,
    ) -> Result<SubmitSummary>
    where
        G: OrderGateway,
        F: FnMut(&Instruction, Option<&Error>) -> Result<()>,
    {
        let mut summary = SubmitSummary::default();
        for ins in instructions {
            match broker.order_target_percent(ins.symbol, ins.target_weight) {
                Ok(()) => {
                    debug!("order_target_percent({}, {:+.4})", ins.symbol, ins.target_weight);
                    summary.submitted += 1;
                    observe(ins, None)?;
                }
                Err(e) => {
                    warn!("Order for {} rejected: {e}", ins.symbol);
                    summary.rejected += 1;
                    observe(ins, Some(&e))?;
                }
            }
        }
        Ok(summary)
    }

    /// Plan and submit in one step.
    pub fn rebalance<B>(&self, broker: &mut B) -> Result<SubmitSummary>
    where
        B: OrderGateway + AccountState,
    {
        let instructions = self.plan(broker)?;
        self.submit_all(broker, &instructions, |_, _| Ok(()))
    }

    /// End-of-day long/short counts and leverage.
    pub fn record_vars<A: AccountState>(&self, account: &A) -> Result<DailyRecord> {
        let positions = account.positions()?;
        let record = DailyRecord::from_positions(&positions, account.leverage()?);
        info!("Daily record: {record}");
        Ok(record)
    }
}
