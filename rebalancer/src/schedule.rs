//! Daily trigger rules, resolved against a trading session.
//!
//! The scheduler itself lives outside this crate (cron, a platform timer);
//! these rules tell it when to call `rebalance` and `record` on a given day.

use std::fmt;

use chrono::{Duration, NaiveTime};

use crate::error::{Error, Result};

/// A time of day expressed relative to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRule {
    /// `minutes` after the open.
    MarketOpen { minutes: i64 },
    /// `minutes` before the close.
    MarketClose { minutes: i64 },
}

impl TimeRule {
    /// Resolve to a wall-clock time within `[open, close]`.
    pub fn resolve(&self, open: NaiveTime, close: NaiveTime) -> Result<NaiveTime> {
        let session = close.signed_duration_since(open).num_minutes();
        let minutes = match *self {
            TimeRule::MarketOpen { minutes } | TimeRule::MarketClose { minutes } => minutes,
        };
        if minutes < 0 || minutes > session {
            return Err(Error::Schedule(format!(
                "{self} falls outside the {session}-minute session"
            )));
        }
        Ok(match *self {
            TimeRule::MarketOpen { minutes } => open + Duration::minutes(minutes),
            TimeRule::MarketClose { minutes } => close - Duration::minutes(minutes),
        })
    }
}

impl fmt::Display for TimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeRule::MarketOpen { minutes } => {
                write!(f, "market open + {}h{:02}m", minutes / 60, minutes % 60)
            }
            TimeRule::MarketClose { minutes: 0 } => write!(f, "market close"),
            TimeRule::MarketClose { minutes } => {
                write!(f, "market close - {}h{:02}m", minutes / 60, minutes % 60)
            }
        }
    }
}

/// Which daily operation a trigger runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Rebalance,
    Record,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Rebalance => write!(f, "rebalance"),
            Operation::Record => write!(f, "record"),
        }
    }
}

/// The two daily triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub rebalance: TimeRule,
    pub record: TimeRule,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::reference()
    }
}

impl Schedule {
    /// Rebalance one hour after the open, record at the close.
    pub fn reference() -> Self {
        Self {
            rebalance: TimeRule::MarketOpen { minutes: 60 },
            record: TimeRule::MarketClose { minutes: 0 },
        }
    }

    /// Wall-clock triggers for one session, in firing order.
    ///
    /// Fails if a rule falls outside the session or the record trigger
    /// would fire before the rebalance.
    pub fn trigger_times(
        &self,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Result<Vec<(NaiveTime, Operation)>> {
        let rebalance = self.rebalance.resolve(open, close)?;
        let record = self.record.resolve(open, close)?;
        if record < rebalance {
            return Err(Error::Schedule(format!(
                "record ({record}) would fire before rebalance ({rebalance})"
            )));
        }
        Ok(vec![
            (rebalance, Operation::Rebalance),
            (record, Operation::Record),
        ])
    }
}
