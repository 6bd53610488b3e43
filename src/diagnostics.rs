//! End-of-day portfolio diagnostics.

use std::fmt;

use crate::types::Position;

/// Counts of long and short positions plus account leverage at the close.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyRecord {
    pub num_long: usize,
    pub num_short: usize,
    /// Reported by the account; passed through unchanged.
    pub leverage: f64,
}

impl DailyRecord {
    /// Count positive and negative amounts. Flat positions count as neither.
    pub fn from_positions(positions: &[Position], leverage: f64) -> Self {
        Self {
            num_long: positions.iter().filter(|p| p.is_long()).count(),
            num_short: positions.iter().filter(|p| p.is_short()).count(),
            leverage,
        }
    }

    pub fn num_positions(&self) -> usize {
        self.num_long + self.num_short
    }
}

impl fmt::Display for DailyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num_long={} num_short={} leverage={:.2}x",
            self.num_long, self.num_short, self.leverage
        )
    }
}
