//! Factor-sign target weight assignment.
//!
//! Each day the long set (positive factor) shares the long exposure equally,
//! the short set (negative factor) shares the short exposure equally, and any
//! held security that dropped out of both sets is flattened. Securities that
//! cannot be traded right now are left alone until the next cycle.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::policy::ExposurePolicy;
use crate::snapshot::{DailySnapshot, Selection};
use crate::types::{Position, Symbol};

/// Why an instruction was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstructionKind {
    Long,
    Short,
    /// Held position no longer selected by the factor.
    Liquidate,
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionKind::Long => write!(f, "LONG"),
            InstructionKind::Short => write!(f, "SHORT"),
            InstructionKind::Liquidate => write!(f, "LIQUIDATE"),
        }
    }
}

/// A "set target weight" request for the order execution service.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub symbol: Symbol,
    /// Target fraction of account value, signed (negative = short).
    pub target_weight: f64,
    pub kind: InstructionKind,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:9} {:8} {:+.4}",
            self.kind.to_string(),
            self.symbol,
            self.target_weight
        )
    }
}

/// Target weights for every selected security, before tradability filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetWeights {
    weights: Vec<(Symbol, f64)>,
}

impl TargetWeights {
    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.weights
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|&(_, w)| w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
        self.weights.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of positive weights.
    pub fn long_total(&self) -> f64 {
        self.weights.iter().map(|&(_, w)| w).filter(|w| *w > 0.0).sum()
    }

    /// Sum of negative weights (a non-positive number).
    pub fn short_total(&self) -> f64 {
        self.weights.iter().map(|&(_, w)| w).filter(|w| *w < 0.0).sum()
    }

    /// Sum of absolute weights.
    pub fn gross(&self) -> f64 {
        self.weights.iter().map(|&(_, w)| w.abs()).sum()
    }
}

/// Stateless daily rebalancer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rebalancer {
    policy: ExposurePolicy,
}

/// Equal split of `exposure` over `count` names, or `None` for an empty side.
fn per_name(exposure: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(exposure / count as f64)
    }
}

impl Rebalancer {
    /// Create a rebalancer for the given exposure policy.
    ///
    /// # Panics
    ///
    /// Panics if either exposure is outside [0, 1] or not finite. Gross
    /// limits are a configuration concern and are checked by the caller.
    #[track_caller]
    pub fn new(policy: ExposurePolicy) -> Self {
        if let Err(e) = policy.validate(f64::INFINITY) {
            panic!("invalid ExposurePolicy: {e}");
        }
        Self { policy }
    }

    pub fn policy(&self) -> &ExposurePolicy {
        &self.policy
    }

    /// Per-name weights for each side: `(long, short)`.
    ///
    /// The short weight is negative. A side with no names yields `None`.
    pub fn side_weights(&self, selection: &Selection) -> (Option<f64>, Option<f64>) {
        (
            per_name(self.policy.long_exposure, selection.longs.len()),
            per_name(self.policy.short_exposure, selection.shorts.len()).map(|w| -w),
        )
    }

    /// Target weights for every selected security, ignoring tradability.
    pub fn target_weights(&self, snapshot: &DailySnapshot) -> TargetWeights {
        let selection = snapshot.select();
        let (long_w, short_w) = self.side_weights(&selection);

        let mut weights = Vec::with_capacity(selection.longs.len() + selection.shorts.len());
        if let Some(w) = long_w {
            weights.extend(selection.longs.iter().map(|&s| (s, w)));
        }
        if let Some(w) = short_w {
            weights.extend(selection.shorts.iter().map(|&s| (s, w)));
        }
        TargetWeights { weights }
    }

    /// Compute today's instructions.
    ///
    /// Emits, in order: longs and shorts in snapshot order, then
    /// liquidations in position order. Any security for which `tradable`
    /// returns false gets no instruction at all.
    pub fn rebalance<F>(
        &self,
        snapshot: &DailySnapshot,
        positions: &[Position],
        tradable: F,
    ) -> Vec<Instruction>
    where
        F: Fn(&Symbol) -> bool,
    {
        let selection = snapshot.select();
        let (long_w, short_w) = self.side_weights(&selection);
        let mut out = Vec::new();

        if let Some(w) = long_w {
            for symbol in selection.longs.iter().filter(|s| tradable(*s)) {
                out.push(Instruction {
                    symbol: *symbol,
                    target_weight: w,
                    kind: InstructionKind::Long,
                });
            }
        }

        if let Some(w) = short_w {
            for symbol in selection.shorts.iter().filter(|s| tradable(*s)) {
                out.push(Instruction {
                    symbol: *symbol,
                    target_weight: w,
                    kind: InstructionKind::Short,
                });
            }
        }

        let selected = selection.selected();
        let mut flattened: FxHashSet<Symbol> = FxHashSet::default();
        for pos in positions {
            if pos.is_flat() || selected.contains(&pos.symbol) {
                continue;
            }
            if !tradable(&pos.symbol) || !flattened.insert(pos.symbol) {
                continue;
            }
            out.push(Instruction {
                symbol: pos.symbol,
                target_weight: 0.0,
                kind: InstructionKind::Liquidate,
            });
        }

        out
    }
}
