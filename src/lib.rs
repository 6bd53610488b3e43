//! # factorbook
//!
//! Factor-driven target weights for a daily long/short rebalance.
//!
//! ## Features
//!
//! - **Selection by sign**: positive factor goes long, negative goes short, zero/NaN is ignored
//! - **Equal weighting**: each side splits its exposure evenly across its names
//! - **Liquidation**: held securities that fell out of both sets are flattened
//! - **Tradability aware**: halted names are skipped and carried over unchanged
//! - **Diagnostics**: end-of-day long/short counts and leverage
//!
//! ## Quick Start
//!
//! ```
//! use factorbook::{DailySnapshot, InstructionKind, Position, Rebalancer, Symbol};
//!
//! let snapshot = DailySnapshot::from_factors([
//!     (Symbol::new("A"), 0.12),
//!     (Symbol::new("B"), 0.40),
//!     (Symbol::new("C"), -0.07),
//! ])
//! .unwrap();
//!
//! // Yesterday we held E, which is no longer selected.
//! let positions = [Position::new(Symbol::new("E"), 100)];
//!
//! let orders = Rebalancer::default().rebalance(&snapshot, &positions, |_| true);
//!
//! assert_eq!(orders.len(), 4);
//! assert_eq!(orders[0].target_weight, 0.275);
//! assert_eq!(orders[2].target_weight, -0.45);
//! assert_eq!(orders[3].kind, InstructionKind::Liquidate);
//! assert_eq!(orders[3].target_weight, 0.0);
//! ```
//!
//! ## Exposure Policy
//!
//! | Side | Reference exposure | Per-name weight |
//! |------|--------------------|-----------------|
//! | **Long** | 0.55 | `0.55 / n_long` |
//! | **Short** | 0.45 | `-0.45 / n_short` |
//!
//! An empty side emits nothing; there is no division by an empty count.
//!
//! ```
//! use factorbook::{DailySnapshot, ExposurePolicy, Rebalancer, Symbol};
//!
//! let policy = ExposurePolicy { long_exposure: 0.5, short_exposure: 0.5 };
//! let snapshot = DailySnapshot::from_factors([(Symbol::new("D"), -1.0)]).unwrap();
//!
//! let orders = Rebalancer::new(policy).rebalance(&snapshot, &[], |_| true);
//! assert_eq!(orders.len(), 1);
//! assert_eq!(orders[0].target_weight, -0.5);
//! ```
//!
//! ## Diagnostics
//!
//! ```
//! use factorbook::{DailyRecord, Position, Symbol};
//!
//! let positions = [
//!     Position::new(Symbol::new("G"), 5),
//!     Position::new(Symbol::new("H"), -3),
//! ];
//! let record = DailyRecord::from_positions(&positions, 1.02);
//! assert_eq!((record.num_long, record.num_short), (1, 1));
//! ```

pub mod diagnostics;
mod error;
pub mod policy;
pub mod rebalance;
pub mod snapshot;
mod types;

// Re-export public API
pub use diagnostics::DailyRecord;
pub use error::{PolicyError, SnapshotError};
pub use policy::{ExposurePolicy, LONG_EXPOSURE, SHORT_EXPOSURE};
pub use rebalance::{Instruction, InstructionKind, Rebalancer, TargetWeights};
pub use snapshot::{DailySnapshot, FactorRow, Selection};
pub use types::{Position, SYMBOL_MAX_LEN, Symbol};
