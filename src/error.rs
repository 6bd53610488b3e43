//! Validation errors for snapshot construction and exposure policies.

use crate::types::Symbol;

/// Errors returned when building a [`DailySnapshot`](crate::DailySnapshot).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    /// The same security appeared twice in one day's snapshot.
    #[error("duplicate symbol {0} in snapshot")]
    DuplicateSymbol(Symbol),
    /// Explicit long/short flags disagree with the sign of the factor value.
    #[error("flags for {symbol} (long={is_long}, short={is_short}) disagree with factor {factor}")]
    ConflictingFlags {
        symbol: Symbol,
        factor: f64,
        is_long: bool,
        is_short: bool,
    },
}

/// Errors returned by [`ExposurePolicy::validate`](crate::ExposurePolicy::validate).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{side} exposure {value} must be finite and in [0.0, 1.0]")]
    OutOfRange { side: &'static str, value: f64 },
    #[error("gross exposure {gross} exceeds limit {limit}")]
    GrossExceeded { gross: f64, limit: f64 },
}
