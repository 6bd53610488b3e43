//! Exposure policy: how much of the account goes long and short.

use crate::error::PolicyError;

/// Long exposure of the reference policy (fraction of account value).
pub const LONG_EXPOSURE: f64 = 0.55;
/// Short exposure of the reference policy (fraction of account value).
pub const SHORT_EXPOSURE: f64 = 0.45;

/// Fractions of account value allocated to the long and short books.
///
/// Both are magnitudes; the short side is negated when weights are assigned.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExposurePolicy {
    pub long_exposure: f64,
    pub short_exposure: f64,
}

impl Default for ExposurePolicy {
    fn default() -> Self {
        Self::reference()
    }
}

impl ExposurePolicy {
    /// 55% long, 45% short: 1.0x gross, 0.10 net long.
    pub const fn reference() -> Self {
        Self {
            long_exposure: LONG_EXPOSURE,
            short_exposure: SHORT_EXPOSURE,
        }
    }

    pub fn gross(&self) -> f64 {
        self.long_exposure + self.short_exposure
    }

    pub fn net(&self) -> f64 {
        self.long_exposure - self.short_exposure
    }

    /// Check each side is in [0, 1] and the gross stays within `max_gross`.
    pub fn validate(&self, max_gross: f64) -> Result<(), PolicyError> {
        for (side, value) in [("long", self.long_exposure), ("short", self.short_exposure)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::OutOfRange { side, value });
            }
        }
        // Small tolerance so 0.55 + 0.45 passes a 1.0 limit.
        let gross = self.gross();
        if gross > max_gross + 1e-12 {
            return Err(PolicyError::GrossExceeded {
                gross,
                limit: max_gross,
            });
        }
        Ok(())
    }
}
