//! Daily factor snapshot file (snapshot.json) loading and validation.

use std::path::Path;

use chrono::NaiveDate;
use factorbook::{DailySnapshot, FactorRow, Symbol};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One day's pipeline output as delivered by the factor provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFile {
    pub date: NaiveDate,
    /// Name of the factor column, e.g. `net_income_growth`.
    #[serde(default = "default_factor_name")]
    pub factor: String,
    /// Universe screen the provider applied. Recorded, never re-applied.
    #[serde(default)]
    pub screen: Option<Screen>,
    pub rows: Vec<SnapshotRow>,
}

fn default_factor_name() -> String {
    "factor".into()
}

/// Liquidity screen parameters reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    /// Average dollar volume lookback, in trading days.
    pub dollar_volume_window: u32,
    /// Lower percentile bound of the dollar volume filter.
    pub min_percentile: f64,
}

/// A single security's factor value and optional provider flags.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRow {
    pub symbol: String,
    /// `null` means the fundamental was unavailable; such rows select neither side.
    pub factor: Option<f64>,
    #[serde(default)]
    pub is_long: Option<bool>,
    #[serde(default)]
    pub is_short: Option<bool>,
}

impl SnapshotFile {
    /// Load and validate a snapshot.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        for row in &self.rows {
            if Symbol::try_new(&row.symbol).is_none() {
                return Err(Error::Snapshot(format!(
                    "symbol '{}' must be 1..={} bytes",
                    row.symbol,
                    factorbook::SYMBOL_MAX_LEN
                )));
            }
            if row.is_long.is_some() != row.is_short.is_some() {
                return Err(Error::Snapshot(format!(
                    "{}: is_long and is_short must be given together",
                    row.symbol
                )));
            }
        }
        if let Some(screen) = &self.screen {
            if !(0.0..=100.0).contains(&screen.min_percentile) {
                return Err(Error::Snapshot(format!(
                    "screen min_percentile {} must be in [0, 100]",
                    screen.min_percentile
                )));
            }
        }
        Ok(())
    }

    /// Build the in-memory snapshot, checking duplicates and flag consistency.
    pub fn to_snapshot(&self) -> Result<DailySnapshot> {
        let mut snapshot = DailySnapshot::new();
        for row in &self.rows {
            let symbol = Symbol::try_new(&row.symbol)
                .ok_or_else(|| Error::Snapshot(format!("invalid symbol '{}'", row.symbol)))?;
            let factor = row.factor.unwrap_or(f64::NAN);
            match (row.is_long, row.is_short) {
                (Some(is_long), Some(is_short)) => snapshot.insert_row(
                    symbol,
                    FactorRow {
                        factor,
                        is_long,
                        is_short,
                    },
                )?,
                _ => snapshot.insert(symbol, factor)?,
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "date": "2026-02-09",
            "factor": "net_income_growth",
            "screen": { "dollar_volume_window": 28, "min_percentile": 80.0 },
            "rows": [
                { "symbol": "AAPL", "factor": 0.12 },
                { "symbol": "MSFT", "factor": 0.31, "is_long": true, "is_short": false },
                { "symbol": "XOM",  "factor": -0.08 },
                { "symbol": "KO",   "factor": 0.0 },
                { "symbol": "GE",   "factor": null }
            ]
        }"#
    }

    #[test]
    fn parse_valid_snapshot() {
        let file = SnapshotFile::from_json(valid_json()).unwrap();
        assert_eq!(file.rows.len(), 5);
        assert_eq!(file.factor, "net_income_growth");
        assert_eq!(file.screen.as_ref().unwrap().dollar_volume_window, 28);
        assert_eq!(file.date, NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
    }

    #[test]
    fn to_snapshot_selects_by_sign() {
        let snap = SnapshotFile::from_json(valid_json())
            .unwrap()
            .to_snapshot()
            .unwrap();
        let sel = snap.select();
        assert_eq!(sel.longs, vec![Symbol::new("AAPL"), Symbol::new("MSFT")]);
        assert_eq!(sel.shorts, vec![Symbol::new("XOM")]);
        assert_eq!(snap.len(), 5);
    }

    #[test]
    fn missing_factor_selects_neither() {
        let snap = SnapshotFile::from_json(valid_json())
            .unwrap()
            .to_snapshot()
            .unwrap();
        let ge = snap.get(&Symbol::new("GE")).unwrap();
        assert!(!ge.is_long && !ge.is_short);
    }

    #[test]
    fn empty_universe_is_valid() {
        let json = r#"{"date":"2026-02-09","rows":[]}"#;
        let snap = SnapshotFile::from_json(json).unwrap().to_snapshot().unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn reject_long_symbol() {
        let json = r#"{"date":"2026-02-09","rows":[{"symbol":"TOOLONGNAME","factor":1.0}]}"#;
        assert!(matches!(
            SnapshotFile::from_json(json),
            Err(Error::Snapshot(_))
        ));
    }

    #[test]
    fn reject_half_flags() {
        let json = r#"{"date":"2026-02-09","rows":[{"symbol":"AAPL","factor":1.0,"is_long":true}]}"#;
        assert!(SnapshotFile::from_json(json).is_err());
    }

    #[test]
    fn reject_conflicting_flags() {
        let json = r#"{
            "date": "2026-02-09",
            "rows": [{ "symbol": "AAPL", "factor": 1.0, "is_long": true, "is_short": true }]
        }"#;
        let file = SnapshotFile::from_json(json).unwrap();
        assert!(matches!(
            file.to_snapshot(),
            Err(Error::SnapshotInvalid(_))
        ));
    }

    #[test]
    fn reject_duplicate_symbols() {
        let json = r#"{
            "date": "2026-02-09",
            "rows": [
                { "symbol": "AAPL", "factor": 0.5 },
                { "symbol": "AAPL", "factor": -0.3 }
            ]
        }"#;
        let file = SnapshotFile::from_json(json).unwrap();
        assert!(file.to_snapshot().is_err());
    }

    #[test]
    fn reject_bad_percentile() {
        let json = r#"{
            "date": "2026-02-09",
            "screen": { "dollar_volume_window": 28, "min_percentile": 180.0 },
            "rows": []
        }"#;
        assert!(SnapshotFile::from_json(json).is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = SnapshotFile::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
