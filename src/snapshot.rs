//! Daily factor snapshot: one row per security in the tradable universe.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::SnapshotError;
use crate::types::Symbol;

/// Factor value and derived selection flags for one security.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorRow {
    pub factor: f64,
    pub is_long: bool,
    pub is_short: bool,
}

impl FactorRow {
    /// Derive the flags from the factor sign.
    ///
    /// Zero and NaN select neither side.
    pub fn from_factor(factor: f64) -> Self {
        Self {
            factor,
            is_long: factor > 0.0,
            is_short: factor < 0.0,
        }
    }

    /// True if the flags match what [`FactorRow::from_factor`] would produce.
    pub fn is_consistent(&self) -> bool {
        self.is_long == (self.factor > 0.0) && self.is_short == (self.factor < 0.0)
    }
}

/// One trading day's factor data, already screened by the universe provider.
///
/// Rows keep insertion order so anything derived from the snapshot
/// (instructions, reports) comes out in a stable order. A new snapshot is
/// built each day; there is no merging with the previous one.
#[derive(Clone, Debug, Default)]
pub struct DailySnapshot {
    rows: Vec<(Symbol, FactorRow)>,
    index: FxHashMap<Symbol, usize>,
}

/// The long and short selections of a snapshot, in snapshot order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub longs: Vec<Symbol>,
    pub shorts: Vec<Symbol>,
}

impl Selection {
    /// True if `symbol` is selected on either side.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.longs.contains(symbol) || self.shorts.contains(symbol)
    }

    /// Set of every selected symbol, for membership tests on large universes.
    pub fn selected(&self) -> FxHashSet<Symbol> {
        self.longs.iter().chain(&self.shorts).copied().collect()
    }
}

impl DailySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(symbol, factor)` pairs, deriving the flags.
    pub fn from_factors<I>(factors: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = (Symbol, f64)>,
    {
        let mut snapshot = Self::new();
        for (symbol, factor) in factors {
            snapshot.insert(symbol, factor)?;
        }
        Ok(snapshot)
    }

    /// Add a security with flags derived from `factor`.
    pub fn insert(&mut self, symbol: Symbol, factor: f64) -> Result<(), SnapshotError> {
        self.push(symbol, FactorRow::from_factor(factor))
    }

    /// Add a security with flags supplied by the provider.
    ///
    /// Rejects rows whose flags contradict the factor sign, which also
    /// rules out a row flagged both long and short.
    pub fn insert_row(&mut self, symbol: Symbol, row: FactorRow) -> Result<(), SnapshotError> {
        if !row.is_consistent() {
            return Err(SnapshotError::ConflictingFlags {
                symbol,
                factor: row.factor,
                is_long: row.is_long,
                is_short: row.is_short,
            });
        }
        self.push(symbol, row)
    }

    fn push(&mut self, symbol: Symbol, row: FactorRow) -> Result<(), SnapshotError> {
        if self.index.contains_key(&symbol) {
            return Err(SnapshotError::DuplicateSymbol(symbol));
        }
        self.index.insert(symbol, self.rows.len());
        self.rows.push((symbol, row));
        Ok(())
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&FactorRow> {
        self.index.get(symbol).map(|&i| &self.rows[i].1)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &FactorRow)> {
        self.rows.iter().map(|(s, r)| (*s, r))
    }

    /// Securities with a positive factor.
    pub fn longs(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rows.iter().filter(|(_, r)| r.is_long).map(|(s, _)| *s)
    }

    /// Securities with a negative factor.
    pub fn shorts(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rows.iter().filter(|(_, r)| r.is_short).map(|(s, _)| *s)
    }

    /// Split the snapshot into its long and short sets.
    pub fn select(&self) -> Selection {
        Selection {
            longs: self.longs().collect(),
            shorts: self.shorts().collect(),
        }
    }
}
