//! Broker abstraction used by the daily rebalance.
//!
//! The platform owns execution and account state; the rebalancer only reads
//! positions and leverage and asks for target-percent orders. `PaperBroker`
//! is an in-memory implementation backed by an account state file, used by
//! the CLI and by tests.

use std::path::Path;

use factorbook::{Position, Symbol};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Read-only view of the account.
pub trait AccountState {
    /// Current positions as signed share amounts.
    fn positions(&self) -> Result<Vec<Position>>;

    /// Gross leverage as reported by the account.
    fn leverage(&self) -> Result<f64>;
}

/// Order execution service.
pub trait OrderGateway {
    /// Whether an order can be placed for `symbol` right now.
    fn can_trade(&self, symbol: &Symbol) -> bool;

    /// Move the position in `symbol` toward `weight` of account value.
    ///
    /// Convergence is the gateway's job; the caller does not retry.
    fn order_target_percent(&mut self, symbol: Symbol, weight: f64) -> Result<()>;
}

/// An accepted target-percent order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetOrder {
    pub symbol: Symbol,
    pub target_weight: f64,
}

/// Account state file (state.json).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub leverage: f64,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Symbols that cannot be traded today (halts, missing data).
    #[serde(default)]
    pub halted: Vec<Symbol>,
}

impl StateFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: StateFile = serde_json::from_str(json)?;
        if !state.leverage.is_finite() || state.leverage < 0.0 {
            return Err(Error::State(format!(
                "leverage {} must be finite and >= 0",
                state.leverage
            )));
        }
        let mut seen = FxHashSet::default();
        for p in &state.positions {
            if !seen.insert(p.symbol) {
                return Err(Error::State(format!("duplicate position: {}", p.symbol)));
            }
        }
        Ok(state)
    }
}

/// In-memory broker: records orders instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct PaperBroker {
    positions: Vec<Position>,
    leverage: f64,
    halted: FxHashSet<Symbol>,
    orders: Vec<TargetOrder>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StateFile) -> Self {
        Self {
            positions: state.positions,
            leverage: state.leverage,
            halted: state.halted.into_iter().collect(),
            orders: Vec::new(),
        }
    }

    pub fn with_position(mut self, symbol: Symbol, amount: i64) -> Self {
        self.positions.push(Position::new(symbol, amount));
        self
    }

    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = leverage;
        self
    }

    pub fn with_halted(mut self, symbol: Symbol) -> Self {
        self.halted.insert(symbol);
        self
    }

    /// Orders accepted so far, in submission order.
    pub fn orders(&self) -> &[TargetOrder] {
        &self.orders
    }
}

impl AccountState for PaperBroker {
    fn positions(&self) -> Result<Vec<Position>> {
        Ok(self.positions.clone())
    }

    fn leverage(&self) -> Result<f64> {
        Ok(self.leverage)
    }
}

impl OrderGateway for PaperBroker {
    fn can_trade(&self, symbol: &Symbol) -> bool {
        !self.halted.contains(symbol)
    }

    fn order_target_percent(&mut self, symbol: Symbol, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight.abs() > 1.0 {
            return Err(Error::Order {
                symbol: symbol.to_string(),
                reason: format!("target weight {weight} outside [-1, 1]"),
            });
        }
        // Halted names are a silent no-op, as on the live platform.
        if !self.can_trade(&symbol) {
            return Ok(());
        }
        self.orders.push(TargetOrder {
            symbol,
            target_weight: weight,
        });
        Ok(())
    }
}
