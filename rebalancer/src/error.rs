//! Error types for the rebalancer.

use std::path::PathBuf;

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("exposure policy rejected: {0}")]
    Policy(#[from] factorbook::PolicyError),

    #[error("snapshot file error: {0}")]
    Snapshot(String),

    #[error("invalid snapshot: {0}")]
    SnapshotInvalid(#[from] factorbook::SnapshotError),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("account state error: {0}")]
    State(String),

    #[error("no snapshot loaded for today; run before_trading_start first")]
    MissingSnapshot,

    #[error("order rejected for {symbol}: {reason}")]
    Order { symbol: String, reason: String },

    #[error("schedule error: {0}")]
    Schedule(String),

    #[error("execution aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for the CLI.
    ///
    /// `2` for rejected input (bad snapshot, exposure policy violation),
    /// `0` when the operator aborts, `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Snapshot(_) | Error::SnapshotInvalid(_) | Error::Policy(_) => 2,
            Error::Aborted(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
