//! TOML configuration loading and validation.

use std::path::Path;

use chrono::NaiveTime;
use factorbook::ExposurePolicy;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::schedule::{Schedule, TimeRule};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_long_exposure")]
    pub long_exposure: f64,
    #[serde(default = "default_short_exposure")]
    pub short_exposure: f64,
    #[serde(default = "default_max_gross")]
    pub max_gross_exposure: f64,
}

fn default_long_exposure() -> f64 {
    factorbook::LONG_EXPOSURE
}
fn default_short_exposure() -> f64 {
    factorbook::SHORT_EXPOSURE
}
fn default_max_gross() -> f64 {
    1.0
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            long_exposure: default_long_exposure(),
            short_exposure: default_short_exposure(),
            max_gross_exposure: default_max_gross(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Session open, `HH:MM` exchange local time.
    #[serde(default = "default_open")]
    pub market_open: String,
    /// Session close, `HH:MM` exchange local time.
    #[serde(default = "default_close")]
    pub market_close: String,
    #[serde(default = "default_rebalance_offset")]
    pub rebalance_after_open_mins: i64,
    #[serde(default)]
    pub record_before_close_mins: i64,
}

fn default_open() -> String {
    "09:30".into()
}
fn default_close() -> String {
    "16:00".into()
}
fn default_rebalance_offset() -> i64 {
    60
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            market_open: default_open(),
            market_close: default_close(),
            rebalance_after_open_mins: default_rebalance_offset(),
            record_before_close_mins: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

/// Parse a `HH:MM` session time.
pub fn parse_session_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| Error::Config(format!("invalid session time {s:?}: {e}")))
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if !(self.strategy.max_gross_exposure > 0.0) {
            return Err(Error::Config("max_gross_exposure must be > 0".into()));
        }
        self.policy().validate(self.strategy.max_gross_exposure)?;

        let open = parse_session_time(&self.schedule.market_open)?;
        let close = parse_session_time(&self.schedule.market_close)?;
        if open >= close {
            return Err(Error::Config("market_open must be before market_close".into()));
        }
        if self.schedule.rebalance_after_open_mins < 0 {
            return Err(Error::Config("rebalance_after_open_mins must be >= 0".into()));
        }
        if self.schedule.record_before_close_mins < 0 {
            return Err(Error::Config("record_before_close_mins must be >= 0".into()));
        }
        self.schedule().trigger_times(open, close)?;
        Ok(())
    }

    /// Exposure policy from the `[strategy]` section.
    pub fn policy(&self) -> ExposurePolicy {
        ExposurePolicy {
            long_exposure: self.strategy.long_exposure,
            short_exposure: self.strategy.short_exposure,
        }
    }

    /// Daily schedule from the `[schedule]` section.
    pub fn schedule(&self) -> Schedule {
        Schedule {
            rebalance: TimeRule::MarketOpen {
                minutes: self.schedule.rebalance_after_open_mins,
            },
            record: TimeRule::MarketClose {
                minutes: self.schedule.record_before_close_mins,
            },
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> std::path::PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
