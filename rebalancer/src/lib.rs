//! factorbook-rebalancer: daily factor rebalance runner.
//!
//! Loads the day's factor snapshot, computes target weights with
//! `factorbook`, submits target-percent orders through a broker gateway,
//! records end-of-day diagnostics, and keeps a JSONL audit trail.

pub mod algorithm;
pub mod audit;
pub mod broker;
pub mod config;
pub mod error;
pub mod execution;
pub mod schedule;
pub mod snapshot;
