//! splitcheck - A/B experiment simulation and significance testing
//!
//! This library simulates two-group conversion experiments, runs a pooled
//! two-proportion z-test on the observed counts, computes per-group confidence
//! intervals, and derives a rollout recommendation.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod replication;
pub mod report;
pub mod simulation;

pub use error::{ExperimentError, Result};
