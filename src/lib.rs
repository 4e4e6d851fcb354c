//! metricsreporter - configuration-driven metrics reporters
//!
//! Selects metrics-exporting backends by name from configuration, runs them
//! behind a checked `prepare → start → stop → close` lifecycle and optionally
//! attaches a metric filter in front of every export pass.
//!
//! # Architecture
//! - `config`: reporter configuration access, units, process configuration
//! - `lifecycle`: reporter state machine and the `Reporter` contract
//! - `plugins`: name → constructor registries for filters and reporters
//! - `filters`: metric filters and filter resolution
//! - `reporters`: scheduled reporter base, CSV and console reporters, manager
//! - `engine`: inner export engines and sinks
//! - `registry`: the metric registry seam
//! - `system`: logging initialization

pub mod config;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod lifecycle;
pub mod plugins;
pub mod registry;
pub mod reporters;
pub mod system;

pub use errors::{ReporterError, Result};
pub use lifecycle::{Reporter, ReporterState};
