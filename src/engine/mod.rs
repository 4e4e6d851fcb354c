//! Inner export engines
//!
//! An engine owns the export machinery of one reporter: the registry handle,
//! the optional filter, the sink and, once started, the scheduling thread.
//! Reporters drive it through [`ExportEngine`]; nothing else holds it.

mod format;
mod scheduled;

use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::registry::MetricSample;
use crate::reporters::SchedulingParameters;

pub use format::ValueFormat;
pub use scheduled::ScheduledExporter;

pub trait ExportEngine: Send {
    /// Begins periodic export. Fails on a non-positive period or when
    /// already running.
    fn start(&mut self, params: SchedulingParameters) -> Result<()>;

    /// One synchronous export pass.
    fn report(&mut self) -> Result<()>;

    /// Halts periodic export, blocking until the scheduling thread exits.
    fn stop(&mut self);

    /// Releases the sink. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Format-specific output of an export pass.
pub trait MetricSink: Send {
    fn write(
        &mut self,
        timestamp: DateTime<Utc>,
        samples: &[MetricSample],
        format: &ValueFormat,
    ) -> Result<()>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
