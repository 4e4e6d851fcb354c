//! Concrete reporters and the scheduled-reporter base they share.

mod console;
mod csv;
mod manager;
pub mod params;
mod scheduled;

use std::sync::Arc;

use crate::lifecycle::Reporter;
use crate::plugins::ReporterConstructor;

pub use self::console::{ConsoleBackend, ConsoleReporter, ConsoleSink};
pub use self::csv::{CsvBackend, CsvReporter, CsvSink, DEFAULT_CSV_LOG_DIR};
pub use manager::{ReporterFailure, ReporterManager};
pub use params::SchedulingParameters;
pub use scheduled::{ReporterBackend, ScheduledReporter};

pub(crate) fn builtin_reporter_plugins() -> Vec<(&'static str, ReporterConstructor)> {
    let csv: ReporterConstructor =
        Arc::new(|| Ok(Box::new(CsvReporter::default()) as Box<dyn Reporter>));
    let console: ReporterConstructor =
        Arc::new(|| Ok(Box::new(ConsoleReporter::default()) as Box<dyn Reporter>));
    vec![("csv", csv), ("console", console)]
}
