//! Configuration: the process-level file, per-reporter blocks and unit types.

mod reporter_config;
mod structs;
pub mod units;

pub use reporter_config::ReporterConfig;
pub use structs::{DEFAULT_CONFIG_PATH, ENV_PREFIX, LoggingConfig, MetricsConfig};
pub use units::{Locale, TimeUnit};

/// Reporter configuration keys.
pub mod keys {
    pub const CLASS: &str = "class";
    pub const REPORT_PERIOD: &str = "report.period";
    pub const REPORT_PERIOD_UNITS: &str = "report.period.units";
    pub const REPORT_ON_STOP: &str = "report.on.stop";
    pub const FILTER: &str = "filter";
    pub const FILTER_CLASS: &str = "filter.class";
    pub const LOCALE: &str = "locale";
    pub const RATE_UNIT: &str = "rate.unit";
    pub const DURATION_UNIT: &str = "duration.unit";
    pub const CSV_LOG_DIR: &str = "csv.log.dir";
}
