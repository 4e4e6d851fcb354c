//! Scheduling parameters shared by every scheduled reporter.

use tracing::warn;

use crate::config::{ReporterConfig, TimeUnit, keys};
use crate::errors::Result;

pub const DEFAULT_REPORT_PERIOD: i64 = 10;
pub const DEFAULT_REPORT_PERIOD_UNIT: TimeUnit = TimeUnit::Seconds;

/// How often a reporter exports. Resolved once in `prepare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingParameters {
    pub period: i64,
    pub unit: TimeUnit,
}

impl SchedulingParameters {
    pub const fn new(period: i64, unit: TimeUnit) -> Self {
        Self { period, unit }
    }

    pub fn resolve(config: &ReporterConfig) -> Result<Self> {
        Ok(Self {
            period: report_period(config),
            unit: report_period_unit(config)?,
        })
    }
}

impl Default for SchedulingParameters {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_PERIOD, DEFAULT_REPORT_PERIOD_UNIT)
    }
}

/// `report.period`, or 10 when absent or not an integer. Not clamped.
pub fn report_period(config: &ReporterConfig) -> i64 {
    match config.get_int(keys::REPORT_PERIOD) {
        Some(period) => period,
        None => {
            if let Some(raw) = config.get(keys::REPORT_PERIOD) {
                warn!(
                    "Ignoring non-integer '{}' = {}, using {}",
                    keys::REPORT_PERIOD,
                    raw,
                    DEFAULT_REPORT_PERIOD
                );
            }
            DEFAULT_REPORT_PERIOD
        }
    }
}

/// `report.period.units`, parsed case-sensitively; `SECONDS` when absent.
pub fn report_period_unit(config: &ReporterConfig) -> Result<TimeUnit> {
    Ok(config
        .get_enum::<TimeUnit>(keys::REPORT_PERIOD_UNITS)?
        .unwrap_or(DEFAULT_REPORT_PERIOD_UNIT))
}
