use crate::config::{Locale, ReporterConfig, TimeUnit, keys};
use crate::errors::Result;

/// How exported values are converted and rendered.
///
/// Defaults: `en-US` locale, rates per second, durations in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormat {
    pub locale: Locale,
    pub rate_unit: TimeUnit,
    pub duration_unit: TimeUnit,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
        }
    }
}

impl ValueFormat {
    /// 只覆盖显式配置的项，未配置时保留默认值
    pub fn from_config(config: &ReporterConfig) -> Result<Self> {
        let mut format = Self::default();
        if let Some(locale) = config.get_enum::<Locale>(keys::LOCALE)? {
            format.locale = locale;
        }
        if let Some(unit) = config.get_enum::<TimeUnit>(keys::RATE_UNIT)? {
            format.rate_unit = unit;
        }
        if let Some(unit) = config.get_enum::<TimeUnit>(keys::DURATION_UNIT)? {
            format.duration_unit = unit;
        }
        Ok(format)
    }

    pub fn rate(&self, per_second: f64) -> String {
        self.locale
            .format_decimal(self.rate_unit.convert_rate(per_second))
    }

    pub fn duration(&self, nanos: f64) -> String {
        self.locale
            .format_decimal(self.duration_unit.convert_duration(nanos))
    }

    pub fn decimal(&self, value: f64) -> String {
        self.locale.format_decimal(value)
    }

    /// e.g. `events/second`
    pub fn rate_label(&self) -> String {
        format!("events/{}", self.rate_unit.singular())
    }

    /// e.g. `milliseconds`
    pub fn duration_label(&self) -> String {
        format!("{}s", self.duration_unit.singular())
    }
}
