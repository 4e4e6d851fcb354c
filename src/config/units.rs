//! 时间单位与区域设置
//!
//! `TimeUnit` 使用规范的大写名称（`NANOSECONDS` … `DAYS`），解析区分大小写。

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{AsRefStr, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Canonical time units for reporting periods and value conversion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// 一个单位包含的纳秒数
    pub const fn nanos(self) -> u64 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => 1_000_000_000,
            Self::Minutes => 60 * 1_000_000_000,
            Self::Hours => 3_600 * 1_000_000_000,
            Self::Days => 86_400 * 1_000_000_000,
        }
    }

    pub fn to_duration(self, amount: u64) -> Duration {
        Duration::from_nanos(amount.saturating_mul(self.nanos()))
    }

    /// Converts an events-per-second rate into events per `self`.
    pub fn convert_rate(self, per_second: f64) -> f64 {
        per_second * (self.nanos() as f64 / 1_000_000_000.0)
    }

    /// Converts a duration in nanoseconds into `self`.
    pub fn convert_duration(self, nanos: f64) -> f64 {
        nanos / self.nanos() as f64
    }

    /// Singular lower-case name, as used in unit labels (`events/second`).
    pub fn singular(self) -> &'static str {
        match self {
            Self::Nanoseconds => "nanosecond",
            Self::Microseconds => "microsecond",
            Self::Milliseconds => "millisecond",
            Self::Seconds => "second",
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter().find(|unit| unit.as_ref() == s).ok_or_else(|| {
            let valid: Vec<&'static str> = Self::iter().map(<&'static str>::from).collect();
            format!("Unknown time unit: '{}'. Valid: {}", s, valid.join(", "))
        })
    }
}

/// 使用逗号作为小数分隔符的语言
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "bg", "cs", "da", "de", "el", "es", "fi", "fr", "hr", "hu", "id", "it", "lt", "lv", "nb",
    "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr", "uk", "vi",
];

/// A language tag such as `en-US` or `de_DE`, used to format exported numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    language: String,
}

impl Locale {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn decimal_separator(&self) -> char {
        if DECIMAL_COMMA_LANGUAGES.contains(&self.language.as_str()) {
            ','
        } else {
            '.'
        }
    }

    /// Formats `value` with six fractional digits and this locale's separator.
    pub fn format_decimal(&self, value: f64) -> String {
        let formatted = format!("{:.6}", value);
        match self.decimal_separator() {
            '.' => formatted,
            sep => formatted.replace('.', &sep.to_string()),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            language: "en".to_string(),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag)
    }
}

impl std::str::FromStr for Locale {
    type Err = String;
    /// Any non-empty tag is accepted. Tags without a recognizable language
    /// subtag (`und`, `x-private`, ...) keep the `.` separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err("Locale tag must not be empty".to_string());
        }
        let first = tag.split(['-', '_']).next().unwrap_or_default();
        let language = if (2..=3).contains(&first.len())
            && first.chars().all(|c| c.is_ascii_alphabetic())
        {
            first.to_ascii_lowercase()
        } else {
            String::new()
        };
        Ok(Self {
            tag: tag.to_string(),
            language,
        })
    }
}
