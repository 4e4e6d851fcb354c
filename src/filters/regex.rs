use regex::Regex;
use tracing::trace;

use super::MetricFilter;
use crate::config::ReporterConfig;
use crate::errors::{ReporterError, Result};
use crate::registry::MetricValue;

/// 配置键：正则表达式
pub const EXPRESSION: &str = "expression";

/// Reports only metrics whose name matches `expression`.
#[derive(Debug, Default)]
pub struct RegexFilter {
    pattern: Option<Regex>,
}

impl RegexFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression(expression: &str) -> Result<Self> {
        Ok(Self {
            pattern: Some(Regex::new(expression)?),
        })
    }
}

impl MetricFilter for RegexFilter {
    fn prepare(&mut self, config: &ReporterConfig) -> Result<()> {
        let expression = config.get_string(EXPRESSION).ok_or_else(|| {
            ReporterError::configuration(format!("Missing '{}' for regex filter", EXPRESSION))
        })?;
        self.pattern = Some(Regex::new(expression)?);
        Ok(())
    }

    fn should_report(&self, name: &str, _value: &MetricValue) -> bool {
        // 未准备时不过滤
        let matched = self.pattern.as_ref().is_none_or(|p| p.is_match(name));
        trace!("RegexFilter: {} -> {}", name, matched);
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_requires_expression() {
        let mut filter = RegexFilter::new();
        let err = filter.prepare(&ReporterConfig::empty()).unwrap_err();
        assert!(err.message().contains("expression"));
    }

    #[test]
    fn test_invalid_expression_is_configuration_error() {
        let mut filter = RegexFilter::new();
        let cfg = ReporterConfig::from_value(json!({ "expression": "(" })).unwrap();
        assert!(matches!(
            filter.prepare(&cfg),
            Err(ReporterError::Configuration(_))
        ));
    }

    #[test]
    fn test_matching() {
        let filter = RegexFilter::with_expression("latency$").unwrap();
        let value = MetricValue::Counter(1);
        assert!(filter.should_report("http.latency", &value));
        assert!(!filter.should_report("http.latency.max", &value));
    }
}
