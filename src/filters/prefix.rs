use super::MetricFilter;
use crate::config::ReporterConfig;
use crate::errors::Result;
use crate::registry::MetricValue;

/// 配置键：允许的名称前缀列表（数组或逗号分隔字符串）
pub const PREFIXES: &str = "prefixes";

/// Reports metrics whose name starts with one of the configured prefixes.
/// An empty prefix list reports everything.
#[derive(Debug, Default)]
pub struct PrefixFilter {
    prefixes: Vec<String>,
}

impl PrefixFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl MetricFilter for PrefixFilter {
    fn prepare(&mut self, config: &ReporterConfig) -> Result<()> {
        self.prefixes = config.get_string_list(PREFIXES).unwrap_or_default();
        Ok(())
    }

    fn should_report(&self, name: &str, _value: &MetricValue) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_reports_all() {
        let filter = PrefixFilter::new();
        assert!(filter.should_report("anything", &MetricValue::Gauge(0.0)));
    }

    #[test]
    fn test_prepare_reads_list() {
        let mut filter = PrefixFilter::new();
        let cfg = ReporterConfig::from_value(json!({ "prefixes": ["jvm.", "process."] })).unwrap();
        filter.prepare(&cfg).unwrap();
        let value = MetricValue::Counter(0);
        assert!(filter.should_report("jvm.threads", &value));
        assert!(filter.should_report("process.cpu", &value));
        assert!(!filter.should_report("http.requests", &value));
    }
}
