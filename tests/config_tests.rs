//! 配置加载与调度参数解析测试

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use metricsreporter::config::{MetricsConfig, ReporterConfig, TimeUnit};
use metricsreporter::engine::ValueFormat;
use metricsreporter::errors::ReporterError;
use metricsreporter::reporters::SchedulingParameters;
use metricsreporter::reporters::params::{DEFAULT_REPORT_PERIOD, report_period};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[cfg(test)]
mod load_tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[logging]
level = "warn"
format = "json"

[[reporters]]
class = "csv"
"report.period" = 5
"report.period.units" = "MINUTES"
"csv.log.dir" = "/var/lib/metrics"

[reporters.filter]
class = "regex"
expression = "^http\\."

[[reporters]]
class = "console"
"#,
        );

        let config = MetricsConfig::load(&file.path().to_string_lossy()).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "json");

        let reporters = config.reporter_configs();
        assert_eq!(reporters.len(), 2);
        let csv = &reporters[0];
        assert_eq!(csv.get_string("class"), Some("csv"));
        assert_eq!(csv.get_string("csv.log.dir"), Some("/var/lib/metrics"));
        assert_eq!(csv.get_string("filter.class"), Some("regex"));
        assert_eq!(csv.get_string("filter.expression"), Some("^http\\."));

        let params = SchedulingParameters::resolve(csv).unwrap();
        assert_eq!(params, SchedulingParameters::new(5, TimeUnit::Minutes));
        let params = SchedulingParameters::resolve(&reporters[1]).unwrap();
        assert_eq!(params, SchedulingParameters::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let file = write_config("[[reporters]\nclass = ");
        let err = MetricsConfig::load(&file.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, ReporterError::Configuration(_)));
    }
}

#[cfg(test)]
mod scheduling_tests {
    use super::*;

    fn config(value: serde_json::Value) -> ReporterConfig {
        ReporterConfig::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_config() {
        let params = SchedulingParameters::resolve(&config(json!({}))).unwrap();
        assert_eq!(params.period, 10);
        assert_eq!(params.unit, TimeUnit::Seconds);
    }

    #[test]
    fn test_minutes() {
        let params = SchedulingParameters::resolve(&config(json!({
            "report.period": 5,
            "report.period.units": "MINUTES"
        })))
        .unwrap();
        assert_eq!(params.period, 5);
        assert_eq!(params.unit, TimeUnit::Minutes);
    }

    #[test]
    fn test_every_canonical_unit_parses() {
        for (name, unit) in [
            ("NANOSECONDS", TimeUnit::Nanoseconds),
            ("MICROSECONDS", TimeUnit::Microseconds),
            ("MILLISECONDS", TimeUnit::Milliseconds),
            ("SECONDS", TimeUnit::Seconds),
            ("MINUTES", TimeUnit::Minutes),
            ("HOURS", TimeUnit::Hours),
            ("DAYS", TimeUnit::Days),
        ] {
            let params =
                SchedulingParameters::resolve(&config(json!({ "report.period.units": name })))
                    .unwrap();
            assert_eq!(params.unit, unit, "{}", name);
        }
    }

    #[test]
    fn test_unrecognized_unit_is_configuration_error() {
        for bad in ["Minutes", "minutes", "FORTNIGHTS", ""] {
            let err =
                SchedulingParameters::resolve(&config(json!({ "report.period.units": bad })))
                    .unwrap_err();
            assert!(matches!(err, ReporterError::Configuration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_period_passed_through_unclamped() {
        assert_eq!(report_period(&config(json!({ "report.period": 0 }))), 0);
        assert_eq!(report_period(&config(json!({ "report.period": -4 }))), -4);
        assert_eq!(
            report_period(&config(json!({ "report.period": "soon" }))),
            DEFAULT_REPORT_PERIOD
        );
    }

    #[test]
    fn test_format_options_only_when_configured() {
        let format = ValueFormat::from_config(&config(json!({ "duration.unit": "SECONDS" })))
            .unwrap();
        assert_eq!(format.duration_unit, TimeUnit::Seconds);
        assert_eq!(format.rate_unit, ValueFormat::default().rate_unit);
        assert_eq!(format.locale, ValueFormat::default().locale);

        assert!(ValueFormat::from_config(&config(json!({ "rate.unit": "hourly" }))).is_err());
        assert!(ValueFormat::from_config(&config(json!({ "locale": 42 }))).is_err());
    }
}
