//! ReporterManager 集成测试

use std::sync::Arc;

use tempfile::TempDir;

use metricsreporter::ReporterState;
use metricsreporter::config::MetricsConfig;
use metricsreporter::errors::ReporterError;
use metricsreporter::registry::InMemoryRegistry;
use metricsreporter::reporters::{ConsoleReporter, ReporterManager};

fn config_with_dir(dir: &TempDir, reporters: &str) -> MetricsConfig {
    let content = reporters.replace("{dir}", &dir.path().to_string_lossy().replace('\\', "/"));
    MetricsConfig::from_toml_str(&content).unwrap()
}

#[test]
fn test_bad_reporter_does_not_abort_others() {
    let dir = TempDir::new().unwrap();
    let config = config_with_dir(
        &dir,
        r#"
[[reporters]]
class = "csv"
"csv.log.dir" = "{dir}"
"report.period" = 1
"report.period.units" = "HOURS"

[[reporters]]
class = "csv"
"csv.log.dir" = "{dir}"
filter = { class = "com.example.DoesNotExist" }

[[reporters]]
class = "graphite"

[[reporters]]
"report.period" = 3
"#,
    );

    let registry = Arc::new(InMemoryRegistry::new());
    registry.inc_counter("jobs", 1);
    let mut manager = ReporterManager::new(registry);

    let prepared = manager.prepare_all(&config.reporter_configs());
    assert_eq!(prepared, 1);
    assert_eq!(manager.reporters().len(), 1);

    let failures = manager.failures();
    assert_eq!(failures.len(), 3);
    assert!(matches!(failures[0].error, ReporterError::PluginNotFound(_)));
    assert!(failures[0].error.message().contains("com.example.DoesNotExist"));
    assert_eq!(failures[1].class, "graphite");
    assert!(matches!(failures[1].error, ReporterError::PluginNotFound(_)));
    assert!(matches!(failures[2].error, ReporterError::Configuration(_)));

    assert_eq!(manager.start_all(), 1);
    manager.stop_all();
    manager.close_all();
    assert!(
        manager
            .reporters()
            .iter()
            .all(|r| r.state() == ReporterState::Closed)
    );
    assert!(dir.path().join("jobs.csv").exists());
}

#[test]
fn test_add_prepares_reporter() {
    let mut manager = ReporterManager::new(Arc::new(InMemoryRegistry::new()));
    let config = MetricsConfig::from_toml_str(
        r#"
[[reporters]]
class = "console"
"report.period" = 2
"report.period.units" = "MINUTES"
"#,
    )
    .unwrap();

    manager
        .add(
            Box::new(ConsoleReporter::default()),
            &config.reporter_configs()[0],
        )
        .unwrap();
    assert_eq!(manager.reporters()[0].state(), ReporterState::Prepared);
    assert_eq!(manager.reporters()[0].name(), "console");

    manager.close_all();
    assert_eq!(manager.reporters()[0].state(), ReporterState::Closed);
}

#[test]
fn test_stop_all_before_start_is_tolerated() {
    let mut manager = ReporterManager::new(Arc::new(InMemoryRegistry::new()));
    let config = MetricsConfig::from_toml_str(
        r#"
[[reporters]]
class = "console"
"report.on.stop" = false
"#,
    )
    .unwrap();
    assert_eq!(manager.prepare_all(&config.reporter_configs()), 1);

    manager.stop_all();
    assert_eq!(manager.reporters()[0].state(), ReporterState::Stopped);
    assert_eq!(manager.start_all(), 0);
    manager.close_all();
}
