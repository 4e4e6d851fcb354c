use metricsreporter::errors::{ReporterError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = ReporterError::configuration("bad unit");

        assert!(matches!(error, ReporterError::Configuration(_)));
        assert!(error.to_string().contains("Configuration Error"));
        assert!(error.to_string().contains("bad unit"));
        assert_eq!(error.code(), "E001");
    }

    #[test]
    fn test_plugin_not_found_error() {
        let error = ReporterError::plugin_not_found("com.example.Missing");

        assert!(matches!(error, ReporterError::PluginNotFound(_)));
        assert!(error.to_string().contains("Plugin Not Found"));
        assert!(error.to_string().contains("com.example.Missing"));
    }

    #[test]
    fn test_lifecycle_order_error() {
        let error = ReporterError::lifecycle_order("not prepared");

        assert!(matches!(error, ReporterError::LifecycleOrder(_)));
        assert_eq!(error.error_type(), "Lifecycle Order Error");
        assert_eq!(error.message(), "not prepared");
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_resource_release_error() {
        let error = ReporterError::resource_release("file already closed");

        assert!(matches!(error, ReporterError::ResourceRelease(_)));
        assert!(error.to_string().contains("Resource Release Error"));
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: ReporterError = io_error.into();

        assert!(matches!(error, ReporterError::FileOperation(_)));
        assert!(error.message().contains("read-only"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ReporterError = json_error.into();

        assert!(matches!(error, ReporterError::Serialization(_)));
    }

    #[test]
    fn test_regex_error_conversion() {
        let regex_error = regex::Regex::new("(").unwrap_err();
        let error: ReporterError = regex_error.into();

        assert!(error.is_configuration());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse(input: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(input)?)
        }

        assert!(parse("{\"a\": 1}").is_ok());
        assert!(matches!(
            parse("not json"),
            Err(ReporterError::Serialization(_))
        ));
    }
}

#[cfg(test)]
mod error_format_tests {
    use super::*;

    #[test]
    fn test_format_simple() {
        let error = ReporterError::plugin_not_found("Filter plugin 'x' is not registered");
        assert_eq!(
            error.format_simple(),
            "Plugin Not Found: Filter plugin 'x' is not registered"
        );
    }

    #[test]
    fn test_format_colored_contains_code_and_message() {
        colored::control::set_override(false);
        let error = ReporterError::configuration("report.period.units");
        let formatted = error.format_colored();

        assert!(formatted.contains("[ERROR]"));
        assert!(formatted.contains("E001"));
        assert!(formatted.contains("report.period.units"));
    }

    #[test]
    fn test_std_error_trait() {
        let error = ReporterError::file_operation("disk full");
        let dyn_error: &dyn Error = &error;

        assert!(dyn_error.source().is_none());
        assert!(dyn_error.to_string().contains("disk full"));
    }
}
