use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::errors::{ReporterError, Result};
use crate::filters::{MetricFilter, builtin_filter_plugins};
use crate::lifecycle::Reporter;
use crate::reporters::builtin_reporter_plugins;

pub type FilterConstructor = Arc<dyn Fn() -> Result<Box<dyn MetricFilter>> + Send + Sync>;
pub type ReporterConstructor = Arc<dyn Fn() -> Result<Box<dyn Reporter>> + Send + Sync>;

// 内置插件在首次访问时注册
static FILTER_REGISTRY: Lazy<RwLock<HashMap<String, FilterConstructor>>> = Lazy::new(|| {
    RwLock::new(
        builtin_filter_plugins()
            .into_iter()
            .map(|(name, ctor)| (name.to_string(), ctor))
            .collect(),
    )
});

static REPORTER_REGISTRY: Lazy<RwLock<HashMap<String, ReporterConstructor>>> =
    Lazy::new(|| {
        RwLock::new(
            builtin_reporter_plugins()
                .into_iter()
                .map(|(name, ctor)| (name.to_string(), ctor))
                .collect(),
        )
    });

pub fn register_filter_plugin<S: Into<String>>(name: S, constructor: FilterConstructor) {
    let name = name.into();
    debug!("Registering filter plugin: {}", name);
    FILTER_REGISTRY.write().insert(name, constructor);
}

pub fn get_filter_plugin(name: &str) -> Option<FilterConstructor> {
    FILTER_REGISTRY.read().get(name).cloned()
}

pub fn get_filter_plugin_names() -> Vec<String> {
    let mut names: Vec<String> = FILTER_REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

/// Constructs the filter registered as `name`.
pub fn load_filter(name: &str) -> Result<Box<dyn MetricFilter>> {
    let constructor = get_filter_plugin(name).ok_or_else(|| {
        ReporterError::plugin_not_found(format!("Filter plugin '{}' is not registered", name))
    })?;
    constructor()
}

pub fn register_reporter_plugin<S: Into<String>>(name: S, constructor: ReporterConstructor) {
    let name = name.into();
    debug!("Registering reporter plugin: {}", name);
    REPORTER_REGISTRY.write().insert(name, constructor);
}

pub fn get_reporter_plugin(name: &str) -> Option<ReporterConstructor> {
    REPORTER_REGISTRY.read().get(name).cloned()
}

pub fn get_reporter_plugin_names() -> Vec<String> {
    let mut names: Vec<String> = REPORTER_REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

/// Constructs the reporter registered as `name`, in the `Uninitialized` state.
pub fn load_reporter(name: &str) -> Result<Box<dyn Reporter>> {
    let constructor = get_reporter_plugin(name).ok_or_else(|| {
        ReporterError::plugin_not_found(format!("Reporter plugin '{}' is not registered", name))
    })?;
    constructor()
}

/// 调试函数：打印当前所有已注册的插件名称
pub fn debug_plugin_registry() {
    let filters = get_filter_plugin_names();
    if filters.is_empty() {
        debug!("No filter plugins registered.");
    } else {
        debug!("Registered filter plugins:");
        for key in &filters {
            debug!(" - {}", key);
        }
    }

    let reporters = get_reporter_plugin_names();
    if reporters.is_empty() {
        debug!("No reporter plugins registered.");
    } else {
        debug!("Registered reporter plugins:");
        for key in &reporters {
            debug!(" - {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PrefixFilter;

    #[test]
    fn test_builtins_registered() {
        let filters = get_filter_plugin_names();
        assert!(filters.contains(&"regex".to_string()));
        assert!(filters.contains(&"prefix".to_string()));

        let reporters = get_reporter_plugin_names();
        assert!(reporters.contains(&"csv".to_string()));
        assert!(reporters.contains(&"console".to_string()));
    }

    #[test]
    fn test_load_unknown_plugin() {
        let err = load_filter("missing.Filter").err().unwrap();
        assert!(matches!(err, ReporterError::PluginNotFound(_)));
        assert!(err.message().contains("missing.Filter"));

        let err = load_reporter("missing.Reporter").err().unwrap();
        assert!(matches!(err, ReporterError::PluginNotFound(_)));
    }

    #[test]
    fn test_register_custom_filter() {
        register_filter_plugin(
            "test.register.Prefix",
            Arc::new(|| Ok(Box::new(PrefixFilter::new()) as Box<dyn MetricFilter>)),
        );
        assert!(get_filter_plugin("test.register.Prefix").is_some());
        assert!(load_filter("test.register.Prefix").is_ok());
    }

    #[test]
    fn test_loaded_reporter_is_uninitialized() {
        let reporter = load_reporter("csv").unwrap();
        assert_eq!(reporter.name(), "csv");
        assert_eq!(
            reporter.state(),
            crate::lifecycle::ReporterState::Uninitialized
        );
    }
}
