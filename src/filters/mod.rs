//! Metric filters
//!
//! A filter decides, per export pass, which metrics reach the sink. Filters
//! are selected by name through the filter plugin registry and prepared once
//! with their configuration block before first use.

mod prefix;
mod regex;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{ReporterConfig, keys};
use crate::errors::{ReporterError, Result};
use crate::plugins::{FilterConstructor, load_filter};
use crate::registry::MetricValue;

pub use prefix::PrefixFilter;
pub use self::regex::RegexFilter;

pub trait MetricFilter: Send + Sync {
    /// 使用 filter 配置块初始化，在首次使用前调用且仅调用一次
    fn prepare(&mut self, config: &ReporterConfig) -> Result<()>;

    fn should_report(&self, name: &str, value: &MetricValue) -> bool;
}

/// Builds the filter configured under `filter` in a reporter block.
///
/// - no `filter` block: `Ok(None)`
/// - block without `class`: `Ok(None)`, tolerated with a warning
/// - unknown `class`: `PluginNotFound`, naming the class and the key
pub fn resolve_filter(config: &ReporterConfig) -> Result<Option<Arc<dyn MetricFilter>>> {
    let Some(filter_config) = config.sub_config(keys::FILTER) else {
        return Ok(None);
    };
    let Some(class) = filter_config.get_string(keys::CLASS) else {
        warn!(
            "Filter block present without '{}', reporting all metrics",
            keys::FILTER_CLASS
        );
        return Ok(None);
    };

    let mut filter = load_filter(class).map_err(|e| match e {
        ReporterError::PluginNotFound(_) => ReporterError::plugin_not_found(format!(
            "Filter plugin '{}' (key '{}') is not registered",
            class,
            keys::FILTER_CLASS
        )),
        other => other,
    })?;
    filter.prepare(&filter_config).map_err(|e| {
        ReporterError::configuration(format!(
            "Failed to prepare filter '{}' (key '{}'): {}",
            class,
            keys::FILTER_CLASS,
            e.message()
        ))
    })?;
    debug!("Attached metric filter: {}", class);
    Ok(Some(Arc::from(filter)))
}

pub(crate) fn builtin_filter_plugins() -> Vec<(&'static str, FilterConstructor)> {
    let regex: FilterConstructor =
        Arc::new(|| Ok(Box::new(RegexFilter::new()) as Box<dyn MetricFilter>));
    let prefix: FilterConstructor =
        Arc::new(|| Ok(Box::new(PrefixFilter::new()) as Box<dyn MetricFilter>));
    vec![("regex", regex), ("prefix", prefix)]
}
