//! 多个 reporter 的统一管理
//!
//! 按配置列表逐个加载并准备 reporter。某个 reporter 加载或准备失败时只跳过它，
//! 其余 reporter 照常运行。

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{ReporterConfig, keys};
use crate::errors::{ReporterError, Result};
use crate::lifecycle::Reporter;
use crate::plugins::load_reporter;
use crate::registry::MetricRegistry;

/// A reporter that could not be set up, with the reason.
#[derive(Debug, Clone)]
pub struct ReporterFailure {
    pub class: String,
    pub error: ReporterError,
}

pub struct ReporterManager {
    registry: Arc<dyn MetricRegistry>,
    reporters: Vec<Box<dyn Reporter>>,
    failures: Vec<ReporterFailure>,
}

impl ReporterManager {
    pub fn new(registry: Arc<dyn MetricRegistry>) -> Self {
        Self {
            registry,
            reporters: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Loads and prepares one reporter per config. Returns how many were
    /// prepared; the rest are recorded in [`failures`](Self::failures).
    pub fn prepare_all(&mut self, configs: &[ReporterConfig]) -> usize {
        let mut prepared = 0;
        for config in configs {
            let class = config
                .get_string(keys::CLASS)
                .unwrap_or_default()
                .to_string();
            match self.prepare_one(&class, config) {
                Ok(reporter) => {
                    info!("Prepared metrics reporter: {}", class);
                    self.reporters.push(reporter);
                    prepared += 1;
                }
                Err(error) => {
                    error!("Skipping metrics reporter '{}': {}", class, error);
                    self.failures.push(ReporterFailure { class, error });
                }
            }
        }
        prepared
    }

    fn prepare_one(&self, class: &str, config: &ReporterConfig) -> Result<Box<dyn Reporter>> {
        if class.is_empty() {
            return Err(ReporterError::configuration(format!(
                "Reporter entry is missing '{}'",
                keys::CLASS
            )));
        }
        let mut reporter = load_reporter(class)?;
        reporter.prepare(Arc::clone(&self.registry), config)?;
        Ok(reporter)
    }

    /// Registers an already constructed reporter and prepares it.
    pub fn add(&mut self, mut reporter: Box<dyn Reporter>, config: &ReporterConfig) -> Result<()> {
        reporter.prepare(Arc::clone(&self.registry), config)?;
        self.reporters.push(reporter);
        Ok(())
    }

    /// Starts every prepared reporter; returns how many are running.
    pub fn start_all(&mut self) -> usize {
        let mut started = 0;
        for reporter in &mut self.reporters {
            match reporter.start() {
                Ok(()) => started += 1,
                Err(e) => error!("Failed to start metrics reporter '{}': {}", reporter.name(), e),
            }
        }
        started
    }

    pub fn stop_all(&mut self) {
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.stop() {
                warn!("Failed to stop metrics reporter '{}': {}", reporter.name(), e);
            }
        }
    }

    pub fn close_all(&mut self) {
        for reporter in &mut self.reporters {
            reporter.close();
        }
    }

    pub fn reporters(&self) -> &[Box<dyn Reporter>] {
        &self.reporters
    }

    pub fn failures(&self) -> &[ReporterFailure] {
        &self.failures
    }
}
