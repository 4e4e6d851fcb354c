use std::sync::Arc;
use tracing::{Span, debug, info_span, warn};

use super::SchedulingParameters;
use crate::config::{ReporterConfig, keys};
use crate::engine::ExportEngine;
use crate::errors::{ReporterError, Result};
use crate::filters::{MetricFilter, resolve_filter};
use crate::lifecycle::{Reporter, ReporterState, Transition};
use crate::registry::MetricRegistry;

/// The format-specific half of a scheduled reporter.
pub trait ReporterBackend: Send {
    /// Plugin identifier, also used as the tracing span field.
    fn name(&self) -> &'static str;

    /// Whether `stop()` exports once more before halting, unless
    /// `report.on.stop` says otherwise.
    fn flush_on_stop_default(&self) -> bool {
        false
    }

    /// Builds the inner engine. Format options are applied only when present
    /// in `config`.
    fn build_engine(
        &self,
        registry: Arc<dyn MetricRegistry>,
        filter: Option<Arc<dyn MetricFilter>>,
        config: &ReporterConfig,
    ) -> Result<Box<dyn ExportEngine>>;
}

/// Lifecycle shared by all fixed-schedule reporters.
///
/// `prepare` resolves [`SchedulingParameters`], builds the optional filter
/// and asks the backend for an engine; `start`/`stop`/`close` are delegated
/// to that engine after checking the state machine.
pub struct ScheduledReporter<B> {
    backend: B,
    state: ReporterState,
    params: Option<SchedulingParameters>,
    flush_on_stop: bool,
    engine: Option<Box<dyn ExportEngine>>,
    span: Span,
}

impl<B: ReporterBackend> ScheduledReporter<B> {
    pub fn new(backend: B) -> Self {
        let span = info_span!("reporter", kind = backend.name());
        let flush_on_stop = backend.flush_on_stop_default();
        Self {
            backend,
            state: ReporterState::Uninitialized,
            params: None,
            flush_on_stop,
            engine: None,
            span,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scheduling_parameters(&self) -> Option<SchedulingParameters> {
        self.params
    }

    pub fn flush_on_stop(&self) -> bool {
        self.flush_on_stop
    }

    fn next_state(&self, transition: Transition) -> Result<ReporterState> {
        self.state.on(transition).map_err(|e| {
            ReporterError::lifecycle_order(format!(
                "{} reporter: {}",
                self.backend.name(),
                e.message()
            ))
        })
    }
}

impl<B: ReporterBackend + Default> Default for ScheduledReporter<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: ReporterBackend> Reporter for ScheduledReporter<B> {
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn state(&self) -> ReporterState {
        self.state
    }

    fn prepare(
        &mut self,
        registry: Arc<dyn MetricRegistry>,
        config: &ReporterConfig,
    ) -> Result<()> {
        let span = self.span.clone();
        let _guard = span.enter();

        let next = self.next_state(Transition::Prepare)?;
        debug!("Preparing...");

        let params = SchedulingParameters::resolve(config)?;
        let filter = resolve_filter(config)?;
        let flush_on_stop = config
            .get_bool(keys::REPORT_ON_STOP)
            .unwrap_or_else(|| self.backend.flush_on_stop_default());
        let engine = self.backend.build_engine(registry, filter, config)?;

        self.params = Some(params);
        self.flush_on_stop = flush_on_stop;
        self.engine = Some(engine);
        self.state = next;
        debug!(
            period = params.period,
            unit = %params.unit,
            flush_on_stop,
            "Prepared"
        );
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let span = self.span.clone();
        let _guard = span.enter();

        let next = self.next_state(Transition::Start)?;
        let (Some(engine), Some(params)) = (self.engine.as_mut(), self.params) else {
            return Err(ReporterError::lifecycle_order(format!(
                "Attempt to start without preparing {} reporter",
                self.backend.name()
            )));
        };
        debug!("Starting...");
        engine.start(params)?;
        self.state = next;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let span = self.span.clone();
        let _guard = span.enter();

        let next = self.next_state(Transition::Stop)?;
        if self.state == ReporterState::Stopped {
            return Ok(());
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(ReporterError::lifecycle_order(format!(
                "Attempt to stop without preparing {} reporter",
                self.backend.name()
            )));
        };
        debug!("Stopping...");
        if self.flush_on_stop
            && let Err(e) = engine.report()
        {
            warn!("Final export before stop failed: {}", e);
        }
        engine.stop();
        self.state = next;
        Ok(())
    }

    fn close(&mut self) {
        let span = self.span.clone();
        let _guard = span.enter();

        if let Some(mut engine) = self.engine.take() {
            debug!("Closing...");
            if let Err(e) = engine.close() {
                warn!("Failed to release reporter resources: {}", e);
            }
        }
        self.state = self
            .state
            .on(Transition::Close)
            .unwrap_or(ReporterState::Closed);
    }
}

impl<B> Drop for ScheduledReporter<B> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
    }
}
