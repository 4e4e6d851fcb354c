use chrono::Utc;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, trace, warn};

use super::{ExportEngine, MetricSink, ValueFormat};
use crate::errors::{ReporterError, Result};
use crate::filters::MetricFilter;
use crate::registry::{MetricRegistry, MetricSample};
use crate::reporters::SchedulingParameters;

/// 单次导出：快照 → 过滤 → 写入 sink
struct ExportPass {
    name: String,
    registry: Arc<dyn MetricRegistry>,
    filter: Option<Arc<dyn MetricFilter>>,
    sink: Mutex<Box<dyn MetricSink>>,
    format: ValueFormat,
}

impl ExportPass {
    fn run(&self) -> Result<usize> {
        let samples: Vec<MetricSample> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|s| {
                self.filter
                    .as_ref()
                    .is_none_or(|f| f.should_report(&s.name, &s.value))
            })
            .collect();
        self.sink.lock().write(Utc::now(), &samples, &self.format)?;
        trace!("{}: exported {} metrics", self.name, samples.len());
        Ok(samples.len())
    }
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Fixed-delay exporter running on its own thread.
///
/// The first pass happens one period after `start`. A failed pass is logged
/// and the schedule continues.
pub struct ScheduledExporter {
    pass: Arc<ExportPass>,
    worker: Option<Worker>,
    closed: bool,
}

impl ScheduledExporter {
    pub fn new(
        name: impl Into<String>,
        registry: Arc<dyn MetricRegistry>,
        filter: Option<Arc<dyn MetricFilter>>,
        sink: Box<dyn MetricSink>,
        format: ValueFormat,
    ) -> Self {
        Self {
            pass: Arc::new(ExportPass {
                name: name.into(),
                registry,
                filter,
                sink: Mutex::new(sink),
                format,
            }),
            worker: None,
            closed: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn format(&self) -> &ValueFormat {
        &self.pass.format
    }

    pub fn has_filter(&self) -> bool {
        self.pass.filter.is_some()
    }
}

impl ExportEngine for ScheduledExporter {
    fn start(&mut self, params: SchedulingParameters) -> Result<()> {
        if self.closed {
            return Err(ReporterError::lifecycle_order(format!(
                "{}: cannot start a closed exporter",
                self.pass.name
            )));
        }
        if self.worker.is_some() {
            return Err(ReporterError::lifecycle_order(format!(
                "{}: exporter already started",
                self.pass.name
            )));
        }
        if params.period <= 0 {
            return Err(ReporterError::configuration(format!(
                "{}: reporting period must be positive, got {} {}",
                self.pass.name, params.period, params.unit
            )));
        }

        let interval = params.unit.to_duration(params.period as u64);
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let pass = Arc::clone(&self.pass);
        let handle = std::thread::Builder::new()
            .name(format!("{}-reporter", pass.name))
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if let Err(e) = pass.run() {
                                warn!("{}: scheduled export failed: {}", pass.name, e);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("{}: scheduler thread exiting", pass.name);
            })
            .map_err(|e| {
                ReporterError::file_operation(format!(
                    "{}: failed to spawn scheduler thread: {}",
                    self.pass.name, e
                ))
            })?;

        debug!(
            "{}: exporting every {} {}",
            self.pass.name, params.period, params.unit
        );
        self.worker = Some(Worker { stop_tx, handle });
        Ok(())
    }

    fn report(&mut self) -> Result<()> {
        self.pass.run().map(|_| ())
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // 线程已退出时 send 会失败，忽略即可
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                warn!("{}: scheduler thread panicked", self.pass.name);
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.stop();
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pass.sink.lock().close()
    }
}

impl Drop for ScheduledExporter {
    fn drop(&mut self) {
        self.stop();
    }
}
