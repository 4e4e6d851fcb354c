//! Reporter lifecycle: `prepare → start → stop → close`.
//!
//! Every transition goes through [`ReporterState::on`], an exhaustive table.
//! Illegal transitions return [`ReporterError::LifecycleOrder`]; they signal a
//! sequencing bug in the owner and are never swallowed.

use std::sync::Arc;

use crate::config::ReporterConfig;
use crate::errors::{ReporterError, Result};
use crate::registry::MetricRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReporterState {
    #[default]
    Uninitialized,
    Prepared,
    Started,
    Stopped,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Prepare,
    Start,
    Stop,
    Close,
}

impl Transition {
    fn verb(self) -> &'static str {
        match self {
            Transition::Prepare => "prepare",
            Transition::Start => "start",
            Transition::Stop => "stop",
            Transition::Close => "close",
        }
    }
}

impl ReporterState {
    /// Next state after applying `transition`, or a lifecycle-order error.
    pub fn on(self, transition: Transition) -> Result<ReporterState> {
        use ReporterState::*;
        use Transition::*;

        match (self, transition) {
            // 未准备时 close 不改变状态
            (Uninitialized, Close) => Ok(Uninitialized),
            (_, Close) => Ok(Closed),

            (Uninitialized, Prepare) => Ok(Prepared),
            (Uninitialized, Start | Stop) => Err(ReporterError::lifecycle_order(format!(
                "Attempt to {} without preparing: reporter not prepared",
                transition.verb()
            ))),

            (Prepared | Started | Stopped, Prepare) => Err(ReporterError::lifecycle_order(
                "Reporter already prepared; prepare may only run once",
            )),

            (Prepared, Start) => Ok(Started),
            (Started, Start) => Err(ReporterError::lifecycle_order("Reporter already started")),
            (Stopped, Start) => Err(ReporterError::lifecycle_order(
                "Reporter already stopped; a stopped reporter cannot be restarted",
            )),

            (Prepared | Started | Stopped, Stop) => Ok(Stopped),

            (Closed, Prepare | Start | Stop) => Err(ReporterError::lifecycle_order(format!(
                "Attempt to {} a closed reporter",
                transition.verb()
            ))),
        }
    }

    pub fn is_prepared(self) -> bool {
        matches!(
            self,
            ReporterState::Prepared | ReporterState::Started | ReporterState::Stopped
        )
    }
}

impl std::fmt::Display for ReporterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReporterState::Uninitialized => "uninitialized",
            ReporterState::Prepared => "prepared",
            ReporterState::Started => "started",
            ReporterState::Stopped => "stopped",
            ReporterState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A metrics reporter driven by a single owning thread.
///
/// - `prepare` runs exactly once and wires the inner export engine; on error
///   the reporter stays [`ReporterState::Uninitialized`].
/// - `start`/`stop` fail with a lifecycle-order error before `prepare`.
/// - `close` releases resources, never fails and may be called repeatedly.
///   Before `prepare` it does nothing.
pub trait Reporter: Send {
    /// Plugin identifier of this reporter (`csv`, `console`, ...).
    fn name(&self) -> &str;

    fn state(&self) -> ReporterState;

    fn prepare(&mut self, registry: Arc<dyn MetricRegistry>, config: &ReporterConfig)
    -> Result<()>;

    fn start(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn close(&mut self);
}
