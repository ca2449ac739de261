//! Reporting seams: progress callbacks and the out-of-band alert channel

use super::error::CompileError;
use crate::graph::ConceptId;
use crate::store::SemanticId;
use parking_lot::Mutex;

/// Receives `(done, total)` while a batch run progresses
pub trait ProgressSink: Send + Sync {
    fn update_progress(&self, done: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn update_progress(&self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Logs progress at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update_progress(&self, done: usize, total: usize) {
        tracing::debug!(done, total, "compilation progress");
    }
}

/// What kind of problem an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Malformed graph or unsupported construct
    Structural,
    /// The knowledge store could not answer
    Store,
    /// An active concept ended without definitions
    MissingDefinitions,
}

/// A per-concept problem raised during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub concept: Option<ConceptId>,
    pub semantic: Option<SemanticId>,
    pub message: String,
}

impl Alert {
    pub fn from_error(concept: ConceptId, semantic: SemanticId, error: &CompileError) -> Self {
        let kind = if error.is_structural() {
            AlertKind::Structural
        } else {
            AlertKind::Store
        };
        Self {
            kind,
            concept: Some(concept),
            semantic: Some(semantic),
            message: error.to_string(),
        }
    }

    pub fn missing_definitions(concept: ConceptId) -> Self {
        Self {
            kind: AlertKind::MissingDefinitions,
            concept: Some(concept),
            semantic: None,
            message: format!("active concept {} has no definitions", concept),
        }
    }
}

/// Out-of-band channel for per-concept failures
///
/// Batch compilation never aborts on a bad concept; it raises an alert and
/// moves on.
pub trait AlertSink: Send + Sync {
    fn alert(&self, alert: Alert);
}

/// Logs alerts as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn alert(&self, alert: Alert) {
        tracing::warn!(
            kind = ?alert.kind,
            concept = ?alert.concept,
            semantic = ?alert.semantic,
            "{}",
            alert.message
        );
    }
}

/// Keeps alerts in memory (and logs them) so callers can inspect them afterwards
#[derive(Debug, Default)]
pub struct CollectedAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl CollectedAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }

    /// Drain the collected alerts, ordered by concept id
    pub fn take(&self) -> Vec<Alert> {
        let mut alerts = std::mem::take(&mut *self.alerts.lock());
        alerts.sort_by_key(|a| a.concept);
        alerts
    }
}

impl AlertSink for CollectedAlerts {
    fn alert(&self, alert: Alert) {
        LogAlerts.alert(alert.clone());
        self.alerts.lock().push(alert);
    }
}
