//! CorpusCompiler: full-corpus batch compilation
//!
//! One visit per stated-axiom semantic, fanned out by the store when
//! `parallel` is set. Each semantic belongs to exactly one concept and each
//! visit writes only that concept's definition list, so the final model does
//! not depend on thread interleaving.

use super::cancel::CancellationToken;
use super::definition::DefinitionCompiler;
use super::error::{CompileError, CompileResult};
use super::progress::{Alert, AlertSink, LogAlerts, ProgressSink};
use crate::config::CompilerConfig;
use crate::graph::ConceptId;
use crate::model::ConceptRegistry;
use crate::store::{KnowledgeStore, PatternId, PatternVersion, SemanticVersion};
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use serde::Serialize;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of a batch run; every count covers this run only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub pattern: PatternId,
    /// Semantics visited
    pub processed: usize,
    /// Semantics whose concept is active
    pub active: usize,
    pub inactive: usize,
    /// Semantics whose concept failed to compile or could not be read
    pub failed: usize,
    /// Size of the classification concept-id set
    pub classified: usize,
    /// Active concepts that ended with zero definitions
    pub without_definitions: Vec<ConceptId>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pattern {}: processed {}, active {}, inactive {}, failed {}, classified {}, without definitions {} ({} ms)",
            self.pattern,
            self.processed,
            self.active,
            self.inactive,
            self.failed,
            self.classified,
            self.without_definitions.len(),
            self.elapsed_ms
        )
    }
}

/// Per-run bookkeeping shared by the visitors
#[derive(Default)]
struct Run {
    done: AtomicUsize,
    active: AtomicUsize,
    inactive: AtomicUsize,
    failed: AtomicUsize,
    active_concepts: DashSet<ConceptId>,
    failed_concepts: DashSet<ConceptId>,
}

/// Drives compilation of every stated definition of a pattern
#[derive(Clone)]
pub struct CorpusCompiler {
    store: Arc<dyn KnowledgeStore>,
    registry: Arc<ConceptRegistry>,
    compiler: DefinitionCompiler,
    config: CompilerConfig,
    progress: Option<Arc<dyn ProgressSink>>,
    alerts: Arc<dyn AlertSink>,
    cancel: CancellationToken,
}

impl CorpusCompiler {
    pub fn new(store: Arc<dyn KnowledgeStore>, registry: Arc<ConceptRegistry>, config: CompilerConfig) -> Self {
        Self {
            compiler: DefinitionCompiler::new(registry.clone(), config.vocabulary()),
            store,
            registry,
            config,
            progress: None,
            alerts: Arc::new(LogAlerts),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn registry(&self) -> &Arc<ConceptRegistry> {
        &self.registry
    }

    /// Compile the configured stated-axiom pattern
    pub fn compile_stated(&self) -> CompileResult<Statistics> {
        self.compile_all(self.config.stated_axiom_pattern)
    }

    /// Compile every stated-axiom semantic of `pattern`
    ///
    /// Per-concept failures are sent to the alert sink and counted; they never
    /// abort the run. Counters and the classification set are consistent once
    /// this returns. Returns [`CompileError::Cancelled`] if the token fired;
    /// concepts compiled before that point are left in the registry.
    pub fn compile_all(&self, pattern: PatternId) -> CompileResult<Statistics> {
        let started_at = Utc::now();
        let total = self.store.semantic_count(pattern)?;
        tracing::info!(
            pattern = %pattern,
            total,
            parallel = self.config.parallel,
            "compiling stated definitions"
        );

        let run = Run::default();
        let interval = self.config.progress_interval.max(1);
        let visit = |semantic: &SemanticVersion, _version: &PatternVersion| -> ControlFlow<()> {
            self.cancel.checkpoint()?;
            self.compile_semantic(semantic, &run);
            self.registry.record_processed();
            let done = run.done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % interval == 0 {
                self.report(done, total);
            }
            ControlFlow::Continue(())
        };
        self.store
            .for_each_semantic(pattern, self.config.parallel, &visit)?;

        let done = run.done.load(Ordering::Relaxed);
        if self.cancel.is_cancelled() {
            tracing::warn!(pattern = %pattern, done, total, "compilation cancelled");
            return Err(CompileError::Cancelled);
        }
        self.report(done, total);

        let classified = self.registry.compute_classification_set();
        let without_definitions = self
            .registry
            .concepts_without_definitions(run.active_concepts.iter().map(|id| *id));
        for &concept in &without_definitions {
            if !run.failed_concepts.contains(&concept) {
                self.alerts.alert(Alert::missing_definitions(concept));
            }
        }

        let stats = Statistics {
            pattern,
            processed: done,
            active: run.active.load(Ordering::Relaxed),
            inactive: run.inactive.load(Ordering::Relaxed),
            failed: run.failed.load(Ordering::Relaxed),
            classified,
            without_definitions,
            started_at,
            elapsed_ms: (Utc::now() - started_at).num_milliseconds(),
        };
        tracing::info!(
            processed = stats.processed,
            active = stats.active,
            inactive = stats.inactive,
            failed = stats.failed,
            classified = stats.classified,
            elapsed_ms = stats.elapsed_ms,
            "compilation finished"
        );

        if self.config.strict_definitions && !stats.without_definitions.is_empty() {
            return Err(CompileError::MissingDefinitions {
                concepts: stats.without_definitions,
            });
        }
        Ok(stats)
    }

    fn compile_semantic(&self, semantic: &SemanticVersion, run: &Run) {
        let concept = semantic.referenced_concept;
        let result = match self.store.is_active(concept) {
            Ok(true) => {
                self.registry.record_active();
                run.active.fetch_add(1, Ordering::Relaxed);
                run.active_concepts.insert(concept);
                self.store
                    .axiom_graph(semantic.semantic)
                    .map_err(CompileError::from)
                    .and_then(|graph| self.compiler.compile(concept, &graph))
                    .map(|_| ())
            }
            Ok(false) => {
                self.registry.record_inactive();
                run.inactive.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => Err(CompileError::from(e)),
        };

        if let Err(e) = result {
            run.failed.fetch_add(1, Ordering::Relaxed);
            run.failed_concepts.insert(concept);
            self.alerts
                .alert(Alert::from_error(concept, semantic.semantic, &e));
        }
    }

    fn report(&self, done: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress.update_progress(done, total);
        }
    }
}
