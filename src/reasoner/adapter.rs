//! ReasonerAdapter: async facade over compilation and the live classifier
//!
//! Every operation takes the classifier lock for its whole duration, so a
//! batch extract, an incremental update and a query never overlap. CPU-bound
//! compilation runs on the blocking pool.

use super::classifier::{Classifier, ReasonerError, ReasonerResult};
use crate::compile::{
    AlertSink, CancellationToken, CorpusCompiler, IncrementalCompiler, LogAlerts, ProgressSink,
    Statistics,
};
use crate::config::CompilerConfig;
use crate::graph::{AxiomGraph, ConceptId};
use crate::model::{ConceptModel, ConceptRegistry};
use crate::store::KnowledgeStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Drives extraction, loading, classification and incremental updates
pub struct ReasonerAdapter {
    store: Arc<dyn KnowledgeStore>,
    registry: Arc<ConceptRegistry>,
    config: CompilerConfig,
    classifier: Mutex<Box<dyn Classifier>>,
    progress: Option<Arc<dyn ProgressSink>>,
    alerts: Arc<dyn AlertSink>,
    cancel: CancellationToken,
}

impl ReasonerAdapter {
    pub fn new(store: Arc<dyn KnowledgeStore>, config: CompilerConfig, classifier: impl Classifier + 'static) -> Self {
        Self {
            store,
            registry: Arc::new(ConceptRegistry::new()),
            config,
            classifier: Mutex::new(Box::new(classifier)),
            progress: None,
            alerts: Arc::new(LogAlerts),
            cancel: CancellationToken::new(),
        }
    }

    /// Share an existing registry instead of a private one
    pub fn with_registry(mut self, registry: Arc<ConceptRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn registry(&self) -> &Arc<ConceptRegistry> {
        &self.registry
    }

    /// Token that abandons an in-flight extraction
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Reset the registry and compile the whole stated-axiom pattern
    pub async fn extract_data(&self) -> ReasonerResult<Statistics> {
        let _classifier = self.classifier.lock().await;
        self.extract().await
    }

    /// Hand the compiled model to the classifier
    pub async fn load_data(&self) -> ReasonerResult<()> {
        let mut classifier = self.classifier.lock().await;
        classifier.load(&self.registry)
    }

    pub async fn compute_inferences(&self) -> ReasonerResult<()> {
        let mut classifier = self.classifier.lock().await;
        classifier.classify()
    }

    /// Extract, load and compute in one locked sequence
    ///
    /// The fallback when [`process_incremental`](Self::process_incremental)
    /// reports [`ReasonerError::IncrementalUnsupported`].
    pub async fn full_refresh(&self) -> ReasonerResult<Statistics> {
        let mut classifier = self.classifier.lock().await;
        let stats = self.extract().await?;
        classifier.load(&self.registry)?;
        classifier.classify()?;
        Ok(stats)
    }

    /// Recompile `concept` from `graph` and push it into the live classifier
    ///
    /// The registry is updated even when the classifier then rejects the
    /// change; the caller is expected to follow up with
    /// [`full_refresh`](Self::full_refresh) after updating the store.
    pub async fn process_incremental(&self, concept: ConceptId, graph: AxiomGraph) -> ReasonerResult<Arc<ConceptModel>> {
        let mut classifier = self.classifier.lock().await;
        let compiler = IncrementalCompiler::new(self.registry.clone(), self.config.vocabulary());
        let model = tokio::task::spawn_blocking(move || compiler.recompile(concept, &graph))
            .await
            .map_err(|e| ReasonerError::Join(e.to_string()))??;

        if let Err(e) = classifier.apply_incremental(&self.registry, &model) {
            if e.is_incremental_unsupported() {
                tracing::warn!(concept = %concept, "incremental update unsupported, full refresh required");
            }
            return Err(e);
        }
        classifier.flush()?;
        Ok(model)
    }

    pub async fn get_parents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        self.classifier.lock().await.parents(concept)
    }

    pub async fn get_children(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        self.classifier.lock().await.children(concept)
    }

    pub async fn get_equivalents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        self.classifier.lock().await.equivalents(concept)
    }

    /// Caller holds the classifier lock
    async fn extract(&self) -> ReasonerResult<Statistics> {
        self.registry.reset();
        let mut corpus = CorpusCompiler::new(self.store.clone(), self.registry.clone(), self.config.clone())
            .with_alerts(self.alerts.clone())
            .with_cancellation(self.cancel.clone());
        if let Some(progress) = &self.progress {
            corpus = corpus.with_progress(progress.clone());
        }
        let stats = tokio::task::spawn_blocking(move || corpus.compile_stated())
            .await
            .map_err(|e| ReasonerError::Join(e.to_string()))??;
        Ok(stats)
    }
}
