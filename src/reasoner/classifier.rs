//! Classifier trait: the seam to the EL++ subsumption engine

use crate::compile::CompileError;
use crate::graph::ConceptId;
use crate::model::{ConceptModel, ConceptRegistry};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur in the reasoner layer
#[derive(Debug, Error)]
pub enum ReasonerError {
    /// The classifier cannot apply this change incrementally; fall back to a
    /// full extract, load and compute cycle
    #[error("incremental update of concept {concept} unsupported: {reason}")]
    IncrementalUnsupported { concept: ConceptId, reason: String },

    #[error("classifier has no model loaded")]
    NotLoaded,

    #[error("classifier has not computed inferences")]
    NotClassified,

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("background task failed: {0}")]
    Join(String),
}

/// Result type for reasoner operations
pub type ReasonerResult<T> = Result<T, ReasonerError>;

impl ReasonerError {
    pub fn is_incremental_unsupported(&self) -> bool {
        matches!(self, Self::IncrementalUnsupported { .. })
    }
}

/// An EL++ classifier consuming the compiled model
///
/// Implementations are driven by the reasoner adapter, which serializes every
/// call; no method is invoked concurrently with another.
pub trait Classifier: Send + Sync {
    /// Build internal structures from the registry's classification set
    fn load(&mut self, registry: &ConceptRegistry) -> ReasonerResult<()>;

    /// Compute inferences for the loaded model
    ///
    /// May be a no-op for classifiers that classify eagerly on load.
    fn classify(&mut self) -> ReasonerResult<()>;

    /// Stage one recompiled concept
    ///
    /// Returns [`ReasonerError::IncrementalUnsupported`] if the change cannot
    /// be applied without a full reload.
    fn apply_incremental(&mut self, registry: &ConceptRegistry, model: &ConceptModel) -> ReasonerResult<()>;

    /// Make staged incremental changes visible to queries
    fn flush(&mut self) -> ReasonerResult<()>;

    /// Direct inferred parents
    fn parents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>>;

    /// Direct inferred children
    fn children(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>>;

    /// Concepts inferred equivalent to `concept`, excluding itself
    fn equivalents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>>;
}
