//! Knowledge store trait definitions

use crate::graph::{AxiomGraph, ConceptId, GraphError};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::Arc;
use thiserror::Error;

/// Identifier of a pattern (a semantic's schema, e.g. "stated EL++ axioms")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(i32);

impl PatternId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a semantic (one stated definition attached to a concept)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticId(i32);

impl SemanticId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for SemanticId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during knowledge store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Pattern not found: {0}")]
    PatternNotFound(PatternId),

    #[error("Semantic not found: {0}")]
    SemanticNotFound(SemanticId),

    #[error("Concept not found: {0}")]
    ConceptNotFound(ConceptId),

    #[error("Malformed axiom graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for knowledge store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// The latest version of a stated-axiom semantic under the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticVersion {
    pub semantic: SemanticId,
    /// The concept this stated definition belongs to
    pub referenced_concept: ConceptId,
}

/// The version of the pattern being iterated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternVersion {
    pub pattern: PatternId,
    pub name: String,
}

/// Callback invoked once per semantic during iteration; `Break` ends it
pub type SemanticVisitor<'a> =
    &'a (dyn Fn(&SemanticVersion, &PatternVersion) -> ControlFlow<()> + Sync);

/// Read-only query surface of the versioned knowledge store
///
/// Implementations must be thread-safe (Send + Sync): a parallel iteration
/// invokes the visitor from several threads, and visitors call back into
/// `is_active` and `axiom_graph`.
pub trait KnowledgeStore: Send + Sync {
    /// Number of semantics of `pattern`, for progress reporting
    fn semantic_count(&self, pattern: PatternId) -> StoreResult<usize>;

    /// Invoke `visit` for every semantic of `pattern`
    ///
    /// With `parallel` set the visitor may run concurrently on several
    /// threads, in no particular order. After a visitor returns `Break` no
    /// further semantics are handed out; calls already running finish.
    /// Returns once every started call has finished.
    fn for_each_semantic(
        &self,
        pattern: PatternId,
        parallel: bool,
        visit: SemanticVisitor<'_>,
    ) -> StoreResult<()>;

    /// Is the latest version of `concept` active under the current view?
    fn is_active(&self, concept: ConceptId) -> StoreResult<bool>;

    /// The current axiom graph held by `semantic`
    fn axiom_graph(&self, semantic: SemanticId) -> StoreResult<Arc<AxiomGraph>>;
}
