//! Taxon: stated-axiom graph to EL++ model compiler
//!
//! Translates per-concept "stated definition" graphs held in a versioned
//! knowledge store into the concept/role model consumed by an EL++
//! classifier, as a parallel corpus-wide batch or one concept at a time.
//!
//! # Core Concepts
//!
//! - **Axiom graphs**: rooted DAGs of meaning-tagged vertices, one per concept
//! - **Definitions**: equivalence or subsumption conjunctions of named
//!   concepts, existential roles and role groups
//! - **Registry**: shared, resettable store of compiled concept and role-type models
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taxon::{AxiomGraph, ConceptId, ConceptRegistry, DefinitionCompiler, Vertex, Vocabulary};
//!
//! let mut b = AxiomGraph::builder();
//! let set = b.child(b.root(), Vertex::NecessarySet);
//! b.child(set, Vertex::concept(3));
//! let graph = b.build().unwrap();
//!
//! let compiler = DefinitionCompiler::new(Arc::new(ConceptRegistry::new()), Vocabulary::default());
//! let model = compiler.compile(ConceptId::new(7), &graph).unwrap();
//! assert_eq!(model.definition_count(), 1);
//! ```

pub mod compile;
pub mod config;
mod graph;
pub mod model;
pub mod reasoner;
pub mod store;

pub use compile::{
    CancellationToken, CompileError, CompileResult, CorpusCompiler, DefinitionCompiler,
    GraphWalker, IncrementalCompiler, Statistics,
};
pub use config::{CompilerConfig, ConfigError, ConfigResult, Vocabulary};
pub use graph::{
    AxiomGraph, AxiomNode, Bound, ConceptId, ConcreteOperator, GraphBuilder, GraphError,
    GraphResult, Literal, Meaning, Vertex, VertexIndex,
};
pub use model::{
    ConceptModel, ConceptRegistry, ConcreteRestriction, Definition, DefinitionKind, Role,
    RoleGroup, RoleHierarchy, RoleTypeModel,
};
pub use reasoner::{Classifier, ReasonerAdapter, ReasonerError, ReasonerResult, ToldClassifier};
pub use store::{KnowledgeStore, MemoryStore, PatternId, SemanticId, StoreError, StoreResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
