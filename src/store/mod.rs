//! Knowledge store seam: the versioned substrate holding stated definitions

mod memory;
mod traits;

pub use memory::{CorpusConcept, CorpusFile, MemoryStore};
pub use traits::{
    KnowledgeStore, PatternId, PatternVersion, SemanticId, SemanticVersion, SemanticVisitor,
    StoreError, StoreResult,
};
