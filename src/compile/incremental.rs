//! IncrementalCompiler: recompiles exactly one concept

use super::definition::DefinitionCompiler;
use super::error::CompileResult;
use crate::config::Vocabulary;
use crate::graph::{AxiomGraph, ConceptId};
use crate::model::{ConceptModel, ConceptRegistry};
use std::sync::Arc;

/// Recompiles one concept from a new graph
///
/// Leaves the batch counters and the classification set alone. Callers must
/// not run two recompilations of the same concept at once, nor overlap one
/// with a batch pass.
#[derive(Debug, Clone)]
pub struct IncrementalCompiler {
    compiler: DefinitionCompiler,
}

impl IncrementalCompiler {
    pub fn new(registry: Arc<ConceptRegistry>, vocabulary: Vocabulary) -> Self {
        Self {
            compiler: DefinitionCompiler::new(registry, vocabulary),
        }
    }

    /// Discard every definition of `concept` and rebuild from `graph`
    ///
    /// If `concept` is also a role type its declared hierarchy is cleared
    /// first, so a removed PROPERTY_SET does not linger. On error the concept
    /// is left with no definitions.
    pub fn recompile(&self, concept: ConceptId, graph: &AxiomGraph) -> CompileResult<Arc<ConceptModel>> {
        let registry = self.compiler.registry();
        let model = registry.get_or_create_concept(concept);
        model.clear_definitions();
        if let Some(role_type) = registry.role_type(concept) {
            role_type.clear_hierarchy();
        }

        let model = self.compiler.compile(concept, graph)?;
        if model.has_definitions() {
            tracing::debug!(concept = %concept, definitions = model.definition_count(), "recompiled");
        } else {
            tracing::warn!(concept = %concept, "recompiled concept has no definitions");
        }
        Ok(model)
    }
}
