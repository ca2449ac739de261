//! DefinitionCompiler: walks one concept's graph and stores the result

use super::error::CompileResult;
use super::walker::GraphWalker;
use crate::config::Vocabulary;
use crate::graph::{AxiomGraph, ConceptId};
use crate::model::{ConceptModel, ConceptRegistry, Definition};
use std::sync::Arc;

/// Compiles a concept's graph and replaces its definitions wholesale
///
/// Identical definitions stated twice in one graph are kept once. A failed
/// walk leaves the concept with no definitions, never a partial list.
#[derive(Debug, Clone)]
pub struct DefinitionCompiler {
    walker: GraphWalker,
    registry: Arc<ConceptRegistry>,
}

impl DefinitionCompiler {
    pub fn new(registry: Arc<ConceptRegistry>, vocabulary: Vocabulary) -> Self {
        Self {
            walker: GraphWalker::new(registry.clone(), vocabulary),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<ConceptRegistry> {
        &self.registry
    }

    /// Compile `graph` into `concept`'s model
    pub fn compile(&self, concept: ConceptId, graph: &AxiomGraph) -> CompileResult<Arc<ConceptModel>> {
        let model = self.registry.get_or_create_concept(concept);
        match self.walker.compile(concept, graph) {
            Ok(definitions) => {
                model.replace_definitions(dedup(definitions));
                Ok(model)
            }
            Err(e) => {
                model.clear_definitions();
                Err(e)
            }
        }
    }
}

/// Drop repeated definitions, keeping first-seen order
fn dedup(definitions: Vec<Definition>) -> Vec<Definition> {
    let mut unique: Vec<Definition> = Vec::with_capacity(definitions.len());
    for definition in definitions {
        if !unique.contains(&definition) {
            unique.push(definition);
        }
    }
    unique
}
