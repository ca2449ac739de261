//! In-memory knowledge store, loadable from a JSON corpus file

use super::traits::{
    KnowledgeStore, PatternId, PatternVersion, SemanticId, SemanticVersion, SemanticVisitor,
    StoreError, StoreResult,
};
use crate::graph::{AxiomGraph, ConceptId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

/// One concept entry of a corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConcept {
    pub id: ConceptId,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Semantic id of the stated definition; defaults to the concept id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<AxiomGraph>,
}

fn default_active() -> bool {
    true
}

/// Diagnostic corpus format: one pattern and its concepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFile {
    pub pattern: PatternVersion,
    pub concepts: Vec<CorpusConcept>,
}

#[derive(Debug)]
struct PatternEntry {
    version: PatternVersion,
    semantics: Vec<SemanticVersion>,
}

/// A knowledge store held entirely in memory
///
/// Built up front with `&mut self` methods, then shared behind an `Arc`.
/// Parallel iteration fans out over the rayon thread pool.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patterns: HashMap<PatternId, PatternEntry>,
    graphs: HashMap<SemanticId, Arc<AxiomGraph>>,
    status: HashMap<ConceptId, bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern, replacing its name if it already exists
    pub fn insert_pattern(&mut self, pattern: PatternId, name: impl Into<String>) {
        let version = PatternVersion {
            pattern,
            name: name.into(),
        };
        self.patterns
            .entry(pattern)
            .and_modify(|e| e.version = version.clone())
            .or_insert(PatternEntry {
                version,
                semantics: Vec::new(),
            });
    }

    /// Set whether the latest version of `concept` is active
    pub fn insert_concept(&mut self, concept: ConceptId, active: bool) {
        self.status.insert(concept, active);
    }

    /// Attach a stated definition to `concept`
    ///
    /// Unknown concepts are registered as active. Re-inserting an existing
    /// semantic replaces its graph.
    pub fn insert_stated_definition(
        &mut self,
        pattern: PatternId,
        semantic: SemanticId,
        concept: ConceptId,
        graph: AxiomGraph,
    ) {
        self.status.entry(concept).or_insert(true);
        let entry = self.patterns.entry(pattern).or_insert_with(|| PatternEntry {
            version: PatternVersion {
                pattern,
                name: format!("pattern {}", pattern),
            },
            semantics: Vec::new(),
        });
        if !entry.semantics.iter().any(|s| s.semantic == semantic) {
            entry.semantics.push(SemanticVersion {
                semantic,
                referenced_concept: concept,
            });
        }
        self.graphs.insert(semantic, Arc::new(graph));
    }

    pub fn from_corpus(corpus: CorpusFile) -> Self {
        let mut store = Self::new();
        let pattern = corpus.pattern.pattern;
        store.insert_pattern(pattern, corpus.pattern.name);
        for concept in corpus.concepts {
            store.insert_concept(concept.id, concept.active);
            if let Some(graph) = concept.graph {
                let semantic = concept
                    .semantic
                    .unwrap_or_else(|| SemanticId::new(concept.id.get()));
                store.insert_stated_definition(pattern, semantic, concept.id, graph);
            }
        }
        store
    }

    /// Load a JSON corpus file
    pub fn load_json(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let corpus: CorpusFile = serde_json::from_str(&text)?;
        Ok(Self::from_corpus(corpus))
    }
}

impl KnowledgeStore for MemoryStore {
    fn semantic_count(&self, pattern: PatternId) -> StoreResult<usize> {
        self.patterns
            .get(&pattern)
            .map(|e| e.semantics.len())
            .ok_or(StoreError::PatternNotFound(pattern))
    }

    fn for_each_semantic(
        &self,
        pattern: PatternId,
        parallel: bool,
        visit: SemanticVisitor<'_>,
    ) -> StoreResult<()> {
        let entry = self
            .patterns
            .get(&pattern)
            .ok_or(StoreError::PatternNotFound(pattern))?;
        let version = &entry.version;
        if parallel {
            // rayon stops scheduling new items once one returns `Err`
            let _ = entry
                .semantics
                .par_iter()
                .try_for_each(|s| match visit(s, version) {
                    ControlFlow::Continue(()) => Ok(()),
                    ControlFlow::Break(()) => Err(()),
                });
        } else {
            let _ = entry.semantics.iter().try_for_each(|s| visit(s, version));
        }
        Ok(())
    }

    fn is_active(&self, concept: ConceptId) -> StoreResult<bool> {
        self.status
            .get(&concept)
            .copied()
            .ok_or(StoreError::ConceptNotFound(concept))
    }

    fn axiom_graph(&self, semantic: SemanticId) -> StoreResult<Arc<AxiomGraph>> {
        self.graphs
            .get(&semantic)
            .cloned()
            .ok_or(StoreError::SemanticNotFound(semantic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vertex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn necessary(parent: i32) -> AxiomGraph {
        let mut b = AxiomGraph::builder();
        let set = b.child(b.root(), Vertex::NecessarySet);
        b.child(set, Vertex::concept(parent));
        b.build().unwrap()
    }

    fn sample_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let pattern = PatternId::new(1);
        store.insert_pattern(pattern, "stated");
        for id in 1..=50 {
            store.insert_stated_definition(
                pattern,
                SemanticId::new(1000 + id),
                ConceptId::new(id),
                necessary(100),
            );
        }
        store.insert_concept(ConceptId::new(50), false);
        store
    }

    #[test]
    fn counts_and_lookups() {
        let store = sample_store();
        assert_eq!(store.semantic_count(PatternId::new(1)).unwrap(), 50);
        assert!(store.is_active(ConceptId::new(1)).unwrap());
        assert!(!store.is_active(ConceptId::new(50)).unwrap());
        assert!(store.axiom_graph(SemanticId::new(1001)).is_ok());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let store = sample_store();
        assert!(matches!(
            store.semantic_count(PatternId::new(9)),
            Err(StoreError::PatternNotFound(_))
        ));
        assert!(matches!(
            store.is_active(ConceptId::new(999)),
            Err(StoreError::ConceptNotFound(_))
        ));
        assert!(matches!(
            store.axiom_graph(SemanticId::new(1)),
            Err(StoreError::SemanticNotFound(_))
        ));
    }

    #[test]
    fn parallel_iteration_visits_every_semantic_once() {
        let store = sample_store();
        let seen = AtomicUsize::new(0);
        store
            .for_each_semantic(PatternId::new(1), true, &|_, pattern| {
                assert_eq!(pattern.name, "stated");
                seen.fetch_add(1, Ordering::Relaxed);
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn break_stops_sequential_iteration() {
        let store = sample_store();
        let seen = AtomicUsize::new(0);
        store
            .for_each_semantic(PatternId::new(1), false, &|_, _| {
                if seen.fetch_add(1, Ordering::Relaxed) + 1 == 5 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn break_stops_parallel_iteration() {
        let store = sample_store();
        let seen = AtomicUsize::new(0);
        store
            .for_each_semantic(PatternId::new(1), true, &|_, _| {
                seen.fetch_add(1, Ordering::Relaxed);
                ControlFlow::Break(())
            })
            .unwrap();
        let seen = seen.load(Ordering::Relaxed);
        let limit = rayon::current_num_threads() * 2;
        assert!((1..=limit).contains(&seen), "{} visits with {} threads", seen, limit / 2);
    }

    #[test]
    fn reinserting_semantic_replaces_graph() {
        let mut store = sample_store();
        store.insert_stated_definition(
            PatternId::new(1),
            SemanticId::new(1001),
            ConceptId::new(1),
            AxiomGraph::empty(),
        );
        assert_eq!(store.semantic_count(PatternId::new(1)).unwrap(), 50);
        assert!(store.axiom_graph(SemanticId::new(1001)).unwrap().is_empty());
    }

    #[test]
    fn corpus_file_loads() {
        let json = serde_json::json!({
            "pattern": { "pattern": 3, "name": "EL++ stated axioms" },
            "concepts": [
                { "id": 7, "graph": { "vertices": [
                    { "meaning": "DEFINITION_ROOT", "children": [1] },
                    { "meaning": "NECESSARY_SET", "children": [2] },
                    { "meaning": "CONCEPT", "concept": 3 }
                ] } },
                { "id": 3, "active": false }
            ]
        });
        let corpus: CorpusFile = serde_json::from_value(json).unwrap();
        let store = MemoryStore::from_corpus(corpus);

        assert_eq!(store.semantic_count(PatternId::new(3)).unwrap(), 1);
        assert!(store.is_active(ConceptId::new(7)).unwrap());
        assert!(!store.is_active(ConceptId::new(3)).unwrap());
        assert!(store.axiom_graph(SemanticId::new(7)).is_ok());
    }
}
