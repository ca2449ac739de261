//! Incremental recompilation and the reasoner adapter

mod common;

use common::{id, necessary, property_chain, random_corpus, scenario_a, CorpusShape, STATED};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taxon::{
    AxiomGraph, CompilerConfig, ConceptId, ConceptRegistry, CorpusCompiler, IncrementalCompiler,
    MemoryStore, ReasonerAdapter, ReasonerError, SemanticId, ToldClassifier,
};

fn ids(values: &[i32]) -> BTreeSet<ConceptId> {
    values.iter().map(|v| id(*v)).collect()
}

/// 2 ⊑ 1, 3 ⊑ 2, 4 ⊑ 2, role type 41 with chain 41∘42
fn store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert_pattern(STATED, "stated");
    store.insert_concept(id(1), true);
    for (concept, parent) in [(2, 1), (3, 2), (4, 2)] {
        store.insert_stated_definition(STATED, SemanticId::new(concept), id(concept), necessary(&[parent]));
    }
    store.insert_stated_definition(STATED, SemanticId::new(41), id(41), property_chain(1, 40, &[41, 42]));
    store
}

fn adapter(store: MemoryStore) -> ReasonerAdapter {
    ReasonerAdapter::new(Arc::new(store), CompilerConfig::default(), ToldClassifier::new())
}

#[test]
fn recompiling_with_empty_graph_leaves_zero_definitions() {
    let registry = Arc::new(ConceptRegistry::new());
    let store = Arc::new(store());
    CorpusCompiler::new(store, registry.clone(), CompilerConfig::default())
        .compile_all(STATED)
        .unwrap();
    let before = registry.classification_concept_ids();
    assert!(registry.concept(id(3)).unwrap().has_definitions());

    let incremental = IncrementalCompiler::new(registry.clone(), CompilerConfig::default().vocabulary());
    let model = incremental.recompile(id(3), &AxiomGraph::empty()).unwrap();

    assert_eq!(model.definition_count(), 0);
    assert_eq!(registry.classification_concept_ids(), before);
    assert_eq!(registry.active_count(), 4);
}

#[test]
fn incremental_and_batch_results_match() {
    let corpus = random_corpus(5, &CorpusShape { concepts: 80, ..CorpusShape::default() });
    let registry = Arc::new(ConceptRegistry::new());
    CorpusCompiler::new(
        Arc::new(MemoryStore::from_corpus(corpus.clone())),
        registry.clone(),
        CompilerConfig::default(),
    )
    .compile_all(STATED)
    .unwrap();

    let incremental = IncrementalCompiler::new(registry.clone(), CompilerConfig::default().vocabulary());
    for concept in corpus.concepts.iter().filter(|c| c.active) {
        let Some(graph) = &concept.graph else { continue };
        let batch = registry.concept(concept.id).unwrap().definitions();
        match incremental.recompile(concept.id, graph) {
            Ok(model) => assert_eq!(model.definitions(), batch),
            Err(_) => assert!(batch.is_empty()),
        }
    }
}

#[tokio::test]
async fn adapter_answers_taxonomy_queries() {
    let adapter = adapter(store());
    let stats = adapter.full_refresh().await.unwrap();
    assert_eq!(stats.processed, 4);

    assert_eq!(adapter.get_parents(id(3)).await.unwrap(), ids(&[2]));
    assert_eq!(adapter.get_children(id(2)).await.unwrap(), ids(&[3, 4]));
    assert!(adapter.get_equivalents(id(4)).await.unwrap().is_empty());
}

#[tokio::test]
async fn incremental_update_flows_into_queries() {
    let adapter = adapter(store());
    adapter.extract_data().await.unwrap();
    adapter.load_data().await.unwrap();
    adapter.compute_inferences().await.unwrap();

    adapter.process_incremental(id(5), scenario_a()).await.unwrap();
    assert_eq!(adapter.get_parents(id(5)).await.unwrap(), ids(&[7]));

    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), taxon::Vertex::SufficientSet);
    b.child(set, taxon::Vertex::concept(3));
    adapter.process_incremental(id(4), b.build().unwrap()).await.unwrap();
    assert_eq!(adapter.get_equivalents(id(3)).await.unwrap(), ids(&[4]));
    assert_eq!(adapter.get_children(id(2)).await.unwrap(), ids(&[3]));
}

#[tokio::test]
async fn role_type_change_falls_back_to_full_refresh() {
    let adapter = adapter(store());
    adapter.full_refresh().await.unwrap();

    let err = adapter
        .process_incremental(id(41), property_chain(1, 40, &[41, 43]))
        .await
        .unwrap_err();
    assert!(err.is_incremental_unsupported(), "{}", err);

    adapter.full_refresh().await.unwrap();
    let role = adapter.registry().role_type(id(41)).unwrap();
    assert_eq!(role.chained(), Some(id(42)));
    assert_eq!(adapter.get_parents(id(41)).await.unwrap(), ids(&[1]));
}

#[tokio::test]
async fn queries_before_load_fail() {
    let adapter = adapter(store());
    assert!(matches!(
        adapter.get_parents(id(1)).await,
        Err(ReasonerError::NotLoaded)
    ));
}

#[tokio::test]
async fn progress_reaches_total() {
    let last = Arc::new(AtomicUsize::new(0));
    let seen = last.clone();
    let adapter = adapter(store()).with_progress(Arc::new(move |done: usize, total: usize| {
        assert!(done <= total);
        seen.store(done, Ordering::Relaxed);
    }));
    adapter.extract_data().await.unwrap();
    assert_eq!(last.load(Ordering::Relaxed), 4);
}
