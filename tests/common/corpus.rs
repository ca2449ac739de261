//! Seeded random corpora

use super::graphs::{EXISTS, GROUP};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use taxon::store::{CorpusConcept, CorpusFile, PatternVersion};
use taxon::{AxiomGraph, ConceptId, Vertex};

/// Knobs for [`random_corpus`]
#[derive(Debug, Clone)]
pub struct CorpusShape {
    pub concepts: i32,
    /// Percentage of concepts stated inactive
    pub inactive_percent: u32,
    /// Percentage of concepts stated with a non-existential operator
    pub broken_percent: u32,
    pub max_parents: usize,
    pub max_roles: usize,
}

impl Default for CorpusShape {
    fn default() -> Self {
        Self {
            concepts: 500,
            inactive_percent: 10,
            broken_percent: 3,
            max_parents: 3,
            max_roles: 4,
        }
    }
}

/// Role types live above the concept id range
const ROLE_BASE: i32 = 10_000;

/// A corpus of concepts `1..=shape.concepts`; each states parents with
/// smaller ids, some ungrouped roles and sometimes one role group
pub fn random_corpus(seed: u64, shape: &CorpusShape) -> CorpusFile {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut concepts = Vec::with_capacity(shape.concepts as usize);
    concepts.push(CorpusConcept {
        id: ConceptId::new(1),
        active: true,
        semantic: None,
        graph: None,
    });

    for id in 2..=shape.concepts {
        let active = rng.gen_range(0..100) >= shape.inactive_percent;
        let broken = rng.gen_range(0..100) < shape.broken_percent;
        let graph = random_graph(&mut rng, id, broken, shape);
        concepts.push(CorpusConcept {
            id: ConceptId::new(id),
            active,
            semantic: Some(taxon::SemanticId::new(100_000 + id)),
            graph: Some(graph),
        });
    }

    CorpusFile {
        pattern: PatternVersion {
            pattern: super::STATED,
            name: "stated EL++ axioms".to_string(),
        },
        concepts,
    }
}

fn random_graph(rng: &mut StdRng, id: i32, broken: bool, shape: &CorpusShape) -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let kind = if rng.gen_bool(0.3) {
        Vertex::SufficientSet
    } else {
        Vertex::NecessarySet
    };
    let set = b.child(b.root(), kind);
    let and = b.child(set, Vertex::And);

    for _ in 0..rng.gen_range(1..=shape.max_parents) {
        b.child(and, Vertex::concept(rng.gen_range(1..id)));
    }
    for _ in 0..rng.gen_range(0..=shape.max_roles) {
        let operator = if broken { EXISTS + 1 } else { EXISTS };
        let r = b.child(and, Vertex::role(ROLE_BASE + rng.gen_range(0..20), operator));
        b.child(r, Vertex::concept(rng.gen_range(1..id)));
    }
    if rng.gen_bool(0.25) {
        let group = b.child(and, Vertex::role(GROUP, EXISTS));
        let inner = b.child(group, Vertex::And);
        for _ in 0..rng.gen_range(1..=3) {
            let r = b.child(inner, Vertex::role(ROLE_BASE + rng.gen_range(0..20), EXISTS));
            b.child(r, Vertex::concept(rng.gen_range(1..id)));
        }
    }
    b.build().unwrap()
}
