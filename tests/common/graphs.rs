//! Stated-definition graph builders

use taxon::config::DEFAULT_ROLE_GROUP_MARKER;
use taxon::{AxiomGraph, ConceptId, GraphBuilder, Vertex, VertexIndex};

/// Existential-restriction operator in the default vocabulary
pub const EXISTS: i32 = 1;

/// Role-group marker in the default vocabulary
pub const GROUP: i32 = DEFAULT_ROLE_GROUP_MARKER.get();

fn role(b: &mut GraphBuilder, parent: VertexIndex, role_type: i32, filler: i32) {
    let r = b.child(parent, Vertex::role(role_type, EXISTS));
    b.child(r, Vertex::concept(filler));
}

/// `SUFFICIENT_SET(AND(CONCEPT(7), ROLE(existential, 9, CONCEPT(12))))`
pub fn scenario_a() -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::SufficientSet);
    let and = b.child(set, Vertex::And);
    b.child(and, Vertex::concept(7));
    role(&mut b, and, 9, 12);
    b.build().unwrap()
}

/// `NECESSARY_SET(AND(CONCEPT(3), ROLE(existential, GROUP, AND(ROLE(5,6), ROLE(8,9)))))`
pub fn scenario_b() -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::NecessarySet);
    let and = b.child(set, Vertex::And);
    b.child(and, Vertex::concept(3));
    let group = b.child(and, Vertex::role(GROUP, EXISTS));
    let inner = b.child(group, Vertex::And);
    role(&mut b, inner, 5, 6);
    role(&mut b, inner, 8, 9);
    b.build().unwrap()
}

/// `NECESSARY_SET(AND(CONCEPT(p) for p in parents))`
pub fn necessary(parents: &[i32]) -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::NecessarySet);
    let and = b.child(set, Vertex::And);
    for p in parents {
        b.child(and, Vertex::concept(*p));
    }
    b.build().unwrap()
}

/// One role group holding `(role_type, filler)` for each pair, under `⊑ parent`
pub fn grouped_roles(parent: i32, roles: &[(i32, i32)]) -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::NecessarySet);
    let and = b.child(set, Vertex::And);
    b.child(and, Vertex::concept(parent));
    let group = b.child(and, Vertex::role(GROUP, EXISTS));
    let inner = b.child(group, Vertex::And);
    for &(role_type, filler) in roles {
        role(&mut b, inner, role_type, filler);
    }
    b.build().unwrap()
}

/// A role type's own graph: `⊑ parent` plus `PROPERTY_SET(AND(CONCEPT(super), [chain]))`
pub fn property_chain(parent: i32, super_role: i32, chain: &[i32]) -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::NecessarySet);
    b.child(set, Vertex::concept(parent));
    let props = b.child(b.root(), Vertex::PropertySet);
    let and = b.child(props, Vertex::And);
    b.child(and, Vertex::concept(super_role));
    b.child(
        and,
        Vertex::PropertyPatternImplication {
            pattern: chain.iter().map(|c| ConceptId::new(*c)).collect(),
            implication: ConceptId::new(super_role),
        },
    );
    b.build().unwrap()
}

/// A ROLE whose operator is not existential restriction
pub fn bad_operator(operator: i32) -> AxiomGraph {
    let mut b = AxiomGraph::builder();
    let set = b.child(b.root(), Vertex::NecessarySet);
    let and = b.child(set, Vertex::And);
    b.child(and, Vertex::concept(3));
    let r = b.child(and, Vertex::role(9, operator));
    b.child(r, Vertex::concept(12));
    b.build().unwrap()
}
