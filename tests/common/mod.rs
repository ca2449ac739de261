//! Common test utilities for compiler integration tests
//!
//! Graph builders for the documented scenarios and a seeded random corpus
//! generator for the concurrency properties.

#![allow(dead_code)]

pub mod corpus;
pub mod graphs;

pub use corpus::{random_corpus, CorpusShape};
pub use graphs::{
    bad_operator, grouped_roles, necessary, property_chain, scenario_a, scenario_b, EXISTS, GROUP,
};

use taxon::{ConceptId, PatternId};

/// Pattern every fixture stores its stated definitions under
pub const STATED: PatternId = PatternId::new(1);

pub fn id(n: i32) -> ConceptId {
    ConceptId::new(n)
}
