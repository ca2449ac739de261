//! Compilation errors

use crate::graph::{ConceptId, Meaning, VertexIndex};
use crate::store::StoreError;
use thiserror::Error;

/// Errors raised while compiling stated definitions
#[derive(Debug, Error)]
pub enum CompileError {
    /// The graph's shape violates what the walker accepts
    #[error("structural error in concept {concept} at vertex {vertex} ({meaning}): {reason}; subgraph: {subgraph}")]
    Structural {
        concept: ConceptId,
        vertex: VertexIndex,
        meaning: Meaning,
        reason: String,
        subgraph: String,
    },

    /// A ROLE vertex uses an operator other than existential restriction
    #[error("unsupported role operator {operator} in concept {concept} at vertex {vertex}; subgraph: {subgraph}")]
    UnsupportedOperator {
        concept: ConceptId,
        vertex: VertexIndex,
        operator: ConceptId,
        subgraph: String,
    },

    #[error("concept {concept} references missing vertex {vertex}")]
    DanglingVertex {
        concept: ConceptId,
        vertex: VertexIndex,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{} active concepts have no definitions", .concepts.len())]
    MissingDefinitions { concepts: Vec<ConceptId> },

    #[error("compilation cancelled")]
    Cancelled,
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

impl CompileError {
    /// The concept whose graph caused the error, if any
    pub fn concept(&self) -> Option<ConceptId> {
        match self {
            Self::Structural { concept, .. }
            | Self::UnsupportedOperator { concept, .. }
            | Self::DanglingVertex { concept, .. } => Some(*concept),
            Self::Store(_) | Self::MissingDefinitions { .. } | Self::Cancelled => None,
        }
    }

    /// True for errors caused by the shape of one concept's graph
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Structural { .. } | Self::UnsupportedOperator { .. } | Self::DanglingVertex { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_message_names_concept_and_vertex() {
        let err = CompileError::Structural {
            concept: ConceptId::new(12),
            vertex: VertexIndex::new(3),
            meaning: Meaning::And,
            reason: "AND has no operands".to_string(),
            subgraph: "AND".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "structural error in concept 12 at vertex #3 (AND): AND has no operands; subgraph: AND"
        );
        assert_eq!(err.concept(), Some(ConceptId::new(12)));
        assert!(err.is_structural());
    }

    #[test]
    fn unsupported_operator_names_operator() {
        let err = CompileError::UnsupportedOperator {
            concept: ConceptId::new(4),
            vertex: VertexIndex::new(2),
            operator: ConceptId::new(77),
            subgraph: "ROLE(type=9, op=77)".to_string(),
        };
        assert!(err.to_string().contains("unsupported role operator 77"));
        assert!(err.is_structural());
    }

    #[test]
    fn missing_definitions_counts_concepts() {
        let err = CompileError::MissingDefinitions {
            concepts: vec![ConceptId::new(1), ConceptId::new(2)],
        };
        assert_eq!(err.to_string(), "2 active concepts have no definitions");
        assert_eq!(err.concept(), None);
        assert!(!err.is_structural());
    }
}
