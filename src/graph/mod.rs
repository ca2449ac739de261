//! Stated axiom graphs: the read-only input of the compiler

mod axiom;
mod node;


pub use axiom::{AxiomGraph, AxiomNode, GraphBuilder, GraphError, GraphResult, RENDER_LIMIT};
pub use node::{Bound, ConceptId, ConcreteOperator, Literal, Meaning, Vertex, VertexIndex};
