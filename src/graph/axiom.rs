//! AxiomGraph: the rooted DAG encoding one concept's stated definition

use super::node::{Vertex, VertexIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling or deserializing an axiom graph
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error("vertex {parent} references missing child {child}")]
    DanglingChild { parent: VertexIndex, child: usize },

    #[error("graph contains a cycle through vertex {0}")]
    Cycle(VertexIndex),

    #[error("vertex {0} is not reachable from the root")]
    Unreachable(VertexIndex),

    #[error("vertex {child} linked under missing parent {parent}")]
    MissingParent { parent: VertexIndex, child: VertexIndex },
}

/// Result type for graph construction
pub type GraphResult<T> = Result<T, GraphError>;

/// Longest diagnostic rendering of a subgraph, in bytes
pub const RENDER_LIMIT: usize = 4096;

/// A vertex together with its ordered children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxiomNode {
    #[serde(flatten)]
    pub vertex: Vertex,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VertexIndex>,
}

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    vertices: Vec<AxiomNode>,
}

/// A validated axiom graph
///
/// Vertex 0 is the root. Every child index resolves, every vertex is
/// reachable from the root and there are no cycles; shared children are
/// allowed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct AxiomGraph {
    vertices: Vec<AxiomNode>,
}

impl TryFrom<RawGraph> for AxiomGraph {
    type Error = GraphError;

    fn try_from(raw: RawGraph) -> GraphResult<Self> {
        Self::from_nodes(raw.vertices)
    }
}

impl AxiomGraph {
    /// A graph with no vertices; compiles to no definitions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a graph whose root is a `DEFINITION_ROOT`
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Validate and wrap a flat vertex list
    pub fn from_nodes(vertices: Vec<AxiomNode>) -> GraphResult<Self> {
        let graph = Self { vertices };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> GraphResult<()> {
        for (i, node) in self.vertices.iter().enumerate() {
            for child in &node.children {
                if child.get() >= self.vertices.len() {
                    return Err(GraphError::DanglingChild {
                        parent: VertexIndex::new(i),
                        child: child.get(),
                    });
                }
            }
        }
        if self.vertices.is_empty() {
            return Ok(());
        }

        // 0 = unvisited, 1 = on stack, 2 = done
        let mut state = vec![0u8; self.vertices.len()];
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        state[0] = 1;
        while let Some(top) = stack.last_mut() {
            let (index, next) = *top;
            let children = &self.vertices[index].children;
            if next < children.len() {
                top.1 += 1;
                let child = children[next].get();
                match state[child] {
                    0 => {
                        state[child] = 1;
                        stack.push((child, 0));
                    }
                    1 => return Err(GraphError::Cycle(VertexIndex::new(child))),
                    _ => {}
                }
            } else {
                state[index] = 2;
                stack.pop();
            }
        }

        match state.iter().position(|s| *s == 0) {
            Some(i) => Err(GraphError::Unreachable(VertexIndex::new(i))),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// The root vertex, if the graph has any vertices
    pub fn root(&self) -> Option<&AxiomNode> {
        self.vertices.first()
    }

    /// Get a vertex by index
    ///
    /// Indices obtained from this graph always resolve; validation guarantees it.
    pub fn node(&self, index: VertexIndex) -> Option<&AxiomNode> {
        self.vertices.get(index.get())
    }

    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.node(index).map(|n| &n.vertex)
    }

    /// Ordered children of a vertex
    pub fn children(&self, index: VertexIndex) -> &[VertexIndex] {
        self.node(index).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate all vertices with their indices
    pub fn nodes(&self) -> impl Iterator<Item = (VertexIndex, &AxiomNode)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, n)| (VertexIndex::new(i), n))
    }

    /// Render the subgraph below `index` as a nested expression,
    /// e.g. `AND(CONCEPT(7), ROLE(type=9, op=1)(CONCEPT(12)))`
    ///
    /// A vertex reached again through another parent is written as its
    /// index (`#4`) instead of being expanded twice. Output longer than
    /// [`RENDER_LIMIT`] bytes is cut and ends with `…`.
    pub fn render(&self, index: VertexIndex) -> String {
        let mut out = String::new();
        let mut seen = vec![false; self.vertices.len()];
        self.render_into(index, &mut seen, &mut out);
        if out.len() > RENDER_LIMIT {
            let mut cut = RENDER_LIMIT;
            while !out.is_char_boundary(cut) {
                cut -= 1;
            }
            out.truncate(cut);
            out.push('…');
        }
        out
    }

    fn render_into(&self, index: VertexIndex, seen: &mut [bool], out: &mut String) {
        if out.len() > RENDER_LIMIT {
            return;
        }
        let (Some(node), Some(visited)) = (self.node(index), seen.get_mut(index.get())) else {
            out.push('?');
            return;
        };
        if std::mem::replace(visited, true) {
            out.push_str(&index.to_string());
            return;
        }
        out.push_str(&node.vertex.label());
        if !node.children.is_empty() {
            out.push('(');
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.render_into(*child, seen, out);
            }
            out.push(')');
        }
    }
}

/// Incremental builder for [`AxiomGraph`]
///
/// The root `DEFINITION_ROOT` vertex is created up front at index 0. The
/// first link under a parent that does not exist is kept and reported by
/// [`GraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    vertices: Vec<AxiomNode>,
    bad_link: Option<GraphError>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_root(Vertex::DefinitionRoot)
    }

    /// Start from an arbitrary root vertex (useful for malformed-input tests)
    pub fn with_root(root: Vertex) -> Self {
        Self {
            vertices: vec![AxiomNode {
                vertex: root,
                children: Vec::new(),
            }],
            bad_link: None,
        }
    }

    pub fn root(&self) -> VertexIndex {
        VertexIndex::ROOT
    }

    /// Add a vertex with no parent yet
    pub fn add(&mut self, vertex: Vertex) -> VertexIndex {
        self.vertices.push(AxiomNode {
            vertex,
            children: Vec::new(),
        });
        VertexIndex::new(self.vertices.len() - 1)
    }

    /// Add a vertex as the last child of `parent`
    pub fn child(&mut self, parent: VertexIndex, vertex: Vertex) -> VertexIndex {
        let index = self.add(vertex);
        self.link(parent, index);
        index
    }

    /// Attach an existing vertex as the last child of `parent`
    pub fn link(&mut self, parent: VertexIndex, child: VertexIndex) {
        match self.vertices.get_mut(parent.get()) {
            Some(node) => node.children.push(child),
            None => {
                self.bad_link
                    .get_or_insert(GraphError::MissingParent { parent, child });
            }
        }
    }

    pub fn build(self) -> GraphResult<AxiomGraph> {
        if let Some(e) = self.bad_link {
            return Err(e);
        }
        AxiomGraph::from_nodes(self.vertices)
    }
}
