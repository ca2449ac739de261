//! GraphWalker: interprets one concept's axiom graph
//!
//! Dispatch is an exhaustive match over [`Vertex`]: a new meaning does not
//! compile until every position in the walk decides what to do with it.
//!
//! Accepted shapes:
//!
//! ```text
//! DEFINITION_ROOT
//! ├── SUFFICIENT_SET | NECESSARY_SET     one definition each
//! │   └── AND | CONCEPT
//! │       ├── CONCEPT                    super-concept
//! │       ├── ROLE(existential, r)       ungrouped role, child CONCEPT filler
//! │       ├── ROLE(existential, marker)  role group, child ROLE | AND
//! │       ├── ROLE_GROUP                 role group, child ROLE | AND
//! │       └── FEATURE | INTERVAL_ROLE    concrete restriction
//! └── PROPERTY_SET                       hierarchy of the role type == this concept
//!     └── AND
//!         ├── CONCEPT                    super role type
//!         └── PROPERTY_PATTERN_IMPLICATION [this, next]
//! ```

use super::error::{CompileError, CompileResult};
use crate::config::Vocabulary;
use crate::graph::{
    AxiomGraph, AxiomNode, Bound, ConceptId, ConcreteOperator, Literal, Vertex, VertexIndex,
};
use crate::model::{
    ConceptRegistry, ConcreteRestriction, Definition, DefinitionKind, Role, RoleGroup,
    RoleHierarchy,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything read from one graph, before it is written to the registry
#[derive(Debug, Default)]
struct CompiledGraph {
    definitions: Vec<Definition>,
    role_hierarchy: Option<RoleHierarchy>,
}

/// Position of the walk: the concept being compiled and its graph
struct Walk<'g> {
    concept: ConceptId,
    graph: &'g AxiomGraph,
}

impl<'g> Walk<'g> {
    fn node(&self, index: VertexIndex) -> CompileResult<&'g AxiomNode> {
        self.graph
            .node(index)
            .ok_or(CompileError::DanglingVertex {
                concept: self.concept,
                vertex: index,
            })
    }

    fn vertex(&self, index: VertexIndex) -> CompileResult<&'g Vertex> {
        self.node(index).map(|n| &n.vertex)
    }

    fn structural(&self, index: VertexIndex, vertex: &Vertex, reason: impl Into<String>) -> CompileError {
        CompileError::Structural {
            concept: self.concept,
            vertex: index,
            meaning: vertex.meaning(),
            reason: reason.into(),
            subgraph: self.graph.render(index),
        }
    }

    /// The root node, or `None` for an empty graph
    fn root(&self) -> CompileResult<Option<&'g AxiomNode>> {
        let Some(root) = self.graph.root() else {
            return Ok(None);
        };
        match root.vertex {
            Vertex::DefinitionRoot => Ok(Some(root)),
            Vertex::SufficientSet
            | Vertex::NecessarySet
            | Vertex::PropertySet
            | Vertex::And
            | Vertex::Concept { .. }
            | Vertex::Role { .. }
            | Vertex::RoleGroup
            | Vertex::PropertyPatternImplication { .. }
            | Vertex::Feature { .. }
            | Vertex::IntervalRole { .. } => Err(self.structural(
                VertexIndex::ROOT,
                &root.vertex,
                "graph root must be DEFINITION_ROOT",
            )),
        }
    }

    /// The only child of `index`
    fn single_child(&self, index: VertexIndex) -> CompileResult<(VertexIndex, &'g Vertex)> {
        let node = self.node(index)?;
        match node.children.as_slice() {
            [child] => Ok((*child, self.vertex(*child)?)),
            children => Err(self.structural(
                index,
                &node.vertex,
                format!("expected exactly one child, found {}", children.len()),
            )),
        }
    }

    /// Operands of an AND; an empty conjunction is malformed
    fn operands(&self, index: VertexIndex) -> CompileResult<&'g [VertexIndex]> {
        let node = self.node(index)?;
        if node.children.is_empty() {
            return Err(self.structural(index, &node.vertex, "AND has no operands"));
        }
        Ok(&node.children)
    }

    /// Vertices with no children of their own must not carry any
    fn leaf(&self, index: VertexIndex) -> CompileResult<()> {
        let node = self.node(index)?;
        if node.children.is_empty() {
            Ok(())
        } else {
            Err(self.structural(
                index,
                &node.vertex,
                format!("expected no children, found {}", node.children.len()),
            ))
        }
    }
}

/// Stateless interpreter of stated axiom graphs
///
/// Holds only the shared registry and the vocabulary; nothing survives from
/// one call to the next. Registry writes are limited to lazily creating
/// referenced models and, for a PROPERTY_SET, replacing the hierarchy of the
/// role type whose id equals the concept being walked.
#[derive(Debug, Clone)]
pub struct GraphWalker {
    registry: Arc<ConceptRegistry>,
    vocabulary: Vocabulary,
}

impl GraphWalker {
    pub fn new(registry: Arc<ConceptRegistry>, vocabulary: Vocabulary) -> Self {
        Self {
            registry,
            vocabulary,
        }
    }

    /// Compile every definition in `graph` for `concept`
    ///
    /// A PROPERTY_SET, if present, is applied to the role type `concept` only
    /// after the whole graph has been read without error. An empty graph
    /// yields no definitions.
    pub fn compile(&self, concept: ConceptId, graph: &AxiomGraph) -> CompileResult<Vec<Definition>> {
        let compiled = self.interpret(concept, graph)?;
        if let Some(hierarchy) = compiled.role_hierarchy {
            self.registry
                .get_or_create_role_type(concept)
                .replace_hierarchy(hierarchy);
        }
        Ok(compiled.definitions)
    }

    /// Apply only the PROPERTY_SET declarations of `graph` to role type `concept`
    ///
    /// Returns whether the graph declared any.
    pub fn compile_role_assertions(&self, concept: ConceptId, graph: &AxiomGraph) -> CompileResult<bool> {
        let walk = Walk { concept, graph };
        let Some(root) = walk.root()? else {
            return Ok(false);
        };
        let mut hierarchy: Option<RoleHierarchy> = None;
        for &index in &root.children {
            if let Vertex::PropertySet = walk.vertex(index)? {
                self.property_set(&walk, index, hierarchy.get_or_insert_with(RoleHierarchy::default))?;
            }
        }
        match hierarchy {
            Some(hierarchy) => {
                self.registry
                    .get_or_create_role_type(concept)
                    .replace_hierarchy(hierarchy);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn interpret(&self, concept: ConceptId, graph: &AxiomGraph) -> CompileResult<CompiledGraph> {
        let walk = Walk { concept, graph };
        let mut compiled = CompiledGraph::default();
        let Some(root) = walk.root()? else {
            return Ok(compiled);
        };

        for &index in &root.children {
            let vertex = walk.vertex(index)?;
            match vertex {
                Vertex::SufficientSet => {
                    let definition = self.definition(&walk, index, DefinitionKind::Equivalence)?;
                    compiled.definitions.push(definition);
                }
                Vertex::NecessarySet => {
                    let definition = self.definition(&walk, index, DefinitionKind::Subsumption)?;
                    compiled.definitions.push(definition);
                }
                Vertex::PropertySet => {
                    let hierarchy = compiled
                        .role_hierarchy
                        .get_or_insert_with(RoleHierarchy::default);
                    self.property_set(&walk, index, hierarchy)?;
                }
                Vertex::DefinitionRoot
                | Vertex::And
                | Vertex::Concept { .. }
                | Vertex::Role { .. }
                | Vertex::RoleGroup
                | Vertex::PropertyPatternImplication { .. }
                | Vertex::Feature { .. }
                | Vertex::IntervalRole { .. } => {
                    return Err(walk.structural(
                        index,
                        vertex,
                        "expected SUFFICIENT_SET, NECESSARY_SET or PROPERTY_SET under the root",
                    ));
                }
            }
        }
        Ok(compiled)
    }

    /// SUFFICIENT_SET / NECESSARY_SET: single child AND or CONCEPT
    fn definition(&self, walk: &Walk<'_>, index: VertexIndex, kind: DefinitionKind) -> CompileResult<Definition> {
        let (child, vertex) = walk.single_child(index)?;
        let mut definition = Definition::new(kind);
        match vertex {
            Vertex::And => self.conjunction(walk, child, &mut definition)?,
            Vertex::Concept { concept } => {
                walk.leaf(child)?;
                self.registry.get_or_create_concept(*concept);
                definition.super_concepts.insert(*concept);
            }
            Vertex::DefinitionRoot
            | Vertex::SufficientSet
            | Vertex::NecessarySet
            | Vertex::PropertySet
            | Vertex::Role { .. }
            | Vertex::RoleGroup
            | Vertex::PropertyPatternImplication { .. }
            | Vertex::Feature { .. }
            | Vertex::IntervalRole { .. } => {
                return Err(walk.structural(child, vertex, "expected AND or CONCEPT as the body of a definition"));
            }
        }
        Ok(definition)
    }

    fn conjunction(&self, walk: &Walk<'_>, index: VertexIndex, definition: &mut Definition) -> CompileResult<()> {
        for &child in walk.operands(index)? {
            let vertex = walk.vertex(child)?;
            match vertex {
                Vertex::Concept { concept } => {
                    walk.leaf(child)?;
                    self.registry.get_or_create_concept(*concept);
                    definition.super_concepts.insert(*concept);
                }
                Vertex::Role {
                    role_type,
                    operator,
                } => {
                    self.require_existential(walk, child, *operator)?;
                    if *role_type == self.vocabulary.role_group_marker {
                        definition.role_groups.insert(self.role_group(walk, child)?);
                    } else {
                        definition.roles.insert(self.role(walk, child, *role_type)?);
                    }
                }
                Vertex::RoleGroup => {
                    definition.role_groups.insert(self.role_group(walk, child)?);
                }
                Vertex::Feature {
                    feature_type,
                    operator,
                    value,
                } => {
                    walk.leaf(child)?;
                    definition
                        .concrete
                        .insert(self.feature(*feature_type, *operator, value));
                }
                Vertex::IntervalRole {
                    role_type,
                    lower,
                    upper,
                } => {
                    walk.leaf(child)?;
                    definition
                        .concrete
                        .insert(self.interval(*role_type, lower, upper));
                }
                Vertex::DefinitionRoot
                | Vertex::SufficientSet
                | Vertex::NecessarySet
                | Vertex::PropertySet
                | Vertex::And
                | Vertex::PropertyPatternImplication { .. } => {
                    return Err(walk.structural(child, vertex, "unexpected operand of AND in a definition"));
                }
            }
        }
        Ok(())
    }

    /// An ungrouped role: its single child is the CONCEPT filler
    fn role(&self, walk: &Walk<'_>, index: VertexIndex, role_type: ConceptId) -> CompileResult<Role> {
        let (child, vertex) = walk.single_child(index)?;
        match vertex {
            Vertex::Concept { concept } => {
                walk.leaf(child)?;
                self.registry.get_or_create_role_type(role_type);
                self.registry.get_or_create_concept(*concept);
                Ok(Role {
                    role_type,
                    filler: *concept,
                })
            }
            Vertex::DefinitionRoot
            | Vertex::SufficientSet
            | Vertex::NecessarySet
            | Vertex::PropertySet
            | Vertex::And
            | Vertex::Role { .. }
            | Vertex::RoleGroup
            | Vertex::PropertyPatternImplication { .. }
            | Vertex::Feature { .. }
            | Vertex::IntervalRole { .. } => Err(walk.structural(child, vertex, "role filler must be a CONCEPT")),
        }
    }

    /// Exactly one role group per call; the single child is a ROLE or an AND of them
    fn role_group(&self, walk: &Walk<'_>, index: VertexIndex) -> CompileResult<RoleGroup> {
        let (child, _) = walk.single_child(index)?;
        let mut group = RoleGroup::new();
        let mut visited = BTreeSet::new();
        self.grouped(walk, child, &mut group, &mut visited)?;
        Ok(group)
    }

    /// Flatten nested ANDs into `group`; a vertex shared by several ANDs is read once
    fn grouped(
        &self,
        walk: &Walk<'_>,
        index: VertexIndex,
        group: &mut RoleGroup,
        visited: &mut BTreeSet<VertexIndex>,
    ) -> CompileResult<()> {
        if !visited.insert(index) {
            return Ok(());
        }
        let vertex = walk.vertex(index)?;
        match vertex {
            Vertex::And => {
                for &child in walk.operands(index)? {
                    self.grouped(walk, child, group, visited)?;
                }
            }
            Vertex::Role {
                role_type,
                operator,
            } => {
                self.require_existential(walk, index, *operator)?;
                if *role_type == self.vocabulary.role_group_marker {
                    return Err(walk.structural(index, vertex, "role group nested inside a role group"));
                }
                group.roles.insert(self.role(walk, index, *role_type)?);
            }
            Vertex::Feature {
                feature_type,
                operator,
                value,
            } => {
                walk.leaf(index)?;
                group.concrete.insert(self.feature(*feature_type, *operator, value));
            }
            Vertex::IntervalRole {
                role_type,
                lower,
                upper,
            } => {
                walk.leaf(index)?;
                group.concrete.insert(self.interval(*role_type, lower, upper));
            }
            Vertex::RoleGroup => {
                return Err(walk.structural(index, vertex, "role group nested inside a role group"));
            }
            Vertex::DefinitionRoot
            | Vertex::SufficientSet
            | Vertex::NecessarySet
            | Vertex::PropertySet
            | Vertex::Concept { .. }
            | Vertex::PropertyPatternImplication { .. } => {
                return Err(walk.structural(index, vertex, "expected ROLE or AND inside a role group"));
            }
        }
        Ok(())
    }

    /// PROPERTY_SET: single AND child of super role types and chain declarations
    fn property_set(&self, walk: &Walk<'_>, index: VertexIndex, hierarchy: &mut RoleHierarchy) -> CompileResult<()> {
        let (child, vertex) = walk.single_child(index)?;
        match vertex {
            Vertex::And => {}
            Vertex::DefinitionRoot
            | Vertex::SufficientSet
            | Vertex::NecessarySet
            | Vertex::PropertySet
            | Vertex::Concept { .. }
            | Vertex::Role { .. }
            | Vertex::RoleGroup
            | Vertex::PropertyPatternImplication { .. }
            | Vertex::Feature { .. }
            | Vertex::IntervalRole { .. } => {
                return Err(walk.structural(child, vertex, "expected AND under PROPERTY_SET"));
            }
        }

        for &operand in walk.operands(child)? {
            let vertex = walk.vertex(operand)?;
            match vertex {
                Vertex::Concept { concept } => {
                    walk.leaf(operand)?;
                    self.registry.get_or_create_role_type(*concept);
                    hierarchy.super_role_types.insert(*concept);
                }
                Vertex::PropertyPatternImplication { pattern, .. } => {
                    walk.leaf(operand)?;
                    let [first, second] = pattern.as_slice() else {
                        return Err(walk.structural(
                            operand,
                            vertex,
                            format!("property chain must have 2 elements, found {}", pattern.len()),
                        ));
                    };
                    if *first != walk.concept {
                        return Err(walk.structural(
                            operand,
                            vertex,
                            format!(
                                "property chain starts with {} but the current role type is {}",
                                first, walk.concept
                            ),
                        ));
                    }
                    if let Some(existing) = hierarchy.chained.filter(|c| c != second) {
                        return Err(walk.structural(
                            operand,
                            vertex,
                            format!("conflicting chain targets {} and {}", existing, second),
                        ));
                    }
                    self.registry.get_or_create_role_type(*second);
                    hierarchy.chained = Some(*second);
                }
                Vertex::DefinitionRoot
                | Vertex::SufficientSet
                | Vertex::NecessarySet
                | Vertex::PropertySet
                | Vertex::And
                | Vertex::Role { .. }
                | Vertex::RoleGroup
                | Vertex::Feature { .. }
                | Vertex::IntervalRole { .. } => {
                    return Err(walk.structural(
                        operand,
                        vertex,
                        "expected CONCEPT or PROPERTY_PATTERN_IMPLICATION in PROPERTY_SET",
                    ));
                }
            }
        }
        Ok(())
    }

    fn require_existential(&self, walk: &Walk<'_>, index: VertexIndex, operator: ConceptId) -> CompileResult<()> {
        if operator == self.vocabulary.existential_operator {
            Ok(())
        } else {
            Err(CompileError::UnsupportedOperator {
                concept: walk.concept,
                vertex: index,
                operator,
                subgraph: walk.graph.render(index),
            })
        }
    }

    fn feature(&self, feature_type: ConceptId, operator: ConcreteOperator, value: &Literal) -> ConcreteRestriction {
        self.registry.get_or_create_role_type(feature_type);
        ConcreteRestriction::Feature {
            feature_type,
            operator,
            value: value.clone(),
        }
    }

    fn interval(&self, role_type: ConceptId, lower: &Option<Bound>, upper: &Option<Bound>) -> ConcreteRestriction {
        self.registry.get_or_create_role_type(role_type);
        ConcreteRestriction::Interval {
            role_type,
            lower: lower.clone(),
            upper: upper.clone(),
        }
    }
}
