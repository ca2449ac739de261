//! Vertex representation in a stated axiom graph

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Stable integer identifier of a concept (also used for role types,
/// operators and concrete features, which are concepts in the substrate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(i32);

impl ConceptId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ConceptId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a vertex within its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexIndex(usize);

impl VertexIndex {
    pub const ROOT: VertexIndex = VertexIndex(0);

    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Meaning tag of a vertex, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meaning {
    DefinitionRoot,
    SufficientSet,
    NecessarySet,
    PropertySet,
    And,
    Concept,
    Role,
    RoleGroup,
    PropertyPatternImplication,
    Feature,
    IntervalRole,
}

impl std::fmt::Display for Meaning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::DefinitionRoot => "DEFINITION_ROOT",
            Self::SufficientSet => "SUFFICIENT_SET",
            Self::NecessarySet => "NECESSARY_SET",
            Self::PropertySet => "PROPERTY_SET",
            Self::And => "AND",
            Self::Concept => "CONCEPT",
            Self::Role => "ROLE",
            Self::RoleGroup => "ROLE_GROUP",
            Self::PropertyPatternImplication => "PROPERTY_PATTERN_IMPLICATION",
            Self::Feature => "FEATURE",
            Self::IntervalRole => "INTERVAL_ROLE",
        };
        f.write_str(tag)
    }
}

/// Comparison used by a concrete-domain restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcreteOperator {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl std::fmt::Display for ConcreteOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        };
        f.write_str(op)
    }
}

/// Literal value carried by concrete-domain vertices
///
/// Floats compare by `total_cmp`, so literals can live in ordered sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::String(_) => 3,
        }
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Literal {}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
        }
    }
}

/// One end of an interval restriction
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bound {
    pub value: Literal,
    #[serde(default = "default_inclusive")]
    pub inclusive: bool,
}

fn default_inclusive() -> bool {
    true
}

impl Bound {
    pub fn inclusive(value: Literal) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: Literal) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A vertex of an axiom graph, tagged by meaning
///
/// Properties live on the variant that uses them, so the walker never has to
/// look up an untyped property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "meaning", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Vertex {
    DefinitionRoot,
    SufficientSet,
    NecessarySet,
    PropertySet,
    And,
    Concept {
        concept: ConceptId,
    },
    Role {
        role_type: ConceptId,
        operator: ConceptId,
    },
    RoleGroup,
    PropertyPatternImplication {
        pattern: Vec<ConceptId>,
        implication: ConceptId,
    },
    Feature {
        feature_type: ConceptId,
        operator: ConcreteOperator,
        value: Literal,
    },
    IntervalRole {
        role_type: ConceptId,
        #[serde(default)]
        lower: Option<Bound>,
        #[serde(default)]
        upper: Option<Bound>,
    },
}

impl Vertex {
    pub fn meaning(&self) -> Meaning {
        match self {
            Self::DefinitionRoot => Meaning::DefinitionRoot,
            Self::SufficientSet => Meaning::SufficientSet,
            Self::NecessarySet => Meaning::NecessarySet,
            Self::PropertySet => Meaning::PropertySet,
            Self::And => Meaning::And,
            Self::Concept { .. } => Meaning::Concept,
            Self::Role { .. } => Meaning::Role,
            Self::RoleGroup => Meaning::RoleGroup,
            Self::PropertyPatternImplication { .. } => Meaning::PropertyPatternImplication,
            Self::Feature { .. } => Meaning::Feature,
            Self::IntervalRole { .. } => Meaning::IntervalRole,
        }
    }

    pub fn concept(concept: impl Into<ConceptId>) -> Self {
        Self::Concept {
            concept: concept.into(),
        }
    }

    pub fn role(role_type: impl Into<ConceptId>, operator: impl Into<ConceptId>) -> Self {
        Self::Role {
            role_type: role_type.into(),
            operator: operator.into(),
        }
    }

    /// Short label including the payload, used in diagnostics
    pub fn label(&self) -> String {
        match self {
            Self::Concept { concept } => format!("CONCEPT({})", concept),
            Self::Role {
                role_type,
                operator,
            } => format!("ROLE(type={}, op={})", role_type, operator),
            Self::PropertyPatternImplication {
                pattern,
                implication,
            } => {
                let chain: Vec<String> = pattern.iter().map(ToString::to_string).collect();
                format!(
                    "PROPERTY_PATTERN_IMPLICATION([{}] -> {})",
                    chain.join(", "),
                    implication
                )
            }
            Self::Feature {
                feature_type,
                operator,
                value,
            } => format!("FEATURE({} {} {})", feature_type, operator, value),
            Self::IntervalRole { role_type, .. } => format!("INTERVAL_ROLE(type={})", role_type),
            other => other.meaning().to_string(),
        }
    }
}
