//! Definitions: the classifier-facing normal form of a stated axiom

use crate::graph::{Bound, ConceptId, ConcreteOperator, Literal};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Whether a definition is necessary-and-sufficient or only necessary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// `C ≡ ...`, compiled from a SUFFICIENT_SET
    Equivalence,
    /// `C ⊑ ...`, compiled from a NECESSARY_SET
    Subsumption,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equivalence => f.write_str("≡"),
            Self::Subsumption => f.write_str("⊑"),
        }
    }
}

/// An existential restriction `∃ role_type . filler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Role {
    pub role_type: ConceptId,
    pub filler: ConceptId,
}

impl Role {
    pub fn new(role_type: impl Into<ConceptId>, filler: impl Into<ConceptId>) -> Self {
        Self {
            role_type: role_type.into(),
            filler: filler.into(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "∃{}.{}", self.role_type, self.filler)
    }
}

/// A concrete-domain restriction on a feature or an interval role
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConcreteRestriction {
    Feature {
        feature_type: ConceptId,
        operator: ConcreteOperator,
        value: Literal,
    },
    Interval {
        role_type: ConceptId,
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
}

impl fmt::Display for ConcreteRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature {
                feature_type,
                operator,
                value,
            } => write!(f, "{} {} {}", feature_type, operator, value),
            Self::Interval {
                role_type,
                lower,
                upper,
            } => {
                write!(f, "{} in ", role_type)?;
                match lower {
                    Some(b) if b.inclusive => write!(f, "[{}", b.value)?,
                    Some(b) => write!(f, "({}", b.value)?,
                    None => f.write_str("(*")?,
                }
                f.write_str(", ")?;
                match upper {
                    Some(b) if b.inclusive => write!(f, "{}]", b.value),
                    Some(b) => write!(f, "{})", b.value),
                    None => f.write_str("*)"),
                }
            }
        }
    }
}

/// Restrictions that must hold on one shared existential witness
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RoleGroup {
    pub roles: BTreeSet<Role>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub concrete: BTreeSet<ConcreteRestriction>,
}

impl RoleGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for role in &self.roles {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", role)?;
            first = false;
        }
        for restriction in &self.concrete {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", restriction)?;
            first = false;
        }
        f.write_str("}")
    }
}

/// One compiled definition of a concept
///
/// A conjunction of named super-concepts, ungrouped roles, role groups and
/// ungrouped concrete restrictions. Ordered sets keep structural equality
/// independent of the vertex order in the source graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub super_concepts: BTreeSet<ConceptId>,
    pub roles: BTreeSet<Role>,
    pub role_groups: BTreeSet<RoleGroup>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub concrete: BTreeSet<ConcreteRestriction>,
}

impl Definition {
    pub fn new(kind: DefinitionKind) -> Self {
        Self {
            kind,
            super_concepts: BTreeSet::new(),
            roles: BTreeSet::new(),
            role_groups: BTreeSet::new(),
            concrete: BTreeSet::new(),
        }
    }

    pub fn equivalence() -> Self {
        Self::new(DefinitionKind::Equivalence)
    }

    pub fn subsumption() -> Self {
        Self::new(DefinitionKind::Subsumption)
    }

    pub fn with_super_concept(mut self, concept: impl Into<ConceptId>) -> Self {
        self.super_concepts.insert(concept.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_role_group(mut self, group: RoleGroup) -> Self {
        self.role_groups.insert(group);
        self
    }

    /// True if the definition is exactly one named concept and nothing else
    pub fn single_named_concept(&self) -> Option<ConceptId> {
        if self.super_concepts.len() == 1
            && self.roles.is_empty()
            && self.role_groups.is_empty()
            && self.concrete.is_empty()
        {
            self.super_concepts.iter().next().copied()
        } else {
            None
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let mut parts: Vec<String> = self.super_concepts.iter().map(ToString::to_string).collect();
        parts.extend(self.roles.iter().map(ToString::to_string));
        parts.extend(self.role_groups.iter().map(ToString::to_string));
        parts.extend(self.concrete.iter().map(ToString::to_string));
        if parts.is_empty() {
            f.write_str(" ⊤")
        } else {
            write!(f, " {}", parts.join(" ⊓ "))
        }
    }
}
