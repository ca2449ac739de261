//! Compiled concept and role-type models

use super::definition::Definition;
use crate::graph::ConceptId;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// The compiled model of one concept
///
/// Its definition list is replaced wholesale on every (re)compilation and is
/// never edited in place; readers get an immutable snapshot.
#[derive(Debug)]
pub struct ConceptModel {
    id: ConceptId,
    definitions: RwLock<Arc<[Definition]>>,
}

impl ConceptModel {
    pub fn new(id: ConceptId) -> Self {
        Self {
            id,
            definitions: RwLock::new(Arc::from(Vec::new())),
        }
    }

    pub fn id(&self) -> ConceptId {
        self.id
    }

    /// Snapshot of the current definitions
    pub fn definitions(&self) -> Arc<[Definition]> {
        self.definitions.read().clone()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn has_definitions(&self) -> bool {
        self.definition_count() > 0
    }

    /// Replace every definition at once
    pub fn replace_definitions(&self, definitions: Vec<Definition>) {
        *self.definitions.write() = Arc::from(definitions);
    }

    pub fn clear_definitions(&self) {
        self.replace_definitions(Vec::new());
    }
}

/// Declared hierarchy of a role type: super role types and an optional chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleHierarchy {
    pub super_role_types: BTreeSet<ConceptId>,
    /// Right-hand element of `self ∘ chained ⊑ self`
    pub chained: Option<ConceptId>,
}

impl RoleHierarchy {
    pub fn is_empty(&self) -> bool {
        self.super_role_types.is_empty() && self.chained.is_none()
    }
}

/// The compiled model of one role type, shared by every concept using it
#[derive(Debug)]
pub struct RoleTypeModel {
    id: ConceptId,
    hierarchy: RwLock<RoleHierarchy>,
}

impl RoleTypeModel {
    pub fn new(id: ConceptId) -> Self {
        Self {
            id,
            hierarchy: RwLock::new(RoleHierarchy::default()),
        }
    }

    pub fn id(&self) -> ConceptId {
        self.id
    }

    pub fn hierarchy(&self) -> RoleHierarchy {
        self.hierarchy.read().clone()
    }

    pub fn super_role_types(&self) -> BTreeSet<ConceptId> {
        self.hierarchy.read().super_role_types.clone()
    }

    pub fn chained(&self) -> Option<ConceptId> {
        self.hierarchy.read().chained
    }

    /// Replace the declared hierarchy with one read from a PROPERTY_SET
    pub fn replace_hierarchy(&self, hierarchy: RoleHierarchy) {
        *self.hierarchy.write() = hierarchy;
    }

    pub fn clear_hierarchy(&self) {
        self.replace_hierarchy(RoleHierarchy::default());
    }
}
