//! ConceptRegistry: the shared store of compiled models

use super::concept::{ConceptModel, RoleTypeModel};
use crate::graph::ConceptId;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared store of concept and role-type models keyed by id
///
/// Creation is at-most-once per id even under concurrent first access: the
/// map's entry API holds the shard lock while the model is constructed, so
/// every caller receives the same `Arc`. Share the registry through an `Arc`
/// and call [`reset`](Self::reset) between runs.
#[derive(Debug, Default)]
pub struct ConceptRegistry {
    concepts: DashMap<ConceptId, Arc<ConceptModel>>,
    role_types: DashMap<ConceptId, Arc<RoleTypeModel>>,
    active: AtomicUsize,
    inactive: AtomicUsize,
    processed: AtomicUsize,
    classification_ids: RwLock<Arc<[ConceptId]>>,
}

impl ConceptRegistry {
    pub fn new() -> Self {
        Self {
            concepts: DashMap::new(),
            role_types: DashMap::new(),
            active: AtomicUsize::new(0),
            inactive: AtomicUsize::new(0),
            processed: AtomicUsize::new(0),
            classification_ids: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Get the concept model for `id`, creating it on first reference
    pub fn get_or_create_concept(&self, id: ConceptId) -> Arc<ConceptModel> {
        if let Some(existing) = self.concepts.get(&id) {
            return existing.clone();
        }
        self.concepts
            .entry(id)
            .or_insert_with(|| Arc::new(ConceptModel::new(id)))
            .clone()
    }

    /// Get the role-type model for `id`, creating it on first reference
    pub fn get_or_create_role_type(&self, id: ConceptId) -> Arc<RoleTypeModel> {
        if let Some(existing) = self.role_types.get(&id) {
            return existing.clone();
        }
        self.role_types
            .entry(id)
            .or_insert_with(|| Arc::new(RoleTypeModel::new(id)))
            .clone()
    }

    /// Look up a concept without creating it
    pub fn concept(&self, id: ConceptId) -> Option<Arc<ConceptModel>> {
        self.concepts.get(&id).map(|r| r.clone())
    }

    /// Look up a role type without creating it
    pub fn role_type(&self, id: ConceptId) -> Option<Arc<RoleTypeModel>> {
        self.role_types.get(&id).map(|r| r.clone())
    }

    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    pub fn role_type_count(&self) -> usize {
        self.role_types.len()
    }

    /// All registered concept ids, sorted
    pub fn concept_ids(&self) -> Vec<ConceptId> {
        let mut ids: Vec<ConceptId> = self.concepts.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// All registered role-type ids, sorted
    pub fn role_type_ids(&self) -> Vec<ConceptId> {
        let mut ids: Vec<ConceptId> = self.role_types.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn record_active(&self) -> usize {
        self.active.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_inactive(&self) -> usize {
        self.inactive.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_processed(&self) -> usize {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.load(Ordering::Relaxed)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Snapshot every concept id holding at least one definition
    ///
    /// Called once after a batch run has joined. Incremental recompilation
    /// does not refresh the snapshot. Returns the snapshot size.
    pub fn compute_classification_set(&self) -> usize {
        let mut ids: Vec<ConceptId> = self
            .concepts
            .iter()
            .filter(|r| r.value().has_definitions())
            .map(|r| *r.key())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let len = ids.len();
        *self.classification_ids.write() = Arc::from(ids);
        len
    }

    /// Sorted, deduplicated ids from the last [`compute_classification_set`](Self::compute_classification_set)
    pub fn classification_concept_ids(&self) -> Arc<[ConceptId]> {
        self.classification_ids.read().clone()
    }

    /// Of the given ids, those whose model is missing or has no definitions
    pub fn concepts_without_definitions<I>(&self, ids: I) -> Vec<ConceptId>
    where
        I: IntoIterator<Item = ConceptId>,
    {
        let mut missing: Vec<ConceptId> = ids
            .into_iter()
            .filter(|id| {
                self.concept(*id)
                    .map(|model| !model.has_definitions())
                    .unwrap_or(true)
            })
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Drop every model, zero the counters and clear the snapshot
    pub fn reset(&self) {
        self.concepts.clear();
        self.role_types.clear();
        self.active.store(0, Ordering::Relaxed);
        self.inactive.store(0, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        *self.classification_ids.write() = Arc::from(Vec::new());
    }
}
