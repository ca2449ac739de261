//! ToldClassifier: a told-subsumption classifier over the compiled model
//!
//! Infers nothing beyond what is stated: parents are the named
//! super-concepts of every definition, reduced transitively, and two concepts
//! are equivalent when one's equivalence definition is exactly the other.
//! Role restrictions are carried but not reasoned over; a full EL++ engine
//! plugs in through the same [`Classifier`] trait.

use super::classifier::{Classifier, ReasonerError, ReasonerResult};
use crate::graph::ConceptId;
use crate::model::{ConceptModel, ConceptRegistry, Definition, DefinitionKind};
use std::collections::{BTreeMap, BTreeSet};

/// What one concept states, as far as told subsumption is concerned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Told {
    supers: BTreeSet<ConceptId>,
    equivalent_to: BTreeSet<ConceptId>,
}

impl Told {
    fn from_definitions(concept: ConceptId, definitions: &[Definition]) -> Self {
        let mut told = Told::default();
        for definition in definitions {
            let named = match definition.kind {
                DefinitionKind::Equivalence => definition.single_named_concept(),
                DefinitionKind::Subsumption => None,
            };
            match named {
                Some(other) if other != concept => {
                    told.equivalent_to.insert(other);
                }
                Some(_) => {}
                None => told
                    .supers
                    .extend(definition.super_concepts.iter().filter(|c| **c != concept)),
            }
        }
        told
    }
}

/// Inferred taxonomy over equivalence classes keyed by representative
#[derive(Debug, Default)]
struct Taxonomy {
    representative: BTreeMap<ConceptId, ConceptId>,
    members: BTreeMap<ConceptId, BTreeSet<ConceptId>>,
    parents: BTreeMap<ConceptId, BTreeSet<ConceptId>>,
    children: BTreeMap<ConceptId, BTreeSet<ConceptId>>,
}

impl Taxonomy {
    fn build(told: &BTreeMap<ConceptId, Told>) -> Self {
        let mut sets = DisjointSets::default();
        for (&concept, entry) in told {
            sets.insert(concept);
            for &other in entry.supers.iter().chain(&entry.equivalent_to) {
                sets.insert(other);
            }
            for &other in &entry.equivalent_to {
                sets.union(concept, other);
            }
        }

        let mut taxonomy = Taxonomy::default();
        for concept in sets.ids() {
            let rep = sets.find(concept);
            taxonomy.representative.insert(concept, rep);
            taxonomy.members.entry(rep).or_default().insert(concept);
            taxonomy.parents.entry(rep).or_default();
            taxonomy.children.entry(rep).or_default();
        }

        let mut stated: BTreeMap<ConceptId, BTreeSet<ConceptId>> = BTreeMap::new();
        for (concept, entry) in told {
            let rep = taxonomy.rep(*concept);
            let supers = stated.entry(rep).or_default();
            supers.extend(entry.supers.iter().map(|s| taxonomy.rep(*s)).filter(|s| *s != rep));
        }

        let ancestors: BTreeMap<ConceptId, BTreeSet<ConceptId>> = stated
            .keys()
            .map(|&rep| (rep, ancestors_of(rep, &stated)))
            .collect();
        let no_ancestors = BTreeSet::new();

        for (&rep, supers) in &stated {
            let direct: BTreeSet<ConceptId> = supers
                .iter()
                .copied()
                .filter(|&p| {
                    !supers.iter().any(|&q| {
                        q != p
                            && ancestors.get(&q).unwrap_or(&no_ancestors).contains(&p)
                            && !ancestors.get(&p).unwrap_or(&no_ancestors).contains(&q)
                    })
                })
                .collect();
            for &parent in &direct {
                taxonomy.children.entry(parent).or_default().insert(rep);
            }
            taxonomy.parents.insert(rep, direct);
        }
        taxonomy
    }

    fn rep(&self, concept: ConceptId) -> ConceptId {
        self.representative.get(&concept).copied().unwrap_or(concept)
    }
}

/// Every concept reachable upward from `start`, excluding `start`; cycles are cut
fn ancestors_of(start: ConceptId, stated: &BTreeMap<ConceptId, BTreeSet<ConceptId>>) -> BTreeSet<ConceptId> {
    let mut seen = BTreeSet::new();
    let mut stack: Vec<ConceptId> = stated.get(&start).into_iter().flatten().copied().collect();
    while let Some(next) = stack.pop() {
        if next == start || !seen.insert(next) {
            continue;
        }
        stack.extend(stated.get(&next).into_iter().flatten().copied());
    }
    seen
}

/// Union-find keeping the smallest id as representative
#[derive(Debug, Default)]
struct DisjointSets {
    parent: BTreeMap<ConceptId, ConceptId>,
}

impl DisjointSets {
    fn insert(&mut self, id: ConceptId) {
        self.parent.entry(id).or_insert(id);
    }

    fn find(&self, mut id: ConceptId) -> ConceptId {
        while let Some(&up) = self.parent.get(&id) {
            if up == id {
                break;
            }
            id = up;
        }
        id
    }

    fn union(&mut self, a: ConceptId, b: ConceptId) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent.insert(high, low);
        }
    }

    fn ids(&self) -> Vec<ConceptId> {
        self.parent.keys().copied().collect()
    }
}

/// Told-subsumption classifier
///
/// Incremental updates are accepted for ordinary concepts and rejected with
/// [`ReasonerError::IncrementalUnsupported`] for role types, whose hierarchy
/// changes would invalidate every definition using them.
#[derive(Debug, Default)]
pub struct ToldClassifier {
    told: Option<BTreeMap<ConceptId, Told>>,
    taxonomy: Option<Taxonomy>,
    dirty: bool,
}

impl ToldClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn taxonomy(&self) -> ReasonerResult<&Taxonomy> {
        if self.told.is_none() {
            return Err(ReasonerError::NotLoaded);
        }
        self.taxonomy.as_ref().ok_or(ReasonerError::NotClassified)
    }
}

impl Classifier for ToldClassifier {
    fn load(&mut self, registry: &ConceptRegistry) -> ReasonerResult<()> {
        let told: BTreeMap<ConceptId, Told> = registry
            .classification_concept_ids()
            .iter()
            .filter_map(|&id| registry.concept(id))
            .map(|model| (model.id(), Told::from_definitions(model.id(), &model.definitions())))
            .collect();
        tracing::debug!(concepts = told.len(), "told classifier loaded");
        self.told = Some(told);
        self.taxonomy = None;
        self.dirty = false;
        Ok(())
    }

    fn classify(&mut self) -> ReasonerResult<()> {
        let told = self.told.as_ref().ok_or(ReasonerError::NotLoaded)?;
        let taxonomy = Taxonomy::build(told);
        tracing::debug!(classes = taxonomy.members.len(), "told classifier classified");
        self.taxonomy = Some(taxonomy);
        self.dirty = false;
        Ok(())
    }

    fn apply_incremental(&mut self, registry: &ConceptRegistry, model: &ConceptModel) -> ReasonerResult<()> {
        let concept = model.id();
        if registry.role_type(concept).is_some() {
            return Err(ReasonerError::IncrementalUnsupported {
                concept,
                reason: "concept is a role type".to_string(),
            });
        }
        let told = self.told.as_mut().ok_or(ReasonerError::NotLoaded)?;
        let definitions = model.definitions();
        if definitions.is_empty() {
            told.remove(&concept);
        } else {
            told.insert(concept, Told::from_definitions(concept, &definitions));
        }
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> ReasonerResult<()> {
        if self.dirty {
            self.classify()?;
        }
        Ok(())
    }

    fn parents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        let taxonomy = self.taxonomy()?;
        Ok(taxonomy
            .parents
            .get(&taxonomy.rep(concept))
            .cloned()
            .unwrap_or_default())
    }

    fn children(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        let taxonomy = self.taxonomy()?;
        Ok(taxonomy
            .children
            .get(&taxonomy.rep(concept))
            .cloned()
            .unwrap_or_default())
    }

    fn equivalents(&self, concept: ConceptId) -> ReasonerResult<BTreeSet<ConceptId>> {
        let taxonomy = self.taxonomy()?;
        let mut members = taxonomy
            .members
            .get(&taxonomy.rep(concept))
            .cloned()
            .unwrap_or_default();
        members.remove(&concept);
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, RoleGroup};

    fn ids(values: &[i32]) -> BTreeSet<ConceptId> {
        values.iter().map(|v| ConceptId::new(*v)).collect()
    }

    fn define(registry: &ConceptRegistry, concept: i32, definitions: Vec<Definition>) {
        registry
            .get_or_create_concept(ConceptId::new(concept))
            .replace_definitions(definitions);
    }

    /// 2 ⊑ 1, 3 ⊑ 2 ⊓ 1, 4 ≡ 3, 5 ⊑ 1 ⊓ ∃9.2
    fn registry() -> ConceptRegistry {
        let registry = ConceptRegistry::new();
        define(&registry, 1, vec![]);
        define(&registry, 2, vec![Definition::subsumption().with_super_concept(1)]);
        define(
            &registry,
            3,
            vec![Definition::subsumption().with_super_concept(2).with_super_concept(1)],
        );
        define(&registry, 4, vec![Definition::equivalence().with_super_concept(3)]);
        define(
            &registry,
            5,
            vec![Definition::subsumption()
                .with_super_concept(1)
                .with_role_group(RoleGroup::new().with_role(Role::new(9, 2)))],
        );
        registry.compute_classification_set();
        registry
    }

    fn classified(registry: &ConceptRegistry) -> ToldClassifier {
        let mut classifier = ToldClassifier::new();
        classifier.load(registry).unwrap();
        classifier.classify().unwrap();
        classifier
    }

    #[test]
    fn parents_are_transitively_reduced() {
        let classifier = classified(&registry());
        assert_eq!(classifier.parents(ConceptId::new(3)).unwrap(), ids(&[2]));
        assert_eq!(classifier.parents(ConceptId::new(5)).unwrap(), ids(&[1]));
        assert_eq!(classifier.children(ConceptId::new(1)).unwrap(), ids(&[2, 5]));
        assert!(classifier.parents(ConceptId::new(1)).unwrap().is_empty());
    }

    #[test]
    fn single_concept_equivalence_merges_classes() {
        let classifier = classified(&registry());
        assert_eq!(classifier.equivalents(ConceptId::new(4)).unwrap(), ids(&[3]));
        assert_eq!(classifier.equivalents(ConceptId::new(3)).unwrap(), ids(&[4]));
        assert_eq!(classifier.parents(ConceptId::new(4)).unwrap(), ids(&[2]));
        assert_eq!(classifier.children(ConceptId::new(2)).unwrap(), ids(&[3]));
    }

    #[test]
    fn queries_before_classification_fail() {
        let mut classifier = ToldClassifier::new();
        assert!(matches!(
            classifier.parents(ConceptId::new(1)),
            Err(ReasonerError::NotLoaded)
        ));
        classifier.load(&registry()).unwrap();
        assert!(matches!(
            classifier.parents(ConceptId::new(1)),
            Err(ReasonerError::NotClassified)
        ));
    }

    #[test]
    fn cyclic_subsumption_terminates() {
        let registry = ConceptRegistry::new();
        define(&registry, 1, vec![Definition::subsumption().with_super_concept(2)]);
        define(&registry, 2, vec![Definition::subsumption().with_super_concept(1)]);
        registry.compute_classification_set();

        let classifier = classified(&registry);
        assert_eq!(classifier.parents(ConceptId::new(1)).unwrap(), ids(&[2]));
        assert_eq!(classifier.parents(ConceptId::new(2)).unwrap(), ids(&[1]));
    }

    #[test]
    fn incremental_update_reclassifies_on_flush() {
        let registry = registry();
        let mut classifier = classified(&registry);

        define(&registry, 5, vec![Definition::subsumption().with_super_concept(3)]);
        let model = registry.concept(ConceptId::new(5)).unwrap();
        classifier.apply_incremental(&registry, &model).unwrap();
        assert_eq!(classifier.parents(ConceptId::new(5)).unwrap(), ids(&[1]));

        classifier.flush().unwrap();
        assert_eq!(classifier.parents(ConceptId::new(5)).unwrap(), ids(&[3]));
        assert_eq!(classifier.children(ConceptId::new(1)).unwrap(), ids(&[2]));
    }

    #[test]
    fn incremental_update_of_role_type_is_unsupported() {
        let registry = registry();
        let mut classifier = classified(&registry);
        registry.get_or_create_role_type(ConceptId::new(2));

        let model = registry.concept(ConceptId::new(2)).unwrap();
        let err = classifier.apply_incremental(&registry, &model).unwrap_err();
        assert!(err.is_incremental_unsupported());
    }
}
