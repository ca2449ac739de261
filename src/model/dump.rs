//! Id-level text dumps of compiled models, for diagnostics only

use super::concept::{ConceptModel, RoleTypeModel};
use super::registry::ConceptRegistry;
use std::fmt::Write;

/// One line per definition, e.g. `7 ≡ 3 ⊓ ∃9.12`
pub fn dump_concept(model: &ConceptModel) -> String {
    let definitions = model.definitions();
    if definitions.is_empty() {
        return format!("{} (no definitions)\n", model.id());
    }
    let mut out = String::new();
    for definition in definitions.iter() {
        let _ = writeln!(out, "{} {}", model.id(), definition);
    }
    out
}

/// e.g. `role 9 ⊑ 40, 41 chain 9∘42`
pub fn dump_role_type(model: &RoleTypeModel) -> String {
    let hierarchy = model.hierarchy();
    let mut out = format!("role {}", model.id());
    if !hierarchy.super_role_types.is_empty() {
        let supers: Vec<String> = hierarchy
            .super_role_types
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = write!(out, " ⊑ {}", supers.join(", "));
    }
    if let Some(chained) = hierarchy.chained {
        let _ = write!(out, " chain {}∘{}", model.id(), chained);
    }
    out.push('\n');
    out
}

/// Dump every concept holding definitions, then every role type, in id order
pub fn dump_registry(registry: &ConceptRegistry) -> String {
    let mut out = String::new();
    for id in registry.concept_ids() {
        if let Some(model) = registry.concept(id) {
            if model.has_definitions() {
                out.push_str(&dump_concept(&model));
            }
        }
    }
    for id in registry.role_type_ids() {
        if let Some(model) = registry.role_type(id) {
            out.push_str(&dump_role_type(&model));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConceptId;
    use crate::model::{Definition, Role, RoleHierarchy};

    #[test]
    fn dumps_concepts_and_role_types() {
        let registry = ConceptRegistry::new();
        registry
            .get_or_create_concept(ConceptId::new(7))
            .replace_definitions(vec![Definition::equivalence()
                .with_super_concept(3)
                .with_role(Role::new(9, 12))]);
        registry.get_or_create_concept(ConceptId::new(3));
        registry
            .get_or_create_role_type(ConceptId::new(9))
            .replace_hierarchy(RoleHierarchy {
                super_role_types: [ConceptId::new(40)].into_iter().collect(),
                chained: Some(ConceptId::new(42)),
            });

        assert_eq!(
            dump_registry(&registry),
            "7 ≡ 3 ⊓ ∃9.12\nrole 9 ⊑ 40 chain 9∘42\n"
        );
    }

    #[test]
    fn concept_without_definitions_is_marked() {
        let model = ConceptModel::new(ConceptId::new(5));
        assert_eq!(dump_concept(&model), "5 (no definitions)\n");
    }
}
