//! Compiled concept/role model consumed by the classifier

mod concept;
mod definition;
pub mod dump;
mod registry;

pub use concept::{ConceptModel, RoleHierarchy, RoleTypeModel};
pub use definition::{ConcreteRestriction, Definition, DefinitionKind, Role, RoleGroup};
pub use registry::ConceptRegistry;
