pub mod entity;
pub mod field;

pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel, FieldRef};

use crate::error::RollupError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// SchemaRegistry
///
/// Injected schema-resolution capability: entity and field names resolve to
/// typed handles here, never by name probing inside the pipeline. Scoped to
/// the host application; the pipeline only borrows it for one invocation.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SchemaRegistry {
    entities: BTreeMap<String, EntityModel>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entity model, replacing any prior model of the same name.
    pub fn register(&mut self, model: EntityModel) {
        self.entities.insert(model.entity_name.clone(), model);
    }

    #[must_use]
    pub fn with_entity(mut self, model: EntityModel) -> Self {
        self.register(model);
        self
    }

    /// Resolve one parent entity named by a rollup definition.
    pub fn parent_entity(&self, name: &str) -> Result<&EntityModel, RollupError> {
        self.entities
            .get(name)
            .ok_or_else(|| RollupError::UnknownParentType {
                entity: name.to_string(),
            })
    }

    /// Resolve one child entity named by an inbound batch.
    pub fn child_entity(&self, name: &str) -> Result<&EntityModel, RollupError> {
        self.entities
            .get(name)
            .ok_or_else(|| RollupError::UnknownChildType {
                entity: name.to_string(),
            })
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityModel> {
        self.entities.get(name)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::SchemaRegistry;
    use crate::{
        error::RollupError,
        model::{EntityModel, FieldKind},
    };

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new().with_entity(
            EntityModel::new("Account")
                .with_field("Id", FieldKind::Text)
                .with_field("AnnualRevenue", FieldKind::Decimal),
        )
    }

    #[test]
    fn parent_entity_resolves_registered_model() {
        let registry = registry();

        let model = registry
            .parent_entity("Account")
            .expect("Account should resolve");
        assert_eq!(model.entity_name, "Account");
    }

    #[test]
    fn parent_entity_rejects_unknown_name() {
        let registry = registry();

        let err = registry
            .parent_entity("Missing")
            .expect_err("unknown parent must be rejected");
        assert!(matches!(err, RollupError::UnknownParentType { entity } if entity == "Missing"));
    }

    #[test]
    fn field_resolution_is_by_exact_name() {
        let registry = registry();
        let model = registry.entity("Account").expect("Account registered");

        assert!(model.field("AnnualRevenue").is_some());
        assert!(model.field("annualrevenue").is_none());
    }
}
