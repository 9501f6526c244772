use crate::model::field::{FieldKind, FieldModel};
use serde::{Deserialize, Serialize};

///
/// EntityModel
/// Minimal runtime model for one entity type, built by the host application.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    /// Stable external name used in definitions and batches.
    pub entity_name: String,
    /// Ordered field list (authoritative for resolution).
    pub fields: Vec<FieldModel>,
}

impl EntityModel {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append one field. Builder-style, used when assembling registries.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel::new(name, kind));
        self
    }

    /// Resolve one field model entry by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|candidate| candidate.name == name)
    }
}
