use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// FieldModel
/// Runtime field metadata used by grouping and validation.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldModel {
    /// Field name as used in definitions and record maps.
    pub name: String,
    /// Runtime type shape.
    pub kind: FieldKind,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

///
/// FieldKind
///
/// Minimal type surface needed by grouping and the in-memory engine.
/// Aligned with `Value` variants; a lossy projection of host schema types.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Bool,
    Int,
    Uint,
    Decimal,
    Text,
    Timestamp,

    /// Child-side pointer at a parent entity; carries the parent identifier.
    Relation { target: String },
}

impl FieldKind {
    /// True when one runtime value matches the declared field kind shape.
    #[must_use]
    pub const fn matches_value(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Bool, Value::Bool(_))
                | (Self::Int, Value::Int(_))
                | (Self::Uint, Value::Uint(_))
                | (Self::Decimal, Value::Decimal(_))
                | (Self::Text, Value::Text(_))
                | (Self::Timestamp, Value::Timestamp(_))
                | (Self::Relation { .. }, Value::Text(_) | Value::Int(_) | Value::Uint(_))
                | (_, Value::Null)
        )
    }

    /// True when the kind participates in numeric aggregation.
    #[must_use]
    pub const fn supports_numeric_aggregation(&self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Decimal)
    }
}

///
/// FieldRef
/// Resolved field handle carried by aggregation contexts.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldRef {
    pub name: String,
    pub kind: FieldKind,
}

impl From<&FieldModel> for FieldRef {
    fn from(model: &FieldModel) -> Self {
        Self {
            name: model.name.clone(),
            kind: model.kind.clone(),
        }
    }
}
