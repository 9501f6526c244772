use crate::engine::AggregateError;
use thiserror::Error as ThisError;

///
/// RollupError
///
/// Runtime error surface for one orchestration call. Configuration errors
/// are fatal: a misconfigured rollup must abort the whole invocation rather
/// than partially process the valid definitions and leave parents
/// inconsistent. Nothing here is retried and no partial merge escapes.
///

#[derive(Debug, ThisError)]
pub enum RollupError {
    /// A definition names a parent entity the schema registry cannot resolve.
    #[error("unknown parent entity: {entity}")]
    UnknownParentType { entity: String },

    /// A batch names a child entity the schema registry cannot resolve.
    #[error("unknown child entity: {entity}")]
    UnknownChildType { entity: String },

    /// A definition names a relationship, aggregated, or target field that
    /// does not resolve on its entity type.
    #[error("invalid rollup definition: field {entity}.{field} does not resolve")]
    InvalidRollupDefinition { entity: String, field: String },

    /// A definition's stored operation code has no engine mapping.
    #[error("unrecognized aggregate operation code: '{code}'")]
    UnrecognizedOperation { code: String },

    /// The aggregation engine rejected a context or batch.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The definition lookup collaborator failed.
    #[error("definition lookup failed for '{entity}': {message}")]
    Source { entity: String, message: String },
}

impl RollupError {
    /// Construct the unified unresolvable-field configuration error.
    pub(crate) fn invalid_definition(entity: &str, field: &str) -> Self {
        Self::InvalidRollupDefinition {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    /// True for the configuration-error kinds callers surface to admins.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownParentType { .. }
                | Self::UnknownChildType { .. }
                | Self::InvalidRollupDefinition { .. }
                | Self::UnrecognizedOperation { .. }
        )
    }
}
