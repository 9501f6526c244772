use crate::{error::RollupError, filter::FilterExpr};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// RollupDefinition
///
/// Declarative rule describing one aggregation from a child field to a
/// parent field via a relationship. Read-only input owned by the external
/// definition store; the pipeline never mutates or persists these.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RollupDefinition {
    /// Child entity type the rule listens on.
    pub child_entity: String,
    /// Parent entity type receiving the aggregate.
    pub parent_entity: String,
    /// Child-side field pointing at the parent record.
    pub relationship_field: String,
    /// Optional criteria narrowing which children qualify.
    pub relationship_filter: Option<FilterExpr>,
    /// Child field to aggregate.
    pub aggregated_field: String,
    /// Parent field receiving the aggregate.
    pub target_field: String,
    /// Stored operation code (display label); translated by
    /// [`AggregateOp::parse`] during grouping.
    pub operation_code: String,
    /// Inactive definitions are excluded by the lookup adapter.
    pub active: bool,
    /// Recomputation mode; only real-time definitions reach this core.
    pub mode: RollupMode,
}

impl RollupDefinition {
    #[must_use]
    pub fn new(
        child_entity: impl Into<String>,
        parent_entity: impl Into<String>,
        relationship_field: impl Into<String>,
        aggregated_field: impl Into<String>,
        target_field: impl Into<String>,
        operation_code: impl Into<String>,
    ) -> Self {
        Self {
            child_entity: child_entity.into(),
            parent_entity: parent_entity.into(),
            relationship_field: relationship_field.into(),
            relationship_filter: None,
            aggregated_field: aggregated_field.into(),
            target_field: target_field.into(),
            operation_code: operation_code.into(),
            active: true,
            mode: RollupMode::RealTime,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.relationship_filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[must_use]
    pub const fn scheduled(mut self) -> Self {
        self.mode = RollupMode::Scheduled;
        self
    }
}

///
/// RollupMode
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RollupMode {
    /// Recomputed synchronously inside the change event.
    RealTime,
    /// Recomputed by an external batch process; never handled here.
    Scheduled,
}

///
/// AggregateOp
/// Engine operation resolved from a definition's stored code.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AggregateOp {
    Sum,
    Count,
    CountDistinct,
    Min,
    Max,
    Avg,
    Concat,
    ConcatDistinct,
}

impl AggregateOp {
    /// Translate one stored operation code via the fixed lookup table.
    ///
    /// Codes are the labels the definition store persists; an unrecognized
    /// code is a configuration error, never silently ignored.
    pub fn parse(code: &str) -> Result<Self, RollupError> {
        match code {
            "Sum" => Ok(Self::Sum),
            "Count" => Ok(Self::Count),
            "Count Distinct" => Ok(Self::CountDistinct),
            "Min" => Ok(Self::Min),
            "Max" => Ok(Self::Max),
            "Avg" | "Average" => Ok(Self::Avg),
            "Concatenate" => Ok(Self::Concat),
            "Concatenate Distinct" => Ok(Self::ConcatDistinct),
            _ => Err(RollupError::UnrecognizedOperation {
                code: code.to_string(),
            }),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sum => "Sum",
            Self::Count => "Count",
            Self::CountDistinct => "Count Distinct",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Avg => "Avg",
            Self::Concat => "Concatenate",
            Self::ConcatDistinct => "Concatenate Distinct",
        };
        write!(f, "{label}")
    }
}

///
/// DefinitionSource
///
/// External definition-lookup boundary. Implementations return only the
/// active, real-time definitions for one child entity type; scheduled-mode
/// rows are excluded here, not by the pipeline.
///

pub trait DefinitionSource {
    fn definitions_for(&self, child_entity: &str) -> Result<Vec<RollupDefinition>, RollupError>;
}

///
/// StaticDefinitionSource
/// Slice-backed source for embedded configuration and tests.
///

#[derive(Clone, Debug, Default)]
pub struct StaticDefinitionSource {
    definitions: Vec<RollupDefinition>,
}

impl StaticDefinitionSource {
    #[must_use]
    pub const fn new(definitions: Vec<RollupDefinition>) -> Self {
        Self { definitions }
    }
}

impl DefinitionSource for StaticDefinitionSource {
    fn definitions_for(&self, child_entity: &str) -> Result<Vec<RollupDefinition>, RollupError> {
        Ok(self
            .definitions
            .iter()
            .filter(|definition| {
                definition.child_entity == child_entity
                    && definition.active
                    && definition.mode == RollupMode::RealTime
            })
            .cloned()
            .collect())
    }
}

///
/// TESTS
///
