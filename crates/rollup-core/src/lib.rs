//! Core runtime for the rollup engine: values, schema models, rollup
//! definitions, change detection, context grouping, aggregation, merging,
//! and the orchestrator exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod definition;
pub mod detect;
pub mod engine;
pub mod error;
pub mod filter;
pub mod group;
pub mod merge;
pub mod model;
pub mod obs;
pub mod orchestrate;
pub mod record;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No mergers, groupers, or sink plumbing is re-exported here.
///

pub mod prelude {
    pub use crate::{
        definition::{AggregateOp, DefinitionSource, RollupDefinition, RollupMode},
        engine::{AggregateEngine, MemoryEngine},
        filter::FilterExpr,
        model::{EntityModel, FieldKind, SchemaRegistry},
        orchestrate::Rollup,
        record::{ChangeBatch, ChangeOp, ChangePhase, Record, RecordId},
        value::Value,
    };
}
