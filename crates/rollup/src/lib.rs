//! ## Crate layout
//! - `core`: runtime pipeline — values, schema models, definitions, change
//!   detection, grouping, aggregation, merging, orchestration.
//! - `error`: public error taxonomy for callers embedding the engine.
//!
//! The `prelude` module mirrors the runtime surface used by host
//! applications.

pub use rollup_core as core;

mod error;

pub use error::{ConfigErrorKind, Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        definition::{
            AggregateOp, DefinitionSource as _, RollupDefinition, RollupMode,
            StaticDefinitionSource,
        },
        engine::{AggregateEngine as _, MemoryEngine},
        filter::FilterExpr,
        model::{EntityModel, FieldKind, SchemaRegistry},
        obs::{MetricsSink as _, NoopSink},
        orchestrate::Rollup,
        record::{ChangeBatch, ChangeOp, ChangePhase, Record, RecordId},
        value::Value,
    };
    pub use crate::{Error, ErrorKind};
    pub use serde::{Deserialize, Serialize};
}
