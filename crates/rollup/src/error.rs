use derive_more::Display;
use rollup_core::error::RollupError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<RollupError> for Error {
    fn from(err: RollupError) -> Self {
        match &err {
            RollupError::UnknownParentType { .. } => Self::new(
                ErrorKind::Config(ConfigErrorKind::UnknownParentType),
                ErrorOrigin::Grouper,
                err.to_string(),
            ),

            RollupError::UnknownChildType { .. } => Self::new(
                ErrorKind::Config(ConfigErrorKind::UnknownChildType),
                ErrorOrigin::Grouper,
                err.to_string(),
            ),

            RollupError::InvalidRollupDefinition { .. } => Self::new(
                ErrorKind::Config(ConfigErrorKind::InvalidRollupDefinition),
                ErrorOrigin::Grouper,
                err.to_string(),
            ),

            RollupError::UnrecognizedOperation { .. } => Self::new(
                ErrorKind::Config(ConfigErrorKind::UnrecognizedOperation),
                ErrorOrigin::Grouper,
                err.to_string(),
            ),

            RollupError::Aggregate(_) => {
                Self::new(ErrorKind::Aggregate, ErrorOrigin::Engine, err.to_string())
            }

            RollupError::Source { .. } => {
                Self::new(ErrorKind::Lookup, ErrorOrigin::Source, err.to_string())
            }
        }
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers embedding the engine.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// A rollup definition is misconfigured; requires administrative
    /// correction, not a data fix.
    Config(ConfigErrorKind),

    /// The aggregation engine rejected a batch.
    Aggregate,

    /// The definition lookup collaborator failed.
    Lookup,
}

///
/// ConfigErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConfigErrorKind {
    /// A definition names a parent entity unknown to schema resolution.
    UnknownParentType,

    /// A batch names a child entity unknown to schema resolution.
    UnknownChildType,

    /// A relationship, aggregated, or target field does not resolve.
    InvalidRollupDefinition,

    /// A stored operation code has no engine mapping.
    UnrecognizedOperation,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers embedding the engine.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Grouper,
    Detector,
    Engine,
    Merge,
    Source,
}

///
/// TESTS
///
