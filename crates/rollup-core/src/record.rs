use crate::value::Value;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// RecordId
/// Stable external identifier for one child or parent record.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty identifiers signal "no resolvable parent" at merge boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

///
/// Record
///
/// Uniform record shape on both sides of the pipeline: a child row under
/// consideration, or a partial parent carrying only aggregated fields.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub entity: String,
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<RecordId>, entity: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity: entity.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment, used heavily by fixtures and callers.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

///
/// ChangePhase
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ChangePhase {
    Before,
    After,
}

///
/// ChangeOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

///
/// ChangeBatch
///
/// One inbound change event: the new-version rows plus, for updates and
/// deletes, the previous versions keyed by identifier. The delivery
/// mechanism (triggers, CDC, queues) is the caller's concern.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChangeBatch {
    pub phase: ChangePhase,
    pub op: ChangeOp,
    /// Child entity type every row in the batch belongs to.
    pub entity: String,
    /// New-version rows; empty for deletes.
    pub rows: Vec<Record>,
    /// Previous versions keyed by identifier; empty for inserts.
    pub old: BTreeMap<RecordId, Record>,
}

impl ChangeBatch {
    #[must_use]
    pub fn insert(entity: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            phase: ChangePhase::After,
            op: ChangeOp::Insert,
            entity: entity.into(),
            rows,
            old: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn update(entity: impl Into<String>, rows: Vec<Record>, old: Vec<Record>) -> Self {
        Self {
            phase: ChangePhase::After,
            op: ChangeOp::Update,
            entity: entity.into(),
            rows,
            old: Self::key_by_id(old),
        }
    }

    #[must_use]
    pub fn delete(entity: impl Into<String>, old: Vec<Record>) -> Self {
        Self {
            phase: ChangePhase::After,
            op: ChangeOp::Delete,
            entity: entity.into(),
            rows: Vec::new(),
            old: Self::key_by_id(old),
        }
    }

    #[must_use]
    pub const fn with_phase(mut self, phase: ChangePhase) -> Self {
        self.phase = phase;
        self
    }

    /// Previous version of one row, when the event supplied it.
    #[must_use]
    pub fn previous(&self, id: &RecordId) -> Option<&Record> {
        self.old.get(id)
    }

    /// The record set the pipeline aggregates over: prior versions on
    /// delete, new versions otherwise.
    #[must_use]
    pub fn effective_rows(&self) -> Vec<&Record> {
        match self.op {
            ChangeOp::Delete => self.old.values().collect(),
            ChangeOp::Insert | ChangeOp::Update => self.rows.iter().collect(),
        }
    }

    fn key_by_id(rows: Vec<Record>) -> BTreeMap<RecordId, Record> {
        rows.into_iter().map(|row| (row.id.clone(), row)).collect()
    }
}

///
/// TESTS
///
