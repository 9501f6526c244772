use crate::{
    group::AggregationContext,
    record::{Record, RecordId},
};
use std::collections::BTreeMap;

///
/// ResultMerger
///
/// Folds per-context partial parent records into one record per parent
/// identifier. Contexts are absorbed in build order; for a parent already
/// seen, only the absorbing context's target fields are copied, so one
/// context can never clobber another context's aggregates on the same
/// parent. Scoped to one orchestration call.
///

#[derive(Debug, Default)]
pub struct ResultMerger {
    merged: BTreeMap<RecordId, Record>,
}

impl ResultMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one context's output.
    ///
    /// Records with no resolvable parent identifier signal "no related
    /// parent" and are skipped, not treated as an error.
    pub fn absorb(&mut self, context: &AggregationContext, results: Vec<Record>) {
        for record in results {
            if record.id.is_empty() {
                continue;
            }

            match self.merged.get_mut(&record.id) {
                None => {
                    self.merged.insert(record.id.clone(), record);
                }
                Some(existing) => {
                    // Field-scoped copy: this context only knows about its
                    // own target fields.
                    for field in context.target_field_names() {
                        if let Some(value) = record.field(field) {
                            existing.set_field(field, value.clone());
                        }
                    }
                }
            }
        }
    }

    /// Finished result set: one record per distinct parent touched by any
    /// context. Never synthesizes records for untouched parents.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.merged.into_values().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.merged.len()
    }
}

///
/// TESTS
///
