use crate::{
    definition::AggregateOp,
    error::RollupError,
    group::{AggregationContext, FieldMapping},
    record::{Record, RecordId},
    value::Value,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// AggregateError
///
/// Typed extraction/comparison failures raised while folding one context.
///

#[derive(Clone, Debug, ThisError)]
pub enum AggregateError {
    #[error("aggregated field value is not numeric: {field} value={value:?}")]
    NonNumericValue { field: String, value: Box<Value> },

    #[error("aggregated field values are incomparable under strict ordering: {field}")]
    IncomparableValues { field: String },

    #[error("aggregated field value does not match its declared kind: {field} value={value:?}")]
    ValueTypeMismatch { field: String, value: Box<Value> },

    #[error("relationship field carries a non-identifier value: {field} value={value:?}")]
    InvalidRelationshipValue { field: String, value: Box<Value> },

    #[error("aggregate arithmetic overflowed: {field} op={op}")]
    ArithmeticOverflow { field: String, op: AggregateOp },
}

///
/// AggregateEngine
///
/// External aggregation contract consumed by the orchestrator. Invoked once
/// per context; returns one partial parent record per distinct parent
/// identifier referenced by at least one qualifying child row, carrying
/// exactly the context's target fields. A child with no resolvable parent
/// contributes nothing.
///

pub trait AggregateEngine {
    fn compute(
        &self,
        context: &AggregationContext,
        rows: &[&Record],
    ) -> Result<Vec<Record>, RollupError>;
}

///
/// MemoryEngine
///
/// Reference engine folding the supplied child rows directly. Suitable when
/// the batch already contains every child relevant to the touched parents;
/// engines backed by a query layer implement the same trait.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryEngine;

impl MemoryEngine {
    /// Concatenation delimiter applied by `Concat`/`Concatenate Distinct`.
    pub const CONCAT_DELIMITER: &'static str = ", ";
}

impl AggregateEngine for MemoryEngine {
    fn compute(
        &self,
        context: &AggregationContext,
        rows: &[&Record],
    ) -> Result<Vec<Record>, RollupError> {
        let mut groups: BTreeMap<RecordId, Vec<&Record>> = BTreeMap::new();

        for &row in rows {
            if let Some(filter) = &context.filter
                && !filter.matches(row)
            {
                continue;
            }

            let Some(parent_id) = relationship_target(context, row)? else {
                continue;
            };
            groups.entry(parent_id).or_default().push(row);
        }

        let mut results = Vec::with_capacity(groups.len());
        for (parent_id, children) in groups {
            let mut parent = Record::new(parent_id, context.parent_entity.clone());
            for mapping in &context.mappings {
                let value = fold_mapping(mapping, &children)?;
                parent.set_field(mapping.target_field.name.clone(), value);
            }
            results.push(parent);
        }

        Ok(results)
    }
}

// Resolve one row's parent identifier; None when the row has no related
// parent, an error when the value is not identifier-shaped.
fn relationship_target(
    context: &AggregationContext,
    row: &Record,
) -> Result<Option<RecordId>, AggregateError> {
    let field = &context.relationship_field.name;
    match row.field(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .to_identifier()
            .map(|id| Some(RecordId::new(id)))
            .ok_or_else(|| AggregateError::InvalidRelationshipValue {
                field: field.clone(),
                value: Box::new(value.clone()),
            }),
    }
}

// Fold one mapping over a parent's qualifying children. Nulls never
// participate; all-null folds yield Sum=0, Count=0, otherwise Null.
fn fold_mapping(mapping: &FieldMapping, children: &[&Record]) -> Result<Value, AggregateError> {
    let field = mapping.source_field.name.as_str();

    let mut present: Vec<&Value> = Vec::with_capacity(children.len());
    for value in children
        .iter()
        .filter_map(|child| child.field(field))
        .filter(|value| !value.is_null())
    {
        if !mapping.source_field.kind.matches_value(value) {
            return Err(AggregateError::ValueTypeMismatch {
                field: field.to_string(),
                value: Box::new(value.clone()),
            });
        }
        present.push(value);
    }

    match mapping.op {
        AggregateOp::Sum => fold_sum(field, &present, mapping.op).map(Value::Decimal),
        AggregateOp::Count => Ok(Value::Uint(present.len() as u64)),
        AggregateOp::CountDistinct => {
            let distinct: BTreeSet<&Value> = present.iter().copied().collect();
            Ok(Value::Uint(distinct.len() as u64))
        }
        AggregateOp::Min => fold_extremum(field, &present, std::cmp::Ordering::Less),
        AggregateOp::Max => fold_extremum(field, &present, std::cmp::Ordering::Greater),
        AggregateOp::Avg => {
            if present.is_empty() {
                return Ok(Value::Null);
            }
            let sum = fold_sum(field, &present, mapping.op)?;
            sum.checked_div(Decimal::from(present.len() as u64))
                .map(Value::Decimal)
                .ok_or_else(|| overflow(field, mapping.op))
        }
        AggregateOp::Concat => Ok(concat(present.iter().map(ToString::to_string))),
        AggregateOp::ConcatDistinct => {
            // First-occurrence order, not sorted.
            let mut seen: BTreeSet<String> = BTreeSet::new();
            Ok(concat(
                present
                    .iter()
                    .map(ToString::to_string)
                    .filter(|rendered| seen.insert(rendered.clone())),
            ))
        }
    }
}

fn fold_sum(field: &str, values: &[&Value], op: AggregateOp) -> Result<Decimal, AggregateError> {
    let mut sum = Decimal::ZERO;
    for value in values {
        sum = sum
            .checked_add(numeric(field, value)?)
            .ok_or_else(|| overflow(field, op))?;
    }

    Ok(sum)
}

fn fold_extremum(
    field: &str,
    values: &[&Value],
    keep: std::cmp::Ordering,
) -> Result<Value, AggregateError> {
    let mut best: Option<&Value> = None;
    for value in values.iter().copied() {
        best = match best {
            None => Some(value),
            Some(current) => {
                let ordering = Value::strict_order_cmp(value, current).ok_or_else(|| {
                    AggregateError::IncomparableValues {
                        field: field.to_string(),
                    }
                })?;
                if ordering == keep { Some(value) } else { Some(current) }
            }
        };
    }

    Ok(best.cloned().unwrap_or(Value::Null))
}

fn concat(rendered: impl Iterator<Item = String>) -> Value {
    let joined = rendered.collect::<Vec<_>>().join(MemoryEngine::CONCAT_DELIMITER);
    if joined.is_empty() {
        Value::Null
    } else {
        Value::Text(joined)
    }
}

fn numeric(field: &str, value: &Value) -> Result<Decimal, AggregateError> {
    value
        .to_numeric_decimal()
        .ok_or_else(|| AggregateError::NonNumericValue {
            field: field.to_string(),
            value: Box::new(value.clone()),
        })
}

fn overflow(field: &str, op: AggregateOp) -> AggregateError {
    AggregateError::ArithmeticOverflow {
        field: field.to_string(),
        op,
    }
}

///
/// TESTS
///
