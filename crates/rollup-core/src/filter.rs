use crate::{record::Record, value::Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// FilterExpr
///
/// Serialized, engine-agnostic relationship-filter language.
///
/// This enum is intentionally limited to predicates that are:
/// - deterministic
/// - schema-visible
/// - safe across API boundaries
///
/// Filter equality participates in the grouping key: two definitions share
/// one aggregation context only when their filters are structurally equal.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum FilterExpr {
    /// Always true.
    True,

    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),

    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },

    In { field: String, values: Vec<Value> },

    /// Field is absent or explicitly null.
    IsNull { field: String },
    /// Field is present and non-null.
    NotNull { field: String },
}

impl FilterExpr {
    /// Evaluate one record against this filter.
    ///
    /// A missing field evaluates as `Null`; incomparable variants fail the
    /// predicate rather than erroring (the filter narrows, never aborts).
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::True => true,
            Self::And(children) => children.iter().all(|child| child.matches(record)),
            Self::Or(children) => children.iter().any(|child| child.matches(record)),
            Self::Not(child) => !child.matches(record),
            Self::Eq { field, value } => field_value(record, field) == *value,
            Self::Ne { field, value } => field_value(record, field) != *value,
            Self::Lt { field, value } => cmp_is(record, field, value, Ordering::is_lt),
            Self::Lte { field, value } => cmp_is(record, field, value, Ordering::is_le),
            Self::Gt { field, value } => cmp_is(record, field, value, Ordering::is_gt),
            Self::Gte { field, value } => cmp_is(record, field, value, Ordering::is_ge),
            Self::In { field, values } => values.contains(&field_value(record, field)),
            Self::IsNull { field } => field_value(record, field).is_null(),
            Self::NotNull { field } => !field_value(record, field).is_null(),
        }
    }
}

fn field_value(record: &Record, field: &str) -> Value {
    record.field(field).cloned().unwrap_or(Value::Null)
}

fn cmp_is(record: &Record, field: &str, value: &Value, check: fn(Ordering) -> bool) -> bool {
    Value::strict_order_cmp(&field_value(record, field), value).is_some_and(check)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::FilterExpr;
    use crate::{record::Record, value::Value};

    fn opportunity(stage: &str, amount: i64) -> Record {
        Record::new("O1", "Opportunity")
            .with_field("StageName", stage)
            .with_field("Amount", amount)
    }

    #[test]
    fn eq_and_ordering_predicates_evaluate_against_record_fields() {
        let filter = FilterExpr::And(vec![
            FilterExpr::Eq {
                field: "StageName".into(),
                value: Value::Text("Closed Won".into()),
            },
            FilterExpr::Gte {
                field: "Amount".into(),
                value: Value::Int(100),
            },
        ]);

        assert!(filter.matches(&opportunity("Closed Won", 150)));
        assert!(!filter.matches(&opportunity("Closed Won", 50)));
        assert!(!filter.matches(&opportunity("Prospecting", 150)));
    }

    #[test]
    fn missing_field_evaluates_as_null() {
        let record = Record::new("O1", "Opportunity");

        assert!(FilterExpr::IsNull {
            field: "StageName".into()
        }
        .matches(&record));
        assert!(!FilterExpr::Eq {
            field: "StageName".into(),
            value: Value::Text("Closed Won".into()),
        }
        .matches(&record));
    }

    #[test]
    fn incomparable_variants_fail_ordering_predicates() {
        let record = opportunity("Closed Won", 150);

        let filter = FilterExpr::Lt {
            field: "StageName".into(),
            value: Value::Int(10),
        };
        assert!(!filter.matches(&record));
    }

    #[test]
    fn in_predicate_matches_any_listed_value() {
        let filter = FilterExpr::In {
            field: "StageName".into(),
            values: vec![
                Value::Text("Closed Won".into()),
                Value::Text("Closed Lost".into()),
            ],
        };

        assert!(filter.matches(&opportunity("Closed Lost", 0)));
        assert!(!filter.matches(&opportunity("Prospecting", 0)));
    }
}
