use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// Value
///
/// Runtime scalar carried by child and parent record fields.
/// Restricted to the variants rollup aggregation needs; collections and
/// reference shapes stay outside this core.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    /// Explicitly absent / SQL-null.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Decimal(Decimal),
    Text(String),
    /// Nanoseconds since epoch.
    Timestamp(u64),
}

impl Value {
    /// Strict comparator for identical orderable variants.
    ///
    /// Mixed numeric variants compare through `Decimal`; any other
    /// cross-variant pair returns `None`.
    #[must_use]
    pub fn strict_order_cmp(left: &Self, right: &Self) -> Option<Ordering> {
        match (left, right) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Uint(_) | Self::Decimal(_), _)
            | (_, Self::Int(_) | Self::Uint(_) | Self::Decimal(_)) => {
                match (left.to_numeric_decimal(), right.to_numeric_decimal()) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Coerce one numeric variant to the `Decimal` arithmetic substrate.
    #[must_use]
    pub fn to_numeric_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(n) => Some(Decimal::from(*n)),
            Self::Uint(n) => Some(Decimal::from(*n)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render one identifier-shaped value as a stable parent-id string.
    ///
    /// `Null` yields `None` ("no related parent"); non-identifier shapes
    /// also yield `None` and are rejected by the caller.
    #[must_use]
    pub fn to_identifier(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Uint(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Uint(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::Value;
    use rust_decimal::Decimal;
    use std::cmp::Ordering;

    #[test]
    fn strict_order_cmp_orders_same_variant_values() {
        let cmp = Value::strict_order_cmp(&Value::Uint(3), &Value::Uint(7));

        assert_eq!(cmp, Some(Ordering::Less));
    }

    #[test]
    fn strict_order_cmp_bridges_numeric_variants_through_decimal() {
        let cmp = Value::strict_order_cmp(&Value::Int(5), &Value::Decimal(Decimal::new(45, 1)));

        assert_eq!(cmp, Some(Ordering::Greater));
    }

    #[test]
    fn strict_order_cmp_rejects_mismatched_variants() {
        let cmp = Value::strict_order_cmp(&Value::Text("a".into()), &Value::Uint(1));

        assert_eq!(cmp, None);
    }

    #[test]
    fn numeric_coercion_covers_int_uint_decimal_only() {
        assert_eq!(
            Value::Int(-2).to_numeric_decimal(),
            Some(Decimal::from(-2i64))
        );
        assert_eq!(Value::Uint(2).to_numeric_decimal(), Some(Decimal::TWO));
        assert_eq!(
            Value::Decimal(Decimal::ONE).to_numeric_decimal(),
            Some(Decimal::ONE)
        );
        assert_eq!(Value::Text("2".into()).to_numeric_decimal(), None);
        assert_eq!(Value::Null.to_numeric_decimal(), None);
    }

    #[test]
    fn identifier_rendering_skips_null_and_non_identifier_shapes() {
        assert_eq!(Value::Text("A1".into()).to_identifier().as_deref(), Some("A1"));
        assert_eq!(Value::Uint(42).to_identifier().as_deref(), Some("42"));
        assert_eq!(Value::Null.to_identifier(), None);
        assert_eq!(Value::Bool(true).to_identifier(), None);
    }
}
