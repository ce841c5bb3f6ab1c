//! Field type inference from column dtypes.
//!
//! A column's [`ValueKind`] is read once from its Polars dtype, and the kind
//! alone selects the declared field type:
//!
//! | kind     | field type | validation | bounds             |
//! |----------|------------|------------|--------------------|
//! | Integer  | `text`     | `integer`  | column min and max |
//! | Float    | `text`     | `number`   | none               |
//! | DateTime | `date`     | `date`     | none               |
//! | Text     | `text`     | (none)     | none               |
//!
//! Float columns never get bounds even though they could be computed.

use polars::prelude::{AnyValue, Column, DataType};

use redcap_model::{FieldType, ValidationType, ValueKind};

/// Declared type and validation bounds of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredType {
    pub kind: ValueKind,
    pub field_type: FieldType,
    pub validation: ValidationType,
    /// Stringified minimum, empty when inapplicable.
    pub min: String,
    /// Stringified maximum, empty when inapplicable.
    pub max: String,
}

impl InferredType {
    fn unbounded(kind: ValueKind, field_type: FieldType, validation: ValidationType) -> Self {
        Self {
            kind,
            field_type,
            validation,
            min: String::new(),
            max: String::new(),
        }
    }
}

/// Classifies a Polars dtype into the closed set of value kinds.
pub fn value_kind(dtype: &DataType) -> ValueKind {
    if dtype.is_integer() {
        ValueKind::Integer
    } else if dtype.is_float() {
        ValueKind::Float
    } else if matches!(dtype, DataType::Date | DataType::Datetime(_, _)) {
        ValueKind::DateTime
    } else {
        ValueKind::Text
    }
}

/// Infers the field type, validation type and bounds of a column.
///
/// Never fails: anything unrecognised is plain text.
pub fn infer_column(column: &Column) -> InferredType {
    let kind = value_kind(column.dtype());
    match kind {
        ValueKind::Integer => {
            let (min, max) = integer_bounds(column);
            InferredType {
                kind,
                field_type: FieldType::Text,
                validation: ValidationType::Integer,
                min,
                max,
            }
        }
        ValueKind::Float => InferredType::unbounded(kind, FieldType::Text, ValidationType::Number),
        ValueKind::DateTime => InferredType::unbounded(kind, FieldType::Date, ValidationType::Date),
        ValueKind::Text => InferredType::unbounded(kind, FieldType::Text, ValidationType::None),
    }
}

/// Min and max of an integer column, ignoring nulls.
///
/// Both are empty when the column holds no values.
fn integer_bounds(column: &Column) -> (String, String) {
    let series = column.as_materialized_series();
    let min = series
        .min_reduce()
        .map(|scalar| bound_to_string(scalar.value()))
        .unwrap_or_default();
    let max = series
        .max_reduce()
        .map(|scalar| bound_to_string(scalar.value()))
        .unwrap_or_default();
    if min.is_empty() || max.is_empty() {
        return (String::new(), String::new());
    }
    (min, max)
}

fn bound_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        other => other.to_string(),
    }
}
