//! Type-safe enumerations for data dictionary metadata.
//!
//! These enums cover the closed vocabularies that appear as plain strings in
//! the flat dictionary file: field types, text validation types, and the
//! value kinds a source column can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared field type of a dictionary entry.
///
/// Only the two types produced by inference are modelled; the other field
/// types of the import format (radio, dropdown, calc, ...) are never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text entry, optionally constrained by a validation type.
    #[default]
    Text,
    /// Date entry.
    Date,
}

impl FieldType {
    /// Returns the token written to the `Field Type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "date" => Ok(FieldType::Date),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// Secondary validation tag constraining permissible input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    /// No validation (written as an empty cell).
    #[default]
    None,
    /// Whole numbers, optionally bounded by min/max.
    Integer,
    /// Any number.
    Number,
    /// Calendar date.
    Date,
}

impl ValidationType {
    /// Returns the token written to the validation column (empty for `None`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationType::None => "",
            ValidationType::Integer => "integer",
            ValidationType::Number => "number",
            ValidationType::Date => "date",
        }
    }

    /// Returns true when no validation applies.
    pub fn is_none(&self) -> bool {
        matches!(self, ValidationType::None)
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValidationType {
    type Err = String;

    /// Parse a validation token. An empty cell means no validation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(ValidationType::None),
            "integer" => Ok(ValidationType::Integer),
            "number" => Ok(ValidationType::Number),
            "date" => Ok(ValidationType::Date),
            _ => Err(format!("Unknown validation type: {s}")),
        }
    }
}

/// Homogeneous value kind of a source column, determined once per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Signed or unsigned integers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Dates, datetimes and times of day.
    DateTime,
    /// Anything else, including columns with no typed values.
    Text,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::DateTime => "datetime",
            ValueKind::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("text".parse::<FieldType>().unwrap(), FieldType::Text);
        assert_eq!(" DATE ".parse::<FieldType>().unwrap(), FieldType::Date);
        assert!("radio".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_validation_type_empty_is_none() {
        assert_eq!("".parse::<ValidationType>().unwrap(), ValidationType::None);
        assert_eq!(
            "Integer".parse::<ValidationType>().unwrap(),
            ValidationType::Integer
        );
        assert_eq!(ValidationType::None.as_str(), "");
        assert!(ValidationType::None.is_none());
    }
}
