//! Metadata records and their flat-file representation.

use serde::{Deserialize, Serialize};

use crate::enums::{FieldType, ValidationType};
use crate::error::{ModelError, Result};

/// Column titles of the flat dictionary file, in file order.
pub const DICTIONARY_COLUMNS: [&str; 18] = [
    "Variable / Field Name",
    "Form Name",
    "Section Header",
    "Field Type",
    "Field Label",
    "Choices, Calculations, OR Slider Labels",
    "Field Note",
    "Text Validation Type OR Show Slider Number",
    "Text Validation Min",
    "Text Validation Max",
    "Identifier?",
    "Branching Logic (Show field only if)",
    "Required Field?",
    "Custom Alignment",
    "Question Number (surveys only)",
    "Matrix Group Name",
    "Matrix Ranking?",
    "Field Annotation",
];

/// Token used in the `Required Field?` column.
pub const REQUIRED_FLAG: &str = "y";

/// One dictionary entry describing a single source column.
///
/// The descriptive fields (section header, choices, branching logic, ...)
/// are never inferred and stay empty until downstream tooling fills them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Variable identifier, unique across the dictionary.
    pub variable_name: String,
    /// Form the field belongs to, derived from the source table name.
    pub form_name: String,
    pub section_header: String,
    pub field_type: FieldType,
    /// Field identifier, unique across the dictionary; doubles as the label.
    pub field_label: String,
    pub choices: String,
    pub field_note: String,
    pub validation: ValidationType,
    /// Lower bound, empty when inapplicable.
    pub validation_min: String,
    /// Upper bound, empty when inapplicable.
    pub validation_max: String,
    pub identifier: String,
    pub branching_logic: String,
    pub required: bool,
    pub custom_alignment: String,
    pub question_number: String,
    pub matrix_group_name: String,
    pub matrix_ranking: String,
    pub field_annotation: String,
}

impl MetadataRecord {
    /// Creates a required text field with no validation.
    pub fn new(
        variable_name: impl Into<String>,
        form_name: impl Into<String>,
        field_label: impl Into<String>,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            form_name: form_name.into(),
            section_header: String::new(),
            field_type: FieldType::Text,
            field_label: field_label.into(),
            choices: String::new(),
            field_note: String::new(),
            validation: ValidationType::None,
            validation_min: String::new(),
            validation_max: String::new(),
            identifier: String::new(),
            branching_logic: String::new(),
            required: true,
            custom_alignment: String::new(),
            question_number: String::new(),
            matrix_group_name: String::new(),
            matrix_ranking: String::new(),
            field_annotation: String::new(),
        }
    }

    /// Set the declared field type and validation type.
    #[must_use]
    pub fn with_type(mut self, field_type: FieldType, validation: ValidationType) -> Self {
        self.field_type = field_type;
        self.validation = validation;
        self
    }

    /// Set the validation bounds (empty strings mean unbounded).
    #[must_use]
    pub fn with_bounds(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.validation_min = min.into();
        self.validation_max = max.into();
        self
    }

    /// Returns true when both validation bounds are present.
    pub fn has_bounds(&self) -> bool {
        !self.validation_min.is_empty() && !self.validation_max.is_empty()
    }
}

/// A dictionary entry exactly as it appears in the flat file.
///
/// Every cell is a string; conversion to and from [`MetadataRecord`]
/// handles the typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryRow {
    #[serde(rename = "Variable / Field Name")]
    pub variable_name: String,
    #[serde(rename = "Form Name")]
    pub form_name: String,
    #[serde(rename = "Section Header")]
    pub section_header: String,
    #[serde(rename = "Field Type")]
    pub field_type: String,
    #[serde(rename = "Field Label")]
    pub field_label: String,
    #[serde(rename = "Choices, Calculations, OR Slider Labels")]
    pub choices: String,
    #[serde(rename = "Field Note")]
    pub field_note: String,
    #[serde(rename = "Text Validation Type OR Show Slider Number")]
    pub validation: String,
    #[serde(rename = "Text Validation Min")]
    pub validation_min: String,
    #[serde(rename = "Text Validation Max")]
    pub validation_max: String,
    #[serde(rename = "Identifier?")]
    pub identifier: String,
    #[serde(rename = "Branching Logic (Show field only if)")]
    pub branching_logic: String,
    #[serde(rename = "Required Field?")]
    pub required: String,
    #[serde(rename = "Custom Alignment")]
    pub custom_alignment: String,
    #[serde(rename = "Question Number (surveys only)")]
    pub question_number: String,
    #[serde(rename = "Matrix Group Name")]
    pub matrix_group_name: String,
    #[serde(rename = "Matrix Ranking?")]
    pub matrix_ranking: String,
    #[serde(rename = "Field Annotation")]
    pub field_annotation: String,
}

impl From<&MetadataRecord> for DictionaryRow {
    fn from(record: &MetadataRecord) -> Self {
        Self {
            variable_name: record.variable_name.clone(),
            form_name: record.form_name.clone(),
            section_header: record.section_header.clone(),
            field_type: record.field_type.as_str().to_string(),
            field_label: record.field_label.clone(),
            choices: record.choices.clone(),
            field_note: record.field_note.clone(),
            validation: record.validation.as_str().to_string(),
            validation_min: record.validation_min.clone(),
            validation_max: record.validation_max.clone(),
            identifier: record.identifier.clone(),
            branching_logic: record.branching_logic.clone(),
            required: if record.required {
                REQUIRED_FLAG.to_string()
            } else {
                String::new()
            },
            custom_alignment: record.custom_alignment.clone(),
            question_number: record.question_number.clone(),
            matrix_group_name: record.matrix_group_name.clone(),
            matrix_ranking: record.matrix_ranking.clone(),
            field_annotation: record.field_annotation.clone(),
        }
    }
}

impl TryFrom<DictionaryRow> for MetadataRecord {
    type Error = ModelError;

    fn try_from(row: DictionaryRow) -> Result<Self> {
        let field_type = row
            .field_type
            .parse::<FieldType>()
            .map_err(|_| ModelError::InvalidFieldType(row.field_type.clone()))?;
        let validation = row
            .validation
            .parse::<ValidationType>()
            .map_err(|_| ModelError::InvalidValidationType(row.validation.clone()))?;
        let required = match row.required.trim().to_lowercase().as_str() {
            "y" => true,
            "" => false,
            _ => return Err(ModelError::InvalidRequiredFlag(row.required)),
        };
        Ok(Self {
            variable_name: row.variable_name,
            form_name: row.form_name,
            section_header: row.section_header,
            field_type,
            field_label: row.field_label,
            choices: row.choices,
            field_note: row.field_note,
            validation,
            validation_min: row.validation_min,
            validation_max: row.validation_max,
            identifier: row.identifier,
            branching_logic: row.branching_logic,
            required,
            custom_alignment: row.custom_alignment,
            question_number: row.question_number,
            matrix_group_name: row.matrix_group_name,
            matrix_ranking: row.matrix_ranking,
            field_annotation: row.field_annotation,
        })
    }
}
