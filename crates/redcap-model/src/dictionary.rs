//! The assembled data dictionary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::MetadataRecord;

/// Ordered sequence of metadata records, one per processed source column.
///
/// Records keep insertion order: tables in discovery order, columns in
/// their on-disk order within each table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    pub records: Vec<MetadataRecord>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetadataRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataRecord> {
        self.records.iter()
    }

    /// Variable identifiers in record order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.variable_name.as_str())
    }

    /// Field identifiers in record order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.field_label.as_str())
    }

    /// Records belonging to a form.
    pub fn form(&self, form_name: &str) -> Vec<&MetadataRecord> {
        self.records
            .iter()
            .filter(|r| r.form_name == form_name)
            .collect()
    }

    /// Distinct form names in first-seen order with their field counts.
    pub fn form_summaries(&self) -> Vec<FormSummary> {
        let mut summaries: Vec<FormSummary> = Vec::new();
        for record in &self.records {
            match summaries.iter_mut().find(|s| s.form_name == record.form_name) {
                Some(summary) => summary.field_count += 1,
                None => summaries.push(FormSummary {
                    form_name: record.form_name.clone(),
                    field_count: 1,
                }),
            }
        }
        summaries
    }

    /// Returns true if variable identifiers and field identifiers are each
    /// unique across the whole dictionary.
    pub fn has_unique_identifiers(&self) -> bool {
        let mut variables = BTreeSet::new();
        let mut fields = BTreeSet::new();
        self.records.iter().all(|r| {
            variables.insert(r.variable_name.as_str()) && fields.insert(r.field_label.as_str())
        })
    }
}

impl FromIterator<MetadataRecord> for Dictionary {
    fn from_iter<I: IntoIterator<Item = MetadataRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a MetadataRecord;
    type IntoIter = std::slice::Iter<'a, MetadataRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Field count for a single form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub form_name: String,
    pub field_count: usize,
}

/// A pair of identifiers that differ only by a zero-bearing suffix.
///
/// Reported for human review; nothing is merged or renamed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuspectPair {
    /// The identifier carrying the suffix (e.g. `weight_0`).
    pub name: String,
    /// The identifier it collapses onto (e.g. `weight`).
    pub canonical: String,
}

impl SuspectPair {
    pub fn new(name: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical: canonical.into(),
        }
    }
}
