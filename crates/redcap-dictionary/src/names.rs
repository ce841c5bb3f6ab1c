//! Identifier normalization.
//!
//! Raw column names are turned into identifiers that contain only word
//! characters, never start with a digit or underscore, and are unique within
//! their [`Namespace`]. A namespace owns its seen-set; uniqueness across
//! repeated calls comes from every accepted identifier being registered.

use std::collections::BTreeSet;

use redcap_model::{FIELD_PREFIX, HEADER_PREFIX, VARIABLE_PREFIX};

use crate::error::NameError;

/// A uniqueness scope for identifiers.
///
/// One instance per scope is created at the start of a build and dropped at
/// its end. Identifiers in different namespaces may share text.
#[derive(Debug, Clone)]
pub struct Namespace {
    label: &'static str,
    prefix: &'static str,
    seen: BTreeSet<String>,
}

impl Namespace {
    pub fn new(label: &'static str, prefix: &'static str) -> Self {
        Self {
            label,
            prefix,
            seen: BTreeSet::new(),
        }
    }

    /// Namespace for variable identifiers (`var_` prefix).
    pub fn variables() -> Self {
        Self::new("variables", VARIABLE_PREFIX)
    }

    /// Namespace for field identifiers (`field_` prefix).
    pub fn fields() -> Self {
        Self::new("fields", FIELD_PREFIX)
    }

    /// Transient namespace for rewritten table headers (`hdr_` prefix).
    pub fn headers() -> Self {
        Self::new("headers", HEADER_PREFIX)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.seen.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Normalizes `raw` with this namespace's own prefix and registers it.
    pub fn normalize(&mut self, raw: &str) -> Result<String, NameError> {
        self.normalize_as(raw, self.prefix)
    }

    /// Normalizes `raw` with an explicit prefix and registers it.
    ///
    /// Non-word characters become `_`, the result is lower-cased, `prefix` is
    /// prepended when the name starts with a digit or underscore, and `_1`,
    /// `_2`, ... is appended until the name is unused in this namespace.
    pub fn normalize_as(&mut self, raw: &str, prefix: &str) -> Result<String, NameError> {
        if raw.is_empty() {
            return Err(NameError::EmptyName {
                namespace: self.label,
            });
        }

        let mut base = clean_name(raw);
        if needs_prefix(&base) {
            base.insert_str(0, prefix);
        }

        let mut candidate = base.clone();
        let mut count = 1usize;
        while self.seen.contains(&candidate) {
            candidate = format!("{base}_{count}");
            count += 1;
        }

        self.seen.insert(candidate.clone());
        Ok(candidate)
    }

    /// Normalizes a batch of names with this namespace's own prefix.
    pub fn normalize_all<'a, I>(&mut self, raws: I) -> Result<Vec<String>, NameError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.normalize_all_as(raws, self.prefix)
    }

    /// Normalizes a batch of names in order.
    ///
    /// All names are checked before any is registered, so an invalid batch
    /// leaves the namespace unchanged.
    pub fn normalize_all_as<'a, I>(&mut self, raws: I, prefix: &str) -> Result<Vec<String>, NameError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raws: Vec<&str> = raws.into_iter().collect();
        if let Some(position) = raws.iter().position(|raw| raw.is_empty()) {
            return Err(NameError::EmptyColumnName {
                namespace: self.label,
                position,
            });
        }
        raws.into_iter()
            .map(|raw| self.normalize_as(raw, prefix))
            .collect()
    }
}

/// Word characters: Unicode letters and digits plus the underscore.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Replaces non-word characters with `_` and lower-cases the rest.
pub fn clean_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if !is_word_char(ch) {
            cleaned.push('_');
            continue;
        }
        for lower in ch.to_lowercase() {
            // A few code points lower-case into combining marks.
            cleaned.push(if is_word_char(lower) { lower } else { '_' });
        }
    }
    cleaned
}

fn needs_prefix(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|first| first.is_numeric() || first == '_')
}

/// Checks the identifier rule: non-empty, word characters only, and not
/// starting with a digit or underscore.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_word_char) && !needs_prefix(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_replaces_symbols_and_lowercases() {
        assert_eq!(clean_name("Total$"), "total_");
        assert_eq!(clean_name("Visit Date"), "visit_date");
        assert_eq!(clean_name("BMI (kg/m2)"), "bmi__kg_m2_");
        assert_eq!(clean_name("Größe"), "größe");
    }

    #[test]
    fn test_leading_digit_or_underscore_gets_prefix() {
        let mut ns = Namespace::variables();
        assert_eq!(ns.normalize("2nd Visit").unwrap(), "var_2nd_visit");
        assert_eq!(ns.normalize("_hidden").unwrap(), "var__hidden");
        assert_eq!(ns.normalize("#count").unwrap(), "var__count");
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let mut ns = Namespace::fields();
        assert_eq!(ns.normalize("Total$").unwrap(), "total_");
        assert_eq!(ns.normalize("total%").unwrap(), "total__1");
        assert_eq!(ns.normalize("TOTAL!").unwrap(), "total__2");
        assert_eq!(ns.len(), 3);
    }

    #[test]
    fn test_suffix_skips_names_already_taken() {
        let mut ns = Namespace::headers();
        ns.normalize("age_1").unwrap();
        ns.normalize("age").unwrap();
        assert_eq!(ns.normalize("Age").unwrap(), "age_2");
    }

    #[test]
    fn test_explicit_prefix_overrides_namespace_prefix() {
        let mut ns = Namespace::fields();
        assert_eq!(ns.normalize_as("1st", HEADER_PREFIX).unwrap(), "hdr_1st");
        assert!(ns.contains("hdr_1st"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut ns = Namespace::variables();
        let err = ns.normalize("").unwrap_err();
        assert!(matches!(err, NameError::EmptyName { namespace: "variables" }));
        assert!(ns.is_empty());
    }

    #[test]
    fn test_batch_with_empty_name_registers_nothing() {
        let mut ns = Namespace::fields();
        let err = ns.normalize_all(["id", "", "age"]).unwrap_err();
        assert!(matches!(err, NameError::EmptyColumnName { position: 1, .. }));
        assert!(ns.is_empty());
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("visit_date"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1st"));
        assert!(!is_valid_identifier("_x"));
        assert!(!is_valid_identifier("a-b"));
    }
}
