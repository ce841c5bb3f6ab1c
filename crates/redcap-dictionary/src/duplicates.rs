//! Near-duplicate identifier lint.
//!
//! Extract tables often carry columns such as `weight` and `weight_0` that
//! hold the same concept. A name is suspect when its last underscore-delimited
//! segment contains a `0`; stripping trailing zeros and underscores gives its
//! canonical form, and the pair is reported when that form is itself one of
//! the identifiers. Nothing is renamed or merged.

use std::collections::BTreeSet;

use redcap_model::{Dictionary, SuspectPair};

/// Returns true if the last `_`-delimited segment contains a `0`.
pub fn is_suspect(name: &str) -> bool {
    name.rsplit('_').next().is_some_and(|segment| segment.contains('0'))
}

/// Strips trailing `0`s, then trailing underscores.
pub fn canonical_form(name: &str) -> &str {
    name.trim_end_matches('0').trim_end_matches('_')
}

/// Suspect names in first-seen order, without repeats.
pub fn suspect_names<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .filter(|name| is_suspect(name) && seen.insert(*name))
        .collect()
}

/// Pairs of suspect names whose canonical form is also present.
///
/// A suspect whose stripping changes nothing is paired with itself, since its
/// canonical form is trivially present. An empty canonical form never pairs.
pub fn find_suspects<'a, I>(names: I) -> BTreeSet<SuspectPair>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    let known: BTreeSet<&str> = names.iter().copied().collect();

    suspect_names(names)
        .into_iter()
        .filter_map(|name| {
            let canonical = canonical_form(name);
            let is_pair = !canonical.is_empty() && known.contains(canonical);
            is_pair.then(|| SuspectPair::new(name, canonical))
        })
        .collect()
}

/// Runs the lint over a dictionary's variable identifiers.
pub fn find_dictionary_suspects(dictionary: &Dictionary) -> BTreeSet<SuspectPair> {
    find_suspects(dictionary.variable_names())
}
