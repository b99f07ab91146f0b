//! Deterministic short-name allocation.
//!
//! A canonical name is tokenized, then candidates are derived first from the
//! last token and then from initials of the trailing tokens. Each candidate is
//! checked against the set of short names already taken in the same scope. Only
//! when every deterministic candidate collides does allocation fall back to a
//! random identifier.

use std::collections::HashSet;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Attributed;
use crate::utils::{id_generator, tokenizer};

/// Default maximum length of a short name
pub const DEFAULT_MAX_SIZE: usize = 5;

/// Default bound on numeric suffix variants tried per truncation
pub const DEFAULT_VERSIONS_PER_OPTION: usize = 9;

/// Suffixes stay single-digit
pub const MAX_VERSIONS_PER_OPTION: usize = 10;

/// Tunables for the deterministic candidate search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub max_size: usize,
    pub versions_per_option: usize,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            versions_per_option: DEFAULT_VERSIONS_PER_OPTION,
        }
    }
}

impl SearchParameters {
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            max_size,
            ..Default::default()
        }
    }
}

/// Allocates a short name for `name` that is not in `taken`.
///
/// Never fails: when the deterministic search is exhausted a random name is
/// returned instead.
pub fn allocate_short_name(name: &str, max_size: usize, taken: &HashSet<String>) -> String {
    allocate_with_rng(
        name,
        &SearchParameters::with_max_size(max_size),
        taken,
        &mut rand::rng(),
    )
}

/// Same as [`allocate_short_name`] with explicit parameters and random source
pub fn allocate_with_rng<R: Rng>(
    name: &str,
    params: &SearchParameters,
    taken: &HashSet<String>,
    rng: &mut R,
) -> String {
    if let Some(short_name) = search(name, params, taken) {
        debug!("Allocated short name '{}' for '{}'", short_name, name);
        return short_name;
    }

    let short_name = id_generator::random_short_name(rng, params.max_size, taken);
    debug!(
        "Deterministic search exhausted for '{}', allocated random short name '{}'",
        name, short_name
    );
    short_name
}

/// Runs only the deterministic search, returning `None` on exhaustion
pub fn search(name: &str, params: &SearchParameters, taken: &HashSet<String>) -> Option<String> {
    find_candidate(&tokenizer::tokenize(name), params, taken)
}

/// Allocates a short name for `name` and stores it in `target`'s attributes
pub fn assign_short_name<T: Attributed + ?Sized>(
    target: &mut T,
    name: &str,
    params: &SearchParameters,
    taken: &HashSet<String>,
) -> String {
    let short_name = allocate_with_rng(name, params, taken, &mut rand::rng());
    target.set_short_name(&short_name);
    short_name
}

/// Searches candidates built from `tokens`.
///
/// The last token is tried on its own first. If that fails and there are
/// several tokens, fused initials of a window over the trailing tokens are
/// tried, dropping the earliest token of the window after each failure until
/// a single token would remain.
pub fn find_candidate(
    tokens: &[String],
    params: &SearchParameters,
    taken: &HashSet<String>,
) -> Option<String> {
    let last = tokens.last()?;

    if let Some(candidate) = word_candidates(last, params, taken) {
        return Some(candidate);
    }

    let window = tokens.len().min(params.max_size);
    let mut start = tokens.len() - window;

    while tokens.len() - start > 1 {
        let fused = fuse_initials(&tokens[start..], params.max_size);
        if let Some(candidate) = word_candidates(&fused, params, taken) {
            return Some(candidate);
        }
        start += 1;
    }

    None
}

/// Fuses the initials of `tokens` into a string of at most `max_size` characters.
///
/// Every token contributes its first character. While the result plus one
/// character per remaining token is still shorter than `max_size`, the current
/// token contributes further leading characters.
pub fn fuse_initials(tokens: &[String], max_size: usize) -> String {
    let mut fused = String::with_capacity(max_size);

    for (idx, token) in tokens.iter().enumerate() {
        let remaining = tokens.len() - idx - 1;
        let mut chars = token.chars();

        if let Some(first) = chars.next() {
            fused.push(first);
        }

        for c in chars {
            if fused.len() + remaining >= max_size {
                break;
            }
            fused.push(c);
        }
    }

    fused
}

/// Returns the first candidate derived from `word` that is not in `taken`.
///
/// Candidates, in order:
/// 1. prefixes of length `1..size`
/// 2. prefixes of length `1..size-1` followed by a suffix `1..versions`
/// 3. the whole word followed by a suffix `1..versions`, only when the word is
///    shorter than `max_size`
///
/// where `size = min(len(word), max_size)`.
pub fn word_candidates(
    word: &str,
    params: &SearchParameters,
    taken: &HashSet<String>,
) -> Option<String> {
    let word: String = word
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let found = candidates(&word, params).find(|candidate| !taken.contains(candidate));
    found
}

fn candidates<'a>(
    word: &'a str,
    params: &SearchParameters,
) -> impl Iterator<Item = String> + 'a {
    let max_size = params.max_size;
    let versions = params.versions_per_option.min(MAX_VERSIONS_PER_OPTION);
    let size = word.len().min(max_size);

    let truncations = (1..size).map(move |i| word[..i].to_string());

    let suffixed = (1..size.saturating_sub(1)).flat_map(move |i| {
        (1..versions).map(move |j| format!("{}{}", &word[..i], j))
    });

    let whole_versions = if max_size > size { versions } else { 0 };
    let whole = (1..whole_versions).map(move |j| format!("{}{}", word, j));

    truncations.chain(suffixed).chain(whole)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLUSTER: &str = "gke_elated-pottery-310110_us-central1-c_dwertent";

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn params(max_size: usize, versions_per_option: usize) -> SearchParameters {
        SearchParameters {
            max_size,
            versions_per_option,
        }
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_search_prefers_shortest_prefix_of_last_token() {
        assert_eq!(search(CLUSTER, &params(5, 3), &taken(&[])).as_deref(), Some("D"));
        assert_eq!(search(CLUSTER, &params(5, 3), &taken(&["D"])).as_deref(), Some("DW"));
    }

    #[test]
    fn test_search_escalates_to_numeric_suffix() {
        let set = taken(&["D", "DW", "DWE", "DWER", "DWERT"]);
        assert_eq!(search(CLUSTER, &params(5, 3), &set).as_deref(), Some("D1"));

        let set = taken(&["D", "DW", "DWE", "DWER", "DWERT", "D1", "D2", "DW1"]);
        assert_eq!(search(CLUSTER, &params(5, 3), &set).as_deref(), Some("DW2"));
    }

    #[test]
    fn test_word_candidates_order() {
        let all: Vec<String> = candidates("DWERTENT", &params(5, 3)).collect();
        assert_eq!(
            all,
            vec!["D", "DW", "DWE", "DWER", "D1", "D2", "DW1", "DW2", "DWE1", "DWE2"]
        );
    }

    #[test]
    fn test_word_candidates_normalizes_word() {
        let set = taken(&["D"]);
        assert_eq!(
            word_candidates("dw-ért", &params(5, 9), &set).as_deref(),
            Some("DW")
        );
    }

    #[test]
    fn test_word_candidates_short_word_gets_whole_word_suffix() {
        let set = taken(&["M", "M1", "M2", "M3"]);
        assert_eq!(
            word_candidates("m", &params(5, 5), &set).as_deref(),
            Some("M4")
        );
    }

    #[test]
    fn test_word_candidates_caps_versions() {
        let all: Vec<String> = candidates("AB", &params(5, 50)).collect();
        assert_eq!(all.first().map(String::as_str), Some("A"));
        assert_eq!(all.last().map(String::as_str), Some("AB9"));
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_word_candidates_zero_versions() {
        let all: Vec<String> = candidates("POTTERY", &params(5, 0)).collect();
        assert_eq!(all, vec!["P", "PO", "POT", "POTT"]);
    }

    #[test]
    fn test_fuse_initials_fills_max_size() {
        let window = tokens(&["US", "C", "DWERTENT"]);
        assert_eq!(fuse_initials(&window, 5), "USCDW");

        let window = tokens(&["POTTERY", "US", "CENTRAL", "C", "DWERTENT"]);
        assert_eq!(fuse_initials(&window, 5), "PUCCD");

        let window = tokens(&["ELATED", "POTTERY"]);
        assert_eq!(fuse_initials(&window, 5), "ELATP");
    }

    #[test]
    fn test_find_candidate_falls_back_to_initials() {
        let words = tokens(&["ELATED", "POTTERY"]);
        let set = taken(&["P", "PO", "POT", "POTT", "ELATP"]);
        // every POTTERY candidate is blocked once versions is zero
        assert_eq!(
            find_candidate(&words, &params(5, 0), &set).as_deref(),
            Some("E")
        );
    }

    #[test]
    fn test_find_candidate_shifts_window() {
        let words = tokens(&["AB", "CD", "EF"]);
        // last token: E; window [AB, CD, EF] fuses to ABCDE
        let set = taken(&["E", "A", "AB", "ABC", "ABCD"]);
        assert_eq!(
            find_candidate(&words, &params(5, 0), &set).as_deref(),
            Some("C")
        );
    }

    #[test]
    fn test_find_candidate_exhausted() {
        let words = tokens(&["AB", "CD"]);
        let set = taken(&["A", "C"]);
        assert_eq!(find_candidate(&words, &params(2, 0), &set), None);
    }

    #[test]
    fn test_find_candidate_without_tokens() {
        assert_eq!(find_candidate(&[], &params(5, 9), &taken(&[])), None);
        assert_eq!(search("310110-42", &params(5, 9), &taken(&[])), None);
    }

    #[test]
    fn test_allocate_falls_back_to_random() {
        let short_name = allocate_short_name("12345", 5, &taken(&[]));
        assert_eq!(short_name.len(), 3);
        assert!(short_name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_assign_short_name_writes_attribute() {
        let mut doc = serde_json::json!({ "region": "us" });
        let short_name = assign_short_name(
            &mut doc,
            "gke_elated-pottery",
            &SearchParameters::default(),
            &taken(&["P"]),
        );

        assert_eq!(short_name, "PO");
        assert_eq!(doc.short_name(), Some("PO"));
    }
}
