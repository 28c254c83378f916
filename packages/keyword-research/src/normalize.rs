//! Keyword hygiene: normalization, year-token filtering, deduplication.
//!
//! Every keyword-bearing string that leaves the pipeline passes through
//! these functions. They are pure and independently testable.

use std::collections::HashSet;

/// Default blocked year tokens. Keywords referencing stale years rank for
/// queries nobody searches anymore, so candidates carrying them are dropped.
pub const DEFAULT_BLOCKED_YEARS: [&str; 4] = ["2022", "2023", "2024", "2025"];

/// Normalize a keyword phrase: trim, collapse inner whitespace, and
/// lower-case the first letter unless it looks like a proper noun.
///
/// The proper-noun guard is a heuristic: the first character is only
/// lower-cased when the character after it is lowercase, so acronyms
/// ("SEO tools") survive while sentence-cased phrases ("Best dog food")
/// are normalized.
pub fn normalize_keyword(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    let Some(first) = chars.next() else {
        return collapsed;
    };

    let second_is_lower = chars.next().map(|c| c.is_lowercase()).unwrap_or(true);
    if first.is_uppercase() && second_is_lower {
        let mut out = String::with_capacity(collapsed.len());
        out.extend(first.to_lowercase());
        out.push_str(&collapsed[first.len_utf8()..]);
        out
    } else {
        collapsed
    }
}

/// Check whether text contains any blocked year token.
pub fn contains_blocked_year(text: &str, blocked_years: &[String]) -> bool {
    blocked_years.iter().any(|year| text.contains(year.as_str()))
}

/// Drop list entries containing a blocked year token, normalizing survivors.
pub fn filter_phrases(phrases: Vec<String>, blocked_years: &[String]) -> Vec<String> {
    phrases
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .filter(|p| !contains_blocked_year(p, blocked_years))
        .map(|p| normalize_keyword(&p))
        .collect()
}

/// Case-insensitive deduplication that preserves first-seen order.
///
/// `existing` entries are treated as already taken: a phrase matching one
/// of them (ignoring case) is excluded from the output entirely.
pub fn dedup_case_insensitive(phrases: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.trim().to_lowercase()).collect();

    phrases
        .into_iter()
        .filter(|p| seen.insert(p.trim().to_lowercase()))
        .collect()
}
