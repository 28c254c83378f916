//! Keyword gap analysis: pure set/frequency work, no I/O.
//!
//! A gap is a keyword at least two competitors use that the subject site
//! does not. Opportunity bands by referencing-competitor count: high at
//! 4+, medium at 3, low at 2.

use indexmap::IndexMap;

use crate::types::competitor::{CompetitorProfile, KeywordGap, OpportunityLevel};

/// Minimum competitors that must reference a keyword before it is a gap.
const GAP_THRESHOLD: usize = 2;

/// Analyze gaps between own keywords and competitor keywords.
///
/// Results are sorted by opportunity band, then by referencing-competitor
/// count, and capped at `cap`.
pub(crate) fn analyze_gaps(
    own_keywords: &[String],
    competitors: &[CompetitorProfile],
    cap: usize,
) -> Vec<KeywordGap> {
    let own: std::collections::HashSet<String> = own_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .collect();

    // keyword -> competitor names referencing it (insertion-ordered so
    // output is deterministic for a given input order)
    let mut usage: IndexMap<String, Vec<String>> = IndexMap::new();
    for competitor in competitors {
        for keyword in &competitor.top_keywords {
            let normalized = keyword.trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            let names = usage.entry(normalized).or_default();
            if !names.contains(&competitor.name) {
                names.push(competitor.name.clone());
            }
        }
    }

    let mut gaps: Vec<KeywordGap> = usage
        .into_iter()
        .filter(|(keyword, names)| !own.contains(keyword) && names.len() >= GAP_THRESHOLD)
        .map(|(keyword, names)| {
            let opportunity = opportunity_for(names.len());
            let reason = format!(
                "Used by {} competitors ({}) but missing from your site",
                names.len(),
                names.join(", ")
            );
            KeywordGap {
                keyword,
                used_by_competitors: names,
                missing_in_own_site: true,
                opportunity,
                reason,
            }
        })
        .collect();

    gaps.sort_by(|a, b| {
        a.opportunity
            .rank()
            .cmp(&b.opportunity.rank())
            .then(b.used_by_competitors.len().cmp(&a.used_by_competitors.len()))
    });
    gaps.truncate(cap);
    gaps
}

fn opportunity_for(competitor_count: usize) -> OpportunityLevel {
    if competitor_count >= 4 {
        OpportunityLevel::High
    } else if competitor_count >= 3 {
        OpportunityLevel::Medium
    } else {
        OpportunityLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(name: &str, keywords: &[&str]) -> CompetitorProfile {
        CompetitorProfile {
            name: name.to_string(),
            url: format!("https://{}.example", name.to_lowercase()),
            description: String::new(),
            top_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            content_focus: vec![],
            estimated_traffic: 0,
        }
    }

    #[test]
    fn test_single_competitor_keyword_never_emitted() {
        let competitors = vec![
            competitor("A", &["unique keyword"]),
            competitor("B", &["other keyword"]),
        ];

        let gaps = analyze_gaps(&[], &competitors, 50);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_own_keywords_excluded_case_insensitive() {
        let competitors = vec![
            competitor("A", &["Dog Food"]),
            competitor("B", &["dog food"]),
        ];

        let gaps = analyze_gaps(&["DOG FOOD".to_string()], &competitors, 50);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_opportunity_bands() {
        let competitors = vec![
            competitor("A", &["four way", "three way", "two way"]),
            competitor("B", &["four way", "three way", "two way"]),
            competitor("C", &["four way", "three way"]),
            competitor("D", &["four way"]),
        ];

        let gaps = analyze_gaps(&[], &competitors, 50);
        assert_eq!(gaps.len(), 3);

        assert_eq!(gaps[0].keyword, "four way");
        assert_eq!(gaps[0].opportunity, OpportunityLevel::High);
        assert_eq!(gaps[0].used_by_competitors.len(), 4);

        assert_eq!(gaps[1].keyword, "three way");
        assert_eq!(gaps[1].opportunity, OpportunityLevel::Medium);

        assert_eq!(gaps[2].keyword, "two way");
        assert_eq!(gaps[2].opportunity, OpportunityLevel::Low);
        assert!(gaps[2].missing_in_own_site);
    }

    #[test]
    fn test_duplicate_keyword_within_one_competitor_counts_once() {
        let competitors = vec![
            competitor("A", &["repeat", "Repeat", "REPEAT"]),
            competitor("B", &["something else"]),
        ];

        let gaps = analyze_gaps(&[], &competitors, 50);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_cap_applied_after_sort() {
        let competitors = vec![
            competitor("A", &["low band", "high band"]),
            competitor("B", &["low band", "high band"]),
            competitor("C", &["high band"]),
            competitor("D", &["high band"]),
        ];

        let gaps = analyze_gaps(&[], &competitors, 1);
        assert_eq!(gaps.len(), 1);
        // The high-opportunity gap survives the cap
        assert_eq!(gaps[0].keyword, "high band");
    }

    #[test]
    fn test_reason_is_human_readable() {
        let competitors = vec![
            competitor("Acme", &["widget polish"]),
            competitor("Globex", &["widget polish"]),
        ];

        let gaps = analyze_gaps(&[], &competitors, 50);
        assert!(gaps[0].reason.contains("Acme"));
        assert!(gaps[0].reason.contains("2 competitors"));
    }
}
