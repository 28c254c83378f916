//! Competitor profiles and keyword gaps.

use serde::{Deserialize, Serialize};

/// Cap on keywords kept per competitor scan.
pub const MAX_COMPETITOR_KEYWORDS: usize = 15;

/// A competitor surfaced by the research pipeline.
///
/// Created transiently per research request; never persisted by the core.
/// The list is sourced from the generation service's general knowledge,
/// so entries are best-effort: name and url are required, everything else
/// may be empty after a failed or timed-out scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorProfile {
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub description: String,

    /// Keywords found on the competitor's site, at most
    /// [`MAX_COMPETITOR_KEYWORDS`]
    #[serde(default)]
    pub top_keywords: Vec<String>,

    /// Content themes derived from the scanned keywords
    #[serde(default)]
    pub content_focus: Vec<String>,

    /// Rough monthly traffic estimate
    #[serde(default)]
    pub estimated_traffic: u64,
}

/// Opportunity band for a keyword gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityLevel {
    High,
    Medium,
    Low,
}

impl OpportunityLevel {
    /// Sort rank: high first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// A keyword competitors rank for that the subject site does not.
///
/// Emitted only when referenced by at least two competitor profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGap {
    pub keyword: String,

    /// Names of the competitors using this keyword
    pub used_by_competitors: Vec<String>,

    /// Always true for emitted gaps
    pub missing_in_own_site: bool,

    pub opportunity: OpportunityLevel,

    /// Human-readable rationale
    pub reason: String,
}
