//! Keyword candidate types and classification enums.
//!
//! All DTOs serialize camelCase: they round-trip both to the dashboard
//! and through generation-service JSON. Enums serialize lowercase and
//! carry lenient `parse` constructors because model output spells them
//! as free strings; unknown spellings degrade to the documented default
//! instead of rejecting the whole record.

use serde::{Deserialize, Serialize};

/// Competition level for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Competition {
    Low,
    #[default]
    Medium,
    High,
}

impl Competition {
    /// Parse a model-supplied string; anything unrecognized is Medium.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Search intent behind a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Informational,
    Transactional,
    Navigational,
    Commercial,
}

impl Intent {
    /// Parse a model-supplied string; anything unrecognized is
    /// Informational.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "transactional" => Self::Transactional,
            "navigational" => Self::Navigational,
            "commercial" => Self::Commercial,
            _ => Self::Informational,
        }
    }
}

/// Relevance band derived from the potential score. Never set by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Excellent,
    Good,
    Moderate,
}

/// Strategic tier for a keyword within a research batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordTier {
    /// Top focus keywords
    Primary,
    /// Supporting keywords
    Secondary,
    /// Broad semantic filler
    Lsi,
}

impl KeywordTier {
    /// Parse a model-supplied string; returns `None` when unrecognized so
    /// the caller can fall through to the deterministic local formula.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "lsi" => Some(Self::Lsi),
            _ => None,
        }
    }

    /// Sort rank: primary first, then secondary, then lsi.
    pub fn rank(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Lsi => 2,
        }
    }
}

/// How close a searcher is to purchasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerJourneyStage {
    Awareness,
    Consideration,
    Decision,
}

impl BuyerJourneyStage {
    /// Parse a model-supplied string.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "awareness" => Some(Self::Awareness),
            "consideration" => Some(Self::Consideration),
            "decision" => Some(Self::Decision),
            _ => None,
        }
    }
}

/// A scored keyword opportunity.
///
/// Constructed fresh per pipeline invocation and handed back to the
/// caller for any persistence decision; the core never stores it.
/// `potential_score` and `relevance` are always recomputed from the three
/// weighted inputs via [`crate::pipeline::scorer::score_keyword`], never
/// trusted from the generation source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCandidate {
    /// Normalized keyword phrase
    pub keyword: String,

    /// Estimated monthly search volume
    pub search_volume: u32,

    /// Ranking difficulty, 0-100
    pub difficulty: u8,

    /// Estimated cost-per-click
    pub cpc: f64,

    /// Competition level
    pub competition: Competition,

    /// Search intent
    pub intent: Intent,

    /// Derived 0-100 attractiveness score
    pub potential_score: u8,

    /// Derived relevance band
    pub relevance: Relevance,

    /// Topical category
    pub category: String,

    /// Related keyword phrases
    #[serde(default)]
    pub related_keywords: Vec<String>,

    /// Question-form variants
    #[serde(default)]
    pub questions: Vec<String>,

    /// Content ideas targeting this keyword
    #[serde(default)]
    pub content_ideas: Vec<String>,

    /// Strategic tier, set by the classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_tier: Option<KeywordTier>,

    /// Topical cluster label, set by the classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    /// Buyer-journey stage, set by the classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_journey_stage: Option<BuyerJourneyStage>,

    /// 0-100 conversion likelihood, set by the classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_potential: Option<u8>,
}
