//! Content silos and the phased site plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article format for a sub-topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Blog,
    Guide,
    Tutorial,
    Comparison,
    Listicle,
}

impl ContentType {
    /// Parse a model-supplied string; anything unrecognized is Blog.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "guide" => Self::Guide,
            "tutorial" => Self::Tutorial,
            "comparison" => Self::Comparison,
            "listicle" => Self::Listicle,
            _ => Self::Blog,
        }
    }
}

/// Production priority for a sub-topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse a model-supplied string; anything unrecognized is Medium.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// A supporting article under a pillar topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    pub topic: String,

    pub keyword: String,

    pub content_type: ContentType,

    pub priority: Priority,

    #[serde(default)]
    pub estimated_search_volume: u32,
}

/// A pillar topic plus its supporting sub-topic articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSilo {
    pub pillar_topic: String,

    pub pillar_keyword: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub estimated_search_volume: u32,

    /// Only ever grows across the top-up step, never shrinks
    #[serde(default)]
    pub sub_topics: Vec<SubTopic>,

    #[serde(default)]
    pub internal_linking_strategy: String,

    /// Derived: own volume + sum of sub-topic volumes
    pub total_potential_traffic: u64,
}

impl ContentSilo {
    /// Recompute the derived traffic total from current sub-topics.
    pub fn recompute_traffic(&mut self) {
        self.total_potential_traffic = self.estimated_search_volume as u64
            + self
                .sub_topics
                .iter()
                .map(|s| s.estimated_search_volume as u64)
                .sum::<u64>();
    }

    /// Article count for this silo: the pillar page plus one per sub-topic.
    pub fn article_count(&self) -> usize {
        1 + self.sub_topics.len()
    }
}

/// One phase of the implementation roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationPhase {
    /// 1-based phase number
    pub phase: u8,

    pub title: String,

    /// Article titles drawn from the silos
    #[serde(default)]
    pub articles: Vec<String>,

    #[serde(default)]
    pub estimated_duration: String,

    #[serde(default)]
    pub focus: String,
}

/// A complete phased content production roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePlan {
    pub main_keyword: String,

    pub niche: String,

    pub target_audience: String,

    pub content_silos: Vec<ContentSilo>,

    /// Derived: sum of (1 + subtopics) over silos
    pub total_articles: usize,

    /// Derived: sum of silo traffic totals
    pub estimated_total_traffic: u64,

    pub implementation_phases: Vec<ImplementationPhase>,

    #[serde(default)]
    pub long_term_strategy: String,

    /// Competitor annotations attached opportunistically during
    /// composition; empty when the competitor pass was skipped or failed
    #[serde(default)]
    pub competitor_insights: Vec<String>,

    pub generated_at: DateTime<Utc>,
}

impl SitePlan {
    /// Recompute the derived totals from current silo data.
    pub fn recompute_totals(&mut self) {
        self.total_articles = self.content_silos.iter().map(|s| s.article_count()).sum();
        self.estimated_total_traffic = self
            .content_silos
            .iter()
            .map(|s| s.total_potential_traffic)
            .sum();
    }
}
