//! Strategic classifier: tier, cluster, buyer-journey stage, and
//! conversion potential for a keyword batch.
//!
//! One generation call enriches the whole batch; results merge back by
//! case-insensitive keyword match. Any keyword the model omits (or a
//! response that parses to nothing) falls through to a deterministic
//! local formula, so the batch always comes back fully classified.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::parse::parse_records;
use crate::pipeline::prompts;
use crate::traits::TextGenerator;
use crate::types::keyword::{BuyerJourneyStage, Intent, KeywordCandidate, KeywordTier};

/// Cluster label used when neither the model nor the candidate's
/// category yields one.
const FALLBACK_CLUSTER: &str = "algemeen";

/// Raw classification entry as the generation service emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawClassification {
    keyword: String,
    #[serde(default)]
    keyword_tier: Option<String>,
    #[serde(default)]
    cluster: Option<String>,
    #[serde(default)]
    buyer_journey_stage: Option<String>,
    #[serde(default)]
    conversion_potential: Option<f64>,
}

/// Classify a keyword batch against a main topic.
pub(crate) async fn classify<G: TextGenerator>(
    generator: &G,
    keywords: Vec<KeywordCandidate>,
    main_topic: &str,
) -> Result<Vec<KeywordCandidate>> {
    if keywords.is_empty() {
        return Ok(keywords);
    }

    let listing: Vec<(String, String)> = keywords
        .iter()
        .map(|k| (k.keyword.clone(), k.category.clone()))
        .collect();
    let prompt = prompts::format_strategic_prompt(&listing, main_topic);

    let raw = generator.complete(&prompt).await?;
    let records: Vec<RawClassification> = parse_records(&raw);
    if records.is_empty() {
        warn!("classification response unusable, applying local fallback to whole batch");
    } else {
        debug!(classified = records.len(), batch = keywords.len(), "merging classifications");
    }

    Ok(apply_classifications(keywords, records))
}

/// Merge model classifications into the batch and fill gaps with the
/// deterministic fallback; order the result primary → secondary → lsi,
/// descending potential score within each tier.
pub(crate) fn apply_classifications(
    mut keywords: Vec<KeywordCandidate>,
    records: Vec<RawClassification>,
) -> Vec<KeywordCandidate> {
    let by_keyword: HashMap<String, RawClassification> = records
        .into_iter()
        .map(|r| (r.keyword.trim().to_lowercase(), r))
        .collect();

    for candidate in &mut keywords {
        let matched = by_keyword.get(&candidate.keyword.trim().to_lowercase());

        match matched {
            Some(record) => {
                candidate.keyword_tier = record
                    .keyword_tier
                    .as_deref()
                    .and_then(KeywordTier::parse)
                    .or_else(|| Some(fallback_tier(candidate)));
                candidate.cluster = Some(
                    record
                        .cluster
                        .clone()
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| fallback_cluster(candidate)),
                );
                candidate.buyer_journey_stage = record
                    .buyer_journey_stage
                    .as_deref()
                    .and_then(BuyerJourneyStage::parse)
                    .or_else(|| Some(fallback_stage(candidate)));
                candidate.conversion_potential = Some(
                    record
                        .conversion_potential
                        .filter(|c| c.is_finite())
                        .map(|c| c.clamp(0.0, 100.0) as u8)
                        .unwrap_or_else(|| fallback_conversion(candidate)),
                );
            }
            None => {
                candidate.keyword_tier = Some(fallback_tier(candidate));
                candidate.cluster = Some(fallback_cluster(candidate));
                candidate.buyer_journey_stage = Some(fallback_stage(candidate));
                candidate.conversion_potential = Some(fallback_conversion(candidate));
            }
        }
    }

    keywords.sort_by(|a, b| {
        let tier_a = a.keyword_tier.map(|t| t.rank()).unwrap_or(u8::MAX);
        let tier_b = b.keyword_tier.map(|t| t.rank()).unwrap_or(u8::MAX);
        tier_a
            .cmp(&tier_b)
            .then(b.potential_score.cmp(&a.potential_score))
    });
    keywords
}

fn fallback_tier(candidate: &KeywordCandidate) -> KeywordTier {
    if candidate.potential_score >= 75 {
        KeywordTier::Primary
    } else if candidate.potential_score >= 50 {
        KeywordTier::Secondary
    } else {
        KeywordTier::Lsi
    }
}

fn fallback_cluster(candidate: &KeywordCandidate) -> String {
    if candidate.category.trim().is_empty() {
        FALLBACK_CLUSTER.to_string()
    } else {
        candidate.category.clone()
    }
}

fn fallback_stage(candidate: &KeywordCandidate) -> BuyerJourneyStage {
    match candidate.intent {
        Intent::Transactional => BuyerJourneyStage::Decision,
        Intent::Commercial => BuyerJourneyStage::Consideration,
        _ => BuyerJourneyStage::Awareness,
    }
}

fn fallback_conversion(candidate: &KeywordCandidate) -> u8 {
    match candidate.intent {
        Intent::Transactional => 85,
        Intent::Commercial => 65,
        _ => 30,
    }
}
