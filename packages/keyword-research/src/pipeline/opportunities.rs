//! Opportunity generator: new keyword candidates from a website context
//! or a seed keyword.
//!
//! One generation call per batch, then a local refinement pass: schema
//! validation, year-token filtering, normalization, case-insensitive
//! dedup against the batch and the caller's existing keywords, scoring,
//! and a descending sort. A batch that refines down to zero candidates is
//! a failure; it propagates so the retry wrapper can run the call again.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::normalize::{contains_blocked_year, filter_phrases, normalize_keyword};
use crate::parse::parse_records;
use crate::pipeline::prompts;
use crate::pipeline::scorer::{relevance_for, score_keyword};
use crate::traits::TextGenerator;
use crate::types::config::PipelineConfig;
use crate::types::keyword::{Competition, Intent, KeywordCandidate};

/// Raw candidate record as the generation service emits it.
///
/// `search_volume` and `difficulty` are required: a record missing either
/// fails decoding and is dropped (schema validation). Everything else is
/// lenient.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawOpportunity {
    keyword: String,
    search_volume: f64,
    difficulty: f64,
    #[serde(default)]
    cpc: f64,
    #[serde(default)]
    competition: Option<String>,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    related_keywords: Vec<String>,
    #[serde(default)]
    questions: Vec<String>,
    #[serde(default)]
    content_ideas: Vec<String>,
}

/// Generate candidates seeded by a website's existing keywords.
pub(crate) async fn generate_from_site<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    url: &str,
    existing: &[String],
    niche: &str,
) -> Result<Vec<KeywordCandidate>> {
    let prompt = prompts::format_opportunities_from_site_prompt(
        url,
        existing,
        niche,
        config.candidate_batch_size,
    );
    generate(generator, config, existing, &prompt, "opportunity generation").await
}

/// Generate candidates around a seed keyword.
pub(crate) async fn generate_from_seed<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    seed: &str,
    niche: &str,
) -> Result<Vec<KeywordCandidate>> {
    let prompt =
        prompts::format_opportunities_from_seed_prompt(seed, niche, config.candidate_batch_size);
    generate(generator, config, &[], &prompt, "opportunity generation").await
}

async fn generate<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    existing: &[String],
    prompt: &str,
    stage: &'static str,
) -> Result<Vec<KeywordCandidate>> {
    let raw = generator.complete(prompt).await?;
    let records: Vec<RawOpportunity> = parse_records(&raw);
    debug!(parsed = records.len(), "parsed opportunity records");

    let candidates = refine_candidates(records, existing, config);
    if candidates.is_empty() {
        return Err(PipelineError::EmptyGeneration { stage });
    }

    info!(count = candidates.len(), "opportunity batch refined");
    Ok(candidates)
}

/// Local refinement: validate, filter, normalize, dedup, score, sort.
pub(crate) fn refine_candidates(
    records: Vec<RawOpportunity>,
    existing: &[String],
    config: &PipelineConfig,
) -> Vec<KeywordCandidate> {
    let mut seen: Vec<String> = existing.iter().map(|e| e.trim().to_lowercase()).collect();
    let mut candidates = Vec::new();

    for record in records {
        let keyword = normalize_keyword(&record.keyword);
        if keyword.is_empty() {
            continue;
        }
        if contains_blocked_year(&keyword, &config.blocked_years) {
            continue;
        }
        if !record.search_volume.is_finite() || record.search_volume < 0.0 {
            continue;
        }

        let key = keyword.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        let search_volume = record.search_volume.min(u32::MAX as f64) as u32;
        let difficulty = record.difficulty.clamp(0.0, 100.0) as u8;
        let competition = record
            .competition
            .as_deref()
            .map(Competition::parse)
            .unwrap_or_default();
        let intent = record
            .intent
            .as_deref()
            .map(Intent::parse)
            .unwrap_or_default();

        let potential_score = score_keyword(search_volume, difficulty, competition);

        candidates.push(KeywordCandidate {
            keyword,
            search_volume,
            difficulty,
            cpc: if record.cpc.is_finite() && record.cpc >= 0.0 {
                record.cpc
            } else {
                0.0
            },
            competition,
            intent,
            potential_score,
            relevance: relevance_for(potential_score),
            category: record.category.unwrap_or_default(),
            related_keywords: filter_phrases(record.related_keywords, &config.blocked_years),
            questions: filter_phrases(record.questions, &config.blocked_years),
            content_ideas: filter_phrases(record.content_ideas, &config.blocked_years),
            keyword_tier: None,
            cluster: None,
            buyer_journey_stage: None,
            conversion_potential: None,
        });
    }

    candidates.sort_by(|a, b| b.potential_score.cmp(&a.potential_score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;

    fn record(keyword: &str, volume: f64, difficulty: f64) -> RawOpportunity {
        RawOpportunity {
            keyword: keyword.to_string(),
            search_volume: volume,
            difficulty,
            cpc: 1.0,
            competition: Some("low".to_string()),
            intent: Some("commercial".to_string()),
            category: Some("test".to_string()),
            related_keywords: vec![],
            questions: vec![],
            content_ideas: vec![],
        }
    }

    #[test]
    fn test_refine_dedups_against_existing_case_insensitive() {
        let existing = vec!["dog food".to_string()];
        let refined = refine_candidates(
            vec![record("Dog Food", 1000.0, 20.0), record("puppy food", 500.0, 20.0)],
            &existing,
            &PipelineConfig::default(),
        );

        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].keyword, "puppy food");
    }

    #[test]
    fn test_refine_dedups_within_batch() {
        let refined = refine_candidates(
            vec![record("yoga mat", 1000.0, 20.0), record("Yoga mat", 900.0, 30.0)],
            &[],
            &PipelineConfig::default(),
        );
        assert_eq!(refined.len(), 1);
    }

    #[test]
    fn test_refine_drops_year_keywords_and_filters_lists() {
        let mut rec = record("best laptops 2024", 1000.0, 20.0);
        rec.related_keywords = vec!["laptops 2023".to_string(), "laptop deals".to_string()];

        let mut keeper = record("best laptops", 1000.0, 20.0);
        keeper.questions = vec!["best laptop 2025?".to_string(), "which laptop?".to_string()];

        let refined =
            refine_candidates(vec![rec, keeper], &[], &PipelineConfig::default());

        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].keyword, "best laptops");
        assert_eq!(refined[0].questions, vec!["which laptop?".to_string()]);
    }

    #[test]
    fn test_refine_scores_and_sorts_descending() {
        let refined = refine_candidates(
            vec![record("small", 100.0, 80.0), record("big", 4000.0, 10.0)],
            &[],
            &PipelineConfig::default(),
        );

        assert_eq!(refined[0].keyword, "big");
        assert!(refined[0].potential_score >= refined[1].potential_score);
        // Scores recomputed locally: big = 40 + 27 + 30 = 97
        assert_eq!(refined[0].potential_score, 97);
    }

    #[tokio::test]
    async fn test_generate_propagates_empty_as_error() {
        let generator =
            MockGenerator::new().with_response("keyword research specialist", "no json at all");

        let result = generate_from_seed(
            &generator,
            &PipelineConfig::default(),
            "yoga mat",
            "fitness",
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::EmptyGeneration { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_from_seed_end_to_end() {
        let generator = MockGenerator::new().with_response(
            "keyword research specialist",
            r#"[
                {"keyword": "Best yoga mat", "searchVolume": 2400, "difficulty": 35,
                 "cpc": 1.1, "competition": "medium", "intent": "commercial",
                 "category": "gear", "relatedKeywords": ["thick yoga mat"],
                 "questions": ["which yoga mat is best"], "contentIdeas": ["mat buying guide"]},
                {"keyword": "incomplete record"}
            ]"#,
        );

        let candidates = generate_from_seed(
            &generator,
            &PipelineConfig::default(),
            "yoga mat",
            "fitness",
        )
        .await
        .unwrap();

        // The incomplete record fails schema validation and is dropped
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].keyword, "best yoga mat");
        assert_eq!(candidates[0].search_volume, 2400);
        assert!(candidates[0].potential_score > 0);
    }
}
