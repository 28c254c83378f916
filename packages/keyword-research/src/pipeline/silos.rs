//! Content silo builder: pillar topics with supporting sub-topics.
//!
//! One generation call produces the silos; any silo short of the
//! sub-topic target gets exactly one supplementary call for the deficit,
//! fed the existing titles so the model avoids duplicates. The top-up
//! merge only appends (after a case-insensitive title dedup), so a
//! silo's sub-topic count never regresses, even when the supplementary
//! call fails or returns garbage.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::normalize::{contains_blocked_year, normalize_keyword};
use crate::parse::parse_records;
use crate::pipeline::prompts;
use crate::traits::TextGenerator;
use crate::types::config::PipelineConfig;
use crate::types::plan::{ContentSilo, ContentType, Priority, SubTopic};

/// Raw sub-topic entry as the generation service emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSubTopic {
    topic: String,
    keyword: String,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    estimated_search_volume: Option<f64>,
}

/// Raw silo entry as the generation service emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSilo {
    pillar_topic: String,
    pillar_keyword: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    estimated_search_volume: Option<f64>,
    #[serde(default)]
    sub_topics: Vec<RawSubTopic>,
    #[serde(default)]
    internal_linking_strategy: String,
}

/// Build `count` content silos for a main keyword.
pub(crate) async fn build_silos<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    main_keyword: &str,
    niche: &str,
    count: usize,
) -> Result<Vec<ContentSilo>> {
    let prompt = prompts::format_silos_prompt(main_keyword, niche, count);
    let raw = generator.complete(&prompt).await?;
    let records: Vec<RawSilo> = parse_records(&raw);

    let mut silos: Vec<ContentSilo> = records
        .into_iter()
        .filter(|r| !r.pillar_topic.trim().is_empty() && !r.pillar_keyword.trim().is_empty())
        .take(count)
        .map(|r| build_silo(r, config))
        .collect();

    if silos.is_empty() {
        return Err(PipelineError::EmptyGeneration {
            stage: "silo generation",
        });
    }

    for silo in &mut silos {
        top_up_silo(generator, config, silo).await;
        silo.recompute_traffic();
    }

    info!(count = silos.len(), "content silos built");
    Ok(silos)
}

fn build_silo(raw: RawSilo, config: &PipelineConfig) -> ContentSilo {
    let sub_topics = convert_sub_topics(raw.sub_topics, config);
    let mut silo = ContentSilo {
        pillar_topic: raw.pillar_topic.trim().to_string(),
        pillar_keyword: normalize_keyword(&raw.pillar_keyword),
        description: raw.description,
        estimated_search_volume: sanitize_volume(raw.estimated_search_volume),
        sub_topics,
        internal_linking_strategy: raw.internal_linking_strategy,
        total_potential_traffic: 0,
    };
    silo.recompute_traffic();
    silo
}

fn convert_sub_topics(raw: Vec<RawSubTopic>, config: &PipelineConfig) -> Vec<SubTopic> {
    raw.into_iter()
        .filter(|s| !s.topic.trim().is_empty() && !s.keyword.trim().is_empty())
        .filter(|s| {
            !contains_blocked_year(&s.topic, &config.blocked_years)
                && !contains_blocked_year(&s.keyword, &config.blocked_years)
        })
        .map(|s| SubTopic {
            topic: s.topic.trim().to_string(),
            keyword: normalize_keyword(&s.keyword),
            content_type: s
                .content_type
                .as_deref()
                .map(ContentType::parse)
                .unwrap_or_default(),
            priority: s.priority.as_deref().map(Priority::parse).unwrap_or_default(),
            estimated_search_volume: sanitize_volume(s.estimated_search_volume),
        })
        .collect()
}

fn sanitize_volume(raw: Option<f64>) -> u32 {
    raw.filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Issue one supplementary call for a silo short of the sub-topic target.
///
/// Soft: on failure the silo is kept as-is. New sub-topics whose title
/// matches an existing one (ignoring case) are dropped; the merge only
/// ever appends.
async fn top_up_silo<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    silo: &mut ContentSilo,
) {
    let current = silo.sub_topics.len();
    if current >= config.subtopic_target {
        return;
    }
    let deficit = config.subtopic_target - current;

    let existing_titles: Vec<String> = silo.sub_topics.iter().map(|s| s.topic.clone()).collect();
    let prompt = prompts::format_silo_topup_prompt(
        &silo.pillar_topic,
        &silo.pillar_keyword,
        deficit,
        &existing_titles,
    );

    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(pillar = %silo.pillar_topic, error = %e, "silo top-up failed, keeping silo as-is");
            return;
        }
    };

    let records: Vec<RawSubTopic> = parse_records(&raw);
    let additions = merge_sub_topics(silo, convert_sub_topics(records, config), deficit);
    debug!(pillar = %silo.pillar_topic, added = additions, "silo topped up");
}

/// Append new sub-topics, skipping duplicate titles. Returns the number
/// actually added.
fn merge_sub_topics(silo: &mut ContentSilo, incoming: Vec<SubTopic>, limit: usize) -> usize {
    let mut existing: Vec<String> = silo
        .sub_topics
        .iter()
        .map(|s| s.topic.trim().to_lowercase())
        .collect();

    let mut added = 0;
    for sub in incoming {
        if added >= limit {
            break;
        }
        let key = sub.topic.trim().to_lowercase();
        if existing.contains(&key) {
            continue;
        }
        existing.push(key);
        silo.sub_topics.push(sub);
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;

    fn silo_json(sub_count: usize) -> String {
        let subs: Vec<String> = (0..sub_count)
            .map(|i| {
                format!(
                    r#"{{"topic": "Sub {i}", "keyword": "sub keyword {i}", "contentType": "blog", "priority": "medium", "estimatedSearchVolume": 100}}"#
                )
            })
            .collect();
        format!(
            r#"[{{"pillarTopic": "Pillar", "pillarKeyword": "pillar keyword",
                 "description": "d", "estimatedSearchVolume": 1000,
                 "subTopics": [{}], "internalLinkingStrategy": "hub and spoke"}}]"#,
            subs.join(",")
        )
    }

    #[tokio::test]
    async fn test_full_silo_needs_no_topup() {
        let generator =
            MockGenerator::new().with_response("Design 5 content silos", &silo_json(12));

        let silos = build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 5)
            .await
            .unwrap();

        assert_eq!(silos.len(), 1);
        assert_eq!(silos[0].sub_topics.len(), 12);
        // 1000 + 12 * 100
        assert_eq!(silos[0].total_potential_traffic, 2200);
        // Exactly one generation call: no top-up was issued
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_short_silo_topped_up() {
        let generator = MockGenerator::new()
            .with_response("Design 3 content silos", &silo_json(10))
            .with_response(
                "additional sub-topic articles",
                r#"[
                    {"topic": "New A", "keyword": "new a", "contentType": "guide", "priority": "high", "estimatedSearchVolume": 50},
                    {"topic": "New B", "keyword": "new b", "contentType": "blog", "priority": "low", "estimatedSearchVolume": 60}
                ]"#,
            );

        let silos = build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 3)
            .await
            .unwrap();

        assert_eq!(silos[0].sub_topics.len(), 12);
        assert_eq!(silos[0].total_potential_traffic, 1000 + 10 * 100 + 50 + 60);
        // The top-up prompt carried the existing titles
        let topup_call = &generator.calls()[1];
        assert!(topup_call.contains("- Sub 0"));
        assert!(topup_call.contains("exactly 2"));
    }

    #[tokio::test]
    async fn test_failed_topup_never_regresses_count() {
        let generator = MockGenerator::new()
            .with_response("Design 5 content silos", &silo_json(8))
            .with_failure("additional sub-topic articles");

        let silos = build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 5)
            .await
            .unwrap();

        // Top-up failed softly; the 8 original sub-topics survive
        assert_eq!(silos[0].sub_topics.len(), 8);
    }

    #[tokio::test]
    async fn test_malformed_topup_never_regresses_count() {
        let generator = MockGenerator::new()
            .with_response("Design 5 content silos", &silo_json(8))
            .with_response("additional sub-topic articles", "no json in sight");

        let silos = build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 5)
            .await
            .unwrap();

        assert_eq!(silos[0].sub_topics.len(), 8);
    }

    #[tokio::test]
    async fn test_topup_duplicates_dropped() {
        let generator = MockGenerator::new()
            .with_response("Design 5 content silos", &silo_json(11))
            .with_response(
                "additional sub-topic articles",
                // "sub 0" duplicates an existing title modulo case
                r#"[
                    {"topic": "SUB 0", "keyword": "dupe", "contentType": "blog", "priority": "low", "estimatedSearchVolume": 10},
                    {"topic": "Fresh", "keyword": "fresh", "contentType": "blog", "priority": "low", "estimatedSearchVolume": 10}
                ]"#,
            );

        let silos = build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 5)
            .await
            .unwrap();

        assert_eq!(silos[0].sub_topics.len(), 12);
        assert!(silos[0].sub_topics.iter().any(|s| s.topic == "Fresh"));
        assert_eq!(
            silos[0]
                .sub_topics
                .iter()
                .filter(|s| s.topic.eq_ignore_ascii_case("sub 0"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_zero_silos_is_fatal() {
        let generator = MockGenerator::new().with_response("Design 5 content silos", "[]");

        let result =
            build_silos(&generator, &PipelineConfig::default(), "yoga", "fitness", 5).await;

        assert!(matches!(result, Err(PipelineError::EmptyGeneration { .. })));
    }
}
