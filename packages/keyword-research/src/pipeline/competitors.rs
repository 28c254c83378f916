//! Competitor finder: name likely competitors, then scan each one.
//!
//! The competitor list comes from the generation service's general
//! knowledge. Entries missing a name or url are dropped. Each surviving
//! competitor gets one website scan raced against a fixed timeout; a
//! single competitor failing or timing out never aborts the others, it
//! just leaves that profile with empty keyword lists.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::normalize::filter_phrases;
use crate::parse::{extract_json_array, parse_records};
use crate::pipeline::{prompts, scanner};
use crate::traits::{PageFetcher, TextGenerator};
use crate::types::competitor::{CompetitorProfile, MAX_COMPETITOR_KEYWORDS};
use crate::types::config::PipelineConfig;

/// Raw competitor entry as the generation service emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCompetitor {
    name: String,
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    estimated_traffic: Option<f64>,
}

/// Find and scan competitors of a site.
pub(crate) async fn find_competitors<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    url: &str,
    niche: &str,
    mut on_scanned: impl FnMut(usize, usize),
) -> Result<Vec<CompetitorProfile>>
where
    G: TextGenerator,
    F: PageFetcher,
{
    let prompt = prompts::format_competitors_prompt(url, niche, config.max_competitors);
    let raw = generator.complete(&prompt).await?;
    let records: Vec<RawCompetitor> = parse_records(&raw);

    let mut profiles: Vec<CompetitorProfile> = records
        .into_iter()
        .filter(|r| !r.name.trim().is_empty() && !r.url.trim().is_empty())
        .filter(|r| url::Url::parse(r.url.trim()).is_ok())
        .take(config.max_competitors)
        .map(|r| CompetitorProfile {
            name: r.name.trim().to_string(),
            url: r.url.trim().to_string(),
            description: r.description,
            top_keywords: Vec::new(),
            content_focus: Vec::new(),
            estimated_traffic: r
                .estimated_traffic
                .filter(|t| t.is_finite() && *t >= 0.0)
                .map(|t| t as u64)
                .unwrap_or(0),
        })
        .collect();

    info!(count = profiles.len(), "scanning competitors");

    let total = profiles.len();
    for (index, profile) in profiles.iter_mut().enumerate() {
        scan_competitor(generator, fetcher, config, profile).await;
        on_scanned(index + 1, total);
    }

    Ok(profiles)
}

/// Scan one competitor, bounded by the per-competitor timeout.
///
/// Soft: on timeout or failure the profile keeps empty lists.
async fn scan_competitor<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    profile: &mut CompetitorProfile,
) where
    G: TextGenerator,
    F: PageFetcher,
{
    let scan = scanner::scan_keywords(generator, fetcher, config, &profile.url);
    let mut keywords = match tokio::time::timeout(config.competitor_scan_timeout(), scan).await {
        Ok(keywords) => keywords,
        Err(_) => {
            warn!(competitor = %profile.name, "competitor scan timed out");
            return;
        }
    };

    keywords.truncate(MAX_COMPETITOR_KEYWORDS);
    if keywords.is_empty() {
        debug!(competitor = %profile.name, "competitor scan found no keywords");
        return;
    }

    profile.content_focus = derive_content_focus(generator, config, &keywords).await;
    profile.top_keywords = keywords;
}

/// Derive 3-5 content-focus labels from scanned keywords. Soft.
async fn derive_content_focus<G: TextGenerator>(
    generator: &G,
    config: &PipelineConfig,
    keywords: &[String],
) -> Vec<String> {
    let prompt = prompts::format_content_focus_prompt(keywords);
    match generator.complete(&prompt).await {
        Ok(raw) => {
            let labels: Vec<String> = extract_json_array(&raw)
                .into_iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect();
            filter_phrases(labels, &config.blocked_years)
        }
        Err(e) => {
            warn!(error = %e, "content focus derivation failed");
            Vec::new()
        }
    }
}
