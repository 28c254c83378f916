//! Site plan composer: silos plus a phased implementation roadmap.
//!
//! The input may be a URL or a bare keyword. URLs get scanned first to
//! seed a main-keyword inference call; the roadmap call and the
//! opportunistic competitor pass are both soft, so the only fatal path
//! is silo generation itself. All totals are derived locally from silo
//! data, never taken from the roadmap response.

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::parse::extract_json_object;
use crate::pipeline::{competitors, prompts, scanner, silos};
use crate::traits::{PageFetcher, TextGenerator};
use crate::types::config::PipelineConfig;
use crate::types::plan::{ContentSilo, ImplementationPhase, SitePlan};

/// Inferred research subject for a scanned site.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMainKeyword {
    main_keyword: String,
    #[serde(default)]
    niche: Option<String>,
    #[serde(default)]
    target_audience: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPhase {
    #[serde(default)]
    phase: Option<f64>,
    title: String,
    #[serde(default)]
    articles: Vec<String>,
    #[serde(default)]
    estimated_duration: String,
    #[serde(default)]
    focus: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoadmap {
    #[serde(default)]
    phases: Vec<RawPhase>,
    #[serde(default)]
    long_term_strategy: String,
}

/// Heuristic: does the input look like a URL rather than a keyword?
pub(crate) fn looks_like_url(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || (trimmed.contains('.') && !trimmed.contains(char::is_whitespace))
}

/// Compose a complete phased site plan.
pub(crate) async fn compose_plan<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    input: &str,
    niche: Option<&str>,
    target_audience: Option<&str>,
    mut on_milestone: impl FnMut(&str, u8),
) -> Result<SitePlan>
where
    G: TextGenerator,
    F: PageFetcher,
{
    let input = input.trim();
    let is_url = looks_like_url(input);

    // 1. Resolve the research subject
    let (main_keyword, inferred_niche, inferred_audience) = if is_url {
        on_milestone("Scanning website", 5);
        let url = ensure_scheme(input);
        let scanned = scanner::scan_keywords(generator, fetcher, config, &url).await;
        on_milestone("Determining main keyword", 15);
        infer_main_keyword(generator, input, &scanned).await
    } else {
        (input.to_string(), None, None)
    };

    let niche = niche
        .map(|n| n.to_string())
        .or(inferred_niche)
        .unwrap_or_else(|| main_keyword.clone());
    let target_audience = target_audience
        .map(|a| a.to_string())
        .or(inferred_audience)
        .unwrap_or_else(|| format!("people searching for {}", main_keyword));

    // 2. Build the silos (the only fatal sub-step)
    on_milestone("Building content silos", 25);
    let content_silos =
        silos::build_silos(generator, config, &main_keyword, &niche, config.silo_count).await?;

    // 3. Roadmap call, degrading to a locally built one
    on_milestone("Planning implementation phases", 70);
    let article_titles = all_article_titles(&content_silos);
    let (implementation_phases, long_term_strategy) =
        match generate_roadmap(generator, &main_keyword, &article_titles).await {
            Some(roadmap) => roadmap,
            None => {
                warn!("roadmap call unusable, building phases locally");
                (
                    local_phases(&content_silos),
                    format!(
                        "Keep publishing within the {} silos to deepen topical authority, \
                         refresh pillar pages as rankings develop, and expand winning clusters.",
                        content_silos.len()
                    ),
                )
            }
        };

    // 4. Opportunistic competitor insight, bounded and soft
    let competitor_insights = if is_url {
        on_milestone("Gathering competitor insight", 85);
        gather_competitor_insights(generator, fetcher, config, input, &niche).await
    } else {
        Vec::new()
    };

    let mut plan = SitePlan {
        main_keyword,
        niche,
        target_audience,
        content_silos,
        total_articles: 0,
        estimated_total_traffic: 0,
        implementation_phases,
        long_term_strategy,
        competitor_insights,
        generated_at: Utc::now(),
    };
    plan.recompute_totals();

    on_milestone("Site plan ready", 100);
    info!(
        silos = plan.content_silos.len(),
        articles = plan.total_articles,
        "site plan composed"
    );
    Ok(plan)
}

fn ensure_scheme(input: &str) -> String {
    if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

/// Infer the main keyword from scanned site keywords. Soft: falls back
/// to the bare domain when the call or parse fails.
async fn infer_main_keyword<G: TextGenerator>(
    generator: &G,
    input: &str,
    scanned: &[String],
) -> (String, Option<String>, Option<String>) {
    let fallback = || {
        crate::fetch::bare_domain(input)
            .map(|d| d.split('.').next().unwrap_or(&d).replace('-', " "))
            .unwrap_or_else(|| input.to_string())
    };

    if scanned.is_empty() {
        return (fallback(), None, None);
    }

    let prompt = prompts::format_main_keyword_prompt(scanned);
    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "main keyword inference failed");
            return (fallback(), None, None);
        }
    };

    match extract_json_object(&raw).and_then(|v| serde_json::from_value::<RawMainKeyword>(v).ok())
    {
        Some(inferred) if !inferred.main_keyword.trim().is_empty() => {
            debug!(main_keyword = %inferred.main_keyword, "main keyword inferred");
            (
                inferred.main_keyword.trim().to_string(),
                inferred.niche.filter(|n| !n.trim().is_empty()),
                inferred.target_audience.filter(|a| !a.trim().is_empty()),
            )
        }
        _ => (fallback(), None, None),
    }
}

/// Ask for the 4-phase roadmap. Returns `None` when the response is
/// unusable so the caller can degrade.
async fn generate_roadmap<G: TextGenerator>(
    generator: &G,
    main_keyword: &str,
    articles: &[String],
) -> Option<(Vec<ImplementationPhase>, String)> {
    let prompt = prompts::format_phases_prompt(main_keyword, articles);
    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "roadmap call failed");
            return None;
        }
    };

    let roadmap: RawRoadmap =
        serde_json::from_value(extract_json_object(&raw)?).ok()?;
    if roadmap.phases.is_empty() {
        return None;
    }

    let phases = roadmap
        .phases
        .into_iter()
        .enumerate()
        .map(|(i, p)| ImplementationPhase {
            phase: p
                .phase
                .filter(|n| n.is_finite() && *n >= 1.0)
                .map(|n| n as u8)
                .unwrap_or(i as u8 + 1),
            title: p.title,
            articles: p.articles,
            estimated_duration: p.estimated_duration,
            focus: p.focus,
        })
        .collect();

    Some((phases, roadmap.long_term_strategy))
}

/// Deterministic roadmap fallback: spread the silo articles over four
/// phases, pillar pages first.
fn local_phases(content_silos: &[ContentSilo]) -> Vec<ImplementationPhase> {
    let pillars: Vec<String> = content_silos.iter().map(|s| s.pillar_topic.clone()).collect();
    let sub_articles: Vec<String> = content_silos
        .iter()
        .flat_map(|s| s.sub_topics.iter().map(|t| t.topic.clone()))
        .collect();

    let chunk = sub_articles.len().div_ceil(3).max(1);
    let mut chunks = sub_articles.chunks(chunk);

    let definitions = [
        ("Foundation", "Publish pillar pages that anchor every silo"),
        ("Commercial coverage", "Target the highest-value supporting articles"),
        ("Long-tail coverage", "Broaden each silo with supporting content"),
        ("Full topical coverage", "Complete the remaining articles and interlink"),
    ];

    definitions
        .iter()
        .enumerate()
        .map(|(i, (title, focus))| ImplementationPhase {
            phase: i as u8 + 1,
            title: title.to_string(),
            articles: if i == 0 {
                pillars.clone()
            } else {
                chunks.next().map(|c| c.to_vec()).unwrap_or_default()
            },
            estimated_duration: "4-6 weeks".to_string(),
            focus: focus.to_string(),
        })
        .collect()
}

fn all_article_titles(content_silos: &[ContentSilo]) -> Vec<String> {
    content_silos
        .iter()
        .flat_map(|s| {
            std::iter::once(s.pillar_topic.clone())
                .chain(s.sub_topics.iter().map(|t| t.topic.clone()))
        })
        .collect()
}

/// Run the competitor finder under the insight budget and reduce the
/// result to annotation strings. Soft at every level.
async fn gather_competitor_insights<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    url: &str,
    niche: &str,
) -> Vec<String>
where
    G: TextGenerator,
    F: PageFetcher,
{
    let pass = competitors::find_competitors(generator, fetcher, config, url, niche, |_, _| {});

    match tokio::time::timeout(config.competitor_insight_budget(), pass).await {
        Ok(Ok(profiles)) => profiles
            .into_iter()
            .map(|p| {
                if p.content_focus.is_empty() {
                    format!("{} ({}) competes in this space", p.name, p.url)
                } else {
                    format!("{} focuses on: {}", p.name, p.content_focus.join(", "))
                }
            })
            .collect(),
        Ok(Err(e)) => {
            warn!(error = %e, "competitor insight pass failed");
            Vec::new()
        }
        Err(_) => {
            warn!("competitor insight pass exceeded budget");
            Vec::new()
        }
    }
}
