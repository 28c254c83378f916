//! Website scanner: extract existing keywords from a live site.
//!
//! The scan is deliberately unbreakable: a fetch failure (timeout, TLS
//! mismatch, 4xx/5xx, blocked target) degrades to a domain-only
//! inference call, and a failed inference degrades to an empty list.
//! Callers can always proceed with whatever came back.

use tracing::{debug, info, warn};

use crate::fetch::{bare_domain, html_to_text, truncate_for_prompt};
use crate::normalize::filter_phrases;
use crate::parse::{extract_json_array, extract_json_object};
use crate::pipeline::prompts;
use crate::traits::{PageFetcher, TextGenerator};
use crate::types::config::PipelineConfig;
use crate::types::website::WebsiteStructure;

/// Scan a website for the keyword phrases it already targets.
///
/// Never fails; worst case returns an empty list.
pub(crate) async fn scan_keywords<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    url: &str,
) -> Vec<String>
where
    G: TextGenerator,
    F: PageFetcher,
{
    let prompt = match fetch_page_text(fetcher, config, url).await {
        Some(text) => prompts::format_site_keywords_prompt(url, &text),
        None => {
            let Some(domain) = bare_domain(url) else {
                warn!(url = %url, "no usable domain for fallback inference");
                return Vec::new();
            };
            info!(url = %url, domain = %domain, "fetch failed, inferring keywords from domain");
            prompts::format_domain_keywords_prompt(&domain)
        }
    };

    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(url = %url, error = %e, "keyword extraction call failed");
            return Vec::new();
        }
    };

    let phrases: Vec<String> = extract_json_array(&raw)
        .into_iter()
        .filter_map(|v| v.as_str().map(|s| s.to_string()))
        .collect();

    let phrases = filter_phrases(phrases, &config.blocked_years);
    debug!(url = %url, count = phrases.len(), "scan produced keywords");
    phrases
}

/// Scan a website's coarse structure (pages, blogs, main topics).
///
/// Soft like [`scan_keywords`]: failures yield an empty structure.
pub(crate) async fn scan_structure<G, F>(
    generator: &G,
    fetcher: &F,
    config: &PipelineConfig,
    url: &str,
) -> WebsiteStructure
where
    G: TextGenerator,
    F: PageFetcher,
{
    let Some(text) = fetch_page_text(fetcher, config, url).await else {
        return WebsiteStructure::default();
    };

    let prompt = prompts::format_site_structure_prompt(url, &text);
    let raw = match generator.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(url = %url, error = %e, "structure call failed");
            return WebsiteStructure::default();
        }
    };

    let Some(value) = extract_json_object(&raw) else {
        return WebsiteStructure::default();
    };

    let list = |key: &str| -> Vec<String> {
        value[key]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    };

    WebsiteStructure::from_lists(list("pages"), list("blogs"), list("mainTopics"))
}

/// Fetch a page and reduce it to prompt-budgeted plain text.
///
/// Returns `None` on any fetch failure or empty body.
async fn fetch_page_text<F: PageFetcher>(
    fetcher: &F,
    config: &PipelineConfig,
    url: &str,
) -> Option<String> {
    match fetcher.fetch_page(url).await {
        Ok(html) => {
            let text = html_to_text(&html);
            if text.trim().is_empty() {
                warn!(url = %url, "fetched page had no text content");
                None
            } else {
                Some(truncate_for_prompt(&text, config.prompt_content_budget).to_string())
            }
        }
        Err(e) => {
            warn!(url = %url, error = %e, "page fetch failed");
            None
        }
    }
}
