//! The research pipeline - public entry points over all stages.
//!
//! One [`Pipeline`] instance owns its collaborators (generator, fetcher,
//! progress reporter, cancellation token) by value; there is no shared
//! state between requests. Every entry point is wrapped in the bounded
//! retry so a single transient failure does not abort a multi-minute
//! research run, and raced against the cancellation token so an aborted
//! request surfaces as a normal error with nothing left half-written.

pub mod classifier;
pub mod competitors;
pub mod gaps;
pub mod opportunities;
pub mod prompts;
pub mod scanner;
pub mod scorer;
pub mod silos;
pub mod siteplan;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::progress::{NullReporter, ProgressReporter};
use crate::retry::retry;
use crate::traits::{PageFetcher, TextGenerator};
use crate::types::competitor::{CompetitorProfile, KeywordGap};
use crate::types::config::PipelineConfig;
use crate::types::keyword::KeywordCandidate;
use crate::types::plan::{ContentSilo, SitePlan};
use crate::types::website::WebsiteStructure;

/// The keyword research pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use keyword_research::{Pipeline, HttpPageFetcher};
/// use keyword_research::ai::OpenAiGenerator;
///
/// let pipeline = Pipeline::new(OpenAiGenerator::from_env()?, HttpPageFetcher::new());
///
/// let existing = pipeline.scan_website_for_keywords("https://example.com").await?;
/// let candidates = pipeline
///     .generate_keyword_opportunities("https://example.com", &existing, Some("fitness"))
///     .await?;
/// let classified = pipeline
///     .strategically_analyze_keywords(candidates, "yoga gear")
///     .await?;
/// ```
pub struct Pipeline<G: TextGenerator, F: PageFetcher> {
    generator: G,
    fetcher: F,
    config: PipelineConfig,
    progress: Arc<dyn ProgressReporter>,
    cancel: CancellationToken,
}

impl<G: TextGenerator, F: PageFetcher> Pipeline<G, F> {
    /// Create a pipeline with default configuration.
    pub fn new(generator: G, fetcher: F) -> Self {
        Self {
            generator,
            fetcher,
            config: PipelineConfig::default(),
            progress: Arc::new(NullReporter),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the cancellation token propagated from the outer request.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Race a stage against cancellation. The in-flight call is dropped
    /// on abort; no stage has side effects beyond its return value, so
    /// discarding is safe.
    async fn guard<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(PipelineError::Cancelled),
            result = fut => result,
        }
    }

    fn report(&self, status: &str, percent: u8) {
        self.progress.report(status, percent);
    }

    /// Scan a website for the keyword phrases it already targets.
    ///
    /// Fetch failures degrade to domain-only inference; the scan itself
    /// never fails, so the only error here is cancellation.
    pub async fn scan_website_for_keywords(&self, url: &str) -> Result<Vec<String>> {
        let span = info_span!("scan_website", run_id = %Uuid::new_v4(), url = %url);
        async {
            self.report("Scanning website", 10);
            let keywords = self
                .guard(async {
                    Ok(scanner::scan_keywords(&self.generator, &self.fetcher, &self.config, url).await)
                })
                .await?;
            self.report("Website scan complete", 100);
            Ok(keywords)
        }
        .instrument(span)
        .await
    }

    /// Scan a website's coarse structure (pages, blogs, main topics).
    pub async fn scan_website_structure(&self, url: &str) -> Result<WebsiteStructure> {
        let span = info_span!("scan_structure", run_id = %Uuid::new_v4(), url = %url);
        async {
            self.guard(async {
                Ok(scanner::scan_structure(&self.generator, &self.fetcher, &self.config, url).await)
            })
            .await
        }
        .instrument(span)
        .await
    }

    /// Generate keyword opportunities for a website.
    ///
    /// `existing_keywords` (typically from a prior scan) are excluded
    /// from the output along with intra-batch duplicates.
    pub async fn generate_keyword_opportunities(
        &self,
        url: &str,
        existing_keywords: &[String],
        niche: Option<&str>,
    ) -> Result<Vec<KeywordCandidate>> {
        let span = info_span!("keyword_opportunities", run_id = %Uuid::new_v4(), url = %url);
        async {
            let niche = niche.unwrap_or("general").to_string();
            self.report("Generating keyword opportunities", 20);

            let candidates = self
                .guard(retry(self.config.retry_policy(), || {
                    opportunities::generate_from_site(
                        &self.generator,
                        &self.config,
                        url,
                        existing_keywords,
                        &niche,
                    )
                }))
                .await?;

            self.report("Keyword opportunities ready", 100);
            info!(count = candidates.len(), "opportunities generated");
            Ok(candidates)
        }
        .instrument(span)
        .await
    }

    /// Generate keyword opportunities around a seed keyword.
    pub async fn generate_keyword_opportunities_from_keyword(
        &self,
        seed: &str,
        niche: Option<&str>,
    ) -> Result<Vec<KeywordCandidate>> {
        let span = info_span!("keyword_opportunities_seed", run_id = %Uuid::new_v4(), seed = %seed);
        async {
            let niche = niche.unwrap_or("general").to_string();
            self.report("Generating keyword opportunities", 20);

            let candidates = self
                .guard(retry(self.config.retry_policy(), || {
                    opportunities::generate_from_seed(&self.generator, &self.config, seed, &niche)
                }))
                .await?;

            self.report("Keyword opportunities ready", 100);
            info!(count = candidates.len(), "opportunities generated");
            Ok(candidates)
        }
        .instrument(span)
        .await
    }

    /// Strategically classify a keyword batch: tier, cluster,
    /// buyer-journey stage, conversion potential.
    ///
    /// Keywords the model omits get the deterministic local fallback, so
    /// the returned batch is always fully classified.
    pub async fn strategically_analyze_keywords(
        &self,
        keywords: Vec<KeywordCandidate>,
        main_topic: &str,
    ) -> Result<Vec<KeywordCandidate>> {
        let span = info_span!("strategic_analysis", run_id = %Uuid::new_v4(), batch = keywords.len());
        async {
            self.report("Classifying keywords", 30);

            let classified = self
                .guard(retry(self.config.retry_policy(), || {
                    classifier::classify(&self.generator, keywords.to_vec(), main_topic)
                }))
                .await?;

            self.report("Strategic analysis complete", 100);
            Ok(classified)
        }
        .instrument(span)
        .await
    }

    /// Find and scan up to five competitors of a site.
    pub async fn find_competitors(
        &self,
        url: &str,
        niche: &str,
    ) -> Result<Vec<CompetitorProfile>> {
        let span = info_span!("find_competitors", run_id = %Uuid::new_v4(), url = %url);
        async {
            self.report("Finding competitors", 10);

            let profiles = self
                .guard(retry(self.config.retry_policy(), || {
                    competitors::find_competitors(
                        &self.generator,
                        &self.fetcher,
                        &self.config,
                        url,
                        niche,
                        |done, total| {
                            let percent = 10 + (done * 85 / total.max(1)) as u8;
                            self.report(&format!("Scanned competitor {}/{}", done, total), percent);
                        },
                    )
                }))
                .await?;

            self.report("Competitor analysis complete", 100);
            Ok(profiles)
        }
        .instrument(span)
        .await
    }

    /// Analyze keyword gaps between own keywords and competitor
    /// keywords. Pure local analysis, no network.
    pub fn analyze_keyword_gaps(
        &self,
        own_keywords: &[String],
        competitors: &[CompetitorProfile],
    ) -> Vec<KeywordGap> {
        self.report("Analyzing keyword gaps", 50);
        let gaps = gaps::analyze_gaps(own_keywords, competitors, self.config.gap_cap);
        self.report("Gap analysis complete", 100);
        info!(count = gaps.len(), "keyword gaps found");
        gaps
    }

    /// Generate content silos for a main keyword.
    ///
    /// `silo_count` defaults to the configured count when `None`.
    pub async fn generate_content_silos(
        &self,
        main_keyword: &str,
        niche: Option<&str>,
        silo_count: Option<usize>,
    ) -> Result<Vec<ContentSilo>> {
        let span = info_span!("content_silos", run_id = %Uuid::new_v4(), main_keyword = %main_keyword);
        async {
            let niche = niche.unwrap_or(main_keyword).to_string();
            let count = silo_count.unwrap_or(self.config.silo_count);
            self.report("Building content silos", 20);

            let silos = self
                .guard(retry(self.config.retry_policy(), || {
                    silos::build_silos(&self.generator, &self.config, main_keyword, &niche, count)
                }))
                .await?;

            self.report("Content silos ready", 100);
            Ok(silos)
        }
        .instrument(span)
        .await
    }

    /// Generate a complete phased site plan from a URL or a keyword.
    pub async fn generate_complete_site_plan(
        &self,
        url_or_keyword: &str,
        niche: Option<&str>,
        target_audience: Option<&str>,
    ) -> Result<SitePlan> {
        let span = info_span!("site_plan", run_id = %Uuid::new_v4(), input = %url_or_keyword);
        async {
            let plan = self
                .guard(retry(self.config.retry_policy(), || {
                    siteplan::compose_plan(
                        &self.generator,
                        &self.fetcher,
                        &self.config,
                        url_or_keyword,
                        niche,
                        target_audience,
                        |status, percent| self.report(status, percent),
                    )
                }))
                .await?;

            Ok(plan)
        }
        .instrument(span)
        .await
    }
}
