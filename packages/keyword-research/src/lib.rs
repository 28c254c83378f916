//! Keyword Research & Content-Planning Pipeline
//!
//! Given a website URL or a seed keyword, the pipeline produces ranked,
//! deduplicated keyword opportunities, a strategic tiering of those
//! keywords by buyer-journey stage, a competitor keyword-gap analysis,
//! and a multi-silo, phased content production roadmap.
//!
//! # Design Philosophy
//!
//! The hard part is not the scoring math, it is orchestrating an
//! unreliable free-text generation service:
//!
//! - Model output is parsed with repair strategies, never trusted
//! - Derived numbers (scores, totals) are always recomputed locally
//! - Top-level calls get bounded retries; sub-steps degrade to empty
//!   results instead of failing the run
//! - Everything is request-scoped: no storage, no shared state
//!
//! # Usage
//!
//! ```rust,ignore
//! use keyword_research::{HttpPageFetcher, Pipeline};
//! use keyword_research::ai::OpenAiGenerator;
//!
//! let pipeline = Pipeline::new(OpenAiGenerator::from_env()?, HttpPageFetcher::new());
//!
//! // Website-seeded research
//! let existing = pipeline.scan_website_for_keywords("https://example.com").await?;
//! let candidates = pipeline
//!     .generate_keyword_opportunities("https://example.com", &existing, Some("fitness"))
//!     .await?;
//!
//! // Strategic second pass
//! let classified = pipeline
//!     .strategically_analyze_keywords(candidates, "yoga gear")
//!     .await?;
//!
//! // Competitor gap analysis
//! let competitors = pipeline.find_competitors("https://example.com", "fitness").await?;
//! let gaps = pipeline.analyze_keyword_gaps(&existing, &competitors);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (TextGenerator, PageFetcher)
//! - [`types`] - Request-scoped data types
//! - [`pipeline`] - The pipeline stages and the [`Pipeline`] entry points
//! - [`parse`] - Structured-response parsing with repair
//! - [`retry`] - Bounded retry for top-level calls
//! - [`progress`] - Progress reporting for streaming transports
//! - [`security`] - SSRF protection for user-supplied URLs
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetch;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{FetchError, PipelineError, Result, SecurityError};
pub use traits::{PageFetcher, TextGenerator};
pub use types::{
    competitor::{CompetitorProfile, KeywordGap, OpportunityLevel},
    config::PipelineConfig,
    keyword::{
        BuyerJourneyStage, Competition, Intent, KeywordCandidate, KeywordTier, Relevance,
    },
    plan::{ContentSilo, ContentType, ImplementationPhase, Priority, SitePlan, SubTopic},
    website::WebsiteStructure,
};

// Re-export the pipeline entry point
pub use pipeline::Pipeline;

// Re-export pipeline helpers that are useful standalone
pub use pipeline::scorer::{relevance_for, score_keyword};

// Re-export infrastructure
pub use fetch::HttpPageFetcher;
pub use progress::{ChannelReporter, FnReporter, NullReporter, ProgressEvent, ProgressReporter};
pub use retry::{retry, retry_with_sleep, RetryPolicy};
pub use security::UrlValidator;

// Re-export testing utilities
pub use testing::{MockFetcher, MockGenerator};
