//! Typed errors for the keyword research pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy mirrors how failures propagate through the pipeline:
//! transient generation failures are retried, sub-step failures degrade
//! to empty collections, and a top-level call that still yields zero
//! usable records after retries surfaces as [`PipelineError::EmptyGeneration`].

use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Text-generation service unavailable or failed (transient, retried)
    #[error("generation service error: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A top-level call yielded zero usable records after parsing
    #[error("{stage} produced no usable records")]
    EmptyGeneration { stage: &'static str },

    /// Page fetch failed (degrades to domain fallback where applicable)
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// JSON parsing error on a payload that must be well-formed
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error (missing credential, bad endpoint)
    #[error("config error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap an arbitrary error as a transient generation failure.
    pub fn generation(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Generation(Box::new(err))
    }

    /// Build a generation failure from a plain message.
    pub fn generation_msg(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::Generation(msg.into())
    }
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Connection or read timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
