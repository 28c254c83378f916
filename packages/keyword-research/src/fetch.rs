//! HTTP page fetcher with browser-like headers.
//!
//! Sites routinely block obvious bot traffic, so requests go out with a
//! realistic desktop header set. The timeout is bounded (~10 s): a slow
//! site degrades to the scanner's domain-only fallback instead of
//! stalling a research run. Fetched HTML is untrusted text; use
//! [`html_to_text`] before handing it to a prompt.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::security::UrlValidator;
use crate::traits::fetcher::PageFetcher;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Reqwest-backed [`PageFetcher`] with SSRF validation.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    validator: UrlValidator,
    user_agent: String,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageFetcher {
    /// Create a fetcher with the default 10 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            validator: UrlValidator::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom URL validator.
    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        self.validator.validate(url)?;

        debug!(url = %url, "fetching page");
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9,nl;q=0.8")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| FetchError::Http(Box::new(e)))
    }
}

/// Strip HTML down to plain text suitable for a prompt.
///
/// Removes script/style/noscript blocks and all tags, decodes the common
/// entities, and collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    let script_pattern = regex::Regex::new(r"(?si)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = regex::Regex::new(r"(?si)<style[^>]*>.*?</style>").unwrap();
    let noscript_pattern = regex::Regex::new(r"(?si)<noscript[^>]*>.*?</noscript>").unwrap();
    text = script_pattern.replace_all(&text, " ").to_string();
    text = style_pattern.replace_all(&text, " ").to_string();
    text = noscript_pattern.replace_all(&text, " ").to_string();

    let tag_pattern = regex::Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, " ").to_string();

    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate text to a character budget on a char boundary.
pub fn truncate_for_prompt(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Derive the bare domain from a URL, tolerating missing schemes.
pub fn bare_domain(url: &str) -> Option<String> {
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };

    url::Url::parse(&candidate)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}
