//! PageFetcher trait for raw HTML retrieval.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Abstraction over a raw HTML fetch capability.
///
/// The result is untrusted text. Fetch failures are expected and handled
/// by the website scanner's domain-only fallback; implementations should
/// fail fast (bounded timeout) rather than hang a research run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw body of a URL.
    async fn fetch_page(&self, url: &str) -> FetchResult<String>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        self.as_ref().fetch_page(url).await
    }
}
