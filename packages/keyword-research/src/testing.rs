//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the pipeline
//! without real generation-service or network calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, PipelineError, Result};
use crate::traits::{PageFetcher, TextGenerator};

/// Scripted outcome for one generation call.
#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Respond(String),
    Fail,
}

/// A mock text generator for testing.
///
/// Responses are scripted per prompt fragment: the first registered
/// fragment found in an incoming prompt selects its queue, and outcomes
/// pop in registration order. The last outcome in a queue is sticky so a
/// fragment scripted once keeps answering. Prompts matching no fragment
/// fail, which keeps tests honest about which calls they expect.
#[derive(Default)]
pub struct MockGenerator {
    /// Fragment -> queued outcomes, in registration order
    scripts: RwLock<Vec<(String, VecDeque<ScriptedOutcome>)>>,

    /// Every prompt received, for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockGenerator {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for prompts containing `fragment`.
    pub fn with_response(self, fragment: impl Into<String>, response: impl Into<String>) -> Self {
        self.push(fragment.into(), ScriptedOutcome::Respond(response.into()));
        self
    }

    /// Queue a failure for prompts containing `fragment`.
    pub fn with_failure(self, fragment: impl Into<String>) -> Self {
        self.push(fragment.into(), ScriptedOutcome::Fail);
        self
    }

    fn push(&self, fragment: String, outcome: ScriptedOutcome) {
        let mut scripts = self.scripts.write().unwrap();
        if let Some((_, queue)) = scripts.iter_mut().find(|(f, _)| *f == fragment) {
            queue.push_back(outcome);
        } else {
            scripts.push((fragment, VecDeque::from([outcome])));
        }
    }

    /// All prompts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.write().unwrap().push(prompt.to_string());

        let mut scripts = self.scripts.write().unwrap();
        let Some((_, queue)) = scripts.iter_mut().find(|(f, _)| prompt.contains(f.as_str()))
        else {
            return Err(PipelineError::generation_msg(format!(
                "no scripted response for prompt: {}...",
                prompt.chars().take(60).collect::<String>()
            )));
        };

        // Pop unless this is the last outcome; the last one is sticky
        let outcome = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };

        match outcome {
            ScriptedOutcome::Respond(response) => Ok(response),
            ScriptedOutcome::Fail => Err(PipelineError::generation_msg("scripted failure")),
        }
    }
}

/// A mock page fetcher for testing.
///
/// Returns predefined bodies without network access.
#[derive(Default)]
pub struct MockFetcher {
    pages: RwLock<HashMap<String, String>>,
    fail_urls: RwLock<Vec<String>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a mock with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined page body.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), body.into());
        self
    }

    /// Mark a URL as failing.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// All URLs fetched so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        if self.fail_urls.read().unwrap().iter().any(|u| u == url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_matches_fragment() {
        let generator = MockGenerator::new().with_response("hello", "world");

        let result = generator.complete("say hello please").await.unwrap();
        assert_eq!(result, "world");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_generator_unmatched_fails() {
        let generator = MockGenerator::new();
        assert!(generator.complete("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_generator_queue_then_sticky() {
        let generator = MockGenerator::new()
            .with_failure("greet")
            .with_response("greet", "hi");

        assert!(generator.complete("greet me").await.is_err());
        assert_eq!(generator.complete("greet me").await.unwrap(), "hi");
        // Last outcome is sticky
        assert_eq!(generator.complete("greet me").await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_mock_fetcher_pages_and_failures() {
        let fetcher = MockFetcher::new()
            .with_page("https://a.example", "<p>A</p>")
            .fail_url("https://b.example");

        assert_eq!(fetcher.fetch_page("https://a.example").await.unwrap(), "<p>A</p>");
        assert!(matches!(
            fetcher.fetch_page("https://b.example").await,
            Err(FetchError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.fetch_page("https://missing.example").await,
            Err(FetchError::Status { status: 404, .. })
        ));
    }
}
