//! Pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::normalize::DEFAULT_BLOCKED_YEARS;
use crate::retry::RetryPolicy;

/// Configuration for a research pipeline instance.
///
/// All knobs are value-level and serializable so a serving layer can load
/// them from its own config system. Durations are expressed in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Candidates requested per opportunity-generation call.
    ///
    /// Default: 40.
    pub candidate_batch_size: usize,

    /// Default number of content silos for a plan.
    ///
    /// Default: 5.
    pub silo_count: usize,

    /// Target sub-topic count per silo; silos below this after the first
    /// pass get one top-up call for the deficit.
    ///
    /// Default: 12.
    pub subtopic_target: usize,

    /// Maximum competitors requested and scanned.
    ///
    /// Default: 5.
    pub max_competitors: usize,

    /// Cap on emitted keyword gaps.
    ///
    /// Default: 50.
    pub gap_cap: usize,

    /// Per-competitor scan timeout in seconds.
    ///
    /// Default: 10.
    pub competitor_scan_timeout_secs: u64,

    /// Overall budget for the opportunistic competitor pass during plan
    /// composition, in seconds.
    ///
    /// Default: 15.
    pub competitor_insight_budget_secs: u64,

    /// Character budget for page text included in prompts.
    ///
    /// Default: 6000.
    pub prompt_content_budget: usize,

    /// Retry attempts for top-level calls.
    ///
    /// Default: 2.
    pub retry_attempts: u32,

    /// Fixed delay between retry attempts, in seconds.
    ///
    /// Default: 2.
    pub retry_delay_secs: u64,

    /// Year tokens no generated keyword may contain.
    #[serde(default = "default_blocked_years")]
    pub blocked_years: Vec<String>,
}

fn default_blocked_years() -> Vec<String> {
    DEFAULT_BLOCKED_YEARS.iter().map(|y| y.to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candidate_batch_size: 40,
            silo_count: 5,
            subtopic_target: 12,
            max_competitors: 5,
            gap_cap: 50,
            competitor_scan_timeout_secs: 10,
            competitor_insight_budget_secs: 15,
            prompt_content_budget: 6000,
            retry_attempts: 2,
            retry_delay_secs: 2,
            blocked_years: default_blocked_years(),
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.candidate_batch_size = size;
        self
    }

    /// Set the default silo count.
    pub fn with_silo_count(mut self, count: usize) -> Self {
        self.silo_count = count;
        self
    }

    /// Set the sub-topic target per silo.
    pub fn with_subtopic_target(mut self, target: usize) -> Self {
        self.subtopic_target = target;
        self
    }

    /// Set the retry policy for top-level calls.
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay_secs = delay.as_secs();
        self
    }

    /// Replace the blocked year tokens.
    pub fn with_blocked_years(
        mut self,
        years: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.blocked_years = years.into_iter().map(|y| y.into()).collect();
        self
    }

    /// The retry policy for top-level calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    /// Per-competitor scan timeout.
    pub fn competitor_scan_timeout(&self) -> Duration {
        Duration::from_secs(self.competitor_scan_timeout_secs)
    }

    /// Budget for the opportunistic competitor pass.
    pub fn competitor_insight_budget(&self) -> Duration {
        Duration::from_secs(self.competitor_insight_budget_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.candidate_batch_size, 40);
        assert_eq!(config.silo_count, 5);
        assert_eq!(config.subtopic_target, 12);
        assert_eq!(config.gap_cap, 50);
        assert_eq!(config.retry_policy().max_attempts, 2);
        assert!(!config.blocked_years.is_empty());
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .with_batch_size(10)
            .with_silo_count(3)
            .with_blocked_years(["2019"]);

        assert_eq!(config.candidate_batch_size, 10);
        assert_eq!(config.silo_count, 3);
        assert_eq!(config.blocked_years, vec!["2019".to_string()]);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.candidate_batch_size, config.candidate_batch_size);
    }
}
