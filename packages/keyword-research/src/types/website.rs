//! Website structure snapshot.

use serde::{Deserialize, Serialize};

/// Cap on main topics kept from a structure scan.
pub const MAX_MAIN_TOPICS: usize = 10;

/// Coarse structure of a scanned website.
///
/// Totals are derived from the lists, never taken from model output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteStructure {
    /// Page titles or URLs
    #[serde(default)]
    pub pages: Vec<String>,

    /// Blog post titles or URLs
    #[serde(default)]
    pub blogs: Vec<String>,

    /// Derived: pages.len()
    pub total_pages: usize,

    /// Derived: blogs.len()
    pub total_blogs: usize,

    /// Main topics covered, at most [`MAX_MAIN_TOPICS`]
    #[serde(default)]
    pub main_topics: Vec<String>,
}

impl WebsiteStructure {
    /// Build a structure from raw lists, deriving totals and capping
    /// main topics.
    pub fn from_lists(pages: Vec<String>, blogs: Vec<String>, mut main_topics: Vec<String>) -> Self {
        main_topics.truncate(MAX_MAIN_TOPICS);
        Self {
            total_pages: pages.len(),
            total_blogs: blogs.len(),
            pages,
            blogs,
            main_topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_derived_and_topics_capped() {
        let topics: Vec<String> = (0..15).map(|i| format!("topic {}", i)).collect();
        let structure = WebsiteStructure::from_lists(
            vec!["/".to_string(), "/about".to_string()],
            vec!["/blog/a".to_string()],
            topics,
        );

        assert_eq!(structure.total_pages, 2);
        assert_eq!(structure.total_blogs, 1);
        assert_eq!(structure.main_topics.len(), MAX_MAIN_TOPICS);
    }
}
