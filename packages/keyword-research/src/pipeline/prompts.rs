//! Generation-service prompts for every pipeline stage.
//!
//! Prompts ask for raw JSON (no prose, no code fences) but the parser
//! tolerates both. Field names are camelCase to match the DTO wire shape.
//! Quality contracts that live only in the prompt (intent mix, primary
//! cap, duplicate avoidance) are labelled as such at the call sites.

/// Prompt for extracting existing keywords from fetched page text.
pub const SITE_KEYWORDS_PROMPT: &str = r#"Analyze this website content and extract the keyword phrases it already targets.

Website: {url}
Content:
{content}

Extract 15-25 keyword phrases of 2-4 words that this site visibly optimizes for: topics of headings, repeated commercial phrases, product and category names.

Output a raw JSON array of strings:
["phrase one", "phrase two", ...]"#;

/// Fallback prompt when the site could not be fetched: infer from the
/// domain name alone.
pub const DOMAIN_KEYWORDS_PROMPT: &str = r#"The website at domain "{domain}" could not be fetched.

Based only on the domain name and general knowledge of the sector it suggests, infer 10-15 keyword phrases (2-4 words each) such a site most likely targets.

Output a raw JSON array of strings:
["phrase one", "phrase two", ...]"#;

/// Prompt for scanning site structure (pages, blogs, main topics).
pub const SITE_STRUCTURE_PROMPT: &str = r#"Analyze this website content and describe its structure.

Website: {url}
Content:
{content}

Output raw JSON:
{
    "pages": ["page titles or paths found"],
    "blogs": ["blog post titles found"],
    "mainTopics": ["up to 10 main topics the site covers"]
}"#;

/// Prompt for generating keyword opportunities from a website context.
pub const OPPORTUNITIES_FROM_SITE_PROMPT: &str = r#"You are a keyword research specialist. The website {url} operates in the {niche} niche and already targets these keywords:

{existing}

Generate {count} NEW keyword opportunities this site does not target yet. Mix of intent:
- 40% high commercial intent ("best X", "X review", "X price", "buy X")
- 30% long-tail commercial phrases (4+ words, purchase-oriented)
- 20% question-form commercial ("which X is best", "what does X cost")
- 10% informational with commercial follow-up potential

For every keyword give realistic estimates. Never include year numbers in any keyword, related keyword, question, or content idea.

Output a raw JSON array:
[
    {
        "keyword": "the phrase",
        "searchVolume": 1200,
        "difficulty": 45,
        "cpc": 1.20,
        "competition": "low" | "medium" | "high",
        "intent": "informational" | "transactional" | "navigational" | "commercial",
        "category": "topical category",
        "relatedKeywords": ["2-4 related phrases"],
        "questions": ["1-3 question variants"],
        "contentIdeas": ["1-3 article ideas"]
    }
]"#;

/// Prompt for generating keyword opportunities from a seed keyword.
pub const OPPORTUNITIES_FROM_SEED_PROMPT: &str = r#"You are a keyword research specialist. Seed keyword: "{seed}" (niche: {niche}).

Generate {count} keyword opportunities around this seed. Mix of intent:
- 40% high commercial intent ("best X", "X review", "X price", "buy X")
- 30% long-tail commercial phrases (4+ words, purchase-oriented)
- 20% question-form commercial ("which X is best", "what does X cost")
- 10% informational with commercial follow-up potential

For every keyword give realistic estimates. Never include year numbers in any keyword, related keyword, question, or content idea.

Output a raw JSON array:
[
    {
        "keyword": "the phrase",
        "searchVolume": 1200,
        "difficulty": 45,
        "cpc": 1.20,
        "competition": "low" | "medium" | "high",
        "intent": "informational" | "transactional" | "navigational" | "commercial",
        "category": "topical category",
        "relatedKeywords": ["2-4 related phrases"],
        "questions": ["1-3 question variants"],
        "contentIdeas": ["1-3 article ideas"]
    }
]"#;

/// Prompt for the strategic second-pass classification.
pub const STRATEGIC_PROMPT: &str = r#"You are a content strategist planning coverage of "{main_topic}".

Classify each of these keywords:

{keywords}

Per keyword assign:
- keywordTier: "primary" (main focus, AT MOST 3 in the whole set), "secondary" (supporting), or "lsi" (broad semantic filler)
- cluster: a short topical cluster label; group related keywords under the same label
- buyerJourneyStage: "awareness" | "consideration" | "decision"
- conversionPotential: 0-100 likelihood that a visitor on this keyword converts

Output a raw JSON array with one entry per keyword:
[
    {
        "keyword": "exact keyword from the list",
        "keywordTier": "primary" | "secondary" | "lsi",
        "cluster": "cluster label",
        "buyerJourneyStage": "awareness" | "consideration" | "decision",
        "conversionPotential": 70
    }
]"#;

/// Prompt for naming likely competitors.
pub const COMPETITORS_PROMPT: &str = r#"Name up to {count} well-known, real competitors of the website {url} in the {niche} niche.

Only include companies you are confident actually exist. Both name and url are required; omit entries you are not sure about.

Output a raw JSON array:
[
    {
        "name": "Competitor name",
        "url": "https://competitor.example",
        "description": "one sentence on what they do",
        "estimatedTraffic": 120000
    }
]"#;

/// Prompt for deriving content-focus labels from scanned keywords.
pub const CONTENT_FOCUS_PROMPT: &str = r#"A competitor site targets these keywords:

{keywords}

Derive 3-5 short content-focus labels describing the themes they invest in.

Output a raw JSON array of strings:
["label one", "label two", ...]"#;

/// Prompt for building content silos.
pub const SILOS_PROMPT: &str = r#"You are planning topical-authority content for the main keyword "{main_keyword}" (niche: {niche}).

Design {count} content silos. Each silo has one pillar topic and 10-12 sub-topic articles supporting it. Never include year numbers in any keyword or topic.

Output a raw JSON array:
[
    {
        "pillarTopic": "Pillar article title",
        "pillarKeyword": "pillar target keyword",
        "description": "what this silo establishes authority on",
        "estimatedSearchVolume": 2400,
        "subTopics": [
            {
                "topic": "Sub-article title",
                "keyword": "sub-article target keyword",
                "contentType": "blog" | "guide" | "tutorial" | "comparison" | "listicle",
                "priority": "high" | "medium" | "low",
                "estimatedSearchVolume": 320
            }
        ],
        "internalLinkingStrategy": "how sub-articles link to the pillar"
    }
]"#;

/// Prompt for topping up a silo that came back short of sub-topics.
pub const SILO_TOPUP_PROMPT: &str = r#"The content silo "{pillar_topic}" (pillar keyword: "{pillar_keyword}") needs exactly {deficit} additional sub-topic articles.

It already has these sub-topics, do NOT repeat or trivially rephrase them:
{existing}

Output a raw JSON array of exactly {deficit} new entries:
[
    {
        "topic": "Sub-article title",
        "keyword": "target keyword",
        "contentType": "blog" | "guide" | "tutorial" | "comparison" | "listicle",
        "priority": "high" | "medium" | "low",
        "estimatedSearchVolume": 320
    }
]"#;

/// Prompt for inferring the main keyword from scanned site keywords.
pub const MAIN_KEYWORD_PROMPT: &str = r#"A website targets these keywords:

{keywords}

Infer the single main keyword that best captures what the site is about, the niche, and the primary target audience.

Output raw JSON:
{
    "mainKeyword": "the main keyword",
    "niche": "the niche",
    "targetAudience": "who the content should address"
}"#;

/// Prompt for the 4-phase implementation roadmap.
pub const PHASES_PROMPT: &str = r#"A site plan for "{main_keyword}" contains these articles:

{articles}

Produce a 4-phase implementation roadmap:
- Phase 1 "foundation": pillar pages and the highest-priority supporting articles
- Phase 2: high-value commercial coverage
- Phase 3: supporting long-tail coverage
- Phase 4: full topical coverage and refresh

Reference specific article titles from the list in each phase. Also give a long-term strategy paragraph.

Output raw JSON:
{
    "phases": [
        {
            "phase": 1,
            "title": "Foundation",
            "articles": ["titles from the list"],
            "estimatedDuration": "4-6 weeks",
            "focus": "what this phase achieves"
        }
    ],
    "longTermStrategy": "paragraph"
}"#;

/// Substitute `{placeholder}` markers in a prompt template.
fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in pairs {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Format the site-keyword extraction prompt.
pub fn format_site_keywords_prompt(url: &str, content: &str) -> String {
    fill(SITE_KEYWORDS_PROMPT, &[("url", url), ("content", content)])
}

/// Format the domain-only fallback prompt.
pub fn format_domain_keywords_prompt(domain: &str) -> String {
    fill(DOMAIN_KEYWORDS_PROMPT, &[("domain", domain)])
}

/// Format the site-structure prompt.
pub fn format_site_structure_prompt(url: &str, content: &str) -> String {
    fill(SITE_STRUCTURE_PROMPT, &[("url", url), ("content", content)])
}

/// Format the website-seeded opportunities prompt.
pub fn format_opportunities_from_site_prompt(
    url: &str,
    existing: &[String],
    niche: &str,
    count: usize,
) -> String {
    let existing_text = if existing.is_empty() {
        "(none known)".to_string()
    } else {
        existing.join(", ")
    };
    fill(
        OPPORTUNITIES_FROM_SITE_PROMPT,
        &[
            ("url", url),
            ("existing", &existing_text),
            ("niche", niche),
            ("count", &count.to_string()),
        ],
    )
}

/// Format the seed-keyword opportunities prompt.
pub fn format_opportunities_from_seed_prompt(seed: &str, niche: &str, count: usize) -> String {
    fill(
        OPPORTUNITIES_FROM_SEED_PROMPT,
        &[("seed", seed), ("niche", niche), ("count", &count.to_string())],
    )
}

/// Format the strategic classification prompt.
pub fn format_strategic_prompt(keywords: &[(String, String)], main_topic: &str) -> String {
    let keywords_text = keywords
        .iter()
        .map(|(keyword, category)| format!("- {} (category: {})", keyword, category))
        .collect::<Vec<_>>()
        .join("\n");
    fill(
        STRATEGIC_PROMPT,
        &[("main_topic", main_topic), ("keywords", &keywords_text)],
    )
}

/// Format the competitor-finding prompt.
pub fn format_competitors_prompt(url: &str, niche: &str, count: usize) -> String {
    fill(
        COMPETITORS_PROMPT,
        &[("url", url), ("niche", niche), ("count", &count.to_string())],
    )
}

/// Format the content-focus prompt.
pub fn format_content_focus_prompt(keywords: &[String]) -> String {
    fill(CONTENT_FOCUS_PROMPT, &[("keywords", &keywords.join(", "))])
}

/// Format the silo-building prompt.
pub fn format_silos_prompt(main_keyword: &str, niche: &str, count: usize) -> String {
    fill(
        SILOS_PROMPT,
        &[
            ("main_keyword", main_keyword),
            ("niche", niche),
            ("count", &count.to_string()),
        ],
    )
}

/// Format the silo top-up prompt.
pub fn format_silo_topup_prompt(
    pillar_topic: &str,
    pillar_keyword: &str,
    deficit: usize,
    existing: &[String],
) -> String {
    let existing_text = existing
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");
    fill(
        SILO_TOPUP_PROMPT,
        &[
            ("pillar_topic", pillar_topic),
            ("pillar_keyword", pillar_keyword),
            ("deficit", &deficit.to_string()),
            ("existing", &existing_text),
        ],
    )
}

/// Format the main-keyword inference prompt.
pub fn format_main_keyword_prompt(keywords: &[String]) -> String {
    fill(MAIN_KEYWORD_PROMPT, &[("keywords", &keywords.join(", "))])
}

/// Format the roadmap prompt.
pub fn format_phases_prompt(main_keyword: &str, articles: &[String]) -> String {
    let articles_text = articles
        .iter()
        .map(|a| format!("- {}", a))
        .collect::<Vec<_>>()
        .join("\n");
    fill(
        PHASES_PROMPT,
        &[("main_keyword", main_keyword), ("articles", &articles_text)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_site_keywords() {
        let prompt = format_site_keywords_prompt("https://example.com", "page text");
        assert!(prompt.contains("https://example.com"));
        assert!(prompt.contains("page text"));
        assert!(!prompt.contains("{url}"));
    }

    #[test]
    fn test_format_opportunities_counts_and_existing() {
        let prompt = format_opportunities_from_site_prompt(
            "https://petshop.example",
            &["dog food".to_string(), "dog toys".to_string()],
            "pets",
            40,
        );
        assert!(prompt.contains("https://petshop.example"));
        assert!(prompt.contains("dog food, dog toys"));
        assert!(prompt.contains("Generate 40"));

        let empty = format_opportunities_from_site_prompt("https://petshop.example", &[], "pets", 40);
        assert!(empty.contains("(none known)"));
    }

    #[test]
    fn test_format_strategic_lists_keywords() {
        let prompt = format_strategic_prompt(
            &[("yoga mat".to_string(), "gear".to_string())],
            "yoga",
        );
        assert!(prompt.contains("- yoga mat (category: gear)"));
        assert!(prompt.contains("yoga"));
    }

    #[test]
    fn test_format_topup_has_deficit_and_existing() {
        let prompt = format_silo_topup_prompt(
            "Yoga for beginners",
            "beginner yoga",
            3,
            &["Morning routine".to_string()],
        );
        assert!(prompt.contains("exactly 3"));
        assert!(prompt.contains("- Morning routine"));
    }

    #[test]
    fn test_templates_keep_json_braces() {
        // The fill helper must only touch known {placeholder} markers;
        // JSON braces in templates survive.
        let prompt = format_main_keyword_prompt(&["a".to_string()]);
        assert!(prompt.contains("\"mainKeyword\""));
    }
}
